use ratatui::style::{Color, Modifier, Style};

use crate::models::Rgb;

pub const BG: Color = Color::Rgb(20, 21, 26);
pub const SURFACE: Color = Color::Rgb(30, 32, 40);
pub const BORDER: Color = Color::Rgb(58, 62, 76);
pub const TEXT: Color = Color::Rgb(226, 228, 235);
pub const TEXT_DIM: Color = Color::Rgb(130, 134, 150);
pub const BLUE: Color = Color::Rgb(55, 114, 231);
pub const GREEN: Color = Color::Rgb(51, 207, 105);
pub const AMBER: Color = Color::Rgb(255, 136, 30);
pub const RED: Color = Color::Rgb(245, 107, 108);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn accent() -> Style {
    Style::default().fg(BLUE)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        Style::default().fg(BORDER)
    }
}

/// Foreground in the tracker's own color.
pub fn tracker(color: Rgb) -> Style {
    Style::default().fg(Color::Rgb(color.r, color.g, color.b))
}
