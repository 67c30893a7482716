use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::StatusMessage;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, status: Option<&StatusMessage>) {
    let line = match status {
        Some(msg) => {
            let style = if msg.is_error { theme::red() } else { theme::green() };
            Line::from(Span::styled(msg.text.as_str(), style))
        }
        None => {
            let hints = [
                ("[space]", " done  "),
                ("[← →]", " day  "),
                ("[t]", " today  "),
                ("[f]", " filter  "),
                ("[/]", " search  "),
                ("[p]", " pin  "),
                ("[s]", " stats  "),
                ("[?]", " help  "),
                ("[q]", " quit"),
            ];
            let mut spans = Vec::new();
            for (key, label) in hints {
                spans.push(Span::styled(key, theme::accent()));
                spans.push(Span::styled(label, theme::dim()));
            }
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
