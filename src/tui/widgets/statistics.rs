use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::Statistics;
use crate::tui::theme;
use crate::utils::format::progress_bar;

pub fn render(frame: &mut Frame, area: Rect, stats: &Statistics) {
    let block = Block::default()
        .title(Span::styled(" Statistics ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    if stats.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("  Nothing to analyze yet", theme::dim())),
        ];
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let metric = |value: u32, label: &'static str| {
        Line::from(vec![
            Span::styled(
                format!("  {:>4}  ", value),
                theme::green().add_modifier(Modifier::BOLD),
            ),
            Span::styled(label, theme::dim()),
        ])
    };

    let text = vec![
        Line::from(""),
        metric(stats.best_streak, "best period"),
        metric(stats.ideal_days, "ideal days"),
        metric(stats.completed_trackers, "trackers completed"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", theme::dim()),
            Span::styled(
                progress_bar(stats.best_streak, stats.ideal_days, 12),
                theme::green(),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(text).block(block), area);
}
