use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::TrackerFilter;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    date_label: &str,
    filter: TrackerFilter,
    search: &str,
    searching: bool,
) {
    let mut spans = vec![
        Span::styled("  Trackers  ", theme::accent().add_modifier(Modifier::BOLD)),
        Span::styled("‹ ", theme::dim()),
        Span::styled(date_label.to_string(), theme::bold()),
        Span::styled(" ›", theme::dim()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(filter.display_name(), theme::amber()),
    ];

    if searching || !search.is_empty() {
        spans.push(Span::styled("  ·  search: ", theme::dim()));
        spans.push(Span::styled(search.to_string(), theme::bold()));
        if searching {
            spans.push(Span::styled("█", theme::accent()));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(searching))
        .style(theme::base());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
