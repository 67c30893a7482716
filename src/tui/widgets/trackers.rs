use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::board::Board;
use crate::tui::theme;
use crate::utils::format::{format_day_count, pad_display};

pub fn render(frame: &mut Frame, area: Rect, board: &Board, focus_idx: usize, has_trackers: bool) {
    let block = Block::default()
        .title(Span::styled(" Trackers ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(true))
        .style(theme::surface());

    if board.is_empty() {
        let message = if has_trackers {
            "  Nothing found"
        } else {
            "  What shall we track?  Add one with `tracker add <title>`"
        };
        let text = vec![Line::from(""), Line::from(Span::styled(message, theme::dim()))];
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_row = 0;
    let mut card_idx = 0;

    for section in &board.sections {
        items.push(ListItem::new(Line::from(Span::styled(
            format!(" {}", section.title),
            theme::bold(),
        ))));

        for card in &section.cards {
            let is_focused = card_idx == focus_idx;
            if is_focused {
                selected_row = items.len();
            }
            let t = &card.tracker;

            let (mark, mark_style) = if card.completed {
                ("✓", theme::green().add_modifier(Modifier::BOLD))
            } else {
                ("○", theme::dim())
            };
            let title_style = if is_focused {
                theme::accent().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };

            items.push(ListItem::new(Line::from(vec![
                Span::styled(if is_focused { " ▸ " } else { "   " }, theme::accent()),
                Span::styled("█ ", theme::tracker(t.color)),
                Span::raw(pad_display(&t.emoji, 3)),
                Span::styled(pad_display(&t.title, 26), title_style),
                Span::styled(mark, mark_style),
                Span::styled(
                    format!("  {}", format_day_count(card.days_completed)),
                    theme::dim(),
                ),
            ])));
            card_idx += 1;
        }
    }

    let mut state = ListState::default().with_selected(Some(selected_row));
    let list = List::new(items).block(block);
    frame.render_stateful_widget(list, area, &mut state);
}
