use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;

use crate::board::{Board, TrackerCard};
use crate::config::AppConfig;
use crate::db::repository::{RecordRepo, TrackerRepo};
use crate::db::Snapshot;
use crate::models::{Statistics, TrackerFilter};
use crate::stats;
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{header, statistics, statusbar, trackers};
use crate::utils::format::{format_date_label, format_day_count, progress_bar};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Board,
    Stats,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Search,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub input_mode: InputMode,
    pub should_quit: bool,
    pub search: String,
    pub filter: TrackerFilter,
    pub today: NaiveDate,
    /// Date the board shows
    pub date: NaiveDate,
    pub focus_idx: usize,
    pub status: Option<StatusMessage>,

    // Derived from the last snapshot, rebuilt by `load`
    pub board: Board,
    pub stats: Statistics,
    pub tracker_count: usize,
}

impl App {
    pub fn new(config: AppConfig, today: NaiveDate) -> Self {
        let filter = config.display.default_filter;
        App {
            view: View::Board,
            config,
            input_mode: InputMode::Normal,
            should_quit: false,
            search: String::new(),
            filter,
            today,
            date: today,
            focus_idx: 0,
            status: None,
            board: Board {
                date: today,
                sections: Vec::new(),
            },
            stats: Statistics::default(),
            tracker_count: 0,
        }
    }

    /// Pulls a fresh snapshot and rebuilds everything shown on screen.
    pub fn load(&mut self, conn: &Connection) -> Result<()> {
        let snapshot = Snapshot::load(conn)?;
        self.board = Board::build(
            &snapshot,
            self.date,
            self.today,
            self.filter,
            &self.search,
            &self.config.display.pinned_title,
        );
        self.date = self.board.date;
        self.stats = stats::calculate_from_records(&snapshot.trackers, &snapshot.records);
        self.tracker_count = snapshot.trackers.len();

        let cards = self.board.card_count();
        if self.focus_idx >= cards {
            self.focus_idx = cards.saturating_sub(1);
        }
        Ok(())
    }

    /// Reloads when the clock has moved to a new day.
    pub fn tick(&mut self, conn: &Connection, now: NaiveDate) {
        if now == self.today {
            return;
        }
        log::info!("day rolled over from {} to {}", self.today, now);
        if self.date == self.today {
            self.date = now;
        }
        self.today = now;
        self.reload(conn);
    }

    fn reload(&mut self, conn: &Connection) {
        if let Err(e) = self.load(conn) {
            self.set_error(format!("Reload failed: {}", e));
        }
    }

    fn set_info(&mut self, text: String) {
        self.status = Some(StatusMessage { text, is_error: false });
    }

    fn set_error(&mut self, text: String) {
        log::warn!("{}", text);
        self.status = Some(StatusMessage { text, is_error: true });
    }

    pub fn focused_card(&self) -> Option<&TrackerCard> {
        self.board.cards().nth(self.focus_idx)
    }

    pub fn handle_key(&mut self, key: KeyEvent, conn: &Connection) {
        // Ignore release/repeat events some terminals send
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode {
            InputMode::Search => self.handle_search_key(key, conn),
            InputMode::Normal => match self.view {
                View::Board => self.handle_board_key(key, conn),
                View::Stats => self.handle_stats_key(key),
                View::Help => self.handle_help_key(key),
            },
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent, conn: &Connection) {
        self.status = None;

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('s') => {
                self.view = View::Stats;
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
            }
            KeyCode::Char('f') => {
                self.filter = self.filter.next();
                self.focus_idx = 0;
                self.reload(conn);
            }
            KeyCode::Left | KeyCode::Char('h') => self.shift_date(-1, conn),
            KeyCode::Right | KeyCode::Char('l') => self.shift_date(1, conn),
            KeyCode::Char('t') => {
                self.date = self.today;
                self.focus_idx = 0;
                self.reload(conn);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.focus_idx + 1 < self.board.card_count() {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_focused(conn),
            KeyCode::Char('p') => self.pin_focused(conn),
            _ => {}
        }
    }

    fn handle_stats_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q')) {
            self.view = View::Board;
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            self.view = View::Board;
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                self.search.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                return;
            }
            KeyCode::Backspace => {
                self.search.pop();
            }
            KeyCode::Char(c) => {
                self.search.push(c);
            }
            _ => return,
        }
        self.focus_idx = 0;
        self.reload(conn);
    }

    fn shift_date(&mut self, days: i64, conn: &Connection) {
        // Picking another day leaves the "today" filter, which pins the date
        if self.filter == TrackerFilter::Today {
            self.filter = TrackerFilter::All;
        }
        self.date += Duration::days(days);
        self.focus_idx = 0;
        self.reload(conn);
    }

    fn toggle_focused(&mut self, conn: &Connection) {
        let Some(card) = self.focused_card() else {
            return;
        };
        let (id, title) = (card.tracker.id, card.tracker.title.clone());

        match RecordRepo::toggle(conn, id, self.date, self.today) {
            Ok(true) => self.set_info(format!("✓ {} done", title)),
            Ok(false) => self.set_info(format!("○ {} unmarked", title)),
            Err(e) => {
                self.set_error(format!("✗ {}", e));
                return;
            }
        }
        self.reload(conn);
    }

    fn pin_focused(&mut self, conn: &Connection) {
        let Some(card) = self.focused_card() else {
            return;
        };
        let (id, title) = (card.tracker.id, card.tracker.title.clone());

        match TrackerRepo::toggle_pin(conn, id) {
            Ok(true) => self.set_info(format!("Pinned {}", title)),
            Ok(false) => self.set_info(format!("Unpinned {}", title)),
            Err(e) => {
                self.set_error(format!("✗ {}", e));
                return;
            }
        }
        self.reload(conn);
        // Follow the tracker to its new section
        if let Some(pos) = self.board.cards().position(|c| c.tracker.id == id) {
            self.focus_idx = pos;
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Board => self.draw_board(frame),
            View::Stats => self.draw_stats(frame),
            View::Help => {
                self.draw_board(frame);
                self.draw_help_overlay(frame);
            }
        }
    }

    fn draw_board(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(
            frame,
            outer[0],
            &format_date_label(self.date, self.today),
            self.filter,
            &self.search,
            self.input_mode == InputMode::Search,
        );

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(outer[1]);

        trackers::render(
            frame,
            columns[0],
            &self.board,
            self.focus_idx,
            self.tracker_count > 0,
        );
        statistics::render(frame, columns[1], &self.stats);
        statusbar::render(frame, outer[2], self.status.as_ref());
    }

    fn draw_stats(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("  Statistics  ", theme::accent().add_modifier(Modifier::BOLD)),
            Span::styled("  [Esc] back", theme::dim()),
        ]));
        frame.render_widget(title, chunks[0]);

        let mut lines = vec![Line::from("")];
        if self.stats.is_empty() {
            lines.push(Line::from(Span::styled(
                "  Nothing to analyze yet",
                theme::dim(),
            )));
        } else {
            let rows = [
                ("Best period", format_day_count(self.stats.best_streak)),
                ("Ideal days", self.stats.ideal_days.to_string()),
                ("Trackers completed", self.stats.completed_trackers.to_string()),
            ];
            for (label, value) in rows {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<20}", label), theme::dim()),
                    Span::styled(value, theme::green().add_modifier(Modifier::BOLD)),
                ]));
                lines.push(Line::from(""));
            }
            lines.push(Line::from(vec![
                Span::styled("  Best run vs ideal days  ", theme::dim()),
                Span::styled(
                    progress_bar(self.stats.best_streak, self.stats.ideal_days, 24),
                    theme::green(),
                ),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        // Clipped to the frame so small terminals do not index past the buffer
        let popup_area = Rect {
            x: area.x + area.width / 4,
            y: area.y + area.height / 5,
            width: area.width / 2,
            height: (area.height * 3 / 5).max(14),
        }
        .intersection(area);

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("[space] / Enter", "Mark done / undo for the shown day"),
            ("[← →] / h l", "Previous / next day"),
            ("[t]", "Jump to today"),
            ("[↑ ↓] / k j", "Move between trackers"),
            ("[f]", "Cycle filter"),
            ("[/]", "Search by title"),
            ("[p]", "Pin / unpin"),
            ("[s]", "Statistics view"),
            ("[?]", "Toggle help"),
            ("[q] / Esc", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, action) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<17}", key), theme::accent()),
                Span::styled(action, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::accent())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let tick_rate = std::time::Duration::from_millis(config.display.tick_rate_ms.max(50));
    let mut app = App::new(config, Local::now().date_naive());
    app.load(&conn)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(tick_rate);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key, &conn);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Resize) => {}
            Ok(Event::Tick) => app.tick(&conn, Local::now().date_naive()),
            Err(e) => break Err(e.into()),
        }
    };

    ratatui::restore();
    result
}
