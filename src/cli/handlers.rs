use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::board::Board;
use crate::cli::args::CategoryCommands;
use crate::config::AppConfig;
use crate::db::repository::{CategoryRepo, MetaRepo, RecordRepo, TrackerRepo};
use crate::db::{Snapshot, StoreError};
use crate::models::{
    Category, CompletionRecord, Day, NewTracker, Rgb, Schedule, Statistics, Tracker, TrackerFilter,
    TrackerId, TrackerUpdate,
};
use crate::stats;
use crate::utils::format::{format_date_label, format_day_count, pad_display, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const ACCENT: &str = "\x1b[38;2;55;114;231m";
const RESET: &str = "\x1b[0m";

fn swatch(color: Rgb) -> String {
    format!("\x1b[38;2;{};{};{}m●{}", color.r, color.g, color.b, RESET)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ─── List ────────────────────────────────────────────────────────────────────

pub fn handle_list(
    conn: &Connection,
    config: &AppConfig,
    date: Option<NaiveDate>,
    filter: Option<&str>,
    search: Option<&str>,
) -> Result<()> {
    let today = today();
    let filter = match filter {
        Some(f) => f.parse::<TrackerFilter>()?,
        None => config.display.default_filter,
    };
    let snapshot = Snapshot::load(conn)?;
    let board = Board::build(
        &snapshot,
        date.unwrap_or(today),
        today,
        filter,
        search.unwrap_or(""),
        &config.display.pinned_title,
    );

    println!();
    println_colored!(
        ACCENT,
        "  Trackers · {} ({})",
        format_date_label(board.date, today),
        filter.display_name()
    );
    println!();

    if board.is_empty() {
        if snapshot.trackers.is_empty() {
            println_colored!(DIM, "  What shall we track? Add one with `tracker add <title>`");
        } else {
            println_colored!(DIM, "  Nothing found");
        }
        println!();
        return Ok(());
    }

    for section in &board.sections {
        println_colored!(BOLD, "  {}", section.title);
        for card in &section.cards {
            let t = &card.tracker;
            let mark = if card.completed {
                format!("{}✓{}", GREEN, RESET)
            } else {
                format!("{}○{}", DIM, RESET)
            };
            println!(
                "  {} {} {} {}  {}{}  ·  #{}{}",
                mark,
                swatch(t.color),
                pad_display(&t.emoji, 2),
                pad_display(&t.title, 28),
                DIM,
                format_day_count(card.days_completed),
                t.id,
                RESET
            );
        }
        println!();
    }
    Ok(())
}

// ─── Tracker edits ───────────────────────────────────────────────────────────

pub struct AddArgs<'a> {
    pub title: &'a str,
    pub schedule: &'a str,
    pub category: Option<&'a str>,
    pub emoji: Option<&'a str>,
    pub color: Option<&'a str>,
    pub pin: bool,
}

pub fn handle_add(conn: &Connection, config: &AppConfig, args: AddArgs<'_>) -> Result<()> {
    let schedule: Schedule = args.schedule.parse().context("Parsing --schedule")?;
    let color = match args.color {
        Some(c) => c.parse().context("Parsing --color")?,
        None => config.trackers.default_color,
    };
    let category_title = args.category.unwrap_or(&config.trackers.default_category);
    let category_id = CategoryRepo::ensure(conn, category_title)?;

    let new = NewTracker {
        title: args.title.to_string(),
        color,
        emoji: args
            .emoji
            .map(str::to_string)
            .unwrap_or_else(|| config.trackers.default_emoji.clone()),
        schedule,
        is_pinned: args.pin,
    };
    let id = TrackerRepo::add(conn, &new, category_id)?;
    let tracker = TrackerRepo::get(conn, id)?;

    let kind = if tracker.is_event() { "event" } else { "habit" };
    println_colored!(
        GREEN,
        "  ✓ Added {} #{} {} {} ({}, {})",
        kind,
        tracker.id,
        tracker.emoji,
        tracker.title,
        tracker.category,
        tracker.schedule.describe()
    );
    Ok(())
}

pub struct EditArgs<'a> {
    pub title: Option<&'a str>,
    pub schedule: Option<&'a str>,
    pub category: Option<&'a str>,
    pub emoji: Option<&'a str>,
    pub color: Option<&'a str>,
}

pub fn handle_edit(conn: &Connection, id: i64, args: EditArgs<'_>) -> Result<()> {
    let category_id = match args.category {
        Some(title) => Some(
            CategoryRepo::find_by_title(conn, title)?
                .ok_or_else(|| StoreError::not_found("category", title))?
                .id,
        ),
        None => None,
    };
    let update = TrackerUpdate {
        title: args.title.map(str::to_string),
        color: args
            .color
            .map(str::parse::<Rgb>)
            .transpose()
            .context("Parsing --color")?,
        emoji: args.emoji.map(str::to_string),
        schedule: args
            .schedule
            .map(str::parse::<Schedule>)
            .transpose()
            .context("Parsing --schedule")?,
        category_id,
        is_pinned: None,
    };
    if update.is_empty() {
        return Err(anyhow!(
            "Nothing to change. Pass --title, --schedule, --category, --emoji or --color"
        ));
    }

    TrackerRepo::update(conn, TrackerId(id), &update)?;
    let tracker = TrackerRepo::get(conn, TrackerId(id))?;
    println_colored!(GREEN, "  ✓ Updated #{} {} {}", tracker.id, tracker.emoji, tracker.title);
    Ok(())
}

pub fn handle_delete(conn: &Connection, id: i64) -> Result<()> {
    let tracker = TrackerRepo::get(conn, TrackerId(id))?;
    let records = RecordRepo::count_for_tracker(conn, tracker.id)?;
    TrackerRepo::delete(conn, tracker.id)?;
    println_colored!(
        RED,
        "  ✗ Deleted #{} {} and {} of history",
        tracker.id,
        tracker.title,
        format_day_count(records)
    );
    Ok(())
}

pub fn handle_pin(conn: &Connection, id: i64) -> Result<()> {
    let pinned = TrackerRepo::toggle_pin(conn, TrackerId(id))?;
    let tracker = TrackerRepo::get(conn, TrackerId(id))?;
    if pinned {
        println_colored!(GREEN, "  ✓ Pinned {}", tracker.title);
    } else {
        println_colored!(DIM, "  ○ Unpinned {}", tracker.title);
    }
    Ok(())
}

// ─── Completion ──────────────────────────────────────────────────────────────

pub fn handle_done(conn: &Connection, id: i64, date: Option<NaiveDate>) -> Result<()> {
    let today = today();
    let date = date.unwrap_or(today);
    if date > today {
        return Err(StoreError::FutureDate(date).into());
    }
    let tracker = TrackerRepo::get(conn, TrackerId(id))?;
    if RecordRepo::add(conn, tracker.id, date)? {
        println_colored!(
            GREEN,
            "  ✓ {} done · {}",
            tracker.title,
            format_date_label(date, today)
        );
    } else {
        println_colored!(DIM, "  {} was already done on {}", tracker.title, date);
    }
    Ok(())
}

pub fn handle_undo(conn: &Connection, id: i64, date: Option<NaiveDate>) -> Result<()> {
    let today = today();
    let date = date.unwrap_or(today);
    let tracker = TrackerRepo::get(conn, TrackerId(id))?;
    if RecordRepo::delete(conn, tracker.id, date)? {
        println_colored!(
            AMBER,
            "  ○ {} unmarked · {}",
            tracker.title,
            format_date_label(date, today)
        );
    } else {
        println_colored!(DIM, "  {} was not done on {}", tracker.title, date);
    }
    Ok(())
}

pub fn handle_history(conn: &Connection, id: i64) -> Result<()> {
    let tracker = TrackerRepo::get(conn, TrackerId(id))?;
    let dates = RecordRepo::fetch_for_tracker(conn, tracker.id)?;

    println!();
    println_colored!(
        ACCENT,
        "  {} {} · {}",
        tracker.emoji,
        tracker.title,
        format_day_count(dates.len() as u32)
    );
    println_colored!(DIM, "  {} · {}", tracker.category, tracker.schedule.describe());
    println!();
    for date in &dates {
        println!("  {}  {}", date, Day::of(*date).display_name());
    }
    if !dates.is_empty() {
        println!();
    }
    Ok(())
}

// ─── Categories ──────────────────────────────────────────────────────────────

pub fn handle_category(conn: &Connection, action: &CategoryCommands) -> Result<()> {
    match action {
        CategoryCommands::List => {
            let categories = CategoryRepo::fetch_all(conn)?;
            println!();
            if categories.is_empty() {
                println_colored!(DIM, "  No categories yet");
            } else {
                println_colored!(ACCENT, "  Categories");
                println!();
                for c in &categories {
                    println!(
                        "  {}  {}{} trackers{}",
                        pad_display(&c.title, 24),
                        DIM,
                        c.tracker_count,
                        RESET
                    );
                }
            }
            println!();
        }
        CategoryCommands::Add { title } => {
            CategoryRepo::add(conn, title)?;
            println_colored!(GREEN, "  ✓ Added category: {}", title.trim());
        }
        CategoryCommands::Rename { title, new_title } => {
            CategoryRepo::rename(conn, title, new_title)?;
            println_colored!(GREEN, "  ✓ Renamed {} → {}", title, new_title.trim());
        }
        CategoryCommands::Delete { title } => {
            let count = CategoryRepo::find_by_title(conn, title)?
                .map(|c| c.tracker_count)
                .unwrap_or(0);
            CategoryRepo::delete(conn, title)?;
            println_colored!(
                RED,
                "  ✗ Deleted category {} and {} trackers",
                title,
                count
            );
        }
    }
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(conn: &Connection) -> Result<()> {
    let stats = stats::load(conn)?;
    let today = today();

    println!();
    println_colored!(ACCENT, "  Statistics");
    println!();

    if stats.is_empty() {
        println_colored!(DIM, "  Nothing to analyze yet");
        println!();
        return Ok(());
    }

    println_colored!(BOLD, "  {:>5}  Best period", stats.best_streak);
    println_colored!(BOLD, "  {:>5}  Ideal days", stats.ideal_days);
    println_colored!(BOLD, "  {:>5}  Trackers completed", stats.completed_trackers);
    println!();

    let done_today = RecordRepo::completed_ids_on(conn, today)?.len();
    println_colored!(DIM, "  {} done today", done_today);
    if let Some(first) = RecordRepo::completion_dates(conn)?.first() {
        println_colored!(DIM, "  Tracking since {}", format_date_label(*first, today));
    }
    println_colored!(
        DIM,
        "  {}  best run out of {} ideal days",
        progress_bar(stats.best_streak, stats.ideal_days, 12),
        stats.ideal_days
    );
    println!();
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Export {
    exported_on: NaiveDate,
    schema_version: Option<String>,
    trackers: Vec<Tracker>,
    categories: Vec<Category>,
    records: Vec<CompletionRecord>,
    statistics: Statistics,
}

pub fn handle_export(conn: &Connection) -> Result<()> {
    let snapshot = Snapshot::load(conn)?;
    let statistics = stats::calculate_from_records(&snapshot.trackers, &snapshot.records);
    let export = Export {
        exported_on: today(),
        schema_version: MetaRepo::get(conn, "schema_version")?,
        trackers: snapshot.trackers,
        categories: snapshot.categories,
        records: snapshot.records,
        statistics,
    };
    let json = serde_json::to_string_pretty(&export).context("Serializing export")?;
    println!("{}", json);
    Ok(())
}
