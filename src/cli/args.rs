use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tracker", version, about = "Track habits and one-off events, day by day")]
pub struct Cli {
    /// Use this database file instead of the one in the data directory
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show trackers due on a date, grouped by category
    List {
        /// Date to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// all, today, completed or not-completed
        #[arg(long)]
        filter: Option<String>,
        /// Only trackers whose title contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a habit or a one-off event
    Add {
        /// Tracker title
        title: String,
        /// daily, weekdays, weekends, event, or a list like mon,wed,fri
        #[arg(long, default_value = "daily")]
        schedule: String,
        /// Category title (created if missing)
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        emoji: Option<String>,
        /// Hex color, e.g. #33CF69
        #[arg(long)]
        color: Option<String>,
        /// Pin the tracker to the top of the board
        #[arg(long)]
        pin: bool,
    },
    /// Change fields of an existing tracker
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        schedule: Option<String>,
        /// Category title (must exist)
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        emoji: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a tracker and its history
    Delete { id: i64 },
    /// Pin or unpin a tracker
    Pin { id: i64 },
    /// Mark a tracker as done
    Done {
        id: i64,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Undo a completion
    Undo {
        id: i64,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show every day a tracker was completed
    History { id: i64 },
    /// Category management
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Show completion statistics
    Stats,
    /// Dump all trackers, categories, records and statistics as JSON
    Export,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories with their tracker counts
    List,
    /// Create a category
    Add { title: String },
    /// Rename a category
    Rename { title: String, new_title: String },
    /// Delete a category along with its trackers
    Delete { title: String },
}
