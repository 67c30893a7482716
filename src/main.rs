mod board;
mod cli;
mod config;
mod db;
mod models;
mod stats;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers::{self, AddArgs, EditArgs};
use config::AppConfig;
use db::migrations::run_migrations;
use db::repository::CategoryRepo;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;
    // Write defaults on first run so there is a file to edit
    let config_path = AppConfig::config_path()?;
    if !config_path.exists() {
        if let Err(e) = config.save() {
            log::warn!("could not write default config to {:?}: {}", config_path, e);
        }
    }

    let db_path = match cli.db {
        Some(path) => path,
        None => {
            AppConfig::ensure_data_dir()?;
            AppConfig::db_path()?
        }
    };
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;
    log::debug!("opened database at {:?}", db_path);

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;
    CategoryRepo::ensure(&conn, &config.trackers.default_category)?;

    match cli.command {
        Some(Commands::List { date, filter, search }) => {
            handlers::handle_list(&conn, &config, date, filter.as_deref(), search.as_deref())?;
        }
        Some(Commands::Add {
            title,
            schedule,
            category,
            emoji,
            color,
            pin,
        }) => {
            let args = AddArgs {
                title: &title,
                schedule: &schedule,
                category: category.as_deref(),
                emoji: emoji.as_deref(),
                color: color.as_deref(),
                pin,
            };
            handlers::handle_add(&conn, &config, args)?;
        }
        Some(Commands::Edit {
            id,
            title,
            schedule,
            category,
            emoji,
            color,
        }) => {
            let args = EditArgs {
                title: title.as_deref(),
                schedule: schedule.as_deref(),
                category: category.as_deref(),
                emoji: emoji.as_deref(),
                color: color.as_deref(),
            };
            handlers::handle_edit(&conn, id, args)?;
        }
        Some(Commands::Delete { id }) => handlers::handle_delete(&conn, id)?,
        Some(Commands::Pin { id }) => handlers::handle_pin(&conn, id)?,
        Some(Commands::Done { id, date }) => handlers::handle_done(&conn, id, date)?,
        Some(Commands::Undo { id, date }) => handlers::handle_undo(&conn, id, date)?,
        Some(Commands::History { id }) => handlers::handle_history(&conn, id)?,
        Some(Commands::Category { action }) => handlers::handle_category(&conn, &action)?,
        Some(Commands::Stats) => handlers::handle_stats(&conn)?,
        Some(Commands::Export) => handlers::handle_export(&conn)?,

        // No subcommand → launch TUI
        None => tui::app::run(conn, config)?,
    }

    Ok(())
}
