use anyhow::Result;
use rusqlite::Connection;

use crate::db::repository::MetaRepo;

pub const SCHEMA_VERSION: &str = "1";

/// Per-connection settings. Foreign keys are off by default in SQLite.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(())
}

pub fn run_migrations(conn: &Connection) -> Result<()> {
    configure(conn)?;

    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS categories (
            id     INTEGER PRIMARY KEY AUTOINCREMENT,
            title  TEXT NOT NULL UNIQUE CHECK(length(title) > 0)
        );

        CREATE TABLE IF NOT EXISTS trackers (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            title        TEXT NOT NULL CHECK(length(title) > 0),
            color        TEXT NOT NULL,
            emoji        TEXT NOT NULL,
            schedule     TEXT NOT NULL DEFAULT '',
            category_id  INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            is_pinned    INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_trackers_category ON trackers(category_id);

        CREATE TABLE IF NOT EXISTS records (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            tracker_id  INTEGER NOT NULL REFERENCES trackers(id) ON DELETE CASCADE,
            date        TEXT NOT NULL,
            UNIQUE(tracker_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_records_date ON records(date);

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;

    MetaRepo::set(conn, "schema_version", SCHEMA_VERSION)?;
    log::info!("database schema at version {}", SCHEMA_VERSION);
    Ok(())
}
