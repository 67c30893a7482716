use rusqlite::Connection;
use serde::Serialize;

use crate::db::error::StoreResult;
use crate::db::repository::{CategoryRepo, RecordRepo, TrackerRepo};
use crate::models::{Category, CompletionRecord, Tracker};

/// Everything in the store, read in one pull. Callers re-load after each
/// mutation instead of patching a cached copy.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub trackers: Vec<Tracker>,
    pub categories: Vec<Category>,
    pub records: Vec<CompletionRecord>,
}

impl Snapshot {
    pub fn load(conn: &Connection) -> StoreResult<Self> {
        let tx = conn.unchecked_transaction()?;
        let snapshot = Snapshot {
            trackers: TrackerRepo::fetch_all(&tx)?,
            categories: CategoryRepo::fetch_all(&tx)?,
            records: RecordRepo::fetch_all(&tx)?,
        };
        tx.commit()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{NewTracker, Rgb, Schedule};
    use chrono::NaiveDate;

    #[test]
    fn empty_store_gives_empty_snapshot() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let snapshot = Snapshot::load(&conn).unwrap();
        assert!(snapshot.trackers.is_empty());
        assert!(snapshot.categories.is_empty());
        assert!(snapshot.records.is_empty());
    }

    #[test]
    fn snapshot_survives_reopening_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.db");
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        {
            let conn = Connection::open(&path).unwrap();
            run_migrations(&conn).unwrap();
            let cat = CategoryRepo::add(&conn, "Health").unwrap();
            let new = NewTracker {
                title: "Stretch".to_string(),
                color: Rgb::new(1, 2, 3),
                emoji: "🧘".to_string(),
                schedule: Schedule::daily(),
                is_pinned: true,
            };
            let id = TrackerRepo::add(&conn, &new, cat).unwrap();
            RecordRepo::add(&conn, id, day).unwrap();
        }

        let conn = Connection::open(&path).unwrap();
        run_migrations(&conn).unwrap();
        let snapshot = Snapshot::load(&conn).unwrap();
        assert_eq!(snapshot.trackers.len(), 1);
        assert!(snapshot.trackers[0].is_pinned);
        assert_eq!(snapshot.categories[0].tracker_count, 1);
        assert_eq!(snapshot.records[0].date, day);
    }
}
