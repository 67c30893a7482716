use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

use crate::db::error::{is_constraint_violation, StoreError, StoreResult};
use crate::models::{
    Category, CategoryId, CompletionRecord, NewTracker, Rgb, Schedule, Tracker, TrackerId,
    TrackerUpdate,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(s: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| StoreError::Corrupt(format!("bad date '{}': {}", s, e)))
}

fn require_text(field: &'static str, value: &str) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Invalid {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// One user-perceived character. ZWJ sequences and flags count as one.
fn require_glyph(field: &'static str, value: &str) -> StoreResult<String> {
    let glyph = require_text(field, value)?;
    if glyph.graphemes(true).count() != 1 {
        return Err(StoreError::Invalid {
            field,
            reason: format!("'{}' is not a single glyph", glyph),
        });
    }
    Ok(glyph)
}

// ─── Tracker repo ────────────────────────────────────────────────────────────

const TRACKER_SELECT: &str = "
    SELECT t.id, t.title, t.color, t.emoji, t.schedule, t.category_id, c.title, t.is_pinned
    FROM trackers t JOIN categories c ON c.id = t.category_id";

type TrackerRow = (i64, String, String, String, String, i64, String, i32);

fn read_tracker_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TrackerRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn tracker_from_row(raw: TrackerRow) -> StoreResult<Tracker> {
    let (id, title, color, emoji, schedule, category_id, category, is_pinned) = raw;
    let color: Rgb = color
        .parse()
        .map_err(|e: anyhow::Error| StoreError::Corrupt(format!("tracker {}: {}", id, e)))?;
    Ok(Tracker {
        id: TrackerId(id),
        title,
        color,
        emoji,
        schedule: Schedule::decode(&schedule),
        category_id: CategoryId(category_id),
        category,
        is_pinned: is_pinned != 0,
    })
}

pub struct TrackerRepo;

impl TrackerRepo {
    pub fn fetch_all(conn: &Connection) -> StoreResult<Vec<Tracker>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY c.title, t.id", TRACKER_SELECT))?;
        let rows = stmt
            .query_map([], read_tracker_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(tracker_from_row).collect()
    }

    pub fn find(conn: &Connection, id: TrackerId) -> StoreResult<Option<Tracker>> {
        let row = conn
            .query_row(
                &format!("{} WHERE t.id = ?1", TRACKER_SELECT),
                params![id.0],
                read_tracker_row,
            )
            .optional()?;
        row.map(tracker_from_row).transpose()
    }

    pub fn get(conn: &Connection, id: TrackerId) -> StoreResult<Tracker> {
        Self::find(conn, id)?.ok_or_else(|| StoreError::not_found("tracker", id))
    }

    pub fn exists(conn: &Connection, id: TrackerId) -> StoreResult<bool> {
        let found: Option<i64> = conn
            .query_row("SELECT id FROM trackers WHERE id = ?1", params![id.0], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    pub fn add(
        conn: &Connection,
        tracker: &NewTracker,
        category_id: CategoryId,
    ) -> StoreResult<TrackerId> {
        let title = require_text("title", &tracker.title)?;
        let emoji = require_glyph("emoji", &tracker.emoji)?;
        if !CategoryRepo::exists(conn, category_id)? {
            return Err(StoreError::not_found("category", category_id.0));
        }

        conn.execute(
            "INSERT INTO trackers (title, color, emoji, schedule, category_id, is_pinned)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                title,
                tracker.color.to_hex(),
                emoji,
                tracker.schedule.encode(),
                category_id.0,
                tracker.is_pinned as i32,
            ],
        )?;
        let id = TrackerId(conn.last_insert_rowid());
        log::debug!("added tracker {} '{}' to category {}", id, title, category_id.0);
        Ok(id)
    }

    pub fn update(conn: &Connection, id: TrackerId, update: &TrackerUpdate) -> StoreResult<()> {
        let current = Self::get(conn, id)?;
        if update.is_empty() {
            return Ok(());
        }

        let title = match &update.title {
            Some(t) => require_text("title", t)?,
            None => current.title,
        };
        let emoji = match &update.emoji {
            Some(e) => require_glyph("emoji", e)?,
            None => current.emoji,
        };
        let category_id = update.category_id.unwrap_or(current.category_id);
        if !CategoryRepo::exists(conn, category_id)? {
            return Err(StoreError::not_found("category", category_id.0));
        }
        let color = update.color.unwrap_or(current.color);
        let schedule = update.schedule.as_ref().unwrap_or(&current.schedule);
        let is_pinned = update.is_pinned.unwrap_or(current.is_pinned);

        conn.execute(
            "UPDATE trackers
             SET title = ?1, color = ?2, emoji = ?3, schedule = ?4, category_id = ?5, is_pinned = ?6
             WHERE id = ?7",
            params![
                title,
                color.to_hex(),
                emoji,
                schedule.encode(),
                category_id.0,
                is_pinned as i32,
                id.0,
            ],
        )?;
        log::debug!("updated tracker {}", id);
        Ok(())
    }

    /// Removes the tracker and, through the foreign key, its records.
    pub fn delete(conn: &Connection, id: TrackerId) -> StoreResult<()> {
        let removed = conn.execute("DELETE FROM trackers WHERE id = ?1", params![id.0])?;
        if removed == 0 {
            return Err(StoreError::not_found("tracker", id));
        }
        log::debug!("deleted tracker {}", id);
        Ok(())
    }

    /// Flips the pinned flag and returns the new state.
    pub fn toggle_pin(conn: &Connection, id: TrackerId) -> StoreResult<bool> {
        let changed = conn.execute(
            "UPDATE trackers SET is_pinned = 1 - is_pinned WHERE id = ?1",
            params![id.0],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("tracker", id));
        }
        let pinned: i32 = conn.query_row(
            "SELECT is_pinned FROM trackers WHERE id = ?1",
            params![id.0],
            |row| row.get(0),
        )?;
        log::debug!("tracker {} pinned = {}", id, pinned != 0);
        Ok(pinned != 0)
    }
}

// ─── Category repo ───────────────────────────────────────────────────────────

pub struct CategoryRepo;

impl CategoryRepo {
    pub fn fetch_all(conn: &Connection) -> StoreResult<Vec<Category>> {
        let mut stmt = conn.prepare(
            "SELECT c.id, c.title, COUNT(t.id)
             FROM categories c LEFT JOIN trackers t ON t.category_id = c.id
             GROUP BY c.id
             ORDER BY c.title",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: CategoryId(row.get(0)?),
                title: row.get(1)?,
                tracker_count: row.get::<_, i64>(2)? as u32,
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::from)
    }

    pub fn find_by_title(conn: &Connection, title: &str) -> StoreResult<Option<Category>> {
        Ok(Self::fetch_all(conn)?
            .into_iter()
            .find(|c| c.title == title.trim()))
    }

    pub fn exists(conn: &Connection, id: CategoryId) -> StoreResult<bool> {
        let found: Option<i64> = conn
            .query_row("SELECT id FROM categories WHERE id = ?1", params![id.0], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    pub fn add(conn: &Connection, title: &str) -> StoreResult<CategoryId> {
        let title = require_text("category title", title)?;
        match conn.execute("INSERT INTO categories (title) VALUES (?1)", params![title]) {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => {
                return Err(StoreError::duplicate("category", title));
            }
            Err(e) => return Err(e.into()),
        }
        let id = CategoryId(conn.last_insert_rowid());
        log::debug!("added category {} '{}'", id.0, title);
        Ok(id)
    }

    /// Renames in place; trackers keep pointing at the same id.
    pub fn rename(conn: &Connection, title: &str, new_title: &str) -> StoreResult<()> {
        let category = Self::find_by_title(conn, title)?
            .ok_or_else(|| StoreError::not_found("category", title))?;
        let new_title = require_text("category title", new_title)?;
        if new_title == category.title {
            return Ok(());
        }

        match conn.execute(
            "UPDATE categories SET title = ?1 WHERE id = ?2",
            params![new_title, category.id.0],
        ) {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => {
                return Err(StoreError::duplicate("category", new_title));
            }
            Err(e) => return Err(e.into()),
        }
        log::debug!("renamed category '{}' to '{}'", category.title, new_title);
        Ok(())
    }

    /// Deleting a category deletes its trackers and their records.
    pub fn delete(conn: &Connection, title: &str) -> StoreResult<()> {
        let category = Self::find_by_title(conn, title)?
            .ok_or_else(|| StoreError::not_found("category", title))?;
        conn.execute("DELETE FROM categories WHERE id = ?1", params![category.id.0])?;
        log::debug!(
            "deleted category '{}' with {} trackers",
            category.title,
            category.tracker_count
        );
        Ok(())
    }

    pub fn ensure(conn: &Connection, title: &str) -> StoreResult<CategoryId> {
        match Self::find_by_title(conn, title)? {
            Some(c) => Ok(c.id),
            None => Self::add(conn, title),
        }
    }
}

// ─── Record repo ─────────────────────────────────────────────────────────────

pub struct RecordRepo;

impl RecordRepo {
    /// Dates the tracker was completed on, newest first.
    pub fn fetch_for_tracker(conn: &Connection, tracker_id: TrackerId) -> StoreResult<Vec<NaiveDate>> {
        let mut stmt =
            conn.prepare("SELECT date FROM records WHERE tracker_id = ?1 ORDER BY date DESC")?;
        let dates: Vec<String> = stmt
            .query_map(params![tracker_id.0], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        dates.iter().map(|d| parse_date(d)).collect()
    }

    pub fn fetch_all(conn: &Connection) -> StoreResult<Vec<CompletionRecord>> {
        let mut stmt =
            conn.prepare("SELECT tracker_id, date FROM records ORDER BY date, tracker_id")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(tracker_id, date)| {
                Ok(CompletionRecord {
                    tracker_id: TrackerId(tracker_id),
                    date: parse_date(&date)?,
                })
            })
            .collect()
    }

    /// Returns false when the record already existed.
    pub fn add(conn: &Connection, tracker_id: TrackerId, date: NaiveDate) -> StoreResult<bool> {
        if !TrackerRepo::exists(conn, tracker_id)? {
            return Err(StoreError::not_found("tracker", tracker_id));
        }
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO records (tracker_id, date) VALUES (?1, ?2)",
            params![tracker_id.0, format_date(date)],
        )?;
        if inserted > 0 {
            log::debug!("tracker {} completed on {}", tracker_id, date);
        }
        Ok(inserted > 0)
    }

    /// Returns false when there was nothing to remove.
    pub fn delete(conn: &Connection, tracker_id: TrackerId, date: NaiveDate) -> StoreResult<bool> {
        let removed = conn.execute(
            "DELETE FROM records WHERE tracker_id = ?1 AND date = ?2",
            params![tracker_id.0, format_date(date)],
        )?;
        if removed > 0 {
            log::debug!("tracker {} no longer completed on {}", tracker_id, date);
        }
        Ok(removed > 0)
    }

    /// Marks done if not done on `date`, undoes it otherwise. Returns the new state.
    pub fn toggle(
        conn: &Connection,
        tracker_id: TrackerId,
        date: NaiveDate,
        today: NaiveDate,
    ) -> StoreResult<bool> {
        if date > today {
            log::warn!("refusing to toggle tracker {} on future date {}", tracker_id, date);
            return Err(StoreError::FutureDate(date));
        }
        if Self::is_completed(conn, tracker_id, date)? {
            Self::delete(conn, tracker_id, date)?;
            Ok(false)
        } else {
            Self::add(conn, tracker_id, date)?;
            Ok(true)
        }
    }

    pub fn is_completed(conn: &Connection, tracker_id: TrackerId, date: NaiveDate) -> StoreResult<bool> {
        let found: Option<i64> = conn
            .query_row(
                "SELECT id FROM records WHERE tracker_id = ?1 AND date = ?2",
                params![tracker_id.0, format_date(date)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn completed_ids_on(conn: &Connection, date: NaiveDate) -> StoreResult<HashSet<TrackerId>> {
        let mut stmt = conn.prepare("SELECT tracker_id FROM records WHERE date = ?1")?;
        let ids = stmt
            .query_map(params![format_date(date)], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids.into_iter().map(TrackerId).collect())
    }

    /// Distinct days with at least one record, ascending.
    pub fn completion_dates(conn: &Connection) -> StoreResult<Vec<NaiveDate>> {
        let mut stmt = conn.prepare("SELECT DISTINCT date FROM records ORDER BY date")?;
        let dates: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        dates.iter().map(|d| parse_date(d)).collect()
    }

    pub fn count(conn: &Connection) -> StoreResult<u32> {
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(n as u32)
    }

    pub fn count_for_tracker(conn: &Connection, tracker_id: TrackerId) -> StoreResult<u32> {
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE tracker_id = ?1",
            params![tracker_id.0],
            |row| row.get(0),
        )?;
        Ok(n as u32)
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> StoreResult<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(StoreError::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> StoreResult<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::Day;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn habit(title: &str) -> NewTracker {
        NewTracker {
            title: title.to_string(),
            color: Rgb::new(51, 207, 105),
            emoji: "🏃".to_string(),
            schedule: Schedule::of([Day::Monday, Day::Thursday]),
            is_pinned: false,
        }
    }

    #[test]
    fn add_and_fetch_tracker() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let id = TrackerRepo::add(&conn, &habit("  Run  "), home).unwrap();

        let t = TrackerRepo::get(&conn, id).unwrap();
        assert_eq!(t.title, "Run");
        assert_eq!(t.color, Rgb::new(51, 207, 105));
        assert_eq!(t.schedule, Schedule::of([Day::Monday, Day::Thursday]));
        assert_eq!(t.category, "Home");
        assert!(!t.is_pinned);

        assert_eq!(TrackerRepo::fetch_all(&conn).unwrap(), vec![t]);
    }

    #[test]
    fn add_tracker_to_missing_category_is_not_found() {
        let conn = setup();
        let err = TrackerRepo::add(&conn, &habit("Run"), CategoryId(99)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "category", .. }));
        assert!(TrackerRepo::fetch_all(&conn).unwrap().is_empty());
    }

    #[test]
    fn empty_title_is_rejected() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let err = TrackerRepo::add(&conn, &habit("   "), home).unwrap_err();
        assert!(matches!(err, StoreError::Invalid { field: "title", .. }));
    }

    #[test]
    fn emoji_must_be_a_single_glyph() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();

        let mut wordy = habit("Run");
        wordy.emoji = "not an emoji at all".to_string();
        let err = TrackerRepo::add(&conn, &wordy, home).unwrap_err();
        assert!(matches!(err, StoreError::Invalid { field: "emoji", .. }));

        let mut pair = habit("Run");
        pair.emoji = "🏃🏃".to_string();
        assert!(TrackerRepo::add(&conn, &pair, home).is_err());
        assert!(TrackerRepo::fetch_all(&conn).unwrap().is_empty());

        for glyph in ["👨\u{200D}👩\u{200D}👧", "🇯🇵", "❤️"] {
            let mut ok = habit("Family");
            ok.emoji = glyph.to_string();
            let id = TrackerRepo::add(&conn, &ok, home).unwrap();
            assert_eq!(TrackerRepo::get(&conn, id).unwrap().emoji, glyph);
        }
    }

    #[test]
    fn update_rejects_multi_glyph_emoji() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let id = TrackerRepo::add(&conn, &habit("Run"), home).unwrap();

        let update = TrackerUpdate {
            emoji: Some("ab".to_string()),
            ..Default::default()
        };
        let err = TrackerRepo::update(&conn, id, &update).unwrap_err();
        assert!(matches!(err, StoreError::Invalid { field: "emoji", .. }));
        assert_eq!(TrackerRepo::get(&conn, id).unwrap().emoji, "🏃");
    }

    #[test]
    fn trackers_are_ordered_by_category_title() {
        let conn = setup();
        let work = CategoryRepo::add(&conn, "Work").unwrap();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        TrackerRepo::add(&conn, &habit("Standup"), work).unwrap();
        TrackerRepo::add(&conn, &habit("Dishes"), home).unwrap();

        let titles: Vec<_> = TrackerRepo::fetch_all(&conn)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Dishes", "Standup"]);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let work = CategoryRepo::add(&conn, "Work").unwrap();
        let id = TrackerRepo::add(&conn, &habit("Run"), home).unwrap();

        let update = TrackerUpdate {
            title: Some("Run 5k".to_string()),
            schedule: Some(Schedule::event()),
            category_id: Some(work),
            ..Default::default()
        };
        TrackerRepo::update(&conn, id, &update).unwrap();

        let t = TrackerRepo::get(&conn, id).unwrap();
        assert_eq!(t.title, "Run 5k");
        assert!(t.is_event());
        assert_eq!(t.category, "Work");
        assert_eq!(t.emoji, "🏃");
        assert_eq!(t.color, Rgb::new(51, 207, 105));
    }

    #[test]
    fn update_errors() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let id = TrackerRepo::add(&conn, &habit("Run"), home).unwrap();

        let missing = TrackerRepo::update(&conn, TrackerId(404), &TrackerUpdate::default());
        assert!(matches!(missing, Err(StoreError::NotFound { entity: "tracker", .. })));

        let bad_category = TrackerUpdate {
            category_id: Some(CategoryId(404)),
            ..Default::default()
        };
        let err = TrackerRepo::update(&conn, id, &bad_category).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "category", .. }));
        assert_eq!(TrackerRepo::get(&conn, id).unwrap().category, "Home");
    }

    #[test]
    fn toggle_pin_flips_state() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let id = TrackerRepo::add(&conn, &habit("Run"), home).unwrap();

        assert!(TrackerRepo::toggle_pin(&conn, id).unwrap());
        assert!(TrackerRepo::get(&conn, id).unwrap().is_pinned);
        assert!(!TrackerRepo::toggle_pin(&conn, id).unwrap());
        assert!(matches!(
            TrackerRepo::toggle_pin(&conn, TrackerId(7)),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_tracker_cascades_to_records() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let id = TrackerRepo::add(&conn, &habit("Run"), home).unwrap();
        RecordRepo::add(&conn, id, date("2024-03-01")).unwrap();

        TrackerRepo::delete(&conn, id).unwrap();
        assert_eq!(RecordRepo::count(&conn).unwrap(), 0);
        assert!(matches!(
            TrackerRepo::delete(&conn, id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn category_titles_are_unique() {
        let conn = setup();
        CategoryRepo::add(&conn, "Home").unwrap();
        let err = CategoryRepo::add(&conn, "Home").unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { entity: "category", .. }));
    }

    #[test]
    fn rename_category_keeps_trackers_attached() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        CategoryRepo::add(&conn, "Work").unwrap();
        let id = TrackerRepo::add(&conn, &habit("Dishes"), home).unwrap();

        CategoryRepo::rename(&conn, "Home", "Chores").unwrap();
        let t = TrackerRepo::get(&conn, id).unwrap();
        assert_eq!(t.category, "Chores");
        assert_eq!(t.category_id, home);

        assert!(matches!(
            CategoryRepo::rename(&conn, "Chores", "Work"),
            Err(StoreError::Duplicate { .. })
        ));
        assert!(matches!(
            CategoryRepo::rename(&conn, "Home", "Anything"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_category_removes_its_trackers() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let work = CategoryRepo::add(&conn, "Work").unwrap();
        let dishes = TrackerRepo::add(&conn, &habit("Dishes"), home).unwrap();
        TrackerRepo::add(&conn, &habit("Standup"), work).unwrap();
        RecordRepo::add(&conn, dishes, date("2024-03-01")).unwrap();

        CategoryRepo::delete(&conn, "Home").unwrap();

        let remaining = TrackerRepo::fetch_all(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Standup");
        assert_eq!(RecordRepo::count(&conn).unwrap(), 0);
        assert!(matches!(
            CategoryRepo::delete(&conn, "Home"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn categories_report_tracker_counts() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        CategoryRepo::add(&conn, "Empty").unwrap();
        TrackerRepo::add(&conn, &habit("Dishes"), home).unwrap();
        TrackerRepo::add(&conn, &habit("Laundry"), home).unwrap();

        let categories = CategoryRepo::fetch_all(&conn).unwrap();
        let counts: Vec<_> = categories
            .iter()
            .map(|c| (c.title.as_str(), c.tracker_count))
            .collect();
        assert_eq!(counts, vec![("Empty", 0), ("Home", 2)]);
    }

    #[test]
    fn ensure_category_is_idempotent() {
        let conn = setup();
        let a = CategoryRepo::ensure(&conn, "General").unwrap();
        let b = CategoryRepo::ensure(&conn, "General").unwrap();
        assert_eq!(a, b);
        assert_eq!(CategoryRepo::fetch_all(&conn).unwrap().len(), 1);
    }

    #[test]
    fn records_are_unique_per_day() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let id = TrackerRepo::add(&conn, &habit("Run"), home).unwrap();

        assert!(RecordRepo::add(&conn, id, date("2024-03-01")).unwrap());
        assert!(!RecordRepo::add(&conn, id, date("2024-03-01")).unwrap());
        assert!(RecordRepo::add(&conn, id, date("2024-03-03")).unwrap());

        assert_eq!(RecordRepo::count(&conn).unwrap(), 2);
        assert_eq!(RecordRepo::count_for_tracker(&conn, id).unwrap(), 2);
        assert_eq!(
            RecordRepo::fetch_for_tracker(&conn, id).unwrap(),
            vec![date("2024-03-03"), date("2024-03-01")]
        );
    }

    #[test]
    fn record_for_unknown_tracker_is_not_found() {
        let conn = setup();
        let err = RecordRepo::add(&conn, TrackerId(3), date("2024-03-01")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "tracker", .. }));
    }

    #[test]
    fn delete_record_reports_whether_it_existed() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let id = TrackerRepo::add(&conn, &habit("Run"), home).unwrap();
        RecordRepo::add(&conn, id, date("2024-03-01")).unwrap();

        assert!(RecordRepo::delete(&conn, id, date("2024-03-01")).unwrap());
        assert!(!RecordRepo::delete(&conn, id, date("2024-03-01")).unwrap());
        assert!(!RecordRepo::is_completed(&conn, id, date("2024-03-01")).unwrap());
    }

    #[test]
    fn completed_ids_and_dates() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let a = TrackerRepo::add(&conn, &habit("A"), home).unwrap();
        let b = TrackerRepo::add(&conn, &habit("B"), home).unwrap();
        RecordRepo::add(&conn, a, date("2024-03-02")).unwrap();
        RecordRepo::add(&conn, b, date("2024-03-02")).unwrap();
        RecordRepo::add(&conn, a, date("2024-03-01")).unwrap();

        let ids = RecordRepo::completed_ids_on(&conn, date("2024-03-02")).unwrap();
        assert_eq!(ids, HashSet::from([a, b]));
        assert!(RecordRepo::completed_ids_on(&conn, date("2024-03-05")).unwrap().is_empty());
        assert_eq!(
            RecordRepo::completion_dates(&conn).unwrap(),
            vec![date("2024-03-01"), date("2024-03-02")]
        );
        assert_eq!(RecordRepo::fetch_all(&conn).unwrap().len(), 3);
    }

    #[test]
    fn toggle_refuses_future_dates() {
        let conn = setup();
        let home = CategoryRepo::add(&conn, "Home").unwrap();
        let id = TrackerRepo::add(&conn, &habit("Run"), home).unwrap();
        let today = date("2024-03-05");

        assert!(RecordRepo::toggle(&conn, id, today, today).unwrap());
        assert!(!RecordRepo::toggle(&conn, id, today, today).unwrap());
        assert!(RecordRepo::toggle(&conn, id, date("2024-03-01"), today).unwrap());

        let err = RecordRepo::toggle(&conn, id, date("2024-03-06"), today).unwrap_err();
        assert!(matches!(err, StoreError::FutureDate(_)));
        assert_eq!(RecordRepo::count(&conn).unwrap(), 1);
    }

    #[test]
    fn meta_roundtrip() {
        let conn = setup();
        assert_eq!(MetaRepo::get(&conn, "missing").unwrap(), None);
        MetaRepo::set(&conn, "k", "v1").unwrap();
        MetaRepo::set(&conn, "k", "v2").unwrap();
        assert_eq!(MetaRepo::get(&conn, "k").unwrap().as_deref(), Some("v2"));
    }
}
