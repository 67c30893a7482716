//! Ideal-day and streak statistics.
//!
//! An ideal day is a day on which every tracker scheduled for that weekday
//! was completed. Events (empty schedule) are scheduled on every day. Only
//! days that carry at least one completion record are walked: a day without
//! any record can never be ideal, so skipping it gives the same counts.

use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::{BTreeMap, HashSet};

use crate::db::{Snapshot, StoreResult};
use crate::models::{CompletionRecord, Statistics, Tracker, TrackerId};

/// Tracker ids completed per day, keyed in ascending date order.
#[derive(Debug, Clone, Default)]
pub struct CompletionIndex {
    by_date: BTreeMap<NaiveDate, HashSet<TrackerId>>,
    total: u32,
}

impl CompletionIndex {
    pub fn from_records(records: &[CompletionRecord]) -> Self {
        let mut index = CompletionIndex::default();
        for record in records {
            index.by_date.entry(record.date).or_default().insert(record.tracker_id);
            index.total += 1;
        }
        index
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.by_date.keys().copied().collect()
    }

    pub fn completed_on(&self, date: NaiveDate) -> HashSet<TrackerId> {
        self.by_date.get(&date).cloned().unwrap_or_default()
    }

    pub fn is_completed(&self, tracker_id: TrackerId, date: NaiveDate) -> bool {
        self.by_date
            .get(&date)
            .is_some_and(|ids| ids.contains(&tracker_id))
    }

    pub fn days_completed(&self, tracker_id: TrackerId) -> u32 {
        self.by_date
            .values()
            .filter(|ids| ids.contains(&tracker_id))
            .count() as u32
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

fn is_ideal_day(trackers: &[Tracker], date: NaiveDate, completed: &HashSet<TrackerId>) -> bool {
    let mut scheduled = trackers.iter().filter(|t| t.is_scheduled_on(date)).peekable();
    if scheduled.peek().is_none() {
        return false;
    }
    scheduled.all(|t| completed.contains(&t.id))
}

/// Single pass over `completion_dates`, which must be ascending and distinct.
pub fn calculate<F>(
    trackers: &[Tracker],
    completion_dates: &[NaiveDate],
    total_records: u32,
    completed_on: F,
) -> Statistics
where
    F: Fn(NaiveDate) -> HashSet<TrackerId>,
{
    let mut stats = Statistics {
        completed_trackers: total_records,
        ..Statistics::default()
    };
    let mut run = 0u32;
    let mut last_ideal: Option<NaiveDate> = None;

    for &date in completion_dates {
        if !is_ideal_day(trackers, date, &completed_on(date)) {
            run = 0;
            last_ideal = None;
            continue;
        }

        stats.ideal_days += 1;
        run = match last_ideal {
            Some(prev) if prev.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        stats.best_streak = stats.best_streak.max(run);
        last_ideal = Some(date);
    }

    stats
}

pub fn calculate_from_records(trackers: &[Tracker], records: &[CompletionRecord]) -> Statistics {
    let index = CompletionIndex::from_records(records);
    calculate(trackers, &index.dates(), index.total(), |date| index.completed_on(date))
}

/// Pulls a fresh snapshot and computes statistics over it.
pub fn load(conn: &Connection) -> StoreResult<Statistics> {
    let snapshot = Snapshot::load(conn)?;
    Ok(calculate_from_records(&snapshot.trackers, &snapshot.records))
}
