use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CategoryId, Day, Rgb, Schedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackerId(pub i64);

impl std::fmt::Display for TrackerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: TrackerId,
    pub title: String,
    pub color: Rgb,
    pub emoji: String,
    pub schedule: Schedule,
    pub category_id: CategoryId,
    /// Display title of the category, joined on `category_id`
    pub category: String,
    pub is_pinned: bool,
}

impl Tracker {
    pub fn is_event(&self) -> bool {
        self.schedule.is_event()
    }

    /// Counts toward the ideal-day check on `date`. Events are always eligible.
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.schedule.is_event() || self.schedule.contains(Day::of(date))
    }

    /// Shown on the board for `date`. Events only show up on the current day.
    pub fn is_visible_on(&self, date: NaiveDate, today: NaiveDate) -> bool {
        if self.schedule.is_event() {
            date == today
        } else {
            self.schedule.contains(Day::of(date))
        }
    }
}

/// Fields for a tracker that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewTracker {
    pub title: String,
    pub color: Rgb,
    pub emoji: String,
    pub schedule: Schedule,
    pub is_pinned: bool,
}

/// Partial edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TrackerUpdate {
    pub title: Option<String>,
    pub color: Option<Rgb>,
    pub emoji: Option<String>,
    pub schedule: Option<Schedule>,
    pub category_id: Option<CategoryId>,
    pub is_pinned: Option<bool>,
}

impl TrackerUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.color.is_none()
            && self.emoji.is_none()
            && self.schedule.is_none()
            && self.category_id.is_none()
            && self.is_pinned.is_none()
    }
}
