use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::TrackerId;

/// "This tracker was done on this day." One per (tracker, date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub tracker_id: TrackerId,
    pub date: NaiveDate,
}
