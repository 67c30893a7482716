use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Every completion record counts once
    pub completed_trackers: u32,
    pub ideal_days: u32,
    pub best_streak: u32,
}

impl Statistics {
    pub fn is_empty(&self) -> bool {
        self.completed_trackers == 0
    }
}
