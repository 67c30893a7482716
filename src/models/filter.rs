use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackerFilter {
    #[default]
    All,
    Today,
    Completed,
    NotCompleted,
}

impl TrackerFilter {
    pub fn all() -> [TrackerFilter; 4] {
        [
            TrackerFilter::All,
            TrackerFilter::Today,
            TrackerFilter::Completed,
            TrackerFilter::NotCompleted,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerFilter::All => "all",
            TrackerFilter::Today => "today",
            TrackerFilter::Completed => "completed",
            TrackerFilter::NotCompleted => "not-completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TrackerFilter::All => "All trackers",
            TrackerFilter::Today => "Trackers for today",
            TrackerFilter::Completed => "Completed",
            TrackerFilter::NotCompleted => "Not completed",
        }
    }

    pub fn next(&self) -> TrackerFilter {
        match self {
            TrackerFilter::All => TrackerFilter::Today,
            TrackerFilter::Today => TrackerFilter::Completed,
            TrackerFilter::Completed => TrackerFilter::NotCompleted,
            TrackerFilter::NotCompleted => TrackerFilter::All,
        }
    }
}

impl std::fmt::Display for TrackerFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrackerFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TrackerFilter::All),
            "today" => Ok(TrackerFilter::Today),
            "completed" | "done" => Ok(TrackerFilter::Completed),
            "not-completed" | "notcompleted" | "pending" => Ok(TrackerFilter::NotCompleted),
            _ => {
                let known: Vec<&str> = TrackerFilter::all().iter().map(|f| f.as_str()).collect();
                Err(anyhow::anyhow!(
                    "Unknown filter: {} (expected one of {})",
                    s,
                    known.join(", ")
                ))
            }
        }
    }
}
