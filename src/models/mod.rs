pub mod category;
pub mod color;
pub mod filter;
pub mod record;
pub mod schedule;
pub mod stats;
pub mod tracker;

pub use category::{Category, CategoryId};
pub use color::Rgb;
pub use filter::TrackerFilter;
pub use record::CompletionRecord;
pub use schedule::{Day, Schedule};
pub use stats::Statistics;
pub use tracker::{NewTracker, Tracker, TrackerId, TrackerUpdate};
