pub mod builder;

pub use builder::{Board, Section, TrackerCard};
