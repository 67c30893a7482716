pub mod calculator;

pub use calculator::{calculate, calculate_from_records, load, CompletionIndex};
