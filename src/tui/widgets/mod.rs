pub mod header;
pub mod statistics;
pub mod statusbar;
pub mod trackers;
