pub mod error;
pub mod migrations;
pub mod repository;
pub mod snapshot;

pub use error::{StoreError, StoreResult};
pub use snapshot::Snapshot;
