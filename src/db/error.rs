use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} already exists: {key}")]
    Duplicate { entity: &'static str, key: String },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("cannot complete a tracker on a future date ({0})")]
    FutureDate(NaiveDate),

    #[error("stored value could not be read: {0}")]
    Corrupt(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn duplicate(entity: &'static str, key: impl ToString) -> Self {
        StoreError::Duplicate {
            entity,
            key: key.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// True for UNIQUE / FOREIGN KEY / CHECK violations.
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
