use thiserror::Error;

use crate::models::Priority;

/// Failures raised by a seat store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("storage conflict: {0}")]
    Conflict(String),
}

/// Outcome kinds of a failed reservation, as seen by callers of the allocation service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("requested {requested} seats, must be between 1 and {max}")]
    InvalidRequest { requested: i64, max: u32 },

    #[error("not enough seats available: requested {requested}, {available} free")]
    InsufficientAvailability { requested: u32, available: u32 },

    #[error("no {priority} allocation of {requested} seats could be found")]
    NoMatchingAllocation { requested: u32, priority: Priority },

    #[error("storage failure, retry later: {0}")]
    TransientStorageFailure(String),
}

impl AllocationError {
    /// Stable identifier for the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            AllocationError::InvalidRequest { .. } => "INVALID_REQUEST",
            AllocationError::InsufficientAvailability { .. } => "INSUFFICIENT_AVAILABILITY",
            AllocationError::NoMatchingAllocation { .. } => "NO_MATCHING_ALLOCATION",
            AllocationError::TransientStorageFailure(_) => "TRANSIENT_STORAGE_FAILURE",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, AllocationError::TransientStorageFailure(_))
    }
}

impl From<StoreError> for AllocationError {
    fn from(err: StoreError) -> Self {
        AllocationError::TransientStorageFailure(err.to_string())
    }
}
