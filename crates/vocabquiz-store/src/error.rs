//! Store error types.

use thiserror::Error;

use vocabquiz_core::error::QuizError;

/// Errors raised by the SQLite store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected a statement or could not be opened.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Preparing the database location failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored timestamp does not fit the supported range.
    #[error("stored timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}

/// Result alias for store-internal operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for QuizError {
    fn from(err: StoreError) -> Self {
        QuizError::storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_storage_failure() {
        let err: QuizError = StoreError::TimestampOutOfRange(-1).into();
        assert!(matches!(err, QuizError::Storage(_)));
        assert!(!err.is_caller_error());
        assert_eq!(
            err.to_string(),
            "storage failure: stored timestamp out of range: -1"
        );
    }
}
