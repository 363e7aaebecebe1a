//! Core error types.
//!
//! Every fallible operation in the quiz engine surfaces one of these. Storage
//! backends convert their own failures into [`QuizError::Storage`] so callers
//! can tell bad input apart from a broken database without string matching.

use thiserror::Error;

/// Boxed source error carried by [`QuizError::Storage`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while composing exams or recording results.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A numeric exam parameter was out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The requested vocabulary set does not exist.
    #[error("vocabulary set not found: {0}")]
    VocabularyNotFound(String),

    /// The vocabulary set exists but could not be parsed.
    #[error("malformed vocabulary set {name}: {reason}")]
    MalformedVocabulary { name: String, reason: String },

    /// The persistence layer failed.
    #[error("storage failure: {0}")]
    Storage(#[source] BoxError),
}

impl QuizError {
    /// Wrap any error (or message) as a storage failure.
    pub fn storage(source: impl Into<BoxError>) -> Self {
        QuizError::Storage(source.into())
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        QuizError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error was caused by caller input rather than the
    /// environment, i.e. retrying the same request cannot succeed.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            QuizError::InvalidParameter { .. }
                | QuizError::VocabularyNotFound(_)
                | QuizError::MalformedVocabulary { .. }
        )
    }
}

/// Result alias used throughout the core crate.
pub type Result<T, E = QuizError> = std::result::Result<T, E>;
