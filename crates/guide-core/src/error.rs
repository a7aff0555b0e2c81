//! Error types for the guide.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The caller handed the pipeline something it cannot treat as a question.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A mutation would break a store invariant (malformed record or
    /// conflicting immutable field).
    #[error("Store invariant violation for record '{id}': {reason}")]
    StoreInvariantViolation { id: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invariant(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StoreInvariantViolation {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
