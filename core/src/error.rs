use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The addressed row does not exist (or has been soft-deleted).
    #[error("{0}")]
    NotFound(String),
    /// A stored id-list holds a token that is not an integer.
    #[error("Malformed id list: {0}")]
    InvalidInput(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Storage error: {0}")]
    Infrastructure(#[from] rusqlite::Error),
}

impl Error {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Only storage failures are worth retrying; everything else will fail the same way again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Infrastructure(_))
    }
}

/// Translate a single-row lookup failure: a missing row becomes `NotFound`, anything
/// else stays an infrastructure error.
pub(crate) fn not_found_or(err: rusqlite::Error, what: impl FnOnce() -> String) -> Error {
    match err {
        rusqlite::Error::QueryReturnedNoRows => Error::NotFound(what()),
        other => Error::Infrastructure(other),
    }
}
