//! Error types for the salescope crate.
//!
//! Callers need to tell apart bad input (fixable by the user) from store or
//! network failures (not fixable by the user), so the two are distinct
//! variants rather than a single opaque error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The caller supplied input that cannot be used, e.g. a month outside
    /// 1-12 or a zero page size. Never retried; the message says what to fix.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The record store failed (connectivity, I/O, constraint violations).
    #[error("record store failure: {0}")]
    Store(#[from] sqlx::Error),

    /// A stored record could not be decoded back into a `SaleRecord`.
    #[error("corrupt record in store: {0}")]
    Corrupt(String),

    /// Downloading the seed dataset failed.
    #[error("seed fetch failure: {0}")]
    Fetch(#[from] reqwest::Error),
}

impl Error {
    /// Creates a `Validation` error from anything string-like.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// True for errors the caller can fix by correcting their input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
