//! Error types
//!
//! Only persistence can fail; the simulation itself is infallible.

use thiserror::Error;

/// High-score store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store cannot be reached (no LocalStorage, private mode, ...)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A value was found but does not parse as a score
    #[error("stored high score is corrupt: {0:?}")]
    Corrupt(String),
}
