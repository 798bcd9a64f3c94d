//! Error types for taskdeck.

/// Errors that can occur while mutating or persisting the task collection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred while touching the storage file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required form field was left empty.
    #[error("missing required field: {0}")]
    EmptyField(&'static str),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
