//! The crate's error type.

use thiserror::Error;

/// Errors that stop training or prediction outright.
///
/// Ordinary uncertainty is never an error: theories abstain per prediction instead. Only failures
/// that leave no sound answer to fall back on are reported here.
#[derive(Debug, Error)]
pub enum Error {
    /// An external enrichment transform could not produce a value.
    #[error("enrichment `{transform}` failed: {message}")]
    Enrichment {
        /// Name of the failing transform.
        transform: String,
        /// What went wrong, as reported by the transform.
        message: String,
    },

    /// A [`Config`](crate::Config) value that no ensemble can run with.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration text that is not valid JSON for a [`Config`](crate::Config).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
