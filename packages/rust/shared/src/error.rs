//! Error types for QROS.
//!
//! Library crates use [`QrosError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;
use std::time::Duration;

/// Top-level error type for all QROS operations.
#[derive(Debug, thiserror::Error)]
pub enum QrosError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The grounding document collection cannot be enumerated.
    #[error("document collection unavailable at {path:?}: {source}")]
    DocumentCollectionUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// User input rejected before any work is done.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Transport failure talking to the completion service.
    #[error("network error: {0}")]
    Network(String),

    /// The completion service answered, but not with something usable.
    #[error("completion error: {0}")]
    Completion(String),

    /// Model output did not match the expected structure.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The completion call did not finish in time.
    #[error("completion timed out after {after:?}")]
    Timeout { after: Duration },

    /// The caller cancelled the completion call.
    #[error("completion cancelled")]
    Cancelled,
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QrosError>;

impl QrosError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Mark a collection root as unreadable.
    pub fn collection_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DocumentCollectionUnavailable {
            path: path.into(),
            source,
        }
    }

    /// True for errors the caller may treat as "answer without grounding".
    pub fn is_collection_unavailable(&self) -> bool {
        matches!(self, Self::DocumentCollectionUnavailable { .. })
    }
}
