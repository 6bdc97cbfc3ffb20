//! Error types for overlay operations.
//!
//! Every failure here is local and non-fatal: the operation that produced it
//! had no effect, and the same condition has already been logged through
//! `tracing`. Callers are free to ignore these errors.

use thiserror::Error;

/// Structured error types for overlay operations.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OverlayError {
    /// A mutation was attempted on a frozen overlay
    #[error("cannot {operation} on a frozen overlay (key: {key})")]
    Frozen { operation: String, key: String },

    /// The operation does not apply to the given value
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A path did not resolve to a writable location
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl OverlayError {
    pub(crate) fn frozen(operation: &str, key: impl ToString) -> Self {
        OverlayError::Frozen {
            operation: operation.to_string(),
            key: key.to_string(),
        }
    }

    /// Check if this error reports a write against a frozen overlay
    pub fn is_frozen_error(&self) -> bool {
        matches!(self, OverlayError::Frozen { .. })
    }

    /// Check if this error reports an inapplicable argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, OverlayError::InvalidArgument { .. })
    }

    /// Check if this error is related to path resolution
    pub fn is_path_error(&self) -> bool {
        matches!(self, OverlayError::InvalidPath { .. })
    }

    /// Get the rejected operation if this is a frozen violation
    pub fn operation(&self) -> Option<&str> {
        match self {
            OverlayError::Frozen { operation, .. } => Some(operation),
            _ => None,
        }
    }

    /// Get the key if this is a frozen violation
    pub fn key(&self) -> Option<&str> {
        match self {
            OverlayError::Frozen { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Get the path if this is a path error
    pub fn path(&self) -> Option<&str> {
        match self {
            OverlayError::InvalidPath { path, .. } => Some(path),
            _ => None,
        }
    }
}

// Conversion from OverlayError to the main Error type
impl From<OverlayError> for crate::Error {
    fn from(err: OverlayError) -> Self {
        crate::Error::Overlay(err)
    }
}
