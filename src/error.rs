//! Error types for the context management core
//!
//! The core is designed to degrade to safe defaults rather than fail: the
//! resolver falls back to a conservative context window, summarizer failures
//! keep the original text, and cancellation is a cooperative early exit.
//! The remaining error surface is small and limited to caller mistakes.

use thiserror::Error;

/// Result type alias for context management operations
pub type ContextResult<T> = Result<T, ContextError>;

/// Errors surfaced by the context management core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// Caller-supplied shrink options violate an invariant
    #[error("invalid shrink options: {message}")]
    InvalidOptions {
        /// What the caller got wrong
        message: String,
    },
}

impl ContextError {
    /// Create an invalid-options error
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }
}
