//! Error types for mailsmith-surface
//!
//! This module provides error types for the editing-surface engine,
//! covering markup import, node lookups, and history restoration.

use thiserror::Error;

/// Editing-surface error type
#[derive(Debug, Error)]
pub enum Error {
    /// Markup could not be parsed into a component tree
    #[error("markup parse error: {0}")]
    MarkupParse(String),

    /// Referenced node is no longer part of the tree
    #[error("node is no longer in the tree")]
    NodeDetached,

    /// The tree root cannot be the target of this operation
    #[error("operation not valid on the tree root")]
    RootTarget,

    /// History restoration failed
    #[error("history restore error: {0}")]
    HistoryRestore(String),
}

impl Error {
    /// Create a markup parse error
    #[must_use]
    pub fn markup_parse(msg: impl Into<String>) -> Self {
        Self::MarkupParse(msg.into())
    }

    /// Get error code for host-facing messages
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MarkupParse(_) => "markup_parse_error",
            Self::NodeDetached => "node_detached",
            Self::RootTarget => "root_target",
            Self::HistoryRestore(_) => "history_restore_error",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::MarkupParse(err.to_string())
    }
}

/// Result type alias for surface operations
pub type Result<T> = std::result::Result<T, Error>;
