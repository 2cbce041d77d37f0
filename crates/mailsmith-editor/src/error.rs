//! Error types for mailsmith-editor
//!
//! This module provides error types for the synchronization core,
//! covering canvas lifecycle, synchronization, block insertion, and
//! collaborator-service failures.

use thiserror::Error;

/// Editor error type
#[derive(Debug, Error)]
pub enum Error {
    /// Canvas lifecycle error (construction, load, destroy)
    #[error("canvas lifecycle error: {0}")]
    Lifecycle(String),

    /// Synchronization error (export or recombine failed)
    #[error("synchronization error: {0}")]
    Sync(String),

    /// Block not found in the registry
    #[error("block not found: {0}")]
    BlockNotFound(String),

    /// No canvas instance is live
    #[error("canvas is not active")]
    CanvasInactive,

    /// Underlying editing-surface error
    #[error("surface error: {0}")]
    Surface(#[from] mailsmith_surface::Error),

    /// Upload failed
    #[error("upload failed: {0}")]
    Upload(String),

    /// Collaborator service call failed
    #[error("service error: {0}")]
    Service(String),

    /// Another request for this action is already in flight
    #[error("action already in flight")]
    InFlight,
}

impl Error {
    /// Create a lifecycle error
    #[must_use]
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Create a synchronization error
    #[must_use]
    pub fn sync(msg: impl Into<String>) -> Self {
        Self::Sync(msg.into())
    }

    /// Create an upload error
    #[must_use]
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Create a service error
    #[must_use]
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Check if the user can simply retry the action
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Upload(_) | Self::Service(_) | Self::InFlight)
    }

    /// Get error code for host-facing messages
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Lifecycle(_) => "canvas_lifecycle_error",
            Self::Sync(_) => "sync_error",
            Self::BlockNotFound(_) => "block_not_found",
            Self::CanvasInactive => "canvas_inactive",
            Self::Surface(_) => "surface_error",
            Self::Upload(_) => "upload_error",
            Self::Service(_) => "service_error",
            Self::InFlight => "in_flight",
        }
    }
}

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::lifecycle("boom").code(), "canvas_lifecycle_error");
        assert_eq!(Error::BlockNotFound("hero".into()).code(), "block_not_found");
        assert_eq!(Error::InFlight.code(), "in_flight");
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::upload("network down").is_recoverable());
        assert!(Error::InFlight.is_recoverable());
        assert!(!Error::CanvasInactive.is_recoverable());
        assert!(!Error::sync("export failed").is_recoverable());
    }

    #[test]
    fn test_from_surface_error() {
        let err: Error = mailsmith_surface::Error::NodeDetached.into();
        assert_eq!(err.code(), "surface_error");
    }
}
