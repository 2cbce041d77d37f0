//! Collaborator service boundaries
//!
//! External capabilities the editor consumes as opaque
//! request/response pairs: asset upload, the image library, and the
//! template gallery. All failures cross the boundary as `anyhow`
//! errors and are mapped into user-visible notifications; no call is
//! retried automatically, and each action carries an in-flight guard
//! so it cannot be triggered twice concurrently.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{Error, Result};

/// An image stored in the caller's asset library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryImage {
    /// Public URL of the image
    pub url: String,
    /// Display name
    pub name: String,
}

/// A template offered by the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryTemplate {
    /// Template name
    pub name: String,
    /// Gallery category
    pub category: String,
    /// Full template HTML
    pub html: String,
}

/// Severity of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Operation completed
    Success,
    /// Operation failed; the message says what to do next
    Error,
}

/// A user-visible notification raised by a service action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity
    pub kind: NotificationKind,
    /// Actionable message
    pub message: String,
}

impl Notification {
    /// A success notification
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    /// An error notification
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Uploads image bytes and returns a public URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadService: Send + Sync {
    /// Upload an asset, returning its public URL
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: String,
        content_type: String,
    ) -> anyhow::Result<String>;
}

/// Lists previously uploaded images for a project
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageLibrary: Send + Sync {
    /// List the project's images
    async fn list(&self, project_id: String) -> anyhow::Result<Vec<LibraryImage>>;
}

/// Lists gallery templates available for import
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateGallery: Send + Sync {
    /// List available templates
    async fn list(&self) -> anyhow::Result<Vec<GalleryTemplate>>;
}

/// Per-action in-flight guard
///
/// Holds whether an action is currently running so its triggering
/// control can be disabled; entering while already in flight is an
/// error rather than a queue.
#[derive(Debug, Default)]
pub struct InFlightGuard {
    active: bool,
}

impl InFlightGuard {
    /// Create an idle guard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the action is currently running
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the action as running
    ///
    /// # Errors
    /// Returns [`Error::InFlight`] when it already is.
    pub fn enter(&mut self) -> Result<()> {
        if self.active {
            return Err(Error::InFlight);
        }
        self.active = true;
        Ok(())
    }

    /// Mark the action as finished, success or failure alike
    pub fn exit(&mut self) {
        self.active = false;
    }
}

/// Run an upload through the guard, mapping the outcome to a
/// notification
///
/// The pending local state (the picked file, the typed alt text) is
/// the caller's to keep; a failure here leaves it intact for retry.
pub async fn guarded_upload(
    guard: &mut InFlightGuard,
    service: &dyn UploadService,
    bytes: Vec<u8>,
    filename: String,
    content_type: String,
) -> (Option<String>, Notification) {
    if let Err(err) = guard.enter() {
        return (
            None,
            Notification::error(format!("Upload already in progress ({})", err.code())),
        );
    }

    let outcome = service.upload(bytes, filename.clone(), content_type).await;
    guard.exit();

    match outcome {
        Ok(url) => {
            info!(%filename, %url, "asset uploaded");
            (Some(url), Notification::success("Image uploaded"))
        }
        Err(err) => {
            error!(%filename, error = %err, "asset upload failed");
            (
                None,
                Notification::error("Upload failed. Check your connection and try again."),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_rejects_reentry() {
        let mut guard = InFlightGuard::new();
        guard.enter().unwrap();
        assert!(guard.is_active());
        assert!(matches!(guard.enter(), Err(Error::InFlight)));
        guard.exit();
        assert!(guard.enter().is_ok());
    }

    #[tokio::test]
    async fn test_guarded_upload_success() {
        let mut service = MockUploadService::new();
        service
            .expect_upload()
            .returning(|_, _, _| Ok("https://cdn.example.com/a.png".to_string()));

        let mut guard = InFlightGuard::new();
        let (url, note) = guarded_upload(
            &mut guard,
            &service,
            vec![1, 2, 3],
            "a.png".to_string(),
            "image/png".to_string(),
        )
        .await;

        assert_eq!(url.as_deref(), Some("https://cdn.example.com/a.png"));
        assert_eq!(note.kind, NotificationKind::Success);
        assert!(!guard.is_active());
    }

    #[tokio::test]
    async fn test_guarded_upload_failure_releases_guard() {
        let mut service = MockUploadService::new();
        service
            .expect_upload()
            .returning(|_, _, _| Err(anyhow::anyhow!("network down")));

        let mut guard = InFlightGuard::new();
        let (url, note) = guarded_upload(
            &mut guard,
            &service,
            vec![],
            "a.png".to_string(),
            "image/png".to_string(),
        )
        .await;

        assert_eq!(url, None);
        assert_eq!(note.kind, NotificationKind::Error);
        assert!(note.message.contains("try again"));
        assert!(!guard.is_active());
    }

    #[tokio::test]
    async fn test_image_library_mock_lists() {
        let mut library = MockImageLibrary::new();
        library.expect_list().returning(|_| {
            Ok(vec![LibraryImage {
                url: "https://cdn.example.com/a.png".to_string(),
                name: "a.png".to_string(),
            }])
        });

        let images = library.list("project-1".to_string()).await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].name, "a.png");
    }
}
