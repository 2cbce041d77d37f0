//! Mailsmith Editor - Visual Email Editor Core
//!
//! This crate provides the host-side core of the Mailsmith visual
//! email editor:
//! - Document: the authoritative `{html, css}` pair and its
//!   split/recombine rules
//! - Host: the canvas lifecycle (activate, pump, deactivate) around
//!   the embedded editing surface
//! - Sync: the guarded one-directional canvas → document refresh
//! - Blocks: the insertable block catalog and its insertion policy
//! - Snapshot: selection-driven style resolution for the panels
//! - Mutate: batched panel-section style application
//! - Preview: variable substitution for the read-only preview
//! - Services: async collaborator boundaries (upload, image library,
//!   template gallery)
//!
//! Persistence, rendering, and UI chrome stay with the caller; this
//! crate owns only the synchronization semantics between the single
//! authoritative document and the live canvas.
//!
//! ## Usage
//!
//! ```
//! use mailsmith_editor::{
//!     CanvasHost, EditorConfig, EmailDocument, Mount, Organization, Variable,
//! };
//!
//! let document = EmailDocument::from_combined(
//!     "Welcome",
//!     "<style>p { color: #333; }</style><body><p>Hi {{first_name}}!</p></body>",
//! );
//! let mut host = CanvasHost::new(
//!     EditorConfig::default(),
//!     Organization::new("org-1", "Acme Studios"),
//!     vec![Variable::new("first_name")],
//!     document,
//! );
//!
//! host.activate(Some(&Mount::new("canvas"))).unwrap();
//! host.insert_block("heading").unwrap();
//! assert!(host.document().html.contains("<h2"));
//! host.deactivate();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod blocks;
pub mod color;
pub mod document;
pub mod error;
pub mod host;
pub mod mutate;
pub mod preview;
pub mod resolve;
pub mod services;
pub mod snapshot;
pub mod sync;
pub mod variables;

// Re-export main types
pub use blocks::{Block, BlockCategory, BlockContent, BlockRegistry, NodeSpec, Organization};
pub use color::normalize_hex;
pub use document::EmailDocument;
pub use error::{Error, Result};
pub use host::{CanvasHost, EditorConfig, FinalState, HostState, Mount};
pub use mutate::{
    BackgroundPanel, BorderPanel, DimensionsPanel, GradientPanel, ImagePanel, SpacingPanel,
    TypographyPanel,
};
pub use preview::PreviewRenderer;
pub use services::{
    GalleryTemplate, ImageLibrary, InFlightGuard, LibraryImage, Notification, NotificationKind,
    TemplateGallery, UploadService,
};
pub use snapshot::{Background, PanelSection, SelectionCategory, SelectionSnapshot};
pub use sync::PullOutcome;
pub use variables::Variable;
