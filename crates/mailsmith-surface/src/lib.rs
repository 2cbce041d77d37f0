//! Mailsmith Surface - Headless Editing Surface
//!
//! This crate provides the embedded editing surface for the Mailsmith
//! visual email editor:
//! - Surface: the component-tree engine and its capability API
//! - Node: node payloads and the ordered inline-style map
//! - Markup: fragment import (html5ever) and export
//! - Stylesheet: the stylesheet channel and resolved-style lookups
//! - Events: structural-change event classes
//! - Error: error types for surface operations
//!
//! The surface renders nowhere: it models the isolated editing
//! context the host synchronizes against. The host holds node ids
//! and derived snapshots, never the tree itself.
//!
//! ## Usage
//!
//! ```
//! use mailsmith_surface::{EditingSurface, SurfaceConfig};
//!
//! let mut surface = EditingSurface::new(SurfaceConfig::default());
//! surface.load("p { color: #333; }", "<p>Hello</p>").unwrap();
//!
//! let p = surface.children(surface.root())[0];
//! surface.select(Some(p)).unwrap();
//! surface.set_style(p, "font-size", "16px").unwrap();
//!
//! assert!(surface.export_markup().contains("font-size:16px"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod markup;
pub mod node;
pub mod stylesheet;
pub mod surface;

// Re-export main types
pub use error::{Error, Result};
pub use events::SurfaceEvent;
pub use node::{NodeData, NodeKind, StyleMap};
pub use stylesheet::{StyleRule, Stylesheet};
pub use surface::{EditingSurface, SurfaceConfig};

/// Opaque handle to a node in the surface's component tree
pub type NodeId = indextree::NodeId;
