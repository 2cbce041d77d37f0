//! Structural-change events
//!
//! This module defines the event classes the editing surface emits
//! when its component tree changes shape. The host drains these to
//! decide when to refresh its document from the surface.

use serde::{Deserialize, Serialize};

/// Structural-change event classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceEvent {
    /// A component was attached to the tree
    ComponentAdded,
    /// A component was detached from the tree
    ComponentRemoved,
    /// A component's styles or attributes changed
    ComponentUpdated,
    /// A component was duplicated in place
    ComponentCloned,
    /// A component finished a drag move to a new position
    DragEnded,
}

impl SurfaceEvent {
    /// Get the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ComponentAdded => "component_added",
            Self::ComponentRemoved => "component_removed",
            Self::ComponentUpdated => "component_updated",
            Self::ComponentCloned => "component_cloned",
            Self::DragEnded => "drag_ended",
        }
    }

    /// Check whether this event changes the shape of the tree
    ///
    /// Every event class currently does; the host treats them all as
    /// sync triggers.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::ComponentAdded
                | Self::ComponentRemoved
                | Self::ComponentUpdated
                | Self::ComponentCloned
                | Self::DragEnded
        )
    }
}

impl std::fmt::Display for SurfaceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
