//! Canvas host lifecycle
//!
//! The host owns the embedded editing surface across an explicit
//! three-state lifecycle: `Inactive → Active → Destroying → Inactive`.
//! Activation splits the document into its stylesheet and tree
//! channels and feeds the surface; while active, structural events
//! drained through `pump` trigger synchronizer pulls; deactivation
//! performs exactly one guarded final sync before the instance is
//! destroyed and the panel containers are cleared.

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use mailsmith_surface::{EditingSurface, NodeId, SurfaceConfig, SurfaceEvent};

use crate::blocks::{BlockRegistry, Organization};
use crate::document::EmailDocument;
use crate::error::{Error, Result};
use crate::mutate::{
    apply_background, apply_border, apply_dimensions, apply_gradient, apply_image,
    apply_opacity, apply_spacing, apply_typography, clear_background, BackgroundPanel,
    BorderPanel, DimensionsPanel, GradientPanel, ImagePanel, SpacingPanel, TypographyPanel,
};
use crate::preview::PreviewRenderer;
use crate::snapshot::SelectionSnapshot;
use crate::sync::{self, PullOutcome};
use crate::variables::Variable;

/// Host lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    /// No canvas instance exists
    Inactive,
    /// A canvas instance is live and editable
    Active,
    /// The final sync is running; edits are no longer accepted
    Destroying,
}

/// The attach point the visual tab hands to the host
///
/// The host only checks presence; rendering into it is the caller's
/// concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    /// Identifier of the container element
    pub container_id: String,
}

impl Mount {
    /// Create a mount for a container
    #[must_use]
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
        }
    }
}

/// Host configuration
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Undo history depth passed to the surface
    pub history_limit: usize,
    /// CSS class for preview substitution highlights
    pub preview_highlight_class: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            preview_highlight_class: "preview-variable".to_string(),
        }
    }
}

impl EditorConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the undo history depth
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set the preview highlight class
    #[must_use]
    pub fn with_preview_highlight_class(mut self, class: impl Into<String>) -> Self {
        self.preview_highlight_class = class.into();
        self
    }
}

/// What the host hands to `on_save`
#[derive(Debug, Clone)]
pub struct FinalState {
    /// Subject line as edited
    pub subject: String,
    /// The authoritative document
    pub document: EmailDocument,
}

type SaveCallback = Box<dyn Fn(&FinalState) + Send>;
type SimpleCallback = Box<dyn Fn() + Send>;

/// Owns the canvas instance and the document it synchronizes
pub struct CanvasHost {
    config: EditorConfig,
    state: HostState,
    organization: Organization,
    variables: Vec<Variable>,
    document: EmailDocument,
    surface: Option<EditingSurface>,
    registry: Option<BlockRegistry>,
    snapshot: Option<SelectionSnapshot>,
    panel_containers: Vec<String>,
    instance_id: Option<Uuid>,
    on_save: Option<SaveCallback>,
    on_back: Option<SimpleCallback>,
    on_reset: Option<SimpleCallback>,
}

impl CanvasHost {
    /// Create an inactive host around a document
    #[must_use]
    pub fn new(
        config: EditorConfig,
        organization: Organization,
        variables: Vec<Variable>,
        document: EmailDocument,
    ) -> Self {
        Self {
            config,
            state: HostState::Inactive,
            organization,
            variables,
            document,
            surface: None,
            registry: None,
            snapshot: None,
            panel_containers: Vec::new(),
            instance_id: None,
            on_save: None,
            on_back: None,
            on_reset: None,
        }
    }

    /// Register the save callback
    #[must_use]
    pub fn with_on_save(mut self, callback: impl Fn(&FinalState) + Send + 'static) -> Self {
        self.on_save = Some(Box::new(callback));
        self
    }

    /// Register the back callback
    #[must_use]
    pub fn with_on_back(mut self, callback: impl Fn() + Send + 'static) -> Self {
        self.on_back = Some(Box::new(callback));
        self
    }

    /// Register the optional reset callback
    #[must_use]
    pub fn with_on_reset(mut self, callback: impl Fn() + Send + 'static) -> Self {
        self.on_reset = Some(Box::new(callback));
        self
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> HostState {
        self.state
    }

    /// The authoritative document
    #[must_use]
    pub fn document(&self) -> &EmailDocument {
        &self.document
    }

    /// The current selection snapshot, if anything is selected
    #[must_use]
    pub fn snapshot(&self) -> Option<&SelectionSnapshot> {
        self.snapshot.as_ref()
    }

    /// Panel container ids registered for the live instance
    #[must_use]
    pub fn panel_containers(&self) -> &[String] {
        &self.panel_containers
    }

    /// The registered block catalog, present while active
    #[must_use]
    pub fn registry(&self) -> Option<&BlockRegistry> {
        self.registry.as_ref()
    }

    /// Replace the document wholesale; only valid while inactive
    ///
    /// # Errors
    /// Returns [`Error::Lifecycle`] while a canvas instance is live.
    pub fn replace_document(&mut self, document: EmailDocument) -> Result<()> {
        if self.state != HostState::Inactive {
            return Err(Error::lifecycle(
                "document can only be replaced while inactive",
            ));
        }
        self.document = document;
        Ok(())
    }

    /// Spin up a canvas instance in the mount
    ///
    /// A missing mount or an already-live instance is a logged no-op,
    /// not an error; re-activation must never double-register panels.
    ///
    /// # Errors
    /// Returns an error when the document's markup fails to load.
    pub fn activate(&mut self, mount: Option<&Mount>) -> Result<bool> {
        if self.state != HostState::Inactive {
            warn!(state = ?self.state, "activate ignored, canvas already live");
            return Ok(false);
        }
        let Some(mount) = mount else {
            warn!("activate ignored, mount not present");
            return Ok(false);
        };

        let mut surface = EditingSurface::new(
            SurfaceConfig::default().with_history_limit(self.config.history_limit),
        );
        if let Err(err) = sync::push(&mut surface, &self.document) {
            error!(error = %err, "canvas load failed, staying inactive");
            return Err(err);
        }

        let instance_id = Uuid::new_v4();
        self.registry = Some(BlockRegistry::standard(&self.organization, &self.variables));
        self.panel_containers = vec![
            format!("{}-blocks", mount.container_id),
            format!("{}-styles", mount.container_id),
        ];
        self.surface = Some(surface);
        self.snapshot = None;
        self.instance_id = Some(instance_id);
        self.state = HostState::Active;
        info!(%instance_id, container = %mount.container_id, "canvas activated");
        Ok(true)
    }

    /// Drain surface events and pull when anything structural happened
    ///
    /// Returns the drained events so the caller can refresh its views.
    pub fn pump(&mut self) -> Vec<SurfaceEvent> {
        let Some(surface) = self.surface.as_mut() else {
            return Vec::new();
        };
        let events = surface.take_events();
        if events.is_empty() {
            return events;
        }

        let outcome = sync::pull(surface, &mut self.document);
        debug!(count = events.len(), ?outcome, "canvas events pumped");
        self.refresh_snapshot();
        events
    }

    /// Change the selection and rebuild the snapshot
    ///
    /// # Errors
    /// Returns an error when the id is stale or the canvas inactive.
    pub fn select(&mut self, node: Option<NodeId>) -> Result<()> {
        let surface = self.surface_mut()?;
        surface.select(node)?;
        self.refresh_snapshot();
        Ok(())
    }

    /// Insert a block from the catalog, selecting the result
    ///
    /// # Errors
    /// Returns an error when the canvas is inactive or the block id is
    /// unknown.
    pub fn insert_block(&mut self, block_id: &str) -> Result<NodeId> {
        if self.state != HostState::Active {
            return Err(Error::CanvasInactive);
        }
        let registry = self.registry.take().ok_or(Error::CanvasInactive)?;
        let result = (|| {
            let surface = self.surface.as_mut().ok_or(Error::CanvasInactive)?;
            registry.insert(surface, block_id)
        })();
        self.registry = Some(registry);
        let inserted = result?;
        self.pump();
        Ok(inserted)
    }

    /// Delete the selected node; no-op when inactive or nothing is
    /// selected
    pub fn delete_selected(&mut self) -> bool {
        let Ok(surface) = self.surface_mut() else {
            return false;
        };
        match surface.remove_selected() {
            Ok(removed) => {
                if removed {
                    self.pump();
                }
                removed
            }
            Err(err) => {
                warn!(error = %err, "delete ignored");
                false
            }
        }
    }

    /// Undo one step; no-op when inactive or the stack is empty
    pub fn undo(&mut self) -> bool {
        self.history_step(EditingSurface::undo)
    }

    /// Redo one step; no-op when inactive or the stack is empty
    pub fn redo(&mut self) -> bool {
        self.history_step(EditingSurface::redo)
    }

    fn history_step(&mut self, step: fn(&mut EditingSurface) -> mailsmith_surface::Result<bool>) -> bool {
        let Ok(surface) = self.surface_mut() else {
            return false;
        };
        match step(surface) {
            Ok(stepped) => {
                if stepped {
                    self.pump();
                }
                stepped
            }
            Err(err) => {
                warn!(error = %err, "history step ignored");
                false
            }
        }
    }

    /// Apply a solid background to the selection
    ///
    /// # Errors
    /// Returns an error when the canvas is inactive or nothing is
    /// selected.
    pub fn apply_background(&mut self, panel: &BackgroundPanel) -> Result<()> {
        self.with_selection(|surface, node| apply_background(surface, node, panel))
    }

    /// Apply a gradient background to the selection
    ///
    /// # Errors
    /// See [`CanvasHost::apply_background`].
    pub fn apply_gradient(&mut self, panel: &GradientPanel) -> Result<()> {
        self.with_selection(|surface, node| apply_gradient(surface, node, panel))
    }

    /// Remove the selection's background entirely
    ///
    /// # Errors
    /// See [`CanvasHost::apply_background`].
    pub fn clear_background(&mut self) -> Result<()> {
        self.with_selection(clear_background)
    }

    /// Apply width/height to the selection
    ///
    /// # Errors
    /// See [`CanvasHost::apply_background`].
    pub fn apply_dimensions(&mut self, panel: &DimensionsPanel) -> Result<()> {
        self.with_selection(|surface, node| apply_dimensions(surface, node, panel))
    }

    /// Apply padding/margin to the selection
    ///
    /// # Errors
    /// See [`CanvasHost::apply_background`].
    pub fn apply_spacing(&mut self, panel: &SpacingPanel) -> Result<()> {
        self.with_selection(|surface, node| apply_spacing(surface, node, panel))
    }

    /// Apply border values to the selection
    ///
    /// # Errors
    /// See [`CanvasHost::apply_background`].
    pub fn apply_border(&mut self, panel: &BorderPanel) -> Result<()> {
        self.with_selection(|surface, node| apply_border(surface, node, panel))
    }

    /// Apply typography values to the selection
    ///
    /// # Errors
    /// See [`CanvasHost::apply_background`].
    pub fn apply_typography(&mut self, panel: &TypographyPanel) -> Result<()> {
        self.with_selection(|surface, node| apply_typography(surface, node, panel))
    }

    /// Apply image attributes to the selection
    ///
    /// # Errors
    /// See [`CanvasHost::apply_background`].
    pub fn apply_image(&mut self, panel: &ImagePanel) -> Result<()> {
        self.with_selection(|surface, node| apply_image(surface, node, panel))
    }

    /// Apply opacity to the selection immediately
    ///
    /// # Errors
    /// See [`CanvasHost::apply_background`].
    pub fn apply_opacity(&mut self, value: &str) -> Result<()> {
        self.with_selection(|surface, node| apply_opacity(surface, node, value))
    }

    /// Tear down the canvas instance: one guarded final sync, then
    /// destroy and clear the panel containers
    pub fn deactivate(&mut self) -> PullOutcome {
        if self.state != HostState::Active {
            warn!(state = ?self.state, "deactivate ignored, no live canvas");
            return PullOutcome::Unchanged;
        }
        self.state = HostState::Destroying;

        let outcome = match self.surface.as_ref() {
            Some(surface) => sync::pull(surface, &mut self.document),
            None => PullOutcome::Unchanged,
        };

        self.surface = None;
        self.registry = None;
        self.snapshot = None;
        self.panel_containers.clear();
        let instance_id = self.instance_id.take();
        self.state = HostState::Inactive;
        info!(instance_id = ?instance_id, ?outcome, "canvas deactivated");
        outcome
    }

    /// Render the read-only preview of the current document
    ///
    /// Works in any lifecycle state; the result is never written back.
    #[must_use]
    pub fn render_preview(&self) -> String {
        PreviewRenderer::new()
            .with_highlight_class(self.config.preview_highlight_class.clone())
            .render(&self.document, &self.variables)
    }

    /// Fire the save callback with the final state
    pub fn save(&mut self) {
        if self.state == HostState::Active {
            self.pump();
            if let Some(surface) = self.surface.as_ref() {
                sync::pull(surface, &mut self.document);
            }
        }
        if let Some(callback) = &self.on_save {
            let state = FinalState {
                subject: self.document.subject.clone(),
                document: self.document.clone(),
            };
            callback(&state);
        }
    }

    /// Fire the back callback
    pub fn back(&self) {
        if let Some(callback) = &self.on_back {
            callback();
        }
    }

    /// Fire the reset callback, when registered
    pub fn reset(&self) {
        if let Some(callback) = &self.on_reset {
            callback();
        }
    }

    fn with_selection(
        &mut self,
        apply: impl FnOnce(&mut EditingSurface, NodeId) -> Result<()>,
    ) -> Result<()> {
        let surface = self.surface_mut()?;
        let node = surface
            .selection()
            .ok_or_else(|| Error::sync("no node selected"))?;
        apply(surface, node)?;
        self.pump();
        Ok(())
    }

    fn surface_mut(&mut self) -> Result<&mut EditingSurface> {
        if self.state != HostState::Active {
            return Err(Error::CanvasInactive);
        }
        self.surface.as_mut().ok_or(Error::CanvasInactive)
    }

    fn refresh_snapshot(&mut self) {
        self.snapshot = self.surface.as_ref().and_then(|surface| {
            surface
                .selection()
                .map(|node| SelectionSnapshot::capture(surface, node))
        });
    }
}
