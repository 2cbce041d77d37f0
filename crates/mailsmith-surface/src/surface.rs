//! The editing surface
//!
//! This module implements the headless editing-surface engine: the
//! component tree, its two style channels, selection, structural
//! mutation, history, and export. The host never walks the tree
//! directly; it goes through the capability API here and holds only
//! node ids and derived snapshots.

use indextree::{Arena, Node, NodeId};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::events::SurfaceEvent;
use crate::markup;
use crate::node::{NodeData, StyleMap};
use crate::stylesheet::{default_value, is_inherited, Stylesheet};

/// Configuration for an editing surface
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Maximum number of history snapshots retained
    pub history_limit: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self { history_limit: 50 }
    }
}

impl SurfaceConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the history snapshot limit
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

/// One history snapshot: body-inner markup plus stylesheet text
#[derive(Debug, Clone)]
struct Snapshot {
    markup: String,
    css: String,
}

/// The headless editing surface
///
/// Owns the component tree as an externally-opaque mutable graph.
/// Each element carries two style channels: the *declared record*
/// (styles set through [`set_style`], the surface's authoritative
/// view) and the raw `style` attribute (populated by markup import
/// and only rewritten when a declared edit lands on the node).
///
/// [`set_style`]: EditingSurface::set_style
pub struct EditingSurface {
    arena: Arena<NodeData>,
    root: NodeId,
    selection: Option<NodeId>,
    declared: HashMap<NodeId, StyleMap>,
    stylesheet: Stylesheet,
    events: Vec<SurfaceEvent>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    config: SurfaceConfig,
}

impl EditingSurface {
    /// Create an empty surface
    #[must_use]
    pub fn new(config: SurfaceConfig) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::element("body"));
        Self {
            arena,
            root,
            selection: None,
            declared: HashMap::new(),
            stylesheet: Stylesheet::new(),
            events: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            config,
        }
    }

    /// Load the two channels: stylesheet text and body-inner markup
    ///
    /// Resets the tree, selection, history, and any queued events.
    ///
    /// # Errors
    /// Returns an error if the markup cannot be parsed.
    pub fn load(&mut self, css: &str, body_markup: &str) -> Result<()> {
        self.rebuild_from(body_markup)?;
        self.stylesheet.load(css);
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.events.clear();
        debug!(rules = self.stylesheet.rule_count(), "surface loaded");
        Ok(())
    }

    /// The tree root (the body wrapper)
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    // ------------------------------------------------------------------
    // Selection

    /// Set or clear the selection
    ///
    /// # Errors
    /// Returns an error if the id no longer refers to a live node.
    pub fn select(&mut self, id: Option<NodeId>) -> Result<()> {
        if let Some(id) = id {
            self.data(id)?;
        }
        self.selection = id;
        Ok(())
    }

    /// The currently selected node, if any
    #[must_use]
    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    // ------------------------------------------------------------------
    // Tree inspection

    /// Parent of a node, if attached and not the root
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.live(id).and_then(Node::parent)
    }

    /// Children of a node in order
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if self.live(id).is_none() {
            return Vec::new();
        }
        id.children(&self.arena).collect()
    }

    /// Index of a node among its parent's children
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        parent.children(&self.arena).position(|c| c == id)
    }

    /// Tag of an element node (empty for text nodes)
    ///
    /// # Errors
    /// Returns an error if the id no longer refers to a live node.
    pub fn tag(&self, id: NodeId) -> Result<String> {
        Ok(self.data(id)?.tag.clone())
    }

    /// Whether the node is a text run
    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        self.live(id).map(|n| n.get().is_text()).unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Attributes

    /// All attributes of a node in authored order
    ///
    /// # Errors
    /// Returns an error if the id no longer refers to a live node.
    pub fn get_attributes(&self, id: NodeId) -> Result<Vec<(String, String)>> {
        Ok(self.data(id)?.attributes.clone())
    }

    /// One attribute value by name
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.live(id)
            .and_then(|n| n.get().attribute(name))
            .map(String::from)
    }

    /// Set an attribute and emit a structural update
    ///
    /// # Errors
    /// Returns an error if the id no longer refers to a live node.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        self.data(id)?;
        self.push_undo();
        self.data_mut(id)?.set_attribute(name, value);
        self.emit(SurfaceEvent::ComponentUpdated);
        Ok(())
    }

    /// The raw `style` attribute string, if present
    #[must_use]
    pub fn style_attribute(&self, id: NodeId) -> Option<String> {
        self.attribute(id, "style")
    }

    // ------------------------------------------------------------------
    // Style channels

    /// Read the declared style record for a node
    #[must_use]
    pub fn declared_style(&self, id: NodeId, prop: &str) -> Option<String> {
        self.declared.get(&id)?.get(prop).map(String::from)
    }

    /// Apply one declared style and rewrite the node's style attribute
    ///
    /// # Errors
    /// Returns an error if the id no longer refers to a live node.
    pub fn set_style(&mut self, id: NodeId, prop: &str, value: &str) -> Result<()> {
        self.set_styles(id, &[(prop, value)])
    }

    /// Apply a batch of declared styles as one history step and one event
    ///
    /// An empty value removes the property.
    ///
    /// # Errors
    /// Returns an error if the id no longer refers to a live node.
    pub fn set_styles(&mut self, id: NodeId, pairs: &[(&str, &str)]) -> Result<()> {
        self.data(id)?;
        self.push_undo();
        self.apply_declared(id, pairs)?;
        self.emit(SurfaceEvent::ComponentUpdated);
        Ok(())
    }

    /// Remove a set of declared styles as one history step and one event
    ///
    /// # Errors
    /// Returns an error if the id no longer refers to a live node.
    pub fn remove_styles(&mut self, id: NodeId, props: &[&str]) -> Result<()> {
        let pairs: Vec<(&str, &str)> = props.iter().map(|p| (*p, "")).collect();
        self.set_styles(id, &pairs)
    }

    fn apply_declared(&mut self, id: NodeId, pairs: &[(&str, &str)]) -> Result<()> {
        // Seed the record from the raw attribute the first time a
        // declared edit lands on a node loaded from markup.
        let record = self.declared.entry(id).or_insert_with({
            let seed = self
                .arena
                .get(id)
                .and_then(|n| n.get().attribute("style"))
                .map(StyleMap::parse);
            move || seed.unwrap_or_default()
        });

        for (prop, value) in pairs {
            if value.is_empty() {
                record.remove(prop);
            } else {
                record.set(*prop, *value);
            }
        }

        let attr = record.to_attribute();
        let data = self.data_mut(id)?;
        if attr.is_empty() {
            data.remove_attribute("style");
        } else {
            data.set_attribute("style", &attr);
        }
        Ok(())
    }

    /// Resolved style through the surface's own rendering context
    ///
    /// Stylesheet rules first, then inherited values from ancestors
    /// for inheritable properties, then non-authored defaults. Can
    /// report a default where nothing was authored; callers that care
    /// about authorship must try the other channels first.
    #[must_use]
    pub fn computed_style(&self, id: NodeId, prop: &str) -> Option<String> {
        let node = self.live(id)?;
        let data = node.get();

        // Text runs render with their parent element's style.
        if data.is_text() {
            return self.parent(id).and_then(|p| self.computed_style(p, prop));
        }

        if let Some(value) = self.stylesheet.lookup(data, prop) {
            return Some(value);
        }

        if is_inherited(prop) {
            for ancestor in id.ancestors(&self.arena).skip(1) {
                if let Some(value) = self.declared_style(ancestor, prop) {
                    return Some(value);
                }
                let ancestor_data = self.arena.get(ancestor)?.get();
                if let Some(attr) = ancestor_data.attribute("style") {
                    if let Some(value) = StyleMap::parse(attr).get(prop) {
                        return Some(value.to_string());
                    }
                }
                if let Some(value) = self.stylesheet.lookup(ancestor_data, prop) {
                    return Some(value);
                }
            }
        }

        default_value(prop).map(String::from)
    }

    // ------------------------------------------------------------------
    // Structural mutation

    /// Create an unattached element node with styles applied
    #[must_use]
    pub fn create_element(
        &mut self,
        tag: &str,
        attributes: Vec<(String, String)>,
        styles: &[(&str, &str)],
    ) -> NodeId {
        let id = self
            .arena
            .new_node(NodeData::element(tag).with_attributes(attributes));
        if !styles.is_empty() {
            let mut record = StyleMap::new();
            for (prop, value) in styles {
                record.set(*prop, *value);
            }
            if let Some(data) = self.arena.get_mut(id) {
                data.get_mut().set_attribute("style", &record.to_attribute());
            }
            self.declared.insert(id, record);
        }
        id
    }

    /// Create an unattached text node
    #[must_use]
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.arena.new_node(NodeData::text(content))
    }

    /// Parse a markup fragment into unattached subtrees
    ///
    /// # Errors
    /// Returns an error if the markup cannot be parsed.
    pub fn import_fragment(&mut self, fragment: &str) -> Result<Vec<NodeId>> {
        markup::parse_fragment(&mut self.arena, fragment)
    }

    /// Attach a child while assembling a detached subtree
    ///
    /// No event and no history step: the subtree is not part of the
    /// tree yet. Use [`attach_append`]/[`attach_after`] to join it.
    ///
    /// [`attach_append`]: EditingSurface::attach_append
    /// [`attach_after`]: EditingSurface::attach_after
    ///
    /// # Errors
    /// Returns an error if the parent is not a live node.
    pub fn adopt(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.data(parent)?;
        parent.append(child, &mut self.arena);
        Ok(())
    }

    /// Attach nodes as the last children of a parent, in order
    ///
    /// One history step; one `ComponentAdded` event per node.
    ///
    /// # Errors
    /// Returns an error if the parent is not a live node.
    pub fn attach_append(&mut self, parent: NodeId, nodes: &[NodeId]) -> Result<()> {
        self.data(parent)?;
        self.push_undo();
        for &node in nodes {
            parent.append(node, &mut self.arena);
            self.emit(SurfaceEvent::ComponentAdded);
        }
        Ok(())
    }

    /// Attach nodes as siblings immediately after a target, in order
    ///
    /// # Errors
    /// Returns an error if the target is the root or not live.
    pub fn attach_after(&mut self, target: NodeId, nodes: &[NodeId]) -> Result<()> {
        self.data(target)?;
        if target == self.root {
            return Err(Error::RootTarget);
        }
        self.push_undo();
        let mut anchor = target;
        for &node in nodes {
            anchor.insert_after(node, &mut self.arena);
            anchor = node;
            self.emit(SurfaceEvent::ComponentAdded);
        }
        Ok(())
    }

    /// Remove the selected node's subtree
    ///
    /// Returns `false` when nothing was selected or the root was
    /// selected (the root wrapper is not deletable).
    ///
    /// # Errors
    /// Returns an error if the selection id went stale.
    pub fn remove_selected(&mut self) -> Result<bool> {
        let Some(id) = self.selection else {
            return Ok(false);
        };
        if id == self.root {
            return Ok(false);
        }
        self.data(id)?;
        self.push_undo();
        for node in id.descendants(&self.arena).collect::<Vec<_>>() {
            self.declared.remove(&node);
        }
        id.remove_subtree(&mut self.arena);
        self.selection = None;
        self.emit(SurfaceEvent::ComponentRemoved);
        Ok(true)
    }

    /// Duplicate the selected node in place and select the copy
    ///
    /// # Errors
    /// Returns an error if the selection id went stale.
    pub fn duplicate_selected(&mut self) -> Result<Option<NodeId>> {
        let Some(id) = self.selection else {
            return Ok(None);
        };
        if id == self.root {
            return Ok(None);
        }
        self.data(id)?;
        self.push_undo();
        let copy = self.clone_subtree(id)?;
        id.insert_after(copy, &mut self.arena);
        self.selection = Some(copy);
        self.emit(SurfaceEvent::ComponentCloned);
        Ok(Some(copy))
    }

    /// Move a node under a new parent at the given child index
    ///
    /// Emits `DragEnded`, the drag-and-drop completion class.
    ///
    /// # Errors
    /// Returns an error if either id is stale or the node is the root.
    pub fn move_node(&mut self, id: NodeId, new_parent: NodeId, index: usize) -> Result<()> {
        self.data(id)?;
        self.data(new_parent)?;
        if id == self.root {
            return Err(Error::RootTarget);
        }
        self.push_undo();
        id.detach(&mut self.arena);
        let siblings: Vec<NodeId> = new_parent.children(&self.arena).collect();
        if let Some(&before) = siblings.get(index) {
            before.insert_before(id, &mut self.arena);
        } else {
            new_parent.append(id, &mut self.arena);
        }
        self.emit(SurfaceEvent::DragEnded);
        Ok(())
    }

    fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId> {
        let data = self.data(id)?.clone();
        let copy = self.arena.new_node(data);
        if let Some(record) = self.declared.get(&id).cloned() {
            self.declared.insert(copy, record);
        }
        let children: Vec<NodeId> = id.children(&self.arena).collect();
        for child in children {
            let child_copy = self.clone_subtree(child)?;
            copy.append(child_copy, &mut self.arena);
        }
        Ok(copy)
    }

    // ------------------------------------------------------------------
    // Export

    /// Export the component tree as markup, body wrapper included
    #[must_use]
    pub fn export_markup(&self) -> String {
        markup::serialize(&self.arena, self.root)
    }

    /// Export the stylesheet channel as loaded
    #[must_use]
    pub fn export_styles(&self) -> String {
        self.stylesheet.raw().to_string()
    }

    // ------------------------------------------------------------------
    // Events

    /// Drain all queued structural-change events
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: SurfaceEvent) {
        self.events.push(event);
    }

    // ------------------------------------------------------------------
    // History

    /// Undo the last structural step
    ///
    /// Returns `false` when there is nothing to undo. Node ids from
    /// before the undo are invalidated; the selection is cleared.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be restored.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.undo_stack.pop() else {
            return Ok(false);
        };
        self.redo_stack.push(self.current_snapshot());
        self.restore(&snapshot)?;
        Ok(true)
    }

    /// Redo the last undone step
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be restored.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.redo_stack.pop() else {
            return Ok(false);
        };
        self.undo_stack.push(self.current_snapshot());
        self.restore(&snapshot)?;
        Ok(true)
    }

    fn current_snapshot(&self) -> Snapshot {
        Snapshot {
            markup: markup::serialize_children(&self.arena, self.root),
            css: self.stylesheet.raw().to_string(),
        }
    }

    fn push_undo(&mut self) {
        self.undo_stack.push(self.current_snapshot());
        if self.undo_stack.len() > self.config.history_limit {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        let css = snapshot.css.clone();
        self.rebuild_from(&snapshot.markup)
            .map_err(|err| Error::HistoryRestore(err.to_string()))?;
        self.stylesheet.load(&css);
        self.emit(SurfaceEvent::ComponentUpdated);
        debug!("surface history restored");
        Ok(())
    }

    /// Replace the tree from body-inner markup, without events
    fn rebuild_from(&mut self, body_markup: &str) -> Result<()> {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::element("body"));
        let roots = markup::parse_fragment(&mut arena, body_markup)?;
        for id in roots {
            root.append(id, &mut arena);
        }
        self.arena = arena;
        self.root = root;
        self.selection = None;
        self.declared.clear();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internal lookups

    fn live(&self, id: NodeId) -> Option<&Node<NodeData>> {
        self.arena.get(id).filter(|node| !node.is_removed())
    }

    fn data(&self, id: NodeId) -> Result<&NodeData> {
        self.live(id).map(Node::get).ok_or(Error::NodeDetached)
    }

    fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        match self.arena.get_mut(id) {
            Some(node) if !node.is_removed() => Ok(node.get_mut()),
            _ => Err(Error::NodeDetached),
        }
    }
}

impl Default for EditingSurface {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}
