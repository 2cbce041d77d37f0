//! Block registry and insertion
//!
//! Blocks are the insertable content fragments of the editor. Each
//! has a stable id, a category, and content expressed either as
//! literal markup or as a structured node description; the structured
//! form keeps exact per-node inline styles for prebuilt multi-node
//! sections instead of round-tripping them through a markup string.
//!
//! One insertion rule covers every block kind: insert as the sibling
//! after the selected node, or append to the root when the selection
//! is the root or absent, and select what was inserted.

use mailsmith_surface::{EditingSurface, NodeId};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::variables::Variable;

/// Block catalog categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    /// Single-element basics: text, heading, image, button
    Basic,
    /// Structural pieces: divider, spacer, columns
    Layout,
    /// Prebuilt multi-node sections
    Section,
    /// Per-variable quick inserts
    Variables,
}

/// A structured node description for prebuilt content
///
/// Preserves exact per-node inline styles across nesting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Element tag
    pub tag: String,

    /// Direct text content, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Attributes in order
    #[serde(default)]
    pub attributes: Vec<(String, String)>,

    /// Inline style declarations in order
    #[serde(default)]
    pub styles: Vec<(String, String)>,

    /// Nested children
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// Create a spec for a tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: None,
            attributes: Vec::new(),
            styles: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set direct text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add an inline style declaration
    #[must_use]
    pub fn with_style(mut self, prop: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.push((prop.into(), value.into()));
        self
    }

    /// Add a child spec
    #[must_use]
    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// Block content: literal markup or a structured description
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    /// Literal markup fragment
    Markup {
        /// The fragment source
        markup: String,
    },
    /// Structured node description
    Node {
        /// The root spec
        spec: NodeSpec,
    },
}

/// A registered, insertable content fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Stable block id
    pub id: String,

    /// Display label
    pub label: String,

    /// Catalog category
    pub category: BlockCategory,

    /// Insertable content
    pub content: BlockContent,
}

impl Block {
    /// Create a markup block
    #[must_use]
    pub fn markup(
        id: impl Into<String>,
        label: impl Into<String>,
        category: BlockCategory,
        markup: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            content: BlockContent::Markup {
                markup: markup.into(),
            },
        }
    }

    /// Create a structured block
    #[must_use]
    pub fn node(
        id: impl Into<String>,
        label: impl Into<String>,
        category: BlockCategory,
        spec: NodeSpec,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            content: BlockContent::Node { spec },
        }
    }
}

/// Caller-supplied organization descriptor
///
/// Used only to gate tenant-specific blocks at registry construction;
/// once registered they behave like any other block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Organization id
    pub id: String,

    /// Display name
    pub name: String,

    /// Enabled feature flags
    #[serde(default)]
    pub features: Vec<String>,
}

impl Organization {
    /// Create an organization descriptor
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            features: Vec::new(),
        }
    }

    /// Add a feature flag
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Check a feature flag
    #[must_use]
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Feature flag gating the partner banner block
pub const PARTNER_CONTENT_FEATURE: &str = "partner_content";

/// The catalog of registered blocks for one canvas construction
pub struct BlockRegistry {
    blocks: Vec<Block>,
}

impl BlockRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Build the standard catalog for an organization
    ///
    /// Registers the base blocks, the tenant-gated partner banner
    /// when the organization's features allow it, and one quick-insert
    /// block per supplied variable.
    #[must_use]
    pub fn standard(org: &Organization, variables: &[Variable]) -> Self {
        let mut registry = Self::new();

        registry.register(Block::markup(
            "text",
            "Text",
            BlockCategory::Basic,
            "<p style=\"font-size:14px;line-height:1.6;color:#333333\">Write your message here.</p>",
        ));
        registry.register(Block::markup(
            "heading",
            "Heading",
            BlockCategory::Basic,
            "<h2 style=\"font-size:24px;font-weight:700;color:#111111\">Headline</h2>",
        ));
        registry.register(Block::markup(
            "image",
            "Image",
            BlockCategory::Basic,
            "<img src=\"https://placehold.co/600x200\" alt=\"\" style=\"width:100%;max-width:600px\"/>",
        ));
        registry.register(Block::markup(
            "button",
            "Button",
            BlockCategory::Basic,
            "<a href=\"#\" style=\"display:inline-block;padding:12px 24px;background-color:#4BBF39;color:#FFFFFF;text-decoration:none;border-top-left-radius:4px;border-top-right-radius:4px;border-bottom-left-radius:4px;border-bottom-right-radius:4px\">Call to action</a>",
        ));
        registry.register(Block::markup(
            "divider",
            "Divider",
            BlockCategory::Layout,
            "<hr style=\"border-style:solid;border-width:1px;border-color:#E0E0E0\"/>",
        ));
        registry.register(Block::markup(
            "spacer",
            "Spacer",
            BlockCategory::Layout,
            "<div style=\"height:24px\"></div>",
        ));
        registry.register(Block::markup(
            "columns",
            "Two Columns",
            BlockCategory::Layout,
            "<table style=\"width:100%\"><tbody><tr><td style=\"width:50%;padding-right:8px\">Left</td><td style=\"width:50%;padding-left:8px\">Right</td></tr></tbody></table>",
        ));
        registry.register(Block::node(
            "footer",
            "Footer",
            BlockCategory::Section,
            footer_spec(org),
        ));

        if org.has_feature(PARTNER_CONTENT_FEATURE) {
            registry.register(Block::node(
                "partner-banner",
                "Partner Banner",
                BlockCategory::Section,
                partner_banner_spec(org),
            ));
        }

        for variable in variables {
            registry.register(Block::markup(
                format!("var-{}", variable.name),
                variable
                    .description
                    .clone()
                    .unwrap_or_else(|| variable.name.clone()),
                BlockCategory::Variables,
                format!("<span>{{{{{}}}}}</span>", variable.name),
            ));
        }

        registry
    }

    /// Register one block
    pub fn register(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Look up a block by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// All registered blocks in registration order
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Insert a block's content relative to the current selection
    ///
    /// Policy, identical for every block kind:
    /// 1. selection with a parent: content becomes the sibling right
    ///    after the selected node;
    /// 2. selection is the parentless root: content is appended as
    ///    the root's last child;
    /// 3. no selection: content is appended as the root's last child.
    /// The first inserted node becomes the new selection.
    ///
    /// # Errors
    /// Returns an error for an unknown id or a failed insert.
    pub fn insert(&self, surface: &mut EditingSurface, id: &str) -> Result<NodeId> {
        let block = self
            .get(id)
            .ok_or_else(|| Error::BlockNotFound(id.to_string()))?;

        let nodes: Vec<NodeId> = match &block.content {
            BlockContent::Markup { markup } => surface.import_fragment(markup)?,
            BlockContent::Node { spec } => vec![build_spec(surface, spec)?],
        };
        if nodes.is_empty() {
            return Err(Error::BlockNotFound(format!("{id}: empty content")));
        }

        match surface.selection() {
            Some(selected) if surface.parent(selected).is_some() => {
                surface.attach_after(selected, &nodes)?;
            }
            Some(root_selected) => {
                surface.attach_append(root_selected, &nodes)?;
            }
            None => {
                surface.attach_append(surface.root(), &nodes)?;
            }
        }

        surface.select(Some(nodes[0]))?;
        Ok(nodes[0])
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a detached subtree from a spec
fn build_spec(surface: &mut EditingSurface, spec: &NodeSpec) -> Result<NodeId> {
    let styles: Vec<(&str, &str)> = spec
        .styles
        .iter()
        .map(|(p, v)| (p.as_str(), v.as_str()))
        .collect();
    let id = surface.create_element(&spec.tag, spec.attributes.clone(), &styles);

    if let Some(text) = &spec.text {
        let text_node = surface.create_text(text);
        surface.adopt(id, text_node)?;
    }
    for child in &spec.children {
        let child_id = build_spec(surface, child)?;
        surface.adopt(id, child_id)?;
    }
    Ok(id)
}

/// The prebuilt footer section, styles preserved per node
fn footer_spec(org: &Organization) -> NodeSpec {
    NodeSpec::new("table")
        .with_style("width", "100%")
        .with_style("background-color", "#F5F5F5")
        .with_child(
            NodeSpec::new("tbody").with_child(
                NodeSpec::new("tr").with_child(
                    NodeSpec::new("td")
                        .with_style("padding-top", "24px")
                        .with_style("padding-bottom", "24px")
                        .with_style("text-align", "center")
                        .with_child(
                            NodeSpec::new("p")
                                .with_text(format!("© {}. All rights reserved.", org.name))
                                .with_style("font-size", "12px")
                                .with_style("color", "#888888"),
                        )
                        .with_child(
                            NodeSpec::new("a")
                                .with_text("Unsubscribe")
                                .with_attribute("href", "{{unsubscribe_url}}")
                                .with_style("font-size", "12px")
                                .with_style("color", "#888888"),
                        ),
                ),
            ),
        )
}

/// The tenant-gated partner banner section
fn partner_banner_spec(org: &Organization) -> NodeSpec {
    NodeSpec::new("div")
        .with_style("padding-top", "16px")
        .with_style("padding-bottom", "16px")
        .with_style("background-image", "linear-gradient(135deg, #4BBF39, #2E8B57)")
        .with_style("text-align", "center")
        .with_child(
            NodeSpec::new("p")
                .with_text(format!("Offers from {} partners", org.name))
                .with_style("color", "#FFFFFF")
                .with_style("font-weight", "700"),
        )
}
