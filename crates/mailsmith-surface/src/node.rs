//! Component node data
//!
//! This module defines the per-node payload of the component tree:
//! tag, kind, ordered attributes, and the ordered inline-style
//! declaration map.

use serde::{Deserialize, Serialize};

/// Kind of a component node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// An element with a tag, attributes, and children
    Element,
    /// A text run
    Text,
}

/// An ordered property → value map for CSS declarations
///
/// Declaration order is preserved so exported markup round-trips the
/// way it was authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleMap {
    declarations: Vec<(String, String)>,
}

impl StyleMap {
    /// Create an empty style map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw `style` attribute value into a style map
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut map = Self::new();
        for decl in raw.split(';') {
            if let Some((prop, value)) = decl.split_once(':') {
                let prop = prop.trim();
                let value = value.trim();
                if !prop.is_empty() && !value.is_empty() {
                    map.set(prop, value);
                }
            }
        }
        map
    }

    /// Get a declaration value by property name
    #[must_use]
    pub fn get(&self, prop: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(prop))
            .map(|(_, v)| v.as_str())
    }

    /// Set a declaration, replacing any previous value in place
    pub fn set(&mut self, prop: impl Into<String>, value: impl Into<String>) {
        let prop = prop.into();
        let value = value.into();
        if let Some(entry) = self
            .declarations
            .iter_mut()
            .find(|(p, _)| p.eq_ignore_ascii_case(&prop))
        {
            entry.1 = value;
        } else {
            self.declarations.push((prop, value));
        }
    }

    /// Remove a declaration by property name
    pub fn remove(&mut self, prop: &str) -> Option<String> {
        let pos = self
            .declarations
            .iter()
            .position(|(p, _)| p.eq_ignore_ascii_case(prop))?;
        Some(self.declarations.remove(pos).1)
    }

    /// Iterate declarations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Number of declarations
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the map holds no declarations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialize back into a `style` attribute value
    #[must_use]
    pub fn to_attribute(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{p}:{v}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Payload of a component-tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    /// Node kind
    pub kind: NodeKind,

    /// Element tag name, lower-cased (empty for text nodes)
    pub tag: String,

    /// Text content (text nodes only)
    pub text: String,

    /// Ordered attribute list as authored
    pub attributes: Vec<(String, String)>,
}

impl NodeData {
    /// Create an element node payload
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element,
            tag: tag.into().to_ascii_lowercase(),
            text: String::new(),
            attributes: Vec::new(),
        }
    }

    /// Create a text node payload
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            tag: String::new(),
            text: content.into(),
            attributes: Vec::new(),
        }
    }

    /// Attach attributes, returning self
    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<(String, String)>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Get an attribute value by name
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any previous value in place
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self
            .attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            entry.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Remove an attribute by name
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self
            .attributes
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(pos).1)
    }

    /// Whether this is a text node
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_map_parse() {
        let map = StyleMap::parse("color: red; padding-top: 10px;");
        assert_eq!(map.get("color"), Some("red"));
        assert_eq!(map.get("padding-top"), Some("10px"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_style_map_parse_skips_malformed() {
        let map = StyleMap::parse("color: red; oops; : nothing; width:");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("color"), Some("red"));
    }

    #[test]
    fn test_style_map_set_replaces_in_place() {
        let mut map = StyleMap::parse("color:red;width:10px");
        map.set("color", "blue");
        assert_eq!(map.to_attribute(), "color:blue;width:10px");
    }

    #[test]
    fn test_style_map_remove() {
        let mut map = StyleMap::parse("color:red;width:10px");
        assert_eq!(map.remove("color"), Some("red".to_string()));
        assert_eq!(map.get("color"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_style_map_case_insensitive_props() {
        let map = StyleMap::parse("Background-Color: #fff");
        assert_eq!(map.get("background-color"), Some("#fff"));
    }

    #[test]
    fn test_node_data_element() {
        let node = NodeData::element("DIV");
        assert_eq!(node.tag, "div");
        assert_eq!(node.kind, NodeKind::Element);
        assert!(!node.is_text());
    }

    #[test]
    fn test_node_data_attributes() {
        let mut node = NodeData::element("img")
            .with_attributes(vec![("src".to_string(), "a.png".to_string())]);
        assert_eq!(node.attribute("src"), Some("a.png"));

        node.set_attribute("src", "b.png");
        node.set_attribute("alt", "photo");
        assert_eq!(node.attribute("src"), Some("b.png"));
        assert_eq!(node.attribute("alt"), Some("photo"));

        assert_eq!(node.remove_attribute("alt"), Some("photo".to_string()));
        assert_eq!(node.attribute("alt"), None);
    }

    #[test]
    fn test_node_data_text() {
        let node = NodeData::text("Hello");
        assert!(node.is_text());
        assert_eq!(node.text, "Hello");
    }
}
