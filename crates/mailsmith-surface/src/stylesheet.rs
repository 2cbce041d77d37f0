//! Stylesheet channel
//!
//! This module holds the surface's stylesheet channel: the raw CSS
//! text fed in at load time, an owned rule list parsed from it, and
//! the simple selector matching used to answer resolved-style reads.
//!
//! Matching is deliberately minimal (tag, `.class`, `#id`, and
//! descendant-free selector lists): the surface only needs to answer
//! "what would this node render as" for the host's last-resort style
//! fallback, not implement the full cascade.

use regex::Regex;
use std::sync::OnceLock;

use crate::node::{NodeData, StyleMap};

/// A single owned style rule: selector list plus declarations
#[derive(Debug, Clone)]
pub struct StyleRule {
    /// Comma-separated selectors, trimmed
    pub selectors: Vec<String>,
    /// Declarations in authored order
    pub declarations: StyleMap,
}

/// The surface's stylesheet channel
#[derive(Debug, Default)]
pub struct Stylesheet {
    raw: String,
    rules: Vec<StyleRule>,
}

fn rule_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)([^{}]+)\{([^{}]*)\}").expect("valid rule regex"))
}

impl Stylesheet {
    /// Create an empty stylesheet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stylesheet contents with raw CSS text
    pub fn load(&mut self, css: &str) {
        self.raw = css.to_string();
        self.rules = rule_regex()
            .captures_iter(css)
            .filter_map(|cap| {
                let selectors: Vec<String> = cap[1]
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty() && !s.starts_with('@'))
                    .collect();
                let declarations = StyleMap::parse(&cap[2]);
                if selectors.is_empty() || declarations.is_empty() {
                    None
                } else {
                    Some(StyleRule {
                        selectors,
                        declarations,
                    })
                }
            })
            .collect();
    }

    /// The raw CSS text as loaded
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Number of parsed rules
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Look up a property for a node from matching rules
    ///
    /// Later rules win, mirroring source-order cascade for rules of
    /// equal (ignored) specificity.
    #[must_use]
    pub fn lookup(&self, node: &NodeData, prop: &str) -> Option<String> {
        let mut found = None;
        for rule in &self.rules {
            if rule.selectors.iter().any(|sel| selector_matches(sel, node)) {
                if let Some(value) = rule.declarations.get(prop) {
                    found = Some(value.to_string());
                }
            }
        }
        found
    }
}

/// Match a single simple selector against a node
fn selector_matches(selector: &str, node: &NodeData) -> bool {
    if node.is_text() {
        return false;
    }
    if let Some(class) = selector.strip_prefix('.') {
        return node
            .attribute("class")
            .map(|attr| attr.split_whitespace().any(|c| c == class))
            .unwrap_or(false);
    }
    if let Some(id) = selector.strip_prefix('#') {
        return node.attribute("id") == Some(id);
    }
    selector.eq_ignore_ascii_case(&node.tag) || selector == "*"
}

/// Whether a property inherits from ancestor elements
#[must_use]
pub fn is_inherited(prop: &str) -> bool {
    matches!(
        prop,
        "color"
            | "font-family"
            | "font-size"
            | "font-weight"
            | "font-style"
            | "line-height"
            | "text-align"
            | "letter-spacing"
    )
}

/// Non-authored default for a property, emulating what a rendering
/// context would report for an element with nothing declared
///
/// Backgrounds intentionally have no default here: reporting one
/// would mask "unset" and the host has a dedicated fallback for them.
#[must_use]
pub fn default_value(prop: &str) -> Option<&'static str> {
    match prop {
        "width" | "height" | "max-width" => Some("auto"),
        "padding-top" | "padding-right" | "padding-bottom" | "padding-left" | "margin-top"
        | "margin-right" | "margin-bottom" | "margin-left" => Some("0px"),
        "border-width" => Some("0px"),
        "border-style" => Some("none"),
        "border-color" => Some("#000000"),
        "border-top-left-radius" | "border-top-right-radius" | "border-bottom-left-radius"
        | "border-bottom-right-radius" => Some("0px"),
        "opacity" => Some("1"),
        "color" => Some("#000000"),
        "font-family" => Some("Arial, Helvetica, sans-serif"),
        "font-size" => Some("14px"),
        "font-weight" => Some("400"),
        "line-height" => Some("1.4"),
        "text-align" => Some("left"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div_with_class(class: &str) -> NodeData {
        NodeData::element("div")
            .with_attributes(vec![("class".to_string(), class.to_string())])
    }

    #[test]
    fn test_stylesheet_load_and_count() {
        let mut sheet = Stylesheet::new();
        sheet.load("p { color: red; } .hero { padding-top: 20px; font-size: 18px; }");
        assert_eq!(sheet.rule_count(), 2);
        assert!(sheet.raw().contains(".hero"));
    }

    #[test]
    fn test_tag_selector_lookup() {
        let mut sheet = Stylesheet::new();
        sheet.load("p { color: red; }");
        let node = NodeData::element("p");
        assert_eq!(sheet.lookup(&node, "color"), Some("red".to_string()));
        assert_eq!(sheet.lookup(&node, "font-size"), None);
    }

    #[test]
    fn test_class_selector_lookup() {
        let mut sheet = Stylesheet::new();
        sheet.load(".hero { background-color: #222222; }");
        let node = div_with_class("banner hero");
        assert_eq!(
            sheet.lookup(&node, "background-color"),
            Some("#222222".to_string())
        );
        assert_eq!(sheet.lookup(&div_with_class("other"), "background-color"), None);
    }

    #[test]
    fn test_id_selector_lookup() {
        let mut sheet = Stylesheet::new();
        sheet.load("#header { width: 600px; }");
        let node = NodeData::element("div")
            .with_attributes(vec![("id".to_string(), "header".to_string())]);
        assert_eq!(sheet.lookup(&node, "width"), Some("600px".to_string()));
    }

    #[test]
    fn test_later_rule_wins() {
        let mut sheet = Stylesheet::new();
        sheet.load("p { color: red; } p { color: blue; }");
        let node = NodeData::element("p");
        assert_eq!(sheet.lookup(&node, "color"), Some("blue".to_string()));
    }

    #[test]
    fn test_selector_list_splits_on_comma() {
        let mut sheet = Stylesheet::new();
        sheet.load("h1, h2 { font-weight: 700; }");
        assert_eq!(
            sheet.lookup(&NodeData::element("h2"), "font-weight"),
            Some("700".to_string())
        );
    }

    #[test]
    fn test_text_nodes_never_match() {
        let mut sheet = Stylesheet::new();
        sheet.load("* { color: red; }");
        assert_eq!(sheet.lookup(&NodeData::text("hi"), "color"), None);
    }

    #[test]
    fn test_defaults_skip_backgrounds() {
        assert_eq!(default_value("background-color"), None);
        assert_eq!(default_value("background-image"), None);
        assert_eq!(default_value("opacity"), Some("1"));
        assert_eq!(default_value("padding-left"), Some("0px"));
    }

    #[test]
    fn test_inherited_props() {
        assert!(is_inherited("font-family"));
        assert!(is_inherited("color"));
        assert!(!is_inherited("padding-top"));
        assert!(!is_inherited("background-color"));
    }
}
