//! Markup import and export
//!
//! Import parses an HTML fragment with html5ever and walks the
//! resulting RcDom into arena nodes; export is the inverse recursive
//! serializer. Comments and doctypes are dropped on import, as is
//! whitespace-only text between tags.

use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use indextree::{Arena, NodeId};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::error::{Error, Result};
use crate::node::{NodeData, NodeKind};

/// Tags serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Parse an HTML fragment into unattached arena subtrees
///
/// Returns the ids of the fragment's top-level nodes in document
/// order; the caller decides where to attach them.
///
/// # Errors
/// Returns an error if the markup cannot be read by the parser.
pub fn parse_fragment(arena: &mut Arena<NodeData>, markup: &str) -> Result<Vec<NodeId>> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };

    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut markup.as_bytes())?;

    let body = find_body(&dom.document)
        .ok_or_else(|| Error::markup_parse("parser produced no body element"))?;

    let mut roots = Vec::new();
    for child in body.children.borrow().iter() {
        if let Some(id) = convert(child, arena) {
            roots.push(id);
        }
    }
    Ok(roots)
}

/// Locate the body element the parser always synthesizes
fn find_body(document: &Handle) -> Option<Handle> {
    for child in document.children.borrow().iter() {
        if let RcNodeData::Element { name, .. } = &child.data {
            if name.local.as_ref() == "html" {
                for inner in child.children.borrow().iter() {
                    if let RcNodeData::Element { name, .. } = &inner.data {
                        if name.local.as_ref() == "body" {
                            return Some(inner.clone());
                        }
                    }
                }
            }
        }
    }
    None
}

/// Convert one RcDom node (and its subtree) into the arena
fn convert(handle: &Handle, arena: &mut Arena<NodeData>) -> Option<NodeId> {
    match &handle.data {
        RcNodeData::Element { name, attrs, .. } => {
            let tag = name.local.to_string();
            let attributes: Vec<(String, String)> = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();

            let id = arena.new_node(NodeData::element(tag).with_attributes(attributes));
            for child in handle.children.borrow().iter() {
                if let Some(child_id) = convert(child, arena) {
                    id.append(child_id, arena);
                }
            }
            Some(id)
        }
        RcNodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if text.trim().is_empty() {
                None
            } else {
                Some(arena.new_node(NodeData::text(text)))
            }
        }
        // Comments, doctypes, processing instructions
        _ => None,
    }
}

/// Serialize a node and its subtree to markup
#[must_use]
pub fn serialize(arena: &Arena<NodeData>, id: NodeId) -> String {
    let mut out = String::new();
    write_node(arena, id, &mut out);
    out
}

/// Serialize only the children of a node, in order
#[must_use]
pub fn serialize_children(arena: &Arena<NodeData>, id: NodeId) -> String {
    let mut out = String::new();
    for child in id.children(arena) {
        write_node(arena, child, &mut out);
    }
    out
}

fn write_node(arena: &Arena<NodeData>, id: NodeId, out: &mut String) {
    let Some(node) = arena.get(id) else {
        return;
    };
    let data = node.get();

    match data.kind {
        NodeKind::Text => out.push_str(&escape_text(&data.text)),
        NodeKind::Element => {
            out.push('<');
            out.push_str(&data.tag);
            for (name, value) in &data.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
            if VOID_ELEMENTS.contains(&data.tag.as_str()) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in id.children(arena) {
                write_node(arena, child, out);
            }
            out.push_str("</");
            out.push_str(&data.tag);
            out.push('>');
        }
    }
}

/// Escape text content
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value
fn escape_attribute(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_element() {
        let mut arena = Arena::new();
        let roots = parse_fragment(&mut arena, "<p style=\"color:red\">Hello</p>").unwrap();
        assert_eq!(roots.len(), 1);

        let data = arena[roots[0]].get();
        assert_eq!(data.tag, "p");
        assert_eq!(data.attribute("style"), Some("color:red"));

        let child = roots[0].children(&arena).next().unwrap();
        assert_eq!(arena[child].get().text, "Hello");
    }

    #[test]
    fn test_parse_multiple_top_level_nodes() {
        let mut arena = Arena::new();
        let roots = parse_fragment(&mut arena, "<h1>A</h1><p>B</p>").unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(arena[roots[0]].get().tag, "h1");
        assert_eq!(arena[roots[1]].get().tag, "p");
    }

    #[test]
    fn test_parse_drops_comments_and_blank_text() {
        let mut arena = Arena::new();
        let roots = parse_fragment(&mut arena, "<!-- note -->\n  <div>x</div>\n").unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(arena[roots[0]].get().tag, "div");
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut arena = Arena::new();
        let markup = "<div style=\"padding-top:10px\"><p>Hi</p><img src=\"a.png\" alt=\"a\"/></div>";
        let roots = parse_fragment(&mut arena, markup).unwrap();
        assert_eq!(serialize(&arena, roots[0]), markup);
    }

    #[test]
    fn test_serialize_escapes_text_and_attributes() {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::element("p").with_attributes(vec![(
            "title".to_string(),
            "a \"b\"".to_string(),
        )]));
        let text = arena.new_node(NodeData::text("1 < 2 & 3"));
        root.append(text, &mut arena);

        let out = serialize(&arena, root);
        assert_eq!(out, "<p title=\"a &quot;b&quot;\">1 &lt; 2 &amp; 3</p>");
    }

    #[test]
    fn test_serialize_children_only() {
        let mut arena = Arena::new();
        let roots = parse_fragment(&mut arena, "<div><p>A</p><p>B</p></div>").unwrap();
        assert_eq!(serialize_children(&arena, roots[0]), "<p>A</p><p>B</p>");
    }

    #[test]
    fn test_nested_structure_preserved() {
        let mut arena = Arena::new();
        let markup = "<table><tbody><tr><td>Cell</td></tr></tbody></table>";
        let roots = parse_fragment(&mut arena, markup).unwrap();
        assert_eq!(serialize(&arena, roots[0]), markup);
    }
}
