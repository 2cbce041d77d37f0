//! Selection style resolution
//!
//! Reading "what is this node's effective value for a property" has
//! to work across several representations the editing surface keeps:
//! its own declared style record, the node's raw inline attribute,
//! and the resolved style of its rendering context. Each source is a
//! resolver function with one shared signature; resolution tries them
//! in strict priority order and stops at the first hit.
//!
//! Backgrounds get one extra, last-resort step: a raw-string scan for
//! a `linear-gradient(...)` substring or a shorthand `background`
//! declaration, covering values authored as shorthand rather than
//! split longhand.

use mailsmith_surface::{EditingSurface, NodeId, StyleMap};

/// A single style source probe
pub type Resolver = fn(&EditingSurface, NodeId, &str) -> Option<String>;

/// The priority-ordered resolution chain
///
/// 1. the surface's declared style record;
/// 2. the raw inline `style` attribute, parsed directly;
/// 3. the resolved style of the surface's own rendering context,
///    last because it can mask "unset" as a non-authored default.
pub const CHAIN: &[Resolver] = &[resolve_declared, resolve_inline, resolve_computed];

/// Resolve a property through the chain
#[must_use]
pub fn resolve(surface: &EditingSurface, node: NodeId, prop: &str) -> Option<String> {
    CHAIN
        .iter()
        .find_map(|resolver| resolver(surface, node, prop))
}

/// Resolve through the authored channels only
///
/// Declared record, then raw inline attribute; never the rendering
/// context. Callers use this when a non-authored default would get in
/// the way, like expanding a box shorthand the user actually wrote.
#[must_use]
pub fn resolve_authored(surface: &EditingSurface, node: NodeId, prop: &str) -> Option<String> {
    resolve_declared(surface, node, prop).or_else(|| resolve_inline(surface, node, prop))
}

fn resolve_declared(surface: &EditingSurface, node: NodeId, prop: &str) -> Option<String> {
    surface.declared_style(node, prop)
}

fn resolve_inline(surface: &EditingSurface, node: NodeId, prop: &str) -> Option<String> {
    let attr = surface.style_attribute(node)?;
    StyleMap::parse(&attr).get(prop).map(String::from)
}

fn resolve_computed(surface: &EditingSurface, node: NodeId, prop: &str) -> Option<String> {
    surface.computed_style(node, prop)
}

/// Last-resort background scan over the node's raw style text
///
/// Finds a `linear-gradient(...)` substring (balanced parentheses) or
/// the value of a shorthand `background` declaration.
#[must_use]
pub fn scan_raw_background(surface: &EditingSurface, node: NodeId) -> Option<String> {
    let attr = surface.style_attribute(node)?;

    if let Some(gradient) = extract_gradient(&attr) {
        return Some(gradient);
    }

    StyleMap::parse(&attr)
        .get("background")
        .map(String::from)
}

/// Extract the first balanced `linear-gradient(...)` substring
#[must_use]
pub fn extract_gradient(text: &str) -> Option<String> {
    let start = text.find("linear-gradient(")?;
    let open = start + "linear-gradient".len();
    let mut depth = 0usize;
    for (offset, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[start..=open + offset].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailsmith_surface::SurfaceConfig;

    fn surface_with(css: &str, body: &str) -> EditingSurface {
        let mut surface = EditingSurface::new(SurfaceConfig::default());
        surface.load(css, body).unwrap();
        surface
    }

    #[test]
    fn test_declared_record_wins() {
        let mut surface = surface_with("p { color: green; }", "<p style=\"color:red\">Hi</p>");
        let p = surface.children(surface.root())[0];
        surface.set_style(p, "color", "blue").unwrap();

        assert_eq!(resolve(&surface, p, "color"), Some("blue".to_string()));
    }

    #[test]
    fn test_inline_attribute_second() {
        let surface = surface_with("p { color: green; }", "<p style=\"color:red\">Hi</p>");
        let p = surface.children(surface.root())[0];

        // No declared record yet; the raw attribute answers.
        assert_eq!(resolve(&surface, p, "color"), Some("red".to_string()));
    }

    #[test]
    fn test_computed_last() {
        let surface = surface_with("p { color: green; }", "<p>Hi</p>");
        let p = surface.children(surface.root())[0];
        assert_eq!(resolve(&surface, p, "color"), Some("green".to_string()));
    }

    #[test]
    fn test_authored_skips_rendering_context() {
        let surface = surface_with("p { color: green; }", "<p style=\"color:red\">Hi</p>");
        let p = surface.children(surface.root())[0];

        assert_eq!(resolve_authored(&surface, p, "color"), Some("red".to_string()));
        // Stylesheet and defaults are invisible to the authored view.
        assert_eq!(resolve_authored(&surface, p, "padding-top"), None);
    }

    #[test]
    fn test_unresolvable_background_is_none() {
        let surface = surface_with("", "<p>Hi</p>");
        let p = surface.children(surface.root())[0];
        assert_eq!(resolve(&surface, p, "background-color"), None);
    }

    #[test]
    fn test_scan_finds_shorthand_gradient() {
        let surface = surface_with(
            "",
            "<div style=\"background:linear-gradient(90deg, #FF0000, rgb(0,0,255))\">x</div>",
        );
        let div = surface.children(surface.root())[0];

        assert_eq!(resolve(&surface, div, "background-image"), None);
        assert_eq!(
            scan_raw_background(&surface, div),
            Some("linear-gradient(90deg, #FF0000, rgb(0,0,255))".to_string())
        );
    }

    #[test]
    fn test_scan_finds_shorthand_color() {
        let surface = surface_with("", "<div style=\"background:#4BBF39\">x</div>");
        let div = surface.children(surface.root())[0];
        assert_eq!(
            scan_raw_background(&surface, div),
            Some("#4BBF39".to_string())
        );
    }

    #[test]
    fn test_extract_gradient_balanced() {
        let text = "x linear-gradient(135deg, rgba(0,0,0,0.2), #FFF) y";
        assert_eq!(
            extract_gradient(text),
            Some("linear-gradient(135deg, rgba(0,0,0,0.2), #FFF)".to_string())
        );
        assert_eq!(extract_gradient("no gradient here"), None);
    }
}
