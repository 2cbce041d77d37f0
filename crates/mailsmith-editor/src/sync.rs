//! Canvas → document synchronization
//!
//! The synchronizer is the only code allowed to refresh the
//! authoritative document from the canvas. Pulls are one-directional
//! (canvas wins) and guarded: an export whose body is empty after
//! stripping empty wrapper tags never overwrites a non-empty
//! document, which keeps a torn-down or mis-rendered canvas from
//! wiping real content.

use tracing::{debug, warn};

use mailsmith_surface::EditingSurface;

use crate::document::{is_effectively_empty, strip_body_wrapper, EmailDocument};
use crate::error::Result;

/// Outcome of a synchronizer pull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// The document was refreshed from the canvas
    Updated,
    /// The export was effectively empty and the document kept
    GuardedEmpty,
    /// The export matched the document; nothing changed
    Unchanged,
}

/// Push the document's channels into the surface
///
/// # Errors
/// Returns an error when the body markup fails to parse.
pub fn push(surface: &mut EditingSurface, document: &EmailDocument) -> Result<()> {
    surface.load(&document.css, &document.html)?;
    debug!(
        subject = %document.subject,
        css_len = document.css.len(),
        html_len = document.html.len(),
        "document pushed into canvas"
    );
    Ok(())
}

/// Refresh the document from the surface's current state
pub fn pull(surface: &EditingSurface, document: &mut EmailDocument) -> PullOutcome {
    let exported = surface.export_markup();
    let body = strip_body_wrapper(&exported).trim().to_string();
    let css = surface.export_styles();

    if is_effectively_empty(&body) && !document.is_empty() {
        warn!("empty canvas export discarded, keeping non-empty document");
        return PullOutcome::GuardedEmpty;
    }

    if body == document.html && css == document.css {
        return PullOutcome::Unchanged;
    }

    document.set_content(body, css);
    debug!(
        html_len = document.html.len(),
        css_len = document.css.len(),
        "document refreshed from canvas"
    );
    PullOutcome::Updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailsmith_surface::SurfaceConfig;

    fn surface() -> EditingSurface {
        EditingSurface::new(SurfaceConfig::default())
    }

    #[test]
    fn test_push_then_pull_is_idempotent() {
        let mut surface = surface();
        let mut doc = EmailDocument::new(
            "Welcome",
            "<div style=\"padding-top:10px\"><p>Hi</p></div>",
            "p { color: red; }",
        );

        push(&mut surface, &doc).unwrap();
        let outcome = pull(&surface, &mut doc);
        assert_ne!(outcome, PullOutcome::GuardedEmpty);
        let first_html = doc.html.clone();
        let first_css = doc.css.clone();

        let mut surface2 = surface;
        push(&mut surface2, &doc).unwrap();
        assert_eq!(pull(&surface2, &mut doc), PullOutcome::Unchanged);
        assert_eq!(doc.html, first_html);
        assert_eq!(doc.css, first_css);
    }

    #[test]
    fn test_pull_reflects_edit() {
        let mut surface = surface();
        let mut doc = EmailDocument::new("s", "<p>Hi</p>", "");
        push(&mut surface, &doc).unwrap();

        let p = surface.children(surface.root())[0];
        surface.set_style(p, "color", "#4BBF39").unwrap();

        assert_eq!(pull(&surface, &mut doc), PullOutcome::Updated);
        assert!(doc.html.contains("color:#4BBF39"));
    }

    #[test]
    fn test_empty_export_never_clobbers() {
        let surface = surface();
        let mut doc = EmailDocument::new("s", "<p>Real content</p>", "");
        // Surface deliberately left unloaded: its export is an empty body.
        assert_eq!(pull(&surface, &mut doc), PullOutcome::GuardedEmpty);
        assert_eq!(doc.html, "<p>Real content</p>");

        // An empty document accepts an empty export.
        let mut empty_doc = EmailDocument::new("s", "", "");
        pull(&surface, &mut empty_doc);
        assert!(is_effectively_empty(&empty_doc.html));
    }

    #[test]
    fn test_pull_strips_body_wrapper() {
        let mut surface = surface();
        let mut doc = EmailDocument::new("s", "<p>Hi</p>", "");
        push(&mut surface, &doc).unwrap();
        pull(&surface, &mut doc);
        assert!(!doc.html.contains("<body"));
        assert_eq!(doc.html, "<p>Hi</p>");
    }
}
