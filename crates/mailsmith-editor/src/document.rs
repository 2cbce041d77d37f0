//! Email document
//!
//! This module defines the host's single authoritative document: the
//! `{html, css}` pair (plus subject) that every view renders from.
//! It also owns the split/recombine rules the synchronizer relies
//! on: a leading `<style>` block is the stylesheet channel, the rest
//! (or a body wrapper's inner content) is the component-tree channel.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// The authoritative email document owned by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDocument {
    /// Email subject line
    pub subject: String,

    /// Body markup, body wrapper and style block stripped
    pub html: String,

    /// Stylesheet text from the leading `<style>` block
    pub css: String,

    /// When the document was last refreshed from the canvas
    pub updated_at: DateTime<Utc>,
}

fn style_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?si)^\s*<style[^>]*>(.*?)</style>").expect("valid style-block regex")
    })
}

fn body_wrapper_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?si)<body[^>]*>(.*)</body>").expect("valid body-wrapper regex")
    })
}

fn wrapper_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^<([a-zA-Z][a-zA-Z0-9]*)[^>]*>(.*)</([a-zA-Z][a-zA-Z0-9]*)>$")
            .expect("valid wrapper regex")
    })
}

impl EmailDocument {
    /// Create a document from already-split channels
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        html: impl Into<String>,
        css: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            html: html.into(),
            css: css.into(),
            updated_at: Utc::now(),
        }
    }

    /// Create a document by splitting a combined HTML string
    ///
    /// A leading `<style>` block becomes the stylesheet channel; a
    /// body wrapper, if present, contributes only its inner content.
    /// A malformed or partial string is treated wholesale as
    /// component-tree content.
    #[must_use]
    pub fn from_combined(subject: impl Into<String>, combined: &str) -> Self {
        let (css, rest) = split_style_block(combined);
        let html = strip_body_wrapper(rest);
        Self::new(subject, html.trim(), css)
    }

    /// Recombine into a single HTML string: one leading `<style>`
    /// block (only when the stylesheet is non-empty) plus body markup
    #[must_use]
    pub fn combined(&self) -> String {
        if self.css.trim().is_empty() {
            self.html.clone()
        } else {
            format!("<style>{}</style>{}", self.css, self.html)
        }
    }

    /// Replace both channels and refresh the timestamp
    pub fn set_content(&mut self, html: impl Into<String>, css: impl Into<String>) {
        self.html = html.into();
        self.css = css.into();
        self.updated_at = Utc::now();
    }

    /// Whether the body markup is empty after stripping empty wrappers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        is_effectively_empty(&self.html)
    }
}

/// Split a leading `<style>` block off a combined HTML string
///
/// Returns `(css, remainder)`; css is empty when no leading block is
/// present.
#[must_use]
pub fn split_style_block(combined: &str) -> (String, &str) {
    if let Some(cap) = style_block_regex().captures(combined) {
        let whole = cap.get(0).map(|m| m.end()).unwrap_or(0);
        let css = cap.get(1).map(|m| m.as_str()).unwrap_or("").to_string();
        (css, &combined[whole..])
    } else {
        (String::new(), combined)
    }
}

/// Take a body wrapper's inner content, or the whole string when no
/// wrapper is present
#[must_use]
pub fn strip_body_wrapper(markup: &str) -> &str {
    body_wrapper_regex()
        .captures(markup)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .unwrap_or(markup)
}

/// Whether markup is empty once empty wrapper tags are stripped
///
/// Peels matching outer tag pairs (`<div> ... </div>`) as long as the
/// inner content keeps shrinking; the markup is effectively empty
/// when nothing but whitespace remains.
#[must_use]
pub fn is_effectively_empty(markup: &str) -> bool {
    let mut current = markup.trim();
    loop {
        if current.is_empty() {
            return true;
        }
        let Some(cap) = wrapper_regex().captures(current) else {
            return false;
        };
        let (open, close) = (&cap[1], &cap[3]);
        if !open.eq_ignore_ascii_case(close) {
            return false;
        }
        // Careful with sibling pairs: `<p>a</p><p>b</p>` matches the
        // regex across both; only peel when the inner is tag-balanced.
        let inner = cap.get(2).map(|m| m.as_str()).unwrap_or("");
        if inner.contains(&format!("</{open}>")) || inner.contains(&format!("<{open}>")) {
            return false;
        }
        current = inner.trim();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_combined_splits_style_and_body() {
        let doc = EmailDocument::from_combined(
            "Welcome",
            "<style>p { color: red; }</style><body><p>Hi</p></body>",
        );
        assert_eq!(doc.subject, "Welcome");
        assert_eq!(doc.css, "p { color: red; }");
        assert_eq!(doc.html, "<p>Hi</p>");
    }

    #[test]
    fn test_from_combined_without_style_block() {
        let doc = EmailDocument::from_combined("s", "<p>Hi</p>");
        assert_eq!(doc.css, "");
        assert_eq!(doc.html, "<p>Hi</p>");
    }

    #[test]
    fn test_from_combined_malformed_is_tree_content() {
        let doc = EmailDocument::from_combined("s", "just words, no tags");
        assert_eq!(doc.html, "just words, no tags");
        assert_eq!(doc.css, "");
    }

    #[test]
    fn test_combined_omits_empty_style_block() {
        let doc = EmailDocument::new("s", "<p>Hi</p>", "");
        assert_eq!(doc.combined(), "<p>Hi</p>");

        let doc = EmailDocument::new("s", "<p>Hi</p>", "p{color:red}");
        assert_eq!(doc.combined(), "<style>p{color:red}</style><p>Hi</p>");
    }

    #[test]
    fn test_round_trip_combined() {
        let combined = "<style>p{color:red}</style><p>Hi</p>";
        let doc = EmailDocument::from_combined("s", combined);
        assert_eq!(doc.combined(), combined);
    }

    #[test]
    fn test_is_effectively_empty() {
        assert!(is_effectively_empty(""));
        assert!(is_effectively_empty("   \n "));
        assert!(is_effectively_empty("<body></body>"));
        assert!(is_effectively_empty("<body><div>  </div></body>"));
        assert!(!is_effectively_empty("<p>Hi</p>"));
        assert!(!is_effectively_empty("<div><p>Hi</p></div>"));
        assert!(!is_effectively_empty("<p></p><p>b</p>"));
    }

    #[test]
    fn test_set_content_bumps_timestamp() {
        let mut doc = EmailDocument::new("s", "<p>old</p>", "");
        let before = doc.updated_at;
        doc.set_content("<p>new</p>", "p{}");
        assert_eq!(doc.html, "<p>new</p>");
        assert!(doc.updated_at >= before);
    }
}
