//! Preview rendering
//!
//! Renders the read-only preview: every `{{name}}` token in the
//! document is replaced with the supplied or inferred sample value,
//! wrapped in highlight markup so the user can see what was
//! substituted. The substitution result is never written back into
//! the document.

use regex::Regex;
use std::sync::OnceLock;

use crate::document::EmailDocument;
use crate::variables::{infer_sample, Variable};

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}").expect("valid token regex")
    })
}

/// Renderer for the read-only preview view
pub struct PreviewRenderer {
    /// CSS class placed on the substitution highlight span
    highlight_class: String,
}

impl PreviewRenderer {
    /// Create a renderer with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            highlight_class: "preview-variable".to_string(),
        }
    }

    /// Set the highlight span's CSS class
    #[must_use]
    pub fn with_highlight_class(mut self, class: impl Into<String>) -> Self {
        self.highlight_class = class.into();
        self
    }

    /// Render the document with all variable tokens substituted
    ///
    /// Samples come from the matching descriptor when it carries one,
    /// otherwise from name inference; tokens without a descriptor are
    /// inferred too, so no literal `{{...}}` survives.
    #[must_use]
    pub fn render(&self, document: &EmailDocument, variables: &[Variable]) -> String {
        self.substitute(&document.combined(), variables)
    }

    /// Substitute tokens in an arbitrary markup string
    #[must_use]
    pub fn substitute(&self, markup: &str, variables: &[Variable]) -> String {
        token_regex()
            .replace_all(markup, |caps: &regex::Captures<'_>| {
                let name = &caps[1];
                let value = variables
                    .iter()
                    .find(|v| v.name == name)
                    .map(Variable::preview_sample)
                    .unwrap_or_else(|| infer_sample(name));
                format!(
                    "<span class=\"{}\">{}</span>",
                    self.highlight_class,
                    escape(&value)
                )
            })
            .into_owned()
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape substituted values for HTML context
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
