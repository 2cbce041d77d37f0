//! Selection snapshots
//!
//! The host never reads node state field by field while panels are
//! open; every selection change replaces the whole snapshot. The
//! snapshot carries everything the style panels display: category,
//! background classification, box model values, border, opacity, and
//! the category-specific typography or image sections.

use serde::{Deserialize, Serialize};

use mailsmith_surface::{EditingSurface, NodeId};

use crate::color::{is_color_literal, is_transparent, normalize_hex};
use crate::resolve::{extract_gradient, resolve, resolve_authored, scan_raw_background};

/// Tags whose contents are edited as text
const TEXT_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "span", "a", "li", "label"];

/// Default gradient angle when the authored value names none
pub const DEFAULT_GRADIENT_ANGLE: u16 = 135;

/// Fallback color shown for an unset background, never applied
pub const DISPLAY_DEFAULT_COLOR: &str = "#FFFFFF";

/// What kind of node is selected, driving panel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCategory {
    /// Text-bearing element or text node
    Text,
    /// An `<img>` element
    Image,
    /// Everything else
    Generic,
}

/// Panel section expanded when the snapshot is first shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelSection {
    /// Font controls
    Typography,
    /// Source and alt text controls
    Image,
    /// Fill controls
    Background,
}

/// Background state as the panel displays it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    /// A solid fill
    Color {
        /// Normalized color value
        value: String,
        /// Whether the value was actually authored on the node;
        /// a displayed default is never written back
        authored: bool,
    },
    /// A two-stop linear gradient
    Gradient {
        /// Angle in degrees
        angle: u16,
        /// First color stop, normalized
        start: String,
        /// Second color stop, normalized
        end: String,
    },
}

/// Width, height, and max-width as resolved, if any
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Resolved `width`
    pub width: Option<String>,
    /// Resolved `height`
    pub height: Option<String>,
    /// Resolved `max-width`
    pub max_width: Option<String>,
}

/// Per-side padding and margin
///
/// Sides are top, right, bottom, left. An authored longhand wins,
/// then the authored shorthand expanded per side, then the resolved
/// default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    /// Padding per side
    pub padding: [Option<String>; 4],
    /// Margin per side
    pub margin: [Option<String>; 4],
}

/// Border values, radii per corner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Authored `border-width`
    pub width: Option<String>,
    /// Authored `border-style`
    pub style: Option<String>,
    /// Authored `border-color`, normalized
    pub color: Option<String>,
    /// Corner radii: top-left, top-right, bottom-right, bottom-left
    pub radii: [Option<String>; 4],
}

/// Typography values for text selections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    /// Authored or resolved `font-family`
    pub font_family: Option<String>,
    /// Authored or resolved `font-size`
    pub font_size: Option<String>,
    /// Authored or resolved `font-weight`
    pub font_weight: Option<String>,
    /// Authored or resolved `color`, normalized
    pub color: Option<String>,
    /// Authored or resolved `text-align`
    pub text_align: Option<String>,
    /// Authored or resolved `line-height`
    pub line_height: Option<String>,
}

/// Image attributes for image selections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// The `src` attribute
    pub src: Option<String>,
    /// The `alt` attribute
    pub alt: Option<String>,
}

/// Everything the style panels need for the current selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    /// Selection category
    pub category: SelectionCategory,
    /// Section expanded by default
    pub section: PanelSection,
    /// Background state
    pub background: Background,
    /// Width/height
    pub dimensions: Dimensions,
    /// Padding/margin
    pub spacing: Spacing,
    /// Border and radii
    pub border: Border,
    /// Authored `opacity`, if any
    pub opacity: Option<String>,
    /// Present for text selections
    pub typography: Option<Typography>,
    /// Present for image selections
    pub image: Option<ImageInfo>,
}

impl SelectionSnapshot {
    /// Build a snapshot for a node
    #[must_use]
    pub fn capture(surface: &EditingSurface, node: NodeId) -> Self {
        let category = categorize(surface, node);
        let section = match category {
            SelectionCategory::Text => PanelSection::Typography,
            SelectionCategory::Image => PanelSection::Image,
            SelectionCategory::Generic => PanelSection::Background,
        };

        let typography = (category == SelectionCategory::Text).then(|| Typography {
            font_family: resolve(surface, node, "font-family"),
            font_size: resolve(surface, node, "font-size"),
            font_weight: resolve(surface, node, "font-weight"),
            color: resolve(surface, node, "color").map(|c| normalize_hex(&c)),
            text_align: resolve(surface, node, "text-align"),
            line_height: resolve(surface, node, "line-height"),
        });

        let image = (category == SelectionCategory::Image).then(|| ImageInfo {
            src: surface.attribute(node, "src"),
            alt: surface.attribute(node, "alt"),
        });

        Self {
            category,
            section,
            background: classify_background(surface, node),
            dimensions: Dimensions {
                width: resolve(surface, node, "width"),
                height: resolve(surface, node, "height"),
                max_width: resolve(surface, node, "max-width"),
            },
            spacing: Spacing {
                padding: box_sides(surface, node, "padding"),
                margin: box_sides(surface, node, "margin"),
            },
            border: Border {
                width: resolve(surface, node, "border-width"),
                style: resolve(surface, node, "border-style"),
                color: resolve(surface, node, "border-color").map(|c| normalize_hex(&c)),
                radii: [
                    resolve(surface, node, "border-top-left-radius"),
                    resolve(surface, node, "border-top-right-radius"),
                    resolve(surface, node, "border-bottom-right-radius"),
                    resolve(surface, node, "border-bottom-left-radius"),
                ],
            },
            opacity: resolve(surface, node, "opacity"),
            typography,
            image,
        }
    }
}

/// Categorize a node for panel layout
#[must_use]
pub fn categorize(surface: &EditingSurface, node: NodeId) -> SelectionCategory {
    if surface.is_text(node) {
        return SelectionCategory::Text;
    }
    match surface.tag(node) {
        Ok(tag) if tag == "img" => SelectionCategory::Image,
        Ok(tag) if TEXT_TAGS.contains(&tag.as_str()) => SelectionCategory::Text,
        _ => SelectionCategory::Generic,
    }
}

/// Classify the node's background state
///
/// Gradients win over solid colors; a transparent or absent color
/// yields the displayed-but-unauthored white default.
#[must_use]
pub fn classify_background(surface: &EditingSurface, node: NodeId) -> Background {
    let image = resolve(surface, node, "background-image")
        .or_else(|| scan_raw_background(surface, node));

    if let Some(raw) = image.as_deref() {
        if let Some(gradient) = extract_gradient(raw) {
            return parse_gradient(&gradient);
        }
    }

    let color = resolve(surface, node, "background-color")
        .or_else(|| image.filter(|v| !v.contains("linear-gradient(")));

    match color {
        Some(value) if !is_transparent(&value) => Background::Color {
            value: normalize_hex(&value),
            authored: true,
        },
        _ => Background::Color {
            value: DISPLAY_DEFAULT_COLOR.to_string(),
            authored: false,
        },
    }
}

/// Parse a `linear-gradient(...)` value into angle plus two stops
///
/// Only recognized color literals count as stops; direction keywords
/// (`to right`) and other non-color parts are skipped.
fn parse_gradient(value: &str) -> Background {
    let inner = value
        .trim_start_matches("linear-gradient(")
        .trim_end_matches(')');
    let parts = split_top_level(inner);

    let mut angle = DEFAULT_GRADIENT_ANGLE;
    let mut colors = Vec::new();
    for part in &parts {
        let part = part.trim();
        if let Some(deg) = part.strip_suffix("deg") {
            if let Ok(parsed) = deg.trim().parse::<u16>() {
                angle = parsed;
                continue;
            }
        }
        // A stop may carry a position ("#FFF 40%"); the color leads.
        let token = leading_color_token(part);
        if is_color_literal(token) {
            colors.push(normalize_hex(token));
        }
    }

    let start = colors.first().cloned().unwrap_or_else(|| "#000000".to_string());
    let end = colors.get(1).cloned().unwrap_or_else(|| start.clone());
    Background::Gradient { angle, start, end }
}

/// The leading color token of a gradient part
///
/// `rgb()`/`rgba()` calls contain their own spaces, so they are taken
/// up to the closing parenthesis instead of the first whitespace.
fn leading_color_token(part: &str) -> &str {
    let lower = part.to_ascii_lowercase();
    if lower.starts_with("rgb(") || lower.starts_with("rgba(") {
        if let Some(end) = part.find(')') {
            return &part[..=end];
        }
    }
    part.split_whitespace().next().unwrap_or(part)
}

const BOX_SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Resolve a box property per side
///
/// An authored longhand wins, then the authored shorthand expanded
/// per side, then the surface's resolved value for the longhand.
fn box_sides(
    surface: &EditingSurface,
    node: NodeId,
    shorthand: &str,
) -> [Option<String>; 4] {
    let expanded = resolve_authored(surface, node, shorthand)
        .map(|value| expand_box_shorthand(&value));
    std::array::from_fn(|i| {
        let prop = format!("{shorthand}-{}", BOX_SIDES[i]);
        resolve_authored(surface, node, &prop)
            .or_else(|| expanded.as_ref().map(|sides| sides[i].clone()))
            .or_else(|| surface.computed_style(node, &prop))
    })
}

/// Expand a 1-4 value box shorthand into top/right/bottom/left
fn expand_box_shorthand(value: &str) -> [String; 4] {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let (top, right, bottom, left) = match parts.as_slice() {
        [all] => (*all, *all, *all, *all),
        [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
        [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
        [top, right, bottom, left, ..] => (*top, *right, *bottom, *left),
        [] => ("", "", "", ""),
    };
    [
        top.to_string(),
        right.to_string(),
        bottom.to_string(),
        left.to_string(),
    ]
}

/// Split on commas outside parentheses, so `rgb(a,b,c)` stays whole
fn split_top_level(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in s.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}
