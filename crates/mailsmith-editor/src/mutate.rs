//! Style mutation
//!
//! Each style panel applies as one batch against the selected node,
//! writing literal values that render in email clients. Solid
//! backgrounds and gradients are mutually exclusive: applying either
//! clears the other longhand, and `clear_background` removes both.

use serde::{Deserialize, Serialize};
use tracing::debug;

use mailsmith_surface::{EditingSurface, NodeId};

use crate::color::normalize_hex;
use crate::error::Result;
use crate::snapshot::DEFAULT_GRADIENT_ANGLE;

/// Solid background fill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundPanel {
    /// Fill color in any recognized notation
    pub color: String,
}

/// Two-stop linear gradient fill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientPanel {
    /// Angle in degrees
    pub angle: u16,
    /// First color stop
    pub start: String,
    /// Second color stop
    pub end: String,
}

impl Default for GradientPanel {
    fn default() -> Self {
        Self {
            angle: DEFAULT_GRADIENT_ANGLE,
            start: "#FFFFFF".to_string(),
            end: "#FFFFFF".to_string(),
        }
    }
}

/// Width and height
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionsPanel {
    /// New `width`, untouched when absent
    pub width: Option<String>,
    /// New `height`, untouched when absent
    pub height: Option<String>,
}

/// Padding and margin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpacingPanel {
    /// New `padding`, untouched when absent
    pub padding: Option<String>,
    /// New `margin`, untouched when absent
    pub margin: Option<String>,
}

/// Border and corner radii
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BorderPanel {
    /// New `border-width`
    pub width: Option<String>,
    /// New `border-style`
    pub style: Option<String>,
    /// New `border-color`
    pub color: Option<String>,
    /// Corner radii: top-left, top-right, bottom-right, bottom-left
    pub radii: [Option<String>; 4],
}

/// Typography for text selections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypographyPanel {
    /// New `font-family`
    pub font_family: Option<String>,
    /// New `font-size`
    pub font_size: Option<String>,
    /// New `font-weight`
    pub font_weight: Option<String>,
    /// New text `color`
    pub color: Option<String>,
    /// New `text-align`
    pub text_align: Option<String>,
    /// New `line-height`
    pub line_height: Option<String>,
}

/// Source and alt text for image selections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImagePanel {
    /// New `src` attribute
    pub src: Option<String>,
    /// New `alt` attribute
    pub alt: Option<String>,
}

/// Apply a solid background, clearing any gradient
pub fn apply_background(
    surface: &mut EditingSurface,
    node: NodeId,
    panel: &BackgroundPanel,
) -> Result<()> {
    let color = normalize_hex(&panel.color);
    debug!(%color, "applying solid background");
    surface.set_styles(
        node,
        &[
            ("background-color", color.as_str()),
            ("background-image", ""),
            ("background", ""),
        ],
    )?;
    Ok(())
}

/// Apply a gradient background, clearing any solid color
pub fn apply_gradient(
    surface: &mut EditingSurface,
    node: NodeId,
    panel: &GradientPanel,
) -> Result<()> {
    let value = format!(
        "linear-gradient({}deg, {}, {})",
        panel.angle,
        normalize_hex(&panel.start),
        normalize_hex(&panel.end),
    );
    debug!(%value, "applying gradient background");
    surface.set_styles(
        node,
        &[
            ("background-image", value.as_str()),
            ("background-color", ""),
            ("background", ""),
        ],
    )?;
    Ok(())
}

/// Remove both background longhands and the shorthand
pub fn clear_background(surface: &mut EditingSurface, node: NodeId) -> Result<()> {
    surface.remove_styles(node, &["background-color", "background-image", "background"])?;
    Ok(())
}

/// Apply width/height
pub fn apply_dimensions(
    surface: &mut EditingSurface,
    node: NodeId,
    panel: &DimensionsPanel,
) -> Result<()> {
    let mut pairs = Vec::new();
    push_pair(&mut pairs, "width", &panel.width);
    push_pair(&mut pairs, "height", &panel.height);
    apply_pairs(surface, node, &pairs)
}

/// Apply padding/margin
pub fn apply_spacing(
    surface: &mut EditingSurface,
    node: NodeId,
    panel: &SpacingPanel,
) -> Result<()> {
    let mut pairs = Vec::new();
    push_pair(&mut pairs, "padding", &panel.padding);
    push_pair(&mut pairs, "margin", &panel.margin);
    apply_pairs(surface, node, &pairs)
}

/// Apply border values and corner radii
pub fn apply_border(
    surface: &mut EditingSurface,
    node: NodeId,
    panel: &BorderPanel,
) -> Result<()> {
    let normalized_color = panel.color.as_deref().map(normalize_hex);
    let mut pairs = Vec::new();
    push_pair(&mut pairs, "border-width", &panel.width);
    push_pair(&mut pairs, "border-style", &panel.style);
    push_pair(&mut pairs, "border-color", &normalized_color);
    const RADIUS_PROPS: [&str; 4] = [
        "border-top-left-radius",
        "border-top-right-radius",
        "border-bottom-right-radius",
        "border-bottom-left-radius",
    ];
    for (prop, value) in RADIUS_PROPS.iter().zip(panel.radii.iter()) {
        push_pair(&mut pairs, prop, value);
    }
    apply_pairs(surface, node, &pairs)
}

/// Apply typography values
pub fn apply_typography(
    surface: &mut EditingSurface,
    node: NodeId,
    panel: &TypographyPanel,
) -> Result<()> {
    let normalized_color = panel.color.as_deref().map(normalize_hex);
    let mut pairs = Vec::new();
    push_pair(&mut pairs, "font-family", &panel.font_family);
    push_pair(&mut pairs, "font-size", &panel.font_size);
    push_pair(&mut pairs, "font-weight", &panel.font_weight);
    push_pair(&mut pairs, "color", &normalized_color);
    push_pair(&mut pairs, "text-align", &panel.text_align);
    push_pair(&mut pairs, "line-height", &panel.line_height);
    apply_pairs(surface, node, &pairs)
}

/// Apply image attributes
pub fn apply_image(
    surface: &mut EditingSurface,
    node: NodeId,
    panel: &ImagePanel,
) -> Result<()> {
    if let Some(src) = &panel.src {
        surface.set_attribute(node, "src", src)?;
    }
    if let Some(alt) = &panel.alt {
        surface.set_attribute(node, "alt", alt)?;
    }
    Ok(())
}

/// Apply opacity immediately, with no confirm step
pub fn apply_opacity(surface: &mut EditingSurface, node: NodeId, value: &str) -> Result<()> {
    surface.set_style(node, "opacity", value)?;
    Ok(())
}

fn push_pair<'a>(pairs: &mut Vec<(&'a str, &'a str)>, prop: &'a str, value: &'a Option<String>) {
    if let Some(value) = value {
        pairs.push((prop, value.as_str()));
    }
}

fn apply_pairs(surface: &mut EditingSurface, node: NodeId, pairs: &[(&str, &str)]) -> Result<()> {
    if pairs.is_empty() {
        return Ok(());
    }
    surface.set_styles(node, pairs)?;
    Ok(())
}
