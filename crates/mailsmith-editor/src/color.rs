//! Color normalization
//!
//! Panel fields display colors as uppercase hex. Anything already
//! hex is case-normalized and passed through; `rgb()`/`rgba()` and
//! other recognized colors are converted; unrecognized strings pass
//! through unchanged so an authored value is never destroyed.

/// Normalize a CSS color string to uppercase hex where possible
///
/// Transparent-ish keywords pass through untouched: converting them
/// would turn "no fill" into opaque black.
#[must_use]
pub fn normalize_hex(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.starts_with('#') {
        return trimmed.to_ascii_uppercase();
    }
    if is_transparent(trimmed) {
        return trimmed.to_string();
    }

    match csscolorparser::parse(trimmed) {
        Ok(color) => {
            let [r, g, b, _] = color.to_rgba8();
            format!("#{r:02X}{g:02X}{b:02X}")
        }
        Err(_) => trimmed.to_string(),
    }
}

/// Whether a token reads as a color literal
///
/// Hex, `rgb()`/`rgba()`, or a name csscolorparser recognizes; used
/// to tell gradient color stops apart from direction keywords.
#[must_use]
pub fn is_color_literal(token: &str) -> bool {
    let lower = token.trim().to_ascii_lowercase();
    lower.starts_with('#')
        || lower.starts_with("rgb(")
        || lower.starts_with("rgba(")
        || csscolorparser::parse(&lower).is_ok()
}

/// Whether a resolved background-color value counts as unset
#[must_use]
pub fn is_transparent(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    v.is_empty()
        || v == "transparent"
        || v == "none"
        || v == "initial"
        || v == "inherit"
        || v == "rgba(0,0,0,0)"
        || v == "rgba(0, 0, 0, 0)"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(normalize_hex("rgb(75,191,57)"), "#4BBF39");
        assert_eq!(normalize_hex("rgb(0, 0, 0)"), "#000000");
        assert_eq!(normalize_hex("rgb(8, 9, 10)"), "#08090A");
    }

    #[test]
    fn test_rgba_drops_alpha() {
        assert_eq!(normalize_hex("rgba(75,191,57,0.5)"), "#4BBF39");
    }

    #[test]
    fn test_hex_case_normalized() {
        assert_eq!(normalize_hex("#4bbf39"), "#4BBF39");
        assert_eq!(normalize_hex("#4BBF39"), "#4BBF39");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_hex("rgb(75,191,57)");
        assert_eq!(normalize_hex(&once), once);
    }

    #[test]
    fn test_named_color_converted() {
        assert_eq!(normalize_hex("red"), "#FF0000");
    }

    #[test]
    fn test_unrecognized_passes_through() {
        assert_eq!(normalize_hex("var(--brand)"), "var(--brand)");
        assert_eq!(normalize_hex("not a color"), "not a color");
    }

    #[test]
    fn test_transparent_keywords_never_become_black() {
        assert_eq!(normalize_hex("transparent"), "transparent");
        assert_eq!(normalize_hex("rgba(0,0,0,0)"), "rgba(0,0,0,0)");
        assert_eq!(normalize_hex("none"), "none");
    }

    #[test]
    fn test_is_color_literal() {
        assert!(is_color_literal("#FF0000"));
        assert!(is_color_literal("rgb(75,191,57)"));
        assert!(is_color_literal("rgba(0, 0, 0, 0.5)"));
        assert!(is_color_literal("red"));
        assert!(!is_color_literal("to"));
        assert!(!is_color_literal("right"));
        assert!(!is_color_literal("135deg"));
    }

    #[test]
    fn test_is_transparent() {
        assert!(is_transparent("transparent"));
        assert!(is_transparent(""));
        assert!(is_transparent("rgba(0,0,0,0)"));
        assert!(!is_transparent("#FFFFFF"));
    }
}
