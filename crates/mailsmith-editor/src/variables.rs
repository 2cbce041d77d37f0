//! Template variables and sample inference
//!
//! Variables are `{{name}}` placeholders resolved by the caller's
//! send-time templating; this core only previews them. When the
//! caller supplies no sample, one is inferred from the name through
//! ordered substring heuristics, falling back to humanizing the raw
//! name. Inference is deterministic: the same name always yields the
//! same sample.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A template variable descriptor supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Placeholder name as it appears between braces
    pub name: String,

    /// Human-readable description for the insert panel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Caller-supplied sample shown in previews
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

impl Variable {
    /// Create a variable with just a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample: None,
        }
    }

    /// Attach a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a caller-supplied sample
    #[must_use]
    pub fn with_sample(mut self, sample: impl Into<String>) -> Self {
        self.sample = Some(sample.into());
        self
    }

    /// The sample to preview: supplied if present, inferred otherwise
    #[must_use]
    pub fn preview_sample(&self) -> String {
        self.sample
            .clone()
            .unwrap_or_else(|| infer_sample(&self.name))
    }
}

/// Infer a plausible sample value from a variable name
#[must_use]
pub fn infer_sample(name: &str) -> String {
    let lower = name.to_lowercase();

    if lower.contains("email") {
        return "sarah@example.com".to_string();
    }
    if lower.contains("score") {
        if lower.contains("seo") {
            return "87".to_string();
        }
        if lower.contains("performance") {
            return "92".to_string();
        }
        return "78".to_string();
    }
    if lower.contains("date") {
        return example_date();
    }
    if lower.contains("company") || lower.contains("organization") {
        return "Acme Studios".to_string();
    }
    if lower.contains("first") && lower.contains("name") {
        return "Sarah".to_string();
    }
    if lower.contains("last") && lower.contains("name") {
        return "Mitchell".to_string();
    }
    if lower.contains("name") {
        return "Sarah Mitchell".to_string();
    }
    if lower.contains("url") || lower.contains("link") || lower.contains("website") {
        return "https://example.com/offer".to_string();
    }
    if lower.contains("phone") {
        return "+1 (555) 014-2368".to_string();
    }
    if lower.contains("city") {
        return "Portland".to_string();
    }
    if lower.contains("country") {
        return "United States".to_string();
    }
    if lower.contains("plan") || lower.contains("tier") {
        return "Premium".to_string();
    }
    if lower.contains("price") || lower.contains("amount") || lower.contains("total") {
        return "$49.00".to_string();
    }
    if lower.contains("percent") || lower.contains("discount") {
        return "20%".to_string();
    }

    humanize(name)
}

/// A fixed formatted date keeps previews deterministic
fn example_date() -> String {
    NaiveDate::from_ymd_opt(2025, 3, 15)
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "March 15, 2025".to_string())
}

/// Humanize a raw name: separators become spaces, words capitalized
#[must_use]
pub fn humanize(name: &str) -> String {
    name.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_names_yield_email_shaped_sample() {
        for name in ["email", "user_email", "Contact_Email_Address"] {
            let sample = infer_sample(name);
            assert!(sample.contains('@'), "{name} should infer an email");
        }
    }

    #[test]
    fn test_score_qualifiers_are_distinct() {
        let seo = infer_sample("seo_score");
        let perf = infer_sample("performance_score");
        let plain = infer_sample("score");
        assert_ne!(seo, perf);
        assert_ne!(seo, plain);
        assert!(seo.parse::<u32>().is_ok());
        assert!(perf.parse::<u32>().is_ok());
    }

    #[test]
    fn test_date_is_formatted() {
        assert_eq!(infer_sample("signup_date"), "March 15, 2025");
    }

    #[test]
    fn test_first_name() {
        assert_eq!(infer_sample("first_name"), "Sarah");
        assert_eq!(infer_sample("FirstName"), "Sarah");
    }

    #[test]
    fn test_company_beats_name() {
        assert_eq!(infer_sample("company_name"), "Acme Studios");
    }

    #[test]
    fn test_fallback_humanizes() {
        assert_eq!(infer_sample("custom_field_9"), "Custom Field 9");
        assert_eq!(infer_sample("weird-token"), "Weird Token");
    }

    #[test]
    fn test_inference_is_deterministic() {
        assert_eq!(infer_sample("first_name"), infer_sample("first_name"));
        assert_eq!(infer_sample("custom_field_9"), infer_sample("custom_field_9"));
    }

    #[test]
    fn test_preview_sample_prefers_supplied() {
        let var = Variable::new("first_name").with_sample("Jamie");
        assert_eq!(var.preview_sample(), "Jamie");

        let var = Variable::new("first_name");
        assert_eq!(var.preview_sample(), "Sarah");
    }
}
