//! Shared presentation helpers.

use crate::error::AegisError;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Pretty JSON for any serializable result.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AegisError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AegisError::Request(format!("Failed to serialize output: {}", e)))
}

pub fn bullet_list(out: &mut String, items: &[String]) {
    for item in items {
        out.push_str(&format!("  - {}\n", item));
    }
}
