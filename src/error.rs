//! Structured error types for the invoice layout engine.
//!
//! Layout itself never fails on well-formed input. The variants here cover
//! the only real error sources: degenerate page geometry, a column layout
//! that does not fit the page, and JSON render requests that fail to parse.

use thiserror::Error;

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The page geometry leaves no usable content height.
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// The configured column widths do not fit the content width.
    #[error("invalid column layout: {0}")]
    InvalidColumns(String),

    /// A JSON render request failed to parse.
    #[error("failed to parse render request: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the render request schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        LayoutError::Parse { source: e, hint }
    }
}
