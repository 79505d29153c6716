//! Structured error types for the deckflow layout engine.
//!
//! Only structural problems and unreadable input escape the public API.
//! Content problems (a broken image URL, a zero-width column) are repaired
//! in place and logged, and exhausted pagination is reported on the slide
//! itself as `degraded`.

use thiserror::Error;

/// The unified error type returned by all public deckflow API functions.
#[derive(Debug, Error)]
pub enum DeckError {
    /// JSON input failed to parse as a valid deck.
    #[error("Failed to parse deck: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// The slide tree is malformed in a way layout cannot repair.
    #[error("Structural error: {0}")]
    Structural(String),
    /// A custom font could not be decoded or parsed.
    #[error("Font error: {0}")]
    Font(String),
}

impl DeckError {
    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        DeckError::Structural(msg.into())
    }
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the deck schema. Sections need a \"kind\", elements need a \"type\".".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        DeckError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_hint() {
        let err: DeckError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse deck"));
        assert!(msg.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn test_structural_display() {
        let err = DeckError::structural("row without children");
        assert_eq!(err.to_string(), "Structural error: row without children");
    }
}
