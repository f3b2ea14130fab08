//! Defensive parsing of gateway completion text.
//!
//! The gateway promises JSON-shaped output but does not always deliver it.
//! Instead of discarding unparsable text (or hiding the fallback inside a
//! dictionary key), the parse result is a tagged type so callers see which
//! path they are on.

use serde_json::{Value, json};

/// The result of defensively parsing gateway completion text as JSON.
///
/// Parse failure is recovered locally, never raised to the caller: the raw
/// text is preserved under [`Unparsed`](GenerationOutcome::Unparsed) and
/// rendered as `{"raw_text": ...}` by [`into_value`](GenerationOutcome::into_value),
/// so downstream consumers always receive a uniform JSON shape.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The completion text was valid JSON.
    Parsed(Value),
    /// The completion text was not valid JSON; the raw text is kept as-is.
    Unparsed(String),
}

impl GenerationOutcome {
    /// Parse completion text, falling back to [`Unparsed`](Self::Unparsed)
    /// on any JSON error.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Self::Parsed(value),
            Err(_) => Self::Unparsed(text),
        }
    }

    /// Whether the completion parsed as JSON.
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    /// Render as a JSON value; unparsed text is wrapped under the
    /// `raw_text` key so no data is ever lost.
    pub fn into_value(self) -> Value {
        match self {
            Self::Parsed(value) => value,
            Self::Unparsed(text) => json!({ "raw_text": text }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_json_is_parsed() {
        let outcome = GenerationOutcome::from_text(r#"{"itinerary": []}"#);
        assert!(outcome.is_parsed());
        assert_eq!(outcome.into_value(), json!({"itinerary": []}));
    }

    #[test]
    fn non_json_text_is_wrapped_under_raw_text() {
        let outcome = GenerationOutcome::from_text("hello");
        assert!(!outcome.is_parsed());
        assert_eq!(outcome.into_value(), json!({"raw_text": "hello"}));
    }

    #[test]
    fn empty_text_is_preserved() {
        let outcome = GenerationOutcome::from_text("");
        assert_eq!(outcome.into_value(), json!({"raw_text": ""}));
    }

    #[test]
    fn bare_json_scalars_count_as_parsed() {
        assert!(GenerationOutcome::from_text("42").is_parsed());
        assert!(GenerationOutcome::from_text("\"quoted\"").is_parsed());
    }
}
