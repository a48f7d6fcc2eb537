//! Parse configuration.

use serde::{Deserialize, Serialize};

/// Language requested when a caller does not ask for one.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Language tag marking an item with no linguistic content (abbreviations, codes).
pub const NO_LINGUISTIC_CONTENT: &str = "zxx";

/// Options threaded through every normalization entry point.
///
/// The requested language is never global state: each call receives it
/// explicitly, so concurrent callers can ask for different languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// ISO 639-3 code of the preferred language (e.g., "eng", "fra").
    pub language: String,
}

impl ParseOptions {
    /// Creates options requesting the given language.
    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language() {
        assert_eq!(ParseOptions::default().language, "eng");
    }

    #[test]
    fn test_deserialize_partial() {
        let opts: ParseOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, ParseOptions::default());

        let opts: ParseOptions = serde_json::from_str(r#"{"language":"fra"}"#).unwrap();
        assert_eq!(opts, ParseOptions::with_language("fra"));
    }
}
