//! Language selection and inline formatting of localized strings.

use tracing::warn;

use crate::error::{Error, Result};
use crate::model::Identification;
use crate::raw::{
    FakeString, RawIdentification, RawLocalizedString, RawSpan, RawStringItem, RawStringPayload,
};

// =============================================================================
// PRIMITIVES
// =============================================================================

/// Restores literal apostrophes escaped by the API.
pub fn restore_apostrophes(text: &str) -> String {
    text.replace("&#39;", "'")
}

/// Stringifies a primitive leaf, restoring apostrophes.
pub fn parse_fake_string(value: &FakeString) -> String {
    restore_apostrophes(&value.as_text())
}

pub fn parse_optional_fake_string(value: &Option<FakeString>) -> Option<String> {
    value.as_ref().map(parse_fake_string)
}

// =============================================================================
// FORMATTING
// =============================================================================

/// Wraps `text` once per render token, in token order.
///
/// `bold italic` applied to `x` yields `***x***`: bold first, then italic
/// around the bold result.
pub fn apply_render_options(text: &str, rend: &str) -> String {
    let mut out = text.to_string();
    for token in rend.split_whitespace() {
        out = match token {
            "bold" => format!("**{}**", out),
            "italic" => format!("*{}*", out),
            "underline" => format!("_{}_", out),
            other => {
                warn!(token = other, "unknown render option");
                out
            }
        };
    }
    out
}

/// Applies whitespace tokens, in token order.
pub fn apply_whitespace_options(text: &str, whitespace: &str) -> String {
    let mut out = text.to_string();
    for token in whitespace.split_whitespace() {
        match token {
            "newline" => out.push_str("  \n"),
            "trailing" => out.push(' '),
            "leading" => out.insert(0, ' '),
            other => warn!(token = other, "unknown whitespace option"),
        }
    }
    out
}

/// Formats a leaf span: render options first, then whitespace options.
pub fn format_span(text: &str, rend: Option<&str>, whitespace: Option<&str>) -> String {
    let rendered = match rend {
        Some(rend) => apply_render_options(text, rend),
        None => text.to_string(),
    };
    match whitespace {
        Some(ws) => apply_whitespace_options(&rendered, ws),
        None => rendered,
    }
}

// =============================================================================
// LANGUAGE SELECTION
// =============================================================================

/// Picks the item for `language` from a list of language-tagged items.
///
/// Selection order: exact language match, then the first item. Fails only
/// when the list is empty.
pub(crate) fn select_language<'a, T>(
    items: &'a [T],
    lang_of: impl Fn(&T) -> Option<&str>,
    language: &str,
    context: &'static str,
) -> Result<&'a T> {
    if let Some(item) = items.iter().find(|i| lang_of(i) == Some(language)) {
        return Ok(item);
    }
    match items.first() {
        Some(item) => {
            if items.len() > 1 {
                warn!(language, context, fallback = ?lang_of(item), "requested language not found, using first item");
            }
            Ok(item)
        }
        None => Err(Error::missing_content(language, context)),
    }
}

fn render_payload(payload: &RawStringPayload) -> String {
    match payload {
        RawStringPayload::Primitive(value) => parse_fake_string(value),
        RawStringPayload::Spans(spans) => spans
            .iter()
            .map(|span| match span {
                RawSpan::Primitive(value) => parse_fake_string(value),
                RawSpan::Formatted(span) => {
                    let text = parse_optional_fake_string(&span.content).unwrap_or_default();
                    format_span(&text, span.rend.as_deref(), span.whitespace.as_deref())
                }
            })
            .collect(),
    }
}

fn render_item(item: &RawStringItem) -> String {
    render_payload(&item.string)
}

/// Resolves a localized string to plain text in the requested language.
pub fn parse_string_content(
    raw: &RawLocalizedString,
    language: &str,
    context: &'static str,
) -> Result<String> {
    match raw {
        RawLocalizedString::Primitive(value) => Ok(parse_fake_string(value)),
        RawLocalizedString::Item(item) => Ok(render_item(item)),
        RawLocalizedString::Items(items) => {
            let item = select_language(items, |i| i.lang.as_deref(), language, context)?;
            Ok(render_item(item))
        }
        RawLocalizedString::Wrapped { content } => parse_string_content(content, language, context),
    }
}

pub fn parse_optional_string(
    raw: &Option<RawLocalizedString>,
    language: &str,
    context: &'static str,
) -> Result<Option<String>> {
    raw.as_ref()
        .map(|r| parse_string_content(r, language, context))
        .transpose()
}

pub fn parse_identification(raw: &RawIdentification, language: &str) -> Result<Identification> {
    Ok(Identification {
        label: parse_string_content(&raw.label, language, "identification label")?,
        abbreviation: parse_optional_string(&raw.abbreviation, language, "identification abbreviation")?
            .unwrap_or_default(),
    })
}

pub fn parse_optional_identification(
    raw: &Option<RawIdentification>,
    language: &str,
) -> Result<Option<Identification>> {
    raw.as_ref()
        .map(|r| parse_identification(r, language))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn localized(json: &str) -> RawLocalizedString {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_render_order() {
        assert_eq!(apply_render_options("x", "bold italic"), "***x***");
        assert_eq!(apply_render_options("x", "italic underline"), "_*x*_");
        assert_eq!(apply_render_options("x", "blink bold"), "**x**");
    }

    #[test]
    fn test_whitespace_options() {
        assert_eq!(apply_whitespace_options("x", "newline"), "x  \n");
        assert_eq!(apply_whitespace_options("x", "leading trailing"), " x ");
    }

    #[test]
    fn test_render_before_whitespace() {
        assert_eq!(format_span("x", Some("bold"), Some("trailing")), "**x** ");
    }

    #[test]
    fn test_language_selection() {
        let raw = localized(r#"[{"lang": "fra", "string": "Jarre"}, {"lang": "eng", "string": "Jar"}]"#);
        assert_eq!(parse_string_content(&raw, "eng", "label").unwrap(), "Jar");
        assert_eq!(parse_string_content(&raw, "spa", "label").unwrap(), "Jarre");
    }

    #[test]
    fn test_first_item_wins_over_later_zxx() {
        let raw = localized(r#"[{"lang": "fra", "string": "Jarre"}, {"lang": "zxx", "string": "J."}]"#);
        assert_eq!(parse_string_content(&raw, "spa", "label").unwrap(), "Jarre");
        assert_eq!(parse_string_content(&raw, "zxx", "label").unwrap(), "J.");
    }

    #[test]
    fn test_empty_items_is_missing_content() {
        let raw = localized("[]");
        let err = parse_string_content(&raw, "eng", "label").unwrap_err();
        assert_eq!(err.kind().name(), "MissingContentError");
    }

    #[test]
    fn test_spans_and_apostrophes() {
        let raw = localized(
            r#"{"lang": "eng", "string": [{"content": "Rock", "rend": "bold", "whitespace": "trailing"}, "isn&#39;t here"]}"#,
        );
        assert_eq!(parse_string_content(&raw, "eng", "label").unwrap(), "**Rock** isn't here");
    }

    #[test]
    fn test_wrapped_and_numeric() {
        assert_eq!(parse_string_content(&localized(r#"{"content": 42}"#), "eng", "x").unwrap(), "42");
    }

    proptest! {
        #[test]
        fn test_fallback_is_first_item(langs in proptest::collection::vec("[a-y]{3}", 1..5)) {
            let items: Vec<RawStringItem> = langs
                .iter()
                .map(|l| serde_json::from_value(serde_json::json!({"lang": l, "string": l})).unwrap())
                .collect();
            let raw = RawLocalizedString::Items(items);
            prop_assert_eq!(parse_string_content(&raw, "zzz", "x").unwrap(), langs[0].clone());
            for lang in &langs {
                prop_assert_eq!(&parse_string_content(&raw, lang, "x").unwrap(), lang);
            }
        }
    }
}
