//! Wire types for localized strings, rich-text documents and notes.

use serde::Deserialize;

use crate::raw::{FakeString, OneOrMany, RawLink};

// =============================================================================
// LOCALIZED STRINGS
// =============================================================================

/// A string field that may be localized.
///
/// Variant order matters for untagged deserialization: an object carrying
/// `string` is an item, an object carrying only `content` is a wrapper.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawLocalizedString {
    /// Bare text with no language information.
    Primitive(FakeString),
    /// A single language item.
    Item(RawStringItem),
    /// Several language items, one per language.
    Items(Vec<RawStringItem>),
    /// `{ "content": ... }` wrapper around any of the above.
    Wrapped { content: Box<RawLocalizedString> },
}

impl From<&str> for RawLocalizedString {
    fn from(s: &str) -> Self {
        RawLocalizedString::Primitive(FakeString::from(s))
    }
}

/// One language's rendition of a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawStringItem {
    #[serde(default)]
    pub lang: Option<String>,
    pub string: RawStringPayload,
}

/// The text of a language item: plain, or a sequence of formatted spans.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawStringPayload {
    Primitive(FakeString),
    Spans(OneOrMany<RawSpan>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawSpan {
    Primitive(FakeString),
    Formatted(RawFormattedSpan),
}

/// A span with space-separated render (`bold italic`) and whitespace
/// (`leading trailing newline`) option lists.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawFormattedSpan {
    #[serde(default)]
    pub content: Option<FakeString>,
    #[serde(default)]
    pub rend: Option<String>,
    #[serde(default)]
    pub whitespace: Option<String>,
}

// =============================================================================
// RICH-TEXT DOCUMENTS
// =============================================================================

/// A rich-text document, one item per language.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDocument {
    pub content: OneOrMany<RawDocumentItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDocumentItem {
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub title: Option<FakeString>,
    pub string: OneOrMany<RawRichNode>,
}

/// A node of a rich-text tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawRichNode {
    Primitive(FakeString),
    Object(Box<RawRichObject>),
}

/// The object form of a rich-text node.
///
/// Its kind is decided by key presence, scanned in the order
/// `annotation`, `content`, `string`, `whitespace`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawRichObject {
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub content: Option<FakeString>,
    #[serde(default)]
    pub string: Option<OneOrMany<RawRichNode>>,
    #[serde(default)]
    pub rend: Option<String>,
    #[serde(default)]
    pub whitespace: Option<String>,
    #[serde(default)]
    pub links: Option<OneOrMany<RawLink>>,
}

// =============================================================================
// NOTES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawNotes {
    #[serde(default)]
    pub note: OneOrMany<RawNote>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNote {
    Primitive(FakeString),
    Structured(RawStructuredNote),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStructuredNote {
    #[serde(default)]
    pub note_no: Option<i64>,
    pub content: RawNoteContent,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNoteContent {
    Primitive(FakeString),
    Items(OneOrMany<RawDocumentItem>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_string_shapes() {
        let s: RawLocalizedString = serde_json::from_str(r#""Jar""#).unwrap();
        assert!(matches!(s, RawLocalizedString::Primitive(_)));

        let s: RawLocalizedString =
            serde_json::from_str(r#"{"lang": "eng", "string": "Jar"}"#).unwrap();
        assert!(matches!(s, RawLocalizedString::Item(_)));

        let s: RawLocalizedString = serde_json::from_str(
            r#"[{"lang": "fra", "string": "Jarre"}, {"lang": "eng", "string": "Jar"}]"#,
        )
        .unwrap();
        assert!(matches!(s, RawLocalizedString::Items(ref items) if items.len() == 2));

        let s: RawLocalizedString =
            serde_json::from_str(r#"{"content": {"lang": "eng", "string": "Jar"}}"#).unwrap();
        assert!(matches!(s, RawLocalizedString::Wrapped { .. }));
    }

    #[test]
    fn test_string_payload_spans() {
        let item: RawStringItem = serde_json::from_str(
            r#"{"lang": "eng", "string": [{"content": "x", "rend": "bold"}, " tail"]}"#,
        )
        .unwrap();
        match item.string {
            RawStringPayload::Spans(spans) => assert_eq!(spans.len(), 2),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_rich_node_object() {
        let node: RawRichNode = serde_json::from_str(
            r#"{"annotation": "a1", "string": "see", "links": {"concept": {"uuid": "5b2a7a2c-1f3e-4a55-9f4a-0c9d1e2f3a4b"}}}"#,
        )
        .unwrap();
        match node {
            RawRichNode::Object(obj) => {
                assert_eq!(obj.annotation.as_deref(), Some("a1"));
                assert!(obj.links.is_some());
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_note_shapes() {
        let notes: RawNotes = serde_json::from_str(
            r#"{"note": ["", {"noteNo": 2, "content": [{"lang": "eng", "string": "Hi"}]}]}"#,
        )
        .unwrap();
        assert_eq!(notes.note.len(), 2);
        assert!(matches!(notes.note.as_slice()[0], RawNote::Primitive(_)));
    }
}
