//! Rich-text document rendering.
//!
//! A document is a tree of rich nodes. Rendering flattens it into one
//! markup string, turning annotations into link tokens and collecting
//! footnotes as it goes:
//!
//! ```text
//! <ExternalLink href="..." type="concept">Jar</ExternalLink>
//! <TooltipSpan type="person">Smith</TooltipSpan>
//! <InlineImage uuid="..." height=10 width=20 />
//!  <Footnote uuid="..." label="1" />
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{Document, Footnote, LinkVariant, Note};
use crate::parse::link::{first_target, LinkTarget};
use crate::parse::string::{
    apply_whitespace_options, format_span, parse_fake_string, parse_optional_fake_string,
    parse_string_content, restore_apostrophes, select_language,
};
use crate::raw::{
    RawDocument, RawDocumentItem, RawNote, RawNoteContent, RawNotes, RawRichNode, RawRichObject,
};
use crate::url::load_url;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap();
    static ref URL: Regex = Regex::new(r"^https?://[^\s<>]+$").unwrap();
}

const OPENING_BRACKETS: &[char] = &['(', '[', '{', '<', '"', '\''];
const CLOSING_MARKS: &[char] = &[')', ']', '}', '>', '"', '\'', '.', ',', ';', ':', '!', '?'];

// =============================================================================
// AUTOLINKS
// =============================================================================

/// Wraps bare email addresses and URLs in `<ExternalLink>` tokens.
///
/// Words are split on spaces; surrounding brackets and trailing punctuation
/// stay outside the token.
pub fn autolinkify(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let start = word.len() - word.trim_start_matches(OPENING_BRACKETS).len();
            let end = word.trim_end_matches(CLOSING_MARKS).len().max(start);
            let (prefix, core, suffix) = (&word[..start], &word[start..end], &word[end..]);
            if EMAIL.is_match(core) {
                format!(
                    "{}<ExternalLink href=\"mailto:{}\">{}</ExternalLink>{}",
                    prefix, core, core, suffix
                )
            } else if URL.is_match(core) {
                format!("{}<ExternalLink href=\"{}\">{}</ExternalLink>{}", prefix, core, core, suffix)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// ANNOTATIONS
// =============================================================================

/// Escapes characters the downstream markup parser treats as syntax.
pub fn escape_markup(text: &str) -> String {
    text.replace('<', "\\<").replace('{', "\\{")
}

fn content_attr(content: &Option<String>) -> String {
    match content {
        Some(c) => format!(" content=\"{}\"", c),
        None => String::new(),
    }
}

fn clickable_or_tooltip(target: &LinkTarget<'_>, tag: &str, text: &str, content: &Option<String>) -> String {
    if target.is_published {
        format!(
            "<ExternalLink href=\"{}\" type=\"{}\"{}>{}</ExternalLink>",
            load_url(&target.uuid),
            tag,
            content_attr(content),
            text
        )
    } else {
        format!("<TooltipSpan type=\"{}\"{}>{}</TooltipSpan>", tag, content_attr(content), text)
    }
}

fn optional_dimension(value: Option<u32>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}

fn is_footnote(target: &LinkTarget<'_>, language: &str) -> Result<bool> {
    if let Some(content) = &target.content {
        if content.to_lowercase().contains("footnote") {
            return Ok(true);
        }
    }
    match target.identification {
        Some(id) => Ok(parse_string_content(&id.label, language, "link label")?
            .to_lowercase()
            .contains("footnote")),
        None => Ok(false),
    }
}

fn render_annotation(
    object: &RawRichObject,
    language: &str,
    footnotes: &mut Vec<Footnote>,
) -> Result<String> {
    let display = match (&object.string, &object.content) {
        (Some(nodes), _) => render_node_list(nodes.as_slice(), language, footnotes, false)?,
        (None, Some(content)) => parse_fake_string(content),
        (None, None) => String::new(),
    };
    let text = escape_markup(&display);

    let links = object.links.as_ref().map(|l| l.as_slice()).unwrap_or(&[]);
    // Only the first link is rendered.
    let Some(link) = links.first() else {
        return Ok(text);
    };
    let Some(target) = first_target(link)? else {
        return Ok(text);
    };
    let content = target
        .content
        .as_ref()
        .map(|c| escape_markup(&restore_apostrophes(c)));

    let markup = match target.variant {
        LinkVariant::Resource => match target.link_type {
            Some("image") if target.rend == Some("inline") => format!(
                "<InlineImage uuid=\"{}\"{} height={} width={} />",
                target.uuid,
                content_attr(&content),
                optional_dimension(target.height),
                optional_dimension(target.width)
            ),
            Some("internalDocument") if is_footnote(&target, language)? => {
                footnotes.push(Footnote {
                    uuid: target.uuid,
                    label: display.clone(),
                    content: String::new(),
                });
                let label = if text.is_empty() {
                    String::new()
                } else {
                    format!(" label=\"{}\"", text)
                };
                format!(" <Footnote uuid=\"{}\"{}{} />", target.uuid, label, content_attr(&content))
            }
            Some(tag @ ("image" | "internalDocument" | "externalDocument")) => {
                clickable_or_tooltip(&target, tag, &text, &content)
            }
            other => {
                debug!(link_type = ?other, "annotation over resource type without markup");
                text
            }
        },
        LinkVariant::Concept | LinkVariant::Set | LinkVariant::Bibliography => {
            clickable_or_tooltip(&target, target.variant.as_str(), &text, &content)
        }
        LinkVariant::Person => {
            let tag = target.link_type.unwrap_or("person");
            clickable_or_tooltip(&target, tag, &text, &content)
        }
        LinkVariant::Tree | LinkVariant::SpatialUnit | LinkVariant::EpigraphicUnit => text,
    };

    Ok(match object.whitespace.as_deref() {
        Some(ws) => apply_whitespace_options(&markup, ws),
        None => markup,
    })
}

// =============================================================================
// NODES
// =============================================================================

fn render_object(
    object: &RawRichObject,
    language: &str,
    footnotes: &mut Vec<Footnote>,
    autolink: bool,
) -> Result<String> {
    if object.annotation.is_some() {
        return render_annotation(object, language, footnotes);
    }
    if let Some(content) = &object.content {
        return Ok(format_span(
            &parse_fake_string(content),
            object.rend.as_deref(),
            object.whitespace.as_deref(),
        ));
    }
    if let Some(nodes) = &object.string {
        let inner = render_node_list(nodes.as_slice(), language, footnotes, autolink)?;
        return Ok(match object.whitespace.as_deref() {
            Some(ws) => apply_whitespace_options(&inner, ws),
            None => inner,
        });
    }
    if let Some(ws) = &object.whitespace {
        let is_newline = ws.split_whitespace().any(|t| t == "newline");
        return Ok(if is_newline { "\n".to_string() } else { String::new() });
    }
    warn!("rich-text node with no recognized keys");
    Ok(String::new())
}

/// Renders a node list. Annotation display text is rendered with `autolink`
/// off, since it is escaped and wrapped in the annotation's own markup.
fn render_node_list(
    nodes: &[RawRichNode],
    language: &str,
    footnotes: &mut Vec<Footnote>,
    autolink: bool,
) -> Result<String> {
    let mut out = String::new();
    for node in nodes {
        match node {
            RawRichNode::Primitive(value) => {
                let text = parse_fake_string(value);
                out.push_str(&if autolink { autolinkify(&text) } else { text });
            }
            RawRichNode::Object(object) => {
                out.push_str(&render_object(object, language, footnotes, autolink)?)
            }
        }
    }
    Ok(out)
}

/// Renders a node list in order, appending any footnotes it contains.
pub fn render_nodes(nodes: &[RawRichNode], language: &str, footnotes: &mut Vec<Footnote>) -> Result<String> {
    render_node_list(nodes, language, footnotes, true)
}

/// Strips leading line breaks and trailing line-break markers until none remain.
pub fn trim_line_breaks(text: &str) -> &str {
    let mut s = text;
    loop {
        let next = s
            .strip_prefix('\n')
            .or_else(|| s.strip_suffix("  \n"))
            .or_else(|| s.strip_suffix('\n'));
        match next {
            Some(rest) => s = rest,
            None => return s,
        }
    }
}

fn render_item(item: &RawDocumentItem, language: &str) -> Result<Document> {
    let mut footnotes = Vec::new();
    let content = render_nodes(item.string.as_slice(), language, &mut footnotes)?;
    Ok(Document {
        content: trim_line_breaks(&content).to_string(),
        footnotes,
    })
}

fn select_item<'a>(items: &'a [RawDocumentItem], language: &str, context: &'static str) -> Result<&'a RawDocumentItem> {
    select_language(items, |i| i.lang.as_deref(), language, context)
}

/// Renders the document in the requested language.
///
/// Footnotes are local to this call.
pub fn parse_document(raw: &RawDocument, language: &str) -> Result<Document> {
    let item = select_item(raw.content.as_slice(), language, "document")?;
    render_item(item, language)
}

// =============================================================================
// NOTES
// =============================================================================

/// Renders one note. An empty-string note yields `None`.
pub fn parse_note(raw: &RawNote, language: &str) -> Result<Option<Note>> {
    let (number, content) = match raw {
        RawNote::Primitive(value) => (None, RawNoteContent::Primitive(value.clone())),
        RawNote::Structured(note) => (note.note_no, note.content.clone()),
    };
    match content {
        RawNoteContent::Primitive(value) if value.is_empty() => Ok(None),
        RawNoteContent::Primitive(value) => Ok(Some(Note {
            number,
            title: None,
            content: parse_fake_string(&value),
        })),
        RawNoteContent::Items(items) => {
            let item = select_item(items.as_slice(), language, "note")?;
            let document = render_item(item, language)?;
            Ok(Some(Note {
                number,
                title: parse_optional_fake_string(&item.title),
                content: document.content,
            }))
        }
    }
}

pub fn parse_notes(raw: &RawNotes, language: &str) -> Result<Vec<Note>> {
    let mut notes = Vec::new();
    for note in raw.note.iter() {
        if let Some(note) = parse_note(note, language)? {
            notes.push(note);
        }
    }
    Ok(notes)
}

pub fn parse_optional_notes(raw: &Option<RawNotes>, language: &str) -> Result<Vec<Note>> {
    match raw {
        Some(notes) => parse_notes(notes, language),
        None => Ok(Vec::new()),
    }
}

pub fn parse_optional_document(raw: &Option<RawDocument>, language: &str) -> Result<Option<Document>> {
    raw.as_ref().map(|d| parse_document(d, language)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const UUID: &str = "5b2a7a2c-1f3e-4a55-9f4a-0c9d1e2f3a4b";

    fn doc(json: &str) -> RawDocument {
        serde_json::from_str(json).unwrap()
    }

    fn render(json: &str) -> Document {
        parse_document(&doc(json), "eng").unwrap()
    }

    #[test]
    fn test_autolinkify() {
        assert_eq!(
            autolinkify("mail (me@example.org) now"),
            "mail (<ExternalLink href=\"mailto:me@example.org\">me@example.org</ExternalLink>) now"
        );
        assert_eq!(
            autolinkify("see https://example.org."),
            "see <ExternalLink href=\"https://example.org\">https://example.org</ExternalLink>."
        );
        assert_eq!(autolinkify("plain words"), "plain words");
    }

    #[test]
    fn test_formatted_and_whitespace_nodes() {
        let d = render(
            r#"{"content": {"lang": "eng", "string": [
                {"whitespace": "newline"},
                {"content": "x", "rend": "bold italic", "whitespace": "trailing"},
                "tail",
                {"whitespace": "newline"}
            ]}}"#,
        );
        assert_eq!(d.content, "***x*** tail");
    }

    #[test]
    fn test_composite_applies_own_whitespace() {
        let d = render(
            r#"{"content": {"string": [{"string": [{"content": "a", "rend": "italic"}, "b"], "whitespace": "leading"}]}}"#,
        );
        assert_eq!(d.content, " *a*b");
    }

    #[test]
    fn test_concept_annotation_clickable() {
        let d = render(&format!(
            r#"{{"content": {{"string": {{"annotation": "{UUID}", "string": "Jar<1>", "links": {{"concept": {{"uuid": "{UUID}", "publicationDateTime": "2024-01-01T00:00:00Z"}}}}}}}}}}"#
        ));
        assert_eq!(
            d.content,
            format!(
                "<ExternalLink href=\"https://ochre.lib.uchicago.edu/ochre?uuid={UUID}&load\" type=\"concept\">Jar\\<1></ExternalLink>"
            )
        );
    }

    #[test]
    fn test_person_annotation_tooltip_uses_own_type() {
        let d = render(&format!(
            r#"{{"content": {{"string": {{"annotation": "a", "string": "Smith", "links": {{"person": {{"uuid": "{UUID}", "type": "author", "content": "{{A}}"}}}}}}}}}}"#
        ));
        assert_eq!(d.content, "<TooltipSpan type=\"author\" content=\"\\{A}\">Smith</TooltipSpan>");
    }

    #[test]
    fn test_inline_image() {
        let d = render(&format!(
            r#"{{"content": {{"string": {{"annotation": "a", "string": "pic", "links": {{"resource": {{"uuid": "{UUID}", "type": "image", "rend": "inline", "width": 40}}}}}}}}}}"#
        ));
        assert_eq!(d.content, format!("<InlineImage uuid=\"{UUID}\" height=null width=40 />"));
    }

    #[test]
    fn test_footnote_extracted() {
        let d = render(&format!(
            r#"{{"content": {{"string": ["Text", {{"annotation": "a", "string": "1", "links": {{"resource": {{"uuid": "{UUID}", "type": "internalDocument", "content": "FOOTNOTE 1"}}}}}}]}}}}"#
        ));
        assert_eq!(d.footnotes.len(), 1);
        assert_eq!(d.footnotes[0].uuid.to_string(), UUID);
        assert_eq!(d.footnotes[0].label, "1");
        assert!(!d.content.contains("ExternalLink"));
        assert_eq!(
            d.content,
            format!("Text <Footnote uuid=\"{UUID}\" label=\"1\" content=\"FOOTNOTE 1\" />")
        );
    }

    #[test]
    fn test_footnote_detected_from_link_label() {
        let d = render(&format!(
            r#"{{"content": {{"string": ["Text", {{"annotation": "a", "string": "3", "links": {{"resource": {{"uuid": "{UUID}", "type": "internalDocument", "identification": {{"label": "See FootNote 3"}}}}}}}}]}}}}"#
        ));
        assert_eq!(d.footnotes.len(), 1);
        assert_eq!(d.footnotes[0].uuid.to_string(), UUID);
        assert_eq!(d.content, format!("Text <Footnote uuid=\"{UUID}\" label=\"3\" />"));

        // Same link without any footnote marker stays a tooltip.
        let d = render(&format!(
            r#"{{"content": {{"string": {{"annotation": "a", "string": "3", "links": {{"resource": {{"uuid": "{UUID}", "type": "internalDocument", "identification": {{"label": "Appendix"}}}}}}}}}}}}"#
        ));
        assert!(d.footnotes.is_empty());
        assert_eq!(d.content, "<TooltipSpan type=\"internalDocument\">3</TooltipSpan>");
    }

    #[test]
    fn test_annotation_text_not_autolinked() {
        let d = render(&format!(
            r#"{{"content": {{"string": {{"annotation": "a", "string": "https://x.org", "links": {{"concept": {{"uuid": "{UUID}"}}}}}}}}}}"#
        ));
        assert_eq!(d.content, "<TooltipSpan type=\"concept\">https://x.org</TooltipSpan>");

        let d = render(r#"{"content": {"string": ["see ", "https://x.org"]}}"#);
        assert_eq!(
            d.content,
            "see <ExternalLink href=\"https://x.org\">https://x.org</ExternalLink>"
        );
    }

    #[test]
    fn test_only_first_link_rendered() {
        let d = render(&format!(
            r#"{{"content": {{"string": {{"annotation": "a", "string": "x", "links": [{{"tree": {{"uuid": "{UUID}"}}}}, {{"concept": {{"uuid": "{UUID}"}}}}]}}}}}}"#
        ));
        assert_eq!(d.content, "x");
    }

    #[test]
    fn test_invalid_annotation_link() {
        let err = parse_document(
            &doc(r#"{"content": {"string": {"annotation": "a", "string": "x", "links": {"period": {}}}}}"#),
            "eng",
        )
        .unwrap_err();
        assert_eq!(err.kind().name(), "InvalidLinkError");
    }

    #[test]
    fn test_language_selection_and_empty_document() {
        let d = render(r#"{"content": [{"lang": "fra", "string": "Bonjour"}, {"lang": "eng", "string": "Hello"}]}"#);
        assert_eq!(d.content, "Hello");

        let err = parse_document(&doc(r#"{"content": []}"#), "eng").unwrap_err();
        assert_eq!(err.kind().name(), "MissingContentError");
    }

    #[test]
    fn test_trim_line_breaks() {
        assert_eq!(trim_line_breaks("\n\nx  \n\n"), "x");
        assert_eq!(trim_line_breaks("a\nb"), "a\nb");
    }

    #[test]
    fn test_notes() {
        let notes: RawNotes = serde_json::from_str(
            r#"{"note": ["", "Plain", {"noteNo": 2, "content": {"lang": "eng", "title": "T", "string": "Body"}}, {"content": ""}]}"#,
        )
        .unwrap();
        let parsed = parse_notes(&notes, "eng").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].content, "Plain");
        assert_eq!(parsed[1].number, Some(2));
        assert_eq!(parsed[1].title.as_deref(), Some("T"));
        assert_eq!(parsed[1].content, "Body");
    }

    #[test]
    fn test_note_with_empty_items_fails() {
        let notes: RawNotes = serde_json::from_str(r#"{"note": {"content": []}}"#).unwrap();
        let err = parse_notes(&notes, "eng").unwrap_err();
        assert_eq!(err.kind().name(), "MissingContentError");
    }
}
