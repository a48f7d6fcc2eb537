//! Rendered rich text.

use serde::Serialize;
use uuid::Uuid;

/// A deferred-content marker extracted while rendering a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footnote {
    pub uuid: Uuid,
    pub label: String,
    /// Left empty by the renderer; filled by a later fetch of the target.
    pub content: String,
}

/// Rendered markup plus the footnotes it references, in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Document {
    pub content: String,
    pub footnotes: Vec<Footnote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub number: Option<i64>,
    pub title: Option<String>,
    pub content: String,
}
