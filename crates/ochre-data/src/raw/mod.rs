//! Wire types for the OCHRE API JSON.
//!
//! The API serializes XML, so the JSON is loosely shaped:
//! - any element may appear once (object) or repeatedly (array): [`OneOrMany`]
//! - text leaves may arrive as strings, numbers or booleans: [`FakeString`]
//! - unions are encoded by which key is present rather than by a tag
//!
//! These types only describe shapes; all semantics live in [`crate::parse`].

pub mod entity;
pub mod text;

use std::borrow::Cow;

use serde::Deserialize;

pub use entity::{
    RawAuthors, RawAvailability, RawBibliography, RawBibliographySource,
    RawBibliographySourceResource, RawCitedBibliography,
    RawConcept, RawContext, RawContextItem, RawContextNode, RawCoordinate, RawCoordinates,
    RawCreators, RawEntryInfo, RawEnvelope, RawEvent, RawEventAgent, RawEvents, RawIdentification,
    RawImage, RawInterpretation, RawInterpretations, RawItem, RawItems, RawLicense, RawLink,
    RawLinkItem, RawMetadata, RawMetadataItem, RawMetadataProject, RawObservation,
    RawObservations, RawPeriod, RawPeriods, RawPerson, RawProperties, RawProperty,
    RawPropertyValue, RawPublicationInfo, RawPublishers, RawResource, RawResponse, RawResult,
    RawSet, RawSpatialUnit, RawStartDate, RawTree, RawTypedValue,
};
pub use text::{
    RawDocument, RawDocumentItem, RawFormattedSpan, RawLocalizedString, RawNote, RawNoteContent,
    RawNotes, RawRichNode, RawRichObject, RawSpan, RawStringItem, RawStringPayload,
    RawStructuredNote,
};

// =============================================================================
// CARDINALITY
// =============================================================================

/// A field that the API emits either as a single value or as an array.
///
/// Normalization is total: [`OneOrMany::as_slice`] and [`OneOrMany::into_vec`]
/// always yield a uniform sequence, wrapping a singleton.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// Wraps a single value.
    pub fn one(value: T) -> Self {
        OneOrMany::One(value)
    }

    /// Borrows the values as a slice.
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(values) => values,
            OneOrMany::One(value) => std::slice::from_ref(value),
        }
    }

    /// Consumes the field, returning its values as a vector.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(values) => values,
            OneOrMany::One(value) => vec![value],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        OneOrMany::Many(values)
    }
}

impl<'a, T> IntoIterator for &'a OneOrMany<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Normalizes an optional single-or-array field into a slice (empty when absent).
pub fn slice_of<T>(field: &Option<OneOrMany<T>>) -> &[T] {
    field.as_ref().map(OneOrMany::as_slice).unwrap_or(&[])
}

// =============================================================================
// PRIMITIVES
// =============================================================================

/// A text leaf that the XML-to-JSON conversion may have typed as a number or boolean.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FakeString {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl FakeString {
    /// Returns the literal text, without any unescaping.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FakeString::Text(s) => Cow::Borrowed(s),
            FakeString::Number(n) => Cow::Owned(n.to_string()),
            FakeString::Bool(b) => Cow::Owned(b.to_string()),
        }
    }

    /// Returns true for the empty string (numbers and booleans are never empty).
    pub fn is_empty(&self) -> bool {
        matches!(self, FakeString::Text(s) if s.is_empty())
    }
}

impl From<&str> for FakeString {
    fn from(s: &str) -> Self {
        FakeString::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Serialize;
    use serde_json::{json, Value};

    #[test]
    fn test_one_or_many_wraps_singleton() {
        let one: OneOrMany<u32> = serde_json::from_str("7").unwrap();
        assert_eq!(one.as_slice(), &[7]);

        let many: OneOrMany<u32> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(many.into_vec(), vec![1, 2]);
    }

    #[test]
    fn test_one_or_many_objects() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Item {
            n: u32,
        }

        let one: OneOrMany<Item> = serde_json::from_str(r#"{"n": 1}"#).unwrap();
        assert_eq!(one.len(), 1);
        let many: OneOrMany<Item> = serde_json::from_str(r#"[{"n": 1}, {"n": 2}]"#).unwrap();
        assert_eq!(many.iter().map(|i| i.n).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_slice_of_absent_field() {
        let absent: Option<OneOrMany<u32>> = None;
        assert!(slice_of(&absent).is_empty());
    }

    #[test]
    fn test_fake_string_variants() {
        let values: Vec<FakeString> = serde_json::from_str(r#"["a", 12, 1.5, true]"#).unwrap();
        let texts: Vec<_> = values.iter().map(|v| v.as_text().into_owned()).collect();
        assert_eq!(texts, vec!["a", "12", "1.5", "true"]);
        assert!(FakeString::from("").is_empty());
        assert!(!FakeString::Bool(false).is_empty());
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        uuid: String,
        n: u32,
    }

    fn normalize(value: Value) -> Vec<Entry> {
        serde_json::from_value::<OneOrMany<Entry>>(value).unwrap().into_vec()
    }

    proptest! {
        #[test]
        fn test_normalizing_twice_is_stable(
            ns in proptest::collection::vec(0u32..1000, 0..6),
            single in any::<bool>(),
        ) {
            let entries: Vec<Value> = ns.iter().map(|n| json!({"uuid": format!("u{n}"), "n": n})).collect();
            let (raw, expected) = match entries.first() {
                Some(first) if single => (first.clone(), 1),
                _ => (Value::Array(entries.clone()), entries.len()),
            };

            let once = normalize(raw);
            prop_assert_eq!(once.len(), expected);
            let twice = normalize(serde_json::to_value(&once).unwrap());
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(OneOrMany::from(once.clone()).into_vec(), once);
        }
    }
}
