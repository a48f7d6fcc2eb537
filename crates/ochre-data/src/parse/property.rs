//! Property tree normalization and lookup.

use tracing::warn;

use crate::error::{Error, Result};
use crate::model::{Property, PropertyValue, ValueType};
use crate::parse::string::{parse_fake_string, parse_optional_string, parse_string_content};
use crate::raw::{slice_of, RawProperties, RawProperty, RawPropertyValue};
use crate::util::Timestamp;

// =============================================================================
// NORMALIZATION
// =============================================================================

pub(crate) fn parse_publication_timestamp(value: &Option<String>) -> Result<Option<Timestamp>> {
    value
        .as_deref()
        .map(|s| {
            Timestamp::parse(s).map_err(|_| Error::InvalidTimestamp {
                value: s.to_string(),
            })
        })
        .transpose()
}

fn parse_property_value(raw: &RawPropertyValue) -> Result<PropertyValue> {
    match raw {
        RawPropertyValue::Primitive(value) => Ok(PropertyValue::text(parse_fake_string(value))),
        RawPropertyValue::Typed(value) => {
            let value_type = match value.value_type.as_deref() {
                None => ValueType::String,
                Some(tag) => ValueType::from_tag(tag).unwrap_or_else(|| {
                    warn!(value_type = tag, "unknown property value type, reading as string");
                    ValueType::String
                }),
            };
            Ok(PropertyValue {
                content: value
                    .content
                    .as_ref()
                    .map(parse_fake_string)
                    .unwrap_or_default(),
                value_type,
                category: value.category.clone(),
                uuid: value.uuid,
                publication_date_time: parse_publication_timestamp(&value.publication_date_time)?,
            })
        }
    }
}

/// Strips a trailing "..." (and the whitespace before it) from a label.
pub fn trim_label(label: &str) -> String {
    label.strip_suffix("...").unwrap_or(label).trim().to_string()
}

/// Normalizes one property and, recursively, its children.
pub fn parse_property(raw: &RawProperty, language: &str) -> Result<Property> {
    let label = parse_string_content(&raw.label, language, "property label")?;
    let values = slice_of(&raw.value)
        .iter()
        .map(parse_property_value)
        .collect::<Result<Vec<_>>>()?;
    let properties = slice_of(&raw.property)
        .iter()
        .map(|child| parse_property(child, language))
        .collect::<Result<Vec<_>>>()?;

    Ok(Property {
        label: trim_label(&label),
        values,
        comment: parse_optional_string(&raw.comment, language, "property comment")?,
        properties,
    })
}

pub fn parse_properties(raw: &[RawProperty], language: &str) -> Result<Vec<Property>> {
    raw.iter().map(|p| parse_property(p, language)).collect()
}

/// Normalizes an optional `properties` wrapper, yielding an empty list when absent.
pub fn parse_properties_block(raw: &Option<RawProperties>, language: &str) -> Result<Vec<Property>> {
    match raw {
        Some(block) => parse_properties(block.property.as_slice(), language),
        None => Ok(Vec::new()),
    }
}

// =============================================================================
// LOOKUP
// =============================================================================

/// Finds a property by exact label: the current level first, then each
/// child subtree depth-first when `recursive` is set.
pub fn find_property<'a>(properties: &'a [Property], label: &str, recursive: bool) -> Option<&'a Property> {
    if let Some(found) = properties.iter().find(|p| p.label == label) {
        return Some(found);
    }
    if recursive {
        for property in properties {
            if let Some(found) = find_property(&property.properties, label, true) {
                return Some(found);
            }
        }
    }
    None
}

/// Content of the first value of the property labeled `label`.
pub fn find_property_value<'a>(properties: &'a [Property], label: &str, recursive: bool) -> Option<&'a str> {
    find_property(properties, label, recursive).and_then(Property::first_value)
}

/// Contents of every value of the property labeled `label`.
pub fn find_property_values<'a>(
    properties: &'a [Property],
    label: &str,
    recursive: bool,
) -> Option<Vec<&'a str>> {
    find_property(properties, label, recursive)
        .map(|p| p.values.iter().map(|v| v.content.as_str()).collect())
}

pub fn property_labels(properties: &[Property]) -> Vec<&str> {
    properties.iter().map(|p| p.label.as_str()).collect()
}

/// Properties labeled `label` that carry a value equal to `value`.
pub fn filter_properties<'a>(
    properties: &'a [Property],
    label: &str,
    value: &str,
    recursive: bool,
) -> Vec<&'a Property> {
    let mut out = Vec::new();
    collect_matching(properties, label, value, recursive, &mut out);
    out
}

fn collect_matching<'a>(
    properties: &'a [Property],
    label: &str,
    value: &str,
    recursive: bool,
    out: &mut Vec<&'a Property>,
) {
    for property in properties {
        if property.label == label && property.has_value(value) {
            out.push(property);
        }
        if recursive {
            collect_matching(&property.properties, label, value, true, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn props(json: &str) -> Vec<Property> {
        let raw: RawProperties = serde_json::from_str(json).unwrap();
        parse_properties(raw.property.as_slice(), "eng").unwrap()
    }

    #[test]
    fn test_label_ellipsis_trimmed() {
        assert_eq!(trim_label("Material ..."), "Material");
        assert_eq!(trim_label("Material..."), "Material");
        assert_eq!(trim_label("A...B"), "A...B");
    }

    #[test]
    fn test_value_types() {
        let parsed = props(
            r#"{"property": {"label": "Size", "value": [
                "small",
                {"content": 12, "type": "integer"},
                {"content": "x", "type": "hologram"},
                {"type": "string"},
                {"content": "Rim", "category": "value", "uuid": "5b2a7a2c-1f3e-4a55-9f4a-0c9d1e2f3a4b"}
            ]}}"#,
        );
        let values = &parsed[0].values;
        assert_eq!(values[0], PropertyValue::text("small"));
        assert_eq!(values[1].value_type, ValueType::Integer);
        assert_eq!(values[1].as_i64(), Some(12));
        assert_eq!(values[2].value_type, ValueType::String);
        assert_eq!(values[3].content, "");
        assert_eq!(values[4].value_type, ValueType::String);
        assert!(values[4].uuid.is_some());
    }

    #[test]
    fn test_lookup_levels() {
        let parsed = props(
            r#"{"property": [
                {"label": "presentation", "value": "page", "property": [
                    {"label": "width", "value": "full"},
                    {"label": "header", "value": "No"}
                ]},
                {"label": "width", "value": "narrow"}
            ]}"#,
        );
        assert_eq!(find_property_value(&parsed, "width", true), Some("narrow"));
        assert_eq!(find_property_value(&parsed, "header", false), None);
        assert_eq!(find_property_value(&parsed, "header", true), Some("No"));
        assert_eq!(find_property_values(&parsed, "missing", true), None);
        assert_eq!(property_labels(&parsed), vec!["presentation", "width"]);
        assert_eq!(filter_properties(&parsed, "width", "full", true).len(), 1);
        assert!(filter_properties(&parsed, "width", "full", false).is_empty());
    }

    #[test]
    fn test_bad_value_timestamp() {
        let raw: RawProperties = serde_json::from_str(
            r#"{"property": {"label": "x", "value": {"content": "y", "publicationDateTime": "yesterday"}}}"#,
        )
        .unwrap();
        let err = parse_properties(raw.property.as_slice(), "eng").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { .. }));
    }
}
