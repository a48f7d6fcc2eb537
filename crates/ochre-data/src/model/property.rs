//! Property trees and typed property values.

use serde::Serialize;
use uuid::Uuid;

use crate::util::{parse_date_rfc3339, parse_time_rfc3339, DateTimeParseError, Timestamp};

/// Type tag of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "dateTime")]
    DateTime,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "IDREF")]
    IdRef,
}

impl ValueType {
    /// Maps a wire tag to a value type.
    pub fn from_tag(tag: &str) -> Option<ValueType> {
        match tag {
            "string" => Some(ValueType::String),
            "number" | "decimal" => Some(ValueType::Number),
            "integer" => Some(ValueType::Integer),
            "boolean" => Some(ValueType::Boolean),
            "date" => Some(ValueType::Date),
            "dateTime" => Some(ValueType::DateTime),
            "time" => Some(ValueType::Time),
            "IDREF" => Some(ValueType::IdRef),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Integer => "integer",
            ValueType::Boolean => "boolean",
            ValueType::Date => "date",
            ValueType::DateTime => "dateTime",
            ValueType::Time => "time",
            ValueType::IdRef => "IDREF",
        }
    }
}

/// One typed value of a property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    pub content: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub category: Option<String>,
    pub uuid: Option<Uuid>,
    pub publication_date_time: Option<Timestamp>,
}

impl PropertyValue {
    /// A plain string value with no category or reference.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            value_type: ValueType::String,
            category: None,
            uuid: None,
            publication_date_time: None,
        }
    }

    /// Reads the content as a boolean ("Yes"/"No", "true"/"false").
    pub fn as_bool(&self) -> Option<bool> {
        match self.content.as_str() {
            "Yes" | "true" => Some(true),
            "No" | "false" => Some(false),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.content.trim().parse().ok()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.content.trim().parse().ok()
    }

    /// Parses a `dateTime` value.
    pub fn as_timestamp(&self) -> Result<Timestamp, DateTimeParseError> {
        Timestamp::parse(&self.content)
    }

    /// Parses a `date` value into (days since epoch, offset minutes).
    pub fn as_date(&self) -> Result<(i32, i16), DateTimeParseError> {
        parse_date_rfc3339(&self.content)
    }

    /// Parses a `time` value into (microseconds since midnight, offset minutes).
    pub fn as_time(&self) -> Result<(i64, i16), DateTimeParseError> {
        parse_time_rfc3339(&self.content)
    }
}

/// A labeled property with its values and child properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub label: String,
    pub values: Vec<PropertyValue>,
    pub comment: Option<String>,
    pub properties: Vec<Property>,
}

impl Property {
    /// Content of the first value, if any.
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(|v| v.content.as_str())
    }

    /// Returns true if any value's content equals `content`.
    pub fn has_value(&self, content: &str) -> bool {
        self.values.iter().any(|v| v.content == content)
    }
}
