//! Wire types for properties, links, entities and the response envelope.

use std::collections::BTreeMap;

use serde::Deserialize;
use uuid::Uuid;

use crate::raw::{FakeString, OneOrMany, RawDocument, RawLocalizedString, RawNotes};

// =============================================================================
// SHARED BLOCKS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawIdentification {
    pub label: RawLocalizedString,
    #[serde(default)]
    pub abbreviation: Option<RawLocalizedString>,
}

impl RawIdentification {
    /// Identification with a plain, language-less label.
    pub fn plain(label: &str) -> Self {
        Self {
            label: RawLocalizedString::from(label),
            abbreviation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContext {
    pub context: OneOrMany<RawContextNode>,
    #[serde(default)]
    pub display_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContextNode {
    pub tree: RawContextItem,
    pub project: RawContextItem,
    #[serde(default)]
    pub spatial_unit: Option<OneOrMany<RawContextItem>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContextItem {
    pub uuid: Uuid,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default)]
    pub n: Option<i64>,
    pub content: FakeString,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAvailability {
    pub license: RawLicense,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawLicense {
    #[serde(default)]
    pub target: Option<String>,
    pub content: FakeString,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default)]
    pub identification: Option<RawIdentification>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub html_img_src_prefix: Option<String>,
    #[serde(default)]
    pub content: Option<FakeString>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

// =============================================================================
// PROPERTIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawProperties {
    #[serde(default)]
    pub property: OneOrMany<RawProperty>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawProperty {
    pub label: RawLocalizedString,
    #[serde(default)]
    pub value: Option<OneOrMany<RawPropertyValue>>,
    #[serde(default)]
    pub comment: Option<RawLocalizedString>,
    #[serde(default)]
    pub property: Option<OneOrMany<Box<RawProperty>>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPropertyValue {
    Primitive(FakeString),
    Typed(RawTypedValue),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTypedValue {
    #[serde(default)]
    pub content: Option<FakeString>,
    #[serde(default, rename = "type")]
    pub value_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub publication_date_time: Option<String>,
}

// =============================================================================
// LINKS
// =============================================================================

/// A link whose target kind is encoded by which key is present.
///
/// Unknown keys are kept in `other` so an invalid link can report what it carried.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLink {
    #[serde(default)]
    pub resource: Option<OneOrMany<RawLinkItem>>,
    #[serde(default)]
    pub spatial_unit: Option<OneOrMany<RawLinkItem>>,
    #[serde(default)]
    pub concept: Option<OneOrMany<RawLinkItem>>,
    #[serde(default)]
    pub set: Option<OneOrMany<RawLinkItem>>,
    #[serde(default)]
    pub tree: Option<OneOrMany<RawLinkItem>>,
    #[serde(default)]
    pub person: Option<OneOrMany<RawLinkItem>>,
    #[serde(default)]
    pub bibliography: Option<OneOrMany<RawBibliography>>,
    #[serde(default)]
    pub epigraphic_unit: Option<OneOrMany<RawLinkItem>>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLinkItem {
    pub uuid: Uuid,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default, rename = "type")]
    pub link_type: Option<String>,
    #[serde(default)]
    pub identification: Option<RawIdentification>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub content: Option<FakeString>,
    #[serde(default)]
    pub rend: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height_preview: Option<u32>,
    #[serde(default)]
    pub width_preview: Option<u32>,
}

impl RawLinkItem {
    /// A link item carrying only its target uuid.
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            publication_date_time: None,
            link_type: None,
            identification: None,
            href: None,
            content: None,
            rend: None,
            height: None,
            width: None,
            height_preview: None,
            width_preview: None,
        }
    }
}

// =============================================================================
// SUPPORTING RECORDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPerson {
    pub uuid: Uuid,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default, rename = "type")]
    pub person_type: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub identification: Option<RawIdentification>,
    #[serde(default)]
    pub content: Option<FakeString>,
    #[serde(default)]
    pub properties: Option<RawProperties>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCreators {
    #[serde(default)]
    pub creator: OneOrMany<RawPerson>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAuthors {
    #[serde(default)]
    pub person: OneOrMany<RawPerson>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPublishers {
    #[serde(default)]
    pub publisher: OneOrMany<RawPerson>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPeriod {
    pub uuid: Uuid,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default, rename = "type")]
    pub period_type: Option<String>,
    #[serde(default)]
    pub n: Option<i64>,
    pub identification: RawIdentification,
    #[serde(default)]
    pub description: Option<RawLocalizedString>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPeriods {
    #[serde(default)]
    pub period: OneOrMany<RawPeriod>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCoordinates {
    #[serde(default)]
    pub coord: OneOrMany<RawCoordinate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, rename = "type")]
    pub coordinate_type: Option<String>,
    #[serde(default)]
    pub label: Option<RawLocalizedString>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawObservations {
    #[serde(default)]
    pub observation: OneOrMany<RawObservation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    #[serde(default)]
    pub observation_no: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub observers: Option<FakeString>,
    #[serde(default)]
    pub notes: Option<RawNotes>,
    #[serde(default)]
    pub links: Option<OneOrMany<RawLink>>,
    #[serde(default)]
    pub properties: Option<RawProperties>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEvents {
    #[serde(default)]
    pub event: OneOrMany<RawEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub agent: Option<RawEventAgent>,
    pub label: RawLocalizedString,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEventAgent {
    pub uuid: Uuid,
    pub content: FakeString,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawInterpretations {
    #[serde(default)]
    pub interpretation: OneOrMany<RawInterpretation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInterpretation {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub interpretation_no: Option<i64>,
    #[serde(default)]
    pub properties: Option<RawProperties>,
    #[serde(default)]
    pub links: Option<OneOrMany<RawLink>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCitedBibliography {
    #[serde(default)]
    pub reference: OneOrMany<RawBibliography>,
}

// =============================================================================
// ENTITIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResource {
    pub uuid: Uuid,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default, rename = "type")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub n: Option<i64>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub context: Option<RawContext>,
    #[serde(default)]
    pub availability: Option<RawAvailability>,
    #[serde(default)]
    pub copyright: Option<FakeString>,
    pub identification: RawIdentification,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub image: Option<RawImage>,
    #[serde(default)]
    pub creators: Option<RawCreators>,
    #[serde(default)]
    pub notes: Option<RawNotes>,
    #[serde(default)]
    pub description: Option<RawLocalizedString>,
    #[serde(default)]
    pub document: Option<RawDocument>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub periods: Option<RawPeriods>,
    #[serde(default)]
    pub links: Option<OneOrMany<RawLink>>,
    #[serde(default)]
    pub reverse_links: Option<OneOrMany<RawLink>>,
    #[serde(default)]
    pub properties: Option<RawProperties>,
    #[serde(default)]
    pub cited_bibliography: Option<RawCitedBibliography>,
    #[serde(default)]
    pub resource: Option<OneOrMany<Box<RawResource>>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpatialUnit {
    pub uuid: Uuid,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default)]
    pub context: Option<RawContext>,
    #[serde(default)]
    pub availability: Option<RawAvailability>,
    pub identification: RawIdentification,
    #[serde(default)]
    pub image: Option<RawImage>,
    #[serde(default)]
    pub description: Option<RawLocalizedString>,
    #[serde(default)]
    pub coordinates: Option<RawCoordinates>,
    #[serde(default)]
    pub observations: Option<RawObservations>,
    #[serde(default)]
    pub events: Option<RawEvents>,
    #[serde(default)]
    pub properties: Option<RawProperties>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConcept {
    pub uuid: Uuid,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default)]
    pub context: Option<RawContext>,
    #[serde(default)]
    pub availability: Option<RawAvailability>,
    pub identification: RawIdentification,
    #[serde(default)]
    pub image: Option<RawImage>,
    #[serde(default)]
    pub description: Option<RawLocalizedString>,
    #[serde(default)]
    pub interpretations: Option<RawInterpretations>,
}

/// Items held by a set or tree, grouped by entity kind.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItems {
    #[serde(default)]
    pub resource: Option<OneOrMany<RawResource>>,
    #[serde(default)]
    pub spatial_unit: Option<OneOrMany<RawSpatialUnit>>,
    #[serde(default)]
    pub concept: Option<OneOrMany<RawConcept>>,
    #[serde(default)]
    pub period: Option<OneOrMany<RawPeriod>>,
    #[serde(default)]
    pub bibliography: Option<OneOrMany<RawBibliography>>,
    #[serde(default)]
    pub person: Option<OneOrMany<RawPerson>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSet {
    pub uuid: Uuid,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default, rename = "type")]
    pub set_type: Option<String>,
    #[serde(default)]
    pub n: Option<i64>,
    #[serde(default)]
    pub context: Option<RawContext>,
    #[serde(default)]
    pub availability: Option<RawAvailability>,
    pub identification: RawIdentification,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub suppress_blanks: Option<bool>,
    #[serde(default)]
    pub tabular_structure: Option<bool>,
    #[serde(default)]
    pub creators: Option<RawCreators>,
    #[serde(default)]
    pub description: Option<RawLocalizedString>,
    #[serde(default)]
    pub items: Option<RawItems>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTree {
    pub uuid: Uuid,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default, rename = "type")]
    pub tree_type: Option<String>,
    #[serde(default)]
    pub n: Option<i64>,
    #[serde(default)]
    pub availability: Option<RawAvailability>,
    pub identification: RawIdentification,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub creators: Option<RawCreators>,
    #[serde(default)]
    pub properties: Option<RawProperties>,
    #[serde(default)]
    pub items: Option<RawItems>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBibliography {
    pub uuid: Uuid,
    #[serde(default)]
    pub zotero_id: Option<String>,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default, rename = "type")]
    pub bibliography_type: Option<String>,
    #[serde(default)]
    pub n: Option<i64>,
    #[serde(default)]
    pub context: Option<RawContext>,
    #[serde(default)]
    pub identification: Option<RawIdentification>,
    #[serde(default)]
    pub project: Option<RawMetadataProject>,
    #[serde(default)]
    pub citation_details: Option<FakeString>,
    #[serde(default)]
    pub citation_format: Option<FakeString>,
    #[serde(default)]
    pub citation_format_span: Option<FakeString>,
    #[serde(default)]
    pub reference_format_div: Option<FakeString>,
    #[serde(default)]
    pub publication_info: Option<RawPublicationInfo>,
    #[serde(default)]
    pub entry_info: Option<RawEntryInfo>,
    #[serde(default)]
    pub source: Option<RawBibliographySource>,
    #[serde(default)]
    pub periods: Option<RawPeriods>,
    #[serde(default)]
    pub authors: Option<RawAuthors>,
    #[serde(default)]
    pub properties: Option<RawProperties>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPublicationInfo {
    #[serde(default)]
    pub publishers: Option<RawPublishers>,
    #[serde(default)]
    pub start_date: Option<RawStartDate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawStartDate {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntryInfo {
    #[serde(default)]
    pub start_issue: Option<FakeString>,
    #[serde(default)]
    pub start_volume: Option<FakeString>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawBibliographySource {
    pub resource: RawBibliographySourceResource,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawBibliographySourceResource {
    pub uuid: Uuid,
    pub identification: RawIdentification,
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Top-level API response: `{ "result": { "ochre": ... } }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawResponse {
    pub result: RawResult,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawResult {
    pub ochre: RawEnvelope,
}

/// One fetched entity plus the fields every response shares.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnvelope {
    pub uuid: Uuid,
    #[serde(default)]
    pub uuid_belongs_to: Option<Uuid>,
    #[serde(default)]
    pub belongs_to: Option<String>,
    #[serde(default)]
    pub publication_date_time: Option<String>,
    #[serde(default)]
    pub metadata: RawMetadata,
    /// Space-separated language codes (e.g., "eng fra").
    #[serde(default)]
    pub languages: Option<String>,
    #[serde(flatten)]
    pub item: RawItem,
}

/// The entity kind carried by an envelope, keyed by its field name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawItem {
    Tree(Box<RawTree>),
    Set(Box<RawSet>),
    Resource(Box<RawResource>),
    SpatialUnit(Box<RawSpatialUnit>),
    Concept(Box<RawConcept>),
    Bibliography(Box<RawBibliography>),
}

impl RawItem {
    /// Returns the wire name of the entity kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RawItem::Tree(_) => "tree",
            RawItem::Set(_) => "set",
            RawItem::Resource(_) => "resource",
            RawItem::SpatialUnit(_) => "spatialUnit",
            RawItem::Concept(_) => "concept",
            RawItem::Bibliography(_) => "bibliography",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub project: Option<RawMetadataProject>,
    #[serde(default)]
    pub item: Option<RawMetadataItem>,
    #[serde(default)]
    pub dataset: Option<FakeString>,
    #[serde(default)]
    pub publisher: Option<FakeString>,
    #[serde(default)]
    pub identifier: Option<FakeString>,
    #[serde(default)]
    pub description: Option<RawLocalizedString>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMetadataProject {
    pub identification: RawIdentification,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMetadataItem {
    pub identification: RawIdentification,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: &str = "5b2a7a2c-1f3e-4a55-9f4a-0c9d1e2f3a4b";

    #[test]
    fn test_envelope_kind_from_key() {
        let json = format!(
            r#"{{"result": {{"ochre": {{
                "uuid": "{UUID}",
                "belongsTo": "DEMO",
                "metadata": {{}},
                "concept": {{"uuid": "{UUID}", "identification": {{"label": "Jar"}}}}
            }}}}}}"#
        );
        let response: RawResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(response.result.ochre.item.kind(), "concept");
        assert_eq!(response.result.ochre.belongs_to.as_deref(), Some("DEMO"));
    }

    #[test]
    fn test_link_keeps_unknown_keys() {
        let link: RawLink = serde_json::from_str(r#"{"period": {"uuid": "x"}}"#).unwrap();
        assert!(link.resource.is_none());
        assert!(link.other.contains_key("period"));
    }

    #[test]
    fn test_nested_properties() {
        let props: RawProperties = serde_json::from_str(
            r#"{"property": {"label": "presentation", "value": "page",
                "property": [{"label": "width", "value": {"content": "full", "type": "string"}}]}}"#,
        )
        .unwrap();
        let top = props.property.first().unwrap();
        assert_eq!(top.property.as_ref().map(OneOrMany::len), Some(1));
    }
}
