//! Entities and their supporting records.
//!
//! Each entity kind has a nested form, used when it is embedded in a
//! container, and a full form that adds provenance (publication timestamp,
//! context, license, copyright as applicable). The full form flattens the
//! nested one, so a nested entity can never carry provenance.

use serde::Serialize;
use uuid::Uuid;

use crate::model::{Document, Identification, Link, Note, Property};
use crate::util::Timestamp;

// =============================================================================
// SUPPORTING RECORDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct License {
    pub content: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextItem {
    pub uuid: Uuid,
    pub publication_date_time: Option<Timestamp>,
    pub number: Option<i64>,
    pub content: String,
}

/// One path from a project through a tree down to spatial units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextNode {
    pub tree: ContextItem,
    pub project: ContextItem,
    pub spatial_units: Vec<ContextItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub nodes: Vec<ContextNode>,
    pub display_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub uuid: Option<Uuid>,
    pub publication_date_time: Option<Timestamp>,
    pub identification: Option<Identification>,
    pub url: Option<String>,
    pub preview_url: Option<String>,
    pub html_prefix: Option<String>,
    pub content: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub uuid: Uuid,
    pub publication_date_time: Option<Timestamp>,
    #[serde(rename = "type")]
    pub person_type: Option<String>,
    pub date: Option<String>,
    pub identification: Option<Identification>,
    pub content: Option<String>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub uuid: Uuid,
    pub publication_date_time: Option<Timestamp>,
    #[serde(rename = "type")]
    pub period_type: Option<String>,
    pub number: Option<i64>,
    pub identification: Identification,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub coordinate_type: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub number: Option<i64>,
    pub date: Option<String>,
    pub observers: Vec<String>,
    pub notes: Vec<Note>,
    pub links: Vec<Link>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventAgent {
    pub uuid: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub date_time: Option<String>,
    pub agent: Option<EventAgent>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub date: Option<String>,
    pub number: Option<i64>,
    pub properties: Vec<Property>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationInfo {
    pub publishers: Vec<Person>,
    pub start_date: Option<StartDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInfo {
    pub start_issue: Option<String>,
    pub start_volume: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibliographySource {
    pub uuid: Uuid,
    pub identification: Identification,
}

// =============================================================================
// RESOURCE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedResource {
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub number: Option<i64>,
    pub format: Option<String>,
    pub slug: Option<String>,
    pub identification: Identification,
    pub date: Option<String>,
    pub image: Option<Image>,
    pub creators: Vec<Person>,
    pub notes: Vec<Note>,
    pub description: Option<String>,
    pub document: Option<Document>,
    pub href: Option<String>,
    pub periods: Vec<Period>,
    pub links: Vec<Link>,
    pub reverse_links: Vec<Link>,
    pub properties: Vec<Property>,
    pub cited_bibliographies: Vec<Bibliography>,
    /// Child resources, always in nested form.
    pub resources: Vec<NestedResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(flatten)]
    pub nested: NestedResource,
    pub publication_date_time: Option<Timestamp>,
    pub context: Option<Context>,
    pub license: Option<License>,
    pub copyright: Option<String>,
}

// =============================================================================
// SPATIAL UNIT
// =============================================================================

/// Fields shared by both spatial unit forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialUnitBase {
    pub uuid: Uuid,
    pub identification: Identification,
    pub image: Option<Image>,
    pub description: Option<String>,
    pub coordinates: Vec<Coordinate>,
    pub events: Vec<Event>,
}

/// Nested spatial unit: carries its properties inline instead of observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedSpatialUnit {
    #[serde(flatten)]
    pub base: SpatialUnitBase,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialUnit {
    #[serde(flatten)]
    pub base: SpatialUnitBase,
    pub observations: Vec<Observation>,
    pub publication_date_time: Option<Timestamp>,
    pub context: Option<Context>,
    pub license: Option<License>,
}

// =============================================================================
// CONCEPT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedConcept {
    pub uuid: Uuid,
    pub identification: Identification,
    pub image: Option<Image>,
    pub description: Option<String>,
    pub interpretations: Vec<Interpretation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    #[serde(flatten)]
    pub nested: NestedConcept,
    pub publication_date_time: Option<Timestamp>,
    pub context: Option<Context>,
    pub license: Option<License>,
}

// =============================================================================
// SET AND TREE
// =============================================================================

/// Members of a set or tree, each in nested form.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Items {
    pub resources: Vec<NestedResource>,
    pub spatial_units: Vec<NestedSpatialUnit>,
    pub concepts: Vec<NestedConcept>,
    pub periods: Vec<Period>,
    pub bibliographies: Vec<NestedBibliography>,
    pub persons: Vec<Person>,
}

impl Items {
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
            && self.spatial_units.is_empty()
            && self.concepts.is_empty()
            && self.periods.is_empty()
            && self.bibliographies.is_empty()
            && self.persons.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedSet {
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub set_type: Option<String>,
    pub number: Option<i64>,
    pub identification: Identification,
    pub date: Option<String>,
    pub suppress_blanks: bool,
    pub tabular_structure: bool,
    pub creators: Vec<Person>,
    pub description: Option<String>,
    pub items: Items,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    #[serde(flatten)]
    pub nested: NestedSet,
    pub publication_date_time: Option<Timestamp>,
    pub context: Option<Context>,
    pub license: Option<License>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedTree {
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub tree_type: Option<String>,
    pub number: Option<i64>,
    pub identification: Identification,
    pub date: Option<String>,
    pub creators: Vec<Person>,
    pub properties: Vec<Property>,
    pub items: Items,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    #[serde(flatten)]
    pub nested: NestedTree,
    pub publication_date_time: Option<Timestamp>,
    pub license: Option<License>,
}

// =============================================================================
// BIBLIOGRAPHY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedBibliography {
    pub uuid: Uuid,
    pub zotero_id: Option<String>,
    #[serde(rename = "type")]
    pub bibliography_type: Option<String>,
    pub number: Option<i64>,
    pub identification: Option<Identification>,
    pub project: Option<Identification>,
    pub citation_details: Option<String>,
    pub citation_format: Option<String>,
    pub citation_format_span: Option<String>,
    pub reference_format_div: Option<String>,
    pub publication_info: Option<PublicationInfo>,
    pub entry_info: Option<EntryInfo>,
    pub source: Option<BibliographySource>,
    pub periods: Vec<Period>,
    pub authors: Vec<Person>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bibliography {
    #[serde(flatten)]
    pub nested: NestedBibliography,
    pub publication_date_time: Option<Timestamp>,
    pub context: Option<Context>,
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Any top-level entity kind an envelope can carry, in full form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum Item {
    Tree(Tree),
    Set(Set),
    Resource(Resource),
    SpatialUnit(SpatialUnit),
    Concept(Concept),
    Bibliography(Bibliography),
}

impl Item {
    pub fn kind(&self) -> &'static str {
        match self {
            Item::Tree(_) => "tree",
            Item::Set(_) => "set",
            Item::Resource(_) => "resource",
            Item::SpatialUnit(_) => "spatialUnit",
            Item::Concept(_) => "concept",
            Item::Bibliography(_) => "bibliography",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataItem {
    pub identification: Identification,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub project: Option<Identification>,
    pub item: Option<MetadataItem>,
    pub dataset: Option<String>,
    pub publisher: Option<String>,
    pub identifier: Option<String>,
    pub description: Option<String>,
    /// Language codes the entity is available in; `["eng"]` when unspecified.
    pub languages: Vec<String>,
}

/// The project that owns a fetched entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRef {
    pub uuid: Uuid,
    pub abbreviation: String,
}

/// A top-level entity together with the envelope fields it was fetched with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fetched<T> {
    pub uuid: Uuid,
    pub belongs_to: Option<ProjectRef>,
    pub publication_date_time: Option<Timestamp>,
    pub metadata: Metadata,
    pub item: T,
}

impl<T> Fetched<T> {
    /// Replaces the payload, keeping the envelope fields.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            uuid: self.uuid,
            belongs_to: self.belongs_to,
            publication_date_time: self.publication_date_time,
            metadata: self.metadata,
            item: f(self.item),
        }
    }
}
