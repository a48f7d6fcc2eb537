//! Canonical output types.
//!
//! Every type here is built once from an immutable raw tree and never mutated
//! afterward:
//! - Properties and typed values
//! - Links to other entities
//! - Rendered documents, footnotes and notes
//! - Entities in their full and nested forms
//! - Websites, pages, elements and components

pub mod document;
pub mod entity;
pub mod link;
pub mod property;
pub mod website;

use serde::Serialize;

pub use document::{Document, Footnote, Note};
pub use entity::{
    Bibliography, BibliographySource, Concept, Context, ContextItem, ContextNode, Coordinate,
    EntryInfo, Event, EventAgent, Fetched, Image, Interpretation, Item, Items, License, Metadata,
    MetadataItem, NestedBibliography, NestedConcept, NestedResource, NestedSet, NestedSpatialUnit,
    NestedTree, Observation, Period, Person, ProjectRef, PublicationInfo, Resource, Set,
    SpatialUnit, SpatialUnitBase, StartDate, Tree,
};
pub use link::{Link, LinkImage, LinkVariant};
pub use property::{Property, PropertyValue, ValueType};
pub use website::{
    BibliographyLayout, ButtonData, CollectionData, Component, CssStyle, EmptySpaceData,
    IframeData, ImageData, ImageRef, NestedWebsite, PageItem, PageVariant, PageWidth, Privacy,
    SearchBarData, Status, TextData, TextImageData, Theme, VideoData, WebElement, Webpage,
    Website, WebsiteProperties,
};

/// Label and abbreviation of an entity, resolved to one language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identification {
    pub label: String,
    /// Empty when the source carries no abbreviation.
    pub abbreviation: String,
}
