//! Entity assemblers.
//!
//! Each top-level kind implements [`Assemble`], producing either its full
//! form or its nested form. Nested forms never carry provenance, whatever
//! the source contains. Assembly is all-or-nothing: the first failing
//! sub-field aborts the whole entity.

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{
    Bibliography, BibliographySource, Concept, Context, ContextItem, ContextNode, Coordinate,
    EntryInfo, Event, EventAgent, Image, Interpretation, Items, License, Metadata, MetadataItem,
    NestedBibliography, NestedConcept, NestedResource, NestedSet, NestedSpatialUnit, NestedTree,
    Observation, Period, Person, PublicationInfo, Resource, Set, SpatialUnit, SpatialUnitBase,
    StartDate, Tree,
};
use crate::options::DEFAULT_LANGUAGE;
use crate::parse::document::{parse_optional_document, parse_optional_notes};
use crate::parse::link::parse_links;
use crate::parse::property::{parse_properties_block, parse_publication_timestamp};
use crate::parse::string::{
    parse_fake_string, parse_identification, parse_optional_fake_string,
    parse_optional_identification, parse_optional_string, parse_string_content,
};
use crate::raw::{
    slice_of, RawAvailability, RawBibliography, RawConcept, RawContext, RawContextItem,
    RawCreators, RawImage, RawItems, RawMetadata, RawPeriod, RawPeriods, RawPerson, RawResource,
    RawSet, RawSpatialUnit, RawTree,
};
use crate::url::{load_url, preview_url};

// =============================================================================
// ASSEMBLE TRAIT
// =============================================================================

/// Builds an entity from its raw form.
pub trait Assemble: Sized {
    type Raw;
    type Nested;

    /// Builds the full form, provenance included.
    fn assemble(raw: &Self::Raw, language: &str) -> Result<Self>;

    /// Builds the nested form, without provenance.
    fn assemble_nested(raw: &Self::Raw, language: &str) -> Result<Self::Nested>;
}

/// Either form of an assembled entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Assembled<F, N> {
    Full(F),
    Nested(N),
}

/// Assembles `raw` in the form selected by `is_nested`.
pub fn assemble_entity<T: Assemble>(
    raw: &T::Raw,
    language: &str,
    is_nested: bool,
) -> Result<Assembled<T, T::Nested>> {
    if is_nested {
        T::assemble_nested(raw, language).map(Assembled::Nested)
    } else {
        T::assemble(raw, language).map(Assembled::Full)
    }
}

// =============================================================================
// SUPPORTING RECORDS
// =============================================================================

fn parse_license(raw: &Option<RawAvailability>) -> Option<License> {
    raw.as_ref().map(|a| License {
        content: parse_fake_string(&a.license.content),
        url: a.license.target.clone(),
    })
}

fn parse_context_item(raw: &RawContextItem) -> Result<ContextItem> {
    Ok(ContextItem {
        uuid: raw.uuid,
        publication_date_time: parse_publication_timestamp(&raw.publication_date_time)?,
        number: raw.n,
        content: parse_fake_string(&raw.content),
    })
}

fn parse_context(raw: &Option<RawContext>) -> Result<Option<Context>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let nodes = raw
        .context
        .iter()
        .map(|node| {
            Ok::<_, Error>(ContextNode {
                tree: parse_context_item(&node.tree)?,
                project: parse_context_item(&node.project)?,
                spatial_units: slice_of(&node.spatial_unit)
                    .iter()
                    .map(parse_context_item)
                    .collect::<Result<Vec<_>>>()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(Context {
        nodes,
        display_path: raw.display_path.clone().unwrap_or_default(),
    }))
}

fn parse_image(raw: &Option<RawImage>, language: &str) -> Result<Option<Image>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    Ok(Some(Image {
        uuid: raw.uuid,
        publication_date_time: parse_publication_timestamp(&raw.publication_date_time)?,
        identification: parse_optional_identification(&raw.identification, language)?,
        url: raw
            .href
            .clone()
            .or_else(|| raw.uuid.as_ref().map(load_url)),
        preview_url: raw.uuid.as_ref().map(preview_url),
        html_prefix: raw.html_img_src_prefix.clone(),
        content: parse_optional_fake_string(&raw.content),
        height: raw.height,
        width: raw.width,
    }))
}

pub fn parse_person(raw: &RawPerson, language: &str) -> Result<Person> {
    Ok(Person {
        uuid: raw.uuid,
        publication_date_time: parse_publication_timestamp(&raw.publication_date_time)?,
        person_type: raw.person_type.clone(),
        date: raw.date.clone(),
        identification: parse_optional_identification(&raw.identification, language)?,
        content: parse_optional_fake_string(&raw.content),
        properties: parse_properties_block(&raw.properties, language)?,
    })
}

fn parse_persons(raw: &[RawPerson], language: &str) -> Result<Vec<Person>> {
    raw.iter().map(|p| parse_person(p, language)).collect()
}

fn parse_creators(raw: &Option<RawCreators>, language: &str) -> Result<Vec<Person>> {
    match raw {
        Some(creators) => parse_persons(creators.creator.as_slice(), language),
        None => Ok(Vec::new()),
    }
}

pub fn parse_period(raw: &RawPeriod, language: &str) -> Result<Period> {
    Ok(Period {
        uuid: raw.uuid,
        publication_date_time: parse_publication_timestamp(&raw.publication_date_time)?,
        period_type: raw.period_type.clone(),
        number: raw.n,
        identification: parse_identification(&raw.identification, language)?,
        description: parse_optional_string(&raw.description, language, "period description")?,
    })
}

fn parse_periods(raw: &Option<RawPeriods>, language: &str) -> Result<Vec<Period>> {
    match raw {
        Some(periods) => periods.period.iter().map(|p| parse_period(p, language)).collect(),
        None => Ok(Vec::new()),
    }
}

fn parse_items(raw: &Option<RawItems>, language: &str) -> Result<Items> {
    let Some(raw) = raw else {
        return Ok(Items::default());
    };
    Ok(Items {
        resources: slice_of(&raw.resource)
            .iter()
            .map(|r| Resource::assemble_nested(r, language))
            .collect::<Result<_>>()?,
        spatial_units: slice_of(&raw.spatial_unit)
            .iter()
            .map(|s| SpatialUnit::assemble_nested(s, language))
            .collect::<Result<_>>()?,
        concepts: slice_of(&raw.concept)
            .iter()
            .map(|c| Concept::assemble_nested(c, language))
            .collect::<Result<_>>()?,
        periods: slice_of(&raw.period)
            .iter()
            .map(|p| parse_period(p, language))
            .collect::<Result<_>>()?,
        bibliographies: slice_of(&raw.bibliography)
            .iter()
            .map(|b| Bibliography::assemble_nested(b, language))
            .collect::<Result<_>>()?,
        persons: parse_persons(slice_of(&raw.person), language)?,
    })
}

/// Normalizes the envelope metadata block.
pub fn parse_metadata(raw: &RawMetadata, languages: Option<&str>, language: &str) -> Result<Metadata> {
    let item = raw
        .item
        .as_ref()
        .map(|item| {
            Ok::<_, Error>(MetadataItem {
                identification: parse_identification(&item.identification, language)?,
                category: item.category.clone(),
                item_type: item.item_type.clone(),
            })
        })
        .transpose()?;
    let languages = match languages {
        Some(list) if !list.trim().is_empty() => list.split_whitespace().map(str::to_string).collect(),
        _ => vec![DEFAULT_LANGUAGE.to_string()],
    };
    Ok(Metadata {
        project: raw
            .project
            .as_ref()
            .map(|p| parse_identification(&p.identification, language))
            .transpose()?,
        item,
        dataset: parse_optional_fake_string(&raw.dataset),
        publisher: parse_optional_fake_string(&raw.publisher),
        identifier: parse_optional_fake_string(&raw.identifier),
        description: parse_optional_string(&raw.description, language, "metadata description")?,
        languages,
    })
}

// =============================================================================
// RESOURCE
// =============================================================================

impl Assemble for Resource {
    type Raw = RawResource;
    type Nested = NestedResource;

    fn assemble(raw: &RawResource, language: &str) -> Result<Resource> {
        debug!(uuid = %raw.uuid, "assembling resource");
        Ok(Resource {
            nested: Self::assemble_nested(raw, language)?,
            publication_date_time: parse_publication_timestamp(&raw.publication_date_time)?,
            context: parse_context(&raw.context)?,
            license: parse_license(&raw.availability),
            copyright: parse_optional_fake_string(&raw.copyright),
        })
    }

    fn assemble_nested(raw: &RawResource, language: &str) -> Result<NestedResource> {
        Ok(NestedResource {
            uuid: raw.uuid,
            resource_type: raw.resource_type.clone(),
            number: raw.n,
            format: raw.format.clone(),
            slug: raw.slug.clone(),
            identification: parse_identification(&raw.identification, language)?,
            date: raw.date.clone(),
            image: parse_image(&raw.image, language)?,
            creators: parse_creators(&raw.creators, language)?,
            notes: parse_optional_notes(&raw.notes, language)?,
            description: parse_optional_string(&raw.description, language, "resource description")?,
            document: parse_optional_document(&raw.document, language)?,
            href: raw.href.clone(),
            periods: parse_periods(&raw.periods, language)?,
            links: parse_links(slice_of(&raw.links), language)?,
            reverse_links: parse_links(slice_of(&raw.reverse_links), language)?,
            properties: parse_properties_block(&raw.properties, language)?,
            cited_bibliographies: match &raw.cited_bibliography {
                Some(cited) => cited
                    .reference
                    .iter()
                    .map(|b| assemble_bibliography(b, language))
                    .collect::<Result<_>>()?,
                None => Vec::new(),
            },
            resources: slice_of(&raw.resource)
                .iter()
                .map(|child| Self::assemble_nested(child, language))
                .collect::<Result<_>>()?,
        })
    }
}

// =============================================================================
// SPATIAL UNIT
// =============================================================================

fn spatial_unit_base(raw: &RawSpatialUnit, language: &str) -> Result<SpatialUnitBase> {
    Ok(SpatialUnitBase {
        uuid: raw.uuid,
        identification: parse_identification(&raw.identification, language)?,
        image: parse_image(&raw.image, language)?,
        description: parse_optional_string(&raw.description, language, "spatial unit description")?,
        coordinates: match &raw.coordinates {
            Some(coordinates) => coordinates
                .coord
                .iter()
                .map(|c| {
                    Ok::<_, Error>(Coordinate {
                        latitude: c.latitude,
                        longitude: c.longitude,
                        coordinate_type: c.coordinate_type.clone(),
                        label: parse_optional_string(&c.label, language, "coordinate label")?,
                    })
                })
                .collect::<Result<_>>()?,
            None => Vec::new(),
        },
        events: match &raw.events {
            Some(events) => events
                .event
                .iter()
                .map(|e| {
                    Ok::<_, Error>(Event {
                        date_time: e.date_time.clone(),
                        agent: e.agent.as_ref().map(|a| EventAgent {
                            uuid: a.uuid,
                            content: parse_fake_string(&a.content),
                        }),
                        label: parse_string_content(&e.label, language, "event label")?,
                    })
                })
                .collect::<Result<_>>()?,
            None => Vec::new(),
        },
    })
}

impl Assemble for SpatialUnit {
    type Raw = RawSpatialUnit;
    type Nested = NestedSpatialUnit;

    fn assemble(raw: &RawSpatialUnit, language: &str) -> Result<SpatialUnit> {
        debug!(uuid = %raw.uuid, "assembling spatial unit");
        let observations = match &raw.observations {
            Some(observations) => observations
                .observation
                .iter()
                .map(|o| {
                    Ok::<_, Error>(Observation {
                        number: o.observation_no,
                        date: o.date.clone(),
                        observers: o
                            .observers
                            .as_ref()
                            .map(|names| {
                                parse_fake_string(names)
                                    .split(';')
                                    .map(|n| n.trim().to_string())
                                    .filter(|n| !n.is_empty())
                                    .collect()
                            })
                            .unwrap_or_default(),
                        notes: parse_optional_notes(&o.notes, language)?,
                        links: parse_links(slice_of(&o.links), language)?,
                        properties: parse_properties_block(&o.properties, language)?,
                    })
                })
                .collect::<Result<_>>()?,
            None => Vec::new(),
        };
        Ok(SpatialUnit {
            base: spatial_unit_base(raw, language)?,
            observations,
            publication_date_time: parse_publication_timestamp(&raw.publication_date_time)?,
            context: parse_context(&raw.context)?,
            license: parse_license(&raw.availability),
        })
    }

    fn assemble_nested(raw: &RawSpatialUnit, language: &str) -> Result<NestedSpatialUnit> {
        Ok(NestedSpatialUnit {
            base: spatial_unit_base(raw, language)?,
            properties: parse_properties_block(&raw.properties, language)?,
        })
    }
}

// =============================================================================
// CONCEPT
// =============================================================================

impl Assemble for Concept {
    type Raw = RawConcept;
    type Nested = NestedConcept;

    fn assemble(raw: &RawConcept, language: &str) -> Result<Concept> {
        debug!(uuid = %raw.uuid, "assembling concept");
        Ok(Concept {
            nested: Self::assemble_nested(raw, language)?,
            publication_date_time: parse_publication_timestamp(&raw.publication_date_time)?,
            context: parse_context(&raw.context)?,
            license: parse_license(&raw.availability),
        })
    }

    fn assemble_nested(raw: &RawConcept, language: &str) -> Result<NestedConcept> {
        let interpretations = match &raw.interpretations {
            Some(interpretations) => interpretations
                .interpretation
                .iter()
                .map(|i| {
                    Ok::<_, Error>(Interpretation {
                        date: i.date.clone(),
                        number: i.interpretation_no,
                        properties: parse_properties_block(&i.properties, language)?,
                        links: parse_links(slice_of(&i.links), language)?,
                    })
                })
                .collect::<Result<_>>()?,
            None => Vec::new(),
        };
        Ok(NestedConcept {
            uuid: raw.uuid,
            identification: parse_identification(&raw.identification, language)?,
            image: parse_image(&raw.image, language)?,
            description: parse_optional_string(&raw.description, language, "concept description")?,
            interpretations,
        })
    }
}

// =============================================================================
// SET AND TREE
// =============================================================================

impl Assemble for Set {
    type Raw = RawSet;
    type Nested = NestedSet;

    fn assemble(raw: &RawSet, language: &str) -> Result<Set> {
        debug!(uuid = %raw.uuid, "assembling set");
        Ok(Set {
            nested: Self::assemble_nested(raw, language)?,
            publication_date_time: parse_publication_timestamp(&raw.publication_date_time)?,
            context: parse_context(&raw.context)?,
            license: parse_license(&raw.availability),
        })
    }

    fn assemble_nested(raw: &RawSet, language: &str) -> Result<NestedSet> {
        Ok(NestedSet {
            uuid: raw.uuid,
            set_type: raw.set_type.clone(),
            number: raw.n,
            identification: parse_identification(&raw.identification, language)?,
            date: raw.date.clone(),
            suppress_blanks: raw.suppress_blanks.unwrap_or(false),
            tabular_structure: raw.tabular_structure.unwrap_or(false),
            creators: parse_creators(&raw.creators, language)?,
            description: parse_optional_string(&raw.description, language, "set description")?,
            items: parse_items(&raw.items, language)?,
        })
    }
}

impl Assemble for Tree {
    type Raw = RawTree;
    type Nested = NestedTree;

    fn assemble(raw: &RawTree, language: &str) -> Result<Tree> {
        debug!(uuid = %raw.uuid, "assembling tree");
        Ok(Tree {
            nested: Self::assemble_nested(raw, language)?,
            publication_date_time: parse_publication_timestamp(&raw.publication_date_time)?,
            license: parse_license(&raw.availability),
        })
    }

    fn assemble_nested(raw: &RawTree, language: &str) -> Result<NestedTree> {
        Ok(NestedTree {
            uuid: raw.uuid,
            tree_type: raw.tree_type.clone(),
            number: raw.n,
            identification: parse_identification(&raw.identification, language)?,
            date: raw.date.clone(),
            creators: parse_creators(&raw.creators, language)?,
            properties: parse_properties_block(&raw.properties, language)?,
            items: parse_items(&raw.items, language)?,
        })
    }
}

// =============================================================================
// BIBLIOGRAPHY
// =============================================================================

impl Assemble for Bibliography {
    type Raw = RawBibliography;
    type Nested = NestedBibliography;

    fn assemble(raw: &RawBibliography, language: &str) -> Result<Bibliography> {
        Ok(Bibliography {
            nested: Self::assemble_nested(raw, language)?,
            publication_date_time: parse_publication_timestamp(&raw.publication_date_time)?,
            context: parse_context(&raw.context)?,
        })
    }

    fn assemble_nested(raw: &RawBibliography, language: &str) -> Result<NestedBibliography> {
        let publication_info = raw
            .publication_info
            .as_ref()
            .map(|info| {
                Ok::<_, Error>(PublicationInfo {
                    publishers: match &info.publishers {
                        Some(p) => parse_persons(p.publisher.as_slice(), language)?,
                        None => Vec::new(),
                    },
                    start_date: info.start_date.as_ref().map(|d| StartDate {
                        year: d.year,
                        month: d.month,
                        day: d.day,
                    }),
                })
            })
            .transpose()?;
        let source = raw
            .source
            .as_ref()
            .map(|s| {
                Ok::<_, Error>(BibliographySource {
                    uuid: s.resource.uuid,
                    identification: parse_identification(&s.resource.identification, language)?,
                })
            })
            .transpose()?;

        Ok(NestedBibliography {
            uuid: raw.uuid,
            zotero_id: raw.zotero_id.clone(),
            bibliography_type: raw.bibliography_type.clone(),
            number: raw.n,
            identification: parse_optional_identification(&raw.identification, language)?,
            project: raw
                .project
                .as_ref()
                .map(|p| parse_identification(&p.identification, language))
                .transpose()?,
            citation_details: parse_optional_fake_string(&raw.citation_details),
            citation_format: parse_optional_fake_string(&raw.citation_format),
            citation_format_span: parse_optional_fake_string(&raw.citation_format_span),
            reference_format_div: parse_optional_fake_string(&raw.reference_format_div),
            publication_info,
            entry_info: raw.entry_info.as_ref().map(|e| EntryInfo {
                start_issue: parse_optional_fake_string(&e.start_issue),
                start_volume: parse_optional_fake_string(&e.start_volume),
            }),
            source,
            periods: parse_periods(&raw.periods, language)?,
            authors: match &raw.authors {
                Some(a) => parse_persons(a.person.as_slice(), language)?,
                None => Vec::new(),
            },
            properties: parse_properties_block(&raw.properties, language)?,
        })
    }
}

/// Full bibliography, as embedded in links and citations.
pub fn assemble_bibliography(raw: &RawBibliography, language: &str) -> Result<Bibliography> {
    Bibliography::assemble(raw, language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const UUID: &str = "5b2a7a2c-1f3e-4a55-9f4a-0c9d1e2f3a4b";

    fn resource_json() -> String {
        format!(
            r#"{{
                "uuid": "{UUID}",
                "publicationDateTime": "2024-03-01T12:00:00Z",
                "type": "document",
                "context": {{"context": {{
                    "tree": {{"uuid": "{UUID}", "n": 1, "content": "Tree"}},
                    "project": {{"uuid": "{UUID}", "content": "Project"}}
                }}, "displayPath": "Project > Tree"}},
                "availability": {{"license": {{"target": "https://creativecommons.org/licenses/by/4.0/", "content": "CC BY 4.0"}}}},
                "copyright": "Someone",
                "identification": {{"label": [{{"lang": "eng", "string": "Jar"}}, {{"lang": "fra", "string": "Jarre"}}], "abbreviation": {{"lang": "zxx", "string": "J"}}}},
                "notes": {{"note": ["", "A note"]}},
                "properties": {{"property": {{"label": "Material", "value": "Clay"}}}},
                "resource": {{
                    "uuid": "{UUID}",
                    "publicationDateTime": "2024-03-01T12:00:00Z",
                    "copyright": "Child",
                    "identification": {{"label": "Child"}}
                }}
            }}"#
        )
    }

    #[test]
    fn test_resource_full_and_nested() {
        let raw: RawResource = serde_json::from_str(&resource_json()).unwrap();

        let full = Resource::assemble(&raw, "fra").unwrap();
        assert_eq!(full.nested.identification.label, "Jarre");
        assert_eq!(full.nested.identification.abbreviation, "J");
        assert_eq!(full.copyright.as_deref(), Some("Someone"));
        assert_eq!(full.license.as_ref().map(|l| l.content.as_str()), Some("CC BY 4.0"));
        assert_eq!(full.context.as_ref().map(|c| c.nodes.len()), Some(1));
        assert_eq!(full.nested.notes.len(), 1);
        assert_eq!(full.nested.resources.len(), 1);
        assert_eq!(full.nested.resources[0].identification.label, "Child");

        let json = serde_json::to_value(&full).unwrap();
        assert_eq!(json["copyright"], "Someone");
        assert!(json["resources"][0].get("copyright").is_none());
    }

    #[test]
    fn test_nested_resource_has_no_provenance() {
        let raw: RawResource = serde_json::from_str(&resource_json()).unwrap();
        let nested = match assemble_entity::<Resource>(&raw, "eng", true).unwrap() {
            Assembled::Nested(n) => n,
            Assembled::Full(_) => panic!("expected nested form"),
        };
        let json = serde_json::to_value(&nested).unwrap();
        for key in ["license", "context", "copyright", "publicationDateTime"] {
            assert!(json.get(key).is_none(), "nested resource exposes {key}");
        }
    }

    #[test]
    fn test_spatial_unit_forms() {
        let raw: RawSpatialUnit = serde_json::from_str(&format!(
            r#"{{
                "uuid": "{UUID}",
                "identification": {{"label": "Trench A"}},
                "coordinates": {{"coord": {{"latitude": 31.5, "longitude": 35.1, "type": "point"}}}},
                "observations": {{"observation": {{"observationNo": 1, "observers": "A; B"}}}},
                "properties": {{"property": {{"label": "Phase", "value": "IV"}}}}
            }}"#
        ))
        .unwrap();

        let full = SpatialUnit::assemble(&raw, "eng").unwrap();
        assert_eq!(full.observations[0].observers, vec!["A", "B"]);
        assert_eq!(full.base.coordinates.len(), 1);

        let nested = SpatialUnit::assemble_nested(&raw, "eng").unwrap();
        assert_eq!(nested.properties.len(), 1);
        let json = serde_json::to_value(&full).unwrap();
        assert!(json.get("properties").is_none());
    }

    #[test]
    fn test_set_items_are_nested() {
        let raw: RawSet = serde_json::from_str(&format!(
            r#"{{
                "uuid": "{UUID}",
                "identification": {{"label": "Finds"}},
                "items": {{
                    "resource": [{{"uuid": "{UUID}", "copyright": "x", "identification": {{"label": "A"}}}}],
                    "concept": {{"uuid": "{UUID}", "identification": {{"label": "B"}}}}
                }}
            }}"#
        ))
        .unwrap();
        let set = Set::assemble(&raw, "eng").unwrap();
        assert_eq!(set.nested.items.resources.len(), 1);
        assert_eq!(set.nested.items.concepts.len(), 1);
        assert!(!set.nested.items.is_empty());
    }

    #[test]
    fn test_failing_subfield_aborts_entity() {
        let raw: RawResource = serde_json::from_str(&format!(
            r#"{{"uuid": "{UUID}", "identification": {{"label": []}}}}"#
        ))
        .unwrap();
        let err = Resource::assemble(&raw, "eng").unwrap_err();
        assert_eq!(err.kind().name(), "MissingContentError");
    }

    #[test]
    fn test_metadata_languages() {
        let meta = parse_metadata(&RawMetadata::default(), None, "eng").unwrap();
        assert_eq!(meta.languages, vec!["eng"]);
        let meta = parse_metadata(&RawMetadata::default(), Some("eng fra"), "eng").unwrap();
        assert_eq!(meta.languages, vec!["eng", "fra"]);
    }
}
