//! Fetcher collaborator and top-level entry points.
//!
//! Transport, retry and timeouts belong to the [`Fetcher`]. The functions
//! here only fetch an envelope, check its kind and assemble it.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, FetchError, Result};
use crate::model::{
    Bibliography, Concept, Fetched, Item, ProjectRef, Resource, Set, SpatialUnit, Tree, Website,
};
use crate::options::ParseOptions;
use crate::parse::entity::{parse_metadata, Assemble};
use crate::parse::property::parse_publication_timestamp;
use crate::parse::website::build_website;
use crate::raw::{RawEnvelope, RawItem, RawResponse};

/// Source of raw envelopes, usually the OCHRE API over HTTP.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_entity_by_uuid(&self, uuid: Uuid) -> Result<RawEnvelope, FetchError>;
}

// =============================================================================
// SYNCHRONOUS PARSING
// =============================================================================

/// Assembles the entity carried by an envelope, in full form.
pub fn parse_envelope(envelope: &RawEnvelope, options: &ParseOptions) -> Result<Fetched<Item>> {
    let language = options.language.as_str();
    let item = match &envelope.item {
        RawItem::Tree(raw) => Item::Tree(Tree::assemble(raw, language)?),
        RawItem::Set(raw) => Item::Set(Set::assemble(raw, language)?),
        RawItem::Resource(raw) => Item::Resource(Resource::assemble(raw, language)?),
        RawItem::SpatialUnit(raw) => Item::SpatialUnit(SpatialUnit::assemble(raw, language)?),
        RawItem::Concept(raw) => Item::Concept(Concept::assemble(raw, language)?),
        RawItem::Bibliography(raw) => Item::Bibliography(Bibliography::assemble(raw, language)?),
    };
    let belongs_to = match (&envelope.uuid_belongs_to, &envelope.belongs_to) {
        (Some(uuid), Some(abbreviation)) => Some(ProjectRef {
            uuid: *uuid,
            abbreviation: abbreviation.clone(),
        }),
        _ => None,
    };
    Ok(Fetched {
        uuid: envelope.uuid,
        belongs_to,
        publication_date_time: parse_publication_timestamp(&envelope.publication_date_time)?,
        metadata: parse_metadata(&envelope.metadata, envelope.languages.as_deref(), language)?,
        item,
    })
}

/// Parses a raw API response body (`{"result": {"ochre": ...}}`).
pub fn parse_response(json: &str, options: &ParseOptions) -> Result<Fetched<Item>> {
    let response: RawResponse = serde_json::from_str(json)?;
    parse_envelope(&response.result.ochre, options)
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Fetches and assembles any entity.
pub async fn fetch_item(fetcher: &dyn Fetcher, uuid: Uuid, options: &ParseOptions) -> Result<Fetched<Item>> {
    debug!(%uuid, "fetching entity");
    let envelope = fetcher.fetch_entity_by_uuid(uuid).await?;
    parse_envelope(&envelope, options)
}

fn expect_kind<T>(
    fetched: Fetched<Item>,
    expected: &'static str,
    extract: impl FnOnce(Item) -> std::result::Result<T, Item>,
) -> Result<Fetched<T>> {
    let Fetched {
        uuid,
        belongs_to,
        publication_date_time,
        metadata,
        item,
    } = fetched;
    match extract(item) {
        Ok(item) => Ok(Fetched {
            uuid,
            belongs_to,
            publication_date_time,
            metadata,
            item,
        }),
        Err(other) => Err(Error::UnexpectedKind {
            expected,
            found: other.kind(),
        }),
    }
}

pub async fn fetch_resource(fetcher: &dyn Fetcher, uuid: Uuid, options: &ParseOptions) -> Result<Fetched<Resource>> {
    let fetched = fetch_item(fetcher, uuid, options).await?;
    expect_kind(fetched, "resource", |item| match item {
        Item::Resource(resource) => Ok(resource),
        other => Err(other),
    })
}

pub async fn fetch_spatial_unit(
    fetcher: &dyn Fetcher,
    uuid: Uuid,
    options: &ParseOptions,
) -> Result<Fetched<SpatialUnit>> {
    let fetched = fetch_item(fetcher, uuid, options).await?;
    expect_kind(fetched, "spatialUnit", |item| match item {
        Item::SpatialUnit(unit) => Ok(unit),
        other => Err(other),
    })
}

pub async fn fetch_concept(fetcher: &dyn Fetcher, uuid: Uuid, options: &ParseOptions) -> Result<Fetched<Concept>> {
    let fetched = fetch_item(fetcher, uuid, options).await?;
    expect_kind(fetched, "concept", |item| match item {
        Item::Concept(concept) => Ok(concept),
        other => Err(other),
    })
}

pub async fn fetch_set(fetcher: &dyn Fetcher, uuid: Uuid, options: &ParseOptions) -> Result<Fetched<Set>> {
    let fetched = fetch_item(fetcher, uuid, options).await?;
    expect_kind(fetched, "set", |item| match item {
        Item::Set(set) => Ok(set),
        other => Err(other),
    })
}

pub async fn fetch_tree(fetcher: &dyn Fetcher, uuid: Uuid, options: &ParseOptions) -> Result<Fetched<Tree>> {
    let fetched = fetch_item(fetcher, uuid, options).await?;
    expect_kind(fetched, "tree", |item| match item {
        Item::Tree(tree) => Ok(tree),
        other => Err(other),
    })
}

pub async fn fetch_bibliography(
    fetcher: &dyn Fetcher,
    uuid: Uuid,
    options: &ParseOptions,
) -> Result<Fetched<Bibliography>> {
    let fetched = fetch_item(fetcher, uuid, options).await?;
    expect_kind(fetched, "bibliography", |item| match item {
        Item::Bibliography(bibliography) => Ok(bibliography),
        other => Err(other),
    })
}

/// Fetches a website tree and builds its page hierarchy.
///
/// Text components whose body lives in a separate document are resolved
/// through `fetcher` as the tree is walked.
pub async fn fetch_website(fetcher: &dyn Fetcher, uuid: Uuid, options: &ParseOptions) -> Result<Fetched<Website>> {
    debug!(%uuid, "assembling website");
    let fetched = fetch_tree(fetcher, uuid, options).await?;
    let website = build_website(&fetched.item, fetcher, &options.language).await?;
    Ok(fetched.map(|_| website))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const UUID: &str = "5b2a7a2c-1f3e-4a55-9f4a-0c9d1e2f3a4b";

    struct MapFetcher(HashMap<Uuid, String>);

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch_entity_by_uuid(&self, uuid: Uuid) -> Result<RawEnvelope, FetchError> {
            let body = self.0.get(&uuid).ok_or(FetchError::NotFound {
                uuid: uuid.to_string(),
            })?;
            let response: RawResponse =
                serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
            Ok(response.result.ochre)
        }
    }

    fn concept_response() -> String {
        format!(
            r#"{{"result": {{"ochre": {{
                "uuid": "{UUID}",
                "uuidBelongsTo": "{UUID}",
                "belongsTo": "DEMO",
                "publicationDateTime": "2024-01-01T00:00:00Z",
                "languages": "eng fra",
                "metadata": {{"project": {{"identification": {{"label": "Demo project"}}}}}},
                "concept": {{"uuid": "{UUID}", "publicationDateTime": "2024-01-01T00:00:00Z", "identification": {{"label": "Jar"}}}}
            }}}}}}"#
        )
    }

    #[test]
    fn test_parse_response() {
        let fetched = parse_response(&concept_response(), &ParseOptions::default()).unwrap();
        assert_eq!(fetched.item.kind(), "concept");
        assert_eq!(fetched.belongs_to.as_ref().map(|p| p.abbreviation.as_str()), Some("DEMO"));
        assert_eq!(fetched.metadata.languages, vec!["eng", "fra"]);
        assert_eq!(
            fetched.metadata.project.as_ref().map(|p| p.label.as_str()),
            Some("Demo project")
        );
    }

    #[test]
    fn test_parse_response_malformed() {
        let err = parse_response("{\"result\": {}}", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn test_parse_response_non_ascii_timestamp() {
        let json = concept_response().replacen("2024-01-01T00:00:00Z", "2024-01-01T00:00:0é", 1);
        let err = parse_response(&json, &ParseOptions::default()).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidTimestamp {
                value: "2024-01-01T00:00:0é".into()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_typed() {
        let uuid = Uuid::parse_str(UUID).unwrap();
        let fetcher = MapFetcher(HashMap::from([(uuid, concept_response())]));
        let options = ParseOptions::default();

        let concept = fetch_concept(&fetcher, uuid, &options).await.unwrap();
        assert_eq!(concept.item.nested.identification.label, "Jar");

        let err = fetch_resource(&fetcher, uuid, &options).await.unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedKind {
                expected: "resource",
                found: "concept"
            }
        );

        let missing = Uuid::nil();
        let err = fetch_item(&fetcher, missing, &options).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::NotFound { .. })));
    }
}
