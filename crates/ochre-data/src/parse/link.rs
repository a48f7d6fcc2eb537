//! Link resolution.
//!
//! A raw link names its target kind by which key it carries. Keys are
//! scanned in [`LinkVariant::ALL`] order and the first one present wins.

use std::borrow::Cow;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{Link, LinkImage, LinkVariant};
use crate::parse::entity::assemble_bibliography;
use crate::parse::property::parse_publication_timestamp;
use crate::parse::string::{parse_optional_fake_string, parse_optional_identification};
use crate::raw::{OneOrMany, RawBibliography, RawIdentification, RawLink, RawLinkItem};

/// The items behind the first present target key.
pub(crate) enum LinkTargets<'a> {
    Items(LinkVariant, &'a [RawLinkItem]),
    Bibliographies(&'a [RawBibliography]),
}

fn present_keys(raw: &RawLink) -> Vec<String> {
    raw.other.keys().cloned().collect()
}

/// Finds the first present target key in scan order.
pub(crate) fn link_targets(raw: &RawLink) -> Result<LinkTargets<'_>> {
    for variant in LinkVariant::ALL {
        let items: Option<&OneOrMany<RawLinkItem>> = match variant {
            LinkVariant::Resource => raw.resource.as_ref(),
            LinkVariant::SpatialUnit => raw.spatial_unit.as_ref(),
            LinkVariant::Concept => raw.concept.as_ref(),
            LinkVariant::Set => raw.set.as_ref(),
            LinkVariant::Tree => raw.tree.as_ref(),
            LinkVariant::Person => raw.person.as_ref(),
            LinkVariant::EpigraphicUnit => raw.epigraphic_unit.as_ref(),
            LinkVariant::Bibliography => {
                if let Some(bibliographies) = &raw.bibliography {
                    return Ok(LinkTargets::Bibliographies(bibliographies.as_slice()));
                }
                continue;
            }
        };
        if let Some(items) = items {
            return Ok(LinkTargets::Items(variant, items.as_slice()));
        }
    }
    Err(Error::InvalidLink {
        keys: present_keys(raw),
    })
}

/// A view of one link target, enough to render an annotation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinkTarget<'a> {
    pub variant: LinkVariant,
    pub uuid: Uuid,
    pub link_type: Option<&'a str>,
    pub is_published: bool,
    pub content: Option<Cow<'a, str>>,
    pub identification: Option<&'a RawIdentification>,
    pub rend: Option<&'a str>,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// The first target of a link, or `None` when its target list is empty.
pub(crate) fn first_target(raw: &RawLink) -> Result<Option<LinkTarget<'_>>> {
    let target = match link_targets(raw)? {
        LinkTargets::Items(variant, items) => items.first().map(|item| LinkTarget {
            variant,
            uuid: item.uuid,
            link_type: item.link_type.as_deref(),
            is_published: item.publication_date_time.is_some(),
            content: item.content.as_ref().map(|c| c.as_text()),
            identification: item.identification.as_ref(),
            rend: item.rend.as_deref(),
            height: item.height,
            width: item.width,
        }),
        LinkTargets::Bibliographies(items) => items.first().map(|item| LinkTarget {
            variant: LinkVariant::Bibliography,
            uuid: item.uuid,
            link_type: item.bibliography_type.as_deref(),
            is_published: item.publication_date_time.is_some(),
            content: item.citation_format_span.as_ref().map(|c| c.as_text()),
            identification: item.identification.as_ref(),
            rend: None,
            height: None,
            width: None,
        }),
    };
    Ok(target)
}

fn link_image(item: &RawLinkItem) -> Option<LinkImage> {
    Some(LinkImage {
        is_inline: item.rend.as_deref() == Some("inline"),
        height: item.height?,
        width: item.width?,
        height_preview: item.height_preview?,
        width_preview: item.width_preview?,
    })
}

fn parse_link_item(variant: LinkVariant, item: &RawLinkItem, language: &str) -> Result<Link> {
    Ok(Link {
        variant,
        uuid: item.uuid,
        link_type: item.link_type.clone(),
        identification: parse_optional_identification(&item.identification, language)?,
        content: parse_optional_fake_string(&item.content),
        href: item.href.clone(),
        publication_date_time: parse_publication_timestamp(&item.publication_date_time)?,
        image: link_image(item),
        bibliographies: None,
    })
}

/// Resolves one raw link.
///
/// Every item under the winning key becomes a [`Link`]. Bibliography items
/// collapse into a single link (keyed by the first item) carrying all of
/// them as resolved bibliographies.
pub fn parse_link(raw: &RawLink, language: &str) -> Result<Vec<Link>> {
    match link_targets(raw)? {
        LinkTargets::Items(variant, items) => items
            .iter()
            .map(|item| parse_link_item(variant, item, language))
            .collect(),
        LinkTargets::Bibliographies(items) => {
            let Some(first) = items.first() else {
                return Ok(Vec::new());
            };
            let bibliographies = items
                .iter()
                .map(|b| assemble_bibliography(b, language))
                .collect::<Result<Vec<_>>>()?;
            Ok(vec![Link {
                variant: LinkVariant::Bibliography,
                uuid: first.uuid,
                link_type: first.bibliography_type.clone(),
                identification: parse_optional_identification(&first.identification, language)?,
                content: parse_optional_fake_string(&first.citation_format_span),
                href: None,
                publication_date_time: parse_publication_timestamp(&first.publication_date_time)?,
                image: None,
                bibliographies: Some(bibliographies),
            }])
        }
    }
}

/// Resolves a list of raw links, flattening their items in order.
pub fn parse_links(raw: &[RawLink], language: &str) -> Result<Vec<Link>> {
    let mut links = Vec::new();
    for link in raw {
        links.extend(parse_link(link, language)?);
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: &str = "5b2a7a2c-1f3e-4a55-9f4a-0c9d1e2f3a4b";

    fn raw(json: &str) -> RawLink {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_first_present_key_wins() {
        let link = raw(&format!(
            r#"{{"concept": {{"uuid": "{UUID}"}}, "resource": {{"uuid": "{UUID}", "type": "image"}}}}"#
        ));
        let links = parse_link(&link, "eng").unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].variant, LinkVariant::Resource);
        assert_eq!(links[0].link_type.as_deref(), Some("image"));
    }

    #[test]
    fn test_unknown_key_is_invalid() {
        let err = parse_link(&raw(r#"{"period": {"uuid": "x"}}"#), "eng").unwrap_err();
        assert_eq!(err.kind().name(), "InvalidLinkError");
        assert_eq!(err, Error::InvalidLink { keys: vec!["period".into()] });
    }

    #[test]
    fn test_image_geometry_requires_all_dimensions() {
        let full = raw(&format!(
            r#"{{"resource": {{"uuid": "{UUID}", "rend": "inline", "height": 10, "width": 20, "heightPreview": 1, "widthPreview": 2}}}}"#
        ));
        let image = parse_link(&full, "eng").unwrap()[0].image.unwrap();
        assert!(image.is_inline);
        assert_eq!((image.height, image.width), (10, 20));

        let partial = raw(&format!(r#"{{"resource": {{"uuid": "{UUID}", "height": 10, "width": 20}}}}"#));
        assert!(parse_link(&partial, "eng").unwrap()[0].image.is_none());
    }

    #[test]
    fn test_many_items() {
        let link = raw(&format!(r#"{{"person": [{{"uuid": "{UUID}"}}, {{"uuid": "{UUID}"}}]}}"#));
        assert_eq!(parse_links(&[link], "eng").unwrap().len(), 2);
    }

    #[test]
    fn test_bibliography_link_resolves_records() {
        let link = raw(&format!(
            r#"{{"bibliography": [{{"uuid": "{UUID}", "citationFormatSpan": "Smith 2001"}}, {{"uuid": "{UUID}"}}]}}"#
        ));
        let links = parse_link(&link, "eng").unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].content.as_deref(), Some("Smith 2001"));
        assert_eq!(links[0].bibliographies.as_ref().map(Vec::len), Some(2));
    }
}
