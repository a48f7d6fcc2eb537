//! Website and webpage tree building.
//!
//! A website is a tree whose top-level properties carry the site
//! configuration and whose resources are classified by their presentation:
//! pages (with sub-pages and elements), sidebar elements, or fragments kept
//! outside the page tree.

use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::model::{
    NestedResource, NestedWebsite, PageItem, PageVariant, PageWidth, Privacy, Property, Status,
    Theme, Tree, WebElement, Webpage, Website, WebsiteProperties,
};
use crate::parse::component::{build_component, ComponentContext};
use crate::parse::presentation::{decode_presentation, PresentationKind, PRESENTATION_LABEL};
use crate::parse::property::find_property;
use crate::url::load_url;

// =============================================================================
// CONFIGURATION
// =============================================================================

fn invalid(field: &'static str, value: impl Into<String>) -> Error {
    Error::InvalidConfiguration {
        field,
        value: value.into(),
    }
}

/// Reads a Yes/No setting; anything else is a configuration error.
fn parse_flag(settings: &[Property], label: &'static str, default: bool) -> Result<bool> {
    match find_property(settings, label, false).and_then(Property::first_value) {
        None => Ok(default),
        Some("Yes") => Ok(true),
        Some("No") => Ok(false),
        Some(other) => Err(invalid(label, other)),
    }
}

fn parse_setting<T>(
    settings: &[Property],
    label: &'static str,
    from_tag: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    match find_property(settings, label, false).and_then(Property::first_value) {
        None => Ok(None),
        Some(tag) => from_tag(tag).map(Some).ok_or_else(|| invalid(label, tag)),
    }
}

/// Decodes site-wide settings from a website tree's top-level properties.
pub fn parse_website_properties(properties: &[Property]) -> Result<WebsiteProperties> {
    let presentation = properties
        .iter()
        .find(|p| p.label == PRESENTATION_LABEL)
        .ok_or_else(|| invalid("presentation", ""))?;
    let settings = presentation.properties.as_slice();

    let logo_url = match find_property(settings, "logo", false) {
        Some(logo) => {
            let uuid = logo
                .values
                .first()
                .and_then(|v| v.uuid)
                .ok_or_else(|| invalid("logo", logo.first_value().unwrap_or_default()))?;
            Some(load_url(&uuid))
        }
        None => None,
    };
    let search_collection = match find_property(settings, "search-collection", false) {
        Some(collection) => Some(
            collection
                .values
                .first()
                .and_then(|v| v.uuid)
                .ok_or_else(|| {
                    invalid("search-collection", collection.first_value().unwrap_or_default())
                })?,
        ),
        None => None,
    };

    Ok(WebsiteProperties {
        theme: parse_setting(settings, "theme", Theme::from_tag)?.unwrap_or_default(),
        status: parse_setting(settings, "status", Status::from_tag)?.unwrap_or_default(),
        privacy: parse_setting(settings, "privacy", Privacy::from_tag)?.unwrap_or_default(),
        is_header_displayed: parse_flag(settings, "navbar-visible", true)?,
        is_footer_displayed: parse_flag(settings, "footer-visible", true)?,
        is_sidebar_displayed: parse_flag(settings, "sidebar-visible", false)?,
        logo_url,
        search_collection,
    })
}

/// Maps a raw page slug: the root "/" becomes empty.
pub fn normalize_slug(slug: &str) -> String {
    if slug == "/" {
        String::new()
    } else {
        slug.to_string()
    }
}

// =============================================================================
// PAGES AND ELEMENTS
// =============================================================================

/// Builds one element and its component.
pub fn build_element<'a>(
    resource: &'a NestedResource,
    fetcher: &'a dyn Fetcher,
    language: &'a str,
) -> BoxFuture<'a, Result<WebElement>> {
    Box::pin(async move {
        let presentation = decode_presentation(&resource.properties);
        let title = resource.identification.label.clone();
        let directive = presentation
            .component
            .as_ref()
            .ok_or_else(|| invalid("component", title.as_str()))?;
        debug!(uuid = %resource.uuid, component = %directive.tag, "building element");

        let component = build_component(ComponentContext {
            resource,
            directive,
            fetcher,
            language,
        })
        .await?;

        Ok(WebElement {
            uuid: resource.uuid,
            title,
            css_styles: presentation.css_styles.clone(),
            component,
        })
    })
}

/// Builds a page, its sub-pages and its elements, in source order.
pub fn build_page<'a>(
    resource: &'a NestedResource,
    fetcher: &'a dyn Fetcher,
    language: &'a str,
) -> BoxFuture<'a, Result<Webpage>> {
    Box::pin(async move {
        let presentation = decode_presentation(&resource.properties);
        let title = resource.identification.label.clone();
        let slug = resource
            .slug
            .as_deref()
            .map(normalize_slug)
            .ok_or_else(|| invalid("slug", title.as_str()))?;
        debug!(uuid = %resource.uuid, slug = %slug, "building page");

        let background_image_url = resource
            .links
            .iter()
            .find(|l| l.is_resource_of_type("image") || l.is_resource_of_type("IIIF"))
            .map(|l| load_url(&l.uuid));

        let mut items = Vec::new();
        for child in &resource.resources {
            match decode_presentation(&child.properties).kind {
                PresentationKind::Page => {
                    items.push(PageItem::Page(build_page(child, fetcher, language).await?))
                }
                PresentationKind::Element => {
                    items.push(PageItem::Element(build_element(child, fetcher, language).await?))
                }
                other => {
                    warn!(uuid = %child.uuid, kind = ?other, "skipping resource inside page");
                }
            }
        }

        Ok(Webpage {
            uuid: resource.uuid,
            title,
            slug,
            is_displayed_in_header: parse_flag(&presentation.settings, "header", true)?,
            width: parse_setting(&presentation.settings, "width", PageWidth::from_tag)?
                .unwrap_or_default(),
            variant: parse_setting(&presentation.settings, "variant", PageVariant::from_tag)?
                .unwrap_or_default(),
            background_image_url,
            css_styles: presentation.css_styles,
            items,
        })
    })
}

// =============================================================================
// WEBSITE
// =============================================================================

/// Builds the website held by an assembled tree.
///
/// Top-level pages form the page tree, top-level elements the sidebar, and
/// any other resource is kept as a fragment.
pub async fn build_website(tree: &Tree, fetcher: &dyn Fetcher, language: &str) -> Result<Website> {
    let nested = &tree.nested;
    let properties = parse_website_properties(&nested.properties)?;

    let mut pages = Vec::new();
    let mut sidebar = Vec::new();
    let mut fragments = Vec::new();
    for resource in &nested.items.resources {
        match decode_presentation(&resource.properties).kind {
            PresentationKind::Page => pages.push(build_page(resource, fetcher, language).await?),
            PresentationKind::Element => {
                sidebar.push(build_element(resource, fetcher, language).await?)
            }
            _ => fragments.push(resource.clone()),
        }
    }

    Ok(Website {
        nested: NestedWebsite {
            uuid: nested.uuid,
            identification: nested.identification.clone(),
            creators: nested.creators.clone(),
            properties,
            pages,
            sidebar,
            fragments,
        },
        publication_date_time: tree.publication_date_time,
        license: tree.license.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyValue;
    use pretty_assertions::assert_eq;

    fn prop(label: &str, value: &str, children: Vec<Property>) -> Property {
        Property {
            label: label.to_string(),
            values: vec![PropertyValue::text(value)],
            comment: None,
            properties: children,
        }
    }

    #[test]
    fn test_slug_law() {
        assert_eq!(normalize_slug("/"), "");
        assert_eq!(normalize_slug("about"), "about");
        assert_eq!(normalize_slug("/about"), "/about");
    }

    #[test]
    fn test_website_defaults() {
        let props = vec![prop("presentation", "website", vec![])];
        assert_eq!(parse_website_properties(&props).unwrap(), WebsiteProperties::default());
    }

    #[test]
    fn test_website_settings() {
        let props = vec![prop(
            "presentation",
            "website",
            vec![
                prop("theme", "palm", vec![]),
                prop("status", "production", vec![]),
                prop("privacy", "password", vec![]),
                prop("sidebar-visible", "Yes", vec![]),
                prop("footer-visible", "No", vec![]),
            ],
        )];
        let parsed = parse_website_properties(&props).unwrap();
        assert_eq!(parsed.theme, Theme::Palm);
        assert_eq!(parsed.status, Status::Production);
        assert_eq!(parsed.privacy, Privacy::Password);
        assert!(parsed.is_sidebar_displayed);
        assert!(!parsed.is_footer_displayed);
        assert!(parsed.is_header_displayed);
    }

    #[test]
    fn test_website_invalid_settings() {
        let missing = parse_website_properties(&[]).unwrap_err();
        assert_eq!(missing.kind().name(), "InvalidConfigurationError");

        let props = vec![prop("presentation", "website", vec![prop("theme", "neon", vec![])])];
        assert_eq!(
            parse_website_properties(&props).unwrap_err(),
            Error::InvalidConfiguration { field: "theme", value: "neon".into() }
        );

        let props = vec![prop("presentation", "website", vec![prop("navbar-visible", "maybe", vec![])])];
        assert!(parse_website_properties(&props).is_err());

        let props = vec![prop("presentation", "website", vec![prop("logo", "no uuid", vec![])])];
        assert!(parse_website_properties(&props).is_err());
    }
}
