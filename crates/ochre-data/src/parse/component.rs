//! Web component registry.
//!
//! Every element names one component tag. Each tag has a contract: the
//! component properties and outbound links it needs. A missing dependency
//! fails with [`Error::MissingComponentDependency`]; a tag outside the
//! registry fails with [`Error::UnknownComponent`].

use futures::future::BoxFuture;
use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::fetch::{fetch_resource, Fetcher};
use crate::model::{
    BibliographyLayout, ButtonData, CollectionData, Component, Document, EmptySpaceData,
    IframeData, ImageData, ImageRef, Link, LinkVariant, NestedResource, SearchBarData, TextData,
    TextImageData, VideoData, WebElement,
};
use crate::options::ParseOptions;
use crate::parse::presentation::{decode_presentation, ComponentDirective, PresentationKind};
use crate::parse::website::build_element;
use crate::url::{load_url, preview_url};

/// Component tags understood by the website builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    AnnotatedDocument,
    AnnotatedImage,
    Bibliography,
    Button,
    Collection,
    EmptySpace,
    Iframe,
    IiifViewer,
    Image,
    ImageGallery,
    Map,
    NColumns,
    NRows,
    SearchBar,
    Table,
    Text,
    TextImage,
    Timeline,
    Video,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 19] = [
        ComponentKind::AnnotatedDocument,
        ComponentKind::AnnotatedImage,
        ComponentKind::Bibliography,
        ComponentKind::Button,
        ComponentKind::Collection,
        ComponentKind::EmptySpace,
        ComponentKind::Iframe,
        ComponentKind::IiifViewer,
        ComponentKind::Image,
        ComponentKind::ImageGallery,
        ComponentKind::Map,
        ComponentKind::NColumns,
        ComponentKind::NRows,
        ComponentKind::SearchBar,
        ComponentKind::Table,
        ComponentKind::Text,
        ComponentKind::TextImage,
        ComponentKind::Timeline,
        ComponentKind::Video,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ComponentKind::AnnotatedDocument => "annotated-document",
            ComponentKind::AnnotatedImage => "annotated-image",
            ComponentKind::Bibliography => "bibliography",
            ComponentKind::Button => "button",
            ComponentKind::Collection => "collection",
            ComponentKind::EmptySpace => "empty-space",
            ComponentKind::Iframe => "iframe",
            ComponentKind::IiifViewer => "iiif-viewer",
            ComponentKind::Image => "image",
            ComponentKind::ImageGallery => "image-gallery",
            ComponentKind::Map => "map",
            ComponentKind::NColumns => "n-columns",
            ComponentKind::NRows => "n-rows",
            ComponentKind::SearchBar => "search-bar",
            ComponentKind::Table => "table",
            ComponentKind::Text => "text",
            ComponentKind::TextImage => "text-image",
            ComponentKind::Timeline => "timeline",
            ComponentKind::Video => "video",
        }
    }
}

lazy_static! {
    static ref REGISTRY: FxHashMap<&'static str, ComponentKind> =
        ComponentKind::ALL.iter().map(|kind| (kind.tag(), *kind)).collect();
}

/// Looks up a component tag.
pub fn lookup_component(tag: &str) -> Option<ComponentKind> {
    REGISTRY.get(tag).copied()
}

// =============================================================================
// CONTRACT HELPERS
// =============================================================================

/// Everything a component builder may read.
pub struct ComponentContext<'a> {
    pub resource: &'a NestedResource,
    pub directive: &'a ComponentDirective,
    pub fetcher: &'a dyn Fetcher,
    pub language: &'a str,
}

impl<'a> ComponentContext<'a> {
    fn title(&self) -> &'a str {
        &self.resource.identification.label
    }

    fn missing(&self, dependency: &'static str) -> Error {
        Error::MissingComponentDependency {
            component: self.directive.tag.clone(),
            element: self.title().to_string(),
            dependency,
        }
    }

    fn property(&self, label: &str) -> Option<&'a str> {
        self.directive.value(label)
    }

    fn required_property(&self, label: &str, dependency: &'static str) -> Result<&'a str> {
        self.property(label).ok_or_else(|| self.missing(dependency))
    }

    fn flag(&self, label: &str) -> bool {
        self.property(label) == Some("Yes")
    }

    fn find_link(&self, pred: impl Fn(&Link) -> bool) -> Option<&'a Link> {
        self.resource.links.iter().find(|l| pred(l))
    }

    fn required_link(&self, variant: LinkVariant, dependency: &'static str) -> Result<&'a Link> {
        self.find_link(|l| l.variant == variant)
            .ok_or_else(|| self.missing(dependency))
    }

    fn image_links(&self) -> impl Iterator<Item = &'a Link> {
        self.resource
            .links
            .iter()
            .filter(|l| l.is_resource_of_type("image"))
    }
}

fn image_ref(link: &Link) -> ImageRef {
    ImageRef {
        uuid: link.uuid,
        label: link.identification.as_ref().map(|id| id.label.clone()),
        url: load_url(&link.uuid),
        preview_url: preview_url(&link.uuid),
        height: link.image.map(|i| i.height),
        width: link.image.map(|i| i.width),
    }
}

/// The element's own document, else the first linked internal document.
async fn resolve_document(ctx: &ComponentContext<'_>) -> Result<Document> {
    if let Some(document) = &ctx.resource.document {
        return Ok(document.clone());
    }
    let link = ctx
        .find_link(|l| l.is_resource_of_type("internalDocument"))
        .ok_or_else(|| ctx.missing("document"))?;
    let options = ParseOptions::with_language(ctx.language);
    let fetched = fetch_resource(ctx.fetcher, link.uuid, &options).await?;
    fetched
        .item
        .nested
        .document
        .ok_or_else(|| ctx.missing("document"))
}

async fn child_elements(ctx: &ComponentContext<'_>) -> Result<Vec<WebElement>> {
    let mut elements = Vec::new();
    for child in &ctx.resource.resources {
        if decode_presentation(&child.properties).kind == PresentationKind::Element {
            elements.push(build_element(child, ctx.fetcher, ctx.language).await?);
        }
    }
    Ok(elements)
}

// =============================================================================
// BUILDERS
// =============================================================================

/// Builds the component an element's directive names.
pub fn build_component<'a>(ctx: ComponentContext<'a>) -> BoxFuture<'a, Result<Component>> {
    Box::pin(async move {
        let kind = lookup_component(&ctx.directive.tag).ok_or_else(|| Error::UnknownComponent {
            component: ctx.directive.tag.clone(),
            element: ctx.title().to_string(),
        })?;

        let component = match kind {
            ComponentKind::AnnotatedDocument => Component::AnnotatedDocument {
                document: resolve_document(&ctx).await?,
            },
            ComponentKind::AnnotatedImage => Component::AnnotatedImage {
                image_uuid: ctx
                    .image_links()
                    .next()
                    .ok_or_else(|| ctx.missing("image link"))?
                    .uuid,
                is_searchable: ctx.flag("is-searchable"),
            },
            ComponentKind::Bibliography => {
                let mut bibliographies = ctx.resource.cited_bibliographies.clone();
                for link in &ctx.resource.links {
                    if let Some(linked) = &link.bibliographies {
                        bibliographies.extend(linked.iter().cloned());
                    }
                }
                if bibliographies.is_empty() {
                    return Err(ctx.missing("bibliography"));
                }
                Component::Bibliography {
                    layout: match ctx.property("layout") {
                        Some("short") => BibliographyLayout::Short,
                        _ => BibliographyLayout::Long,
                    },
                    bibliographies,
                }
            }
            ComponentKind::Button => {
                let (href, is_external) = match (ctx.property("navigate-to"), ctx.property("link-to")) {
                    (Some(path), _) => (path.to_string(), false),
                    (None, Some(target)) => {
                        let href = match ctx.resource.links.first() {
                            Some(link) => link.href.clone().unwrap_or_else(|| load_url(&link.uuid)),
                            None => target.to_string(),
                        };
                        (href, true)
                    }
                    (None, None) => return Err(ctx.missing("navigate-to or link-to")),
                };
                Component::Button(ButtonData {
                    label: ctx.title().to_string(),
                    href,
                    is_external,
                })
            }
            ComponentKind::Collection => Component::Collection(CollectionData {
                variant: ctx.required_property("variant", "variant property")?.to_string(),
                item_variant: ctx.property("item-variant").unwrap_or("detailed").to_string(),
                is_searchable: ctx.flag("is-searchable"),
                collection_uuid: ctx.required_link(LinkVariant::Set, "set link")?.uuid,
            }),
            ComponentKind::EmptySpace => Component::EmptySpace(EmptySpaceData {
                height: ctx.property("height").map(str::to_string),
                width: ctx.property("width").map(str::to_string),
            }),
            ComponentKind::Iframe => {
                let href = ctx
                    .find_link(|l| l.href.is_some())
                    .and_then(|l| l.href.clone())
                    .ok_or_else(|| ctx.missing("link with href"))?;
                Component::Iframe(IframeData {
                    href,
                    height: ctx.property("height").map(str::to_string),
                    width: ctx.property("width").map(str::to_string),
                })
            }
            ComponentKind::IiifViewer => Component::IiifViewer {
                iiif_uuid: ctx.required_link(LinkVariant::Resource, "resource link")?.uuid,
            },
            ComponentKind::Image => {
                let images: Vec<ImageRef> = ctx.image_links().map(image_ref).collect();
                if images.is_empty() {
                    return Err(ctx.missing("image link"));
                }
                Component::Image(ImageData {
                    variant: ctx.property("variant").unwrap_or("default").to_string(),
                    images,
                })
            }
            ComponentKind::ImageGallery => Component::ImageGallery {
                gallery_uuid: ctx.required_link(LinkVariant::Tree, "tree link")?.uuid,
            },
            ComponentKind::Map => Component::Map {
                map_uuid: ctx.required_link(LinkVariant::Set, "set link")?.uuid,
            },
            ComponentKind::NColumns => Component::NColumns {
                columns: child_elements(&ctx).await?,
            },
            ComponentKind::NRows => Component::NRows {
                rows: child_elements(&ctx).await?,
            },
            ComponentKind::SearchBar => Component::SearchBar(SearchBarData {
                variant: ctx.property("variant").unwrap_or("default").to_string(),
                placeholder: ctx.property("placeholder").map(str::to_string),
                base_query: ctx.property("base-query").map(str::to_string),
            }),
            ComponentKind::Table => Component::Table {
                table_uuid: ctx.required_link(LinkVariant::Set, "set link")?.uuid,
            },
            ComponentKind::Text => Component::Text(TextData {
                variant: ctx.property("variant").unwrap_or("block").to_string(),
                document: resolve_document(&ctx).await?,
            }),
            ComponentKind::TextImage => {
                let image = ctx
                    .image_links()
                    .next()
                    .map(image_ref)
                    .ok_or_else(|| ctx.missing("image link"))?;
                Component::TextImage(TextImageData {
                    variant: ctx.property("variant").unwrap_or("block").to_string(),
                    document: resolve_document(&ctx).await?,
                    image,
                    image_opacity: ctx.property("image-opacity").and_then(|v| v.parse().ok()),
                })
            }
            ComponentKind::Timeline => Component::Timeline {
                timeline_uuid: ctx.required_link(LinkVariant::Tree, "tree link")?.uuid,
            },
            ComponentKind::Video => Component::Video(VideoData {
                video_uuid: ctx.required_link(LinkVariant::Resource, "resource link")?.uuid,
                is_chapters_displayed: ctx.flag("chapters-displayed"),
            }),
        };
        Ok(component)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_tag() {
        for kind in ComponentKind::ALL {
            assert_eq!(lookup_component(kind.tag()), Some(kind));
        }
        assert_eq!(lookup_component("carousel"), None);
    }
}
