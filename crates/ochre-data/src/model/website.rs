//! Websites, pages and web elements.

use serde::Serialize;
use uuid::Uuid;

use crate::model::{Bibliography, Document, Identification, License, NestedResource, Person};
use crate::util::Timestamp;

// =============================================================================
// CONFIGURATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Traditional,
    DigitalCollection,
    Plum,
    Cedar,
    Elm,
    Maple,
    Oak,
    Palm,
}

impl Theme {
    pub fn from_tag(tag: &str) -> Option<Theme> {
        match tag {
            "traditional" => Some(Theme::Traditional),
            "digital-collection" => Some(Theme::DigitalCollection),
            "plum" => Some(Theme::Plum),
            "cedar" => Some(Theme::Cedar),
            "elm" => Some(Theme::Elm),
            "maple" => Some(Theme::Maple),
            "oak" => Some(Theme::Oak),
            "palm" => Some(Theme::Palm),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Development,
    Preview,
    Production,
}

impl Status {
    pub fn from_tag(tag: &str) -> Option<Status> {
        match tag {
            "development" => Some(Status::Development),
            "preview" => Some(Status::Preview),
            "production" => Some(Status::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Privacy {
    #[default]
    Public,
    Password,
    Private,
}

impl Privacy {
    pub fn from_tag(tag: &str) -> Option<Privacy> {
        match tag {
            "public" => Some(Privacy::Public),
            "password" => Some(Privacy::Password),
            "private" => Some(Privacy::Private),
            _ => None,
        }
    }
}

/// Site-wide settings decoded from the tree's presentation properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteProperties {
    pub theme: Theme,
    pub status: Status,
    pub privacy: Privacy,
    pub is_header_displayed: bool,
    pub is_footer_displayed: bool,
    pub is_sidebar_displayed: bool,
    pub logo_url: Option<String>,
    pub search_collection: Option<Uuid>,
}

impl Default for WebsiteProperties {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            status: Status::default(),
            privacy: Privacy::default(),
            is_header_displayed: true,
            is_footer_displayed: true,
            is_sidebar_displayed: false,
            logo_url: None,
            search_collection: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssStyle {
    pub label: String,
    pub value: String,
}

// =============================================================================
// PAGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageWidth {
    Full,
    Large,
    Narrow,
    #[default]
    Default,
}

impl PageWidth {
    pub fn from_tag(tag: &str) -> Option<PageWidth> {
        match tag {
            "full" => Some(PageWidth::Full),
            "large" => Some(PageWidth::Large),
            "narrow" => Some(PageWidth::Narrow),
            "default" => Some(PageWidth::Default),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageVariant {
    #[default]
    Default,
    NoBackground,
}

impl PageVariant {
    pub fn from_tag(tag: &str) -> Option<PageVariant> {
        match tag {
            "default" => Some(PageVariant::Default),
            "no-background" => Some(PageVariant::NoBackground),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Webpage {
    pub uuid: Uuid,
    pub title: String,
    /// Empty for the site root.
    pub slug: String,
    pub is_displayed_in_header: bool,
    pub width: PageWidth,
    pub variant: PageVariant,
    pub background_image_url: Option<String>,
    pub css_styles: Vec<CssStyle>,
    /// Sub-pages and elements in source order.
    pub items: Vec<PageItem>,
}

impl Webpage {
    pub fn webpages(&self) -> impl Iterator<Item = &Webpage> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Page(page) => Some(page),
            PageItem::Element(_) => None,
        })
    }

    pub fn elements(&self) -> impl Iterator<Item = &WebElement> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Element(element) => Some(element),
            PageItem::Page(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum PageItem {
    Page(Webpage),
    Element(WebElement),
}

// =============================================================================
// ELEMENTS AND COMPONENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebElement {
    pub uuid: Uuid,
    pub title: String,
    pub css_styles: Vec<CssStyle>,
    pub component: Component,
}

/// A linked image as shown by image-bearing components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub uuid: Uuid,
    pub label: Option<String>,
    pub url: String,
    pub preview_url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BibliographyLayout {
    #[default]
    Long,
    Short,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonData {
    pub label: String,
    pub href: String,
    pub is_external: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionData {
    pub variant: String,
    pub item_variant: String,
    pub is_searchable: bool,
    pub collection_uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptySpaceData {
    pub height: Option<String>,
    pub width: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IframeData {
    pub href: String,
    pub height: Option<String>,
    pub width: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub variant: String,
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBarData {
    pub variant: String,
    pub placeholder: Option<String>,
    pub base_query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextData {
    pub variant: String,
    pub document: Document,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextImageData {
    pub variant: String,
    pub document: Document,
    pub image: ImageRef,
    pub image_opacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoData {
    pub video_uuid: Uuid,
    pub is_chapters_displayed: bool,
}

/// A UI component with the data its contract requires.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component", rename_all = "kebab-case")]
pub enum Component {
    AnnotatedDocument {
        document: Document,
    },
    #[serde(rename_all = "camelCase")]
    AnnotatedImage {
        image_uuid: Uuid,
        is_searchable: bool,
    },
    Bibliography {
        layout: BibliographyLayout,
        bibliographies: Vec<Bibliography>,
    },
    Button(ButtonData),
    Collection(CollectionData),
    EmptySpace(EmptySpaceData),
    Iframe(IframeData),
    #[serde(rename_all = "camelCase")]
    IiifViewer {
        iiif_uuid: Uuid,
    },
    Image(ImageData),
    #[serde(rename_all = "camelCase")]
    ImageGallery {
        gallery_uuid: Uuid,
    },
    #[serde(rename_all = "camelCase")]
    Map {
        map_uuid: Uuid,
    },
    NColumns {
        columns: Vec<WebElement>,
    },
    NRows {
        rows: Vec<WebElement>,
    },
    SearchBar(SearchBarData),
    #[serde(rename_all = "camelCase")]
    Table {
        table_uuid: Uuid,
    },
    Text(TextData),
    TextImage(TextImageData),
    #[serde(rename_all = "camelCase")]
    Timeline {
        timeline_uuid: Uuid,
    },
    Video(VideoData),
}

impl Component {
    /// Returns the component tag (e.g., "n-columns").
    pub fn tag(&self) -> &'static str {
        match self {
            Component::AnnotatedDocument { .. } => "annotated-document",
            Component::AnnotatedImage { .. } => "annotated-image",
            Component::Bibliography { .. } => "bibliography",
            Component::Button(_) => "button",
            Component::Collection(_) => "collection",
            Component::EmptySpace(_) => "empty-space",
            Component::Iframe(_) => "iframe",
            Component::IiifViewer { .. } => "iiif-viewer",
            Component::Image(_) => "image",
            Component::ImageGallery { .. } => "image-gallery",
            Component::Map { .. } => "map",
            Component::NColumns { .. } => "n-columns",
            Component::NRows { .. } => "n-rows",
            Component::SearchBar(_) => "search-bar",
            Component::Table { .. } => "table",
            Component::Text(_) => "text",
            Component::TextImage(_) => "text-image",
            Component::Timeline { .. } => "timeline",
            Component::Video(_) => "video",
        }
    }
}

// =============================================================================
// WEBSITE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedWebsite {
    pub uuid: Uuid,
    pub identification: Identification,
    pub creators: Vec<Person>,
    pub properties: WebsiteProperties,
    pub pages: Vec<Webpage>,
    /// Top-level elements shown beside every page.
    pub sidebar: Vec<WebElement>,
    /// Top-level resources that are neither pages nor elements.
    pub fragments: Vec<NestedResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    #[serde(flatten)]
    pub nested: NestedWebsite,
    pub publication_date_time: Option<Timestamp>,
    pub license: Option<License>,
}
