//! Resolved links between entities.

use serde::Serialize;
use uuid::Uuid;

use crate::model::{Bibliography, Identification};
use crate::util::Timestamp;

/// Kind of entity a link points to.
///
/// Declaration order is the precedence used when a raw link carries
/// several target keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkVariant {
    Resource,
    SpatialUnit,
    Concept,
    Set,
    Tree,
    Person,
    Bibliography,
    EpigraphicUnit,
}

impl LinkVariant {
    /// All variants in precedence order.
    pub const ALL: [LinkVariant; 8] = [
        LinkVariant::Resource,
        LinkVariant::SpatialUnit,
        LinkVariant::Concept,
        LinkVariant::Set,
        LinkVariant::Tree,
        LinkVariant::Person,
        LinkVariant::Bibliography,
        LinkVariant::EpigraphicUnit,
    ];

    /// Returns the wire key (e.g., "spatialUnit").
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkVariant::Resource => "resource",
            LinkVariant::SpatialUnit => "spatialUnit",
            LinkVariant::Concept => "concept",
            LinkVariant::Set => "set",
            LinkVariant::Tree => "tree",
            LinkVariant::Person => "person",
            LinkVariant::Bibliography => "bibliography",
            LinkVariant::EpigraphicUnit => "epigraphicUnit",
        }
    }
}

/// Full and preview geometry of a linked image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkImage {
    pub is_inline: bool,
    pub height: u32,
    pub width: u32,
    pub height_preview: u32,
    pub width_preview: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub variant: LinkVariant,
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub link_type: Option<String>,
    pub identification: Option<Identification>,
    pub content: Option<String>,
    pub href: Option<String>,
    pub publication_date_time: Option<Timestamp>,
    /// Present only when all four dimensions were supplied.
    pub image: Option<LinkImage>,
    /// Present only for bibliography links.
    pub bibliographies: Option<Vec<Bibliography>>,
}

impl Link {
    /// Returns true if the link targets a resource of the given type.
    pub fn is_resource_of_type(&self, link_type: &str) -> bool {
        self.variant == LinkVariant::Resource && self.link_type.as_deref() == Some(link_type)
    }
}
