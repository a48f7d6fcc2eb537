//! Normalization from wire types to canonical types.
//!
//! Every function here is a pure function of its raw input and the requested
//! language, except the website builder which may fetch linked documents.

pub mod component;
pub mod document;
pub mod entity;
pub mod link;
pub mod presentation;
pub mod property;
pub mod string;
pub mod website;

pub use component::{build_component, lookup_component, ComponentContext, ComponentKind};
pub use document::{
    autolinkify, escape_markup, parse_document, parse_note, parse_notes, parse_optional_document,
    parse_optional_notes, render_nodes, trim_line_breaks,
};
pub use entity::{
    assemble_bibliography, assemble_entity, parse_metadata, parse_period, parse_person, Assemble,
    Assembled,
};
pub use link::{parse_link, parse_links};
pub use presentation::{decode_presentation, ComponentDirective, Presentation, PresentationKind};
pub use property::{
    filter_properties, find_property, find_property_value, find_property_values, parse_properties,
    parse_properties_block, parse_property, property_labels, trim_label,
};
pub use string::{
    apply_render_options, apply_whitespace_options, format_span, parse_fake_string,
    parse_identification, parse_optional_fake_string, parse_optional_identification,
    parse_optional_string, parse_string_content, restore_apostrophes,
};
pub use website::{build_element, build_page, build_website, normalize_slug, parse_website_properties};
