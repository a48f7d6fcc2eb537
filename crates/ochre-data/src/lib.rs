//! OCHRE data: normalization and rich-text rendering for OCHRE API responses.
//!
//! The OCHRE API serializes an XML database as JSON. This crate turns those
//! loosely shaped responses into strongly typed, language-resolved entities.
//!
//! # Overview
//!
//! - **Multilingual**: every text leaf is resolved to one language, falling
//!   back to the first entry when the requested one is absent
//! - **Rich text**: annotated documents render to a markup string with
//!   inline links, tooltips, images and footnotes
//! - **Full and nested forms**: top-level entities carry provenance; nested
//!   children do not
//! - **Websites**: trees annotated with presentation properties become a
//!   page hierarchy of typed UI components
//!
//! # Quick Start
//!
//! ```rust
//! use ochre_data::{parse_response, Item, ParseOptions};
//!
//! let json = r#"{"result": {"ochre": {
//!     "uuid": "5b2a7a2c-1f3e-4a55-9f4a-0c9d1e2f3a4b",
//!     "publicationDateTime": "2024-01-01T00:00:00Z",
//!     "concept": {
//!         "uuid": "5b2a7a2c-1f3e-4a55-9f4a-0c9d1e2f3a4b",
//!         "identification": {"label": {"content": [
//!             {"lang": "eng", "string": "Jar"},
//!             {"lang": "fra", "string": "Jarre"}
//!         ]}}
//!     }
//! }}}"#;
//!
//! let fetched = parse_response(json, &ParseOptions::with_language("fra")).unwrap();
//! match fetched.item {
//!     Item::Concept(concept) => assert_eq!(concept.nested.identification.label, "Jarre"),
//!     other => panic!("unexpected {}", other.kind()),
//! }
//! ```
//!
//! # Modules
//!
//! - [`raw`]: Wire types for the API JSON
//! - [`model`]: Canonical output types
//! - [`parse`]: Normalization, rendering and website building
//! - [`fetch`]: The fetcher collaborator and typed entry points
//! - [`error`]: Error types

pub mod error;
pub mod fetch;
pub mod model;
pub mod options;
pub mod parse;
pub mod raw;
pub mod url;
pub mod util;

// Re-export commonly used types at crate root
pub use error::{Error, ErrorKind, FetchError, Result};
pub use fetch::{
    fetch_bibliography, fetch_concept, fetch_item, fetch_resource, fetch_set, fetch_spatial_unit,
    fetch_tree, fetch_website, parse_envelope, parse_response, Fetcher,
};
pub use model::{
    Bibliography, Component, Concept, Document, Fetched, Footnote, Item, Link, LinkVariant,
    Property, PropertyValue, Resource, Set, SpatialUnit, Tree, ValueType, Website,
};
pub use options::{ParseOptions, DEFAULT_LANGUAGE, NO_LINGUISTIC_CONTENT};
pub use url::{load_url, preview_url};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
