//! Error types for normalization, rendering and website assembly.

use thiserror::Error;

/// Error categories, one per failure class of the normalization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A localized string or document had nothing to select.
    MissingContent,
    /// A raw link carried none of the known target keys.
    InvalidLink,
    /// A web component lacks a property or link it requires.
    MissingComponentDependency,
    /// A web component tag is not part of the registry.
    UnknownComponent,
    /// Website or page presentation settings failed validation.
    InvalidConfiguration,
    /// Anything outside the normalization taxonomy (input shape, fetch).
    Other,
}

impl ErrorKind {
    /// Returns the taxonomy name (e.g., "MissingContentError").
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::MissingContent => "MissingContentError",
            ErrorKind::InvalidLink => "InvalidLinkError",
            ErrorKind::MissingComponentDependency => "MissingComponentDependencyError",
            ErrorKind::UnknownComponent => "UnknownComponentError",
            ErrorKind::InvalidConfiguration => "InvalidConfigurationError",
            ErrorKind::Other => "Error",
        }
    }
}

/// Error raised by the external [`Fetcher`](crate::fetch::Fetcher) collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("no entity found for uuid {uuid}")]
    NotFound { uuid: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Error during normalization of an API response.
///
/// Assembly is all-or-nothing: any error raised while building a sub-field
/// aborts the containing entity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // === Normalization taxonomy ===
    #[error("no content found for language {language:?} in {context}")]
    MissingContent {
        language: String,
        context: &'static str,
    },

    #[error("invalid link: none of the known target keys present (found {keys:?})")]
    InvalidLink { keys: Vec<String> },

    #[error("component {component:?} of element {element:?} is missing {dependency}")]
    MissingComponentDependency {
        component: String,
        element: String,
        dependency: &'static str,
    },

    #[error("unknown component {component:?} for element {element:?}")]
    UnknownComponent { component: String, element: String },

    #[error("invalid website configuration: {field} = {value:?}")]
    InvalidConfiguration { field: &'static str, value: String },

    // === Input shape ===
    #[error("invalid timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    #[error("expected a {expected} envelope, found {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingContent { .. } => ErrorKind::MissingContent,
            Error::InvalidLink { .. } => ErrorKind::InvalidLink,
            Error::MissingComponentDependency { .. } => ErrorKind::MissingComponentDependency,
            Error::UnknownComponent { .. } => ErrorKind::UnknownComponent,
            Error::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            _ => ErrorKind::Other,
        }
    }

    pub(crate) fn missing_content(language: &str, context: &'static str) -> Self {
        Error::MissingContent {
            language: language.to_string(),
            context,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Malformed(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let err = Error::missing_content("eng", "label");
        assert_eq!(err.kind(), ErrorKind::MissingContent);
        assert_eq!(err.kind().name(), "MissingContentError");

        let err = Error::MissingComponentDependency {
            component: "button".into(),
            element: "Go".into(),
            dependency: "navigate-to or link-to property",
        };
        assert_eq!(err.kind().name(), "MissingComponentDependencyError");
        assert!(err.to_string().contains("button"));
    }

    #[test]
    fn test_fetch_error_is_other() {
        let err: Error = FetchError::NotFound { uuid: "x".into() }.into();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
