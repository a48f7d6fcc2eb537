//! The presentation convention.
//!
//! Websites are authored as ordinary property trees. A property labeled
//! `presentation` says what a resource is (`page`, `element`, ...) and its
//! children carry the settings. A sibling `presentation` property whose
//! value is `css` carries style rules. For elements, the `component` child
//! names the UI component and its own children are the component's
//! properties:
//!
//! ```text
//! presentation = element
//!   component = button
//!     navigate-to = /about
//! presentation = css
//!   color = red
//! ```
//!
//! [`decode_presentation`] reads all of this once into a [`Presentation`].

use crate::model::{CssStyle, Property};
use crate::parse::property::find_property_value;

pub const PRESENTATION_LABEL: &str = "presentation";
const CSS_VALUE: &str = "css";
const COMPONENT_LABEL: &str = "component";

/// What a resource represents in a website.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationKind {
    Page,
    Element,
    /// Any other presentation value.
    Other(String),
    /// No presentation property at all.
    Absent,
}

/// The component directive of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDirective {
    pub tag: String,
    pub properties: Vec<Property>,
}

impl ComponentDirective {
    /// First value of a component property, if set.
    pub fn value(&self, label: &str) -> Option<&str> {
        find_property_value(&self.properties, label, false)
    }
}

/// Decoded presentation directives of one resource or tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub kind: PresentationKind,
    /// Children of the first presentation property.
    pub settings: Vec<Property>,
    pub css_styles: Vec<CssStyle>,
    pub component: Option<ComponentDirective>,
}

impl Presentation {
    /// First value of a setting, if set.
    pub fn setting(&self, label: &str) -> Option<&str> {
        find_property_value(&self.settings, label, false)
    }
}

fn is_presentation(property: &Property) -> bool {
    property.label == PRESENTATION_LABEL
}

/// Decodes the presentation properties found at the top level of `properties`.
pub fn decode_presentation(properties: &[Property]) -> Presentation {
    let primary = properties
        .iter()
        .find(|p| is_presentation(p) && p.first_value() != Some(CSS_VALUE));

    let kind = match primary.and_then(Property::first_value) {
        Some("page") => PresentationKind::Page,
        Some("element") => PresentationKind::Element,
        Some(other) => PresentationKind::Other(other.to_string()),
        None if primary.is_some() => PresentationKind::Other(String::new()),
        None => PresentationKind::Absent,
    };
    let settings = primary.map(|p| p.properties.clone()).unwrap_or_default();

    let css_styles = properties
        .iter()
        .filter(|p| is_presentation(p) && p.first_value() == Some(CSS_VALUE))
        .flat_map(|p| p.properties.iter())
        .filter_map(|rule| {
            rule.first_value().map(|value| CssStyle {
                label: rule.label.clone(),
                value: value.to_string(),
            })
        })
        .collect();

    let component = settings
        .iter()
        .find(|p| p.label == COMPONENT_LABEL)
        .and_then(|p| {
            p.first_value().map(|tag| ComponentDirective {
                tag: tag.to_string(),
                properties: p.properties.clone(),
            })
        });

    Presentation {
        kind,
        settings,
        css_styles,
        component,
    }
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
    fn test_decode_element() {
        let props = vec![
            prop("presentation", "css", vec![prop("color", "red", vec![])]),
            prop(
                "presentation",
                "element",
                vec![prop("component", "button", vec![prop("navigate-to", "/about", vec![])])],
            ),
        ];
        let decoded = decode_presentation(&props);
        assert_eq!(decoded.kind, PresentationKind::Element);
        assert_eq!(
            decoded.css_styles,
            vec![CssStyle { label: "color".into(), value: "red".into() }]
        );
        let component = decoded.component.unwrap();
        assert_eq!(component.tag, "button");
        assert_eq!(component.value("navigate-to"), Some("/about"));
    }

    #[test]
    fn test_decode_page_settings() {
        let props = vec![prop("presentation", "page", vec![prop("width", "full", vec![])])];
        let decoded = decode_presentation(&props);
        assert_eq!(decoded.kind, PresentationKind::Page);
        assert_eq!(decoded.setting("width"), Some("full"));
        assert!(decoded.component.is_none());
    }

    #[test]
    fn test_decode_absent_and_other() {
        assert_eq!(decode_presentation(&[]).kind, PresentationKind::Absent);
        let props = vec![prop("presentation", "footer", vec![])];
        assert_eq!(
            decode_presentation(&props).kind,
            PresentationKind::Other("footer".into())
        );
    }
}
