//! Element factory.
//!
//! [§ 4.9 creating an element](https://dom.spec.whatwg.org/#concept-create-element)
//!
//! Creating an element is a pure function of its name, namespace and
//! attributes. Nothing is linked into a tree until the caller appends the
//! result.

use crate::element::{AttributeMap, ElementData};

/// The HTML namespace. Elements in it are stored without a namespace URI.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Build the data of a new element.
///
/// `namespace_uri` of `None`, empty, or the HTML namespace yields an HTML
/// element whose [`HtmlTag`](crate::HtmlTag) is derived from the local name.
#[must_use]
pub fn create_element_data(
    qualified_name: &str,
    namespace_uri: Option<&str>,
    attributes: AttributeMap,
) -> ElementData {
    let namespace_uri = namespace_uri
        .filter(|ns| !ns.is_empty() && *ns != HTML_NAMESPACE)
        .map(str::to_string);
    let qualified_name = if namespace_uri.is_none() {
        qualified_name.to_ascii_lowercase()
    } else {
        qualified_name.to_string()
    };
    ElementData::new(qualified_name, namespace_uri, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HtmlTag;

    #[test]
    fn test_html_names_are_lower_cased() {
        let data = create_element_data("DIV", Some(HTML_NAMESPACE), AttributeMap::new());
        assert_eq!(data.qualified_name(), "div");
        assert_eq!(data.namespace_uri(), None);
        assert_eq!(data.tag(), HtmlTag::Div);
    }

    #[test]
    fn test_foreign_names_keep_case() {
        let data = create_element_data(
            "svg:clipPath",
            Some("http://www.w3.org/2000/svg"),
            AttributeMap::new(),
        );
        assert_eq!(data.local_name(), "clipPath");
        assert_eq!(data.tag(), HtmlTag::Unknown);
    }
}
