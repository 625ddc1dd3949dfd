//! Collecting the scripts of a parsed page.
//!
//! [§ 4.12.1 The script element](https://html.spec.whatwg.org/multipage/scripting.html#the-script-element)

use husk_common::warning::warn_once;
use husk_dom::{NodeId, Page};
use url::Url;

/// Where the code of a `<script>` element comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// The element's text content.
    Inline(String),
    /// The resolved `src` URL.
    External(Url),
}

/// One script element to execute, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageScript {
    /// The `<script>` element.
    pub element: NodeId,
    /// Its code.
    pub source: ScriptSource,
}

/// [§ 4.12.1.1 Processing model](https://html.spec.whatwg.org/multipage/scripting.html#script-processing-model)
///
/// "If any of the following are true: el has a type attribute whose value
/// is the empty string; el has no type attribute but it has a language
/// attribute and that attribute's value is the empty string; or el has
/// neither a type attribute nor a language attribute, then let the script
/// block's type string for this script element be
/// "text/javascript"."
#[must_use]
pub fn is_javascript_type(type_attribute: Option<&str>) -> bool {
    const JAVASCRIPT_TYPES: &[&str] = &[
        "text/javascript",
        "application/javascript",
        "application/ecmascript",
        "application/x-javascript",
        "text/ecmascript",
        "text/jscript",
    ];
    match type_attribute.map(str::trim) {
        None | Some("") => true,
        Some(declared) => {
            let essence = declared.split(';').next().unwrap_or_default().trim();
            JAVASCRIPT_TYPES
                .iter()
                .any(|known| known.eq_ignore_ascii_case(essence))
        }
    }
}

/// All classic scripts of `page` in document order.
///
/// Scripts of other types (templates, JSON data blocks, modules) are
/// skipped, as are `src` attributes that do not resolve against the page.
#[must_use]
pub fn page_scripts(page: &Page) -> Vec<PageScript> {
    page.elements_by_tag_name(page.root(), "script")
        .into_iter()
        .filter_map(|element| {
            let declared = page.get_attribute(element, "type").ok()?.as_option();
            if !is_javascript_type(declared) {
                tracing::trace!(%element, ?declared, "skipping non-classic script");
                return None;
            }
            let src = page.get_attribute(element, "src").ok()?;
            let source = match src.as_option() {
                Some(src) => match page.resolve_url(src) {
                    Ok(url) => ScriptSource::External(url),
                    Err(err) => {
                        let _ = warn_once("JS", &format!("script src {src:?} ignored: {err}"));
                        return None;
                    }
                },
                None => ScriptSource::Inline(page.text_content(element)),
            };
            Some(PageScript { element, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_javascript_types() {
        assert!(is_javascript_type(None));
        assert!(is_javascript_type(Some("")));
        assert!(is_javascript_type(Some("text/JavaScript")));
        assert!(is_javascript_type(Some("text/javascript; charset=utf-8")));
        assert!(!is_javascript_type(Some("module")));
        assert!(!is_javascript_type(Some("text/template")));
    }
}
