//! Document interface implementation.
//!
//! [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
//!
//! "The Document interface represents any web page loaded in the browser
//! and serves as an entry point into the web page's content, which is the
//! DOM tree."
//!
//! The `document` object is created once per context. Its properties are
//! accessors that read the page of the running script, so the same object
//! serves every run.

use super::{function, js_str, string_arg};
use crate::session::{with_page, wrapper, wrapper_or_null};
use boa_engine::object::ObjectInitializer;
use boa_engine::object::builtins::JsArray;
use boa_engine::property::Attribute;
use boa_engine::{Context, JsResult, JsString, JsValue, NativeFunction, js_string};
use husk_dom::{AttributeMap, NodeId};

/// Register the document global object on the context.
pub fn register_document(context: &mut Context) -> JsResult<()> {
    let accessors = [
        ("title", function(context, "title", title)),
        ("URL", function(context, "URL", url)),
        ("readyState", function(context, "readyState", ready_state)),
        ("documentElement", function(context, "documentElement", document_element)),
        ("head", function(context, "head", head)),
        ("body", function(context, "body", body)),
        ("activeElement", function(context, "activeElement", active_element)),
    ];
    let methods: [(&str, super::Native, usize); 5] = [
        ("getElementById", get_element_by_id, 1),
        ("getElementsByTagName", get_elements_by_tag_name, 1),
        ("getElementsByName", get_elements_by_name, 1),
        ("createElement", create_element, 1),
        ("createTextNode", create_text_node, 1),
    ];

    let mut init = ObjectInitializer::new(context);
    for (key, getter) in accessors {
        let _ = init.accessor(JsString::from(key), Some(getter), None, Attribute::CONFIGURABLE);
    }
    for (key, native, length) in methods {
        let _ = init.function(NativeFunction::from_fn_ptr(native), JsString::from(key), length);
    }
    let document = init.build();

    context.register_global_property(js_string!("document"), document, Attribute::all())
}

/// [§ 3.1.5 title](https://html.spec.whatwg.org/multipage/dom.html#document.title)
fn title(_this: &JsValue, _args: &[JsValue], _context: &mut Context) -> JsResult<JsValue> {
    let title = with_page(|page| Ok(page.title_text()))?;
    Ok(js_str(&title))
}

/// [§ 4.5 URL](https://dom.spec.whatwg.org/#dom-document-url)
fn url(_this: &JsValue, _args: &[JsValue], _context: &mut Context) -> JsResult<JsValue> {
    let url = with_page(|page| Ok(page.url().to_string()))?;
    Ok(js_str(&url))
}

/// [§ 3.1.3 readyState](https://html.spec.whatwg.org/multipage/dom.html#current-document-readiness)
fn ready_state(_this: &JsValue, _args: &[JsValue], _context: &mut Context) -> JsResult<JsValue> {
    let state = with_page(|page| Ok(page.document_ready_state()))?;
    Ok(js_str(state.as_ref()))
}

/// [§ 4.5 documentElement](https://dom.spec.whatwg.org/#dom-document-documentelement)
fn document_element(_this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = with_page(|page| Ok(page.document_element()))?;
    wrapper_or_null(context, node)
}

/// [§ 3.1.3 head](https://html.spec.whatwg.org/multipage/dom.html#dom-document-head)
fn head(_this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = with_page(|page| Ok(page.head()))?;
    wrapper_or_null(context, node)
}

/// [§ 3.1.3 body](https://html.spec.whatwg.org/multipage/dom.html#dom-document-body)
fn body(_this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = with_page(|page| Ok(page.body()))?;
    wrapper_or_null(context, node)
}

/// [§ 6.6.5 activeElement](https://html.spec.whatwg.org/multipage/interaction.html#dom-document-activeelement)
fn active_element(_this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = with_page(|page| Ok(page.focused_element().or_else(|| page.body())))?;
    wrapper_or_null(context, node)
}

/// [§ 5.1 getElementById](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
///
/// STEP 1: "If elementId is the empty string, return null."
fn get_element_by_id(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let id = string_arg(args, 0, context)?;
    let node = with_page(|page| Ok(page.element_by_id(&id).ok()))?;
    wrapper_or_null(context, node)
}

/// [§ 4.5 getElementsByTagName](https://dom.spec.whatwg.org/#dom-document-getelementsbytagname)
///
/// Returns a snapshot array rather than a live collection.
fn get_elements_by_tag_name(
    _this: &JsValue,
    args: &[JsValue],
    context: &mut Context,
) -> JsResult<JsValue> {
    let name = string_arg(args, 0, context)?;
    let nodes = with_page(|page| Ok(page.elements_by_tag_name(page.root(), &name)))?;
    wrap_all(context, nodes)
}

/// [§ 3.1.5 getElementsByName](https://html.spec.whatwg.org/multipage/dom.html#dom-document-getelementsbyname)
fn get_elements_by_name(
    _this: &JsValue,
    args: &[JsValue],
    context: &mut Context,
) -> JsResult<JsValue> {
    let name = string_arg(args, 0, context)?;
    let nodes = with_page(|page| Ok(page.elements_by_name(&name)))?;
    wrap_all(context, nodes)
}

/// [§ 4.5 createElement](https://dom.spec.whatwg.org/#dom-document-createelement)
///
/// STEP 2: "If this is an HTML document, then set localName to localName in
/// ASCII lowercase."
fn create_element(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let name = string_arg(args, 0, context)?.to_ascii_lowercase();
    let node = with_page(|page| Ok(page.create_element(&name, AttributeMap::new())))?;
    wrapper(context, node).map(JsValue::from)
}

/// [§ 4.5 createTextNode](https://dom.spec.whatwg.org/#dom-document-createtextnode)
fn create_text_node(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let data = string_arg(args, 0, context)?;
    let node = with_page(|page| Ok(page.create_text_node(&data)))?;
    wrapper(context, node).map(JsValue::from)
}

fn wrap_all(context: &mut Context, nodes: Vec<NodeId>) -> JsResult<JsValue> {
    let wrappers = nodes
        .into_iter()
        .map(|node| wrapper(context, node).map(JsValue::from))
        .collect::<JsResult<Vec<_>>>()?;
    Ok(JsArray::from_iter(wrappers, context).into())
}
