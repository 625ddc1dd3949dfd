//! Script wrappers for nodes.
//!
//! [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
//!
//! A wrapper only carries the node's arena position; every property read and
//! method call goes to the page parked in the current session, so wrappers
//! never hold stale copies of tree state.

use super::{function, js_str, string_arg};
use crate::session::{self, node_of, request_navigation, with_page, wrapper_or_null};
use boa_engine::object::builtins::JsFunction;
use boa_engine::property::Attribute;
use boa_engine::{
    Context, JsNativeError, JsObject, JsResult, JsString, JsValue, NativeFunction, js_string,
};
use husk_dom::{ClickOutcome, NodeId};

/// Build the wrapper object for `node` named `name`.
pub(crate) fn build(context: &mut Context, node: NodeId, name: &str) -> JsResult<JsObject> {
    let display_name = if name.starts_with('#') {
        name.to_string()
    } else {
        name.to_ascii_uppercase()
    };
    let accessors: [(&str, JsFunction, Option<JsFunction>); 5] = [
        (
            "textContent",
            function(context, "textContent", text_content),
            Some(function(context, "textContent", set_text_content)),
        ),
        (
            "id",
            function(context, "id", id),
            Some(function(context, "id", set_id)),
        ),
        (
            "value",
            function(context, "value", value),
            Some(function(context, "value", set_value)),
        ),
        (
            "checked",
            function(context, "checked", checked),
            Some(function(context, "checked", set_checked)),
        ),
        ("parentNode", function(context, "parentNode", parent_node), None),
    ];

    let mut init = session::node_object(context, node)?;
    let _ = init
        .property(js_string!("nodeName"), js_str(&display_name), Attribute::READONLY)
        .property(js_string!("tagName"), js_str(&display_name), Attribute::READONLY);
    for (key, getter, setter) in accessors {
        let _ = init.accessor(
            JsString::from(key),
            Some(getter),
            setter,
            Attribute::CONFIGURABLE,
        );
    }
    let methods: [(&str, super::Native, usize); 10] = [
        ("getAttribute", get_attribute, 1),
        ("setAttribute", set_attribute, 2),
        ("removeAttribute", remove_attribute, 1),
        ("hasAttribute", has_attribute, 1),
        ("appendChild", append_child, 1),
        ("removeChild", remove_child, 1),
        ("click", click, 0),
        ("focus", focus, 0),
        ("blur", blur, 0),
        ("submit", submit, 0),
    ];
    for (key, native, length) in methods {
        let _ = init.function(NativeFunction::from_fn_ptr(native), JsString::from(key), length);
    }
    Ok(init.build())
}

/// `null` for `None`, a string otherwise.
fn optional_string(value: Option<String>) -> JsValue {
    value.map_or_else(JsValue::null, |v| js_str(&v))
}

/// [§ 4.9 getAttribute](https://dom.spec.whatwg.org/#dom-element-getattribute)
fn get_attribute(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let name = string_arg(args, 0, context)?;
    let value = with_page(|page| {
        Ok(page
            .get_attribute(node, &name)?
            .as_option()
            .map(str::to_string))
    })?;
    Ok(optional_string(value))
}

/// [§ 4.9 setAttribute](https://dom.spec.whatwg.org/#dom-element-setattribute)
fn set_attribute(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let name = string_arg(args, 0, context)?;
    let value = string_arg(args, 1, context)?;
    with_page(|page| page.set_attribute(node, &name, &value))?;
    Ok(JsValue::undefined())
}

/// [§ 4.9 removeAttribute](https://dom.spec.whatwg.org/#dom-element-removeattribute)
fn remove_attribute(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let name = string_arg(args, 0, context)?;
    with_page(|page| page.remove_attribute(node, &name))?;
    Ok(JsValue::undefined())
}

/// [§ 4.9 hasAttribute](https://dom.spec.whatwg.org/#dom-element-hasattribute)
fn has_attribute(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let name = string_arg(args, 0, context)?;
    Ok(with_page(|page| page.has_attribute(node, &name))?.into())
}

fn reflect(this: &JsValue, context: &mut Context, attribute: &str) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let value = with_page(|page| Ok(page.get_attribute(node, attribute)?.as_str().to_string()))?;
    Ok(js_str(&value))
}

fn set_reflected(
    this: &JsValue,
    args: &[JsValue],
    context: &mut Context,
    attribute: &str,
) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let value = string_arg(args, 0, context)?;
    with_page(|page| page.set_attribute(node, attribute, &value))?;
    Ok(JsValue::undefined())
}

fn id(this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    reflect(this, context, "id")
}

fn set_id(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    set_reflected(this, args, context, "id")
}

fn value(this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    reflect(this, context, "value")
}

fn set_value(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    set_reflected(this, args, context, "value")
}

fn checked(this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    Ok(with_page(|page| page.is_checked(node))?.into())
}

fn set_checked(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let checked = args.first().is_some_and(JsValue::to_boolean);
    with_page(|page| page.set_checked(node, checked))?;
    Ok(JsValue::undefined())
}

/// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
fn text_content(this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let text = with_page(|page| Ok(page.text_content(node)))?;
    Ok(js_str(&text))
}

/// "String replace all with the given value within this."
fn set_text_content(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let text = string_arg(args, 0, context)?;
    with_page(|page| {
        let children: Vec<NodeId> = page.children(node).collect();
        for child in children {
            page.remove(child)?;
        }
        if !text.is_empty() {
            let data = page.create_text_node(&text);
            let _ = page.append_child(node, data)?;
        }
        Ok(())
    })?;
    Ok(JsValue::undefined())
}

/// [§ 4.4 parentNode](https://dom.spec.whatwg.org/#dom-node-parentnode)
fn parent_node(this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let parent = with_page(|page| Ok(page.parent(node)))?;
    wrapper_or_null(context, parent)
}

/// [§ 4.4 appendChild](https://dom.spec.whatwg.org/#dom-node-appendchild)
fn append_child(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let argument = args.first().cloned().unwrap_or_default();
    let child = node_of(&argument, context)?;
    let _ = with_page(|page| page.append_child(node, child))?;
    Ok(argument)
}

/// [§ 4.4 removeChild](https://dom.spec.whatwg.org/#dom-node-removechild)
///
/// "If child's parent is not parent, then throw a `NotFoundError`
/// `DOMException`."
fn remove_child(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let argument = args.first().cloned().unwrap_or_default();
    let child = node_of(&argument, context)?;
    let removed = with_page(|page| {
        if page.parent(child) != Some(node) {
            return Ok(false);
        }
        page.remove(child)?;
        Ok(true)
    })?;
    if !removed {
        return Err(JsNativeError::error()
            .with_message("NotFoundError: not a child of this node")
            .into());
    }
    Ok(argument)
}

/// [§ 6.4.7 click()](https://html.spec.whatwg.org/multipage/interaction.html#dom-click)
///
/// Runs the element's activation behaviour. A navigation it triggers is
/// handed to the window once the script returns.
fn click(this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    if let ClickOutcome::Navigate(request) = with_page(|page| page.click(node))? {
        request_navigation(request)?;
    }
    Ok(JsValue::undefined())
}

/// [§ 6.6.4 focus()](https://html.spec.whatwg.org/multipage/interaction.html#dom-focus)
fn focus(this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let _ = with_page(|page| page.move_focus_to(Some(node)))?;
    Ok(JsValue::undefined())
}

/// [§ 6.6.4 blur()](https://html.spec.whatwg.org/multipage/interaction.html#dom-blur)
fn blur(this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let _ = with_page(|page| {
        if page.focused_element() == Some(node) {
            page.move_focus_to(None)
        } else {
            Ok(false)
        }
    })?;
    Ok(JsValue::undefined())
}

/// [§ 4.10.3 submit()](https://html.spec.whatwg.org/multipage/forms.html#dom-form-submit)
///
/// Only meaningful on `form` elements; a no-op elsewhere.
fn submit(this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = node_of(this, context)?;
    let outcome = with_page(|page| {
        if page.is_element(node, husk_dom::HtmlTag::Form) {
            page.submit_form(node, None)
        } else {
            Ok(ClickOutcome::Stay)
        }
    })?;
    if let ClickOutcome::Navigate(request) = outcome {
        request_navigation(request)?;
    }
    Ok(JsValue::undefined())
}
