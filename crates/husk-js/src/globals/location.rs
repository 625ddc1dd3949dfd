//! `window` and `location`.
//!
//! [§ 7.2 The Window object](https://html.spec.whatwg.org/multipage/window-object.html)
//!
//! [§ 7.7.1 The Location interface](https://html.spec.whatwg.org/multipage/nav-history-apis.html#the-location-interface)
//!
//! Assigning a location does not navigate right away: the request is
//! recorded and picked up by the window once the script has returned.

use super::{function, js_str, string_arg};
use crate::session::{request_navigation, with_page};
use boa_engine::object::ObjectInitializer;
use boa_engine::property::Attribute;
use boa_engine::{Context, JsResult, JsValue, NativeFunction, js_string};
use husk_dom::WebRequest;

/// Register `window` (the global object itself) and `location`.
pub fn register_window(context: &mut Context) -> JsResult<()> {
    let href_get = function(context, "href", href);
    let href_set = function(context, "href", assign);
    let location = ObjectInitializer::new(context)
        .accessor(
            js_string!("href"),
            Some(href_get),
            Some(href_set),
            Attribute::CONFIGURABLE,
        )
        .function(NativeFunction::from_fn_ptr(assign), js_string!("assign"), 1)
        .function(NativeFunction::from_fn_ptr(assign), js_string!("replace"), 1)
        .function(NativeFunction::from_fn_ptr(href), js_string!("toString"), 0)
        .build();
    context.register_global_property(js_string!("location"), location, Attribute::all())?;

    let window = context.global_object();
    context.register_global_property(js_string!("window"), window.clone(), Attribute::all())?;
    context.register_global_property(js_string!("self"), window, Attribute::all())
}

/// [§ 7.7.1 href getter](https://html.spec.whatwg.org/multipage/nav-history-apis.html#dom-location-href)
fn href(_this: &JsValue, _args: &[JsValue], _context: &mut Context) -> JsResult<JsValue> {
    let url = with_page(|page| Ok(page.url().to_string()))?;
    Ok(js_str(&url))
}

/// [§ 7.7.1 assign(url)](https://html.spec.whatwg.org/multipage/nav-history-apis.html#dom-location-assign)
///
/// STEP 2: "Parse url relative to the incumbent settings object. If that
/// failed, throw a `SyntaxError` `DOMException`."
fn assign(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let target = string_arg(args, 0, context)?;
    let url = with_page(|page| page.resolve_url(&target))?;
    tracing::debug!(%url, "script requested navigation");
    request_navigation(WebRequest::get(url))?;
    Ok(JsValue::undefined())
}
