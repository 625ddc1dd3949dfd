//! Event objects passed to inline handlers.
//!
//! [§ 2.2 Interface Event](https://dom.spec.whatwg.org/#interface-event)

use super::js_str;
use boa_engine::object::ObjectInitializer;
use boa_engine::property::Attribute;
use boa_engine::{
    Context, JsNativeError, JsObject, JsResult, JsValue, NativeFunction, js_string,
};
use husk_dom::EventType;

/// Build the event object for one dispatch.
pub(crate) fn build(context: &mut Context, event: EventType, target: JsObject) -> JsObject {
    ObjectInitializer::new(context)
        .property(js_string!("type"), js_str(event.as_ref()), Attribute::READONLY)
        .property(js_string!("target"), target, Attribute::READONLY)
        .property(js_string!("defaultPrevented"), false, Attribute::WRITABLE)
        .function(
            NativeFunction::from_fn_ptr(prevent_default),
            js_string!("preventDefault"),
            0,
        )
        .build()
}

/// Whether a handler called `preventDefault()` on `event`.
pub(crate) fn default_prevented(event: &JsObject, context: &mut Context) -> JsResult<bool> {
    Ok(event.get(js_string!("defaultPrevented"), context)?.to_boolean())
}

/// [§ 2.2 preventDefault()](https://dom.spec.whatwg.org/#dom-event-preventdefault)
///
/// "The preventDefault() method steps are to set the canceled flag given
/// this."
fn prevent_default(this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let event = this
        .as_object()
        .ok_or_else(|| JsNativeError::typ().with_message("preventDefault called on a non-event"))?;
    let _ = event.set(js_string!("defaultPrevented"), true, true, context)?;
    Ok(JsValue::undefined())
}
