//! JavaScript global objects.
//!
//! # Implemented
//!
//! - `console` - [Console Standard](https://console.spec.whatwg.org/)
//! - `document` - [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
//! - `window`, `location` - [§ 7.2 The Window object](https://html.spec.whatwg.org/multipage/window-object.html)
//!
//! # Not Yet Implemented
//!
//! - `navigator` - [§ 8.8 The Navigator object](https://html.spec.whatwg.org/multipage/system-state.html#the-navigator-object)
//! - `setTimeout`/`setInterval` - [§ 8.6 Timers](https://html.spec.whatwg.org/multipage/timers-and-user-prompts.html#timers)

mod console;
mod document;
pub(crate) mod element;
pub(crate) mod event;
mod location;

use boa_engine::object::FunctionObjectBuilder;
use boa_engine::object::builtins::JsFunction;
use boa_engine::{Context, JsResult, JsString, JsValue, NativeFunction};

/// Signature of every native function registered by this crate.
pub(crate) type Native = fn(&JsValue, &[JsValue], &mut Context) -> JsResult<JsValue>;

/// Register all global objects on the context.
///
/// [§ 8.1.6.1 Realms and their counterparts](https://html.spec.whatwg.org/multipage/webappapis.html#realms-settings-objects-global-objects)
///
/// "A global object is a JavaScript object that is the global object for
/// a JavaScript realm."
pub fn register_globals(context: &mut Context) -> JsResult<()> {
    console::register_console(context)?;
    document::register_document(context)?;
    location::register_window(context)
}

/// A standalone function object, used for accessor getters and setters.
pub(crate) fn function(context: &Context, name: &str, native: Native) -> JsFunction {
    FunctionObjectBuilder::new(context.realm(), NativeFunction::from_fn_ptr(native))
        .name(JsString::from(name))
        .build()
}

/// Argument `index` converted to a string; `"undefined"` when missing.
pub(crate) fn string_arg(args: &[JsValue], index: usize, context: &mut Context) -> JsResult<String> {
    let value = args.get(index).cloned().unwrap_or_default();
    Ok(value.to_string(context)?.to_std_string_escaped())
}

/// A JavaScript string value.
pub(crate) fn js_str(text: &str) -> JsValue {
    JsString::from(text).into()
}
