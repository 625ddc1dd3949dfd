//! Console API implementation.
//!
//! [Console Standard](https://console.spec.whatwg.org/)
//!
//! Console output is routed to `tracing` under the `husk::console` target,
//! so it is filtered like any other log output.

use boa_engine::{
    Context, JsResult, JsValue, NativeFunction, js_string, object::ObjectInitializer,
    property::Attribute,
};

/// Register the console global object on the context.
///
/// [§ 1.1 Logging](https://console.spec.whatwg.org/#logging)
///
/// - `console.log(...args)` and `console.info(...args)` log at info level
/// - `console.debug(...args)` logs at debug level
/// - `console.warn(...args)` logs at warn level
/// - `console.error(...args)` logs at error level
pub fn register_console(context: &mut Context) -> JsResult<()> {
    let console = ObjectInitializer::new(context)
        .function(NativeFunction::from_fn_ptr(console_log), js_string!("log"), 0)
        .function(NativeFunction::from_fn_ptr(console_log), js_string!("info"), 0)
        .function(NativeFunction::from_fn_ptr(console_debug), js_string!("debug"), 0)
        .function(NativeFunction::from_fn_ptr(console_warn), js_string!("warn"), 0)
        .function(NativeFunction::from_fn_ptr(console_error), js_string!("error"), 0)
        .build();

    context.register_global_property(js_string!("console"), console, Attribute::all())
}

/// [§ 1.1.1 log](https://console.spec.whatwg.org/#log)
///
/// "Perform Logger("log", data)."
fn console_log(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let output = format_console_args(args, context)?;
    tracing::info!(target: "husk::console", "{output}");
    Ok(JsValue::undefined())
}

/// [§ 1.1.1 debug](https://console.spec.whatwg.org/#debug)
fn console_debug(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let output = format_console_args(args, context)?;
    tracing::debug!(target: "husk::console", "{output}");
    Ok(JsValue::undefined())
}

/// [§ 1.1.3 warn](https://console.spec.whatwg.org/#warn)
///
/// "Perform Logger("warn", data)."
fn console_warn(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let output = format_console_args(args, context)?;
    tracing::warn!(target: "husk::console", "{output}");
    Ok(JsValue::undefined())
}

/// [§ 1.1.2 error](https://console.spec.whatwg.org/#error)
///
/// "Perform Logger("error", data)."
fn console_error(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let output = format_console_args(args, context)?;
    tracing::error!(target: "husk::console", "{output}");
    Ok(JsValue::undefined())
}

/// Format console arguments for output.
///
/// [§ 2.1 Formatter](https://console.spec.whatwg.org/#formatter)
///
/// Converts each argument to a string and joins them with spaces.
fn format_console_args(args: &[JsValue], context: &mut Context) -> JsResult<String> {
    let strings: Result<Vec<String>, _> = args
        .iter()
        .map(|arg| arg.to_string(context).map(|s| s.to_std_string_escaped()))
        .collect();

    Ok(strings?.join(" "))
}
