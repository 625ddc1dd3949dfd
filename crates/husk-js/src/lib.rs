//! JavaScript support for husk pages.
//!
//! Uses [Boa](https://boajs.dev/) as the JavaScript engine.
//!
//! [`JsScriptHost`] implements the page's [`ScriptHost`] boundary: it creates
//! script wrappers for nodes, runs inline `on*` handler attributes when the
//! page dispatches events, and evaluates `javascript:` URLs and `<script>`
//! contents.
//!
//! # Example
//!
//! ```ignore
//! use husk_js::JsScriptHost;
//!
//! let mut page = husk_html::parse_document(html, url)?;
//! JsScriptHost::install(&mut page)?;
//! page.execute_script("document.body.setAttribute('class', 'ready')")?;
//! ```
//!
//! # Implemented
//!
//! - `console.log()`, `console.info()`, `console.debug()`, `console.warn()`,
//!   `console.error()`
//! - `document`: `getElementById()`, `getElementsByTagName()`,
//!   `getElementsByName()`, `createElement()`, `createTextNode()`, `title`,
//!   `URL`, `readyState`, `documentElement`, `head`, `body`, `activeElement`
//! - Elements: attribute methods, `textContent`, `id`, `value`, `checked`,
//!   `parentNode`, `appendChild()`, `removeChild()`, `click()`, `focus()`,
//!   `blur()`, `submit()`
//! - `window`, `location.href`, `location.assign()`
//! - Inline event handlers with `event.preventDefault()` and `return false`
//!
//! # Not Yet Implemented
//!
//! [§ 2.6 Interface EventTarget](https://dom.spec.whatwg.org/#interface-eventtarget)
//! - `addEventListener()` / `removeEventListener()`
//!
//! [§ 8.6 Timers](https://html.spec.whatwg.org/multipage/timers-and-user-prompts.html#timers)
//! - `setTimeout()` / `setInterval()`

mod globals;
mod scripts;
mod session;

pub use scripts::{PageScript, ScriptSource, is_javascript_type, page_scripts};

use boa_engine::{Context, JsNativeError, JsResult, JsValue, Source};
use husk_dom::{
    EventOutcome, EventType, ListenerError, NodeId, Page, ScriptHost, ScriptPeer, WebRequest,
};
use session::{Session, Wrappers};
use thiserror::Error;

/// A script failed to compile or threw.
#[derive(Debug, Clone, Error)]
#[error("script error: {message}")]
pub struct ScriptError {
    /// The engine's description of the failure.
    pub message: String,
}

impl ScriptError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JavaScript runtime for one page.
///
/// [§ 8.1.6 JavaScript execution context](https://html.spec.whatwg.org/multipage/webappapis.html)
///
/// Each page has its own host with its own global object. The host is
/// dropped together with the page it is installed in.
pub struct JsScriptHost {
    /// The Boa JavaScript context.
    context: Context,
    /// Wrapper objects handed out so far.
    wrappers: Wrappers,
    /// Navigation requested by the last scripts that ran.
    navigation: Option<WebRequest>,
}

impl std::fmt::Debug for JsScriptHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsScriptHost")
            .field("wrappers", &self.wrappers.len())
            .field("navigation", &self.navigation)
            .finish_non_exhaustive()
    }
}

impl JsScriptHost {
    /// Create a runtime with the global objects registered.
    pub fn new() -> Result<Self, ScriptError> {
        let mut context = Context::default();
        globals::register_globals(&mut context)
            .map_err(|err| ScriptError::new(err.to_string()))?;
        Ok(Self {
            context,
            wrappers: Wrappers::new(),
            navigation: None,
        })
    }

    /// Create a runtime and install it in `page`, enabling scripting.
    pub fn install(page: &mut Page) -> Result<(), ScriptError> {
        page.set_script_host(Box::new(Self::new()?));
        Ok(())
    }

    /// Run `f` with `page` parked in the session the globals read from.
    fn run<R>(
        &mut self,
        page: &mut Page,
        f: impl FnOnce(&mut Context) -> JsResult<R>,
    ) -> Result<R, ScriptError> {
        let parked = std::mem::replace(page, Page::blank());
        let session = Session {
            page: parked,
            wrappers: std::mem::take(&mut self.wrappers),
            navigation: None,
        };
        if let Some(rejected) = session::enter(session) {
            *page = rejected.page;
            self.wrappers = rejected.wrappers;
            return Err(ScriptError::new("another script is already running"));
        }

        let result = f(&mut self.context);

        if let Some(session) = session::leave() {
            *page = session.page;
            self.wrappers = session.wrappers;
            if session.navigation.is_some() {
                self.navigation = session.navigation;
            }
        }
        result.map_err(|err| ScriptError::new(err.to_string()))
    }
}

impl ScriptHost for JsScriptHost {
    fn create_peer_for(&mut self, page: &Page, node: NodeId) -> ScriptPeer {
        if let Some(existing) = self.wrappers.get(&node) {
            return ScriptPeer::new(existing.clone());
        }
        let name = page.node_name(node).unwrap_or_default();
        match globals::element::build(&mut self.context, node, &name) {
            Ok(object) => {
                let _ = self.wrappers.insert(node, object.clone());
                ScriptPeer::new(object)
            }
            Err(err) => {
                tracing::warn!(%node, %err, "failed to create script wrapper");
                ScriptPeer::new(node)
            }
        }
    }

    /// [§ 8.1.8.1 Event handlers](https://html.spec.whatwg.org/multipage/webappapis.html#event-handler-attributes)
    ///
    /// The handler attribute's body runs as a function with `this` bound to
    /// the target and a single `event` parameter. Returning `false` or calling
    /// `event.preventDefault()` cancels the event.
    fn dispatch_event(
        &mut self,
        page: &mut Page,
        target: NodeId,
        event: EventType,
    ) -> Result<EventOutcome, ListenerError> {
        let Some(body) = page
            .get_attribute(target, &event.handler_attribute())
            .ok()
            .and_then(|value| value.as_option().map(str::to_string))
        else {
            return Ok(EventOutcome::Proceed);
        };
        tracing::trace!(%target, %event, "running inline handler");
        let source = format!("(function (event) {{\n{body}\n}})");
        let cancelled = self.run(page, |context| {
            let handler = context.eval(Source::from_bytes(&source))?;
            let handler = handler
                .as_callable()
                .ok_or_else(|| JsNativeError::typ().with_message("handler is not a function"))?
                .clone();
            let this = session::wrapper(context, target)?;
            let event_object = globals::event::build(context, event, this.clone());
            let result = handler.call(
                &JsValue::from(this),
                &[JsValue::from(event_object.clone())],
                context,
            )?;
            Ok(result.as_boolean() == Some(false)
                || globals::event::default_prevented(&event_object, context)?)
        })?;
        Ok(if cancelled {
            EventOutcome::Cancelled
        } else {
            EventOutcome::Proceed
        })
    }

    /// [§ 8.1.4.1 Script processing model](https://html.spec.whatwg.org/multipage/webappapis.html#run-a-classic-script)
    fn execute_script(&mut self, page: &mut Page, source: &str) -> Result<(), ListenerError> {
        let _ = self.run(page, |context| context.eval(Source::from_bytes(source)))?;
        Ok(())
    }

    fn take_navigation(&mut self) -> Option<WebRequest> {
        self.navigation.take()
    }
}
