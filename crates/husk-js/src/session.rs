//! The page a script is currently running against.
//!
//! Native functions registered on the Boa context are plain function
//! pointers, so they cannot borrow the page they operate on. While a script
//! runs, the host parks the page (and its wrapper cache) in a thread-local
//! slot; natives reach it through [`with_page`]. The slot is emptied again
//! before the host returns the page to its caller.

use boa_engine::object::ObjectInitializer;
use boa_engine::property::Attribute;
use boa_engine::{Context, JsError, JsNativeError, JsObject, JsResult, JsString, JsValue};
use husk_dom::{DomError, NodeId, Page, WebRequest};
use std::cell::RefCell;
use std::collections::HashMap;

/// Script wrappers by node, so a node maps to one object for its lifetime.
pub(crate) type Wrappers = HashMap<NodeId, JsObject>;

/// Hidden property of a wrapper holding the node's arena position.
pub(crate) const NODE_KEY: &str = "__huskNode";

/// Everything a running script may touch besides the Boa context.
pub(crate) struct Session {
    pub(crate) page: Page,
    pub(crate) wrappers: Wrappers,
    /// Last navigation requested while the script ran.
    pub(crate) navigation: Option<WebRequest>,
}

thread_local! {
    static ACTIVE: RefCell<Option<Session>> = const { RefCell::new(None) };
}

/// Park `session` for the duration of a script run.
///
/// Hands the session back if another run is already in progress on this
/// thread.
pub(crate) fn enter(session: Session) -> Option<Session> {
    ACTIVE.with(|active| match active.try_borrow_mut() {
        Ok(mut slot) if slot.is_none() => {
            *slot = Some(session);
            None
        }
        _ => Some(session),
    })
}

/// Take the parked session back.
pub(crate) fn leave() -> Option<Session> {
    ACTIVE.with(|active| active.borrow_mut().take())
}

fn with_session<R>(f: impl FnOnce(&mut Session) -> R) -> JsResult<R> {
    ACTIVE.with(|active| {
        let mut active = active.try_borrow_mut().map_err(|_| {
            JsError::from(JsNativeError::error().with_message("document is busy"))
        })?;
        let session = active.as_mut().ok_or_else(|| {
            JsError::from(JsNativeError::error().with_message("no document is attached"))
        })?;
        Ok(f(session))
    })
}

/// Run `f` against the parked page.
pub(crate) fn with_page<R>(f: impl FnOnce(&mut Page) -> husk_dom::Result<R>) -> JsResult<R> {
    with_session(|session| f(&mut session.page))?.map_err(dom_error)
}

/// Record a navigation; a later request replaces an earlier one.
pub(crate) fn request_navigation(request: WebRequest) -> JsResult<()> {
    with_session(|session| session.navigation = Some(request))
}

/// Convert a tree error into a JavaScript `Error`.
pub(crate) fn dom_error(error: DomError) -> JsError {
    JsNativeError::error().with_message(error.to_string()).into()
}

/// The wrapper object of `node`, created on first use.
pub(crate) fn wrapper(context: &mut Context, node: NodeId) -> JsResult<JsObject> {
    if let Some(existing) = with_session(|session| session.wrappers.get(&node).cloned())? {
        return Ok(existing);
    }
    let name = with_page(|page| page.node_name(node))?;
    let object = crate::globals::element::build(context, node, &name)?;
    with_session(|session| {
        session
            .wrappers
            .entry(node)
            .or_insert_with(|| object.clone())
            .clone()
    })
}

/// `null` for `None`, the wrapper otherwise.
pub(crate) fn wrapper_or_null(context: &mut Context, node: Option<NodeId>) -> JsResult<JsValue> {
    node.map_or(Ok(JsValue::null()), |node| {
        wrapper(context, node).map(JsValue::from)
    })
}

/// The node a wrapper stands for.
pub(crate) fn node_of(value: &JsValue, context: &mut Context) -> JsResult<NodeId> {
    let object = value
        .as_object()
        .ok_or_else(|| JsNativeError::typ().with_message("not a node"))?;
    let index = object
        .get(JsString::from(NODE_KEY), context)?
        .to_u32(context)?;
    with_page(|page| {
        usize::try_from(index)
            .ok()
            .and_then(|index| page.node_at(index))
            .ok_or_else(|| DomError::IllegalArgument(format!("no node at {index}")))
    })
}

/// Start an object initializer carrying the hidden node key.
pub(crate) fn node_object(context: &mut Context, node: NodeId) -> JsResult<ObjectInitializer<'_>> {
    let index = u32::try_from(node.index())
        .map_err(|_| JsNativeError::range().with_message("node index out of range"))?;
    let mut init = ObjectInitializer::new(context);
    let _ = init.property(JsString::from(NODE_KEY), index, Attribute::empty());
    Ok(init)
}
