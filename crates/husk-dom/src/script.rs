//! Boundary to the scripting engine.
//!
//! The tree never talks to a JavaScript engine directly. A page may carry a
//! [`ScriptHost`]; the page asks it for script peers, hands it DOM events and
//! lets it run `javascript:` URLs. With no host installed every event
//! proceeds and peers are never created.

use crate::events::ListenerError;
use crate::page::Page;
use crate::request::WebRequest;
use crate::{NodeId, Result};
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use strum_macros::{AsRefStr, Display};

/// Opaque handle to the script-side wrapper of a node.
///
/// Cloning the handle shares the wrapper. Cloning the node does not: a cloned
/// node starts without a peer.
#[derive(Clone)]
pub struct ScriptPeer(Rc<dyn Any>);

impl ScriptPeer {
    /// Wrap a host-specific object.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Access the wrapped object if it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Whether both handles refer to the same wrapper.
    #[must_use]
    pub fn same_peer(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ScriptPeer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScriptPeer(..)")
    }
}

/// DOM events the page dispatches to its script host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum EventType {
    /// An element was clicked.
    Click,
    /// An element received focus.
    Focus,
    /// An element lost focus.
    Blur,
    /// A control's state changed through user interaction.
    Change,
    /// A form is about to be submitted.
    Submit,
    /// The page finished loading.
    Load,
}

impl EventType {
    /// Name of the content attribute holding the inline handler (`onclick`).
    #[must_use]
    pub fn handler_attribute(self) -> String {
        format!("on{self}")
    }
}

/// Whether the default action of an event should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Run the default action.
    Proceed,
    /// A handler cancelled the event.
    Cancelled,
}

/// Script engine collaborator of a [`Page`].
///
/// The page moves the host out of itself while calling it, so the host may
/// mutate the page it is given.
pub trait ScriptHost {
    /// Create the script-side wrapper for `node`.
    fn create_peer_for(&mut self, page: &Page, node: NodeId) -> ScriptPeer;

    /// Deliver `event` to `target`.
    fn dispatch_event(
        &mut self,
        _page: &mut Page,
        _target: NodeId,
        _event: EventType,
    ) -> std::result::Result<EventOutcome, ListenerError> {
        Ok(EventOutcome::Proceed)
    }

    /// Run a script in the page's global scope.
    fn execute_script(
        &mut self,
        _page: &mut Page,
        _source: &str,
    ) -> std::result::Result<(), ListenerError> {
        Ok(())
    }

    /// A navigation scripts asked for since the last call, such as an
    /// assignment to `location.href`.
    fn take_navigation(&mut self) -> Option<WebRequest> {
        None
    }
}

impl Page {
    /// Install the script host; scripting becomes enabled.
    pub fn set_script_host(&mut self, host: Box<dyn ScriptHost>) {
        self.script_host = Some(host);
        self.script_enabled = true;
    }

    /// Remove the script host; scripting becomes disabled.
    pub fn take_script_host(&mut self) -> Option<Box<dyn ScriptHost>> {
        self.script_enabled = false;
        self.script_host.take()
    }

    /// Whether a script host is installed.
    #[must_use]
    pub const fn is_script_enabled(&self) -> bool {
        self.script_enabled
    }

    fn with_script_host<R>(
        &mut self,
        f: impl FnOnce(&mut dyn ScriptHost, &mut Self) -> R,
    ) -> Option<R> {
        let mut host = self.script_host.take()?;
        let result = f(host.as_mut(), self);
        // A host installed by the callback wins over the one we took out.
        if self.script_host.is_none() {
            self.script_host = Some(host);
        }
        Some(result)
    }

    /// The script peer of `node`, created on first request.
    ///
    /// Returns `None` when no script host is installed.
    pub fn script_peer(&mut self, node: NodeId) -> Result<Option<ScriptPeer>> {
        if let Some(peer) = &self.node(node)?.script_peer {
            return Ok(Some(peer.clone()));
        }
        let Some(peer) = self.with_script_host(|host, page| host.create_peer_for(page, node)) else {
            return Ok(None);
        };
        self.node_mut(node)?.script_peer = Some(peer.clone());
        Ok(Some(peer))
    }

    /// Deliver `event` to `target` through the script host.
    ///
    /// Without a host every event proceeds.
    pub fn dispatch_event(&mut self, target: NodeId, event: EventType) -> Result<EventOutcome> {
        let _ = self.node(target)?;
        tracing::trace!(%target, %event, "dispatch");
        self.with_script_host(|host, page| host.dispatch_event(page, target, event))
            .unwrap_or(Ok(EventOutcome::Proceed))
            .map_err(crate::DomError::Script)
    }

    /// Run `source` through the script host; a no-op without one.
    pub fn execute_script(&mut self, source: &str) -> Result<()> {
        self.with_script_host(|host, page| host.execute_script(page, source))
            .unwrap_or(Ok(()))
            .map_err(crate::DomError::Script)
    }

    /// Take the navigation requested by scripts, if any.
    pub fn take_script_navigation(&mut self) -> Option<WebRequest> {
        self.script_host.as_mut()?.take_navigation()
    }
}
