//! Change notification fabric.
//!
//! Two independent listener hierarchies exist on every node: structural
//! changes ([`DomChangeListener`]) and attribute changes
//! ([`AttributeChangeListener`]). Both bubble: a notification is delivered to
//! the node where the change happened, then to every ancestor, and finally to
//! the document if the ancestor walk did not already reach it. A listener
//! registered on an ancestor therefore observes its whole subtree.

use crate::NodeId;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Error type listeners (and script hosts) may return.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Return type of every listener callback.
pub type ListenerResult = Result<(), ListenerError>;

/// A child was added to or removed from `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomChangeEvent {
    /// The node whose child list changed.
    pub parent: NodeId,
    /// The node that was added or removed.
    pub changed: NodeId,
}

/// An attribute of `element` was added, replaced or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChangeEvent {
    /// The element whose attribute changed.
    pub element: NodeId,
    /// The attribute name, as written by the caller.
    pub name: String,
    /// The new value for additions, the previous value for replacements and
    /// removals.
    pub value: String,
}

/// Observer of structural changes below the node it is registered on.
pub trait DomChangeListener {
    /// A node was appended or inserted.
    fn node_added(&self, _event: &DomChangeEvent) -> ListenerResult {
        Ok(())
    }

    /// A node was removed. `event.parent` is the former parent.
    fn node_removed(&self, _event: &DomChangeEvent) -> ListenerResult {
        Ok(())
    }
}

/// Observer of attribute changes on the element it is registered on and on
/// that element's descendants.
pub trait AttributeChangeListener {
    /// An attribute that was not defined has been set.
    fn attribute_added(&self, _event: &AttributeChangeEvent) -> ListenerResult {
        Ok(())
    }

    /// A defined attribute got a new value. `event.value` is the old value.
    fn attribute_replaced(&self, _event: &AttributeChangeEvent) -> ListenerResult {
        Ok(())
    }

    /// A defined attribute was removed. `event.value` is the old value.
    fn attribute_removed(&self, _event: &AttributeChangeEvent) -> ListenerResult {
        Ok(())
    }
}

/// A mutex-guarded list of listeners.
///
/// Registration only needs a shared reference, so listeners can be added or
/// removed while the owner is borrowed elsewhere. Notification iterates over a
/// snapshot: the lock is never held while a listener runs.
pub struct ListenerRegistry<L: ?Sized> {
    entries: Mutex<Vec<Arc<L>>>,
}

impl<L: ?Sized> ListenerRegistry<L> {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<L>>> {
        // The guarded list is always consistent, so a panic in another
        // holder leaves nothing to repair.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a listener. Registering the same `Arc` twice is a no-op.
    pub fn add(&self, listener: Arc<L>) {
        let mut entries = self.lock();
        if !entries.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            entries.push(listener);
        }
    }

    /// Unregister a listener, returning whether it was registered.
    pub fn remove(&self, listener: &Arc<L>) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|l| !Arc::ptr_eq(l, listener));
        entries.len() != before
    }

    /// The listeners registered right now, in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<L>> {
        self.lock().clone()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<L: ?Sized> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> std::fmt::Debug for ListenerRegistry<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish()
    }
}

/// The two registries carried by every node.
#[derive(Debug, Default)]
pub(crate) struct NodeListeners {
    pub(crate) dom: ListenerRegistry<dyn DomChangeListener>,
    pub(crate) attributes: ListenerRegistry<dyn AttributeChangeListener>,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nop;
    impl DomChangeListener for Nop {}

    #[test]
    fn test_registry_ignores_duplicate_registration() {
        let registry: ListenerRegistry<dyn DomChangeListener> = ListenerRegistry::new();
        let listener: Arc<dyn DomChangeListener> = Arc::new(Nop);
        registry.add(Arc::clone(&listener));
        registry.add(Arc::clone(&listener));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(&listener));
        assert!(!registry.remove(&listener));
        assert!(registry.is_empty());
    }
}
