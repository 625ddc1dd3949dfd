//! Tree mutation and listener registration.
//!
//! [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#mutation-algorithms)
//!
//! Every mutation keeps three things consistent in one step: the sibling
//! links, the id/name index of connected elements, and the focused element.
//! Listeners are notified after the tree is consistent again.

use crate::events::{
    AttributeChangeListener, DomChangeEvent, DomChangeListener, ListenerRegistry, ListenerResult,
    NodeListeners,
};
use crate::node::NodeKind;
use crate::page::Page;
use crate::{DomError, NodeId, Result};
use std::collections::VecDeque;
use std::sync::Arc;

impl Page {
    /// Parent of `id`, `None` for detached nodes, the document and nodes of
    /// other pages.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// First child of `id`.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child)
    }

    /// Last child of `id`.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child)
    }

    /// Next sibling of `id`.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Previous sibling of `id`.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.4 appendChild](https://dom.spec.whatwg.org/#dom-node-appendchild)
    ///
    /// "The appendChild(node) method steps are to return the result of appending
    /// node to this."
    ///
    /// A node that is already attached somewhere is moved. Returns `child`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.insert_child(parent, child, None)
    }

    /// [§ 4.4 insertBefore](https://dom.spec.whatwg.org/#dom-node-insertbefore)
    ///
    /// Inserts `new_node` as the previous sibling of `reference`. Returns
    /// `new_node`.
    pub fn insert_before(&mut self, reference: NodeId, new_node: NodeId) -> Result<NodeId> {
        let Some(parent) = self.node(reference)?.parent else {
            return Err(DomError::InvalidState {
                operation: "insert before",
                node: reference,
            });
        };
        if new_node == reference {
            let _ = self.node(new_node)?;
            return Ok(new_node);
        }
        self.insert_child(parent, new_node, Some(reference))
    }

    /// [§ 4.4 removeChild](https://dom.spec.whatwg.org/#dom-node-removechild)
    ///
    /// Detaches `node` from its parent. The node stays valid and may be
    /// inserted again.
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        let Some(parent) = self.node(node)?.parent else {
            return Err(DomError::InvalidState {
                operation: "remove",
                node,
            });
        };
        if self.is_connected(node) {
            self.remove_index_entries(node, true)?;
        }
        self.clear_focus_within(node);
        self.unlink(node)?;
        self.notify_dom_change(parent, &DomChangeEvent { parent, changed: node }, |l, e| {
            l.node_removed(e)
        })
    }

    /// [§ 4.4 replaceChild](https://dom.spec.whatwg.org/#dom-node-replacechild)
    ///
    /// Puts `new_node` where `old` was and detaches `old`.
    pub fn replace(&mut self, old: NodeId, new_node: NodeId) -> Result<()> {
        if old == new_node {
            let _ = self.node(old)?;
            return Ok(());
        }
        let _ = self.insert_before(old, new_node)?;
        self.remove(old)
    }

    /// [§ 4.4 cloneNode](https://dom.spec.whatwg.org/#dom-node-clonenode)
    ///
    /// The clone is detached and carries no script peer and no listeners.
    /// With `deep` the children are cloned as well, in order.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> Result<NodeId> {
        let copy = self.node(id)?.detached_copy();
        let clone = self.alloc_node(copy);
        if !deep {
            return Ok(clone);
        }
        let mut queue = VecDeque::from([(id, clone)]);
        while let Some((source, target)) = queue.pop_front() {
            let children: Vec<NodeId> = self.children(source).collect();
            for child in children {
                let copy = self.node(child)?.detached_copy();
                let child_clone = self.alloc_node(copy);
                self.link(target, child_clone, None)?;
                queue.push_back((child, child_clone));
            }
        }
        Ok(clone)
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    ) -> Result<NodeId> {
        let parent_connected = self.ensure_insertion_valid(parent, child)?;
        if self.node(child)?.parent.is_some() {
            if self.is_connected(child) {
                self.remove_index_entries(child, true)?;
                if !parent_connected {
                    self.clear_focus_within(child);
                }
            }
            self.unlink(child)?;
        }
        self.link(parent, child, before)?;
        if parent_connected {
            self.index_subtree(child);
        }
        self.notify_dom_change(parent, &DomChangeEvent { parent, changed: child }, |l, e| {
            l.node_added(e)
        })?;
        Ok(child)
    }

    /// [§ 4.2.3 ensure pre-insertion validity](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    ///
    /// Returns whether `parent` is connected, found on the same ancestor walk.
    fn ensure_insertion_valid(&self, parent: NodeId, child: NodeId) -> Result<bool> {
        let hierarchy = |reason| DomError::HierarchyRequest {
            parent,
            child,
            reason,
        };
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;
        if !parent_node.can_have_children() {
            return Err(hierarchy("the parent cannot have children"));
        }
        if matches!(child_node.kind, NodeKind::Document) {
            return Err(hierarchy("the document cannot be inserted"));
        }
        let mut top = parent;
        for ancestor in std::iter::once(parent).chain(self.ancestors(parent)) {
            if ancestor == child {
                return Err(hierarchy("the node is an inclusive ancestor of the parent"));
            }
            top = ancestor;
        }
        Ok(top == self.root())
    }

    /// Drop focus if it rests on `node` or inside it.
    fn clear_focus_within(&mut self, node: NodeId) {
        if self
            .focused
            .is_some_and(|focused| focused == node || self.is_descendant_of(focused, node))
        {
            tracing::trace!(%node, "focused element left the document");
            self.focused = None;
        }
    }

    /// Link a detached `child` under `parent`, before `before` or last.
    fn link(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) -> Result<()> {
        let prev = match before {
            Some(reference) => self.node(reference)?.prev_sibling,
            None => self.node(parent)?.last_child,
        };
        {
            let node = self.node_mut(child)?;
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = before;
        }
        match prev {
            Some(prev) => self.node_mut(prev)?.next_sibling = Some(child),
            None => self.node_mut(parent)?.first_child = Some(child),
        }
        match before {
            Some(reference) => self.node_mut(reference)?.prev_sibling = Some(child),
            None => self.node_mut(parent)?.last_child = Some(child),
        }
        Ok(())
    }

    /// Sever `node` from its parent and siblings.
    fn unlink(&mut self, node: NodeId) -> Result<()> {
        let n = self.node_mut(node)?;
        let (parent, prev, next) = (n.parent.take(), n.prev_sibling.take(), n.next_sibling.take());
        let Some(parent) = parent else {
            return Ok(());
        };
        match prev {
            Some(prev) => self.node_mut(prev)?.next_sibling = next,
            None => self.node_mut(parent)?.first_child = next,
        }
        match next {
            Some(next) => self.node_mut(next)?.prev_sibling = prev,
            None => self.node_mut(parent)?.last_child = prev,
        }
        Ok(())
    }

    // ----- listeners -----

    /// Observe structural changes at `node` and below.
    pub fn add_dom_change_listener(
        &self,
        node: NodeId,
        listener: Arc<dyn DomChangeListener>,
    ) -> Result<()> {
        self.node(node)?.listeners.dom.add(listener);
        Ok(())
    }

    /// Stop observing structural changes; returns whether `listener` was
    /// registered on `node`.
    pub fn remove_dom_change_listener(
        &self,
        node: NodeId,
        listener: &Arc<dyn DomChangeListener>,
    ) -> Result<bool> {
        Ok(self.node(node)?.listeners.dom.remove(listener))
    }

    /// Observe attribute changes of `node` and its descendants.
    pub fn add_attribute_change_listener(
        &self,
        node: NodeId,
        listener: Arc<dyn AttributeChangeListener>,
    ) -> Result<()> {
        self.node(node)?.listeners.attributes.add(listener);
        Ok(())
    }

    /// Stop observing attribute changes; returns whether `listener` was
    /// registered on `node`.
    pub fn remove_attribute_change_listener(
        &self,
        node: NodeId,
        listener: &Arc<dyn AttributeChangeListener>,
    ) -> Result<bool> {
        Ok(self.node(node)?.listeners.attributes.remove(listener))
    }

    pub(crate) fn notify_dom_change(
        &self,
        start: NodeId,
        event: &DomChangeEvent,
        call: impl Fn(&dyn DomChangeListener, &DomChangeEvent) -> ListenerResult,
    ) -> Result<()> {
        self.bubble(start, |l| &l.dom, |listener| call(listener, event))
    }

    /// Deliver a notification to `start`, its ancestors, and the document if
    /// the ancestor walk did not end there.
    ///
    /// The first failing listener stops the walk.
    pub(crate) fn bubble<L: ?Sized>(
        &self,
        start: NodeId,
        registry: impl Fn(&NodeListeners) -> &ListenerRegistry<L>,
        call: impl Fn(&L) -> ListenerResult,
    ) -> Result<()> {
        let deliver = |id: NodeId| -> Result<()> {
            for listener in registry(&self.node(id)?.listeners).snapshot() {
                call(&listener).map_err(DomError::Listener)?;
            }
            Ok(())
        };
        let root = self.root();
        let mut reached_root = false;
        for id in std::iter::once(start).chain(self.ancestors(start)) {
            deliver(id)?;
            reached_root = id == root;
        }
        if !reached_root {
            deliver(root)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{AttributeMap, DomError, Page};

    #[test]
    fn test_link_keeps_last_child() {
        let mut page = Page::blank();
        let parent = page.create_element("div", AttributeMap::new());
        let a = page.create_text_node("a");
        let b = page.create_text_node("b");
        page.append_child(parent, b).unwrap();
        page.insert_before(b, a).unwrap();
        assert_eq!(page.first_child(parent), Some(a));
        assert_eq!(page.last_child(parent), Some(b));
        assert_eq!(page.prev_sibling(a), None);
        assert_eq!(page.next_sibling(b), None);
    }

    #[test]
    fn test_text_node_cannot_have_children() {
        let mut page = Page::blank();
        let text = page.create_text_node("a");
        let other = page.create_text_node("b");
        assert!(matches!(
            page.append_child(text, other),
            Err(DomError::HierarchyRequest { .. })
        ));
    }
}
