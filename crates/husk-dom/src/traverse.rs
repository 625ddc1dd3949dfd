//! Tree traversal.
//!
//! [§ 4.2.6 Tree order](https://dom.spec.whatwg.org/#concept-tree-order)
//!
//! "An object A is preceding an object B if A and B are in the same tree and A
//! comes before B in tree order."
//!
//! All iterators borrow the page immutably and yield [`NodeId`]s. Walks are
//! iterative, so deeply nested documents cannot overflow the stack.

use crate::element::Capabilities;
use crate::page::Page;
use crate::{DomError, NodeId, Result};

/// Iterator over the children of a node, first to last.
pub struct Children<'a> {
    page: &'a Page,
    current: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.page.next_sibling(id);
        Some(id)
    }
}

/// Iterator over ancestors of a node, parent first.
pub struct Ancestors<'a> {
    page: &'a Page,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.page.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node, nearest first.
pub struct PrecedingSiblings<'a> {
    page: &'a Page,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.page.prev_sibling(id);
        Some(id)
    }
}

/// Preorder walk over the descendants of a node, excluding the node itself.
pub struct Descendants<'a> {
    page: &'a Page,
    root: NodeId,
    current: Option<NodeId>,
    skip_hidden: bool,
}

impl Descendants<'_> {
    fn descend_into(&self, id: NodeId) -> bool {
        !(self.skip_hidden
            && self
                .page
                .as_element(id)
                .is_some_and(|e| e.capabilities().contains(Capabilities::SCRIPT_HIDING)))
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let first_child = if current == self.root || self.descend_into(current) {
            self.page.first_child(current)
        } else {
            None
        };
        self.current = first_child.or_else(|| {
            let mut node = current;
            loop {
                if node == self.root {
                    return None;
                }
                if let Some(sibling) = self.page.next_sibling(node) {
                    return Some(sibling);
                }
                node = self.page.parent(node)?;
            }
        });
        self.current
    }
}

impl Page {
    /// [§ 4.4 childNodes](https://dom.spec.whatwg.org/#dom-node-childnodes)
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            page: self,
            current: self.first_child(id),
        }
    }

    /// Iterate over ancestors (parent, grandparent, ..., document).
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            page: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblings<'_> {
        PrecedingSiblings {
            page: self,
            current: self.prev_sibling(id),
        }
    }

    /// Every node below `id` in tree order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            page: self,
            root: id,
            current: self.get(id).map(|_| id),
            skip_hidden: false,
        }
    }

    /// Elements below `id` in tree order.
    ///
    /// While scripting is enabled the content of `noscript` elements is not
    /// visited (the `noscript` element itself is).
    pub fn descendant_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        Descendants {
            page: self,
            root: id,
            current: self.get(id).map(|_| id),
            skip_hidden: self.script_enabled,
        }
        .filter(|&node| self.as_element(node).is_some())
    }

    /// Whether `id` is a strict descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// [§ 4.4 isConnected](https://dom.spec.whatwg.org/#dom-node-isconnected)
    ///
    /// Whether the node's root is the document.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == self.root() || self.is_descendant_of(id, self.root())
    }

    /// A cursor over the children of `parent` that can remove the child it
    /// is positioned on.
    #[must_use]
    pub fn child_cursor(&self, parent: NodeId) -> ChildCursor {
        ChildCursor {
            next: self.first_child(parent),
            current: None,
        }
    }
}

/// Removal-capable child iteration.
///
/// Unlike [`Children`] the cursor does not borrow the page, so the page may be
/// mutated between steps. Removing the current child through
/// [`ChildCursor::remove_current`] keeps the cursor valid.
#[derive(Debug, Clone, Copy)]
pub struct ChildCursor {
    next: Option<NodeId>,
    current: Option<NodeId>,
}

impl ChildCursor {
    /// Advance to the next child.
    pub fn next(&mut self, page: &Page) -> Option<NodeId> {
        let id = self.next?;
        self.current = Some(id);
        self.next = page.next_sibling(id);
        Some(id)
    }

    /// Remove the child returned by the last call to [`ChildCursor::next`].
    ///
    /// Fails with [`DomError::InvalidState`] when there is no such child or
    /// it was already removed through this cursor.
    pub fn remove_current(&mut self, page: &mut Page) -> Result<()> {
        let Some(current) = self.current.take() else {
            return Err(DomError::InvalidState {
                operation: "remove the current child of",
                node: page.root(),
            });
        };
        page.remove(current)
    }
}

#[cfg(test)]
mod tests {
    use crate::{AttributeMap, Page};

    #[test]
    fn test_descendants_preorder_bounded_at_start() {
        let mut page = Page::blank();
        let root = page.root();
        let outer = page.create_element("div", AttributeMap::new());
        let inner = page.create_element("span", AttributeMap::new());
        let text = page.create_text_node("x");
        let after = page.create_element("p", AttributeMap::new());
        page.append_child(root, outer).unwrap();
        page.append_child(outer, inner).unwrap();
        page.append_child(inner, text).unwrap();
        page.append_child(outer, after).unwrap();

        let all: Vec<_> = page.descendants(outer).collect();
        assert_eq!(all, vec![inner, text, after]);
        let of_inner: Vec<_> = page.descendants(inner).collect();
        assert_eq!(of_inner, vec![text]);
    }
}
