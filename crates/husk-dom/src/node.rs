//! Arena node storage.
//!
//! [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
//!
//! "Node is an abstract interface that is used by all nodes in a tree."
//!
//! A [`Node`] stores indices for parent/child/sibling relationships, enabling
//! O(1) traversal in any direction. Nodes are only ever created and linked by
//! the owning [`Page`](crate::Page).

use crate::NodeId;
use crate::element::ElementData;
use crate::events::NodeListeners;
use crate::script::ScriptPeer;
use strum_macros::{AsRefStr, Display, EnumString};

/// "Each node has an associated node type"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    DocumentType {
        /// Doctype name (`html`).
        name: String,
        /// Public identifier, possibly empty.
        public_id: String,
        /// System identifier, possibly empty.
        system_id: String,
    },
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.11 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.14 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Loading progress of a node, in the order a page normally goes through.
///
/// The loading pipeline advances states from outside; nodes may skip states
/// (a script element is complete as soon as it has run).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ReadyState {
    /// Created, nothing loaded.
    Uninitialized,
    /// Content is being received.
    Loading,
    /// Content has been received.
    Loaded,
    /// Parsed and usable, subresources may still be loading.
    Interactive,
    /// Fully loaded.
    Complete,
}

/// One slot of a page arena.
#[derive(Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) ready_state: ReadyState,
    pub(crate) script_peer: Option<ScriptPeer>,
    pub(crate) listeners: NodeListeners,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            ready_state: ReadyState::Uninitialized,
            script_peer: None,
            listeners: NodeListeners::default(),
        }
    }

    /// A detached copy: same data and ready state, no links, no script peer
    /// and no listeners.
    pub(crate) fn detached_copy(&self) -> Self {
        Self {
            ready_state: self.ready_state,
            ..Self::new(self.kind.clone())
        }
    }

    /// The node's data.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Parent node, if attached.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Current ready state.
    #[must_use]
    pub const fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Check if this is an element.
    #[inline]
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    /// Get element data if this is an element.
    #[inline]
    #[must_use]
    pub const fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub(crate) const fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node.
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text of a text or comment node.
    pub(crate) fn character_data(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(s) | NodeKind::Comment(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) const fn character_data_mut(&mut self) -> Option<&mut String> {
        match &mut self.kind {
            NodeKind::Text(s) | NodeKind::Comment(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this node may have children.
    pub(crate) const fn can_have_children(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element(_))
    }

    /// [§ 4.4 nodeName](https://dom.spec.whatwg.org/#dom-node-nodename)
    #[must_use]
    pub fn node_name(&self) -> String {
        match &self.kind {
            NodeKind::Document => "#document".to_string(),
            NodeKind::DocumentType { name, .. } => name.clone(),
            NodeKind::Element(e) => e.tag_name(),
            NodeKind::Text(_) => "#text".to_string(),
            NodeKind::Comment(_) => "#comment".to_string(),
        }
    }
}
