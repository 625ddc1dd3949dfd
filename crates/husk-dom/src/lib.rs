//! DOM tree implementation for the husk headless browser.
//!
//! This crate provides an arena-based DOM tree following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), extended with the
//! bookkeeping a scripted page needs: change listeners, an id index, focus and
//! tab order, frame registration and click/submit behaviour.
//!
//! # Design
//!
//! A [`Page`] owns every node of its document in a single arena. All
//! relationships (parent, children, siblings) are [`NodeId`] indices resolved
//! through the page, so the cyclic parent/child graph needs no reference
//! counting. A [`NodeId`] also records which page created it; handing a node
//! of one page to another page is reported as [`DomError::NodeNotFound`].
//!
//! ```ignore
//! let mut page = Page::blank();
//! let body = page.create_element("body", AttributeMap::new());
//! page.append_child(page.root(), body)?;
//! let input = page.create_element("input", [("id", "name")].into_iter().collect());
//! page.append_child(body, input)?;
//! assert_eq!(page.element_by_id("name")?, input);
//! ```

mod actions;
mod attributes;
mod element;
mod error;
mod events;
mod factory;
mod focus;
mod forms;
mod frames;
mod index;
mod node;
mod page;
mod request;
mod script;
mod serialize;
mod text;
mod traverse;
mod tree;

pub use actions::ClickOutcome;
pub use element::{
    Attribute, AttributeMap, AttributeValue, Capabilities, Disableable, ElementData, HtmlTag,
    Submittable, TabIndex,
};
pub use error::{DomError, Result};
pub use events::{
    AttributeChangeEvent, AttributeChangeListener, DomChangeEvent, DomChangeListener,
    ListenerError, ListenerRegistry, ListenerResult,
};
pub use factory::{HTML_NAMESPACE, create_element_data};
pub use frames::{FrameWindow, WindowId};
pub use node::{Node, NodeKind, ReadyState};
pub use page::Page;
pub use request::{FORM_URLENCODED, HttpMethod, WebRequest};
pub use script::{EventOutcome, EventType, ScriptHost, ScriptPeer};
pub use serialize::XML_DECLARATION;
pub use traverse::{Ancestors, ChildCursor, Children, Descendants, PrecedingSiblings};

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identity of one [`Page`].
///
/// "Each node has an associated node document, set upon creation."
/// ([§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node))
///
/// Allocated from a process-wide counter, so two pages never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u32);

impl DocumentId {
    pub(crate) fn allocate() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A type-safe handle to a node in a [`Page`] arena.
///
/// The handle is only meaningful for the page that created it; the owning
/// document is part of the handle and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    document: DocumentId,
    index: u32,
}

impl NodeId {
    pub(crate) const fn new(document: DocumentId, index: u32) -> Self {
        Self { document, index }
    }

    /// The page this node belongs to.
    #[must_use]
    pub const fn document(self) -> DocumentId {
        self.document
    }

    /// Position of the node in its page's arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.document, self.index)
    }
}
