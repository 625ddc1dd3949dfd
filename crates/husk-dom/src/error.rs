//! Error types for DOM operations.
//!
//! Every failure is reported synchronously to the caller of the operation that
//! violated a precondition. Nothing in the tree machinery retries or logs and
//! continues.

use crate::NodeId;
use crate::events::ListenerError;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DomError>;

/// Errors raised by [`Page`](crate::Page) operations.
#[derive(Debug, Error)]
pub enum DomError {
    /// The node handle does not belong to this page.
    #[error("node {0} does not belong to this page")]
    NodeNotFound(NodeId),

    /// A structural operation needed an attached node (or a current cursor
    /// position) and did not get one.
    #[error("cannot {operation} node {node}: it is not attached to a parent")]
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
        /// The offending node.
        node: NodeId,
    },

    /// The insertion would produce an invalid tree.
    ///
    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    #[error("cannot insert {child} under {parent}: {reason}")]
    HierarchyRequest {
        /// The would-be parent.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
        /// Why the insertion is rejected.
        reason: &'static str,
    },

    /// An element operation was applied to a non-element node.
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// A character data operation was applied to a node without text.
    #[error("node {0} is not a text or comment node")]
    NotCharacterData(NodeId),

    /// A lookup found nothing.
    #[error("no <{element_name}> element with {attribute_name}=\"{value}\"")]
    ElementNotFound {
        /// The tag searched for (`*` for any element).
        element_name: String,
        /// The attribute searched on.
        attribute_name: String,
        /// The value searched for.
        value: String,
    },

    /// An argument was out of range or malformed.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// A URL attribute could not be resolved against the page URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A change listener failed while being notified.
    #[error("change listener failed: {0}")]
    Listener(#[source] ListenerError),

    /// The script host failed while handling an event or running a script.
    #[error("script host failed: {0}")]
    Script(#[source] ListenerError),
}

impl DomError {
    /// Shorthand for an [`DomError::ElementNotFound`] on any element.
    pub(crate) fn not_found(attribute_name: &str, value: &str) -> Self {
        Self::ElementNotFound {
            element_name: "*".to_string(),
            attribute_name: attribute_name.to_string(),
            value: value.to_string(),
        }
    }
}
