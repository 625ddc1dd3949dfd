//! Attribute access and change notification.
//!
//! [§ 4.9.2 Attributes](https://dom.spec.whatwg.org/#dom-element-getattribute)
//!
//! Names are matched ASCII case-insensitively. Changes to `id` and `name` on
//! connected elements are mirrored into the page indices before listeners
//! hear about them.

use crate::element::{AttributeMap, AttributeValue};
use crate::events::{AttributeChangeEvent, AttributeChangeListener, ListenerResult};
use crate::index::INDEXED_ATTRIBUTES;
use crate::page::Page;
use crate::{DomError, NodeId, Result};

impl Page {
    /// [§ 4.9 getAttribute](https://dom.spec.whatwg.org/#dom-element-getattribute)
    pub fn get_attribute(&self, element: NodeId, name: &str) -> Result<AttributeValue<'_>> {
        Ok(self.element(element)?.attribute(name))
    }

    /// Whether `name` is defined on `element`, even with an empty value.
    pub fn has_attribute(&self, element: NodeId, name: &str) -> Result<bool> {
        Ok(self.element(element)?.attributes().contains(name))
    }

    /// All attributes of `element` in insertion order.
    pub fn attributes(&self, element: NodeId) -> Result<&AttributeMap> {
        Ok(self.element(element)?.attributes())
    }

    /// [§ 4.9 setAttribute](https://dom.spec.whatwg.org/#dom-element-setattribute)
    ///
    /// Adds or replaces `name`. Listeners see an addition (with the new
    /// value) or a replacement (with the old value).
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Result<()> {
        let connected = self.is_connected(element);
        let old = self
            .node_mut(element)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(element))?
            .attributes
            .insert(name, value);
        if connected && is_indexed(name) {
            self.reindex_attribute(element, name, old.as_deref(), Some(value));
        }
        match old {
            None => self.notify_attribute_change(element, name, value, |l, e| l.attribute_added(e)),
            Some(old) => {
                self.notify_attribute_change(element, name, &old, |l, e| l.attribute_replaced(e))
            }
        }
    }

    /// [§ 4.9 removeAttribute](https://dom.spec.whatwg.org/#dom-element-removeattribute)
    ///
    /// Removing an attribute that is not defined does nothing and notifies
    /// nobody.
    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> Result<()> {
        let connected = self.is_connected(element);
        let Some(old) = self
            .node_mut(element)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(element))?
            .attributes
            .remove(name)
        else {
            return Ok(());
        };
        if connected && is_indexed(name) {
            self.reindex_attribute(element, name, Some(&old), None);
        }
        self.notify_attribute_change(element, name, &old, |l, e| l.attribute_removed(e))
    }

    fn notify_attribute_change(
        &self,
        element: NodeId,
        name: &str,
        value: &str,
        call: impl Fn(&dyn AttributeChangeListener, &AttributeChangeEvent) -> ListenerResult,
    ) -> Result<()> {
        let event = AttributeChangeEvent {
            element,
            name: name.to_string(),
            value: value.to_string(),
        };
        tracing::trace!(%element, name, "attribute changed");
        self.bubble(element, |l| &l.attributes, |listener| call(listener, &event))
    }
}

fn is_indexed(name: &str) -> bool {
    INDEXED_ATTRIBUTES
        .iter()
        .any(|indexed| indexed.eq_ignore_ascii_case(name))
}
