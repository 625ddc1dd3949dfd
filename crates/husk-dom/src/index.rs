//! Id and name indices.
//!
//! [§ 4.2.4 getElementById](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
//!
//! "The getElementById(elementId) method steps are to return the first element,
//! in tree order, within this's descendants, whose ID is elementId."
//!
//! Lookups are answered from an index that is kept exhaustive for every
//! element connected to the document. When several elements share a value the
//! first one indexed wins; for a parsed page that is the first in tree order.

use crate::page::Page;
use crate::{DomError, NodeId, Result};
use std::collections::HashMap;

/// Value → elements carrying it, in insertion order.
#[derive(Debug, Default)]
pub(crate) struct ElementIndex {
    entries: HashMap<String, Vec<NodeId>>,
}

impl ElementIndex {
    pub(crate) fn add(&mut self, value: &str, element: NodeId) {
        if value.is_empty() {
            return;
        }
        let list = self.entries.entry(value.to_string()).or_default();
        if !list.contains(&element) {
            list.push(element);
        }
    }

    pub(crate) fn remove(&mut self, value: &str, element: NodeId) {
        if let Some(list) = self.entries.get_mut(value) {
            list.retain(|&id| id != element);
            if list.is_empty() {
                let _ = self.entries.remove(value);
            }
        }
    }

    pub(crate) fn first(&self, value: &str) -> Option<NodeId> {
        self.entries.get(value).and_then(|list| list.first().copied())
    }

    pub(crate) fn all(&self, value: &str) -> &[NodeId] {
        self.entries.get(value).map_or(&[], Vec::as_slice)
    }
}

/// Attributes mirrored into an index.
pub(crate) const INDEXED_ATTRIBUTES: [&str; 2] = ["id", "name"];

impl Page {
    /// The first element whose `id` attribute is `id`.
    pub fn element_by_id(&self, id: &str) -> Result<NodeId> {
        self.id_index
            .first(id)
            .ok_or_else(|| DomError::not_found("id", id))
    }

    /// Whether any connected element has `id`.
    #[must_use]
    pub fn has_element_with_id(&self, id: &str) -> bool {
        self.id_index.first(id).is_some()
    }

    /// Every connected element whose `id` attribute is `id`, first indexed
    /// first.
    #[must_use]
    pub fn elements_by_id(&self, id: &str) -> Vec<NodeId> {
        self.id_index.all(id).to_vec()
    }

    /// The first element whose `name` attribute is `name`.
    pub fn element_by_name(&self, name: &str) -> Result<NodeId> {
        self.name_index
            .first(name)
            .ok_or_else(|| DomError::not_found("name", name))
    }

    /// Every connected element whose `name` attribute is `name`.
    #[must_use]
    pub fn elements_by_name(&self, name: &str) -> Vec<NodeId> {
        self.name_index.all(name).to_vec()
    }

    /// Index `node` (and with `recursive` its descendant elements) under their
    /// `id` and `name` values.
    ///
    /// Does nothing for nodes not connected to the document. Indexing an
    /// already indexed element is a no-op.
    pub fn add_index_entries(&mut self, node: NodeId, recursive: bool) -> Result<()> {
        let _ = self.node(node)?;
        if !self.is_connected(node) {
            return Ok(());
        }
        for element in self.index_targets(node, recursive) {
            self.index_element(element);
        }
        Ok(())
    }

    /// Index `node` and its descendant elements; the caller knows `node` is
    /// connected.
    pub(crate) fn index_subtree(&mut self, node: NodeId) {
        for element in self.index_targets(node, true) {
            self.index_element(element);
        }
    }

    /// Drop the index entries of `node` (and with `recursive` its descendant
    /// elements). Removing absent entries is a no-op.
    pub fn remove_index_entries(&mut self, node: NodeId, recursive: bool) -> Result<()> {
        let _ = self.node(node)?;
        for element in self.index_targets(node, recursive) {
            self.unindex_element(element);
        }
        Ok(())
    }

    fn index_targets(&self, node: NodeId, recursive: bool) -> Vec<NodeId> {
        let mut targets: Vec<NodeId> = Vec::new();
        if self.as_element(node).is_some() {
            targets.push(node);
        }
        if recursive {
            targets.extend(self.descendants(node).filter(|&id| self.as_element(id).is_some()));
        }
        targets
    }

    pub(crate) fn index_element(&mut self, element: NodeId) {
        let (id, name) = self.indexed_values(element);
        if let Some(id) = id {
            self.id_index.add(&id, element);
        }
        if let Some(name) = name {
            self.name_index.add(&name, element);
        }
    }

    pub(crate) fn unindex_element(&mut self, element: NodeId) {
        let (id, name) = self.indexed_values(element);
        if let Some(id) = id {
            self.id_index.remove(&id, element);
        }
        if let Some(name) = name {
            self.name_index.remove(&name, element);
        }
    }

    fn indexed_values(&self, element: NodeId) -> (Option<String>, Option<String>) {
        self.as_element(element).map_or((None, None), |data| {
            let attributes = data.attributes();
            (
                attributes.get("id").map(str::to_string),
                attributes.get("name").map(str::to_string),
            )
        })
    }

    /// Move `element` from the `attribute` index entry for `old` to the one
    /// for `new`. Only called for connected elements.
    pub(crate) fn reindex_attribute(
        &mut self,
        element: NodeId,
        attribute: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) {
        let index = if attribute.eq_ignore_ascii_case("id") {
            &mut self.id_index
        } else {
            &mut self.name_index
        };
        if let Some(old) = old {
            index.remove(old, element);
        }
        if let Some(new) = new {
            index.add(new, element);
        }
    }
}
