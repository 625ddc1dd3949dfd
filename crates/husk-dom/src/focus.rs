//! Focus, sequential navigation and access keys.
//!
//! [§ 6.6.3 The tabindex attribute](https://html.spec.whatwg.org/multipage/interaction.html#attr-tabindex)
//!
//! The tab order is recomputed on every request: elements with a positive
//! `tabindex` come first in ascending order, followed by elements with a zero
//! or missing index, each group in tree order.

use crate::element::{Capabilities, ElementData, HtmlTag, TabIndex};
use crate::page::Page;
use crate::script::EventType;
use crate::{NodeId, Result};

impl Page {
    /// The element that currently has focus.
    #[must_use]
    pub const fn focused_element(&self) -> Option<NodeId> {
        self.focused
    }

    /// [§ 6.6.4 Focus update steps](https://html.spec.whatwg.org/multipage/interaction.html#focus-update-steps)
    ///
    /// Moves focus to `target` (or clears it with `None`), sending `blur` to
    /// the previously focused element and `focus` to the new one. Returns
    /// whether focus changed.
    pub fn move_focus_to(&mut self, target: Option<NodeId>) -> Result<bool> {
        if let Some(target) = target {
            let _ = self.element(target)?;
        }
        if self.focused == target {
            return Ok(false);
        }
        let previous = std::mem::replace(&mut self.focused, target);
        tracing::trace!(?previous, ?target, "focus moved");
        if let Some(previous) = previous {
            let _ = self.dispatch_event(previous, EventType::Blur)?;
        }
        if let Some(target) = target {
            let _ = self.dispatch_event(target, EventType::Focus)?;
        }
        Ok(true)
    }

    /// Connected elements reachable with the tab key, in tab order.
    #[must_use]
    pub fn tabbable_elements(&self) -> Vec<NodeId> {
        let mut tabbable: Vec<(u16, NodeId)> = self
            .descendant_elements(self.root())
            .filter_map(|id| {
                let element = self.as_element(id)?;
                let key = tab_order_key(element)?;
                Some((key, id))
            })
            .collect();
        // Stable: equal keys keep tree order.
        tabbable.sort_by_key(|&(key, _)| if key == 0 { (1, 0) } else { (0, key) });
        tabbable.into_iter().map(|(_, id)| id).collect()
    }

    /// Focus the element after the focused one in tab order, wrapping
    /// around. Without a focused element the first tabbable element gets
    /// focus. Returns the newly focused element.
    pub fn tab_to_next_element(&mut self) -> Result<Option<NodeId>> {
        self.tab(|position, len| position.map_or(0, |p| (p + 1) % len))
    }

    /// Focus the element before the focused one in tab order, wrapping
    /// around. Without a focused element the last tabbable element gets
    /// focus.
    pub fn tab_to_previous_element(&mut self) -> Result<Option<NodeId>> {
        self.tab(|position, len| position.map_or(len - 1, |p| (p + len - 1) % len))
    }

    fn tab(&mut self, step: impl Fn(Option<usize>, usize) -> usize) -> Result<Option<NodeId>> {
        let order = self.tabbable_elements();
        if order.is_empty() {
            return Ok(None);
        }
        let position = self
            .focused
            .and_then(|focused| order.iter().position(|&id| id == focused));
        let next = order[step(position, order.len())];
        let _ = self.move_focus_to(Some(next))?;
        Ok(Some(next))
    }

    /// The first element whose `accesskey` is `key`, compared
    /// case-insensitively.
    #[must_use]
    pub fn element_by_access_key(&self, key: char) -> Option<NodeId> {
        self.descendant_elements(self.root()).find(|&id| {
            self.as_element(id).is_some_and(|element| {
                element.capabilities().contains(Capabilities::ACCESS_KEY)
                    && element.attributes().get("accesskey").is_some_and(|k| {
                        let mut chars = k.chars();
                        chars
                            .next()
                            .is_some_and(|c| c.to_lowercase().eq(key.to_lowercase()))
                            && chars.next().is_none()
                    })
            })
        })
    }

    /// Focus the element bound to `key`. Returns it, or `None` if no element
    /// has that access key.
    pub fn press_access_key(&mut self, key: char) -> Result<Option<NodeId>> {
        let Some(element) = self.element_by_access_key(key) else {
            return Ok(None);
        };
        let focusable = self
            .as_element(element)
            .is_some_and(|e| e.capabilities().contains(Capabilities::FOCUSABLE));
        if focusable {
            let _ = self.move_focus_to(Some(element))?;
        }
        Ok(Some(element))
    }
}

/// Sort key for tab order; `None` for elements that are skipped.
fn tab_order_key(element: &ElementData) -> Option<u16> {
    if !element.capabilities().contains(Capabilities::FOCUSABLE) || element.is_disabled() {
        return None;
    }
    if element.is(HtmlTag::Input) && element.input_type() == "hidden" {
        return None;
    }
    match element.tab_index() {
        TabIndex::Unspecified => Some(0),
        TabIndex::Index(index) => Some(index),
        TabIndex::OutOfBounds => None,
    }
}
