//! Frame registry.
//!
//! [§ 7.3.3 Nested browsing contexts](https://html.spec.whatwg.org/multipage/document-sequences.html#nested-navigables)
//!
//! The page records which window displays the content of each of its
//! `frame`/`iframe` elements. Windows themselves belong to the client; the
//! page only keeps their ids.

use crate::element::HtmlTag;
use crate::page::Page;
use crate::{DomError, NodeId, Result};
use std::fmt;

/// Identity of a window owned by the web client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// A frame element together with the window showing its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameWindow {
    /// The `frame` or `iframe` element.
    pub element: NodeId,
    /// The nested window.
    pub window: WindowId,
    /// The frame name (`name` attribute, else `id`), possibly empty.
    pub name: String,
}

impl Page {
    /// Connected `frame` and `iframe` elements in tree order.
    #[must_use]
    pub fn frame_elements(&self) -> Vec<NodeId> {
        self.descendant_elements(self.root())
            .filter(|&id| self.is_element(id, HtmlTag::Frame) || self.is_element(id, HtmlTag::Iframe))
            .collect()
    }

    /// Record that `window` displays the content of `element`.
    ///
    /// Registering the same element again replaces its window.
    pub fn register_frame(&mut self, element: NodeId, window: WindowId) -> Result<()> {
        let data = self.element(element)?;
        if !(data.is(HtmlTag::Frame) || data.is(HtmlTag::Iframe)) {
            return Err(DomError::IllegalArgument(format!(
                "<{}> is not a frame element",
                data.tag_name()
            )));
        }
        let name = data
            .attributes()
            .get("name")
            .filter(|n| !n.is_empty())
            .or_else(|| data.attributes().get("id"))
            .unwrap_or_default()
            .to_string();
        self.frames.retain(|f| f.element != element);
        tracing::debug!(%element, %window, name, "frame registered");
        self.frames.push(FrameWindow {
            element,
            window,
            name,
        });
        Ok(())
    }

    /// Registered frames in registration order.
    #[must_use]
    pub fn frames(&self) -> &[FrameWindow] {
        &self.frames
    }

    /// The first registered frame called `name`.
    pub fn frame_by_name(&self, name: &str) -> Result<&FrameWindow> {
        self.frames
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| DomError::ElementNotFound {
                element_name: "frame".to_string(),
                attribute_name: "name".to_string(),
                value: name.to_string(),
            })
    }

    /// Forget the frame whose window is `window`, returning its entry.
    pub fn deregister_frame(&mut self, window: WindowId) -> Option<FrameWindow> {
        let position = self.frames.iter().position(|f| f.window == window)?;
        Some(self.frames.remove(position))
    }

    /// Forget every frame, returning the entries. Used when the page is
    /// discarded so the client can close the nested windows.
    pub fn take_frames(&mut self) -> Vec<FrameWindow> {
        std::mem::take(&mut self.frames)
    }
}
