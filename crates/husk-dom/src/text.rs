//! Text extraction and character data operations.
//!
//! [§ 4.10 Interface CharacterData](https://dom.spec.whatwg.org/#interface-characterdata)
//!
//! Offsets and counts are measured in characters, not bytes.

use crate::element::{Capabilities, ElementData, HtmlTag};
use crate::node::NodeKind;
use crate::page::Page;
use crate::{DomError, NodeId, Result};

enum Visit {
    Enter(NodeId),
    Exit,
}

impl Page {
    /// Text of `node` roughly as a browser would show it.
    ///
    /// Whitespace runs collapse to one space, block elements are separated
    /// by spaces, `br` renders as a space, and the content of `script`,
    /// `style`, `title` (and `noscript` while scripting is enabled) is
    /// skipped. The result is trimmed unless `node` is an inline formatting
    /// element.
    pub fn rendered_text(&self, node: NodeId) -> Result<String> {
        let _ = self.node(node)?;
        let mut raw = String::new();
        let mut stack = vec![Visit::Enter(node)];
        while let Some(visit) = stack.pop() {
            let id = match visit {
                Visit::Exit => {
                    raw.push(' ');
                    continue;
                }
                Visit::Enter(id) => id,
            };
            match &self.node(id)?.kind {
                NodeKind::Text(text) => raw.push_str(text),
                NodeKind::Element(element) => {
                    if id != node && self.is_hidden_text(element) {
                        continue;
                    }
                    if element.is(HtmlTag::Br) {
                        raw.push(' ');
                        continue;
                    }
                    if element.capabilities().contains(Capabilities::BLOCK) {
                        raw.push(' ');
                        stack.push(Visit::Exit);
                    }
                    self.push_children_reversed(id, &mut stack);
                }
                NodeKind::Document => self.push_children_reversed(id, &mut stack),
                NodeKind::Comment(_) | NodeKind::DocumentType { .. } => {}
            }
        }
        let collapsed = collapse_whitespace(&raw);
        let inline = self
            .as_element(node)
            .is_some_and(|e| e.capabilities().contains(Capabilities::INLINE_FORMATTING));
        Ok(if inline {
            collapsed
        } else {
            collapsed.trim().to_string()
        })
    }

    /// Rendered text of the whole page (the body, else the document).
    #[must_use]
    pub fn as_text(&self) -> String {
        let node = self
            .body()
            .or_else(|| self.document_element())
            .unwrap_or_else(|| self.root());
        self.rendered_text(node).unwrap_or_default()
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Raw concatenation of descendant text; the data itself for text and
    /// comment nodes.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(data) = self.get(node).and_then(|n| n.character_data()) {
            return data.to_string();
        }
        self.descendants(node)
            .filter_map(|id| self.text_data(id))
            .collect()
    }

    fn is_hidden_text(&self, element: &ElementData) -> bool {
        matches!(
            element.tag(),
            HtmlTag::Script | HtmlTag::Style | HtmlTag::Title
        ) || (self.script_enabled && element.capabilities().contains(Capabilities::SCRIPT_HIDING))
    }

    fn push_children_reversed(&self, id: NodeId, stack: &mut Vec<Visit>) {
        let start = stack.len();
        stack.extend(self.children(id).map(Visit::Enter));
        stack[start..].reverse();
    }

    // ----- character data -----

    /// The data of a text or comment node.
    pub fn character_data(&self, node: NodeId) -> Result<&str> {
        self.node(node)?
            .character_data()
            .ok_or(DomError::NotCharacterData(node))
    }

    fn data_mut(&mut self, node: NodeId) -> Result<&mut String> {
        self.node_mut(node)?
            .character_data_mut()
            .ok_or(DomError::NotCharacterData(node))
    }

    /// [§ 4.10 appendData](https://dom.spec.whatwg.org/#dom-characterdata-appenddata)
    pub fn append_data(&mut self, node: NodeId, data: &str) -> Result<()> {
        self.data_mut(node)?.push_str(data);
        Ok(())
    }

    /// [§ 4.10 insertData](https://dom.spec.whatwg.org/#dom-characterdata-insertdata)
    pub fn insert_data(&mut self, node: NodeId, offset: usize, data: &str) -> Result<()> {
        self.replace_data(node, offset, 0, data)
    }

    /// [§ 4.10 deleteData](https://dom.spec.whatwg.org/#dom-characterdata-deletedata)
    ///
    /// A `count` reaching past the end deletes up to the end.
    pub fn delete_data(&mut self, node: NodeId, offset: usize, count: usize) -> Result<()> {
        self.replace_data(node, offset, count, "")
    }

    /// [§ 4.10 replaceData](https://dom.spec.whatwg.org/#dom-characterdata-replacedata)
    ///
    /// "If offset is greater than length, then throw an "IndexSizeError"
    /// DOMException."
    pub fn replace_data(
        &mut self,
        node: NodeId,
        offset: usize,
        count: usize,
        data: &str,
    ) -> Result<()> {
        let text = self.data_mut(node)?;
        let (start, end) = char_range(text, offset, count)?;
        text.replace_range(start..end, data);
        Ok(())
    }

    /// [§ 4.10 substringData](https://dom.spec.whatwg.org/#dom-characterdata-substringdata)
    pub fn substring_data(&self, node: NodeId, offset: usize, count: usize) -> Result<String> {
        let text = self.character_data(node)?;
        let (start, end) = char_range(text, offset, count)?;
        Ok(text[start..end].to_string())
    }

    /// [§ 4.11 splitText](https://dom.spec.whatwg.org/#dom-text-splittext)
    ///
    /// Keeps the first `offset` characters in `node` and moves the rest into
    /// a new text node, inserted after `node` when it has a parent.
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> Result<NodeId> {
        if self.text_data(node).is_none() {
            return Err(DomError::NotCharacterData(node));
        }
        let text = self.data_mut(node)?;
        let (start, _) = char_range(text, offset, 0)?;
        let tail = text.split_off(start);
        let new_node = self.create_text_node(&tail);
        if let Some(parent) = self.parent(node) {
            match self.next_sibling(node) {
                Some(next) => {
                    let _ = self.insert_before(next, new_node)?;
                }
                None => {
                    let _ = self.append_child(parent, new_node)?;
                }
            }
        }
        Ok(new_node)
    }
}

/// Byte range of `count` characters starting at character `offset`, clipped
/// at the end of `text`.
fn char_range(text: &str, offset: usize, count: usize) -> Result<(usize, usize)> {
    let byte_at = |chars: usize| {
        text.char_indices()
            .map(|(b, _)| b)
            .chain(std::iter::once(text.len()))
            .nth(chars)
    };
    let start = byte_at(offset).ok_or_else(|| {
        DomError::IllegalArgument(format!(
            "offset {offset} is past the end of {} characters",
            text.chars().count()
        ))
    })?;
    let end = byte_at(offset.saturating_add(count)).unwrap_or(text.len());
    Ok((start, end))
}

/// Collapse every whitespace run (including U+00A0) into a single space.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace_includes_nbsp() {
        assert_eq!(collapse_whitespace("a \u{a0}\n\tb  c"), "a b c");
    }

    #[test]
    fn test_char_range_counts_characters() {
        assert_eq!(char_range("héllo", 1, 2).unwrap(), (1, 4));
        assert_eq!(char_range("abc", 3, 5).unwrap(), (3, 3));
        assert!(char_range("abc", 4, 0).is_err());
    }
}
