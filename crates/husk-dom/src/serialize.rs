//! XML serialization.
//!
//! Produces an indented, well-formed XML rendition of a node: one element,
//! text or comment per line, two spaces per nesting level. Whitespace-only
//! text and doctypes are dropped; elements without children are written as
//! empty-element tags.

use crate::node::NodeKind;
use crate::page::Page;
use crate::{NodeId, Result};
use std::fmt::Write;

/// Prologue written before a serialized document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

impl Page {
    /// Serialize the whole page, starting with the XML declaration.
    #[must_use]
    pub fn as_xml(&self) -> String {
        self.node_as_xml(self.root()).unwrap_or_default()
    }

    /// Serialize `node` and its subtree. A document node gets the XML
    /// declaration.
    pub fn node_as_xml(&self, node: NodeId) -> Result<String> {
        let mut out = String::new();
        if matches!(self.node(node)?.kind, NodeKind::Document) {
            out.push_str(XML_DECLARATION);
            out.push('\n');
            for child in self.children(node) {
                self.write_xml(child, 0, &mut out)?;
            }
        } else {
            self.write_xml(node, 0, &mut out)?;
        }
        Ok(out)
    }

    fn write_xml(&self, node: NodeId, depth: usize, out: &mut String) -> Result<()> {
        let mut stack = vec![Frame::Enter(node, depth)];
        while let Some(frame) = stack.pop() {
            let (id, depth) = match frame {
                Frame::Close(id, depth) => {
                    if let Some(data) = self.as_element(id) {
                        let _ = writeln!(out, "{}</{}>", indent(depth), data.qualified_name());
                    }
                    continue;
                }
                Frame::Enter(id, depth) => (id, depth),
            };
            let prefix = indent(depth);
            match &self.node(id)?.kind {
                NodeKind::Element(data) => {
                    let _ = write!(out, "{prefix}<{}", data.qualified_name());
                    for attribute in data.attributes().iter() {
                        let _ = write!(out, " {}=\"{}\"", attribute.name, escape(&attribute.value, true));
                    }
                    if self.first_child(id).is_none() {
                        out.push_str("/>\n");
                        continue;
                    }
                    out.push_str(">\n");
                    stack.push(Frame::Close(id, depth));
                    self.push_children(id, depth + 1, &mut stack);
                }
                NodeKind::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        let _ = writeln!(out, "{prefix}{}", escape(trimmed, false));
                    }
                }
                NodeKind::Comment(data) => {
                    let _ = writeln!(out, "{prefix}<!--{data}-->");
                }
                NodeKind::Document => self.push_children(id, depth, &mut stack),
                NodeKind::DocumentType { .. } => {}
            }
        }
        Ok(())
    }

    /// Queue the children of `id` so they pop in document order.
    fn push_children(&self, id: NodeId, depth: usize, stack: &mut Vec<Frame>) {
        let first = stack.len();
        stack.extend(self.children(id).map(|child| Frame::Enter(child, depth)));
        stack[first..].reverse();
    }
}

/// Pending work of the serializer: open a node, or write an element's end
/// tag.
enum Frame {
    Enter(NodeId, usize),
    Close(NodeId, usize),
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Escape markup characters; quotes only inside attribute values.
fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttributeMap;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b & "c">"#, false), r#"a&lt;b &amp; "c"&gt;"#);
        assert_eq!(escape(r#""x""#, true), "&quot;x&quot;");
    }

    #[test]
    fn test_document_serialization() {
        let mut page = Page::blank();
        let root = page.root();
        let html = page.create_element("html", AttributeMap::new());
        let p = page.create_element("p", [("class", "a&b")].into_iter().collect());
        let text = page.create_text_node("  hi  ");
        let br = page.create_element("br", AttributeMap::new());
        page.append_child(root, html).unwrap();
        page.append_child(html, p).unwrap();
        page.append_child(p, text).unwrap();
        page.append_child(p, br).unwrap();

        let expected = format!(
            "{XML_DECLARATION}\n<html>\n  <p class=\"a&amp;b\">\n    hi\n    <br/>\n  </p>\n</html>\n"
        );
        assert_eq!(page.as_xml(), expected);
    }

    #[test]
    fn test_deep_nesting_serializes() {
        let mut page = Page::blank();
        let mut parent = page.root();
        for _ in 0..3000 {
            let div = page.create_element("div", AttributeMap::new());
            page.append_child(parent, div).unwrap();
            parent = div;
        }

        let xml = page.as_xml();

        assert_eq!(xml.matches("<div>").count(), 2999);
        assert_eq!(xml.matches("<div/>").count(), 1);
        assert_eq!(xml.matches("</div>").count(), 2999);
        assert!(xml.ends_with("</div>\n"));
    }
}
