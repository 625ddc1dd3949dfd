//! HTML parsing for husk.
//!
//! Tokenization and tree construction are delegated to html5ever, which
//! implements the [WHATWG parsing algorithm](https://html.spec.whatwg.org/multipage/parsing.html)
//! including its error recovery. The resulting `RcDom` is then converted into
//! a [`Page`] node by node through the page's element factory, so parsed and
//! script-created elements are indistinguishable.

use html5ever::parse_document as parse_html;
use html5ever::tendril::TendrilSink;
use husk_common::warning::warn_once;
use husk_dom::{AttributeMap, DomError, NodeId, Page, ReadyState};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use thiserror::Error;
use url::Url;

/// Errors produced while building a page from markup.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// The converted tree was rejected by the page.
    #[error("failed to build the page: {0}")]
    Dom(#[from] DomError),
}

/// Parse `html` into a new page located at `url`.
///
/// The returned page is in the [`ReadyState::Loaded`] state: the markup is
/// in place, scripts have not run and `load` has not fired.
pub fn parse_document(html: &str, url: Url) -> Result<Page, HtmlError> {
    tracing::debug!(%url, bytes = html.len(), "parsing document");
    let mut page = Page::new(url);
    page.begin_loading();
    parse_into(&mut page, html)?;
    let root = page.root();
    page.set_ready_state(root, ReadyState::Loaded)?;
    tracing::debug!(nodes = page.len(), "parsed document");
    Ok(page)
}

/// Parse `html` as a complete document and append its nodes under the root
/// of `page`.
pub fn parse_into(page: &mut Page, html: &str) -> Result<(), HtmlError> {
    let dom = parse_html(RcDom::default(), Default::default()).one(html);
    let root = page.root();
    convert_children(&dom.document, page, root)
}

/// Convert the children of `handle` under `parent`, in order.
///
/// Uses an explicit work list so deeply nested markup cannot exhaust the
/// stack.
fn convert_children(handle: &Handle, page: &mut Page, parent: NodeId) -> Result<(), HtmlError> {
    let mut pending: Vec<(Handle, NodeId)> = handle
        .children
        .borrow()
        .iter()
        .rev()
        .map(|child| (child.clone(), parent))
        .collect();
    while let Some((handle, parent)) = pending.pop() {
        let Some(id) = convert_node(&handle, page)? else {
            continue;
        };
        let _ = page.append_child(parent, id)?;
        let mut children: Vec<Handle> = handle.children.borrow().iter().cloned().collect();
        if let NodeData::Element {
            template_contents, ..
        } = &handle.data
        {
            // Template content is kept inline so it stays visible to lookups.
            if let Some(contents) = template_contents.borrow().as_ref() {
                children.extend(contents.children.borrow().iter().cloned());
            }
        }
        pending.extend(children.into_iter().rev().map(|child| (child, id)));
    }
    Ok(())
}

/// Create the detached page node for one `RcDom` node.
fn convert_node(handle: &Handle, page: &mut Page) -> Result<Option<NodeId>, HtmlError> {
    let id = match &handle.data {
        NodeData::Document => None,
        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => Some(page.create_document_type(name, public_id, system_id)),
        NodeData::Text { contents } => Some(page.create_text_node(&contents.borrow())),
        NodeData::Comment { contents } => Some(page.create_comment(contents)),
        NodeData::Element { name, attrs, .. } => {
            let qualified_name = match &name.prefix {
                Some(prefix) => format!("{}:{}", &**prefix, &*name.local),
                None => name.local.to_string(),
            };
            let attributes: AttributeMap = attrs
                .borrow()
                .iter()
                .map(|attr| {
                    let local = attr.name.local.to_ascii_lowercase();
                    let name = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{local}", &**prefix),
                        None => local.to_string(),
                    };
                    (name, attr.value.to_string())
                })
                .collect();
            Some(page.create_element_ns(&qualified_name, Some(&*name.ns), attributes))
        }
        NodeData::ProcessingInstruction { target, .. } => {
            let _ = warn_once(
                "HTML",
                &format!("processing instruction <?{}?> ignored", &**target),
            );
            None
        }
    };
    Ok(id)
}
