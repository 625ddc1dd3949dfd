//! The document: arena owner, indices and page-level state.
//!
//! [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
//!
//! "The DOM represents a document as a tree."
//!
//! A [`Page`] owns every node of one document. The document node itself lives
//! at arena index 0 and is returned by [`Page::root`]. Next to the tree the
//! page keeps state that is not tree-structural: the id and name indices, the
//! focused element, registered frame windows and the script host.

use crate::element::{AttributeMap, ElementData, HtmlTag};
use crate::factory::create_element_data;
use crate::frames::{FrameWindow, WindowId};
use crate::index::ElementIndex;
use crate::node::{Node, NodeKind, ReadyState};
use crate::script::{EventType, ScriptHost};
use crate::{DocumentId, DomError, NodeId, Result};
use std::sync::LazyLock;
use url::Url;

/// URL of pages that were not loaded from anywhere.
static ABOUT_BLANK: LazyLock<Url> =
    LazyLock::new(|| Url::parse("about:blank").expect("about:blank is a valid URL"));

/// A loaded HTML document.
pub struct Page {
    pub(crate) id: DocumentId,
    pub(crate) nodes: Vec<Node>,
    url: Url,
    pub(crate) id_index: ElementIndex,
    pub(crate) name_index: ElementIndex,
    pub(crate) focused: Option<NodeId>,
    pub(crate) frames: Vec<FrameWindow>,
    pub(crate) enclosing_window: Option<WindowId>,
    pub(crate) script_host: Option<Box<dyn ScriptHost>>,
    pub(crate) script_enabled: bool,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.id)
            .field("url", &self.url.as_str())
            .field("nodes", &self.nodes.len())
            .field("focused", &self.focused)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Create a page holding only the document node.
    #[must_use]
    pub fn new(url: Url) -> Self {
        let id = DocumentId::allocate();
        Self {
            id,
            nodes: vec![Node::new(NodeKind::Document)],
            url,
            id_index: ElementIndex::default(),
            name_index: ElementIndex::default(),
            focused: None,
            frames: Vec::new(),
            enclosing_window: None,
            script_host: None,
            script_enabled: false,
        }
    }

    /// An empty `about:blank` page.
    #[must_use]
    pub fn blank() -> Self {
        Self::new(ABOUT_BLANK.clone())
    }

    /// Identity of this page.
    #[must_use]
    pub const fn id(&self) -> DocumentId {
        self.id
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::new(self.id, 0)
    }

    /// The page URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// The window displaying this page, once the client has assigned one.
    #[must_use]
    pub const fn enclosing_window(&self) -> Option<WindowId> {
        self.enclosing_window
    }

    /// Record the window displaying this page.
    pub const fn set_enclosing_window(&mut self, window: WindowId) {
        self.enclosing_window = Some(window);
    }

    /// Number of nodes ever allocated in this page, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the document node exists from the start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ----- node access -----

    /// Get a node by its ID; `None` for nodes of other pages.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.document() != self.id {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// The node at arena position `index`, for handles that only kept
    /// [`NodeId::index`].
    #[must_use]
    pub fn node_at(&self, index: usize) -> Option<NodeId> {
        let slot = u32::try_from(index).ok()?;
        (index < self.nodes.len()).then(|| NodeId::new(self.id, slot))
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        if id.document() != self.id {
            return Err(DomError::NodeNotFound(id));
        }
        self.nodes
            .get_mut(id.index())
            .ok_or(DomError::NodeNotFound(id))
    }

    /// Element data of `id`.
    pub fn element(&self, id: NodeId) -> Result<&ElementData> {
        self.node(id)?.as_element().ok_or(DomError::NotAnElement(id))
    }

    /// Get element data if `id` is an element of this page.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Get text content if `id` is a text node of this page.
    #[must_use]
    pub fn text_data(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::as_text)
    }

    /// Whether `id` is an element with tag `tag`.
    #[must_use]
    pub fn is_element(&self, id: NodeId, tag: HtmlTag) -> bool {
        self.as_element(id).is_some_and(|e| e.is(tag))
    }

    /// [§ 4.4 nodeName](https://dom.spec.whatwg.org/#dom-node-nodename)
    pub fn node_name(&self, id: NodeId) -> Result<String> {
        Ok(self.node(id)?.node_name())
    }

    // ----- node creation -----

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let index = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes.push(Node::new(kind));
        NodeId::new(self.id, index)
    }

    pub(crate) fn alloc_node(&mut self, node: Node) -> NodeId {
        let index = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes.push(node);
        NodeId::new(self.id, index)
    }

    /// [§ 4.5 createElement](https://dom.spec.whatwg.org/#dom-document-createelement)
    ///
    /// Creates a detached HTML element. `attributes` are expected to use
    /// lower-case names, as the parser produces them.
    pub fn create_element(&mut self, tag_name: &str, attributes: AttributeMap) -> NodeId {
        self.create_element_ns(tag_name, None, attributes)
    }

    /// [§ 4.5 createElementNS](https://dom.spec.whatwg.org/#dom-document-createelementns)
    pub fn create_element_ns(
        &mut self,
        qualified_name: &str,
        namespace_uri: Option<&str>,
        attributes: AttributeMap,
    ) -> NodeId {
        let data = create_element_data(qualified_name, namespace_uri, attributes);
        let id = self.alloc(NodeKind::Element(data));
        if self.is_element(id, HtmlTag::Script) {
            // Nothing to load until the pipeline runs it; the node starts
            // out as loading and jumps to complete once executed.
            if let Ok(node) = self.node_mut(id) {
                node.ready_state = ReadyState::Loading;
            }
        }
        id
    }

    /// [§ 4.5 createTextNode](https://dom.spec.whatwg.org/#dom-document-createtextnode)
    pub fn create_text_node(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Text(data.to_string()))
    }

    /// [§ 4.5 createComment](https://dom.spec.whatwg.org/#dom-document-createcomment)
    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Comment(data.to_string()))
    }

    /// Create a detached doctype node.
    pub fn create_document_type(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.alloc(NodeKind::DocumentType {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }

    // ----- document structure -----

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.root()).find(|&id| self.as_element(id).is_some())
    }

    /// [§ 3.1.3 The head element](https://html.spec.whatwg.org/multipage/dom.html#the-head-element-2)
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html).find(|&id| self.is_element(id, HtmlTag::Head))
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html).find(|&id| {
            self.as_element(id)
                .is_some_and(|e| e.is(HtmlTag::Body) || e.is(HtmlTag::Frameset))
        })
    }

    /// [§ 3.1.5 document.title](https://html.spec.whatwg.org/multipage/dom.html#document.title)
    ///
    /// Text of the first `title` element with whitespace collapsed; empty if
    /// there is none.
    #[must_use]
    pub fn title_text(&self) -> String {
        self.descendant_elements(self.root())
            .find(|&id| self.is_element(id, HtmlTag::Title))
            .map(|title| crate::text::collapse_whitespace(&self.text_content(title)))
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    }

    // ----- lookups -----

    /// All elements below `root` (in document order) whose tag name equals
    /// `tag_name` ignoring ASCII case.
    #[must_use]
    pub fn elements_by_tag_name(&self, root: NodeId, tag_name: &str) -> Vec<NodeId> {
        self.descendant_elements(root)
            .filter(|&id| {
                self.as_element(id)
                    .is_some_and(|e| e.qualified_name().eq_ignore_ascii_case(tag_name))
            })
            .collect()
    }

    /// All elements below `root` named `tag_name` whose `attribute` equals
    /// `value`.
    #[must_use]
    pub fn elements_by_attribute(
        &self,
        root: NodeId,
        tag_name: &str,
        attribute: &str,
        value: &str,
    ) -> Vec<NodeId> {
        self.elements_by_tag_name(root, tag_name)
            .into_iter()
            .filter(|&id| {
                self.as_element(id)
                    .is_some_and(|e| e.attributes().get(attribute) == Some(value))
            })
            .collect()
    }

    /// First element below `root` named `tag_name` whose `attribute` equals
    /// `value`.
    pub fn element_by_attribute(
        &self,
        root: NodeId,
        tag_name: &str,
        attribute: &str,
        value: &str,
    ) -> Result<NodeId> {
        self.elements_by_attribute(root, tag_name, attribute, value)
            .first()
            .copied()
            .ok_or_else(|| DomError::ElementNotFound {
                element_name: tag_name.to_string(),
                attribute_name: attribute.to_string(),
                value: value.to_string(),
            })
    }

    /// All `form` elements in document order.
    #[must_use]
    pub fn forms(&self) -> Vec<NodeId> {
        self.elements_by_tag_name(self.root(), "form")
    }

    /// The first form whose `name` attribute is `name`.
    pub fn form_by_name(&self, name: &str) -> Result<NodeId> {
        self.element_by_attribute(self.root(), "form", "name", name)
    }

    /// All `a` elements in document order.
    #[must_use]
    pub fn anchors(&self) -> Vec<NodeId> {
        self.elements_by_tag_name(self.root(), "a")
    }

    /// The first anchor whose `href` attribute is exactly `href`.
    pub fn anchor_by_href(&self, href: &str) -> Result<NodeId> {
        self.element_by_attribute(self.root(), "a", "href", href)
    }

    /// The nearest inclusive ancestor of `node` that is an element named
    /// `tag_name`.
    pub fn enclosing_element(&self, node: NodeId, tag_name: &str) -> Result<Option<NodeId>> {
        if tag_name.trim().is_empty() {
            return Err(DomError::IllegalArgument(
                "enclosing element tag name must not be empty".to_string(),
            ));
        }
        let _ = self.node(node)?;
        Ok(std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|&id| {
                self.as_element(id)
                    .is_some_and(|e| e.qualified_name().eq_ignore_ascii_case(tag_name))
            }))
    }

    // ----- URLs -----

    /// Resolve `href` against the document base URL (the first `<base href>`,
    /// or the page URL).
    pub fn resolve_url(&self, href: &str) -> Result<Url> {
        let base_href = self
            .descendant_elements(self.root())
            .find(|&id| self.is_element(id, HtmlTag::Base))
            .and_then(|base| self.as_element(base))
            .and_then(|base| base.attributes().get("href"))
            .filter(|href| !href.trim().is_empty());
        let base = match base_href {
            Some(base_href) => self.url.join(base_href.trim())?,
            None => self.url.clone(),
        };
        Ok(base.join(href.trim())?)
    }

    // ----- ready state -----

    /// Ready state of `node`.
    pub fn ready_state(&self, node: NodeId) -> Result<ReadyState> {
        Ok(self.node(node)?.ready_state)
    }

    /// Set the ready state of `node`. States may be skipped.
    pub fn set_ready_state(&mut self, node: NodeId, state: ReadyState) -> Result<()> {
        self.node_mut(node)?.ready_state = state;
        Ok(())
    }

    /// Ready state of the document node.
    #[must_use]
    pub fn document_ready_state(&self) -> ReadyState {
        self.nodes
            .first()
            .map_or(ReadyState::Uninitialized, |n| n.ready_state)
    }

    /// Mark the document as loading (the parser is about to run).
    pub fn begin_loading(&mut self) {
        if let Some(document) = self.nodes.first_mut() {
            document.ready_state = ReadyState::Loading;
        }
    }

    /// Finish the load lifecycle: the document becomes interactive, every
    /// node becomes complete, `load` is dispatched to the body (or the
    /// document when there is none) and the document becomes complete.
    pub fn complete_loading(&mut self) -> Result<()> {
        let root = self.root();
        self.set_ready_state(root, ReadyState::Interactive)?;
        for node in self.nodes.iter_mut().skip(1) {
            node.ready_state = ReadyState::Complete;
        }
        let target = self.body().unwrap_or(root);
        let _ = self.dispatch_event(target, EventType::Load)?;
        self.set_ready_state(root, ReadyState::Complete)?;
        tracing::debug!(url = %self.url, nodes = self.nodes.len(), "page load complete");
        Ok(())
    }
}
