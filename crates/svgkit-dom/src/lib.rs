//! # SvgKit DOM
//!
//! Host document model for the SvgKit fallback engine.
//! Uses html5ever for HTML parsing and constructs a traversable, mutable
//! document tree together with the CSSOM surfaces the engine rewrites.
//!
//! ## Design Goals
//!
//! 1. **Spec-compliant parsing**: html5ever implements the HTML5 parsing algorithm
//! 2. **Live queries**: tag-name lookups walk the current tree, never a cached list
//! 3. **Mutation support**: attribute and inline-style modification in place
//! 4. **Injectable host profile**: capability flags stand in for the APIs a
//!    legacy browser may or may not expose, so the engine is testable without
//!    a real browser

pub mod style;

pub use style::{selector_matches, Stylesheet, StylesheetOrigin};

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use svgkit_cssparser::{
    parse_declaration_list, parse_stylesheet, serialize_declarations, Declaration,
};
use thiserror::Error;
use tracing::{debug, warn};

/// The SVG element namespace.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// The HTML element namespace.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Errors that can occur in DOM operations.
#[derive(Error, Debug)]
pub enum DomError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Security error: {0}")]
    Security(String),
}

/// Unique identifier for a DOM node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Get the raw ID value.
    pub fn raw(&self) -> usize {
        self.0
    }
}

/// Document ready state, mirroring `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentReadyState {
    /// The document is still loading.
    #[default]
    Loading,
    /// The document has finished parsing, but sub-resources are still loading.
    Interactive,
    /// The document and all sub-resources have finished loading.
    Complete,
}

impl DocumentReadyState {
    /// Convert to the string form scripts observe.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentReadyState::Loading => "loading",
            DocumentReadyState::Interactive => "interactive",
            DocumentReadyState::Complete => "complete",
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, DocumentReadyState::Complete)
    }
}

/// Host API surface available to the engine.
///
/// Legacy browsers miss some of these; each flag models one probe-able API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// `document.createElementNS` exists.
    pub namespaced_elements: bool,
    /// SVG elements expose bounding-box geometry queries (`createSVGRect`).
    pub svg_geometry: bool,
    /// A computed-style accessor (`getComputedStyle`) exists.
    pub computed_style: bool,
}

impl HostCapabilities {
    /// A modern host: everything available.
    pub fn modern() -> Self {
        Self {
            namespaced_elements: true,
            svg_geometry: true,
            computed_style: true,
        }
    }

    /// An IE8-class host: no namespaced elements, no SVG geometry, and only
    /// the legacy current-style accessor.
    pub fn legacy() -> Self {
        Self {
            namespaced_elements: false,
            svg_geometry: false,
            computed_style: false,
        }
    }

    /// A host that cannot render SVG but does expose `getComputedStyle`.
    pub fn legacy_with_computed_style() -> Self {
        Self {
            computed_style: true,
            ..Self::legacy()
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::modern()
    }
}

/// Type of DOM node.
#[derive(Debug)]
pub enum NodeType {
    Document,
    DocumentType {
        name: String,
    },
    Element {
        tag_name: String,
        namespace: String,
        attributes: RefCell<HashMap<String, String>>,
    },
    Text(String),
    Comment(String),
}

/// A DOM node.
#[derive(Debug)]
pub struct Node {
    /// Unique ID for this node.
    pub id: NodeId,
    /// Node type and associated data.
    pub node_type: NodeType,
    /// Parent node (weak reference to avoid cycles).
    parent: RefCell<Option<Weak<Node>>>,
    /// Child nodes.
    children: RefCell<Vec<Rc<Node>>>,
}

impl Node {
    fn new(id: NodeId, node_type: NodeType) -> Rc<Self> {
        Rc::new(Self {
            id,
            node_type,
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
        })
    }

    /// Get the tag name for element nodes.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    /// Get the namespace for element nodes.
    pub fn namespace(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Element { namespace, .. } => Some(namespace),
            _ => None,
        }
    }

    /// Check if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self.node_type, NodeType::Element { .. })
    }

    /// Check if this element has the given tag name (ASCII case-insensitive).
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name()
            .map(|t| t.eq_ignore_ascii_case(tag))
            .unwrap_or(false)
    }

    /// Get an attribute value.
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        match &self.node_type {
            NodeType::Element { attributes, .. } => attributes.borrow().get(name).cloned(),
            _ => None,
        }
    }

    /// Set an attribute value. No-op on non-element nodes.
    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        if let NodeType::Element { attributes, .. } = &self.node_type {
            attributes.borrow_mut().insert(name.to_string(), value.into());
        }
    }

    /// Check whether an attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        match &self.node_type {
            NodeType::Element { attributes, .. } => attributes.borrow().contains_key(name),
            _ => false,
        }
    }

    /// Get the concatenated text content of this subtree.
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, result: &mut String) {
        match &self.node_type {
            NodeType::Text(text) => result.push_str(text),
            _ => {
                for child in self.children.borrow().iter() {
                    child.collect_text(result);
                }
            }
        }
    }

    /// Get parent node.
    pub fn parent(&self) -> Option<Rc<Node>> {
        self.parent.borrow().as_ref().and_then(|w| w.upgrade())
    }

    /// Get child nodes.
    pub fn children(&self) -> Vec<Rc<Node>> {
        self.children.borrow().clone()
    }

    /// Append a child node.
    pub fn append_child(self: &Rc<Self>, child: Rc<Node>) {
        *child.parent.borrow_mut() = Some(Rc::downgrade(self));
        self.children.borrow_mut().push(child);
    }

    /// Parse the inline `style` attribute into declarations.
    pub fn inline_style(&self) -> Vec<Declaration> {
        self.get_attribute("style")
            .map(|s| parse_declaration_list(&s))
            .unwrap_or_default()
    }

    /// Look up one property of the inline style (case-insensitive).
    pub fn inline_style_property(&self, property: &str) -> Option<String> {
        self.inline_style()
            .into_iter()
            .find(|d| d.property.eq_ignore_ascii_case(property))
            .map(|d| d.value)
    }

    /// Set one property of the inline style, rewriting the `style` attribute.
    pub fn set_inline_style_property(&self, property: &str, value: &str) {
        let mut decls = self.inline_style();
        match decls
            .iter_mut()
            .find(|d| d.property.eq_ignore_ascii_case(property))
        {
            Some(decl) => decl.value = value.to_string(),
            None => decls.push(Declaration::new(property, value)),
        }
        self.set_attribute("style", serialize_declarations(&decls));
    }
}

/// A complete document: node tree, stylesheet list, ready state, and the
/// capability flags of the host it stands in for.
pub struct Document {
    /// Root node of the document.
    root: Rc<Node>,
    /// Next node ID.
    next_id: Cell<usize>,
    /// Host API surface.
    capabilities: HostCapabilities,
    /// Ready state, mirroring `document.readyState`.
    ready_state: Cell<DocumentReadyState>,
    /// Attached stylesheets, in document order.
    stylesheets: RefCell<Vec<Rc<Stylesheet>>>,
}

impl Document {
    /// Create a new empty document with a modern host profile.
    pub fn new() -> Self {
        Self::with_capabilities(HostCapabilities::modern())
    }

    /// Create a new empty document with the given host profile.
    pub fn with_capabilities(capabilities: HostCapabilities) -> Self {
        Self {
            root: Node::new(NodeId(0), NodeType::Document),
            next_id: Cell::new(1),
            capabilities,
            ready_state: Cell::new(DocumentReadyState::Loading),
            stylesheets: RefCell::new(Vec::new()),
        }
    }

    /// Parse HTML into a document with a modern host profile.
    ///
    /// `<style>` element contents are parsed and attached as same-origin
    /// stylesheets; malformed blocks are skipped with a warning.
    pub fn parse_html(html: &str) -> Result<Self, DomError> {
        Self::parse_html_with(html, HostCapabilities::modern())
    }

    /// Parse HTML into a document with the given host profile.
    pub fn parse_html_with(html: &str, capabilities: HostCapabilities) -> Result<Self, DomError> {
        debug!(len = html.len(), "Parsing HTML");

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| DomError::ParseError(e.to_string()))?;

        let doc = Document::with_capabilities(capabilities);
        doc.convert_rcdom(&dom.document, &doc.root.clone());
        doc.attach_style_elements();

        Ok(doc)
    }

    fn convert_rcdom(&self, handle: &Handle, parent: &Rc<Node>) {
        for child_handle in handle.children.borrow().iter() {
            let node_type = match &child_handle.data {
                NodeData::Document => continue,
                NodeData::Doctype { name, .. } => NodeType::DocumentType {
                    name: name.to_string(),
                },
                NodeData::Element { name, attrs, .. } => {
                    let mut attributes = HashMap::new();
                    for attr in attrs.borrow().iter() {
                        attributes.insert(attr.name.local.to_string(), attr.value.to_string());
                    }
                    NodeType::Element {
                        tag_name: name.local.to_string(),
                        namespace: name.ns.to_string(),
                        attributes: RefCell::new(attributes),
                    }
                }
                NodeData::Text { contents } => NodeType::Text(contents.borrow().to_string()),
                NodeData::Comment { contents } => NodeType::Comment(contents.to_string()),
                NodeData::ProcessingInstruction { .. } => continue,
            };

            let node = Node::new(self.allocate_id(), node_type);
            parent.append_child(node.clone());
            self.convert_rcdom(child_handle, &node);
        }
    }

    fn attach_style_elements(&self) {
        for style_el in self.get_elements_by_tag_name("style") {
            let css = style_el.text_content();
            match parse_stylesheet(&css) {
                Ok(parsed) => self.add_stylesheet(Rc::new(Stylesheet::inline(parsed))),
                Err(e) => warn!(error = %e, "Skipping malformed style element"),
            }
        }
    }

    fn allocate_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId(id)
    }

    /// Host capability flags.
    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    /// Current ready state.
    pub fn ready_state(&self) -> DocumentReadyState {
        self.ready_state.get()
    }

    /// Advance the ready state. The state never moves backwards.
    pub fn set_ready_state(&self, state: DocumentReadyState) {
        if state as u8 >= self.ready_state.get() as u8 {
            self.ready_state.set(state);
        }
    }

    /// Get the document root.
    pub fn root(&self) -> &Rc<Node> {
        &self.root
    }

    /// Get the document element (`<html>`).
    pub fn document_element(&self) -> Option<Rc<Node>> {
        self.root
            .children()
            .into_iter()
            .find(|n| n.is_tag("html"))
    }

    /// Get the `<body>` element.
    pub fn body(&self) -> Option<Rc<Node>> {
        self.document_element()?
            .children()
            .into_iter()
            .find(|n| n.is_tag("body"))
    }

    /// Create a detached element in the HTML namespace.
    pub fn create_element(&self, tag_name: &str) -> Rc<Node> {
        Node::new(
            self.allocate_id(),
            NodeType::Element {
                tag_name: tag_name.to_ascii_lowercase(),
                namespace: HTML_NAMESPACE.to_string(),
                attributes: RefCell::new(HashMap::new()),
            },
        )
    }

    /// Create a detached element in the given namespace.
    ///
    /// Returns `None` when the host does not expose a namespace-aware
    /// constructor, matching hosts where `createElementNS` is undefined.
    pub fn create_element_ns(&self, namespace: &str, tag_name: &str) -> Option<Rc<Node>> {
        if !self.capabilities.namespaced_elements {
            return None;
        }
        Some(Node::new(
            self.allocate_id(),
            NodeType::Element {
                tag_name: tag_name.to_string(),
                namespace: namespace.to_string(),
                attributes: RefCell::new(HashMap::new()),
            },
        ))
    }

    /// Whether the given element exposes bounding-box geometry queries.
    ///
    /// Only SVG-namespaced elements on hosts with SVG geometry support do.
    pub fn element_supports_bbox(&self, node: &Node) -> bool {
        self.capabilities.svg_geometry && node.namespace() == Some(SVG_NAMESPACE)
    }

    /// Get elements by tag name, in document order.
    ///
    /// Walks the live tree on every call, so elements appended after parsing
    /// are always included.
    pub fn get_elements_by_tag_name(&self, tag_name: &str) -> Vec<Rc<Node>> {
        let mut out = Vec::new();
        self.traverse(|node| {
            if node.is_tag(tag_name) {
                out.push(node.clone());
            }
        });
        out
    }

    /// Get every element node, in document order.
    pub fn elements(&self) -> Vec<Rc<Node>> {
        let mut out = Vec::new();
        self.traverse(|node| {
            if node.is_element() {
                out.push(node.clone());
            }
        });
        out
    }

    /// Get the first element with the given `id` attribute.
    pub fn get_element_by_id(&self, id: &str) -> Option<Rc<Node>> {
        let mut found = None;
        self.traverse(|node| {
            if found.is_none() && node.get_attribute("id").as_deref() == Some(id) {
                found = Some(node.clone());
            }
        });
        found
    }

    /// Get elements carrying the given class.
    pub fn get_elements_by_class_name(&self, class_name: &str) -> Vec<Rc<Node>> {
        let mut out = Vec::new();
        self.traverse(|node| {
            let has_class = node
                .get_attribute("class")
                .map(|c| c.split_whitespace().any(|cls| cls == class_name))
                .unwrap_or(false);
            if has_class {
                out.push(node.clone());
            }
        });
        out
    }

    /// Traverse all nodes depth-first.
    pub fn traverse<F>(&self, mut callback: F)
    where
        F: FnMut(&Rc<Node>),
    {
        traverse_node(&self.root, &mut callback);
    }

    /// Attached stylesheets, in document order.
    pub fn stylesheets(&self) -> Vec<Rc<Stylesheet>> {
        self.stylesheets.borrow().clone()
    }

    /// Attach a stylesheet to the document.
    pub fn add_stylesheet(&self, sheet: Rc<Stylesheet>) {
        self.stylesheets.borrow_mut().push(sheet);
    }
}

fn traverse_node<F>(node: &Rc<Node>, callback: &mut F)
where
    F: FnMut(&Rc<Node>),
{
    callback(node);
    for child in node.children() {
        traverse_node(&child, callback);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
