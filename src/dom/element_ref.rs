//! Read-only views over arena nodes.
//!
//! These are what custom tag handlers see: cheap `Copy` handles that borrow
//! the DOM, with no way to mutate it.

use std::fmt;

use html5ever::ns;

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId, qualified_name};
use super::serialize::{WhitespaceMode, serialize_children, serialize_node};

/// A borrowed element in a parsed fragment.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    dom: &'a ArenaDom,
    id: ArenaNodeId,
}

/// Any child node of an element.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
    Comment(&'a str),
}

impl<'a> NodeRef<'a> {
    fn new(dom: &'a ArenaDom, id: ArenaNodeId) -> Option<Self> {
        match &dom.get(id)?.data {
            ArenaNodeData::Element { .. } => Some(NodeRef::Element(ElementRef::new(dom, id))),
            ArenaNodeData::Text(text) => Some(NodeRef::Text(text)),
            ArenaNodeData::Comment(text) => Some(NodeRef::Comment(text)),
            ArenaNodeData::Document | ArenaNodeData::Doctype => None,
        }
    }

    pub fn as_element(&self) -> Option<ElementRef<'a>> {
        match self {
            NodeRef::Element(element) => Some(*element),
            _ => None,
        }
    }
}

impl<'a> ElementRef<'a> {
    pub(crate) fn new(dom: &'a ArenaDom, id: ArenaNodeId) -> Self {
        Self { dom, id }
    }

    pub fn id(&self) -> ArenaNodeId {
        self.id
    }

    pub fn dom(&self) -> &'a ArenaDom {
        self.dom
    }

    /// The element's tag name as the parser produced it.
    pub fn tag(&self) -> &'a str {
        self.dom
            .element_name(self.id)
            .map(|name| name.as_ref())
            .unwrap_or("")
    }

    /// True for elements in the SVG or MathML namespaces.
    pub fn is_foreign(&self) -> bool {
        self.dom
            .element_namespace(self.id)
            .is_some_and(|ns| *ns != ns!(html))
    }

    /// Attribute value by case-insensitive name.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.dom.get_attr(self.id, name)
    }

    /// All attributes as `(name, value)` pairs in source order.
    pub fn attributes(self) -> impl Iterator<Item = (String, &'a str)> + 'a {
        self.dom
            .attrs(self.id)
            .iter()
            .map(|a| (qualified_name(&a.name).into_owned(), a.value.as_str()))
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let dom = self.dom;
        dom.children(self.id).filter_map(move |id| NodeRef::new(dom, id))
    }

    pub fn child_elements(self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.children().filter_map(|node| node.as_element())
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(*self, &mut out);
        out
    }

    /// Markup of the element's children, byte-for-byte as re-serialized.
    pub fn inner_html(&self) -> String {
        serialize_children(self.dom, self.id, WhitespaceMode::Preserve)
    }

    /// Markup of the element's children with the whitespace policy applied.
    pub fn inner_html_with(&self, mode: WhitespaceMode) -> String {
        serialize_children(self.dom, self.id, mode)
    }

    /// Markup of the element itself.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        serialize_node(self.dom, self.id, WhitespaceMode::Preserve, &mut out);
        out
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child {
            NodeRef::Text(text) => out.push_str(text),
            NodeRef::Element(child) => collect_text(child, out),
            NodeRef::Comment(_) => {}
        }
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("tag", &self.tag())
            .finish()
    }
}
