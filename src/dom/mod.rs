//! HTML fragment parsing into an arena DOM.
//!
//! html5ever does the tokenizing and tree construction, so unknown and custom
//! tag names (`<x-card>`, `<loop-item>`) come through untouched. Fragments are
//! parsed in a `<body>` context.
//!
//! ```
//! use blockbridge::dom::Fragment;
//!
//! let fragment = Fragment::parse("<section><h2>Title</h2></section>");
//! let section = fragment.elements().next().unwrap();
//! assert_eq!(section.tag(), "section");
//! assert_eq!(section.child_elements().count(), 1);
//! ```

mod arena;
mod element_ref;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, qualified_name};
pub use element_ref::{ElementRef, NodeRef};
pub use serialize::{WhitespaceMode, serialize_children};
pub use tree_sink::ArenaSink;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// A parsed HTML fragment.
#[derive(Debug)]
pub struct Fragment {
    dom: ArenaDom,
    root: ArenaNodeId,
}

impl Fragment {
    /// Parse an HTML fragment. Never fails; malformed markup is repaired the
    /// way browsers repair it.
    pub fn parse(html: &str) -> Self {
        // Wrap in a minimal document so the fragment lands in <body>.
        let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");

        let sink = ArenaSink::new();
        let dom = parse_document(sink, ParseOpts::default())
            .from_utf8()
            .one(wrapped.as_bytes())
            .into_dom();

        let root = dom.find_by_tag("body").unwrap_or(dom.document());
        Self { dom, root }
    }

    pub fn dom(&self) -> &ArenaDom {
        &self.dom
    }

    /// The `<body>` element holding the fragment's top-level nodes.
    pub fn root(&self) -> ElementRef<'_> {
        ElementRef::new(&self.dom, self.root)
    }

    /// Top-level nodes of the fragment.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.root().children()
    }

    /// Top-level elements of the fragment.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.root().child_elements()
    }
}
