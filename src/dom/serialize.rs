//! Re-serialize DOM sub-trees to HTML.
//!
//! Used for `html` content: verbatim elements and mixed text/element content.

use html5ever::ns;

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId, qualified_name};
use crate::elements::{
    drops_leading_newline, is_preformatted_element, is_raw_text_element, is_void_element,
};
use crate::escape::{escape_attr, escape_text};
use crate::util::collapse_whitespace_runs;

/// Whitespace handling for serialized text nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitespaceMode {
    /// Emit text exactly as parsed.
    Preserve,
    /// Collapse runs of ASCII whitespace to one space, except under
    /// preformatted elements.
    Collapse,
}

/// Serialize the children of `parent`.
pub fn serialize_children(dom: &ArenaDom, parent: ArenaNodeId, mode: WhitespaceMode) -> String {
    let raw_text = dom
        .element_name(parent)
        .is_some_and(|name| is_raw_text_element(name));

    let mut out = String::new();
    for child in dom.children(parent) {
        write_node(dom, child, mode, raw_text, &mut out);
    }
    out
}

/// Serialize `id` itself, including its start and end tags.
pub(crate) fn serialize_node(
    dom: &ArenaDom,
    id: ArenaNodeId,
    mode: WhitespaceMode,
    out: &mut String,
) {
    write_node(dom, id, mode, false, out);
}

fn write_node(
    dom: &ArenaDom,
    id: ArenaNodeId,
    mode: WhitespaceMode,
    raw_text: bool,
    out: &mut String,
) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        ArenaNodeData::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else if mode == WhitespaceMode::Collapse {
                out.push_str(&escape_text(&collapse_whitespace_runs(text)));
            } else {
                out.push_str(&escape_text(text));
            }
        }
        ArenaNodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        ArenaNodeData::Element { name, attrs } => {
            let tag = qualified_name(name);

            out.push('<');
            out.push_str(&tag);
            for attr in attrs {
                out.push(' ');
                out.push_str(&attr.qualified_name());
                out.push_str("=\"");
                out.push_str(&escape_attr(&attr.value));
                out.push('"');
            }

            let is_html = name.ns == ns!(html);
            let has_children = node.first_child.is_some();

            if is_html && is_void_element(&tag) {
                out.push_str(" />");
                return;
            }
            if !is_html && !has_children {
                // Foreign content honours the self-closing flag.
                out.push_str(" />");
                return;
            }
            out.push('>');

            let child_mode = if is_preformatted_element(&tag) {
                WhitespaceMode::Preserve
            } else {
                mode
            };
            let child_raw = is_html && is_raw_text_element(&tag);
            if is_html
                && drops_leading_newline(&tag)
                && let Some(ArenaNodeData::Text(text)) = dom.get(node.first_child).map(|n| &n.data)
                && text.starts_with('\n')
            {
                out.push('\n');
            }
            for child in dom.children(id) {
                write_node(dom, child, child_mode, child_raw, out);
            }

            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
        ArenaNodeData::Document | ArenaNodeData::Doctype => {
            for child in dom.children(id) {
                write_node(dom, child, mode, false, out);
            }
        }
    }
}
