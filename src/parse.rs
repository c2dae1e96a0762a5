//! HTML → block tree walker.

use crate::block::{BlockNode, ContentType};
use crate::classify::classify;
use crate::converter::Converter;
use crate::dom::{ElementRef, Fragment, NodeRef, WhitespaceMode};
use crate::elements::is_preformatted_element;
use crate::error::Result;
use crate::util::{is_blank, normalize_text};

/// Convert every top-level element of `html`.
///
/// Top-level text and comments have no block to live in and are dropped.
pub(crate) fn parse_fragment(converter: &Converter, html: &str) -> Result<Vec<BlockNode>> {
    let fragment = Fragment::parse(html);

    let mut blocks = Vec::new();
    for node in fragment.nodes() {
        match node {
            NodeRef::Element(element) => blocks.push(convert_element(converter, element)?),
            NodeRef::Text(text) if !is_blank(text) => {
                log::debug!("dropping top-level text {:?}", text.trim());
            }
            NodeRef::Text(_) | NodeRef::Comment(_) => {}
        }
    }
    Ok(blocks)
}

/// Convert one element, handing it to its custom handler when one is registered.
pub(crate) fn convert_element(converter: &Converter, element: ElementRef<'_>) -> Result<BlockNode> {
    if let Some(handler) = converter.registry().get(element.tag()) {
        log::debug!("<{}> handled by custom handler", element.tag());
        return handler.to_block(element, converter);
    }
    convert_default(converter, element)
}

/// The generic conversion: classify, fill content, split attributes.
pub(crate) fn convert_default(converter: &Converter, element: ElementRef<'_>) -> Result<BlockNode> {
    let tag = element.tag();
    let content_type = classify(element);
    let mut node = BlockNode::new(tag, content_type);

    match content_type {
        ContentType::Blocks => {
            node.children = element
                .child_elements()
                .map(|child| convert_element(converter, child))
                .collect::<Result<_>>()?;
        }
        ContentType::Text => {
            let text = element.text_content();
            node.content = if is_preformatted_element(tag) {
                text
            } else {
                normalize_text(&text)
            };
        }
        ContentType::Html => node.content = html_content(element),
        ContentType::Empty => {}
    }

    converter.extract_attributes(element).apply_to(&mut node);
    Ok(node)
}

/// Inner markup for `html` content. Preformatted elements are kept byte-exact;
/// everything else has whitespace runs collapsed and the ends trimmed.
fn html_content(element: ElementRef<'_>) -> String {
    if is_preformatted_element(element.tag()) {
        return element.inner_html_with(WhitespaceMode::Preserve);
    }
    let html = element.inner_html_with(WhitespaceMode::Collapse);
    let trimmed = html.trim_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.len() == html.len() {
        html
    } else {
        trimmed.to_string()
    }
}
