//! Content-type classification.
//!
//! A structural editor needs either pure structure or pure content in a
//! block. Elements that mix the two fall back to raw `html`.

use crate::block::ContentType;
use crate::dom::{ElementRef, NodeRef};
use crate::elements::{is_raw_text_element, is_verbatim_element, is_void_element};
use crate::util::is_blank;

/// Decide how an element's children are represented.
///
/// Custom tags never get here; their handler owns the whole sub-tree.
///
/// ```
/// use blockbridge::ContentType;
/// use blockbridge::classify::classify;
/// use blockbridge::dom::Fragment;
///
/// let fragment = Fragment::parse("<ul><li>a</li></ul><p>Hi <b>there</b></p>");
/// let kinds: Vec<_> = fragment.elements().map(classify).collect();
/// assert_eq!(kinds, [ContentType::Blocks, ContentType::Html]);
/// ```
pub fn classify(element: ElementRef<'_>) -> ContentType {
    #[cfg(test)]
    tests::record(element.tag());

    let tag = element.tag();
    if is_void_element(tag) {
        return ContentType::Empty;
    }
    // Raw text is never entity-decoded, so it can only travel as markup.
    if is_verbatim_element(tag) || is_raw_text_element(tag) {
        return ContentType::Html;
    }

    let mut has_elements = false;
    let mut has_text = false;
    for child in element.children() {
        match child {
            NodeRef::Element(_) => has_elements = true,
            NodeRef::Text(text) if !is_blank(text) => has_text = true,
            NodeRef::Text(_) | NodeRef::Comment(_) => {}
        }
    }

    let content_type = match (has_elements, has_text) {
        (false, false) => ContentType::Empty,
        (true, false) => ContentType::Blocks,
        (false, true) => ContentType::Text,
        (true, true) => ContentType::Html,
    };
    log::trace!("<{tag}> classified as {}", content_type.as_str());
    content_type
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::dom::Fragment;

    thread_local! {
        static CLASSIFIED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    pub(crate) fn record(tag: &str) {
        CLASSIFIED.with(|c| c.borrow_mut().push(tag.to_string()));
    }

    /// Tags classified on this thread since the last call.
    pub(crate) fn take_classified() -> Vec<String> {
        CLASSIFIED.with(|c| std::mem::take(&mut *c.borrow_mut()))
    }

    fn classify_first(html: &str) -> ContentType {
        let fragment = Fragment::parse(html);
        classify(fragment.elements().next().unwrap())
    }

    #[test]
    fn test_no_children_is_empty() {
        assert_eq!(classify_first("<div></div>"), ContentType::Empty);
        assert_eq!(classify_first("<div>   \n </div>"), ContentType::Empty);
        assert_eq!(classify_first("<div><!-- c --></div>"), ContentType::Empty);
    }

    #[test]
    fn test_only_elements_is_blocks() {
        assert_eq!(
            classify_first("<div>\n  <p>a</p>\n  <p>b</p>\n</div>"),
            ContentType::Blocks
        );
    }

    #[test]
    fn test_only_text_is_text() {
        assert_eq!(classify_first("<h1> Title </h1>"), ContentType::Text);
    }

    #[test]
    fn test_mixed_is_html() {
        assert_eq!(
            classify_first("<p>Read <a href=\"#\">more</a></p>"),
            ContentType::Html
        );
    }

    #[test]
    fn test_verbatim_tags_are_always_html() {
        assert_eq!(classify_first("<code>x</code>"), ContentType::Html);
        assert_eq!(classify_first("<pre></pre>"), ContentType::Html);
        assert_eq!(
            classify_first("<svg><circle r=\"1\"/></svg>"),
            ContentType::Html
        );
        assert_eq!(classify_first("<script>1</script>"), ContentType::Html);
    }

    #[test]
    fn test_raw_text_tags_are_html() {
        assert_eq!(classify_first("<xmp>a &amp; b</xmp>"), ContentType::Html);
        assert_eq!(classify_first("<noscript><img src=x></noscript>"), ContentType::Html);
        assert_eq!(classify_first("<iframe>a<b</iframe>"), ContentType::Html);
    }

    #[test]
    fn test_void_tags_are_empty() {
        for tag in crate::elements::VOID_ELEMENTS {
            let fragment = Fragment::parse(&format!("<{tag}>"));
            if let Some(element) = fragment.elements().next() {
                assert_eq!(classify(element), ContentType::Empty, "<{tag}>");
            }
        }
    }
}
