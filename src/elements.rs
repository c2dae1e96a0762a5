//! Element classification tables.
//!
//! Both the HTML walker and the serializer read these lists; keeping one copy
//! is what makes void elements survive a round trip.

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "img", "br", "hr", "input", "meta", "link", "area", "base", "col", "embed", "source",
    "track", "wbr",
];

/// Elements whose content is always kept as raw markup.
pub const VERBATIM_ELEMENTS: &[&str] = &[
    "code", "pre", "script", "style", "svg", "math", "textarea", "select",
];

/// Elements whose text is never whitespace-normalized.
pub const PREFORMATTED_ELEMENTS: &[&str] =
    &["pre", "textarea", "listing", "code", "script", "style"];

/// Elements whose text content is not entity-escaped when serialized.
///
/// `noscript` is raw text because the parser runs with scripting enabled.
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// Elements where the HTML parser drops a newline directly after the start tag.
pub const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

pub fn is_verbatim_element(tag: &str) -> bool {
    VERBATIM_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

pub fn is_preformatted_element(tag: &str) -> bool {
    PREFORMATTED_ELEMENTS
        .iter()
        .any(|v| v.eq_ignore_ascii_case(tag))
}

pub fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

pub fn drops_leading_newline(tag: &str) -> bool {
    LEADING_NEWLINE_ELEMENTS
        .iter()
        .any(|v| v.eq_ignore_ascii_case(tag))
}
