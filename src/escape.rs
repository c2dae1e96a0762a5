//! Pure HTML escaping utilities.

use std::borrow::Cow;

/// Escape an attribute value: `&`, `"`, `'`, `<` and `>` become entities.
///
/// ```
/// use blockbridge::escape::escape_attr;
///
/// assert_eq!(escape_attr(r#"a<b>&"c"'d'"#), "a&lt;b&gt;&amp;&quot;c&quot;&#39;d&#39;");
/// ```
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '\'', '<', '>']) {
        return Cow::Borrowed(value);
    }

    let mut result = String::with_capacity(value.len() + value.len() / 4);
    for c in value.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape text content: `&`, `<`, `>` and non-breaking spaces.
///
/// ```
/// use blockbridge::escape::escape_text;
///
/// assert_eq!(escape_text("1 < 2 & 3"), "1 &lt; 2 &amp; 3");
/// ```
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '\u{a0}']) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Strip every character outside `[A-Za-z0-9_-]` from an attribute name.
///
/// Lossy: `xlink:href` becomes `xlinkhref` and `@click` becomes `click`.
/// An empty result means the attribute cannot be written at all.
///
/// ```
/// use blockbridge::escape::sanitize_attr_name;
///
/// assert_eq!(sanitize_attr_name("data-id"), "data-id");
/// assert_eq!(sanitize_attr_name("on\"click"), "onclick");
/// ```
pub fn sanitize_attr_name(name: &str) -> Cow<'_, str> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
    if name.chars().all(allowed) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name.chars().filter(|&c| allowed(c)).collect())
    }
}
