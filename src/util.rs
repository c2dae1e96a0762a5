//! Text helpers: input decoding and the whitespace policy.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<meta charset="...">`)
/// 3. Falls back to Windows-1252 (common in legacy exports, superset of ISO-8859-1)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
///
/// # Examples
///
/// ```
/// use blockbridge::util::decode_text;
///
/// assert_eq!(decode_text("<p>Hi</p>".as_bytes(), None), "<p>Hi</p>");
/// // 0xE9 is 'é' in Windows-1252
/// assert_eq!(decode_text(b"caf\xE9", None), "café");
/// ```
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the charset label from a `<meta charset="...">` in the first 1024 bytes.
///
/// ```
/// use blockbridge::util::extract_meta_charset;
///
/// assert_eq!(extract_meta_charset(b"<meta charset=\"iso-8859-2\"><p>x</p>"), Some("iso-8859-2"));
/// assert_eq!(extract_meta_charset(b"<p>no meta</p>"), None);
/// ```
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(1024);
    let prefix = &bytes[..check_len];

    let enc_pos = prefix
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let after_enc = &prefix[enc_pos + 8..];

    let (value_start, terminator): (usize, &[u8]) = match after_enc.first()? {
        b'"' => (1, b"\""),
        b'\'' => (1, b"'"),
        _ => (0, b"\"'; >/"),
    };

    let value_end = after_enc[value_start..]
        .iter()
        .position(|b| terminator.contains(b))?
        + value_start;

    std::str::from_utf8(&after_enc[value_start..value_end])
        .ok()
        .filter(|label| !label.is_empty())
}

/// Collapse each run of ASCII whitespace into a single space. Ends are kept.
///
/// ```
/// use blockbridge::util::collapse_whitespace_runs;
///
/// assert_eq!(collapse_whitespace_runs("  a \n\t b "), " a b ");
/// ```
pub fn collapse_whitespace_runs(text: &str) -> Cow<'_, str> {
    let needs_work = text
        .as_bytes()
        .windows(2)
        .any(|w| w[0].is_ascii_whitespace() && w[1].is_ascii_whitespace())
        || text.bytes().any(|b| b.is_ascii_whitespace() && b != b' ');
    if !needs_work {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    Cow::Owned(out)
}

/// Collapse whitespace runs and trim both ends: the policy for `text` content.
pub fn normalize_text(text: &str) -> String {
    collapse_whitespace_runs(text)
        .trim_matches(|c: char| c.is_ascii_whitespace())
        .to_string()
}

/// True when `text` has no characters other than ASCII whitespace.
pub fn is_blank(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_whitespace())
}
