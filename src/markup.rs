//! Comment-delimited block markup.
//!
//! Each block is written as an HTML comment holding the node's fields as a
//! JSON object. Blocks with children wrap them between an opening and a
//! closing marker; every other block is a single self-closing marker:
//!
//! ```text
//! <!-- wp:universal/element {"tagName":"ul","contentType":"blocks"} -->
//! <!-- wp:universal/element {"tagName":"li","contentType":"text","content":"One"} /-->
//! <!-- /wp:universal/element -->
//! ```
//!
//! Inside the JSON, `--`, `<`, `>`, `&` and escaped quotes are written as
//! unicode escapes so the payload can never terminate its comment.

use std::collections::BTreeMap;
use std::io;

use memchr::memmem;
use serde::Serialize;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter};

use crate::block::{AssignmentSpec, BlockNode, ConditionalSpec, ContentType, LoopSpec};
use crate::config::{DEFAULT_BLOCK_NAME, MarkupOptions};
use crate::error::{Error, Result};

const COMMENT_OPEN: &[u8] = b"<!--";
const COMMENT_CLOSE: &[u8] = b"-->";
const BLOCK_PREFIX: &str = "wp:";
const CLOSER_PREFIX: &str = "/wp:";

/// Serialize `blocks` using the default block name.
///
/// ```
/// use blockbridge::{BlockNode, MarkupOptions, serialize_blocks_to_markup};
///
/// let markup = serialize_blocks_to_markup(&[BlockNode::text("p", "a<b")], MarkupOptions::default())?;
/// assert_eq!(
///     markup,
///     r#"<!-- wp:universal/element {"tagName":"p","contentType":"text","content":"a\u003cb"} /-->"#
/// );
/// # Ok::<(), blockbridge::Error>(())
/// ```
pub fn serialize_blocks_to_markup(blocks: &[BlockNode], options: MarkupOptions) -> Result<String> {
    serialize_named(blocks, DEFAULT_BLOCK_NAME, options)
}

/// Parse markup written with the default block name.
pub fn parse_markup(text: &str, options: MarkupOptions) -> Result<Vec<BlockNode>> {
    parse_named(text, DEFAULT_BLOCK_NAME, options)
}

/// Serialize `blocks` with `block_name` in every marker.
pub fn serialize_named(blocks: &[BlockNode], block_name: &str, options: MarkupOptions) -> Result<String> {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_block(block, block_name, options, &mut out)?;
    }
    Ok(out)
}

fn write_block(node: &BlockNode, block_name: &str, options: MarkupOptions, out: &mut String) -> Result<()> {
    node.validate_shallow()?;

    let json = encode_attrs(node, options)?;
    out.push_str("<!-- ");
    out.push_str(BLOCK_PREFIX);
    out.push_str(block_name);
    out.push(' ');
    out.push_str(&json);

    if node.content_type != ContentType::Blocks {
        out.push_str(" /-->");
        return Ok(());
    }

    out.push_str(" -->");
    for child in &node.children {
        out.push('\n');
        write_block(child, block_name, options, out)?;
    }
    out.push_str("\n<!-- ");
    out.push_str(CLOSER_PREFIX);
    out.push_str(block_name);
    out.push_str(" -->");
    Ok(())
}

/// A node's fields minus its children, in the order they are written.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockAttrs<'a> {
    tag_name: &'a str,
    content_type: ContentType,
    #[serde(skip_serializing_if = "str::is_empty")]
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    class_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    block_identity: Option<&'a str>,
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    loop_spec: Option<&'a LoopSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conditional: Option<&'a ConditionalSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignment: Option<&'a AssignmentSpec>,
    #[serde(skip_serializing_if = "is_empty_map")]
    attributes: &'a BTreeMap<String, String>,
}

fn is_empty_map(map: &&BTreeMap<String, String>) -> bool {
    map.is_empty()
}

impl<'a> From<&'a BlockNode> for BlockAttrs<'a> {
    fn from(node: &'a BlockNode) -> Self {
        Self {
            tag_name: &node.tag,
            content_type: node.content_type,
            content: &node.content,
            class_name: node.class_name.as_deref(),
            block_identity: node.block_identity.as_deref(),
            loop_spec: node.loop_spec.as_ref(),
            conditional: node.conditional.as_ref(),
            assignment: node.assignment.as_ref(),
            attributes: &node.attributes,
        }
    }
}

fn encode_attrs(node: &BlockNode, options: MarkupOptions) -> Result<String> {
    let mut buf = Vec::with_capacity(64 + node.content.len());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, CommentSafeFormatter);
    BlockAttrs::from(node).serialize(&mut serializer)?;

    let json = String::from_utf8(buf).map_err(|e| Error::markup(0, e.to_string()))?;
    if options.double_escape {
        Ok(json.replace('\\', "\\\\"))
    } else {
        Ok(json)
    }
}

/// Compact JSON whose strings never contain `--`, `<`, `>`, `&` or `\"`.
struct CommentSafeFormatter;

impl Formatter for CommentSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let bytes = fragment.as_bytes();
        let mut start = 0;
        let mut i = 0;
        while i < bytes.len() {
            let escape: &[u8] = match bytes[i] {
                b'<' => b"\\u003c",
                b'>' => b"\\u003e",
                b'&' => b"\\u0026",
                b'-' if bytes.get(i + 1) == Some(&b'-') => b"\\u002d\\u002d",
                _ => {
                    i += 1;
                    continue;
                }
            };
            writer.write_all(&bytes[start..i])?;
            writer.write_all(escape)?;
            i += if bytes[i] == b'-' { 2 } else { 1 };
            start = i;
        }
        writer.write_all(&bytes[start..])
    }

    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match char_escape {
            CharEscape::Quote => writer.write_all(b"\\u0022"),
            other => CompactFormatter.write_char_escape(writer, other),
        }
    }
}

/// Parse markup whose markers carry `block_name`.
///
/// Whitespace and ordinary comments between markers are skipped. Any other
/// text, a foreign block name, an unbalanced marker or invalid JSON is an
/// error.
pub fn parse_named(text: &str, block_name: &str, options: MarkupOptions) -> Result<Vec<BlockNode>> {
    let open_finder = memmem::Finder::new(COMMENT_OPEN);
    let close_finder = memmem::Finder::new(COMMENT_CLOSE);
    let bytes = text.as_bytes();

    let mut roots = Vec::new();
    let mut stack: Vec<(BlockNode, usize)> = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(rel_start) = open_finder.find(&bytes[pos..]) else {
            check_blank(text, pos, bytes.len())?;
            break;
        };
        let start = pos + rel_start;
        check_blank(text, pos, start)?;

        let body_start = start + COMMENT_OPEN.len();
        let body_end = close_finder
            .find(&bytes[body_start..])
            .map(|rel| body_start + rel)
            .ok_or_else(|| Error::markup(start, "unterminated comment"))?;
        pos = body_end + COMMENT_CLOSE.len();

        let body = text[body_start..body_end].trim();
        match parse_marker(body, start)? {
            Marker::Comment => {
                log::debug!("skipping comment at byte {start}");
            }
            Marker::Open { name, json, self_closing } => {
                check_name(name, block_name, start)?;
                let node = decode_attrs(json, options, start)?;
                if self_closing {
                    finish(node, start, &mut stack, &mut roots)?;
                } else {
                    stack.push((node, start));
                }
            }
            Marker::Close { name } => {
                check_name(name, block_name, start)?;
                let (node, _) = stack
                    .pop()
                    .ok_or_else(|| Error::markup(start, "closing marker without an opening one"))?;
                finish(node, start, &mut stack, &mut roots)?;
            }
        }
    }

    if let Some((node, offset)) = stack.pop() {
        return Err(Error::markup(
            offset,
            format!("<{}> block is never closed", node.tag),
        ));
    }
    Ok(roots)
}

enum Marker<'a> {
    Comment,
    Open {
        name: &'a str,
        json: &'a str,
        self_closing: bool,
    },
    Close {
        name: &'a str,
    },
}

fn parse_marker(body: &str, offset: usize) -> Result<Marker<'_>> {
    if let Some(rest) = body.strip_prefix(CLOSER_PREFIX) {
        return Ok(Marker::Close { name: rest.trim() });
    }
    let Some(rest) = body.strip_prefix(BLOCK_PREFIX) else {
        return Ok(Marker::Comment);
    };

    let (rest, self_closing) = match rest.strip_suffix('/') {
        Some(rest) => (rest.trim_end(), true),
        None => (rest, false),
    };
    let (name, json) = match rest.find(|c: char| c.is_ascii_whitespace()) {
        Some(split) => (&rest[..split], rest[split..].trim()),
        None => (rest, ""),
    };
    if json.is_empty() {
        return Err(Error::markup(offset, format!("block {name:?} has no attributes")));
    }
    Ok(Marker::Open {
        name,
        json,
        self_closing,
    })
}

fn check_blank(text: &str, from: usize, to: usize) -> Result<()> {
    let gap = &text[from..to];
    match gap.find(|c: char| !c.is_ascii_whitespace()) {
        Some(rel) => Err(Error::markup(from + rel, "unexpected text between block markers")),
        None => Ok(()),
    }
}

fn check_name(name: &str, expected: &str, offset: usize) -> Result<()> {
    if name == expected {
        Ok(())
    } else {
        Err(Error::markup(offset, format!("unknown block name {name:?}")))
    }
}

fn decode_attrs(json: &str, options: MarkupOptions, offset: usize) -> Result<BlockNode> {
    let node: BlockNode = if options.double_escape {
        serde_json::from_str(&json.replace("\\\\", "\\"))?
    } else {
        serde_json::from_str(json)?
    };
    if !node.children.is_empty() {
        return Err(Error::markup(
            offset,
            "children belong between block markers, not in the attributes",
        ));
    }
    Ok(node)
}

/// Attach a completed node to its parent (or the roots).
fn finish(
    node: BlockNode,
    offset: usize,
    stack: &mut [(BlockNode, usize)],
    roots: &mut Vec<BlockNode>,
) -> Result<()> {
    node.validate_shallow().map_err(|e| match e {
        Error::MalformedNode { tag, reason } => Error::markup(offset, format!("<{tag}>: {reason}")),
        other => other,
    })?;
    match stack.last_mut() {
        Some((parent, _)) => {
            if parent.content_type != ContentType::Blocks {
                return Err(Error::markup(
                    offset,
                    format!("<{}> block cannot contain inner blocks", parent.tag),
                ));
            }
            parent.children.push(node);
        }
        None => roots.push(node),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_tree() -> Vec<BlockNode> {
        vec![
            BlockNode::element(
                "ul",
                vec![
                    BlockNode::text("li", "One -- \"two\" & <three>")
                        .with_conditional(ConditionalSpec::new("x > 0")),
                    BlockNode::html("li", r#"<a href="/x">link</a> C:\path"#),
                ],
            )
            .with_class("list")
            .with_loop(LoopSpec::new("posts", "post")),
            BlockNode::empty("hr").with_identity("Divider"),
        ]
    }

    #[test]
    fn test_markup_shape() {
        let markup = serialize_blocks_to_markup(
            &[BlockNode::element("div", vec![BlockNode::empty("br")])],
            MarkupOptions::default(),
        )
        .unwrap();

        assert_eq!(
            markup,
            concat!(
                "<!-- wp:universal/element {\"tagName\":\"div\",\"contentType\":\"blocks\"} -->\n",
                "<!-- wp:universal/element {\"tagName\":\"br\",\"contentType\":\"empty\"} /-->\n",
                "<!-- /wp:universal/element -->",
            )
        );
    }

    #[test]
    fn test_json_escapes() {
        let node = BlockNode::text("p", "a--b <c> & \"d\"");
        let markup = serialize_blocks_to_markup(&[node], MarkupOptions::default()).unwrap();
        assert!(markup.contains(
            r#""content":"a\u002d\u002db \u003cc\u003e \u0026 \u0022d\u0022""#
        ));
    }

    #[test]
    fn test_payload_never_closes_comment() {
        let node = BlockNode::text("p", "--> <!-- ---");
        let markup = serialize_blocks_to_markup(&[node], MarkupOptions::default()).unwrap();
        let inner = &markup["<!-- ".len()..markup.len() - " /-->".len()];
        assert!(!inner.contains("--"));
        assert!(!inner.contains('>'));
    }

    #[test]
    fn test_double_escape() {
        let node = BlockNode::text("p", "<x> C:\\dir");
        let markup = serialize_blocks_to_markup(&[node], MarkupOptions::double_escaped()).unwrap();
        assert!(markup.contains(r#""content":"\\u003cx\\u003e C:\\\\dir""#));
    }

    #[test]
    fn test_round_trip_both_modes() {
        let tree = sample_tree();
        for options in [MarkupOptions::default(), MarkupOptions::double_escaped()] {
            let markup = serialize_blocks_to_markup(&tree, options).unwrap();
            assert_eq!(parse_markup(&markup, options).unwrap(), tree);
        }
    }

    #[test]
    fn test_parse_skips_whitespace_and_comments() {
        let text = "\n  <!-- a note -->\n<!-- wp:universal/element {\"tagName\":\"p\",\"contentType\":\"text\",\"content\":\"x\"} /-->\n\n";
        let blocks = parse_markup(text, MarkupOptions::default()).unwrap();
        assert_eq!(blocks, vec![BlockNode::text("p", "x")]);
    }

    #[test]
    fn test_parse_rejects_stray_text() {
        let err = parse_markup("hello", MarkupOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Markup { offset: 0, .. }));
    }

    #[test]
    fn test_parse_rejects_foreign_block_name() {
        let text = r#"<!-- wp:core/paragraph {"tagName":"p","contentType":"empty"} /-->"#;
        let err = parse_markup(text, MarkupOptions::default()).unwrap_err();
        assert!(err.to_string().contains("core/paragraph"));
    }

    #[test]
    fn test_parse_rejects_unbalanced_markers() {
        let open_only = r#"<!-- wp:universal/element {"tagName":"div","contentType":"blocks"} -->"#;
        assert!(matches!(
            parse_markup(open_only, MarkupOptions::default()),
            Err(Error::Markup { offset: 0, .. })
        ));

        let close_only = "<!-- /wp:universal/element -->";
        assert!(parse_markup(close_only, MarkupOptions::default()).is_err());
    }

    #[test]
    fn test_parse_rejects_children_under_text_block() {
        let text = concat!(
            r#"<!-- wp:universal/element {"tagName":"p","contentType":"text","content":"x"} -->"#,
            r#"<!-- wp:universal/element {"tagName":"br","contentType":"empty"} /-->"#,
            "<!-- /wp:universal/element -->",
        );
        assert!(parse_markup(text, MarkupOptions::default()).is_err());
    }

    #[test]
    fn test_parse_invalid_json() {
        let text = "<!-- wp:universal/element {not json} /-->";
        let err = parse_markup(text, MarkupOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_custom_block_name() {
        let tree = vec![BlockNode::text("h1", "Hi")];
        let markup = serialize_named(&tree, "acme/html", MarkupOptions::default()).unwrap();
        assert!(markup.starts_with("<!-- wp:acme/html "));
        assert_eq!(
            parse_named(&markup, "acme/html", MarkupOptions::default()).unwrap(),
            tree
        );
    }
}
