//! Block tree → HTML serializer.

use std::fmt::Write as _;

use crate::attributes::{
    CONDITIONAL_EXPRESSION_ATTR, CONDITIONAL_VISIBILITY_ATTR, LOOP_SOURCE_ATTR,
    LOOP_VARIABLE_ATTR, SET_EXPRESSION_ATTR, SET_VARIABLE_ATTR, is_control_attribute,
};
use crate::block::{BlockNode, ContentType};
use crate::config::{ConvertConfig, RenderOptions};
use crate::converter::Converter;
use crate::elements::{drops_leading_newline, is_raw_text_element};
use crate::error::Result;
use crate::escape::{escape_attr, escape_text, sanitize_attr_name};

/// Render `node`, dispatching to its custom handler when one is registered.
pub(crate) fn write_node(converter: &Converter, node: &BlockNode, out: &mut String) -> Result<()> {
    if let Some(handler) = converter.registry().get(&node.tag) {
        log::debug!("<{}> rendered by custom handler", node.tag);
        out.push_str(&handler.to_html(node, converter)?);
        return Ok(());
    }
    write_default(converter, node, out)
}

/// Render `node` with the generic rules. Children go back through [`write_node`].
pub(crate) fn write_default(converter: &Converter, node: &BlockNode, out: &mut String) -> Result<()> {
    node.validate_shallow()?;

    let config = converter.config();
    let options = config.render_options();
    let tag = node.tag.as_str();

    out.push('<');
    out.push_str(tag);
    write_attributes(node, config, out);

    if node.is_void() {
        out.push_str(" />");
        return Ok(());
    }

    match node.content_type {
        ContentType::Empty if options.self_close_empty => {
            out.push_str(" />");
            return Ok(());
        }
        ContentType::Empty => out.push('>'),
        ContentType::Blocks => {
            out.push('>');
            for child in &node.children {
                write_node(converter, child, out)?;
            }
        }
        ContentType::Text => {
            out.push('>');
            write_leading_newline(tag, &node.content, out);
            if is_raw_text_element(tag) {
                out.push_str(&node.content);
            } else {
                out.push_str(&escape_text(&node.content));
            }
        }
        ContentType::Html => {
            out.push('>');
            write_leading_newline(tag, &node.content, out);
            out.push_str(&node.content);
        }
    }

    let _ = write!(out, "</{tag}>");
    Ok(())
}

/// The HTML parser eats one newline right after `<pre>`, `<textarea>` and
/// `<listing>`, so content starting with a newline needs one more.
fn write_leading_newline(tag: &str, content: &str, out: &mut String) {
    if drops_leading_newline(tag) && content.starts_with('\n') {
        out.push('\n');
    }
}

fn write_attributes(node: &BlockNode, config: &ConvertConfig, out: &mut String) {
    // An identity taken from `id` is written back as that `id` alone.
    if let Some(label) = &node.block_identity
        && node.attributes.get("id") != Some(label)
    {
        write_attr(out, &config.identity_attr, label);
    }

    if let Some(class) = &node.class_name {
        write_attr(out, "class", class);
    }

    if let Some(spec) = &node.loop_spec {
        write_attr(out, LOOP_SOURCE_ATTR, &spec.source);
        if !spec.has_default_variable() {
            write_attr(out, LOOP_VARIABLE_ATTR, &spec.variable);
        }
    }

    if let Some(spec) = &node.conditional {
        write_attr(
            out,
            CONDITIONAL_VISIBILITY_ATTR,
            if spec.enabled { "true" } else { "false" },
        );
        if !spec.expression.is_empty() {
            write_attr(out, CONDITIONAL_EXPRESSION_ATTR, &spec.expression);
        }
    }

    if let Some(spec) = &node.assignment {
        if !spec.variable.is_empty() {
            write_attr(out, SET_VARIABLE_ATTR, &spec.variable);
        }
        if !spec.expression.is_empty() {
            write_attr(out, SET_EXPRESSION_ATTR, &spec.expression);
        }
    }

    for (name, value) in &node.attributes {
        if name == &config.inline_style_key {
            write_attr(out, "style", value);
        } else if is_reserved(name, config) {
            log::debug!("<{}>: skipping residual attribute {name:?}", node.tag);
        } else {
            write_attr(out, name, value);
        }
    }
}

/// Names owned by dedicated block fields; a residual copy would duplicate them.
fn is_reserved(name: &str, config: &ConvertConfig) -> bool {
    name.eq_ignore_ascii_case("class")
        || name.eq_ignore_ascii_case(&config.identity_attr)
        || is_control_attribute(name)
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    let name = sanitize_attr_name(name);
    if name.is_empty() {
        return;
    }
    let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
}

/// Render `blocks` with explicit options and no custom handlers.
pub fn render_blocks(blocks: &[BlockNode], options: RenderOptions) -> Result<String> {
    let converter =
        Converter::with_config(ConvertConfig::new().with_self_close_empty(options.self_close_empty));
    converter.blocks_to_html(blocks)
}
