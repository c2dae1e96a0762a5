//! # blockbridge
//!
//! Bidirectional conversion between HTML fragments and block trees, the nested
//! structure a block editor stores.
//!
//! ## Features
//!
//! - Parse HTML into [`BlockNode`] trees, classifying each element's content
//!   as nested blocks, plain text, raw HTML or empty
//! - Pull templating directives (loop, conditional, variable assignment) out
//!   of control attributes and write them back
//! - Render block trees to HTML with void elements and escaping preserved
//! - Serialize trees to comment-delimited block markup and parse it back
//! - Plug in [`TagHandler`]s that own specific tag names
//!
//! ## Quick Start
//!
//! ```
//! use blockbridge::{ContentType, blocks_to_html, html_to_blocks};
//!
//! let blocks = html_to_blocks(r#"<div class="card" style="color:red"><h2>Title</h2><p>Hi <b>there</b></p></div>"#);
//!
//! let card = &blocks[0];
//! assert_eq!(card.class_name.as_deref(), Some("card"));
//! assert_eq!(card.children[0].content_type, ContentType::Text);
//! assert_eq!(card.children[1].content_type, ContentType::Html);
//!
//! // `style` is dropped during parsing
//! assert_eq!(
//!     blocks_to_html(&blocks)?,
//!     r#"<div class="card"><h2>Title</h2><p>Hi <b>there</b></p></div>"#
//! );
//! # Ok::<(), blockbridge::Error>(())
//! ```
//!
//! ## Custom Tags and Configuration
//!
//! The free functions use the default configuration and no custom handlers.
//! Build a [`Converter`] to change either:
//!
//! ```
//! use blockbridge::{ConvertConfig, Converter, HandlerRegistry, MarkupOptions, VerbatimHandler};
//!
//! let registry = HandlerRegistry::builder()
//!     .register("x-chart", VerbatimHandler)
//!     .build();
//! let converter = Converter::new(ConvertConfig::new().with_identity_attr("data-label"), registry);
//!
//! let blocks = converter.html_to_blocks(r#"<x-chart data-label="Sales"><g><rect/></g></x-chart>"#)?;
//! assert_eq!(blocks[0].block_identity.as_deref(), Some("Sales"));
//!
//! let markup = converter.blocks_to_markup(&blocks, MarkupOptions::default())?;
//! assert_eq!(converter.markup_to_blocks(&markup, MarkupOptions::default())?, blocks);
//! # Ok::<(), blockbridge::Error>(())
//! ```

pub mod attributes;
pub mod block;
pub mod classify;
pub mod config;
pub mod converter;
pub mod dom;
pub mod elements;
pub mod error;
pub mod escape;
pub mod markup;
mod parse;
pub mod registry;
pub mod render;
pub mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use block::{AssignmentSpec, BlockNode, ConditionalSpec, ContentType, LoopSpec};
pub use config::{ConvertConfig, MarkupOptions, RenderOptions};
pub use converter::Converter;
pub use error::{Error, Result};
pub use markup::{parse_markup, serialize_blocks_to_markup};
pub use registry::{HandlerRegistry, HandlerRegistryBuilder, TagHandler, TextHandler, VerbatimHandler};
pub use render::render_blocks;

/// Parse an HTML fragment into block trees with the default configuration.
///
/// Never fails: malformed HTML is repaired the way browsers repair it, and
/// there are no custom handlers to reject anything.
pub fn html_to_blocks(html: &str) -> Vec<BlockNode> {
    Converter::default().html_to_blocks(html).unwrap_or_default()
}

/// Render block trees to HTML with the default configuration.
///
/// Fails with [`Error::MalformedNode`] when a node's fields contradict its
/// content type.
pub fn blocks_to_html(blocks: &[BlockNode]) -> Result<String> {
    Converter::default().blocks_to_html(blocks)
}
