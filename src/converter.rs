//! The [`Converter`]: configuration plus handler registry, driving every
//! conversion direction.

use crate::attributes::{ExtractedAttributes, extract_attributes};
use crate::block::BlockNode;
use crate::config::{ConvertConfig, MarkupOptions};
use crate::dom::ElementRef;
use crate::error::Result;
use crate::markup;
use crate::parse;
use crate::registry::HandlerRegistry;
use crate::render;

/// Converts between HTML, block trees and block markup.
///
/// A converter is immutable once built and is `Send + Sync`, so one instance
/// can serve any number of threads.
///
/// ```
/// use blockbridge::{Converter, ContentType};
///
/// let converter = Converter::default();
/// let blocks = converter.html_to_blocks("<ul><li>One</li><li>Two</li></ul>")?;
///
/// assert_eq!(blocks[0].content_type, ContentType::Blocks);
/// assert_eq!(
///     converter.blocks_to_html(&blocks)?,
///     "<ul><li>One</li><li>Two</li></ul>"
/// );
/// # Ok::<(), blockbridge::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConvertConfig,
    registry: HandlerRegistry,
}

impl Converter {
    pub fn new(config: ConvertConfig, registry: HandlerRegistry) -> Self {
        Self { config, registry }
    }

    /// A converter with `config` and no custom handlers.
    pub fn with_config(config: ConvertConfig) -> Self {
        Self::new(config, HandlerRegistry::empty())
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Parse an HTML fragment into block trees, one per top-level element.
    ///
    /// Only custom handlers can fail; generic conversion accepts any HTML.
    pub fn html_to_blocks(&self, html: &str) -> Result<Vec<BlockNode>> {
        parse::parse_fragment(self, html)
    }

    /// Convert one DOM element, dispatching to its custom handler if any.
    ///
    /// Handlers call this to hand sub-trees back to generic conversion.
    pub fn convert_element(&self, element: ElementRef<'_>) -> Result<BlockNode> {
        parse::convert_element(self, element)
    }

    /// Convert one DOM element with the generic rules, ignoring the registry.
    pub fn convert_default(&self, element: ElementRef<'_>) -> Result<BlockNode> {
        parse::convert_default(self, element)
    }

    /// Split `element`'s attributes into block fields using this converter's
    /// identity attribute.
    pub fn extract_attributes(&self, element: ElementRef<'_>) -> ExtractedAttributes {
        extract_attributes(element.attributes(), &self.config)
    }

    /// Render block trees back to HTML.
    pub fn blocks_to_html(&self, blocks: &[BlockNode]) -> Result<String> {
        let mut out = String::new();
        for block in blocks {
            render::write_node(self, block, &mut out)?;
        }
        Ok(out)
    }

    /// Render one node, dispatching to its custom handler if any.
    pub fn render_node(&self, node: &BlockNode) -> Result<String> {
        let mut out = String::new();
        render::write_node(self, node, &mut out)?;
        Ok(out)
    }

    /// Render one node with the generic rules, ignoring the registry for the
    /// node itself. Its children still go through their handlers.
    pub fn render_default(&self, node: &BlockNode) -> Result<String> {
        let mut out = String::new();
        render::write_default(self, node, &mut out)?;
        Ok(out)
    }

    /// Serialize block trees to comment-delimited block markup.
    pub fn blocks_to_markup(&self, blocks: &[BlockNode], options: MarkupOptions) -> Result<String> {
        markup::serialize_named(blocks, &self.config.block_name, options)
    }

    /// Parse comment-delimited block markup written with this converter's block name.
    pub fn markup_to_blocks(&self, text: &str, options: MarkupOptions) -> Result<Vec<BlockNode>> {
        markup::parse_named(text, &self.config.block_name, options)
    }
}
