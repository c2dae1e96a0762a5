//! Custom tag handlers.
//!
//! A [`TagHandler`] takes over parsing and serialization for one tag name and
//! its entire sub-tree. Handlers are collected into an immutable
//! [`HandlerRegistry`] before any conversion runs, then handed to a
//! [`Converter`](crate::Converter).
//!
//! # Example
//!
//! ```
//! use blockbridge::{BlockNode, Converter, ConvertConfig, HandlerRegistry, Result, TagHandler};
//! use blockbridge::dom::ElementRef;
//!
//! /// `<icon name="x">` becomes an empty block carrying just the icon name.
//! struct IconHandler;
//!
//! impl TagHandler for IconHandler {
//!     fn to_block(&self, element: ElementRef<'_>, _: &Converter) -> Result<BlockNode> {
//!         Ok(BlockNode::empty("icon").with_attr("name", element.attr("name").unwrap_or("")))
//!     }
//!
//!     fn to_html(&self, node: &BlockNode, _: &Converter) -> Result<String> {
//!         let name = node.attributes.get("name").map(String::as_str).unwrap_or("");
//!         Ok(format!("<i class=\"icon icon-{name}\"></i>"))
//!     }
//! }
//!
//! let registry = HandlerRegistry::builder().register("icon", IconHandler).build();
//! let converter = Converter::new(ConvertConfig::default(), registry);
//!
//! let blocks = converter.html_to_blocks(r#"<icon name="star"></icon>"#)?;
//! assert_eq!(converter.blocks_to_html(&blocks)?, r#"<i class="icon icon-star"></i>"#);
//! # Ok::<(), blockbridge::Error>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::block::BlockNode;
use crate::converter::Converter;
use crate::dom::{ElementRef, WhitespaceMode};
use crate::error::Result;
use crate::util::normalize_text;

/// Owns conversion of one tag name, in both directions.
///
/// Implementations must be `Send + Sync` so a [`Converter`] can be shared
/// across threads.
pub trait TagHandler: Send + Sync {
    /// Build the block for `element` and everything beneath it.
    fn to_block(&self, element: ElementRef<'_>, converter: &Converter) -> Result<BlockNode>;

    /// Render `node` (and its children) back to HTML.
    fn to_html(&self, node: &BlockNode, converter: &Converter) -> Result<String>;
}

/// Immutable map from lowercase tag name to handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn TagHandler>>,
}

impl HandlerRegistry {
    /// A registry with no handlers.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    /// Look up the handler for `tag` (case-insensitive).
    pub fn get(&self, tag: &str) -> Option<&dyn TagHandler> {
        if self.handlers.is_empty() {
            return None;
        }
        self.handlers
            .get(tag)
            .or_else(|| self.handlers.get(&tag.to_ascii_lowercase()))
            .map(|handler| handler.as_ref())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered tag names, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// Collects handlers before freezing them into a [`HandlerRegistry`].
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<String, Arc<dyn TagHandler>>,
}

impl HandlerRegistryBuilder {
    /// Register `handler` for `tag`. A later registration for the same tag
    /// replaces the earlier one.
    pub fn register(mut self, tag: &str, handler: impl TagHandler + 'static) -> Self {
        self.handlers
            .insert(tag.to_ascii_lowercase(), Arc::new(handler));
        self
    }

    /// Register an already shared handler.
    pub fn register_shared(mut self, tag: &str, handler: Arc<dyn TagHandler>) -> Self {
        self.handlers.insert(tag.to_ascii_lowercase(), handler);
        self
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            handlers: self.handlers,
        }
    }
}

/// Keeps a tag's whole sub-tree as raw `html` content, as if the tag were in
/// the verbatim set. Attributes are still split into block fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimHandler;

impl TagHandler for VerbatimHandler {
    fn to_block(&self, element: ElementRef<'_>, converter: &Converter) -> Result<BlockNode> {
        let content = element.inner_html_with(WhitespaceMode::Preserve);
        let mut node = if content.is_empty() {
            BlockNode::empty(element.tag())
        } else {
            BlockNode::html(element.tag(), content)
        };
        converter.extract_attributes(element).apply_to(&mut node);
        Ok(node)
    }

    fn to_html(&self, node: &BlockNode, converter: &Converter) -> Result<String> {
        converter.render_default(node)
    }
}

/// Flattens a tag's sub-tree to its normalized text content.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextHandler;

impl TagHandler for TextHandler {
    fn to_block(&self, element: ElementRef<'_>, converter: &Converter) -> Result<BlockNode> {
        let content = normalize_text(&element.text_content());
        let mut node = if content.is_empty() {
            BlockNode::empty(element.tag())
        } else {
            BlockNode::text(element.tag(), content)
        };
        converter.extract_attributes(element).apply_to(&mut node);
        Ok(node)
    }

    fn to_html(&self, node: &BlockNode, converter: &Converter) -> Result<String> {
        converter.render_default(node)
    }
}
