//! The block tree: one node per HTML element plus its templating directives.
//!
//! A [`BlockNode`] is what the HTML walker produces and what the serializers
//! consume. Nodes carry either nested children, a string payload, or nothing,
//! depending on their [`ContentType`].
//!
//! # Example
//!
//! ```
//! use blockbridge::{BlockNode, LoopSpec};
//!
//! let list = BlockNode::element("ul", vec![
//!     BlockNode::text("li", "{{ row.title }}").with_loop(LoopSpec::new("posts", "row")),
//! ])
//! .with_class("posts");
//!
//! assert!(list.validate().is_ok());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::elements::is_void_element;
use crate::error::{Error, Result};

/// Loop variable used when none is given.
pub const DEFAULT_LOOP_VARIABLE: &str = "item";

/// How a node's content is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Nested child blocks.
    Blocks,
    /// Plain text (entity-decoded).
    Text,
    /// Raw inner markup.
    Html,
    /// No content at all.
    #[default]
    Empty,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Blocks => "blocks",
            ContentType::Text => "text",
            ContentType::Html => "html",
            ContentType::Empty => "empty",
        }
    }
}

/// Repeat the element once per entry of `source`, binding each to `variable`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoopSpec {
    pub source: String,
    #[serde(default = "default_loop_variable")]
    pub variable: String,
}

fn default_loop_variable() -> String {
    DEFAULT_LOOP_VARIABLE.to_string()
}

impl LoopSpec {
    pub fn new(source: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            variable: variable.into(),
        }
    }

    /// A loop over `source` using the default variable name.
    pub fn over(source: impl Into<String>) -> Self {
        Self::new(source, DEFAULT_LOOP_VARIABLE)
    }

    pub fn has_default_variable(&self) -> bool {
        self.variable == DEFAULT_LOOP_VARIABLE
    }
}

/// Render the element only when `expression` holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ConditionalSpec {
    pub enabled: bool,
    #[serde(default)]
    pub expression: String,
}

impl ConditionalSpec {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            enabled: true,
            expression: expression.into(),
        }
    }
}

/// Assign `expression` to a template variable before rendering the element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AssignmentSpec {
    #[serde(default)]
    pub variable: String,
    #[serde(default)]
    pub expression: String,
}

impl AssignmentSpec {
    pub fn new(variable: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            expression: expression.into(),
        }
    }
}

/// One HTML element in the block tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockNode {
    #[serde(rename = "tagName")]
    pub tag: String,
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockNode>,
    /// Passthrough attributes, excluding class, style, identity and control attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Human-readable label shown by editor tooling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_identity: Option<String>,
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub loop_spec: Option<LoopSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<ConditionalSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<AssignmentSpec>,
}

impl BlockNode {
    pub fn new(tag: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            tag: tag.into(),
            content_type,
            ..Default::default()
        }
    }

    /// A container whose content is `children`.
    pub fn element(tag: impl Into<String>, children: Vec<BlockNode>) -> Self {
        Self {
            children,
            ..Self::new(tag, ContentType::Blocks)
        }
    }

    pub fn text(tag: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(tag, ContentType::Text)
        }
    }

    pub fn html(tag: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(tag, ContentType::Html)
        }
    }

    pub fn empty(tag: impl Into<String>) -> Self {
        Self::new(tag, ContentType::Empty)
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_identity(mut self, label: impl Into<String>) -> Self {
        self.block_identity = Some(label.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_loop(mut self, spec: LoopSpec) -> Self {
        self.loop_spec = Some(spec);
        self
    }

    pub fn with_conditional(mut self, spec: ConditionalSpec) -> Self {
        self.conditional = Some(spec);
        self
    }

    pub fn with_assignment(mut self, spec: AssignmentSpec) -> Self {
        self.assignment = Some(spec);
        self
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag)
    }

    /// Check this node and its descendants for contradictory fields.
    ///
    /// Returns [`Error::MalformedNode`] for the first offending node.
    pub fn validate(&self) -> Result<()> {
        self.validate_shallow()?;
        self.children.iter().try_for_each(BlockNode::validate)
    }

    /// Check only this node, not its children.
    pub(crate) fn validate_shallow(&self) -> Result<()> {
        if !is_valid_tag_name(&self.tag) {
            return Err(Error::malformed(&self.tag, "invalid tag name"));
        }

        if self.is_void() && (!self.children.is_empty() || !self.content.is_empty()) {
            return Err(Error::malformed(
                &self.tag,
                "void element cannot have children or content",
            ));
        }

        match self.content_type {
            ContentType::Blocks if !self.content.is_empty() => Err(Error::malformed(
                &self.tag,
                "content type \"blocks\" cannot carry string content",
            )),
            ContentType::Text | ContentType::Html if !self.children.is_empty() => {
                Err(Error::malformed(
                    &self.tag,
                    format!(
                        "content type \"{}\" cannot have child blocks",
                        self.content_type.as_str()
                    ),
                ))
            }
            ContentType::Empty if !self.children.is_empty() || !self.content.is_empty() => Err(
                Error::malformed(&self.tag, "content type \"empty\" must have no content"),
            ),
            _ => Ok(()),
        }
    }
}

fn is_valid_tag_name(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}
