//! Converter configuration.

/// Attribute that carries the editor-facing block label.
pub const DEFAULT_IDENTITY_ATTR: &str = "data-block-name";

/// Residual attribute key rendered back out as `style`.
pub const DEFAULT_INLINE_STYLE_KEY: &str = "inlineStyle";

/// Block name used in comment-delimited markup.
pub const DEFAULT_BLOCK_NAME: &str = "universal/element";

/// Settings shared by every conversion a [`Converter`](crate::Converter) performs.
///
/// Built with `new()` and customized with the `with_*` methods:
///
/// ```
/// use blockbridge::ConvertConfig;
///
/// let config = ConvertConfig::new()
///     .with_identity_attr("data-label")
///     .with_self_close_empty(true);
/// assert_eq!(config.identity_attr, "data-label");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Attribute read into (and written from) `block_identity`.
    pub identity_attr: String,
    /// Residual attribute key that stands in for an inline `style`.
    pub inline_style_key: String,
    /// Block name written into comment markers.
    pub block_name: String,
    /// Render non-void empty elements as `<tag />` instead of `<tag></tag>`.
    pub self_close_empty: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertConfig {
    pub fn new() -> Self {
        Self {
            identity_attr: DEFAULT_IDENTITY_ATTR.to_string(),
            inline_style_key: DEFAULT_INLINE_STYLE_KEY.to_string(),
            block_name: DEFAULT_BLOCK_NAME.to_string(),
            self_close_empty: false,
        }
    }

    /// Attribute names are matched case-insensitively, so the name is stored lowercase.
    pub fn with_identity_attr(mut self, name: impl Into<String>) -> Self {
        self.identity_attr = name.into().to_ascii_lowercase();
        self
    }

    pub fn with_inline_style_key(mut self, key: impl Into<String>) -> Self {
        self.inline_style_key = key.into();
        self
    }

    pub fn with_block_name(mut self, name: impl Into<String>) -> Self {
        self.block_name = name.into();
        self
    }

    pub fn with_self_close_empty(mut self, enabled: bool) -> Self {
        self.self_close_empty = enabled;
        self
    }

    pub(crate) fn render_options(&self) -> RenderOptions {
        RenderOptions {
            self_close_empty: self.self_close_empty,
        }
    }
}

/// Options for rendering block trees to HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub self_close_empty: bool,
}

/// Options for comment-delimited block markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkupOptions {
    /// Double the backslash of every unicode escape (`\\u003c`), for storage
    /// layers that strip one level of slashes.
    pub double_escape: bool,
}

impl MarkupOptions {
    pub fn double_escaped() -> Self {
        Self {
            double_escape: true,
        }
    }
}
