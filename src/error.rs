//! Error types for blockbridge operations.

use thiserror::Error;

/// Errors that can occur while converting between HTML, block trees and markup.
#[derive(Error, Debug)]
pub enum Error {
    /// A block node whose fields contradict its content type.
    #[error("malformed <{tag}> node: {reason}")]
    MalformedNode { tag: String, reason: String },

    /// Comment-delimited block markup that cannot be parsed.
    #[error("invalid block markup at byte {offset}: {reason}")]
    Markup { offset: usize, reason: String },

    /// A custom tag handler rejected its input.
    #[error("handler for <{tag}> failed: {reason}")]
    Handler { tag: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(tag: &str, reason: impl Into<String>) -> Self {
        Error::MalformedNode {
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn markup(offset: usize, reason: impl Into<String>) -> Self {
        Error::Markup {
            offset,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
