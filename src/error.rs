//! Error types
//!
//! Every failure surfaces to the caller of the operation that caused it.
//! Nothing here is retried or logged.

use crate::core::tokenizer::ParseError;
use std::path::PathBuf;

/// A [`NodeBuilder`](crate::node::NodeBuilder) was asked to build with a
/// required field unset, or with half of a namespace pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("The depth of the node was not set.")]
    MissingDepth,

    #[error("The local name of the node was not set.")]
    MissingLocalName,

    #[error("The position of the node relative to its siblings was not set.")]
    MissingPosition,

    #[error("The type of the node was not set.")]
    MissingType,

    #[error("The namespace URI of the node was set without a prefix.")]
    MissingPrefix,

    #[error("The namespace prefix of the node was set without a URI.")]
    MissingUri,
}

/// Lookup failures on a built [`Node`](crate::node::Node)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    #[error("The attribute \"{name}\" does not exist.")]
    NoSuchAttribute { name: String },
}

/// A cursor source could not produce a cursor
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("The XML file \"{}\" could not be opened (code: {code}).", .path.display())]
    CouldNotOpen {
        path: PathBuf,
        /// OS error code, or -1 when the platform reported none
        code: i32,
        #[source]
        source: std::io::Error,
    },

    #[error("The XML stream could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("The XML document producer did not return a cursor: {reason}")]
    InvalidProducerResult { reason: String },
}

impl OpenError {
    pub fn could_not_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OpenError::CouldNotOpen {
            path: path.into(),
            code: source.raw_os_error().unwrap_or(-1),
            source,
        }
    }

    pub fn invalid_producer_result(reason: impl Into<String>) -> Self {
        OpenError::InvalidProducerResult {
            reason: reason.into(),
        }
    }
}

/// Failures of the reader's iteration protocol
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("The cursor has not been set; call rewind() first.")]
    MissingCursor,

    #[error(transparent)]
    Open(#[from] OpenError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Malformed XML: {0}")]
    Parse(#[from] ParseError),
}
