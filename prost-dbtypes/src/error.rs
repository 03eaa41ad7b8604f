//! Errors raised while scanning a column value into a wrapper.

use thiserror::Error;

use crate::SqlValue;

/// A failure to load a message from a column value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The column held a kind of value that cannot carry an encoded message.
    #[error("unsupported scan source type: {kind}")]
    UnsupportedSource { kind: &'static str },
    /// The column bytes are not a valid encoding of the target message.
    #[error("failed to decode protobuf message: {0}")]
    Decode(#[from] prost::DecodeError),
}

impl ScanError {
    /// Creates an [`ScanError::UnsupportedSource`] for `src`.
    #[cold]
    pub fn unsupported(src: &SqlValue) -> Self {
        ScanError::UnsupportedSource { kind: src.kind() }
    }
}
