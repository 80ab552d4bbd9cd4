//! Error taxonomy for command execution and actions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the core.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a [`Context`](crate::Context) is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The context (or one of its parents) was cancelled.
    #[error("context canceled")]
    Canceled,
    /// The context deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Explicit failure returned by the remote peer for a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message} ({code})")]
pub struct RemoteError {
    /// Protocol error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Optional extra detail supplied by the peer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl RemoteError {
    /// Create a remote error without extra data.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Errors surfaced by commands and actions.
///
/// Nothing here is retried by the core; every variant is handed back to the
/// immediate caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The ambient context was cancelled or its deadline passed while waiting.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// The outcome channel closed without delivering a value.
    #[error("channel closed")]
    ChannelClosed,
    /// The peer answered the command with an explicit error.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
    /// The action needs event subscriptions but the executor has none.
    #[error("execution context does not support event subscriptions")]
    CapabilityMismatch,
    /// A delivered value matched none of the expected shapes.
    #[error("unknown result")]
    UnknownResult,
    /// Command parameters could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),
    /// A result payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// Returns true if this error means the operation was abandoned because
    /// its context finished.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Context(_))
    }

    /// Returns the remote error, if this is one.
    #[must_use]
    pub const fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(e) => Some(e),
            _ => None,
        }
    }
}
