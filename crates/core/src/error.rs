use std::time::Duration;
use thiserror::Error;

/// Result type alias for palaver-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the palaver chat client
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Completion provider errors
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Failures while asking a completion provider for the next turn
///
/// Every variant is recoverable at the session level: the controller reports
/// it inline and returns to idle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The request never produced a response (DNS, connect, TLS, reset)
    #[error("request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-2xx status
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response decoded but carried no choices
    #[error("response contained no choices")]
    EmptyChoices,

    /// The configured completion timeout elapsed
    #[error("no response after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl ProviderError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status { status, body: body.into() }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}
