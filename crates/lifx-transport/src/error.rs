//! Transport error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("bind failed: {0}")]
    Bind(std::io::Error),

    #[error("send failed: {0}")]
    Send(std::io::Error),

    /// No datagram arrived before the deadline. Retryable, unlike [`Io`].
    ///
    /// [`Io`]: TransportError::Io
    #[error("receive timed out")]
    Timeout,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Whether this is a deadline expiry rather than a hard failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}
