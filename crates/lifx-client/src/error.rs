//! Client error types

use thiserror::Error;

use lifx_proto::ProtoError;
use lifx_transport::TransportError;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Malformed message or invalid caller input; never retried.
    #[error("protocol error: {0}")]
    Proto(#[from] ProtoError),

    /// Hard transport failure (socket closed, no route); never retried.
    #[error("transport error: {0}")]
    Transport(TransportError),

    /// No response within the overall deadline, after retries.
    #[error("operation timed out")]
    Timeout,

    /// A well-formed response stamped with another session's source.
    #[error("received message source 0x{got:08x} (want 0x{want:08x})")]
    UnexpectedSource { got: u32, want: u32 },

    /// A well-formed response of the wrong message type.
    #[error("received message type {got} (want {want})")]
    UnexpectedType { got: u16, want: u16 },

    /// A well-formed response correlating to a different request,
    /// e.g. a stale duplicate from an earlier attempt.
    #[error("received message with seq {got} (want {want})")]
    UnexpectedSequence { got: u8, want: u8 },
}

impl ClientError {
    /// Whether this is a correlation failure on a well-formed message
    /// (wrong source, type, or sequence).
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            ClientError::UnexpectedSource { .. }
                | ClientError::UnexpectedType { .. }
                | ClientError::UnexpectedSequence { .. }
        )
    }
}

impl From<TransportError> for ClientError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout => ClientError::Timeout,
            other => ClientError::Transport(other),
        }
    }
}
