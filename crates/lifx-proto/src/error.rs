//! Protocol error types

use thiserror::Error;

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, ProtoError>;

/// Wire-level and validation errors
#[derive(Error, Debug)]
pub enum ProtoError {
    /// Buffer shorter than the fixed header
    #[error("message too short: {len} bytes < minimum 36 bytes")]
    MessageTooShort { len: usize },

    /// Declared total size disagrees with the actual buffer length
    #[error("message declares size {declared} but is {actual} bytes")]
    SizeMismatch { declared: u16, actual: usize },

    /// Payload would overflow the u16 size field
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),

    /// Duration does not fit the wire's u32 millisecond field
    #[error("duration {0:?} out of range")]
    DurationOutOfRange(std::time::Duration),

    /// A state payload with an unexpected shape
    #[error("malformed {what} payload: length={len}")]
    MalformedPayload { what: &'static str, len: usize },

    /// More zones than one extended-zone request can carry
    #[error("too many zones to set; {0} > {max}", max = crate::MAX_EXTENDED_ZONES)]
    TooManyZones(usize),

    /// Partial/multi-packet extended-zone state, which we don't handle
    #[error("can't handle partial StateExtendedColorZones: zones={zones} index={index} colors={colors}")]
    PartialZoneState { zones: u16, index: u16, colors: u8 },
}
