//! LIFX LAN wire protocol
//!
//! Pure types and encoding for the LIFX LAN protocol as documented at
//! <https://lan.developer.lifx.com/docs>. No I/O and no state; the
//! transport and client crates build on this.
//!
//! This crate provides:
//! - Message header encoding/decoding ([`Header`])
//! - Message type registry ([`MessageType`])
//! - HSBK color encoding ([`Hsbk`])
//! - Payload builders and parsers ([`payload`])

pub mod color;
pub mod error;
pub mod header;
pub mod message;
pub mod payload;

pub use color::Hsbk;
pub use error::{ProtoError, Result};
pub use header::Header;
pub use message::MessageType;

/// Fixed encoded size of the message header.
pub const HEADER_SIZE: usize = 36;

/// Protocol number carried in every frame header.
pub const PROTOCOL_NUMBER: u16 = 1024;

/// Well-known UDP port LIFX devices listen on.
pub const DEFAULT_PORT: u16 = 56700;

/// Service identifier for UDP in StateService payloads.
pub const SERVICE_UDP: u8 = 1;

/// Upper bound on zones in one SetExtendedColorZones request.
pub const MAX_EXTENDED_ZONES: usize = 82;
