//! UDP transport for the LIFX LAN protocol
//!
//! A thin wrapper around a UDP socket with the two behaviors the
//! protocol engine needs: broadcast-capable sends from an ephemeral
//! port, and a single-datagram receive with a deadline that reports
//! expiry as [`TransportError::Timeout`] rather than an I/O error, so
//! callers can tell "nobody answered" apart from "transport broken".

pub mod error;
pub mod udp;

pub use error::{Result, TransportError};
pub use udp::UdpTransport;
