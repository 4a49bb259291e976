//! Binary header encoding/decoding
//!
//! Every LIFX message starts with a fixed 36-byte header in three
//! sections, all integers little-endian:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ Frame (8 bytes)                                                 │
//! │   0-1   total message size (u16)                                │
//! │   2     protocol low byte (1024 & 0xff = 0)                     │
//! │   3     protocol high nibble | addressable(1) | tagged | origin │
//! │   4-7   source identifier (u32)                                 │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Frame address (16 bytes)                                        │
//! │   8-15  target (6-byte serial + 2 zero bytes)                   │
//! │   16-21 reserved                                                │
//! │   22    res_required bit 0 | ack_required bit 1                 │
//! │   23    sequence (u8)                                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Protocol header (12 bytes)                                      │
//! │   24-31 reserved                                                │
//! │   32-33 message type (u16)                                      │
//! │   34-35 reserved                                                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProtoError, Result};
use crate::{HEADER_SIZE, PROTOCOL_NUMBER};

/// The settable fields of a message header.
///
/// The remaining header bytes are fixed or computed: the protocol number
/// is always 1024, the addressable bit is always set, and origin and the
/// reserved ranges are always zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    /// Broadcast-style message with a wildcard target (discovery only).
    pub tagged: bool,
    /// Session identifier stamped on outgoing messages and echoed back.
    pub source: u32,
    /// Target device; first 6 bytes are the serial, last 2 are zero.
    pub target: [u8; 8],
    /// Ask the device for a State response.
    pub res_required: bool,
    /// Ask the device for an Acknowledgement response.
    pub ack_required: bool,
    /// Per-device request correlation counter.
    pub sequence: u8,
    /// Message type code; see [`crate::MessageType`].
    pub message_type: u16,
}

impl Header {
    /// Target value addressing all devices (used with `tagged`).
    pub const TARGET_ALL: [u8; 8] = [0; 8];

    /// Build a target field from a 6-byte serial.
    pub fn target_from_serial(serial: [u8; 6]) -> [u8; 8] {
        let mut target = [0u8; 8];
        target[..6].copy_from_slice(&serial);
        target
    }

    /// The 6 significant bytes of the target field.
    pub fn serial(&self) -> [u8; 6] {
        self.target[..6].try_into().unwrap()
    }

    /// Encode the header followed by `payload`.
    ///
    /// Fails only if the total length would overflow the u16 size field;
    /// otherwise the output is always exactly 36 + payload bytes.
    pub fn encode(&self, payload: &[u8]) -> Result<Bytes> {
        let total = HEADER_SIZE + payload.len();
        if total > u16::MAX as usize {
            return Err(ProtoError::PayloadTooLarge(payload.len()));
        }

        let mut buf = BytesMut::with_capacity(total);

        // Frame
        buf.put_u16_le(total as u16);
        buf.put_u8((PROTOCOL_NUMBER & 0xff) as u8);
        let mut packed = ((PROTOCOL_NUMBER >> 8) & 0x0f) as u8;
        packed |= 1 << 4; // addressable, always set
        if self.tagged {
            packed |= 1 << 5;
        }
        // origin (bits 6-7) left zero
        buf.put_u8(packed);
        buf.put_u32_le(self.source);

        // Frame address
        buf.put_slice(&self.target);
        buf.put_bytes(0, 6);
        let mut flags = 0u8;
        if self.res_required {
            flags |= 1;
        }
        if self.ack_required {
            flags |= 1 << 1;
        }
        buf.put_u8(flags);
        buf.put_u8(self.sequence);

        // Protocol header
        buf.put_bytes(0, 8);
        buf.put_u16_le(self.message_type);
        buf.put_bytes(0, 2);

        buf.put_slice(payload);

        debug_assert_eq!(buf.len(), total);
        Ok(buf.freeze())
    }

    /// Decode a header and split off the payload.
    ///
    /// Rejects buffers under 36 bytes and buffers whose declared size
    /// field disagrees with the actual length. Message-type legality is
    /// the caller's concern.
    pub fn decode(buf: &[u8]) -> Result<(Header, Bytes)> {
        if buf.len() < HEADER_SIZE {
            return Err(ProtoError::MessageTooShort { len: buf.len() });
        }
        let declared = u16::from_le_bytes([buf[0], buf[1]]);
        if declared as usize != buf.len() {
            return Err(ProtoError::SizeMismatch {
                declared,
                actual: buf.len(),
            });
        }

        let header = Header {
            tagged: buf[3] & (1 << 5) != 0,
            source: u32::from_le_bytes(buf[4..8].try_into().unwrap()),
            target: buf[8..16].try_into().unwrap(),
            res_required: buf[22] & 1 != 0,
            ack_required: buf[22] & (1 << 1) != 0,
            sequence: buf[23],
            message_type: u16::from_le_bytes([buf[32], buf[33]]),
        };
        let payload = Bytes::copy_from_slice(&buf[HEADER_SIZE..]);

        Ok((header, payload))
    }
}
