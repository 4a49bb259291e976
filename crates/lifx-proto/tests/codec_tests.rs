//! Codec tests (lifx-proto)
//!
//! Tests for the LIFX wire codec:
//! - Header round-trips through encode/decode
//! - Structural rejection of short and mis-sized buffers
//! - Payload transparency

use lifx_proto::{Header, MessageType, ProtoError, HEADER_SIZE};

fn sample_header() -> Header {
    Header {
        tagged: false,
        source: 0x1234_5678,
        target: Header::target_from_serial([0xd0, 0x73, 0xd5, 0x01, 0x02, 0x03]),
        res_required: true,
        ack_required: false,
        sequence: 42,
        message_type: MessageType::GetColor.into(),
    }
}

#[test]
fn test_roundtrip_preserves_fields() {
    let header = sample_header();
    let payload = b"\x01\x02\x03\x04\x05";

    let encoded = header.encode(payload).unwrap();
    assert_eq!(
        encoded.len(),
        HEADER_SIZE + payload.len(),
        "total length must be 36 + payload"
    );

    let (decoded, decoded_payload) = Header::decode(&encoded).unwrap();
    assert_eq!(decoded, header, "all settable fields should survive");
    assert_eq!(decoded_payload.as_ref(), payload);
}

#[test]
fn test_roundtrip_empty_payload() {
    let header = Header {
        tagged: true,
        ack_required: true,
        res_required: false,
        ..sample_header()
    };

    let encoded = header.encode(&[]).unwrap();
    let (decoded, payload) = Header::decode(&encoded).unwrap();

    assert!(decoded.tagged);
    assert!(decoded.ack_required);
    assert!(!decoded.res_required);
    assert!(payload.is_empty());
}

#[test]
fn test_decode_rejects_short_buffers() {
    for len in [0usize, 1, 10, 35] {
        let buf = vec![0u8; len];
        match Header::decode(&buf) {
            Err(ProtoError::MessageTooShort { len: got }) => assert_eq!(got, len),
            other => panic!("expected MessageTooShort for {len} bytes, got {other:?}"),
        }
    }
}

#[test]
fn test_decode_rejects_size_mismatch() {
    let encoded = sample_header().encode(b"abcd").unwrap();

    // Truncated: declared size now exceeds the buffer.
    match Header::decode(&encoded[..encoded.len() - 1]) {
        Err(ProtoError::SizeMismatch { declared, actual }) => {
            assert_eq!(declared as usize, encoded.len());
            assert_eq!(actual, encoded.len() - 1);
        }
        other => panic!("expected SizeMismatch, got {other:?}"),
    }

    // Padded: buffer longer than declared.
    let mut padded = encoded.to_vec();
    padded.push(0);
    assert!(Header::decode(&padded).is_err(), "padded buffer must be rejected");
}

#[test]
fn test_encode_rejects_oversized_payload() {
    let payload = vec![0u8; u16::MAX as usize];
    match sample_header().encode(&payload) {
        Err(ProtoError::PayloadTooLarge(len)) => assert_eq!(len, payload.len()),
        other => panic!("expected PayloadTooLarge, got {other:?}"),
    }
}

#[test]
fn test_decode_passes_unknown_message_types() {
    let header = Header {
        message_type: 0xbeee,
        ..sample_header()
    };
    let encoded = header.encode(&[]).unwrap();
    let (decoded, _) = Header::decode(&encoded).unwrap();
    assert_eq!(
        decoded.message_type, 0xbeee,
        "codec must not police message-type legality"
    );
}
