//! RPC engine tests (lifx-client)
//!
//! Loopback UDP sockets stand in for devices:
//! - Query and command exchanges against a well-behaved responder
//! - Correlation failures (source, type, sequence) are distinct errors
//! - Retry with backoff bounded by the overall deadline
//! - Caller-side validation happens before any packet leaves

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lifx_client::{Client, ClientError, Hsbk};
use lifx_proto::{Header, MessageType};

const SERIAL: [u8; 6] = [0xd0, 0x73, 0xd5, 0xaa, 0xbb, 0xcc];
const SOURCE: u32 = 0x4c49_4658;

/// Spawn a fake device. For every decodable request, `reply` may
/// produce response bytes to send back to the requester.
async fn spawn_responder<F>(reply: F) -> SocketAddr
where
    F: Fn(&Header, &[u8]) -> Option<Vec<u8>> + Send + 'static,
{
    let socket = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    tokio::spawn(async move {
        let mut buf = [0u8; 2048];
        loop {
            let Ok((len, from)) = socket.recv_from(&mut buf).await else {
                break;
            };
            let Ok((header, payload)) = Header::decode(&buf[..len]) else {
                continue;
            };
            if let Some(response) = reply(&header, &payload) {
                let _ = socket.send_to(&response, from).await;
            }
        }
    });
    addr
}

/// A response header echoing the request's correlation fields.
fn echo_header(request: &Header, message_type: MessageType) -> Header {
    Header {
        tagged: false,
        source: request.source,
        target: request.target,
        res_required: false,
        ack_required: false,
        sequence: request.sequence,
        message_type: message_type.into(),
    }
}

fn test_client() -> Client {
    Client::builder()
        .source(SOURCE)
        .base_timeout(Duration::from_millis(300))
        .overall_timeout(Duration::from_secs(2))
        .build()
}

#[tokio::test]
async fn test_query_roundtrip() {
    let flags_seen = Arc::new(AtomicUsize::new(0));
    let flags = flags_seen.clone();

    let addr = spawn_responder(move |request, _| {
        if request.res_required && !request.ack_required {
            flags.fetch_add(1, Ordering::SeqCst);
        }
        let header = echo_header(request, MessageType::StatePower);
        Some(header.encode(&0xaaaa_u16.to_le_bytes()).unwrap().to_vec())
    })
    .await;

    let client = test_client();
    let mut device = client.device(SERIAL, addr);

    let level = device.get_power().await.unwrap();
    assert_eq!(level, 0xaaaa);
    assert_eq!(
        flags_seen.load(Ordering::SeqCst),
        1,
        "query must set res_required and not ack_required"
    );
}

#[tokio::test]
async fn test_command_waits_for_ack() {
    let payload_len = Arc::new(AtomicUsize::new(usize::MAX));
    let seen = payload_len.clone();

    let addr = spawn_responder(move |request, payload| {
        if request.ack_required && !request.res_required {
            seen.store(payload.len(), Ordering::SeqCst);
        }
        let header = echo_header(request, MessageType::Acknowledgement);
        Some(header.encode(&[]).unwrap().to_vec())
    })
    .await;

    let client = test_client();
    let mut device = client.device(SERIAL, addr);

    device
        .set_light_power(0xffff, Duration::from_millis(250))
        .await
        .unwrap();
    assert_eq!(
        payload_len.load(Ordering::SeqCst),
        6,
        "SetLightPower payload is level(u16) + duration(u32)"
    );
}

#[tokio::test]
async fn test_label_strips_padding() {
    let addr = spawn_responder(|request, _| {
        let mut label = [0u8; 32];
        label[..7].copy_from_slice(b"Bedroom");
        let header = echo_header(request, MessageType::StateLabel);
        Some(header.encode(&label).unwrap().to_vec())
    })
    .await;

    let client = test_client();
    let mut device = client.device(SERIAL, addr);
    assert_eq!(device.get_label().await.unwrap(), "Bedroom");
}

#[tokio::test]
async fn test_sequence_mismatch_is_fatal() {
    let addr = spawn_responder(|request, _| {
        let mut header = echo_header(request, MessageType::StatePower);
        header.sequence = request.sequence.wrapping_add(1);
        Some(header.encode(&[0, 0]).unwrap().to_vec())
    })
    .await;

    let client = test_client();
    let mut device = client.device(SERIAL, addr);

    let err = device.get_power().await.unwrap_err();
    match err {
        ClientError::UnexpectedSequence { got, want } => {
            assert_eq!(got, want.wrapping_add(1));
        }
        other => panic!("expected UnexpectedSequence, got {other:?}"),
    }
    assert!(err.is_mismatch());
}

#[tokio::test]
async fn test_foreign_source_is_fatal() {
    let addr = spawn_responder(|request, _| {
        let mut header = echo_header(request, MessageType::StatePower);
        header.source = request.source ^ 0xffff_ffff;
        Some(header.encode(&[0, 0]).unwrap().to_vec())
    })
    .await;

    let client = test_client();
    let mut device = client.device(SERIAL, addr);

    match device.get_power().await.unwrap_err() {
        ClientError::UnexpectedSource { want, .. } => assert_eq!(want, SOURCE),
        other => panic!("expected UnexpectedSource, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_type_is_fatal() {
    let addr = spawn_responder(|request, _| {
        // Answer a GetPower with a StateLabel.
        let header = echo_header(request, MessageType::StateLabel);
        Some(header.encode(&[0u8; 32]).unwrap().to_vec())
    })
    .await;

    let client = test_client();
    let mut device = client.device(SERIAL, addr);

    match device.get_power().await.unwrap_err() {
        ClientError::UnexpectedType { got, want } => {
            assert_eq!(got, u16::from(MessageType::StateLabel));
            assert_eq!(want, u16::from(MessageType::StatePower));
        }
        other => panic!("expected UnexpectedType, got {other:?}"),
    }
}

#[tokio::test]
async fn test_retry_until_overall_deadline() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();

    // A device that hears every request and never answers.
    let addr = spawn_responder(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        None
    })
    .await;

    let client = Client::builder()
        .source(SOURCE)
        .base_timeout(Duration::from_millis(300))
        .overall_timeout(Duration::from_secs(1))
        .build();
    let mut device = client.device(SERIAL, addr);

    let start = Instant::now();
    let err = device.get_power().await.unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, ClientError::Timeout), "got {err:?}");
    assert!(
        elapsed >= Duration::from_millis(900),
        "gave up before the overall deadline: {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_millis(2500),
        "kept retrying past the overall deadline: {elapsed:?}"
    );

    // Attempts at ~0ms, ~300ms and ~750ms fit inside a 1s deadline
    // with the 1.5x backoff; the request is resent on each.
    let sends = attempts.load(Ordering::SeqCst);
    assert!(
        (2..=4).contains(&sends),
        "expected a handful of backoff attempts, saw {sends}"
    );
}

#[tokio::test]
async fn test_retry_resends_identical_request() {
    let first_attempt: Arc<std::sync::Mutex<Option<(u8, Vec<u8>)>>> =
        Arc::new(std::sync::Mutex::new(None));
    let state = first_attempt.clone();

    let addr = spawn_responder(move |request, payload| {
        let mut slot = state.lock().unwrap();
        match slot.take() {
            // Drop the first request on the floor, remembering it.
            None => {
                *slot = Some((request.sequence, payload.to_vec()));
                None
            }
            Some((sequence, payload_bytes)) => {
                assert_eq!(
                    request.sequence, sequence,
                    "retries must not re-sequence the request"
                );
                assert_eq!(payload.to_vec(), payload_bytes);
                let header = echo_header(request, MessageType::StatePower);
                Some(header.encode(&[0x34, 0x12]).unwrap().to_vec())
            }
        }
    })
    .await;

    let client = Client::builder()
        .source(SOURCE)
        .base_timeout(Duration::from_millis(200))
        .overall_timeout(Duration::from_secs(5))
        .build();
    let mut device = client.device(SERIAL, addr);

    assert_eq!(device.get_power().await.unwrap(), 0x1234);
}

#[tokio::test]
async fn test_too_many_zones_rejected_before_send() {
    let packets = Arc::new(AtomicUsize::new(0));
    let counter = packets.clone();
    let addr = spawn_responder(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        None
    })
    .await;

    let client = test_client();
    let mut device = client.device(SERIAL, addr);

    let zones = vec![Hsbk::default(); 83];
    let err = device
        .set_extended_color_zones(Duration::from_secs(1), &zones)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ClientError::Proto(_)),
        "83 zones must fail validation, got {err:?}"
    );

    // Give any stray packet a moment to arrive.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        packets.load(Ordering::SeqCst),
        0,
        "validation failures must not reach the network"
    );
}

#[tokio::test]
async fn test_separate_devices_share_no_state() {
    let log: Arc<std::sync::Mutex<Vec<([u8; 6], u8)>>> = Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen = log.clone();

    let addr = spawn_responder(move |request, _| {
        seen.lock().unwrap().push((request.serial(), request.sequence));
        let header = echo_header(request, MessageType::Acknowledgement);
        Some(header.encode(&[]).unwrap().to_vec())
    })
    .await;

    let client = test_client();
    let mut a = client.device(SERIAL, addr);
    let mut b = client.device([9; 6], addr);

    a.set_color(Hsbk::default(), Duration::ZERO).await.unwrap();
    a.set_color(Hsbk::default(), Duration::ZERO).await.unwrap();
    b.set_color(Hsbk::default(), Duration::ZERO).await.unwrap();

    assert_eq!(
        log.lock().unwrap().as_slice(),
        &[(SERIAL, 1), (SERIAL, 2), ([9; 6], 1)],
        "each handle allocates sequences independently, starting at 1"
    );
}
