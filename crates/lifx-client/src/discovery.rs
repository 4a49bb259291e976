//! UDP broadcast discovery
//!
//! <https://lan.developer.lifx.com/docs/querying-the-device-for-data#discovery>

use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use lifx_proto::{payload, Header, MessageType};
use lifx_transport::{TransportError, UdpTransport};

use crate::client::Client;
use crate::device::Device;
use crate::error::Result;

impl Client {
    /// Probe the network for devices, collecting responses for the
    /// whole `window`.
    ///
    /// Broadcasts one tagged GetService query, then accepts every
    /// well-formed StateService reply that carries this session's
    /// source identifier and advertises the UDP service. Devices are
    /// deduplicated by serial. Window expiry is not an error: whatever
    /// was collected is returned. A hard receive failure mid-scan is
    /// surfaced as an error and discards partial results.
    ///
    /// Each device's address combines the responder's IP with the port
    /// carried in the payload; devices may advertise a service port
    /// that differs from the one they replied from.
    pub async fn discover(&self, window: Duration) -> Result<Vec<Device>> {
        let transport = UdpTransport::bind().await?;

        let probe = Header {
            tagged: true,
            source: self.source(),
            target: Header::TARGET_ALL,
            res_required: false, // documented recommendation for discovery
            ack_required: false,
            sequence: Device::DISCOVERY_SEQUENCE,
            message_type: MessageType::GetService.into(),
        };
        let message = probe.encode(&[])?;

        info!(target = %self.discovery_addr(), ?window, "broadcasting discovery probe");
        transport.send_to(&message, self.discovery_addr()).await?;

        let deadline = Instant::now() + window;
        let mut devices = Vec::new();
        let mut seen = HashSet::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let (bytes, from) = match transport.recv_one(remaining).await {
                Ok(packet) => packet,
                Err(TransportError::Timeout) => break, // window over; not a failure
                Err(e) => return Err(e.into()),
            };

            let (header, payload) = match Header::decode(&bytes) {
                Ok(decoded) => decoded,
                Err(e) => {
                    debug!(%from, error = %e, "skipping undecodable datagram");
                    continue;
                }
            };

            if header.source != self.source() {
                // Another controller's discovery traffic.
                debug!(%from, source = header.source, "skipping foreign response");
                continue;
            }
            if header.message_type != u16::from(MessageType::StateService) {
                continue;
            }
            let advert = match payload::decode_state_service(&payload) {
                Ok(advert) => advert,
                Err(e) => {
                    warn!(%from, error = %e, "bad StateService response");
                    continue;
                }
            };
            let Some(port) = advert.udp_port() else {
                debug!(%from, service = advert.service, port = advert.port, "skipping service");
                continue;
            };

            let serial = header.serial();
            if !seen.insert(serial) {
                continue;
            }

            // Responder's IP, but the port from the payload.
            let addr = SocketAddr::new(from.ip(), port);
            debug!(%addr, serial = format_args!("{serial:02x?}"), "discovered device");
            devices.push(self.device(serial, addr));
        }

        info!(count = devices.len(), "discovery window closed");
        Ok(devices)
    }
}
