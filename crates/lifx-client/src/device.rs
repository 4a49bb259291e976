//! Device handles and the retrying RPC exchange

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;
use tracing::debug;

use lifx_proto::payload::{self, HostFirmware, LightState, WaveformConfig};
use lifx_proto::{Header, Hsbk, MessageType};
use lifx_transport::{TransportError, UdpTransport};

use crate::client::RetryPolicy;
use crate::error::{ClientError, Result};

/// A LIFX device on the local network, bound to the session that
/// discovered it.
///
/// Sequence numbers are allocated from `&mut self`, so a handle is not
/// usable from multiple tasks without external synchronization; that is
/// what keeps request/response correlation per-device total. Separate
/// handles (even to the same physical device) share no state.
#[derive(Debug, Clone)]
pub struct Device {
    serial: [u8; 6],
    addr: SocketAddr,
    source: u32,
    retry: RetryPolicy,
    sequence: u8,
}

impl Device {
    /// Sequence number used by discovery probes. Fresh handles start
    /// one past it so a first RPC can't be satisfied by a stray echo of
    /// the probe.
    pub(crate) const DISCOVERY_SEQUENCE: u8 = 0;

    pub(crate) fn new(serial: [u8; 6], addr: SocketAddr, source: u32, retry: RetryPolicy) -> Self {
        Self {
            serial,
            addr,
            source,
            retry,
            sequence: Self::DISCOVERY_SEQUENCE.wrapping_add(1),
        }
    }

    /// The device's 6-byte serial.
    pub fn serial(&self) -> [u8; 6] {
        self.serial
    }

    /// The device's current network address (IP + advertised UDP port).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn next_sequence(&mut self) -> u8 {
        let seq = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        seq
    }

    /// One request/response exchange under exponential backoff.
    ///
    /// The request is encoded once and the identical bytes are resent
    /// on every attempt; only transport timeouts are retried. A
    /// received datagram terminates the loop: it either validates
    /// (source, expected type, and sequence) or the exchange
    /// fails with the specific mismatch.
    async fn round_trip(
        &mut self,
        request_type: MessageType,
        expect: MessageType,
        payload: &[u8],
        res_required: bool,
        ack_required: bool,
    ) -> Result<Bytes> {
        let sequence = self.next_sequence();
        let header = Header {
            tagged: false,
            source: self.source,
            target: Header::target_from_serial(self.serial),
            res_required,
            ack_required,
            sequence,
            message_type: request_type.into(),
        };
        let request = header.encode(payload)?;

        let deadline = self.retry.overall.map(|d| Instant::now() + d);
        let mut timeout = self.retry.base_timeout;

        let (response, response_payload) = loop {
            let transport = UdpTransport::bind().await?;
            transport.send_to(&request, self.addr).await?;

            let wait = match deadline {
                Some(d) => timeout.min(d.saturating_duration_since(Instant::now())),
                None => timeout,
            };
            match transport.recv_one(wait).await {
                Ok((bytes, _from)) => break Header::decode(&bytes)?,
                Err(TransportError::Timeout) => {
                    if deadline.is_some_and(|d| Instant::now() >= d) {
                        debug!(seq = sequence, "exchange giving up at overall deadline");
                        return Err(ClientError::Timeout);
                    }
                    timeout = self.retry.next_timeout(timeout);
                    debug!(seq = sequence, next_timeout = ?timeout, "no response, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        if response.source != self.source {
            return Err(ClientError::UnexpectedSource {
                got: response.source,
                want: self.source,
            });
        }
        if response.message_type != u16::from(expect) {
            return Err(ClientError::UnexpectedType {
                got: response.message_type,
                want: expect.into(),
            });
        }
        if response.sequence != sequence {
            return Err(ClientError::UnexpectedSequence {
                got: response.sequence,
                want: sequence,
            });
        }

        Ok(response_payload)
    }

    /// Send a request and wait for its State response.
    async fn query(
        &mut self,
        request_type: MessageType,
        response_type: MessageType,
        payload: &[u8],
    ) -> Result<Bytes> {
        self.round_trip(request_type, response_type, payload, true, false)
            .await
    }

    /// Perform an operation and wait for an acknowledgement.
    async fn command(&mut self, request_type: MessageType, payload: &[u8]) -> Result<()> {
        self.round_trip(
            request_type,
            MessageType::Acknowledgement,
            payload,
            false,
            true,
        )
        .await
        .map(|_| ())
    }

    /// Device power level (0 = off, 65535 = on).
    pub async fn get_power(&mut self) -> Result<u16> {
        let payload = self
            .query(MessageType::GetPower, MessageType::StatePower, &[])
            .await?;
        Ok(payload::decode_power_level("StatePower", &payload)?)
    }

    /// Light power level.
    pub async fn get_light_power(&mut self) -> Result<u16> {
        let payload = self
            .query(MessageType::GetLightPower, MessageType::StateLightPower, &[])
            .await?;
        Ok(payload::decode_power_level("StateLightPower", &payload)?)
    }

    /// Fade the light power to `level` over `duration`.
    pub async fn set_light_power(&mut self, level: u16, duration: Duration) -> Result<()> {
        let payload = payload::encode_set_light_power(level, duration)?;
        self.command(MessageType::SetLightPower, &payload).await
    }

    /// The device's user-assigned label.
    pub async fn get_label(&mut self) -> Result<String> {
        let payload = self
            .query(MessageType::GetLabel, MessageType::StateLabel, &[])
            .await?;
        Ok(payload::decode_state_label(&payload))
    }

    /// Vendor and product identifiers, for capability lookup.
    pub async fn get_version(&mut self) -> Result<(u32, u32)> {
        let payload = self
            .query(MessageType::GetVersion, MessageType::StateVersion, &[])
            .await?;
        Ok(payload::decode_state_version(&payload)?)
    }

    /// Firmware build and version, for capability upgrade gates.
    pub async fn get_host_firmware(&mut self) -> Result<HostFirmware> {
        let payload = self
            .query(MessageType::GetHostFirmware, MessageType::StateHostFirmware, &[])
            .await?;
        Ok(payload::decode_state_host_firmware(&payload)?)
    }

    /// Current color, power and label in one query.
    pub async fn get_color(&mut self) -> Result<LightState> {
        let payload = self
            .query(MessageType::GetColor, MessageType::LightState, &[])
            .await?;
        Ok(payload::decode_light_state(&payload)?)
    }

    /// Fade the whole device to `color` over `duration`.
    pub async fn set_color(&mut self, color: Hsbk, duration: Duration) -> Result<()> {
        let payload = payload::encode_set_color(color, duration)?;
        self.command(MessageType::SetColor, &payload).await
    }

    /// Run a waveform effect.
    pub async fn set_waveform(&mut self, cfg: &WaveformConfig) -> Result<()> {
        let payload = payload::encode_set_waveform(cfg)?;
        self.command(MessageType::SetWaveform, &payload).await
    }

    /// All zone colors of a multizone device.
    pub async fn get_extended_color_zones(&mut self) -> Result<Vec<Hsbk>> {
        let payload = self
            .query(
                MessageType::GetExtendedColorZones,
                MessageType::StateExtendedColorZones,
                &[],
            )
            .await?;
        Ok(payload::decode_state_extended_color_zones(&payload)?)
    }

    /// Set all zone colors, starting at zone 0, fading over `duration`.
    ///
    /// At most 82 zones fit one request; more is rejected before any
    /// packet is sent.
    pub async fn set_extended_color_zones(
        &mut self,
        duration: Duration,
        zones: &[Hsbk],
    ) -> Result<()> {
        let payload = payload::encode_set_extended_color_zones(duration, zones)?;
        self.command(MessageType::SetExtendedColorZones, &payload)
            .await
    }
}
