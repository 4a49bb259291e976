//! Payload builders and parsers
//!
//! One function per message payload the client sends or consumes. The
//! builders validate caller input (durations, zone counts) before any
//! bytes exist, so misuse never reaches the network.

use std::time::Duration;

use bytes::{Buf, BufMut};

use crate::color::{Hsbk, HSBK_SIZE};
use crate::error::{ProtoError, Result};
use crate::{MAX_EXTENDED_ZONES, SERVICE_UDP};

/// Convert a duration to the wire's u32 millisecond field.
pub fn duration_millis(d: Duration) -> Result<u32> {
    u32::try_from(d.as_millis()).map_err(|_| ProtoError::DurationOutOfRange(d))
}

/// A StateService advertisement: service identifier plus port.
///
/// The port is carried as a u32 on the wire even though only 16-bit
/// values are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceAdvert {
    pub service: u8,
    pub port: u32,
}

impl ServiceAdvert {
    /// Whether this advertises the UDP service on a usable port.
    pub fn udp_port(&self) -> Option<u16> {
        if self.service != SERVICE_UDP {
            return None;
        }
        u16::try_from(self.port).ok()
    }
}

/// Parse a StateService payload (exactly 5 bytes).
pub fn decode_state_service(payload: &[u8]) -> Result<ServiceAdvert> {
    if payload.len() != 5 {
        return Err(ProtoError::MalformedPayload {
            what: "StateService",
            len: payload.len(),
        });
    }
    Ok(ServiceAdvert {
        service: payload[0],
        port: u32::from_le_bytes(payload[1..5].try_into().unwrap()),
    })
}

/// Parse a StatePower or StateLightPower payload (a single u16 level).
pub fn decode_power_level(what: &'static str, payload: &[u8]) -> Result<u16> {
    if payload.len() != 2 {
        return Err(ProtoError::MalformedPayload {
            what,
            len: payload.len(),
        });
    }
    Ok(u16::from_le_bytes([payload[0], payload[1]]))
}

/// Build a SetLightPower payload.
pub fn encode_set_light_power(level: u16, duration: Duration) -> Result<Vec<u8>> {
    let millis = duration_millis(duration)?;
    let mut payload = Vec::with_capacity(6);
    payload.put_u16_le(level);
    payload.put_u32_le(millis);
    Ok(payload)
}

/// Parse a StateLabel payload, ignoring trailing NUL padding.
pub fn decode_state_label(payload: &[u8]) -> String {
    let end = payload
        .iter()
        .rposition(|&b| b != 0x00)
        .map_or(0, |i| i + 1);
    String::from_utf8_lossy(&payload[..end]).into_owned()
}

/// Parse a StateVersion payload into (vendor, product) identifiers.
pub fn decode_state_version(payload: &[u8]) -> Result<(u32, u32)> {
    if payload.len() != 12 {
        return Err(ProtoError::MalformedPayload {
            what: "StateVersion",
            len: payload.len(),
        });
    }
    let vendor = u32::from_le_bytes(payload[0..4].try_into().unwrap());
    let product = u32::from_le_bytes(payload[4..8].try_into().unwrap());
    Ok((vendor, product))
}

/// Device firmware identity from StateHostFirmware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostFirmware {
    /// Build timestamp, nanoseconds since epoch.
    pub build: u64,
    pub minor: u16,
    pub major: u16,
}

/// Parse a StateHostFirmware payload (exactly 20 bytes).
pub fn decode_state_host_firmware(payload: &[u8]) -> Result<HostFirmware> {
    if payload.len() != 20 {
        return Err(ProtoError::MalformedPayload {
            what: "StateHostFirmware",
            len: payload.len(),
        });
    }
    let mut buf = payload;
    let build = buf.get_u64_le();
    buf.advance(8); // reserved
    let minor = buf.get_u16_le();
    let major = buf.get_u16_le();
    Ok(HostFirmware {
        build,
        minor,
        major,
    })
}

/// Build a SetColor payload.
pub fn encode_set_color(color: Hsbk, duration: Duration) -> Result<Vec<u8>> {
    let millis = duration_millis(duration)?;
    let mut payload = Vec::with_capacity(13);
    payload.put_u8(0); // reserved
    color.write_to(&mut payload);
    payload.put_u32_le(millis);
    Ok(payload)
}

/// Full light state from a LightState response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightState {
    pub color: Hsbk,
    pub power: u16,
    pub label: String,
}

/// Parse a LightState payload (exactly 52 bytes).
pub fn decode_light_state(payload: &[u8]) -> Result<LightState> {
    if payload.len() != 52 {
        return Err(ProtoError::MalformedPayload {
            what: "LightState",
            len: payload.len(),
        });
    }
    let mut buf = payload;
    let color = Hsbk::read_from(&mut buf);
    buf.advance(2); // reserved
    let power = buf.get_u16_le();
    let label = decode_state_label(&buf[..32]);
    Ok(LightState {
        color,
        power,
        label,
    })
}

/// Waveform shapes for SetWaveform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Waveform {
    Saw = 0,
    #[default]
    Sine = 1,
    HalfSine = 2,
    Triangle = 3,
    Pulse = 4,
}

/// Parameters for a SetWaveform command.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveformConfig {
    pub waveform: Waveform,
    /// Return to the previous color when the waveform finishes.
    pub transient: bool,
    pub color: Hsbk,
    /// Duration of one cycle.
    pub period: Duration,
    pub cycles: f32,
}

/// Build a SetWaveform payload (21 bytes).
pub fn encode_set_waveform(cfg: &WaveformConfig) -> Result<Vec<u8>> {
    let period = duration_millis(cfg.period)?;
    let mut payload = Vec::with_capacity(21);
    payload.put_u8(0); // reserved
    payload.put_u8(cfg.transient as u8);
    cfg.color.write_to(&mut payload);
    payload.put_u32_le(period);
    payload.put_f32_le(cfg.cycles);
    payload.put_i16_le(0); // skew_ratio; 0 encodes 0.5, only used for Pulse
    payload.put_u8(cfg.waveform as u8);
    Ok(payload)
}

/// Build a SetExtendedColorZones payload.
///
/// Always addresses the strip from zone 0 with the APPLY flag set.
/// Rejects more than [`MAX_EXTENDED_ZONES`] zones before any bytes are
/// produced.
pub fn encode_set_extended_color_zones(duration: Duration, zones: &[Hsbk]) -> Result<Vec<u8>> {
    if zones.len() > MAX_EXTENDED_ZONES {
        return Err(ProtoError::TooManyZones(zones.len()));
    }
    let millis = duration_millis(duration)?;

    let mut payload = Vec::with_capacity(8 + zones.len() * HSBK_SIZE);
    payload.put_u32_le(millis);
    payload.put_u8(1); // apply: MultiZoneExtendedApplicationRequest(APPLY)
    payload.put_u16_le(0); // zone_index
    payload.put_u8(zones.len() as u8);
    for zone in zones {
        zone.write_to(&mut payload);
    }
    Ok(payload)
}

/// Parse a StateExtendedColorZones payload into the full zone list.
///
/// Partial replies (first index != 0, or zone count != colors count) would
/// need multi-packet reassembly and are rejected.
pub fn decode_state_extended_color_zones(payload: &[u8]) -> Result<Vec<Hsbk>> {
    if payload.len() < 5 {
        return Err(ProtoError::MalformedPayload {
            what: "StateExtendedColorZones",
            len: payload.len(),
        });
    }
    let zones = u16::from_le_bytes([payload[0], payload[1]]);
    let index = u16::from_le_bytes([payload[2], payload[3]]);
    let colors = payload[4];

    let mut buf = &payload[5..];
    if buf.len() < colors as usize * HSBK_SIZE {
        return Err(ProtoError::MalformedPayload {
            what: "StateExtendedColorZones",
            len: payload.len(),
        });
    }
    if zones != colors as u16 || index != 0 {
        return Err(ProtoError::PartialZoneState {
            zones,
            index,
            colors,
        });
    }

    Ok((0..colors).map(|_| Hsbk::read_from(&mut buf)).collect())
}
