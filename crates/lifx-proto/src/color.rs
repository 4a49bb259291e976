//! HSBK color encoding
//!
//! <https://lan.developer.lifx.com/docs/field-types#color>

use bytes::{Buf, BufMut};

/// A single HSBK value: four u16 fields, little-endian on the wire.
///
/// Hue, saturation and brightness are fixed-point over the full u16
/// range; kelvin is the color temperature and only meaningful when
/// saturation is low.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hsbk {
    pub hue: u16,
    pub saturation: u16,
    pub brightness: u16,
    pub kelvin: u16,
}

/// Encoded size of one HSBK record.
pub const HSBK_SIZE: usize = 8;

impl Hsbk {
    pub fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u16_le(self.hue);
        buf.put_u16_le(self.saturation);
        buf.put_u16_le(self.brightness);
        buf.put_u16_le(self.kelvin);
    }

    /// Read one record; the caller must ensure 8 bytes remain.
    pub fn read_from(buf: &mut impl Buf) -> Self {
        Hsbk {
            hue: buf.get_u16_le(),
            saturation: buf.get_u16_le(),
            brightness: buf.get_u16_le(),
            kelvin: buf.get_u16_le(),
        }
    }
}
