//! The mouse HID report.
//!
//! Wire layout (report id excluded), 40 bits in total:
//!
//! | byte | content                              |
//! | ---- | ------------------------------------ |
//! | 0    | buttons, bit 0 left, 1 right, 2 middle |
//! | 1    | wheel delta, `i8`                      |
//! | 2    | X\[7:0\]                               |
//! | 3    | Y\[3:0\] << 4 \| X\[11:8\]             |
//! | 4    | Y\[11:4\]                              |
//!
//! X and Y are 12-bit two's complement values.
use crate::mouse_button::MouseButtons;

/// Size of a serialized [`MouseReport`] in bytes
pub const MOUSE_REPORT_SIZE: usize = 5;

/// Largest magnitude of a motion delta that fits the 12-bit fields
pub const MOTION_DELTA_MAX: i16 = 2047;

/// Largest magnitude of the wheel delta accepted by the descriptor
pub const WHEEL_DELTA_MAX: i8 = 127;

/// Bitmask of report bytes which carry level data.
///
/// Only the button byte is persistent, every other byte holds a delta which is
/// consumed by a single delivery.
pub const PERSISTENT_BYTES_MASK: u8 = 0b0000_0001;

/// Aggregated pointer state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// Current button levels, persistent
    pub buttons: MouseButtons,
    /// Wheel movement since the last delivery
    pub wheel_delta: i8,
    /// X movement since the last delivery, limited to ±2047
    pub x_delta: i16,
    /// Y movement since the last delivery, limited to ±2047
    pub y_delta: i16,
}

impl MouseReport {
    pub const fn new() -> Self {
        Self {
            buttons: MouseButtons::new(),
            wheel_delta: 0,
            x_delta: 0,
            y_delta: 0,
        }
    }

    /// Set the motion deltas, saturating at the 12-bit range
    pub fn set_motion(&mut self, x: i32, y: i32) {
        self.x_delta = clamp_motion(x);
        self.y_delta = clamp_motion(y);
    }

    /// Set the wheel delta, saturating at the descriptor range
    pub fn set_wheel(&mut self, delta: i32) {
        self.wheel_delta = delta.clamp(-(WHEEL_DELTA_MAX as i32), WHEEL_DELTA_MAX as i32) as i8;
    }

    /// Reset every field which represents an accumulation since the last delivery.
    ///
    /// Button levels are kept.
    pub fn clear_non_persistent(&mut self) {
        let mut bytes = self.to_bytes();
        for (i, byte) in bytes.iter_mut().enumerate() {
            if (PERSISTENT_BYTES_MASK >> i) & 1 == 0 {
                *byte = 0;
            }
        }
        *self = Self::decode(&bytes);
    }

    /// No button is held and nothing moved
    pub fn is_idle(&self) -> bool {
        self.buttons.into_bits() == 0 && self.wheel_delta == 0 && self.x_delta == 0 && self.y_delta == 0
    }

    /// Encode the report into its wire layout
    pub fn to_bytes(&self) -> [u8; MOUSE_REPORT_SIZE] {
        let x = (clamp_motion(self.x_delta as i32) as u16) & 0x0FFF;
        let y = (clamp_motion(self.y_delta as i32) as u16) & 0x0FFF;
        [
            self.buttons.into_bits(),
            self.wheel_delta as u8,
            (x & 0xFF) as u8,
            ((x >> 8) as u8 & 0x0F) | (((y & 0x0F) as u8) << 4),
            (y >> 4) as u8,
        ]
    }

    /// Serialize the report into `buf`, returns the number of bytes written or 0
    /// if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < MOUSE_REPORT_SIZE {
            return 0;
        }
        buf[..MOUSE_REPORT_SIZE].copy_from_slice(&self.to_bytes());
        MOUSE_REPORT_SIZE
    }

    /// Parse a report from its wire layout, extra trailing bytes are ignored
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let bytes: &[u8; MOUSE_REPORT_SIZE] = data.get(..MOUSE_REPORT_SIZE)?.try_into().ok()?;
        Some(Self::decode(bytes))
    }

    fn decode(bytes: &[u8; MOUSE_REPORT_SIZE]) -> Self {
        let x = bytes[2] as u16 | ((bytes[3] as u16 & 0x0F) << 8);
        let y = (bytes[3] as u16 >> 4) | ((bytes[4] as u16) << 4);
        Self {
            buttons: MouseButtons::from_bits(bytes[0]),
            wheel_delta: bytes[1] as i8,
            x_delta: sign_extend_12(x),
            y_delta: sign_extend_12(y),
        }
    }
}

fn clamp_motion(value: i32) -> i16 {
    value.clamp(-(MOTION_DELTA_MAX as i32), MOTION_DELTA_MAX as i32) as i16
}

fn sign_extend_12(value: u16) -> i16 {
    if value & 0x800 != 0 {
        (value & 0x7FF) as i16 - 0x800
    } else {
        value as i16
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wire_layout() {
        let report = MouseReport {
            buttons: MouseButtons::LEFT | MouseButtons::MIDDLE,
            wheel_delta: -1,
            x_delta: 0x123,
            y_delta: 0x456,
        };
        assert_eq!(report.to_bytes(), [0b101, 0xFF, 0x23, 0x61, 0x45]);
    }

    #[test]
    fn test_negative_motion_packing() {
        let report = MouseReport {
            x_delta: -1,
            y_delta: -2047,
            ..Default::default()
        };
        // -1 = 0xFFF, -2047 = 0x801
        assert_eq!(report.to_bytes(), [0x00, 0x00, 0xFF, 0x1F, 0x80]);
        assert_eq!(MouseReport::from_bytes(&report.to_bytes()), Some(report));
    }

    #[test]
    fn test_motion_saturates() {
        let mut report = MouseReport::new();
        report.set_motion(5000, -5000);
        assert_eq!(report.x_delta, 2047);
        assert_eq!(report.y_delta, -2047);
        report.set_wheel(-300);
        assert_eq!(report.wheel_delta, -127);
    }

    #[test]
    fn test_clear_non_persistent_keeps_buttons() {
        let mut report = MouseReport {
            buttons: MouseButtons::RIGHT,
            wheel_delta: 3,
            x_delta: -20,
            y_delta: 15,
        };
        report.clear_non_persistent();
        assert_eq!(report.buttons, MouseButtons::RIGHT);
        assert_eq!(report.wheel_delta, 0);
        assert_eq!(report.x_delta, 0);
        assert_eq!(report.y_delta, 0);
        assert!(!report.is_idle());
    }

    #[test]
    fn test_serialize_buffer_too_small() {
        let report = MouseReport::new();
        let mut buf = [0u8; 4];
        assert_eq!(report.serialize(&mut buf), 0);
        assert!(MouseReport::from_bytes(&buf).is_none());
        let mut buf = [0xAAu8; 6];
        assert_eq!(report.serialize(&mut buf), MOUSE_REPORT_SIZE);
        assert_eq!(buf, [0, 0, 0, 0, 0, 0xAA]);
    }
}
