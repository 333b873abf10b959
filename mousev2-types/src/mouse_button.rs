//! Mouse button state.
//!
//! The report carries three physical buttons in the low bits of a byte, the
//! remaining five bits are padding required by the report descriptor.
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

use bitfield_struct::bitfield;

/// Mouse buttons
#[bitfield(u8, order = Lsb, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq)]

pub struct MouseButtons {
    #[bits(1)]
    pub left: bool,
    #[bits(1)]
    pub right: bool,
    #[bits(1)]
    pub middle: bool,
    #[bits(5)]
    __: u8,
}

impl BitOr for MouseButtons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() | rhs.into_bits())
    }
}
impl BitAnd for MouseButtons {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() & rhs.into_bits())
    }
}
impl BitAndAssign for MouseButtons {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}
impl BitOrAssign for MouseButtons {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl MouseButtons {
    pub const LEFT: Self = Self::new().with_left(true);
    pub const RIGHT: Self = Self::new().with_right(true);
    pub const MIDDLE: Self = Self::new().with_middle(true);

    /// Number of physical buttons carried by the report
    pub const COUNT: usize = 3;

    /// Set the button at `index` (0 = left, 1 = right, 2 = middle).
    ///
    /// Indices beyond the physical buttons are ignored.
    pub fn set_button(&mut self, index: usize, pressed: bool) {
        match index {
            0 => self.set_left(pressed),
            1 => self.set_right(pressed),
            2 => self.set_middle(pressed),
            _ => {}
        }
    }

    /// Read the button at `index`, `false` for unknown indices
    pub fn button(&self, index: usize) -> bool {
        match index {
            0 => self.left(),
            1 => self.right(),
            2 => self.middle(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_button_bits() {
        assert_eq!(MouseButtons::LEFT.into_bits(), 0b001);
        assert_eq!(MouseButtons::RIGHT.into_bits(), 0b010);
        assert_eq!(MouseButtons::MIDDLE.into_bits(), 0b100);
        assert_eq!((MouseButtons::LEFT | MouseButtons::MIDDLE).into_bits(), 0b101);
    }

    #[test]
    fn test_set_button_by_index() {
        let mut buttons = MouseButtons::new();
        buttons.set_button(1, true);
        assert!(buttons.right());
        assert!(buttons.button(1));
        buttons.set_button(7, true);
        assert_eq!(buttons.into_bits(), 0b010);
        buttons.set_button(1, false);
        assert_eq!(buttons, MouseButtons::new());
    }
}
