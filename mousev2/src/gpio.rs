//! One-shot GPIO edge sensing.
//!
//! Port-wide "any edge" detection (like the nRF GPIO `SENSE` mechanism) is
//! level-sensitive: a pin is configured to sense the level opposite to its
//! current one, and keeps triggering until its sense is disabled. Therefore
//! every detected edge disconnects the pin, and the pin stays silent until it's
//! armed again.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;

use crate::RawMutex;

/// Number of pins of a port
pub const NUM_PINS: u8 = 32;

/// Level sensing configuration of a pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sense {
    Disabled,
    /// Trigger when the pin reads high
    High,
    /// Trigger when the pin reads low
    Low,
}

/// Hardware surface of a GPIO port with level sensing
pub trait PortSense {
    /// Configure level sensing of `pin`
    fn set_sense(&self, pin: u8, sense: Sense);

    /// Read the levels of all pins, bit `n` is the level of pin `n`
    fn read_port(&self) -> u32;
}

/// One-shot edge interrupt of a single pin
pub trait EdgeInterrupt {
    /// Arm the next edge of `pin`. `sense_level` is the level the pin is
    /// considered to be at, the opposite level triggers.
    fn arm_one_shot(&self, pin: u8, sense_level: bool);

    /// Disconnect `pin`
    fn disarm(&self, pin: u8);

    /// Read the current level of `pin`
    fn read_level(&self, pin: u8) -> bool;
}

#[derive(Default)]
struct EdgeState {
    /// Pins with an armed edge
    armed: u32,
    /// Levels the armed pins were armed at
    from_level: u32,
}

/// [`EdgeInterrupt`] over a port with level sensing.
///
/// The port interrupt handler must call [`OneShotEdges::on_port_event`].
pub struct OneShotEdges<P: PortSense> {
    port: P,
    state: Mutex<RawMutex, RefCell<EdgeState>>,
}

impl<P: PortSense> OneShotEdges<P> {
    pub const fn new(port: P) -> Self {
        Self {
            port,
            state: Mutex::new(RefCell::new(EdgeState { armed: 0, from_level: 0 })),
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Bitmask of pins which are armed
    pub fn armed_mask(&self) -> u32 {
        self.state.lock(|s| s.borrow().armed)
    }

    pub fn is_armed(&self, pin: u8) -> bool {
        pin < NUM_PINS && self.armed_mask() & (1 << pin) != 0
    }

    /// Handle a port event.
    ///
    /// Every armed pin whose level differs from the level it was armed at is
    /// disarmed, then `f(pin, level)` is called for each of them in ascending
    /// pin order.
    pub fn on_port_event(&self, mut f: impl FnMut(u8, bool)) {
        let levels = self.port.read_port();
        let triggered = self.state.lock(|s| {
            let mut s = s.borrow_mut();
            let triggered = (levels ^ s.from_level) & s.armed;
            s.armed &= !triggered;
            triggered
        });

        for pin in BitIter(triggered) {
            self.port.set_sense(pin, Sense::Disabled);
        }
        for pin in BitIter(triggered) {
            f(pin, levels & (1 << pin) != 0);
        }
    }
}

impl<P: PortSense> EdgeInterrupt for OneShotEdges<P> {
    fn arm_one_shot(&self, pin: u8, sense_level: bool) {
        if pin >= NUM_PINS {
            return;
        }
        let bit = 1 << pin;
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            s.armed |= bit;
            if sense_level {
                s.from_level |= bit;
            } else {
                s.from_level &= !bit;
            }
            self.port
                .set_sense(pin, if sense_level { Sense::Low } else { Sense::High });
        });
    }

    fn disarm(&self, pin: u8) {
        if pin >= NUM_PINS {
            return;
        }
        self.state.lock(|s| {
            s.borrow_mut().armed &= !(1 << pin);
            self.port.set_sense(pin, Sense::Disabled);
        });
    }

    fn read_level(&self, pin: u8) -> bool {
        pin < NUM_PINS && self.port.read_port() & (1 << pin) != 0
    }
}

/// Iterator over the set bits of a mask, lowest first
pub(crate) struct BitIter(pub(crate) u32);

impl Iterator for BitIter {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        let pos = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(pos as u8)
    }
}
