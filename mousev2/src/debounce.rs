//! Debounce service.
//!
//! Turns one-shot GPIO edges into debounced level changes with zero detection
//! latency. The callback of a pin runs on the very first edge, then the pin
//! stays disconnected for a while and bouncing is ignored.
//!
//! Re-arm requests travel through a shift array which is rotated by one slot
//! every timer period T:
//!
//! ```text
//!   +--------+    +--------+           +--------+
//!   | slot 0 | << | slot 1 | << ... << | slot N |
//!   +--------+    +--------+           +--------+
//! ```
//!
//! An edge puts a request for its pin into slot N. Pins which reach slot 0
//! after a rotation are armed again. The timer runs only while requests are
//! pending, so the debounce time lies within `[T*(N-1), T*N]` depending on the
//! phase of the timer.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};

use crate::config::DebounceConfig;
use crate::gpio::{BitIter, EdgeInterrupt, NUM_PINS};
use crate::{DEBOUNCE_NUM_SHIFTS, RawMutex};

/// Receiver of debounced edges
pub trait EdgeCallback: Sync {
    /// Called with the new level of `pin`, possibly from interrupt context
    fn on_edge(&self, pin: u8, level: bool);
}

/// Debouncer with the number of stages configured in `mouse.toml`
pub type DefaultDebouncer<'a, E> = Debouncer<'a, E, { DEBOUNCE_NUM_SHIFTS + 1 }>;

struct ShiftArray<const SLOTS: usize> {
    slots: [u32; SLOTS],
    /// Physical index of slot 0
    head: usize,
    /// Rotations left until every pending request is served
    moves_left: usize,
    timer_running: bool,
    /// Last level reported to the callback of each pin
    levels: u32,
}

impl<const SLOTS: usize> ShiftArray<SLOTS> {
    const fn new() -> Self {
        Self {
            slots: [0; SLOTS],
            head: 0,
            moves_left: 0,
            timer_running: false,
            levels: 0,
        }
    }

    fn physical(&self, index: usize) -> usize {
        (self.head + index) % SLOTS
    }

    fn cancel(&mut self, mask: u32) {
        self.slots.iter_mut().for_each(|slot| *slot &= !mask);
    }

    fn pending(&self) -> u32 {
        self.slots.iter().fold(0, |acc, slot| acc | slot)
    }
}

/// Debounce service over an [`EdgeInterrupt`].
///
/// `SLOTS` is the size of the shift array, i.e. the number of debounce stages
/// plus one.
pub struct Debouncer<'a, E: EdgeInterrupt, const SLOTS: usize> {
    edges: &'a E,
    period: Duration,
    state: Mutex<RawMutex, RefCell<ShiftArray<SLOTS>>>,
    callbacks: Mutex<RawMutex, RefCell<[Option<&'a dyn EdgeCallback>; NUM_PINS as usize]>>,
    timer_start: Signal<RawMutex, ()>,
}

impl<'a, E: EdgeInterrupt, const SLOTS: usize> Debouncer<'a, E, SLOTS> {
    pub fn new(edges: &'a E, config: DebounceConfig) -> Self {
        const { assert!(SLOTS >= 2 && SLOTS <= 32, "debounce stages must be within 1..=31") };
        Self {
            edges,
            period: config.period,
            state: Mutex::new(RefCell::new(ShiftArray::new())),
            callbacks: Mutex::new(RefCell::new([None; NUM_PINS as usize])),
            timer_start: Signal::new(),
        }
    }

    /// Number of debounce stages (N)
    pub const fn stages(&self) -> usize {
        SLOTS - 1
    }

    pub fn edges(&self) -> &'a E {
        self.edges
    }

    /// Install `callback` for `pin` and arm its next edge.
    ///
    /// A re-arm which is still pending for the pin is cancelled.
    pub fn set_edge_callback(&self, pin: u8, callback: &'a dyn EdgeCallback) {
        if pin >= NUM_PINS {
            warn!("Pin {} can't be debounced", pin);
            return;
        }
        self.callbacks.lock(|c| c.borrow_mut()[pin as usize] = Some(callback));
        let level = self.edges.read_level(pin);
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            s.cancel(1 << pin);
            if level {
                s.levels |= 1 << pin;
            } else {
                s.levels &= !(1 << pin);
            }
            self.edges.arm_one_shot(pin, level);
        });
    }

    /// Disconnect `pin` and cancel its pending re-arm
    pub fn unset_edge_callback(&self, pin: u8) {
        if pin >= NUM_PINS {
            return;
        }
        self.state.lock(|s| {
            self.edges.disarm(pin);
            s.borrow_mut().cancel(1 << pin);
        });
        self.callbacks.lock(|c| c.borrow_mut()[pin as usize] = None);
    }

    /// Handle an edge reported by the one-shot interrupt.
    ///
    /// Schedules the re-arm of `pin` N timer periods ahead, starts the timer if
    /// it's idle, then runs the callback of the pin.
    pub fn on_edge(&self, pin: u8, level: bool) {
        if pin >= NUM_PINS {
            return;
        }
        let start_timer = self.state.lock(|s| {
            let mut s = s.borrow_mut();
            s.cancel(1 << pin);
            let tail = s.physical(SLOTS - 1);
            s.slots[tail] |= 1 << pin;
            s.moves_left = SLOTS - 1;
            if level {
                s.levels |= 1 << pin;
            } else {
                s.levels &= !(1 << pin);
            }
            let idle = !s.timer_running;
            s.timer_running = true;
            idle
        });
        if start_timer {
            trace!("Debounce timer started by pin {}", pin);
            self.timer_start.signal(());
        }

        if let Some(callback) = self.callbacks.lock(|c| c.borrow()[pin as usize]) {
            callback.on_edge(pin, level);
        }
    }

    /// One timer period: rotate the shift array and arm the pins which reached
    /// slot 0.
    ///
    /// Returns whether the timer must keep running.
    pub fn tick(&self) -> bool {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            if s.moves_left == 0 {
                s.timer_running = false;
                return false;
            }
            s.head = s.physical(1);
            let head = s.head;
            let rearm = s.slots[head];
            s.slots[head] = 0;
            for pin in BitIter(rearm) {
                // Arm at the last reported level, so a change which happened
                // during the debounce time triggers right away
                self.edges.arm_one_shot(pin, s.levels & (1 << pin) != 0);
            }
            s.moves_left -= 1;
            if s.moves_left == 0 {
                s.timer_running = false;
                trace!("Debounce timer stopped");
            }
            s.timer_running
        })
    }

    /// Debounce timer task.
    ///
    /// Sleeps until an edge starts the timer, then ticks every period until no
    /// re-arm is pending.
    pub async fn run(&self) {
        loop {
            self.timer_start.wait().await;
            let mut ticker = Ticker::every(self.period);
            loop {
                ticker.next().await;
                if !self.tick() {
                    break;
                }
            }
        }
    }

    /// Whether a re-arm of `pin` is scheduled
    pub fn is_pending(&self, pin: u8) -> bool {
        pin < NUM_PINS && self.state.lock(|s| s.borrow().pending() & (1 << pin) != 0)
    }

    pub fn timer_running(&self) -> bool {
        self.state.lock(|s| s.borrow().timer_running)
    }
}
