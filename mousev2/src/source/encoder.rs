use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;

use crate::hid::{HidSignal, HidSource, SourceSlot};
use crate::types::report::WHEEL_DELTA_MAX;
use crate::{MouseReport, RawMutex};

#[derive(Default)]
struct EncoderState {
    /// Ticks not yet converted into wheel steps
    acc: i32,
    /// Wheel steps not yet reported
    delta: i32,
}

/// Scroll wheel on a quadrature encoder.
///
/// The encoder produces two ticks per detent, so a wheel step is reported for
/// every second tick.
pub struct EncoderSource<'a> {
    slot: SourceSlot<'a>,
    state: Mutex<RawMutex, RefCell<EncoderState>>,
}

impl<'a> EncoderSource<'a> {
    pub const fn new(signal: &'a HidSignal) -> Self {
        Self {
            slot: SourceSlot::new(signal),
            state: Mutex::new(RefCell::new(EncoderState { acc: 0, delta: 0 })),
        }
    }

    /// Feed ticks from the quadrature decoder, safe to call from interrupt context
    pub fn on_ticks(&self, value: i32) {
        let step = self.state.lock(|s| {
            let mut s = s.borrow_mut();
            s.acc = s.acc.saturating_add(value);
            let step = s.acc / 2;
            s.acc %= 2;
            s.delta = s.delta.saturating_add(step);
            step
        });
        if step != 0 {
            self.slot.notify();
        }
    }
}

impl HidSource for EncoderSource<'_> {
    fn name(&self) -> &'static str {
        "encoder"
    }

    fn slot(&self) -> &SourceSlot<'_> {
        &self.slot
    }

    /// Steps beyond what one report can carry stay pending for the next cycle
    fn fill_report(&self, report: &mut MouseReport) {
        let max = WHEEL_DELTA_MAX as i32;
        let (step, remaining) = self.state.lock(|s| {
            let mut s = s.borrow_mut();
            let step = s.delta.clamp(-max, max);
            s.delta -= step;
            (step, s.delta)
        });
        report.set_wheel(step);
        if remaining != 0 {
            self.slot.notify();
        }
    }
}
