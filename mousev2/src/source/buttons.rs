use crate::MouseReport;
use crate::debounce::{Debouncer, EdgeCallback};
use crate::gpio::EdgeInterrupt;
use crate::hid::{HidSignal, HidSource, SourceSlot};
use crate::toggle_queue::ToggleQueue;

/// Physical buttons, debounced.
///
/// Every button has its own toggle queue, so no press or release is lost even
/// if the collector is slower than the edges. The pin at index 0 is the left
/// button, 1 the right and 2 the middle one. Buttons are active low.
pub struct ButtonsSource<'a, const N: usize> {
    slot: SourceSlot<'a>,
    pins: [u8; N],
    queues: [ToggleQueue; N],
}

impl<'a, const N: usize> ButtonsSource<'a, N> {
    pub const fn new(signal: &'a HidSignal, pins: [u8; N]) -> Self {
        Self {
            slot: SourceSlot::new(signal),
            pins,
            queues: [const { ToggleQueue::new(false) }; N],
        }
    }

    /// Load the current button states and install the debounced edge callbacks
    pub fn init<E: EdgeInterrupt, const SLOTS: usize>(&'a self, debouncer: &Debouncer<'a, E, SLOTS>) {
        for (pin, queue) in self.pins.iter().zip(self.queues.iter()) {
            queue.reset(!debouncer.edges().read_level(*pin));
            debouncer.set_edge_callback(*pin, self);
        }
    }

    fn queue_for_pin(&self, pin: u8) -> Option<&ToggleQueue> {
        self.pins.iter().position(|p| *p == pin).map(|i| &self.queues[i])
    }
}

impl<const N: usize> EdgeCallback for ButtonsSource<'_, N> {
    fn on_edge(&self, pin: u8, level: bool) {
        let Some(queue) = self.queue_for_pin(pin) else {
            return;
        };
        // Active low
        if queue.put(!level).is_err() {
            warn!("Can't put level {} into queue for pin {}", level, pin);
            return;
        }
        self.slot.notify();
    }
}

impl<const N: usize> HidSource for ButtonsSource<'_, N> {
    fn name(&self) -> &'static str {
        "buttons"
    }

    fn slot(&self) -> &SourceSlot<'_> {
        &self.slot
    }

    fn fill_report(&self, report: &mut MouseReport) {
        for (index, queue) in self.queues.iter().enumerate() {
            report.buttons.set_button(index, queue.get_or_last());
        }
        // Edges which arrived faster than the collector are reported one by one
        if self.queues.iter().any(|q| !q.is_empty()) {
            self.slot.notify();
        }
    }
}

#[cfg(test)]
mod test {
    use core::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::config::DebounceConfig;
    use crate::hid::HidSourceRegistry;
    use crate::MouseButtons;

    #[derive(Default)]
    struct TestEdges {
        levels: AtomicU32,
    }

    impl EdgeInterrupt for TestEdges {
        fn arm_one_shot(&self, _pin: u8, _sense_level: bool) {}

        fn disarm(&self, _pin: u8) {}

        fn read_level(&self, pin: u8) -> bool {
            self.levels.load(Ordering::Relaxed) & (1 << pin) != 0
        }
    }

    #[test]
    fn test_initial_levels_and_edges() {
        // Left released (high), right pressed (low), middle released
        let edges = TestEdges {
            levels: AtomicU32::new((1 << 4) | (1 << 6)),
        };
        let signal = HidSignal::new();
        let buttons = ButtonsSource::new(&signal, [4, 5, 6]);
        let sources: [&dyn HidSource; 1] = [&buttons];
        let _registry = HidSourceRegistry::new(&signal, &sources);
        let debouncer: Debouncer<'_, _, 4> = Debouncer::new(&edges, DebounceConfig::default());
        buttons.init(&debouncer);

        let mut report = MouseReport::new();
        buttons.fill_report(&mut report);
        assert_eq!(report.buttons, MouseButtons::RIGHT);
        assert_eq!(signal.pending(), 0);

        // Press left
        debouncer.on_edge(4, false);
        assert_eq!(signal.pending(), 1);
        buttons.fill_report(&mut report);
        assert_eq!(report.buttons, MouseButtons::LEFT | MouseButtons::RIGHT);
    }

    #[test]
    fn test_coalesced_edges_are_reported_one_by_one() {
        let edges = TestEdges {
            levels: AtomicU32::new(u32::MAX),
        };
        let signal = HidSignal::new();
        let buttons = ButtonsSource::new(&signal, [0, 1, 2]);
        let sources: [&dyn HidSource; 1] = [&buttons];
        let _registry = HidSourceRegistry::new(&signal, &sources);
        let debouncer: Debouncer<'_, _, 4> = Debouncer::new(&edges, DebounceConfig::default());
        buttons.init(&debouncer);

        // Press and release before the collector runs
        buttons.on_edge(0, false);
        buttons.on_edge(0, true);
        signal.clear(u32::MAX);

        let mut report = MouseReport::new();
        buttons.fill_report(&mut report);
        assert!(report.buttons.left());
        // The release is still queued
        assert_eq!(signal.pending(), 1);

        signal.clear(u32::MAX);
        buttons.fill_report(&mut report);
        assert!(!report.buttons.left());
        assert_eq!(signal.pending(), 0);
    }

    #[test]
    fn test_repeated_level_is_dropped() {
        let signal = HidSignal::new();
        let buttons = ButtonsSource::new(&signal, [0]);
        let sources: [&dyn HidSource; 1] = [&buttons];
        let _registry = HidSourceRegistry::new(&signal, &sources);

        // Queue starts released, a release edge is invalid
        buttons.on_edge(0, true);
        assert_eq!(signal.pending(), 0);
        // Unknown pin
        buttons.on_edge(9, false);
        assert_eq!(signal.pending(), 0);
    }
}
