use core::future::poll_fn;
use core::sync::atomic::{AtomicU32, Ordering};
use core::task::Poll;

use embassy_sync::waitqueue::AtomicWaker;

/// Number of individually addressable HID sources, one event bit each
pub const MAX_NUM_OF_HID_SOURCES: usize = 31;

/// Event bit which tells the collector that the enabled sources changed
pub const SOURCES_CHANGED_EVENT: u32 = 1 << MAX_NUM_OF_HID_SOURCES;

/// Bitmask covering every addressable source
pub const ALL_SOURCES_MASK: u32 = SOURCES_CHANGED_EVENT - 1;

/// Multi-bit "data available" signal between the HID sources and the collector.
///
/// Bits 0..=30 are set by sources, bit 31 is set whenever the enabled mask
/// changes. Setting bits is safe from any context, including interrupts. Only
/// the collector waits and clears.
pub struct HidSignal {
    events: AtomicU32,
    enabled: AtomicU32,
    waker: AtomicWaker,
}

impl Default for HidSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl HidSignal {
    pub const fn new() -> Self {
        Self {
            events: AtomicU32::new(0),
            enabled: AtomicU32::new(ALL_SOURCES_MASK),
            waker: AtomicWaker::new(),
        }
    }

    /// Tell the collector that source `id` has data, out of range ids are ignored
    pub fn notify_data_available(&self, id: usize) {
        if id >= MAX_NUM_OF_HID_SOURCES {
            return;
        }
        self.post(1 << id);
    }

    pub fn is_source_enabled(&self, id: usize) -> bool {
        id < MAX_NUM_OF_HID_SOURCES && self.enabled.load(Ordering::Acquire) & (1 << id) != 0
    }

    /// Enable or disable source `id`, takes effect on the next wait of the collector
    pub fn set_source_enabled(&self, id: usize, enabled: bool) {
        if id >= MAX_NUM_OF_HID_SOURCES {
            return;
        }
        if enabled {
            self.enabled.fetch_or(1 << id, Ordering::AcqRel);
        } else {
            self.enabled.fetch_and(!(1 << id), Ordering::AcqRel);
        }
        self.post(SOURCES_CHANGED_EVENT);
    }

    /// Keep only the sources in `mask` enabled.
    ///
    /// Changes made before are preserved for the remaining sources.
    pub fn restrict_to(&self, mask: u32) {
        self.enabled.fetch_and(mask & ALL_SOURCES_MASK, Ordering::AcqRel);
    }

    pub fn enabled_mask(&self) -> u32 {
        self.enabled.load(Ordering::Acquire)
    }

    /// Currently set event bits, for diagnostics
    pub fn pending(&self) -> u32 {
        self.events.load(Ordering::Acquire)
    }

    /// Wait until at least one enabled source has data, returns the set event
    /// bits of the enabled sources.
    ///
    /// A change of the enabled mask alone never completes the wait, the mask
    /// change event is consumed and the wait restarts with the new mask. Events
    /// of disabled sources are kept until the source is enabled again.
    pub async fn wait_for_data(&self) -> u32 {
        poll_fn(|cx| {
            self.waker.register(cx.waker());
            loop {
                let mask = self.enabled.load(Ordering::Acquire) | SOURCES_CHANGED_EVENT;
                let events = self.events.load(Ordering::Acquire) & mask;
                if events == 0 {
                    return Poll::Pending;
                }
                if events & SOURCES_CHANGED_EVENT != 0 {
                    self.events.fetch_and(!SOURCES_CHANGED_EVENT, Ordering::AcqRel);
                    continue;
                }
                return Poll::Ready(events);
            }
        })
        .await
    }

    /// Clear observed event bits
    pub fn clear(&self, mask: u32) {
        self.events.fetch_and(!mask, Ordering::AcqRel);
    }

    fn post(&self, bits: u32) {
        self.events.fetch_or(bits, Ordering::AcqRel);
        self.waker.wake();
    }
}
