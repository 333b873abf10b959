//! HID sources and their registry.
//!
//! A source is an independent producer which fills its part of the shared
//! [`MouseReport`]. Sources are registered once, in priority order: the
//! position in the registry is the source id, and sources with lower ids fill
//! the report first.

use core::sync::atomic::{AtomicU8, Ordering};

use super::signal::{HidSignal, MAX_NUM_OF_HID_SOURCES};
use crate::MouseReport;

const UNBOUND: u8 = u8::MAX;

/// Handle of a source to the collector signal.
///
/// The slot is inert until the registry binds it to an id.
pub struct SourceSlot<'a> {
    signal: &'a HidSignal,
    id: AtomicU8,
}

impl<'a> SourceSlot<'a> {
    pub const fn new(signal: &'a HidSignal) -> Self {
        Self {
            signal,
            id: AtomicU8::new(UNBOUND),
        }
    }

    pub(crate) fn bind(&self, id: usize) {
        let id = id.min(UNBOUND as usize - 1) as u8;
        self.id.store(id, Ordering::Release);
    }

    /// Id of the source, `None` if it isn't registered
    pub fn id(&self) -> Option<usize> {
        match self.id.load(Ordering::Acquire) {
            UNBOUND => None,
            id => Some(id as usize),
        }
    }

    /// Tell the collector that the source has data to report
    pub fn notify(&self) {
        if let Some(id) = self.id() {
            self.signal.notify_data_available(id);
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        if let Some(id) = self.id() {
            self.signal.set_source_enabled(id, enabled);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.id().is_some_and(|id| self.signal.is_source_enabled(id))
    }

    pub fn signal(&self) -> &'a HidSignal {
        self.signal
    }
}

/// Producer of a part of the HID report
pub trait HidSource: Sync {
    /// Name for diagnostics
    fn name(&self) -> &'static str;

    /// Slot of this source, used to notify the collector
    fn slot(&self) -> &SourceSlot<'_>;

    /// Write the data of this source into `report`.
    ///
    /// Called by the collector after the source notified it.
    fn fill_report(&self, report: &mut MouseReport);
}

/// Fixed, priority-ordered list of HID sources
pub struct HidSourceRegistry<'a> {
    signal: &'a HidSignal,
    sources: &'a [&'a dyn HidSource],
}

impl<'a> HidSourceRegistry<'a> {
    /// Register `sources`, the position in the slice is the id and priority of a
    /// source.
    ///
    /// Sources beyond [`MAX_NUM_OF_HID_SOURCES`] get an id but can never be
    /// enabled.
    pub fn new(signal: &'a HidSignal, sources: &'a [&'a dyn HidSource]) -> Self {
        for (id, source) in sources.iter().enumerate() {
            source.slot().bind(id);
        }
        if sources.len() > MAX_NUM_OF_HID_SOURCES {
            warn!(
                "Number of HID sources exceeds {}, {} sources will be permanently disabled",
                MAX_NUM_OF_HID_SOURCES,
                sources.len() - MAX_NUM_OF_HID_SOURCES
            );
        }
        let registry = Self { signal, sources };
        // Preserve states which were changed before the registration
        signal.restrict_to(registry.existing_sources_mask());
        registry
    }

    pub fn signal(&self) -> &'a HidSignal {
        self.signal
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&'a dyn HidSource> {
        self.sources.get(id).copied()
    }

    /// Id of a registered `source`, found by identity
    pub fn source_id_of(&self, source: &dyn HidSource) -> Option<usize> {
        self.sources
            .iter()
            .position(|s| core::ptr::addr_eq(*s as *const dyn HidSource, source as *const dyn HidSource))
    }

    /// Enable or disable a source, ignored for unknown or unaddressable ids
    pub fn enable(&self, id: usize, enabled: bool) {
        if id >= self.len() {
            return;
        }
        self.signal.set_source_enabled(id, enabled);
    }

    pub fn is_enabled(&self, id: usize) -> bool {
        id < self.len() && self.signal.is_source_enabled(id)
    }

    /// Bitmask of the addressable registered sources
    pub fn existing_sources_mask(&self) -> u32 {
        let num = self.len().min(MAX_NUM_OF_HID_SOURCES);
        ((1u64 << num) - 1) as u32
    }
}
