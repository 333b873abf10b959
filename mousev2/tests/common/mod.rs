#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use embassy_futures::block_on;
use embassy_futures::select::{Either, select};
use mousev2::MouseReport;
use mousev2::gpio::{PortSense, Sense};
use mousev2::hid::{HidCollector, HidSignal, HidSink, HidSource, SinkError, SourceSlot};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// GPIO port whose levels are set by the test
pub struct FakePort {
    levels: AtomicU32,
    sensing: AtomicU32,
}

impl FakePort {
    pub const fn new(levels: u32) -> Self {
        Self {
            levels: AtomicU32::new(levels),
            sensing: AtomicU32::new(0),
        }
    }

    pub fn set_level(&self, pin: u8, level: bool) {
        if level {
            self.levels.fetch_or(1 << pin, Ordering::Relaxed);
        } else {
            self.levels.fetch_and(!(1 << pin), Ordering::Relaxed);
        }
    }

    pub fn is_sensing(&self, pin: u8) -> bool {
        self.sensing.load(Ordering::Relaxed) & (1 << pin) != 0
    }
}

impl PortSense for FakePort {
    fn set_sense(&self, pin: u8, sense: Sense) {
        match sense {
            Sense::Disabled => self.sensing.fetch_and(!(1 << pin), Ordering::Relaxed),
            Sense::High | Sense::Low => self.sensing.fetch_or(1 << pin, Ordering::Relaxed),
        };
    }

    fn read_port(&self) -> u32 {
        self.levels.load(Ordering::Relaxed)
    }
}

/// Sink which keeps every delivered report
#[derive(Default)]
pub struct RecordingSink {
    pub reports: Vec<MouseReport>,
}

impl HidSink for RecordingSink {
    async fn send(&mut self, report: &MouseReport) -> Result<(), SinkError> {
        self.reports.push(*report);
        Ok(())
    }

    fn available(&self) -> bool {
        true
    }
}

/// Source which records when it's asked to fill the report
pub struct RecordingSource<'a> {
    pub slot: SourceSlot<'a>,
    name: &'static str,
    log: &'a Mutex<Vec<&'static str>>,
    motion: (i32, i32),
}

impl<'a> RecordingSource<'a> {
    pub fn new(signal: &'a HidSignal, name: &'static str, log: &'a Mutex<Vec<&'static str>>) -> Self {
        Self {
            slot: SourceSlot::new(signal),
            name,
            log,
            motion: (0, 0),
        }
    }

    pub fn with_motion(mut self, x: i32, y: i32) -> Self {
        self.motion = (x, y);
        self
    }
}

impl HidSource for RecordingSource<'_> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn slot(&self) -> &SourceSlot<'_> {
        &self.slot
    }

    fn fill_report(&self, report: &mut MouseReport) {
        if let Ok(mut log) = self.log.lock() {
            log.push(self.name);
        }
        if self.motion != (0, 0) {
            report.set_motion(self.motion.0, self.motion.1);
        }
    }
}

/// Run one collector cycle if a source is signaled, `None` if it would block
pub fn try_collect<K: HidSink>(collector: &mut HidCollector<'_, K>) -> Option<Result<(), SinkError>> {
    match block_on(select(collector.collect_once(), core::future::ready(()))) {
        Either::First(result) => Some(result),
        Either::Second(()) => None,
    }
}
