use super::sink::{HidSink, SinkError};
use super::source::HidSourceRegistry;
use crate::MouseReport;
use crate::gpio::BitIter;

/// Merges the data of all signaled sources into one report and hands it to
/// the sink.
///
/// Sources which signaled within the same wait cycle are coalesced into a
/// single delivery. They fill the report in ascending id order.
pub struct HidCollector<'a, K: HidSink> {
    registry: &'a HidSourceRegistry<'a>,
    sink: K,
    report: MouseReport,
}

impl<'a, K: HidSink> HidCollector<'a, K> {
    pub fn new(registry: &'a HidSourceRegistry<'a>, sink: K) -> Self {
        Self {
            registry,
            sink,
            report: MouseReport::new(),
        }
    }

    /// Current report, non-persistent fields are always zero between cycles
    pub fn report(&self) -> &MouseReport {
        &self.report
    }

    pub fn sink(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Run a single wait and dispatch cycle.
    ///
    /// The report is delivered once, and its non-persistent fields are cleared
    /// whether the delivery succeeded or not.
    pub async fn collect_once(&mut self) -> Result<(), SinkError> {
        let signal = self.registry.signal();
        let events = signal.wait_for_data().await;
        signal.clear(events);
        debug!("Collecting HID sources {:#x}", events);

        for id in BitIter(events) {
            if let Some(source) = self.registry.get(id as usize) {
                source.fill_report(&mut self.report);
            }
        }

        let result = self.sink.send(&self.report).await;
        self.report.clear_non_persistent();
        result
    }

    /// Run the collector forever, delivery failures don't stop it
    pub async fn run(&mut self) -> ! {
        loop {
            // The sink logs its own failures
            let _ = self.collect_once().await;
        }
    }
}
