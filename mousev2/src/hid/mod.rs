//! HID report pipeline.
//!
//! ```text
//!  source --notify--> HidSignal --wait--> HidCollector --send--> HidSink
//!     ^                                        |
//!     +---------------fill_report--------------+
//! ```

mod collector;
mod signal;
mod sink;
mod source;

pub use collector::HidCollector;
pub use signal::{ALL_SOURCES_MASK, HidSignal, MAX_NUM_OF_HID_SOURCES, SOURCES_CHANGED_EVENT};
pub use sink::{HidSink, LogSink, SinkError, Transport, TransportError, TransportSink};
pub use source::{HidSource, HidSourceRegistry, SourceSlot};
