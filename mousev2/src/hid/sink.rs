//! Delivery of finished reports.

use embassy_time::{Duration, Timer};

use crate::MouseReport;
use crate::config::SinkConfig;

/// Errors of a [`Transport`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The transport is not enabled by the host
    Disabled,
    /// The report doesn't fit the transport buffer
    BufferOverflow,
    /// The link dropped during the send
    Disconnected,
}

/// Errors of a [`HidSink`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkError {
    /// The transport was not available, the report was dropped
    Unavailable,
    /// The transport failed to send the report
    Transport(TransportError),
}

impl From<TransportError> for SinkError {
    fn from(e: TransportError) -> Self {
        SinkError::Transport(e)
    }
}

/// Final receiver of the merged report
pub trait HidSink {
    /// Deliver `report`. Must fail, not block, when the sink can't deliver.
    async fn send(&mut self, report: &MouseReport) -> Result<(), SinkError>;

    /// Whether a report sent now would be delivered
    fn available(&self) -> bool;
}

/// Link to the host, like USB or BLE HID
pub trait Transport {
    fn available(&self) -> bool;

    async fn send(&mut self, report: &MouseReport) -> Result<(), TransportError>;

    async fn update_battery_level(&mut self, level: u8) -> Result<(), TransportError>;
}

/// Sink which forwards reports to a [`Transport`].
///
/// Reports are dropped while the transport is unavailable. Every send attempt
/// is followed by a pause, which limits the report rate.
pub struct TransportSink<T: Transport> {
    transport: T,
    post_send_delay: Duration,
}

impl<T: Transport> TransportSink<T> {
    pub fn new(transport: T, config: SinkConfig) -> Self {
        Self {
            transport,
            post_send_delay: config.post_send_delay,
        }
    }

    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T: Transport> HidSink for TransportSink<T> {
    async fn send(&mut self, report: &MouseReport) -> Result<(), SinkError> {
        if !self.transport.available() {
            debug!("Transport unavailable, report dropped");
            return Err(SinkError::Unavailable);
        }
        let result = self.transport.send(report).await;
        if let Err(e) = result {
            warn!("Failed to send report: {:?}", e);
        }
        Timer::after(self.post_send_delay).await;
        result.map_err(SinkError::from)
    }

    fn available(&self) -> bool {
        self.transport.available()
    }
}

/// Sink which only logs reports, useful for bring-up
#[derive(Default)]
pub struct LogSink;

impl HidSink for LogSink {
    async fn send(&mut self, report: &MouseReport) -> Result<(), SinkError> {
        info!(
            "buttons={:#x}, movement=({}, {}), wheel={}",
            report.buttons.into_bits(),
            report.x_delta,
            report.y_delta,
            report.wheel_delta
        );
        Ok(())
    }

    fn available(&self) -> bool {
        true
    }
}
