use embassy_time::Duration;

use crate::{
    DEBOUNCE_TIMER_PERIOD_US, SINK_POST_SEND_DELAY_MS, USB_MANUFACTURER, USB_PID, USB_PRODUCT_NAME, USB_SERIAL_NUMBER,
    USB_VID,
};

/// Runtime configuration of the mouse, every field defaults to the values
/// generated from `mouse.toml`
#[derive(Clone, Copy, Debug, Default)]
pub struct MouseConfig<'a> {
    pub debounce: DebounceConfig,
    pub sink: SinkConfig,
    pub usb: MouseUsbConfig<'a>,
}

/// Config of the debounce service
#[derive(Clone, Copy, Debug)]
pub struct DebounceConfig {
    /// Period of the re-arm timer (T), debounce time is within `[T*(N-1), T*N]`
    pub period: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_micros(DEBOUNCE_TIMER_PERIOD_US),
        }
    }
}

/// Config of the transport sink
#[derive(Clone, Copy, Debug)]
pub struct SinkConfig {
    /// Pause after every transport send
    pub post_send_delay: Duration,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            post_send_delay: Duration::from_millis(SINK_POST_SEND_DELAY_MS),
        }
    }
}

/// Configurations for usb
#[derive(Clone, Copy, Debug)]
pub struct MouseUsbConfig<'a> {
    /// Vender id
    pub vid: u16,
    /// Product id
    pub pid: u16,
    /// Manufacturer
    pub manufacturer: &'a str,
    /// Product name
    pub product_name: &'a str,
    /// Serial number
    pub serial_number: &'a str,
}

impl Default for MouseUsbConfig<'_> {
    fn default() -> Self {
        Self {
            vid: USB_VID,
            pid: USB_PID,
            manufacturer: USB_MANUFACTURER,
            product_name: USB_PRODUCT_NAME,
            serial_number: USB_SERIAL_NUMBER,
        }
    }
}
