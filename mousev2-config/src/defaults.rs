//! Centralized default values for MouseV2 configuration

// ============================================================================
// Input pipeline defaults
// ============================================================================

/// Default number of debounce shift stages (N)
pub const DEBOUNCE_NUM_SHIFTS: usize = 3;

/// Default debounce timer period (T) in microseconds
pub const DEBOUNCE_TIMER_PERIOD_US: u64 = 1000;

/// Largest supported number of debounce shift stages, one bit per GPIO pin of a port
pub const DEBOUNCE_MAX_SHIFTS: usize = 31;

/// Default delay after every transport send in milliseconds
pub const SINK_POST_SEND_DELAY_MS: u64 = 10;

/// Default optical sensor surface quality threshold, motion below it is discarded
pub const SENSOR_SURFACE_QUALITY_THRESHOLD: u8 = 16;

// ============================================================================
// Device Info Defaults
// ============================================================================

/// Default vendor ID
pub const DEFAULT_VID: u16 = 0x1915;

/// Default product ID
pub const DEFAULT_PID: u16 = 0x52DE;

/// Default manufacturer name
pub const DEFAULT_MANUFACTURER: &str = "MouseV2";

/// Default product name
pub const DEFAULT_PRODUCT_NAME: &str = "MouseV2 Mouse";

/// Default serial number
pub const DEFAULT_SERIAL_NUMBER: &str = "000001";
