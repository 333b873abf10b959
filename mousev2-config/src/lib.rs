//! Build-time configuration of the MouseV2 firmware.
//!
//! The configuration is read from a `mouse.toml` file by the firmware's build
//! script and turned into constants. Every section and every field is optional,
//! missing values fall back to [`defaults`].
//!
//! ```toml
//! [mouse]
//! debounce_num_shifts = 3
//! debounce_timer_period_us = 1000
//! sink_post_send_delay_ms = 10
//! sensor_surface_quality_threshold = 16
//!
//! [device]
//! vendor_id = 0x1915
//! product_id = 0x52DE
//! manufacturer = "MouseV2"
//! product_name = "MouseV2 Mouse"
//! ```

use std::path::Path;

use serde_derive::Deserialize;
use serde_inline_default::serde_inline_default;

pub mod defaults;
pub mod error;

pub use error::{ConfigError, ConfigResult};

/// Firmware constants for timing and hardware limits
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MouseConstantsConfig {
    /// Number of debounce shift stages, the debounce time is within `[T*(N-1), T*N]`
    #[serde_inline_default(defaults::DEBOUNCE_NUM_SHIFTS)]
    pub debounce_num_shifts: usize,
    /// Debounce timer period in microseconds
    #[serde_inline_default(defaults::DEBOUNCE_TIMER_PERIOD_US)]
    pub debounce_timer_period_us: u64,
    /// Delay after every transport send in milliseconds
    #[serde_inline_default(defaults::SINK_POST_SEND_DELAY_MS)]
    pub sink_post_send_delay_ms: u64,
    /// Optical sensor surface quality threshold
    #[serde_inline_default(defaults::SENSOR_SURFACE_QUALITY_THRESHOLD)]
    pub sensor_surface_quality_threshold: u8,
}

/// This separate Default impl is needed when `[mouse]` section is not set in mouse.toml
impl Default for MouseConstantsConfig {
    fn default() -> Self {
        Self {
            debounce_num_shifts: defaults::DEBOUNCE_NUM_SHIFTS,
            debounce_timer_period_us: defaults::DEBOUNCE_TIMER_PERIOD_US,
            sink_post_send_delay_ms: defaults::SINK_POST_SEND_DELAY_MS,
            sensor_surface_quality_threshold: defaults::SENSOR_SURFACE_QUALITY_THRESHOLD,
        }
    }
}

/// Device identification reported over USB
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeviceInfo {
    #[serde_inline_default(defaults::DEFAULT_VID)]
    pub vendor_id: u16,
    #[serde_inline_default(defaults::DEFAULT_PID)]
    pub product_id: u16,
    #[serde_inline_default(defaults::DEFAULT_MANUFACTURER.to_string())]
    pub manufacturer: String,
    #[serde_inline_default(defaults::DEFAULT_PRODUCT_NAME.to_string())]
    pub product_name: String,
    #[serde_inline_default(defaults::DEFAULT_SERIAL_NUMBER.to_string())]
    pub serial_number: String,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            vendor_id: defaults::DEFAULT_VID,
            product_id: defaults::DEFAULT_PID,
            manufacturer: defaults::DEFAULT_MANUFACTURER.to_string(),
            product_name: defaults::DEFAULT_PRODUCT_NAME.to_string(),
            serial_number: defaults::DEFAULT_SERIAL_NUMBER.to_string(),
        }
    }
}

/// Contents of `mouse.toml`
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MouseTomlConfig {
    /// Firmware constants
    #[serde(default)]
    pub mouse: MouseConstantsConfig,
    /// Device identification
    #[serde(default)]
    pub device: DeviceInfo,
}

impl MouseTomlConfig {
    /// Load and validate the configuration at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|e| e.in_file(&path.display().to_string()))
    }

    /// Parse and validate a configuration from a TOML string
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges which can't be expressed by the schema
    pub fn validate(&self) -> ConfigResult<()> {
        let shifts = self.mouse.debounce_num_shifts;
        if shifts == 0 || shifts > defaults::DEBOUNCE_MAX_SHIFTS {
            return Err(ConfigError::OutOfRange {
                field: "mouse.debounce_num_shifts",
                value: shifts.to_string(),
                expected: format!("1..={}", defaults::DEBOUNCE_MAX_SHIFTS),
            });
        }
        if self.mouse.debounce_timer_period_us == 0 {
            return Err(ConfigError::OutOfRange {
                field: "mouse.debounce_timer_period_us",
                value: "0".to_string(),
                expected: "a non-zero period".to_string(),
            });
        }
        Ok(())
    }
}
