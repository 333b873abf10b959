//! Drivers of the mouse peripherals

pub mod adns7530;

/// Motion data from the sensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionData {
    pub dx: i16,
    pub dy: i16,
}

/// Errors of motion sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// SPI communication error
    Spi,
    /// Unexpected value of the observation register after reset
    InvalidObservation(u8),
    /// Invalid product ID detected
    InvalidProductId(u8),
    /// Laser fault or invalid laser config, carries the motion register
    LaserFault(u8),
}

/// Optical motion sensor
pub trait MotionSensor {
    /// Read the motion accumulated since the last read
    fn read_motion(&mut self) -> Result<MotionData, SensorError>;
}
