// ADNS-7530 laser mouse sensor driver
//
// Register map and the power-up sequence follow the ADNS-7530 datasheet. The
// meaning of the registers written by the power-up sequence is undocumented.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{Operation, SpiDevice};

use super::{MotionData, MotionSensor, SensorError};
use crate::SENSOR_SURFACE_QUALITY_THRESHOLD;

#[allow(dead_code)]
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Register {
    ProductId,
    RevisionId,
    Motion,
    DeltaXL,
    DeltaYL,
    DeltaXYH,
    SurfaceQuality,
    Cfg,
    RunDownshift,
    Rest1Rate,
    Rest1Downshift,
    Rest2Rate,
    Rest2Downshift,
    Rest3Rate,
    LaserCtrl0,
    LsrPwrCfg0,
    LsrPwrCfg1,
    LaserCtrl1,
    Observation,
    PowerUpReset,
    Shutdown,
    InverseProductId,
    MotionBurst,
}

impl Register {
    fn value(&self) -> u8 {
        match self {
            Register::ProductId => 0x00,
            Register::RevisionId => 0x01,
            Register::Motion => 0x02,
            Register::DeltaXL => 0x03,
            Register::DeltaYL => 0x04,
            Register::DeltaXYH => 0x05,
            Register::SurfaceQuality => 0x06,
            Register::Cfg => 0x12,
            Register::RunDownshift => 0x13,
            Register::Rest1Rate => 0x14,
            Register::Rest1Downshift => 0x15,
            Register::Rest2Rate => 0x16,
            Register::Rest2Downshift => 0x17,
            Register::Rest3Rate => 0x18,
            Register::LaserCtrl0 => 0x1a,
            Register::LsrPwrCfg0 => 0x1c,
            Register::LsrPwrCfg1 => 0x1d,
            Register::LaserCtrl1 => 0x1f,
            Register::Observation => 0x2e,
            Register::PowerUpReset => 0x3a,
            Register::Shutdown => 0x3b,
            Register::InverseProductId => 0x3f,
            Register::MotionBurst => 0x42,
        }
    }
}

// ============================================================================
// Motion burst offsets
// ============================================================================
const BURST_MOTION: usize = 0;
const BURST_DELTA_X_L: usize = 1;
const BURST_DELTA_Y_L: usize = 2;
const BURST_DELTA_XY_H: usize = 3;
const BURST_SURFACE_QUALITY: usize = 4;
const BURST_DATA_LEN: usize = 5;

// ============================================================================
// Constants
// ============================================================================
const PRODUCT_ID_ADNS7530: u8 = 0x31;
const SPI_WRITE: u8 = 0x80; // BIT(7)
const POWER_UP_RESET_VAL: u8 = 0x5a;
const OBSERVATION_OK_MASK: u8 = 0x0F;

// Motion register
const MOTION_LASER_FAULT: u8 = 0x04; // BIT(2)
const MOTION_LASER_CFG_VALID: u8 = 0x08; // BIT(3)
const MOTION_FLAG: u8 = 0x80; // BIT(7)

// Cfg register
const CFG_REST_DISABLE: u8 = 1 << 3;
const CFG_RUN_RATE_4MS: u8 = 0b010;

// Timing constants
const RESET_DELAY_MS: u32 = 10;
const T_SWW_US: u32 = 30;
const T_SRX_US: u32 = 20;

/// Power-up sequence, register meaning is undocumented
const POWER_UP_SEQUENCE: [(u8, u8); 7] = [
    (0x3C, 0x27),
    (0x22, 0x0A),
    (0x21, 0x01),
    (0x3C, 0x32),
    (0x23, 0x20),
    (0x3C, 0x05),
    (0x37, 0xB9),
];

/// Sensor resolution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    Cpi400 = 0b00,
    Cpi800 = 0b01,
    Cpi1200 = 0b10,
    Cpi1600 = 0b11,
}

/// ADNS7530 configuration
#[derive(Clone, Debug)]
pub struct Adns7530Config {
    pub resolution: Resolution,
    /// Allow the sensor to downshift into rest modes when idle
    pub rest_enable: bool,
    /// Motion reported at a lower surface quality is discarded
    pub surface_quality_threshold: u8,
}

impl Default for Adns7530Config {
    fn default() -> Self {
        Self {
            resolution: Resolution::Cpi1200,
            rest_enable: true,
            surface_quality_threshold: SENSOR_SURFACE_QUALITY_THRESHOLD,
        }
    }
}

/// ADNS7530 driver over a blocking SPI device, the device handles chip select
pub struct Adns7530<SPI: SpiDevice, D: DelayNs> {
    spi: SPI,
    delay: D,
    config: Adns7530Config,
}

impl<SPI: SpiDevice, D: DelayNs> Adns7530<SPI, D> {
    pub fn new(spi: SPI, delay: D, config: Adns7530Config) -> Self {
        Self { spi, delay, config }
    }

    /// Reset and configure the sensor
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.write_reg(Register::PowerUpReset, POWER_UP_RESET_VAL)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.write_reg(Register::Observation, 0x00)?;
        self.delay.delay_ms(RESET_DELAY_MS);

        let observation = self.read_reg(Register::Observation)?;
        if observation & OBSERVATION_OK_MASK != OBSERVATION_OK_MASK {
            error!("ADNS7530: Invalid observation value {:#x}", observation);
            return Err(SensorError::InvalidObservation(observation));
        }

        // Clear motion registers
        let mut discard = [0u8; 4];
        self.read_burst(&mut discard)?;

        for (reg, value) in POWER_UP_SEQUENCE {
            self.write_raw(reg, value)?;
        }

        let product_id = self.read_reg(Register::ProductId)?;
        if product_id != PRODUCT_ID_ADNS7530 {
            error!("ADNS7530: Invalid product id: {:#x}", product_id);
            return Err(SensorError::InvalidProductId(product_id));
        }

        self.write_reg(Register::LaserCtrl0, 0x00)?;
        self.write_reg(Register::LaserCtrl1, 0xC0)?;
        self.write_reg(Register::LsrPwrCfg0, 0xE0)?;
        self.write_reg(Register::LsrPwrCfg1, 0x1F)?;

        self.write_reg(Register::Cfg, self.cfg_value())?;
        self.write_reg(Register::Rest2Downshift, 0x0A)?;
        self.write_reg(Register::Rest3Rate, 0x63)?;

        info!("ADNS7530 initialized, resolution: {:?}", self.config.resolution);
        Ok(())
    }

    fn cfg_value(&self) -> u8 {
        let rest = if self.config.rest_enable { 0 } else { CFG_REST_DISABLE };
        ((self.config.resolution as u8) << 5) | rest | CFG_RUN_RATE_4MS
    }

    fn read_reg(&mut self, register: Register) -> Result<u8, SensorError> {
        let mut value = [0u8];
        // The bus latency between the address and data phases covers t_SRAD
        self.spi
            .transaction(&mut [Operation::Write(&[register.value() & 0x7f]), Operation::Read(&mut value)])
            .map_err(|_| SensorError::Spi)?;
        self.delay.delay_us(T_SRX_US);
        Ok(value[0])
    }

    fn read_burst(&mut self, data: &mut [u8]) -> Result<(), SensorError> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[Register::MotionBurst.value() & 0x7f]),
                Operation::Read(data),
            ])
            .map_err(|_| SensorError::Spi)?;
        self.delay.delay_us(T_SRX_US);
        Ok(())
    }

    fn write_reg(&mut self, register: Register, value: u8) -> Result<(), SensorError> {
        self.write_raw(register.value(), value)
    }

    fn write_raw(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.spi
            .write(&[SPI_WRITE | (reg & 0x7f), value])
            .map_err(|_| SensorError::Spi)?;
        self.delay.delay_us(T_SWW_US);
        Ok(())
    }
}

impl<SPI: SpiDevice, D: DelayNs> MotionSensor for Adns7530<SPI, D> {
    fn read_motion(&mut self) -> Result<MotionData, SensorError> {
        let mut burst = [0u8; BURST_DATA_LEN];
        self.read_burst(&mut burst)?;

        let motion = burst[BURST_MOTION];
        if motion & MOTION_LASER_FAULT != 0 || motion & MOTION_LASER_CFG_VALID == 0 {
            error!("ADNS7530: Laser fault or invalid laser config: {:#x}", motion);
            return Err(SensorError::LaserFault(motion));
        }

        // The motion flag means "data ready" rather than "moved"
        if motion & MOTION_FLAG == 0 || burst[BURST_SURFACE_QUALITY] < self.config.surface_quality_threshold {
            return Ok(MotionData::default());
        }

        let xy_h = burst[BURST_DELTA_XY_H] as u16;
        let dx = burst[BURST_DELTA_X_L] as u16 | ((xy_h & 0xF0) << 4);
        let dy = burst[BURST_DELTA_Y_L] as u16 | ((xy_h & 0x0F) << 8);
        Ok(MotionData {
            dx: from_12bit(dx),
            dy: from_12bit(dy),
        })
    }
}

/// Sign-extend a 12-bit two's complement value
fn from_12bit(value: u16) -> i16 {
    ((value << 4) as i16) >> 4
}
