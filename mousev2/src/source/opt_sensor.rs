use embassy_sync::mutex::Mutex;

use crate::debounce::EdgeCallback;
use crate::driver::MotionSensor;
use crate::gpio::EdgeInterrupt;
use crate::hid::{HidSignal, HidSource, SourceSlot};
use crate::{MouseReport, RawMutex};

/// Optical sensor with an active low motion pin.
///
/// The motion pin is not debounced, its edge callback must be wired directly
/// to the port interrupt.
pub struct OptSensorSource<'a, S: MotionSensor, E: EdgeInterrupt> {
    slot: SourceSlot<'a>,
    sensor: Mutex<RawMutex, S>,
    edges: &'a E,
    motion_pin: u8,
}

impl<'a, S: MotionSensor, E: EdgeInterrupt> OptSensorSource<'a, S, E> {
    pub fn new(signal: &'a HidSignal, sensor: S, edges: &'a E, motion_pin: u8) -> Self {
        Self {
            slot: SourceSlot::new(signal),
            sensor: Mutex::new(sensor),
            edges,
            motion_pin,
        }
    }

    /// Notify the collector if motion is already pending, and arm the motion pin
    pub fn init(&self) {
        self.on_motion_edge(self.edges.read_level(self.motion_pin));
    }

    pub fn motion_pin(&self) -> u8 {
        self.motion_pin
    }

    fn on_motion_edge(&self, level: bool) {
        if !level {
            self.slot.notify();
        }
        self.edges.arm_one_shot(self.motion_pin, level);
    }
}

impl<S: MotionSensor + Send, E: EdgeInterrupt + Sync> EdgeCallback for OptSensorSource<'_, S, E> {
    fn on_edge(&self, pin: u8, level: bool) {
        if pin == self.motion_pin {
            self.on_motion_edge(level);
        }
    }
}

impl<S: MotionSensor + Send, E: EdgeInterrupt + Sync> HidSource for OptSensorSource<'_, S, E> {
    fn name(&self) -> &'static str {
        "opt_sensor"
    }

    fn slot(&self) -> &SourceSlot<'_> {
        &self.slot
    }

    fn fill_report(&self, report: &mut MouseReport) {
        // Only the collector reads the sensor
        let Ok(mut sensor) = self.sensor.try_lock() else {
            return;
        };
        match sensor.read_motion() {
            // Sensor Y axis points the other way
            Ok(motion) => report.set_motion(motion.dx as i32, -(motion.dy as i32)),
            Err(e) => warn!("Failed to read motion: {:?}", e),
        }
        // Motion which happened during the read keeps the pin low
        if !self.edges.read_level(self.motion_pin) {
            self.slot.notify();
        }
    }
}
