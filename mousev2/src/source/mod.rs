//! Representative HID sources of the mouse

mod buttons;
mod encoder;
mod opt_sensor;

pub use buttons::ButtonsSource;
pub use encoder::EncoderSource;
pub use opt_sensor::OptSensorSource;
