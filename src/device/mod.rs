//! External device interfaces.
//!
//! The control core talks to its peripherals through these seams: the
//! encoder module, the current-sense device, and the H-bridge output stage.

mod current_sensor;
mod encoder;
mod hbridge;
#[cfg(feature = "std")]
mod serial;

pub use current_sensor::CurrentSensor;
pub use encoder::Encoder;
pub use hbridge::{HBridge, PwmDriver};

#[cfg(feature = "std")]
pub use serial::SerialEncoder;
