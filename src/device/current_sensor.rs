//! Current sensor interface.

use crate::config::units::Milliamps;

/// Synchronous poll of the current-sense device.
///
/// The sense chip itself (bus setup, calibration registers) is outside this
/// crate; implementations wrap whatever driver provides the instantaneous
/// winding current.
pub trait CurrentSensor {
    /// Transport-specific error type.
    type Error;

    /// Read the instantaneous winding current.
    fn read_current(&mut self) -> Result<Milliamps, Self::Error>;
}
