//! H-bridge output stage.
//!
//! Adapts a [`PwmCommand`] onto embedded-hal 1.0 pin types: a PWM channel
//! for the duty magnitude and a digital output for the direction line.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::control::{Direction, PwmCommand};
use crate::error::DeviceError;

/// Output stage driven by the current loop.
pub trait PwmDriver {
    /// Hardware-specific error type.
    type Error;

    /// Apply a duty magnitude and direction to the bridge.
    fn apply(&mut self, command: PwmCommand) -> Result<(), Self::Error>;
}

/// H-bridge driver over embedded-hal 1.0 pin types.
///
/// Generic over:
/// - `PWM`: duty channel (must implement `SetDutyCycle`)
/// - `DIR`: direction pin (must implement `OutputPin`)
pub struct HBridge<PWM, DIR>
where
    PWM: SetDutyCycle,
    DIR: OutputPin,
{
    /// PWM duty channel.
    pwm: PWM,

    /// Direction pin (high = forward, low = reverse, or inverted).
    dir_pin: DIR,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,
}

impl<PWM, DIR> HBridge<PWM, DIR>
where
    PWM: SetDutyCycle,
    DIR: OutputPin,
{
    /// Create a bridge with forward mapped to a high direction pin.
    pub fn new(pwm: PWM, dir_pin: DIR) -> Self {
        Self {
            pwm,
            dir_pin,
            current_direction: None,
            invert_direction: false,
        }
    }

    /// Invert the direction pin logic.
    pub fn with_inverted_direction(mut self) -> Self {
        self.invert_direction = true;
        self
    }

    /// Release the underlying pins.
    pub fn release(self) -> (PWM, DIR) {
        (self.pwm, self.dir_pin)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), DeviceError> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Forward => !self.invert_direction,
            Direction::Reverse => self.invert_direction,
        };

        if pin_high {
            self.dir_pin
                .set_high()
                .map_err(|_| DeviceError::PwmOutput)?;
        } else {
            self.dir_pin.set_low().map_err(|_| DeviceError::PwmOutput)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }
}

impl<PWM, DIR> PwmDriver for HBridge<PWM, DIR>
where
    PWM: SetDutyCycle,
    DIR: OutputPin,
{
    type Error = DeviceError;

    fn apply(&mut self, command: PwmCommand) -> Result<(), DeviceError> {
        self.set_direction(command.direction)?;

        // Duty register = magnitude/100 x channel period
        self.pwm
            .set_duty_cycle_percent(command.duty_percent)
            .map_err(|_| DeviceError::PwmOutput)?;

        Ok(())
    }
}
