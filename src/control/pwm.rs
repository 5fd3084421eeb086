//! PWM output command derivation.
//!
//! The control laws produce a signed effort; the H-bridge wants a duty
//! magnitude and a direction pin level. `PwmCommand` is that conversion.

/// Rotation direction of the motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive shaft rotation (direction pin high).
    #[default]
    Forward,
    /// Negative shaft rotation (direction pin low).
    Reverse,
}

impl Direction {
    /// Sign of the direction as a multiplier.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// Duty magnitude plus direction, as applied to the output stage.
///
/// The magnitude is a percentage in `0..=100`; the physical duty register
/// value is derived from it by the [`PwmDriver`](crate::device::PwmDriver)
/// implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmCommand {
    /// Duty-cycle magnitude in percent, `0..=100`.
    pub duty_percent: u8,
    /// Direction pin level.
    pub direction: Direction,
}

impl PwmCommand {
    /// Zero output, forward by convention.
    pub const ZERO: Self = Self {
        duty_percent: 0,
        direction: Direction::Forward,
    };

    /// Derive a command from a signed duty request.
    ///
    /// Magnitude saturates at 100; a non-negative request maps to
    /// [`Direction::Forward`].
    pub fn from_signed(duty: i32) -> Self {
        let magnitude = duty.unsigned_abs().min(100) as u8;
        let direction = if duty < 0 {
            Direction::Reverse
        } else {
            Direction::Forward
        };
        Self {
            duty_percent: magnitude,
            direction,
        }
    }

    /// Derive a command from a raw control effort.
    ///
    /// Truncates toward zero before clamping, matching integer duty
    /// registers.
    pub fn from_effort(effort: f32) -> Self {
        let magnitude = libm::fabsf(effort).min(100.0) as u8;
        let direction = if effort < 0.0 {
            Direction::Reverse
        } else {
            Direction::Forward
        };
        Self {
            duty_percent: magnitude,
            direction,
        }
    }

    /// The command as a signed duty percentage.
    pub fn signed(self) -> i32 {
        self.duty_percent as i32 * self.direction.sign()
    }
}
