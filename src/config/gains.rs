//! Controller gain sets.

/// PI gains for the inner current loop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentGains {
    /// Proportional gain.
    pub kp: f32,

    /// Integral gain.
    pub ki: f32,
}

impl Default for CurrentGains {
    fn default() -> Self {
        Self { kp: 0.0, ki: 1.0 }
    }
}

/// PID gains for the outer position loop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionGains {
    /// Proportional gain.
    pub kp: f32,

    /// Integral gain.
    pub ki: f32,

    /// Derivative gain.
    pub kd: f32,
}

impl Default for PositionGains {
    fn default() -> Self {
        Self {
            kp: 30.0,
            ki: 5.0,
            kd: 8.0,
        }
    }
}
