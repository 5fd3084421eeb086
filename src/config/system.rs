//! System configuration - root configuration structure.

use serde::Deserialize;

use super::gains::{CurrentGains, PositionGains};
use super::units::Hertz;

/// Inner current-loop section.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CurrentLoopConfig {
    /// Tick rate in Hz (typically 5 kHz).
    #[serde(default = "default_current_rate")]
    pub rate_hz: Hertz,

    /// Proportional gain.
    #[serde(default = "default_current_kp")]
    pub kp: f32,

    /// Integral gain.
    #[serde(default = "default_current_ki")]
    pub ki: f32,
}

fn default_current_rate() -> Hertz {
    Hertz(5000.0)
}

fn default_current_kp() -> f32 {
    CurrentGains::default().kp
}

fn default_current_ki() -> f32 {
    CurrentGains::default().ki
}

impl CurrentLoopConfig {
    /// The configured PI gain set.
    pub fn gains(&self) -> CurrentGains {
        CurrentGains {
            kp: self.kp,
            ki: self.ki,
        }
    }
}

impl Default for CurrentLoopConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_current_rate(),
            kp: default_current_kp(),
            ki: default_current_ki(),
        }
    }
}

/// Outer position-loop section.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PositionLoopConfig {
    /// Tick rate in Hz (typically 200 Hz).
    #[serde(default = "default_position_rate")]
    pub rate_hz: Hertz,

    /// Proportional gain.
    #[serde(default = "default_position_kp")]
    pub kp: f32,

    /// Integral gain.
    #[serde(default = "default_position_ki")]
    pub ki: f32,

    /// Derivative gain.
    #[serde(default = "default_position_kd")]
    pub kd: f32,
}

fn default_position_rate() -> Hertz {
    Hertz(200.0)
}

fn default_position_kp() -> f32 {
    PositionGains::default().kp
}

fn default_position_ki() -> f32 {
    PositionGains::default().ki
}

fn default_position_kd() -> f32 {
    PositionGains::default().kd
}

impl PositionLoopConfig {
    /// The configured PID gain set.
    pub fn gains(&self) -> PositionGains {
        PositionGains {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
        }
    }
}

impl Default for PositionLoopConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_position_rate(),
            kp: default_position_kp(),
            ki: default_position_ki(),
            kd: default_position_kd(),
        }
    }
}

/// Encoder scale section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EncoderConfig {
    /// Quadrature counts per shaft revolution (line count x4).
    #[serde(default = "default_counts_per_revolution")]
    pub counts_per_revolution: u32,
}

fn default_counts_per_revolution() -> u32 {
    // 334-line encoder read in x4 quadrature
    334 * 4
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            counts_per_revolution: default_counts_per_revolution(),
        }
    }
}

impl EncoderConfig {
    /// Shaft angle represented by a single count.
    #[inline]
    pub fn degrees_per_count(&self) -> f32 {
        360.0 / self.counts_per_revolution as f32
    }
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct SystemConfig {
    /// Inner current-loop settings.
    #[serde(default)]
    pub current_loop: CurrentLoopConfig,

    /// Outer position-loop settings.
    #[serde(default)]
    pub position_loop: PositionLoopConfig,

    /// Encoder scale settings.
    #[serde(default)]
    pub encoder: EncoderConfig,
}

impl SystemConfig {
    /// Position-loop tick period in seconds (the PID derivative timebase).
    #[inline]
    pub fn position_period_secs(&self) -> f32 {
        self.position_loop.rate_hz.period_secs()
    }

    /// Current-loop ticks per position-loop tick.
    #[inline]
    pub fn rate_ratio(&self) -> f32 {
        self.current_loop.rate_hz.0 / self.position_loop.rate_hz.0
    }
}
