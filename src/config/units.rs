//! Unit types for physical quantities.
//!
//! Provides type-safe representations of shaft angle, winding current, and
//! loop rates to prevent unit confusion at compile time.

use core::ops::{Add, Sub};

use serde::Deserialize;

/// Angular position in degrees.
///
/// Used for configuration and the host-facing API. The control loops convert
/// raw encoder counts to degrees through the configured scale factor.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Degrees(pub f32);

impl Degrees {
    /// Create a new Degrees value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Add for Degrees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Degrees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Winding current in milliamps.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Milliamps(pub f32);

impl Milliamps {
    /// Create a new Milliamps value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Add for Milliamps {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Milliamps {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Loop rate in hertz.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Hertz(pub f32);

impl Hertz {
    /// Create a new Hertz value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Period of one tick in seconds.
    #[inline]
    pub fn period_secs(self) -> f32 {
        1.0 / self.0
    }

    /// Period of one tick in whole nanoseconds.
    #[inline]
    pub fn period_ns(self) -> u64 {
        (1.0e9 / self.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_arithmetic() {
        let a = Degrees::new(90.0);
        let b = Degrees::new(30.0);
        assert!(((a - b).value() - 60.0).abs() < 1e-6);
        assert!(((a + b).value() - 120.0).abs() < 1e-6);
    }

    #[test]
    fn test_hertz_period() {
        let rate = Hertz::new(200.0);
        assert!((rate.period_secs() - 0.005).abs() < 1e-9);
        assert_eq!(rate.period_ns(), 5_000_000);
    }

    #[test]
    fn test_current_loop_period() {
        let rate = Hertz::new(5000.0);
        assert_eq!(rate.period_ns(), 200_000);
    }
}
