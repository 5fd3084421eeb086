//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Both loop rates are positive
/// - The current loop is at least as fast as the position loop
/// - The encoder scale is non-zero
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    let current = config.current_loop.rate_hz.0;
    let position = config.position_loop.rate_hz.0;

    if current <= 0.0 || !current.is_finite() {
        return Err(Error::Config(ConfigError::InvalidLoopRate(current)));
    }

    if position <= 0.0 || !position.is_finite() {
        return Err(Error::Config(ConfigError::InvalidLoopRate(position)));
    }

    // The cascade assumes the inner loop outpaces the outer loop
    if current < position {
        return Err(Error::Config(ConfigError::RateInversion { current, position }));
    }

    if config.encoder.counts_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidCountsPerRevolution(0)));
    }

    Ok(())
}
