//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use servo_motion::load_config;
///
/// let config = load_config("servo.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    // Validate the configuration
    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!((config.current_loop.rate_hz.0 - 5000.0).abs() < 1e-6);
        assert!((config.position_loop.kp - 30.0).abs() < 1e-6);
        assert_eq!(config.encoder.counts_per_revolution, 1336);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[current_loop]
rate_hz = 5000.0
kp = 0.05
ki = 0.8

[position_loop]
rate_hz = 200.0
kp = 12.0
ki = 2.0
kd = 4.5

[encoder]
counts_per_revolution = 4096
"#;

        let config = parse_config(toml).unwrap();
        assert!((config.current_loop.kp - 0.05).abs() < 1e-6);
        assert!((config.current_loop.ki - 0.8).abs() < 1e-6);
        assert!((config.position_loop.kd - 4.5).abs() < 1e-6);
        assert_eq!(config.encoder.counts_per_revolution, 4096);
    }

    #[test]
    fn test_parse_rejects_inverted_rates() {
        let toml = r#"
[current_loop]
rate_hz = 50.0

[position_loop]
rate_hz = 200.0
"#;

        let result = parse_config(toml);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::RateInversion { .. }))
        ));
    }
}
