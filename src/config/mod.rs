//! Configuration module for servo-motion.
//!
//! Provides types for loading and validating control-loop and encoder
//! configurations from TOML files (with `std` feature) or pre-parsed data.

mod gains;
#[cfg(feature = "std")]
mod loader;
mod system;
pub mod units;
mod validation;

pub use gains::{CurrentGains, PositionGains};
pub use system::{CurrentLoopConfig, EncoderConfig, PositionLoopConfig, SystemConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, Hertz, Milliamps};
