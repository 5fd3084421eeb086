//! # servo-motion
//!
//! Cascade position control for brushed DC motors with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Dual-rate cascade**: inner PI current loop feeding an H-bridge PWM,
//!   outer PID position loop commanding the current setpoint
//! - **Operating modes**: open-loop PWM, current step test, angle hold,
//!   trajectory tracking, with automatic completion transitions
//! - **embedded-hal 1.0**: `SetDutyCycle` + `OutputPin` for the output stage
//! - **no_std compatible**: control core works without the standard library
//! - **Host console**: line-based ASCII command protocol for gain tuning,
//!   test runs, and data read-back
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use servo_motion::{Console, ControlRuntime, Engine};
//! use servo_motion::runtime::LoopPeriods;
//!
//! // Load configuration from TOML
//! let config = servo_motion::load_config("servo.toml")?;
//!
//! // Tie the engine to real peripherals
//! let engine = Engine::builder()
//!     .current_sensor(sensor)
//!     .encoder(encoder)
//!     .pwm_driver(bridge)
//!     .from_config(&config)
//!     .build()?;
//!
//! // Spawn the two periodic control tasks and serve the host console
//! let runtime = ControlRuntime::spawn(engine, LoopPeriods::from_config(&config));
//! Console::new(&runtime, port_reader, port_writer).serve()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, the threaded runtime, and the console
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod control;
pub mod device;
pub mod error;
pub mod protocol;

#[cfg(feature = "std")]
pub mod runtime;

// Re-exports for ergonomic API
pub use config::{validate_config, CurrentGains, PositionGains, SystemConfig};
pub use control::{Direction, Engine, EngineBuilder, OperatingMode, PwmCommand};
pub use device::{CurrentSensor, Encoder, HBridge, PwmDriver};
pub use error::{Error, Result};
pub use protocol::Command;

#[cfg(feature = "std")]
pub use protocol::Console;
#[cfg(feature = "std")]
pub use runtime::ControlRuntime;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;

// Unit types
pub use config::units::{Degrees, Hertz, Milliamps};
