//! Error types for servo-motion.
//!
//! Provides unified error handling across configuration, device access,
//! control-loop execution, and the host protocol.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all servo-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Peripheral access error
    Device(DeviceError),
    /// Trajectory upload or execution error
    Trajectory(TrajectoryError),
    /// Host protocol error
    Protocol(ProtocolError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Loop rate must be positive
    InvalidLoopRate(f32),
    /// Current-loop rate must be at least the position-loop rate
    RateInversion {
        /// Configured current-loop rate in Hz
        current: f32,
        /// Configured position-loop rate in Hz
        position: f32,
    },
    /// Encoder counts per revolution must be non-zero
    InvalidCountsPerRevolution(u32),
    /// Required builder field was not supplied
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Peripheral access errors.
///
/// Device trait implementations map their transport-specific failures onto
/// these coarse variants at the engine boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// Current-sense read failed
    Sensor,
    /// Encoder link request failed
    Encoder,
    /// PWM or direction output failed
    PwmOutput,
}

/// Trajectory-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    /// Uploaded trajectory exceeds the reference buffer capacity
    TooLong {
        /// Declared upload length
        length: usize,
        /// Buffer capacity
        capacity: usize,
    },
}

/// Host protocol errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// A bounded run did not complete within the configured timeout
    RunTimeout {
        /// Name of the mode that was still active
        mode: &'static str,
    },
    /// Console transport read or write failed
    Transport(heapless::String<128>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Device(e) => write!(f, "Device error: {}", e),
            Error::Trajectory(e) => write!(f, "Trajectory error: {}", e),
            Error::Protocol(e) => write!(f, "Protocol error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidLoopRate(v) => {
                write!(f, "Invalid loop rate: {} Hz. Must be > 0", v)
            }
            ConfigError::RateInversion { current, position } => {
                write!(
                    f,
                    "Current-loop rate {} Hz must be >= position-loop rate {} Hz",
                    current, position
                )
            }
            ConfigError::InvalidCountsPerRevolution(v) => {
                write!(f, "Invalid encoder counts per revolution: {}", v)
            }
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Sensor => write!(f, "current sensor read failed"),
            DeviceError::Encoder => write!(f, "encoder link request failed"),
            DeviceError::PwmOutput => write!(f, "PWM output operation failed"),
        }
    }
}

impl fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrajectoryError::TooLong { length, capacity } => {
                write!(
                    f,
                    "Trajectory of {} points exceeds capacity {}",
                    length, capacity
                )
            }
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::RunTimeout { mode } => {
                write!(f, "{} run did not complete before the timeout", mode)
            }
            ProtocolError::Transport(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Error::Device(e)
    }
}

impl From<TrajectoryError> for Error {
    fn from(e: TrajectoryError) -> Self {
        Error::Trajectory(e)
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Error::Protocol(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for DeviceError {}

#[cfg(feature = "std")]
impl std::error::Error for TrajectoryError {}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}
