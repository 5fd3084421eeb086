//! Shared control state.
//!
//! Everything both loops and the host touch: mode, gains, setpoints,
//! integrator accumulators, run counters, the trajectory buffer, and the
//! per-mode log buffers. Ownership is transferred at mode boundaries: the
//! host mutates only while the corresponding loop is not mid-run, and each
//! loop writes only the log owned by its active mode.

use crate::config::{CurrentGains, PositionGains};

use super::log::SampleLog;
use super::mode::OperatingMode;
use super::pwm::PwmCommand;
use super::trajectory::Trajectory;

/// Samples recorded by a current step test.
pub const CURRENT_LOG_CAPACITY: usize = 100;

/// Samples recorded by a hold or track run.
pub const POSITION_LOG_CAPACITY: usize = 2000;

/// Anti-windup clamp on the current-loop integrator.
pub const CURRENT_INTEGRATOR_LIMIT: f32 = 25.0;

/// Anti-windup clamp on the position-loop integrator.
pub const ANGLE_INTEGRATOR_LIMIT: f32 = 10.0;

/// Step-test reference amplitude in milliamps.
pub const STEP_TEST_AMPLITUDE: f32 = 200.0;

/// Samples per step-test reference block (the staircase alternates sign
/// every block).
pub const STEP_TEST_BLOCK: usize = 25;

/// Mutable state shared between the control loops and the host.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    pub(crate) mode: OperatingMode,

    pub(crate) current_gains: CurrentGains,
    pub(crate) position_gains: PositionGains,

    /// Current setpoint in mA, written by the position loop (or the host
    /// during an open-loop test).
    pub(crate) desired_current: f32,
    /// Angle setpoint in degrees, written by the host or advanced by the
    /// trajectory cursor.
    pub(crate) desired_angle: f32,

    pub(crate) current_integrator: f32,
    pub(crate) angle_integrator: f32,
    pub(crate) prev_angle: f32,

    /// Step-test sample cursor.
    pub(crate) step_index: usize,
    /// Hold-run sample cursor.
    pub(crate) hold_index: usize,
    /// Trajectory consumption cursor.
    pub(crate) track_cursor: usize,

    pub(crate) pwm: PwmCommand,

    pub(crate) trajectory: Trajectory,

    pub(crate) current_log: SampleLog<i32, CURRENT_LOG_CAPACITY>,
    pub(crate) hold_log: SampleLog<f32, POSITION_LOG_CAPACITY>,
    pub(crate) track_log: SampleLog<f32, POSITION_LOG_CAPACITY>,
}

impl ControlState {
    /// Create state in `Idle` with the given gains.
    pub fn new(current_gains: CurrentGains, position_gains: PositionGains) -> Self {
        Self {
            current_gains,
            position_gains,
            ..Self::default()
        }
    }

    /// Active operating mode.
    #[inline]
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Last PWM command applied to the output stage.
    #[inline]
    pub fn pwm(&self) -> PwmCommand {
        self.pwm
    }

    /// Transition to a mode, resetting the accumulators, counters, and log
    /// owned by the entered mode.
    pub(crate) fn enter_mode(&mut self, mode: OperatingMode) {
        match mode {
            OperatingMode::CurrentStepTest => {
                self.step_index = 0;
                self.current_integrator = 0.0;
                self.current_log.clear();
            }
            OperatingMode::HoldAngle => {
                self.hold_index = 0;
                self.angle_integrator = 0.0;
                self.hold_log.clear();
            }
            OperatingMode::TrackTrajectory => {
                self.track_cursor = 0;
                self.angle_integrator = 0.0;
                self.track_log.clear();
            }
            OperatingMode::Idle | OperatingMode::PwmOpenLoop => {}
        }
        self.mode = mode;
    }

    /// Accumulate a current error into the clamped integrator.
    #[inline]
    pub(crate) fn accumulate_current_error(&mut self, error: f32) {
        self.current_integrator = (self.current_integrator + error)
            .clamp(-CURRENT_INTEGRATOR_LIMIT, CURRENT_INTEGRATOR_LIMIT);
    }

    /// Accumulate an angle error into the clamped integrator.
    #[inline]
    pub(crate) fn accumulate_angle_error(&mut self, error: f32) {
        self.angle_integrator = (self.angle_integrator + error)
            .clamp(-ANGLE_INTEGRATOR_LIMIT, ANGLE_INTEGRATOR_LIMIT);
    }
}
