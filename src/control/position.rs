//! Outer position loop.
//!
//! Fixed-period PID regulation of shaft angle. Only `HoldAngle` and
//! `TrackTrajectory` run the control law; every other mode is a no-op tick.
//! The loop's output is the current setpoint consumed by the inner loop no
//! earlier than its next tick.

use crate::device::Encoder;
use crate::error::{DeviceError, Error, Result};

use super::mode::OperatingMode;
use super::state::{ControlState, POSITION_LOG_CAPACITY};

/// PID law shared by hold and track.
fn pid_current(state: &mut ControlState, reference: f32, angle: f32, period_secs: f32) -> f32 {
    let error = reference - angle;
    state.accumulate_angle_error(error);

    // Derivative on measurement over the loop period
    let rate = (state.prev_angle - angle) / period_secs;
    state.prev_angle = angle;

    let gains = state.position_gains;
    gains.kp * error + gains.ki * state.angle_integrator + gains.kd * rate
}

fn read_angle<E: Encoder>(encoder: &mut E, degrees_per_count: f32) -> Result<f32> {
    let count = encoder
        .read_count()
        .map_err(|_| Error::Device(DeviceError::Encoder))?;
    Ok(count as f32 * degrees_per_count)
}

/// Execute one position-loop tick.
pub(crate) fn tick<E: Encoder>(
    state: &mut ControlState,
    encoder: &mut E,
    degrees_per_count: f32,
    period_secs: f32,
) -> Result<()> {
    match state.mode {
        OperatingMode::HoldAngle => {
            let angle = read_angle(encoder, degrees_per_count)?;
            state.desired_current = pid_current(state, state.desired_angle, angle, period_secs);

            state.hold_log.record(state.desired_angle, angle);
            state.hold_index += 1;

            if state.hold_index == POSITION_LOG_CAPACITY - 1 {
                state.hold_index = 0;
                state.enter_mode(OperatingMode::Idle);
            }
        }

        OperatingMode::TrackTrajectory => {
            // Covers both an empty upload and a cursor past the end
            let reference = match state.trajectory.get(state.track_cursor) {
                Some(r) => r,
                None => {
                    state.track_cursor = 0;
                    state.enter_mode(OperatingMode::HoldAngle);
                    return Ok(());
                }
            };
            state.desired_angle = reference;

            let angle = read_angle(encoder, degrees_per_count)?;
            state.desired_current = pid_current(state, reference, angle, period_secs);

            state.track_log.record(reference, angle);
            state.track_cursor += 1;

            if state.track_cursor == state.trajectory.len() {
                // Hold the final commanded angle
                state.track_cursor = 0;
                state.enter_mode(OperatingMode::HoldAngle);
            }
        }

        OperatingMode::Idle => {
            // Safe state: this loop's accumulators stay cleared
            state.angle_integrator = 0.0;
            state.hold_index = 0;
            state.track_cursor = 0;
        }

        OperatingMode::PwmOpenLoop | OperatingMode::CurrentStepTest => {}
    }

    Ok(())
}
