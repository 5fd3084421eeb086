//! Inner current loop.
//!
//! Fixed-period PI regulation of winding current. Each tick branches on the
//! operating mode, derives a PWM command, and applies it to the output
//! stage. `CurrentStepTest` runs a bounded reference staircase and hands
//! control back to `Idle` on its own.

use crate::device::{CurrentSensor, PwmDriver};
use crate::error::{DeviceError, Error, Result};

use super::mode::OperatingMode;
use super::pwm::PwmCommand;
use super::state::{
    ControlState, CURRENT_LOG_CAPACITY, STEP_TEST_AMPLITUDE, STEP_TEST_BLOCK,
};

/// Step-test reference at a sample index: blocks of [`STEP_TEST_BLOCK`]
/// samples alternating +/- [`STEP_TEST_AMPLITUDE`].
#[inline]
pub(crate) fn step_reference(index: usize) -> f32 {
    if (index / STEP_TEST_BLOCK) % 2 == 0 {
        STEP_TEST_AMPLITUDE
    } else {
        -STEP_TEST_AMPLITUDE
    }
}

/// PI law shared by every closed-loop branch.
fn pi_command(state: &mut ControlState, setpoint: f32, measured: f32) -> PwmCommand {
    let error = setpoint - measured;
    state.accumulate_current_error(error);

    let gains = state.current_gains;
    let effort = gains.kp * error + gains.ki * state.current_integrator;
    PwmCommand::from_effort(effort)
}

/// Execute one current-loop tick.
pub(crate) fn tick<S, D>(state: &mut ControlState, sensor: &mut S, driver: &mut D) -> Result<()>
where
    S: CurrentSensor,
    D: PwmDriver,
{
    match state.mode {
        OperatingMode::Idle => {
            state.pwm = PwmCommand::ZERO;
            driver
                .apply(state.pwm)
                .map_err(|_| Error::Device(DeviceError::PwmOutput))?;
            state.current_integrator = 0.0;
            state.step_index = 0;
        }

        OperatingMode::PwmOpenLoop => {
            // Host-configured duty and direction, no feedback
            driver
                .apply(state.pwm)
                .map_err(|_| Error::Device(DeviceError::PwmOutput))?;
        }

        OperatingMode::CurrentStepTest => {
            let reference = step_reference(state.step_index);
            let measured = sensor
                .read_current()
                .map_err(|_| Error::Device(DeviceError::Sensor))?
                .0;

            let command = pi_command(state, reference, measured);
            state.pwm = command;
            driver
                .apply(command)
                .map_err(|_| Error::Device(DeviceError::PwmOutput))?;

            state.current_log.record(reference as i32, measured as i32);

            if state.step_index == CURRENT_LOG_CAPACITY - 1 {
                state.step_index = 0;
                state.current_integrator = 0.0;
                state.enter_mode(OperatingMode::Idle);
            } else {
                state.step_index += 1;
            }
        }

        OperatingMode::HoldAngle | OperatingMode::TrackTrajectory => {
            let measured = sensor
                .read_current()
                .map_err(|_| Error::Device(DeviceError::Sensor))?
                .0;

            let command = pi_command(state, state.desired_current, measured);
            state.pwm = command;
            driver
                .apply(command)
                .map_err(|_| Error::Device(DeviceError::PwmOutput))?;
        }
    }

    Ok(())
}
