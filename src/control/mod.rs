//! Control core: shared state, the two loop laws, and the engine facade.

mod current;
mod engine;
mod log;
mod mode;
mod position;
mod pwm;
mod state;
mod trajectory;

pub use engine::{Engine, EngineBuilder};
pub use log::SampleLog;
pub use mode::OperatingMode;
pub use pwm::{Direction, PwmCommand};
pub use state::{
    ControlState, ANGLE_INTEGRATOR_LIMIT, CURRENT_INTEGRATOR_LIMIT, CURRENT_LOG_CAPACITY,
    POSITION_LOG_CAPACITY, STEP_TEST_AMPLITUDE, STEP_TEST_BLOCK,
};
pub use trajectory::{Trajectory, MAX_TRAJECTORY_POINTS};
