//! Control engine.
//!
//! Ties the shared control state to the three peripherals and exposes the
//! host-facing operations. The two periodic entry points, [`Engine::current_tick`]
//! and [`Engine::position_tick`], are driven by an external scheduler (the
//! threaded [`runtime`](crate::runtime) under `std`, or timer callbacks on a
//! bare-metal target).

use crate::config::units::{Degrees, Milliamps};
use crate::config::{CurrentGains, PositionGains, SystemConfig};
use crate::device::{CurrentSensor, Encoder, PwmDriver};
use crate::error::{ConfigError, DeviceError, Error, Result};

use super::log::SampleLog;
use super::mode::OperatingMode;
use super::pwm::PwmCommand;
use super::state::{ControlState, CURRENT_LOG_CAPACITY, POSITION_LOG_CAPACITY};
use super::{current, position};

/// Cascade control engine.
///
/// Generic over:
/// - `S`: current-sense device
/// - `E`: encoder link
/// - `D`: PWM output stage
pub struct Engine<S, E, D>
where
    S: CurrentSensor,
    E: Encoder,
    D: PwmDriver,
{
    state: ControlState,
    sensor: S,
    encoder: E,
    driver: D,

    /// Shaft degrees represented by one encoder count.
    degrees_per_count: f32,
    /// Position-loop period in seconds (the PID derivative timebase).
    position_period_secs: f32,
}

impl<S, E, D> Engine<S, E, D>
where
    S: CurrentSensor,
    E: Encoder,
    D: PwmDriver,
{
    /// Start building an engine.
    pub fn builder() -> EngineBuilder<S, E, D> {
        EngineBuilder::new()
    }

    /// Active operating mode.
    #[inline]
    pub fn mode(&self) -> OperatingMode {
        self.state.mode()
    }

    /// Execute one inner-loop tick at the current-loop rate.
    pub fn current_tick(&mut self) -> Result<()> {
        current::tick(&mut self.state, &mut self.sensor, &mut self.driver)
    }

    /// Execute one outer-loop tick at the position-loop rate.
    pub fn position_tick(&mut self) -> Result<()> {
        position::tick(
            &mut self.state,
            &mut self.encoder,
            self.degrees_per_count,
            self.position_period_secs,
        )
    }

    /// Force the safe state: `Idle` with zero output.
    pub fn stop(&mut self) {
        self.state.pwm = PwmCommand::ZERO;
        self.state.enter_mode(OperatingMode::Idle);
    }

    /// Begin a run in the given mode, resetting that mode's accumulators
    /// and log.
    pub fn start(&mut self, mode: OperatingMode) {
        self.state.enter_mode(mode);
    }

    /// Set an open-loop duty request and switch to `PwmOpenLoop`.
    ///
    /// Returns the applied signed duty after saturation.
    pub fn set_open_loop_pwm(&mut self, duty: i32) -> i32 {
        self.state.pwm = PwmCommand::from_signed(duty);
        self.state.enter_mode(OperatingMode::PwmOpenLoop);
        self.state.pwm.signed()
    }

    /// Last PWM command applied to the output stage.
    #[inline]
    pub fn pwm(&self) -> PwmCommand {
        self.state.pwm()
    }

    /// Current-loop gains.
    #[inline]
    pub fn current_gains(&self) -> CurrentGains {
        self.state.current_gains
    }

    /// Replace the current-loop gains.
    pub fn set_current_gains(&mut self, gains: CurrentGains) {
        self.state.current_gains = gains;
    }

    /// Position-loop gains.
    #[inline]
    pub fn position_gains(&self) -> PositionGains {
        self.state.position_gains
    }

    /// Replace the position-loop gains.
    pub fn set_position_gains(&mut self, gains: PositionGains) {
        self.state.position_gains = gains;
    }

    /// Angle setpoint for hold runs.
    #[inline]
    pub fn desired_angle(&self) -> Degrees {
        Degrees(self.state.desired_angle)
    }

    /// Set the angle setpoint, clearing the position-loop history that a
    /// previous setpoint accumulated.
    pub fn set_desired_angle(&mut self, angle: Degrees) {
        self.state.desired_angle = angle.0;
        self.state.prev_angle = 0.0;
        self.state.angle_integrator = 0.0;
    }

    /// Current setpoint commanded by the position loop.
    #[inline]
    pub fn desired_current(&self) -> Milliamps {
        Milliamps(self.state.desired_current)
    }

    /// Read the instantaneous winding current.
    pub fn read_current(&mut self) -> Result<Milliamps> {
        self.sensor
            .read_current()
            .map_err(|_| Error::Device(DeviceError::Sensor))
    }

    /// Read the raw encoder count.
    pub fn encoder_count(&mut self) -> Result<i32> {
        self.encoder
            .read_count()
            .map_err(|_| Error::Device(DeviceError::Encoder))
    }

    /// Read the shaft angle in degrees.
    pub fn encoder_degrees(&mut self) -> Result<Degrees> {
        Ok(Degrees(self.encoder_count()? as f32 * self.degrees_per_count))
    }

    /// Zero the encoder count.
    pub fn zero_encoder(&mut self) -> Result<()> {
        self.encoder
            .zero()
            .map_err(|_| Error::Device(DeviceError::Encoder))
    }

    /// Replace the reference trajectory.
    pub fn load_trajectory<I>(&mut self, references: I) -> Result<()>
    where
        I: IntoIterator<Item = f32>,
    {
        self.state.trajectory.load(references)
    }

    /// Number of points in the loaded trajectory.
    #[inline]
    pub fn trajectory_len(&self) -> usize {
        self.state.trajectory.len()
    }

    /// Step-test log, valid after a `CurrentStepTest` run completes.
    #[inline]
    pub fn step_test_log(&self) -> &SampleLog<i32, CURRENT_LOG_CAPACITY> {
        &self.state.current_log
    }

    /// Hold log, valid after a `HoldAngle` run completes.
    #[inline]
    pub fn hold_log(&self) -> &SampleLog<f32, POSITION_LOG_CAPACITY> {
        &self.state.hold_log
    }

    /// Track log, valid after a `TrackTrajectory` run completes.
    #[inline]
    pub fn track_log(&self) -> &SampleLog<f32, POSITION_LOG_CAPACITY> {
        &self.state.track_log
    }

    /// Release the peripherals.
    pub fn release(self) -> (S, E, D) {
        (self.sensor, self.encoder, self.driver)
    }
}

/// Builder for [`Engine`] instances.
pub struct EngineBuilder<S, E, D>
where
    S: CurrentSensor,
    E: Encoder,
    D: PwmDriver,
{
    sensor: Option<S>,
    encoder: Option<E>,
    driver: Option<D>,
    current_gains: CurrentGains,
    position_gains: PositionGains,
    degrees_per_count: f32,
    position_period_secs: f32,
}

impl<S, E, D> Default for EngineBuilder<S, E, D>
where
    S: CurrentSensor,
    E: Encoder,
    D: PwmDriver,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, E, D> EngineBuilder<S, E, D>
where
    S: CurrentSensor,
    E: Encoder,
    D: PwmDriver,
{
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        let config = SystemConfig::default();
        Self {
            sensor: None,
            encoder: None,
            driver: None,
            current_gains: config.current_loop.gains(),
            position_gains: config.position_loop.gains(),
            degrees_per_count: config.encoder.degrees_per_count(),
            position_period_secs: config.position_period_secs(),
        }
    }

    /// Set the current-sense device.
    pub fn current_sensor(mut self, sensor: S) -> Self {
        self.sensor = Some(sensor);
        self
    }

    /// Set the encoder link.
    pub fn encoder(mut self, encoder: E) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Set the PWM output stage.
    pub fn pwm_driver(mut self, driver: D) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Configure gains, loop timing, and encoder scale from a
    /// [`SystemConfig`].
    pub fn from_config(mut self, config: &SystemConfig) -> Self {
        self.current_gains = config.current_loop.gains();
        self.position_gains = config.position_loop.gains();
        self.degrees_per_count = config.encoder.degrees_per_count();
        self.position_period_secs = config.position_period_secs();
        self
    }

    /// Build the engine in `Idle`.
    ///
    /// # Errors
    ///
    /// Returns an error if a peripheral was not supplied.
    pub fn build(self) -> Result<Engine<S, E, D>> {
        let sensor = self
            .sensor
            .ok_or(Error::Config(ConfigError::MissingField("current_sensor")))?;
        let encoder = self
            .encoder
            .ok_or(Error::Config(ConfigError::MissingField("encoder")))?;
        let driver = self
            .driver
            .ok_or(Error::Config(ConfigError::MissingField("pwm_driver")))?;

        Ok(Engine {
            state: ControlState::new(self.current_gains, self.position_gains),
            sensor,
            encoder,
            driver,
            degrees_per_count: self.degrees_per_count,
            position_period_secs: self.position_period_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Direction;

    struct FakeSensor;

    impl CurrentSensor for FakeSensor {
        type Error = core::convert::Infallible;

        fn read_current(&mut self) -> core::result::Result<Milliamps, Self::Error> {
            Ok(Milliamps(123.5))
        }
    }

    struct FakeEncoder {
        count: i32,
    }

    impl Encoder for FakeEncoder {
        type Error = core::convert::Infallible;

        fn read_count(&mut self) -> core::result::Result<i32, Self::Error> {
            Ok(self.count)
        }

        fn zero(&mut self) -> core::result::Result<(), Self::Error> {
            self.count = 0;
            Ok(())
        }
    }

    struct FakeDriver;

    impl PwmDriver for FakeDriver {
        type Error = core::convert::Infallible;

        fn apply(&mut self, _command: PwmCommand) -> core::result::Result<(), Self::Error> {
            Ok(())
        }
    }

    fn test_engine() -> Engine<FakeSensor, FakeEncoder, FakeDriver> {
        Engine::builder()
            .current_sensor(FakeSensor)
            .encoder(FakeEncoder { count: 1336 })
            .pwm_driver(FakeDriver)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_peripherals() {
        let result = EngineBuilder::<FakeSensor, FakeEncoder, FakeDriver>::new()
            .current_sensor(FakeSensor)
            .build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField("encoder")))
        ));
    }

    #[test]
    fn test_starts_idle_with_default_gains() {
        let engine = test_engine();
        assert_eq!(engine.mode(), OperatingMode::Idle);
        assert!((engine.current_gains().ki - 1.0).abs() < 1e-9);
        assert!((engine.position_gains().kp - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_open_loop_pwm_saturates() {
        let mut engine = test_engine();
        assert_eq!(engine.set_open_loop_pwm(150), 100);
        assert_eq!(engine.mode(), OperatingMode::PwmOpenLoop);
        assert_eq!(engine.pwm().direction, Direction::Forward);

        assert_eq!(engine.set_open_loop_pwm(-30), -30);
        assert_eq!(engine.pwm().direction, Direction::Reverse);
    }

    #[test]
    fn test_stop_forces_idle_and_zero() {
        let mut engine = test_engine();
        engine.set_open_loop_pwm(80);

        engine.stop();
        assert_eq!(engine.mode(), OperatingMode::Idle);
        assert_eq!(engine.pwm(), PwmCommand::ZERO);
    }

    #[test]
    fn test_encoder_degrees_scale() {
        let mut engine = test_engine();
        // One full revolution of counts
        let degs = engine.encoder_degrees().unwrap();
        assert!((degs.value() - 360.0).abs() < 1e-3);
    }

    #[test]
    fn test_set_desired_angle_clears_history() {
        let mut engine = test_engine();
        engine.state.angle_integrator = 5.0;
        engine.state.prev_angle = 17.0;

        engine.set_desired_angle(Degrees(90.0));

        assert_eq!(engine.desired_angle().value(), 90.0);
        assert_eq!(engine.state.angle_integrator, 0.0);
        assert_eq!(engine.state.prev_angle, 0.0);
    }
}
