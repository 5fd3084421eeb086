//! Operating-mode state machine.

/// Operating mode of the control engine.
///
/// Exactly one mode is active at any instant. The host sets modes through
/// [`Engine`](crate::control::Engine) operations; bounded runs hand control
/// back automatically (`CurrentStepTest` and `HoldAngle` finish in `Idle`,
/// `TrackTrajectory` finishes by holding its final angle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Safe state: PWM forced to zero, accumulators cleared every tick.
    #[default]
    Idle,
    /// Host-commanded fixed duty and direction, no feedback.
    PwmOpenLoop,
    /// 100-sample reference staircase through the current PI loop.
    CurrentStepTest,
    /// Hold a fixed shaft angle under cascade control.
    HoldAngle,
    /// Follow the uploaded reference trajectory under cascade control.
    TrackTrajectory,
}

impl OperatingMode {
    /// Mode name for host reporting.
    pub fn name(self) -> &'static str {
        match self {
            OperatingMode::Idle => "Idle",
            OperatingMode::PwmOpenLoop => "PwmOpenLoop",
            OperatingMode::CurrentStepTest => "CurrentStepTest",
            OperatingMode::HoldAngle => "HoldAngle",
            OperatingMode::TrackTrajectory => "TrackTrajectory",
        }
    }

    /// Whether the position loop runs its control law in this mode.
    #[inline]
    pub fn position_loop_active(self) -> bool {
        matches!(
            self,
            OperatingMode::HoldAngle | OperatingMode::TrackTrajectory
        )
    }

    /// Whether this mode completes on its own and hands control back.
    #[inline]
    pub fn is_bounded_run(self) -> bool {
        matches!(
            self,
            OperatingMode::CurrentStepTest
                | OperatingMode::HoldAngle
                | OperatingMode::TrackTrajectory
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_mode_is_idle() {
        assert_eq!(OperatingMode::default(), OperatingMode::Idle);
    }

    #[test]
    fn test_position_loop_activity() {
        assert!(OperatingMode::HoldAngle.position_loop_active());
        assert!(OperatingMode::TrackTrajectory.position_loop_active());
        assert!(!OperatingMode::Idle.position_loop_active());
        assert!(!OperatingMode::PwmOpenLoop.position_loop_active());
        assert!(!OperatingMode::CurrentStepTest.position_loop_active());
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(OperatingMode::Idle.name(), "Idle");
        assert_eq!(OperatingMode::TrackTrajectory.name(), "TrackTrajectory");
    }
}
