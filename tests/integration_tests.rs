//! Integration tests for servo-motion.
//!
//! These tests drive the complete stack: simulated peripherals under the
//! threaded runtime, exercised through the ASCII console protocol.

use std::io::Cursor;
use std::time::Duration;

use servo_motion::config::units::Milliamps;
use servo_motion::runtime::LoopPeriods;
use servo_motion::{
    Console, ControlRuntime, CurrentSensor, Encoder, Engine, OperatingMode, PwmCommand, PwmDriver,
};

// =============================================================================
// Simulated peripherals
// =============================================================================

/// Current sensor reporting a constant reading.
struct SimSensor(f32);

impl CurrentSensor for SimSensor {
    type Error = std::convert::Infallible;

    fn read_current(&mut self) -> Result<Milliamps, Self::Error> {
        Ok(Milliamps(self.0))
    }
}

/// Encoder holding a fixed count until zeroed.
struct SimEncoder {
    count: i32,
}

impl Encoder for SimEncoder {
    type Error = std::convert::Infallible;

    fn read_count(&mut self) -> Result<i32, Self::Error> {
        Ok(self.count)
    }

    fn zero(&mut self) -> Result<(), Self::Error> {
        self.count = 0;
        Ok(())
    }
}

/// Output stage that accepts every command.
struct SimBridge;

impl PwmDriver for SimBridge {
    type Error = std::convert::Infallible;

    fn apply(&mut self, _command: PwmCommand) -> Result<(), Self::Error> {
        Ok(())
    }
}

type SimRuntime = ControlRuntime<SimSensor, SimEncoder, SimBridge>;

fn spawn_runtime(current_ma: f32, encoder_count: i32) -> SimRuntime {
    let engine = Engine::builder()
        .current_sensor(SimSensor(current_ma))
        .encoder(SimEncoder {
            count: encoder_count,
        })
        .pwm_driver(SimBridge)
        .build()
        .expect("engine should build");

    ControlRuntime::spawn(engine, LoopPeriods::unpaced())
}

/// Feed a command script through a console and collect the response text
/// and the final error-indicator state.
fn run_script(runtime: &SimRuntime, script: &str) -> (String, bool) {
    let reader = Cursor::new(script.as_bytes().to_vec());
    let mut output = Vec::new();

    let mut console = Console::new(runtime, reader, &mut output)
        .with_run_timeout(Duration::from_secs(60));
    console.serve().expect("console session should succeed");
    let error_flag = console.error_flag();
    drop(console);

    (String::from_utf8(output).expect("responses are ASCII"), error_flag)
}

fn response_lines(output: &str) -> Vec<&str> {
    output.lines().collect()
}

// =============================================================================
// Readouts
// =============================================================================

#[test]
fn test_read_current() {
    let runtime = spawn_runtime(123.5, 0);
    let (output, _) = run_script(&runtime, "b\n");

    assert_eq!(response_lines(&output), ["123.500000"]);
    runtime.shutdown();
}

#[test]
fn test_encoder_readouts_and_zeroing() {
    let runtime = spawn_runtime(0.0, 1336);
    let (output, _) = run_script(&runtime, "c\nd\ne\nc\n");

    let lines = response_lines(&output);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "1336");

    // 1336 counts at 360/1336 degrees per count is one revolution
    let degrees: f32 = lines[1].parse().unwrap();
    assert!((degrees - 360.0).abs() < 1e-3);

    // 'e' zeroes, then reads back; a following 'c' agrees
    assert_eq!(lines[2], "0");
    assert_eq!(lines[3], "0");
    runtime.shutdown();
}

// =============================================================================
// Gain configuration
// =============================================================================

#[test]
fn test_current_gains_roundtrip() {
    let runtime = spawn_runtime(0.0, 0);
    let (output, _) = run_script(&runtime, "g\n1.5\n0.3\nh\n");

    assert_eq!(
        response_lines(&output),
        ["1.500000", "0.300000", "1.500000", "0.300000"]
    );
    runtime.shutdown();
}

#[test]
fn test_position_gains_roundtrip() {
    let runtime = spawn_runtime(0.0, 0);
    let (output, _) = run_script(&runtime, "i\n12.0\n2.0\n4.5\nj\n");

    assert_eq!(
        response_lines(&output),
        ["12.000000", "2.000000", "4.500000", "12.000000", "2.000000", "4.500000"]
    );
    runtime.shutdown();
}

#[test]
fn test_malformed_gain_preserves_previous() {
    let runtime = spawn_runtime(0.0, 0);
    let (output, error_flag) = run_script(&runtime, "g\nbogus\n");

    assert!(output.is_empty());
    assert!(error_flag);

    let gains = runtime.with_engine(|engine| engine.current_gains());
    assert!((gains.kp - 0.0).abs() < 1e-9);
    assert!((gains.ki - 1.0).abs() < 1e-9);
    runtime.shutdown();
}

// =============================================================================
// Open-loop PWM and safe stop
// =============================================================================

#[test]
fn test_open_loop_pwm() {
    let runtime = spawn_runtime(0.0, 0);
    let (output, error_flag) = run_script(&runtime, "f\n50\n");

    assert_eq!(response_lines(&output), ["50"]);
    assert!(!error_flag);
    assert_eq!(runtime.mode(), OperatingMode::PwmOpenLoop);
    runtime.shutdown();
}

#[test]
fn test_stop_returns_to_idle() {
    let runtime = spawn_runtime(0.0, 0);
    let (output, _) = run_script(&runtime, "f\n70\np\n");

    assert_eq!(response_lines(&output), ["70", "0"]);
    assert_eq!(runtime.mode(), OperatingMode::Idle);
    runtime.shutdown();
}

#[test]
fn test_unknown_command_raises_indicator() {
    let runtime = spawn_runtime(0.0, 0);
    let (output, error_flag) = run_script(&runtime, "z\n");

    assert!(output.is_empty());
    assert!(error_flag);
    assert_eq!(runtime.mode(), OperatingMode::Idle);
    runtime.shutdown();
}

#[test]
fn test_accepted_command_clears_indicator() {
    let runtime = spawn_runtime(0.0, 0);
    let (_, error_flag) = run_script(&runtime, "z\nr\n");

    assert!(!error_flag);
    runtime.shutdown();
}

#[test]
fn test_mode_report() {
    let runtime = spawn_runtime(0.0, 0);
    let (output, _) = run_script(&runtime, "r\n");

    assert_eq!(response_lines(&output), ["Current mode: Idle"]);
    runtime.shutdown();
}

#[test]
fn test_quit_ends_session() {
    let runtime = spawn_runtime(0.0, 0);
    let (output, _) = run_script(&runtime, "q\nf\n50\n");

    // Nothing after 'q' is processed
    assert!(output.is_empty());
    assert_eq!(runtime.mode(), OperatingMode::Idle);
    runtime.shutdown();
}

// =============================================================================
// Current step test
// =============================================================================

#[test]
fn test_step_test_streams_staircase() {
    let runtime = spawn_runtime(0.0, 0);
    let (output, _) = run_script(&runtime, "k\n");

    let lines = response_lines(&output);
    assert_eq!(lines.len(), 101);
    assert_eq!(lines[0], "100");

    for (i, line) in lines[1..].iter().enumerate() {
        let expected_ref = if (i / 25) % 2 == 0 { "200" } else { "-200" };
        let mut fields = line.split_whitespace();
        assert_eq!(fields.next(), Some(expected_ref), "sample {}", i);
        assert_eq!(fields.next(), Some("0"), "sample {}", i);
    }

    assert_eq!(runtime.mode(), OperatingMode::Idle);
    runtime.shutdown();
}

// =============================================================================
// Hold and track runs
// =============================================================================

#[test]
fn test_hold_run_streams_full_capacity() {
    let runtime = spawn_runtime(0.0, 0);
    let (output, _) = run_script(&runtime, "l\n90\n");

    let lines = response_lines(&output);
    // Echo, count, then the full log capacity
    assert_eq!(lines.len(), 2 + 2000);
    assert_eq!(lines[0], "90");
    assert_eq!(lines[1], "2000");
    assert_eq!(lines[2], "90.000000 0.000000");

    // The run records capacity - 1 samples; the final line is padding
    assert_eq!(lines[2000], "90.000000 0.000000");
    assert_eq!(lines[2001], "0.000000 0.000000");

    assert_eq!(runtime.mode(), OperatingMode::Idle);
    runtime.shutdown();
}

#[test]
fn test_trajectory_upload_and_track_roundtrip() {
    let runtime = spawn_runtime(0.0, 0);

    let mut script = String::from("m\n5\n");
    for reference in ["0.0", "15.0", "30.0", "45.0", "60.0"] {
        script.push_str(reference);
        script.push('\n');
    }
    script.push_str("o\n");

    let (output, error_flag) = run_script(&runtime, &script);
    assert!(!error_flag);

    let lines = response_lines(&output);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "5");

    let expected = ["0.000000", "15.000000", "30.000000", "45.000000", "60.000000"];
    for (i, line) in lines[1..].iter().enumerate() {
        let mut fields = line.split_whitespace();
        assert_eq!(fields.next(), Some(expected[i]), "sample {}", i);
        // Zero-error plant reads back a stationary shaft
        assert_eq!(fields.next(), Some("0.000000"), "sample {}", i);
    }

    runtime.shutdown();
}

#[test]
fn test_oversized_upload_raises_indicator() {
    let runtime = spawn_runtime(0.0, 0);

    let mut script = String::from("m\n2001\n");
    for i in 0..2001 {
        script.push_str(&format!("{}.0\n", i));
    }

    let (output, error_flag) = run_script(&runtime, &script);
    assert!(output.is_empty());
    assert!(error_flag);

    // The previous (empty) trajectory is kept
    let len = runtime.with_engine(|engine| engine.trajectory_len());
    assert_eq!(len, 0);
    runtime.shutdown();
}
