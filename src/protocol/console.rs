//! Host console (std only).
//!
//! Reads newline-terminated command lines, dispatches on the leading byte,
//! and writes text responses. Floating-point responses use six decimal
//! places; lines end in CRLF.
//!
//! Bad input never aborts the session: an unrecognized selector or a
//! malformed numeric parameter raises the error indicator, leaves the
//! targeted state at its prior value, and the loop moves on to the next
//! line. Transport and peripheral failures, and run timeouts, do end the
//! session with a structured error.

use std::io::{BufRead, Write};
use std::time::Duration;

use crate::config::units::Degrees;
use crate::config::{CurrentGains, PositionGains};
use crate::control::OperatingMode;
use crate::device::{CurrentSensor, Encoder, PwmDriver};
use crate::error::{Error, ProtocolError, Result};
use crate::runtime::ControlRuntime;

use super::command::Command;

/// Default limit on how long a bounded run may block the console.
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(30);

enum Flow {
    Continue,
    Quit,
}

/// Line-based command console over a [`ControlRuntime`].
pub struct Console<'a, S, E, D, R, W>
where
    S: CurrentSensor + Send + 'static,
    E: Encoder + Send + 'static,
    D: PwmDriver + Send + 'static,
    R: BufRead,
    W: Write,
{
    runtime: &'a ControlRuntime<S, E, D>,
    reader: R,
    writer: W,
    run_timeout: Duration,
    /// Visible error indicator; raised on bad input, cleared by the next
    /// accepted command.
    error_flag: bool,
    /// The first hold run zeroes the encoder so angles are relative to the
    /// session start.
    hold_zeroed: bool,
}

impl<'a, S, E, D, R, W> Console<'a, S, E, D, R, W>
where
    S: CurrentSensor + Send + 'static,
    E: Encoder + Send + 'static,
    D: PwmDriver + Send + 'static,
    R: BufRead,
    W: Write,
{
    /// Create a console over a running control runtime.
    pub fn new(runtime: &'a ControlRuntime<S, E, D>, reader: R, writer: W) -> Self {
        Self {
            runtime,
            reader,
            writer,
            run_timeout: DEFAULT_RUN_TIMEOUT,
            error_flag: false,
            hold_zeroed: false,
        }
    }

    /// Override the run-completion timeout.
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    /// Whether the error indicator is raised.
    pub fn error_flag(&self) -> bool {
        self.error_flag
    }

    /// Serve commands until `q` or end of input.
    pub fn serve(&mut self) -> Result<()> {
        loop {
            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(()),
            };

            match self.dispatch(&line)? {
                Flow::Continue => {}
                Flow::Quit => return Ok(()),
            }
        }
    }

    fn dispatch(&mut self, line: &str) -> Result<Flow> {
        let command = match Command::parse(line) {
            Some(command) => {
                self.error_flag = false;
                command
            }
            None => {
                self.error_flag = true;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::ReadCurrent => {
                let current = self.runtime.with_engine(|engine| engine.read_current())?;
                self.write_line(format_args!("{:.6}", current.value()))?;
            }

            Command::ReadEncoderCount => {
                let count = self.runtime.with_engine(|engine| engine.encoder_count())?;
                self.write_line(format_args!("{}", count))?;
            }

            Command::ReadEncoderDegrees => {
                let degrees = self
                    .runtime
                    .with_engine(|engine| engine.encoder_degrees())?;
                self.write_line(format_args!("{:.6}", degrees.value()))?;
            }

            Command::ZeroEncoder => {
                let count = self.runtime.with_engine(|engine| {
                    engine.zero_encoder()?;
                    engine.encoder_count()
                })?;
                self.write_line(format_args!("{}", count))?;
            }

            Command::SetPwm => {
                let Some(duty) = self.read_param::<i32>()? else {
                    return Ok(Flow::Continue);
                };
                let applied = self
                    .runtime
                    .with_engine(|engine| engine.set_open_loop_pwm(duty));
                self.write_line(format_args!("{}", applied))?;
            }

            Command::SetCurrentGains => {
                let Some(kp) = self.read_param::<f32>()? else {
                    return Ok(Flow::Continue);
                };
                let Some(ki) = self.read_param::<f32>()? else {
                    return Ok(Flow::Continue);
                };
                let gains = CurrentGains { kp, ki };
                self.runtime
                    .with_engine(|engine| engine.set_current_gains(gains));
                self.report_current_gains()?;
            }

            Command::GetCurrentGains => self.report_current_gains()?,

            Command::SetPositionGains => {
                let Some(kp) = self.read_param::<f32>()? else {
                    return Ok(Flow::Continue);
                };
                let Some(ki) = self.read_param::<f32>()? else {
                    return Ok(Flow::Continue);
                };
                let Some(kd) = self.read_param::<f32>()? else {
                    return Ok(Flow::Continue);
                };
                let gains = PositionGains { kp, ki, kd };
                self.runtime
                    .with_engine(|engine| engine.set_position_gains(gains));
                self.report_position_gains()?;
            }

            Command::GetPositionGains => self.report_position_gains()?,

            Command::RunStepTest => {
                self.runtime
                    .run_to_completion(OperatingMode::CurrentStepTest, self.run_timeout)?;

                let samples = self.runtime.with_engine(|engine| {
                    engine.step_test_log().iter().collect::<Vec<_>>()
                });
                self.write_line(format_args!("{}", samples.len()))?;
                for (reference, actual) in samples {
                    self.write_line(format_args!("{} {}", reference, actual))?;
                }
            }

            Command::HoldAngle => {
                let Some(angle) = self.read_param::<i32>()? else {
                    return Ok(Flow::Continue);
                };

                if !self.hold_zeroed {
                    self.runtime.with_engine(|engine| engine.zero_encoder())?;
                    self.hold_zeroed = true;
                }

                self.runtime
                    .with_engine(|engine| engine.set_desired_angle(Degrees(angle as f32)));
                self.write_line(format_args!("{}", angle))?;

                self.runtime
                    .run_to_completion(OperatingMode::HoldAngle, self.run_timeout)?;

                // The full capacity is streamed; samples the run never
                // reached print as zeros
                let (capacity, samples) = self.runtime.with_engine(|engine| {
                    let log = engine.hold_log();
                    (log.capacity(), log.iter().collect::<Vec<_>>())
                });
                self.write_line(format_args!("{}", capacity))?;
                for index in 0..capacity {
                    let (reference, actual) =
                        samples.get(index).copied().unwrap_or((0.0, 0.0));
                    self.write_line(format_args!("{:.6} {:.6}", reference, actual))?;
                }
            }

            Command::LoadTrajectory => {
                let Some(length) = self.read_param::<usize>()? else {
                    return Ok(Flow::Continue);
                };

                // Consume every uploaded line even if a value is malformed
                // or the buffer overflows, so the stream stays in sync
                let mut references = Vec::with_capacity(length.min(4096));
                for _ in 0..length {
                    let value = match self.read_line()? {
                        Some(line) => match line.trim().parse::<f32>() {
                            Ok(value) => value,
                            Err(_) => {
                                self.error_flag = true;
                                0.0
                            }
                        },
                        None => break,
                    };
                    references.push(value);
                }

                if self
                    .runtime
                    .with_engine(|engine| engine.load_trajectory(references))
                    .is_err()
                {
                    self.error_flag = true;
                }
            }

            Command::TrackTrajectory => {
                self.runtime
                    .run_to_completion(OperatingMode::TrackTrajectory, self.run_timeout)?;

                let samples = self
                    .runtime
                    .with_engine(|engine| engine.track_log().iter().collect::<Vec<_>>());
                self.write_line(format_args!("{}", samples.len()))?;
                for (reference, actual) in samples {
                    self.write_line(format_args!("{:.6} {:.6}", reference, actual))?;
                }
            }

            Command::Stop => {
                let applied = self.runtime.with_engine(|engine| {
                    engine.stop();
                    engine.pwm().signed()
                });
                self.write_line(format_args!("{}", applied))?;
            }

            Command::ReportMode => {
                let mode = self.runtime.mode();
                self.write_line(format_args!("Current mode: {}", mode.name()))?;
            }

            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn report_current_gains(&mut self) -> Result<()> {
        let gains = self.runtime.with_engine(|engine| engine.current_gains());
        self.write_line(format_args!("{:.6}", gains.kp))?;
        self.write_line(format_args!("{:.6}", gains.ki))
    }

    fn report_position_gains(&mut self) -> Result<()> {
        let gains = self.runtime.with_engine(|engine| engine.position_gains());
        self.write_line(format_args!("{:.6}", gains.kp))?;
        self.write_line(format_args!("{:.6}", gains.ki))?;
        self.write_line(format_args!("{:.6}", gains.kd))
    }

    /// Read one line; `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(transport_error)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Read a numeric parameter line. A malformed value (or end of input)
    /// raises the error indicator and yields `None`; the caller leaves the
    /// target at its prior value.
    fn read_param<T: core::str::FromStr>(&mut self) -> Result<Option<T>> {
        let Some(line) = self.read_line()? else {
            self.error_flag = true;
            return Ok(None);
        };
        match line.trim().parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.error_flag = true;
                Ok(None)
            }
        }
    }

    fn write_line(&mut self, args: core::fmt::Arguments<'_>) -> Result<()> {
        self.writer
            .write_fmt(format_args!("{}\r\n", args))
            .map_err(transport_error)
    }
}

fn transport_error(e: std::io::Error) -> Error {
    let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
    Error::Protocol(ProtocolError::Transport(msg))
}
