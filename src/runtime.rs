//! Threaded control runtime (std only).
//!
//! Maps the firmware's two timer interrupts onto two periodic threads over a
//! shared engine. The current loop runs at the higher rate and therefore
//! always outpaces the position loop; a current setpoint written by the
//! position loop is consumed no earlier than the next current tick.
//!
//! The host blocks on bounded runs through [`ControlRuntime::run_to_completion`],
//! a rendezvous on the mode word: loop threads signal whenever a tick changes
//! the mode. Unlike the busy-wait it replaces, the rendezvous carries an
//! explicit timeout; on expiry the engine is forced back to `Idle`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::SystemConfig;
use crate::control::{Engine, OperatingMode};
use crate::device::{CurrentSensor, Encoder, PwmDriver};
use crate::error::{Error, ProtocolError, Result};

/// Tick periods for the two loop threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopPeriods {
    /// Current-loop tick period.
    pub current: Duration,
    /// Position-loop tick period.
    pub position: Duration,
}

impl LoopPeriods {
    /// Periods from the configured loop rates.
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            current: Duration::from_nanos(config.current_loop.rate_hz.period_ns()),
            position: Duration::from_nanos(config.position_loop.rate_hz.period_ns()),
        }
    }

    /// Free-running ticks with no pacing. Loop threads yield instead of
    /// sleeping; intended for simulation and tests.
    pub fn unpaced() -> Self {
        Self {
            current: Duration::ZERO,
            position: Duration::ZERO,
        }
    }
}

struct Shared<S, E, D>
where
    S: CurrentSensor,
    E: Encoder,
    D: PwmDriver,
{
    engine: Mutex<Engine<S, E, D>>,
    mode_changed: Condvar,
}

/// Owns the engine and the two periodic loop threads.
pub struct ControlRuntime<S, E, D>
where
    S: CurrentSensor,
    E: Encoder,
    D: PwmDriver,
{
    shared: Arc<Shared<S, E, D>>,
    running: Arc<AtomicBool>,
    threads: Vec<JoinHandle<()>>,
}

impl<S, E, D> ControlRuntime<S, E, D>
where
    S: CurrentSensor + Send + 'static,
    E: Encoder + Send + 'static,
    D: PwmDriver + Send + 'static,
{
    /// Start the two loop threads around an engine.
    pub fn spawn(engine: Engine<S, E, D>, periods: LoopPeriods) -> Self {
        let shared = Arc::new(Shared {
            engine: Mutex::new(engine),
            mode_changed: Condvar::new(),
        });
        let running = Arc::new(AtomicBool::new(true));

        let current_thread = {
            let shared = Arc::clone(&shared);
            let running = Arc::clone(&running);
            let period = periods.current;
            thread::Builder::new()
                .name("current-loop".into())
                .spawn(move || loop_thread(&shared, &running, period, Engine::current_tick))
                .expect("failed to spawn current-loop thread")
        };

        let position_thread = {
            let shared = Arc::clone(&shared);
            let running = Arc::clone(&running);
            let period = periods.position;
            thread::Builder::new()
                .name("position-loop".into())
                .spawn(move || loop_thread(&shared, &running, period, Engine::position_tick))
                .expect("failed to spawn position-loop thread")
        };

        Self {
            shared,
            running,
            threads: vec![current_thread, position_thread],
        }
    }

    /// Run a closure with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut Engine<S, E, D>) -> R) -> R {
        let mut engine = self
            .shared
            .engine
            .lock()
            .expect("control engine lock poisoned");
        f(&mut engine)
    }

    /// Active operating mode.
    pub fn mode(&self) -> OperatingMode {
        self.with_engine(|engine| engine.mode())
    }

    /// Start a bounded run and block until the loop hands control back.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::RunTimeout`] if the run is still active when
    /// the timeout expires; the engine is forced to `Idle` first.
    pub fn run_to_completion(&self, mode: OperatingMode, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;

        let mut engine = self
            .shared
            .engine
            .lock()
            .expect("control engine lock poisoned");
        engine.start(mode);

        while engine.mode() == mode {
            let now = Instant::now();
            if now >= deadline {
                engine.stop();
                return Err(Error::Protocol(ProtocolError::RunTimeout {
                    mode: mode.name(),
                }));
            }

            let (guard, _) = self
                .shared
                .mode_changed
                .wait_timeout(engine, deadline - now)
                .expect("control engine lock poisoned");
            engine = guard;
        }

        Ok(())
    }

    /// Stop the loop threads and return the engine.
    pub fn shutdown(mut self) -> Engine<S, E, D> {
        self.stop_threads();

        let shared = Arc::clone(&self.shared);
        drop(self);

        let shared = Arc::try_unwrap(shared)
            .unwrap_or_else(|_| panic!("loop thread still holds the engine"));
        shared
            .engine
            .into_inner()
            .expect("control engine lock poisoned")
    }

    fn stop_threads(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }
}

impl<S, E, D> Drop for ControlRuntime<S, E, D>
where
    S: CurrentSensor,
    E: Encoder,
    D: PwmDriver,
{
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }
}

fn loop_thread<S, E, D>(
    shared: &Shared<S, E, D>,
    running: &AtomicBool,
    period: Duration,
    tick: fn(&mut Engine<S, E, D>) -> Result<()>,
) where
    S: CurrentSensor,
    E: Encoder,
    D: PwmDriver,
{
    while running.load(Ordering::Relaxed) {
        {
            let mut engine = match shared.engine.lock() {
                Ok(engine) => engine,
                Err(_) => return,
            };
            let before = engine.mode();
            // Peripheral faults leave the state unchanged for this tick;
            // the next tick retries
            let _ = tick(&mut engine);
            if engine.mode() != before {
                shared.mode_changed.notify_all();
            }
        }

        pace(running, period);
    }
}

/// Sleep out one tick period in interruptible slices; a zero period yields
/// instead so free-running loops still let each other make progress.
fn pace(running: &AtomicBool, period: Duration) {
    if period.is_zero() {
        thread::yield_now();
        return;
    }

    let deadline = Instant::now() + period;
    while running.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(Duration::from_millis(5)));
    }
}
