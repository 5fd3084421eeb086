//! Host command protocol.
//!
//! Command decoding is `no_std`; the console that serves a command stream
//! needs the threaded runtime and is gated behind `std`.

mod command;
#[cfg(feature = "std")]
mod console;

pub use command::Command;

#[cfg(feature = "std")]
pub use console::{Console, DEFAULT_RUN_TIMEOUT};
