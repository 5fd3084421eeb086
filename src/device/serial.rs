//! Serial encoder link (std only).
//!
//! The encoder module answers single-byte requests over a serial line:
//! `a` returns the signed count as an ASCII decimal line, `b` zeroes the
//! count and sends nothing back. Reads block until the module answers;
//! there is no timeout on the link.

use std::io::{BufRead, Write};

use crate::error::DeviceError;

use super::encoder::Encoder;

/// Encoder reached over a request/response serial link.
pub struct SerialEncoder<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> SerialEncoder<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Wrap the read and write halves of the serial port.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Release the port halves.
    pub fn release(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn request(&mut self, command: u8) -> Result<(), DeviceError> {
        self.writer
            .write_all(&[command])
            .and_then(|_| self.writer.flush())
            .map_err(|_| DeviceError::Encoder)
    }
}

impl<R, W> Encoder for SerialEncoder<R, W>
where
    R: BufRead,
    W: Write,
{
    type Error = DeviceError;

    fn read_count(&mut self) -> Result<i32, DeviceError> {
        self.request(b'a')?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|_| DeviceError::Encoder)?;

        line.trim().parse().map_err(|_| DeviceError::Encoder)
    }

    fn zero(&mut self) -> Result<(), DeviceError> {
        self.request(b'b')
    }
}
