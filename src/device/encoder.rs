//! Encoder interface.
//!
//! The shaft encoder lives on a separate module reached over a
//! request/response link; this trait is the blocking seam the position loop
//! and the host read through. There is no timeout: a non-responding link
//! blocks the caller indefinitely.

/// Blocking interface to the quadrature encoder module.
pub trait Encoder {
    /// Transport-specific error type.
    type Error;

    /// Request the signed position count and wait for the response.
    fn read_count(&mut self) -> Result<i32, Self::Error>;

    /// Reset the position count to zero.
    fn zero(&mut self) -> Result<(), Self::Error>;
}
