//! Error type shared by every fallible operation of the driver.

use core::fmt;

use crate::orientation::InvalidOrientation;

/// Failure of a driver operation. `E` is the error type of the `DisplayInterface` the display
/// talks through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// The interface failed to write a command, its parameters, or pixel data.
    Transport(E),
    /// The scratch pixel band for a fill could not be obtained.
    Allocation,
    /// A raw orientation value, an index or a number of degrees as given, did not name one of the
    /// four rotations.
    InvalidOrientation(u16),
    /// A command parameter is outside the range the controller accepts.
    InvalidParameter,
    /// The strict clamp policy refused a rectangle reaching outside the logical extent.
    OutOfBounds,
    /// A flush buffer does not hold exactly one pixel per rectangle cell.
    BufferSize { expected: usize, actual: usize },
    /// The end-of-transfer signal did not complete within the configured number of polls.
    Timeout,
    /// A shared display was held by another task, so a non-blocking access gave up.
    Busy,
}

impl<E> Error<E> {
    /// Whether this failure came from the bus and leaves the panel's addressing state unknown.
    pub fn is_transport(&self) -> bool {
        match self {
            Error::Transport(_) | Error::Timeout => true,
            _ => false,
        }
    }
}

impl<E> From<InvalidOrientation> for Error<E> {
    fn from(e: InvalidOrientation) -> Self {
        Error::InvalidOrientation(e.0)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "panel transport error: {:?}", e),
            Error::Allocation => f.write_str("could not allocate scratch pixel buffer"),
            Error::InvalidOrientation(v) => write!(f, "invalid orientation: {}", v),
            Error::InvalidParameter => f.write_str("command parameter out of range"),
            Error::OutOfBounds => f.write_str("rectangle outside the logical display extent"),
            Error::BufferSize { expected, actual } => write!(
                f,
                "pixel buffer holds {} pixels, rectangle needs {}",
                actual, expected
            ),
            Error::Timeout => f.write_str("transfer did not complete before the deadline"),
            Error::Busy => f.write_str("display is in use by another task"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
