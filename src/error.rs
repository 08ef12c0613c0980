//! Controller error type.
//!
//! Hitting a physical limit is not an error; [`MotorDriver::step`] reports
//! it as `Ok(false)`. Errors only come from the hardware adapters, whose
//! own error values are logged before being mapped here.
//!
//! [`MotorDriver::step`]: crate::MotorDriver::step

use core::fmt;

/// Hardware failure seen by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Writing the coil outputs failed.
    Coil,
    /// Starting a sensor conversion failed.
    Sensor,
    /// Writing to the status sink failed.
    Report,
}

impl Error {
    /// Returns the error as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::Coil => "coil output failed",
            Error::Sensor => "sensor conversion failed",
            Error::Report => "status output failed",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
