//! Hardware abstraction traits for coil actuation, sensing, and status output.
//!
//! This module defines the hardware interfaces that allow rs-lightseek to
//! run on different platforms (ESP32, desktop mocks, etc.).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`CoilDriver`] | 3-phase stepper coil outputs |
//! | [`LightSensor`] | Starts an intensity conversion |
//! | [`StatusSink`] | Byte-oriented serial output for status lines |
//! | [`Delay`] | Blocking millisecond holds |
//!
//! Sensor results, button snapshots and received serial bytes do not flow
//! through these traits. They are delivered by signal handlers into
//! [`Signals`](crate::Signals), which the main loop reads.
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_lightseek::traits::{CoilDriver, StatusSink};
//! use rs_lightseek::hal::{MockCoils, MockSink};
//!
//! let mut coils = MockCoils::new();
//! coils.energize(0b010).unwrap();
//! coils.de_energize().unwrap();
//! assert_eq!(coils.energize_count, 1);
//!
//! let mut sink = MockSink::new();
//! sink.write_line("POSITION: 0").unwrap();
//! assert_eq!(sink.lines(), vec!["POSITION: 0"]);
//! ```

use crate::report::LINE_ENDING;

/// Rotation direction of the platform.
///
/// Counter-clockwise increases the angle, clockwise decreases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Clockwise, towards 0°.
    Cw,
    /// Counter-clockwise, towards 360°.
    Ccw,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_lightseek::Direction;
    ///
    /// assert_eq!(Direction::Cw.as_str(), "cw");
    /// assert_eq!(Direction::Ccw.as_str(), "ccw");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Cw => "cw",
            Direction::Ccw => "ccw",
        }
    }

    /// Returns the opposite direction.
    #[inline]
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Cw => Direction::Ccw,
            Direction::Ccw => Direction::Cw,
        }
    }

    /// Signed angle change for one step in this direction.
    #[inline]
    pub const fn sign(self) -> i16 {
        match self {
            Direction::Cw => -1,
            Direction::Ccw => 1,
        }
    }
}

/// Stepper coil driver - abstracts the three phase-enable outputs.
///
/// The motor driver owns all timing around these writes; implementations
/// should apply the pattern immediately and return.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_lightseek::traits::CoilDriver;
///
/// struct PortB { /* register handle */ }
///
/// impl CoilDriver for PortB {
///     type Error = ();
///
///     fn energize(&mut self, pattern: u8) -> Result<(), ()> {
///         // Write the low three bits to the port...
///         Ok(())
///     }
///
///     fn de_energize(&mut self) -> Result<(), ()> {
///         // Clear the low three bits...
///         Ok(())
///     }
/// }
/// ```
pub trait CoilDriver {
    /// Error type for coil writes.
    type Error: core::fmt::Debug;

    /// Drive the coils with a 3-bit phase-enable pattern.
    fn energize(&mut self, pattern: u8) -> Result<(), Self::Error>;

    /// Switch all coils off.
    fn de_energize(&mut self) -> Result<(), Self::Error>;
}

/// Analog intensity sensor.
///
/// `start_conversion` is fire-and-forget. The 8-bit result arrives later
/// through [`Signals::conversion_complete`](crate::Signals::conversion_complete),
/// called from the conversion-complete handler.
pub trait LightSensor {
    /// Error type for starting a conversion.
    type Error: core::fmt::Debug;

    /// Start a new conversion.
    fn start_conversion(&mut self) -> Result<(), Self::Error>;
}

/// Byte-oriented status output, typically the serial transmitter.
pub trait StatusSink {
    /// Error type for output operations.
    type Error: core::fmt::Debug;

    /// Write raw bytes, blocking until they are queued.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Write a text line followed by the device line ending (LF CR).
    fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        self.write_bytes(line.as_bytes())?;
        self.write_bytes(LINE_ENDING)
    }
}

/// Blocking delay.
///
/// Holds must complete before the call returns; the motor phase sequence
/// relies on that.
pub trait Delay {
    /// Block for the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}
