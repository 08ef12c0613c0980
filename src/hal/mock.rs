//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for all hardware traits, enabling
//! development and testing on desktop without physical hardware.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockCoils`] | [`CoilDriver`] | Records every coil write |
//! | [`MockDelay`] | [`Delay`] | Records holds instead of sleeping |
//! | [`MockSensor`] | [`LightSensor`] | Scripted readings delivered into [`Signals`] |
//! | [`MockSink`] | [`StatusSink`] | Captures the serial output |
//!
//! # Example
//!
//! ```rust
//! use rs_lightseek::{Direction, MotorConfig, MotorDriver, Signals};
//! use rs_lightseek::hal::{MockCoils, MockDelay, MockSensor, MockSink};
//!
//! let signals = Signals::new();
//! let mut driver = MotorDriver::new(
//!     MockCoils::new(),
//!     MockDelay::new(),
//!     MockSensor::new(&signals).with_readings(&[42]),
//!     MockSink::new(),
//!     &signals,
//!     &MotorConfig::default(),
//! );
//!
//! driver.step(Direction::Ccw).unwrap();
//!
//! // Verify via the mocks
//! assert_eq!(driver.coils().energize_count, 1);
//! assert_eq!(driver.delay().total_ms, 600);
//! assert_eq!(driver.sink().lines(), vec!["POSITION: 20", "INTENSITY: 42"]);
//! ```
//!
//! [`CoilDriver`]: crate::traits::CoilDriver
//! [`Delay`]: crate::traits::Delay
//! [`LightSensor`]: crate::traits::LightSensor
//! [`StatusSink`]: crate::traits::StatusSink

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::report::LINE_ENDING;
use crate::signals::Signals;
use crate::traits::{CoilDriver, Delay, LightSensor, StatusSink};

/// Error returned by mocks configured to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockError;

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock coil driver for testing.
///
/// Every write is appended to [`writes`](Self::writes); a de-energize is
/// recorded as pattern `0`.
///
/// # Example
///
/// ```rust
/// use rs_lightseek::hal::MockCoils;
/// use rs_lightseek::traits::CoilDriver;
///
/// let mut coils = MockCoils::new();
/// coils.energize(0b100).unwrap();
/// coils.de_energize().unwrap();
///
/// assert_eq!(coils.writes, vec![0b100, 0]);
/// assert_eq!(coils.energize_count, 1);
/// assert_eq!(coils.output, 0);
/// ```
#[derive(Debug, Default)]
pub struct MockCoils {
    /// Current output pattern.
    pub output: u8,
    /// Every pattern written, in order.
    pub writes: Vec<u8>,
    /// Number of times `energize` was called.
    pub energize_count: usize,
    fail: bool,
    fail_energize: bool,
}

impl MockCoils {
    /// Creates a new mock with all coils off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Makes `energize` fail while `de_energize` keeps working.
    pub fn failing_energize(mut self) -> Self {
        self.fail_energize = true;
        self
    }

    /// Patterns passed to `energize`, skipping de-energize writes.
    pub fn energized_patterns(&self) -> Vec<u8> {
        self.writes.iter().copied().filter(|&p| p != 0).collect()
    }
}

impl CoilDriver for MockCoils {
    type Error = MockError;

    fn energize(&mut self, pattern: u8) -> Result<(), MockError> {
        if self.fail || self.fail_energize {
            return Err(MockError);
        }
        self.output = pattern;
        self.writes.push(pattern);
        self.energize_count += 1;
        Ok(())
    }

    fn de_energize(&mut self) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.output = 0;
        self.writes.push(0);
        Ok(())
    }
}

/// Mock delay for testing.
///
/// Returns immediately, recording each hold.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Every hold requested, in order.
    pub holds: Vec<u32>,
    /// Sum of all holds.
    pub total_ms: u64,
}

impl MockDelay {
    /// Creates a new mock delay.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Delay for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.holds.push(ms);
        self.total_ms += u64::from(ms);
    }
}

/// Mock light sensor for testing.
///
/// Each conversion produces the next scripted reading, or the fallback
/// once the script runs out. In immediate mode (the default) the result is
/// delivered to [`Signals::conversion_complete`] inside
/// `start_conversion`, like a conversion that finishes before the caller
/// looks. In deferred mode results wait until
/// [`complete_pending`](Self::complete_pending) is called.
///
/// # Example
///
/// ```rust
/// use rs_lightseek::{Event, Signals};
/// use rs_lightseek::hal::MockSensor;
/// use rs_lightseek::traits::LightSensor;
///
/// let signals = Signals::new();
/// let mut sensor = MockSensor::new(&signals).with_readings(&[12, 34]);
///
/// sensor.start_conversion().unwrap();
/// assert_eq!(signals.reading(), 12);
/// assert_eq!(signals.events().take(), Event::SensorReady);
///
/// sensor.set_deferred(true);
/// sensor.start_conversion().unwrap();
/// assert_eq!(signals.reading(), 12); // not delivered yet
/// sensor.complete_pending();
/// assert_eq!(signals.reading(), 34);
/// ```
#[derive(Debug)]
pub struct MockSensor<'s> {
    signals: &'s Signals,
    readings: VecDeque<u8>,
    fallback: u8,
    deferred: bool,
    pending: Option<u8>,
    fail: bool,
    /// Number of conversions started.
    pub conversions: usize,
}

impl<'s> MockSensor<'s> {
    /// Creates a sensor that reads 0 until scripted otherwise.
    pub fn new(signals: &'s Signals) -> Self {
        Self {
            signals,
            readings: VecDeque::new(),
            fallback: 0,
            deferred: false,
            pending: None,
            fail: false,
            conversions: 0,
        }
    }

    /// Script the next readings, in order.
    pub fn with_readings(mut self, readings: &[u8]) -> Self {
        self.readings.extend(readings.iter().copied());
        self
    }

    /// Reading used once the script is exhausted.
    pub fn with_fallback(mut self, value: u8) -> Self {
        self.fallback = value;
        self
    }

    /// Makes every conversion start fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Append one reading to the script.
    pub fn queue_reading(&mut self, value: u8) {
        self.readings.push_back(value);
    }

    /// Switch between immediate and deferred completion.
    pub fn set_deferred(&mut self, deferred: bool) {
        self.deferred = deferred;
    }

    /// Deliver the pending conversion result, if any.
    pub fn complete_pending(&mut self) -> Option<u8> {
        let value = self.pending.take()?;
        self.signals.conversion_complete(value);
        Some(value)
    }

    /// Readings still scripted.
    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl LightSensor for MockSensor<'_> {
    type Error = MockError;

    fn start_conversion(&mut self) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.conversions += 1;
        let value = self.readings.pop_front().unwrap_or(self.fallback);
        // a restarted conversion replaces one still in flight
        self.pending = Some(value);
        if !self.deferred {
            self.complete_pending();
        }
        Ok(())
    }
}

/// Mock status sink for testing.
///
/// Captures every byte written.
///
/// # Example
///
/// ```rust
/// use rs_lightseek::hal::MockSink;
/// use rs_lightseek::traits::StatusSink;
///
/// let mut sink = MockSink::new();
/// sink.write_line("POSITION: 20").unwrap();
/// sink.write_line("INTENSITY: 3").unwrap();
///
/// assert_eq!(sink.lines(), vec!["POSITION: 20", "INTENSITY: 3"]);
/// sink.clear();
/// assert!(sink.lines().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MockSink {
    /// Every byte written, in order.
    pub bytes: Vec<u8>,
    fail: bool,
}

impl MockSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Complete lines written so far, without terminators.
    ///
    /// Bytes after the last terminator are not included.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest: &[u8] = &self.bytes;
        while let Some(end) = rest
            .windows(LINE_ENDING.len())
            .position(|w| w == LINE_ENDING)
        {
            lines.push(String::from_utf8_lossy(&rest[..end]).into_owned());
            rest = &rest[end + LINE_ENDING.len()..];
        }
        lines
    }

    /// Drop everything captured so far.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

impl StatusSink for MockSink {
    type Error = MockError;

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }
}
