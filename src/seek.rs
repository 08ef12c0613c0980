//! Seek-max calibration: sweep the full range, then park at the brightest
//! recorded position.
//!
//! The procedure has four phases:
//!
//! 1. Drive to the nearer limit (clockwise below 180°, otherwise
//!    counter-clockwise).
//! 2. Reverse and drive to the opposite limit, recording a sample in
//!    every slot on the way.
//! 3. Pick the slot with the strictly greatest sample; ties keep the
//!    lowest slot.
//! 4. Move back to that slot's angle.
//!
//! A truncated sweep still goes on to phases 3 and 4 with whatever the
//! buffer holds. A buffer of all zeros selects slot 0.
//!
//! # Example
//!
//! ```rust
//! use rs_lightseek::{MotorConfig, MotorDriver, Signals};
//! use rs_lightseek::hal::{MockCoils, MockDelay, MockSensor, MockSink};
//!
//! let signals = Signals::new();
//! // One reading per slot, 0° first; the brightest is at 60°
//! let sensor = MockSensor::new(&signals)
//!     .with_readings(&[10, 20, 30, 250, 40, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10]);
//!
//! let mut driver = MotorDriver::new(
//!     MockCoils::new(),
//!     MockDelay::new(),
//!     sensor,
//!     MockSink::new(),
//!     &signals,
//!     &MotorConfig::default(),
//! );
//!
//! let outcome = driver.seek_max().unwrap();
//! assert_eq!(outcome.slot, 3);
//! assert_eq!(driver.angle(), 60);
//! ```

use log::{info, warn};

use crate::error::Error;
use crate::motor::MotorDriver;
use crate::position::{slot_angle, MAX_ANGLE};
use crate::traits::{CoilDriver, Delay, Direction, LightSensor, StatusSink};

/// Slot with the strictly greatest sample and its value.
///
/// The scan starts from a candidate of value 0 at slot 0, so ties keep the
/// lowest slot and an all-zero (or empty) buffer yields `(0, 0)`.
///
/// # Examples
///
/// ```
/// use rs_lightseek::seek::strongest_slot;
///
/// assert_eq!(strongest_slot(&[5, 9, 3, 9, 1]), (1, 9));
/// assert_eq!(strongest_slot(&[0, 0, 0]), (0, 0));
/// ```
pub fn strongest_slot(samples: &[u8]) -> (usize, u8) {
    let mut best = (0, 0);
    for (slot, &value) in samples.iter().enumerate() {
        if value > best.1 {
            best = (slot, value);
        }
    }
    best
}

/// Which limit the first sweep phase drives to.
#[inline]
pub fn nearer_limit(angle: i16) -> Direction {
    if angle < MAX_ANGLE / 2 {
        Direction::Cw
    } else {
        Direction::Ccw
    }
}

/// Result of one seek-max run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeekOutcome {
    /// Winning slot.
    pub slot: usize,
    /// Sample recorded in the winning slot.
    pub intensity: u8,
    /// Steps taken driving to the first limit.
    pub to_limit_steps: usize,
    /// Steps taken sweeping to the opposite limit.
    pub sweep_steps: usize,
    /// Steps taken returning to the winning slot.
    pub return_steps: usize,
}

impl SeekOutcome {
    /// Angle of the winning slot.
    #[inline]
    pub fn angle(&self) -> i16 {
        slot_angle(self.slot)
    }
}

impl<C, D, S, R> MotorDriver<'_, C, D, S, R>
where
    C: CoilDriver,
    D: Delay,
    S: LightSensor,
    R: StatusSink,
{
    /// Run the seek-max calibration to completion.
    pub fn seek_max(&mut self) -> Result<SeekOutcome, Error> {
        let first = nearer_limit(self.angle());
        info!("seek-max from {} deg, first limit {}", self.angle(), first.as_str());

        let to_limit_steps = self.sweep_to_limit(first)?;
        let sweep_steps = self.sweep_to_limit(first.reversed())?;

        let (slot, intensity) = strongest_slot(self.tracker().samples());
        if intensity == 0 {
            warn!("seek-max found no light, parking at slot 0");
        }

        let return_steps = self.move_to(slot_angle(slot))?;
        info!(
            "seek-max parked at {} deg (intensity {}) after {} steps",
            slot_angle(slot),
            intensity,
            to_limit_steps + sweep_steps + return_steps
        );

        Ok(SeekOutcome {
            slot,
            intensity,
            to_limit_steps,
            sweep_steps,
            return_steps,
        })
    }
}
