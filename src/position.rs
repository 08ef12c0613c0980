//! Angular position and per-position sample buffer.
//!
//! The platform moves in fixed [`STEP_DEG`] increments between 0° and
//! [`MAX_ANGLE`] inclusive. Every reachable angle has a slot in the sample
//! buffer (`slot = angle / STEP_DEG`), so the buffer holds
//! [`SLOT_COUNT`] = [`POSITION_COUNT`] + 1 entries: 0°, 20°, ..., 360°.
//!
//! The buffer is never cleared. A slot keeps the last intensity recorded
//! there until the platform visits it again.

use crate::traits::Direction;

/// Angle moved by one motor step, in degrees.
pub const STEP_DEG: i16 = 20;

/// Upper physical limit, in degrees.
pub const MAX_ANGLE: i16 = 360;

/// Number of steps between the two physical limits.
pub const POSITION_COUNT: usize = (MAX_ANGLE / STEP_DEG) as usize;

/// Number of sample slots, one per reachable angle including both limits.
pub const SLOT_COUNT: usize = POSITION_COUNT + 1;

/// Angle of a sample slot.
#[inline]
pub const fn slot_angle(slot: usize) -> i16 {
    slot as i16 * STEP_DEG
}

/// Current angle and the sample buffer.
///
/// # Example
///
/// ```rust
/// use rs_lightseek::{Direction, PositionTracker};
///
/// let mut tracker = PositionTracker::new();
/// assert!(tracker.can_step(Direction::Ccw));
/// assert!(!tracker.can_step(Direction::Cw)); // already at 0°
///
/// tracker.record(tracker.current_slot(), 140);
/// assert_eq!(tracker.read(0), Some(140));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionTracker {
    angle: i16,
    samples: [u8; SLOT_COUNT],
}

impl PositionTracker {
    /// Starts at 0° with an all-zero buffer.
    pub const fn new() -> Self {
        Self {
            angle: 0,
            samples: [0; SLOT_COUNT],
        }
    }

    /// Current angle in degrees.
    #[inline]
    pub fn angle(&self) -> i16 {
        self.angle
    }

    /// Slot index of the current angle.
    #[inline]
    pub fn current_slot(&self) -> usize {
        (self.angle / STEP_DEG) as usize
    }

    /// Whether one step in `dir` stays within 0°..=360°.
    pub fn can_step(&self, dir: Direction) -> bool {
        match dir {
            Direction::Ccw => self.angle < MAX_ANGLE,
            Direction::Cw => self.angle > 0,
        }
    }

    /// Move the angle one step. Callers check [`can_step`](Self::can_step)
    /// first; a step past a limit is ignored.
    pub(crate) fn advance(&mut self, dir: Direction) {
        if self.can_step(dir) {
            self.angle += dir.sign() * STEP_DEG;
        }
    }

    /// Store a sample for `slot`. Out-of-range slots are ignored.
    pub fn record(&mut self, slot: usize, value: u8) {
        if let Some(entry) = self.samples.get_mut(slot) {
            *entry = value;
        }
    }

    /// Sample stored for `slot`, if the slot exists.
    #[inline]
    pub fn read(&self, slot: usize) -> Option<u8> {
        self.samples.get(slot).copied()
    }

    /// Full sample buffer, indexed by slot.
    #[inline]
    pub fn samples(&self) -> &[u8; SLOT_COUNT] {
        &self.samples
    }

    /// Declare the current physical position to be 0° without moving.
    ///
    /// If the platform is not really at its zero point the tracked angle
    /// no longer matches the physical one; that is up to the operator.
    pub fn reset_to_zero(&mut self) {
        self.angle = 0;
    }
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new()
    }
}
