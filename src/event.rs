//! Pending-event model shared by signal handlers and the main loop.
//!
//! All asynchronous inputs (conversion complete, serial command, button
//! snapshot) are reduced to a single [`Event`] stored in an [`EventLatch`].
//! The latch holds at most one event: a newly raised event overwrites any
//! unconsumed one.
//!
//! # Example
//!
//! ```rust
//! use rs_lightseek::{Event, EventLatch};
//!
//! let latch = EventLatch::new();
//! latch.raise(Event::SeekMax);
//! latch.raise(Event::TurnLeft); // overwrites SeekMax
//!
//! assert_eq!(latch.take(), Event::TurnLeft);
//! assert_eq!(latch.take(), Event::None);
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// A pending action for the main loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum Event {
    /// Nothing pending.
    #[default]
    None = 0,
    /// A sensor conversion finished; emit a status report.
    SensorReady = 1,
    /// Run the seek-max calibration.
    SeekMax = 2,
    /// Step once counter-clockwise.
    TurnLeft = 3,
    /// Step once clockwise.
    TurnRight = 4,
    /// Declare the current position to be 0°.
    PlaceZero = 5,
}

impl Event {
    /// Raw tag stored in the latch.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a latch tag. Unknown tags decode as [`Event::None`].
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Event::SensorReady,
            2 => Event::SeekMax,
            3 => Event::TurnLeft,
            4 => Event::TurnRight,
            5 => Event::PlaceZero,
            _ => Event::None,
        }
    }

    /// Returns the event name in snake case.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Event::None => "none",
            Event::SensorReady => "sensor_ready",
            Event::SeekMax => "seek_max",
            Event::TurnLeft => "turn_left",
            Event::TurnRight => "turn_right",
            Event::PlaceZero => "place_zero",
        }
    }
}

/// Single-slot, last-write-wins event cell.
///
/// Producers call [`raise`](Self::raise) without reading first. The main
/// loop calls [`reset`](Self::reset) once at the start of every cycle and
/// [`take`](Self::take) once when dispatching. An event raised after `take`
/// stays in the slot until the next cycle's reset clears it.
#[derive(Debug)]
pub struct EventLatch {
    slot: AtomicU8,
}

impl EventLatch {
    /// Creates an empty latch.
    pub const fn new() -> Self {
        Self {
            slot: AtomicU8::new(Event::None as u8),
        }
    }

    /// Store `event`, overwriting whatever was pending.
    #[inline]
    pub fn raise(&self, event: Event) {
        self.slot.store(event.as_u8(), Ordering::Release);
    }

    /// Return the pending event and clear the slot.
    #[inline]
    pub fn take(&self) -> Event {
        Event::from_u8(self.slot.swap(Event::None as u8, Ordering::AcqRel))
    }

    /// Return the pending event without clearing it.
    #[inline]
    pub fn peek(&self) -> Event {
        Event::from_u8(self.slot.load(Ordering::Acquire))
    }

    /// Clear the slot.
    #[inline]
    pub fn reset(&self) {
        self.slot.store(Event::None as u8, Ordering::Release);
    }
}

impl Default for EventLatch {
    fn default() -> Self {
        Self::new()
    }
}
