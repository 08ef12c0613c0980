//! Decoding of serial commands and button snapshots into events.
//!
//! Serial commands are single characters:
//!
//! | Byte | Event |
//! |------|-------|
//! | `m` | [`Event::SeekMax`] |
//! | `l` | [`Event::TurnLeft`] |
//! | `r` | [`Event::TurnRight`] |
//! | `z` | [`Event::PlaceZero`] |
//!
//! Buttons are active low on four port bits. A snapshot matches a command
//! only when it equals one of the [`ButtonMasks`] patterns exactly, so
//! chords and the idle pattern produce nothing.

use crate::event::Event;

/// Map a received serial byte to its command event.
///
/// # Examples
///
/// ```
/// use rs_lightseek::{input::command_event, Event};
///
/// assert_eq!(command_event(b'm'), Some(Event::SeekMax));
/// assert_eq!(command_event(b'x'), None);
/// ```
pub const fn command_event(byte: u8) -> Option<Event> {
    match byte {
        b'm' => Some(Event::SeekMax),
        b'l' => Some(Event::TurnLeft),
        b'r' => Some(Event::TurnRight),
        b'z' => Some(Event::PlaceZero),
        _ => None,
    }
}

/// Exact-match bit patterns for the four buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonMasks {
    /// Bits that carry buttons; also the idle (all released) pattern.
    pub mask: u8,
    /// Snapshot for the seek-max button.
    pub seek_max: u8,
    /// Snapshot for the turn-left button.
    pub turn_left: u8,
    /// Snapshot for the turn-right button.
    pub turn_right: u8,
    /// Snapshot for the place-zero button.
    pub place_zero: u8,
}

impl ButtonMasks {
    /// Buttons on bits 3..=6 with pull-ups, pressed reads low.
    pub const DEFAULT: Self = Self {
        mask: 0b0111_1000,
        seek_max: 0b0011_1000,
        turn_left: 0b0110_1000,
        turn_right: 0b0101_1000,
        place_zero: 0b0111_0000,
    };

    /// Translate a raw port snapshot into at most one event.
    ///
    /// Bits outside [`mask`](Self::mask) are cleared before matching.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_lightseek::{ButtonMasks, Event};
    ///
    /// let masks = ButtonMasks::DEFAULT;
    /// assert_eq!(masks.decode(0b0011_1000), Some(Event::SeekMax));
    /// assert_eq!(masks.decode(masks.mask), None); // idle
    /// ```
    pub fn decode(&self, snapshot: u8) -> Option<Event> {
        let snapshot = snapshot & self.mask;
        if snapshot == self.seek_max {
            Some(Event::SeekMax)
        } else if snapshot == self.place_zero {
            Some(Event::PlaceZero)
        } else if snapshot == self.turn_left {
            Some(Event::TurnLeft)
        } else if snapshot == self.turn_right {
            Some(Event::TurnRight)
        } else {
            None
        }
    }
}

impl Default for ButtonMasks {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Serial Command Tests
    // =========================================================================

    #[test]
    fn command_bytes_map_one_to_one() {
        assert_eq!(command_event(b'm'), Some(Event::SeekMax));
        assert_eq!(command_event(b'l'), Some(Event::TurnLeft));
        assert_eq!(command_event(b'r'), Some(Event::TurnRight));
        assert_eq!(command_event(b'z'), Some(Event::PlaceZero));
    }

    #[test]
    fn other_bytes_ignored() {
        assert_eq!(command_event(0), None);
        assert_eq!(command_event(b'M'), None);
        assert_eq!(command_event(b'\r'), None);
        assert_eq!(command_event(b' '), None);
    }

    // =========================================================================
    // Button Decoding Tests
    // =========================================================================

    #[test]
    fn each_button_decodes() {
        let masks = ButtonMasks::DEFAULT;
        assert_eq!(masks.decode(0b0011_1000), Some(Event::SeekMax));
        assert_eq!(masks.decode(0b0110_1000), Some(Event::TurnLeft));
        assert_eq!(masks.decode(0b0101_1000), Some(Event::TurnRight));
        assert_eq!(masks.decode(0b0111_0000), Some(Event::PlaceZero));
    }

    #[test]
    fn idle_and_chords_ignored() {
        let masks = ButtonMasks::DEFAULT;
        assert_eq!(masks.decode(0b0111_1000), None);
        // seek-max and turn-left held together
        assert_eq!(masks.decode(0b0010_1000), None);
        // everything pressed
        assert_eq!(masks.decode(0), None);
    }

    #[test]
    fn custom_masks() {
        let masks = ButtonMasks {
            mask: 0b1111,
            seek_max: 0b1110,
            turn_left: 0b1101,
            turn_right: 0b1011,
            place_zero: 0b0111,
        };
        assert_eq!(masks.decode(0b1011), Some(Event::TurnRight));
        assert_eq!(masks.decode(0b0011_1000), None);
        // upper bits are not part of the field
        assert_eq!(masks.decode(0b1111_1101), Some(Event::TurnLeft));
    }

    #[test]
    fn unrelated_port_bits_ignored() {
        let masks = ButtonMasks::DEFAULT;
        assert_eq!(masks.decode(0b1011_1101), Some(Event::SeekMax));
        assert_eq!(masks.decode(0xFF), None);
    }

    #[test]
    fn default_matches_const() {
        assert_eq!(ButtonMasks::default(), ButtonMasks::DEFAULT);
    }
}
