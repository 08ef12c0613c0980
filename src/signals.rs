//! State shared between signal handlers and the main loop.
//!
//! Three handlers feed the controller on real hardware:
//!
//! - conversion complete: stores the 8-bit result and raises
//!   [`Event::SensorReady`]
//! - periodic timer tick: stores the raw button port snapshot
//! - serial receive: stores the last received byte
//!
//! The snapshot is kept raw. Which bits carry buttons is decided once, by
//! the [`ButtonMasks`](crate::ButtonMasks) the controller decodes with.
//!
//! Every cell is a single-byte atomic, so reads never observe a torn value
//! and no handler needs a lock. The only ordering that matters is that a
//! conversion result is visible before its `SensorReady` event; the store
//! to the reading happens first and the event store has release semantics.
//!
//! `Signals::new` is `const`, so firmware keeps one instance in a `static`
//! and hands `&'static Signals` to both the handlers and the controller.
//!
//! # Example
//!
//! ```rust
//! use rs_lightseek::{Event, Signals};
//!
//! static SIGNALS: Signals = Signals::new();
//!
//! // In the ADC completion handler:
//! SIGNALS.conversion_complete(200);
//!
//! // In the main loop:
//! assert_eq!(SIGNALS.events().take(), Event::SensorReady);
//! assert_eq!(SIGNALS.reading(), 200);
//! ```

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::event::{Event, EventLatch};

/// Byte value meaning "nothing received this cycle".
pub const NO_BYTE: u8 = 0;

/// Port value with every pulled-up input high, i.e. no button pressed.
pub const IDLE_PORT: u8 = 0xFF;

/// Interrupt-shared controller inputs.
#[derive(Debug)]
pub struct Signals {
    reading: AtomicU8,
    buttons: AtomicU8,
    rx_byte: AtomicU8,
    conversion_requested: AtomicBool,
    events: EventLatch,
}

impl Signals {
    /// Creates signals with every button released and nothing pending.
    pub const fn new() -> Self {
        Self {
            reading: AtomicU8::new(0),
            buttons: AtomicU8::new(IDLE_PORT),
            rx_byte: AtomicU8::new(NO_BYTE),
            conversion_requested: AtomicBool::new(false),
            events: EventLatch::new(),
        }
    }

    // ------------------------------------------------------------------
    // Handler side
    // ------------------------------------------------------------------

    /// Conversion-complete handler entry point.
    #[inline]
    pub fn conversion_complete(&self, value: u8) {
        self.reading.store(value, Ordering::Relaxed);
        self.events.raise(Event::SensorReady);
    }

    /// Timer tick handler entry point; `port` is the raw input port value.
    #[inline]
    pub fn timer_tick(&self, port: u8) {
        self.buttons.store(port, Ordering::Relaxed);
    }

    /// Complete a requested conversion, if one is pending.
    ///
    /// For sensors whose conversion runs on another context (a timer task
    /// or a DMA callback): the trigger side calls
    /// [`request_conversion`](Self::request_conversion) and returns at
    /// once; this side later runs `read` and publishes the result through
    /// [`conversion_complete`](Self::conversion_complete). Returns whether
    /// a conversion was serviced. A failed read drops the request.
    pub fn service_conversion<E>(
        &self,
        read: impl FnOnce() -> Result<u8, E>,
    ) -> Result<bool, E> {
        if !self.conversion_requested.swap(false, Ordering::AcqRel) {
            return Ok(false);
        }
        self.conversion_complete(read()?);
        Ok(true)
    }

    /// Serial receive handler entry point.
    #[inline]
    pub fn serial_received(&self, byte: u8) {
        self.rx_byte.store(byte, Ordering::Relaxed);
    }

    // ------------------------------------------------------------------
    // Main loop side
    // ------------------------------------------------------------------

    /// Ask the conversion side for a new reading.
    ///
    /// The result arrives later through
    /// [`service_conversion`](Self::service_conversion); until then
    /// [`reading`](Self::reading) still holds the previous result.
    #[inline]
    pub fn request_conversion(&self) {
        self.conversion_requested.store(true, Ordering::Release);
    }

    /// Whether a requested conversion has not been serviced yet.
    #[inline]
    pub fn conversion_pending(&self) -> bool {
        self.conversion_requested.load(Ordering::Acquire)
    }

    /// Clear the pending event and the received byte.
    ///
    /// Called once at the top of every main-loop cycle, before the cycle
    /// starts a conversion.
    pub fn begin_cycle(&self) {
        self.events.reset();
        self.rx_byte.store(NO_BYTE, Ordering::Relaxed);
    }

    /// Most recent conversion result.
    #[inline]
    pub fn reading(&self) -> u8 {
        self.reading.load(Ordering::Relaxed)
    }

    /// Most recent raw button port snapshot.
    #[inline]
    pub fn buttons(&self) -> u8 {
        self.buttons.load(Ordering::Relaxed)
    }

    /// Last byte received since the cycle began, or [`NO_BYTE`].
    #[inline]
    pub fn serial_byte(&self) -> u8 {
        self.rx_byte.load(Ordering::Relaxed)
    }

    /// The pending-event latch.
    #[inline]
    pub fn events(&self) -> &EventLatch {
        &self.events
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ButtonMasks;

    #[test]
    fn starts_idle() {
        let signals = Signals::new();
        assert_eq!(signals.reading(), 0);
        assert_eq!(signals.buttons(), IDLE_PORT);
        assert_eq!(ButtonMasks::DEFAULT.decode(signals.buttons()), None);
        assert_eq!(signals.serial_byte(), NO_BYTE);
        assert!(!signals.conversion_pending());
        assert_eq!(signals.events().peek(), Event::None);
    }

    #[test]
    fn conversion_complete_stores_and_raises() {
        let signals = Signals::new();
        signals.conversion_complete(173);
        assert_eq!(signals.reading(), 173);
        assert_eq!(signals.events().peek(), Event::SensorReady);
    }

    #[test]
    fn conversion_complete_overwrites_pending_command() {
        let signals = Signals::new();
        signals.events().raise(Event::TurnLeft);
        signals.conversion_complete(5);
        assert_eq!(signals.events().take(), Event::SensorReady);
    }

    #[test]
    fn timer_tick_stores_raw_port() {
        let signals = Signals::new();
        signals.timer_tick(0b1011_1101);
        assert_eq!(signals.buttons(), 0b1011_1101);
        // decoding keeps only the button field
        assert_eq!(
            ButtonMasks::DEFAULT.decode(signals.buttons()),
            Some(Event::SeekMax)
        );
    }

    // =========================================================================
    // Requested Conversion Tests
    // =========================================================================

    #[test]
    fn service_without_request_is_noop() {
        let signals = Signals::new();
        let serviced = signals.service_conversion(|| Ok::<u8, ()>(50)).unwrap();
        assert!(!serviced);
        assert_eq!(signals.reading(), 0);
        assert_eq!(signals.events().peek(), Event::None);
    }

    #[test]
    fn requested_conversion_completes_later() {
        let signals = Signals::new();
        signals.conversion_complete(12);
        signals.events().reset();

        signals.request_conversion();
        assert!(signals.conversion_pending());
        // previous result until the other side runs
        assert_eq!(signals.reading(), 12);

        assert_eq!(signals.service_conversion(|| Ok::<u8, ()>(90)), Ok(true));
        assert_eq!(signals.reading(), 90);
        assert_eq!(signals.events().take(), Event::SensorReady);
        assert!(!signals.conversion_pending());
    }

    #[test]
    fn failed_read_drops_request() {
        let signals = Signals::new();
        signals.request_conversion();

        assert_eq!(signals.service_conversion(|| Err::<u8, _>("adc")), Err("adc"));
        assert!(!signals.conversion_pending());
        assert_eq!(signals.events().peek(), Event::None);
    }

    #[test]
    fn begin_cycle_clears_event_and_byte() {
        let signals = Signals::new();
        signals.serial_received(b'm');
        signals.conversion_complete(9);

        signals.begin_cycle();

        assert_eq!(signals.serial_byte(), NO_BYTE);
        assert_eq!(signals.events().peek(), Event::None);
        // cached reading and button snapshot survive
        assert_eq!(signals.reading(), 9);
        assert_eq!(signals.buttons(), IDLE_PORT);
    }

    #[test]
    fn usable_as_static() {
        static SHARED: Signals = Signals::new();
        SHARED.serial_received(b'r');
        assert_eq!(SHARED.serial_byte(), b'r');
    }

    #[test]
    fn handler_on_another_thread() {
        use std::sync::Arc;

        let signals = Arc::new(Signals::new());
        let handler = Arc::clone(&signals);
        std::thread::spawn(move || handler.conversion_complete(77))
            .join()
            .unwrap();

        assert_eq!(signals.events().take(), Event::SensorReady);
        assert_eq!(signals.reading(), 77);
    }
}
