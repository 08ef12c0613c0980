//! Push buttons sampled into a port-style snapshot.
//!
//! The four buttons are read into bits 3..=6 of a byte, high when released,
//! and handed to [`Signals::timer_tick`] the same way a periodic timer
//! interrupt latches the input port.
//!
//! # Wiring
//!
//! Each button connects its GPIO to GND; internal pull-ups hold the line
//! high when released.

use crate::signals::Signals;
use esp_idf_hal::gpio::{Input, InputPin, OutputPin, PinDriver, Pull};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

/// Port bit for the place-zero button.
const BIT_PLACE_ZERO: u8 = 1 << 3;
/// Port bit for the turn-left button.
const BIT_TURN_LEFT: u8 = 1 << 4;
/// Port bit for the turn-right button.
const BIT_TURN_RIGHT: u8 = 1 << 5;
/// Port bit for the seek-max button.
const BIT_SEEK_MAX: u8 = 1 << 6;

/// Four active-low push buttons.
///
/// # Example
///
/// ```ignore
/// use esp_idf_svc::timer::EspTaskTimerService;
/// use rs_lightseek::hal::esp32::Esp32Buttons;
///
/// static SIGNALS: Signals = Signals::new();
///
/// let buttons = Esp32Buttons::new(
///     peripherals.pins.gpio5,
///     peripherals.pins.gpio6,
///     peripherals.pins.gpio7,
///     peripherals.pins.gpio10,
/// )?;
/// let timers = EspTaskTimerService::new()?;
/// let timer = timers.timer(move || buttons.sample(&SIGNALS))?;
/// timer.every(Duration::from_millis(10))?;
/// ```
pub struct Esp32Buttons<'d, Z, L, R, M>
where
    Z: InputPin + OutputPin,
    L: InputPin + OutputPin,
    R: InputPin + OutputPin,
    M: InputPin + OutputPin,
{
    place_zero: PinDriver<'d, Z, Input>,
    turn_left: PinDriver<'d, L, Input>,
    turn_right: PinDriver<'d, R, Input>,
    seek_max: PinDriver<'d, M, Input>,
}

impl<'d, Z, L, R, M> Esp32Buttons<'d, Z, L, R, M>
where
    Z: InputPin + OutputPin,
    L: InputPin + OutputPin,
    R: InputPin + OutputPin,
    M: InputPin + OutputPin,
{
    /// Configures the four button inputs with pull-ups.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization fails.
    pub fn new(
        place_zero: impl Peripheral<P = Z> + 'd,
        turn_left: impl Peripheral<P = L> + 'd,
        turn_right: impl Peripheral<P = R> + 'd,
        seek_max: impl Peripheral<P = M> + 'd,
    ) -> Result<Self, EspError> {
        let mut place_zero = PinDriver::input(place_zero)?;
        let mut turn_left = PinDriver::input(turn_left)?;
        let mut turn_right = PinDriver::input(turn_right)?;
        let mut seek_max = PinDriver::input(seek_max)?;

        place_zero.set_pull(Pull::Up)?;
        turn_left.set_pull(Pull::Up)?;
        turn_right.set_pull(Pull::Up)?;
        seek_max.set_pull(Pull::Up)?;

        Ok(Self {
            place_zero,
            turn_left,
            turn_right,
            seek_max,
        })
    }

    /// Current port snapshot. Released buttons read as set bits.
    pub fn snapshot(&self) -> u8 {
        let mut port = 0;
        if self.place_zero.is_high() {
            port |= BIT_PLACE_ZERO;
        }
        if self.turn_left.is_high() {
            port |= BIT_TURN_LEFT;
        }
        if self.turn_right.is_high() {
            port |= BIT_TURN_RIGHT;
        }
        if self.seek_max.is_high() {
            port |= BIT_SEEK_MAX;
        }
        port
    }

    /// Latch the current snapshot into `signals`. Call from a periodic timer.
    #[inline]
    pub fn sample(&self, signals: &Signals) {
        signals.timer_tick(self.snapshot());
    }
}
