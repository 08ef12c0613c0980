//! Stepper coil outputs on three GPIOs.

use crate::motor::PHASE_MASK;
use crate::traits::CoilDriver;
use embedded_hal::digital::{OutputPin, PinState};

/// Three coil outputs, one per bit of the phase pattern.
///
/// Works with any `embedded-hal` output pin; on the SuperMini these are
/// `PinDriver<'_, _, Output>` on GPIO2-4.
///
/// # Example
///
/// ```ignore
/// use esp_idf_hal::gpio::PinDriver;
/// use rs_lightseek::hal::esp32::PinCoils;
///
/// let peripherals = Peripherals::take()?;
/// let coils = PinCoils::new(
///     PinDriver::output(peripherals.pins.gpio2)?,
///     PinDriver::output(peripherals.pins.gpio3)?,
///     PinDriver::output(peripherals.pins.gpio4)?,
/// );
/// ```
pub struct PinCoils<A, B, C> {
    a: A,
    b: B,
    c: C,
}

impl<A, B, C, E> PinCoils<A, B, C>
where
    A: OutputPin<Error = E>,
    B: OutputPin<Error = E>,
    C: OutputPin<Error = E>,
{
    /// Wraps three output pins. Coils are not touched until the first write.
    pub fn new(a: A, b: B, c: C) -> Self {
        Self { a, b, c }
    }

    fn write(&mut self, pattern: u8) -> Result<(), E> {
        let pattern = pattern & PHASE_MASK;
        self.a.set_state(PinState::from(pattern & 0b001 != 0))?;
        self.b.set_state(PinState::from(pattern & 0b010 != 0))?;
        self.c.set_state(PinState::from(pattern & 0b100 != 0))
    }
}

impl<A, B, C, E> CoilDriver for PinCoils<A, B, C>
where
    A: OutputPin<Error = E>,
    B: OutputPin<Error = E>,
    C: OutputPin<Error = E>,
    E: core::fmt::Debug,
{
    type Error = E;

    fn energize(&mut self, pattern: u8) -> Result<(), E> {
        self.write(pattern)
    }

    fn de_energize(&mut self) -> Result<(), E> {
        self.write(0)
    }
}
