//! Blocking delay on the FreeRTOS scheduler.

use crate::traits::Delay;
use esp_idf_hal::delay::FreeRtos;

/// Delay that yields to FreeRTOS while it waits.
///
/// Other tasks (the UART reader, the button timer) keep running during a
/// hold, which is what lets inputs land while the main loop waits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Esp32Delay;

impl Esp32Delay {
    /// Creates a new delay.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Delay for Esp32Delay {
    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}
