//! ESP32-C3 SuperMini hardware abstraction layer for the light seeker.
//!
//! This module provides hardware implementations for the ESP32-C3 SuperMini board
//! driving a 3-phase stepper through a ULN2003-style transistor array, with a
//! photo resistor divider on the ADC.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Stepper**: 3 coils, one GPIO each through a low-side driver
//! - **Sensor**: Photo resistor divider on ADC1
//! - **Buttons**: 4 momentary switches to GND, internal pull-ups
//! - **Serial**: UART1 at 9600 baud for commands and reports
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod buttons;
mod coils;
mod delay;
mod sensor;
mod serial;

pub use buttons::Esp32Buttons;
pub use coils::PinCoils;
pub use delay::Esp32Delay;
pub use sensor::{Esp32AdcSampler, Esp32LightSensor};
pub use serial::{spawn_serial_rx, Esp32StatusTx};

/// UART baud rate for the command console.
pub const BAUD_RATE: u32 = 9600;

/// Period of the timer task that samples buttons and services conversions.
pub const SAMPLE_PERIOD_MS: u64 = 10;

/// Pin assignments for SuperMini ESP32-C3.
///
/// Button bits follow the port layout the default
/// [`ButtonMasks`](crate::ButtonMasks) expects: place-zero on bit 3,
/// turn-left on bit 4, turn-right on bit 5, seek-max on bit 6, all
/// active low.
pub mod pins {
    // =========================================================================
    // Stepper Coils
    // =========================================================================

    /// Coil A (pattern bit 0)
    pub const COIL_A: i32 = 2;

    /// Coil B (pattern bit 1)
    pub const COIL_B: i32 = 3;

    /// Coil C (pattern bit 2)
    pub const COIL_C: i32 = 4;

    // =========================================================================
    // Light Sensor
    // =========================================================================

    /// Photo resistor divider (ADC1 channel 0)
    pub const LIGHT_ADC: i32 = 0;

    // =========================================================================
    // Buttons (active low)
    // =========================================================================

    /// Place-zero button (port bit 3)
    pub const BTN_PLACE_ZERO: i32 = 5;

    /// Turn-left button (port bit 4)
    pub const BTN_TURN_LEFT: i32 = 6;

    /// Turn-right button (port bit 5)
    pub const BTN_TURN_RIGHT: i32 = 7;

    /// Seek-max button (port bit 6)
    pub const BTN_SEEK_MAX: i32 = 10;

    // =========================================================================
    // Serial (UART1)
    // =========================================================================

    /// UART transmit
    pub const UART_TX: i32 = 21;

    /// UART receive
    pub const UART_RX: i32 = 20;
}
