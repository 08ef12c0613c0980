//! Runtime configuration for desktop and ESP32 builds.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`. Step size and position count
//! are compile-time constants in [`crate::position`]; everything here can
//! change per board.
//!
//! # Example
//!
//! ```rust
//! use rs_lightseek::config::{Config, LoopConfig, MotorConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.motor.cooldown_ms, 500);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_motor(MotorConfig::default().with_settle_ms(50))
//!     .with_loop(LoopConfig::default().with_cycle_ms(250));
//! ```

use heapless::String as HString;

use crate::input::ButtonMasks;
use crate::report::DEFAULT_GREETING;

/// Maximum length for short config strings (device names)
pub const MAX_SHORT_STRING: usize = 32;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    // Take only what fits
    let take = s.len().min(MAX_SHORT_STRING);
    // Find valid UTF-8 boundary
    let valid_end = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Stepper timing
    pub motor: MotorConfig,
    /// Main loop cadence
    pub main_loop: LoopConfig,
    /// Button wiring
    pub buttons: ButtonMasks,
    /// Device identification and greeting
    pub device: DeviceConfig,
}

impl Config {
    /// Set motor configuration
    pub fn with_motor(mut self, motor: MotorConfig) -> Self {
        self.motor = motor;
        self
    }

    /// Set main loop configuration
    pub fn with_loop(mut self, main_loop: LoopConfig) -> Self {
        self.main_loop = main_loop;
        self
    }

    /// Set button masks
    pub fn with_buttons(mut self, buttons: ButtonMasks) -> Self {
        self.buttons = buttons;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// Motor Config
// ============================================================================

/// Stepper timing configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorConfig {
    /// Coils-off hold before energizing the next phase (milliseconds)
    pub cooldown_ms: u32,
    /// Energized hold while the rotor settles (milliseconds)
    pub settle_ms: u32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 500,
            settle_ms: 100,
        }
    }
}

impl MotorConfig {
    /// Set the cooldown hold
    pub fn with_cooldown_ms(mut self, ms: u32) -> Self {
        self.cooldown_ms = ms;
        self
    }

    /// Set the settle hold
    pub fn with_settle_ms(mut self, ms: u32) -> Self {
        self.settle_ms = ms;
        self
    }

    /// Total time one successful step blocks for
    pub fn step_duration_ms(&self) -> u32 {
        self.cooldown_ms + self.settle_ms
    }
}

// ============================================================================
// Loop Config
// ============================================================================

/// Main loop configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopConfig {
    /// Wait between starting the cycle's conversion and polling inputs
    pub cycle_ms: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { cycle_ms: 500 }
    }
}

impl LoopConfig {
    /// Set the cycle wait
    pub fn with_cycle_ms(mut self, ms: u32) -> Self {
        self.cycle_ms = ms;
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name
    pub name: ShortString,
    /// Bytes written on the serial line at startup
    pub greeting: [u8; 2],
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-lightseek"),
            greeting: DEFAULT_GREETING,
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the startup greeting
    pub fn with_greeting(mut self, greeting: [u8; 2]) -> Self {
        self.greeting = greeting;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.motor.cooldown_ms, 500);
        assert_eq!(config.motor.settle_ms, 100);
        assert_eq!(config.main_loop.cycle_ms, 500);
        assert_eq!(config.buttons, ButtonMasks::DEFAULT);
        assert_eq!(config.device.greeting, [b'C', b'\r']);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_motor(
                MotorConfig::default()
                    .with_cooldown_ms(20)
                    .with_settle_ms(5),
            )
            .with_loop(LoopConfig::default().with_cycle_ms(100))
            .with_device(DeviceConfig::default().with_name("bench rig"));

        assert_eq!(config.motor.cooldown_ms, 20);
        assert_eq!(config.motor.settle_ms, 5);
        assert_eq!(config.main_loop.cycle_ms, 100);
        assert_eq!(config.device.name.as_str(), "bench rig");
    }

    #[test]
    fn step_duration() {
        assert_eq!(MotorConfig::default().step_duration_ms(), 600);
    }

    #[test]
    fn custom_buttons() {
        let masks = ButtonMasks {
            mask: 0x0F,
            ..ButtonMasks::DEFAULT
        };
        let config = Config::default().with_buttons(masks);
        assert_eq!(config.buttons.mask, 0x0F);
        assert_eq!(config.buttons.seek_max, ButtonMasks::DEFAULT.seek_max);
    }

    #[test]
    fn greeting_override() {
        let device = DeviceConfig::default().with_greeting(*b"L\n");
        assert_eq!(device.greeting, *b"L\n");
    }

    // =========================================================================
    // String Helper Tests
    // =========================================================================

    #[test]
    fn short_string_truncation() {
        let long_input = "a".repeat(100);
        let s = short_string(&long_input);
        assert_eq!(s.len(), MAX_SHORT_STRING);
    }

    #[test]
    fn string_helpers_utf8_boundary() {
        // Each char is 3 bytes; 32 is not a multiple of 3
        let input = "光".repeat(20);
        let s = short_string(&input);
        assert!(s.len() <= MAX_SHORT_STRING);
        assert_eq!(s.len(), 30);
        assert!(core::str::from_utf8(s.as_bytes()).is_ok());
    }
}
