//! # rs-lightseek
//!
//! A light-seeking turntable controller: a 3-phase stepper turns a photo
//! sensor through 0°..360° in 20° steps, driven by serial commands and
//! push buttons.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for coil output, light sensor, status output, and delays
//! - **Interrupt-safe signals**: Atomic cells shared between handlers and the main loop
//! - **Single-slot event latch**: Last event raised before a dispatch wins
//! - **Bounded stepping**: Position tracking with a per-slot intensity buffer
//! - **Seek-max calibration**: Full sweep, then park at the brightest slot
//! - **Line-oriented reports**: `POSITION: <angle>` / `INTENSITY: <value>`
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware abstractions
//! - `signals` / `event` - State shared with interrupt handlers
//! - `input` - Serial command and button decoding
//! - `motor` / `position` - Phase ring, step bounds, and sample buffer
//! - `seek` - Seek-max calibration
//! - `report` - Status line formatting
//! - `controller` - Main loop that ties everything together
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_lightseek::{Action, Config, Controller, MotorDriver, Signals};
//! use rs_lightseek::hal::{MockCoils, MockDelay, MockSensor, MockSink};
//!
//! static SIGNALS: Signals = Signals::new();
//!
//! let config = Config::default();
//! let driver = MotorDriver::new(
//!     MockCoils::new(),
//!     MockDelay::new(),
//!     MockSensor::new(&SIGNALS).with_readings(&[42]),
//!     MockSink::new(),
//!     &SIGNALS,
//!     &config.motor,
//! );
//! let mut controller = Controller::new(driver, &config);
//! controller.startup().unwrap();
//!
//! // Nothing pressed: the cycle reports the fresh reading
//! assert_eq!(controller.run_cycle().unwrap(), Action::Reported);
//! assert_eq!(
//!     controller.driver().sink().lines(),
//!     vec!["POSITION: 0", "INTENSITY: 42"]
//! );
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Shared configuration system for desktop and ESP32.
pub mod config;
/// Main loop that polls inputs and dispatches one action per cycle.
pub mod controller;
/// Error type for hardware failures surfaced by the controller.
pub mod error;
/// Event kinds and the single-slot event latch.
pub mod event;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Serial command and button snapshot decoding.
pub mod input;
/// Phase sequencing and bounded stepping.
pub mod motor;
/// Angle tracking and the per-slot intensity buffer.
pub mod position;
/// Status line formatting.
pub mod report;
/// Seek-max calibration.
pub mod seek;
/// Cells written by interrupt handlers and read by the main loop.
pub mod signals;
/// Core traits for hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use config::{Config, DeviceConfig, LoopConfig, MotorConfig};
pub use controller::{Action, Controller};
pub use error::Error;
pub use event::{Event, EventLatch};
pub use input::ButtonMasks;
pub use motor::{MotorDriver, Phase, PhaseSequencer};
pub use position::{PositionTracker, MAX_ANGLE, POSITION_COUNT, SLOT_COUNT, STEP_DEG};
pub use report::Report;
pub use seek::SeekOutcome;
pub use signals::Signals;
pub use traits::{CoilDriver, Delay, Direction, LightSensor, StatusSink};
