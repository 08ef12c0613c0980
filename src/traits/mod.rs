//! Trait definitions for hardware abstraction.
//!
//! This module defines the abstractions that allow rs-lightseek to run on
//! different hardware (ESP32, desktop mock).
//!
//! # Hardware Abstraction
//!
//! - [`CoilDriver`]: 3-phase stepper coil outputs
//! - [`LightSensor`]: Asynchronous intensity conversion trigger
//! - [`StatusSink`]: Serial output for status reports
//! - [`Delay`]: Blocking timed holds

pub mod hardware;

pub use hardware::*;
