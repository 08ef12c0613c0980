//! Main loop that ties signals, input decoding, and the motor together.
//!
//! This module provides [`Controller`], which runs one fixed-cadence cycle
//! per [`run_cycle`](Controller::run_cycle) call:
//!
//! 1. Clear the pending event and the received serial byte.
//! 2. Start a sensor conversion.
//! 3. Wait the configured cycle time. The conversion usually completes
//!    here and raises [`Event::SensorReady`].
//! 4. Poll the serial byte, then the button snapshot. Each may raise one
//!    event; buttons run second and win.
//! 5. Dispatch exactly one action for the pending event.
//!
//! Nothing interrupts a dispatched action. Inputs that arrive while a
//! seek-max sweep runs are overwritten by later events or cleared by the
//! next cycle.
//!
//! # Example
//!
//! ```rust
//! use rs_lightseek::{Action, Config, Controller, MotorDriver, Signals};
//! use rs_lightseek::hal::{MockCoils, MockDelay, MockSensor, MockSink};
//!
//! let signals = Signals::new();
//! let config = Config::default();
//! let driver = MotorDriver::new(
//!     MockCoils::new(),
//!     MockDelay::new(),
//!     MockSensor::new(&signals).with_readings(&[90]),
//!     MockSink::new(),
//!     &signals,
//!     &config.motor,
//! );
//! let mut controller = Controller::new(driver, &config);
//! controller.startup().unwrap();
//!
//! // Operator types 'l' on the serial console during the cycle wait
//! controller.start_cycle().unwrap();
//! signals.serial_received(b'l');
//! let action = controller.finish_cycle().unwrap();
//!
//! assert_eq!(action, Action::Stepped { moved: true });
//! assert_eq!(controller.driver().angle(), 20);
//! ```

use log::{debug, info};

use crate::config::Config;
use crate::error::Error;
use crate::event::Event;
use crate::input::{command_event, ButtonMasks};
use crate::motor::MotorDriver;
use crate::seek::SeekOutcome;
use crate::traits::{CoilDriver, Delay, Direction, LightSensor, StatusSink};

/// What a cycle did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// No event was pending.
    Idle,
    /// A sensor reading was reported.
    Reported,
    /// A single step was attempted.
    Stepped {
        /// Whether the platform moved.
        moved: bool,
    },
    /// Seek-max ran to completion.
    Sought(SeekOutcome),
    /// The current position became 0°.
    Zeroed,
}

/// Fixed-cadence dispatcher.
pub struct Controller<'s, C, D, S, R> {
    driver: MotorDriver<'s, C, D, S, R>,
    masks: ButtonMasks,
    cycle_ms: u32,
    greeting: [u8; 2],
    cycles: u64,
}

impl<'s, C, D, S, R> Controller<'s, C, D, S, R>
where
    C: CoilDriver,
    D: Delay,
    S: LightSensor,
    R: StatusSink,
{
    /// Create a controller around a motor driver.
    pub fn new(driver: MotorDriver<'s, C, D, S, R>, config: &Config) -> Self {
        Self {
            driver,
            masks: config.buttons,
            cycle_ms: config.main_loop.cycle_ms,
            greeting: config.device.greeting,
            cycles: 0,
        }
    }

    /// Write the startup greeting. Call once before the first cycle.
    pub fn startup(&mut self) -> Result<(), Error> {
        info!("controller up, cycle {} ms", self.cycle_ms);
        self.driver
            .sink_mut()
            .write_bytes(&self.greeting)
            .map_err(|e| {
                log::warn!("greeting failed: {:?}", e);
                Error::Report
            })
    }

    /// Run one main-loop cycle.
    pub fn run_cycle(&mut self) -> Result<Action, Error> {
        self.start_cycle()?;
        self.finish_cycle()
    }

    /// First half of a cycle: clear inputs, start a conversion, wait.
    ///
    /// Inputs that arrive between this and [`finish_cycle`](Self::finish_cycle)
    /// are seen by this cycle.
    pub fn start_cycle(&mut self) -> Result<(), Error> {
        self.driver.signals().begin_cycle();
        self.cycles += 1;

        self.driver.start_conversion()?;
        self.driver.hold(self.cycle_ms);
        Ok(())
    }

    /// Second half of a cycle: poll inputs and dispatch the pending event.
    pub fn finish_cycle(&mut self) -> Result<Action, Error> {
        self.poll_serial();
        self.poll_buttons();

        let event = self.driver.signals().events().take();
        self.dispatch(event)
    }

    /// Raise the event for the received serial byte, if it is a command.
    pub fn poll_serial(&self) {
        let signals = self.driver.signals();
        if let Some(event) = command_event(signals.serial_byte()) {
            signals.events().raise(event);
        }
    }

    /// Raise the event for the current button snapshot, if it matches.
    pub fn poll_buttons(&self) {
        let signals = self.driver.signals();
        if let Some(event) = self.masks.decode(signals.buttons()) {
            signals.events().raise(event);
        }
    }

    /// Perform the action for `event`.
    pub fn dispatch(&mut self, event: Event) -> Result<Action, Error> {
        if event != Event::None {
            debug!("cycle {}: {}", self.cycles, event.as_str());
        }
        let action = match event {
            Event::None => Action::Idle,
            Event::SensorReady => {
                self.driver.report()?;
                Action::Reported
            }
            Event::SeekMax => {
                // Signal cells are atomics; nothing is masked that would
                // need re-enabling before the sweep.
                Action::Sought(self.driver.seek_max()?)
            }
            Event::TurnLeft => Action::Stepped {
                moved: self.driver.step(Direction::Ccw)?,
            },
            Event::TurnRight => Action::Stepped {
                moved: self.driver.step(Direction::Cw)?,
            },
            Event::PlaceZero => {
                self.driver.place_zero();
                Action::Zeroed
            }
        };
        Ok(action)
    }

    /// Cycles run so far.
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The motor driver.
    #[inline]
    pub fn driver(&self) -> &MotorDriver<'s, C, D, S, R> {
        &self.driver
    }

    /// Mutable motor driver access.
    #[inline]
    pub fn driver_mut(&mut self) -> &mut MotorDriver<'s, C, D, S, R> {
        &mut self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockCoils, MockDelay, MockSensor, MockSink};
    use crate::signals::Signals;

    type TestController<'s> = Controller<'s, MockCoils, MockDelay, MockSensor<'s>, MockSink>;

    fn controller(signals: &Signals) -> TestController<'_> {
        let config = Config::default();
        let driver = MotorDriver::new(
            MockCoils::new(),
            MockDelay::new(),
            MockSensor::new(signals),
            MockSink::new(),
            signals,
            &config.motor,
        );
        Controller::new(driver, &config)
    }

    #[test]
    fn startup_writes_greeting() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);
        ctl.startup().unwrap();
        assert_eq!(ctl.driver().sink().bytes, b"C\r");
    }

    #[test]
    fn quiet_cycle_reports_reading() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);
        ctl.driver_mut().sensor_mut().queue_reading(55);

        assert_eq!(ctl.run_cycle().unwrap(), Action::Reported);
        assert_eq!(
            ctl.driver().sink().lines(),
            vec!["POSITION: 0", "INTENSITY: 55"]
        );
        assert_eq!(ctl.driver().delay().holds, vec![500]);
        assert_eq!(ctl.cycles(), 1);
    }

    #[test]
    fn no_completion_means_idle() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);
        ctl.driver_mut().sensor_mut().set_deferred(true);

        assert_eq!(ctl.run_cycle().unwrap(), Action::Idle);
        assert!(ctl.driver().sink().bytes.is_empty());
    }

    /// One cycle with `byte` arriving during the wait.
    fn cycle_with_byte(ctl: &mut TestController<'_>, signals: &Signals, byte: u8) -> Action {
        ctl.start_cycle().unwrap();
        signals.serial_received(byte);
        ctl.finish_cycle().unwrap()
    }

    #[test]
    fn serial_commands_dispatch() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);

        assert_eq!(
            cycle_with_byte(&mut ctl, &signals, b'l'),
            Action::Stepped { moved: true }
        );
        assert_eq!(ctl.driver().angle(), 20);

        assert_eq!(
            cycle_with_byte(&mut ctl, &signals, b'r'),
            Action::Stepped { moved: true }
        );
        assert_eq!(ctl.driver().angle(), 0);

        assert_eq!(
            cycle_with_byte(&mut ctl, &signals, b'r'),
            Action::Stepped { moved: false }
        );
    }

    #[test]
    fn unknown_byte_falls_back_to_report() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);
        assert_eq!(cycle_with_byte(&mut ctl, &signals, b'x'), Action::Reported);
        assert_eq!(ctl.driver().angle(), 0);
    }

    #[test]
    fn byte_before_cycle_is_dropped() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);

        signals.serial_received(b'l');
        assert_eq!(ctl.run_cycle().unwrap(), Action::Reported);
        assert_eq!(ctl.driver().angle(), 0);
    }

    #[test]
    fn byte_cleared_each_cycle() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);

        cycle_with_byte(&mut ctl, &signals, b'l');
        // no new byte: the next cycle only reports
        assert_eq!(ctl.run_cycle().unwrap(), Action::Reported);
        assert_eq!(ctl.driver().angle(), 20);
    }

    #[test]
    fn buttons_override_serial() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);
        ctl.driver_mut().move_to(40).unwrap();
        signals.timer_tick(ButtonMasks::DEFAULT.turn_right);

        assert_eq!(
            cycle_with_byte(&mut ctl, &signals, b'l'),
            Action::Stepped { moved: true }
        );
        assert_eq!(ctl.driver().angle(), 20);
    }

    #[test]
    fn held_button_repeats_every_cycle() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);
        signals.timer_tick(ButtonMasks::DEFAULT.turn_left);

        for _ in 0..3 {
            ctl.run_cycle().unwrap();
        }
        assert_eq!(ctl.driver().angle(), 60);

        signals.timer_tick(ButtonMasks::DEFAULT.mask);
        assert_eq!(ctl.run_cycle().unwrap(), Action::Reported);
    }

    #[test]
    fn place_zero_command() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);
        ctl.driver_mut().move_to(80).unwrap();
        let writes = ctl.driver().coils().writes.len();

        assert_eq!(cycle_with_byte(&mut ctl, &signals, b'z'), Action::Zeroed);
        assert_eq!(ctl.driver().angle(), 0);
        assert_eq!(ctl.driver().coils().writes.len(), writes);
    }

    #[test]
    fn seek_command_runs_sweep() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);

        match cycle_with_byte(&mut ctl, &signals, b'm') {
            Action::Sought(outcome) => {
                assert_eq!(outcome.sweep_steps, crate::position::POSITION_COUNT);
            }
            other => panic!("expected seek, got {:?}", other),
        }
    }

    #[test]
    fn dispatch_none_is_noop() {
        let signals = Signals::new();
        let mut ctl = controller(&signals);
        assert_eq!(ctl.dispatch(Event::None).unwrap(), Action::Idle);
        assert!(ctl.driver().sink().bytes.is_empty());
        assert!(ctl.driver().coils().writes.is_empty());
    }

    #[test]
    fn sensor_failure_aborts_cycle() {
        let signals = Signals::new();
        let config = Config::default();
        let driver = MotorDriver::new(
            MockCoils::new(),
            MockDelay::new(),
            MockSensor::new(&signals).failing(),
            MockSink::new(),
            &signals,
            &config.motor,
        );
        let mut ctl = Controller::new(driver, &config);

        assert_eq!(ctl.run_cycle(), Err(Error::Sensor));
        assert!(ctl.driver().delay().holds.is_empty());
    }
}
