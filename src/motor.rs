//! Stepper phase sequencing and the direction-aware step primitive.
//!
//! The motor has three coils energized one at a time. Stepping walks the
//! [`Phase`] ring: forward (`ST1 → ST2 → ST3 → ST1`) turns clockwise, the
//! reverse walk turns counter-clockwise.
//!
//! [`MotorDriver`] ties the phase ring to the [`PositionTracker`]: a step
//! is only taken when the tracked angle stays within 0°..=360°, and every
//! step attempt records a sample and emits a status report.
//!
//! # Example
//!
//! ```rust
//! use rs_lightseek::{Direction, MotorConfig, MotorDriver, Signals};
//! use rs_lightseek::hal::{MockCoils, MockDelay, MockSensor, MockSink};
//!
//! let signals = Signals::new();
//! let mut driver = MotorDriver::new(
//!     MockCoils::new(),
//!     MockDelay::new(),
//!     MockSensor::new(&signals),
//!     MockSink::new(),
//!     &signals,
//!     &MotorConfig::default(),
//! );
//!
//! assert!(driver.step(Direction::Ccw).unwrap());
//! assert_eq!(driver.angle(), 20);
//!
//! assert!(driver.step(Direction::Cw).unwrap());
//! assert!(!driver.step(Direction::Cw).unwrap()); // 0° is the lower limit
//! assert_eq!(driver.angle(), 0);
//! ```

use log::{debug, trace, warn};

use crate::config::MotorConfig;
use crate::error::Error;
use crate::position::{PositionTracker, POSITION_COUNT, STEP_DEG};
use crate::report::Report;
use crate::signals::Signals;
use crate::traits::{CoilDriver, Delay, Direction, LightSensor, StatusSink};

/// Bits of the coil port driven by the phase patterns.
pub const PHASE_MASK: u8 = 0b0000_0111;

/// One of the three coil energization patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    /// First coil (pattern `0b010`).
    #[default]
    St1,
    /// Second coil (pattern `0b001`).
    St2,
    /// Third coil (pattern `0b100`).
    St3,
}

impl Phase {
    /// Coil-enable pattern for this phase.
    #[inline]
    pub const fn pattern(self) -> u8 {
        match self {
            Phase::St1 => 0b0000_0010,
            Phase::St2 => 0b0000_0001,
            Phase::St3 => 0b0000_0100,
        }
    }

    /// The phase one ring position away in `dir`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_lightseek::{Direction, Phase};
    ///
    /// assert_eq!(Phase::St1.next(Direction::Cw), Phase::St2);
    /// assert_eq!(Phase::St1.next(Direction::Ccw), Phase::St3);
    /// ```
    pub const fn next(self, dir: Direction) -> Self {
        match (self, dir) {
            (Phase::St1, Direction::Cw) => Phase::St2,
            (Phase::St2, Direction::Cw) => Phase::St3,
            (Phase::St3, Direction::Cw) => Phase::St1,
            (Phase::St1, Direction::Ccw) => Phase::St3,
            (Phase::St2, Direction::Ccw) => Phase::St1,
            (Phase::St3, Direction::Ccw) => Phase::St2,
        }
    }
}

/// Phase ring plus the timed coil pulse for one physical step.
pub struct PhaseSequencer<C, D> {
    coils: C,
    delay: D,
    phase: Phase,
    cooldown_ms: u32,
    settle_ms: u32,
}

impl<C: CoilDriver, D: Delay> PhaseSequencer<C, D> {
    /// Starts at [`Phase::St1`] with the given timing.
    pub fn new(coils: C, delay: D, config: &MotorConfig) -> Self {
        Self {
            coils,
            delay,
            phase: Phase::St1,
            cooldown_ms: config.cooldown_ms,
            settle_ms: config.settle_ms,
        }
    }

    /// Drive one step: coils off, cooldown, next phase on, settle, coils off.
    ///
    /// Both holds complete before this returns. Returns the new phase.
    pub fn pulse(&mut self, dir: Direction) -> Result<Phase, C::Error> {
        self.coils.de_energize()?;
        self.delay.delay_ms(self.cooldown_ms);

        let next = self.phase.next(dir);
        self.coils.energize(next.pattern())?;
        self.phase = next;
        self.delay.delay_ms(self.settle_ms);

        self.coils.de_energize()?;
        Ok(self.phase)
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Block for `ms` on the sequencer's delay source.
    #[inline]
    pub fn hold(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

/// Direction-aware stepping over the tracked angle range.
///
/// # Type Parameters
///
/// - `C`: coil outputs ([`CoilDriver`])
/// - `D`: blocking delay ([`Delay`])
/// - `S`: intensity sensor ([`LightSensor`])
/// - `R`: status output ([`StatusSink`])
pub struct MotorDriver<'s, C, D, S, R> {
    sequencer: PhaseSequencer<C, D>,
    tracker: PositionTracker,
    sensor: S,
    sink: R,
    signals: &'s Signals,
}

impl<'s, C, D, S, R> MotorDriver<'s, C, D, S, R>
where
    C: CoilDriver,
    D: Delay,
    S: LightSensor,
    R: StatusSink,
{
    /// Create a driver at 0° and phase ST1.
    pub fn new(
        coils: C,
        delay: D,
        sensor: S,
        sink: R,
        signals: &'s Signals,
        config: &MotorConfig,
    ) -> Self {
        Self {
            sequencer: PhaseSequencer::new(coils, delay, config),
            tracker: PositionTracker::new(),
            sensor,
            sink,
            signals,
        }
    }

    /// Attempt one step in `dir`.
    ///
    /// A conversion is started first, whatever the outcome. The sample
    /// recorded afterwards is the cached reading in [`Signals`], which is
    /// the result of an earlier conversion unless the sensor completes
    /// synchronously.
    ///
    /// Returns `Ok(false)` without moving when the step would leave
    /// 0°..=360°. Either way the current slot is updated and a report is
    /// written.
    pub fn step(&mut self, dir: Direction) -> Result<bool, Error> {
        self.start_conversion()?;

        let moved = if self.tracker.can_step(dir) {
            let phase = self.sequencer.pulse(dir).map_err(|e| {
                warn!("coil write failed: {:?}", e);
                Error::Coil
            })?;
            self.tracker.advance(dir);
            trace!(
                "step {} -> {} deg, phase {:?}",
                dir.as_str(),
                self.tracker.angle(),
                phase
            );
            true
        } else {
            debug!(
                "step {} rejected at {} deg",
                dir.as_str(),
                self.tracker.angle()
            );
            false
        };

        let slot = self.tracker.current_slot();
        self.tracker.record(slot, self.signals.reading());
        self.report()?;
        Ok(moved)
    }

    /// Step in `dir` until a limit is hit, at most [`POSITION_COUNT`] times.
    ///
    /// Returns the number of successful steps.
    pub fn sweep_to_limit(&mut self, dir: Direction) -> Result<usize, Error> {
        self.rotate(dir, POSITION_COUNT)
    }

    /// Move to `target` degrees one step at a time.
    ///
    /// Direction is counter-clockwise when `target` is at or above the
    /// current angle. A limit hit part-way truncates the move. Returns the
    /// number of successful steps.
    pub fn move_to(&mut self, target: i16) -> Result<usize, Error> {
        let angle = self.tracker.angle();
        let dir = if target >= angle {
            Direction::Ccw
        } else {
            Direction::Cw
        };
        let steps = (i32::from(target) - i32::from(angle)).unsigned_abs() as usize
            / STEP_DEG as usize;
        debug!("move {} -> {} deg: {} steps {}", angle, target, steps, dir.as_str());
        self.rotate(dir, steps)
    }

    fn rotate(&mut self, dir: Direction, steps: usize) -> Result<usize, Error> {
        for taken in 0..steps {
            if !self.step(dir)? {
                return Ok(taken);
            }
        }
        Ok(steps)
    }

    /// Write a status report for the current angle and latest reading.
    pub fn report(&mut self) -> Result<(), Error> {
        Report::new(self.tracker.angle(), self.signals.reading())
            .emit(&mut self.sink)
            .map_err(|e| {
                warn!("status write failed: {:?}", e);
                Error::Report
            })
    }

    /// Start a sensor conversion.
    pub fn start_conversion(&mut self) -> Result<(), Error> {
        self.sensor.start_conversion().map_err(|e| {
            warn!("sensor start failed: {:?}", e);
            Error::Sensor
        })
    }

    /// Declare the current position 0° without touching the coils.
    pub fn place_zero(&mut self) {
        debug!("zero placed at tracked {} deg", self.tracker.angle());
        self.tracker.reset_to_zero();
    }

    /// Block for `ms` on the driver's delay source.
    #[inline]
    pub fn hold(&mut self, ms: u32) {
        self.sequencer.hold(ms);
    }

    /// Current angle in degrees.
    #[inline]
    pub fn angle(&self) -> i16 {
        self.tracker.angle()
    }

    /// Current motor phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    /// Position and sample buffer.
    #[inline]
    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    /// Coil outputs, for inspection.
    #[inline]
    pub fn coils(&self) -> &C {
        &self.sequencer.coils
    }

    /// Delay source, for inspection.
    #[inline]
    pub fn delay(&self) -> &D {
        &self.sequencer.delay
    }

    /// Sensor, for inspection.
    #[inline]
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Mutable sensor access.
    #[inline]
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Status sink, for inspection.
    #[inline]
    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Mutable status sink access.
    #[inline]
    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    /// Shared signal cells.
    #[inline]
    pub fn signals(&self) -> &'s Signals {
        self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockCoils, MockDelay, MockSensor, MockSink};

    type TestDriver<'s> = MotorDriver<'s, MockCoils, MockDelay, MockSensor<'s>, MockSink>;

    fn driver(signals: &Signals) -> TestDriver<'_> {
        MotorDriver::new(
            MockCoils::new(),
            MockDelay::new(),
            MockSensor::new(signals),
            MockSink::new(),
            signals,
            &MotorConfig::default(),
        )
    }

    // =========================================================================
    // Phase Tests
    // =========================================================================

    #[test]
    fn phase_patterns() {
        assert_eq!(Phase::St1.pattern(), 0b010);
        assert_eq!(Phase::St2.pattern(), 0b001);
        assert_eq!(Phase::St3.pattern(), 0b100);
        for phase in [Phase::St1, Phase::St2, Phase::St3] {
            assert_eq!(phase.pattern() & !PHASE_MASK, 0);
        }
    }

    #[test]
    fn phase_ring_forward_and_reverse() {
        assert_eq!(Phase::St1.next(Direction::Cw), Phase::St2);
        assert_eq!(Phase::St2.next(Direction::Cw), Phase::St3);
        assert_eq!(Phase::St3.next(Direction::Cw), Phase::St1);
        assert_eq!(Phase::St1.next(Direction::Ccw), Phase::St3);
        assert_eq!(Phase::St3.next(Direction::Ccw), Phase::St2);
        assert_eq!(Phase::St2.next(Direction::Ccw), Phase::St1);
    }

    #[test]
    fn phase_reverse_undoes_forward() {
        for phase in [Phase::St1, Phase::St2, Phase::St3] {
            assert_eq!(phase.next(Direction::Cw).next(Direction::Ccw), phase);
        }
    }

    // =========================================================================
    // PhaseSequencer Tests
    // =========================================================================

    #[test]
    fn pulse_sequence_and_timing() {
        let mut seq = PhaseSequencer::new(
            MockCoils::new(),
            MockDelay::new(),
            &MotorConfig::default(),
        );

        let phase = seq.pulse(Direction::Cw).unwrap();

        assert_eq!(phase, Phase::St2);
        // off, on(ST2), off
        assert_eq!(seq.coils.writes, vec![0, Phase::St2.pattern(), 0]);
        assert_eq!(seq.delay.holds, vec![500, 100]);
    }

    #[test]
    fn pulse_stops_on_coil_error() {
        let mut seq = PhaseSequencer::new(
            MockCoils::new().failing(),
            MockDelay::new(),
            &MotorConfig::default(),
        );
        assert!(seq.pulse(Direction::Ccw).is_err());
        assert_eq!(seq.phase(), Phase::St1);
        assert!(seq.delay.holds.is_empty());
    }

    #[test]
    fn energize_error_keeps_phase() {
        let mut seq = PhaseSequencer::new(
            MockCoils::new().failing_energize(),
            MockDelay::new(),
            &MotorConfig::default(),
        );
        assert!(seq.pulse(Direction::Ccw).is_err());
        assert_eq!(seq.phase(), Phase::St1);
        // only the leading de-energize reached the coils
        assert_eq!(seq.coils.writes, vec![0]);

        // the next pulse still moves one place from St1
        seq.coils = MockCoils::new();
        assert_eq!(seq.pulse(Direction::Ccw), Ok(Phase::St3));
    }

    // =========================================================================
    // MotorDriver Tests
    // =========================================================================

    #[test]
    fn step_records_sample_at_new_slot() {
        let signals = Signals::new();
        signals.conversion_complete(61);
        let mut driver = driver(&signals);
        driver.sensor_mut().set_deferred(true);

        assert!(driver.step(Direction::Ccw).unwrap());

        assert_eq!(driver.angle(), 20);
        assert_eq!(driver.tracker().read(1), Some(61));
        assert_eq!(driver.tracker().read(0), Some(0));
    }

    #[test]
    fn rejected_step_still_records_and_reports() {
        let signals = Signals::new();
        let mut driver = driver(&signals);
        driver.sensor_mut().queue_reading(33);

        assert!(!driver.step(Direction::Cw).unwrap());

        assert_eq!(driver.angle(), 0);
        assert_eq!(driver.phase(), Phase::St1);
        assert_eq!(driver.coils().energize_count, 0);
        assert_eq!(driver.tracker().read(0), Some(33));
        assert_eq!(driver.sink().lines(), vec!["POSITION: 0", "INTENSITY: 33"]);
        assert_eq!(driver.sensor().conversions, 1);
    }

    #[test]
    fn move_to_counts_steps() {
        let signals = Signals::new();
        let mut driver = driver(&signals);

        assert_eq!(driver.move_to(100).unwrap(), 5);
        assert_eq!(driver.angle(), 100);

        assert_eq!(driver.move_to(40).unwrap(), 3);
        assert_eq!(driver.angle(), 40);

        assert_eq!(driver.move_to(40).unwrap(), 0);
        assert_eq!(driver.coils().energize_count, 8);
    }

    #[test]
    fn move_to_truncates_at_limit() {
        let signals = Signals::new();
        let mut driver = driver(&signals);
        driver.move_to(340).unwrap();

        assert_eq!(driver.move_to(400).unwrap(), 1);
        assert_eq!(driver.angle(), 360);
    }

    #[test]
    fn sweep_to_limit_from_middle() {
        let signals = Signals::new();
        let mut driver = driver(&signals);
        driver.move_to(100).unwrap();

        assert_eq!(driver.sweep_to_limit(Direction::Cw).unwrap(), 5);
        assert_eq!(driver.angle(), 0);
        assert_eq!(driver.sweep_to_limit(Direction::Ccw).unwrap(), POSITION_COUNT);
        assert_eq!(driver.angle(), 360);
    }

    #[test]
    fn place_zero_does_not_actuate() {
        let signals = Signals::new();
        let mut driver = driver(&signals);
        driver.move_to(60).unwrap();
        let writes = driver.coils().writes.len();

        driver.place_zero();

        assert_eq!(driver.angle(), 0);
        assert_eq!(driver.coils().writes.len(), writes);
    }

    #[test]
    fn coil_error_leaves_angle() {
        let signals = Signals::new();
        let mut driver = MotorDriver::new(
            MockCoils::new().failing(),
            MockDelay::new(),
            MockSensor::new(&signals),
            MockSink::new(),
            &signals,
            &MotorConfig::default(),
        );

        assert_eq!(driver.step(Direction::Ccw), Err(Error::Coil));
        assert_eq!(driver.angle(), 0);
    }

    #[test]
    fn sink_error_surfaces() {
        let signals = Signals::new();
        let mut driver = MotorDriver::new(
            MockCoils::new(),
            MockDelay::new(),
            MockSensor::new(&signals),
            MockSink::new().failing(),
            &signals,
            &MotorConfig::default(),
        );

        assert_eq!(driver.step(Direction::Ccw), Err(Error::Report));
        // the step itself happened before the report
        assert_eq!(driver.angle(), 20);
    }

    #[test]
    fn sensor_error_prevents_step() {
        let signals = Signals::new();
        let mut driver = MotorDriver::new(
            MockCoils::new(),
            MockDelay::new(),
            MockSensor::new(&signals).failing(),
            MockSink::new(),
            &signals,
            &MotorConfig::default(),
        );

        assert_eq!(driver.step(Direction::Ccw), Err(Error::Sensor));
        assert_eq!(driver.coils().energize_count, 0);
    }
}
