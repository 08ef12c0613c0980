//! Desktop simulator for the light seeker.
//!
//! Runs the real controller against a simulated turntable: the coil
//! driver turns phase changes into platform movement, and the light sensor
//! reports a lamp placed at a fixed angle. Type commands on stdin:
//!
//! - `m` seek the brightest position
//! - `l` / `r` turn left (counter-clockwise) / right (clockwise)
//! - `z` make the current position 0°
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_sim
//! cargo run --example desktop_sim -- 240 fast
//! ```
//!
//! The first argument places the lamp (default 100°). `fast` shortens
//! every hold tenfold.

use anyhow::Context;
use log::{info, LevelFilter, Log, Metadata, Record};
use rs_lightseek::traits::{CoilDriver, Delay, LightSensor, StatusSink};
use rs_lightseek::{Config, Controller, MotorDriver, Phase, Signals, STEP_DEG};
use std::convert::Infallible;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicI16, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

static SIGNALS: Signals = Signals::new();
static LOGGER: StderrLogger = StderrLogger;

// =============================================================================
// Logging
// =============================================================================

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

// =============================================================================
// Simulated Hardware
// =============================================================================

/// Platform angle as the simulated mechanics see it.
type Platform = Arc<AtomicI16>;

/// Coils that move the platform one step per phase change.
struct SimCoils {
    platform: Platform,
    last: u8,
}

impl SimCoils {
    fn new(platform: Platform) -> Self {
        Self {
            platform,
            last: Phase::default().pattern(),
        }
    }

    fn ring_index(pattern: u8) -> Option<i16> {
        [Phase::St1, Phase::St2, Phase::St3]
            .iter()
            .position(|p| p.pattern() == pattern)
            .map(|i| i as i16)
    }
}

impl CoilDriver for SimCoils {
    type Error = Infallible;

    fn energize(&mut self, pattern: u8) -> Result<(), Infallible> {
        if let (Some(from), Some(to)) = (Self::ring_index(self.last), Self::ring_index(pattern)) {
            // one place forward around the ring is clockwise
            match (to - from).rem_euclid(3) {
                1 => self.platform.fetch_sub(STEP_DEG, Ordering::Relaxed),
                2 => self.platform.fetch_add(STEP_DEG, Ordering::Relaxed),
                _ => 0,
            };
        }
        self.last = pattern;
        Ok(())
    }

    fn de_energize(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Lamp at a fixed angle; intensity falls off linearly with distance.
struct LampSensor {
    platform: Platform,
    lamp: i16,
}

impl LightSensor for LampSensor {
    type Error = Infallible;

    fn start_conversion(&mut self) -> Result<(), Infallible> {
        let distance = (self.platform.load(Ordering::Relaxed) - self.lamp).unsigned_abs();
        let value = 255u16.saturating_sub(distance * 2) as u8;
        SIGNALS.conversion_complete(value);
        Ok(())
    }
}

struct SleepDelay {
    divisor: u32,
}

impl Delay for SleepDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis((ms / self.divisor) as u64));
    }
}

struct StdoutSink(io::Stdout);

impl StatusSink for StdoutSink {
    type Error = io::Error;

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut out = self.0.lock();
        out.write_all(bytes)?;
        out.flush()
    }
}

// =============================================================================
// Main
// =============================================================================

fn main() -> anyhow::Result<()> {
    log::set_logger(&LOGGER).map_err(|e| anyhow::anyhow!("logger: {}", e))?;
    log::set_max_level(LevelFilter::Debug);

    let mut args = std::env::args().skip(1);
    let lamp = match args.next() {
        Some(arg) => arg.parse().context("lamp angle must be an integer")?,
        None => 100,
    };
    let divisor = if args.next().as_deref() == Some("fast") { 10 } else { 1 };

    let config = Config::default();
    info!("{} simulator, lamp at {} deg", config.device.name, lamp);
    info!("commands: m=seek, l=left, r=right, z=zero");

    // stdin stands in for the UART receive interrupt
    thread::Builder::new()
        .name("stdin-rx".into())
        .spawn(|| {
            for byte in io::stdin().lock().bytes() {
                match byte {
                    Ok(b'\n') | Ok(b'\r') => {}
                    Ok(b) => SIGNALS.serial_received(b),
                    Err(_) => break,
                }
            }
        })
        .context("spawn stdin reader")?;

    let platform = Platform::default();
    let driver = MotorDriver::new(
        SimCoils::new(platform.clone()),
        SleepDelay { divisor },
        LampSensor {
            platform: platform.clone(),
            lamp,
        },
        StdoutSink(io::stdout()),
        &SIGNALS,
        &config.motor,
    );
    let mut controller = Controller::new(driver, &config);
    controller.startup()?;

    loop {
        controller.run_cycle()?;
    }
}
