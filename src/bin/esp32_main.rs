//! ESP32-C3 SuperMini light seeker.
//!
//! This is the main entry point for the physical hardware controller.
//! It runs a fixed-cadence loop that:
//! - Starts a light conversion and waits one cycle
//! - Polls the serial console for `m` / `l` / `r` / `z` commands
//! - Polls the button snapshot latched by a 10ms timer, which also
//!   completes requested light conversions
//! - Steps, seeks, zeroes, or reports according to the pending event
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32 --bin esp32_main
//! espflash flash --monitor target/riscv32imc-esp-espidf/release/esp32_main
//! ```

use esp_idf_hal::gpio::{AnyIOPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_svc::log::EspLogger;
use esp_idf_svc::timer::EspTaskTimerService;
use log::info;
use rs_lightseek::hal::esp32::{
    spawn_serial_rx, Esp32AdcSampler, Esp32Buttons, Esp32Delay, Esp32LightSensor, Esp32StatusTx,
    PinCoils, BAUD_RATE, SAMPLE_PERIOD_MS,
};
use rs_lightseek::{Config, Controller, MotorDriver, Signals};
use std::time::Duration;

/// State shared with the UART thread and the sampling timer.
static SIGNALS: Signals = Signals::new();

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    EspLogger::initialize_default();

    let config = Config::default();
    info!("{} starting", config.device.name);

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Stepper Coils (GPIO2/3/4)
    // =========================================================================
    let coils = PinCoils::new(
        PinDriver::output(peripherals.pins.gpio2)?,
        PinDriver::output(peripherals.pins.gpio3)?,
        PinDriver::output(peripherals.pins.gpio4)?,
    );
    info!("[OK] Coils initialized (GPIO2/3/4)");

    // =========================================================================
    // Light Sensor (ADC1 on GPIO0)
    // =========================================================================
    let mut sampler = Esp32AdcSampler::new(peripherals.adc1, peripherals.pins.gpio0)?;
    let sensor = Esp32LightSensor::new(&SIGNALS);
    info!("[OK] Light sensor initialized (GPIO0 ADC)");

    // =========================================================================
    // Serial Console (UART1 on GPIO21/20)
    // =========================================================================
    let uart = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio21,
        peripherals.pins.gpio20,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(BAUD_RATE)),
    )?;
    let (tx, rx) = uart.into_split();
    let _rx_thread = spawn_serial_rx(rx, &SIGNALS)?;
    let sink = Esp32StatusTx::new(tx);
    info!("[OK] Serial initialized ({} baud)", BAUD_RATE);

    // =========================================================================
    // Buttons (GPIO5/6/7/10) and ADC, sampled by a periodic timer
    // =========================================================================
    let buttons = Esp32Buttons::new(
        peripherals.pins.gpio5,
        peripherals.pins.gpio6,
        peripherals.pins.gpio7,
        peripherals.pins.gpio10,
    )?;
    let timers = EspTaskTimerService::new()?;
    let sample_timer = timers.timer(move || {
        buttons.sample(&SIGNALS);
        sampler.poll(&SIGNALS);
    })?;
    sample_timer.every(Duration::from_millis(SAMPLE_PERIOD_MS))?;
    info!("[OK] Buttons initialized (GPIO5/6/7/10)");

    // =========================================================================
    // Controller
    // =========================================================================
    let driver = MotorDriver::new(coils, Esp32Delay::new(), sensor, sink, &SIGNALS, &config.motor);
    let mut controller = Controller::new(driver, &config);
    controller.startup()?;

    loop {
        controller.run_cycle()?;
    }
}
