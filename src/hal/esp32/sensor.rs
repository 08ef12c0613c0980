//! Photo resistor on the ESP32 oneshot ADC.
//!
//! Conversions complete off the main loop. [`Esp32LightSensor`] only posts
//! a request into [`Signals`]; [`Esp32AdcSampler`] runs on the periodic
//! timer task, performs the read, and publishes it through
//! [`Signals::service_conversion`]. Until the timer next fires, the main
//! loop keeps seeing the previous result. Readings are scaled from 12 bits
//! down to 8 by keeping the high byte.
//!
//! # Wiring
//!
//! - Photo resistor from 3.3V → GPIO0
//! - 10kΩ from GPIO0 → GND

use crate::signals::Signals;
use crate::traits::LightSensor;
use core::convert::Infallible;
use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::gpio::Gpio0;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;
use log::warn;

/// Conversion trigger handed to the motor driver.
pub struct Esp32LightSensor<'s> {
    signals: &'s Signals,
}

impl<'s> Esp32LightSensor<'s> {
    /// Creates a trigger posting requests into `signals`.
    pub fn new(signals: &'s Signals) -> Self {
        Self { signals }
    }
}

impl LightSensor for Esp32LightSensor<'_> {
    type Error = Infallible;

    fn start_conversion(&mut self) -> Result<(), Infallible> {
        self.signals.request_conversion();
        Ok(())
    }
}

/// ADC1 channel 0 (GPIO0), serviced from the timer task.
///
/// # Example
///
/// ```ignore
/// use rs_lightseek::hal::esp32::{Esp32AdcSampler, Esp32LightSensor};
///
/// static SIGNALS: Signals = Signals::new();
///
/// let mut sampler = Esp32AdcSampler::new(peripherals.adc1, peripherals.pins.gpio0)?;
/// let sensor = Esp32LightSensor::new(&SIGNALS);
/// let timer = timers.timer(move || sampler.poll(&SIGNALS))?;
/// timer.every(Duration::from_millis(10))?;
/// ```
pub struct Esp32AdcSampler {
    channel: AdcChannelDriver<'static, Gpio0, AdcDriver<'static, ADC1>>,
}

impl Esp32AdcSampler {
    /// Bits dropped to reduce a 12-bit sample to 8 bits.
    const SHIFT: u16 = 4;

    /// Creates the ADC driver and its channel.
    ///
    /// # Errors
    ///
    /// Returns an error if ADC or channel initialization fails.
    pub fn new(
        adc: impl Peripheral<P = ADC1> + 'static,
        pin: impl Peripheral<P = Gpio0> + 'static,
    ) -> Result<Self, EspError> {
        let adc = AdcDriver::new(adc)?;
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        let channel = AdcChannelDriver::new(adc, pin, &config)?;
        Ok(Self { channel })
    }

    /// Complete the pending conversion, if any. Called from the timer task.
    ///
    /// A failed read is logged and the request dropped; no
    /// [`SensorReady`](crate::Event::SensorReady) is raised for it.
    pub fn poll(&mut self, signals: &Signals) {
        if let Err(e) = signals.service_conversion(|| self.read()) {
            warn!("adc read failed: {:?}", e);
        }
    }

    fn read(&mut self) -> Result<u8, EspError> {
        let raw = self.channel.read()?;
        Ok((raw >> Self::SHIFT).min(u8::MAX as u16) as u8)
    }
}
