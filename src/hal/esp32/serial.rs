//! UART command console.
//!
//! The transmit half is the [`StatusSink`] for greetings and reports. The
//! receive half runs on its own thread and plays the role of the
//! byte-received interrupt: every byte lands in [`Signals::serial_received`].

use crate::signals::Signals;
use crate::traits::StatusSink;
use esp_idf_hal::delay::BLOCK;
use esp_idf_hal::sys::EspError;
use esp_idf_hal::uart::{UartRxDriver, UartTxDriver};
use std::thread;

/// Stack size for the receive thread.
const RX_STACK_SIZE: usize = 3072;

/// Transmit half of the console UART.
pub struct Esp32StatusTx<'d> {
    tx: UartTxDriver<'d>,
}

impl<'d> Esp32StatusTx<'d> {
    /// Wraps a UART transmit driver.
    pub fn new(tx: UartTxDriver<'d>) -> Self {
        Self { tx }
    }
}

impl StatusSink for Esp32StatusTx<'_> {
    type Error = EspError;

    fn write_bytes(&mut self, mut bytes: &[u8]) -> Result<(), EspError> {
        while !bytes.is_empty() {
            let written = self.tx.write(bytes)?;
            bytes = &bytes[written..];
        }
        Ok(())
    }
}

/// Spawn the thread that feeds received bytes into `signals`.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_serial_rx(
    rx: UartRxDriver<'static>,
    signals: &'static Signals,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("serial-rx".into())
        .stack_size(RX_STACK_SIZE)
        .spawn(move || {
            let mut buf = [0u8; 1];
            loop {
                match rx.read(&mut buf, BLOCK) {
                    Ok(1) => signals.serial_received(buf[0]),
                    Ok(_) => {}
                    Err(e) => log::warn!("uart read failed: {:?}", e),
                }
            }
        })
}
