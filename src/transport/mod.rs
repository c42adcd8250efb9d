//! Hardware transport used by the display driver.
//!
//! The driver only needs a handful of capabilities: configure a GPIO pin as
//! an output, drive it high or low, configure the SPI bus and write a block
//! of bytes. [`Transport`] captures exactly that, so the controller logic can
//! run against real hardware ([`RppalTransport`]) or a recording mock.

#[cfg(test)]
pub(crate) mod mock;
pub mod rpi;

pub use rpi::RppalTransport;

use thiserror::Error;

/// SPI clock speed used by the ILI9486 (64 MHz)
pub const DEFAULT_CLOCK_HZ: u32 = 64_000_000;

/// GPIO pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Output,
}

/// SPI clock polarity/phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    Mode0,
    Mode1,
    Mode2,
    Mode3,
}

/// Order in which bits of each byte are shifted out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// SPI bus settings applied by [`Transport::configure_spi`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiConfig {
    pub mode: SpiMode,
    pub bit_order: BitOrder,
    pub clock_hz: u32,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
            clock_hz: DEFAULT_CLOCK_HZ,
        }
    }
}

/// Transport-related errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("GPIO error: {0}")]
    Gpio(#[from] ::rppal::gpio::Error),

    #[error("SPI error: {0}")]
    Spi(#[from] ::rppal::spi::Error),

    #[error("GPIO pin {0} used before being configured")]
    UnconfiguredPin(u8),

    #[error("Unsupported SPI bus {0}")]
    UnsupportedBus(u8),

    #[error("Unsupported SPI slave select {0}")]
    UnsupportedSlaveSelect(u8),

    #[error("SPI write failed: {0}")]
    WriteError(String),
}

/// Capabilities the display driver consumes from the platform.
///
/// All calls are synchronous. Errors are passed straight back to the
/// caller; the driver never retries.
pub trait Transport {
    /// Configure `pin` (BCM numbering) with the given direction
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), TransportError>;

    /// Drive an output pin high
    fn set_pin_high(&mut self, pin: u8) -> Result<(), TransportError>;

    /// Drive an output pin low
    fn set_pin_low(&mut self, pin: u8) -> Result<(), TransportError>;

    /// Apply mode, bit order and clock to the SPI bus
    fn configure_spi(&mut self, config: &SpiConfig) -> Result<(), TransportError>;

    /// Write a block of bytes, blocking until the transfer returns
    fn spi_write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), TransportError> {
        (**self).configure_pin(pin, mode)
    }

    fn set_pin_high(&mut self, pin: u8) -> Result<(), TransportError> {
        (**self).set_pin_high(pin)
    }

    fn set_pin_low(&mut self, pin: u8) -> Result<(), TransportError> {
        (**self).set_pin_low(pin)
    }

    fn configure_spi(&mut self, config: &SpiConfig) -> Result<(), TransportError> {
        (**self).configure_spi(config)
    }

    fn spi_write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).spi_write(bytes)
    }
}
