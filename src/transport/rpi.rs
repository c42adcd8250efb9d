//! Raspberry Pi transport backed by `rppal`.
//!
//! SPI goes through the kernel spidev driver (`/dev/spidevB.S`); GPIO pins
//! use BCM numbering and are claimed the first time they are configured.

use super::{BitOrder, PinMode, SpiConfig, SpiMode, Transport, TransportError};
use rppal::gpio::{Gpio, OutputPin};
use rppal::spi::{self, Bus, SlaveSelect, Spi};
use std::collections::HashMap;

/// Transport for a display wired to the Raspberry Pi header
pub struct RppalTransport {
    gpio: Gpio,
    spi: Spi,
    pins: HashMap<u8, OutputPin>,
}

impl RppalTransport {
    /// Open SPI bus `bus` with chip enable `slave_select` and the GPIO chip.
    ///
    /// The bus starts at the driver's default settings (mode 0, 64 MHz);
    /// [`Transport::configure_spi`] may change them afterwards.
    pub fn open(bus: u8, slave_select: u8) -> Result<Self, TransportError> {
        let spi_bus = bus_from_index(bus)?;
        let ss = slave_select_from_index(slave_select)?;
        let defaults = SpiConfig::default();

        let spi = Spi::new(spi_bus, ss, defaults.clock_hz, spi_mode(defaults.mode))?;
        let gpio = Gpio::new()?;

        tracing::debug!(
            "SPI initialized: Bus=SPI{}, SS=CE{}, Speed={}Hz, Mode=0",
            bus,
            slave_select,
            defaults.clock_hz
        );

        Ok(Self {
            gpio,
            spi,
            pins: HashMap::new(),
        })
    }

    fn pin(&mut self, pin: u8) -> Result<&mut OutputPin, TransportError> {
        self.pins
            .get_mut(&pin)
            .ok_or(TransportError::UnconfiguredPin(pin))
    }
}

impl Transport for RppalTransport {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), TransportError> {
        match mode {
            PinMode::Output => {
                let output = self.gpio.get(pin)?.into_output();
                self.pins.insert(pin, output);
            }
        }
        tracing::debug!("GPIO {} configured as {:?}", pin, mode);
        Ok(())
    }

    #[inline]
    fn set_pin_high(&mut self, pin: u8) -> Result<(), TransportError> {
        self.pin(pin)?.set_high();
        Ok(())
    }

    #[inline]
    fn set_pin_low(&mut self, pin: u8) -> Result<(), TransportError> {
        self.pin(pin)?.set_low();
        Ok(())
    }

    fn configure_spi(&mut self, config: &SpiConfig) -> Result<(), TransportError> {
        self.spi.set_mode(spi_mode(config.mode))?;
        self.spi.set_bit_order(match config.bit_order {
            BitOrder::MsbFirst => spi::BitOrder::MsbFirst,
            BitOrder::LsbFirst => spi::BitOrder::LsbFirst,
        })?;
        self.spi.set_clock_speed(config.clock_hz)?;

        tracing::debug!(
            "SPI configured: {:?}, {:?}, {}Hz",
            config.mode,
            config.bit_order,
            config.clock_hz
        );
        Ok(())
    }

    fn spi_write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let written = self.spi.write(bytes)?;
        if written != bytes.len() {
            return Err(TransportError::WriteError(format!(
                "short write: {} of {} bytes",
                written,
                bytes.len()
            )));
        }
        Ok(())
    }
}

fn spi_mode(mode: SpiMode) -> spi::Mode {
    match mode {
        SpiMode::Mode0 => spi::Mode::Mode0,
        SpiMode::Mode1 => spi::Mode::Mode1,
        SpiMode::Mode2 => spi::Mode::Mode2,
        SpiMode::Mode3 => spi::Mode::Mode3,
    }
}

fn bus_from_index(bus: u8) -> Result<Bus, TransportError> {
    Ok(match bus {
        0 => Bus::Spi0,
        1 => Bus::Spi1,
        2 => Bus::Spi2,
        3 => Bus::Spi3,
        4 => Bus::Spi4,
        5 => Bus::Spi5,
        6 => Bus::Spi6,
        other => return Err(TransportError::UnsupportedBus(other)),
    })
}

fn slave_select_from_index(ss: u8) -> Result<SlaveSelect, TransportError> {
    Ok(match ss {
        0 => SlaveSelect::Ss0,
        1 => SlaveSelect::Ss1,
        2 => SlaveSelect::Ss2,
        other => return Err(TransportError::UnsupportedSlaveSelect(other)),
    })
}
