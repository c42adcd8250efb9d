//! Recording transport for unit tests.

use super::{PinMode, SpiConfig, Transport, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ConfigurePin(u8, PinMode),
    High(u8),
    Low(u8),
    ConfigureSpi(SpiConfig),
    Write(Vec<u8>),
}

/// One SPI write together with the D/C level it went out under
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Command(Vec<u8>),
    Data(Vec<u8>),
}

#[derive(Debug, Default)]
pub struct MockTransport {
    pub events: Vec<Event>,
    /// Fail the write with this zero-based index
    pub fail_write: Option<usize>,
    writes: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(write: usize) -> Self {
        Self {
            fail_write: Some(write),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<&[u8]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes().len()
    }

    /// Every write tagged with the level `dc` held at that moment
    pub fn frames(&self, dc: u8) -> Vec<Frame> {
        let mut data = false;
        let mut frames = Vec::new();
        for event in &self.events {
            match event {
                Event::High(pin) if *pin == dc => data = true,
                Event::Low(pin) if *pin == dc => data = false,
                Event::Write(bytes) if data => frames.push(Frame::Data(bytes.clone())),
                Event::Write(bytes) => frames.push(Frame::Command(bytes.clone())),
                _ => {}
            }
        }
        frames
    }

    /// Frames with consecutive data writes merged, so each command is
    /// followed by at most one data frame holding all of its parameters.
    pub fn transactions(&self, dc: u8) -> Vec<Frame> {
        let mut merged: Vec<Frame> = Vec::new();
        for frame in self.frames(dc) {
            match (merged.last_mut(), frame) {
                (Some(Frame::Data(prev)), Frame::Data(next)) => prev.extend(next),
                (_, frame) => merged.push(frame),
            }
        }
        merged
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Transport for MockTransport {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), TransportError> {
        self.events.push(Event::ConfigurePin(pin, mode));
        Ok(())
    }

    fn set_pin_high(&mut self, pin: u8) -> Result<(), TransportError> {
        self.events.push(Event::High(pin));
        Ok(())
    }

    fn set_pin_low(&mut self, pin: u8) -> Result<(), TransportError> {
        self.events.push(Event::Low(pin));
        Ok(())
    }

    fn configure_spi(&mut self, config: &SpiConfig) -> Result<(), TransportError> {
        self.events.push(Event::ConfigureSpi(*config));
        Ok(())
    }

    fn spi_write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let index = self.writes;
        self.writes += 1;
        if self.fail_write == Some(index) {
            return Err(TransportError::WriteError("injected failure".to_string()));
        }
        self.events.push(Event::Write(bytes.to_vec()));
        Ok(())
    }
}
