//! Command/data framing over SPI.
//!
//! Every transfer first drives the D/C pin (LOW = command, HIGH = data) and
//! then writes the payload in chunks, so large pixel blocks never exceed the
//! spidev buffer limit.

use super::ili9486::DisplayError;
use super::registers::Register;
use crate::transport::Transport;

/// Default number of bytes per SPI write
pub const CHUNK_SIZE: usize = 4096;

/// Bytes handed to the framer: a single value or a borrowed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    Byte(u8),
    Bytes(&'a [u8]),
}

impl Payload<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Payload::Byte(b) => std::slice::from_ref(b),
            Payload::Bytes(bytes) => bytes,
        }
    }
}

impl From<u8> for Payload<'_> {
    fn from(byte: u8) -> Self {
        Payload::Byte(byte)
    }
}

/// Only the low 8 bits are sent
impl From<u16> for Payload<'_> {
    fn from(value: u16) -> Self {
        Payload::Byte((value & 0xFF) as u8)
    }
}

impl From<u32> for Payload<'_> {
    fn from(value: u32) -> Self {
        Payload::Byte((value & 0xFF) as u8)
    }
}

impl From<Register> for Payload<'_> {
    fn from(reg: Register) -> Self {
        Payload::Byte(reg.into())
    }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Payload::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Payload<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Payload::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Payload<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}

/// SPI framer owning the transport and the D/C pin
pub struct Framer<T> {
    transport: T,
    dc: u8,
    chunk_size: usize,
    /// Set while the controller treats data bytes as pixels (after 0x2C)
    pixel_mode: bool,
}

impl<T: Transport> Framer<T> {
    pub fn new(transport: T, dc: u8) -> Self {
        Self {
            transport,
            dc,
            chunk_size: CHUNK_SIZE,
            pixel_mode: false,
        }
    }

    /// Use a different default chunk size for [`Framer::send`]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self, DisplayError> {
        if chunk_size == 0 {
            return Err(DisplayError::InvalidChunkSize(chunk_size));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn dc_pin(&self) -> u8 {
        self.dc
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Whether the last command was a memory write
    pub fn in_pixel_mode(&self) -> bool {
        self.pixel_mode
    }

    /// Write `payload` as command (`is_data == false`) or data bytes
    pub fn send<'a>(
        &mut self,
        payload: impl Into<Payload<'a>>,
        is_data: bool,
    ) -> Result<(), DisplayError> {
        self.send_chunked(payload, is_data, self.chunk_size)
    }

    /// Like [`Framer::send`] with an explicit chunk size
    pub fn send_chunked<'a>(
        &mut self,
        payload: impl Into<Payload<'a>>,
        is_data: bool,
        chunk_size: usize,
    ) -> Result<(), DisplayError> {
        if chunk_size == 0 {
            return Err(DisplayError::InvalidChunkSize(chunk_size));
        }
        let payload = payload.into();
        let bytes = payload.as_slice();

        // The D/C level is asserted every call, never assumed from the last one
        if is_data {
            self.transport.set_pin_high(self.dc)?;
        } else {
            self.transport.set_pin_low(self.dc)?;
        }

        for chunk in bytes.chunks(chunk_size) {
            self.transport.spi_write(chunk)?;
        }

        if !is_data {
            self.pixel_mode = bytes.last() == Some(&u8::from(Register::MemoryWrite));
        }
        Ok(())
    }

    /// Send command byte(s)
    pub fn command<'a>(&mut self, payload: impl Into<Payload<'a>>) -> Result<(), DisplayError> {
        self.send(payload, false)
    }

    /// Send data byte(s)
    pub fn data<'a>(&mut self, payload: impl Into<Payload<'a>>) -> Result<(), DisplayError> {
        self.send(payload, true)
    }

    /// Send a command followed by its parameter bytes
    pub fn command_data(&mut self, reg: Register, data: &[u8]) -> Result<(), DisplayError> {
        self.command(reg)?;
        if !data.is_empty() {
            self.data(data)?;
        }
        Ok(())
    }

    /// Stream pixel bytes into the window opened by a memory-write command
    pub fn write_pixels(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        if !self.pixel_mode {
            return Err(DisplayError::PixelTransferNotStarted);
        }
        tracing::debug!(
            "Writing {} pixel bytes in {} chunk(s)",
            bytes.len(),
            bytes.len().div_ceil(self.chunk_size)
        );
        self.data(bytes)
    }
}
