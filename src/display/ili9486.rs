//! ILI9486 3.5" TFT LCD driver (SPI, 18-bit color).
//!
//! Resolution: 320 x 480 pixels, driven in 6-6-6 mode (one masked byte per
//! channel). The panel has no busy line; all settle times are fixed delays.
//!
//! Typical use:
//!
//! ```rust,ignore
//! let transport = RppalTransport::open(0, 0)?;
//! let mut lcd = Ili9486::with_defaults(transport, 24, Some(25))?;
//! lcd.begin()?;
//! lcd.clear(Color565::BLUE.to_rgb())?;
//! lcd.display(None, None)?;
//! ```

use super::registers::{
    DIGITAL_GAMMA_LEN, GAMMA_LEN, NEGATIVE_GAMMA, Orientation, PIXEL_FORMAT_18BPP, POSITIVE_GAMMA,
    Register, TFT_HEIGHT, TFT_WIDTH,
};
use super::spi::{CHUNK_SIZE, Framer, Payload};
use crate::canvas::Canvas;
use crate::color::Color565;
use crate::config::DisplayConfig;
use crate::image_proc::image_to_wire_bytes;
use crate::transport::{PinMode, SpiConfig, Transport, TransportError};
use image::{Rgb, RgbImage};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Reset pulse timing: high, low, then settle
const RESET_HIGH: Duration = Duration::from_millis(5);
const RESET_LOW: Duration = Duration::from_millis(20);
const RESET_SETTLE: Duration = Duration::from_millis(150);

/// Voltage rails need this long after sleep-out
const SLEEP_OUT_DELAY: Duration = Duration::from_millis(20);
const SLEEP_IN_DELAY: Duration = Duration::from_millis(5);

/// Display driver errors
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid gamma table for {register}: expected {expected} values, got {actual}")]
    InvalidGammaLength {
        register: Register,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown orientation value: {0}")]
    UnknownOrientation(u8),

    #[error("An image was given without a target rectangle")]
    MissingRect,

    #[error("Invalid chunk size: {0}")]
    InvalidChunkSize(usize),

    #[error("Window {window:?} outside the {width}x{height} display")]
    InvalidWindow {
        window: Window,
        width: u16,
        height: u16,
    },

    #[error("Pixel data sent without a preceding memory write command")]
    PixelTransferNotStarted,

    #[error("Display not initialized")]
    NotInitialized,
}

impl DisplayError {
    /// Errors caused by bad arguments or configuration rather than the bus
    pub fn is_configuration(&self) -> bool {
        !matches!(self, DisplayError::Transport(_))
    }
}

impl Orientation {
    /// Orientation for a numeric origin code (0 = upper left .. 3 = lower right)
    pub fn from_origin(code: u8) -> Result<Self, DisplayError> {
        Self::try_from(code).map_err(DisplayError::UnknownOrientation)
    }
}

/// Inclusive pixel rectangle in device coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Window {
    pub const fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Columns covered, 0 for an inverted window
    pub const fn width(&self) -> u32 {
        span(self.x0, self.x1)
    }

    /// Rows covered, 0 for an inverted window
    pub const fn height(&self) -> u32 {
        span(self.y0, self.y1)
    }

    fn fits(&self, width: u16, height: u16) -> bool {
        self.x0 <= self.x1 && self.x1 < width && self.y0 <= self.y1 && self.y1 < height
    }
}

const fn span(start: u16, end: u16) -> u32 {
    if end < start {
        0
    } else {
        (end - start) as u32 + 1
    }
}

impl From<(u16, u16, u16, u16)> for Window {
    fn from((x0, y0, x1, y1): (u16, u16, u16, u16)) -> Self {
        Self::new(x0, y0, x1, y1)
    }
}

/// ILI9486 display driver
pub struct Ili9486<T> {
    framer: Framer<T>,
    rst: Option<u8>,
    orientation: Orientation,
    /// Size passed at construction, before any orientation swap
    nominal: (u16, u16),
    width: u16,
    height: u16,
    buffer: Option<RgbImage>,
}

impl<T: Transport> Ili9486<T> {
    /// Create a driver and configure its pins and SPI bus.
    ///
    /// `width`/`height` are the nominal portrait size; [`Ili9486::begin`]
    /// swaps them when the orientation drives the panel in landscape.
    pub fn new(
        transport: T,
        dc: u8,
        rst: Option<u8>,
        orientation: Orientation,
        width: u16,
        height: u16,
    ) -> Result<Self, DisplayError> {
        Self::with_spi_config(
            transport,
            dc,
            rst,
            orientation,
            width,
            height,
            &SpiConfig::default(),
            CHUNK_SIZE,
        )
    }

    /// Upper-left origin on a 320x480 panel
    pub fn with_defaults(transport: T, dc: u8, rst: Option<u8>) -> Result<Self, DisplayError> {
        Self::new(
            transport,
            dc,
            rst,
            Orientation::default(),
            TFT_WIDTH,
            TFT_HEIGHT,
        )
    }

    /// Create a driver from a loaded [`DisplayConfig`]
    pub fn from_config(transport: T, config: &DisplayConfig) -> Result<Self, DisplayError> {
        let spi = SpiConfig {
            clock_hz: config.spi.clock_hz,
            ..SpiConfig::default()
        };
        Self::with_spi_config(
            transport,
            config.dc_pin,
            config.rst_pin,
            config.orientation,
            config.width,
            config.height,
            &spi,
            config.chunk_size,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn with_spi_config(
        mut transport: T,
        dc: u8,
        rst: Option<u8>,
        orientation: Orientation,
        width: u16,
        height: u16,
        spi: &SpiConfig,
        chunk_size: usize,
    ) -> Result<Self, DisplayError> {
        if chunk_size == 0 {
            return Err(DisplayError::InvalidChunkSize(chunk_size));
        }
        tracing::debug!(
            "Creating ILI9486 driver: DC={}, RST={:?}, {:?}, {}x{}",
            dc,
            rst,
            orientation,
            width,
            height
        );

        transport.configure_pin(dc, PinMode::Output)?;
        if let Some(rst) = rst {
            transport.configure_pin(rst, PinMode::Output)?;
        }
        transport.configure_spi(spi)?;

        Ok(Self {
            framer: Framer::new(transport, dc).with_chunk_size(chunk_size)?,
            rst,
            orientation,
            nominal: (width, height),
            width,
            height,
            buffer: None,
        })
    }

    /// Reset and program the controller, then allocate the frame buffer
    pub fn begin(&mut self) -> Result<(), DisplayError> {
        tracing::info!(
            "Initializing ILI9486 display ({}x{}, {:?})",
            self.width,
            self.height,
            self.orientation
        );
        self.reset()?;
        self.init()?;
        tracing::info!("Display initialized ({}x{})", self.width, self.height);
        Ok(())
    }

    /// Pulse the reset line, if one is wired
    pub fn reset(&mut self) -> Result<(), DisplayError> {
        let Some(rst) = self.rst else {
            tracing::debug!("No reset pin, relying on power-on state");
            return Ok(());
        };
        tracing::debug!("Performing hardware reset");

        let transport = self.framer.transport_mut();
        transport.set_pin_high(rst)?;
        thread::sleep(RESET_HIGH);

        transport.set_pin_low(rst)?;
        thread::sleep(RESET_LOW);

        transport.set_pin_high(rst)?;
        thread::sleep(RESET_SETTLE);
        Ok(())
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.software_reset()?;

        // Interface mode: SPI, default polarities
        self.framer.command_data(Register::InterfaceMode, &[0x00])?;

        self.framer.command(Register::SleepOut)?;
        thread::sleep(SLEEP_OUT_DELAY);

        self.framer
            .command_data(Register::PixelFormat, &[PIXEL_FORMAT_18BPP])?;

        self.framer.command_data(Register::PowerControl3, &[0x44])?;

        self.framer
            .command_data(Register::VcomControl1, &[0x00, 0x00, 0x00, 0x00])?;

        // This panel shows negative colors without inversion
        self.framer.command(Register::InversionOn)?;

        self.set_pos_gamma(&POSITIVE_GAMMA)?;
        self.set_neg_gamma(&NEGATIVE_GAMMA)?;

        let access = self.orientation.memory_access();
        self.framer
            .command_data(Register::MemoryAccessControl, &[access.madctl])?;
        let (width, height) = self.nominal;
        (self.width, self.height) = self.orientation.device_size(width, height);
        tracing::debug!(
            "MADCTL=0x{:02X}, device size {}x{}",
            access.madctl,
            self.width,
            self.height
        );

        self.buffer = Some(RgbImage::new(self.width.into(), self.height.into()));

        self.framer.command(Register::SleepOut)?;
        self.framer.command(Register::DisplayOn)?;
        Ok(())
    }

    /// Issue the software reset command
    pub fn software_reset(&mut self) -> Result<(), DisplayError> {
        self.framer.command(Register::SoftwareReset)
    }

    /// Program the positive gamma curve (15 values)
    pub fn set_pos_gamma(&mut self, values: &[u8]) -> Result<(), DisplayError> {
        self.write_gamma(Register::PositiveGamma, GAMMA_LEN, values)
    }

    /// Program the negative gamma curve (15 values)
    pub fn set_neg_gamma(&mut self, values: &[u8]) -> Result<(), DisplayError> {
        self.write_gamma(Register::NegativeGamma, GAMMA_LEN, values)
    }

    /// Program the digital gamma table (16 values)
    pub fn set_dig_gamma(&mut self, values: &[u8]) -> Result<(), DisplayError> {
        self.write_gamma(Register::DigitalGamma, DIGITAL_GAMMA_LEN, values)
    }

    fn write_gamma(
        &mut self,
        register: Register,
        expected: usize,
        values: &[u8],
    ) -> Result<(), DisplayError> {
        if values.len() != expected {
            return Err(DisplayError::InvalidGammaLength {
                register,
                expected,
                actual: values.len(),
            });
        }
        self.framer.command(register)?;
        for &v in values {
            self.framer.data(v)?;
        }
        Ok(())
    }

    /// Address a pixel window and enter memory-write mode.
    ///
    /// `x1`/`y1` default to the last column/row.
    pub fn set_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: Option<u16>,
        y1: Option<u16>,
    ) -> Result<(), DisplayError> {
        let window = Window::new(
            x0,
            y0,
            x1.unwrap_or(self.width.saturating_sub(1)),
            y1.unwrap_or(self.height.saturating_sub(1)),
        );
        self.address(window)
    }

    /// Address the whole panel
    pub fn set_full_window(&mut self) -> Result<(), DisplayError> {
        self.set_window(0, 0, None, None)
    }

    fn address(&mut self, window: Window) -> Result<(), DisplayError> {
        if !window.fits(self.width, self.height) {
            return Err(DisplayError::InvalidWindow {
                window,
                width: self.width,
                height: self.height,
            });
        }
        tracing::debug!(
            "set_window: x {}-{}, y {}-{}",
            window.x0,
            window.x1,
            window.y0,
            window.y1
        );

        let [x0h, x0l] = window.x0.to_be_bytes();
        let [x1h, x1l] = window.x1.to_be_bytes();
        self.framer
            .command_data(Register::ColumnAddressSet, &[x0h, x0l, x1h, x1l])?;

        let [y0h, y0l] = window.y0.to_be_bytes();
        let [y1h, y1l] = window.y1.to_be_bytes();
        self.framer
            .command_data(Register::PageAddressSet, &[y0h, y0l, y1h, y1l])?;

        self.begin_pixel_transfer()
    }

    /// Send memory-write; data bytes are pixels until the next command
    pub fn begin_pixel_transfer(&mut self) -> Result<(), DisplayError> {
        self.framer.command(Register::MemoryWrite)
    }

    /// Stream already encoded pixel bytes into the current window
    pub fn write_pixels(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.framer.write_pixels(bytes)
    }

    /// Push the frame buffer, or `image` into `rect`, to the panel.
    ///
    /// The image size is not checked against `rect`; a mismatch shears the
    /// picture on screen.
    pub fn display(
        &mut self,
        image: Option<&RgbImage>,
        rect: Option<Window>,
    ) -> Result<(), DisplayError> {
        match image {
            None => {
                let buffer = self.buffer.as_ref().ok_or(DisplayError::NotInitialized)?;
                let bytes = image_to_wire_bytes(buffer);
                self.set_full_window()?;
                tracing::debug!("Sending frame buffer ({} bytes)", bytes.len());
                self.write_pixels(&bytes)
            }
            Some(image) => {
                let rect = rect.ok_or(DisplayError::MissingRect)?;
                self.address(rect)?;
                if image.dimensions() != (rect.width(), rect.height()) {
                    tracing::warn!(
                        "Image is {}x{} but window is {}x{}",
                        image.width(),
                        image.height(),
                        rect.width(),
                        rect.height()
                    );
                }
                let bytes = image_to_wire_bytes(image);
                tracing::debug!("Sending image ({} bytes)", bytes.len());
                self.write_pixels(&bytes)
            }
        }
    }

    /// Fill the frame buffer with one color (no hardware access)
    pub fn clear(&mut self, color: Rgb<u8>) -> Result<(), DisplayError> {
        let buffer = self.buffer.as_mut().ok_or(DisplayError::NotInitialized)?;
        for pixel in buffer.pixels_mut() {
            *pixel = color;
        }
        Ok(())
    }

    /// Draw horizontal stripes of the basic palette and show them
    pub fn test_pattern(&mut self) -> Result<(), DisplayError> {
        tracing::info!("Displaying test pattern");

        let buffer = self.buffer.as_mut().ok_or(DisplayError::NotInitialized)?;
        let stripes = Color565::PALETTE.len() as u32;
        let stripe_height = (buffer.height() / stripes).max(1);

        for (_, y, pixel) in buffer.enumerate_pixels_mut() {
            let index = ((y / stripe_height) as usize).min(Color565::PALETTE.len() - 1);
            *pixel = Color565::PALETTE[index].to_rgb();
        }

        self.display(None, None)
    }

    /// Enter sleep mode
    pub fn sleep(&mut self) -> Result<(), DisplayError> {
        tracing::info!("Putting display to sleep");
        self.framer.command(Register::SleepIn)?;
        thread::sleep(SLEEP_IN_DELAY);
        Ok(())
    }

    /// Leave sleep mode
    pub fn wake(&mut self) -> Result<(), DisplayError> {
        tracing::info!("Waking display");
        self.framer.command(Register::SleepOut)?;
        thread::sleep(SLEEP_OUT_DELAY);
        Ok(())
    }

    pub fn set_inversion(&mut self, on: bool) -> Result<(), DisplayError> {
        self.framer.command(if on {
            Register::InversionOn
        } else {
            Register::InversionOff
        })
    }

    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        self.framer.command(if on {
            Register::DisplayOn
        } else {
            Register::DisplayOff
        })
    }

    /// Raw command byte(s)
    pub fn command<'a>(&mut self, payload: impl Into<Payload<'a>>) -> Result<(), DisplayError> {
        self.framer.command(payload)
    }

    /// Raw data byte(s)
    pub fn data<'a>(&mut self, payload: impl Into<Payload<'a>>) -> Result<(), DisplayError> {
        self.framer.data(payload)
    }

    /// Drawing surface over the frame buffer
    pub fn canvas(&mut self) -> Result<Canvas<'_>, DisplayError> {
        self.buffer
            .as_mut()
            .map(Canvas::new)
            .ok_or(DisplayError::NotInitialized)
    }

    pub fn buffer(&self) -> Option<&RgbImage> {
        self.buffer.as_ref()
    }

    pub fn buffer_mut(&mut self) -> Option<&mut RgbImage> {
        self.buffer.as_mut()
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_initialized(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn transport(&self) -> &T {
        self.framer.transport()
    }

    /// Give the transport back, dropping the frame buffer
    pub fn release(self) -> T {
        self.framer.into_transport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{Event, Frame, MockTransport};
    use embedded_graphics::pixelcolor::Rgb888;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use std::time::Instant;

    const DC: u8 = 24;
    const RST: u8 = 25;

    fn display(orientation: Orientation) -> Ili9486<MockTransport> {
        Ili9486::new(MockTransport::new(), DC, Some(RST), orientation, 320, 480).unwrap()
    }

    fn ready(orientation: Orientation) -> Ili9486<MockTransport> {
        let mut lcd = Ili9486::new(MockTransport::new(), DC, None, orientation, 320, 480).unwrap();
        lcd.begin().unwrap();
        lcd.framer.transport_mut().clear();
        lcd
    }

    fn cmd(reg: Register) -> Frame {
        Frame::Command(vec![reg as u8])
    }

    fn data(bytes: &[u8]) -> Frame {
        Frame::Data(bytes.to_vec())
    }

    #[test]
    fn construction_configures_pins_and_spi() {
        let lcd = display(Orientation::UpperLeft);
        assert_eq!(
            lcd.transport().events,
            vec![
                Event::ConfigurePin(DC, PinMode::Output),
                Event::ConfigurePin(RST, PinMode::Output),
                Event::ConfigureSpi(SpiConfig::default()),
            ]
        );
        assert!(!lcd.is_initialized());
    }

    #[test]
    fn reset_pulses_pin_with_full_delays() {
        let mut lcd = display(Orientation::UpperLeft);
        let start = Instant::now();
        lcd.reset().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(175));
        assert_eq!(
            lcd.transport().events[3..],
            [Event::High(RST), Event::Low(RST), Event::High(RST)]
        );
    }

    #[test]
    fn reset_without_pin_is_a_noop() {
        let mut lcd = Ili9486::with_defaults(MockTransport::new(), DC, None).unwrap();
        lcd.reset().unwrap();
        assert_eq!(lcd.transport().events.len(), 2);
    }

    #[test]
    fn begin_sends_init_sequence_in_order() {
        let mut lcd = display(Orientation::UpperLeft);
        lcd.begin().unwrap();

        let mut expected = vec![
            cmd(Register::SoftwareReset),
            cmd(Register::InterfaceMode),
            data(&[0x00]),
            cmd(Register::SleepOut),
            cmd(Register::PixelFormat),
            data(&[0x66]),
            cmd(Register::PowerControl3),
            data(&[0x44]),
            cmd(Register::VcomControl1),
            data(&[0, 0, 0, 0]),
            cmd(Register::InversionOn),
            cmd(Register::PositiveGamma),
            data(&POSITIVE_GAMMA),
            cmd(Register::NegativeGamma),
            data(&NEGATIVE_GAMMA),
            cmd(Register::MemoryAccessControl),
            data(&[0b0010_1000]),
        ];
        expected.extend([cmd(Register::SleepOut), cmd(Register::DisplayOn)]);

        assert_eq!(lcd.transport().transactions(DC), expected);
    }

    #[test]
    fn begin_pulses_reset_before_first_command() {
        let mut lcd = display(Orientation::UpperLeft);
        let start = Instant::now();
        lcd.begin().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(175 + 20));

        let events = &lcd.transport().events;
        assert_eq!(
            events[3..6],
            [Event::High(RST), Event::Low(RST), Event::High(RST)]
        );
        let first_write = events
            .iter()
            .position(|e| matches!(e, Event::Write(_)))
            .unwrap();
        assert_eq!(first_write, 7);
        assert_eq!(events[first_write], Event::Write(vec![0x01]));
    }

    #[test]
    fn begin_waits_after_sleep_out_without_reset_pin() {
        let mut lcd = Ili9486::with_defaults(MockTransport::new(), DC, None).unwrap();
        let start = Instant::now();
        lcd.begin().unwrap();
        assert!(start.elapsed() >= SLEEP_OUT_DELAY);
        assert!(!lcd.transport().events.contains(&Event::High(RST)));
    }

    #[test]
    fn inverted_window_has_no_extent() {
        let window = Window::new(5, 7, 3, 2);
        assert_eq!((window.width(), window.height()), (0, 0));
        assert_eq!(Window::new(3, 2, 3, 2).width(), 1);
        assert_eq!(Window::new(0, 0, 479, 319).height(), 320);
    }

    #[test]
    fn orientation_selects_madctl_and_swaps_axes() {
        for orientation in Orientation::ALL {
            let lcd = ready_with_log(orientation);
            let frames = lcd.transport().transactions(DC);
            let pos = frames
                .iter()
                .position(|f| *f == cmd(Register::MemoryAccessControl))
                .unwrap();
            let access = orientation.memory_access();
            assert_eq!(frames[pos + 1], data(&[access.madctl]));

            let swapped = matches!(
                orientation,
                Orientation::UpperLeft | Orientation::LowerRight
            );
            let expected = if swapped { (480, 320) } else { (320, 480) };
            assert_eq!((lcd.width(), lcd.height()), expected, "{:?}", orientation);
            let buffer = lcd.buffer().unwrap();
            assert_eq!(buffer.dimensions(), (expected.0 as u32, expected.1 as u32));
        }
    }

    fn ready_with_log(orientation: Orientation) -> Ili9486<MockTransport> {
        let mut lcd = display(orientation);
        lcd.begin().unwrap();
        lcd
    }

    #[test]
    fn unknown_origin_code_is_a_configuration_error() {
        assert_eq!(Orientation::from_origin(1).unwrap(), Orientation::UpperRight);
        let err = Orientation::from_origin(9).unwrap_err();
        assert!(matches!(err, DisplayError::UnknownOrientation(9)));
        assert!(err.is_configuration());
    }

    #[test]
    fn second_begin_does_not_swap_back() {
        let mut lcd = ready(Orientation::LowerRight);
        lcd.begin().unwrap();
        assert_eq!((lcd.width(), lcd.height()), (480, 320));
    }

    #[test]
    fn upper_left_example_panel() {
        let lcd = ready_with_log(Orientation::UpperLeft);
        assert_eq!(lcd.width(), 480);
        assert_eq!(lcd.height(), 320);
        assert_eq!(lcd.buffer().unwrap().dimensions(), (480, 320));
    }

    #[test]
    fn set_window_emits_big_endian_bounds() {
        let mut lcd = ready(Orientation::UpperLeft);
        lcd.set_window(1, 2, Some(300), Some(319)).unwrap();
        assert_eq!(
            lcd.transport().transactions(DC),
            vec![
                cmd(Register::ColumnAddressSet),
                data(&[0x00, 0x01, 0x01, 0x2C]),
                cmd(Register::PageAddressSet),
                data(&[0x00, 0x02, 0x01, 0x3F]),
                cmd(Register::MemoryWrite),
            ]
        );
        assert!(lcd.framer.in_pixel_mode());
    }

    #[test]
    fn set_window_defaults_to_full_panel() {
        let mut lcd = ready(Orientation::UpperRight);
        lcd.set_window(0, 0, None, None).unwrap();
        let frames = lcd.transport().transactions(DC);
        assert_eq!(frames[1], data(&[0x00, 0x00, 0x01, 0x3F]));
        assert_eq!(frames[3], data(&[0x00, 0x00, 0x01, 0xDF]));
    }

    #[test]
    fn out_of_bounds_window_is_rejected() {
        let mut lcd = ready(Orientation::UpperLeft);
        let err = lcd.set_window(10, 0, Some(480), None).unwrap_err();
        assert!(matches!(err, DisplayError::InvalidWindow { .. }));
        let err = lcd.set_window(10, 0, Some(5), None).unwrap_err();
        assert!(err.is_configuration());
        assert!(lcd.transport().events.is_empty());
    }

    #[test]
    fn gamma_setters_reject_wrong_lengths_without_io() {
        let mut lcd = ready(Orientation::UpperLeft);
        for len in [0, 14, 16, 30] {
            assert!(matches!(
                lcd.set_pos_gamma(&vec![0; len]),
                Err(DisplayError::InvalidGammaLength { expected: 15, .. })
            ));
            assert!(lcd.set_neg_gamma(&vec![0; len]).is_err());
        }
        for len in [0, 15, 17] {
            assert!(matches!(
                lcd.set_dig_gamma(&vec![0; len]),
                Err(DisplayError::InvalidGammaLength { expected: 16, .. })
            ));
        }
        assert!(lcd.transport().events.is_empty());
    }

    #[test]
    fn gamma_values_go_out_one_byte_at_a_time() {
        let mut lcd = ready(Orientation::UpperLeft);
        let table: Vec<u8> = (0..16).collect();
        lcd.set_dig_gamma(&table).unwrap();

        let frames = lcd.transport().frames(DC);
        assert_eq!(frames[0], cmd(Register::DigitalGamma));
        assert_eq!(frames.len(), 17);
        for (i, frame) in frames[1..].iter().enumerate() {
            assert_eq!(*frame, data(&[i as u8]));
        }
    }

    #[test]
    fn clear_fills_buffer_without_hardware_calls() {
        let mut lcd = ready(Orientation::UpperLeft);
        lcd.clear(Rgb([255, 0, 0])).unwrap();
        let buffer = lcd.buffer().unwrap();
        assert!(buffer.pixels().all(|p| *p == Rgb([255, 0, 0])));
        assert!(lcd.transport().events.is_empty());
    }

    #[test]
    fn clear_before_begin_fails() {
        let mut lcd = display(Orientation::UpperLeft);
        assert!(matches!(
            lcd.clear(Rgb([0, 0, 0])),
            Err(DisplayError::NotInitialized)
        ));
    }

    #[test]
    fn display_pushes_full_buffer() {
        let mut lcd = ready(Orientation::UpperLeft);
        lcd.clear(Rgb([0xFF, 0x81, 0x03])).unwrap();
        lcd.display(None, None).unwrap();

        let frames = lcd.transport().transactions(DC);
        assert_eq!(frames[4], cmd(Register::MemoryWrite));
        let Frame::Data(pixels) = &frames[5] else {
            panic!("expected pixel data");
        };
        assert_eq!(pixels.len(), 3 * 480 * 320);
        assert!(pixels.chunks(3).all(|p| p == [0xFC, 0x80, 0x00]));

        let writes = lcd.transport().writes();
        assert!(writes.iter().all(|w| w.len() <= 4096));
    }

    #[test]
    fn display_image_requires_rect() {
        let mut lcd = ready(Orientation::UpperLeft);
        let image = RgbImage::new(4, 4);
        let err = lcd.display(Some(&image), None).unwrap_err();
        assert!(matches!(err, DisplayError::MissingRect));
        assert!(err.is_configuration());
        assert!(lcd.transport().events.is_empty());
    }

    #[test]
    fn display_image_addresses_rect() {
        let mut lcd = ready(Orientation::UpperLeft);
        let image = RgbImage::from_pixel(2, 3, Rgb([1, 2, 0xFF]));
        let rect = Window::new(10, 20, 11, 22);
        lcd.display(Some(&image), Some(rect)).unwrap();

        assert_eq!(
            lcd.transport().transactions(DC),
            vec![
                cmd(Register::ColumnAddressSet),
                data(&[0, 10, 0, 11]),
                cmd(Register::PageAddressSet),
                data(&[0, 20, 0, 22]),
                cmd(Register::MemoryWrite),
                data(&[0x00, 0x00, 0xFC].repeat(6)),
            ]
        );
    }

    #[test]
    fn mismatched_image_is_sent_unchanged() {
        let mut lcd = ready(Orientation::UpperLeft);
        let image = RgbImage::new(5, 5);
        let rect = Window::new(0, 0, 1, 1);
        lcd.display(Some(&image), Some(rect)).unwrap();
        let frames = lcd.transport().transactions(DC);
        assert_eq!(frames.last(), Some(&Frame::Data(vec![0; 75])));
    }

    #[test]
    fn display_before_begin_fails() {
        let mut lcd = display(Orientation::UpperLeft);
        assert!(matches!(
            lcd.display(None, None),
            Err(DisplayError::NotInitialized)
        ));
    }

    #[test]
    fn pixel_data_needs_memory_write() {
        let mut lcd = ready(Orientation::UpperLeft);
        assert!(matches!(
            lcd.write_pixels(&[0; 3]),
            Err(DisplayError::PixelTransferNotStarted)
        ));
        lcd.set_window(0, 0, Some(0), Some(0)).unwrap();
        lcd.write_pixels(&[0; 3]).unwrap();
        lcd.set_inversion(false).unwrap();
        assert!(lcd.write_pixels(&[0; 3]).is_err());
    }

    #[test]
    fn transport_failure_aborts_begin() {
        let mut lcd = Ili9486::new(
            MockTransport::failing_at(3),
            DC,
            None,
            Orientation::UpperLeft,
            320,
            480,
        )
        .unwrap();
        let err = lcd.begin().unwrap_err();
        assert!(matches!(err, DisplayError::Transport(_)));
        assert!(!err.is_configuration());
        assert!(!lcd.is_initialized());
        assert_eq!(lcd.transport().write_count(), 3);
    }

    #[test]
    fn canvas_draws_into_buffer() {
        let mut lcd = ready(Orientation::UpperLeft);
        Rectangle::new(Point::new(2, 3), Size::new(4, 5))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::GREEN))
            .draw(&mut lcd.canvas().unwrap())
            .unwrap();

        let buffer = lcd.buffer().unwrap();
        assert_eq!(*buffer.get_pixel(2, 3), Rgb([0, 255, 0]));
        assert_eq!(*buffer.get_pixel(5, 7), Rgb([0, 255, 0]));
        assert_eq!(*buffer.get_pixel(6, 7), Rgb([0, 0, 0]));
        assert!(lcd.transport().events.is_empty());
    }

    #[test]
    fn test_pattern_paints_stripes() {
        let mut lcd = ready(Orientation::LowerLeft);
        lcd.test_pattern().unwrap();
        let buffer = lcd.buffer().unwrap();
        assert_eq!(*buffer.get_pixel(0, 0), Color565::PALETTE[0].to_rgb());
        assert_eq!(*buffer.get_pixel(0, 479), Color565::PALETTE[7].to_rgb());
        assert!(lcd.transport().write_count() > 0);
    }

    #[test]
    fn sleep_and_wake_send_commands() {
        let mut lcd = ready(Orientation::UpperLeft);
        lcd.sleep().unwrap();
        lcd.wake().unwrap();
        lcd.set_display_on(false).unwrap();
        assert_eq!(
            lcd.transport().frames(DC),
            vec![
                cmd(Register::SleepIn),
                cmd(Register::SleepOut),
                cmd(Register::DisplayOff),
            ]
        );
    }

    #[test]
    fn from_config_uses_pins_and_chunk_size() {
        let config = DisplayConfig {
            dc_pin: 22,
            rst_pin: None,
            orientation: Orientation::UpperRight,
            chunk_size: 100,
            ..DisplayConfig::default()
        };
        let mut lcd = Ili9486::from_config(MockTransport::new(), &config).unwrap();
        lcd.begin().unwrap();
        lcd.display(None, None).unwrap();

        let first = &lcd.transport().events[0];
        assert_eq!(*first, Event::ConfigurePin(22, PinMode::Output));
        assert!(lcd.transport().writes().iter().all(|w| w.len() <= 100));
        assert_eq!((lcd.width(), lcd.height()), (320, 480));
    }
}
