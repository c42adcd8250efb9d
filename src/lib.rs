//! ILI9486 TFT LCD driver for Raspberry Pi
//!
//! Drives a 320x480 ILI9486 panel over SPI with a GPIO data/command line and
//! an optional reset line, e.g. the common 3.5" Raspberry Pi LCD shields.
//!
//! ## Architecture
//!
//! - **Transport** ([`transport`]) - GPIO and SPI capabilities; [`RppalTransport`]
//!   talks to the Pi, anything else implementing [`Transport`] works too
//! - **Framer** ([`display::spi`]) - drives D/C and writes bytes in bounded chunks
//! - **Controller** ([`Ili9486`]) - reset, register init, orientation, windows
//! - **Codec** ([`image_proc::codec`]) - RGB image to 18 bpp wire bytes
//! - **Canvas** ([`Canvas`]) - `embedded-graphics` target over the frame buffer
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ili9486_rpi::prelude::*;
//! use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::*};
//!
//! let transport = RppalTransport::open(0, 0)?;
//! let mut lcd = Ili9486::new(transport, 24, Some(25), Orientation::UpperLeft, 320, 480)?;
//! lcd.begin()?;
//!
//! lcd.clear(Color565::BLACK.to_rgb())?;
//! Circle::new(Point::new(200, 120), 80)
//!     .into_styled(PrimitiveStyle::with_fill(Rgb888::RED))
//!     .draw(&mut lcd.canvas()?)?;
//!
//! lcd.display(None, None)?;
//! ```

pub mod canvas;
pub mod color;
pub mod config;
pub mod display;
pub mod image_proc;
pub mod transport;

pub use canvas::Canvas;
pub use color::Color565;
pub use config::{ConfigError, DisplayConfig};
pub use display::{DisplayError, Ili9486, Orientation, Window};
pub use transport::{RppalTransport, Transport, TransportError};

/// Useful exports
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::color::Color565;
    pub use crate::config::DisplayConfig;
    pub use crate::display::{DisplayError, Ili9486, Orientation, Window};
    pub use crate::image_proc::FitMode;
    pub use crate::transport::{RppalTransport, Transport};
}
