//! Display module for TFT LCD control.
//!
//! This module provides the driver for the ILI9486 3.5" TFT controller
//! connected via SPI, with a GPIO line for data/command select and an
//! optional reset line.

pub mod ili9486;
pub mod registers;
pub mod spi;

// Re-export main types
pub use ili9486::{DisplayError, Ili9486, Window};
pub use registers::{Orientation, Register};
pub use spi::{Framer, Payload};
