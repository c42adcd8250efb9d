//! RGB image to ILI9486 wire format.
//!
//! In 18 bpp mode the controller takes one byte per channel and only reads
//! the top six bits of each, so the conversion is a per-byte mask.

use image::{DynamicImage, RgbImage};

/// Low two bits of every channel are ignored by the panel
const CHANNEL_MASK: u8 = 0xFC;

/// Convert an RGB image into pixel bytes, row-major from the top left.
///
/// Returns `3 * width * height` bytes: R, G, B per pixel.
pub fn image_to_wire_bytes(img: &RgbImage) -> Vec<u8> {
    img.as_raw().iter().map(|c| c & CHANNEL_MASK).collect()
}

/// Same as [`image_to_wire_bytes`] for any decoded image
pub fn dynamic_to_wire_bytes(img: &DynamicImage) -> Vec<u8> {
    image_to_wire_bytes(&img.to_rgb8())
}
