//! `embedded-graphics` drawing surface over the display's frame buffer.

use core::convert::Infallible;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};
use image::{Rgb, RgbImage};

/// Mutable view of an RGB frame buffer for 2D primitives.
///
/// Pixels outside the buffer are silently dropped. Nothing reaches the
/// panel until the owner calls `display()`.
pub struct Canvas<'a> {
    buffer: &'a mut RgbImage,
}

impl<'a> Canvas<'a> {
    pub fn new(buffer: &'a mut RgbImage) -> Self {
        Self { buffer }
    }

    /// The underlying image, for callers that render with the `image` crate
    pub fn image_mut(&mut self) -> &mut RgbImage {
        self.buffer
    }
}

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.buffer.width(), self.buffer.height())
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.buffer.dimensions();
        for Pixel(point, color) in pixels {
            if let Ok((x, y)) = <(u32, u32)>::try_from(point)
                && x < width
                && y < height
            {
                self.buffer
                    .put_pixel(x, y, Rgb([color.r(), color.g(), color.b()]));
            }
        }
        Ok(())
    }
}
