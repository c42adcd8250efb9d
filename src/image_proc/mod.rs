//! Image processing module.
//!
//! Provides pixel encoding for the controller and fitting of decoded images
//! to the panel size.

pub mod codec;
pub mod transform;

pub use codec::{dynamic_to_wire_bytes, image_to_wire_bytes};
pub use transform::{FitMode, fit_to_display};

use crate::display::{DisplayError, Ili9486, Window};
use crate::transport::Transport;
use std::path::Path;
use thiserror::Error;

/// Image processing errors
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Display error: {0}")]
    Display(#[from] DisplayError),
}

/// Decode an image file, fit it to the panel and push it.
///
/// Full pipeline:
/// 1. Decode the file (PNG or JPEG)
/// 2. Scale to the device size (letterbox or crop)
/// 3. Copy into the frame buffer and send it
pub fn show_image_file<T: Transport>(
    display: &mut Ili9486<T>,
    path: impl AsRef<Path>,
    mode: FitMode,
) -> Result<(), ProcessingError> {
    let path = path.as_ref();
    tracing::info!("Loading image {}", path.display());

    let img = image::open(path)?;
    show_image(display, img, mode)
}

/// Fit an already decoded image to the panel and push it
pub fn show_image<T: Transport>(
    display: &mut Ili9486<T>,
    img: image::DynamicImage,
    mode: FitMode,
) -> Result<(), ProcessingError> {
    if !display.is_initialized() {
        return Err(DisplayError::NotInitialized.into());
    }
    let (width, height) = (display.width(), display.height());
    let fitted = fit_to_display(img, width.into(), height.into(), mode);

    if let Some(buffer) = display.buffer_mut() {
        *buffer = fitted;
    }
    display.display(None, None)?;

    tracing::info!("Image displayed ({}x{})", width, height);
    Ok(())
}

/// Push `img` into a sub-rectangle whose top-left corner is `(x, y)`
pub fn show_image_at<T: Transport>(
    display: &mut Ili9486<T>,
    img: &image::RgbImage,
    x: u16,
    y: u16,
) -> Result<(), ProcessingError> {
    let (w, h) = img.dimensions();
    let rect = Window::new(
        x,
        y,
        x.saturating_add((w.max(1) - 1).min(u16::MAX as u32) as u16),
        y.saturating_add((h.max(1) - 1).min(u16::MAX as u32) as u16),
    );
    display.display(Some(img), Some(rect))?;
    Ok(())
}
