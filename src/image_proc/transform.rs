//! Fit arbitrary images to the panel.
//!
//! Provides letterbox and crop scaling so any decoded picture can be handed
//! to `display()` at exactly the device size.

use image::{DynamicImage, GenericImageView, Rgb, RgbImage, imageops::FilterType};

/// How to reconcile differing aspect ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Scale to fit inside the panel, pad with the background color
    #[default]
    Letterbox,
    /// Scale to cover the panel, center-crop the overflow
    Crop,
}

/// Resize `img` to exactly `width` x `height`
pub fn fit_to_display(img: DynamicImage, width: u32, height: u32, mode: FitMode) -> RgbImage {
    match mode {
        FitMode::Letterbox => scale_to_fit(img, width, height, Rgb([0, 0, 0])),
        FitMode::Crop => scale_to_fill(img, width, height),
    }
}

/// Scale image to fit within dimensions (letterbox/pillarbox)
fn scale_to_fit(
    img: DynamicImage,
    max_width: u32,
    max_height: u32,
    background: Rgb<u8>,
) -> RgbImage {
    let (src_width, src_height) = img.dimensions();

    let scale_w = max_width as f32 / src_width as f32;
    let scale_h = max_height as f32 / src_height as f32;
    let scale = scale_w.min(scale_h);

    let new_width = ((src_width as f32 * scale) as u32).clamp(1, max_width);
    let new_height = ((src_height as f32 * scale) as u32).clamp(1, max_height);

    tracing::debug!(
        "Scaling {}x{} -> {}x{} (fit into {}x{})",
        src_width,
        src_height,
        new_width,
        new_height,
        max_width,
        max_height
    );

    let resized = img.resize_exact(new_width, new_height, FilterType::Triangle);

    let mut canvas = RgbImage::from_pixel(max_width, max_height, background);
    let offset_x = (max_width - new_width) / 2;
    let offset_y = (max_height - new_height) / 2;
    image::imageops::overlay(
        &mut canvas,
        &resized.to_rgb8(),
        offset_x as i64,
        offset_y as i64,
    );

    canvas
}

/// Scale image to fill dimensions (crop overflow)
fn scale_to_fill(img: DynamicImage, target_width: u32, target_height: u32) -> RgbImage {
    let (src_width, src_height) = img.dimensions();

    let scale_w = target_width as f32 / src_width as f32;
    let scale_h = target_height as f32 / src_height as f32;
    let scale = scale_w.max(scale_h);

    // Rounding up keeps the scaled image at least as large as the target
    let new_width = ((src_width as f32 * scale).ceil() as u32).max(target_width);
    let new_height = ((src_height as f32 * scale).ceil() as u32).max(target_height);

    tracing::debug!(
        "Scaling {}x{} -> {}x{} (fill {}x{})",
        src_width,
        src_height,
        new_width,
        new_height,
        target_width,
        target_height
    );

    let resized = img.resize_exact(new_width, new_height, FilterType::Triangle);

    let crop_x = (new_width - target_width) / 2;
    let crop_y = (new_height - target_height) / 2;

    resized
        .crop_imm(crop_x, crop_y, target_width, target_height)
        .into_rgb8()
}
