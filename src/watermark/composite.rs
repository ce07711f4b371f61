use image::{
    DynamicImage, GenericImageView, GrayImage, Luma, RgbaImage, imageops::FilterType,
};
use tracing::debug;

use super::WatermarkError;
use super::types::{MaskMode, WatermarkOptions};

/// Largest watermark, in pixels, that will be allocated
pub const MAX_WATERMARK_PIXELS: u64 = 1 << 27;

/// Size of the watermark once scaled against the base image dimensions.
///
/// Fractional pixels are truncated.
pub fn scaled_size(base: (u32, u32), scale: f64) -> Result<(u32, u32), WatermarkError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(WatermarkError::InvalidScale(scale));
    }

    let width = (base.0 as f64 * scale).trunc();
    let height = (base.1 as f64 * scale).trunc();

    if width > u32::MAX as f64
        || height > u32::MAX as f64
        || width * height > MAX_WATERMARK_PIXELS as f64
    {
        return Err(WatermarkError::WatermarkTooLarge {
            width: width as u64,
            height: height as u64,
        });
    }

    let (width, height) = (width as u32, height as u32);
    if width == 0 || height == 0 {
        return Err(WatermarkError::WatermarkTooSmall { width, height });
    }

    Ok((width, height))
}

/// Build the coverage mask for an already resized watermark
pub fn build_mask(mark: &RgbaImage, mode: MaskMode) -> GrayImage {
    let (width, height) = mark.dimensions();
    match mode {
        MaskMode::InvertedLuminance => {
            // Luminance ignores alpha, so transparent black still counts as dark
            let mut luma = DynamicImage::ImageRgba8(mark.clone()).to_luma8();
            image::imageops::invert(&mut luma);
            luma
        }
        MaskMode::Alpha => GrayImage::from_fn(width, height, |x, y| {
            Luma([mark.get_pixel(x, y)[3]])
        }),
        MaskMode::Opaque => GrayImage::from_pixel(width, height, Luma([255u8])),
    }
}

/// Blend `mark` onto `base` with its top-left corner at (`x`, `y`).
///
/// Watermark pixels outside the base are dropped.
pub fn composite_with_mask(
    base: &mut RgbaImage,
    mark: &RgbaImage,
    mask: &GrayImage,
    x: i64,
    y: i64,
    opacity: f32,
) {
    let (base_width, base_height) = (base.width() as i64, base.height() as i64);

    for (mark_x, mark_y, src) in mark.enumerate_pixels() {
        let dest_x = x + mark_x as i64;
        let dest_y = y + mark_y as i64;
        if dest_x < 0 || dest_y < 0 || dest_x >= base_width || dest_y >= base_height {
            continue;
        }

        let coverage = mask.get_pixel(mark_x, mark_y)[0] as f32 / 255.0 * opacity;
        if coverage <= 0.0 {
            continue;
        }

        let dest = base.get_pixel_mut(dest_x as u32, dest_y as u32);
        for channel in 0..4 {
            dest[channel] = blend_channel(src[channel], dest[channel], coverage);
        }
    }
}

fn blend_channel(src: u8, dest: u8, coverage: f32) -> u8 {
    let value = src as f32 * coverage + dest as f32 * (1.0 - coverage);
    value.round().clamp(0.0, 255.0) as u8
}

/// Scale, position and blend a watermark onto a base image.
///
/// The result keeps an alpha channel only if the base image had one.
pub fn apply_watermark(
    base: &DynamicImage,
    watermark: &DynamicImage,
    options: &WatermarkOptions,
) -> Result<DynamicImage, WatermarkError> {
    options.validate()?;

    let base_size = base.dimensions();
    let (mark_width, mark_height) = scaled_size(base_size, options.scale)?;
    let resized = watermark
        .resize_exact(mark_width, mark_height, FilterType::Lanczos3)
        .to_rgba8();
    let mask = build_mask(&resized, options.mask);
    let (x, y) = options
        .position
        .offset(base_size, (mark_width, mark_height));

    debug!(
        "Placing {}x{} watermark at ({}, {}) on {}x{} image",
        mark_width, mark_height, x, y, base_size.0, base_size.1
    );

    let mut canvas = base.to_rgba8();
    composite_with_mask(&mut canvas, &resized, &mask, x, y, options.opacity);

    if base.color().has_alpha() {
        Ok(DynamicImage::ImageRgba8(canvas))
    } else {
        let rgb_image = DynamicImage::ImageRgba8(canvas).to_rgb8();
        Ok(DynamicImage::ImageRgb8(rgb_image))
    }
}
