// Watermark module - placement, scaling, blending and image I/O
mod composite;
mod error;
pub mod formats;
mod position;
mod types;

pub use composite::{
    MAX_WATERMARK_PIXELS, apply_watermark, build_mask, composite_with_mask, scaled_size,
};
pub use error::WatermarkError;
pub use position::WatermarkPosition;
pub use types::{
    DEFAULT_JPEG_QUALITY, DEFAULT_OPACITY, DEFAULT_SCALE, LoadedImage, MaskMode, OutputFormat,
    WatermarkOptions,
};
