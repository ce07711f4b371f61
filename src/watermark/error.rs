use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Scale factor must be greater than 0, got {0}")]
    InvalidScale(f64),

    #[error("Opacity must be between 0 and 1, got {0}")]
    InvalidOpacity(f32),

    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("Watermark scaled to {width}x{height} is too small to apply")]
    WatermarkTooSmall { width: u32, height: u32 },

    #[error("Watermark scaled to {width}x{height} exceeds the size limit")]
    WatermarkTooLarge { width: u64, height: u64 },

    #[error("Unsupported output format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("Input path does not exist: {0:?}")]
    InputNotFound(PathBuf),

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(PathBuf),
}
