use clap::ValueEnum;
use image::{DynamicImage, ImageFormat};
use serde::Deserialize;
use std::path::Path;

use super::{WatermarkError, WatermarkPosition};

pub const DEFAULT_SCALE: f64 = 0.5;
pub const DEFAULT_OPACITY: f32 = 1.0;
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// How per-pixel watermark coverage is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskMode {
    /// Dark watermark pixels cover the base, light ones vanish
    #[default]
    InvertedLuminance,
    /// Coverage follows the watermark's alpha channel
    Alpha,
    /// Every watermark pixel replaces the base pixel
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
}

impl OutputFormat {
    /// Infer the output format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "gif" => Some(OutputFormat::Gif),
            "bmp" => Some(OutputFormat::Bmp),
            _ => None,
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::Bmp => ImageFormat::Bmp,
        }
    }
}

/// Placement and blending parameters for a single watermark application
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkOptions {
    pub position: WatermarkPosition,
    /// Watermark size relative to the base image dimensions
    pub scale: f64,
    pub opacity: f32,
    pub mask: MaskMode,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            position: WatermarkPosition::Center,
            scale: DEFAULT_SCALE,
            opacity: DEFAULT_OPACITY,
            mask: MaskMode::InvertedLuminance,
        }
    }
}

impl WatermarkOptions {
    pub fn validate(&self) -> Result<(), WatermarkError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(WatermarkError::InvalidScale(self.scale));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(WatermarkError::InvalidOpacity(self.opacity));
        }
        Ok(())
    }
}

/// A decoded image together with the colour profile it was stored with
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: DynamicImage,
    pub icc_profile: Option<Vec<u8>>,
}
