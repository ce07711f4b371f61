use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub mod batch;
pub mod startup_checks;
pub mod watermark;

use batch::{BatchOptions, DEFAULT_OUTPUT_PREFIX};
use watermark::{
    DEFAULT_JPEG_QUALITY, DEFAULT_OPACITY, DEFAULT_SCALE, MaskMode, WatermarkOptions,
    WatermarkPosition,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml_edit::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub watermark: WatermarkConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    pub position: WatermarkPosition,
    pub scale: f64,
    pub opacity: f32,
    pub mask: MaskMode,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Falls back to `watermarked_images` under the working directory
    pub directory: Option<PathBuf>,
    pub prefix: String,
    pub jpeg_quality: u8,
    pub recursive: bool,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            position: WatermarkPosition::Center,
            scale: DEFAULT_SCALE,
            opacity: DEFAULT_OPACITY,
            mask: MaskMode::InvertedLuminance,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            recursive: false,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml_edit::de::from_str::<Config>(content)?)
    }

    /// Load the config file, or defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config = Self::from_toml_str(&content)?;
            info!("Configuration loaded from: {:?}", path);
            Ok(config)
        } else {
            info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn watermark_options(&self) -> WatermarkOptions {
        WatermarkOptions {
            position: self.watermark.position,
            scale: self.watermark.scale,
            opacity: self.watermark.opacity,
            mask: self.watermark.mask,
        }
    }

    pub fn batch_options(&self, fallback_output_directory: PathBuf) -> BatchOptions {
        BatchOptions {
            watermark: self.watermark_options(),
            output_directory: self
                .output
                .directory
                .clone()
                .unwrap_or(fallback_output_directory),
            prefix: self.output.prefix.clone(),
            jpeg_quality: self.output.jpeg_quality,
            recursive: self.output.recursive,
        }
    }
}
