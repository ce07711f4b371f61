use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::watermark::{
    DEFAULT_JPEG_QUALITY, WatermarkError, WatermarkOptions, apply_watermark, formats,
};

pub const IMAGE_FILE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];
pub const DEFAULT_OUTPUT_PREFIX: &str = "watermarked_";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "watermarked_images";

/// Everything needed to watermark a batch of images
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub watermark: WatermarkOptions,
    pub output_directory: PathBuf,
    pub prefix: String,
    pub jpeg_quality: u8,
    pub recursive: bool,
}

impl BatchOptions {
    pub fn new(output_directory: PathBuf) -> Self {
        Self {
            watermark: WatermarkOptions::default(),
            output_directory,
            prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            recursive: false,
        }
    }
}

/// An image found under the input path
#[derive(Debug, Clone, PartialEq)]
pub struct InputImage {
    pub path: PathBuf,
    /// Directory relative to the input root, mirrored under the output directory
    pub relative_dir: PathBuf,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, WatermarkError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_lowercase();
            IMAGE_FILE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// `<output_dir>/<prefix><file_name>`
pub fn build_output_path(
    file_name: &str,
    output_dir: &Path,
    prefix: &str,
) -> Result<PathBuf, WatermarkError> {
    if file_name.is_empty() || output_dir.as_os_str().is_empty() {
        return Err(WatermarkError::InvalidFileName(output_dir.join(file_name)));
    }
    Ok(output_dir.join(format!("{}{}", prefix, file_name)))
}

/// Resolve the images to process.
///
/// A file input is returned as-is. A directory yields its image files sorted by
/// name, descending into subdirectories only when `recursive` is set. `skip`
/// excludes a directory from the walk.
pub fn collect_inputs(
    input: &Path,
    recursive: bool,
    skip: Option<&Path>,
) -> Result<Vec<InputImage>, WatermarkError> {
    if input.is_file() {
        return Ok(vec![InputImage {
            path: input.to_path_buf(),
            relative_dir: PathBuf::new(),
        }]);
    }
    if !input.is_dir() {
        return Err(WatermarkError::InputNotFound(input.to_path_buf()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images = Vec::new();

    let walker = WalkDir::new(input)
        .follow_links(true)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| skip.is_none_or(|skip| entry.path() != skip));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {:?}: {}", input, e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_image(entry.path()) {
            continue;
        }

        let relative_dir = entry
            .path()
            .parent()
            .and_then(|parent| parent.strip_prefix(input).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        images.push(InputImage {
            path: entry.into_path(),
            relative_dir,
        });
    }

    debug!("Found {} images under {:?}", images.len(), input);
    Ok(images)
}

/// Applies one decoded watermark to any number of images
pub struct Watermarker {
    watermark: DynamicImage,
    watermark_path: PathBuf,
    options: BatchOptions,
}

impl Watermarker {
    /// Decode the watermark once and validate the options up front
    pub fn new(watermark_path: &Path, options: BatchOptions) -> Result<Self, WatermarkError> {
        options.watermark.validate()?;
        if !(1..=100).contains(&options.jpeg_quality) {
            return Err(WatermarkError::InvalidQuality(options.jpeg_quality));
        }

        let watermark = formats::load(watermark_path)?.image;
        debug!(
            "Loaded watermark {:?} ({}x{})",
            watermark_path,
            watermark.width(),
            watermark.height()
        );

        Ok(Self {
            watermark,
            watermark_path: watermark_path.to_path_buf(),
            options,
        })
    }

    /// Watermark a single image and return the path it was written to
    pub fn watermark_file(
        &self,
        image_path: &Path,
        relative_dir: &Path,
    ) -> Result<PathBuf, WatermarkError> {
        let file_name = image_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| WatermarkError::InvalidFileName(image_path.to_path_buf()))?;

        let output_dir = self.options.output_directory.join(relative_dir);
        let output_path = build_output_path(file_name, &output_dir, &self.options.prefix)?;

        let source = formats::load(image_path)?;
        let watermarked = apply_watermark(&source.image, &self.watermark, &self.options.watermark)?;

        std::fs::create_dir_all(&output_dir)?;
        formats::save(
            &watermarked,
            &output_path,
            self.options.jpeg_quality,
            source.icc_profile.as_deref(),
        )?;

        info!(
            "Saved watermark ({}) to image ({}) at ({}) position",
            self.watermark_path.display(),
            file_name,
            self.options.watermark.position
        );

        Ok(output_path)
    }

    /// Watermark every image under `input`, continuing past per-image failures
    pub fn run(&self, input: &Path) -> Result<BatchReport, WatermarkError> {
        if !input.exists() {
            return Err(WatermarkError::InputNotFound(input.to_path_buf()));
        }

        std::fs::create_dir_all(&self.options.output_directory)?;
        let input = input.canonicalize()?;
        let output_dir = self.options.output_directory.canonicalize()?;

        let images = collect_inputs(&input, self.options.recursive, Some(&output_dir))?;
        if images.is_empty() {
            warn!("No images found at {:?}", input);
        }

        let mut report = BatchReport::default();
        for image in images {
            match self.watermark_file(&image.path, &image.relative_dir) {
                Ok(output_path) => report.written.push(output_path),
                Err(e) => {
                    error!("Failed to watermark {:?}: {}", image.path, e);
                    report.failed.push((image.path, e));
                }
            }
        }

        info!(
            "Watermarked {} of {} images into {:?}",
            report.written.len(),
            report.total(),
            self.options.output_directory
        );

        Ok(report)
    }
}
