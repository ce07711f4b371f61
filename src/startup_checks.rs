use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Failed to create output directory {path:?}: {source}")]
    OutputDirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output path exists but is not a directory: {0:?}")]
    OutputNotADirectory(PathBuf),

    #[error("Input path does not exist: {0:?}")]
    InputMissing(PathBuf),

    #[error("Watermark file does not exist: {0:?}")]
    WatermarkMissing(PathBuf),
}

pub fn perform_startup_checks(
    input: &Path,
    watermark: &Path,
    output_directory: &Path,
) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    if input.exists() {
        info!("Input path exists: {:?}", input);
    } else {
        error!("Input path does not exist: {:?}", input);
        errors.push(StartupCheckError::InputMissing(input.to_path_buf()));
    }

    if watermark.is_file() {
        info!("Watermark file found: {:?}", watermark);
    } else {
        error!("Watermark file does not exist: {:?}", watermark);
        errors.push(StartupCheckError::WatermarkMissing(watermark.to_path_buf()));
    }

    if output_directory.is_dir() {
        info!("Output directory exists: {:?}", output_directory);
    } else if output_directory.exists() {
        error!(
            "Output path exists but is not a directory: {:?}",
            output_directory
        );
        errors.push(StartupCheckError::OutputNotADirectory(
            output_directory.to_path_buf(),
        ));
    } else {
        info!(
            "Output directory does not exist, creating: {:?}",
            output_directory
        );
        if let Err(e) = std::fs::create_dir_all(output_directory) {
            error!("Failed to create output directory: {}", e);
            errors.push(StartupCheckError::OutputDirectoryCreationFailed {
                path: output_directory.to_path_buf(),
                source: e,
            });
        }
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        error!("Startup checks failed with {} errors", errors.len());
        Err(errors)
    }
}
