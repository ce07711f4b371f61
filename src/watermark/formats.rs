use image::{
    DynamicImage, ImageDecoder, ImageEncoder, ImageReader,
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use tracing::debug;

use super::WatermarkError;
use super::types::{LoadedImage, OutputFormat};

/// Decode an image, keeping its embedded ICC profile if the codec exposes one
pub fn load(path: &Path) -> Result<LoadedImage, WatermarkError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    debug!(
        "Opening image file: {:?}, detected format: {:?}",
        path,
        reader.format()
    );

    let mut decoder = reader.into_decoder()?;
    let icc_profile = match decoder.icc_profile() {
        Ok(profile) => profile,
        Err(e) => {
            debug!("Could not read ICC profile from {:?}: {}", path, e);
            None
        }
    };
    let image = DynamicImage::from_decoder(decoder)?;

    Ok(LoadedImage { image, icc_profile })
}

/// Save an image in the format named by the path's extension.
///
/// A partially written file is removed if encoding fails.
pub fn save(
    image: &DynamicImage,
    path: &Path,
    jpeg_quality: u8,
    icc_profile: Option<&[u8]>,
) -> Result<(), WatermarkError> {
    let format = OutputFormat::from_path(path)
        .ok_or_else(|| WatermarkError::UnsupportedFormat(path.to_path_buf()))?;
    if !(1..=100).contains(&jpeg_quality) {
        return Err(WatermarkError::InvalidQuality(jpeg_quality));
    }

    let mut output = BufWriter::new(File::create(path)?);
    let result = encode(image, &mut output, format, jpeg_quality, icc_profile)
        .and_then(|()| output.flush().map_err(WatermarkError::from));
    drop(output);

    if result.is_err() {
        if let Err(e) = std::fs::remove_file(path) {
            debug!("Failed to remove partial output {:?}: {}", path, e);
        }
    }

    result
}

fn encode<W: Write + Seek>(
    image: &DynamicImage,
    output: &mut W,
    format: OutputFormat,
    jpeg_quality: u8,
    icc_profile: Option<&[u8]>,
) -> Result<(), WatermarkError> {
    match format {
        OutputFormat::Jpeg => {
            // JPEG doesn't support alpha channel, so convert to RGB
            let rgb_image = DynamicImage::ImageRgb8(image.to_rgb8());
            let mut encoder = JpegEncoder::new_with_quality(output, jpeg_quality);
            attach_icc_profile(&mut encoder, icc_profile, "JPEG");
            rgb_image.write_with_encoder(encoder)?;
        }
        OutputFormat::Png => {
            let mut encoder = PngEncoder::new(output);
            attach_icc_profile(&mut encoder, icc_profile, "PNG");
            image.write_with_encoder(encoder)?;
        }
        OutputFormat::Gif | OutputFormat::Bmp => {
            image.write_to(output, format.image_format())?;
        }
    }

    Ok(())
}

fn attach_icc_profile<E: ImageEncoder>(encoder: &mut E, icc_profile: Option<&[u8]>, label: &str) {
    let Some(profile_data) = icc_profile else {
        return;
    };

    match encoder.set_icc_profile(profile_data.to_vec()) {
        Ok(()) => debug!(
            "{} written with ICC profile: {} bytes",
            label,
            profile_data.len()
        ),
        Err(e) => debug!(
            "Failed to set ICC profile on {} encoder ({}), writing without it",
            label, e
        ),
    }
}
