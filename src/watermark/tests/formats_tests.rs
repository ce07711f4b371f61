use crate::watermark::{OutputFormat, WatermarkError, formats};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_output_format_from_extension() {
    assert_eq!(
        OutputFormat::from_path(Path::new("a/photo.JPG")),
        Some(OutputFormat::Jpeg)
    );
    assert_eq!(
        OutputFormat::from_path(Path::new("photo.jpeg")),
        Some(OutputFormat::Jpeg)
    );
    assert_eq!(
        OutputFormat::from_path(Path::new("photo.png")),
        Some(OutputFormat::Png)
    );
    assert_eq!(
        OutputFormat::from_path(Path::new("photo.gif")),
        Some(OutputFormat::Gif)
    );
    assert_eq!(
        OutputFormat::from_path(Path::new("photo.bmp")),
        Some(OutputFormat::Bmp)
    );
    assert_eq!(OutputFormat::from_path(Path::new("photo.tiff")), None);
    assert_eq!(OutputFormat::from_path(Path::new("photo")), None);
}

#[test]
fn test_png_keeps_alpha() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.png");
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 6, Rgba([10, 20, 30, 40])));

    formats::save(&img, &path, 90, None).unwrap();

    let loaded = formats::load(&path).unwrap();
    assert_eq!(loaded.image.dimensions(), (8, 6));
    assert_eq!(loaded.image.get_pixel(3, 3), Rgba([10, 20, 30, 40]));
}

#[test]
fn test_jpeg_drops_alpha() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.jpg");
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([200, 0, 0, 128])));

    formats::save(&img, &path, 85, None).unwrap();

    let loaded = formats::load(&path).unwrap();
    assert_eq!(loaded.image.dimensions(), (16, 16));
    assert!(!loaded.image.color().has_alpha());
    assert_eq!(
        image::ImageReader::open(&path)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .format(),
        Some(ImageFormat::Jpeg)
    );
}

#[test]
fn test_bmp_and_gif_round_trip_dimensions() {
    let temp_dir = TempDir::new().unwrap();
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 7, Rgb([0, 128, 255])));

    for name in ["out.bmp", "out.gif"] {
        let path = temp_dir.path().join(name);
        formats::save(&img, &path, 90, None).unwrap();
        let loaded = formats::load(&path).unwrap();
        assert_eq!(loaded.image.dimensions(), (12, 7), "{}", name);
    }
}

#[test]
fn test_save_unknown_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.xyz");
    let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));

    let result = formats::save(&img, &path, 90, None);
    assert!(matches!(result, Err(WatermarkError::UnsupportedFormat(_))));
    assert!(!path.exists());
}

#[test]
fn test_failed_encode_leaves_no_file() {
    let temp_dir = TempDir::new().unwrap();
    // Wider than a JPEG or GIF frame can describe
    let img = DynamicImage::ImageRgb8(RgbImage::new(70_000, 1));

    for name in ["too_wide.jpg", "too_wide.gif"] {
        let path = temp_dir.path().join(name);
        assert!(formats::save(&img, &path, 90, None).is_err(), "{}", name);
        assert!(!path.exists(), "{} should have been removed", name);
    }
}

#[test]
fn test_save_rejects_zero_quality() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.jpg");
    let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));

    let result = formats::save(&img, &path, 0, None);
    assert!(matches!(result, Err(WatermarkError::InvalidQuality(0))));
}

#[test]
fn test_save_with_icc_profile_does_not_fail() {
    let temp_dir = TempDir::new().unwrap();
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([50, 60, 70])));
    // Not a valid profile; encoders either embed or ignore it
    let profile = vec![0u8; 128];

    for name in ["with_profile.jpg", "with_profile.png"] {
        let path = temp_dir.path().join(name);
        formats::save(&img, &path, 90, Some(&profile)).unwrap();
        assert!(path.exists());
    }
}

#[test]
fn test_load_rejects_non_image() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not an image").unwrap();

    assert!(formats::load(&path).is_err());
}
