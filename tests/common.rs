use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Deterministic non-uniform test image; gradients survive JPEG re-encoding
/// with visible size differences across quality levels.
pub fn test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x * 11 % 256) as u8,
            (y * 17 % 256) as u8,
            ((x + y) * 5 % 256) as u8,
        ])
    }))
}

/// Writes a real decodable image at `path` in the given container format,
/// regardless of the path's extension.
pub fn write_image(path: &Path, format: ImageFormat) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    test_image(32, 24).save_with_format(path, format).unwrap();
}

/// Writes bytes that carry an image extension but do not decode.
pub fn write_corrupt_image(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"this is not pixel data").unwrap();
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}
