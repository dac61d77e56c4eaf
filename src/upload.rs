use crate::codec::{ImagePayload, JpegCodec};
use crate::error::{CompressionError, Result};
use crate::tree::mirrored_output_path;
use std::fs;
use std::path::{Path, PathBuf};

/// Re-encodes one uploaded payload and writes it under `dest_root`.
///
/// This is the depth-1 case of the tree pipeline: there is no partial success,
/// the first failure aborts the whole request. Returns the absolute output
/// path.
pub fn compress_upload(
    codec: &JpegCodec,
    file_name: &str,
    bytes: Vec<u8>,
    dest_root: &Path,
    quality: u8,
) -> Result<PathBuf> {
    if bytes.is_empty() {
        return Err(CompressionError::EmptyUpload);
    }

    // Clients control the filename; keep only its final component so the
    // output cannot escape the configured root.
    let file_name_component = Path::new(file_name)
        .file_name()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CompressionError::InvalidFileName(file_name.to_string()))?
        .to_os_string();

    fs::create_dir_all(dest_root)
        .map_err(|_| CompressionError::DirectoryCreationFailed(dest_root.to_path_buf()))?;
    let dest_root = fs::canonicalize(dest_root).map_err(|err| CompressionError::Io {
        path: dest_root.to_path_buf(),
        source: err,
    })?;

    let payload = ImagePayload::new(bytes, PathBuf::from(file_name));
    let encoded = codec.compress(payload, quality)?;

    let output = mirrored_output_path(&dest_root, &file_name_component);
    fs::write(&output, &encoded).map_err(|err| CompressionError::Io {
        path: output.clone(),
        source: err,
    })?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(24, 24, |x, y| {
            image::Rgb([x as u8 * 9, y as u8 * 5, 120])
        }));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_compress_upload_writes_marked_file() {
        let codec = JpegCodec::resolve().unwrap();
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("outputimage");

        let output = compress_upload(&codec, "photo.png", png_bytes(), &dest, 60).unwrap();

        assert!(output.is_absolute());
        assert_eq!(output.file_name().unwrap(), "compress_photo.png");
        let written = std::fs::read(&output).unwrap();
        assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_compress_upload_rejects_empty_payload() {
        let codec = JpegCodec::resolve().unwrap();
        let temp = TempDir::new().unwrap();

        let result = compress_upload(&codec, "photo.png", Vec::new(), temp.path(), 60);
        assert!(matches!(result, Err(CompressionError::EmptyUpload)));
    }

    #[test]
    fn test_compress_upload_strips_client_directories() {
        let codec = JpegCodec::resolve().unwrap();
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("outputimage");

        let output =
            compress_upload(&codec, "../../escape/photo.png", png_bytes(), &dest, 60).unwrap();

        assert_eq!(output.file_name().unwrap(), "compress_photo.png");
        assert!(output.starts_with(std::fs::canonicalize(&dest).unwrap()));
    }

    #[test]
    fn test_compress_upload_rejects_nameless_upload() {
        let codec = JpegCodec::resolve().unwrap();
        let temp = TempDir::new().unwrap();

        let result = compress_upload(&codec, "..", png_bytes(), temp.path(), 60);
        assert!(matches!(result, Err(CompressionError::InvalidFileName(_))));
    }

    #[test]
    fn test_compress_upload_propagates_decode_failure() {
        let codec = JpegCodec::resolve().unwrap();
        let temp = TempDir::new().unwrap();

        let result = compress_upload(
            &codec,
            "photo.png",
            b"not an image".to_vec(),
            temp.path(),
            60,
        );
        assert!(result.is_err());
    }
}
