use crate::constants::{SourceFormat, MAX_QUALITY};
use crate::error::{CompressionError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::PathBuf;

/// One in-memory image to re-encode. The origin path is only used to name
/// errors; the payload itself never touches the filesystem.
#[derive(Debug)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    origin: PathBuf,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, origin: PathBuf) -> Self {
        Self { bytes, origin }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn origin(&self) -> &PathBuf {
        &self.origin
    }
}

/// Resolved JPEG encode capability.
///
/// Resolution happens once at startup instead of once per file, so a build
/// without the required codecs fails loudly before the service accepts work.
#[derive(Debug, Clone, Copy)]
pub struct JpegCodec {
    _private: (),
}

impl JpegCodec {
    pub fn resolve() -> Result<Self> {
        if !ImageFormat::Jpeg.writing_enabled() {
            return Err(CompressionError::CodecUnavailable(
                "JPEG encoder is not compiled into this build".to_string(),
            ));
        }
        if !ImageFormat::Jpeg.reading_enabled() || !ImageFormat::Png.reading_enabled() {
            return Err(CompressionError::CodecUnavailable(
                "JPEG/PNG decoders are not compiled into this build".to_string(),
            ));
        }
        Ok(Self { _private: () })
    }

    /// Re-encodes `payload` as JPEG bytes at `quality`.
    ///
    /// The source format is sniffed from the bytes, never taken from a file
    /// extension; anything other than JPEG or PNG is rejected. Returns the
    /// encoded buffer only, no side effects.
    pub fn compress(&self, payload: ImagePayload, quality: u8) -> Result<Vec<u8>> {
        if quality > MAX_QUALITY {
            return Err(CompressionError::InvalidQuality(quality));
        }

        let ImagePayload { bytes, origin } = payload;

        let reader = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|source| CompressionError::Io {
                path: origin.clone(),
                source,
            })?;

        let format = reader.format().ok_or_else(|| {
            CompressionError::UnsupportedFormat(format!(
                "unrecognized image data in {}",
                origin.display()
            ))
        })?;
        if SourceFormat::from_image_format(format).is_none() {
            return Err(CompressionError::UnsupportedFormat(format!(
                "{format:?} input is not supported, expected JPEG or PNG"
            )));
        }

        let img = reader.decode().map_err(|source| CompressionError::Decode {
            path: origin.clone(),
            source,
        })?;

        // The JPEG encoder carries only grayscale and RGB; flatten anything
        // else (alpha channels, 16-bit samples) down to RGB8.
        let img = match img {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };

        let mut encoded = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut encoded, quality);
        img.write_with_encoder(encoder)
            .map_err(|source| CompressionError::Encode {
                path: origin,
                source,
            })?;

        Ok(encoded)
    }
}
