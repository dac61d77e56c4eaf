use std::path::PathBuf;
use thiserror::Error;

/// How an error should be presented at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The caller sent something we cannot work with.
    BadInput,
    /// The environment or codec failed; the input may have been fine.
    Internal,
}

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("no image data provided")]
    EmptyUpload,

    #[error("upload has no usable file name: {0:?}")]
    InvalidFileName(String),

    #[error("source directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("invalid quality value: {0}. Must be between 0 and 100")]
    InvalidQuality(u8),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("JPEG codec unavailable: {0}")]
    CodecUnavailable(String),

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

impl CompressionError {
    pub fn severity(&self) -> Severity {
        match self {
            CompressionError::EmptyUpload
            | CompressionError::InvalidFileName(_)
            | CompressionError::SourceNotFound(_)
            | CompressionError::InvalidQuality(_)
            | CompressionError::UnsupportedFormat(_)
            | CompressionError::Decode { .. } => Severity::BadInput,
            CompressionError::CodecUnavailable(_)
            | CompressionError::Encode { .. }
            | CompressionError::Io { .. }
            | CompressionError::DirectoryCreationFailed(_) => Severity::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_bad_input_severity() {
        let err = CompressionError::SourceNotFound(Path::new("missing").to_path_buf());
        assert_eq!(err.severity(), Severity::BadInput);

        assert_eq!(
            CompressionError::EmptyUpload.severity(),
            Severity::BadInput
        );
        assert_eq!(
            CompressionError::InvalidQuality(120).severity(),
            Severity::BadInput
        );
    }

    #[test]
    fn test_internal_severity() {
        let err = CompressionError::CodecUnavailable("jpeg writer missing".to_string());
        assert_eq!(err.severity(), Severity::Internal);

        let err = CompressionError::Io {
            path: Path::new("out.jpg").to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.severity(), Severity::Internal);
    }

    #[test]
    fn test_error_messages_name_the_path() {
        let err = CompressionError::SourceNotFound(Path::new("/srv/photos").to_path_buf());
        assert!(err.to_string().contains("/srv/photos"));

        let err = CompressionError::DirectoryCreationFailed(Path::new("/out/sub").to_path_buf());
        assert!(err.to_string().contains("/out/sub"));
    }
}
