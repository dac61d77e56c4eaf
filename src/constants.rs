pub const DEFAULT_STRENGTH: u8 = 80;
pub const MAX_QUALITY: u8 = 100;

/// Marker prepended to every output filename.
pub const OUTPUT_PREFIX: &str = "compress_";

/// Output folder (under the content root) for single uploads.
pub const UPLOAD_OUTPUT_DIR: &str = "outputimage";
/// Output folder (under the content root) for directory-tree runs.
pub const TREE_OUTPUT_DIR: &str = "outputimages";

/// Extensions considered eligible for re-encoding, matched case-insensitively.
pub const ELIGIBLE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Recursion bound for the tree walk. Directories at this depth are recorded
/// as failures and pruned, so cyclic link structures terminate.
pub const MAX_TRAVERSAL_DEPTH: usize = 64;

/// Largest request body the server accepts (64 MiB).
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(SourceFormat::Jpeg),
            image::ImageFormat::Png => Some(SourceFormat::Png),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
        }
    }
}
