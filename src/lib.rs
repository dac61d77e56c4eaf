pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod server;
pub mod tree;
pub mod upload;

pub use codec::{ImagePayload, JpegCodec};
pub use config::{quality_from_strength, Args, ServiceConfig};
pub use error::{CompressionError, Result, Severity};
pub use server::{router, ServiceState};
pub use tree::{
    compress_tree, is_eligible_file, mirrored_output_path, CompressionRecord, CompressionReport,
    RecordOutcome,
};
pub use upload::compress_upload;
