use crate::constants::{DEFAULT_STRENGTH, MAX_QUALITY, TREE_OUTPUT_DIR, UPLOAD_OUTPUT_DIR};
use crate::error::{CompressionError, Result};
use clap::Parser;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Maps a configured compression strength to the JPEG encode quality.
/// Strength 0 means quality 100 (largest output, best fidelity).
pub fn quality_from_strength(strength: u8) -> Result<u8> {
    if strength > MAX_QUALITY {
        return Err(CompressionError::InvalidQuality(strength));
    }
    Ok(MAX_QUALITY - strength)
}

#[derive(Parser, Debug)]
#[command(
    name = "img-press",
    about = "HTTP service that re-encodes images to reduced-quality JPEG",
    version
)]
pub struct Args {
    #[arg(
        long,
        default_value = "127.0.0.1:8080",
        help = "Address to bind the HTTP server to"
    )]
    pub bind: SocketAddr,

    #[arg(
        long,
        default_value = ".",
        help = "Content root under which the output folders are created"
    )]
    pub content_root: PathBuf,

    #[arg(
        short = 's',
        long,
        default_value_t = DEFAULT_STRENGTH,
        help = "Default compression strength (0-100)",
        long_help = "Default compression strength from 0 (keep full quality) to 100 \
                     (smallest output). Encode quality is 100 minus the strength. \
                     Requests may override it per call."
    )]
    pub strength: u8,
}

/// Validated process configuration. Read once at startup and treated as
/// immutable afterwards; the strength is threaded into each request as an
/// explicit parameter.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: SocketAddr,
    pub upload_output_root: PathBuf,
    pub tree_output_root: PathBuf,
    pub default_strength: u8,
}

impl ServiceConfig {
    pub fn from_args(args: Args) -> Result<Self> {
        // A bad strength flag fails here, at startup, not on first request.
        quality_from_strength(args.strength)?;

        let content_root =
            fs::canonicalize(&args.content_root).map_err(|err| CompressionError::Io {
                path: args.content_root.clone(),
                source: err,
            })?;

        Ok(Self {
            bind: args.bind,
            upload_output_root: content_root.join(UPLOAD_OUTPUT_DIR),
            tree_output_root: content_root.join(TREE_OUTPUT_DIR),
            default_strength: args.strength,
        })
    }
}
