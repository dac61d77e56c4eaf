mod codec;
mod config;
mod constants;
mod error;
mod server;
mod tree;
mod upload;

use anyhow::Context;
use clap::Parser;
use codec::JpegCodec;
use config::{Args, ServiceConfig};
use server::ServiceState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ServiceConfig::from_args(args).context("invalid service configuration")?;

    // Resolve the encoder capability once; a build without the JPEG codec
    // refuses to start instead of failing per request.
    let codec = JpegCodec::resolve().context("resolving image codec")?;

    let bind = config.bind;
    let app = server::router(ServiceState { codec, config });

    tracing::info!("binding image compression service to {bind}");
    axum::Server::bind(&bind)
        .serve(app.into_make_service())
        .await
        .context("HTTP server failed")?;

    Ok(())
}
