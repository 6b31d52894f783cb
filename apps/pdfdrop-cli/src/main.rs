//! pdfdrop binary
//!
//! Entry point for submitting local files to the PDF service.

use clap::Parser;
use pdfdrop_cli::Args;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout is reserved for JSON results
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("pdfdrop v{}", env!("CARGO_PKG_VERSION"));

    pdfdrop_cli::run(args).await
}
