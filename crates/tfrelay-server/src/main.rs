//! tfrelay - Terraform provider registry backed by GitHub releases.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tfrelay_server::ServerArgs;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tfrelay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tfrelay_server::serve(ServerArgs::parse()).await
}
