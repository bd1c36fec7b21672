//! # tfrelay server
//!
//! Serves the Terraform provider registry protocol for providers published
//! as GitHub releases.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /.well-known/terraform.json` | service discovery |
//! | `GET /v1/providers/{namespace}/{type}/versions` | version list |
//! | `GET /v1/providers/{namespace}/{type}/{version}/download/{os}/{arch}` | package descriptor |
//!
//! A provider `{namespace}/{type}` maps to the GitHub repository
//! `{namespace}/terraform-provider-{type}`.

#![deny(missing_docs)]

pub mod config;
pub mod router;

use std::sync::Arc;

use anyhow::{Context, Result};
use tfrelay_core::ProviderRegistry;
use tfrelay_github::{GithubClient, HttpFetcher};

pub use config::ServerArgs;
pub use router::{router, AppState};

/// Wires the GitHub collaborators into a registry.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or an HTTP client
/// cannot be built.
pub fn build_state(args: &ServerArgs) -> Result<AppState> {
    let github_config = args.github_config()?;
    let fetcher = HttpFetcher::new(github_config.timeout, &github_config.user_agent)
        .context("Failed to create HTTP fetcher")?;
    let github =
        Arc::new(GithubClient::new(github_config).context("Failed to create GitHub client")?);

    let registry = ProviderRegistry::new(github.clone(), github, Arc::new(fetcher));
    Ok(AppState::new(registry, &args.providers_base_url))
}

/// Binds the listener and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server cannot be configured or the listener
/// cannot be bound.
pub async fn serve(args: ServerArgs) -> Result<()> {
    let addr = args.socket_addr()?;
    let state = build_state(&args)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(
        addr = %addr,
        api_url = %args.github_config()?.api_url,
        authenticated = args.github_token.as_deref().is_some_and(|t| !t.is_empty()),
        "Starting provider registry"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Provider registry stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
