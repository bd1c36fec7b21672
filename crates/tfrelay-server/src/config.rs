//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tfrelay_github::GithubConfig;

/// Terraform provider registry backed by GitHub releases.
#[derive(Clone, Parser)]
#[command(name = "tfrelay", version, about)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "TFRELAY_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// GitHub token; enables private repositories and signed asset URLs
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub Enterprise Server base URL (e.g., `<https://github.example.com>`)
    #[arg(long, env = "GITHUB_ENTERPRISE_URL")]
    pub github_enterprise_url: Option<String>,

    /// Public base URL advertised by service discovery
    #[arg(long, env = "TFRELAY_PROVIDERS_BASE_URL", default_value = "")]
    pub providers_base_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "TFRELAY_TIMEOUT", default_value = "30")]
    pub timeout: u64,
}

impl ServerArgs {
    /// Returns the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns an error if `bind` and `port` do not form a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.bind, self.port);
        addr.parse()
            .with_context(|| format!("Invalid listen address: {addr}"))
    }

    /// Builds the GitHub client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the enterprise URL is invalid.
    pub fn github_config(&self) -> Result<GithubConfig> {
        let mut config = GithubConfig::new().with_timeout(self.timeout());

        if let Some(ref url) = self.github_enterprise_url {
            config = config
                .with_enterprise_url(url)
                .context("Invalid GitHub Enterprise URL")?;
        }
        if let Some(ref token) = self.github_token {
            if !token.is_empty() {
                config = config.with_token(token);
            }
        }

        Ok(config)
    }

    /// Returns the upstream request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
