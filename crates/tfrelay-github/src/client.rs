//! GitHub REST API client.
//!
//! Lists the releases of a provider repository and turns release assets
//! into URLs a Terraform client can download without credentials.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LOCATION};
use reqwest::redirect::Policy;
use serde::Deserialize;
use tfrelay_core::{Asset, AssetLocator, Release, ReleaseSource, SourceError};

use crate::config::GithubConfig;
use crate::error::GithubError;

/// Media type for JSON responses of the REST API.
pub const GITHUB_JSON: &str = "application/vnd.github+json";

/// Media type that asks for the raw bytes of a release asset.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Error body returned by the REST API.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Client for the GitHub releases API.
#[derive(Debug)]
pub struct GithubClient {
    config: GithubConfig,
    http: reqwest::Client,
    /// Same settings as `http` but never follows redirects, so the signed
    /// asset URL can be read from the `Location` header.
    assets_http: reqwest::Client,
}

impl GithubClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tfrelay_github::{GithubClient, GithubConfig};
    ///
    /// let client = GithubClient::new(GithubConfig::new().with_token("ghp_example"))?;
    /// # Ok::<(), tfrelay_github::GithubError>(())
    /// ```
    pub fn new(config: GithubConfig) -> Result<Self, GithubError> {
        let http = Self::build_http_client(&config, Policy::default())?;
        let assets_http = Self::build_http_client(&config, Policy::none())?;

        Ok(Self {
            config,
            http,
            assets_http,
        })
    }

    /// Lists the releases of `owner/repo`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::NotFound`] on 404, [`GithubError::HttpError`]
    /// on any other non-success status, and transport or decoding errors
    /// otherwise.
    pub async fn releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, GithubError> {
        let url = self.releases_url(owner, repo);

        let response = self
            .http
            .get(&url)
            .headers(self.auth_headers()?)
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(GithubError::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::HttpError {
                url,
                status: status.as_u16(),
                message: api_message(&body),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| GithubError::InvalidResponse {
            url,
            message: e.to_string(),
        })
    }

    /// Returns a short-lived signed URL for a release asset.
    ///
    /// Asks the API for the asset bytes and reads the redirect target
    /// instead of following it.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::MissingRedirect`] when the API does not
    /// redirect, and HTTP or transport errors otherwise.
    pub async fn signed_asset_url(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
    ) -> Result<String, GithubError> {
        let url = self.asset_url(owner, repo, asset_id);

        let response = self
            .assets_http
            .get(&url)
            .headers(self.auth_headers()?)
            .header(ACCEPT, OCTET_STREAM)
            .send()
            .await?;

        let status = response.status();
        if status.is_redirection() {
            return response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(ToString::to_string)
                .ok_or(GithubError::MissingRedirect { asset_id });
        }
        if status.is_success() {
            return Err(GithubError::MissingRedirect { asset_id });
        }

        let body = response.text().await.unwrap_or_default();
        Err(GithubError::HttpError {
            url,
            status: status.as_u16(),
            message: api_message(&body),
        })
    }

    fn releases_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{owner}/{repo}/releases", self.config.api_url)
    }

    fn asset_url(&self, owner: &str, repo: &str, asset_id: u64) -> String {
        format!(
            "{}/repos/{owner}/{repo}/releases/assets/{asset_id}",
            self.config.api_url
        )
    }

    fn build_http_client(
        config: &GithubConfig,
        redirect: Policy,
    ) -> Result<reqwest::Client, GithubError> {
        reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(redirect)
            .build()
            .map_err(|source| GithubError::ClientBuild { source })
    }

    fn auth_headers(&self) -> Result<HeaderMap, GithubError> {
        let mut headers = HeaderMap::new();

        if let Some(ref token) = self.config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                GithubError::AuthenticationFailed {
                    message: "Invalid token".to_string(),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}

/// Extracts `message` from an API error body, falling back to the raw text.
fn api_message(body: &str) -> String {
    serde_json::from_str::<ApiMessage>(body).map_or_else(|_| body.trim().to_string(), |m| m.message)
}

#[async_trait]
impl ReleaseSource for GithubClient {
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, SourceError> {
        Ok(self.releases(owner, repo).await?)
    }
}

#[async_trait]
impl AssetLocator for GithubClient {
    async fn resolve_download_url(
        &self,
        owner: &str,
        repo: &str,
        asset: &Asset,
    ) -> Result<String, SourceError> {
        if !self.config.is_authenticated() {
            return Ok(asset.browser_download_url.clone());
        }

        let url = self.signed_asset_url(owner, repo, asset.id).await?;
        tracing::debug!(asset = %asset.name, "Resolved signed asset URL");
        Ok(url)
    }
}
