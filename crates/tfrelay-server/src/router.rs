//! HTTP surface of the registry protocol.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tfrelay_core::{
    ErrorResponse, ProviderCoordinates, ProviderRegistry, ProviderResponse, RegistryError,
    ServiceDiscovery,
};

/// Service discovery document path.
pub const DISCOVERY_PATH: &str = "/.well-known/terraform.json";

/// Provider protocol route.
pub const PROVIDERS_ROUTE: &str = "/v1/providers/:namespace/:type/*tail";

/// Provider route with nothing after the type; answered as an invalid request.
pub const PROVIDERS_EMPTY_TAIL_ROUTE: &str = "/v1/providers/:namespace/:type/";

/// Shared state of every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    registry: ProviderRegistry,
    discovery: ServiceDiscovery,
}

impl AppState {
    /// Creates the state, advertising the protocol under `providers_base_url`.
    #[must_use]
    pub fn new(registry: ProviderRegistry, providers_base_url: &str) -> Self {
        Self {
            registry,
            discovery: ServiceDiscovery::new(providers_base_url),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(DISCOVERY_PATH, get(service_discovery))
        .route(PROVIDERS_ROUTE, get(provider))
        .route(PROVIDERS_EMPTY_TAIL_ROUTE, get(provider_without_tail))
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(state))
}

async fn service_discovery(State(state): State<Arc<AppState>>) -> Json<ServiceDiscovery> {
    Json(state.discovery.clone())
}

async fn provider(
    State(state): State<Arc<AppState>>,
    Path((namespace, provider_type, tail)): Path<(String, String, String)>,
) -> Result<Json<ProviderResponse>, ApiError> {
    respond(&state, namespace, provider_type, &tail).await
}

async fn provider_without_tail(
    State(state): State<Arc<AppState>>,
    Path((namespace, provider_type)): Path<(String, String)>,
) -> Result<Json<ProviderResponse>, ApiError> {
    respond(&state, namespace, provider_type, "").await
}

async fn respond(
    state: &AppState,
    namespace: String,
    provider_type: String,
    tail: &str,
) -> Result<Json<ProviderResponse>, ApiError> {
    let coordinates = ProviderCoordinates::new(namespace, provider_type);
    let response = state
        .registry
        .handle(&coordinates, tail)
        .await
        .map_err(|error| ApiError {
            provider: coordinates.id(),
            error,
        })?;
    Ok(Json(response))
}

/// A failed provider request.
#[derive(Debug)]
pub struct ApiError {
    provider: String,
    error: RegistryError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(
            provider = %self.provider,
            kind = self.error.kind(),
            error = %self.error,
            "Provider request failed"
        );

        let status = StatusCode::BAD_REQUEST;
        let body = ErrorResponse {
            status: status.as_u16(),
            message: self.error.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Handled request"
    );
    response
}
