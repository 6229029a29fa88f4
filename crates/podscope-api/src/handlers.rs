//! axum handler functions.
//!
//! Each one logs the request and delegates to the matching `Backend`
//! method, which owns the response and its metrics.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::Response;
use tracing::info;

use podscope_cluster::ControlPlane;

use crate::backend::Backend;

/// Shared state for API handlers.
pub type ApiState<C> = Arc<Backend<C>>;

/// GET / (and any unmatched path)
pub async fn index<C: ControlPlane>(
    State(backend): State<ApiState<C>>,
    method: Method,
    uri: Uri,
) -> Response {
    info!(%method, path = uri.path(), "handling request");
    backend.index().await
}

/// GET /config
pub async fn config<C: ControlPlane>(
    State(backend): State<ApiState<C>>,
    method: Method,
    uri: Uri,
) -> Response {
    info!(%method, path = uri.path(), "handling config request");
    backend.config().await
}

/// GET /pods
pub async fn pods<C: ControlPlane>(
    State(backend): State<ApiState<C>>,
    method: Method,
    uri: Uri,
) -> Response {
    info!(%method, path = uri.path(), "handling pods request");
    backend.pods().await
}

/// GET /health
pub async fn health<C: ControlPlane>(State(backend): State<ApiState<C>>) -> Response {
    backend.health().await
}

/// GET /metrics
pub async fn metrics<C: ControlPlane>(State(backend): State<ApiState<C>>) -> Response {
    backend.metrics_exposition().await
}
