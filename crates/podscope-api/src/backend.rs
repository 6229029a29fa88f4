//! The backend's request handlers.
//!
//! Every handler resolves to one final response, then counts it under its
//! route path and actual status before returning. A control-plane failure
//! returns a 500 straight away and never touches a partial result.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, error, info};

use podscope_cluster::ControlPlane;
use podscope_metrics::{CONTENT_TYPE as PROMETHEUS_CONTENT_TYPE, MetricsRegistry, render_prometheus};

/// Route paths; also the `path` label on the request counter.
pub mod paths {
    pub const ROOT: &str = "/";
    pub const CONFIG: &str = "/config";
    pub const PODS: &str = "/pods";
    pub const HEALTH: &str = "/health";
    pub const METRICS: &str = "/metrics";
}

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// Owns everything a request handler needs.
pub struct Backend<C> {
    cluster: C,
    metrics: Arc<MetricsRegistry>,
    namespace: String,
    configmap_name: String,
}

impl<C: ControlPlane> Backend<C> {
    pub fn new(
        cluster: C,
        metrics: Arc<MetricsRegistry>,
        namespace: impl Into<String>,
        configmap_name: impl Into<String>,
    ) -> Self {
        Self {
            cluster,
            metrics,
            namespace: namespace.into(),
            configmap_name: configmap_name.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn configmap_name(&self) -> &str {
        &self.configmap_name
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// `/`: identity string naming the namespace.
    pub async fn index(&self) -> Response {
        let body = format!("Backend running in namespace: {}\n", self.namespace);
        self.finish(paths::ROOT, text(StatusCode::OK, body)).await
    }

    /// `/config`: the configured ConfigMap's data as a JSON object.
    pub async fn config(&self) -> Response {
        let data = match self
            .cluster
            .fetch_configuration(&self.namespace, &self.configmap_name)
            .await
        {
            Ok(data) => data,
            Err(e) => {
                error!(
                    namespace = %self.namespace,
                    configmap = %self.configmap_name,
                    error = %e,
                    "failed to read configmap"
                );
                let resp = text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to read ConfigMap: {e}\n"),
                );
                return self.finish(paths::CONFIG, resp).await;
            }
        };

        let resp = json(&data);
        if resp.status().is_success() {
            self.metrics.record_configmap_read();
            info!(
                namespace = %self.namespace,
                configmap = %self.configmap_name,
                keys = data.len(),
                "configmap read"
            );
        }
        self.finish(paths::CONFIG, resp).await
    }

    /// `/pods`: every pod in the cluster as a JSON array.
    pub async fn pods(&self) -> Response {
        let pods = match self.cluster.list_workloads().await {
            Ok(pods) => pods,
            Err(e) => {
                error!(error = %e, "failed to list pods");
                let resp = text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to list pods: {e}\n"),
                );
                return self.finish(paths::PODS, resp).await;
            }
        };

        info!(count = pods.len(), "pods listed");
        self.finish(paths::PODS, json(&pods)).await
    }

    /// `/health`: liveness.
    pub async fn health(&self) -> Response {
        debug!("health check");
        self.finish(paths::HEALTH, text(StatusCode::OK, "OK")).await
    }

    /// `/metrics`: Prometheus exposition of the registry.
    ///
    /// The snapshot is taken before this request is counted.
    pub async fn metrics_exposition(&self) -> Response {
        let body = render_prometheus(&self.metrics.snapshot().await);
        let resp = (
            StatusCode::OK,
            [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
            body,
        )
            .into_response();
        self.finish(paths::METRICS, resp).await
    }

    /// Count the response under `path` with its final status.
    async fn finish(&self, path: &str, resp: Response) -> Response {
        let status = resp.status();
        self.metrics.record_request(path, status.as_u16()).await;
        debug!(%path, status = status.as_u16(), "request completed");
        resp
    }
}

fn text(status: StatusCode, body: impl Into<String>) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body.into()).into_response()
}

/// Serialize `value` up front so that the status is final before the
/// response is counted.
fn json<T: Serialize + ?Sized>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, APPLICATION_JSON)
            .body(Body::from(bytes))
            .unwrap_or_else(|e| {
                error!(error = %e, "failed to build JSON response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }),
        Err(e) => {
            error!(error = %e, "failed to encode JSON response");
            text(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode response: {e}\n"),
            )
        }
    }
}
