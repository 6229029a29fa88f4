//! podscope-api: HTTP surface of the backend service.
//!
//! Introspection endpoints over the cluster control plane, each counted in
//! the injected `MetricsRegistry`.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Identity string with the namespace |
//! | GET | `/config` | ConfigMap data as JSON |
//! | GET | `/pods` | Cluster-wide pod list as JSON |
//! | GET | `/health` | Liveness, `OK` |
//! | GET | `/metrics` | Prometheus exposition |
//!
//! Unmatched paths are served by `/` and counted under it. Routes accept any
//! method.

pub mod backend;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::any;

use podscope_cluster::ControlPlane;

pub use backend::{Backend, paths};
pub use handlers::ApiState;

/// Build the backend router around `backend`.
pub fn build_router<C: ControlPlane>(backend: Arc<Backend<C>>) -> Router {
    Router::new()
        .route(paths::ROOT, any(handlers::index::<C>))
        .route(paths::CONFIG, any(handlers::config::<C>))
        .route(paths::PODS, any(handlers::pods::<C>))
        .route(paths::HEALTH, any(handlers::health::<C>))
        .route(paths::METRICS, any(handlers::metrics::<C>))
        .fallback(handlers::index::<C>)
        .with_state(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use podscope_cluster::FakeControlPlane;
    use podscope_metrics::MetricsRegistry;
    use tower::ServiceExt;

    fn router() -> (Router, Arc<MetricsRegistry>) {
        let metrics = Arc::new(MetricsRegistry::new());
        let backend = Backend::new(FakeControlPlane::new(), metrics.clone(), "default", "app-config");
        (build_router(Arc::new(backend)), metrics)
    }

    async fn get(router: Router, uri: &str) -> StatusCode {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        router.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn every_route_is_mounted() {
        let (router, metrics) = router();
        for path in [paths::ROOT, paths::HEALTH, paths::METRICS] {
            assert_eq!(get(router.clone(), path).await, StatusCode::OK, "{path}");
        }
        // No ConfigMap stored in the fake: the read fails.
        assert_eq!(get(router.clone(), paths::CONFIG).await, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(get(router, paths::PODS).await, StatusCode::OK);

        assert_eq!(metrics.request_count("/config", 500).await, 1);
        assert_eq!(metrics.request_count("/pods", 200).await, 1);
    }

    #[tokio::test]
    async fn unknown_path_falls_back_to_root() {
        let (router, metrics) = router();
        assert_eq!(get(router, "/does/not/exist").await, StatusCode::OK);
        assert_eq!(metrics.request_count("/", 200).await, 1);
        assert_eq!(metrics.request_count("/does/not/exist", 200).await, 0);
    }
}
