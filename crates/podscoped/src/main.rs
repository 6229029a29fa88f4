//! podscoped: the podscope backend service.
//!
//! Serves cluster introspection endpoints backed by the Kubernetes API:
//! - `/` identity, `/health` liveness
//! - `/config` ConfigMap data, `/pods` cluster-wide pod list
//! - `/metrics` Prometheus counters
//!
//! # Usage
//!
//! ```text
//! POD_NAMESPACE=prod CONFIGMAP_NAME=app-config PORT=8080 podscoped
//! ```

mod config;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use podscope_api::{Backend, build_router};
use podscope_cluster::KubeControlPlane;
use podscope_metrics::MetricsRegistry;

use crate::config::{BackendConfig, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = podscope_core::logging::init(cli.log_format, "info") {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    // Fatal errors are logged where they happen; only the exit code is left.
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    info!("starting backend application");
    let config = BackendConfig::resolve(cli);

    // ── Control-plane client ───────────────────────────────────

    let cluster = KubeControlPlane::in_cluster().inspect_err(|e| {
        error!(error = %e, "failed to initialize Kubernetes client");
    })?;
    info!(namespace = %config.namespace, "kubernetes client initialized");

    // ── Router ─────────────────────────────────────────────────

    let metrics = Arc::new(MetricsRegistry::new());
    let backend = Backend::new(
        cluster,
        metrics,
        config.namespace.clone(),
        config.configmap_name.clone(),
    );
    let router = build_router(Arc::new(backend));

    // ── HTTP server ────────────────────────────────────────────

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, port = config.port, "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await.inspect_err(|e| {
        error!(%addr, error = %e, "failed to bind listener");
    })?;

    axum::serve(listener, router)
        .with_graceful_shutdown(podscope_core::shutdown::signal())
        .await
        .inspect_err(|e| {
            error!(error = %e, "HTTP server failed");
        })?;

    info!("backend stopped");
    Ok(())
}
