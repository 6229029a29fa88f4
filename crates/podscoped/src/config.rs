//! Backend settings: flags, environment, defaults.

use clap::Parser;
use tracing::{info, warn};

use podscope_core::LogFormat;

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_CONFIGMAP_NAME: &str = "app-config";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(
    name = "podscoped",
    about = "podscope backend: cluster introspection endpoints",
    version
)]
pub struct Cli {
    /// Namespace to read the ConfigMap from.
    #[arg(long, env = "POD_NAMESPACE")]
    pub namespace: Option<String>,

    /// Name of the ConfigMap served by /config.
    #[arg(long, env = "CONFIGMAP_NAME")]
    pub configmap_name: Option<String>,

    /// Port to listen on.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Log output format: json or text.
    #[arg(long, env = "LOG_FORMAT", default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

/// Settings after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub namespace: String,
    pub configmap_name: String,
    pub port: u16,
}

impl BackendConfig {
    /// Fill unset values with defaults, logging each one that was applied.
    ///
    /// Never fails: a missing value is a warning, not a startup error.
    pub fn resolve(cli: &Cli) -> Self {
        let namespace = match non_empty(cli.namespace.as_deref()) {
            Some(ns) => ns.to_string(),
            None => {
                warn!(namespace = DEFAULT_NAMESPACE, "POD_NAMESPACE not set, using default namespace");
                DEFAULT_NAMESPACE.to_string()
            }
        };

        let configmap_name = match non_empty(cli.configmap_name.as_deref()) {
            Some(name) => name.to_string(),
            None => {
                warn!(configmap = DEFAULT_CONFIGMAP_NAME, "CONFIGMAP_NAME not set, using default");
                DEFAULT_CONFIGMAP_NAME.to_string()
            }
        };

        let port = cli.port.unwrap_or_else(|| {
            info!(port = DEFAULT_PORT, "PORT not set, using default port");
            DEFAULT_PORT
        });

        Self {
            namespace,
            configmap_name,
            port,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use podscope_api::{Backend, build_router};
    use podscope_cluster::{ConfigData, FakeControlPlane};
    use podscope_metrics::MetricsRegistry;
    use tower::ServiceExt;

    fn cli(namespace: Option<&str>, configmap_name: Option<&str>, port: Option<u16>) -> Cli {
        Cli {
            namespace: namespace.map(String::from),
            configmap_name: configmap_name.map(String::from),
            port,
            log_format: LogFormat::Json,
        }
    }

    #[test]
    fn defaults_when_unset() {
        let config = BackendConfig::resolve(&cli(None, None, None));
        assert_eq!(
            config,
            BackendConfig {
                namespace: "default".to_string(),
                configmap_name: "app-config".to_string(),
                port: 8080,
            }
        );
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = BackendConfig::resolve(&cli(Some(""), Some("  "), None));
        assert_eq!(config.namespace, "default");
        assert_eq!(config.configmap_name, "app-config");
    }

    #[test]
    fn explicit_values_win() {
        let config = BackendConfig::resolve(&cli(Some("prod"), Some("backend-config"), Some(9090)));
        assert_eq!(config.namespace, "prod");
        assert_eq!(config.configmap_name, "backend-config");
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from([
            "podscoped",
            "--namespace",
            "team-a",
            "--configmap-name",
            "cfg",
            "--port",
            "9000",
            "--log-format",
            "text",
        ])
        .unwrap();
        assert_eq!(cli.namespace.as_deref(), Some("team-a"));
        assert_eq!(cli.configmap_name.as_deref(), Some("cfg"));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[tokio::test]
    async fn unset_environment_serves_default_configmap() {
        let stored: ConfigData = [("APP_NAME", "x"), ("ENVIRONMENT", "prod"), ("LOG_LEVEL", "info")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let cp = FakeControlPlane::new().with_config("default", "app-config", stored.clone());

        let config = BackendConfig::resolve(&cli(None, None, None));
        let metrics = Arc::new(MetricsRegistry::new());
        let backend = Backend::new(cp, metrics.clone(), config.namespace, config.configmap_name);
        let router = build_router(Arc::new(backend));

        let reads_before = metrics.configmap_reads();
        let req = Request::builder().uri("/config").body(Body::empty()).unwrap();
        let resp = router.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: ConfigData = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, stored);
        assert_eq!(metrics.configmap_reads(), reads_before + 1);
    }
}
