//! Generator settings: flags, environment, defaults.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::{info, warn};

use podscope_core::LogFormat;

pub const DEFAULT_BACKEND_URL: &str = "http://backend-prod:80";
pub const DEFAULT_INTERVAL: &str = "5s";

/// Timeout for a single request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline shared by every request in one cycle.
pub const CYCLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Paths requested each cycle, in order.
pub const ENDPOINTS: [&str; 5] = ["/", "/health", "/config", "/pods", "/metrics"];

/// Fatal configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid INTERVAL '{value}': {reason}")]
    Interval { value: String, reason: String },
}

#[derive(Parser, Debug)]
#[command(
    name = "traffic-gen",
    about = "podscope traffic generator: polls the backend on a fixed interval",
    version
)]
pub struct Cli {
    /// Base URL of the backend service; must be `http://`.
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Time between cycles, e.g. `5s`, `500ms`, `1m30s`.
    #[arg(long, env = "INTERVAL")]
    pub interval: Option<String>,

    /// Log output format: json or text.
    #[arg(long, env = "LOG_FORMAT", default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

/// Settings after defaults are applied and the interval is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub backend_url: String,
    pub interval: Duration,
    pub endpoints: Vec<String>,
    pub request_timeout: Duration,
    pub cycle_timeout: Duration,
}

impl GeneratorConfig {
    /// Apply defaults and parse the interval.
    ///
    /// The interval is the only setting that can fail.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let backend_url = match non_empty(cli.backend_url.as_deref()) {
            Some(url) => url.to_string(),
            None => {
                warn!(backend_url = DEFAULT_BACKEND_URL, "BACKEND_URL not set, using default");
                DEFAULT_BACKEND_URL.to_string()
            }
        };

        let interval = match non_empty(cli.interval.as_deref()) {
            Some(raw) => raw,
            None => {
                info!(interval = DEFAULT_INTERVAL, "INTERVAL not set, using default");
                DEFAULT_INTERVAL
            }
        };
        let interval = parse_interval(interval)?;

        Ok(Self {
            backend_url,
            interval,
            endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            request_timeout: REQUEST_TIMEOUT,
            cycle_timeout: CYCLE_TIMEOUT,
        })
    }
}

/// Parse a duration string such as `5s`, `250ms` or `1m30s`.
///
/// Zero is rejected; a ticker needs a positive period.
pub fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    let interval = humantime::parse_duration(raw.trim()).map_err(|e| ConfigError::Interval {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    if interval.is_zero() {
        return Err(ConfigError::Interval {
            value: raw.to_string(),
            reason: "interval must be greater than zero".to_string(),
        });
    }
    Ok(interval)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
