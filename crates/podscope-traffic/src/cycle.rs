//! Poll cycles: one sequential pass over the endpoint set.
//!
//! All requests in a cycle share one deadline, fixed when the cycle starts.
//! A failed request is logged and skipped; nothing is retried and the cycle
//! never stops early. Once the deadline passes, the remaining endpoints fail
//! immediately.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::GeneratorConfig;
use crate::probe::{self, HttpClient, RequestError};

/// What happened to one request.
#[derive(Debug)]
pub enum Outcome {
    /// A response arrived, whatever its status.
    Completed { status: u16 },
    /// No response.
    Failed(RequestError),
}

/// Result of one request within a cycle.
#[derive(Debug)]
pub struct RequestOutcome {
    pub endpoint: String,
    pub url: String,
    pub outcome: Outcome,
    pub duration: Duration,
}

impl RequestOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, Outcome::Completed { .. })
    }

    /// Status code, if a response arrived.
    pub fn status(&self) -> Option<u16> {
        match self.outcome {
            Outcome::Completed { status } => Some(status),
            Outcome::Failed(_) => None,
        }
    }
}

/// Everything one cycle did, in request order.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub outcomes: Vec<RequestOutcome>,
}

impl CycleReport {
    /// Requests that got a response.
    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_completed()).count()
    }

    /// Requests that got no response.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.completed()
    }

    /// Completed requests whose status was 400 or above.
    pub fn error_statuses(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status().is_some_and(|s| s >= 400))
            .count()
    }

    /// Endpoints in the order they were requested.
    pub fn endpoints(&self) -> Vec<&str> {
        self.outcomes.iter().map(|o| o.endpoint.as_str()).collect()
    }
}

/// Issues the fixed set of requests against the backend.
pub struct TrafficGenerator {
    client: HttpClient,
    base_url: String,
    endpoints: Vec<String>,
    request_timeout: Duration,
    cycle_timeout: Duration,
}

impl TrafficGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            client: probe::http_client(),
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
            request_timeout: config.request_timeout,
            cycle_timeout: config.cycle_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one cycle: every endpoint once, in order.
    pub async fn run_cycle(&self) -> CycleReport {
        let deadline = Instant::now() + self.cycle_timeout;
        let mut report = CycleReport::default();

        debug!(endpoint_count = self.endpoints.len(), "starting request cycle");

        for endpoint in &self.endpoints {
            let url = format!("{}{}", self.base_url, endpoint);

            let start = Instant::now();
            let result = probe::get(&self.client, &url, self.request_timeout, deadline).await;
            let duration = start.elapsed();
            let duration_ms = duration.as_millis() as u64;

            let outcome = match result {
                Ok(status) => {
                    info!(
                        method = "GET",
                        %url,
                        status_code = status.as_u16(),
                        duration_ms,
                        "request completed"
                    );
                    if status.as_u16() >= 400 {
                        warn!(
                            %url,
                            status_code = status.as_u16(),
                            duration_ms,
                            "request returned error status"
                        );
                    }
                    Outcome::Completed {
                        status: status.as_u16(),
                    }
                }
                Err(e @ RequestError::InvalidUrl { .. }) => {
                    error!(%url, error = %e, "failed to create request");
                    Outcome::Failed(e)
                }
                Err(e) => {
                    warn!(%url, error = %e, duration_ms, "request failed");
                    Outcome::Failed(e)
                }
            };

            report.outcomes.push(RequestOutcome {
                endpoint: endpoint.clone(),
                url,
                outcome,
                duration,
            });
        }

        debug!(
            endpoint_count = self.endpoints.len(),
            completed = report.completed(),
            failed = report.failed(),
            "request cycle completed"
        );
        report
    }
}
