//! Metrics registry: process-lifetime request and read counters.
//!
//! Counters are atomics. The map from (path, status) to counter sits behind
//! an `RwLock` that is only write-locked the first time a label pair is
//! seen, so concurrent handlers increment without contending.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::debug;

/// Label pair for the request counter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestKey {
    /// Route path the request was served under, e.g. `/config`.
    pub path: String,
    /// Final HTTP status code.
    pub status: u16,
}

/// One row of a request-counter snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCount {
    pub path: String,
    pub status: u16,
    pub count: u64,
}

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Request totals, ordered by (path, status).
    pub requests: Vec<RequestCount>,
    /// Successful configmap reads.
    pub configmap_reads: u64,
}

/// Counters shared by every request handler.
///
/// Values only grow; they reset when the process restarts.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// (path, status) → total requests.
    requests: RwLock<BTreeMap<RequestKey, Arc<AtomicU64>>>,
    /// Total successful configmap reads.
    configmap_reads: AtomicU64,
}

impl MetricsRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished request.
    pub async fn record_request(&self, path: &str, status: u16) {
        let key = RequestKey {
            path: path.to_string(),
            status,
        };

        {
            let requests = self.requests.read().await;
            if let Some(counter) = requests.get(&key) {
                counter.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }

        let mut requests = self.requests.write().await;
        requests
            .entry(key)
            .or_insert_with(|| {
                debug!(%path, status, "new request counter");
                Arc::new(AtomicU64::new(0))
            })
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Count one successful configmap read.
    pub fn record_configmap_read(&self) {
        self.configmap_reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Current total for a (path, status) pair; 0 if never seen.
    pub async fn request_count(&self, path: &str, status: u16) -> u64 {
        let key = RequestKey {
            path: path.to_string(),
            status,
        };
        let requests = self.requests.read().await;
        requests
            .get(&key)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Current number of successful configmap reads.
    pub fn configmap_reads(&self) -> u64 {
        self.configmap_reads.load(Ordering::Relaxed)
    }

    /// Copy every counter without resetting anything.
    pub async fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests.read().await;
        MetricsSnapshot {
            requests: requests
                .iter()
                .map(|(key, counter)| RequestCount {
                    path: key.path.clone(),
                    status: key.status,
                    count: counter.load(Ordering::Relaxed),
                })
                .collect(),
            configmap_reads: self.configmap_reads(),
        }
    }
}
