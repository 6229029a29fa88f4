//! podscope-metrics: counters for the backend service.
//!
//! Tracks HTTP request totals by (path, status) and successful configmap
//! reads, and renders them in Prometheus text format for `/metrics`.
//!
//! # Architecture
//!
//! ```text
//! MetricsRegistry  (owned by the backend, shared via Arc)
//!   ├── record_request()        ← once per finished request
//!   ├── record_configmap_read() ← once per successful /config
//!   └── snapshot() → MetricsSnapshot
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics
//! ```

pub mod prometheus;
pub mod registry;

pub use prometheus::{CONTENT_TYPE, render_prometheus};
pub use registry::{MetricsRegistry, MetricsSnapshot, RequestCount, RequestKey};
