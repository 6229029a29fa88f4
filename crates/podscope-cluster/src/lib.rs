//! podscope-cluster: the backend's only contact with the cluster API.
//!
//! Two reads are supported: the `data` section of one ConfigMap, and the
//! cluster-wide pod list. Neither is cached or retried.
//!
//! # Architecture
//!
//! ```text
//! ControlPlane (trait)
//!   ├── KubeControlPlane  ← kube::Client, in-cluster service account
//!   └── FakeControlPlane  ← in-memory, behind the `fake` feature
//! ```

pub mod client;
pub mod error;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
pub mod types;

pub use client::{ControlPlane, KubeControlPlane};
pub use error::{ClusterError, ClusterResult};
#[cfg(any(test, feature = "fake"))]
pub use fake::FakeControlPlane;
pub use types::{ConfigData, WorkloadRecord};
