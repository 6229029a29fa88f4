//! In-memory control plane for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::{ControlPlane, validate_object_ref};
use crate::error::{ClusterError, ClusterResult};
use crate::types::{ConfigData, WorkloadRecord};

#[derive(Default)]
struct FakeState {
    configs: HashMap<(String, String), ConfigData>,
    workloads: Vec<WorkloadRecord>,
    failure: Option<String>,
}

/// A `ControlPlane` whose contents are set by the test.
///
/// Clones share state, so a test can keep a handle and mutate the store
/// after handing a clone to the router.
#[derive(Clone, Default)]
pub struct FakeControlPlane {
    state: Arc<Mutex<FakeState>>,
    calls: Arc<AtomicU64>,
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store (or replace) a ConfigMap.
    pub fn put_config(&self, namespace: &str, name: &str, data: ConfigData) {
        self.lock()
            .configs
            .insert((namespace.to_string(), name.to_string()), data);
    }

    /// Builder form of [`put_config`](Self::put_config).
    pub fn with_config(self, namespace: &str, name: &str, data: ConfigData) -> Self {
        self.put_config(namespace, name, data);
        self
    }

    /// Replace the pod list.
    pub fn with_workloads(self, workloads: Vec<WorkloadRecord>) -> Self {
        self.lock().workloads = workloads;
        self
    }

    /// Make every subsequent call fail with `message`.
    pub fn fail_with(&self, message: &str) {
        self.lock().failure = Some(message.to_string());
    }

    /// Undo [`fail_with`](Self::fail_with).
    pub fn recover(&self) {
        self.lock().failure = None;
    }

    /// Number of calls made through the `ControlPlane` trait.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl ControlPlane for FakeControlPlane {
    async fn fetch_configuration(&self, namespace: &str, name: &str) -> ClusterResult<ConfigData> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        validate_object_ref(namespace, name)?;

        let state = self.lock();
        if let Some(msg) = &state.failure {
            return Err(ClusterError::Request(msg.clone()));
        }
        state
            .configs
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| {
                ClusterError::Request(format!(
                    "configmaps \"{name}\" not found in namespace \"{namespace}\""
                ))
            })
    }

    async fn list_workloads(&self) -> ClusterResult<Vec<WorkloadRecord>> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let state = self.lock();
        if let Some(msg) = &state.failure {
            return Err(ClusterError::Request(msg.clone()));
        }
        Ok(state.workloads.clone())
    }
}
