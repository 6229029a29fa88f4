//! Control-plane access.
//!
//! `ControlPlane` is the seam the request router depends on. The real
//! implementation talks to the Kubernetes API server through `kube`; tests
//! substitute an in-memory implementation.

use std::future::Future;

use k8s_openapi::api::core::v1::{ConfigMap, Pod};
use kube::api::ListParams;
use kube::{Api, Client, Config};
use tracing::debug;

use crate::error::{ClusterError, ClusterResult};
use crate::types::{ConfigData, WorkloadRecord};

/// Read-only operations against the cluster control plane.
///
/// Implementations never retry. Dropping a returned future cancels the
/// underlying call.
pub trait ControlPlane: Send + Sync + 'static {
    /// Fetch the `data` section of ConfigMap `name` in `namespace`.
    ///
    /// Both arguments must be non-empty. The mapping is returned exactly as
    /// stored; a ConfigMap without data yields an empty mapping.
    fn fetch_configuration(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = ClusterResult<ConfigData>> + Send;

    /// List pods across all namespaces.
    fn list_workloads(&self) -> impl Future<Output = ClusterResult<Vec<WorkloadRecord>>> + Send;
}

/// Reject empty namespace or object names before touching the network.
pub(crate) fn validate_object_ref(namespace: &str, name: &str) -> ClusterResult<()> {
    if namespace.is_empty() {
        return Err(ClusterError::InvalidArgument(
            "namespace must not be empty".to_string(),
        ));
    }
    if name.is_empty() {
        return Err(ClusterError::InvalidArgument(
            "configmap name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// `ControlPlane` backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeControlPlane {
    client: Client,
}

impl KubeControlPlane {
    /// Build a client from the pod's service account credentials.
    ///
    /// Must be called from within a tokio runtime.
    pub fn in_cluster() -> ClusterResult<Self> {
        let config = Config::incluster().map_err(|e| ClusterError::Credentials(e.to_string()))?;
        Self::from_config(config)
    }

    /// Build a client from an explicit configuration.
    pub fn from_config(config: Config) -> ClusterResult<Self> {
        let client = Client::try_from(config).map_err(|e| ClusterError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl ControlPlane for KubeControlPlane {
    async fn fetch_configuration(&self, namespace: &str, name: &str) -> ClusterResult<ConfigData> {
        validate_object_ref(namespace, name)?;

        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        let cm = api
            .get(name)
            .await
            .map_err(|e| ClusterError::Request(e.to_string()))?;

        let data = cm.data.unwrap_or_default();
        debug!(%namespace, configmap = %name, keys = data.len(), "configmap fetched");
        Ok(data)
    }

    async fn list_workloads(&self) -> ClusterResult<Vec<WorkloadRecord>> {
        let api: Api<Pod> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| ClusterError::Request(e.to_string()))?;

        debug!(count = list.items.len(), "pods listed");
        Ok(list.items)
    }
}
