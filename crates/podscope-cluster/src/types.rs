//! Records read from the control plane.

use std::collections::BTreeMap;

/// Contents of a ConfigMap's `data` section, key → value.
///
/// A `BTreeMap` keeps JSON output ordered by key.
pub type ConfigData = BTreeMap<String, String>;

/// A workload instance as returned by the control plane.
///
/// Only re-serialized, never inspected beyond logging the count.
pub type WorkloadRecord = k8s_openapi::api::core::v1::Pod;
