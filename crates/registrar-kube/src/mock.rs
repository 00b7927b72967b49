//! Mock cluster for testing
//!
//! Holds resources in memory as YAML text, records every call in order, and
//! can be told to reject applies of a given kind.

use async_trait::async_trait;
use serde_yaml::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::cluster::{Cluster, normalize_kind};
use crate::error::{ClusterError, Result};

/// A call made against the mock, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterCall {
    Get {
        kind: String,
        name: String,
        namespace: String,
    },
    Apply {
        kind: String,
        name: String,
        namespace: String,
    },
}

type Key = (String, String, String);

/// In-memory cluster
#[derive(Clone, Default)]
pub struct MockCluster {
    /// (kind, namespace, name) -> manifest
    resources: Arc<RwLock<HashMap<Key, String>>>,
    calls: Arc<RwLock<Vec<ClusterCall>>>,
    rejected_kinds: Arc<RwLock<HashSet<String>>>,
}

impl MockCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a resource
    pub fn with_resource(self, kind: &str, namespace: &str, name: &str, yaml: &str) -> Self {
        self.resources
            .write()
            .unwrap()
            .insert(key(kind, namespace, name), yaml.to_string());
        self
    }

    /// Make every apply of `kind` fail
    pub fn reject_applies_of(self, kind: &str) -> Self {
        self.rejected_kinds
            .write()
            .unwrap()
            .insert(normalize_kind(kind));
        self
    }

    /// Stored manifest of a resource
    pub fn resource(&self, kind: &str, namespace: &str, name: &str) -> Option<String> {
        self.resources
            .read()
            .unwrap()
            .get(&key(kind, namespace, name))
            .cloned()
    }

    /// Every call so far, oldest first
    pub fn calls(&self) -> Vec<ClusterCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of apply calls so far
    pub fn apply_count(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, ClusterCall::Apply { .. }))
            .count()
    }
}

fn key(kind: &str, namespace: &str, name: &str) -> Key {
    (normalize_kind(kind), namespace.to_string(), name.to_string())
}

/// Pull kind, name and namespace out of a manifest
fn identify(manifest: &str) -> Result<Key> {
    let doc: Value = serde_yaml::from_str(manifest)?;
    let field = |value: &Value, what: &str| -> Result<String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ClusterError::InvalidManifest(format!("missing {}", what)))
    };
    let kind = field(&doc["kind"], "kind")?;
    let name = field(&doc["metadata"]["name"], "metadata.name")?;
    let namespace = field(&doc["metadata"]["namespace"], "metadata.namespace")?;
    Ok(key(&kind, &namespace, &name))
}

#[async_trait]
impl Cluster for MockCluster {
    async fn get_yaml(&self, kind: &str, name: &str, namespace: &str) -> Result<String> {
        let (kind, namespace, name) = key(kind, namespace, name);
        self.calls.write().unwrap().push(ClusterCall::Get {
            kind: kind.clone(),
            name: name.clone(),
            namespace: namespace.clone(),
        });

        self.resources
            .read()
            .unwrap()
            .get(&(kind.clone(), namespace.clone(), name.clone()))
            .cloned()
            .ok_or(ClusterError::NotFound {
                kind,
                name,
                namespace,
            })
    }

    async fn apply_yaml(&self, manifest: &str) -> Result<()> {
        let (kind, namespace, name) = identify(manifest)?;
        self.calls.write().unwrap().push(ClusterCall::Apply {
            kind: kind.clone(),
            name: name.clone(),
            namespace: namespace.clone(),
        });

        if self.rejected_kinds.read().unwrap().contains(&kind) {
            return Err(ClusterError::Rejected {
                kind,
                name,
                message: "rejected by mock".to_string(),
            });
        }

        self.resources
            .write()
            .unwrap()
            .insert((kind, namespace, name), manifest.to_string());
        Ok(())
    }
}
