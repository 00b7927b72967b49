//! The cluster collaborator

use async_trait::async_trait;

use crate::error::Result;

/// Kind name used to read the controller config map
pub const CONFIG_MAP_KIND: &str = "configmap";

/// Kind name used for credential secrets
pub const SECRET_KIND: &str = "secret";

/// What registrar needs from a cluster
///
/// Both operations are single blocking round-trips from the caller's point of
/// view: nothing is retried, and a failure is returned as-is.
#[async_trait]
pub trait Cluster: Send + Sync {
    /// Fetch one namespaced resource rendered as YAML
    async fn get_yaml(&self, kind: &str, name: &str, namespace: &str) -> Result<String>;

    /// Create or update the resource described by a YAML document
    async fn apply_yaml(&self, manifest: &str) -> Result<()>;
}

/// Map the common spellings of a kind onto its canonical lowercase name
pub(crate) fn normalize_kind(kind: &str) -> String {
    match kind.to_ascii_lowercase().as_str() {
        "configmap" | "configmaps" | "cm" => CONFIG_MAP_KIND.to_string(),
        "secret" | "secrets" => SECRET_KIND.to_string(),
        other => other.to_string(),
    }
}
