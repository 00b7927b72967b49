//! Cluster access through the Kubernetes API server
//!
//! Uses the default kubeconfig / in-cluster configuration and Server-Side
//! Apply, so applying the same manifest twice is a no-op. Only the kinds
//! registrar writes (ConfigMaps and Secrets) are supported.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::{
    Client,
    api::{Api, DynamicObject, Patch, PatchParams},
    discovery::ApiResource,
};
use tracing::{debug, info};

use crate::cluster::{CONFIG_MAP_KIND, Cluster, SECRET_KIND, normalize_kind};
use crate::error::{ClusterError, Result};

/// Field manager name for Server-Side Apply
const FIELD_MANAGER: &str = "registrar";

/// API server client
pub struct KubeApi {
    client: Client,
}

impl KubeApi {
    /// Connect using the default configuration
    pub async fn new() -> Result<Self> {
        let client = Client::try_default().await?;
        Ok(Self { client })
    }

    /// Create with an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, kind: &str, namespace: &str) -> Result<Api<DynamicObject>> {
        let resource = api_resource(kind)?;
        Ok(Api::namespaced_with(
            self.client.clone(),
            namespace,
            &resource,
        ))
    }
}

/// Resolve a kind name to its API resource
fn api_resource(kind: &str) -> Result<ApiResource> {
    match normalize_kind(kind).as_str() {
        CONFIG_MAP_KIND => Ok(ApiResource::erase::<ConfigMap>(&())),
        SECRET_KIND => Ok(ApiResource::erase::<Secret>(&())),
        other => Err(ClusterError::UnsupportedKind(other.to_string())),
    }
}

/// Strip server-managed metadata so the object can be sent as an apply patch
fn prepare_for_apply(obj: &mut DynamicObject) {
    obj.metadata.managed_fields = None;
    obj.metadata.resource_version = None;
    obj.metadata.uid = None;
    obj.metadata.creation_timestamp = None;
}

#[async_trait]
impl Cluster for KubeApi {
    async fn get_yaml(&self, kind: &str, name: &str, namespace: &str) -> Result<String> {
        debug!(kind, name, namespace, "getting resource");
        match self.api(kind, namespace)?.get(name).await {
            Ok(obj) => Ok(serde_yaml::to_string(&obj)?),
            Err(kube::Error::Api(e)) if e.code == 404 => Err(ClusterError::NotFound {
                kind: kind.to_string(),
                name: name.to_string(),
                namespace: namespace.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn apply_yaml(&self, manifest: &str) -> Result<()> {
        let mut obj: DynamicObject = serde_yaml::from_str(manifest)?;

        let kind = obj
            .types
            .as_ref()
            .map(|t| t.kind.clone())
            .ok_or_else(|| {
                ClusterError::InvalidManifest("resource missing apiVersion or kind".to_string())
            })?;
        let name = obj.metadata.name.clone().ok_or_else(|| {
            ClusterError::InvalidManifest("resource missing metadata.name".to_string())
        })?;
        let namespace = obj.metadata.namespace.clone().ok_or_else(|| {
            ClusterError::InvalidManifest(format!("{} '{}' has no namespace", kind, name))
        })?;

        prepare_for_apply(&mut obj);

        let params = PatchParams::apply(FIELD_MANAGER).force();
        self.api(&kind, &namespace)?
            .patch(&name, &params, &Patch::Apply(&obj))
            .await?;

        info!(kind = %kind, name = %name, namespace = %namespace, "applied");
        Ok(())
    }
}
