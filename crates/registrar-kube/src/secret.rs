//! Registry credential secrets

use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use registrar_core::DockerConfig;
use std::collections::BTreeMap;

use crate::error::Result;

/// Secret type understood by kubelet for image pulls
pub const DOCKER_CONFIG_JSON_TYPE: &str = "kubernetes.io/dockerconfigjson";

/// Data key holding the docker config
pub const DOCKER_CONFIG_JSON_KEY: &str = ".dockerconfigjson";

const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Build an image-pull secret carrying `config`
///
/// `registry` is recorded as a label so the secret can be traced back to the
/// backend that produced it.
pub fn docker_registry_secret(
    name: &str,
    namespace: &str,
    registry: &str,
    config: &DockerConfig,
) -> Result<Secret> {
    let mut labels = BTreeMap::new();
    labels.insert(MANAGED_BY_LABEL.to_string(), "registrar".to_string());
    labels.insert("registrar.io/registry-type".to_string(), registry.to_string());

    let mut data = BTreeMap::new();
    data.insert(
        DOCKER_CONFIG_JSON_KEY.to_string(),
        ByteString(config.to_json()?.into_bytes()),
    );

    Ok(Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        type_: Some(DOCKER_CONFIG_JSON_TYPE.to_string()),
        data: Some(data),
        ..Default::default()
    })
}

/// Render a secret as a YAML manifest
pub fn render_secret(secret: &Secret) -> Result<String> {
    Ok(serde_yaml::to_string(secret)?)
}
