//! Controller config update
//!
//! Read-modify-apply of the operator's controller config map. Nothing touches
//! the cluster until the final apply, so a failure at any earlier step leaves
//! the cluster as it was.

use registrar_core::{ControllerConfigMap, OperatorTarget};
use registrar_kube::{CONFIG_MAP_KIND, Cluster};
use tracing::{debug, info};

use crate::error::{RegistryError, Result};

/// Record `registry_type` and `repository` in the controller config map
pub async fn update_controller_config(
    cluster: &dyn Cluster,
    target: &OperatorTarget,
    registry_type: &str,
    repository: &str,
) -> Result<()> {
    let name = &target.config_map;

    let yaml = cluster
        .get_yaml(CONFIG_MAP_KIND, name, &target.namespace)
        .await
        .map_err(|source| RegistryError::ConfigRead {
            name: name.clone(),
            source,
        })?;

    let mut config =
        ControllerConfigMap::from_yaml(&yaml).map_err(|source| RegistryError::ConfigDecode {
            name: name.clone(),
            source,
        })?;

    debug!(
        previous_type = ?config.data.registry_type,
        previous_repository = ?config.data.repository,
        "updating controller config"
    );
    config.set_registry(registry_type, repository);

    let rendered = config
        .to_yaml()
        .map_err(|source| RegistryError::ConfigRender {
            name: name.clone(),
            source,
        })?;

    cluster
        .apply_yaml(&rendered)
        .await
        .map_err(|source| RegistryError::ConfigApply {
            name: name.clone(),
            source,
        })?;

    info!(
        config_map = %name,
        namespace = %target.namespace,
        registry_type,
        repository,
        "controller config updated"
    );
    Ok(())
}
