//! Typed view of the operator's controller config map
//!
//! Only `data.registryType` and `data.dockerRegistry` are typed. Every other
//! key, at the top level or inside `data`, is kept as-is so the map survives a
//! read-modify-apply cycle without losing fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::Result;

/// Key under `data` holding the registry type
pub const REGISTRY_TYPE_KEY: &str = "registryType";

/// Key under `data` holding the image repository
pub const REPOSITORY_KEY: &str = "dockerRegistry";

/// Controller config map as read from the cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfigMap {
    #[serde(default)]
    pub data: ControllerConfigData,

    /// apiVersion, kind, metadata and anything else
    #[serde(flatten)]
    pub other: IndexMap<String, Value>,
}

/// The `data` section of the controller config map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfigData {
    #[serde(
        rename = "registryType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub registry_type: Option<String>,

    #[serde(
        rename = "dockerRegistry",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub repository: Option<String>,

    #[serde(flatten)]
    pub other: IndexMap<String, Value>,
}

impl ControllerConfigMap {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Overwrite the registry type and repository
    pub fn set_registry(&mut self, registry_type: impl Into<String>, repository: impl Into<String>) {
        self.data.registry_type = Some(registry_type.into());
        self.data.repository = Some(repository.into());
    }
}
