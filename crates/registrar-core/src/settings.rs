//! Registrar settings
//!
//! Stored in `~/.config/registrar/config.yaml`. Every field is optional in the
//! file; missing fields take the defaults of the API operator install.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Namespace the API operator is installed in
pub const DEFAULT_NAMESPACE: &str = "wso2-system";

/// Controller config map written by `change`
pub const DEFAULT_CONFIG_MAP: &str = "controller-config";

/// Secret holding the registry credentials
pub const DEFAULT_SECRET_NAME: &str = "registry-credentials";

/// Where the operator's configuration lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorTarget {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_config_map")]
    pub config_map: String,

    #[serde(default = "default_secret_name")]
    pub secret_name: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_config_map() -> String {
    DEFAULT_CONFIG_MAP.to_string()
}

fn default_secret_name() -> String {
    DEFAULT_SECRET_NAME.to_string()
}

impl Default for OperatorTarget {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            config_map: default_config_map(),
            secret_name: default_secret_name(),
        }
    }
}

/// How to talk to the cluster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterClientKind {
    /// Shell out to `kubectl`
    #[default]
    Kubectl,

    /// Talk to the API server directly
    Api,
}

impl FromStr for ClusterClientKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "kubectl" => Ok(Self::Kubectl),
            "api" => Ok(Self::Api),
            other => Err(CoreError::InvalidSettings {
                message: format!("unknown cluster client '{}' (expected kubectl or api)", other),
            }),
        }
    }
}

impl fmt::Display for ClusterClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kubectl => write!(f, "kubectl"),
            Self::Api => write!(f, "api"),
        }
    }
}

/// Settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(flatten)]
    pub target: OperatorTarget,

    #[serde(default)]
    pub cluster_client: ClusterClientKind,

    /// kubectl binary used by the kubectl client
    #[serde(default = "default_kubectl")]
    pub kubectl: String,
}

fn default_kubectl() -> String {
    "kubectl".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: OperatorTarget::default(),
            cluster_client: ClusterClientKind::default(),
            kubectl: default_kubectl(),
        }
    }
}

impl Settings {
    /// Load settings from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Get default settings path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| CoreError::InvalidSettings {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("registrar").join("config.yaml"))
    }
}
