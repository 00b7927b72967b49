//! Error types for registry selection and configuration

use registrar_core::CoreError;
use registrar_kube::ClusterError;
use thiserror::Error;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Registry selection and configuration errors
#[derive(Debug, Error)]
pub enum RegistryError {
    // ============ Catalog Errors ============
    #[error("Error adding registry {name}: 'option' should be positive")]
    InvalidOption { name: String },

    #[error("Error adding registry {name}: duplicate 'option' value {option}")]
    DuplicateOption { name: String, option: u32 },

    #[error("Error adding registry {name}: duplicate registry name")]
    DuplicateName { name: String },

    #[error("No registry registered for option {option}")]
    UnknownSelection { option: u32 },

    // ============ User Input Errors ============
    #[error("Error reading registry type: {0}")]
    Choice(#[source] CoreError),

    #[error("Invalid registry type: {name}")]
    InvalidRegistryType { name: String },

    #[error("Required flag is missing in batch mode. Flag: {flag}")]
    MissingRequiredFlag { flag: String },

    #[error("Invalid, not supported flag found in batch mode. Flag: {flag}")]
    UnsupportedFlag { flag: String },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Error reading input: {0}")]
    Prompt(#[from] CoreError),

    #[error("Registry {name}: inputs have not been read")]
    InputsNotRead { name: String },

    #[error("Error writing registry menu: {0}")]
    Output(#[source] std::io::Error),

    // ============ Cluster Errors ============
    #[error("Error reading {name}: {source}")]
    ConfigRead {
        name: String,
        #[source]
        source: ClusterError,
    },

    #[error("Error reading {name}: {source}")]
    ConfigDecode {
        name: String,
        #[source]
        source: CoreError,
    },

    #[error("Error rendering {name}: {source}")]
    ConfigRender {
        name: String,
        #[source]
        source: CoreError,
    },

    #[error("Error creating {name}: {source}")]
    ConfigApply {
        name: String,
        #[source]
        source: ClusterError,
    },

    #[error("Error creating registry secret {name}: {source}")]
    SecretApply {
        name: String,
        #[source]
        source: ClusterError,
    },
}

/// Broad classes of failure, used by the CLI to pick an exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The catalog itself is inconsistent
    Catalog,
    /// The user asked for something invalid
    Input,
    /// The cluster or its data could not be read or written
    Cluster,
    /// Local output failed
    Io,
}

impl RegistryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegistryError::InvalidOption { .. }
            | RegistryError::DuplicateOption { .. }
            | RegistryError::DuplicateName { .. }
            | RegistryError::UnknownSelection { .. }
            | RegistryError::InputsNotRead { .. } => ErrorCategory::Catalog,

            RegistryError::Choice(_)
            | RegistryError::InvalidRegistryType { .. }
            | RegistryError::MissingRequiredFlag { .. }
            | RegistryError::UnsupportedFlag { .. }
            | RegistryError::InvalidInput { .. }
            | RegistryError::Prompt(_) => ErrorCategory::Input,

            RegistryError::ConfigRead { .. }
            | RegistryError::ConfigDecode { .. }
            | RegistryError::ConfigRender { .. }
            | RegistryError::ConfigApply { .. }
            | RegistryError::SecretApply { .. } => ErrorCategory::Cluster,

            RegistryError::Output(_) => ErrorCategory::Io,
        }
    }

    /// Remediation hint to show alongside the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            RegistryError::ConfigRead { source, .. } if source.is_not_found() => {
                Some("Install api operator using the command: apictl install api-operator")
            }
            RegistryError::ConfigRead { .. } => {
                Some("Check that the cluster is reachable (--cluster-client, --kubectl)")
            }
            RegistryError::InvalidRegistryType { .. } => {
                Some("Run `registrar list` to see the supported registry types")
            }
            RegistryError::MissingRequiredFlag { .. } | RegistryError::UnsupportedFlag { .. } => {
                Some("Run `registrar list` to see the flags each registry type accepts")
            }
            _ => None,
        }
    }

    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        RegistryError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
