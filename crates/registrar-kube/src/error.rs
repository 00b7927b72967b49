//! Error types for registrar-kube

use thiserror::Error;

/// Result type for cluster operations
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors that can occur while reading from or applying to the cluster
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClusterError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// The cluster CLI could not be started
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The cluster CLI ran and reported failure
    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Resource does not exist
    #[error("{kind} '{name}' not found in namespace '{namespace}'")]
    NotFound {
        kind: String,
        name: String,
        namespace: String,
    },

    /// Resource kind this client cannot handle
    #[error("unsupported resource kind: {0}")]
    UnsupportedKind(String),

    /// Invalid manifest
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// The cluster refused the object
    #[error("{kind} '{name}' rejected: {message}")]
    Rejected {
        kind: String,
        name: String,
        message: String,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_yaml::Error> for ClusterError {
    fn from(e: serde_yaml::Error) -> Self {
        ClusterError::Serialization(e.to_string())
    }
}

impl From<registrar_core::CoreError> for ClusterError {
    fn from(e: registrar_core::CoreError) -> Self {
        ClusterError::Serialization(e.to_string())
    }
}

impl ClusterError {
    /// Check if the resource is missing
    pub fn is_not_found(&self) -> bool {
        match self {
            ClusterError::NotFound { .. } => true,
            ClusterError::Api(kube::Error::Api(resp)) => resp.code == 404,
            _ => false,
        }
    }
}
