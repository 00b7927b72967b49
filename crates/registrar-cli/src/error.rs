//! CLI error types with exit code handling
//!
//! Every library error is folded into [`CliError`], which knows its exit code
//! and carries the remediation hint shown by miette.

use miette::Diagnostic;
use registrar_catalog::{ErrorCategory, RegistryError};
use registrar_core::CoreError;
use registrar_kube::ClusterError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Invalid combination of arguments
    #[error("{message}")]
    #[diagnostic(code(registrar::cli::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Registry type, flags or input values rejected
    #[error("{message}")]
    #[diagnostic(code(registrar::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Reading or writing the operator's cluster objects failed
    #[error("{message}")]
    #[diagnostic(code(registrar::cli::cluster))]
    Cluster {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(registrar::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(registrar::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Cluster { .. } => exit_codes::CLUSTER_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create a usage error with help text
    pub fn usage_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: None,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<RegistryError> for CliError {
    fn from(err: RegistryError) -> Self {
        let message = err.to_string();
        let help = err.hint().map(str::to_string);
        match err.category() {
            ErrorCategory::Input => CliError::Validation { message, help },
            ErrorCategory::Cluster => CliError::Cluster { message, help },
            ErrorCategory::Io => CliError::Io { message },
            ErrorCategory::Catalog => CliError::Internal { message },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(e) => CliError::from(e),
            CoreError::InvalidSettings { .. } | CoreError::YamlParse(_) => CliError::Usage {
                message: err.to_string(),
                help: Some("Check ~/.config/registrar/config.yaml".to_string()),
            },
            other => CliError::validation(other.to_string()),
        }
    }
}

impl From<ClusterError> for CliError {
    fn from(err: ClusterError) -> Self {
        CliError::Cluster {
            message: err.to_string(),
            help: None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
