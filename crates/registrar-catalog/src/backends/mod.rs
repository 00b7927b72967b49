//! Built-in registry backends

mod acr;
mod docker_hub;
mod gcr;
mod harbor;

pub use acr::AcrRegistry;
pub use docker_hub::DockerHubRegistry;
pub use gcr::GcrRegistry;
pub use harbor::HarborRegistry;

use registrar_core::{DockerConfig, OperatorTarget};
use registrar_kube::{Cluster, docker_registry_secret, render_secret};
use tracing::info;

use crate::error::{RegistryError, Result};
use crate::registry::{InputSource, Registry};

pub const FLAG_REPOSITORY: &str = "repository";
pub const FLAG_USERNAME: &str = "username";
pub const FLAG_PASSWORD: &str = "password";
pub const FLAG_PASSWORD_STDIN: &str = "password-stdin";
pub const FLAG_KEY_FILE: &str = "key-file";

/// Every backend shipped with registrar, in menu order
pub fn builtin() -> Vec<Box<dyn Registry>> {
    vec![
        Box::new(DockerHubRegistry::new()),
        Box::new(AcrRegistry::new()),
        Box::new(HarborRegistry::new()),
        Box::new(GcrRegistry::new()),
    ]
}

/// Registry host of a repository reference, if it names one
///
/// Follows the docker convention: the first path segment is a host only if it
/// contains a `.` or a `:`, or is `localhost`.
pub fn registry_host(repository: &str) -> Option<&str> {
    let (first, _) = repository.split_once('/')?;
    is_host(first).then_some(first)
}

fn is_host(segment: &str) -> bool {
    segment.contains('.') || segment.contains(':') || segment == "localhost"
}

/// Reject empty repositories and ones containing whitespace
pub(crate) fn check_repository(value: &str) -> Result<String> {
    let value = value.trim().trim_end_matches('/');
    if value.is_empty() {
        return Err(RegistryError::invalid_input(
            FLAG_REPOSITORY,
            "repository must not be empty",
        ));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(RegistryError::invalid_input(
            FLAG_REPOSITORY,
            format!("'{}' contains whitespace", value),
        ));
    }
    if !value.contains('/') && is_host(value) {
        return Err(RegistryError::invalid_input(
            FLAG_REPOSITORY,
            format!("'{}' names a registry host but no repository path", value),
        ));
    }
    Ok(value.to_string())
}

/// Prompt labels for a username/password backend
pub(crate) struct BasicAuthPrompts {
    pub repository: &'static str,
    pub username: &'static str,
    pub password: &'static str,
}

/// Repository plus username/password, shared by the basic-auth backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BasicAuth {
    pub repository: String,
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    /// Read the three values; the repository is returned unchecked
    pub fn read(source: InputSource<'_>, prompts: &BasicAuthPrompts) -> Result<Self> {
        let (repository, username, password) = match source {
            InputSource::Interactive(prompter) => {
                let repository = prompter.read_text(prompts.repository)?;
                let username = prompter.read_text(prompts.username)?;
                let password = prompter.read_secret(prompts.password)?;
                (repository, username, password)
            }
            InputSource::Flags(flags) => {
                let repository = flags.text(FLAG_REPOSITORY).unwrap_or_default().to_string();
                let username = flags.text(FLAG_USERNAME).unwrap_or_default().to_string();
                let password = match (flags.text(FLAG_PASSWORD), flags.text(FLAG_PASSWORD_STDIN)) {
                    (Some(p), None) | (None, Some(p)) => p.to_string(),
                    (Some(_), Some(_)) => {
                        return Err(RegistryError::invalid_input(
                            FLAG_PASSWORD,
                            "--password and --password-stdin are mutually exclusive",
                        ));
                    }
                    (None, None) => {
                        return Err(RegistryError::invalid_input(
                            FLAG_PASSWORD,
                            "--password or --password-stdin is required",
                        ));
                    }
                };
                (repository, username, password)
            }
        };

        if username.trim().is_empty() {
            return Err(RegistryError::invalid_input(
                FLAG_USERNAME,
                "username must not be empty",
            ));
        }
        if password.is_empty() {
            return Err(RegistryError::invalid_input(
                FLAG_PASSWORD,
                "password must not be empty",
            ));
        }

        Ok(Self {
            repository,
            username: username.trim().to_string(),
            password,
        })
    }
}

/// Render and apply the image-pull secret for `config`
pub(crate) async fn apply_docker_config(
    cluster: &dyn Cluster,
    target: &OperatorTarget,
    registry: &str,
    config: &DockerConfig,
) -> Result<()> {
    let secret_error = |source| RegistryError::SecretApply {
        name: target.secret_name.clone(),
        source,
    };

    let secret = docker_registry_secret(&target.secret_name, &target.namespace, registry, config)
        .map_err(secret_error)?;
    let manifest = render_secret(&secret).map_err(secret_error)?;
    cluster.apply_yaml(&manifest).await.map_err(secret_error)?;

    info!(
        secret = %target.secret_name,
        namespace = %target.namespace,
        registry,
        "registry credentials stored"
    );
    Ok(())
}
