//! Google Container Registry
//!
//! Authenticates with a service account key: the username is the literal
//! `_json_key` and the password is the key file's JSON content.

use async_trait::async_trait;
use registrar_core::{DockerConfig, OperatorTarget, RegistryFlags};
use registrar_kube::Cluster;
use std::path::Path;

use super::{FLAG_KEY_FILE, FLAG_REPOSITORY, apply_docker_config, check_repository, registry_host};
use crate::error::{RegistryError, Result};
use crate::registry::{InputSource, Registry};

/// Username GCR expects with a JSON key
pub const GCR_USERNAME: &str = "_json_key";

pub struct GcrRegistry {
    flags: RegistryFlags,
    repository: Option<String>,
    server: Option<String>,
    key: Option<String>,
}

impl GcrRegistry {
    pub fn new() -> Self {
        Self {
            flags: RegistryFlags::new(&[FLAG_REPOSITORY, FLAG_KEY_FILE], &[]),
            repository: None,
            server: None,
            key: None,
        }
    }
}

impl Default for GcrRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn gcr_host(repository: &str) -> Result<String> {
    match registry_host(repository) {
        Some(host) if host == "gcr.io" || host.ends_with(".gcr.io") => Ok(host.to_string()),
        _ => Err(RegistryError::invalid_input(
            FLAG_REPOSITORY,
            format!("'{}' is not a GCR repository (gcr.io/<project>)", repository),
        )),
    }
}

/// Read a service account key and make sure it is a JSON object
fn read_key_file(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        RegistryError::invalid_input(FLAG_KEY_FILE, format!("{}: {}", path.display(), e))
    })?;
    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(serde_json::Value::Object(_)) => Ok(content),
        Ok(_) => Err(RegistryError::invalid_input(
            FLAG_KEY_FILE,
            format!("{} is not a JSON object", path.display()),
        )),
        Err(e) => Err(RegistryError::invalid_input(
            FLAG_KEY_FILE,
            format!("{} is not valid JSON: {}", path.display(), e),
        )),
    }
}

#[async_trait]
impl Registry for GcrRegistry {
    fn name(&self) -> &'static str {
        "gcr"
    }

    fn caption(&self) -> &'static str {
        "Google Container Registry"
    }

    fn option(&self) -> u32 {
        4
    }

    fn flags(&self) -> &RegistryFlags {
        &self.flags
    }

    fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    fn read_inputs(&mut self, source: InputSource<'_>) -> Result<()> {
        let (repository, key_file) = match source {
            InputSource::Interactive(prompter) => (
                prompter.read_text("Enter repository name (gcr.io/my-project)")?,
                prompter.read_text("Enter path to the service account key file")?,
            ),
            InputSource::Flags(flags) => (
                flags.text(FLAG_REPOSITORY).unwrap_or_default().to_string(),
                flags.text(FLAG_KEY_FILE).unwrap_or_default().to_string(),
            ),
        };

        let repository = check_repository(&repository)?;
        let server = gcr_host(&repository)?;
        if key_file.trim().is_empty() {
            return Err(RegistryError::invalid_input(
                FLAG_KEY_FILE,
                "key file path must not be empty",
            ));
        }
        let key = read_key_file(Path::new(key_file.trim()))?;

        self.repository = Some(repository);
        self.server = Some(server);
        self.key = Some(key);
        Ok(())
    }

    async fn provision_credentials(
        &self,
        cluster: &dyn Cluster,
        target: &OperatorTarget,
    ) -> Result<()> {
        let (Some(server), Some(key)) = (&self.server, &self.key) else {
            return Err(RegistryError::InputsNotRead {
                name: self.name().to_string(),
            });
        };
        let config = DockerConfig::basic(server.as_str(), GCR_USERNAME, key.as_str());
        apply_docker_config(cluster, target, self.name(), &config).await
    }
}
