//! Docker Hub

use async_trait::async_trait;
use registrar_core::{DockerConfig, OperatorTarget, RegistryFlags};
use registrar_kube::Cluster;

use super::{
    BasicAuth, BasicAuthPrompts, FLAG_PASSWORD, FLAG_PASSWORD_STDIN, FLAG_REPOSITORY,
    FLAG_USERNAME, apply_docker_config, check_repository, registry_host,
};
use crate::error::{RegistryError, Result};
use crate::registry::{InputSource, Registry};

/// Auth server docker clients use for Docker Hub
pub const DOCKER_HUB_SERVER: &str = "https://index.docker.io/v1/";

const DOCKER_HUB_HOSTS: [&str; 3] = ["docker.io", "index.docker.io", "registry-1.docker.io"];

const PROMPTS: BasicAuthPrompts = BasicAuthPrompts {
    repository: "Enter repository name (john | docker.io/john)",
    username: "Enter username",
    password: "Enter password",
};

pub struct DockerHubRegistry {
    flags: RegistryFlags,
    credentials: Option<BasicAuth>,
}

impl DockerHubRegistry {
    pub fn new() -> Self {
        Self {
            flags: RegistryFlags::new(
                &[FLAG_REPOSITORY, FLAG_USERNAME],
                &[FLAG_PASSWORD, FLAG_PASSWORD_STDIN],
            ),
            credentials: None,
        }
    }
}

impl Default for DockerHubRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// `john` becomes `docker.io/john`; other registries are rejected
fn normalize_repository(repository: &str) -> Result<String> {
    let repository = check_repository(repository)?;
    let Some(host) = registry_host(&repository) else {
        return Ok(format!("docker.io/{}", repository));
    };
    if !DOCKER_HUB_HOSTS.contains(&host) {
        return Err(RegistryError::invalid_input(
            FLAG_REPOSITORY,
            format!("'{}' is not a Docker Hub host", host),
        ));
    }
    Ok(repository)
}

#[async_trait]
impl Registry for DockerHubRegistry {
    fn name(&self) -> &'static str {
        "docker-hub"
    }

    fn caption(&self) -> &'static str {
        "Docker Hub"
    }

    fn option(&self) -> u32 {
        1
    }

    fn flags(&self) -> &RegistryFlags {
        &self.flags
    }

    fn repository(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.repository.as_str())
    }

    fn read_inputs(&mut self, source: InputSource<'_>) -> Result<()> {
        let mut auth = BasicAuth::read(source, &PROMPTS)?;
        auth.repository = normalize_repository(&auth.repository)?;
        self.credentials = Some(auth);
        Ok(())
    }

    async fn provision_credentials(
        &self,
        cluster: &dyn Cluster,
        target: &OperatorTarget,
    ) -> Result<()> {
        let auth = self
            .credentials
            .as_ref()
            .ok_or_else(|| RegistryError::InputsNotRead {
                name: self.name().to_string(),
            })?;
        let config = DockerConfig::basic(DOCKER_HUB_SERVER, &auth.username, &auth.password);
        apply_docker_config(cluster, target, self.name(), &config).await
    }
}
