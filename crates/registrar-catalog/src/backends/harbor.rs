//! Harbor

use async_trait::async_trait;
use registrar_core::{DockerConfig, OperatorTarget, RegistryFlags};
use registrar_kube::Cluster;

use super::{
    BasicAuth, BasicAuthPrompts, FLAG_PASSWORD, FLAG_PASSWORD_STDIN, FLAG_REPOSITORY,
    FLAG_USERNAME, apply_docker_config, check_repository, registry_host,
};
use crate::error::{RegistryError, Result};
use crate::registry::{InputSource, Registry};

const PROMPTS: BasicAuthPrompts = BasicAuthPrompts {
    repository: "Enter repository name (harbor.example.com/library)",
    username: "Enter username",
    password: "Enter password",
};

pub struct HarborRegistry {
    flags: RegistryFlags,
    credentials: Option<BasicAuth>,
    server: Option<String>,
}

impl HarborRegistry {
    pub fn new() -> Self {
        Self {
            flags: RegistryFlags::new(
                &[FLAG_REPOSITORY, FLAG_USERNAME],
                &[FLAG_PASSWORD, FLAG_PASSWORD_STDIN],
            ),
            credentials: None,
            server: None,
        }
    }
}

impl Default for HarborRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Registry for HarborRegistry {
    fn name(&self) -> &'static str {
        "harbor"
    }

    fn caption(&self) -> &'static str {
        "Harbor"
    }

    fn option(&self) -> u32 {
        3
    }

    fn flags(&self) -> &RegistryFlags {
        &self.flags
    }

    fn repository(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.repository.as_str())
    }

    fn read_inputs(&mut self, source: InputSource<'_>) -> Result<()> {
        let mut auth = BasicAuth::read(source, &PROMPTS)?;
        auth.repository = check_repository(&auth.repository)?;
        let server = registry_host(&auth.repository)
            .map(str::to_string)
            .ok_or_else(|| {
                RegistryError::invalid_input(
                    FLAG_REPOSITORY,
                    format!("'{}' must start with the Harbor host", auth.repository),
                )
            })?;

        self.server = Some(server);
        self.credentials = Some(auth);
        Ok(())
    }

    async fn provision_credentials(
        &self,
        cluster: &dyn Cluster,
        target: &OperatorTarget,
    ) -> Result<()> {
        let (Some(auth), Some(server)) = (&self.credentials, &self.server) else {
            return Err(RegistryError::InputsNotRead {
                name: self.name().to_string(),
            });
        };
        let config = DockerConfig::basic(server.as_str(), &auth.username, &auth.password);
        apply_docker_config(cluster, target, self.name(), &config).await
    }
}
