//! Azure Container Registry
//!
//! Authenticates with a service principal: its application ID is the
//! username and its client secret the password.

use async_trait::async_trait;
use registrar_core::{DockerConfig, OperatorTarget, RegistryFlags};
use registrar_kube::Cluster;

use super::{
    BasicAuth, BasicAuthPrompts, FLAG_PASSWORD, FLAG_PASSWORD_STDIN, FLAG_REPOSITORY,
    FLAG_USERNAME, apply_docker_config, check_repository, registry_host,
};
use crate::error::{RegistryError, Result};
use crate::registry::{InputSource, Registry};

const ACR_DOMAIN: &str = ".azurecr.io";

const PROMPTS: BasicAuthPrompts = BasicAuthPrompts {
    repository: "Enter repository name (myregistry.azurecr.io/apis)",
    username: "Enter service principal ID",
    password: "Enter service principal password",
};

pub struct AcrRegistry {
    flags: RegistryFlags,
    credentials: Option<BasicAuth>,
    /// Login server, e.g. `myregistry.azurecr.io`
    server: Option<String>,
}

impl AcrRegistry {
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

impl Default for AcrRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn login_server(repository: &str) -> Result<String> {
    match registry_host(repository) {
        Some(host) if host.ends_with(ACR_DOMAIN) && host.len() > ACR_DOMAIN.len() => {
            Ok(host.to_string())
        }
        _ => Err(RegistryError::invalid_input(
            FLAG_REPOSITORY,
            format!(
                "'{}' is not an Azure Container Registry repository (<name>{}/<repo>)",
                repository, ACR_DOMAIN
            ),
        )),
    }
}

#[async_trait]
impl Registry for AcrRegistry {
    fn name(&self) -> &'static str {
        "azure-acr"
    }

    fn caption(&self) -> &'static str {
        "Azure Container Registry"
    }

    fn option(&self) -> u32 {
        2
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
        let server = login_server(&auth.repository)?;

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
