//! The registry backend trait

use async_trait::async_trait;
use registrar_core::{FlagValues, OperatorTarget, Prompter, RegistryFlags};
use registrar_kube::Cluster;

use crate::error::Result;

/// Where a backend gets its inputs from
pub enum InputSource<'a> {
    /// Ask the user for each value
    Interactive(&'a mut dyn Prompter),
    /// Take values from batch-mode flags (already validated)
    Flags(&'a FlagValues),
}

/// A container registry backend
#[async_trait]
pub trait Registry: Send + Sync {
    /// Unique identifier, e.g. `docker-hub`; also written to the controller config
    fn name(&self) -> &'static str;

    /// Menu text
    fn caption(&self) -> &'static str;

    /// Menu position, positive and unique within a catalog
    fn option(&self) -> u32;

    /// Flags accepted in batch mode
    fn flags(&self) -> &RegistryFlags;

    /// Repository chosen by `read_inputs`, if it has run
    fn repository(&self) -> Option<&str>;

    /// Collect repository and credentials
    fn read_inputs(&mut self, source: InputSource<'_>) -> Result<()>;

    /// Create or update the credentials secret
    async fn provision_credentials(
        &self,
        cluster: &dyn Cluster,
        target: &OperatorTarget,
    ) -> Result<()>;
}
