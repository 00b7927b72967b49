//! Registry catalog and the operations run against the selected backend
//!
//! The catalog maps menu options to backends. Selecting a backend (from the
//! menu or by name) yields a [`Selection`], which every later step takes as
//! an argument:
//!
//! 1. `choose_interactive` / `select`
//! 2. `validate_flags` (batch mode only)
//! 3. `read_inputs_interactive` / `read_inputs_from_flags`
//! 4. `update_configs_secrets`

use registrar_core::{FlagValues, OperatorTarget, Prompter};
use registrar_kube::Cluster;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, info};

use crate::backends;
use crate::controller::update_controller_config;
use crate::error::{RegistryError, Result};
use crate::registry::{InputSource, Registry};

/// The backend picked for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    option: u32,
}

impl Selection {
    pub fn option(&self) -> u32 {
        self.option
    }
}

/// Registry backends keyed by menu option
#[derive(Default)]
pub struct Catalog {
    registries: BTreeMap<u32, Box<dyn Registry>>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every built-in backend
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        for registry in backends::builtin() {
            catalog.add(registry)?;
        }
        Ok(catalog)
    }

    /// Register a backend
    ///
    /// Fails if the option is zero, or if the option or the name is taken.
    pub fn add(&mut self, registry: Box<dyn Registry>) -> Result<()> {
        let name = registry.name();
        let option = registry.option();

        if option < 1 {
            return Err(RegistryError::InvalidOption {
                name: name.to_string(),
            });
        }
        if self.registries.contains_key(&option) {
            return Err(RegistryError::DuplicateOption {
                name: name.to_string(),
                option,
            });
        }
        if self.registries.values().any(|r| r.name() == name) {
            return Err(RegistryError::DuplicateName {
                name: name.to_string(),
            });
        }

        self.registries.insert(option, registry);
        Ok(())
    }

    /// Backend registered under `option`
    pub fn get(&self, option: u32) -> Option<&dyn Registry> {
        self.registries.get(&option).map(|r| r.as_ref())
    }

    /// Backends in ascending option order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Registry> {
        self.registries.values().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.registries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }

    /// List the backends on `out` and ask which one to use
    pub fn choose_interactive(
        &self,
        out: &mut dyn Write,
        prompter: &mut dyn Prompter,
    ) -> Result<Selection> {
        let mut listing = String::from("Choose registry type:\n");
        for (option, registry) in &self.registries {
            listing.push_str(&format!("{}: {}\n", option, registry.caption()));
        }
        out.write_all(listing.as_bytes())
            .and_then(|_| out.flush())
            .map_err(RegistryError::Output)?;

        let choice = prompter
            .read_option("Choose a number", 1, self.len())
            .map_err(RegistryError::Choice)?;
        let option = u32::try_from(choice).unwrap_or(u32::MAX);
        if !self.registries.contains_key(&option) {
            return Err(RegistryError::UnknownSelection { option });
        }

        info!(option, "registry chosen");
        Ok(Selection { option })
    }

    /// Select the backend called `name`
    pub fn select(&self, name: &str) -> Result<Selection> {
        self.registries
            .iter()
            .find(|(_, r)| r.name() == name)
            .map(|(option, _)| {
                info!(option, name, "registry selected");
                Selection { option: *option }
            })
            .ok_or_else(|| RegistryError::InvalidRegistryType {
                name: name.to_string(),
            })
    }

    /// The selected backend
    pub fn selected(&self, selection: Selection) -> Result<&dyn Registry> {
        self.get(selection.option)
            .ok_or(RegistryError::UnknownSelection {
                option: selection.option,
            })
    }

    fn selected_mut(&mut self, selection: Selection) -> Result<&mut Box<dyn Registry>> {
        self.registries
            .get_mut(&selection.option)
            .ok_or(RegistryError::UnknownSelection {
                option: selection.option,
            })
    }

    /// Prompt for the selected backend's inputs
    pub fn read_inputs_interactive(
        &mut self,
        selection: Selection,
        prompter: &mut dyn Prompter,
    ) -> Result<()> {
        self.selected_mut(selection)?
            .read_inputs(InputSource::Interactive(prompter))
    }

    /// Take the selected backend's inputs from batch-mode flags
    pub fn read_inputs_from_flags(&mut self, selection: Selection, flags: &FlagValues) -> Result<()> {
        self.selected_mut(selection)?
            .read_inputs(InputSource::Flags(flags))
    }

    /// Check batch-mode flags against what the selected backend accepts
    ///
    /// Missing required flags are reported before unsupported ones.
    pub fn validate_flags(&self, selection: Selection, flags: &FlagValues) -> Result<()> {
        let registry = self.selected(selection)?;
        let declared = registry.flags();

        if let Some(flag) = declared.missing_required(flags) {
            return Err(RegistryError::MissingRequiredFlag {
                flag: flag.to_string(),
            });
        }
        if let Some(flag) = declared.first_unsupported(flags) {
            return Err(RegistryError::UnsupportedFlag {
                flag: flag.to_string(),
            });
        }

        debug!(registry = registry.name(), "flags valid");
        Ok(())
    }

    /// Record the registry in the controller config, then store credentials
    ///
    /// The config map goes first: if the operator is not installed this fails
    /// before any secret exists. If the secret step fails afterwards the
    /// config map is left updated.
    pub async fn update_configs_secrets(
        &self,
        selection: Selection,
        cluster: &dyn Cluster,
        target: &OperatorTarget,
    ) -> Result<()> {
        let registry = self.selected(selection)?;
        let repository = registry
            .repository()
            .ok_or_else(|| RegistryError::InputsNotRead {
                name: registry.name().to_string(),
            })?;

        update_controller_config(cluster, target, registry.name(), repository).await?;
        registry.provision_credentials(cluster, target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use registrar_core::{FlagValue, RegistryFlags, ScriptedPrompter};
    use registrar_kube::{ClusterCall, MockCluster};

    /// Minimal backend with configurable identity and flags
    struct FakeRegistry {
        name: &'static str,
        option: u32,
        flags: RegistryFlags,
        repository: Option<String>,
    }

    impl FakeRegistry {
        fn boxed(name: &'static str, option: u32) -> Box<dyn Registry> {
            Self::with_flags(name, option, &["a", "b"], &["c"])
        }

        fn with_flags(
            name: &'static str,
            option: u32,
            required: &[&'static str],
            optional: &[&'static str],
        ) -> Box<dyn Registry> {
            Box::new(Self {
                name,
                option,
                flags: RegistryFlags::new(required, optional),
                repository: None,
            })
        }
    }

    /// Writer whose every write fails
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl Registry for FakeRegistry {
        fn name(&self) -> &'static str {
            self.name
        }

        fn caption(&self) -> &'static str {
            self.name
        }

        fn option(&self) -> u32 {
            self.option
        }

        fn flags(&self) -> &RegistryFlags {
            &self.flags
        }

        fn repository(&self) -> Option<&str> {
            self.repository.as_deref()
        }

        fn read_inputs(&mut self, source: InputSource<'_>) -> Result<()> {
            self.repository = Some(match source {
                InputSource::Interactive(prompter) => prompter.read_text("repo")?,
                InputSource::Flags(flags) => flags.text("a").unwrap_or_default().to_string(),
            });
            Ok(())
        }

        async fn provision_credentials(
            &self,
            _cluster: &dyn Cluster,
            _target: &OperatorTarget,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn provided(names: &[&str]) -> FlagValues {
        names
            .iter()
            .map(|n| (n.to_string(), FlagValue::text("x")))
            .collect()
    }

    const CONFIG: &str = "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: controller-config\n  namespace: wso2-system\ndata:\n  registryType: harbor\n";

    fn cluster_with_config() -> MockCluster {
        MockCluster::new().with_resource("configmap", "wso2-system", "controller-config", CONFIG)
    }

    // ========== add ==========

    #[test]
    fn test_add_and_get() {
        let mut catalog = Catalog::new();
        catalog.add(FakeRegistry::boxed("one", 1)).unwrap();
        assert_eq!(catalog.get(1).unwrap().name(), "one");
        assert!(catalog.get(2).is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_add_rejects_zero_option() {
        let mut catalog = Catalog::new();
        let err = catalog.add(FakeRegistry::boxed("zero", 0)).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidOption { .. }));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_add_rejects_duplicate_option() {
        let mut catalog = Catalog::new();
        catalog.add(FakeRegistry::boxed("one", 1)).unwrap();
        let err = catalog.add(FakeRegistry::boxed("other", 1)).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateOption { option: 1, .. }));
        assert_eq!(catalog.get(1).unwrap().name(), "one");
    }

    #[test]
    fn test_add_rejects_duplicate_name() {
        let mut catalog = Catalog::new();
        catalog.add(FakeRegistry::boxed("one", 1)).unwrap();
        let err = catalog.add(FakeRegistry::boxed("one", 2)).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { .. }));
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let names: Vec<_> = catalog.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["docker-hub", "azure-acr", "harbor", "gcr"]);
    }

    // ========== choose_interactive ==========

    #[test]
    fn test_choose_lists_in_option_order() {
        let mut catalog = Catalog::new();
        catalog.add(FakeRegistry::boxed("third", 3)).unwrap();
        catalog.add(FakeRegistry::boxed("first", 1)).unwrap();
        catalog.add(FakeRegistry::boxed("second", 2)).unwrap();

        let mut out = Vec::new();
        let mut prompter = ScriptedPrompter::new(["2"]);
        let selection = catalog.choose_interactive(&mut out, &mut prompter).unwrap();

        assert_eq!(selection.option(), 2);
        assert_eq!(catalog.selected(selection).unwrap().name(), "second");
        let listing = String::from_utf8(out).unwrap();
        insta::assert_snapshot!(listing.trim_end(), @r"
        Choose registry type:
        1: first
        2: second
        3: third
        ");
    }

    #[test]
    fn test_choose_builtin_listing() {
        let catalog = Catalog::builtin().unwrap();
        let mut out = Vec::new();
        let mut prompter = ScriptedPrompter::new(["1"]);
        catalog.choose_interactive(&mut out, &mut prompter).unwrap();

        let listing = String::from_utf8(out).unwrap();
        insta::assert_snapshot!(listing.trim_end(), @r"
        Choose registry type:
        1: Docker Hub
        2: Azure Container Registry
        3: Harbor
        4: Google Container Registry
        ");
    }

    #[test]
    fn test_choose_rejects_bad_answers() {
        let catalog = Catalog::builtin().unwrap();
        for answer in ["0", "5", "docker-hub", ""] {
            let mut prompter = ScriptedPrompter::new([answer]);
            let err = catalog
                .choose_interactive(&mut std::io::sink(), &mut prompter)
                .unwrap_err();
            assert!(
                matches!(err, RegistryError::Choice(_)),
                "answer {:?} gave {}",
                answer,
                err
            );
        }
    }

    #[test]
    fn test_choose_gap_in_sparse_catalog() {
        let mut catalog = Catalog::new();
        catalog.add(FakeRegistry::boxed("one", 1)).unwrap();
        catalog.add(FakeRegistry::boxed("five", 5)).unwrap();

        let mut prompter = ScriptedPrompter::new(["2"]);
        let err = catalog
            .choose_interactive(&mut std::io::sink(), &mut prompter)
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownSelection { option: 2 }));
    }

    #[test]
    fn test_choose_menu_write_failure() {
        let catalog = Catalog::builtin().unwrap();
        let mut prompter = ScriptedPrompter::new(["1"]);

        let err = catalog
            .choose_interactive(&mut BrokenPipe, &mut prompter)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Output(_)));
        assert_eq!(err.category(), crate::ErrorCategory::Io);
        // the prompt is never reached
        assert_eq!(prompter.remaining(), 1);
    }

    // ========== select ==========

    #[test]
    fn test_select_by_name() {
        let catalog = Catalog::builtin().unwrap();
        let selection = catalog.select("harbor").unwrap();
        assert_eq!(selection.option(), 3);
    }

    #[test]
    fn test_select_unknown_keeps_previous() {
        let catalog = Catalog::builtin().unwrap();
        let selection = catalog.select("gcr").unwrap();

        let err = catalog.select("quay").unwrap_err();
        assert_eq!(err.to_string(), "Invalid registry type: quay");
        assert_eq!(catalog.selected(selection).unwrap().name(), "gcr");
    }

    #[test]
    fn test_selection_from_other_catalog() {
        let mut big = Catalog::new();
        big.add(FakeRegistry::boxed("nine", 9)).unwrap();
        let selection = big.select("nine").unwrap();

        let small = Catalog::new();
        assert!(matches!(
            small.selected(selection),
            Err(RegistryError::UnknownSelection { option: 9 })
        ));
    }

    // ========== validate_flags ==========

    #[test]
    fn test_validate_missing_required() {
        let mut catalog = Catalog::new();
        catalog.add(FakeRegistry::boxed("abc", 1)).unwrap();
        let selection = catalog.select("abc").unwrap();

        let err = catalog
            .validate_flags(selection, &provided(&["a"]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::MissingRequiredFlag { ref flag } if flag == "b"));
    }

    #[test]
    fn test_validate_unsupported() {
        let mut catalog = Catalog::new();
        catalog.add(FakeRegistry::boxed("abc", 1)).unwrap();
        let selection = catalog.select("abc").unwrap();

        let err = catalog
            .validate_flags(selection, &provided(&["a", "b", "d"]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnsupportedFlag { ref flag } if flag == "d"));
    }

    #[test]
    fn test_validate_missing_wins_over_unsupported() {
        let mut catalog = Catalog::new();
        catalog.add(FakeRegistry::boxed("abc", 1)).unwrap();
        let selection = catalog.select("abc").unwrap();

        let err = catalog
            .validate_flags(selection, &provided(&["a", "d"]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::MissingRequiredFlag { .. }));
    }

    #[test]
    fn test_validate_success() {
        let mut catalog = Catalog::new();
        catalog.add(FakeRegistry::boxed("abc", 1)).unwrap();
        let selection = catalog.select("abc").unwrap();

        catalog
            .validate_flags(selection, &provided(&["a", "b"]))
            .unwrap();
        catalog
            .validate_flags(selection, &provided(&["a", "b", "c"]))
            .unwrap();

        // defaults for unknown flags are not "supplied"
        let flags = provided(&["a", "b"]).with("d", FlagValue::absent());
        catalog.validate_flags(selection, &flags).unwrap();
    }

    #[test]
    fn test_validate_username_password_descriptor() {
        let mut catalog = Catalog::new();
        catalog
            .add(FakeRegistry::with_flags(
                "docker-hub",
                1,
                &["username", "password"],
                &["url"],
            ))
            .unwrap();
        let selection = catalog.select("docker-hub").unwrap();

        let err = catalog
            .validate_flags(selection, &provided(&["username"]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required flag is missing in batch mode. Flag: password"
        );

        catalog
            .validate_flags(selection, &provided(&["username", "password", "url"]))
            .unwrap();

        let err = catalog
            .validate_flags(selection, &provided(&["username", "password", "token"]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnsupportedFlag { ref flag } if flag == "token"));
    }

    #[test]
    fn test_validate_docker_hub_scenario() {
        let catalog = Catalog::builtin().unwrap();
        let selection = catalog.select("docker-hub").unwrap();

        catalog
            .validate_flags(selection, &provided(&["repository", "username", "password"]))
            .unwrap();

        let err = catalog
            .validate_flags(selection, &provided(&["username"]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required flag is missing in batch mode. Flag: repository"
        );

        let err = catalog
            .validate_flags(selection, &provided(&["repository", "username", "key-file"]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid, not supported flag found in batch mode. Flag: key-file"
        );
    }

    // ========== read_inputs ==========

    #[test]
    fn test_read_inputs_dispatches_to_selected() {
        let mut catalog = Catalog::new();
        catalog.add(FakeRegistry::boxed("one", 1)).unwrap();
        catalog.add(FakeRegistry::boxed("two", 2)).unwrap();
        let selection = catalog.select("two").unwrap();

        let mut prompter = ScriptedPrompter::new(["registry.local/apis"]);
        catalog
            .read_inputs_interactive(selection, &mut prompter)
            .unwrap();

        assert_eq!(catalog.get(2).unwrap().repository(), Some("registry.local/apis"));
        assert_eq!(catalog.get(1).unwrap().repository(), None);

        catalog
            .read_inputs_from_flags(selection, &provided(&["a"]))
            .unwrap();
        assert_eq!(catalog.get(2).unwrap().repository(), Some("x"));
    }

    // ========== update_configs_secrets ==========

    #[tokio::test]
    async fn test_config_map_before_secret() {
        let mut catalog = Catalog::builtin().unwrap();
        let selection = catalog.select("docker-hub").unwrap();
        let flags = FlagValues::new()
            .with("repository", FlagValue::text("docker.io/john"))
            .with("username", FlagValue::text("john"))
            .with("password", FlagValue::text("s3cret"));
        catalog.validate_flags(selection, &flags).unwrap();
        catalog.read_inputs_from_flags(selection, &flags).unwrap();

        let cluster = cluster_with_config();
        let target = OperatorTarget::default();
        catalog
            .update_configs_secrets(selection, &cluster, &target)
            .await
            .unwrap();

        let kinds: Vec<_> = cluster
            .calls()
            .into_iter()
            .map(|call| match call {
                ClusterCall::Get { kind, .. } => format!("get {}", kind),
                ClusterCall::Apply { kind, .. } => format!("apply {}", kind),
            })
            .collect();
        assert_eq!(kinds, vec!["get configmap", "apply configmap", "apply secret"]);

        let config = cluster
            .resource("configmap", "wso2-system", "controller-config")
            .unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&config).unwrap();
        assert_eq!(value["data"]["registryType"], serde_yaml::Value::from("docker-hub"));
        assert_eq!(
            value["data"]["dockerRegistry"],
            serde_yaml::Value::from("docker.io/john")
        );
    }

    #[tokio::test]
    async fn test_missing_operator_touches_no_secret() {
        let mut catalog = Catalog::builtin().unwrap();
        let selection = catalog.select("harbor").unwrap();
        let mut prompter = ScriptedPrompter::new(["harbor.local/lib", "admin", "pw"]);
        catalog
            .read_inputs_interactive(selection, &mut prompter)
            .unwrap();

        let cluster = MockCluster::new();
        let err = catalog
            .update_configs_secrets(selection, &cluster, &OperatorTarget::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::ConfigRead { .. }));
        assert_eq!(cluster.apply_count(), 0);
    }

    #[tokio::test]
    async fn test_secret_failure_leaves_config_updated() {
        let mut catalog = Catalog::builtin().unwrap();
        let selection = catalog.select("harbor").unwrap();
        let mut prompter = ScriptedPrompter::new(["harbor.local/lib", "admin", "pw"]);
        catalog
            .read_inputs_interactive(selection, &mut prompter)
            .unwrap();

        let cluster = cluster_with_config().reject_applies_of("Secret");
        let err = catalog
            .update_configs_secrets(selection, &cluster, &OperatorTarget::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::SecretApply { .. }));
        let config = cluster
            .resource("configmap", "wso2-system", "controller-config")
            .unwrap();
        assert!(config.contains("harbor.local/lib"));
    }

    #[tokio::test]
    async fn test_update_before_inputs_read() {
        let catalog = Catalog::builtin().unwrap();
        let selection = catalog.select("gcr").unwrap();
        let cluster = cluster_with_config();

        let err = catalog
            .update_configs_secrets(selection, &cluster, &OperatorTarget::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InputsNotRead { .. }));
        assert!(cluster.calls().is_empty());
    }
}
