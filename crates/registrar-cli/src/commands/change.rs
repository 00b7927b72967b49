//! Change command - point the operator at a different container registry

use clap::Args;
use console::style;
use registrar_catalog::Catalog;
use registrar_catalog::backends::{
    FLAG_KEY_FILE, FLAG_PASSWORD, FLAG_PASSWORD_STDIN, FLAG_REPOSITORY, FLAG_USERNAME,
};
use registrar_core::{
    ClusterClientKind, ConsolePrompter, FlagValue, FlagValues, OperatorTarget, Settings,
};
use registrar_kube::{Cluster, KubeApi, Kubectl};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{CliError, Result};

#[derive(Args, Debug, Default)]
pub struct ChangeArgs {
    /// Registry type (see `registrar list`); required in batch mode
    #[arg(long)]
    pub registry_type: Option<String>,

    /// Repository images are pushed to
    #[arg(long)]
    pub repository: Option<String>,

    /// Registry username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Registry password
    #[arg(short, long, conflicts_with = "password_stdin")]
    pub password: Option<String>,

    /// Read the registry password from stdin
    #[arg(long)]
    pub password_stdin: bool,

    /// Service account key file (GCR)
    #[arg(long)]
    pub key_file: Option<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Overrides for where the operator lives and how to reach it
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Namespace the operator is installed in
    #[arg(long, env = "REGISTRAR_NAMESPACE")]
    pub namespace: Option<String>,

    /// Name of the controller config map
    #[arg(long, env = "REGISTRAR_CONFIG_MAP")]
    pub config_map: Option<String>,

    /// Name of the registry credentials secret
    #[arg(long, env = "REGISTRAR_SECRET_NAME")]
    pub secret_name: Option<String>,

    /// How to talk to the cluster: kubectl or api
    #[arg(long, env = "REGISTRAR_CLUSTER_CLIENT")]
    pub cluster_client: Option<ClusterClientKind>,

    /// kubectl binary to run
    #[arg(long, env = "REGISTRAR_KUBECTL")]
    pub kubectl: Option<String>,
}

impl TargetArgs {
    /// Layer command-line overrides on top of the settings file
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(namespace) = &self.namespace {
            settings.target.namespace = namespace.clone();
        }
        if let Some(config_map) = &self.config_map {
            settings.target.config_map = config_map.clone();
        }
        if let Some(secret_name) = &self.secret_name {
            settings.target.secret_name = secret_name.clone();
        }
        if let Some(kind) = self.cluster_client {
            settings.cluster_client = kind;
        }
        if let Some(kubectl) = &self.kubectl {
            settings.kubectl = kubectl.clone();
        }
        settings
    }
}

impl ChangeArgs {
    fn is_batch(&self) -> bool {
        self.registry_type.is_some()
            || self.repository.is_some()
            || self.username.is_some()
            || self.password.is_some()
            || self.password_stdin
            || self.key_file.is_some()
    }

    /// Registry flags as typed; `password-stdin` is still a switch here
    fn flag_values(&self) -> FlagValues {
        FlagValues::new()
            .with(FLAG_REPOSITORY, FlagValue::from_option(self.repository.clone()))
            .with(FLAG_USERNAME, FlagValue::from_option(self.username.clone()))
            .with(FLAG_PASSWORD, FlagValue::from_option(self.password.clone()))
            .with(FLAG_PASSWORD_STDIN, FlagValue::switch(self.password_stdin))
            .with(
                FLAG_KEY_FILE,
                FlagValue::from_option(self.key_file.as_ref().map(|p| p.display().to_string())),
            )
    }
}

/// First line of `input`, without the line ending
fn read_password(mut input: impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(CliError::validation("No password received on stdin"));
    }
    Ok(password)
}

async fn connect(settings: &Settings) -> Result<Box<dyn Cluster>> {
    debug!(client = %settings.cluster_client, "connecting to cluster");
    let cluster: Box<dyn Cluster> = match settings.cluster_client {
        ClusterClientKind::Kubectl => Box::new(Kubectl::with_binary(settings.kubectl.clone())),
        ClusterClientKind::Api => Box::new(KubeApi::new().await?),
    };
    Ok(cluster)
}

/// Run the change command
pub async fn run(args: ChangeArgs) -> Result<()> {
    let settings = args.target.apply(Settings::load()?);
    let mut catalog = Catalog::builtin()?;

    let selection = if args.is_batch() {
        let Some(registry_type) = args.registry_type.as_deref() else {
            return Err(CliError::usage_with_help(
                "--registry-type is required when registry flags are given",
                "Run `registrar list` to see the supported registry types",
            ));
        };
        let selection = catalog.select(registry_type)?;

        let mut flags = args.flag_values();
        catalog.validate_flags(selection, &flags)?;
        if args.password_stdin {
            let password = read_password(std::io::stdin().lock())?;
            flags.insert(FLAG_PASSWORD_STDIN, FlagValue::text(password));
        }
        catalog.read_inputs_from_flags(selection, &flags)?;
        selection
    } else {
        let mut prompter = ConsolePrompter::new();
        let selection = catalog.choose_interactive(&mut std::io::stdout(), &mut prompter)?;
        catalog.read_inputs_interactive(selection, &mut prompter)?;
        selection
    };

    let target: &OperatorTarget = &settings.target;
    let cluster = connect(&settings).await?;

    catalog
        .update_configs_secrets(selection, cluster.as_ref(), target)
        .await?;

    let registry = catalog.selected(selection)?;
    println!(
        "{} Registry set to {} ({})",
        style("✓").green().bold(),
        style(registry.name()).cyan(),
        registry.repository().unwrap_or_default()
    );
    Ok(())
}
