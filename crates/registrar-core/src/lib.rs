//! Registrar Core - shared types for choosing and configuring a container registry
//!
//! This crate provides the building blocks used by the catalog and the CLI:
//! - `FlagValues`: resolved command-line flags, remembering which ones the user supplied
//! - `RegistryFlags`: required and optional flags declared by a registry backend
//! - `ControllerConfigMap`: typed view of the operator's controller config map
//! - `DockerConfig`: the `.dockerconfigjson` payload of a registry secret
//! - `Settings`: where the operator lives and how to reach the cluster
//! - `Prompter`: interactive input

pub mod controller_config;
pub mod docker_config;
pub mod error;
pub mod flags;
pub mod prompt;
pub mod settings;

pub use controller_config::{ControllerConfigData, ControllerConfigMap};
pub use docker_config::{DockerAuth, DockerConfig};
pub use error::{CoreError, Result};
pub use flags::{FlagArg, FlagValue, FlagValues, RegistryFlags};
pub use prompt::{ConsolePrompter, Prompter, ScriptedPrompter, parse_option};
pub use settings::{ClusterClientKind, OperatorTarget, Settings};
