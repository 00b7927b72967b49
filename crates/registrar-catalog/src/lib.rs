//! Registrar Catalog - container registry backends for the API operator
//!
//! This crate provides:
//!
//! - **`Registry`**: one implementation per registry backend (Docker Hub,
//!   Azure Container Registry, Harbor, Google Container Registry)
//! - **`Catalog`**: backends keyed by menu option, with interactive and by-name
//!   selection, batch-mode flag validation and input collection
//! - **Controller config update**: records the chosen registry in the
//!   operator's controller config map, then provisions the credentials secret
//!
//! ## Example
//!
//! ```rust,no_run
//! use registrar_catalog::Catalog;
//! use registrar_core::{FlagValue, FlagValues, OperatorTarget};
//! use registrar_kube::Kubectl;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut catalog = Catalog::builtin()?;
//! let selection = catalog.select("docker-hub")?;
//!
//! let flags = FlagValues::new()
//!     .with("repository", FlagValue::text("docker.io/john"))
//!     .with("username", FlagValue::text("john"))
//!     .with("password", FlagValue::text("s3cret"));
//! catalog.validate_flags(selection, &flags)?;
//! catalog.read_inputs_from_flags(selection, &flags)?;
//!
//! let target = OperatorTarget::default();
//! catalog
//!     .update_configs_secrets(selection, &Kubectl::new(), &target)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod registry;

pub use catalog::{Catalog, Selection};
pub use controller::update_controller_config;
pub use error::{ErrorCategory, RegistryError, Result};
pub use registry::{InputSource, Registry};
