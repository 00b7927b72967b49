//! Registrar Kube - cluster access for registrar
//!
//! This crate provides:
//! - **`Cluster`**: the two operations registrar needs from a cluster, reading a
//!   resource as YAML and applying YAML
//! - **`Kubectl`**: implementation shelling out to `kubectl`
//! - **`KubeApi`**: implementation talking to the API server with Server-Side Apply
//! - **`MockCluster`**: in-memory implementation recording every call, for tests
//! - **Secret rendering**: `kubernetes.io/dockerconfigjson` secrets from a `DockerConfig`

pub mod api;
pub mod cluster;
pub mod error;
pub mod kubectl;
pub mod mock;
pub mod secret;

pub use api::KubeApi;
pub use cluster::{CONFIG_MAP_KIND, Cluster, SECRET_KIND};
pub use error::{ClusterError, Result};
pub use kubectl::Kubectl;
pub use mock::{ClusterCall, MockCluster};
pub use secret::{DOCKER_CONFIG_JSON_KEY, DOCKER_CONFIG_JSON_TYPE, docker_registry_secret, render_secret};
