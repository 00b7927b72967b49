//! Cluster access through the `kubectl` binary
//!
//! Equivalent to `kubectl get <kind> <name> -n <ns> -o yaml` and
//! `kubectl apply -f -`. Uses whatever context the user's kubeconfig selects.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::cluster::Cluster;
use crate::error::{ClusterError, Result};

/// `kubectl` wrapper
#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: String,
}

impl Kubectl {
    /// Use `kubectl` from `PATH`
    pub fn new() -> Self {
        Self::with_binary("kubectl")
    }

    /// Use a specific kubectl binary
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run kubectl, optionally feeding `input` on stdin, and return stdout
    async fn run(&self, args: &[&str], input: Option<&str>) -> Result<String> {
        let command = format!("{} {}", self.binary, args.join(" "));
        debug!(command = %command, "running kubectl");

        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ClusterError::Spawn {
                command: command.clone(),
                source,
            })?;

        if let Some(input) = input {
            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(input.as_bytes())
                    .await
                    .map_err(|source| ClusterError::Spawn {
                        command: command.clone(),
                        source,
                    })?;
                // Dropping stdin closes the pipe so kubectl sees EOF
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| ClusterError::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(ClusterError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Turn kubectl's "(NotFound)" failure into [`ClusterError::NotFound`]
fn missing_resource(err: ClusterError, kind: &str, name: &str, namespace: &str) -> ClusterError {
    match err {
        ClusterError::CommandFailed { ref stderr, .. } if stderr.contains("(NotFound)") => {
            ClusterError::NotFound {
                kind: kind.to_string(),
                name: name.to_string(),
                namespace: namespace.to_string(),
            }
        }
        other => other,
    }
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cluster for Kubectl {
    async fn get_yaml(&self, kind: &str, name: &str, namespace: &str) -> Result<String> {
        self.run(&["get", kind, name, "-n", namespace, "-o", "yaml"], None)
            .await
            .map_err(|err| missing_resource(err, kind, name, namespace))
    }

    async fn apply_yaml(&self, manifest: &str) -> Result<()> {
        let out = self.run(&["apply", "-f", "-"], Some(manifest)).await?;
        debug!(output = %out.trim(), "kubectl apply");
        Ok(())
    }
}
