//! Docker config.json format, as stored in a `kubernetes.io/dockerconfigjson` secret

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerConfig {
    #[serde(default)]
    pub auths: BTreeMap<String, DockerAuth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerAuth {
    pub username: String,
    pub password: String,
    /// base64 of `username:password`
    pub auth: String,
}

impl DockerAuth {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        let username = username.into();
        let password = password.into();
        let auth = STANDARD.encode(format!("{}:{}", username, password));
        Self {
            username,
            password,
            auth,
        }
    }
}

impl DockerConfig {
    /// Config holding a single username/password entry
    pub fn basic(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let mut auths = BTreeMap::new();
        auths.insert(server.into(), DockerAuth::basic(username, password));
        Self { auths }
    }

    pub fn auth_for(&self, server: &str) -> Option<&DockerAuth> {
        self.auths.get(server)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_encoding() {
        let auth = DockerAuth::basic("john", "s3cret");
        assert_eq!(auth.auth, "am9objpzM2NyZXQ=");
    }

    #[test]
    fn test_json_shape() {
        let config = DockerConfig::basic("https://index.docker.io/v1/", "john", "s3cret");
        let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();

        let entry = &json["auths"]["https://index.docker.io/v1/"];
        assert_eq!(entry["username"], "john");
        assert_eq!(entry["password"], "s3cret");
        assert_eq!(entry["auth"], "am9objpzM2NyZXQ=");
    }

    #[test]
    fn test_from_json() {
        let text = r#"{"auths":{"gcr.io":{"username":"_json_key","password":"{}","auth":"X2pzb25fa2V5Ont9"}}}"#;
        let config = DockerConfig::from_json(text).unwrap();
        let auth = config.auth_for("gcr.io").unwrap();
        assert_eq!(auth.username, "_json_key");
        assert!(config.auth_for("docker.io").is_none());
    }
}
