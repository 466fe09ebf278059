//! Provider settings: where the management API lives and how to log in
//!
//! Read from `provider.toml` in the config directory. Any field can be
//! overridden by an environment variable, which is the recommended way to
//! supply the password.

use anyhow::{Context, Result};
use reconcile::{Credentials, HttpClient, Reconciler};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::paths;

pub const ENV_ENDPOINT: &str = "CATVAL_ENDPOINT";
pub const ENV_USERNAME: &str = "CATVAL_USERNAME";
pub const ENV_PASSWORD: &str = "CATVAL_PASSWORD";

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL, e.g. `https://prism.example.com:9440`
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Load provider.toml from the config dir and apply env overrides
    pub fn load() -> Result<Self> {
        let path = paths::config_dir()?.join(paths::PROVIDER_FILE);
        let config = Self::load_from(&path)?.with_overrides(|key| std::env::var(key).ok());
        log::debug!("Provider config: {config:?}");
        Ok(config)
    }

    /// Load from a specific file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("{} does not exist, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read provider config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse provider config: {}", path.display()))
    }

    /// Replace fields with values found through `lookup`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = Some(endpoint);
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.username = Some(username);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.password = Some(password);
        }
        self
    }

    /// Build the HTTP client described by this config
    pub fn http_client(&self) -> Result<HttpClient> {
        let endpoint = self.endpoint.as_deref().with_context(|| {
            format!("No endpoint configured (set it in {} or {ENV_ENDPOINT})", paths::PROVIDER_FILE)
        })?;
        let username = self
            .username
            .as_deref()
            .with_context(|| format!("No username configured (set {ENV_USERNAME})"))?;
        let password = self
            .password
            .as_deref()
            .with_context(|| format!("No password configured (set {ENV_PASSWORD})"))?;

        Ok(HttpClient::with_timeout(
            endpoint,
            Credentials::new(username, password),
            Duration::from_secs(self.timeout_secs),
        ))
    }

    /// Build a reconciler talking to the configured endpoint
    pub fn reconciler(&self) -> Result<Reconciler> {
        Ok(Reconciler::new(Box::new(self.http_client()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ProviderConfig::load_from(&dir.path().join("provider.toml")).unwrap();
        assert_eq!(config.endpoint, None);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("provider.toml");
        fs::write(
            &path,
            "endpoint = \"https://prism.local:9440\"\nusername = \"admin\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = ProviderConfig::load_from(&path).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("https://prism.local:9440"));
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.password, None);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("provider.toml");
        fs::write(&path, "endpoint = [").unwrap();
        assert!(ProviderConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(ENV_PASSWORD, "secret"), (ENV_ENDPOINT, "https://other")]
            .into_iter()
            .collect();
        let config = ProviderConfig {
            endpoint: Some("https://prism.local:9440".to_string()),
            username: Some("admin".to_string()),
            ..ProviderConfig::default()
        }
        .with_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.endpoint.as_deref(), Some("https://other"));
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_http_client_requires_credentials() {
        let config = ProviderConfig {
            endpoint: Some("https://prism.local:9440".to_string()),
            username: Some("admin".to_string()),
            ..ProviderConfig::default()
        };
        let err = config.http_client().err().unwrap();
        assert!(err.to_string().contains(ENV_PASSWORD));
    }

    #[test]
    fn test_http_client_built_from_config() {
        let config = ProviderConfig {
            endpoint: Some("https://prism.local:9440".to_string()),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            ..ProviderConfig::default()
        };
        let client = config.http_client().unwrap();
        assert_eq!(client.endpoint(), "https://prism.local:9440");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ProviderConfig {
            password: Some("secret".to_string()),
            ..ProviderConfig::default()
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
