//! Configuration Management
//!
//! Handles persistent configuration storage for ehcg. Secrets are never
//! written here; they come from the environment.

use crate::azure::client::DEFAULT_ENDPOINT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Subscription to manage resources in
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// Azure AD tenant of the service principal
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// Application (client) ID of the service principal
    #[serde(default)]
    pub client_id: Option<String>,
    /// Management endpoint, for sovereign clouds
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn first_set(
    cli: Option<&str>,
    env: Option<String>,
    file: Option<&str>,
    from_id: Option<&str>,
) -> Option<String> {
    cli.map(|s| s.to_string())
        .or(env)
        .or_else(|| file.map(|s| s.to_string()))
        .or_else(|| from_id.map(|s| s.to_string()))
}

/// Subscription IDs are GUIDs
pub fn validate_subscription_id(subscription_id: &str) -> Result<()> {
    uuid::Uuid::parse_str(subscription_id)
        .map(|_| ())
        .with_context(|| format!("Invalid subscription ID {:?}: expected a GUID", subscription_id))
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ehcg").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective subscription (CLI > environment > config > resource ID)
    ///
    /// `from_id` is the subscription embedded in the ID of the resource being
    /// operated on, if any.
    pub fn effective_subscription(&self, cli: Option<&str>, from_id: Option<&str>) -> Result<String> {
        let subscription_id = first_set(
            cli,
            env_var("ARM_SUBSCRIPTION_ID"),
            self.subscription_id.as_deref(),
            from_id,
        )
        .context("No subscription configured. Set ARM_SUBSCRIPTION_ID or use --subscription")?;

        validate_subscription_id(&subscription_id)?;
        Ok(subscription_id)
    }

    /// Get effective tenant (CLI > environment > config)
    pub fn effective_tenant(&self, cli: Option<&str>) -> Option<String> {
        cli.map(|s| s.to_string())
            .or_else(|| env_var("ARM_TENANT_ID"))
            .or_else(|| self.tenant_id.clone())
    }

    /// Get effective client ID (CLI > environment > config)
    pub fn effective_client_id(&self, cli: Option<&str>) -> Option<String> {
        cli.map(|s| s.to_string())
            .or_else(|| env_var("ARM_CLIENT_ID"))
            .or_else(|| self.client_id.clone())
    }

    /// Get effective endpoint (CLI > environment > config > public cloud)
    pub fn effective_endpoint(&self, cli: Option<&str>) -> String {
        cli.map(|s| s.to_string())
            .or_else(|| env_var("ARM_ENDPOINT"))
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    /// Set subscription and save
    pub fn set_subscription(&mut self, subscription_id: &str) -> Result<()> {
        validate_subscription_id(subscription_id)?;
        self.subscription_id = Some(subscription_id.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_subscription_id() {
        assert!(validate_subscription_id("12345678-1234-9876-4563-123456789012").is_ok());
        assert!(validate_subscription_id("not-a-guid").is_err());
    }

    #[test]
    fn test_cli_value_wins() {
        let config = Config {
            endpoint: Some("https://management.chinacloudapi.cn".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.effective_endpoint(Some("http://localhost:1234")),
            "http://localhost:1234"
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("ehcg-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.json");

        let config = Config {
            subscription_id: Some("12345678-1234-9876-4563-123456789012".to_string()),
            tenant_id: Some("tenant".to_string()),
            client_id: None,
            endpoint: None,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let path = std::env::temp_dir().join("ehcg-does-not-exist").join("config.json");
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_subscription_precedence() {
        let id_sub = Some("11111111-1111-1111-1111-111111111111");
        assert_eq!(first_set(None, None, None, id_sub).as_deref(), id_sub);
        assert_eq!(
            first_set(None, None, Some("file"), id_sub).as_deref(),
            Some("file")
        );
        assert_eq!(
            first_set(None, Some("env".to_string()), Some("file"), id_sub).as_deref(),
            Some("env")
        );
        assert_eq!(
            first_set(Some("cli"), Some("env".to_string()), Some("file"), id_sub).as_deref(),
            Some("cli")
        );
        assert_eq!(first_set(None, None, None, None), None);
    }

    #[test]
    fn test_cli_subscription_is_validated() {
        let config = Config::default();
        assert!(config.effective_subscription(Some("not-a-guid"), None).is_err());
        assert_eq!(
            config
                .effective_subscription(Some("12345678-1234-9876-4563-123456789012"), None)
                .unwrap(),
            "12345678-1234-9876-4563-123456789012"
        );
    }
}
