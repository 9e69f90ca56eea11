use crate::error::{Result, ToolsError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LOGIN_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const DEFAULT_DOH_ENDPOINT: &str = "https://dns.google/resolve";
pub const DEFAULT_DKIM_SELECTOR: &str = "selector1";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Identity authority hosting the OpenID discovery documents
    #[serde(default = "default_login_authority")]
    pub login_authority: String,

    /// DNS-over-HTTPS JSON endpoint
    #[serde(default = "default_doh_endpoint")]
    pub doh_endpoint: String,

    #[serde(default = "default_dkim_selector")]
    pub dkim_selector: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Copy tenant IDs and UPNs to the clipboard as soon as they are produced
    #[serde(default)]
    pub copy_on_success: bool,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_login_authority() -> String {
    DEFAULT_LOGIN_AUTHORITY.to_string()
}

fn default_doh_endpoint() -> String {
    DEFAULT_DOH_ENDPOINT.to_string()
}

fn default_dkim_selector() -> String {
    DEFAULT_DKIM_SELECTOR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            login_authority: default_login_authority(),
            doh_endpoint: default_doh_endpoint(),
            dkim_selector: default_dkim_selector(),
            request_timeout_secs: None,
            copy_on_success: false,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Check that endpoint settings are usable URLs
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("login_authority", &self.login_authority),
            ("doh_endpoint", &self.doh_endpoint),
        ] {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(ToolsError::ConfigError(format!(
                    "{} must be an http(s) URL, got '{}'",
                    key, value
                )));
            }
        }

        if self.dkim_selector.trim().is_empty() || self.dkim_selector.contains('.') {
            return Err(ToolsError::ConfigError(format!(
                "dkim_selector must be a single DNS label, got '{}'",
                self.dkim_selector
            )));
        }

        Ok(())
    }
}

/// Configuration manager
#[derive(Clone, Debug)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from("com", "m365tools", "m365tools").ok_or_else(|| {
            ToolsError::ConfigError("Failed to determine config directory".into())
        })?;

        Self::with_dir(project_dirs.config_dir())
    }

    /// Use an explicit config directory, creating it if needed
    pub fn with_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let config_dir = dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(Self { config_dir })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Load main config, falling back to defaults when the file is absent
    pub fn load_config(&self) -> Result<Config> {
        let config_path = self.config_file();

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save main config
    pub fn save_config(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let contents = toml::to_string_pretty(config)
            .map_err(|e| ToolsError::ConfigError(format!("Failed to serialize config: {}", e)))?;
        fs::write(self.config_file(), contents)?;
        Ok(())
    }

    /// Write a default config file unless one already exists.
    /// Returns true when a new file was written.
    pub fn init_config(&self, force: bool) -> Result<bool> {
        if self.config_file().exists() && !force {
            return Ok(false);
        }
        self.save_config(&Config::default())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path()).unwrap();
        assert_eq!(manager.load_config().unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path()).unwrap();
        fs::write(
            manager.config_file(),
            "dkim_selector = \"selector2\"\nrequest_timeout_secs = 10\n",
        )
        .unwrap();

        let config = manager.load_config().unwrap();
        assert_eq!(config.dkim_selector, "selector2");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.doh_endpoint, DEFAULT_DOH_ENDPOINT);
        assert_eq!(config.login_authority, DEFAULT_LOGIN_AUTHORITY);
        assert!(!config.copy_on_success);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path().join("nested")).unwrap();

        let config = Config {
            copy_on_success: true,
            doh_endpoint: "https://cloudflare-dns.com/dns-query".into(),
            ..Config::default()
        };
        manager.save_config(&config).unwrap();

        assert_eq!(manager.load_config().unwrap(), config);
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path()).unwrap();
        fs::write(manager.config_file(), "log_level = \"debug\"\n").unwrap();

        assert!(!manager.init_config(false).unwrap());
        assert_eq!(manager.load_config().unwrap().log_level, "debug");

        assert!(manager.init_config(true).unwrap());
        assert_eq!(manager.load_config().unwrap().log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_endpoint = Config {
            doh_endpoint: "dns.google/resolve".into(),
            ..Config::default()
        };
        assert!(bad_endpoint.validate().is_err());

        let bad_selector = Config {
            dkim_selector: "selector1._domainkey".into(),
            ..Config::default()
        };
        assert!(bad_selector.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = Config {
            request_timeout_secs: Some(0),
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), None);
    }
}
