//! Service configuration.
//!
//! Read from the YAML file named by `FIELDHOOK_CONFIG` (default
//! `config/fieldhook.yaml`). Every field has a default, so a missing file
//! yields a working service with no targets.

use chrono_tz::Tz;
use fieldhook_core::{HookError, IconPatterns};
use fieldhook_dispatch::DispatchConfig;
use fieldhook_template::NavigationProviders;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "FIELDHOOK_CONFIG";
pub const ADDR_ENV: &str = "FIELDHOOK_ADDR";
pub const DEFAULT_CONFIG_PATH: &str = "config/fieldhook.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    /// Base64 AES-256 key; bot tokens are plaintext when unset
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub site_url: String,
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_set")]
    pub default_icon_set: String,
    #[serde(default = "default_set")]
    pub default_species_set: String,
    /// IANA zone name used by the TIME token
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub navigation: NavigationProviders,
    #[serde(default)]
    pub icons: IconPatterns,
    #[serde(default)]
    pub geofences: HashMap<String, Vec<[f64; 2]>>,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default = "default_api_base")]
    pub telegram_api_base: String,
    #[serde(default = "default_targets_path")]
    pub targets_path: PathBuf,
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub translations_path: Option<PathBuf>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8787".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_set() -> String {
    "default".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_api_base() -> String {
    DispatchConfig::default().telegram_api_base
}

fn default_targets_path() -> PathBuf {
    PathBuf::from("config/targets.yaml")
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            site_url: String::new(),
            default_language: default_language(),
            default_icon_set: default_set(),
            default_species_set: default_set(),
            timezone: default_timezone(),
            navigation: NavigationProviders::default(),
            icons: IconPatterns::default(),
            geofences: HashMap::new(),
            credentials: CredentialsConfig::default(),
            telegram_api_base: default_api_base(),
            targets_path: default_targets_path(),
            catalog_path: None,
            translations_path: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, HookError> {
        serde_yaml::from_str(yaml).map_err(|e| HookError::ConfigError(format!("Failed to parse config YAML: {}", e)))
    }

    /// Load from a file; a missing file gives the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HookError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found; using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| HookError::ConfigError(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Load from `FIELDHOOK_CONFIG`, then apply `FIELDHOOK_ADDR`
    pub fn from_env() -> Result<Self, HookError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load(path)?;
        if let Ok(addr) = std::env::var(ADDR_ENV) {
            config.listen_addr = addr;
        }
        Ok(config)
    }

    pub fn timezone(&self) -> Result<Tz, HookError> {
        self.timezone
            .parse()
            .map_err(|_| HookError::ConfigError(format!("unknown time zone '{}'", self.timezone)))
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            default_language: self.default_language.clone(),
            default_icon_set: self.default_icon_set.clone(),
            default_species_set: self.default_species_set.clone(),
            telegram_api_base: self.telegram_api_base.clone(),
        }
    }
}
