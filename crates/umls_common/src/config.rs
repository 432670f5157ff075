//! Client configuration
//!
//! One `ClientConfig` is shared by every resource family. It can come from
//! the environment, from a TOML file, or from both (file first, then the
//! environment fills in a missing API key).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Public UTS REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://uts-ws.nlm.nih.gov/rest";

/// Release alias resolved server-side to the newest UMLS release
pub const DEFAULT_VERSION: &str = "current";

/// Primary environment variable holding the UTS API key
pub const API_KEY_ENV: &str = "UMLS_API_KEY";

/// Legacy variable name accepted as a fallback
pub const API_KEY_ENV_FALLBACK: &str = "API_KEY";

pub const VERSION_ENV: &str = "UMLS_VERSION";
pub const BASE_URL_ENV: &str = "UMLS_BASE_URL";
pub const TIMEOUT_ENV: &str = "UMLS_TIMEOUT_SECS";

/// Configuration errors. These are startup failures and are not recoverable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API key is required for UMLS API requests (set UMLS_API_KEY)")]
    MissingApiKey,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Settings shared by all resource families
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// UTS API key, sent as the `apiKey` query parameter
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// UMLS release, e.g. "current" or "2024AA"
    #[serde(default = "default_version")]
    pub version: String,

    /// Request timeout handed to the HTTP transport
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            version: default_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build config from process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file, letting the environment fill gaps
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_lookup(path, |key| std::env::var(key).ok())
    }

    pub fn load_with_lookup<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        // File values win, except for a key the file leaves empty
        if config.api_key.trim().is_empty() {
            if let Some(key) = api_key_from(&lookup) {
                config.api_key = key;
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = api_key_from(lookup) {
            self.api_key = key;
        }
        if let Some(version) = lookup(VERSION_ENV).filter(|v| !v.trim().is_empty()) {
            self.version = version.trim().to_string();
        }
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: TIMEOUT_ENV.to_string(),
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    /// Reject configs that cannot authenticate
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

fn api_key_from<F>(lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(API_KEY_ENV)
        .or_else(|| lookup(API_KEY_ENV_FALLBACK))
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}
