use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config format error: {0}")]
    Format(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Process-wide store configuration.
///
/// Fixed at startup and immutable afterwards; every provider and the store
/// client share one instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the remote store API host
    #[serde(default = "default_host")]
    pub host: String,

    /// REST API version segment
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Project the repository belongs to, by id or by namespaced path
    pub project_id: String,

    /// Branch or tag all reads and writes are scoped to
    #[serde(rename = "ref", default = "default_ref")]
    pub ref_name: String,

    /// Directory prefix under which file-collection resources live
    #[serde(default = "default_data_base_path")]
    pub data_base_path: String,

    /// Page size requested for tree listings
    #[serde(default = "default_tree_per_page")]
    pub tree_per_page: u64,

    /// OAuth settings consumed by the authentication collaborator
    #[serde(default)]
    pub oauth: OauthConfig,
}

/// OAuth application settings.
///
/// The token-refresh flow itself lives outside this crate; these values are
/// carried here so one file configures the whole process.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OauthConfig {
    /// OAuth application client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// Authorization endpoint base URL
    #[serde(default)]
    pub base_url: Option<String>,
}

// Default functions for serde
fn default_host() -> String {
    "https://gitlab.com".to_string()
}

fn default_api_version() -> String {
    "v4".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_ref() -> String {
    "master".to_string()
}

fn default_data_base_path() -> String {
    "data".to_string()
}

fn default_tree_per_page() -> u64 {
    100
}

impl StoreConfig {
    /// Create a configuration for the given project with every other field
    /// at its default
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            project_id: project_id.into(),
            ref_name: default_ref(),
            data_base_path: default_data_base_path(),
            tree_per_page: default_tree_per_page(),
            oauth: OauthConfig::default(),
        }
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::Format(format!("Failed to parse config: {}", e)))?;

        if config.project_id.is_empty() {
            return Err(ConfigError::Invalid(
                "project_id must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        // Create directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Format(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Get the default configuration location
    pub fn default_location() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("~/.config"));
        path.push("gitstore");
        path.push("config.toml");
        path
    }

    /// Root URL of the REST API, e.g. `https://gitlab.com/api/v4`
    pub fn api_url(&self) -> String {
        format!("{}/api/{}", self.host.trim_end_matches('/'), self.api_version)
    }
}
