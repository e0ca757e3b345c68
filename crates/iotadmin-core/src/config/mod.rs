//! Configuration types for iotadmin.
//!
//! Configuration is loaded from a single YAML file (`iotadmin.yaml` by default)
//! and can be partially overridden from the environment. Every section is
//! optional; a missing file section falls back to its defaults.
//!
//! # Example
//!
//! ```yaml
//! api:
//!   base_url: http://192.168.1.20:8000/api
//!   timeout_secs: 10
//! dashboard:
//!   port: 8080
//! session:
//!   backend: file
//!   path: .iotadmin/session.json
//! ```

pub mod api;
pub mod dashboard;
pub mod session;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use api::ApiConfig;
pub use dashboard::DashboardConfig;
pub use session::{SessionBackend, SessionConfig};

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "IOTADMIN_API_URL";

/// Environment variable overriding `session.path`.
pub const ENV_SESSION_PATH: &str = "IOTADMIN_SESSION_PATH";

/// Complete iotadmin configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IotAdminConfig {
    /// Backend REST API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Dashboard web UI settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Where the session is kept between requests/invocations.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IotAdminConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise use defaults, then apply env overrides.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `IOTADMIN_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL)
            && !url.trim().is_empty()
        {
            self.api.base_url = url;
        }
        if let Ok(path) = std::env::var(ENV_SESSION_PATH)
            && !path.trim().is_empty()
        {
            self.session.path = path.into();
        }
    }

    /// Reject values that would make the client unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://")) {
            return Err(ConfigError::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Config("api.timeout_secs must be > 0".to_string()));
        }
        if self.dashboard.dashboard_poll_secs == 0 || self.dashboard.control_poll_secs == 0 {
            return Err(ConfigError::Config("poll intervals must be > 0".to_string()));
        }
        Ok(())
    }
}
