//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.

use crate::http::{DEFAULT_HOST, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpTransportConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thecamp_application::{ClientSettings, DEFAULT_PAGE_SIZE};
use thecamp_domain::SortOrder;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("http.timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("http.host must start with http:// or https://, got '{0}'")]
    InvalidHost(String),

    #[error("letters.page_size cannot be 0")]
    InvalidPageSize,

    #[error("letters.order must be 'asc' or 'desc', got '{0}'")]
    InvalidOrder(String),
}

/// Raw HTTP configuration from TOML (`[http]` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHttpConfig {
    /// Portal base URL
    pub host: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileHttpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Raw letter listing configuration from TOML (`[letters]` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLettersConfig {
    /// Letters requested per page
    pub page_size: usize,
    /// Default listing order ("asc" or "desc")
    pub order: String,
}

impl Default for FileLettersConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            order: "asc".to_string(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Transport settings
    pub http: FileHttpConfig,
    /// Letter iterator settings
    pub letters: FileLettersConfig,
}

impl FileConfig {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        let host = self.http.host.trim();
        if !(host.starts_with("https://") || host.starts_with("http://")) {
            return Err(ConfigValidationError::InvalidHost(self.http.host.clone()));
        }

        if self.letters.page_size == 0 {
            return Err(ConfigValidationError::InvalidPageSize);
        }

        self.default_order()?;
        Ok(())
    }

    fn default_order(&self) -> Result<SortOrder, ConfigValidationError> {
        self.letters
            .order
            .parse()
            .map_err(|_| ConfigValidationError::InvalidOrder(self.letters.order.clone()))
    }

    /// Settings for the portal client.
    pub fn client_settings(&self) -> Result<ClientSettings, ConfigValidationError> {
        if self.letters.page_size == 0 {
            return Err(ConfigValidationError::InvalidPageSize);
        }
        Ok(ClientSettings::default()
            .with_page_size(self.letters.page_size)
            .with_default_order(self.default_order()?))
    }

    /// Settings for the HTTP transport.
    pub fn transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            host: self.http.host.trim().to_string(),
            user_agent: self.http.user_agent.clone(),
            timeout: Duration::from_secs(self.http.timeout_secs),
        }
    }
}
