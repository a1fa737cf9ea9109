//! Configuration management for the Vectordeck console.
//!
//! Configuration is merged from three layers, lowest precedence first:
//! - Defaults
//! - Config file (`vectordeck.yaml`, or the path in `VECTORDECK_CONFIG`)
//! - Environment variables, then command-line flags
//!
//! The console keeps no state of its own; everything here describes how to
//! reach and poll the backend gateway.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the backend gateway
    pub base_url: String,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Request timeout for gateway calls, in seconds
    pub request_timeout_secs: u64,

    /// Page size for file and vector-store listings
    pub list_limit: u32,

    /// Page size when enumerating a vector store's members.
    /// A single page is fetched per store; larger stores under-report.
    pub member_page_limit: u32,

    /// Interval between backend health probes, in seconds
    pub poll_interval_secs: u64,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    gateway: Option<GatewaySection>,
    console: Option<ConsoleSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GatewaySection {
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConsoleSection {
    #[serde(rename = "listLimit")]
    list_limit: Option<u32>,
    #[serde(rename = "memberPageLimit")]
    member_page_limit: Option<u32>,
    #[serde(rename = "pollIntervalSecs")]
    poll_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8321".to_string(),
            config_file: None,
            request_timeout_secs: 30,
            list_limit: 100,
            member_page_limit: 1000,
            poll_interval_secs: 30,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `VECTORDECK_BASE_URL`: backend gateway base URL
    /// - `VECTORDECK_CONFIG`: path to config file
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("VECTORDECK_CONFIG") {
            config.config_file = Some(PathBuf::from(path));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("vectordeck.yaml"));

        if config_path.exists() {
            config.merge_yaml(&config_path)?;
        }

        // Environment variables override the config file
        if let Ok(base_url) = std::env::var("VECTORDECK_BASE_URL") {
            config.base_url = base_url;
        }

        config.log_level = std::env::var("RUST_LOG").ok().or(config.log_level);

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(gateway) = file.gateway {
            if let Some(base_url) = gateway.base_url {
                self.base_url = base_url;
            }
            if let Some(timeout) = gateway.timeout_secs {
                self.request_timeout_secs = timeout;
            }
        }

        if let Some(console) = file.console {
            if let Some(limit) = console.list_limit {
                self.list_limit = limit;
            }
            if let Some(limit) = console.member_page_limit {
                self.member_page_limit = limit;
            }
            if let Some(interval) = console.poll_interval_secs {
                self.poll_interval_secs = interval;
            }
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        Ok(())
    }

    /// Apply CLI overrides, giving flags precedence over everything else.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        config_file: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the configuration before any gateway call is made.
    pub fn validate(&self) -> AppResult<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self.list_limit == 0 || self.member_page_limit == 0 {
            return Err(AppError::Config(
                "Listing limits must be greater than zero".to_string(),
            ));
        }

        if self.poll_interval_secs == 0 {
            return Err(AppError::Config(
                "Poll interval must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
