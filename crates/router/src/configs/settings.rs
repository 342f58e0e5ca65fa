//! Layered settings: a per-environment TOML file overridden by
//! `ROUTER__`-prefixed environment variables.

use payment_interfaces::configs::Connectors;
use router_env::env;
use serde::Deserialize;

/// Application settings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Outbound proxy, if the deployment requires one
    pub proxy: Proxy,
    /// Provider base URLs
    pub connectors: Connectors,
    /// Logging configuration
    pub log: Log,
}

/// Outbound proxy configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
}

/// Logging configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Filter directive applied when `RUST_LOG` is unset
    pub level: String,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings for the current [`env::Env`]: `config/<env>.toml` when
    /// present, then environment overrides (`ROUTER__PROXY__HTTPS_URL=...`).
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::with_config_path(
            std::path::Path::new("config").join(env::which().config_file_name()),
        )
    }

    /// Load settings from an explicit file path plus environment overrides.
    pub fn with_config_path(path: std::path::PathBuf) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("ROUTER")
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
