//! Environment of the application.

use std::str::FromStr;

/// Name of the environment variable selecting the runtime environment.
pub const RUN_ENV: &str = "RUN_ENV";

/// Runtime environment the application runs in.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Env {
    /// Local development
    #[default]
    Development,
    /// Hosted sandbox, talking to provider sandboxes
    Sandbox,
    /// Production
    Production,
}

/// Which environment the application currently runs in.
pub fn which() -> Env {
    std::env::var(RUN_ENV)
        .ok()
        .and_then(|env| Env::from_str(&env).ok())
        .unwrap_or_default()
}

impl Env {
    /// Name of the configuration file matching this environment.
    pub fn config_file_name(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Sandbox => "sandbox.toml",
            Self::Production => "production.toml",
        }
    }
}
