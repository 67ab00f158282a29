//! Settings loaded from an optional TOML file plus environment overrides.
//!
//! The file path comes from `TERRENOS_CONFIG` (default `config.toml`);
//! environment variables use the `TERRENOS__` prefix with `__` as the
//! section separator, e.g. `TERRENOS__SERVER__PORT=8080`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: AppSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database target: `memory`, a sqlite file path, or a full URL.
    pub database: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl ServerSettings {
    /// Normalize the configured database target into a connection URL.
    pub fn database_url(&self) -> String {
        match self.database.as_str() {
            "memory" => "sqlite::memory:".to_string(),
            url if url.contains("://") || url.starts_with("sqlite:") => url.to_string(),
            path => format!("sqlite://{path}?mode=rwc"),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    8
}

fn default_timeout_secs() -> u64 {
    10
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path =
            std::env::var("TERRENOS_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("TERRENOS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
