use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration with strongly-typed sections.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout; 0 disables the timeout layer.
    pub timeout_sec: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            timeout_sec: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. "sqlite://hospital.db?mode=rwc".
    pub url: String,
    pub max_conns: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://hospital.db?mode=rwc".to_string(),
            max_conns: 10,
        }
    }
}

/// Development fallback; override via config file or HOSPITAL__AUTH__JWT_SECRET.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    /// Secure + SameSite=None cookies; enable behind HTTPS in production.
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_days: 30,
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Layered loading: defaults → YAML file → environment variables.
    /// Example: HOSPITAL__SERVER__PORT=8080 maps to server.port.
    pub fn load_layered(config_path: &Path) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Yaml::file(config_path))
            .merge(Env::prefixed("HOSPITAL__").split("__"))
            .extract()
            .context("Failed to extract config from figment")
    }

    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                use figment::{
                    providers::{Env, Serialized},
                    Figment,
                };
                Figment::new()
                    .merge(Serialized::defaults(AppConfig::default()))
                    .merge(Env::prefixed("HOSPITAL__").split("__"))
                    .extract()
                    .context("Failed to extract config from figment")
            }
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }
}
