//! Server configuration
//!
//! Everything is read from environment variables at startup. A `.env` file in
//! the working directory is honoured for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_STORAGE_PATH: &str = "./palabreo_data";

/// Origins accepted by the CORS layer when none are configured
pub const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which browser origins may call the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl Default for CorsOrigins {
    fn default() -> Self {
        Self::List(DEV_ORIGINS.iter().map(|s| s.to_string()).collect())
    }
}

impl CorsOrigins {
    /// Parse `*` or a comma-separated origin list
    pub fn parse(value: &str) -> Self {
        if value.trim() == "*" {
            return Self::Any;
        }
        Self::List(
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub storage_path: PathBuf,
    pub cors_origins: CorsOrigins,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            cors_origins: CorsOrigins::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        // Tests must not pick up a developer's .env
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_str =
            std::env::var("PALABREO_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_address = bind_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("PALABREO_BIND_ADDR".to_string(), e.to_string())
        })?;

        let storage_path = std::env::var("PALABREO_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH));

        let cors_origins = std::env::var("PALABREO_CORS_ORIGINS")
            .ok()
            .map(|v| CorsOrigins::parse(&v))
            .unwrap_or_default();

        Ok(Self {
            bind_address,
            storage_path,
            cors_origins,
        })
    }
}
