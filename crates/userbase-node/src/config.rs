//! Node configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! environment variables (`PORT`, `HOST`, `MONGO_URI`, `JWT_SECRET`,
//! `TOKEN_TTL_SECS`, `REQUEST_TIMEOUT_SECS`, `LOG_LEVEL`, `LOG_FORMAT`).
//! A `.env` file, when present, is read into the environment first.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use userbase_auth::MIN_SECRET_LENGTH;

use crate::observability::LogFormat;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("failed to read env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Read `path` into the process environment. Variables that are already set
/// win over the file.
///
/// Returns `Ok(false)` when the file does not exist.
pub fn load_dotenv(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Configuration for the Userbase node.
#[derive(Clone, Deserialize, Serialize)]
pub struct Config {
    /// Listen port.
    pub port: u16,
    /// Listen host.
    pub host: String,
    /// Store connection string (`memory://` or `rocksdb://<path>`).
    pub mongo_uri: String,
    /// HMAC secret used to sign bearer tokens.
    #[serde(default)]
    pub jwt_secret: String,
    /// Bearer token lifetime in seconds.
    pub token_ttl_secs: u64,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (`pretty` or `json`).
    pub log_format: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            mongo_uri: "memory://".to_string(),
            jwt_secret: String::new(),
            token_ttl_secs: 3600,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, `path` (if it exists) and the
    /// process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_from(path, config::Environment::default())
    }

    fn load_from(path: &Path, env: config::Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("port", defaults.port)?
            .set_default("host", defaults.host)?
            .set_default("mongo_uri", defaults.mongo_uri)?
            .set_default("token_ttl_secs", defaults.token_ttl_secs)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", defaults.log_format)?;

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        }

        let config: Self = builder
            .add_source(env.ignore_empty(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that cannot be expressed in the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET must be set".to_string()));
        }
        if self.jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "JWT_SECRET must be at least {} bytes",
                MIN_SECRET_LENGTH
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "TOKEN_TTL_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Socket address to bind.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("bad listen address: {}", e)))
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed log format.
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.log_format)
    }
}
