//! Top-level Conduit configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AuthConfig, DatabaseConfig, ServerConfig};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CONDUIT_*`)
/// 3. Project config (`conduit.toml` in the given root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConduitConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// CLI override arguments that can be applied to a config.
/// Binaries fill this from their parsed command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub db_path: Option<String>,
}

impl ConduitConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ConduitConfig) -> Result<(), ConfigError> {
        if config.server.port == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "server.port".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.server.allowed_origins.iter().any(|o| o.trim() == "*") {
            return Err(ConfigError::ValidationFailed {
                field: "server.allowed_origins".to_string(),
                message: "wildcard origin cannot be combined with credentials; list origins explicitly"
                    .to_string(),
            });
        }
        if config.database.read_pool_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "database.read_pool_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.auth.token_ttl_hours == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "auth.token_ttl_hours".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(cost) = config.auth.bcrypt_cost {
            if !(4..=31).contains(&cost) {
                return Err(ConfigError::ValidationFailed {
                    field: "auth.bcrypt_cost".to_string(),
                    message: "must be between 4 and 31".to_string(),
                });
            }
        }
        if let Some(ref secret) = config.auth.jwt_secret {
            if secret.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "auth.jwt_secret".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ConduitConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ConduitConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut ConduitConfig, other: &ConduitConfig) {
        // Server
        if other.server.host.is_some() {
            base.server.host = other.server.host.clone();
        }
        if other.server.port.is_some() {
            base.server.port = other.server.port;
        }
        if !other.server.allowed_origins.is_empty() {
            base.server.allowed_origins = other.server.allowed_origins.clone();
        }

        // Database
        if other.database.path.is_some() {
            base.database.path = other.database.path.clone();
        }
        if other.database.read_pool_size.is_some() {
            base.database.read_pool_size = other.database.read_pool_size;
        }
        if other.database.busy_timeout_ms.is_some() {
            base.database.busy_timeout_ms = other.database.busy_timeout_ms;
        }

        // Auth
        if other.auth.jwt_secret.is_some() {
            base.auth.jwt_secret = other.auth.jwt_secret.clone();
        }
        if other.auth.token_ttl_hours.is_some() {
            base.auth.token_ttl_hours = other.auth.token_ttl_hours;
        }
        if other.auth.bcrypt_cost.is_some() {
            base.auth.bcrypt_cost = other.auth.bcrypt_cost;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CONDUIT_PORT`, `CONDUIT_DB_PATH`, `CONDUIT_JWT_SECRET`, etc.
    fn apply_env_overrides(config: &mut ConduitConfig) {
        if let Ok(val) = std::env::var("CONDUIT_HOST") {
            config.server.host = Some(val);
        }
        if let Ok(val) = std::env::var("CONDUIT_PORT") {
            if let Ok(v) = val.parse::<u16>() {
                config.server.port = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONDUIT_DB_PATH") {
            config.database.path = Some(val);
        }
        if let Ok(val) = std::env::var("CONDUIT_READ_POOL_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.database.read_pool_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONDUIT_JWT_SECRET") {
            config.auth.jwt_secret = Some(val);
        }
        if let Ok(val) = std::env::var("CONDUIT_TOKEN_TTL_HOURS") {
            if let Ok(v) = val.parse::<u64>() {
                config.auth.token_ttl_hours = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONDUIT_BCRYPT_COST") {
            if let Ok(v) = val.parse::<u32>() {
                config.auth.bcrypt_cost = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ConduitConfig, cli: &CliOverrides) {
        if let Some(v) = cli.port {
            config.server.port = Some(v);
        }
        if let Some(ref v) = cli.db_path {
            config.database.path = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
