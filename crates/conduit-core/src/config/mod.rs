//! Configuration system for Conduit.
//! TOML-based, layered resolution: CLI > env > project file > defaults.

pub mod auth_config;
pub mod conduit_config;
pub mod database_config;
pub mod server_config;

pub use auth_config::AuthConfig;
pub use conduit_config::{CliOverrides, ConduitConfig};
pub use database_config::DatabaseConfig;
pub use server_config::ServerConfig;
