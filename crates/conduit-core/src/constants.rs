//! Compiled defaults shared across crates.

/// Default page size for article listings and the feed.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Hard cap on a requested page size.
pub const MAX_PAGE_LIMIT: i64 = 100;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:4100";

pub const DEFAULT_DB_PATH: &str = "./data/conduit.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const MAX_READ_POOL_SIZE: usize = 8;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Development-only signing secret. Deployments set `CONDUIT_JWT_SECRET`.
pub const DEFAULT_JWT_SECRET: &str = "A String Very Very Very Strong!!@##$!@#$";
pub const DEFAULT_TOKEN_TTL_HOURS: u64 = 24;
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Scheme prefix expected in the `Authorization` header.
pub const TOKEN_SCHEME: &str = "Token";

/// Project config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "conduit.toml";
