//! Tests for the Conduit configuration system.

use std::sync::Mutex;

use conduit_core::config::{CliOverrides, ConduitConfig};
use conduit_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all CONDUIT_ env vars to prevent cross-test contamination.
fn clear_conduit_env_vars() {
    for key in [
        "CONDUIT_HOST",
        "CONDUIT_PORT",
        "CONDUIT_DB_PATH",
        "CONDUIT_READ_POOL_SIZE",
        "CONDUIT_JWT_SECRET",
        "CONDUIT_TOKEN_TTL_HOURS",
        "CONDUIT_BCRYPT_COST",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn layered_resolution_cli_over_env_over_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conduit_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("conduit.toml"),
        r#"
[server]
port = 9000
host = "127.0.0.1"

[database]
path = "/tmp/from-file.db"
read_pool_size = 2
"#,
    )
    .unwrap();

    std::env::set_var("CONDUIT_PORT", "9100");
    std::env::set_var("CONDUIT_DB_PATH", "/tmp/from-env.db");

    let cli = CliOverrides {
        db_path: Some("/tmp/from-cli.db".to_string()),
        ..Default::default()
    };
    let config = ConduitConfig::load(dir.path(), Some(&cli)).unwrap();

    // env beats the file
    assert_eq!(config.server.effective_port(), 9100);
    // cli beats env
    assert_eq!(config.database.effective_path(), "/tmp/from-cli.db");
    // file beats defaults
    assert_eq!(config.server.effective_host(), "127.0.0.1");
    assert_eq!(config.database.effective_read_pool_size(), 2);

    clear_conduit_env_vars();
}

#[test]
fn missing_project_file_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conduit_env_vars();

    let dir = tempdir();
    let config = ConduitConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.server.effective_port(), 8081);
    assert_eq!(config.server.effective_host(), "0.0.0.0");
    assert_eq!(
        config.server.effective_allowed_origins(),
        vec!["http://localhost:4100".to_string()]
    );
    assert_eq!(config.database.effective_path(), "./data/conduit.db");
    assert_eq!(config.database.effective_read_pool_size(), 4);
    assert_eq!(config.database.effective_busy_timeout_ms(), 5000);
    assert_eq!(config.auth.effective_token_ttl_hours(), 24);
    assert_eq!(config.auth.effective_bcrypt_cost(), 10);
    assert!(!config.auth.effective_jwt_secret().is_empty());
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conduit_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("conduit.toml"), "[server\nport = ").unwrap();

    let err = ConduitConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn unparsable_env_values_are_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conduit_env_vars();

    std::env::set_var("CONDUIT_PORT", "not-a-port");
    std::env::set_var("CONDUIT_BCRYPT_COST", "lots");

    let dir = tempdir();
    let config = ConduitConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.server.port, None);
    assert_eq!(config.auth.bcrypt_cost, None);

    clear_conduit_env_vars();
}

#[test]
fn validation_rejects_out_of_range_values() {
    let cases = [
        ("[server]\nport = 0", "server.port"),
        ("[database]\nread_pool_size = 0", "database.read_pool_size"),
        ("[auth]\ntoken_ttl_hours = 0", "auth.token_ttl_hours"),
        ("[auth]\nbcrypt_cost = 2", "auth.bcrypt_cost"),
        ("[auth]\nbcrypt_cost = 40", "auth.bcrypt_cost"),
        ("[auth]\njwt_secret = \"\"", "auth.jwt_secret"),
        ("[server]\nallowed_origins = [\"*\"]", "server.allowed_origins"),
        (
            "[server]\nallowed_origins = [\"http://localhost:4100\", \"*\"]",
            "server.allowed_origins",
        ),
    ];

    for (toml_str, expected_field) in cases {
        let config = ConduitConfig::from_toml(toml_str).unwrap();
        match ConduitConfig::validate(&config) {
            Err(ConfigError::ValidationFailed { field, .. }) => {
                assert_eq!(field, expected_field, "for input {toml_str:?}")
            }
            other => panic!("expected validation failure for {toml_str:?}, got {other:?}"),
        }
    }
}

#[test]
fn read_pool_size_is_clamped() {
    let config = ConduitConfig::from_toml("[database]\nread_pool_size = 64").unwrap();
    assert_eq!(config.database.effective_read_pool_size(), 8);
}

#[test]
fn unknown_keys_are_ignored() {
    let config = ConduitConfig::from_toml(
        r#"
[server]
port = 8100
shiny_new_option = true

[metrics]
enabled = true
"#,
    )
    .unwrap();
    assert_eq!(config.server.port, Some(8100));
}

#[test]
fn toml_roundtrip_preserves_values() {
    let config = ConduitConfig::from_toml(
        r#"
[server]
port = 8200
allowed_origins = ["https://conduit.example"]

[auth]
token_ttl_hours = 48
"#,
    )
    .unwrap();

    let serialized = config.to_toml().unwrap();
    let reparsed = ConduitConfig::from_toml(&serialized).unwrap();
    assert_eq!(reparsed.server.port, Some(8200));
    assert_eq!(
        reparsed.server.allowed_origins,
        vec!["https://conduit.example".to_string()]
    );
    assert_eq!(reparsed.auth.token_ttl_hours, Some(48));
}

#[test]
fn bind_address_joins_host_and_port() {
    let config = ConduitConfig::from_toml("[server]\nhost = \"127.0.0.1\"\nport = 3000").unwrap();
    assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
}
