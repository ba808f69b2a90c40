use std::process::ExitCode;

use clap::Parser;
use conduit_api::server;
use conduit_core::config::{CliOverrides, ConduitConfig};
use conduit_core::tracing::init_tracing;

/// Conduit API server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Port to listen on (overrides config and CONDUIT_PORT).
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database path (overrides config and CONDUIT_DB_PATH).
    #[arg(long)]
    db: Option<String>,

    /// Directory searched for conduit.toml.
    #[arg(long, default_value = ".")]
    config_dir: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let cli = CliOverrides {
        port: args.port,
        db_path: args.db,
    };
    let config = match ConduitConfig::load(&args.config_dir, Some(&cli)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server exited with error");
            ExitCode::FAILURE
        }
    }
}
