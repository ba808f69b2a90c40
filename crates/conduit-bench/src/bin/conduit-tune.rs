use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use conduit_core::config::{CliOverrides, ConduitConfig};
use conduit_core::tracing::init_tracing;
use conduit_storage::tuning;
use conduit_storage::DatabaseManager;

/// Apply the performance index catalog to a Conduit database.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Database file. Defaults to the configured path.
    db_path: Option<String>,

    /// Directory searched for conduit.toml.
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let cli = CliOverrides {
        port: None,
        db_path: args.db_path,
    };
    let config = match ConduitConfig::load(&args.config_dir, Some(&cli)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let path = PathBuf::from(config.database.effective_path());
    let db = match DatabaseManager::open_with(&path, &config.database) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "could not open database");
            return ExitCode::FAILURE;
        }
    };

    let outcome = db.with_writer(|conn| {
        let settings = tuning::pool_settings(conn)?;
        println!("database      {}", path.display());
        println!("journal_mode  {}", settings.journal_mode);
        println!("synchronous   {}", settings.synchronous);
        println!("cache_size    {}", settings.cache_size);
        println!("busy_timeout  {} ms", settings.busy_timeout_ms);
        println!("foreign_keys  {}", settings.foreign_keys);

        let report = tuning::apply_performance_indexes(conn);
        println!();
        for name in &report.created {
            println!("created       {name}");
        }
        for (name, message) in &report.failed {
            println!("failed        {name}: {message}");
        }

        let present = tuning::list_custom_indexes(conn)?;
        println!();
        println!("{} custom indexes present", present.len());
        for name in &present {
            println!("  {name}");
        }

        tuning::analyze(conn)?;
        println!("statistics refreshed");
        Ok(report)
    });

    match outcome {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(report) => {
            tracing::warn!(failed = report.failed.len(), "some indexes could not be created");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "tuning failed");
            ExitCode::FAILURE
        }
    }
}
