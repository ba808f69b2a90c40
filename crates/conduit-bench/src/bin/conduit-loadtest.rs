use std::process::ExitCode;

use clap::Parser;
use conduit_bench::fixtures::{seed_articles, SimpleRng};
use conduit_bench::runner::PERF_USER;
use conduit_bench::{LatencyStats, Runner, Scenario};
use conduit_core::tracing::init_tracing;

/// Drive a running Conduit server with a staged load scenario.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scenario preset.
    #[arg(value_parser = clap::builder::PossibleValuesParser::new(Scenario::PRESETS))]
    scenario: String,

    /// API root of the server under test.
    #[arg(default_value = "http://localhost:8081/api")]
    base_url: String,

    /// Articles to create as the perf user before the run.
    #[arg(long, default_value_t = 0)]
    seed: usize,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let Some(scenario) = Scenario::preset(&args.scenario) else {
        eprintln!("unknown scenario: {}", args.scenario);
        return ExitCode::FAILURE;
    };

    let runner = match Runner::new(&args.base_url) {
        Ok(runner) => runner,
        Err(e) => {
            tracing::error!(error = %e, "could not build http client");
            return ExitCode::FAILURE;
        }
    };

    let token = if scenario.authenticated || args.seed > 0 {
        match runner.setup(&PERF_USER).await {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::error!(error = %e, "perf user setup failed");
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    if let (Some(token), true) = (&token, args.seed > 0) {
        let articles = seed_articles(&mut SimpleRng::from_clock(), args.seed);
        match runner.seed(token, &articles).await {
            Ok(created) => tracing::info!(created, requested = args.seed, "seeded articles"),
            Err(e) => {
                tracing::error!(error = %e, "seeding failed");
                return ExitCode::FAILURE;
            }
        }
    }

    let run_token = token.filter(|_| scenario.authenticated);
    let samples = match runner.run(&scenario, run_token).await {
        Ok(samples) => samples,
        Err(e) => {
            tracing::error!(error = %e, "load run failed");
            return ExitCode::FAILURE;
        }
    };

    let stats = LatencyStats::from_samples(&samples);
    let breaches = stats.evaluate(&scenario.thresholds);

    if args.json {
        let report = serde_json::json!({
            "scenario": scenario.name,
            "stats": stats,
            "thresholds": scenario.thresholds,
            "breaches": breaches,
        });
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => tracing::error!(error = %e, "could not serialize report"),
        }
    } else {
        println!("scenario      {}", scenario.name);
        println!("requests      {}", stats.count);
        println!("failures      {} ({:.2}%)", stats.failures, stats.failure_rate * 100.0);
        println!("mean          {:.2} ms", stats.mean_ms);
        println!("p50           {:.2} ms", stats.p50_ms);
        println!("p90           {:.2} ms", stats.p90_ms);
        println!("p95           {:.2} ms", stats.p95_ms);
        println!("p99           {:.2} ms", stats.p99_ms);
        println!("max           {:.2} ms", stats.max_ms);
        for breach in &breaches {
            println!("BREACH        {breach}");
        }
    }

    if breaches.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
