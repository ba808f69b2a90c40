//! Runner tests against an in-process server bound to an ephemeral port.

use std::time::Duration;

use conduit_api::{build_router, AppState};
use conduit_bench::fixtures::{seed_articles, SimpleRng};
use conduit_bench::runner::PERF_USER;
use conduit_bench::{LatencyStats, Runner, Scenario, Stage, Step, Thresholds};
use conduit_core::config::ConduitConfig;
use conduit_storage::DatabaseManager;

async fn spawn_server() -> String {
    let config =
        ConduitConfig::from_toml("[auth]\nbcrypt_cost = 4\njwt_secret = \"bench-secret\"").unwrap();
    let db = DatabaseManager::open_in_memory().unwrap();
    let app = build_router(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/")
}

#[tokio::test]
async fn setup_registers_then_logs_in() {
    let base = spawn_server().await;
    let runner = Runner::new(&base).unwrap();
    assert_eq!(runner.url("/tags"), base.trim_end_matches('/').to_string() + "/tags");

    let first = runner.setup(&PERF_USER).await.unwrap();
    let second = runner.setup(&PERF_USER).await.unwrap();
    assert!(!first.is_empty());
    assert!(!second.is_empty());
}

#[tokio::test]
async fn seed_creates_articles() {
    let base = spawn_server().await;
    let runner = Runner::new(&base).unwrap();
    let token = runner.setup(&PERF_USER).await.unwrap();

    let articles = seed_articles(&mut SimpleRng::new(5), 3);
    assert_eq!(runner.seed(&token, &articles).await.unwrap(), 3);

    // Same titles again collide on the slug.
    assert_eq!(runner.seed(&token, &articles).await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn short_run_records_successful_samples() {
    let base = spawn_server().await;
    let runner = Runner::new(&base).unwrap();
    let token = runner.setup(&PERF_USER).await.unwrap();

    let scenario = Scenario {
        name: "short",
        stages: vec![Stage::new(0, 2), Stage::new(1, 2)],
        steps: vec![Step::get("/articles", 0), Step::get("/tags", 0)],
        thresholds: Thresholds {
            p95_ms: None,
            p99_ms: None,
            max_failure_rate: Some(0.01),
        },
        authenticated: true,
    };

    let samples = runner.run(&scenario, Some(token)).await.unwrap();
    assert!(!samples.is_empty());
    assert!(samples.iter().all(|s| s.ok));
    assert!(samples.iter().all(|s| s.latency < Duration::from_secs(30)));

    let stats = LatencyStats::from_samples(&samples);
    assert!(stats.evaluate(&scenario.thresholds).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_server_fails_every_sample() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let runner = Runner::new(&format!("http://{addr}/api")).unwrap();
    assert!(runner.setup(&PERF_USER).await.is_err());

    let scenario = Scenario {
        name: "dead",
        stages: vec![Stage::new(0, 1), Stage::new(1, 1)],
        steps: vec![Step::get("/articles", 0)],
        thresholds: Thresholds::default(),
        authenticated: false,
    };
    let samples = runner.run(&scenario, None).await.unwrap();
    assert!(!samples.is_empty());
    assert!(samples.iter().all(|s| !s.ok));
}
