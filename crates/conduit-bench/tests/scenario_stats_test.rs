//! Tests for scenario ramps, latency statistics and thresholds.

use std::time::Duration;

use conduit_bench::{LatencyStats, Sample, Scenario, Stage, Step, Thresholds};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn ramp(stages: Vec<Stage>) -> Scenario {
    Scenario {
        name: "custom",
        stages,
        steps: vec![Step::get("/articles", 0)],
        thresholds: Thresholds::default(),
        authenticated: false,
    }
}

// ── Scenario ─────────────────────────────────────────────────────────────

#[test]
fn target_ramps_linearly_from_zero() {
    let s = ramp(vec![Stage::new(10, 10), Stage::new(10, 10), Stage::new(10, 0)]);
    assert_eq!(s.target_at(Duration::ZERO), 0);
    assert_eq!(s.target_at(secs(5)), 5);
    assert_eq!(s.target_at(secs(10)), 10);
    assert_eq!(s.target_at(secs(15)), 10);
    assert_eq!(s.target_at(secs(25)), 5);
    assert_eq!(s.target_at(secs(30)), 0);
    assert_eq!(s.target_at(secs(300)), 0);
}

#[test]
fn zero_length_stage_jumps() {
    let s = Scenario::simple();
    assert_eq!(s.target_at(Duration::ZERO), 1);
    assert_eq!(s.target_at(ms(9_999)), 1);
    assert_eq!(s.total_duration(), secs(10));
}

#[test]
fn preset_durations_and_peaks() {
    let soak = Scenario::soak();
    assert_eq!(soak.total_duration(), secs(12 * 60));
    assert_eq!(soak.peak_target(), 10);
    assert_eq!(soak.steps.len(), 2);

    let spike = Scenario::spike();
    assert_eq!(spike.total_duration(), secs(6 * 60));
    assert_eq!(spike.peak_target(), 50);
    assert_eq!(spike.target_at(secs(30 + 60 + 15)), 28);

    let stress = Scenario::stress();
    assert_eq!(stress.total_duration(), secs(11 * 60));
    assert_eq!(stress.peak_target(), 30);
    assert_eq!(stress.thresholds.p95_ms, Some(3000.0));
    assert_eq!(stress.thresholds.max_failure_rate, Some(0.30));
}

#[test]
fn preset_lookup() {
    for name in Scenario::PRESETS {
        let s = Scenario::preset(name).unwrap();
        assert_eq!(&s.name, name);
    }
    assert!(Scenario::preset("marathon").is_none());
    assert!(!Scenario::simple().authenticated);
    assert!(Scenario::stress().authenticated);
}

// ── Stats ────────────────────────────────────────────────────────────────

fn samples(latencies_ms: &[u64], failures: usize) -> Vec<Sample> {
    latencies_ms
        .iter()
        .enumerate()
        .map(|(i, &l)| Sample {
            latency: ms(l),
            ok: i >= failures,
        })
        .collect()
}

#[test]
fn empty_samples_give_zeroed_stats() {
    let stats = LatencyStats::from_samples(&[]);
    assert_eq!(stats, LatencyStats::default());
    assert!(stats.evaluate(&Thresholds::default()).is_empty());
}

#[test]
fn nearest_rank_percentiles() {
    let latencies: Vec<u64> = (1..=100).rev().collect();
    let stats = LatencyStats::from_samples(&samples(&latencies, 0));
    assert_eq!(stats.count, 100);
    assert!((stats.p50_ms - 50.0).abs() < 1e-9);
    assert!((stats.p90_ms - 90.0).abs() < 1e-9);
    assert!((stats.p95_ms - 95.0).abs() < 1e-9);
    assert!((stats.p99_ms - 99.0).abs() < 1e-9);
    assert!((stats.max_ms - 100.0).abs() < 1e-9);
    assert!((stats.mean_ms - 50.5).abs() < 1e-9);
}

#[test]
fn small_sample_percentiles_use_top_rank() {
    let stats = LatencyStats::from_samples(&samples(&[10, 20, 30], 0));
    assert!((stats.p50_ms - 20.0).abs() < 1e-9);
    assert!((stats.p95_ms - 30.0).abs() < 1e-9);
    assert!((stats.p99_ms - 30.0).abs() < 1e-9);
}

#[test]
fn failure_rate_counts_non_2xx() {
    let stats = LatencyStats::from_samples(&samples(&[5; 10], 3));
    assert_eq!(stats.failures, 3);
    assert!((stats.failure_rate - 0.3).abs() < 1e-9);
}

#[test]
fn evaluate_reports_each_breach() {
    let stats = LatencyStats::from_samples(&samples(&[100, 200, 3000, 4000], 1));
    let thresholds = Thresholds {
        p95_ms: Some(1000.0),
        p99_ms: Some(5000.0),
        max_failure_rate: Some(0.10),
    };
    let breaches = stats.evaluate(&thresholds);
    let metrics: Vec<&str> = breaches.iter().map(|b| b.metric).collect();
    assert_eq!(metrics, vec!["p95_ms", "failure_rate"]);
    assert!(breaches[0].to_string().contains("exceeds limit"));

    let relaxed = Thresholds {
        p95_ms: None,
        p99_ms: None,
        max_failure_rate: None,
    };
    assert!(stats.evaluate(&relaxed).is_empty());
}

#[test]
fn limits_are_strict() {
    let stats = LatencyStats::from_samples(&samples(&[500], 0));
    let breaches = stats.evaluate(&Thresholds::default());
    assert_eq!(breaches.len(), 1);
    assert_eq!(breaches[0].metric, "p95_ms");
}
