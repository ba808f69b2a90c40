//! Latency statistics over a run's samples.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::scenario::Thresholds;

/// One completed (or failed) request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub latency: Duration,
    /// 2xx response.
    pub ok: bool,
}

/// Summary of a run. Latencies are in milliseconds and include failed
/// requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencyStats {
    pub count: usize,
    pub failures: usize,
    pub failure_rate: f64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

/// A threshold the run did not meet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdBreach {
    pub metric: &'static str,
    pub limit: f64,
    pub actual: f64,
}

impl fmt::Display for ThresholdBreach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.3} exceeds limit {:.3}", self.metric, self.actual, self.limit)
    }
}

impl LatencyStats {
    pub fn from_samples(samples: &[Sample]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut latencies: Vec<f64> = samples
            .iter()
            .map(|s| s.latency.as_secs_f64() * 1000.0)
            .collect();
        latencies.sort_by(f64::total_cmp);

        let count = samples.len();
        let failures = samples.iter().filter(|s| !s.ok).count();

        Self {
            count,
            failures,
            failure_rate: failures as f64 / count as f64,
            mean_ms: latencies.iter().sum::<f64>() / count as f64,
            p50_ms: nearest_rank(&latencies, 50.0),
            p90_ms: nearest_rank(&latencies, 90.0),
            p95_ms: nearest_rank(&latencies, 95.0),
            p99_ms: nearest_rank(&latencies, 99.0),
            max_ms: latencies.last().copied().unwrap_or(0.0),
        }
    }

    /// Every threshold the stats exceed. Empty means the run passed.
    /// Limits are strict: a value equal to its limit is a breach.
    pub fn evaluate(&self, thresholds: &Thresholds) -> Vec<ThresholdBreach> {
        let checks = [
            ("p95_ms", thresholds.p95_ms, self.p95_ms),
            ("p99_ms", thresholds.p99_ms, self.p99_ms),
            ("failure_rate", thresholds.max_failure_rate, self.failure_rate),
        ];

        checks
            .into_iter()
            .filter_map(|(metric, limit, actual)| {
                let limit = limit?;
                (actual >= limit).then_some(ThresholdBreach {
                    metric,
                    limit,
                    actual,
                })
            })
            .collect()
    }
}

/// Nearest-rank percentile of an ascending, non-empty slice.
fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    let rank = (p * sorted.len() as f64 / 100.0).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}
