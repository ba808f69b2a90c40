//! Load scenarios: a staged virtual-user ramp, the requests each virtual
//! user repeats, and the thresholds a run must stay within.

use std::time::Duration;

use serde::Serialize;

/// Ramp the VU count linearly to `target` over `duration`.
/// A zero-length stage jumps straight to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub duration: Duration,
    pub target: u32,
}

impl Stage {
    pub const fn new(secs: u64, target: u32) -> Self {
        Self {
            duration: Duration::from_secs(secs),
            target,
        }
    }
}

/// One request of a VU iteration: GET `path` (relative to the API root),
/// then sleep for `pause`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    pub path: &'static str,
    pub pause: Duration,
}

impl Step {
    pub const fn get(path: &'static str, pause_secs: u64) -> Self {
        Self {
            path,
            pause: Duration::from_secs(pause_secs),
        }
    }
}

/// Pass/fail limits for a run. `None` means unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    /// Fraction in `0.0..=1.0`.
    pub max_failure_rate: Option<f64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            p95_ms: Some(500.0),
            p99_ms: None,
            max_failure_rate: Some(0.01),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub name: &'static str,
    pub stages: Vec<Stage>,
    pub steps: Vec<Step>,
    pub thresholds: Thresholds,
    /// Whether requests carry the perf user's token.
    pub authenticated: bool,
}

impl Scenario {
    pub const PRESETS: &'static [&'static str] = &["simple", "soak", "spike", "stress"];

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "simple" => Some(Self::simple()),
            "soak" => Some(Self::soak()),
            "spike" => Some(Self::spike()),
            "stress" => Some(Self::stress()),
            _ => None,
        }
    }

    /// Smoke check: one VU for ten seconds, anonymous.
    pub fn simple() -> Self {
        Self {
            name: "simple",
            stages: vec![Stage::new(0, 1), Stage::new(10, 1)],
            steps: vec![Step::get("/articles", 1)],
            thresholds: Thresholds::default(),
            authenticated: false,
        }
    }

    /// Sustained moderate load.
    pub fn soak() -> Self {
        Self {
            name: "soak",
            stages: vec![Stage::new(60, 10), Stage::new(600, 10), Stage::new(60, 0)],
            steps: vec![Step::get("/articles", 3), Step::get("/tags", 2)],
            thresholds: Thresholds {
                p95_ms: Some(1000.0),
                p99_ms: Some(2000.0),
                max_failure_rate: Some(0.10),
            },
            authenticated: true,
        }
    }

    /// Sudden jump from 5 to 50 VUs and back.
    pub fn spike() -> Self {
        Self {
            name: "spike",
            stages: vec![
                Stage::new(30, 5),
                Stage::new(60, 5),
                Stage::new(30, 50),
                Stage::new(120, 50),
                Stage::new(30, 5),
                Stage::new(60, 5),
                Stage::new(30, 0),
            ],
            steps: vec![Step::get("/articles", 0)],
            thresholds: Thresholds::default(),
            authenticated: true,
        }
    }

    /// Stepped ramp to 30 VUs with relaxed limits.
    pub fn stress() -> Self {
        Self {
            name: "stress",
            stages: vec![
                Stage::new(60, 10),
                Stage::new(120, 10),
                Stage::new(60, 20),
                Stage::new(120, 20),
                Stage::new(60, 30),
                Stage::new(120, 30),
                Stage::new(120, 0),
            ],
            steps: vec![Step::get("/articles", 1), Step::get("/tags", 1)],
            thresholds: Thresholds {
                p95_ms: Some(3000.0),
                p99_ms: None,
                max_failure_rate: Some(0.30),
            },
            authenticated: true,
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    /// Number of VUs that should be active `elapsed` into the run.
    pub fn target_at(&self, elapsed: Duration) -> u32 {
        let mut previous = 0u32;
        let mut stage_start = Duration::ZERO;

        for stage in &self.stages {
            let stage_end = stage_start + stage.duration;
            if elapsed < stage_end {
                let progress = (elapsed - stage_start).as_secs_f64() / stage.duration.as_secs_f64();
                let from = f64::from(previous);
                let to = f64::from(stage.target);
                return (from + (to - from) * progress).round() as u32;
            }
            previous = stage.target;
            stage_start = stage_end;
        }
        previous
    }

    /// Highest VU count any stage reaches.
    pub fn peak_target(&self) -> u32 {
        self.stages.iter().map(|s| s.target).max().unwrap_or(0)
    }
}
