//! # conduit-bench
//!
//! Tooling around a running Conduit server:
//! - **scenario**: staged virtual-user ramps with pass/fail thresholds
//! - **stats**: latency percentiles and threshold evaluation
//! - **runner**: async HTTP driver that plays a scenario against a base URL
//! - **fixtures**: deterministic generators for seed data
//!
//! The `conduit-tune` binary covers the database side: it applies the
//! performance index catalog and refreshes planner statistics.

pub mod fixtures;
pub mod runner;
pub mod scenario;
pub mod stats;

pub use runner::{Runner, RunnerError};
pub use scenario::{Scenario, Stage, Step, Thresholds};
pub use stats::{LatencyStats, Sample, ThresholdBreach};
