//! The run orchestrator: sequences lifecycle phases, input application,
//! stepping, and validation across one simulation run, and repeats the whole
//! sequence for a configured number of fully independent runs.
//!
//! Runs never share component state. Each run instantiates a fresh component,
//! resets the time cursor to the configured start time, and reuses the same
//! immutable input, expected and override data. A failed run executes its
//! cleanup and never prevents the next run from starting.

mod builder;
mod runtime;

#[cfg(test)]
mod tests;

// Public re-exports
pub use builder::RunnerBuilder;
pub use runtime::Runner;

use crate::table::Time;
use serde::{Deserialize, Serialize};

/// Initial overrides applied once per run, strictly before initialization
/// mode. Order is preserved.
pub type InitOverrides = Vec<(String, String)>;

/// Explicit run configuration.
///
/// Replaces the source's module-level constants (fixed run count, hard-coded
/// fallback step size) with a value passed to the orchestrator at
/// construction. Both tolerances default to `None`, which keeps the literal
/// source behavior: exact floating-point matching of validation timestamps
/// and exact equality for `Real` comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of independent runs to execute
    pub run_count: usize,
    /// Step size for the last input row, which has no successor to diff
    pub default_step_size: Time,
    pub start_time: Time,
    /// Band for matching expected-row timestamps against the time cursor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_tolerance: Option<Time>,
    /// Band for comparing `Real` outputs against expected values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_tolerance: Option<f64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            run_count: 10,
            default_step_size: 0.5,
            start_time: 0.0,
            time_tolerance: None,
            real_tolerance: None,
        }
    }
}
