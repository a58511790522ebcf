//! Comparison of actual component outputs against the expected table, and
//! the per-run report.
//!
//! Mismatches are recorded, never fatal: a failed comparison does not abort
//! the run, and a run that aborted for lifecycle reasons still renders the
//! records it gathered before the failure.

use crate::component::Instance;
use crate::errors::CosimError;
use crate::table::{Table, Time};
use crate::value::Value;
use crate::variable::VariableRegistry;
use is_close::is_close;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pass/fail verdict for one variable at one matched timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Pass,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "OK"),
            Outcome::Fail => write!(f, "FAILED"),
        }
    }
}

/// One comparison of expected vs. actual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub time: Time,
    pub variable: String,
    pub expected: Value,
    pub actual: Value,
    pub outcome: Outcome,
}

impl fmt::Display for ValidationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Pass => write!(f, "{} = {} ? OK", self.variable, self.expected),
            Outcome::Fail => write!(
                f,
                "{} = {} ? FAILED (actual: {})",
                self.variable, self.expected, self.actual
            ),
        }
    }
}

/// Compares typed values, exactly by default.
///
/// When a real tolerance is configured, `Real` comparisons use an absolute
/// band; `Integer`, `Boolean` and `String` always compare exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    real_tolerance: Option<f64>,
}

impl Validator {
    pub fn new(real_tolerance: Option<f64>) -> Self {
        Self { real_tolerance }
    }

    /// Compare one expected/actual pair into a record.
    pub fn check(
        &self,
        time: Time,
        variable: &str,
        expected: Value,
        actual: Value,
    ) -> ValidationRecord {
        let matched = match (&expected, &actual) {
            (Value::Real(e), Value::Real(a)) => match self.real_tolerance {
                Some(tol) => is_close!(*e, *a, abs_tol = tol),
                None => e == a,
            },
            _ => expected == actual,
        };
        ValidationRecord {
            time,
            variable: variable.to_string(),
            expected,
            actual,
            outcome: if matched { Outcome::Pass } else { Outcome::Fail },
        }
    }

    /// Validate every non-time column of one matched expected row.
    ///
    /// Columns that fail to resolve against the registry, cells that fail to
    /// decode, and values that cannot be read back are logged and skipped;
    /// they produce no record and never abort the run.
    pub fn validate_row(
        &self,
        registry: &VariableRegistry,
        instance: &Instance,
        expected: &Table,
        row: usize,
        time: Time,
    ) -> Vec<ValidationRecord> {
        let mut records = Vec::new();
        for (name, raw) in expected.entries(row) {
            let descriptor = match registry.resolve(name) {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    warn!("skipping expected column '{}': {}", name, err);
                    continue;
                }
            };
            let expected_value = match Value::decode(descriptor.var_type, raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!("skipping expected value for '{}': {}", name, err);
                    continue;
                }
            };
            let actual = match instance.get_value(descriptor) {
                Ok(value) => value,
                Err(err) => {
                    warn!("could not read '{}': {}", name, err);
                    continue;
                }
            };
            records.push(self.check(time, name, expected_value, actual));
        }
        records
    }
}

/// Everything observed during one simulation run.
#[derive(Debug)]
pub struct RunReport {
    pub run_index: usize,
    pub records: Vec<ValidationRecord>,
    pub steps_completed: usize,
    /// The lifecycle error that aborted the run, if any
    pub failure: Option<CosimError>,
}

impl RunReport {
    pub fn new(run_index: usize) -> Self {
        Self {
            run_index,
            records: Vec::new(),
            steps_completed: 0,
            failure: None,
        }
    }

    /// True when the run completed and every comparison passed.
    pub fn passed(&self) -> bool {
        self.failure.is_none() && self.records.iter().all(|r| r.outcome == Outcome::Pass)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "run #{}:", self.run_index + 1)?;
        let mut last_time = None;
        for record in &self.records {
            if last_time != Some(record.time) {
                writeln!(f, "validating results for t={}:", record.time)?;
                last_time = Some(record.time);
            }
            writeln!(f, "  {}", record)?;
        }
        if let Some(err) = &self.failure {
            writeln!(f, "run aborted: {}", err)?;
        }
        Ok(())
    }
}

/// Render the cross-run summary block.
pub fn summary(reports: &[RunReport]) -> String {
    use fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "----- SUMMARY -----");
    for report in reports {
        let _ = writeln!(
            out,
            "run {}: {}",
            report.run_index + 1,
            if report.passed() { "success" } else { "FAILED" }
        );
    }
    let failed = reports.iter().filter(|r| !r.passed()).count();
    let _ = writeln!(out, "runs failed: {}", failed);
    out
}
