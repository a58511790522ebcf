//! Tabular input and expected-output data, and the alignment of the two
//! independently-indexed time series.
//!
//! Step sizes are not uniform: each one is the distance to the next input
//! row's timestamp, with a configurable fallback for the last row. Expected
//! rows are matched against the post-step time cursor; by default the match
//! is exact floating-point equality, preserving the source behavior.

use crate::errors::{CosimError, CosimResult};
use serde::{Deserialize, Serialize};

/// Simulated time, in the component's time unit.
pub type Time = f64;

/// Ordered rows of named textual cells, each stamped with a timestamp.
///
/// The column set is fixed at construction and excludes the time column.
/// Times are expected to be non-decreasing; that invariant is supplied by the
/// caller, not enforced here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    times: Vec<Time>,
    cells: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            times: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Append a row.
    ///
    /// The number of values must match the column count.
    pub fn push_row(&mut self, time: Time, values: Vec<String>) -> CosimResult<()> {
        if values.len() != self.columns.len() {
            return Err(CosimError::MalformedTable(format!(
                "row at t={} has {} values, expected {}",
                time,
                values.len(),
                self.columns.len()
            )));
        }
        self.times.push(time);
        self.cells.push(values);
        Ok(())
    }

    /// Column names, time column excluded.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn time(&self, row: usize) -> Option<Time> {
        self.times.get(row).copied()
    }

    /// The `(column name, cell)` pairs of one row.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    pub fn entries(&self, row: usize) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.cells[row].iter().map(String::as_str))
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.cells.get(row).map(|cells| cells[index].as_str())
    }

    /// Index of the first row whose timestamp matches `time`.
    ///
    /// With no tolerance the match is exact floating-point equality (the
    /// preserved source behavior); with a tolerance the first row within the
    /// band wins.
    pub fn row_at(&self, time: Time, tolerance: Option<Time>) -> Option<usize> {
        match tolerance {
            None => self.times.iter().position(|&t| t == time),
            Some(tol) => self.times.iter().position(|&t| (t - time).abs() <= tol),
        }
    }

    /// The aligned step sequence over this table's rows.
    ///
    /// Yields, for each row, the row index, its timestamp, and the step size
    /// to advance after applying that row's inputs:
    /// `time[i+1] - time[i]` for all but the last row, `default_step` for the
    /// last. The sequence is lazy, finite, and consumed exactly once per run.
    pub fn steps(&self, default_step: Time) -> Steps<'_> {
        Steps {
            table: self,
            index: 0,
            default_step,
        }
    }
}

/// One aligned step: which input row to apply and how far to advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub index: usize,
    pub time: Time,
    pub step_size: Time,
}

/// Iterator over a table's aligned steps. See [`Table::steps`].
#[derive(Debug)]
pub struct Steps<'a> {
    table: &'a Table,
    index: usize,
    default_step: Time,
}

impl Iterator for Steps<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let time = self.table.time(self.index)?;
        let step_size = match self.table.time(self.index + 1) {
            Some(next) => next - time,
            None => self.default_step,
        };
        let step = Step {
            index: self.index,
            time,
            step_size,
        };
        self.index += 1;
        Some(step)
    }
}
