//! The step record: one configured assertion within a validation plan.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::Table;

use super::thresholds::Thresholds;
use super::values::StepValues;

/// The kind of check a step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionType {
    /// Column values greater than a comparand.
    ColValsGt,
    /// Column values greater than or equal to a comparand.
    ColValsGe,
    /// Column values less than a comparand.
    ColValsLt,
    /// Column values less than or equal to a comparand.
    ColValsLe,
    /// Column values inside a bounds pair.
    ColValsBetween,
    /// Column values drawn from a literal set.
    ColValsInSet,
    /// Column values not null/missing.
    ColValsNotNull,
    /// Column values matching a regex pattern.
    ColValsRegex,
    /// Named columns exist in the table.
    ColExists,
    /// The table matches an expected schema (single test unit).
    ColSchemaMatch,
    /// No duplicate rows (one test unit per row).
    RowsDistinct,
    /// All sub-assertions hold, row by row.
    Conjointly,
}

impl AssertionType {
    /// The stable tag used in the report's `type` column.
    pub fn name(&self) -> &'static str {
        match self {
            AssertionType::ColValsGt => "col_vals_gt",
            AssertionType::ColValsGe => "col_vals_ge",
            AssertionType::ColValsLt => "col_vals_lt",
            AssertionType::ColValsLe => "col_vals_le",
            AssertionType::ColValsBetween => "col_vals_between",
            AssertionType::ColValsInSet => "col_vals_in_set",
            AssertionType::ColValsNotNull => "col_vals_not_null",
            AssertionType::ColValsRegex => "col_vals_regex",
            AssertionType::ColExists => "col_exists",
            AssertionType::ColSchemaMatch => "col_schema_match",
            AssertionType::RowsDistinct => "rows_distinct",
            AssertionType::Conjointly => "conjointly",
        }
    }
}

/// The column references a step was resolved to at add time.
///
/// Wildcard selections are snapshotted against the target table when the
/// step is added, never re-resolved at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSpec {
    /// The assertion does not address particular columns.
    None,
    /// One or more resolved column names.
    Columns(Vec<String>),
}

impl ColumnSpec {
    pub fn single(name: impl Into<String>) -> Self {
        ColumnSpec::Columns(vec![name.into()])
    }

    /// The resolved names, empty for `None`.
    pub fn names(&self) -> &[String] {
        match self {
            ColumnSpec::None => &[],
            ColumnSpec::Columns(names) => names,
        }
    }

    /// Report rendering: comma-joined names, missing when none.
    pub fn render(&self) -> Option<String> {
        match self {
            ColumnSpec::None => None,
            ColumnSpec::Columns(names) => Some(names.join(", ")),
        }
    }
}

/// How the caller selects columns when adding a step.
#[derive(Debug, Clone)]
pub enum ColumnSelection {
    /// No column reference.
    None,
    /// Explicit column names (not verified against the table until
    /// interrogation).
    Columns(Vec<String>),
    /// Every column of the target table, resolved to a snapshot at add time.
    All,
}

impl ColumnSelection {
    pub fn single(name: impl Into<String>) -> Self {
        ColumnSelection::Columns(vec![name.into()])
    }

    /// Resolve against the table headers known at add time.
    pub fn resolve(&self, headers: &[String]) -> ColumnSpec {
        match self {
            ColumnSelection::None => ColumnSpec::None,
            ColumnSelection::Columns(names) => ColumnSpec::Columns(names.clone()),
            ColumnSelection::All => ColumnSpec::Columns(headers.to_vec()),
        }
    }
}

/// A named table transformation applied before a step is evaluated.
#[derive(Clone)]
pub struct Precondition {
    /// Shown in diagnostics; the report only surfaces the count.
    pub label: String,
    func: Arc<dyn Fn(&Table) -> Result<Table> + Send + Sync>,
}

impl Precondition {
    pub fn new(
        label: impl Into<String>,
        func: impl Fn(&Table) -> Result<Table> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    pub fn apply(&self, table: &Table) -> Result<Table> {
        (self.func)(table)
    }
}

impl fmt::Debug for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Precondition")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// One row of a validation plan: an assertion, its parameters, and (after
/// interrogation) its outcome.
///
/// Lifecycle: a step is *inactive* (`active == false`, never runs),
/// *pending* (active but `evaluated_at` is `None` — not yet interrogated, or
/// skipped by a cancelled run), or *evaluated* (`evaluated_at` set, possibly
/// with `eval_error`).
#[derive(Debug, Clone)]
pub struct ValidationStep {
    /// 1-based position in the plan, assigned at add time, stable.
    pub index: usize,
    pub assertion: AssertionType,
    pub columns: ColumnSpec,
    pub values: StepValues,
    /// Transformations applied to the target table before evaluation;
    /// `None` means the step sees the table as-is.
    pub preconditions: Option<Vec<Precondition>>,
    pub thresholds: Thresholds,
    /// Inactive steps are skipped at execution but retained in the plan
    /// and the report.
    pub active: bool,
    /// Optional caller-supplied label for diagnostics.
    pub label: Option<String>,

    // Outcome fields, absent until the step is evaluated.
    /// Total test units.
    pub n: Option<u64>,
    /// Passing test units; `0 <= n_passed <= n`.
    pub n_passed: Option<u64>,
    /// `n_passed / n`; absent when `n == 0`.
    pub f_passed: Option<f64>,
    /// Informational threshold state (see [`Thresholds::report`]).
    pub report: Option<bool>,
    /// `None` = threshold not configured, `Some(false)` = configured but
    /// not tripped, `Some(true)` = tripped.
    pub warn: Option<bool>,
    pub stop: Option<bool>,
    pub notify: Option<bool>,
    /// The check itself could not be computed; counts stay absent.
    pub eval_error: bool,
    /// The check raised a recoverable warning; partial counts are kept.
    pub eval_warning: bool,
    /// Captured error/warning text for diagnostics.
    pub capture_stack: Vec<String>,
    /// When the step was evaluated; `None` while pending or inactive.
    pub evaluated_at: Option<DateTime<Utc>>,
}

impl ValidationStep {
    pub(crate) fn new(
        index: usize,
        assertion: AssertionType,
        columns: ColumnSpec,
        values: StepValues,
        preconditions: Option<Vec<Precondition>>,
        thresholds: Thresholds,
        active: bool,
        label: Option<String>,
    ) -> Self {
        Self {
            index,
            assertion,
            columns,
            values,
            preconditions,
            thresholds,
            active,
            label,
            n: None,
            n_passed: None,
            f_passed: None,
            report: None,
            warn: None,
            stop: None,
            notify: None,
            eval_error: false,
            eval_warning: false,
            capture_stack: Vec::new(),
            evaluated_at: None,
        }
    }

    /// Clear every outcome field, returning the step to its pending state.
    /// Called at the start of each evaluation so re-interrogation never
    /// mixes results from an earlier run.
    pub(crate) fn reset_outcome(&mut self) {
        self.n = None;
        self.n_passed = None;
        self.f_passed = None;
        self.report = None;
        self.warn = None;
        self.stop = None;
        self.notify = None;
        self.eval_error = false;
        self.eval_warning = false;
        self.capture_stack.clear();
        self.evaluated_at = None;
    }

    /// Failing test units, when counts exist.
    pub fn n_failed(&self) -> Option<u64> {
        match (self.n, self.n_passed) {
            (Some(n), Some(p)) => Some(n.saturating_sub(p)),
            _ => None,
        }
    }

    /// `1 - f_passed`, when defined.
    pub fn f_failed(&self) -> Option<f64> {
        self.f_passed.map(|f| 1.0 - f)
    }

    /// Number of precondition statements; `None` when there are none.
    pub fn precondition_count(&self) -> Option<usize> {
        self.preconditions.as_ref().map(|p| p.len())
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluated_at.is_some()
    }
}
