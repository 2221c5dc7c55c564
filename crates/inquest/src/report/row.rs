//! The report model: one normalized row per retained step, plus the
//! fixed-choice options controlling arrangement, filtering, and density.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InquestError, Result};

use super::labels::Labels;

/// Coarse evaluation condition of a step, derived at report time.
///
/// This reflects only whether evaluating the check raised an error or a
/// warning; threshold states are reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalCondition {
    Ok,
    Error,
    Warning,
    /// Both a warning and an error.
    WarningAndError,
}

impl EvalCondition {
    pub fn label<'a>(&self, labels: &'a Labels) -> &'a str {
        match self {
            EvalCondition::Ok => &labels.eval_ok,
            EvalCondition::Error => &labels.eval_error,
            EvalCondition::Warning => &labels.eval_warning,
            EvalCondition::WarningAndError => &labels.eval_both,
        }
    }
}

/// Row ordering for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrangeBy {
    /// Original insertion order (the default).
    #[default]
    Index,
    /// Descending severity score; ties keep insertion order.
    Severity,
}

impl ArrangeBy {
    /// Parse the caller-facing option string.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "i" => Ok(ArrangeBy::Index),
            "severity" => Ok(ArrangeBy::Severity),
            other => Err(InquestError::InvalidChoice {
                field: "arrange_by",
                given: other.to_string(),
                allowed: "\"i\", \"severity\"",
            }),
        }
    }
}

/// Which steps the report retains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Keep {
    /// Every step, including inactive ones.
    #[default]
    All,
    /// Only steps with a severity score above zero.
    FailStates,
}

impl Keep {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "all" => Ok(Keep::All),
            "fail_states" => Ok(Keep::FailStates),
            other => Err(InquestError::InvalidChoice {
                field: "keep",
                given: other.to_string(),
                allowed: "\"all\", \"fail_states\"",
            }),
        }
    }
}

/// Options for one report request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub arrange_by: ArrangeBy,
    pub keep: Keep,
}

impl ReportOptions {
    /// Parse both fixed-choice option strings.
    pub fn parse(arrange_by: &str, keep: &str) -> Result<Self> {
        Ok(Self {
            arrange_by: ArrangeBy::parse(arrange_by)?,
            keep: Keep::parse(keep)?,
        })
    }
}

/// Presentation density: which fields an adapter shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Density {
    /// All fields.
    #[default]
    Standard,
    /// Omits columns, precon, and extract.
    Small,
}

/// The stable report field set, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    I,
    Assertion,
    Columns,
    Values,
    Precon,
    Active,
    Eval,
    Units,
    NPass,
    FPass,
    NFail,
    FFail,
    Warn,
    Stop,
    Notify,
    Extract,
}

const STANDARD_FIELDS: &[ReportField] = &[
    ReportField::I,
    ReportField::Assertion,
    ReportField::Columns,
    ReportField::Values,
    ReportField::Precon,
    ReportField::Active,
    ReportField::Eval,
    ReportField::Units,
    ReportField::NPass,
    ReportField::FPass,
    ReportField::NFail,
    ReportField::FFail,
    ReportField::Warn,
    ReportField::Stop,
    ReportField::Notify,
    ReportField::Extract,
];

const SMALL_FIELDS: &[ReportField] = &[
    ReportField::I,
    ReportField::Assertion,
    ReportField::Values,
    ReportField::Active,
    ReportField::Eval,
    ReportField::Units,
    ReportField::NPass,
    ReportField::FPass,
    ReportField::NFail,
    ReportField::FFail,
    ReportField::Warn,
    ReportField::Stop,
    ReportField::Notify,
];

impl Density {
    /// The fields an adapter shows at this density, so columns can be
    /// dropped without recomputing the report.
    pub fn fields(&self) -> &'static [ReportField] {
        match self {
            Density::Standard => STANDARD_FIELDS,
            Density::Small => SMALL_FIELDS,
        }
    }
}

/// One row of the report model: a presentation-agnostic projection of a
/// validation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    /// 1-based step index (original insertion position).
    pub i: usize,
    /// The assertion type tag.
    #[serde(rename = "type")]
    pub assertion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
    /// Count of precondition statements; absent when there are none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precon: Option<usize>,
    pub active: bool,
    /// Absent for never-evaluated steps (inactive or pending).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval: Option<EvalCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_pass: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_pass: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_fail: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_fail: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warn: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<bool>,
    /// Row count of the available extract, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<usize>,
}

/// A complete report: an ephemeral projection built fresh on each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Name of the agent the report was built for.
    pub agent: String,
    pub rows: Vec<ReportRow>,
    pub built_at: DateTime<Utc>,
}
