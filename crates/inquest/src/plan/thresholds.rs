//! Failure-count limits and the per-step threshold set.

use serde::{Deserialize, Serialize};

use crate::error::{InquestError, Result};

/// A limit on failing test units: either an absolute count or a fraction of
/// total units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    /// Tripped when `n - n_passed >= count`.
    Count(u64),
    /// Tripped when `(n - n_passed) / n >= fraction`. Never trips on an
    /// empty step (`n == 0`).
    Fraction(f64),
}

impl Limit {
    /// Reject fractions outside [0, 1] or non-finite.
    pub fn validate(&self) -> Result<()> {
        if let Limit::Fraction(f) = self {
            if !f.is_finite() || *f < 0.0 || *f > 1.0 {
                return Err(InquestError::InvalidStep(format!(
                    "fractional threshold must be in [0, 1], got {}",
                    f
                )));
            }
        }
        Ok(())
    }

    /// Whether this limit is tripped by the given unit counts.
    pub fn tripped(&self, n: u64, n_passed: u64) -> bool {
        let n_failed = n.saturating_sub(n_passed);
        match self {
            Limit::Count(c) => n_failed >= *c,
            Limit::Fraction(f) => {
                if n == 0 {
                    false
                } else {
                    (n_failed as f64 / n as f64) >= *f
                }
            }
        }
    }
}

/// The four independent optional limits a step may carry.
///
/// `report` is informational only: it is evaluated like the others but has
/// no effect on severity scoring or report filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub report: Option<Limit>,
    pub warn: Option<Limit>,
    pub stop: Option<Limit>,
    pub notify: Option<Limit>,
}

impl Thresholds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(mut self, limit: Limit) -> Self {
        self.report = Some(limit);
        self
    }

    pub fn with_warn(mut self, limit: Limit) -> Self {
        self.warn = Some(limit);
        self
    }

    pub fn with_stop(mut self, limit: Limit) -> Self {
        self.stop = Some(limit);
        self
    }

    pub fn with_notify(mut self, limit: Limit) -> Self {
        self.notify = Some(limit);
        self
    }

    /// Validate every configured limit.
    pub fn validate(&self) -> Result<()> {
        for limit in [self.report, self.warn, self.stop, self.notify]
            .into_iter()
            .flatten()
        {
            limit.validate()?;
        }
        Ok(())
    }
}
