//! Projects a validation plan (pre- or post-interrogation) into the
//! normalized report model.

use chrono::Utc;
use indexmap::IndexMap;

use crate::error::{InquestError, Result};
use crate::input::Table;
use crate::plan::{ValidationPlan, ValidationStep};

use super::labels::Labels;
use super::render;
use super::row::{
    ArrangeBy, Density, EvalCondition, Keep, Report, ReportOptions, ReportRow,
};

/// Derive the coarse evaluation condition of a step. `None` for steps that
/// never ran (inactive, or pending after a cancelled run).
pub fn eval_condition(step: &ValidationStep) -> Option<EvalCondition> {
    if !step.is_evaluated() {
        return None;
    }
    Some(match (step.eval_error, step.eval_warning) {
        (false, false) => EvalCondition::Ok,
        (true, false) => EvalCondition::Error,
        (false, true) => EvalCondition::Warning,
        (true, true) => EvalCondition::WarningAndError,
    })
}

/// Severity score used only for sorting and filtering, never persisted.
///
/// A step is "not ok" when its check errored or warned, or when any
/// severity threshold tripped; that term is worth 10, with tripped
/// notify/stop/warn flags adding 3/2/1. A never-evaluated step scores 0.
pub fn severity_score(step: &ValidationStep) -> u32 {
    let warn = step.warn == Some(true);
    let stop = step.stop == Some(true);
    let notify = step.notify == Some(true);
    let not_ok = step.is_evaluated()
        && (step.eval_error || step.eval_warning || warn || stop || notify);

    10 * u32::from(not_ok) + 3 * u32::from(notify) + 2 * u32::from(stop) + u32::from(warn)
}

/// Builds report models from plan state.
///
/// Holds the injected language resource; building is a pure read of the
/// plan and must not run concurrently with an interrogation mutating it.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    labels: Labels,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(labels: Labels) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Build the report model.
    ///
    /// Never fails on step content; malformed payloads degrade to missing
    /// renders. Fails only when the plan has no steps at all.
    pub fn build(
        &self,
        agent: &str,
        plan: &ValidationPlan,
        extracts: &IndexMap<usize, Table>,
        options: &ReportOptions,
    ) -> Result<Report> {
        if plan.is_empty() {
            return Err(InquestError::NoPlan);
        }

        let mut scored: Vec<(u32, ReportRow)> = plan
            .steps()
            .iter()
            .map(|step| (severity_score(step), self.project(step, extracts)))
            .collect();

        if options.keep == Keep::FailStates {
            scored.retain(|(score, _)| *score > 0);
        }

        if options.arrange_by == ArrangeBy::Severity {
            // Stable: ties keep original index order.
            scored.sort_by_key(|(score, _)| std::cmp::Reverse(*score));
        }

        Ok(Report {
            agent: agent.to_string(),
            rows: scored.into_iter().map(|(_, row)| row).collect(),
            built_at: Utc::now(),
        })
    }

    /// Render a report as a fixed-width text table at the given density.
    pub fn render_text(&self, report: &Report, density: Density) -> String {
        render::render_text(report, density, &self.labels)
    }

    fn project(&self, step: &ValidationStep, extracts: &IndexMap<usize, Table>) -> ReportRow {
        let extract = extracts
            .get(&step.index)
            .map(|t| t.row_count())
            .filter(|&n| n > 0);

        ReportRow {
            i: step.index,
            assertion: step.assertion.name().to_string(),
            columns: step.columns.render(),
            values: step.values.render(),
            precon: step.precondition_count(),
            active: step.active,
            eval: eval_condition(step),
            units: step.n,
            n_pass: step.n_passed,
            f_pass: step.f_passed,
            n_fail: step.n_failed(),
            f_fail: step.f_failed(),
            warn: step.warn,
            stop: step.stop,
            notify: step.notify,
            extract,
        }
    }
}
