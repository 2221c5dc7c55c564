//! The interrogation executor: runs every active step of a plan against a
//! table, filling in outcome fields in place and capturing failing-row
//! extracts.

mod checks;
mod severity;

pub use checks::{CheckOutcome, evaluate as evaluate_check};
pub use severity::{SeverityFlags, evaluate as evaluate_severity};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use indexmap::IndexMap;

use crate::input::Table;
use crate::plan::ValidationPlan;

/// Options controlling one interrogation run.
#[derive(Debug, Clone)]
pub struct InterrogateOptions {
    /// Capture failing rows per step (only steps with failures get an
    /// extract entry).
    pub collect_extracts: bool,
    /// Cap on rows captured per step (None = all failing rows).
    pub extract_limit: Option<usize>,
    /// Checked between steps; once set, remaining steps stay pending with
    /// their outcome fields untouched.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for InterrogateOptions {
    fn default() -> Self {
        Self {
            collect_extracts: true,
            extract_limit: None,
            cancel: None,
        }
    }
}

/// Execute every active step of the plan in insertion order.
///
/// Steps are data-independent: each one reads its own precondition-applied
/// copy of the table and writes only to its own record slot and extract
/// slot. A step whose check raises is marked `eval_error` and never aborts
/// the rest of the run.
pub fn run(
    table: &Table,
    plan: &mut ValidationPlan,
    options: &InterrogateOptions,
) -> IndexMap<usize, Table> {
    let mut extracts: IndexMap<usize, Table> = IndexMap::new();

    for step in plan.steps_mut() {
        if let Some(cancel) = &options.cancel {
            if cancel.load(Ordering::SeqCst) {
                break;
            }
        }
        if !step.active {
            continue;
        }

        // An errored or re-run step must not carry outcome state from an
        // earlier interrogation.
        step.reset_outcome();

        // Apply preconditions to obtain the effective table.
        let mut effective: Option<Table> = None;
        let mut precondition_failed = false;
        if let Some(preconditions) = &step.preconditions {
            for precondition in preconditions {
                let current = effective.as_ref().unwrap_or(table);
                match precondition.apply(current) {
                    Ok(next) => effective = Some(next),
                    Err(e) => {
                        step.eval_error = true;
                        step.capture_stack
                            .push(format!("precondition '{}': {}", precondition.label, e));
                        precondition_failed = true;
                        break;
                    }
                }
            }
        }
        if precondition_failed {
            step.evaluated_at = Some(Utc::now());
            continue;
        }
        let effective = effective.as_ref().unwrap_or(table);

        match checks::evaluate(effective, step) {
            Ok(outcome) => {
                let n = outcome.n();
                let n_passed = outcome.n_passed();
                step.n = Some(n);
                step.n_passed = Some(n_passed);
                step.f_passed = if n > 0 {
                    Some(n_passed as f64 / n as f64)
                } else {
                    None
                };

                if !outcome.warnings.is_empty() {
                    step.eval_warning = true;
                    step.capture_stack.extend(outcome.warnings);
                }

                let flags = severity::evaluate(n, n_passed, &step.thresholds);
                step.report = flags.report;
                step.warn = flags.warn;
                step.stop = flags.stop;
                step.notify = flags.notify;

                if options.collect_extracts && !outcome.failing_rows.is_empty() {
                    let rows: Vec<usize> = match options.extract_limit {
                        Some(limit) => outcome.failing_rows.into_iter().take(limit).collect(),
                        None => outcome.failing_rows,
                    };
                    extracts.insert(step.index, effective.select_rows(&rows));
                }
            }
            Err(e) => {
                // Counts stay absent: an errored step is a distinct state
                // from one that ran with zero units.
                step.eval_error = true;
                step.capture_stack.push(e.to_string());
            }
        }

        step.evaluated_at = Some(Utc::now());
    }

    extracts
}
