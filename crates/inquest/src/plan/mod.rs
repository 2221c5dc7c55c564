//! The validation plan: an append-only ordered collection of step records.

mod step;
mod thresholds;
mod values;

pub use step::{
    AssertionType, ColumnSelection, ColumnSpec, Precondition, ValidationStep,
};
pub use thresholds::{Limit, Thresholds};
pub use values::{Bound, BoundValue, ColumnDef, ColumnType, StepValues, SubStep};

use crate::error::Result;

/// Everything needed to add one step to a plan, built up fluently.
#[derive(Debug, Clone)]
pub struct StepSpec {
    assertion: AssertionType,
    columns: ColumnSelection,
    values: StepValues,
    preconditions: Option<Vec<Precondition>>,
    thresholds: Thresholds,
    active: bool,
    label: Option<String>,
}

impl StepSpec {
    pub fn new(assertion: AssertionType) -> Self {
        Self {
            assertion,
            columns: ColumnSelection::None,
            values: StepValues::None,
            preconditions: None,
            thresholds: Thresholds::new(),
            active: true,
            label: None,
        }
    }

    /// Address a single column.
    pub fn with_column(mut self, name: impl Into<String>) -> Self {
        self.columns = ColumnSelection::single(name);
        self
    }

    /// Address several columns.
    pub fn with_columns(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = ColumnSelection::Columns(names.into_iter().map(Into::into).collect());
        self
    }

    /// Address every column of the target table (snapshotted at add time).
    pub fn with_all_columns(mut self) -> Self {
        self.columns = ColumnSelection::All;
        self
    }

    pub fn with_values(mut self, values: StepValues) -> Self {
        self.values = values;
        self
    }

    /// Append a precondition; preconditions run in the order added.
    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.preconditions
            .get_or_insert_with(Vec::new)
            .push(precondition);
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Retain the step in the plan and report but skip it at execution.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// An ordered sequence of validation steps.
///
/// Append-only during construction: `add_step` assigns `index = len + 1` and
/// never mutates prior steps. Interrogation fills in outcome fields in
/// place. Storage order never changes; display ordering is a projection.
#[derive(Debug, Clone, Default)]
pub struct ValidationPlan {
    steps: Vec<ValidationStep>,
}

impl ValidationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[ValidationStep] {
        &self.steps
    }

    pub(crate) fn steps_mut(&mut self) -> &mut [ValidationStep] {
        &mut self.steps
    }

    /// Look up a step by its 1-based index.
    pub fn step(&self, index: usize) -> Option<&ValidationStep> {
        index.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// Validate and append a step, resolving its column selection against
    /// the table headers known now. Returns the assigned index. On error
    /// the plan is left untouched.
    pub fn add_step(&mut self, spec: StepSpec, headers: &[String]) -> Result<usize> {
        spec.thresholds.validate()?;

        let index = self.steps.len() + 1;
        let columns = spec.columns.resolve(headers);
        self.steps.push(ValidationStep::new(
            index,
            spec.assertion,
            columns,
            spec.values,
            spec.preconditions,
            spec.thresholds,
            spec.active,
            spec.label,
        ));

        Ok(index)
    }
}
