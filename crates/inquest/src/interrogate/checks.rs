//! Built-in checks: turn one step into per-unit pass/fail results.
//!
//! Value checks count one test unit per (row, column); `col_exists` counts
//! one unit per column, `col_schema_match` a single unit, `rows_distinct`
//! and `conjointly` one unit per row. Null cells fail value checks;
//! non-numeric cells fail numeric checks and raise an evaluation warning.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::error::{InquestError, Result};
use crate::input::Table;
use crate::plan::{
    AssertionType, Bound, BoundValue, ColumnDef, ColumnSpec, StepValues, ValidationStep,
};

/// The raw result of evaluating one step's check.
#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    /// One entry per test unit.
    pub results: Vec<bool>,
    /// Distinct row indices with at least one failing unit, ascending.
    /// Empty for checks with no row-level notion of failure.
    pub failing_rows: Vec<usize>,
    /// Recoverable problems encountered while evaluating.
    pub warnings: Vec<String>,
}

impl CheckOutcome {
    pub fn n(&self) -> u64 {
        self.results.len() as u64
    }

    pub fn n_passed(&self) -> u64 {
        self.results.iter().filter(|&&r| r).count() as u64
    }
}

/// Evaluate a step's check against the (precondition-applied) table.
pub fn evaluate(table: &Table, step: &ValidationStep) -> Result<CheckOutcome> {
    evaluate_parts(table, step.assertion, &step.columns, &step.values)
}

fn evaluate_parts(
    table: &Table,
    assertion: AssertionType,
    columns: &ColumnSpec,
    values: &StepValues,
) -> Result<CheckOutcome> {
    match assertion {
        AssertionType::ColValsGt => compare_check(table, columns, values, |v, c| v > c),
        AssertionType::ColValsGe => compare_check(table, columns, values, |v, c| v >= c),
        AssertionType::ColValsLt => compare_check(table, columns, values, |v, c| v < c),
        AssertionType::ColValsLe => compare_check(table, columns, values, |v, c| v <= c),
        AssertionType::ColValsBetween => between_check(table, columns, values),
        AssertionType::ColValsInSet => in_set_check(table, columns, values),
        AssertionType::ColValsNotNull => not_null_check(table, columns),
        AssertionType::ColValsRegex => regex_check(table, columns, values),
        AssertionType::ColExists => exists_check(table, columns),
        AssertionType::ColSchemaMatch => schema_check(table, values),
        AssertionType::RowsDistinct => distinct_check(table, columns),
        AssertionType::Conjointly => conjoint_check(table, values),
    }
}

/// The comparand of a numeric comparison: a literal or another column.
enum Comparand {
    Literal(f64),
    Column(usize),
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

fn resolve_column(table: &Table, name: &str) -> Result<usize> {
    table.column_index(name).ok_or_else(|| {
        InquestError::Evaluation(format!("column '{}' not found in table", name))
    })
}

fn require_columns<'a>(columns: &'a ColumnSpec, assertion: &str) -> Result<&'a [String]> {
    let names = columns.names();
    if names.is_empty() {
        return Err(InquestError::Evaluation(format!(
            "{} requires at least one column",
            assertion
        )));
    }
    Ok(names)
}

/// Walk the addressed columns row by row, scoring each (row, column) unit
/// with `unit`, which returns pass/fail plus whether the cell was
/// non-numeric garbage worth a warning.
fn scan_units(
    table: &Table,
    names: &[String],
    mut unit: impl FnMut(usize, &str) -> Result<(bool, bool)>,
) -> Result<CheckOutcome> {
    let rows = table.row_count();
    let mut outcome = CheckOutcome::default();
    let mut row_failed = vec![false; rows];

    for name in names {
        let col = resolve_column(table, name)?;
        let mut bad_cells = 0usize;

        for row in 0..rows {
            let cell = table.get(row, col).unwrap_or("");
            let (pass, bad) = unit(row, cell)?;
            if bad {
                bad_cells += 1;
            }
            outcome.results.push(pass);
            if !pass {
                row_failed[row] = true;
            }
        }

        if bad_cells > 0 {
            outcome.warnings.push(format!(
                "column '{}': {} non-numeric value(s) treated as failing",
                name, bad_cells
            ));
        }
    }

    outcome.failing_rows = row_failed
        .iter()
        .enumerate()
        .filter_map(|(i, &failed)| failed.then_some(i))
        .collect();

    Ok(outcome)
}

fn comparand_from_values(table: &Table, values: &StepValues) -> Result<Comparand> {
    match values {
        StepValues::Set { values } if values.len() == 1 => match &values[0] {
            Value::Number(n) => n
                .as_f64()
                .map(Comparand::Literal)
                .ok_or_else(|| InquestError::Evaluation("comparand is not finite".to_string())),
            other => Err(InquestError::Evaluation(format!(
                "comparand must be numeric, got {}",
                other
            ))),
        },
        StepValues::Column { column } => Ok(Comparand::Column(resolve_column(table, column)?)),
        _ => Err(InquestError::Evaluation(
            "comparison checks expect a single numeric literal or a column reference".to_string(),
        )),
    }
}

fn compare_check(
    table: &Table,
    columns: &ColumnSpec,
    values: &StepValues,
    cmp: impl Fn(f64, f64) -> bool,
) -> Result<CheckOutcome> {
    let names = require_columns(columns, "a value comparison")?;
    let comparand = comparand_from_values(table, values)?;

    scan_units(table, names, |row, cell| {
        if Table::is_null_value(cell) {
            return Ok((false, false));
        }
        let Some(value) = parse_number(cell) else {
            return Ok((false, true));
        };
        let target = match &comparand {
            Comparand::Literal(c) => Some(*c),
            Comparand::Column(col) => table.get(row, *col).and_then(parse_number),
        };
        match target {
            Some(c) => Ok((cmp(value, c), false)),
            // Comparand cell is null or garbage: the unit cannot pass.
            None => Ok((false, false)),
        }
    })
}

/// Per-row bound value, `None` when the bound cell is null or non-numeric.
fn bound_at(table: &Table, bound: &Bound, row: usize) -> Result<Option<f64>> {
    match &bound.value {
        BoundValue::Literal(v) => Ok(Some(*v)),
        BoundValue::Column(name) => {
            let col = resolve_column(table, name)?;
            Ok(table.get(row, col).and_then(parse_number))
        }
    }
}

fn between_check(table: &Table, columns: &ColumnSpec, values: &StepValues) -> Result<CheckOutcome> {
    let names = require_columns(columns, "col_vals_between")?;
    let StepValues::Bounds { lower, upper } = values else {
        return Err(InquestError::Evaluation(
            "col_vals_between expects a bounds pair".to_string(),
        ));
    };

    // Resolve bound columns eagerly so a bad reference is an eval error,
    // not a silently failing unit.
    if let BoundValue::Column(name) = &lower.value {
        resolve_column(table, name)?;
    }
    if let BoundValue::Column(name) = &upper.value {
        resolve_column(table, name)?;
    }

    scan_units(table, names, |row, cell| {
        if Table::is_null_value(cell) {
            return Ok((false, false));
        }
        let Some(value) = parse_number(cell) else {
            return Ok((false, true));
        };

        let lo = bound_at(table, lower, row)?;
        let hi = bound_at(table, upper, row)?;
        let (Some(lo), Some(hi)) = (lo, hi) else {
            return Ok((false, false));
        };

        let above = if lower.inclusive { value >= lo } else { value > lo };
        let below = if upper.inclusive { value <= hi } else { value < hi };
        Ok((above && below, false))
    })
}

fn in_set_check(table: &Table, columns: &ColumnSpec, values: &StepValues) -> Result<CheckOutcome> {
    let names = require_columns(columns, "col_vals_in_set")?;
    let StepValues::Set { values } = values else {
        return Err(InquestError::Evaluation(
            "col_vals_in_set expects a literal set".to_string(),
        ));
    };

    let set: Vec<String> = values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    let numeric_set: Vec<f64> = set.iter().filter_map(|s| parse_number(s)).collect();

    scan_units(table, names, |_, cell| {
        if Table::is_null_value(cell) {
            return Ok((false, false));
        }
        let trimmed = cell.trim();
        let matched = set.iter().any(|s| s == trimmed)
            || parse_number(trimmed)
                .map(|v| numeric_set.iter().any(|&s| s == v))
                .unwrap_or(false);
        Ok((matched, false))
    })
}

fn not_null_check(table: &Table, columns: &ColumnSpec) -> Result<CheckOutcome> {
    let names = require_columns(columns, "col_vals_not_null")?;
    scan_units(table, names, |_, cell| Ok((!Table::is_null_value(cell), false)))
}

fn regex_check(table: &Table, columns: &ColumnSpec, values: &StepValues) -> Result<CheckOutcome> {
    let names = require_columns(columns, "col_vals_regex")?;
    let StepValues::Expression { expr } = values else {
        return Err(InquestError::Evaluation(
            "col_vals_regex expects a pattern expression".to_string(),
        ));
    };
    let pattern = Regex::new(expr)
        .map_err(|e| InquestError::Evaluation(format!("invalid pattern '{}': {}", expr, e)))?;

    scan_units(table, names, |_, cell| {
        if Table::is_null_value(cell) {
            return Ok((false, false));
        }
        Ok((pattern.is_match(cell.trim()), false))
    })
}

/// One unit per addressed column name; a missing column fails its unit
/// rather than raising, since absence is exactly what is being tested.
fn exists_check(table: &Table, columns: &ColumnSpec) -> Result<CheckOutcome> {
    let names = require_columns(columns, "col_exists")?;
    let mut outcome = CheckOutcome::default();
    for name in names {
        outcome.results.push(table.column_index(name).is_some());
    }
    Ok(outcome)
}

/// A single test unit: the whole table either matches the expected schema
/// or it does not.
fn schema_check(table: &Table, values: &StepValues) -> Result<CheckOutcome> {
    let StepValues::Schema { columns } = values else {
        return Err(InquestError::Evaluation(
            "col_schema_match expects a schema payload".to_string(),
        ));
    };

    let pass = schema_matches(table, columns);
    Ok(CheckOutcome {
        results: vec![pass],
        failing_rows: Vec::new(),
        warnings: Vec::new(),
    })
}

fn schema_matches(table: &Table, expected: &[ColumnDef]) -> bool {
    if table.headers.len() != expected.len() {
        return false;
    }
    for (header, def) in table.headers.iter().zip(expected) {
        if header != &def.name {
            return false;
        }
        let col = match table.column_index(&def.name) {
            Some(c) => c,
            None => return false,
        };
        let conforms = table
            .column_values(col)
            .filter(|v| !Table::is_null_value(v))
            .all(|v| def.column_type.matches(v));
        if !conforms {
            return false;
        }
    }
    true
}

/// One unit per row; every row belonging to a duplicate group fails. With a
/// column spec, distinctness is judged on those columns only; without one,
/// on the whole row.
fn distinct_check(table: &Table, columns: &ColumnSpec) -> Result<CheckOutcome> {
    let cols: Vec<usize> = match columns {
        ColumnSpec::None => (0..table.column_count()).collect(),
        ColumnSpec::Columns(names) => names
            .iter()
            .map(|n| resolve_column(table, n))
            .collect::<Result<_>>()?,
    };

    let mut groups: IndexMap<Vec<&str>, Vec<usize>> = IndexMap::new();
    for row in 0..table.row_count() {
        let key: Vec<&str> = cols
            .iter()
            .map(|&c| table.get(row, c).unwrap_or(""))
            .collect();
        groups.entry(key).or_default().push(row);
    }

    let mut results = vec![true; table.row_count()];
    for rows in groups.values().filter(|rows| rows.len() > 1) {
        for &row in rows {
            results[row] = false;
        }
    }

    let failing_rows = results
        .iter()
        .enumerate()
        .filter_map(|(i, &pass)| (!pass).then_some(i))
        .collect();

    Ok(CheckOutcome {
        results,
        failing_rows,
        warnings: Vec::new(),
    })
}

/// One unit per row; a row passes when every sub-assertion passes for it.
/// Sub-step results spanning several columns are folded per row.
fn conjoint_check(table: &Table, values: &StepValues) -> Result<CheckOutcome> {
    let StepValues::SubSteps { steps } = values else {
        return Err(InquestError::Evaluation(
            "conjointly expects a list of sub-steps".to_string(),
        ));
    };
    if steps.is_empty() {
        return Err(InquestError::Evaluation(
            "conjointly requires at least one sub-step".to_string(),
        ));
    }

    let rows = table.row_count();
    let mut results = vec![true; rows];
    let mut warnings = Vec::new();

    for sub in steps {
        let sub_outcome = evaluate_parts(table, sub.assertion, &sub.columns, &sub.values)?;
        warnings.extend(sub_outcome.warnings);

        let units = sub_outcome.results.len();
        if rows == 0 {
            continue;
        }
        if units % rows != 0 {
            return Err(InquestError::Evaluation(format!(
                "sub-step {} is not row-aligned ({} units over {} rows)",
                sub.assertion.name(),
                units,
                rows
            )));
        }

        // Column-major unit blocks fold onto rows by AND.
        for (i, &pass) in sub_outcome.results.iter().enumerate() {
            if !pass {
                results[i % rows] = false;
            }
        }
    }

    let failing_rows = results
        .iter()
        .enumerate()
        .filter_map(|(i, &pass)| (!pass).then_some(i))
        .collect();

    Ok(CheckOutcome {
        results,
        failing_rows,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Bound, SubStep};

    fn table() -> Table {
        Table::new(
            vec!["id".into(), "score".into(), "cap".into()],
            vec![
                vec!["a".into(), "5".into(), "10".into()],
                vec!["b".into(), "12".into(), "10".into()],
                vec!["c".into(), "NA".into(), "10".into()],
                vec!["a".into(), "oops".into(), "10".into()],
            ],
            b',',
        )
    }

    fn step(assertion: AssertionType, columns: ColumnSpec, values: StepValues) -> ValidationStep {
        let mut plan = crate::plan::ValidationPlan::new();
        let spec = match &columns {
            ColumnSpec::None => crate::plan::StepSpec::new(assertion),
            ColumnSpec::Columns(names) => crate::plan::StepSpec::new(assertion)
                .with_columns(names.iter().map(|s| s.as_str())),
        }
        .with_values(values);
        plan.add_step(spec, &[]).unwrap();
        plan.step(1).unwrap().clone()
    }

    #[test]
    fn test_gt_literal_with_null_and_garbage() {
        let s = step(
            AssertionType::ColValsGt,
            ColumnSpec::single("score"),
            StepValues::literal(3),
        );
        let outcome = evaluate(&table(), &s).unwrap();

        // 5 and 12 pass; NA and "oops" fail.
        assert_eq!(outcome.results, vec![true, true, false, false]);
        assert_eq!(outcome.failing_rows, vec![2, 3]);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("non-numeric"));
    }

    #[test]
    fn test_lt_column_comparand() {
        let s = step(
            AssertionType::ColValsLt,
            ColumnSpec::single("score"),
            StepValues::column("cap"),
        );
        let outcome = evaluate(&table(), &s).unwrap();
        assert_eq!(outcome.results, vec![true, false, false, false]);
    }

    #[test]
    fn test_missing_column_is_eval_error() {
        let s = step(
            AssertionType::ColValsGt,
            ColumnSpec::single("absent"),
            StepValues::literal(0),
        );
        assert!(matches!(
            evaluate(&table(), &s),
            Err(InquestError::Evaluation(_))
        ));
    }

    #[test]
    fn test_between_inclusive_exclusive() {
        let t = Table::new(
            vec!["v".into()],
            vec![vec!["2".into()], vec!["5".into()], vec!["10".into()]],
            b',',
        );
        let s = step(
            AssertionType::ColValsBetween,
            ColumnSpec::single("v"),
            StepValues::bounds(Bound::literal(2.0, true), Bound::literal(10.0, false)),
        );
        let outcome = evaluate(&t, &s).unwrap();
        assert_eq!(outcome.results, vec![true, true, false]);
    }

    #[test]
    fn test_in_set_matches_numbers_and_strings() {
        let s = step(
            AssertionType::ColValsInSet,
            ColumnSpec::single("cap"),
            StepValues::set([10]),
        );
        let outcome = evaluate(&table(), &s).unwrap();
        assert!(outcome.results.iter().all(|&r| r));
    }

    #[test]
    fn test_regex_and_invalid_pattern() {
        let s = step(
            AssertionType::ColValsRegex,
            ColumnSpec::single("id"),
            StepValues::expression("^[a-z]$"),
        );
        let outcome = evaluate(&table(), &s).unwrap();
        assert_eq!(outcome.n_passed(), 4);

        let bad = step(
            AssertionType::ColValsRegex,
            ColumnSpec::single("id"),
            StepValues::expression("["),
        );
        assert!(evaluate(&table(), &bad).is_err());
    }

    #[test]
    fn test_exists_counts_one_unit_per_column() {
        let s = step(
            AssertionType::ColExists,
            ColumnSpec::Columns(vec!["id".into(), "absent".into()]),
            StepValues::None,
        );
        let outcome = evaluate(&table(), &s).unwrap();
        assert_eq!(outcome.results, vec![true, false]);
    }

    #[test]
    fn test_schema_match_is_single_unit() {
        use crate::plan::{ColumnDef, ColumnType};
        let t = Table::new(
            vec!["id".into(), "n".into()],
            vec![vec!["a".into(), "1".into()]],
            b',',
        );
        let good = step(
            AssertionType::ColSchemaMatch,
            ColumnSpec::None,
            StepValues::Schema {
                columns: vec![
                    ColumnDef::new("id", ColumnType::String),
                    ColumnDef::new("n", ColumnType::Integer),
                ],
            },
        );
        let outcome = evaluate(&t, &good).unwrap();
        assert_eq!(outcome.results, vec![true]);

        let wrong_order = step(
            AssertionType::ColSchemaMatch,
            ColumnSpec::None,
            StepValues::Schema {
                columns: vec![
                    ColumnDef::new("n", ColumnType::Integer),
                    ColumnDef::new("id", ColumnType::String),
                ],
            },
        );
        assert_eq!(evaluate(&t, &wrong_order).unwrap().results, vec![false]);
    }

    #[test]
    fn test_rows_distinct_fails_whole_duplicate_group() {
        let s = step(
            AssertionType::RowsDistinct,
            ColumnSpec::single("id"),
            StepValues::None,
        );
        let outcome = evaluate(&table(), &s).unwrap();
        // Rows 0 and 3 share id "a".
        assert_eq!(outcome.results, vec![false, true, true, false]);
        assert_eq!(outcome.failing_rows, vec![0, 3]);
    }

    #[test]
    fn test_conjointly_folds_per_row() {
        let t = Table::new(
            vec!["a".into(), "b".into()],
            vec![
                vec!["1".into(), "1".into()],
                vec!["5".into(), "0".into()],
                vec!["NA".into(), "1".into()],
            ],
            b',',
        );
        let s = step(
            AssertionType::Conjointly,
            ColumnSpec::None,
            StepValues::SubSteps {
                steps: vec![
                    SubStep::new(
                        AssertionType::ColValsGt,
                        ColumnSpec::single("a"),
                        StepValues::literal(0),
                    ),
                    SubStep::new(
                        AssertionType::ColValsGt,
                        ColumnSpec::single("b"),
                        StepValues::literal(0),
                    ),
                ],
            },
        );
        let outcome = evaluate(&t, &s).unwrap();
        assert_eq!(outcome.results, vec![true, false, false]);
        assert_eq!(outcome.failing_rows, vec![1, 2]);
    }
}
