//! The heterogeneous `values` payload carried by a validation step.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::step::{AssertionType, ColumnSpec};

/// Expected type tag for a column in a schema payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Text/string values.
    String,
    /// Boolean values (true/false).
    Boolean,
    /// ISO date values (YYYY-MM-DD).
    Date,
}

impl ColumnType {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
        }
    }

    /// Whether a non-null cell conforms to this type tag.
    pub fn matches(&self, value: &str) -> bool {
        let trimmed = value.trim();
        match self {
            ColumnType::Integer => trimmed.parse::<i64>().is_ok(),
            ColumnType::Float => trimmed.parse::<f64>().is_ok(),
            ColumnType::String => true,
            ColumnType::Boolean => matches!(
                trimmed.to_lowercase().as_str(),
                "true" | "false" | "yes" | "no" | "t" | "f" | "1" | "0"
            ),
            ColumnType::Date => {
                let parts: Vec<&str> = trimmed.split('-').collect();
                parts.len() == 3
                    && parts[0].len() == 4
                    && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
            }
        }
    }
}

/// One column of an expected table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// One side of a bounds pair: a literal number or another column, compared
/// inclusively or exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub value: BoundValue,
    pub inclusive: bool,
}

impl Bound {
    pub fn literal(value: f64, inclusive: bool) -> Self {
        Self {
            value: BoundValue::Literal(value),
            inclusive,
        }
    }

    pub fn column(name: impl Into<String>, inclusive: bool) -> Self {
        Self {
            value: BoundValue::Column(name.into()),
            inclusive,
        }
    }
}

/// The comparand of a bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundValue {
    Literal(f64),
    Column(String),
}

/// A sub-assertion inside a conjoint validation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubStep {
    pub assertion: AssertionType,
    pub columns: ColumnSpec,
    pub values: Box<StepValues>,
}

impl SubStep {
    pub fn new(assertion: AssertionType, columns: ColumnSpec, values: StepValues) -> Self {
        Self {
            assertion,
            columns,
            values: Box::new(values),
        }
    }
}

/// The tagged payload a step carries: different assertion kinds take
/// different parameter shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum StepValues {
    /// No parameters (e.g. not-null, rows-distinct).
    None,
    /// A list of literal values (set membership, single comparands).
    Set { values: Vec<Value> },
    /// A reference to another column of the same table.
    Column { column: String },
    /// A pair of bounds, each independently literal-or-column and
    /// inclusive/exclusive.
    Bounds { lower: Bound, upper: Bound },
    /// An expected table schema.
    Schema { columns: Vec<ColumnDef> },
    /// Sub-assertions for a conjoint validation.
    SubSteps { steps: Vec<SubStep> },
    /// A quoted expression (e.g. a regex pattern).
    Expression { expr: String },
}

impl StepValues {
    /// Set payload from anything JSON-representable.
    pub fn set<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        StepValues::Set {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Single-literal set payload, the common case for comparisons.
    pub fn literal(value: impl Into<Value>) -> Self {
        StepValues::Set {
            values: vec![value.into()],
        }
    }

    pub fn column(name: impl Into<String>) -> Self {
        StepValues::Column {
            column: name.into(),
        }
    }

    pub fn bounds(lower: Bound, upper: Bound) -> Self {
        StepValues::Bounds { lower, upper }
    }

    pub fn expression(expr: impl Into<String>) -> Self {
        StepValues::Expression { expr: expr.into() }
    }

    /// Project the payload to its report rendering. `None` payloads render
    /// as missing; every other shape dispatches on its tag.
    pub fn render(&self) -> Option<String> {
        match self {
            StepValues::None => None,
            StepValues::Set { values } => Some(
                values
                    .iter()
                    .map(render_literal)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            StepValues::Column { column } => Some(column.clone()),
            StepValues::Bounds { lower, upper } => Some(format!(
                "{}{}, {}{}",
                if lower.inclusive { '[' } else { '(' },
                render_bound_value(&lower.value),
                render_bound_value(&upper.value),
                if upper.inclusive { ']' } else { ')' },
            )),
            StepValues::Schema { columns } => Some(
                columns
                    .iter()
                    .map(|c| format!("{}: {}", c.name, c.column_type.label()))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            StepValues::SubSteps { steps } => Some(format!("{} sub-steps", steps.len())),
            StepValues::Expression { expr } => Some(expr.clone()),
        }
    }
}

fn render_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_bound_value(value: &BoundValue) -> String {
    match value {
        BoundValue::Literal(v) => {
            if v.fract() == 0.0 && v.abs() < 1e15 {
                format!("{}", *v as i64)
            } else {
                format!("{}", v)
            }
        }
        BoundValue::Column(name) => name.clone(),
    }
}
