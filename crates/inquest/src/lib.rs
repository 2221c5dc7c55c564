//! Inquest: declarative validation plans for tabular data.
//!
//! Callers build a validation plan (an ordered list of assertion steps over
//! a table), execute it ("interrogate"), and read a structured report of
//! pass/fail test-unit counts, threshold-triggered severity states, and
//! optional extracts of failing rows.
//!
//! # Core principles
//!
//! - **Declarative**: a plan is data; execution fills in outcomes in place
//! - **Isolated failures**: one step's evaluation error never aborts the rest
//! - **Deterministic reports**: ordering and filtering are stable projections
//!
//! # Example
//!
//! ```no_run
//! use inquest::{Agent, AssertionType, ReportOptions, StepSpec, StepValues};
//!
//! let mut agent = Agent::from_path("scores.csv").unwrap();
//! agent
//!     .add_step(
//!         StepSpec::new(AssertionType::ColValsGt)
//!             .with_column("score")
//!             .with_values(StepValues::literal(0)),
//!     )
//!     .unwrap();
//! agent.interrogate();
//!
//! let report = agent.report(&ReportOptions::default()).unwrap();
//! println!("{} steps reported", report.rows.len());
//! ```

pub mod error;
pub mod input;
pub mod interrogate;
pub mod plan;
pub mod report;

mod agent;

pub use crate::agent::{Agent, AgentConfig};
pub use error::{InquestError, Result};
pub use input::{Reader, ReaderConfig, SourceInfo, Table};
pub use interrogate::{InterrogateOptions, SeverityFlags};
pub use plan::{
    AssertionType, Bound, BoundValue, ColumnDef, ColumnSelection, ColumnSpec, ColumnType, Limit,
    Precondition, StepSpec, StepValues, SubStep, Thresholds, ValidationPlan, ValidationStep,
};
pub use report::{
    ArrangeBy, Density, EvalCondition, Keep, Labels, Report, ReportBuilder, ReportOptions,
    ReportRow,
};
