//! Report building, rendering, and extract export.

mod builder;
mod export;
mod labels;
mod render;
mod row;

pub use builder::{ReportBuilder, eval_condition, severity_score};
pub use export::{export_extract, extract_file_name};
pub use labels::{Headings, Labels};
pub use render::render_text;
pub use row::{
    ArrangeBy, Density, EvalCondition, Keep, Report, ReportField, ReportOptions, ReportRow,
};
