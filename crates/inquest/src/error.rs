//! Error types for the Inquest library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Inquest operations.
#[derive(Debug, Error)]
pub enum InquestError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to validate.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Malformed step configuration at plan-build time.
    ///
    /// Raised immediately to the caller; the plan is not mutated.
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    /// A step's check could not be computed (bad column reference, type
    /// mismatch, malformed pattern). Captured per step as `eval_error`;
    /// never aborts the rest of an interrogation.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// A report was requested from an agent with no validation plan.
    #[error("No validation plan: add at least one step before requesting a report")]
    NoPlan,

    /// An unrecognized value for a fixed-choice report option.
    #[error("Invalid value '{given}' for {field}: must be one of {allowed}")]
    InvalidChoice {
        field: &'static str,
        given: String,
        allowed: &'static str,
    },
}

/// Result type alias for Inquest operations.
pub type Result<T> = std::result::Result<T, InquestError>;
