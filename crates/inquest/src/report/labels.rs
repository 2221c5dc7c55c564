//! The language resource used when projecting and rendering reports.
//!
//! Injected into the report builder at construction; there is no runtime
//! lookup keyed by a global language code.

use once_cell::sync::Lazy;

/// Column headings for the report table, one per report field.
#[derive(Debug, Clone)]
pub struct Headings {
    pub i: String,
    pub assertion: String,
    pub columns: String,
    pub values: String,
    pub precon: String,
    pub active: String,
    pub eval: String,
    pub units: String,
    pub n_pass: String,
    pub f_pass: String,
    pub n_fail: String,
    pub f_fail: String,
    pub warn: String,
    pub stop: String,
    pub notify: String,
    pub extract: String,
}

/// All user-visible strings the report layer needs.
#[derive(Debug, Clone)]
pub struct Labels {
    pub headings: Headings,
    /// Evaluated cleanly.
    pub eval_ok: String,
    /// The check itself raised an error.
    pub eval_error: String,
    /// The check raised a recoverable warning.
    pub eval_warning: String,
    /// Both a warning and an error.
    pub eval_both: String,
    /// Rendering for absent values and never-evaluated steps.
    pub missing: String,
    /// Rendering for active/inactive and tripped/clear flags.
    pub yes: String,
    pub no: String,
}

static ENGLISH: Lazy<Labels> = Lazy::new(|| Labels {
    headings: Headings {
        i: "i".to_string(),
        assertion: "type".to_string(),
        columns: "columns".to_string(),
        values: "values".to_string(),
        precon: "precon".to_string(),
        active: "active".to_string(),
        eval: "eval".to_string(),
        units: "units".to_string(),
        n_pass: "n_pass".to_string(),
        f_pass: "f_pass".to_string(),
        n_fail: "n_fail".to_string(),
        f_fail: "f_fail".to_string(),
        warn: "W".to_string(),
        stop: "S".to_string(),
        notify: "N".to_string(),
        extract: "extract".to_string(),
    },
    eval_ok: "OK".to_string(),
    eval_error: "ERROR".to_string(),
    eval_warning: "WARNING".to_string(),
    eval_both: "W + E".to_string(),
    missing: "-".to_string(),
    yes: "yes".to_string(),
    no: "no".to_string(),
});

impl Default for Labels {
    fn default() -> Self {
        ENGLISH.clone()
    }
}
