//! The severity evaluator: a pure function of unit counts and thresholds.

use crate::plan::Thresholds;

/// Threshold states produced for one step. `None` means the corresponding
/// threshold was never configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityFlags {
    pub report: Option<bool>,
    pub warn: Option<bool>,
    pub stop: Option<bool>,
    pub notify: Option<bool>,
}

/// Evaluate every configured threshold against the unit counts.
///
/// The four kinds are independent: any subset can be tripped at once, and
/// there is no ordering between them. Fractional limits never trip when
/// `n == 0`.
pub fn evaluate(n: u64, n_passed: u64, thresholds: &Thresholds) -> SeverityFlags {
    SeverityFlags {
        report: thresholds.report.map(|l| l.tripped(n, n_passed)),
        warn: thresholds.warn.map(|l| l.tripped(n, n_passed)),
        stop: thresholds.stop.map(|l| l.tripped(n, n_passed)),
        notify: thresholds.notify.map(|l| l.tripped(n, n_passed)),
    }
}
