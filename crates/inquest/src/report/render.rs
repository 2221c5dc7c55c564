//! Plain-text presentation adapter for the report model.

use super::labels::Labels;
use super::row::{Density, Report, ReportField, ReportRow};

/// Render a report as a fixed-width text table.
pub fn render_text(report: &Report, density: Density, labels: &Labels) -> String {
    let fields = density.fields();

    let header: Vec<String> = fields.iter().map(|f| heading(*f, labels)).collect();
    let body: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| fields.iter().map(|f| cell(row, *f, labels)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format!("Validation report: {}\n", report.agent));
    out.push_str(&format_line(&header, &widths));
    out.push_str(&format_rule(&widths));
    for row in &body {
        out.push_str(&format_line(row, &widths));
    }
    out
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        for _ in cell.chars().count()..widths[i] {
            line.push(' ');
        }
    }
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

fn format_rule(widths: &[usize]) -> String {
    let total: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    let mut line = "-".repeat(total);
    line.push('\n');
    line
}

fn heading(field: ReportField, labels: &Labels) -> String {
    let h = &labels.headings;
    match field {
        ReportField::I => h.i.clone(),
        ReportField::Assertion => h.assertion.clone(),
        ReportField::Columns => h.columns.clone(),
        ReportField::Values => h.values.clone(),
        ReportField::Precon => h.precon.clone(),
        ReportField::Active => h.active.clone(),
        ReportField::Eval => h.eval.clone(),
        ReportField::Units => h.units.clone(),
        ReportField::NPass => h.n_pass.clone(),
        ReportField::FPass => h.f_pass.clone(),
        ReportField::NFail => h.n_fail.clone(),
        ReportField::FFail => h.f_fail.clone(),
        ReportField::Warn => h.warn.clone(),
        ReportField::Stop => h.stop.clone(),
        ReportField::Notify => h.notify.clone(),
        ReportField::Extract => h.extract.clone(),
    }
}

fn cell(row: &ReportRow, field: ReportField, labels: &Labels) -> String {
    match field {
        ReportField::I => row.i.to_string(),
        ReportField::Assertion => row.assertion.clone(),
        ReportField::Columns => opt_string(&row.columns, labels),
        ReportField::Values => opt_string(&row.values, labels),
        ReportField::Precon => opt_display(row.precon, labels),
        ReportField::Active => flag(Some(row.active), labels),
        ReportField::Eval => row
            .eval
            .map(|e| e.label(labels).to_string())
            .unwrap_or_else(|| labels.missing.clone()),
        ReportField::Units => opt_display(row.units, labels),
        ReportField::NPass => opt_display(row.n_pass, labels),
        ReportField::FPass => fraction(row.f_pass, labels),
        ReportField::NFail => opt_display(row.n_fail, labels),
        ReportField::FFail => fraction(row.f_fail, labels),
        ReportField::Warn => flag(row.warn, labels),
        ReportField::Stop => flag(row.stop, labels),
        ReportField::Notify => flag(row.notify, labels),
        ReportField::Extract => opt_display(row.extract, labels),
    }
}

fn opt_string(value: &Option<String>, labels: &Labels) -> String {
    value.clone().unwrap_or_else(|| labels.missing.clone())
}

fn opt_display<T: std::fmt::Display>(value: Option<T>, labels: &Labels) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| labels.missing.clone())
}

fn fraction(value: Option<f64>, labels: &Labels) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| labels.missing.clone())
}

fn flag(value: Option<bool>, labels: &Labels) -> String {
    match value {
        None => labels.missing.clone(),
        Some(true) => labels.yes.clone(),
        Some(false) => labels.no.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_report() -> Report {
        Report {
            agent: "agent_x".to_string(),
            rows: vec![ReportRow {
                i: 1,
                assertion: "col_vals_gt".to_string(),
                columns: Some("score".to_string()),
                values: Some("5".to_string()),
                precon: None,
                active: true,
                eval: Some(super::super::row::EvalCondition::Ok),
                units: Some(10),
                n_pass: Some(7),
                f_pass: Some(0.7),
                n_fail: Some(3),
                f_fail: Some(0.3),
                warn: Some(true),
                stop: None,
                notify: None,
                extract: Some(3),
            }],
            built_at: Utc::now(),
        }
    }

    #[test]
    fn test_standard_density_shows_extract() {
        let text = render_text(&sample_report(), Density::Standard, &Labels::default());
        assert!(text.contains("agent_x"));
        assert!(text.contains("col_vals_gt"));
        assert!(text.contains("extract"));
        assert!(text.contains("0.70"));
    }

    #[test]
    fn test_small_density_omits_columns_and_extract() {
        let text = render_text(&sample_report(), Density::Small, &Labels::default());
        assert!(!text.contains("extract"));
        assert!(!text.contains("precon"));
        assert!(!text.contains("score"));
        assert!(text.contains("OK"));
    }

    #[test]
    fn test_missing_values_render_as_dash() {
        let mut report = sample_report();
        report.rows[0].eval = None;
        report.rows[0].units = None;
        let text = render_text(&report, Density::Small, &Labels::default());
        assert!(text.contains('-'));
    }
}
