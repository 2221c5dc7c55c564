//! Interrogation performance benchmarks.
//!
//! Measures plan execution and report building across table sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use inquest::{
    Agent, AgentConfig, ArrangeBy, AssertionType, Bound, Keep, Limit, ReportOptions, StepSpec,
    StepValues, Table, Thresholds,
};

/// Generate a synthetic table with the specified number of rows.
fn generate_table(rows: usize) -> Table {
    let headers = vec![
        "id".to_string(),
        "amount".to_string(),
        "category".to_string(),
        "limit".to_string(),
    ];
    let data = (0..rows)
        .map(|row| {
            vec![
                format!("R{:06}", row),
                format!("{:.2}", (row % 1000) as f64 * 1.5),
                format!("cat_{}", row % 8),
                "1200".to_string(),
            ]
        })
        .collect();
    Table::new(headers, data, b',')
}

fn agent_for(rows: usize) -> Agent {
    Agent::with_config(
        generate_table(rows),
        AgentConfig {
            name: Some("bench".to_string()),
            ..Default::default()
        },
    )
}

fn add_typical_plan(agent: &mut Agent) {
    agent
        .add_step(
            StepSpec::new(AssertionType::ColValsNotNull).with_column("id"),
        )
        .unwrap();
    agent
        .add_step(
            StepSpec::new(AssertionType::ColValsGe)
                .with_column("amount")
                .with_values(StepValues::literal(0))
                .with_thresholds(Thresholds::new().with_warn(Limit::Fraction(0.05))),
        )
        .unwrap();
    agent
        .add_step(
            StepSpec::new(AssertionType::ColValsBetween)
                .with_column("amount")
                .with_values(StepValues::bounds(
                    Bound::literal(0.0, true),
                    Bound::column("limit", false),
                )),
        )
        .unwrap();
    agent
        .add_step(
            StepSpec::new(AssertionType::ColValsRegex)
                .with_column("id")
                .with_values(StepValues::expression("^R[0-9]{6}$")),
        )
        .unwrap();
    agent
        .add_step(StepSpec::new(AssertionType::RowsDistinct))
        .unwrap();
}

/// Benchmark a typical multi-step plan end to end.
fn bench_interrogation(c: &mut Criterion) {
    let mut group = c.benchmark_group("interrogation");

    for rows in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("typical_plan", rows), rows, |b, &rows| {
            b.iter_with_setup(
                || {
                    let mut agent = agent_for(rows);
                    add_typical_plan(&mut agent);
                    agent
                },
                |mut agent| {
                    agent.interrogate();
                    black_box(agent)
                },
            );
        });
    }

    group.finish();
}

/// Benchmark individual check kinds over a fixed table size.
fn bench_check_kinds(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_kinds");
    let rows = 5_000usize;

    let cases: Vec<(&str, StepSpec)> = vec![
        (
            "col_vals_gt",
            StepSpec::new(AssertionType::ColValsGt)
                .with_column("amount")
                .with_values(StepValues::literal(100)),
        ),
        (
            "col_vals_in_set",
            StepSpec::new(AssertionType::ColValsInSet)
                .with_column("category")
                .with_values(StepValues::set([
                    "cat_0", "cat_1", "cat_2", "cat_3", "cat_4", "cat_5", "cat_6", "cat_7",
                ])),
        ),
        (
            "col_vals_regex",
            StepSpec::new(AssertionType::ColValsRegex)
                .with_column("id")
                .with_values(StepValues::expression("^R[0-9]{6}$")),
        ),
        (
            "rows_distinct",
            StepSpec::new(AssertionType::RowsDistinct),
        ),
    ];

    for (name, spec) in cases {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_function(BenchmarkId::new("single_step", name), |b| {
            b.iter_with_setup(
                || {
                    let mut agent = agent_for(rows);
                    agent.add_step(spec.clone()).unwrap();
                    agent
                },
                |mut agent| {
                    agent.interrogate();
                    black_box(agent)
                },
            );
        });
    }

    group.finish();
}

/// Benchmark report building and rendering separately from execution.
fn bench_report_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");

    let mut agent = agent_for(5_000);
    add_typical_plan(&mut agent);
    agent.interrogate();

    group.bench_function("build_by_index", |b| {
        b.iter(|| black_box(agent.report(&ReportOptions::default()).unwrap()));
    });

    group.bench_function("build_by_severity", |b| {
        let options = ReportOptions {
            arrange_by: ArrangeBy::Severity,
            keep: Keep::All,
        };
        b.iter(|| black_box(agent.report(&options).unwrap()));
    });

    let report = agent.report(&ReportOptions::default()).unwrap();
    group.bench_function("render_text", |b| {
        b.iter(|| black_box(agent.render_report(&report, inquest::Density::Standard)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_interrogation,
    bench_check_kinds,
    bench_report_building
);
criterion_main!(benches);
