//! Benchmarks for table building, numeric projection and chart rendering
//!
//! Run with: cargo bench --bench attribute_pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use slipscan_server::charts::{render_bar, render_pie};
use slipscan_server::extraction::{build_table, project_table, ExtractionRecords, ExtractionValue};

fn records(count: usize) -> ExtractionRecords {
    (0..count)
        .map(|i| {
            let reply = format!(
                "1. Gross Salary: {}\n2. House Rent Allowances: {}\n3. Conveyance Allowances: N/A\n4. Net Salary: ${} approx\n5. Basic Amount: {}",
                5000 + i,
                1200 + i % 7,
                4200 + i * 3,
                3000 + i % 11,
            );
            (format!("slip_{}.jpg", i), ExtractionValue::Raw(reply))
        })
        .collect()
}

fn bench_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("table");

    for count in [10, 100, 1000] {
        let input = records(count);
        group.bench_with_input(BenchmarkId::new("build_and_project", count), &input, |b, input| {
            b.iter(|| {
                let build = build_table(black_box(input));
                project_table(&build.table)
            });
        });
    }

    group.finish();
}

fn bench_charts(c: &mut Criterion) {
    let build = build_table(&records(20));
    let series = project_table(&build.table);
    let net = series
        .iter()
        .find(|s| s.column == "Net Salary")
        .expect("net salary column");

    let mut group = c.benchmark_group("charts");
    group.sample_size(20);
    group.bench_function("bar", |b| b.iter(|| render_bar(black_box(net))));
    group.bench_function("pie", |b| b.iter(|| render_pie(black_box(net))));
    group.finish();
}

criterion_group!(benches, bench_table, bench_charts);
criterion_main!(benches);
