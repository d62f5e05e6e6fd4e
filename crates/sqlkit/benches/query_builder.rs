use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlkit::qb::{self, QueryBuilder};

/// Build a query with `n` scalar predicates:
/// SELECT id FROM t WHERE col0 = ? AND col1 = ? ...
fn build_select(n: usize) -> QueryBuilder {
    let mut qb = qb::select(&["id"]).from("t");
    for i in 0..n {
        qb = qb.eq(&format!("col{i}"), i as i64);
    }
    qb
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/build");

    for n in [1, 5, 10, 50, 100] {
        let qb = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.build()));
        });
    }

    group.finish();
}

fn bench_configure_and_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/configure_and_build");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).build()));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let q = qb::select(&["id"])
                    .from("t")
                    .in_list("id", values.iter().copied())
                    .build();
                black_box(q);
            });
        });
    }

    group.finish();
}

fn bench_composite_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/composite_in");

    for n in [5, 20, 100] {
        let rows: Vec<Vec<i64>> = (0..n).map(|i| vec![i, i + 1]).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &rows, |b, rows| {
            b.iter(|| {
                let q = qb::select(&["id"])
                    .from("t")
                    .in_tuples("(a,b)", rows.iter().cloned())
                    .build();
                black_box(q);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_configure_and_build,
    bench_in_list,
    bench_composite_in
);
criterion_main!(benches);
