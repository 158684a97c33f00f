use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use liteorm::{Affinity, Handle, InsertBuilder, SelectBuilder, SelectSpec, SqlBuilder};

/// Insert builder over `n` columns alternating INT and TEXT.
fn build_insert(n: usize) -> InsertBuilder {
    let mut builder = InsertBuilder::new("t");
    builder
        .columns((0..n).map(|i| format!("col{i}")))
        .declared_types((0..n).map(|i| if i % 2 == 0 { "INT" } else { "TEXT" }))
        .values((0..n).map(|i| {
            if i % 2 == 0 {
                i.to_string()
            } else {
                format!("value {i}")
            }
        }));
    builder
}

fn bench_insert_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/insert_build");

    for n in [1, 5, 10, 50, 100] {
        let builder = build_insert(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &builder, |b, builder| {
            b.iter(|| black_box(builder.build()));
        });
    }

    group.finish();
}

fn bench_select_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/select_build");

    for n in [1, 5, 10, 50] {
        let spec = SelectSpec::new("t")
            .fields((0..n).map(|i| format!("col{i}")))
            .where_cond("col0 > 10")
            .group_by(["col0"])
            .order_by(["col0"])
            .order_type("desc")
            .limit(10);
        let builder = SelectBuilder::new(spec);
        group.bench_with_input(BenchmarkId::from_parameter(n), &builder, |b, builder| {
            b.iter(|| black_box(builder.build()));
        });
    }

    group.finish();
}

fn bench_affinity(c: &mut Criterion) {
    let types = [
        "INT",
        "VARCHAR(255)",
        "DOUBLE PRECISION",
        "BLOB",
        "DECIMAL(10,5)",
        "",
    ];
    c.bench_function("affinity/from_declared_type", |b| {
        b.iter(|| {
            for declared in types {
                black_box(Affinity::from_declared_type(black_box(declared)));
            }
        });
    });

    c.bench_function("affinity/accepts", |b| {
        b.iter(|| {
            black_box(Affinity::Integer.accepts(black_box("123456789")));
            black_box(Affinity::Real.accepts(black_box("3,14159")));
        });
    });
}

fn bench_select_records(c: &mut Criterion) {
    let mut db = Handle::open_in_memory().unwrap();
    db.create_table("t", [("ID", "INT"), ("NAME", "TEXT")])
        .unwrap();
    for i in 0..1000 {
        db.insert_record("t", [i.to_string(), format!("name{i}")])
            .unwrap();
    }

    let spec = SelectSpec::new("t").where_cond("ID < 100");
    c.bench_function("handle/select_records_100", |b| {
        b.iter(|| black_box(db.select_records(&spec).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_insert_build,
    bench_select_build,
    bench_affinity,
    bench_select_records
);
criterion_main!(benches);
