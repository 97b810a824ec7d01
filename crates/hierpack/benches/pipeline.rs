use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use hierpack::render::{HeadlessPacker, LayoutOptions, layout, select_labels};
use hierpack::{HierarchyBuilder, HierpackConfig, Row};

fn fixtures() -> Vec<(&'static str, Vec<Row>)> {
    let wide = (0..400)
        .map(|i| Row::new((i % 17 + 1) as f64, [format!("Leaf {i} ({i})-W")]))
        .collect();
    let deep = (0..600)
        .map(|i| {
            Row::new(
                (i % 11) as f64 * 3.5,
                [
                    format!("Sector ({})-S", i % 5),
                    format!("Group ({})-G", i % 23),
                    format!("Item ({i})-I"),
                ],
            )
        })
        .collect();
    vec![("wide", wide), ("deep", deep)]
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for (name, rows) in fixtures() {
        group.bench_function(name, |b| {
            b.iter(|| HierarchyBuilder::default().build(&rows));
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let options = LayoutOptions::default();

    let mut group = c.benchmark_group("layout");
    for (name, rows) in fixtures() {
        let hierarchy = HierarchyBuilder::default().build(&rows);
        group.bench_function(name, |b| {
            b.iter(|| layout(hierarchy.root(), 1024.0, 768.0, &options));
        });
    }
    group.finish();
}

fn bench_labels(c: &mut Criterion) {
    let options = LayoutOptions::default();

    let mut group = c.benchmark_group("labels");
    for (name, rows) in fixtures() {
        let hierarchy = HierarchyBuilder::default().build(&rows);
        let laid_out = layout(hierarchy.root(), 1024.0, 768.0, &options);
        group.bench_function(name, |b| {
            b.iter(|| select_labels(&laid_out, &options.labels).len());
        });
    }
    group.finish();
}

fn bench_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("view");
    for (name, rows) in fixtures() {
        group.bench_function(name, |b| {
            b.iter_batched(
                || rows.clone(),
                |rows| {
                    let packer =
                        HeadlessPacker::from_rows(&rows, &HierpackConfig::defaults()).unwrap();
                    packer.view(1024.0, 768.0)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_layout, bench_labels, bench_view);
criterion_main!(benches);
