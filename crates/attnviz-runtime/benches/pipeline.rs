use attnviz_runtime::{CellRef, MatrixId, Session, VisualizerConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

fn bench_edit_recompute(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("edit_recompute");

    for (name, config) in
        [("default", VisualizerConfig::default()), ("documented", VisualizerConfig::documented())]
    {
        let mut session = Session::with_seed(config, 0).unwrap();
        session.select(CellRef::new(MatrixId::Embeddings, 0, 0)).unwrap();
        let mut value = 0.0;

        group.bench_with_input(BenchmarkId::new("set_value", name), &name, |bencher, _| {
            bencher.iter(|| {
                value = if value > 1.0 { -1.0 } else { value + 0.01 };
                session.set_selected_value(black_box(value)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_wiggle_frame(criterion: &mut Criterion) {
    let mut session = Session::with_seed(VisualizerConfig::documented(), 1).unwrap();
    session.select(CellRef::new(MatrixId::Query, 2, 3)).unwrap();
    session.set_wiggle(true);
    let mut now = Duration::ZERO;

    // One timer frame: perturb, recompute, build the snapshot
    criterion.bench_function("wiggle_frame_10x6", |bencher| {
        bencher.iter(|| {
            now += Duration::from_millis(16);
            session.tick(black_box(now)).unwrap();
            black_box(session.snapshot());
        });
    });
}

criterion_group!(benches, bench_edit_recompute, bench_wiggle_frame);
criterion_main!(benches);
