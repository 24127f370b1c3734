// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use wayfarer::domain::Coordinate;
use wayfarer::ui::map::projection::{self, Viewport};

fn map_projection_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_projection");

    let paris = Coordinate::new(48.8566, 2.3522).unwrap();
    let mut viewport = Viewport::new(paris, 12);
    viewport.set_size(1920.0, 1080.0);

    group.bench_function("visible_tiles_1080p", |b| {
        b.iter(|| black_box(viewport.visible_tiles()));
    });

    group.bench_function("project_unproject", |b| {
        b.iter(|| {
            let point = projection::project(black_box(paris), 15);
            black_box(projection::unproject(point, 15))
        });
    });

    group.bench_function("screen_round_trip", |b| {
        b.iter(|| {
            let (x, y) = viewport.to_screen(black_box(paris));
            black_box(viewport.to_coordinate(x + 10.0, y - 10.0))
        });
    });

    group.finish();
}

criterion_group!(benches, map_projection_benchmark);
criterion_main!(benches);
