//! Criterion benchmarks for the polygon kernel.
//! Focus: clip and union on random scenes, n in {2, 8, 32} polygons.
//! Results: by default under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use scenecover::api::{clip, draw_catalog, union_area, CatalogCfg, GeomCfg, Polygon};

fn scenes(n: usize, seed: u64) -> Vec<Polygon> {
    let cfg = CatalogCfg {
        scenes: n,
        ..CatalogCfg::default()
    };
    draw_catalog(&cfg, seed)
        .into_iter()
        .map(|c| c.polygon)
        .collect()
}

fn bench_clip(c: &mut Criterion) {
    let mut group = c.benchmark_group("geom2");
    let concave = Polygon::from_xy(&[
        [0.0, 0.0],
        [4.0, 0.0],
        [4.0, 2.0],
        [2.0, 2.0],
        [2.0, 4.0],
        [0.0, 4.0],
    ])
    .unwrap();
    for &n in &[2usize, 8, 32] {
        group.bench_with_input(BenchmarkId::new("clip_vs_concave", n), &n, |b, &n| {
            b.iter_batched(
                || scenes(n, 7),
                |ps| {
                    for p in &ps {
                        let _c = clip(p, &concave);
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("union_area", n), &n, |b, &n| {
            let cfg = GeomCfg::default();
            b.iter_batched(
                || scenes(n, 11),
                |ps| {
                    let _a = union_area(&ps, &cfg);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_clip);
criterion_main!(benches);
