//! Criterion benchmarks for transformer + optimizer pairs on random catalogs.
//! Focus sizes: scenes in {10, 20, 40}; one AOI per seed.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use scenecover::api::{
    draw_aoi, draw_catalog, BnbOptimizer, CatalogCfg, ContinuousTransformer, DiscreteTransformer,
    GreedyOptimizer, Optimizer, SearchCfg, ShapeCfg, Transformer,
};

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(20);
    for &n in &[10usize, 20, 40] {
        let cfg = CatalogCfg {
            scenes: n,
            ..CatalogCfg::default()
        };
        let catalog = draw_catalog(&cfg, 3);
        let aoi = draw_aoi(
            &ShapeCfg {
                area: 4.0,
                ..cfg.shape
            },
            3,
        );

        group.bench_with_input(BenchmarkId::new("transform_discrete", n), &n, |b, _| {
            let t = DiscreteTransformer::new(0.05).unwrap();
            b.iter(|| t.transform(&aoi, &catalog).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("transform_continuous", n), &n, |b, _| {
            let t = ContinuousTransformer::new();
            b.iter(|| t.transform(&aoi, &catalog).unwrap())
        });

        let model = ContinuousTransformer::new()
            .transform(&aoi, &catalog)
            .unwrap();
        let search = SearchCfg::default()
            .with_target(0.8)
            .with_time_limit(Duration::from_millis(200));
        let optimizers: Vec<Box<dyn Optimizer>> = vec![
            Box::new(GreedyOptimizer::new()),
            Box::new(BnbOptimizer::discrete()),
            Box::new(BnbOptimizer::offcut()),
        ];
        for opt in &optimizers {
            group.bench_with_input(BenchmarkId::new(opt.tag(), n), &n, |b, _| {
                b.iter(|| opt.optimize(&model.universe, &model.ranges, &search))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
