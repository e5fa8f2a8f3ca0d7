//! Criterion benchmark for the cull context end to end: register a scene of
//! random silhouettes, then flag them front to back.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use umbra::geom::rand::{draw_silhouette, SilhouetteCfg};
use umbra::geom::{BBox, Vec2};
use umbra::prelude::{CullFlag, OcclCullContext, OcclMesh};

fn random_scene(n: usize, seed: u64) -> Vec<OcclMesh> {
    let mut rng = StdRng::seed_from_u64(seed);
    let cfg = SilhouetteCfg {
        vertex_count: 8,
        base_radius: 4.0,
        ..SilhouetteCfg::default()
    };

    (0..n)
        .map(|k| {
            let center = Vec2::new(rng.gen_range(10.0..90.0), rng.gen_range(10.0..90.0));
            OcclMesh::new(draw_silhouette(&cfg, center, seed ^ ((k as u64) << 8)))
        })
        .collect()
}

fn bench_flag_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("cull_context");
    group.sample_size(20);

    let clip = BBox::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));

    for &n in &[64usize, 256] {
        group.bench_with_input(BenchmarkId::new("flag_front_to_back", n), &n, |b, &n| {
            b.iter_batched(
                || random_scene(n, 77),
                |scene| {
                    let mut ctx = OcclCullContext::new(n, clip);
                    let ids: Vec<_> = scene.into_iter().map(|m| ctx.add_mesh(m)).collect();
                    for id in ids {
                        ctx.flag_mesh(id, CullFlag::Occluded);
                    }
                    ctx.stats()
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flag_scene);
criterion_main!(benches);
