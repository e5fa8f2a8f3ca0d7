//! Random convex silhouettes (radial jitter, seeded).
//!
//! Deterministic sampler used by the randomized tests and the benches: `n`
//! roughly equally spaced angles with bounded angular and radial jitter,
//! pushed through the in-place hull so the result satisfies the `OcclMesh`
//! input contract (CCW, no collinear triples, no duplicates).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::hull::convex_hull_inplace;
use super::types::Vec2;

/// Sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct SilhouetteCfg {
    /// Points drawn before the hull pass (the hull may keep fewer).
    pub vertex_count: usize,
    /// Angular jitter as a fraction of the base spacing `2*pi/n`. Clamped to
    /// `[0, 0.49]` so the angle order stays strictly increasing.
    pub angle_jitter_frac: f32,
    /// Radial jitter amplitude relative to `base_radius`.
    pub radial_jitter: f32,
    pub base_radius: f32,
}

impl Default for SilhouetteCfg {
    fn default() -> Self {
        Self {
            vertex_count: 8,
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
        }
    }
}

/// Draw one convex silhouette centred on `center`.
pub fn draw_silhouette(cfg: &SilhouetteCfg, center: Vec2, seed: u64) -> Vec<Vec2> {
    let mut rng = StdRng::seed_from_u64(seed);

    let n = cfg.vertex_count.max(3);
    let delta = std::f32::consts::TAU / n as f32;
    let jitter = cfg.angle_jitter_frac.clamp(0.0, 0.49);

    let mut pts: Vec<Vec2> = (0..n)
        .map(|k| {
            let angle = k as f32 * delta + (rng.gen::<f32>() * 2.0 - 1.0) * jitter * delta;
            let u = (rng.gen::<f32>() * 2.0 - 1.0) * cfg.radial_jitter;
            let r = (1.0 + u).max(1e-3) * cfg.base_radius;
            center + Vec2::new(angle.cos() * r, angle.sin() * r)
        })
        .collect();

    convex_hull_inplace(&mut pts);
    pts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::types::{pt_left_of, Vec2};

    #[test]
    fn draws_are_reproducible() {
        let cfg = SilhouetteCfg::default();
        let a = draw_silhouette(&cfg, Vec2::new(5.0, 5.0), 17);
        let b = draw_silhouette(&cfg, Vec2::new(5.0, 5.0), 17);
        assert_eq!(a, b);
    }

    #[test]
    fn draws_are_convex_and_ccw() {
        let cfg = SilhouetteCfg {
            vertex_count: 12,
            ..SilhouetteCfg::default()
        };
        for seed in 0..32 {
            let hull = draw_silhouette(&cfg, Vec2::new(0.0, 0.0), seed);
            assert!(hull.len() >= 3, "seed {seed} produced a degenerate hull");
            for k in 0..hull.len() {
                let a = hull[k];
                let b = hull[(k + 1) % hull.len()];
                let c = hull[(k + 2) % hull.len()];
                assert_eq!(pt_left_of(a, c, b), 1, "seed {seed} is not strictly convex");
            }
        }
    }
}
