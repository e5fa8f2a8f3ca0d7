//! Boundary walks that classify intersections and vertices.
//!
//! The raw side-pair hits from `inters` still contain grazing contacts that
//! do not actually move the boundary between inside and outside. Walking the
//! minuend CCW from a confidently classified start vertex, we sample the
//! midpoint of every sub-segment between consecutive hits and keep only the
//! hits across which the sampled state flips. The subtrahend walk is the
//! cheap symmetric half: it reuses the surviving hits and only tracks which
//! subtrahend vertices lie inside the minuend.

use crate::geom::types::{Triangle, Vec2, EPS_PROX, EPS_START};

use super::inters::{inters_point, minuend_side, subtr_side, FAC_COUNT};

/// Which side of the reference triangle's boundary the walk currently is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Region {
    Inside,
    Outside,
}

impl Region {
    #[inline]
    fn flip(self) -> Self {
        match self {
            Region::Inside => Region::Outside,
            Region::Outside => Region::Inside,
        }
    }
}

/// Hits grouped by side index; a triangle side holds at most two.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SideHits {
    pub per_side: [[usize; 2]; 3],
    pub count: [usize; 3],
}

impl SideHits {
    pub(crate) fn group(indices: &[usize], side_of: fn(usize) -> usize) -> Self {
        let mut hits = SideHits::default();
        for &i in indices {
            let t = side_of(i);
            // A segment meets a convex boundary at most twice; a third hit
            // can only be epsilon noise at a shared corner. Drop it.
            if hits.count[t] < 2 {
                hits.per_side[t][hits.count[t]] = i;
                hits.count[t] += 1;
            } else {
                log::warn!("dropping surplus boundary hit on side {t}");
            }
        }
        hits
    }

    /// Sort one side's hits ascending by parameter (or force a swap).
    /// Returns whether the order changed.
    fn sort_side(&mut self, side: usize, fac: &[f32; FAC_COUNT], force: bool) -> bool {
        debug_assert!(self.count[side] <= 2);

        if self.count[side] == 2 {
            let pair = &mut self.per_side[side];
            if force || fac[pair[0]] > fac[pair[1]] {
                pair.swap(0, 1);
                return true;
            }
        }

        false
    }
}

/// Pick the vertex of `tri` whose inside/outside status relative to
/// `ref_tri` is most certain: the one maximising `|proximity|`. The flag
/// reports whether even that extremum clears `EPS_START`.
pub(crate) fn choose_start_vertex(tri: &Triangle, ref_tri: &Triangle) -> (usize, Region, bool) {
    let mut inner_prox = f32::NEG_INFINITY;
    let mut outer_prox = f32::NEG_INFINITY;
    let mut inner_pt = 0;
    let mut outer_pt = 0;

    for i in 0..3 {
        let prox = ref_tri.proximity_to(tri.pts[i]);

        if prox <= 0.0 && -prox > inner_prox {
            inner_prox = -prox;
            inner_pt = i;
        }
        if prox >= 0.0 && prox > outer_prox {
            outer_prox = prox;
            outer_pt = i;
        }
    }

    let (pt, region) = if inner_prox < outer_prox {
        (outer_pt, Region::Outside)
    } else {
        (inner_pt, Region::Inside)
    };

    (pt, region, inner_prox.max(outer_prox) >= EPS_START)
}

pub(crate) struct MinuendWalk {
    /// Surviving intersection indices, grouped by minuend side 0, 1, 2.
    pub kept: Vec<usize>,
    /// Minuend vertex indices outside the subtrahend, in walk order.
    pub outside: Vec<usize>,
}

/// Walk the minuend CCW and keep only the hits that flip the inside/outside
/// state, as judged by midpoint samples against the subtrahend.
pub(crate) fn walk_minuend(
    minuend: &Triangle,
    subtr: &Triangle,
    fac: &[f32; FAC_COUNT],
    raw: &[usize],
) -> MinuendWalk {
    let mut hits = SideHits::group(raw, minuend_side);

    let (init_pt, init_region, confident) = choose_start_vertex(minuend, subtr);
    if !confident {
        // No vertex clears the confidence bound: treat every minuend vertex
        // as inside, which makes the caller emit nothing.
        return MinuendWalk {
            kept: Vec::new(),
            outside: Vec::new(),
        };
    }

    let mut region = init_region;
    let mut kept_side = [[0usize; 2]; 3];
    let mut kept_count = [0usize; 3];
    let mut outside = Vec::new();

    for step in 0..3 {
        let pt = (init_pt + step) % 3;

        let was_sorted = hits.sort_side(pt, fac, false);

        let icount = hits.count[pt];
        let mut prox_samples = [0.0f32; 2];
        if icount > 0 {
            let mut ipts = [Vec2::zeros(); 2];
            for k in 0..icount {
                ipts[k] = inters_point(&minuend.pts, fac, hits.per_side[pt][k]);
            }

            // Sample halfway between consecutive hits, and between the last
            // hit and the far end of the side.
            for k in 0..icount - 1 {
                let sample = 0.5 * (ipts[k] + ipts[k + 1]);
                prox_samples[k] = subtr.proximity_to(sample);
            }
            let sample = 0.5 * (ipts[icount - 1] + minuend.pts[(pt + 1) % 3]);
            prox_samples[icount - 1] = subtr.proximity_to(sample);
        }

        // A hit survives only when the sampled state behind it differs from
        // the state in front of it. Samples inside the +-EPS_PROX band keep
        // the previous state, which discards grazing contacts.
        let mut prev = region;
        for k in 0..icount {
            let sample = prox_samples[k];
            let after = match prev {
                Region::Inside => {
                    if sample >= EPS_PROX {
                        Region::Outside
                    } else {
                        Region::Inside
                    }
                }
                Region::Outside => {
                    if sample <= -EPS_PROX {
                        Region::Inside
                    } else {
                        Region::Outside
                    }
                }
            };

            if prev != after {
                kept_side[pt][kept_count[pt]] = hits.per_side[pt][k];
                kept_count[pt] += 1;
            }

            prev = after;
        }

        if kept_count[pt] == 2 && was_sorted {
            // Both hits survived on a side that was re-ordered for sampling:
            // restore the original order the emission code expects.
            kept_side[pt].swap(0, 1);
        }

        if region == Region::Outside {
            outside.push(pt);
        }
        if kept_count[pt] % 2 == 1 {
            region = region.flip();
        }
    }

    // Surviving hits are reported grouped by side index, not walk order.
    let mut kept = Vec::with_capacity(6);
    for side in 0..3 {
        for k in 0..kept_count[side] {
            kept.push(kept_side[side][k]);
        }
    }

    MinuendWalk { kept, outside }
}

/// Walk the subtrahend CCW and record which of its vertices lie inside the
/// minuend. The start-vertex confidence is deliberately ignored here; the
/// minuend walk has already vetted the hit set.
pub(crate) fn walk_subtr(
    minuend: &Triangle,
    subtr: &Triangle,
    kept: &[usize],
) -> (Vec<usize>, SideHits) {
    let hits = SideHits::group(kept, subtr_side);

    let (init_pt, mut region, _) = choose_start_vertex(subtr, minuend);

    let mut inside = Vec::new();
    for step in 0..3 {
        let pt = (init_pt + step) % 3;

        if region == Region::Inside {
            inside.push(pt);
        }
        if hits.count[pt] % 2 == 1 {
            region = region.flip();
        }
    }

    (inside, hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::subtract::inters::{collect_intersections, minuend_side};
    use crate::geom::types::{Triangle, Vec2};

    fn tri(p: [(f32, f32); 3]) -> Triangle {
        Triangle::new(
            Vec2::new(p[0].0, p[0].1),
            Vec2::new(p[1].0, p[1].1),
            Vec2::new(p[2].0, p[2].1),
        )
    }

    #[test]
    fn start_vertex_prefers_the_clear_side() {
        let big = tri([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        let small = tri([(1.0, 1.0), (2.0, 1.0), (1.0, 2.0)]);

        // All vertices of `small` are inside `big`.
        let (_, region, confident) = choose_start_vertex(&small, &big);
        assert_eq!(region, Region::Inside);
        assert!(confident);

        // `big` has vertices far outside `small`.
        let (_, region, confident) = choose_start_vertex(&big, &small);
        assert_eq!(region, Region::Outside);
        assert!(confident);
    }

    #[test]
    fn identical_triangles_are_not_confident() {
        let t = tri([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let (_, _, confident) = choose_start_vertex(&t, &t);
        assert!(!confident);
    }

    #[test]
    fn corner_bite_keeps_four_hits_all_vertices_outside() {
        // The subtrahend cuts a channel through the base and the hypotenuse
        // near (4, 0); every minuend vertex stays outside it.
        let m = tri([(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        let s = tri([(3.0, -1.0), (5.0, 3.0), (2.0, 3.0)]);

        let (fac, raw) = collect_intersections(&m, &s);
        let walk = walk_minuend(&m, &s, &fac, &raw);
        assert_eq!(walk.kept.len(), 4);
        assert_eq!(walk.outside.len(), 3);
        // Two hits on the base, two on the hypotenuse, none on the left edge.
        assert!(walk.kept.iter().all(|&i| minuend_side(i) < 2));

        let (inside, s_hits) = walk_subtr(&m, &s, &walk.kept);
        assert!(inside.is_empty());
        // The middle subtrahend side never touches the minuend.
        assert_eq!(s_hits.count, [2, 0, 2]);
    }

    #[test]
    fn contained_subtrahend_reports_all_vertices_inside() {
        let m = tri([(0.0, 0.0), (6.0, 0.0), (0.0, 6.0)]);
        let s = tri([(1.0, 1.0), (2.0, 1.0), (1.0, 2.0)]);

        let (fac, raw) = collect_intersections(&m, &s);
        let walk = walk_minuend(&m, &s, &fac, &raw);
        assert!(walk.kept.is_empty());
        assert_eq!(walk.outside.len(), 3);

        let (inside, _) = walk_subtr(&m, &s, &walk.kept);
        assert_eq!(inside.len(), 3);
    }
}
