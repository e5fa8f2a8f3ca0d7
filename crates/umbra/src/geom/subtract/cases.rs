//! Emission of the difference triangulation, dispatched on the overlap
//! topology.
//!
//! After the walks, the overlap between minuend and subtrahend is summarized
//! by the triple `(M, S, I)`: minuend vertices outside the subtrahend,
//! subtrahend vertices inside the minuend, and surviving intersections. Each
//! realizable triple has its own emission built from a handful of alignment
//! helpers; everything else is a diagnosed miss that emits the minuend
//! unchanged so downstream coverage tests fail loudly instead of silently
//! over-culling.

use log::warn;

use crate::geom::types::{push_quad_triangles, Line, Quad, Triangle, Vec2, EPS_F32};

use super::inters::{inters_point, minuend_side, subtr_side, FAC_COUNT};
use super::walk::SideHits;

/// Append a triangulated covering of `minuend \ subtr` given the walk
/// results. `kept` holds the surviving intersections grouped by minuend
/// side, `m_outside`/`s_inside` the classified vertices in walk order, and
/// `s_hits` groups `kept` by subtrahend side.
#[allow(clippy::too_many_arguments)]
pub(crate) fn emit_difference(
    minuend: &Triangle,
    subtr: &Triangle,
    fac: &[f32; FAC_COUNT],
    kept: &[usize],
    m_outside: &[usize],
    s_inside: &[usize],
    s_hits: &SideHits,
    out: &mut Vec<Triangle>,
) {
    let m = m_outside.len();
    let s = s_inside.len();
    let i = kept.len();

    if i % 2 == 1 {
        // An odd hit count means the walks lost track of the boundary; emit
        // nothing so the caller's coverage test concludes "not covered".
        warn!("odd intersection count {i} for minuend {minuend}, subtrahend {subtr}");
        return;
    }

    if m == 0 {
        // Minuend entirely inside the subtrahend.
        return;
    }

    if s == 3 {
        // Subtrahend entirely inside the minuend: ring of three quads
        // between corresponding sides, corners matched by distance.
        let aligned = align_corners(minuend, subtr);

        for k in 0..3 {
            push_quad_triangles(
                out,
                Quad {
                    pts: [
                        minuend.pts[k],
                        minuend.pts[(k + 1) % 3],
                        aligned.pts[(k + 1) % 3],
                        aligned.pts[k],
                    ],
                },
            );
        }
        return;
    }

    if i == 0 {
        // No boundary contact and the minuend is not inside: disjoint.
        out.push(*minuend);
        return;
    }

    match (m, s, i) {
        (3, 0, 4) => {
            // Subtrahend bites through two sides: near corner piece plus the
            // far quad across the channel.
            let ordered = near_far_indices(fac, kept);
            let mut near = inters_line(&minuend.pts, fac, ordered[0], ordered[1]);
            let mut far = inters_line(&minuend.pts, fac, ordered[2], ordered[3]);

            let mut winded =
                align_common_vertex(minuend, minuend_side(ordered[0]), minuend_side(ordered[1]));
            make_ccw(&mut winded, &mut [&mut near, &mut far]);

            out.push(Triangle::new(winded.pts[0], near.pts[0], near.pts[1]));
            push_quad_triangles(
                out,
                Quad {
                    pts: [winded.pts[1], winded.pts[2], far.pts[1], far.pts[0]],
                },
            );
        }
        (3, 0, 6) => {
            // Subtrahend sits inside the boundary cutting all three sides:
            // one corner triangle per subtrahend side.
            for side in 0..3 {
                let pair = s_hits.per_side[side];
                let common = common_vertex_of_sides(minuend_side(pair[0]), minuend_side(pair[1]));
                let line = inters_line(&minuend.pts, fac, pair[0], pair[1]);

                let mut tri = Triangle::new(minuend.pts[common], line.pts[0], line.pts[1]);
                make_ccw(&mut tri, &mut []);
                out.push(tri);
            }
        }
        (3, 1, 2) => {
            // Subtrahend protrudes through one side: two quads meeting at
            // the inside vertex.
            let mut winded =
                align_split_side(minuend, minuend_side(kept[0]), fac[kept[0]], fac[kept[1]]);
            let mut inters = inters_line(&minuend.pts, fac, kept[0], kept[1]);
            make_ccw(&mut winded, &mut [&mut inters]);

            let inside_pt = subtr.pts[s_inside[0]];

            push_quad_triangles(
                out,
                Quad {
                    pts: [winded.pts[0], winded.pts[1], inters.pts[0], inside_pt],
                },
            );
            push_quad_triangles(
                out,
                Quad {
                    pts: [winded.pts[0], inside_pt, inters.pts[1], winded.pts[2]],
                },
            );
        }
        (3, 1, 4) => {
            // One subtrahend vertex dips inside while the body bites through
            // two sides: near corner piece plus a three-piece fan around the
            // inside vertex.
            let ordered = near_far_indices(fac, kept);
            let mut near = inters_line(&minuend.pts, fac, ordered[0], ordered[1]);
            let mut far = inters_line(&minuend.pts, fac, ordered[2], ordered[3]);

            let mut winded =
                align_common_vertex(minuend, minuend_side(ordered[0]), minuend_side(ordered[1]));
            let inside_pt = subtr.pts[s_inside[0]];
            make_ccw(&mut winded, &mut [&mut near, &mut far]);

            out.push(Triangle::new(winded.pts[0], near.pts[0], near.pts[1]));
            out.push(Triangle::new(inside_pt, far.pts[0], winded.pts[1]));
            out.push(Triangle::new(inside_pt, winded.pts[1], winded.pts[2]));
            out.push(Triangle::new(winded.pts[2], far.pts[1], inside_pt));
        }
        (3, 2, 2) => {
            // Two subtrahend vertices inside, entering and leaving through
            // the same minuend side.
            let mut winded =
                align_split_side(minuend, minuend_side(kept[0]), fac[kept[0]], fac[kept[1]]);
            let s_winded = align_common_vertex(subtr, subtr_side(kept[0]), subtr_side(kept[1]));
            let mut inters = inters_line(&minuend.pts, fac, kept[0], kept[1]);
            let mut s_insides = Line {
                pts: [s_winded.pts[1], s_winded.pts[2]],
            };
            make_ccw(&mut winded, &mut [&mut inters, &mut s_insides]);

            push_quad_triangles(
                out,
                Quad {
                    pts: [winded.pts[0], winded.pts[1], inters.pts[0], s_insides.pts[0]],
                },
            );
            push_quad_triangles(
                out,
                Quad {
                    pts: [winded.pts[0], s_insides.pts[1], inters.pts[1], winded.pts[2]],
                },
            );
            out.push(Triangle::new(
                winded.pts[0],
                s_insides.pts[0],
                s_insides.pts[1],
            ));
        }
        (2, 0, 2) => {
            // Subtrahend clips one minuend corner: the rest is a quad.
            let mut winded =
                align_common_vertex(minuend, minuend_side(kept[0]), minuend_side(kept[1]));
            let mut inters = inters_line(&minuend.pts, fac, kept[0], kept[1]);
            make_ccw(&mut winded, &mut [&mut inters]);

            push_quad_triangles(
                out,
                Quad {
                    pts: [winded.pts[1], winded.pts[2], inters.pts[1], inters.pts[0]],
                },
            );
        }
        (2, 0, 4) => {
            // Two corners clipped; one corner triangle per subtrahend side.
            let mut sides = [0usize; 2];
            let mut side_count = 0;
            for k in 0..3 {
                if s_hits.count[k] != 0 && side_count < 2 {
                    sides[side_count] = k;
                    side_count += 1;
                }
            }
            debug_assert_eq!(side_count, 2);

            let pair0 = s_hits.per_side[sides[0]];
            let pair1 = s_hits.per_side[sides[1]];
            let common0 = common_vertex_of_sides(minuend_side(pair0[0]), minuend_side(pair0[1]));
            let common1 = common_vertex_of_sides(minuend_side(pair1[0]), minuend_side(pair1[1]));

            let line0 = inters_line(&minuend.pts, fac, pair0[0], pair0[1]);
            let line1 = inters_line(&minuend.pts, fac, pair1[0], pair1[1]);

            let mut cutoff0 = Triangle::new(minuend.pts[common0], line0.pts[0], line0.pts[1]);
            make_ccw(&mut cutoff0, &mut []);

            let mut cutoff1 = Triangle::new(minuend.pts[common1], line1.pts[1], line1.pts[0]);
            make_ccw(&mut cutoff1, &mut []);

            out.push(cutoff0);
            out.push(cutoff1);
        }
        (2, 1, 2) => {
            // One corner clipped with a subtrahend vertex inside: fan of
            // three triangles around that vertex.
            let mut winded =
                align_common_vertex(minuend, minuend_side(kept[0]), minuend_side(kept[1]));
            let mut inters = inters_line(&minuend.pts, fac, kept[0], kept[1]);
            make_ccw(&mut winded, &mut [&mut inters]);

            let inside_pt = subtr.pts[s_inside[0]];

            out.push(Triangle::new(winded.pts[1], inside_pt, inters.pts[0]));
            out.push(Triangle::new(winded.pts[2], inters.pts[1], inside_pt));
            out.push(Triangle::new(winded.pts[2], inside_pt, winded.pts[1]));
        }
        (2, 1, 4) => {
            // Asymmetric clip: one subtrahend side carries both hits of a
            // corner cut, the other two carry one hit each around the
            // inside vertex.
            let mut two_hit_side = usize::MAX;
            let mut single_sides = [0usize; 2];
            let mut single_count = 0;
            for k in 0..3 {
                if s_hits.count[k] == 2 {
                    two_hit_side = k;
                } else if single_count < 2 {
                    debug_assert_eq!(s_hits.count[k], 1);
                    single_sides[single_count] = k;
                    single_count += 1;
                }
            }
            debug_assert!(two_hit_side != usize::MAX && single_count == 2);

            let two_pair = s_hits.per_side[two_hit_side];
            let common0 = common_vertex_of_sides(minuend_side(two_pair[0]), minuend_side(two_pair[1]));
            let common1 = common_vertex_of_sides(
                minuend_side(s_hits.per_side[single_sides[0]][0]),
                minuend_side(s_hits.per_side[single_sides[1]][0]),
            );

            let inside_pt = subtr.pts[s_inside[0]];

            let two_line = inters_line(&minuend.pts, fac, two_pair[0], two_pair[1]);
            let mut single_line = Line {
                pts: [
                    inters_point(&minuend.pts, fac, s_hits.per_side[single_sides[1]][0]),
                    inters_point(&minuend.pts, fac, s_hits.per_side[single_sides[0]][0]),
                ],
            };

            let mut cutoff = Triangle::new(minuend.pts[common0], two_line.pts[0], two_line.pts[1]);
            make_ccw(&mut cutoff, &mut [&mut single_line]);

            out.push(cutoff);
            push_quad_triangles(
                out,
                Quad {
                    pts: [
                        minuend.pts[common1],
                        single_line.pts[0],
                        inside_pt,
                        single_line.pts[1],
                    ],
                },
            );
        }
        (2, 2, 2) => {
            // Edge contact with two subtrahend vertices inside.
            let mut winded =
                align_common_vertex(minuend, minuend_side(kept[0]), minuend_side(kept[1]));
            let s_winded = align_common_vertex(subtr, subtr_side(kept[0]), subtr_side(kept[1]));
            let mut inters = inters_line(&minuend.pts, fac, kept[0], kept[1]);
            let mut s_insides = Line {
                pts: [s_winded.pts[1], s_winded.pts[2]],
            };
            make_ccw(&mut winded, &mut [&mut inters, &mut s_insides]);

            out.push(Triangle::new(winded.pts[1], s_insides.pts[0], inters.pts[0]));
            out.push(Triangle::new(winded.pts[2], inters.pts[1], s_insides.pts[1]));
            push_quad_triangles(
                out,
                Quad {
                    pts: [
                        winded.pts[1],
                        winded.pts[2],
                        s_insides.pts[1],
                        s_insides.pts[0],
                    ],
                },
            );
        }
        (1, 0, 2) => {
            // Everything but one corner swallowed.
            let inters = inters_line(&minuend.pts, fac, kept[0], kept[1]);

            let mut cutoff = Triangle::new(minuend.pts[m_outside[0]], inters.pts[0], inters.pts[1]);
            make_ccw(&mut cutoff, &mut []);

            out.push(cutoff);
        }
        (1, 1, 2) => {
            // One vertex of each inside the other: a single quad remains.
            let mut winded =
                align_common_vertex(minuend, minuend_side(kept[0]), minuend_side(kept[1]));
            let mut inters = inters_line(&minuend.pts, fac, kept[0], kept[1]);
            make_ccw(&mut winded, &mut [&mut inters]);

            let inside_pt = subtr.pts[s_inside[0]];

            push_quad_triangles(
                out,
                Quad {
                    pts: [winded.pts[0], inters.pts[0], inside_pt, inters.pts[1]],
                },
            );
        }
        (1, 2, 2) => {
            // Two subtrahend vertices inside, covering two minuend corners
            // through one outside vertex. One of the inside vertices
            // coincides with an intersection point; the quad pivots on the
            // other one.
            let inters = inters_line(&minuend.pts, fac, kept[0], kept[1]);

            let mut pivot = None;
            'search: for inters_pt in inters.pts {
                for j in 0..2 {
                    if (subtr.pts[s_inside[j]] - inters_pt).norm_squared() < EPS_F32 {
                        pivot = Some(subtr.pts[s_inside[1 - j]]);
                        break 'search;
                    }
                }
            }
            let pivot = pivot.unwrap_or(subtr.pts[s_inside[0]]);

            let mut cutoff = Triangle::new(minuend.pts[m_outside[0]], inters.pts[0], inters.pts[1]);
            make_ccw(&mut cutoff, &mut []);

            push_quad_triangles(
                out,
                Quad {
                    pts: [cutoff.pts[0], cutoff.pts[1], pivot, cutoff.pts[2]],
                },
            );
        }
        _ => {
            // Unrealizable triple: diagnose and hand back the whole minuend
            // so the miss shows up as under-culling, never as a hole.
            warn!(
                "unhandled overlap case ({m} outside, {s} inside, {i} hits) \
                 for minuend {minuend}, subtrahend {subtr}"
            );
            out.push(*minuend);
        }
    }
}

/// Rotate `b` so that its first point is the one closest to `a.pts[0]`.
fn align_corners(a: &Triangle, b: &Triangle) -> Triangle {
    let mut min_dist = f32::INFINITY;
    let mut off = 0;

    for k in 0..3 {
        let dist = (a.pts[0] - b.pts[k]).norm_squared();
        if dist < min_dist {
            min_dist = dist;
            off = k;
        }
    }

    Triangle::new(b.pts[off], b.pts[(off + 1) % 3], b.pts[(off + 2) % 3])
}

/// Index of the vertex shared by two sides (side k runs from vertex k to
/// vertex k+1).
fn common_vertex_of_sides(side0: usize, side1: usize) -> usize {
    const TABLE: [[usize; 3]; 3] = [[0, 1, 0], [1, 1, 2], [0, 2, 2]];
    TABLE[side0][side1]
}

/// Reorder `tri` as (shared vertex, other end of side0, other end of side1).
fn align_common_vertex(tri: &Triangle, side0: usize, side1: usize) -> Triangle {
    let common = common_vertex_of_sides(side0, side1);
    let other0 = if side0 == common { (side0 + 1) % 3 } else { side0 };
    let other1 = if side1 == common { (side1 + 1) % 3 } else { side1 };

    Triangle::new(tri.pts[common], tri.pts[other0], tri.pts[other1])
}

/// Reorder `tri` as (vertex opposite `side`, near end, far end), where near
/// and far follow the order of the two hit parameters on `side`.
fn align_split_side(tri: &Triangle, side: usize, fac0: f32, fac1: f32) -> Triangle {
    let (i0, i1) = if fac0 <= fac1 {
        (side, (side + 1) % 3)
    } else {
        ((side + 1) % 3, side)
    };

    let other = 3 - i0 - i1;
    Triangle::new(tri.pts[other], tri.pts[i0], tri.pts[i1])
}

/// Order four surviving hits as (near pair, far pair) relative to the corner
/// the two cut sides share.
fn near_far_indices(fac: &[f32; FAC_COUNT], kept: &[usize]) -> [usize; 4] {
    let side0 = minuend_side(kept[0]);
    let common = common_vertex_of_sides(side0, minuend_side(kept[2]));

    // Swap near and far when the first side's hits run away from the corner.
    let off = if (side0 != common) != (fac[kept[0]] > fac[kept[1]]) {
        2
    } else {
        0
    };

    let mut ordered = [0usize; 4];
    ordered[off % 4] = kept[0];
    ordered[(1 + off) % 4] = kept[2];
    ordered[(2 + off) % 4] = kept[1];
    ordered[(3 + off) % 4] = kept[3];
    ordered
}

/// The segment between two hit points.
fn inters_line(pts: &[Vec2; 3], fac: &[f32; FAC_COUNT], i0: usize, i1: usize) -> Line {
    Line {
        pts: [inters_point(pts, fac, i0), inters_point(pts, fac, i1)],
    }
}

/// Flip `tri` to CCW if needed, reversing the dependent lines in lockstep so
/// their endpoint order keeps matching the triangle's.
fn make_ccw(tri: &mut Triangle, lines: &mut [&mut Line]) {
    if !tri.is_ccw() {
        tri.pts.swap(1, 2);

        for line in lines.iter_mut() {
            line.pts.swap(0, 1);
        }
    }
}
