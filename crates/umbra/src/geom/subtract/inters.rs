//! Side-pair intersections between the minuend and the subtrahend.
//!
//! Each of the nine (minuend side, subtrahend side) pairs is encoded as the
//! index `3 * m + s`. `fac[3 * m + s]` holds the parameter along minuend side
//! `m` where it meets subtrahend side `s`, or NaN when the pair misses. Two
//! cleanup passes run before the result is handed to the walks: a dedup of
//! vertex-coincident subtrahend hits, and a mirror repair that re-creates a
//! corner hit on the neighbouring minuend side when the solver dropped it.
//! Both exist to keep the later parity counting stable under float error at
//! vertex contacts.

use nalgebra::Matrix2;

use crate::geom::types::{f32_eq, f32_eq_eps, Triangle, Vec2, EPS_PARALLEL, EPS_PARAM};

/// Number of side pairs.
pub(crate) const FAC_COUNT: usize = 9;

#[inline]
pub(crate) fn minuend_side(i: usize) -> usize {
    i / 3
}

#[inline]
pub(crate) fn subtr_side(i: usize) -> usize {
    i % 3
}

/// Parameters `(t1, t2)` where `p1 + t1*d1 == p2 + t2*d2`, or NaN when the
/// directions are parallel within tolerance or the hit lies outside the
/// `[-EPS_PARAM, 1 + EPS_PARAM]` window on either segment.
fn intersection_params(p1: Vec2, d1: Vec2, p2: Vec2, d2: Vec2) -> [f32; 2] {
    let m = Matrix2::from_columns(&[d1, -d2]);

    // Scale the parallelism threshold with the side lengths so very large
    // and very small silhouettes behave the same.
    let len_mul = d1.norm() * d2.norm();
    if f32_eq_eps(m.determinant(), 0.0, len_mul * EPS_PARALLEL) {
        return [f32::NAN; 2];
    }
    let inv = match m.try_inverse() {
        Some(inv) => inv,
        None => return [f32::NAN; 2],
    };

    let fac = inv * (p2 - p1);
    if fac.x < -EPS_PARAM
        || fac.x > 1.0 + EPS_PARAM
        || fac.y < -EPS_PARAM
        || fac.y > 1.0 + EPS_PARAM
    {
        [f32::NAN; 2]
    } else {
        [fac.x, fac.y]
    }
}

/// Solve all nine side pairs and apply both cleanup passes.
///
/// Returns the per-pair minuend parameters (NaN = no hit) and the list of
/// pair indices that hold a hit, in index order.
pub(crate) fn collect_intersections(minuend: &Triangle, subtr: &Triangle) -> ([f32; FAC_COUNT], Vec<usize>) {
    let mut m_sides = [Vec2::zeros(); 3];
    let mut s_sides = [Vec2::zeros(); 3];
    for i in 0..3 {
        m_sides[i] = minuend.pts[(i + 1) % 3] - minuend.pts[i];
        s_sides[i] = subtr.pts[(i + 1) % 3] - subtr.pts[i];
    }

    // full[i] = (parameter on the minuend side, parameter on the subtrahend side).
    let mut full = [[f32::NAN; 2]; FAC_COUNT];
    for (i, slot) in full.iter_mut().enumerate() {
        let m = minuend_side(i);
        let s = subtr_side(i);
        *slot = intersection_params(minuend.pts[m], m_sides[m], subtr.pts[s], s_sides[s]);
    }

    // A subtrahend vertex shared by sides s and s+1 can hit the same minuend
    // side twice, once at parameter ~1 and once at ~0. Only the ~0 twin of an
    // existing ~1 hit may be dropped; minuend-side duplicates must stay.
    for i in 0..FAC_COUNT {
        let n = 3 * minuend_side(i) + (subtr_side(i) + 1) % 3;

        if f32_eq(full[i][1], 1.0) && f32_eq(full[n][1], 0.0) {
            full[n][0] = f32::NAN;
        }
    }

    // If a hit sits on a minuend corner but the neighbouring minuend side has
    // no matching hit at that corner, mirror it over so both sides agree on
    // the shared vertex.
    for i in 0..FAC_COUNT {
        let other_m;
        let fac;

        if f32_eq(full[i][0], 0.0) {
            other_m = (minuend_side(i) + 2) % 3;
            fac = 1.0;
        } else if f32_eq(full[i][0], 1.0) {
            other_m = (minuend_side(i) + 1) % 3;
            fac = 0.0;
        } else {
            continue;
        }

        let mut missing = true;
        for s in 0..3 {
            if f32_eq(full[3 * other_m + s][0], fac) {
                missing = false;
                break;
            }
        }

        if missing {
            let other = 3 * other_m + subtr_side(i);
            full[other][0] = fac;
            full[other][1] = full[i][1];
        }
    }

    let mut fac = [f32::NAN; FAC_COUNT];
    let mut idx = Vec::with_capacity(FAC_COUNT);
    for i in 0..FAC_COUNT {
        fac[i] = full[i][0];
        if !fac[i].is_nan() {
            idx.push(i);
        }
    }

    (fac, idx)
}

/// Point on minuend side `minuend_side(i)` at parameter `fac[i]`.
#[inline]
pub(crate) fn inters_point(pts: &[Vec2; 3], fac: &[f32; FAC_COUNT], i: usize) -> Vec2 {
    let side = minuend_side(i);
    pts[side] + fac[i] * (pts[(side + 1) % 3] - pts[side])
}
