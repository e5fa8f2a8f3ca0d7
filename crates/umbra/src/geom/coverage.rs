//! Coverage test: is a triangle fully inside a triangle soup?
//!
//! Exact boolean arithmetic on `f32` triangles is brittle, so coverage is
//! decided operationally: keep subtracting the occluder triangles from the
//! residual pieces and watch the total residual area. Covered means the area
//! converges below the cutoff; a pass that fails to shrink the area by at
//! least the cutoff means progress has stalled and the triangle is declared
//! not covered.

use std::collections::VecDeque;

use super::subtract::subtract_triangles;
use super::types::{Triangle, MIN_REM_AREA};

/// `tri_in_mesh_with` with the default residual-area cutoff.
#[inline]
pub fn tri_in_mesh(tri: &Triangle, occluders: &[Triangle]) -> bool {
    tri_in_mesh_with(tri, occluders, MIN_REM_AREA)
}

/// Whether `occluders` jointly cover `tri`, up to `min_rem_area` of residual.
///
/// Occluders are applied in storage order; residual pieces are refined in
/// emission order (FIFO).
pub fn tri_in_mesh_with(tri: &Triangle, occluders: &[Triangle], min_rem_area: f32) -> bool {
    let mut intersecting_area = tri.area();
    let mut intersecting = VecDeque::new();
    intersecting.push_back(*tri);

    while intersecting_area >= min_rem_area {
        let last_intersecting_area = intersecting_area;

        let initial_rem = match intersecting.pop_front() {
            Some(t) => t,
            None => break,
        };
        intersecting_area -= initial_rem.area();

        let mut remainders = vec![initial_rem];
        for occ in occluders {
            let mut next = Vec::new();
            for rem in &remainders {
                subtract_triangles(rem, occ, &mut next);
            }
            remainders = next;
        }

        for rem in remainders {
            intersecting_area += rem.area();
            intersecting.push_back(rem);
        }

        if last_intersecting_area - intersecting_area <= min_rem_area {
            return false;
        }
    }

    true
}
