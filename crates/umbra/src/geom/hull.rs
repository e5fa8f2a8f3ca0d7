//! In-place convex hull (Graham scan).
//!
//! Purpose
//! - Turn a raw projected point set into its CCW hull without a second
//!   buffer: the hull ends up as a prefix of the input vector and the rest is
//!   truncated away. Silhouette construction runs per frame, so the hull
//!   builder stays allocation-free.
//!
//! Input contract
//! - No duplicate points. Fewer than three points pass through unchanged
//!   (the scan loop never runs); callers that need a true hull feed at least
//!   three distinct points.

use super::types::{pt_cmp, pt_left_of, Vec2};

/// Replace `pts` with its convex hull in CCW order.
pub fn convex_hull_inplace(pts: &mut Vec<Vec2>) {
    if pts.is_empty() {
        return;
    }

    // The lexicographically smallest point is guaranteed on the hull and
    // becomes the first element of the output.
    let mut min_idx = 0;
    for i in 1..pts.len() {
        if pt_cmp(pts[i], pts[min_idx]) <= 0 {
            min_idx = i;
        }
    }

    let p0 = pts[min_idx];
    sort_and_filter(p0, pts);
    graham_scan(pts);
}

/// Sort CCW around `p0` and drop interior collinear runs.
///
/// Points collinear with respect to `p0` are ordered by squared distance so
/// that only the farthest of each run can survive into the hull. `p0` itself
/// compares smallest and stays first.
fn sort_and_filter(p0: Vec2, pts: &mut Vec<Vec2>) {
    pts.sort_by(|p, q| {
        let mut c = pt_left_of(p0, *p, *q);

        if c == 0 {
            // No duplicates and p0 is the lexicographic minimum, so two
            // collinear points always differ in distance.
            let p0_to_p = (*p - p0).norm_squared();
            let p0_to_q = (*q - p0).norm_squared();
            c = super::types::f32_cmp(p0_to_p, p0_to_q);
        }

        c.cmp(&0)
    });

    // Filter collinear points with respect to p0, in place. Start at index 1
    // to skip over p0, which is the first element after the sort.
    let n = pts.len();
    let mut j = 1;
    for i in 1..n.saturating_sub(1) {
        let curr = pts[i];
        let next = pts[i + 1];

        // Close the gap left by removed collinear predecessors.
        pts[j] = curr;

        if pt_left_of(p0, curr, next) != 0 {
            j += 1;
        }
    }

    // The loop may have left a gap before the last point; close it too.
    if n > 1 {
        pts[j] = pts[n - 1];
    }

    pts.truncate(j + 1);
}

/// Graham scan over the sorted prefix, in place.
///
/// The stack lives in the front of the vector with its top at `stack_top`;
/// `stack_top < i` holds throughout, so stack and candidates never overlap.
fn graham_scan(pts: &mut Vec<Vec2>) {
    let mut stack_top = 2;
    for i in 3..pts.len() {
        let candidate = pts[i];

        // Pop while the top makes a non-left turn towards the candidate.
        // `>= 0` also pops exact collinearity: ties were ordered by distance
        // above, so the farther point wins.
        while stack_top >= 2 && pt_left_of(candidate, pts[stack_top - 1], pts[stack_top]) >= 0 {
            stack_top -= 1;
        }

        stack_top += 1;
        pts[stack_top] = candidate;
    }

    pts.truncate(stack_top + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::types::{pt_left_of, Vec2};

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn square_with_interior_point() {
        let mut pts = vec![
            v(0.0, 0.0),
            v(1.0, 0.0),
            v(1.0, 1.0),
            v(0.0, 1.0),
            v(0.5, 0.5),
        ];
        convex_hull_inplace(&mut pts);
        assert_eq!(pts, vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)]);
    }

    #[test]
    fn collinear_edge_points_are_dropped() {
        let mut pts = vec![
            v(0.0, 0.0),
            v(2.0, 0.0),
            v(1.0, 0.0), // on the bottom edge
            v(2.0, 2.0),
            v(0.0, 2.0),
            v(1.0, 1.0), // interior diagonal
        ];
        convex_hull_inplace(&mut pts);
        assert_eq!(pts.len(), 4);
        for k in 0..pts.len() {
            let a = pts[k];
            let b = pts[(k + 1) % pts.len()];
            let c = pts[(k + 2) % pts.len()];
            assert_eq!(pt_left_of(a, c, b), 1, "hull must turn left at every vertex");
        }
    }

    #[test]
    fn tiny_inputs_pass_through() {
        let mut empty: Vec<Vec2> = vec![];
        convex_hull_inplace(&mut empty);
        assert!(empty.is_empty());

        let mut one = vec![v(3.0, 4.0)];
        convex_hull_inplace(&mut one);
        assert_eq!(one, vec![v(3.0, 4.0)]);

        let mut two = vec![v(1.0, 0.0), v(0.0, 0.0)];
        convex_hull_inplace(&mut two);
        assert_eq!(two.len(), 2);
    }

    #[test]
    fn hull_starts_at_lexicographic_minimum() {
        let mut pts = vec![v(2.0, 1.0), v(1.0, 3.0), v(-1.0, 0.5), v(0.0, -2.0)];
        convex_hull_inplace(&mut pts);
        assert_eq!(pts[0], v(-1.0, 0.5));
    }
}
