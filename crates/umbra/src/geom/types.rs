//! Core 2D types and tolerance-based predicates.
//!
//! - `Triangle`/`Quad`/`BBox`: small `Copy` geometry carriers, CCW canonical.
//! - Scalar predicates (`f32_eq`, `pt_left_of`, proximity, signed heights)
//!   that every higher layer builds on. All are pure and total.
//!
//! The named epsilons below are a cross-implementation contract: coverage
//! results must be reproducible bit-for-bit against other renderers, so they
//! are fixed constants rather than configuration.

use std::fmt;

use nalgebra::{Matrix2, Vector2};

pub type Vec2 = Vector2<f32>;
pub type Mat2 = Matrix2<f32>;

/// Default slack for scalar float comparison.
pub const EPS_F32: f32 = 1e-4;
/// Two segment directions count as parallel when the 2x2 determinant falls
/// below this factor times `|d1|*|d2|`.
pub const EPS_PARALLEL: f32 = 1e-3;
/// Slack on segment parameters: hits within `[-EPS_PARAM, 1 + EPS_PARAM]`
/// still count as touching the segment.
pub const EPS_PARAM: f32 = 1e-4;
/// Classification band for sampled proximities: above `+EPS_PROX` is strictly
/// outside, below `-EPS_PROX` strictly inside, in between keeps the previous
/// state.
pub const EPS_PROX: f32 = 1e-7;
/// A start vertex whose distance to the reference triangle stays under this
/// bound cannot be classified with confidence.
pub const EPS_START: f32 = 1e-6;
/// Triangles below this area are degenerate and get dropped.
pub const EPS_AREA: f32 = 1e-7;
/// Triangles whose smallest height-to-base ratio falls under this bound are
/// slivers and get dropped. Heuristic; may also swallow legitimate long-thin
/// remainders along silhouette edges.
pub const MIN_HEIGHT_RATIO: f32 = 1e-2;
/// Default residual-area cutoff for coverage testing.
pub const MIN_REM_AREA: f32 = 1e-3;

#[inline]
pub fn f32_eq(a: f32, b: f32) -> bool {
    f32_eq_eps(a, b, EPS_F32)
}

#[inline]
pub fn f32_eq_eps(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

/// Three-way compare under `EPS_F32`: 0 when equal within tolerance, else the
/// sign of `a - b`.
#[inline]
pub fn f32_cmp(a: f32, b: f32) -> i32 {
    if f32_eq(a, b) {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}

/// Clockwise perpendicular `(y, -x)`. For a CCW edge `next - curr` this is
/// the inward normal of the polygon.
#[inline]
pub fn orth(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Orientation of `pt` relative to the directed line `p -> q`, as the sign of
/// the cross product `(q - pt) x (p - pt)`: `+1` left (CCW), `-1` right, `0`
/// collinear within tolerance. Every orientation decision in the crate goes
/// through this single predicate.
#[inline]
pub fn pt_left_of(pt: Vec2, p: Vec2, q: Vec2) -> i32 {
    let a = (q.x - pt.x) * (p.y - pt.y);
    let b = (p.x - pt.x) * (q.y - pt.y);
    f32_cmp(a - b, 0.0)
}

/// Lexicographic `(x, y)` compare under `EPS_F32`.
#[inline]
pub fn pt_cmp(a: Vec2, b: Vec2) -> i32 {
    let c = f32_cmp(a.x, b.x);
    if c == 0 {
        f32_cmp(a.y, b.y)
    } else {
        c
    }
}

/// Signed height of the tip of `side` over the line spanned by `ground`,
/// i.e. `(side . orth(ground)) / |ground|`. Returns 0 for a near-zero ground
/// segment.
pub fn signed_tri_height(side: Vec2, ground: Vec2) -> f32 {
    let dot = side.dot(&orth(ground));
    let ground_len = ground.norm();

    if f32_eq(ground_len, 0.0) {
        0.0
    } else {
        dot / ground_len
    }
}

/// Is a proximity value (see [`Triangle::proximity_to`]) inside, with the
/// default slack?
#[inline]
pub fn prox_is_inside(proximity: f32) -> bool {
    prox_is_inside_eps(proximity, EPS_F32)
}

#[inline]
pub fn prox_is_inside_eps(proximity: f32, eps: f32) -> bool {
    proximity < eps
}

/// A triangle; the canonical orientation is counter-clockwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub pts: [Vec2; 3],
}

impl Triangle {
    #[inline]
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2) -> Self {
        Self { pts: [p0, p1, p2] }
    }

    /// Unsigned area, `0.5 * |det(p1 - p0, p2 - p0)|`.
    pub fn area(&self) -> f32 {
        let m = Mat2::from_columns(&[self.pts[1] - self.pts[0], self.pts[2] - self.pts[0]]);
        0.5 * m.determinant().abs()
    }

    /// CCW winding test; degenerate (zero cross) counts as CCW.
    pub fn is_ccw(&self) -> bool {
        let u = self.pts[1] - self.pts[0];
        let v = self.pts[2] - self.pts[0];
        u.x * v.y - u.y * v.x >= 0.0
    }

    /// Minimum over the three sides of height / base length; the sliver
    /// metric behind `MIN_HEIGHT_RATIO`.
    pub fn min_height_ratio(&self) -> f32 {
        let mut min_ratio = f32::INFINITY;

        for i in 0..3 {
            let ground = self.pts[(i + 1) % 3] - self.pts[i];
            let ground_len = ground.norm();
            let height = signed_tri_height(self.pts[(i + 2) % 3] - self.pts[i], ground).abs();
            min_ratio = min_ratio.min(height / ground_len);
        }

        min_ratio
    }

    /// Maximum over the three CCW sides of the signed perpendicular distance
    /// of `pt` from that side (positive = outside on that side).
    ///
    /// `pt` is inside (inclusive) iff the result is <= 0, and the result then
    /// equals the negated distance to the nearest side. One loop serves both
    /// the inside and the outside case.
    pub fn proximity_to(&self, pt: Vec2) -> f32 {
        let mut max = f32::NEG_INFINITY;

        for i in 0..3 {
            let height = signed_tri_height(pt - self.pts[i], self.pts[(i + 1) % 3] - self.pts[i]);
            max = max.max(height);
        }

        max
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}}}",
            DisplayPt(self.pts[0]),
            DisplayPt(self.pts[1]),
            DisplayPt(self.pts[2])
        )
    }
}

/// Point formatter for diagnostics; keeps enough digits to replay a failure.
pub(crate) struct DisplayPt(pub Vec2);

impl fmt::Display for DisplayPt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:.9}, {:.9}}}", self.0.x, self.0.y)
    }
}

/// A quadrilateral with points in CCW order.
#[derive(Clone, Copy, Debug)]
pub struct Quad {
    pub pts: [Vec2; 4],
}

/// Split a CCW quad into two CCW triangles, cutting along the diagonal whose
/// interior stays inside the quad (decided by testing the opposite vertex).
pub fn push_quad_triangles(out: &mut Vec<Triangle>, q: Quad) {
    let probe = Triangle::new(q.pts[0], q.pts[1], q.pts[3]);
    if prox_is_inside(probe.proximity_to(q.pts[2])) {
        out.push(Triangle::new(q.pts[0], q.pts[1], q.pts[2]));
        out.push(Triangle::new(q.pts[0], q.pts[2], q.pts[3]));
    } else {
        out.push(Triangle::new(q.pts[0], q.pts[1], q.pts[3]));
        out.push(Triangle::new(q.pts[1], q.pts[2], q.pts[3]));
    }
}

/// An internal line segment between two construction points.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Line {
    pub pts: [Vec2; 2],
}

/// Axis-aligned bounding box with `tl.x <= br.x` and `tl.y <= br.y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub tl: Vec2,
    pub br: Vec2,
}

impl BBox {
    #[inline]
    pub fn new(tl: Vec2, br: Vec2) -> Self {
        Self { tl, br }
    }

    /// Tight box around a non-empty point set.
    pub fn around(pts: &[Vec2]) -> Self {
        let mut bbox = Self {
            tl: Vec2::new(f32::INFINITY, f32::INFINITY),
            br: Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        };
        for p in pts {
            bbox.tl = Vec2::new(bbox.tl.x.min(p.x), bbox.tl.y.min(p.y));
            bbox.br = Vec2::new(bbox.br.x.max(p.x), bbox.br.y.max(p.y));
        }
        bbox
    }

    #[inline]
    pub fn middle(&self) -> Vec2 {
        0.5 * (self.tl + self.br)
    }

    /// Inclusive overlap: boxes that merely share an edge intersect.
    #[inline]
    pub fn intersects(&self, other: &BBox) -> bool {
        !(other.tl.x > self.br.x
            || other.br.x < self.tl.x
            || other.tl.y > self.br.y
            || other.br.y < self.tl.y)
    }
}
