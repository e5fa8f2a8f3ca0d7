//! 2D geometry core.
//!
//! Purpose
//! - Everything below the spatial index lives here: tolerance-based float
//!   predicates and small copy types (`types`), the in-place convex hull
//!   (`hull`), triangle-pair subtraction (`subtract`), and the iterated
//!   coverage test (`coverage`). `rand` provides a deterministic silhouette
//!   sampler for tests and benches.
//!
//! Why tolerance-based
//! - Inputs are `f32` projections from a renderer; exact predicates buy
//!   nothing when the coordinates themselves carry projection error. Every
//!   epsilon is a named constant in `types` and part of the crate contract.

pub mod hull;
pub mod rand;
pub mod subtract;
mod coverage;
mod types;

pub use coverage::{tri_in_mesh, tri_in_mesh_with};
pub use hull::convex_hull_inplace;
pub use subtract::subtract_triangles;
pub use types::{
    f32_cmp, f32_eq, f32_eq_eps, orth, prox_is_inside, prox_is_inside_eps, pt_cmp, pt_left_of,
    push_quad_triangles, signed_tri_height, BBox, Mat2, Quad, Triangle, Vec2, EPS_AREA, EPS_F32,
    EPS_PARALLEL, EPS_PARAM, EPS_PROX, EPS_START, MIN_HEIGHT_RATIO, MIN_REM_AREA,
};

#[cfg(test)]
mod tests;
