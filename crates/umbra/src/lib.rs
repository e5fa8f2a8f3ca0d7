//! Incremental 2D occlusion culling for projected silhouettes.
//!
//! A renderer projects each candidate object to a convex silhouette and
//! registers it here. Whenever a silhouette is confirmed as an occluder, the
//! cull context re-evaluates nearby drawn silhouettes and flags the ones that
//! the accumulated occluders now cover completely, so the renderer can skip
//! them. Coverage is decided by iterated triangle subtraction with an
//! area-shrinkage cutoff rather than exact boolean arithmetic; all predicates
//! are tolerance-based `f32`.

pub mod cull;
pub mod geom;
pub mod quadtree;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Convenience re-exports so callers share one set of vector aliases.
pub use geom::{Mat2, Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cull::{CullFlag, CullStats, MeshId, OcclCullContext, OcclMesh};
    pub use crate::geom::{
        convex_hull_inplace, subtract_triangles, tri_in_mesh, tri_in_mesh_with, BBox, Mat2, Quad,
        Triangle, Vec2,
    };
    pub use crate::quadtree::{NodeId, QuadItem, Quadtree};
}
