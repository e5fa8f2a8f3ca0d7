//! Occlusion meshes and the incremental cull context.
//!
//! Purpose
//! - `OcclMesh` is the projected silhouette of one object: its CCW convex
//!   hull, the hull's bbox, and a fan triangulation used by the slow
//!   coverage path.
//! - `OcclCullContext` owns every registered mesh plus two quadtrees over
//!   them (all drawn meshes, confirmed occluders). When the renderer flags a
//!   mesh as an occluder, the context re-evaluates nearby drawn meshes and
//!   marks the ones the occluder set now covers.
//!
//! Ownership
//! - Meshes are owned by the context for its whole lifetime and their
//!   geometry is immutable once inserted; the trees hold `MeshId` handles
//!   into the mesh vector. The vector is reserved up front so the hot path
//!   never reallocates; `add_mesh` checks the reservation.

use std::cmp::Ordering;
use std::collections::VecDeque;

use log::debug;

use crate::geom::{orth, tri_in_mesh, BBox, Triangle, Vec2};
use crate::quadtree::{QuadItem, Quadtree};

/// Projected silhouette of an object.
#[derive(Clone, Debug)]
pub struct OcclMesh {
    pub bbox: BBox,
    pub convex_hull: Vec<Vec2>,
    pub mesh_proj: Vec<Triangle>,
}

impl OcclMesh {
    /// Build from a CCW convex hull with no collinear triples or duplicates
    /// (the output of `convex_hull_inplace` on at least three distinct
    /// points qualifies).
    pub fn new(convex_hull: Vec<Vec2>) -> Self {
        assert!(
            convex_hull.len() >= 3,
            "a silhouette needs at least three hull vertices"
        );

        let bbox = BBox::around(&convex_hull);

        // Fan triangulation from hull[0]; convexity keeps every fan CCW.
        let mut mesh_proj = Vec::with_capacity(convex_hull.len() - 2);
        for i in 2..convex_hull.len() {
            mesh_proj.push(Triangle::new(
                convex_hull[i - 1],
                convex_hull[i],
                convex_hull[0],
            ));
        }

        Self {
            bbox,
            convex_hull,
            mesh_proj,
        }
    }

    /// Position of the bbox relative to an axis line (`Equal` = straddles).
    pub fn compare(&self, value: f32, dim: usize) -> Ordering {
        if self.bbox.br[dim] < value {
            Ordering::Less
        } else if value < self.bbox.tl[dim] {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Whether this mesh lies entirely inside the convex `other`: every hull
    /// vertex must be on the inner side of every edge of `other`. Exact for
    /// convex silhouettes.
    pub fn inside_fast(&self, other: &OcclMesh) -> bool {
        let hull = &other.convex_hull;

        for i in 0..hull.len() {
            let curr = hull[i];
            let next = hull[(i + 1) % hull.len()];
            let normal = orth(next - curr);

            for &v in &self.convex_hull {
                if (v - curr).dot(&normal) > 0.0 {
                    return false;
                }
            }
        }

        true
    }

    #[inline]
    pub fn intersects(&self, other: &OcclMesh) -> bool {
        self.bbox.intersects(&other.bbox)
    }

    #[inline]
    pub fn bbox_intersects(&self, bbox: &BBox) -> bool {
        self.bbox.intersects(bbox)
    }
}

/// Handle of a mesh registered in a cull context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

impl MeshId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl QuadItem for MeshId {
    type Ctx = [OcclMesh];

    fn compare(self, meshes: &[OcclMesh], value: f32, dim: usize) -> Ordering {
        meshes[self.index()].compare(value, dim)
    }

    fn inside_fast(self, meshes: &[OcclMesh], other: MeshId) -> bool {
        meshes[self.index()].inside_fast(&meshes[other.index()])
    }

    fn intersect(self, meshes: &[OcclMesh], other: MeshId) -> bool {
        meshes[self.index()].intersects(&meshes[other.index()])
    }

    fn bbox_intersect(self, meshes: &[OcclMesh], bbox: &BBox) -> bool {
        meshes[self.index()].bbox_intersects(bbox)
    }
}

/// Per-mesh state bits; `get_flags` returns their OR.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CullFlag {
    Drawn = 1,
    Occluded = 2,
}

/// Telemetry: how occlusions were established.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Occluders actually inserted into the occluder tree.
    pub total_occluded: u32,
    /// Meshes culled by the convex containment shortcut.
    pub total_fast: u32,
    /// Meshes culled by iterated triangle subtraction.
    pub total_slow: u32,
}

pub struct OcclCullContext {
    draw_tree: Quadtree<MeshId>,
    occluded_tree: Quadtree<MeshId>,
    flags: Vec<u8>,
    meshes: Vec<OcclMesh>,
    reserved: usize,
    stats: CullStats,
}

impl OcclCullContext {
    /// `reserve` bounds the number of meshes ever added; `clip_bbox` must
    /// cover all silhouettes (typically the clip-space viewport).
    pub fn new(reserve: usize, clip_bbox: BBox) -> Self {
        Self {
            draw_tree: Quadtree::new(clip_bbox),
            occluded_tree: Quadtree::new(clip_bbox),
            flags: Vec::with_capacity(reserve),
            meshes: Vec::with_capacity(reserve),
            reserved: reserve,
            stats: CullStats::default(),
        }
    }

    /// Take ownership of a mesh and index it as drawn.
    pub fn add_mesh(&mut self, mesh: OcclMesh) -> MeshId {
        debug_assert!(
            self.meshes.len() < self.reserved,
            "mesh store exceeds its reservation"
        );

        self.flags.push(0);
        self.meshes.push(mesh);

        let id = MeshId((self.meshes.len() - 1) as u32);
        self.draw_tree.insert(id, &self.meshes);
        id
    }

    /// OR `flag` into the mesh's state. Flagging `Occluded` also re-evaluates
    /// the neighbourhood: drawn meshes inside the new occluder are culled
    /// directly (fast path), bbox-overlapping ones are re-tested against the
    /// whole occluder set (slow path).
    pub fn flag_mesh(&mut self, id: MeshId, flag: CullFlag) {
        self.flags[id.index()] |= flag as u8;

        if flag != CullFlag::Occluded {
            return;
        }

        // Already covered occluders add no area; keep the occluder tree lean.
        if covered_by(&self.meshes[id.index()], &self.occluded_tree, &self.meshes) {
            return;
        }

        self.occluded_tree.insert(id, &self.meshes);

        let mut inside_meshes = Vec::new();
        let mut affected_meshes = Vec::new();
        self.draw_tree
            .intersect(id, &self.meshes, &mut inside_meshes, &mut affected_meshes);
        self.stats.total_occluded += 1;

        for mesh in inside_meshes {
            if self.flags[mesh.index()] != 0 {
                continue;
            }

            self.flags[mesh.index()] |= CullFlag::Occluded as u8;
            self.stats.total_fast += 1;
        }

        for mesh in affected_meshes {
            if self.flags[mesh.index()] != 0 {
                continue;
            }

            if covered_by(&self.meshes[mesh.index()], &self.occluded_tree, &self.meshes) {
                self.flags[mesh.index()] |= CullFlag::Occluded as u8;
                self.stats.total_slow += 1;
            }
        }

        debug!(
            "occluder {} confirmed: {} fast, {} slow so far",
            id.0, self.stats.total_fast, self.stats.total_slow
        );
    }

    pub fn get_flags(&self, id: MeshId) -> u8 {
        self.flags[id.index()]
    }

    #[inline]
    pub fn mesh(&self, id: MeshId) -> &OcclMesh {
        &self.meshes[id.index()]
    }

    #[inline]
    pub fn stats(&self) -> CullStats {
        self.stats
    }

    /// Total fan-triangle count across all meshes (telemetry only).
    pub fn get_total_tri_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh_proj.len()).sum()
    }
}

/// Whether the occluders indexed in `tree` jointly cover `mesh`.
///
/// Two passes: a BFS that prunes by bbox and short-circuits when any single
/// occluder contains the mesh (convex containment), then the slow path that
/// gathers the fan triangles of all bbox-overlapping occluders in the
/// visited nodes and runs the residual-area test per fan triangle.
fn covered_by(mesh: &OcclMesh, tree: &Quadtree<MeshId>, meshes: &[OcclMesh]) -> bool {
    let mut queue = VecDeque::new();
    queue.push_back(tree.root_id());

    let mut visited = Vec::new();

    while let Some(id) = queue.pop_front() {
        let node = tree.node(id);

        for &upon in &node.upon_line {
            if mesh.inside_fast(&meshes[upon.index()]) {
                return true;
            }
        }

        visited.push(id);

        for row in &node.children {
            for &child in row {
                if let Some(child) = child {
                    if mesh.bbox_intersects(&tree.node(child).bbox) {
                        queue.push_back(child);
                    }
                }
            }
        }
    }

    let mut occluder_tris = Vec::new();
    for &id in &visited {
        for &upon in &tree.node(id).upon_line {
            let occluder = &meshes[upon.index()];
            if !mesh.intersects(occluder) {
                continue;
            }

            occluder_tris.extend_from_slice(&occluder.mesh_proj);
        }
    }

    for tri in &mesh.mesh_proj {
        if !tri_in_mesh(tri, &occluder_tris) {
            return false;
        }
    }

    true
}
