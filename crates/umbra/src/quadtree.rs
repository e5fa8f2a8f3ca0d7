//! Generic 2D bounding-box quadtree.
//!
//! Purpose
//! - Spatial index behind both the drawn-mesh set and the occluder set.
//!   Items are cheap `Copy` handles; their geometry lives in an external
//!   context passed to every operation, so the tree never borrows the data
//!   it indexes.
//!
//! Layout
//! - Every node splits its bbox at the midpoint on both axes into up to four
//!   lazily created children, indexed `[x-side][y-side]`. An item straddling
//!   either midline stays in that node's `upon_line`; otherwise it descends.
//!   An item therefore lands in the deepest node whose midlines it does not
//!   straddle, and its bbox is contained in that node's bbox (as long as it
//!   is contained in the root's).
//! - Nodes live in a `Vec` arena addressed by `NodeId` and are only freed
//!   when the whole tree drops.

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::geom::{BBox, Vec2};

/// An indexable item. `Ctx` carries the actual geometry store (for mesh
/// handles, the mesh slice); plain self-contained items use `Ctx = ()`.
pub trait QuadItem: Copy {
    type Ctx: ?Sized;

    /// Position of the item's bbox relative to an axis-parallel line at
    /// `value` on axis `dim` (0 = x, 1 = y): `Less` when entirely below,
    /// `Greater` when entirely above, `Equal` when straddling.
    fn compare(self, ctx: &Self::Ctx, value: f32, dim: usize) -> Ordering;

    /// Whether this item lies entirely inside `other`.
    fn inside_fast(self, ctx: &Self::Ctx, other: Self) -> bool;

    /// Whether this item overlaps `other`.
    fn intersect(self, ctx: &Self::Ctx, other: Self) -> bool;

    /// Whether this item's bbox overlaps `bbox`.
    fn bbox_intersect(self, ctx: &Self::Ctx, bbox: &BBox) -> bool;
}

/// Index of a node in the tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(u32);

#[derive(Clone, Debug)]
pub struct Node<T> {
    pub bbox: BBox,
    /// Items straddling one of this node's splitting midlines.
    pub upon_line: Vec<T>,
    pub children: [[Option<NodeId>; 2]; 2],
}

#[derive(Clone, Debug)]
pub struct Quadtree<T: QuadItem> {
    nodes: Vec<Node<T>>,
}

impl<T: QuadItem> Quadtree<T> {
    pub fn new(root_bbox: BBox) -> Self {
        Self {
            nodes: vec![Node {
                bbox: root_bbox,
                upon_line: Vec::new(),
                children: [[None; 2]; 2],
            }],
        }
    }

    #[inline]
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0 as usize]
    }

    /// Insert an item. Precondition: its bbox intersects the root bbox.
    pub fn insert(&mut self, item: T, ctx: &T::Ctx) {
        debug_assert!(item.bbox_intersect(ctx, &self.nodes[0].bbox));

        let mut cur = NodeId(0);
        loop {
            let middle = self.node(cur).bbox.middle();
            let cmp_x = item.compare(ctx, middle.x, 0);
            let cmp_y = item.compare(ctx, middle.y, 1);

            if cmp_x == Ordering::Equal || cmp_y == Ordering::Equal {
                self.nodes[cur.0 as usize].upon_line.push(item);
                return;
            }

            let ix = (cmp_x == Ordering::Greater) as usize;
            let iy = (cmp_y == Ordering::Greater) as usize;

            match self.node(cur).children[ix][iy] {
                Some(child) => cur = child,
                None => {
                    let bbox = quadrant_bbox(&self.node(cur).bbox, ix, iy);
                    let child = NodeId(self.nodes.len() as u32);
                    self.nodes.push(Node {
                        bbox,
                        upon_line: Vec::new(),
                        children: [[None; 2]; 2],
                    });
                    self.nodes[cur.0 as usize].children[ix][iy] = Some(child);
                    cur = child;
                }
            }
        }
    }

    /// Visit all items whose node bbox overlaps `item`'s bbox and sort them
    /// into `insides` (item entirely inside `item`) or `inters` (otherwise
    /// overlapping).
    pub fn intersect(&self, item: T, ctx: &T::Ctx, insides: &mut Vec<T>, inters: &mut Vec<T>) {
        debug_assert!(item.bbox_intersect(ctx, &self.nodes[0].bbox));

        let mut queue = VecDeque::new();
        queue.push_back(self.root_id());

        while let Some(id) = queue.pop_front() {
            let node = self.node(id);

            for &upon in &node.upon_line {
                if upon.inside_fast(ctx, item) {
                    insides.push(upon);
                } else if upon.intersect(ctx, item) {
                    inters.push(upon);
                }
            }

            for row in &node.children {
                for &child in row {
                    if let Some(child) = child {
                        if item.bbox_intersect(ctx, &self.node(child).bbox) {
                            queue.push_back(child);
                        }
                    }
                }
            }
        }
    }
}

fn quadrant_bbox(parent: &BBox, ix: usize, iy: usize) -> BBox {
    let middle = parent.middle();
    match (ix, iy) {
        (0, 0) => BBox::new(parent.tl, middle),
        (1, 0) => BBox::new(Vec2::new(middle.x, parent.tl.y), Vec2::new(parent.br.x, middle.y)),
        (0, 1) => BBox::new(Vec2::new(parent.tl.x, middle.y), Vec2::new(middle.x, parent.br.y)),
        _ => BBox::new(middle, parent.br),
    }
}
