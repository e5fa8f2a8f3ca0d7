//! Triangle-pair subtraction.
//!
//! Purpose
//! - `subtract_triangles(m, s, out)` appends a CCW, non-overlapping
//!   triangulation of `m \ s` to a caller-provided accumulator. This is the
//!   workhorse behind the iterated coverage test.
//!
//! Shape
//! - `inters`: the nine side-pair solves plus the vertex-contact cleanups.
//! - `walk`: boundary walks that discard grazing hits and classify vertices.
//! - `cases`: per-topology emission, dispatched on `(M, S, I)`.
//!
//! Errors never propagate: bad winding is a silent no-op by contract, odd
//! parity and missed topologies are logged and degrade to conservative
//! output (nothing, respectively the uncut minuend). The caller is a
//! latency-sensitive renderer; a frame that culls too little beats a crash.

mod cases;
mod inters;
mod walk;

use log::debug;

use super::types::{Triangle, EPS_AREA, MIN_HEIGHT_RATIO};

/// Append a triangulation of `minuend \ subtr` to `out`.
///
/// Both inputs are assumed CCW; if either is not, nothing is appended. The
/// result triangles are CCW, pairwise interior-disjoint, and free of
/// degenerate slivers. The triangulation itself is not unique.
pub fn subtract_triangles(minuend: &Triangle, subtr: &Triangle, out: &mut Vec<Triangle>) {
    let start = out.len();
    subtract_into(minuend, subtr, out);

    // Post-emission filter: construction may have produced zero-area or
    // sliver pieces at vertex contacts, and a flipped piece means the case
    // geometry degenerated. All of them are dropped.
    for k in (start..out.len()).rev() {
        let tri = out[k];

        if tri.area() < EPS_AREA || tri.min_height_ratio() < MIN_HEIGHT_RATIO || !tri.is_ccw() {
            debug!("dropping degenerate remainder {tri}");
            out.remove(k);
        }
    }
}

fn subtract_into(minuend: &Triangle, subtr: &Triangle, out: &mut Vec<Triangle>) {
    if !minuend.is_ccw() || !subtr.is_ccw() {
        debug!(
            "subtraction skipped, non-ccw input: minuend ccw = {}, subtrahend ccw = {}",
            minuend.is_ccw(),
            subtr.is_ccw()
        );
        return;
    }

    let (fac, raw) = inters::collect_intersections(minuend, subtr);

    let mwalk = walk::walk_minuend(minuend, subtr, &fac, &raw);
    let (s_inside, s_hits) = walk::walk_subtr(minuend, subtr, &mwalk.kept);

    cases::emit_difference(
        minuend,
        subtr,
        &fac,
        &mwalk.kept,
        &mwalk.outside,
        &s_inside,
        &s_hits,
        out,
    );
}
