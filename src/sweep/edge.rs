//! Traced edges and their per-cell halves

use crate::geometry::Point;

pub(crate) type EdgeId = usize;
pub(crate) type HalfEdgeId = usize;

/// A Voronoi edge traced by a breakpoint
///
/// `left` and `right` are the cells on either side as seen along the beach
/// line; `direction` is the way the breakpoint travels as the sweep advances.
#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub start: Point,
    pub end: Option<Point>,
    pub left: usize,
    pub right: usize,
    pub direction: Point,
    /// Opposite ray created by the same site event
    pub twin: Option<EdgeId>,
    /// Half-edges owned by `left` and `right`, in that order
    pub halves: [HalfEdgeId; 2],
}

impl Edge {
    pub fn new(
        start: Point,
        (left, left_site): (usize, Point),
        (right, right_site): (usize, Point),
        halves: [HalfEdgeId; 2],
    ) -> Self {
        Self {
            start,
            end: None,
            left,
            right,
            direction: Point::new(left_site.y - right_site.y, right_site.x - left_site.x),
            twin: None,
            halves,
        }
    }

    #[inline]
    pub fn has_set_end(&self) -> bool {
        self.end.is_some()
    }

    pub fn close(&mut self, end: Point) {
        self.end = Some(end);
    }

    /// Half-edge owned by `cell`
    pub fn half_of(&self, cell: usize) -> HalfEdgeId {
        if cell == self.left {
            self.halves[0]
        } else {
            self.halves[1]
        }
    }
}

/// The side of an edge that belongs to one cell
///
/// `links` are the other half-edges of the same cell that meet this one at a
/// shared vertex.
#[derive(Debug, Clone)]
pub(crate) struct HalfEdge {
    pub owner: usize,
    pub edge: EdgeId,
    pub links: Vec<HalfEdgeId>,
}

/// Mutually link two half-edges of the same cell
pub(crate) fn link(half_edges: &mut [HalfEdge], a: HalfEdgeId, b: HalfEdgeId) {
    if a == b || half_edges[a].owner != half_edges[b].owner {
        return;
    }
    if !half_edges[a].links.contains(&b) {
        half_edges[a].links.push(b);
    }
    if !half_edges[b].links.contains(&a) {
        half_edges[b].links.push(a);
    }
}
