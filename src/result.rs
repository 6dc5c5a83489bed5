//! Sweep results and tiling
//!
//! A [`VoronoiResult`] is what one sweep produced: the cells (indexed like
//! the input sites), the traced edges and their vertices. [`VoronoiResult::tile`]
//! re-sweeps with ghost copies of the border sites to wrap adjacency around
//! the boundary.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::cell::{Cell, CellEdge};
use crate::geometry::{Point, PointSet, Size, EPSILON};
use crate::sweep::{self, SweepOutput};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A finished Voronoi edge
///
/// The two rays traced away from a shared start by one site event are merged
/// into a single segment here. Ends lying far outside the boundary come from
/// unbounded edges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramEdge {
    pub start: Point,
    pub end: Point,
    /// Cells on the two sides of the edge
    pub cells: [usize; 2],
}

impl DiagramEdge {
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// The part of the edge inside `boundary`, if any
    pub fn clipped(&self, boundary: Size) -> Option<(Point, Point)> {
        boundary.clip_segment(self.start, self.end, 0.0)
    }
}

/// The outcome of a sweep
///
/// Cell `i` belongs to site `i`. Cells, edges and vertices are immutable once
/// built; only each cell's polygon is computed lazily.
///
/// # Example
///
/// ```
/// use rust_voronoi_tiles::*;
///
/// let sites = vec![
///     Point::new(25.0, 25.0),
///     Point::new(75.0, 25.0),
///     Point::new(50.0, 75.0),
/// ];
/// let diagram = Diagram::new(sites, Size::new(100.0, 100.0)).unwrap();
/// let result = diagram.sweep();
///
/// assert_eq!(result.cell_count(), 3);
/// assert_eq!(result.edges().len(), 3);
/// assert!(result.get_cell(2).unwrap().contains(Point::new(50.0, 90.0)));
/// ```
#[derive(Clone)]
pub struct VoronoiResult {
    cells: Vec<Cell>,
    ghosts: Vec<Cell>,
    edges: Vec<DiagramEdge>,
    vertices: Vec<Point>,
    boundary: Size,
    tiled: bool,

    #[cfg(feature = "spatial-index")]
    spatial_index: Option<SpatialIndex>,
}

impl std::fmt::Debug for VoronoiResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoronoiResult")
            .field("cells", &self.cells.len())
            .field("ghosts", &self.ghosts.len())
            .field("edges", &self.edges.len())
            .field("vertices", &self.vertices.len())
            .field("boundary", &self.boundary)
            .field("tiled", &self.tiled)
            .finish()
    }
}

impl VoronoiResult {
    /// Sweep `sites` and build the result
    pub(crate) fn from_sites(sites: &[Point], boundary: Size) -> Self {
        let output = sweep::sweep(sites, boundary);
        let mut cells = build_cells(sites, boundary, &output);
        for (a, b) in adjacent_pairs(&output, boundary) {
            cells[a].add_neighbor(b);
            cells[b].add_neighbor(a);
        }
        for cell in &mut cells {
            cell.neighbors.sort_unstable();
        }
        let edges = merged_edges(&output);
        tracing::debug!(
            cells = cells.len(),
            edges = edges.len(),
            vertex_events = output.vertex_events,
            "result assembled"
        );
        Self::assemble(cells, Vec::new(), edges, boundary, false)
    }

    fn assemble(
        cells: Vec<Cell>,
        ghosts: Vec<Cell>,
        edges: Vec<DiagramEdge>,
        boundary: Size,
        tiled: bool,
    ) -> Self {
        let vertices = unique_vertices(&edges);

        #[cfg(feature = "spatial-index")]
        let spatial_index = if cells.is_empty() {
            None
        } else {
            let sites: Vec<Point> = cells.iter().map(|c| c.site).collect();
            Some(SpatialIndex::new(&sites))
        };

        Self {
            cells,
            ghosts,
            edges,
            vertices,
            boundary,
            tiled,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        }
    }

    /// Re-sweep with ghost sites to simulate toroidal wrap-around
    ///
    /// Every cell touching a side of the boundary gets a copy of its site
    /// translated by the boundary size to the opposite side (and diagonally
    /// for corner cells). Adjacency found by a ghost is credited to its real
    /// cell, so the returned cells keep their neighbors and gain the ones
    /// across the boundary. Ghost cells are available through
    /// [`ghosts`](Self::ghosts) but are not part of [`cells`](Self::cells).
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_tiles::*;
    ///
    /// let sites = vec![Point::new(10.0, 47.0), Point::new(50.0, 50.0), Point::new(90.0, 53.0)];
    /// let result = Diagram::new(sites, Size::new(100.0, 100.0)).unwrap().sweep().tile();
    ///
    /// // The two outer cells now touch across the left/right sides.
    /// assert!(result.get_neighbors(0).contains(&2));
    /// assert_eq!(result.cell_count(), 3);
    /// ```
    pub fn tile(&self) -> VoronoiResult {
        let n = self.cells.len();
        let mut sites: Vec<Point> = self.cells.iter().map(|c| c.site).collect();
        let mut parents: Vec<usize> = (0..n).collect();

        let mut occupied = PointSet::new();
        for (i, site) in sites.iter().enumerate() {
            let _ = occupied.insert(*site, i);
        }
        for cell in &self.cells {
            for offset in ghost_offsets(cell, self.boundary) {
                let ghost = cell.site + offset;
                if occupied.insert(ghost, sites.len()).is_ok() {
                    sites.push(ghost);
                    parents.push(cell.id);
                }
            }
        }

        let output = sweep::sweep(&sites, self.boundary);
        let mut all = build_cells(&sites, self.boundary, &output);

        let mut found: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); sites.len()];
        for cell in &self.cells {
            found[cell.id].extend(cell.neighbors.iter().copied());
        }
        for (a, b) in adjacent_pairs(&output, self.boundary) {
            let (pa, pb) = (parents[a], parents[b]);
            found[a].insert(pb);
            found[b].insert(pa);
            if pa != pb {
                found[pa].insert(pb);
                found[pb].insert(pa);
            }
        }

        for (i, cell) in all.iter_mut().enumerate() {
            let parent = parents[i];
            cell.neighbors = found[i]
                .iter()
                .copied()
                .filter(|&other| other != parent)
                .collect();
            for edge in cell.edges_mut() {
                edge.neighbor = parents[edge.neighbor];
            }
        }

        let mut ghosts = all.split_off(n);
        for (g, ghost) in ghosts.iter_mut().enumerate() {
            let parent = parents[n + g];
            ghost.id = g;
            ghost.symmetric_parent = Some(parent);
            all[parent].symmetric_children.push(g);
        }

        tracing::debug!(cells = n, ghosts = ghosts.len(), "tiled diagram");

        Self::assemble(all, ghosts, merged_edges(&output), self.boundary, true)
    }

    /// Get the number of cells (ghosts excluded)
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get all cells as a slice, indexed like the input sites
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get a cell by ID
    ///
    /// Returns `None` if the cell ID is out of bounds.
    #[inline]
    pub fn get_cell(&self, id: usize) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Ghost cells of a tiled result; empty otherwise
    #[inline]
    pub fn ghosts(&self) -> &[Cell] {
        &self.ghosts
    }

    /// Whether this result came from [`tile`](Self::tile)
    #[inline]
    pub fn is_tiled(&self) -> bool {
        self.tiled
    }

    /// All edges of the sweep, unclipped
    #[inline]
    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    /// End points of all edges, without duplicates
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    #[inline]
    pub fn boundary(&self) -> Size {
        self.boundary
    }

    /// Get neighbor IDs for a cell
    ///
    /// Returns empty slice if cell ID is invalid.
    pub fn get_neighbors(&self, cell_id: usize) -> &[usize] {
        self.cells
            .get(cell_id)
            .map(|c| c.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Neighboring cells of a cell
    pub fn neighbors_of(&self, cell_id: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.get_neighbors(cell_id)
            .iter()
            .filter_map(move |&id| self.cells.get(id))
    }

    /// Find cells within a given hop count from a center cell (BFS)
    ///
    /// # Arguments
    ///
    /// * `center_id` - Starting cell ID
    /// * `hops` - Maximum number of cell hops (0 = just the center cell)
    ///
    /// # Returns
    ///
    /// Cell IDs within reach, including the center cell, in BFS order.
    /// Returns empty vec if center_id is invalid.
    pub fn find_cells_within_radius(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.cells.len() {
            return vec![];
        }

        let mut visited = HashSet::from([center_id]);
        let mut order = vec![center_id];
        let mut queue = VecDeque::from([(center_id, 0usize)]);

        while let Some((cell_id, depth)) = queue.pop_front() {
            if depth == hops {
                continue;
            }
            for &neighbor in self.get_neighbors(cell_id) {
                if visited.insert(neighbor) {
                    order.push(neighbor);
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        order
    }

    /// Find the cell containing a position (requires spatial-index feature)
    ///
    /// The containing cell of a point is the one with the nearest site, so
    /// this is a KD-tree nearest-neighbor lookup. Returns `None` for a
    /// result without cells.
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: Point) -> Option<usize> {
        self.spatial_index
            .as_ref()
            .map(|index| index.find_nearest(position))
    }
}

/// Distribute the traced half-edges to their cells
fn build_cells(sites: &[Point], boundary: Size, output: &SweepOutput) -> Vec<Cell> {
    let sole = sites.len() == 1;
    let mut cells: Vec<Cell> = sites
        .iter()
        .enumerate()
        .map(|(i, site)| Cell::new(i, *site, boundary, sole))
        .collect();

    let mut local: Vec<Option<usize>> = vec![None; output.half_edges.len()];
    for (id, half) in output.half_edges.iter().enumerate() {
        let edge = &output.edges[half.edge];
        let Some(end) = edge.end else {
            tracing::warn!(edge = half.edge, "skipping open edge");
            continue;
        };
        let neighbor = if half.owner == edge.left {
            edge.right
        } else {
            edge.left
        };
        local[id] = Some(cells[half.owner].push_edge(CellEdge {
            start: edge.start,
            end,
            neighbor,
            links: Vec::new(),
        }));
    }

    for (id, half) in output.half_edges.iter().enumerate() {
        let Some(index) = local[id] else {
            continue;
        };
        let links = half.links.iter().filter_map(|&other| local[other]).collect();
        cells[half.owner].edges_mut()[index].links = links;
    }

    cells
}

/// Cell pairs whose shared edge crosses the boundary over a positive length
fn adjacent_pairs(output: &SweepOutput, boundary: Size) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for edge in &output.edges {
        let Some(end) = edge.end else {
            continue;
        };
        let Some((a, b)) = boundary.clip_segment(edge.start, end, EPSILON) else {
            continue;
        };
        if a.distance(b) > EPSILON {
            pairs.push((edge.left, edge.right));
        }
    }
    pairs
}

/// Finished edges: twin rays joined, zero-length pieces dropped
fn merged_edges(output: &SweepOutput) -> Vec<DiagramEdge> {
    let mut edges = Vec::with_capacity(output.edges.len());
    for (id, edge) in output.edges.iter().enumerate() {
        let Some(end) = edge.end else {
            continue;
        };
        let start = match edge.twin {
            Some(twin) if twin < id => continue,
            Some(twin) => output.edges[twin].end.unwrap_or(edge.start),
            None => edge.start,
        };
        if start.distance(end) < EPSILON {
            continue;
        }
        edges.push(DiagramEdge {
            start,
            end,
            cells: [edge.left, edge.right],
        });
    }
    edges
}

fn unique_vertices(edges: &[DiagramEdge]) -> Vec<Point> {
    let mut seen = PointSet::new();
    let mut vertices = Vec::new();
    for point in edges.iter().flat_map(|e| [e.start, e.end]) {
        if seen.insert(point, vertices.len()).is_ok() {
            vertices.push(point);
        }
    }
    vertices
}

/// Translations that copy a border cell's site across the boundary
fn ghost_offsets(cell: &Cell, boundary: Size) -> Vec<Point> {
    use crate::geometry::Direction::{Down, Left, Right, Up};

    let sides = cell.boundary_sides();
    let (w, h) = (boundary.width, boundary.height);
    let (left, right, up, down) = (
        sides.contains(Left),
        sides.contains(Right),
        sides.contains(Up),
        sides.contains(Down),
    );

    let mut offsets = Vec::new();
    if right {
        offsets.push(Point::new(-w, 0.0));
    }
    if left {
        offsets.push(Point::new(w, 0.0));
    }
    if up {
        offsets.push(Point::new(0.0, -h));
    }
    if down {
        offsets.push(Point::new(0.0, h));
    }
    if right && down {
        offsets.push(Point::new(-w, h));
    }
    if right && up {
        offsets.push(Point::new(-w, -h));
    }
    if left && down {
        offsets.push(Point::new(w, h));
    }
    if left && up {
        offsets.push(Point::new(w, -h));
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PointExt;

    fn square() -> Size {
        Size::new(100.0, 100.0)
    }

    fn triangle() -> VoronoiResult {
        VoronoiResult::from_sites(
            &[
                Point::new(25.0, 25.0),
                Point::new(75.0, 25.0),
                Point::new(50.0, 75.0),
            ],
            square(),
        )
    }

    #[test]
    fn test_triangle_edges_share_circumcenter() {
        let result = triangle();
        let center = Point::new(50.0, 43.75);

        assert_eq!(result.edges().len(), 3);
        for edge in result.edges() {
            assert!(
                edge.start.distance(center) < 1e-4 || edge.end.distance(center) < 1e-4,
                "edge {:?} misses the circumcenter",
                edge
            );
        }
        assert!(result.vertices().iter().any(|v| v.distance(center) < 1e-4));
    }

    #[test]
    fn test_triangle_neighbors() {
        let result = triangle();
        assert_eq!(result.get_neighbors(0), &[1, 2]);
        assert_eq!(result.get_neighbors(1), &[0, 2]);
        assert_eq!(result.get_neighbors(2), &[0, 1]);
        assert!(result.get_neighbors(3).is_empty());
        assert_eq!(result.neighbors_of(0).count(), 2);
    }

    #[test]
    fn test_triangle_cells_cover_boundary() {
        let result = triangle();
        let total: f64 = result.cells().iter().map(Cell::area).sum();
        assert!((total - 10_000.0).abs() < 1e-3);
        assert!(result.get_cell(0).unwrap().contains(Point::new(1.0, 1.0)));
        assert!(result.get_cell(1).unwrap().contains(Point::new(99.0, 1.0)));
        assert!(result.get_cell(2).unwrap().contains(Point::new(50.0, 99.0)));
    }

    #[test]
    fn test_single_site_has_whole_boundary() {
        let result = VoronoiResult::from_sites(&[Point::new(40.0, 60.0)], square());
        assert_eq!(result.cell_count(), 1);
        assert!(result.edges().is_empty());
        let cell = result.get_cell(0).unwrap();
        assert_eq!(cell.vertex_count(), 4);
        assert!(cell.neighbors.is_empty());
    }

    #[test]
    fn test_corner_site_contains_itself() {
        let result = VoronoiResult::from_sites(
            &[Point::new(0.0, 0.0), Point::new(75.0, 25.0)],
            square(),
        );
        let corner = result.get_cell(0).unwrap();
        assert!(corner.contains(corner.site));
        assert!((corner.area() - 2_500.0).abs() < 1e-6);

        let total: f64 = result.cells().iter().map(Cell::area).sum();
        assert!((total - 10_000.0).abs() < 1e-6, "total area {}", total);
    }

    #[test]
    fn test_find_cells_within_radius() {
        let result = VoronoiResult::from_sites(
            &[
                Point::new(10.0, 50.0),
                Point::new(30.0, 50.0),
                Point::new(50.0, 50.0),
                Point::new(70.0, 50.0),
                Point::new(90.0, 50.0),
            ],
            square(),
        );
        assert_eq!(result.find_cells_within_radius(0, 0), vec![0]);
        assert_eq!(result.find_cells_within_radius(0, 1), vec![0, 1]);
        assert_eq!(result.find_cells_within_radius(2, 1).len(), 3);
        assert_eq!(result.find_cells_within_radius(0, 10).len(), 5);
        assert!(result.find_cells_within_radius(99, 3).is_empty());
    }

    #[test]
    fn test_tile_wraps_strip() {
        let result = VoronoiResult::from_sites(
            &[
                Point::new(10.0, 47.0),
                Point::new(50.0, 50.0),
                Point::new(90.0, 53.0),
            ],
            square(),
        );
        assert!(!result.get_neighbors(0).contains(&2));

        let tiled = result.tile();
        assert!(tiled.is_tiled());
        assert_eq!(tiled.cell_count(), 3);
        assert!(tiled.get_neighbors(0).contains(&2));
        assert!(tiled.get_neighbors(2).contains(&0));
        for (before, after) in result.cells().iter().zip(tiled.cells()) {
            assert!(before.site.approx_eq(after.site));
            for n in &before.neighbors {
                assert!(after.neighbors.contains(n));
            }
        }
    }

    #[test]
    fn test_tile_links_ghosts_to_parents() {
        let tiled = triangle().tile();
        assert!(!tiled.ghosts().is_empty());
        for (g, ghost) in tiled.ghosts().iter().enumerate() {
            let parent = ghost.symmetric_parent.unwrap();
            assert!(tiled.cells()[parent].symmetric_children.contains(&g));
            assert!(!tiled.boundary().contains(ghost.site));
        }
        for cell in tiled.cells() {
            assert!(cell.symmetric_parent.is_none());
            assert!(!cell.neighbors.contains(&cell.id));
        }
    }

    #[test]
    fn test_ghost_offsets_for_corner_cell() {
        let mut cell = Cell::new(0, Point::new(95.0, 5.0), square(), false);
        cell.push_edge(CellEdge {
            start: Point::new(80.0, -50.0),
            end: Point::new(80.0, 150.0),
            neighbor: 1,
            links: vec![],
        });
        let offsets = ghost_offsets(&cell, square());
        assert!(offsets.contains(&Point::new(-100.0, 0.0)));
        assert!(offsets.contains(&Point::new(0.0, -100.0)));
        assert!(offsets.contains(&Point::new(0.0, 100.0)));
        assert!(offsets.contains(&Point::new(-100.0, 100.0)));
        assert!(offsets.contains(&Point::new(-100.0, -100.0)));
        assert!(!offsets.iter().any(|o| o.x > 0.0));
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_cell_at() {
        let result = triangle();
        assert_eq!(result.find_cell_at(Point::new(5.0, 5.0)), Some(0));
        assert_eq!(result.find_cell_at(Point::new(95.0, 5.0)), Some(1));
        assert_eq!(result.find_cell_at(Point::new(50.0, 95.0)), Some(2));

        let empty = VoronoiResult::from_sites(&[], square());
        assert_eq!(empty.find_cell_at(Point::new(5.0, 5.0)), None);
    }
}
