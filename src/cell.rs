//! Voronoi cell structure
//!
//! A cell owns the half-edges traced around its site and rebuilds its
//! polygon, clipped to the diagram boundary, on first request.

use std::sync::OnceLock;

use crate::geometry::{Line, Point, PointExt, Sides, Size, EPSILON};

/// One side of an edge as seen from a cell
///
/// `links` index the other edges of the same cell that share an end point
/// with this one.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEdge {
    pub start: Point,
    pub end: Point,
    /// Cell on the other side of the edge
    pub neighbor: usize,
    pub links: Vec<usize>,
}

impl CellEdge {
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

#[derive(Debug, Clone, Default)]
struct Outline {
    vertices: Vec<Point>,
    sides: Sides,
}

/// A single Voronoi cell
///
/// # Geometry
///
/// The vertex loop is computed lazily from the cell's edges and cached: the
/// boundary corners that lie on the site's side of every edge line, plus
/// every edge clipped to the boundary, sorted counter-clockwise around the
/// site (or around their mean when the site lies on or outside the
/// boundary, as ghost sites of a tiled diagram do).
///
/// # Tiling
///
/// In a tiled result the ghost copies of a real cell are its
/// `symmetric_children` (indices into the result's ghost list), and every
/// ghost points back at its real cell through `symmetric_parent`.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Identifier of the cell; equals the index of its site in the input
    pub id: usize,

    /// The generating site
    pub site: Point,

    /// IDs of adjacent cells, ascending
    ///
    /// Two cells are neighbors if the edge between them has a part of
    /// positive length inside the boundary.
    pub neighbors: Vec<usize>,

    /// For a ghost cell, the real cell it mirrors
    pub symmetric_parent: Option<usize>,

    /// For a real cell of a tiled diagram, its ghost copies
    pub symmetric_children: Vec<usize>,

    boundary: Size,
    edges: Vec<CellEdge>,
    sole: bool,
    outline: OnceLock<Outline>,
}

impl Cell {
    /// Create an empty cell. `sole` marks the only cell of a diagram, which
    /// covers the whole boundary without having any edge.
    pub(crate) fn new(id: usize, site: Point, boundary: Size, sole: bool) -> Self {
        Self {
            id,
            site,
            neighbors: Vec::new(),
            symmetric_parent: None,
            symmetric_children: Vec::new(),
            boundary,
            edges: Vec::new(),
            sole,
            outline: OnceLock::new(),
        }
    }

    pub(crate) fn push_edge(&mut self, edge: CellEdge) -> usize {
        self.edges.push(edge);
        self.edges.len() - 1
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [CellEdge] {
        &mut self.edges
    }

    pub(crate) fn add_neighbor(&mut self, other: usize) {
        if other != self.id && !self.neighbors.contains(&other) {
            self.neighbors.push(other);
        }
    }

    /// Edges traced around this cell, unclipped
    #[inline]
    pub fn edges(&self) -> &[CellEdge] {
        &self.edges
    }

    /// Boundary of the diagram this cell belongs to
    #[inline]
    pub fn boundary(&self) -> Size {
        self.boundary
    }

    /// Counter-clockwise polygon of the cell, clipped to the boundary
    ///
    /// Computed on first call and cached. A cell without edges has an empty
    /// loop, unless it is the only cell of its diagram, in which case it is
    /// the whole boundary rectangle.
    pub fn make_vertex_loop(&self) -> &[Point] {
        &self.outline().vertices
    }

    /// Sides of the boundary touched by the cell polygon
    pub fn boundary_sides(&self) -> Sides {
        self.outline().sides
    }

    /// Whether `point` lies inside the cell polygon (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        let vertices = self.make_vertex_loop();
        if vertices.len() < 3 {
            return false;
        }
        vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .all(|(a, b)| Line::new(*a, *b).signed_distance(point) >= -EPSILON)
    }

    /// Get the number of neighboring cells
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this cell is a neighbor of another cell
    #[inline]
    pub fn is_neighbor_of(&self, other_cell_id: usize) -> bool {
        self.neighbors.contains(&other_cell_id)
    }

    /// Get the vertex count (polygon complexity)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.make_vertex_loop().len()
    }

    /// Whether this is a ghost cell of a tiled diagram
    #[inline]
    pub fn is_symmetric(&self) -> bool {
        self.symmetric_parent.is_some()
    }

    /// Area of the clipped polygon (shoelace formula)
    pub fn area(&self) -> f64 {
        let vertices = self.make_vertex_loop();
        if vertices.len() < 3 {
            return 0.0;
        }
        let twice: f64 = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(a, b)| a.perp_dot(*b))
            .sum();
        twice.abs() / 2.0
    }

    /// Area-weighted centroid of the clipped polygon
    ///
    /// Falls back to the vertex average for degenerate polygons and to the
    /// site when there are no vertices at all.
    pub fn centroid(&self) -> Point {
        let vertices = self.make_vertex_loop();
        if vertices.is_empty() {
            return self.site;
        }
        let mean = vertices.iter().copied().sum::<Point>() / vertices.len() as f64;

        let mut twice_area = 0.0;
        let mut acc = Point::ZERO;
        for (a, b) in vertices.iter().zip(vertices.iter().cycle().skip(1)) {
            // Relative to the mean for better conditioning
            let (a, b) = (*a - mean, *b - mean);
            let w = a.perp_dot(b);
            twice_area += w;
            acc += (a + b) * w;
        }
        if twice_area.abs() < EPSILON * EPSILON {
            return mean;
        }
        mean + acc / (3.0 * twice_area)
    }

    /// Euclidean distance between the two sites
    pub fn distance_to(&self, other: &Cell) -> f64 {
        self.site.distance(other.site)
    }

    fn outline(&self) -> &Outline {
        self.outline.get_or_init(|| self.wind_vertices())
    }

    fn wind_vertices(&self) -> Outline {
        if self.edges.is_empty() && !self.sole {
            return Outline::default();
        }

        let mut corners = self.boundary.corners().to_vec();
        let mut vertices = Vec::with_capacity(self.edges.len() * 2 + 4);

        for edge in &self.edges {
            if edge.length() < EPSILON {
                continue;
            }
            let line = Line::new(edge.start, edge.end);
            corners.retain(|corner| line.same_side(*corner, self.site));
            if let Some((a, b)) = self.boundary.clip_segment(edge.start, edge.end, 0.0) {
                vertices.push(a);
                vertices.push(b);
            }
        }
        vertices.extend(corners);

        if vertices.is_empty() {
            return Outline::default();
        }

        // A site on the boundary can be a vertex of its own polygon
        let reference = if self.boundary.contains_inset(self.site, 2.0 * EPSILON) {
            self.site
        } else {
            vertices.iter().copied().sum::<Point>() / vertices.len() as f64
        };
        vertices.sort_by(|a, b| reference.heading_to(*a).total_cmp(&reference.heading_to(*b)));
        vertices.dedup_by(|a, b| a.approx_eq(*b));
        while vertices.len() > 1 && vertices[0].approx_eq(vertices[vertices.len() - 1]) {
            vertices.pop();
        }

        let sides = vertices
            .iter()
            .flat_map(|v| self.boundary.sides_touched_by(*v).iter())
            .collect();

        Outline { vertices, sides }
    }
}
