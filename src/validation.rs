//! Structural validation for sweep results.
//!
//! Provides functions to verify the combinatorial and geometric consistency
//! of a [`VoronoiResult`]. Useful for debugging, testing, and catching
//! numerical issues.

use crate::geometry::PointExt;
use crate::result::VoronoiResult;

/// Detailed validation report for a sweep result.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// Number of cells, ghosts excluded.
    pub num_cells: usize,
    /// Number of finished edges.
    pub num_edges: usize,
    /// Number of distinct vertices.
    pub num_vertices: usize,
    /// Upper bound on the edge count for a planar diagram: 3n - 6 for n >= 3
    /// swept sites, ghosts included.
    pub max_edges: usize,

    /// Neighbor entries that are not mirrored by the other cell.
    pub asymmetric_neighbors: usize,
    /// Cells whose site lies inside the boundary but outside their polygon.
    pub sites_outside_cells: usize,
    /// Edge links that point nowhere or join edges without a common end.
    pub broken_links: usize,
    /// Cells with a site inside the boundary but fewer than 3 polygon vertices.
    pub degenerate_cells: usize,

    /// |sum of polygon areas - boundary area| / boundary area, ghosts included.
    pub area_error: f64,
}

impl ValidationReport {
    /// Check that the result passed every structural check.
    pub fn is_valid(&self) -> bool {
        self.asymmetric_neighbors == 0
            && self.sites_outside_cells == 0
            && self.broken_links == 0
            && self.degenerate_cells == 0
            && self.num_edges <= self.max_edges
            && self.area_error < 1e-6
    }

    /// Format a summary of any issues found.
    pub fn summary(&self) -> String {
        let mut issues = Vec::new();

        if self.num_edges > self.max_edges {
            issues.push(format!("E={} (at most {})", self.num_edges, self.max_edges));
        }
        if self.asymmetric_neighbors > 0 {
            issues.push(format!("{} one-way neighbor entries", self.asymmetric_neighbors));
        }
        if self.sites_outside_cells > 0 {
            issues.push(format!("{} sites outside their cell", self.sites_outside_cells));
        }
        if self.broken_links > 0 {
            issues.push(format!("{} broken edge links", self.broken_links));
        }
        if self.degenerate_cells > 0 {
            issues.push(format!("{} degenerate cells", self.degenerate_cells));
        }
        if self.area_error >= 1e-6 {
            issues.push(format!("area off by {:.2e}", self.area_error));
        }

        if issues.is_empty() {
            "Valid".to_string()
        } else {
            issues.join(", ")
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ValidationReport {{ V={}, E={}, F={}, {} }}",
            self.num_vertices,
            self.num_edges,
            self.num_cells,
            self.summary()
        )
    }
}

/// Validate structural correctness of a sweep result.
///
/// Checks:
/// - Neighbor symmetry (a lists b exactly when b lists a)
/// - Every site inside the boundary lies in its own polygon
/// - Edge links join edges of the same cell at a shared end
/// - Polygons of sites inside the boundary have at least 3 vertices
/// - Edge count within the planar bound
/// - Polygons tile the boundary (total area)
pub fn validate(result: &VoronoiResult) -> ValidationReport {
    let boundary = result.boundary();
    let cells = result.cells();
    let n = cells.len();
    let swept = n + result.ghosts().len();

    let asymmetric_neighbors = cells
        .iter()
        .flat_map(|cell| cell.neighbors.iter().map(move |&other| (cell.id, other)))
        .filter(|&(id, other)| {
            cells
                .get(other)
                .map_or(true, |neighbor| !neighbor.is_neighbor_of(id))
        })
        .count();

    let mut sites_outside_cells = 0;
    let mut degenerate_cells = 0;
    for cell in cells {
        if !boundary.contains(cell.site) {
            continue;
        }
        if cell.vertex_count() < 3 {
            degenerate_cells += 1;
        } else if !cell.contains(cell.site) {
            sites_outside_cells += 1;
        }
    }

    let mut broken_links = 0;
    for cell in cells.iter().chain(result.ghosts()) {
        let edges = cell.edges();
        for edge in edges {
            for &link in &edge.links {
                let touches = edges.get(link).is_some_and(|other| {
                    [edge.start, edge.end]
                        .iter()
                        .any(|p| p.approx_eq(other.start) || p.approx_eq(other.end))
                });
                if !touches {
                    broken_links += 1;
                }
            }
        }
    }

    let covered: f64 = cells.iter().chain(result.ghosts()).map(|c| c.area()).sum();
    let total = boundary.width * boundary.height;
    let area_error = if n == 0 {
        0.0
    } else {
        (covered - total).abs() / total
    };

    let report = ValidationReport {
        num_cells: n,
        num_edges: result.edges().len(),
        num_vertices: result.vertices().len(),
        max_edges: if swept >= 3 { 3 * swept - 6 } else { swept.saturating_sub(1) },
        asymmetric_neighbors,
        sites_outside_cells,
        broken_links,
        degenerate_cells,
        area_error,
    };

    if !report.is_valid() {
        tracing::warn!(%report, "validation found issues");
    }
    report
}

/// Smallest distance between two distinct vertices, or `None` for fewer
/// than two vertices.
///
/// Values close to `EPSILON` hint at vertices that should have merged.
pub fn min_vertex_separation(result: &VoronoiResult) -> Option<f64> {
    let vertices = result.vertices();
    let mut best: Option<f64> = None;
    for (i, a) in vertices.iter().enumerate() {
        for b in &vertices[i + 1..] {
            let d = a.distance(*b);
            best = Some(best.map_or(d, |m| m.min(d)));
        }
    }
    best
}
