//! Diagram: validated input plus a lazily swept result

use std::sync::OnceLock;

use crate::config::DiagramConfig;
use crate::error::{Result, VoronoiError};
use crate::generation::generate_sites;
use crate::geometry::{Point, PointSet, Size};
use crate::result::VoronoiResult;

/// A set of sites inside a rectangular boundary
///
/// The sweep runs on the first call to [`sweep`](Self::sweep); later calls
/// return the same result.
///
/// # Examples
///
/// ```
/// use rust_voronoi_tiles::*;
///
/// let diagram = Diagram::new(
///     vec![Point::new(20.0, 30.0), Point::new(70.0, 60.0)],
///     Size::new(100.0, 100.0),
/// )
/// .unwrap();
///
/// let result = diagram.sweep();
/// assert_eq!(result.cell_count(), 2);
/// assert!(std::ptr::eq(result, diagram.sweep()));
/// ```
#[derive(Debug)]
pub struct Diagram {
    sites: Vec<Point>,
    boundary: Size,
    result: OnceLock<VoronoiResult>,
}

impl Diagram {
    /// Create a diagram over `sites`
    ///
    /// Sites may lie outside the boundary; their cells are still computed
    /// and clipped to it.
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` if the boundary is not a positive, finite size
    /// * `InvalidSite` if a coordinate is NaN or infinite
    /// * `DuplicateSite` if two sites coincide within `EPSILON`
    pub fn new(sites: Vec<Point>, boundary: Size) -> Result<Self> {
        validate_boundary(boundary)?;

        let mut seen = PointSet::new();
        for (index, site) in sites.iter().enumerate() {
            if !site.is_finite() {
                return Err(VoronoiError::InvalidSite {
                    index,
                    reason: format!("non-finite coordinates ({}, {})", site.x, site.y),
                });
            }
            if let Err(first) = seen.insert(*site, index) {
                return Err(VoronoiError::DuplicateSite {
                    first,
                    second: index,
                });
            }
        }

        Ok(Self {
            sites,
            boundary,
            result: OnceLock::new(),
        })
    }

    /// Generate sites from a configuration and wrap them in a diagram
    ///
    /// Lloyd relaxation is applied when the configuration asks for it.
    /// Tiling is not: call [`VoronoiResult::tile`] on the swept result, or use
    /// [`generate`](crate::generation::generate).
    pub fn from_config(config: &DiagramConfig) -> Result<Self> {
        let sites = generate_sites(config)?;
        Self::new(sites, config.boundary)
    }

    #[inline]
    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    #[inline]
    pub fn boundary(&self) -> Size {
        self.boundary
    }

    /// Run Fortune's sweep, once
    pub fn sweep(&self) -> &VoronoiResult {
        self.result
            .get_or_init(|| VoronoiResult::from_sites(&self.sites, self.boundary))
    }

    /// Consume the diagram, sweeping first if that has not happened yet
    pub fn into_result(self) -> VoronoiResult {
        let Self {
            sites,
            boundary,
            result,
        } = self;
        result
            .into_inner()
            .unwrap_or_else(|| VoronoiResult::from_sites(&sites, boundary))
    }
}

pub(crate) fn validate_boundary(boundary: Size) -> Result<()> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(boundary.width) || !valid(boundary.height) {
        return Err(VoronoiError::InvalidConfig(format!(
            "boundary must be positive and finite (got {} x {})",
            boundary.width, boundary.height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicates() {
        let sites = vec![
            Point::new(10.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(10.0, 10.0 + 1e-7),
        ];
        let err = Diagram::new(sites, Size::new(100.0, 100.0)).unwrap_err();
        assert_eq!(err, VoronoiError::DuplicateSite { first: 0, second: 2 });
    }

    #[test]
    fn test_rejects_non_finite_site() {
        let sites = vec![Point::new(10.0, 10.0), Point::new(f64::NAN, 1.0)];
        let err = Diagram::new(sites, Size::new(100.0, 100.0)).unwrap_err();
        assert!(matches!(err, VoronoiError::InvalidSite { index: 1, .. }));
    }

    #[test]
    fn test_rejects_bad_boundary() {
        assert!(Diagram::new(vec![], Size::new(0.0, 10.0)).is_err());
        assert!(Diagram::new(vec![], Size::new(10.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_empty_diagram() {
        let diagram = Diagram::new(vec![], Size::new(10.0, 10.0)).unwrap();
        let result = diagram.sweep();
        assert_eq!(result.cell_count(), 0);
        assert!(result.edges().is_empty());
        assert!(result.vertices().is_empty());
    }

    #[test]
    fn test_sweep_is_cached() {
        let diagram = Diagram::new(
            vec![Point::new(10.0, 10.0), Point::new(60.0, 40.0), Point::new(30.0, 80.0)],
            Size::new(100.0, 100.0),
        )
        .unwrap();
        let first = diagram.sweep();
        let second = diagram.sweep();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.edges(), second.edges());
    }

    #[test]
    fn test_into_result() {
        let diagram = Diagram::new(vec![Point::new(50.0, 50.0)], Size::new(100.0, 100.0)).unwrap();
        let result = diagram.into_result();
        assert_eq!(result.cell_count(), 1);
    }

    #[test]
    fn test_sites_outside_boundary() {
        let diagram = Diagram::new(
            vec![Point::new(-20.0, 50.0), Point::new(50.0, 50.0)],
            Size::new(100.0, 100.0),
        )
        .unwrap();
        let result = diagram.sweep();
        assert_eq!(result.cell_count(), 2);
        assert!(result.get_cell(1).unwrap().contains(Point::new(90.0, 90.0)));
        assert!(result.get_cell(0).unwrap().contains(Point::new(5.0, 50.0)));
    }
}
