//! Spatial indexing for fast position-to-cell lookups
//!
//! This module is only available with the `spatial-index` feature.

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::geometry::Point;

/// Wrapper around KD-tree for spatial queries
///
/// Provides O(log n) nearest-site lookups. Since a point belongs to the
/// cell of its nearest site, this converts positions into cell IDs.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

impl SpatialIndex {
    /// Build spatial index from cell sites
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_tiles::*;
    ///
    /// let sites = vec![
    ///     Point::new(10.0, 10.0),
    ///     Point::new(90.0, 10.0),
    ///     Point::new(50.0, 90.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&sites);
    /// let cell_id = index.find_nearest(Point::new(80.0, 20.0));
    /// assert_eq!(cell_id, 1);
    /// ```
    pub fn new(sites: &[Point]) -> Self {
        let points: Vec<[f64; 2]> = sites.iter().map(|s| [s.x, s.y]).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Index of the site nearest to `position`
    pub fn find_nearest(&self, position: Point) -> usize {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_basic() {
        let sites = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
        ];

        let index = SpatialIndex::new(&sites);

        assert_eq!(index.find_nearest(Point::new(1.0, 2.0)), 0);
        assert_eq!(index.find_nearest(Point::new(9.0, 1.0)), 1);
        assert_eq!(index.find_nearest(Point::new(2.0, 8.0)), 2);
        assert_eq!(index.find_nearest(Point::new(12.0, 11.0)), 3);
    }

    #[test]
    fn test_spatial_index_exact_match() {
        let sites = vec![Point::new(10.0, 0.0), Point::new(0.0, 10.0)];

        let index = SpatialIndex::new(&sites);

        assert_eq!(index.find_nearest(sites[0]), 0);
        assert_eq!(index.find_nearest(sites[1]), 1);
    }

    #[test]
    fn test_spatial_index_matches_brute_force() {
        let sites: Vec<Point> = (0..50)
            .map(|i| {
                let t = i as f64;
                Point::new((t * 37.0) % 100.0, (t * 61.0) % 100.0)
            })
            .collect();
        let index = SpatialIndex::new(&sites);

        for q in 0..40 {
            let query = Point::new((q as f64 * 13.7) % 100.0, (q as f64 * 29.3) % 100.0);
            let brute = sites
                .iter()
                .map(|s| s.distance_squared(query))
                .fold(f64::INFINITY, f64::min);
            let found = index.find_nearest(query);
            assert!((sites[found].distance_squared(query) - brute).abs() < 1e-9);
        }
    }
}
