//! Lloyd's Relaxation for uniform site distribution
//!
//! Lloyd's Relaxation iteratively improves the uniformity of a site set by
//! moving each site to the centroid of its clipped Voronoi cell.

use std::time::Instant;

use tracing::debug;

use crate::diagram::Diagram;
use crate::error::Result;
use crate::geometry::{Point, Size};

/// Options for Lloyd's relaxation algorithm
#[derive(Debug, Clone, Copy)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Convergence threshold - stop when max displacement < this fraction of
    /// the shorter boundary side. Set to 0.0 to disable early termination
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            convergence_threshold: 0.001,
        }
    }
}

/// Apply Lloyd's Relaxation to improve site distribution uniformity
///
/// # Arguments
///
/// * `sites` - Initial site distribution
/// * `boundary` - Rectangle the cells are clipped to
/// * `iterations` - Number of relaxation iterations (typically 3-5)
///
/// # Errors
///
/// Fails if the sites are rejected by [`Diagram::new`].
pub fn lloyd_relaxation(sites: Vec<Point>, boundary: Size, iterations: usize) -> Result<Vec<Point>> {
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(sites, boundary, options)
}

/// Apply Lloyd's Relaxation with custom options
///
/// For each iteration:
/// 1. Sweep the current sites
/// 2. Move every site to the centroid of its clipped cell
/// 3. Stop early once the largest move drops below the threshold
pub fn lloyd_relaxation_with_options(
    mut sites: Vec<Point>,
    boundary: Size,
    options: LloydOptions,
) -> Result<Vec<Point>> {
    let threshold = options.convergence_threshold * boundary.width.min(boundary.height);
    let total_start = Instant::now();

    debug!(
        sites = sites.len(),
        max_iterations = options.max_iterations,
        threshold,
        "lloyd relaxation starting"
    );

    let mut iterations_run = 0;
    let mut converged = false;

    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();
        let (new_sites, max_displacement) = relax_once(sites, boundary)?;
        sites = new_sites;
        iterations_run = iteration + 1;

        debug!(
            iteration = iterations_run,
            elapsed = ?iter_start.elapsed(),
            max_displacement,
            "lloyd iteration"
        );

        if threshold > 0.0 && max_displacement < threshold {
            converged = true;
            break;
        }
    }

    debug!(
        iterations = iterations_run,
        converged,
        elapsed = ?total_start.elapsed(),
        "lloyd relaxation finished"
    );

    Ok(sites)
}

/// One relaxation step; returns the moved sites and the largest move
fn relax_once(sites: Vec<Point>, boundary: Size) -> Result<(Vec<Point>, f64)> {
    let result = Diagram::new(sites, boundary)?.into_result();

    let mut max_displacement: f64 = 0.0;
    let moved = result
        .cells()
        .iter()
        .map(|cell| {
            let target = cell.centroid();
            max_displacement = max_displacement.max(cell.site.distance(target));
            target
        })
        .collect();

    Ok((moved, max_displacement))
}
