//! Site generation pipeline
//!
//! Places seeded sites according to a [`DiagramConfig`], optionally relaxes
//! them with Lloyd's algorithm, and sweeps the final diagram.

mod lloyd;
mod points;

pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions};
pub use points::{jittered_grid_sites, uniform_sites};

use tracing::debug;

use crate::config::{DiagramConfig, SiteLayout};
use crate::diagram::Diagram;
use crate::error::Result;
use crate::geometry::Point;
use crate::result::VoronoiResult;

/// Generate the sites described by a configuration
///
/// Sites are placed with the configured layout, then relaxed when
/// `lloyd_iterations > 0`.
pub fn generate_sites(config: &DiagramConfig) -> Result<Vec<Point>> {
    let boundary = config.boundary;

    // Step 1: Place seeded sites
    let sites = match config.layout {
        SiteLayout::Uniform { count, inset } => {
            points::uniform_sites(count, boundary, inset, config.seed)
        }
        SiteLayout::JitteredGrid {
            rows,
            columns,
            jitter,
        } => points::jittered_grid_sites(boundary, rows, columns, jitter, config.seed),
    };
    debug!(
        layout = config.layout.name(),
        sites = sites.len(),
        seed = config.seed,
        "sites placed"
    );

    // Step 2: Apply Lloyd's relaxation with convergence detection
    if config.lloyd_iterations > 0 {
        let options = LloydOptions {
            max_iterations: config.lloyd_iterations,
            convergence_threshold: config.lloyd_convergence,
        };
        lloyd::lloyd_relaxation_with_options(sites, boundary, options)
    } else {
        Ok(sites)
    }
}

/// Generate a complete diagram from a configuration
///
/// Tiles the result when `config.tiled` is set.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_tiles::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(3)
///     .jittered_grid(4, 4, 0.6)
///     .unwrap()
///     .tiled(true)
///     .build()
///     .unwrap();
///
/// let result = generate(&config).unwrap();
/// assert_eq!(result.cell_count(), 16);
/// assert!(result.is_tiled());
/// ```
pub fn generate(config: &DiagramConfig) -> Result<VoronoiResult> {
    let result = Diagram::from_config(config)?.into_result();
    if config.tiled {
        Ok(result.tile())
    } else {
        Ok(result)
    }
}
