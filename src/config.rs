//! Diagram configuration and builder
//!
//! This module provides configuration types for deterministic diagram generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::diagram::validate_boundary;
use crate::error::{Result, VoronoiError};
use crate::geometry::Size;

/// How sites are placed inside the boundary
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SiteLayout {
    /// Uniformly random sites, kept `inset` away from every side
    Uniform {
        /// Number of sites to generate
        count: usize,
        /// Margin between the sites and the boundary
        inset: f64,
    },
    /// One site per grid cell, displaced from the cell center at random
    JitteredGrid {
        /// Cells along the y axis
        rows: usize,
        /// Cells along the x axis
        columns: usize,
        /// Maximum displacement as a fraction of the grid cell size, in `[0, 1]`
        jitter: f64,
    },
}

impl SiteLayout {
    /// Number of sites this layout produces
    pub fn site_count(self) -> usize {
        match self {
            SiteLayout::Uniform { count, .. } => count,
            SiteLayout::JitteredGrid { rows, columns, .. } => rows * columns,
        }
    }

    /// Get a human-readable name for this layout
    pub fn name(self) -> &'static str {
        match self {
            SiteLayout::Uniform { .. } => "Uniform",
            SiteLayout::JitteredGrid { .. } => "JitteredGrid",
        }
    }
}

impl Default for SiteLayout {
    fn default() -> Self {
        SiteLayout::Uniform {
            count: 64,
            inset: 0.0,
        }
    }
}

/// Configuration for deterministic diagram generation
///
/// The same configuration always produces the same sites and therefore the
/// same diagram.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_tiles::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(42)
///     .jittered_grid(8, 8, 0.5)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Random seed for site placement
    pub seed: u32,

    /// The rectangle `[0, width] × [0, height]`
    pub boundary: Size,

    /// Site placement strategy
    pub layout: SiteLayout,

    /// Number of Lloyd relaxation iterations (0 keeps the raw sites)
    pub lloyd_iterations: usize,

    /// Convergence threshold for Lloyd relaxation, as a fraction of the
    /// shorter boundary side
    ///
    /// - 0.0: Disable early termination (run all iterations)
    /// - 0.001: Default
    pub lloyd_convergence: f64,

    /// Whether [`generate`](crate::generation::generate) tiles the result
    pub tiled: bool,
}

impl DiagramConfig {
    /// Get the number of sites for this configuration
    #[inline]
    pub fn site_count(&self) -> usize {
        self.layout.site_count()
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            boundary: Size::new(100.0, 100.0),
            layout: SiteLayout::default(),
            lloyd_iterations: 0,
            lloyd_convergence: 0.001,
            tiled: false,
        }
    }
}

/// Builder for creating DiagramConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_tiles::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(7)
///     .boundary(200.0, 100.0)
///     .unwrap()
///     .uniform(150, 2.0)
///     .unwrap()
///     .lloyd_iterations(3)
///     .unwrap()
///     .tiled(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.site_count(), 150);
/// ```
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    seed: Option<u32>,
    boundary: Size,
    layout: SiteLayout,
    lloyd_iterations: usize,
    lloyd_convergence: f64,
    tiled: bool,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random
    /// - boundary: 100 × 100
    /// - layout: 64 uniform sites, no inset
    /// - lloyd_iterations: 0
    /// - lloyd_convergence: 0.001
    /// - tiled: false
    pub fn new() -> Self {
        let defaults = DiagramConfig::default();
        Self {
            seed: None,
            boundary: defaults.boundary,
            layout: defaults.layout,
            lloyd_iterations: defaults.lloyd_iterations,
            lloyd_convergence: defaults.lloyd_convergence,
            tiled: defaults.tiled,
        }
    }

    /// Set the random seed for site placement
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the boundary size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless both sides are positive and finite
    pub fn boundary(mut self, width: f64, height: f64) -> Result<Self> {
        let boundary = Size::new(width, height);
        validate_boundary(boundary)?;
        self.boundary = boundary;
        Ok(self)
    }

    /// Place `count` uniformly random sites, `inset` away from the sides
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `inset` is negative or not finite
    pub fn uniform(mut self, count: usize, inset: f64) -> Result<Self> {
        if !inset.is_finite() || inset < 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "inset must be >= 0 (got {})",
                inset
            )));
        }
        self.layout = SiteLayout::Uniform { count, inset };
        Ok(self)
    }

    /// Place one jittered site per cell of a `rows × columns` grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the grid is empty or `jitter` is outside `[0, 1]`
    pub fn jittered_grid(mut self, rows: usize, columns: usize, jitter: f64) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "grid must have at least one row and column (got {} x {})",
                rows, columns
            )));
        }
        if !(0.0..=1.0).contains(&jitter) {
            return Err(VoronoiError::InvalidConfig(format!(
                "jitter must be within [0, 1] (got {})",
                jitter
            )));
        }
        self.layout = SiteLayout::JitteredGrid {
            rows,
            columns,
            jitter,
        };
        Ok(self)
    }

    /// Set the number of Lloyd relaxation iterations
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20 (excessive and impractical)
    pub fn lloyd_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > 20 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd iterations must be <= 20 (got {})",
                iterations
            )));
        }
        self.lloyd_iterations = iterations;
        Ok(self)
    }

    /// Set the convergence threshold for Lloyd relaxation
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative
    pub fn lloyd_convergence(mut self, threshold: f64) -> Result<Self> {
        if !(threshold >= 0.0) {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd convergence threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.lloyd_convergence = threshold;
        Ok(self)
    }

    /// Whether the generated result is tiled
    pub fn tiled(mut self, tiled: bool) -> Self {
        self.tiled = tiled;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, a random one is drawn.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a uniform layout's inset leaves no room
    /// inside the boundary
    pub fn build(self) -> Result<DiagramConfig> {
        if let SiteLayout::Uniform { inset, .. } = self.layout {
            let shorter = self.boundary.width.min(self.boundary.height);
            if 2.0 * inset >= shorter {
                return Err(VoronoiError::InvalidConfig(format!(
                    "inset {} leaves no room in a {} x {} boundary",
                    inset, self.boundary.width, self.boundary.height
                )));
            }
        }

        Ok(DiagramConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            boundary: self.boundary,
            layout: self.layout,
            lloyd_iterations: self.lloyd_iterations,
            lloyd_convergence: self.lloyd_convergence,
            tiled: self.tiled,
        })
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
