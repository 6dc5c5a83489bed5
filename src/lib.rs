//! Planar Voronoi diagrams via Fortune's sweep
//!
//! Computes the Voronoi diagram of a set of sites inside a rectangle,
//! reconstructs each cell as a polygon clipped to the rectangle, and can
//! tile the result so that adjacency wraps around the sides like a torus.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_voronoi_tiles::*;
//!
//! // Generate a diagram
//! let config = DiagramConfigBuilder::new()
//!     .seed(42)
//!     .boundary(200.0, 100.0).unwrap()
//!     .jittered_grid(5, 10, 0.8).unwrap()
//!     .lloyd_iterations(2).unwrap()
//!     .build().unwrap();
//!
//! let result = generate(&config).unwrap();
//!
//! for cell in result.cells() {
//!     let polygon = cell.make_vertex_loop();
//!     assert!(polygon.len() >= 3);
//! }
//!
//! // Or sweep your own sites
//! let diagram = Diagram::new(
//!     vec![Point::new(10.0, 10.0), Point::new(50.0, 60.0)],
//!     Size::new(100.0, 100.0),
//! ).unwrap();
//! assert_eq!(diagram.sweep().cell_count(), 2);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and plain data types

// Modules
pub mod error;
pub mod geometry;
pub mod queue;
mod sweep;
pub mod cell;
pub mod result;
pub mod diagram;
pub mod config;
pub mod generation;
pub mod coloring;
pub mod validation;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use geometry::{Point, PointExt, Size, Direction, Sides, Line, Circle, EPSILON};
pub use cell::{Cell, CellEdge};
pub use result::{VoronoiResult, DiagramEdge};
pub use diagram::Diagram;
pub use config::{DiagramConfig, DiagramConfigBuilder, SiteLayout};
pub use generation::{generate, generate_sites, LloydOptions};
pub use coloring::{ColorGraph, ColorAssignment, color_cells};
pub use validation::{validate, ValidationReport};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
