//! Example: Generate a Voronoi diagram
//!
//! Demonstrates the basic usage of the generation pipeline.

use rust_voronoi_tiles::*;

fn main() {
    println!("Voronoi Diagram Generation Example");
    println!("==================================\n");

    // Create a configuration for a small diagram
    let config = DiagramConfigBuilder::new()
        .seed(42)
        .boundary(400.0, 300.0)
        .unwrap()
        .uniform(250, 0.0)
        .unwrap()
        .lloyd_iterations(5)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Boundary: {} x {}", config.boundary.width, config.boundary.height);
    println!("  Layout: {}", config.layout.name());
    println!("  Site Count: {}", config.site_count());
    println!("  Lloyd Iterations: {}", config.lloyd_iterations);
    println!();

    println!("Generating diagram...");
    let result = generate(&config).expect("Failed to generate diagram");
    println!(
        "Generated {} cells, {} edges, {} vertices\n",
        result.cell_count(),
        result.edges().len(),
        result.vertices().len()
    );

    // Analyze the generated cells
    let cells = result.cells();
    let total_neighbors: usize = cells.iter().map(|c| c.neighbor_count()).sum();
    let avg_neighbors = total_neighbors as f64 / cells.len() as f64;

    let total_vertices: usize = cells.iter().map(|c| c.vertex_count()).sum();
    let avg_vertices = total_vertices as f64 / cells.len() as f64;

    let border_cells = cells.iter().filter(|c| !c.boundary_sides().is_empty()).count();

    println!("Statistics:");
    println!("  Average neighbors per cell: {:.2}", avg_neighbors);
    println!("  Average vertices per cell: {:.2}", avg_vertices);
    println!("  Cells on the boundary: {}", border_cells);
    println!();

    // Show details for first few cells
    println!("Sample cells:");
    for cell in cells.iter().take(5) {
        println!(
            "  Cell {}: site=({:.2}, {:.2}), area={:.1}, neighbors={}, vertices={}",
            cell.id,
            cell.site.x,
            cell.site.y,
            cell.area(),
            cell.neighbor_count(),
            cell.vertex_count()
        );
    }

    let report = validate(&result);
    println!("\n{}", report);

    #[cfg(feature = "spatial-index")]
    {
        let probe = Point::new(200.0, 150.0);
        if let Some(id) = result.find_cell_at(probe) {
            println!("Cell at ({}, {}): {}", probe.x, probe.y, id);
        }
    }

    println!("\nGeneration complete!");
}
