//! Example: Colour a tiled diagram
//!
//! Tiling wraps adjacency around the boundary, so the colouring stays
//! consistent when copies of the diagram are laid side by side.

use rust_voronoi_tiles::*;

const COLORS: usize = 7;

fn main() {
    println!("Tiled Colouring Example");
    println!("=======================\n");

    let config = DiagramConfigBuilder::new()
        .seed(7)
        .jittered_grid(8, 8, 0.9)
        .unwrap()
        .lloyd_iterations(2)
        .unwrap()
        .tiled(true)
        .build()
        .unwrap();

    let result = generate(&config).expect("Failed to generate diagram");
    println!(
        "{} cells, {} ghost cells across the boundary",
        result.cell_count(),
        result.ghosts().len()
    );

    let colors = color_cells(&result, COLORS, config.seed).expect("Failed to colour cells");

    let clashes = result
        .cells()
        .iter()
        .flat_map(|cell| cell.neighbors.iter().map(move |&n| (cell.id, n)))
        .filter(|&(a, b)| a < b && colors[a] == colors[b])
        .count();

    let mut histogram = [0usize; COLORS];
    for &c in &colors {
        histogram[c] += 1;
    }

    println!("\nColour usage:");
    for (color, count) in histogram.iter().enumerate() {
        println!("  {}: {}", color, count);
    }
    println!("Adjacent cells sharing a colour: {}", clashes);

    // Wrapped neighbors of a corner cell
    if let Some(corner) = result
        .cells()
        .iter()
        .find(|c| c.symmetric_children.len() >= 3)
    {
        println!(
            "\nCorner cell {} has {} ghosts and neighbors {:?}",
            corner.id,
            corner.symmetric_children.len(),
            corner.neighbors
        );
        let reach = result.find_cells_within_radius(corner.id, 2);
        println!("Cells within 2 hops: {}", reach.len());
    }
}
