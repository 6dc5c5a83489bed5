//! Graph colouring of cell adjacency
//!
//! Colours are small integers in `0..count`. Nodes are removed one at a time
//! by lowest remaining degree (ties broken at random), then coloured in
//! reverse removal order with a random colour none of their already coloured
//! neighbors use. A planar adjacency graph always has a node of degree five
//! or less, so six colours are enough for an untiled diagram; a tiled one
//! wraps around a torus and may need more. When a node's neighbors already
//! use every colour, it gets a random one.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, VoronoiError};
use crate::result::VoronoiResult;

/// Colour of every node in a graph
pub type ColorAssignment<T> = HashMap<T, usize>;

/// Undirected, unweighted graph to be coloured
#[derive(Debug, Clone)]
pub struct ColorGraph<T> {
    nodes: Vec<T>,
    index: HashMap<T, usize>,
    adjacency: Vec<HashSet<usize>>,
}

impl<T: Eq + Hash + Clone + Debug> ColorGraph<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
        }
    }

    /// Add a node. Does nothing if it already exists.
    pub fn add_node(&mut self, node: T) {
        if self.index.contains_key(&node) {
            return;
        }
        self.index.insert(node.clone(), self.nodes.len());
        self.nodes.push(node);
        self.adjacency.push(HashSet::new());
    }

    /// Add an edge between two existing nodes
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` if either end was never added.
    pub fn add_edge(&mut self, from: &T, to: &T) -> Result<()> {
        let a = self.lookup(from)?;
        let b = self.lookup(to)?;
        if a != b {
            self.adjacency[a].insert(b);
            self.adjacency[b].insert(a);
        }
        Ok(())
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges at `node`, or `None` if it is unknown
    pub fn degree(&self, node: &T) -> Option<usize> {
        self.index.get(node).map(|&i| self.adjacency[i].len())
    }

    /// Colour every node with one of `count` colours
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count` is zero and the graph is not empty.
    pub fn color_graph<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<ColorAssignment<T>> {
        if self.nodes.is_empty() {
            return Ok(HashMap::new());
        }
        if count == 0 {
            return Err(VoronoiError::InvalidConfig(
                "colour count must be at least 1".to_string(),
            ));
        }

        let order = self.elimination_order(rng);

        let mut colors: Vec<Option<usize>> = vec![None; self.nodes.len()];
        for &node in order.iter().rev() {
            let used: HashSet<usize> = self.adjacency[node]
                .iter()
                .filter_map(|&other| colors[other])
                .collect();
            let free: Vec<usize> = (0..count).filter(|c| !used.contains(c)).collect();
            let color = match free.choose(rng) {
                Some(&color) => color,
                None => rng.gen_range(0..count),
            };
            colors[node] = Some(color);
        }

        Ok(self
            .nodes
            .iter()
            .zip(colors)
            .filter_map(|(node, color)| color.map(|c| (node.clone(), c)))
            .collect())
    }

    /// Repeatedly remove a node of lowest remaining degree
    fn elimination_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let n = self.nodes.len();
        let mut degree: Vec<usize> = self.adjacency.iter().map(HashSet::len).collect();
        let mut removed = vec![false; n];
        let mut order = Vec::with_capacity(n);

        for _ in 0..n {
            let lowest = (0..n)
                .filter(|&i| !removed[i])
                .map(|i| degree[i])
                .min()
                .unwrap_or(0);
            let candidates: Vec<usize> = (0..n)
                .filter(|&i| !removed[i] && degree[i] == lowest)
                .collect();
            let Some(&node) = candidates.choose(rng) else {
                break;
            };

            removed[node] = true;
            order.push(node);
            for &other in &self.adjacency[node] {
                if !removed[other] {
                    degree[other] -= 1;
                }
            }
        }
        order
    }

    fn lookup(&self, node: &T) -> Result<usize> {
        self.index
            .get(node)
            .copied()
            .ok_or_else(|| VoronoiError::UnknownNode(format!("{:?}", node)))
    }
}

impl<T: Eq + Hash + Clone + Debug> Default for ColorGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Colour the cells of a result so that neighbors differ where possible
///
/// Returns one colour per cell, indexed by cell ID. Deterministic for a
/// given seed.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_tiles::*;
///
/// let sites = vec![
///     Point::new(25.0, 25.0),
///     Point::new(75.0, 25.0),
///     Point::new(50.0, 75.0),
/// ];
/// let result = Diagram::new(sites, Size::new(100.0, 100.0)).unwrap().into_result();
/// let colors = color_cells(&result, 3, 42).unwrap();
///
/// assert_ne!(colors[0], colors[1]);
/// assert_ne!(colors[1], colors[2]);
/// assert_ne!(colors[0], colors[2]);
/// ```
pub fn color_cells(result: &VoronoiResult, count: usize, seed: u32) -> Result<Vec<usize>> {
    let mut graph = ColorGraph::new();
    for cell in result.cells() {
        graph.add_node(cell.id);
    }
    for cell in result.cells() {
        for neighbor in &cell.neighbors {
            graph.add_edge(&cell.id, neighbor)?;
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let assignment = graph.color_graph(count, &mut rng)?;

    Ok(result
        .cells()
        .iter()
        .map(|cell| assignment.get(&cell.id).copied().unwrap_or(0))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagramConfigBuilder;
    use crate::generation::generate;

    fn assert_proper(result: &VoronoiResult, colors: &[usize]) {
        for cell in result.cells() {
            for &n in &cell.neighbors {
                assert_ne!(
                    colors[cell.id], colors[n],
                    "cells {} and {} share colour {}",
                    cell.id, n, colors[n]
                );
            }
        }
    }

    #[test]
    fn test_add_edge_unknown_node() {
        let mut graph = ColorGraph::new();
        graph.add_node("a");
        let err = graph.add_edge(&"a", &"b").unwrap_err();
        assert_eq!(err, VoronoiError::UnknownNode("\"b\"".to_string()));
    }

    #[test]
    fn test_duplicate_node_is_ignored() {
        let mut graph = ColorGraph::new();
        graph.add_node(1);
        graph.add_node(2);
        graph.add_edge(&1, &2).unwrap();
        graph.add_node(1);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.degree(&1), Some(1));
        assert_eq!(graph.degree(&3), None);
    }

    #[test]
    fn test_zero_colors_rejected() {
        let mut graph = ColorGraph::new();
        graph.add_node(0u32);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(graph.color_graph(0, &mut rng).is_err());

        let empty: ColorGraph<u32> = ColorGraph::new();
        assert!(empty.color_graph(0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_complete_graph_needs_all_colors() {
        let mut graph = ColorGraph::new();
        for i in 0..4 {
            graph.add_node(i);
        }
        for i in 0..4 {
            for j in (i + 1)..4 {
                graph.add_edge(&i, &j).unwrap();
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let colors = graph.color_graph(4, &mut rng).unwrap();
        let distinct: HashSet<usize> = colors.values().copied().collect();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn test_planar_diagram_six_colors() {
        let config = DiagramConfigBuilder::new()
            .seed(17)
            .uniform(120, 0.0)
            .unwrap()
            .build()
            .unwrap();
        let result = generate(&config).unwrap();
        let colors = color_cells(&result, 6, 1).unwrap();
        assert_eq!(colors.len(), 120);
        assert!(colors.iter().all(|&c| c < 6));
        assert_proper(&result, &colors);
    }

    #[test]
    fn test_tiled_diagram_max_degree_plus_one() {
        let config = DiagramConfigBuilder::new()
            .seed(23)
            .jittered_grid(6, 6, 0.7)
            .unwrap()
            .tiled(true)
            .build()
            .unwrap();
        let result = generate(&config).unwrap();
        let max_degree = result.cells().iter().map(|c| c.neighbor_count()).max().unwrap();
        let colors = color_cells(&result, max_degree + 1, 2).unwrap();
        assert_proper(&result, &colors);
    }

    #[test]
    fn test_color_cells_is_deterministic() {
        let config = DiagramConfigBuilder::new().seed(4).build().unwrap();
        let result = generate(&config).unwrap();
        assert_eq!(
            color_cells(&result, 6, 9).unwrap(),
            color_cells(&result, 6, 9).unwrap()
        );
    }
}
