//! The beach line as an arena-backed binary tree
//!
//! Leaves hold arcs in left-to-right order; every internal node has exactly
//! two children and stands for the breakpoint between the rightmost arc of
//! its left subtree and the leftmost arc of its right subtree.

use super::parabola::{breakpoint_x, Parabola};

pub(crate) type NodeId = usize;
pub(crate) type ArcId = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
enum NodeKind {
    Leaf(ArcId),
    Internal { left: NodeId, right: NodeId },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
}

#[derive(Debug, Default)]
pub(crate) struct BeachLine {
    nodes: Vec<Node>,
    arcs: Vec<Parabola>,
    root: Option<NodeId>,
    len: usize,
}

impl BeachLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of arcs currently on the beach line
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    pub fn arc(&self, id: ArcId) -> &Parabola {
        &self.arcs[id]
    }

    #[inline]
    pub fn arc_mut(&mut self, id: ArcId) -> &mut Parabola {
        &mut self.arcs[id]
    }

    /// Place the first arc. The beach line must be empty.
    pub fn insert_root(&mut self, arc: Parabola) -> ArcId {
        debug_assert!(self.root.is_none());
        let id = self.push_arc(arc);
        let node = self.push_leaf(id, None);
        self.root = Some(node);
        self.len = 1;
        id
    }

    /// Replace arc `id` by two arcs side by side
    pub fn split(&mut self, id: ArcId, left: Parabola, right: Parabola) -> (ArcId, ArcId) {
        let node = self.arcs[id].node;
        self.arcs[id].alive = false;

        let l = self.push_arc(left);
        let r = self.push_arc(right);
        let ln = self.push_leaf(l, Some(node));
        let rn = self.push_leaf(r, Some(node));
        self.nodes[node].kind = NodeKind::Internal { left: ln, right: rn };
        self.len += 1;
        (l, r)
    }

    /// Replace arc `id` by `left | middle | right`
    ///
    /// The leaf becomes an internal node whose right child is a fresh internal
    /// node over `middle` and `right`.
    pub fn split_three(
        &mut self,
        id: ArcId,
        left: Parabola,
        middle: Parabola,
        right: Parabola,
    ) -> (ArcId, ArcId, ArcId) {
        let node = self.arcs[id].node;
        self.arcs[id].alive = false;

        let l = self.push_arc(left);
        let m = self.push_arc(middle);
        let r = self.push_arc(right);

        let ln = self.push_leaf(l, Some(node));
        let dummy = self.nodes.len();
        self.nodes.push(Node {
            kind: NodeKind::Leaf(m),
            parent: Some(node),
        });
        let mn = self.push_leaf(m, Some(dummy));
        let rn = self.push_leaf(r, Some(dummy));
        self.nodes[dummy].kind = NodeKind::Internal { left: mn, right: rn };
        self.nodes[node].kind = NodeKind::Internal {
            left: ln,
            right: dummy,
        };
        self.len += 2;
        (l, m, r)
    }

    /// Squeeze arc `id` out of the tree, promoting its sibling
    pub fn remove(&mut self, id: ArcId) {
        let node = self.arcs[id].node;
        self.arcs[id].alive = false;
        self.len = self.len.saturating_sub(1);

        let Some(parent) = self.nodes[node].parent else {
            self.root = None;
            return;
        };
        let sibling = match self.nodes[parent].kind {
            NodeKind::Internal { left, right } => {
                if left == node {
                    right
                } else {
                    left
                }
            }
            NodeKind::Leaf(_) => return,
        };

        let grandparent = self.nodes[parent].parent;
        self.nodes[sibling].parent = grandparent;
        match grandparent {
            None => self.root = Some(sibling),
            Some(gp) => {
                if let NodeKind::Internal { left, right } = &mut self.nodes[gp].kind {
                    if *left == parent {
                        *left = sibling;
                    } else if *right == parent {
                        *right = sibling;
                    }
                }
            }
        }
    }

    /// Arc immediately left of `id`
    pub fn arc_to_left(&self, id: ArcId) -> Option<ArcId> {
        let parent = self.leftmost_parent(self.arcs[id].node)?;
        Some(self.nearest_left_child(parent))
    }

    /// Arc immediately right of `id`
    pub fn arc_to_right(&self, id: ArcId) -> Option<ArcId> {
        let parent = self.rightmost_parent(self.arcs[id].node)?;
        Some(self.nearest_right_child(parent))
    }

    /// Arc directly above `x` at the given sweep position
    pub fn find_arc_above(&self, x: f64, directrix: f64) -> Option<ArcId> {
        let mut node = self.root?;
        loop {
            match self.nodes[node].kind {
                NodeKind::Leaf(arc) => return Some(arc),
                NodeKind::Internal { left, right } => {
                    let l = &self.arcs[self.nearest_left_child(node)];
                    let r = &self.arcs[self.nearest_right_child(node)];
                    let bx = breakpoint_x(l.focus, r.focus, directrix).unwrap_or_else(|| {
                        tracing::warn!(
                            left = l.cell,
                            right = r.cell,
                            "breakpoint has no real solution, using focus midpoint"
                        );
                        (l.focus.x + r.focus.x) / 2.0
                    });
                    node = if x < bx { left } else { right };
                }
            }
        }
    }

    /// Arcs in left-to-right order
    #[cfg(test)]
    pub fn arcs(&self) -> Vec<ArcId> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut current = self.root;
        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                match self.nodes[node].kind {
                    NodeKind::Leaf(arc) => {
                        out.push(arc);
                        current = None;
                    }
                    NodeKind::Internal { left, .. } => {
                        stack.push(node);
                        current = Some(left);
                    }
                }
            }
            if let Some(node) = stack.pop() {
                if let NodeKind::Internal { right, .. } = self.nodes[node].kind {
                    current = Some(right);
                }
            }
        }
        out
    }

    /// Rightmost arc of the left subtree of an internal node
    fn nearest_left_child(&self, node: NodeId) -> ArcId {
        let mut current = match self.nodes[node].kind {
            NodeKind::Internal { left, .. } => left,
            NodeKind::Leaf(arc) => return arc,
        };
        loop {
            match self.nodes[current].kind {
                NodeKind::Leaf(arc) => return arc,
                NodeKind::Internal { right, .. } => current = right,
            }
        }
    }

    /// Leftmost arc of the right subtree of an internal node
    fn nearest_right_child(&self, node: NodeId) -> ArcId {
        let mut current = match self.nodes[node].kind {
            NodeKind::Internal { right, .. } => right,
            NodeKind::Leaf(arc) => return arc,
        };
        loop {
            match self.nodes[current].kind {
                NodeKind::Leaf(arc) => return arc,
                NodeKind::Internal { left, .. } => current = left,
            }
        }
    }

    /// First ancestor whose right subtree contains `node`
    fn leftmost_parent(&self, node: NodeId) -> Option<NodeId> {
        let mut current = node;
        while let Some(parent) = self.nodes[current].parent {
            match self.nodes[parent].kind {
                NodeKind::Internal { left, .. } if left == current => current = parent,
                _ => return Some(parent),
            }
        }
        None
    }

    /// First ancestor whose left subtree contains `node`
    fn rightmost_parent(&self, node: NodeId) -> Option<NodeId> {
        let mut current = node;
        while let Some(parent) = self.nodes[current].parent {
            match self.nodes[parent].kind {
                NodeKind::Internal { right, .. } if right == current => current = parent,
                _ => return Some(parent),
            }
        }
        None
    }

    fn push_arc(&mut self, arc: Parabola) -> ArcId {
        self.arcs.push(arc);
        self.arcs.len() - 1
    }

    fn push_leaf(&mut self, arc: ArcId, parent: Option<NodeId>) -> NodeId {
        let node = self.nodes.len();
        self.nodes.push(Node {
            kind: NodeKind::Leaf(arc),
            parent,
        });
        self.arcs[arc].node = node;
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn arc(cell: usize, x: f64, y: f64) -> Parabola {
        Parabola::new(cell, Point::new(x, y))
    }

    fn cells(beach: &BeachLine) -> Vec<usize> {
        beach.arcs().into_iter().map(|a| beach.arc(a).cell).collect()
    }

    #[test]
    fn test_split_three_order_and_neighbors() {
        let mut beach = BeachLine::new();
        let root = beach.insert_root(arc(0, 50.0, 10.0));
        let (l, m, r) = beach.split_three(
            root,
            arc(0, 50.0, 10.0),
            arc(1, 40.0, 30.0),
            arc(0, 50.0, 10.0),
        );

        assert_eq!(beach.len(), 3);
        assert_eq!(cells(&beach), vec![0, 1, 0]);
        assert!(!beach.arc(root).alive);
        assert_eq!(beach.arc_to_left(m), Some(l));
        assert_eq!(beach.arc_to_right(m), Some(r));
        assert_eq!(beach.arc_to_left(l), None);
        assert_eq!(beach.arc_to_right(r), None);
    }

    #[test]
    fn test_remove_promotes_sibling() {
        let mut beach = BeachLine::new();
        let root = beach.insert_root(arc(0, 50.0, 10.0));
        let (l, m, r) = beach.split_three(
            root,
            arc(0, 50.0, 10.0),
            arc(1, 40.0, 30.0),
            arc(0, 50.0, 10.0),
        );
        let (r1, r2) = beach.split(r, arc(0, 50.0, 10.0), arc(2, 70.0, 40.0));
        assert_eq!(cells(&beach), vec![0, 1, 0, 2]);

        beach.remove(r1);
        assert_eq!(beach.len(), 3);
        assert_eq!(cells(&beach), vec![0, 1, 2]);
        assert_eq!(beach.arc_to_right(m), Some(r2));
        assert_eq!(beach.arc_to_left(r2), Some(m));

        beach.remove(m);
        assert_eq!(cells(&beach), vec![0, 2]);
        assert_eq!(beach.arc_to_right(l), Some(r2));
    }

    #[test]
    fn test_find_arc_above() {
        let mut beach = BeachLine::new();
        let root = beach.insert_root(arc(0, 25.0, 25.0));
        let (a, b) = beach.split(root, arc(0, 25.0, 25.0), arc(1, 75.0, 25.0));

        assert_eq!(beach.find_arc_above(10.0, 25.0), Some(a));
        assert_eq!(beach.find_arc_above(60.0, 25.0), Some(b));
        assert_eq!(beach.find_arc_above(10.0, 60.0), Some(a));
        assert_eq!(beach.find_arc_above(90.0, 60.0), Some(b));
    }

    #[test]
    fn test_remove_last_arc_empties() {
        let mut beach = BeachLine::new();
        let root = beach.insert_root(arc(0, 1.0, 1.0));
        beach.remove(root);
        assert!(beach.is_empty());
        assert_eq!(beach.len(), 0);
        assert!(beach.find_arc_above(0.0, 5.0).is_none());
    }
}
