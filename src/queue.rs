//! Binary heap over a caller-supplied comparator
//!
//! `std::collections::BinaryHeap` needs a total `Ord` on the element type;
//! sweep events only have an epsilon-tolerant ordering, so the heap here is
//! driven by a plain comparison function instead.

use std::cmp::Ordering;

/// Comparison function used to order queue elements
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// A priority queue backed by an implicit binary heap
///
/// With `ascending` set, `pop` returns the smallest element according to the
/// comparator; otherwise the largest. Elements with equal keys are all kept.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    heap: Vec<T>,
    ascending: bool,
    order: Comparator<T>,
}

impl<T> PriorityQueue<T> {
    pub fn new(ascending: bool, order: Comparator<T>) -> Self {
        Self {
            heap: Vec::new(),
            ascending,
            order,
        }
    }

    /// Create a queue pre-filled with `items`
    pub fn from_items(items: Vec<T>, ascending: bool, order: Comparator<T>) -> Self {
        let mut queue = Self {
            heap: items,
            ascending,
            order,
        };
        for i in (0..queue.heap.len() / 2).rev() {
            queue.sift_down(i);
        }
        queue
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn push(&mut self, item: T) {
        self.heap.push(item);
        self.sift_up(self.heap.len() - 1);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let top = self.heap.pop();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        top
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Whether `a` must leave the queue before `b`
    #[inline]
    fn before(&self, a: &T, b: &T) -> bool {
        let ord = (self.order)(a, b);
        if self.ascending {
            ord == Ordering::Less
        } else {
            ord == Ordering::Greater
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.before(&self.heap[index], &self.heap[parent]) {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut best = index;
            if left < len && self.before(&self.heap[left], &self.heap[best]) {
                best = left;
            }
            if right < len && self.before(&self.heap[right], &self.heap[best]) {
                best = right;
            }
            if best == index {
                break;
            }
            self.heap.swap(index, best);
            index = best;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_value(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    #[test]
    fn test_ascending_order() {
        let mut queue = PriorityQueue::new(true, by_value);
        for v in [5, 1, 4, 1, 3, 9, 2] {
            queue.push(v);
        }
        assert_eq!(queue.len(), 7);
        assert_eq!(queue.peek(), Some(&1));

        let mut out = Vec::new();
        while let Some(v) = queue.pop() {
            out.push(v);
        }
        assert_eq!(out, vec![1, 1, 2, 3, 4, 5, 9]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_descending_order() {
        let mut queue = PriorityQueue::from_items(vec![3, 7, 1, 8], false, by_value);
        assert_eq!(queue.pop(), Some(8));
        assert_eq!(queue.pop(), Some(7));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_clear() {
        let mut queue = PriorityQueue::new(true, by_value);
        queue.push(1);
        queue.push(2);
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.peek().is_none());
    }
}
