// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The best-first search frontier.
//!
//! A binary min-heap over [`SearchNode`]s keyed by their lower bound, so
//! `pop` always hands out the most promising open node. The heap is
//! hand-rolled because bounds are floats: `std::collections::BinaryHeap`
//! requires `Ord`, and wrapping every node in an ordering adapter buys
//! nothing over the two small sift loops below.
//!
//! Bounds are never NaN (nodes with a NaN bound are pruned before they
//! reach the frontier), so the partial order is total on the values stored
//! here.

use crate::node::SearchNode;
use circuit_model::num::SolverFloat;

/// A priority queue over search nodes, ordered by ascending lower bound.
#[derive(Debug, Clone)]
pub struct Frontier<T> {
    nodes: Vec<SearchNode<T>>,
}

impl<T> Frontier<T>
where
    T: SolverFloat,
{
    /// Creates a frontier with preallocated storage for `capacity` nodes.
    ///
    /// The frontier grows beyond this capacity if needed; preallocation
    /// only moves the early allocation cost out of the search loop.
    ///
    /// # Panics
    ///
    /// This function will panic if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity > 0,
            "called `Frontier::with_capacity` with zero capacity"
        );
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// The number of open nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no open nodes remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The smallest bound on the frontier, if any node is open.
    #[inline]
    pub fn peek_bound(&self) -> Option<T> {
        self.nodes.first().map(SearchNode::bound)
    }

    /// Inserts a node, keeping the heap ordered.
    pub fn push(&mut self, node: SearchNode<T>) {
        self.nodes.push(node);
        self.sift_up(self.nodes.len() - 1);
    }

    /// Removes and returns the node with the smallest bound.
    pub fn pop(&mut self) -> Option<SearchNode<T>> {
        if self.nodes.is_empty() {
            return None;
        }
        let node = self.nodes.swap_remove(0);
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Some(node)
    }

    fn sift_up(&mut self, start: usize) {
        let mut current = start;
        while current != 0 {
            let parent = (current - 1) / 2;
            if self.nodes[current].bound() >= self.nodes[parent].bound() {
                break;
            }
            self.nodes.swap(current, parent);
            current = parent;
        }
    }

    fn sift_down(&mut self, start: usize) {
        let len = self.nodes.len();
        let mut current = start;
        loop {
            let left = 2 * current + 1;
            if left >= len {
                break;
            }
            let mut next = left;
            let right = left + 1;
            if right < len && self.nodes[right].bound() < self.nodes[next].bound() {
                next = right;
            }
            if self.nodes[current].bound() <= self.nodes[next].bound() {
                break;
            }
            self.nodes.swap(current, next);
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frontier;
    use crate::node::SearchNode;
    use circuit_model::index::CityIndex;

    fn node_with_bound(bound: f64) -> SearchNode<f64> {
        let mut node = SearchNode::root(4).child(CityIndex::new(1), 1.0);
        node.set_bound(bound);
        node
    }

    #[test]
    fn test_pop_returns_nodes_in_ascending_bound_order() {
        let mut frontier = Frontier::with_capacity(8);
        for bound in [7.0, 3.0, 9.0, 1.0, 5.0, 2.0] {
            frontier.push(node_with_bound(bound));
        }

        let mut popped = Vec::new();
        while let Some(node) = frontier.pop() {
            popped.push(node.bound());
        }
        assert_eq!(popped, vec![1.0, 2.0, 3.0, 5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_peek_bound_tracks_the_minimum() {
        let mut frontier = Frontier::with_capacity(4);
        assert_eq!(frontier.peek_bound(), None);

        frontier.push(node_with_bound(4.0));
        frontier.push(node_with_bound(2.0));
        assert_eq!(frontier.peek_bound(), Some(2.0));

        frontier.pop();
        assert_eq!(frontier.peek_bound(), Some(4.0));
    }

    #[test]
    fn test_infinite_bounds_sort_last() {
        let mut frontier = Frontier::with_capacity(4);
        frontier.push(SearchNode::root(4)); // root bound is infinity
        frontier.push(node_with_bound(10.0));

        assert_eq!(frontier.pop().map(|n| n.bound()), Some(10.0));
        assert!(frontier.pop().map(|n| n.bound()).unwrap().is_infinite());
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let mut frontier = Frontier::with_capacity(1);
        for i in 0..32 {
            frontier.push(node_with_bound(f64::from(i)));
        }
        assert_eq!(frontier.len(), 32);
        assert_eq!(frontier.peek_bound(), Some(0.0));
    }

    #[test]
    fn test_pop_on_empty_returns_none() {
        let mut frontier = Frontier::<f64>::with_capacity(2);
        assert!(frontier.pop().is_none());
        assert!(frontier.is_empty());
        frontier.push(node_with_bound(1.0));
        assert!(!frontier.is_empty());
    }

    #[test]
    #[should_panic(expected = "zero capacity")]
    fn test_zero_capacity_is_rejected() {
        let _ = Frontier::<f64>::with_capacity(0);
    }
}
