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

//! Search nodes representing partial tours.
//!
//! A node records where the tour currently stands (its position), how much
//! distance has been committed so far, how many moves have been made, and
//! the number of tour edges incident to each city. The degree vector is the
//! compact visited-set representation the bound estimator works on: a city
//! with degree 2 is fully routed, the current position and the start city
//! sit at degree 1 while the tour is open, and unvisited cities are at
//! degree 0.

use circuit_model::{index::CityIndex, num::SolverFloat};

/// The city every tour starts from and returns to.
///
/// Fixing the start city loses no generality for a closed tour and removes
/// a factor `n` of symmetric duplicates from the search tree.
pub const START_CITY: CityIndex = CityIndex::new(0);

/// A node of the branch-and-bound search tree: a partial tour anchored at
/// [`START_CITY`].
///
/// `depth` counts committed moves, so a node with `depth == num_cities` has
/// closed the cycle back to the start and represents a complete tour.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode<T> {
    position: CityIndex,
    tour_length: T,
    bound: T,
    depth: usize,
    edge_degrees: Box<[u8]>,
}

impl<T> SearchNode<T>
where
    T: SolverFloat,
{
    /// Creates the root node: an empty tour sitting at [`START_CITY`].
    ///
    /// The root bound is infinity. It is never compared against the
    /// incumbent before expansion, and an infinite bound keeps it ordered
    /// behind every bounded child if it ever shares the frontier with one.
    pub fn root(num_cities: usize) -> Self {
        Self {
            position: START_CITY,
            tour_length: T::zero(),
            bound: T::infinity(),
            depth: 0,
            edge_degrees: vec![0u8; num_cities].into_boxed_slice(),
        }
    }

    /// Creates the child node obtained by moving to `next` over an edge of
    /// the given length.
    ///
    /// The child's bound starts at infinity; the caller is expected to
    /// tighten it with [`SearchNode::set_bound`] before queueing the node.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if `next` is out of bounds
    /// or already has two incident edges.
    pub fn child(&self, next: CityIndex, edge_length: T) -> Self {
        debug_assert!(
            next.get() < self.edge_degrees.len(),
            "called `SearchNode::child` with city index out of bounds: the len is {} but the index is {}",
            self.edge_degrees.len(),
            next.get()
        );
        debug_assert!(
            self.edge_degrees[next.get()] < 2,
            "called `SearchNode::child` with fully routed city: {}",
            next
        );

        let mut edge_degrees = self.edge_degrees.clone();
        edge_degrees[self.position.get()] += 1;
        edge_degrees[next.get()] += 1;

        Self {
            position: next,
            tour_length: self.tour_length + edge_length,
            bound: T::infinity(),
            depth: self.depth + 1,
            edge_degrees,
        }
    }

    /// Installs the lower bound computed for this node.
    #[inline]
    pub fn set_bound(&mut self, bound: T) {
        self.bound = bound;
    }

    /// The city the partial tour currently ends at.
    #[inline]
    pub fn position(&self) -> CityIndex {
        self.position
    }

    /// The total length of the committed tour edges.
    #[inline]
    pub fn tour_length(&self) -> T {
        self.tour_length
    }

    /// The lower bound on any tour completing this node.
    #[inline]
    pub fn bound(&self) -> T {
        self.bound
    }

    /// The number of committed moves.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The number of tour edges incident to each city (0, 1 or 2).
    #[inline]
    pub fn edge_degrees(&self) -> &[u8] {
        &self.edge_degrees
    }

    /// Returns `true` once the node has closed the cycle back to the start.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.depth == self.edge_degrees.len()
    }
}

impl<T> std::fmt::Display for SearchNode<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchNode(position: {}, depth: {}, tour_length: {}, bound: {})",
            self.position, self.depth, self.tour_length, self.bound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{SearchNode, START_CITY};
    use circuit_model::index::CityIndex;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    #[test]
    fn test_root_is_empty_tour_at_start() {
        let root = SearchNode::<f64>::root(4);
        assert_eq!(root.position(), START_CITY);
        assert_eq!(root.tour_length(), 0.0);
        assert_eq!(root.depth(), 0);
        assert!(root.bound().is_infinite());
        assert_eq!(root.edge_degrees(), &[0, 0, 0, 0]);
        assert!(!root.is_complete());
    }

    #[test]
    fn test_child_updates_degrees_and_length() {
        let root = SearchNode::<f64>::root(4);
        let child = root.child(ci(2), 5.0);

        assert_eq!(child.position(), ci(2));
        assert_eq!(child.depth(), 1);
        assert_eq!(child.tour_length(), 5.0);
        assert_eq!(child.edge_degrees(), &[1, 0, 1, 0]);
        // Parent is untouched.
        assert_eq!(root.edge_degrees(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_closing_the_cycle_completes_the_node() {
        let root = SearchNode::<f64>::root(3);
        let tour = root
            .child(ci(1), 1.0)
            .child(ci(2), 4.0)
            .child(START_CITY, 2.0);

        assert_eq!(tour.depth(), 3);
        assert!(tour.is_complete());
        assert_eq!(tour.tour_length(), 7.0);
        assert_eq!(tour.edge_degrees(), &[2, 2, 2]);
    }

    #[test]
    fn test_set_bound_replaces_the_sentinel() {
        let mut node = SearchNode::<f64>::root(3).child(ci(1), 1.0);
        assert!(node.bound().is_infinite());
        node.set_bound(6.5);
        assert_eq!(node.bound(), 6.5);
    }

    #[test]
    #[should_panic(expected = "fully routed city")]
    fn test_child_rejects_fully_routed_city() {
        let root = SearchNode::<f64>::root(3);
        let node = root.child(ci(1), 1.0).child(ci(2), 1.0);
        // City 1 already has two incident edges.
        let _ = node.child(ci(1), 1.0);
    }
}
