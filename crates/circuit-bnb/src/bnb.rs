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

//! The parallel branch-and-bound engine.
//!
//! All cross-thread search state lives in one [`SharedSearchState`] behind
//! a single mutex: the frontier, the incumbent tour length, the count of
//! workers currently expanding a node, and the global iteration counter.
//! Workers hold the lock only for constant-time bookkeeping (claiming a
//! node, offering a child); the expensive bound computation happens outside
//! the lock on per-worker scratch buffers.
//!
//! Termination is by quiescence: a worker that finds the frontier empty
//! while another worker is still expanding must retry, because that
//! expansion may publish new children. Only an empty frontier with zero
//! active workers proves the search space is exhausted. A worker that pops
//! a node whose bound is no longer below the incumbent stops instead: the
//! frontier is bound-ordered, so every remaining node is at least as bad.

use crate::{
    bound::{BoundEstimator, LowerBoundStrategy},
    frontier::Frontier,
    node::{SearchNode, START_CITY},
    stats::BnbWorkerStatistics,
};
use circuit_model::{index::CityIndex, matrix::DistanceMatrix, num::SolverFloat};
use std::sync::Mutex;

/// What a worker gets back when asking for the next node to expand.
#[derive(Debug, Clone, PartialEq)]
pub enum Claim<T> {
    /// The most promising open node; the worker now counts as active.
    Expand(SearchNode<T>),
    /// The popped node's bound was overtaken by the incumbent. Everything
    /// still queued is at least as bad, so the worker should stop.
    Stale,
    /// The frontier is empty but another worker may still publish children;
    /// ask again.
    Retry,
    /// The frontier is empty and no worker is expanding: the search space
    /// is exhausted.
    Exhausted,
    /// The global iteration cap was hit; the search is cut short.
    CapReached,
}

/// What happened to a child offered to the shared state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChildDisposition<T> {
    /// The child was queued on the frontier.
    Queued,
    /// The child was a complete tour improving the incumbent; the new
    /// incumbent length is attached.
    Improved(T),
    /// The child's bound could not beat the incumbent.
    Pruned,
}

/// The mutex-protected state shared by all search workers.
#[derive(Debug)]
pub struct SharedSearchState<T> {
    frontier: Frontier<T>,
    incumbent: T,
    active_workers: usize,
    iterations: u64,
    iteration_cap_reached: bool,
}

impl<T> SharedSearchState<T>
where
    T: SolverFloat,
{
    /// Creates the shared state with the root node already queued and the
    /// incumbent at infinity.
    ///
    /// # Panics
    ///
    /// This function will panic if `frontier_capacity` is zero.
    pub fn new(num_cities: usize, frontier_capacity: usize) -> Self {
        let mut frontier = Frontier::with_capacity(frontier_capacity);
        frontier.push(SearchNode::root(num_cities));
        Self {
            frontier,
            incumbent: T::infinity(),
            active_workers: 0,
            iterations: 0,
            iteration_cap_reached: false,
        }
    }

    /// Hands out the next node to expand, or explains why none is
    /// available.
    ///
    /// On [`Claim::Expand`] the caller counts as active until it calls
    /// [`SharedSearchState::finish_expansion`].
    pub fn claim_next(&mut self, iteration_cap: u64) -> Claim<T> {
        if self.iteration_cap_reached {
            return Claim::CapReached;
        }
        if self.iterations >= iteration_cap {
            self.iteration_cap_reached = true;
            return Claim::CapReached;
        }

        match self.frontier.pop() {
            None => {
                if self.active_workers == 0 {
                    Claim::Exhausted
                } else {
                    Claim::Retry
                }
            }
            Some(node) => {
                if self.incumbent < node.bound() {
                    Claim::Stale
                } else {
                    self.active_workers += 1;
                    Claim::Expand(node)
                }
            }
        }
    }

    /// Offers a freshly bounded child to the search.
    ///
    /// Children whose bound is not strictly below the incumbent are
    /// dropped; this also covers NaN bounds from instances with
    /// unreachable cities. Complete tours tighten the incumbent instead of
    /// being queued.
    pub fn offer_child(&mut self, child: SearchNode<T>) -> ChildDisposition<T> {
        if child.bound() < self.incumbent {
            if child.is_complete() {
                self.incumbent = child.tour_length();
                ChildDisposition::Improved(self.incumbent)
            } else {
                self.frontier.push(child);
                ChildDisposition::Queued
            }
        } else {
            ChildDisposition::Pruned
        }
    }

    /// Marks one node expansion as finished, counting it towards the
    /// iteration cap.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if no expansion is in
    /// flight.
    pub fn finish_expansion(&mut self) {
        debug_assert!(
            self.active_workers > 0,
            "called `SharedSearchState::finish_expansion` with no active expansion"
        );
        self.active_workers -= 1;
        self.iterations = self.iterations.saturating_add(1);
    }

    /// The best complete tour length found so far (infinity if none).
    #[inline]
    pub fn incumbent(&self) -> T {
        self.incumbent
    }

    /// The number of node expansions performed so far.
    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Returns `true` if the search was cut short by the iteration cap.
    #[inline]
    pub fn iteration_cap_reached(&self) -> bool {
        self.iteration_cap_reached
    }

    /// The number of open nodes on the frontier.
    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
}

/// A single search worker: pops nodes from the shared frontier, branches
/// on them, and offers the bounded children back.
///
/// The worker owns its bound estimator, so everything between the two
/// short critical sections runs without synchronization.
pub struct BnbWorker<'a, T> {
    matrix: &'a DistanceMatrix<T>,
    shared: &'a Mutex<SharedSearchState<T>>,
    estimator: BoundEstimator<T>,
    iteration_cap: u64,
    stats: BnbWorkerStatistics,
}

impl<'a, T> BnbWorker<'a, T>
where
    T: SolverFloat,
{
    /// Creates a worker for the given instance and shared state.
    pub fn new(
        matrix: &'a DistanceMatrix<T>,
        shared: &'a Mutex<SharedSearchState<T>>,
        strategy: LowerBoundStrategy,
        iteration_cap: u64,
    ) -> Self {
        Self {
            matrix,
            shared,
            estimator: BoundEstimator::new(matrix.num_cities(), strategy),
            iteration_cap,
            stats: BnbWorkerStatistics::default(),
        }
    }

    /// Runs the worker loop to completion and returns the collected
    /// statistics.
    pub fn run(mut self) -> BnbWorkerStatistics {
        loop {
            let claim = self
                .shared
                .lock()
                .unwrap()
                .claim_next(self.iteration_cap);

            match claim {
                Claim::Expand(node) => self.expand(&node),
                Claim::Retry => std::thread::yield_now(),
                Claim::Stale => {
                    self.stats.on_pruning_stale();
                    break;
                }
                Claim::Exhausted | Claim::CapReached => break,
            }
        }
        self.stats
    }

    /// Branches on a claimed node, offering every admissible child to the
    /// shared state.
    fn expand(&mut self, node: &SearchNode<T>) {
        self.stats.on_node_expanded();
        self.stats.on_depth_update(node.depth() as u64);

        let num_cities = self.matrix.num_cities();
        // The closing move back to the start is only legal once every
        // other city has been visited.
        let closing_move = node.depth() == num_cities - 1;

        for next in 0..num_cities {
            let next = CityIndex::new(next);
            if next == node.position() || node.edge_degrees()[next.get()] == 2 {
                continue;
            }
            if next == START_CITY && !closing_move {
                continue;
            }
            self.branch(node, next);
        }

        self.shared.lock().unwrap().finish_expansion();
    }

    /// Builds, bounds, and offers the child reached by moving to `next`.
    fn branch(&mut self, node: &SearchNode<T>, next: CityIndex) {
        self.stats.on_child_generated();

        let edge = self.matrix.distance(node.position(), next);
        let mut child = node.child(next, edge);
        let completion = self
            .estimator
            .completion_bound(self.matrix, child.edge_degrees());
        child.set_bound(child.tour_length() + completion);

        match self.shared.lock().unwrap().offer_child(child) {
            ChildDisposition::Queued => {}
            ChildDisposition::Improved(_) => self.stats.on_solution_found(),
            ChildDisposition::Pruned => self.stats.on_pruning_bound(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BnbWorker, ChildDisposition, Claim, SharedSearchState};
    use crate::bound::LowerBoundStrategy;
    use crate::node::SearchNode;
    use circuit_model::{index::CityIndex, matrix::DistanceMatrix};
    use std::sync::Mutex;

    const NO_CAP: u64 = u64::MAX;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    /// Every tour through this instance costs 14.
    fn all_tours_cost_14() -> DistanceMatrix<f64> {
        DistanceMatrix::from_row_major(
            4,
            vec![
                0.0, 1.0, 2.0, 3.0, //
                1.0, 0.0, 4.0, 5.0, //
                2.0, 4.0, 0.0, 6.0, //
                3.0, 5.0, 6.0, 0.0,
            ],
        )
        .expect("valid matrix")
    }

    #[test]
    fn test_claim_hands_out_the_root_first() {
        let mut state = SharedSearchState::<f64>::new(4, 16);
        match state.claim_next(NO_CAP) {
            Claim::Expand(node) => {
                assert_eq!(node.depth(), 0);
                assert!(node.bound().is_infinite());
            }
            other => panic!("expected Expand, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_frontier_with_active_worker_means_retry() {
        let mut state = SharedSearchState::<f64>::new(4, 16);
        let _root = state.claim_next(NO_CAP); // frontier now empty, one active
        assert_eq!(state.claim_next(NO_CAP), Claim::Retry);

        state.finish_expansion();
        assert_eq!(state.claim_next(NO_CAP), Claim::Exhausted);
    }

    #[test]
    fn test_offer_child_prunes_against_the_incumbent() {
        let mut state = SharedSearchState::<f64>::new(3, 16);

        let mut open = SearchNode::root(3).child(ci(1), 1.0);
        open.set_bound(5.0);
        assert_eq!(state.offer_child(open), ChildDisposition::Queued);

        let mut tour = SearchNode::root(3)
            .child(ci(1), 1.0)
            .child(ci(2), 1.0)
            .child(ci(0), 1.0);
        tour.set_bound(3.0);
        assert_eq!(state.offer_child(tour), ChildDisposition::Improved(3.0));
        assert_eq!(state.incumbent(), 3.0);

        // Equal bound is not an improvement.
        let mut too_weak = SearchNode::root(3).child(ci(2), 2.0);
        too_weak.set_bound(3.0);
        assert_eq!(state.offer_child(too_weak), ChildDisposition::Pruned);
    }

    #[test]
    fn test_stale_nodes_terminate_the_claimant() {
        let mut state = SharedSearchState::<f64>::new(3, 16);
        let _root = state.claim_next(NO_CAP);

        let mut open = SearchNode::root(3).child(ci(1), 1.0);
        open.set_bound(5.0);
        state.offer_child(open);

        // A complete tour of length 3 overtakes the queued bound of 5.
        let mut tour = SearchNode::root(3)
            .child(ci(1), 1.0)
            .child(ci(2), 1.0)
            .child(ci(0), 1.0);
        tour.set_bound(3.0);
        state.offer_child(tour);

        state.finish_expansion();
        assert_eq!(state.claim_next(NO_CAP), Claim::Stale);
    }

    #[test]
    fn test_iteration_cap_is_sticky() {
        let mut state = SharedSearchState::<f64>::new(4, 16);
        match state.claim_next(1) {
            Claim::Expand(_) => {}
            other => panic!("expected Expand, got {:?}", other),
        }
        state.finish_expansion();

        assert_eq!(state.claim_next(1), Claim::CapReached);
        assert!(state.iteration_cap_reached());
        // Once tripped, the flag holds even for a larger cap.
        assert_eq!(state.claim_next(NO_CAP), Claim::CapReached);
    }

    #[test]
    fn test_single_worker_finds_the_optimal_tour() {
        let matrix = all_tours_cost_14();
        let shared = Mutex::new(SharedSearchState::<f64>::new(4, 16));

        let stats = BnbWorker::new(&matrix, &shared, LowerBoundStrategy::OneTree, NO_CAP).run();

        let state = shared.lock().unwrap();
        assert_eq!(state.incumbent(), 14.0);
        assert!(stats.nodes_expanded > 0);
        assert!(stats.solutions_found >= 1);
    }

    #[test]
    fn test_single_worker_with_spanning_tree_bound_agrees() {
        let matrix = all_tours_cost_14();
        let shared = Mutex::new(SharedSearchState::<f64>::new(4, 16));

        BnbWorker::new(&matrix, &shared, LowerBoundStrategy::SpanningTree, NO_CAP).run();
        assert_eq!(shared.lock().unwrap().incumbent(), 14.0);
    }

    #[test]
    fn test_single_city_instance_has_no_tour() {
        let matrix = DistanceMatrix::from_row_major(1, vec![0.0]).expect("valid matrix");
        let shared = Mutex::new(SharedSearchState::<f64>::new(1, 16));

        let stats = BnbWorker::new(&matrix, &shared, LowerBoundStrategy::OneTree, NO_CAP).run();

        let state = shared.lock().unwrap();
        assert!(state.incumbent().is_infinite());
        assert_eq!(stats.nodes_expanded, 1);
        assert_eq!(stats.children_generated, 0);
    }

    #[test]
    fn test_two_city_round_trip() {
        let matrix =
            DistanceMatrix::from_row_major(2, vec![0.0, 3.0, 4.0, 0.0]).expect("valid matrix");
        let shared = Mutex::new(SharedSearchState::<f64>::new(2, 16));

        BnbWorker::new(&matrix, &shared, LowerBoundStrategy::OneTree, NO_CAP).run();
        assert_eq!(shared.lock().unwrap().incumbent(), 7.0);
    }

    #[test]
    fn test_disconnected_instance_proves_infeasibility() {
        // Cities {0, 1} and {2} are mutually unreachable.
        let inf = f64::INFINITY;
        let matrix = DistanceMatrix::from_row_major(
            3,
            vec![
                0.0, 1.0, inf, //
                1.0, 0.0, inf, //
                inf, inf, 0.0,
            ],
        )
        .expect("valid matrix");
        let shared = Mutex::new(SharedSearchState::<f64>::new(3, 16));

        BnbWorker::new(&matrix, &shared, LowerBoundStrategy::OneTree, NO_CAP).run();

        let state = shared.lock().unwrap();
        assert!(state.incumbent().is_infinite());
        assert_eq!(state.frontier_len(), 0);
    }

    #[test]
    fn test_iteration_cap_stops_the_worker() {
        let matrix = all_tours_cost_14();
        let shared = Mutex::new(SharedSearchState::<f64>::new(4, 16));

        // One expansion allowed: the root is branched, then the cap trips.
        let stats = BnbWorker::new(&matrix, &shared, LowerBoundStrategy::OneTree, 1).run();

        let state = shared.lock().unwrap();
        assert!(state.iteration_cap_reached());
        assert_eq!(state.iterations(), 1);
        assert_eq!(stats.nodes_expanded, 1);
        assert!(state.incumbent().is_infinite());
    }
}
