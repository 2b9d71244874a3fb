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

//! # Parallel Tour Solver
//!
//! The high-level orchestrator: spawns a pool of search workers over one
//! shared frontier, waits for quiescence, and classifies the outcome.
//!
//! ## Behavior
//!
//! - Workers are spawned with `std::thread::scope`, so the distance matrix
//!   is borrowed for the duration of the solve with no `Arc` plumbing.
//! - Every worker runs the same branch-and-bound loop; work distribution
//!   is emergent, whichever worker asks first gets the most promising
//!   node.
//! - If the run ends naturally, a finite incumbent is the proven optimum
//!   and an infinite one proves no tour exists. If the iteration cap cut
//!   the run short, the incumbent (if any) is merely feasible and the
//!   outcome carries an `Aborted` reason.
//!
//! ## Usage
//!
//! ```rust
//! use circuit_model::matrix::DistanceMatrix;
//! use circuit_solver::solver::Solver;
//!
//! let matrix = DistanceMatrix::from_row_major(
//!     3,
//!     vec![
//!         0.0, 1.0, 2.0, //
//!         1.0, 0.0, 3.0, //
//!         2.0, 3.0, 0.0,
//!     ],
//! )
//! .unwrap();
//!
//! let solver = Solver::builder().num_workers(2).build();
//! let outcome = solver.solve(&matrix);
//! assert_eq!(outcome.tour_length(), Some(6.0));
//! ```

use crate::{
    result::{TerminationReason, TspSolverOutcome},
    stats::SolverStatisticsBuilder,
};
use circuit_bnb::{
    bnb::{BnbWorker, SharedSearchState},
    bound::LowerBoundStrategy,
};
use circuit_model::{matrix::DistanceMatrix, num::SolverFloat};
use std::sync::Mutex;

/// The default cap on node expansions before the search gives up.
const DEFAULT_ITERATION_CAP: u64 = 1_000_000_000;

/// The default preallocated frontier capacity.
const DEFAULT_FRONTIER_CAPACITY: usize = 10_000;

/// A parallel branch-and-bound solver returning the optimal tour length.
///
/// The solver is configuration only; all per-run state lives on the stack
/// of [`Solver::solve`], so one solver can be reused across instances and
/// threads.
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    num_workers: usize,
    iteration_cap: u64,
    frontier_capacity: usize,
    strategy: LowerBoundStrategy,
}

impl Default for Solver {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Solver {
    /// Returns a builder with default settings.
    #[inline]
    pub fn builder() -> SolverBuilder {
        SolverBuilder::new()
    }

    /// The number of worker threads a solve will use.
    #[inline]
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// The cap on node expansions.
    #[inline]
    pub fn iteration_cap(&self) -> u64 {
        self.iteration_cap
    }

    /// The lower-bound strategy workers apply.
    #[inline]
    pub fn strategy(&self) -> LowerBoundStrategy {
        self.strategy
    }

    /// Solves an instance to optimality (or until the iteration cap).
    pub fn solve<T>(&self, matrix: &DistanceMatrix<T>) -> TspSolverOutcome<T>
    where
        T: SolverFloat,
    {
        let start_time = std::time::Instant::now();

        let shared = Mutex::new(SharedSearchState::<T>::new(
            matrix.num_cities(),
            self.frontier_capacity,
        ));
        let strategy = self.strategy;
        let iteration_cap = self.iteration_cap;

        let mut worker_stats = Vec::with_capacity(self.num_workers);
        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.num_workers);
            for _ in 0..self.num_workers {
                let shared = &shared;
                handles.push(scope.spawn(move || {
                    BnbWorker::new(matrix, shared, strategy, iteration_cap).run()
                }));
            }
            for handle in handles {
                worker_stats.push(handle.join().expect("search worker thread panicked"));
            }
        });

        let state = shared
            .into_inner()
            .expect("a search worker panicked while holding the state lock");

        if state.iteration_cap_reached() {
            eprintln!(
                "circuit-solver: iteration cap reached after {} node expansions, result may be suboptimal",
                state.iterations()
            );
        }

        let statistics = worker_stats
            .iter()
            .fold(SolverStatisticsBuilder::new(), |builder, stats| {
                builder.absorb_worker(stats)
            })
            .iterations(state.iterations())
            .used_threads(self.num_workers)
            .solve_duration(start_time.elapsed())
            .build();

        let incumbent = state.incumbent();
        if state.iteration_cap_reached() {
            let reason = TerminationReason::Aborted("iteration cap reached".to_string());
            if incumbent.is_finite() {
                TspSolverOutcome::feasible(incumbent, reason, statistics)
            } else {
                TspSolverOutcome::unknown(reason, statistics)
            }
        } else if incumbent.is_finite() {
            TspSolverOutcome::optimal(incumbent, statistics)
        } else {
            TspSolverOutcome::infeasible(statistics)
        }
    }
}

/// Builder for [`Solver`].
#[derive(Debug, Clone)]
pub struct SolverBuilder {
    num_workers: Option<usize>,
    iteration_cap: u64,
    frontier_capacity: usize,
    strategy: LowerBoundStrategy,
}

impl Default for SolverBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBuilder {
    /// Creates a builder with default settings.
    #[inline]
    pub fn new() -> Self {
        Self {
            num_workers: None,
            iteration_cap: DEFAULT_ITERATION_CAP,
            frontier_capacity: DEFAULT_FRONTIER_CAPACITY,
            strategy: LowerBoundStrategy::default(),
        }
    }

    /// Sets the number of worker threads. Defaults to the available
    /// parallelism of the machine.
    ///
    /// # Panics
    ///
    /// This function will panic if `num_workers` is zero.
    #[inline]
    pub fn num_workers(mut self, num_workers: usize) -> Self {
        assert!(
            num_workers > 0,
            "called `SolverBuilder::num_workers` with zero workers"
        );
        self.num_workers = Some(num_workers);
        self
    }

    /// Sets the cap on node expansions.
    #[inline]
    pub fn iteration_cap(mut self, iteration_cap: u64) -> Self {
        self.iteration_cap = iteration_cap;
        self
    }

    /// Sets the preallocated frontier capacity.
    ///
    /// # Panics
    ///
    /// This function will panic if `frontier_capacity` is zero.
    #[inline]
    pub fn frontier_capacity(mut self, frontier_capacity: usize) -> Self {
        assert!(
            frontier_capacity > 0,
            "called `SolverBuilder::frontier_capacity` with zero capacity"
        );
        self.frontier_capacity = frontier_capacity;
        self
    }

    /// Sets the lower-bound strategy.
    #[inline]
    pub fn strategy(mut self, strategy: LowerBoundStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builds the solver.
    #[inline]
    pub fn build(self) -> Solver {
        let num_workers = self.num_workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|parallelism| parallelism.get())
                .unwrap_or(1)
        });
        Solver {
            num_workers,
            iteration_cap: self.iteration_cap,
            frontier_capacity: self.frontier_capacity,
            strategy: self.strategy,
        }
    }
}
