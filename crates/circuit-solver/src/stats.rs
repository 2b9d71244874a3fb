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

use circuit_bnb::stats::BnbWorkerStatistics;

/// Statistics aggregated over a whole solve: the merged per-worker
/// counters plus run-level numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Nodes expanded across all workers.
    pub nodes_expanded: u64,
    /// Child nodes generated across all workers.
    pub children_generated: u64,
    /// Children pruned against the incumbent.
    pub prunings_bound: u64,
    /// Stale frontier pops.
    pub prunings_stale: u64,
    /// Incumbent improvements.
    pub solutions_found: u64,
    /// The deepest node any worker expanded.
    pub max_depth: u64,
    /// Node expansions counted against the iteration cap.
    pub iterations: u64,
    /// Number of worker threads used.
    pub used_threads: usize,
    /// Total duration of the solving process.
    pub solve_duration: std::time::Duration,
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Statistics:")?;
        writeln!(f, "  Nodes Expanded:      {}", self.nodes_expanded)?;
        writeln!(f, "  Children Generated:  {}", self.children_generated)?;
        writeln!(f, "  Prunings (bound):    {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (stale):    {}", self.prunings_stale)?;
        writeln!(f, "  Solutions Found:     {}", self.solutions_found)?;
        writeln!(f, "  Max Depth:           {}", self.max_depth)?;
        writeln!(f, "  Iterations:          {}", self.iterations)?;
        writeln!(f, "  Used Threads:        {}", self.used_threads)?;
        writeln!(
            f,
            "  Solve Duration (s):  {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

/// Builder for [`SolverStatistics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatisticsBuilder {
    nodes_expanded: u64,
    children_generated: u64,
    prunings_bound: u64,
    prunings_stale: u64,
    solutions_found: u64,
    max_depth: u64,
    iterations: u64,
    used_threads: usize,
    solve_duration: std::time::Duration,
}

impl Default for SolverStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverStatisticsBuilder {
    /// Creates a builder with all counters at zero.
    #[inline]
    pub fn new() -> Self {
        Self {
            nodes_expanded: 0,
            children_generated: 0,
            prunings_bound: 0,
            prunings_stale: 0,
            solutions_found: 0,
            max_depth: 0,
            iterations: 0,
            used_threads: 1,
            solve_duration: std::time::Duration::ZERO,
        }
    }

    /// Folds one worker's counters into the aggregate.
    #[inline]
    pub fn absorb_worker(mut self, worker: &BnbWorkerStatistics) -> Self {
        self.nodes_expanded = self.nodes_expanded.saturating_add(worker.nodes_expanded);
        self.children_generated = self
            .children_generated
            .saturating_add(worker.children_generated);
        self.prunings_bound = self.prunings_bound.saturating_add(worker.prunings_bound);
        self.prunings_stale = self.prunings_stale.saturating_add(worker.prunings_stale);
        self.solutions_found = self.solutions_found.saturating_add(worker.solutions_found);
        self.max_depth = self.max_depth.max(worker.max_depth);
        self
    }

    /// Sets the number of node expansions counted against the cap.
    #[inline]
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the number of worker threads used.
    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.used_threads = used_threads;
        self
    }

    /// Sets the total solve duration.
    #[inline]
    pub fn solve_duration(mut self, solve_duration: std::time::Duration) -> Self {
        self.solve_duration = solve_duration;
        self
    }

    /// Builds the `SolverStatistics` instance.
    #[inline]
    pub fn build(self) -> SolverStatistics {
        SolverStatistics {
            nodes_expanded: self.nodes_expanded,
            children_generated: self.children_generated,
            prunings_bound: self.prunings_bound,
            prunings_stale: self.prunings_stale,
            solutions_found: self.solutions_found,
            max_depth: self.max_depth,
            iterations: self.iterations,
            used_threads: self.used_threads,
            solve_duration: self.solve_duration,
        }
    }
}
