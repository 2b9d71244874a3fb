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

/// Statistics collected by a single search worker.
///
/// Each worker owns its instance; the solver merges them after the pool
/// joins, so no counter is ever contended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BnbWorkerStatistics {
    /// Nodes popped from the frontier and branched on.
    pub nodes_expanded: u64,
    /// Child nodes generated during branching (queued or not).
    pub children_generated: u64,
    /// Children discarded because their bound could not beat the incumbent.
    pub prunings_bound: u64,
    /// Nodes popped with a bound already overtaken by the incumbent.
    pub prunings_stale: u64,
    /// Complete tours that improved the incumbent.
    pub solutions_found: u64,
    /// The deepest node this worker expanded.
    pub max_depth: u64,
}

impl BnbWorkerStatistics {
    #[inline]
    pub fn on_node_expanded(&mut self) {
        self.nodes_expanded = self.nodes_expanded.saturating_add(1);
    }

    #[inline]
    pub fn on_child_generated(&mut self) {
        self.children_generated = self.children_generated.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_stale(&mut self) {
        self.prunings_stale = self.prunings_stale.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }
}

impl std::fmt::Display for BnbWorkerStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BnbWorkerStatistics(expanded: {}, children: {}, pruned_bound: {}, pruned_stale: {}, solutions: {}, max_depth: {})",
            self.nodes_expanded,
            self.children_generated,
            self.prunings_bound,
            self.prunings_stale,
            self.solutions_found,
            self.max_depth
        )
    }
}

#[cfg(test)]
mod tests {
    use super::BnbWorkerStatistics;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = BnbWorkerStatistics::default();
        stats.on_node_expanded();
        stats.on_node_expanded();
        stats.on_child_generated();
        stats.on_pruning_bound();
        stats.on_solution_found();
        stats.on_depth_update(3);
        stats.on_depth_update(1);

        assert_eq!(stats.nodes_expanded, 2);
        assert_eq!(stats.children_generated, 1);
        assert_eq!(stats.prunings_bound, 1);
        assert_eq!(stats.solutions_found, 1);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.prunings_stale, 0);
    }
}
