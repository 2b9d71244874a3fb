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

//! # Circuit BnB
//!
//! **The Branch-and-Bound Search Engine of the Circuit Travelling-Salesman
//! Solver.**
//!
//! This crate implements a best-first branch-and-bound search over partial
//! tours. Nodes carry the partial tour length, the per-city edge degrees,
//! and a lower bound on any completion; a shared frontier hands out the
//! most promising node to whichever worker asks first.
//!
//! ## Architecture
//!
//! * **`node`**: The `SearchNode` representing a partial tour.
//! * **`frontier`**: A best-first priority queue over search nodes, ordered
//!   by their lower bounds.
//! * **`prim_queue`**: An indexed min-heap with decrease-key, driving Prim's
//!   algorithm inside the bound estimator.
//! * **`bound`**: The `BoundEstimator` computing spanning-tree and
//!   Lagrangian one-tree lower bounds on tour completions.
//! * **`bnb`**: The shared search state and the per-thread `BnbWorker`
//!   expansion loop.
//! * **`stats`**: Per-worker search statistics.
//!
//! ## Search Scheme
//!
//! The engine keeps a single incumbent, the length of the best complete
//! tour found so far (infinity until one is found). A child node is queued
//! only when its bound is strictly below the incumbent; nodes whose bound
//! has been overtaken by the time they are popped are resolved lazily at
//! the pop site. The search terminates when the frontier is exhausted and
//! no worker is still expanding, which proves optimality of the incumbent
//! (or infeasibility if none was ever installed).

pub mod bnb;
pub mod bound;
pub mod frontier;
pub mod node;
pub mod prim_queue;
pub mod stats;
