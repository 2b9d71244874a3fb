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

//! Lower bounds on tour completions.
//!
//! Any completion of a partial tour must connect every city that does not
//! yet have two incident tour edges, so a minimum spanning tree over those
//! open cities is a valid lower bound on the remaining length.
//!
//! The one-tree strategy sharpens that bound with a Lagrangian refinement:
//! cities whose tree degree deviates from 2 get a penalty added to their
//! row and column of a scratch copy of the distance matrix, pulling the
//! spanning tree towards tour-like shapes. Every tour has degree exactly 2
//! at every city, so the penalty mass cancels along any tour and the
//! refined tree length remains a valid bound while typically being much
//! tighter than the plain spanning tree.
//!
//! The estimator owns per-worker scratch buffers (a matrix copy, a degree
//! vector, and the Prim queue), so bound computations allocate nothing
//! after construction.

use crate::prim_queue::{PrimEntry, PrimQueue};
use circuit_model::{index::CityIndex, matrix::DistanceMatrix, num::SolverFloat};

/// The number of penalty refinement rounds of the one-tree bound.
const PENALTY_ROUNDS: usize = 25;

/// The lower-bound strategy used when scoring child nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LowerBoundStrategy {
    /// Lagrangian-refined one-tree bound. Slower per node, but prunes far
    /// more of the tree.
    #[default]
    OneTree,
    /// Plain minimum-spanning-tree bound over the open cities.
    SpanningTree,
}

impl std::fmt::Display for LowerBoundStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneTree => write!(f, "OneTree"),
            Self::SpanningTree => write!(f, "SpanningTree"),
        }
    }
}

/// Computes the minimum spanning tree over the open cities (those whose
/// entry in `degrees` is not 2), returning its total edge weight.
///
/// The tree is rooted at the first open city. When `update_degrees` is
/// set, every tree edge increments the degree of both endpoints, leaving
/// `degrees` holding combined tour-plus-tree degrees for the penalty step.
/// Open cities unreachable from the root keep their infinite connection
/// weight, which propagates into the returned total.
///
/// `distances` is a flattened row-major matrix with stride `num_cities`.
pub fn minimum_spanning_tree<T>(
    queue: &mut PrimQueue<T>,
    distances: &[T],
    degrees: &mut [u32],
    num_cities: usize,
    update_degrees: bool,
) -> T
where
    T: SolverFloat,
{
    debug_assert_eq!(
        distances.len(),
        num_cities * num_cities,
        "called `minimum_spanning_tree` with mismatched matrix size"
    );
    debug_assert_eq!(
        degrees.len(),
        num_cities,
        "called `minimum_spanning_tree` with mismatched degree vector"
    );

    queue.reset();

    // The first open city seeds the tree; the rest start unreached.
    let mut seeded = false;
    for city in 0..num_cities {
        if degrees[city] == 2 {
            continue;
        }
        queue.push(PrimEntry {
            city: CityIndex::new(city),
            weight: if seeded { T::infinity() } else { T::zero() },
            parent: None,
        });
        seeded = true;
    }

    if !seeded {
        return T::zero();
    }

    let mut total_weight = T::zero();
    while let Some(entry) = queue.pop_min() {
        total_weight = total_weight + entry.weight;

        if update_degrees {
            if let Some(parent) = entry.parent {
                degrees[parent.get()] += 1;
                degrees[entry.city.get()] += 1;
            }
        }

        // Relax every edge leaving the freshly attached city.
        let row = entry.city.get() * num_cities;
        for other in 0..num_cities {
            queue.decrease(CityIndex::new(other), distances[row + other], entry.city);
        }
    }

    total_weight
}

/// A reusable estimator computing lower bounds on tour completions.
///
/// One estimator belongs to one worker thread; its scratch buffers are
/// overwritten on every call.
#[derive(Debug, Clone)]
pub struct BoundEstimator<T> {
    strategy: LowerBoundStrategy,
    queue: PrimQueue<T>,
    scratch_distances: Vec<T>,
    scratch_degrees: Vec<u32>,
    num_cities: usize,
}

impl<T> BoundEstimator<T>
where
    T: SolverFloat,
{
    /// Creates an estimator for instances with the given number of cities.
    ///
    /// # Panics
    ///
    /// This function will panic if `num_cities` is zero.
    pub fn new(num_cities: usize, strategy: LowerBoundStrategy) -> Self {
        Self {
            strategy,
            queue: PrimQueue::new(num_cities),
            scratch_distances: vec![T::zero(); num_cities * num_cities],
            scratch_degrees: vec![0u32; num_cities],
            num_cities,
        }
    }

    /// The strategy this estimator applies.
    #[inline]
    pub fn strategy(&self) -> LowerBoundStrategy {
        self.strategy
    }

    /// Computes a lower bound on the length still needed to complete a
    /// partial tour with the given per-city edge degrees.
    ///
    /// Returns zero when every city already has two incident edges (the
    /// tour is closed, nothing remains). The caller adds the committed
    /// tour length to obtain the node bound.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if the matrix size does
    /// not match the estimator.
    pub fn completion_bound(&mut self, matrix: &DistanceMatrix<T>, degrees: &[u8]) -> T {
        debug_assert_eq!(
            matrix.num_cities(),
            self.num_cities,
            "called `BoundEstimator::completion_bound` with mismatched matrix size"
        );
        debug_assert_eq!(
            degrees.len(),
            self.num_cities,
            "called `BoundEstimator::completion_bound` with mismatched degree vector"
        );

        if degrees.iter().all(|&degree| degree == 2) {
            return T::zero();
        }

        match self.strategy {
            LowerBoundStrategy::SpanningTree => self.spanning_tree_bound(matrix, degrees),
            LowerBoundStrategy::OneTree => self.one_tree_bound(matrix, degrees),
        }
    }

    fn spanning_tree_bound(&mut self, matrix: &DistanceMatrix<T>, degrees: &[u8]) -> T {
        self.load_degrees(degrees);
        minimum_spanning_tree(
            &mut self.queue,
            matrix.entries(),
            &mut self.scratch_degrees,
            self.num_cities,
            false,
        )
    }

    /// The Lagrangian one-tree refinement.
    ///
    /// Starting from the plain spanning tree, each round adds a penalty of
    /// `weight_factor * (degree - 2)` to the row and column of every city
    /// and recomputes the tree on the perturbed matrix, decaying the weight
    /// factor between rounds. The correction term tracks the penalty mass
    /// a degree-2 tour would pick up in the final round, which keeps the
    /// returned value a valid lower bound.
    fn one_tree_bound(&mut self, matrix: &DistanceMatrix<T>, degrees: &[u8]) -> T {
        let n = self.num_cities;
        let two = T::from_count(2);

        self.scratch_distances.copy_from_slice(matrix.entries());
        self.load_degrees(degrees);

        let mut tree_weight = minimum_spanning_tree(
            &mut self.queue,
            &self.scratch_distances,
            &mut self.scratch_degrees,
            n,
            true,
        );

        // Seed the penalty scale with the mean tree edge weight.
        let mut weight_factor = (tree_weight / T::from_count(n)).max(T::one());
        let mut correction = T::zero();

        for _ in 0..PENALTY_ROUNDS {
            correction = T::zero();

            for city in 0..n {
                let degree = T::from_count(self.scratch_degrees[city] as usize);
                let penalty = weight_factor * (degree - two);

                let row = city * n;
                for other in 0..n {
                    self.scratch_distances[row + other] += penalty;
                }
                for other in 0..n {
                    self.scratch_distances[other * n + city] += penalty;
                }

                correction += two * penalty;
            }

            self.load_degrees(degrees);
            tree_weight = minimum_spanning_tree(
                &mut self.queue,
                &self.scratch_distances,
                &mut self.scratch_degrees,
                n,
                true,
            );
            weight_factor = weight_factor * T::PENALTY_DECAY;
        }

        tree_weight + correction
    }

    #[inline]
    fn load_degrees(&mut self, degrees: &[u8]) {
        for (scratch, &degree) in self.scratch_degrees.iter_mut().zip(degrees) {
            *scratch = u32::from(degree);
        }
    }
}
