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

//! # Solver Numeric Trait
//!
//! Unified numeric bounds for the search and bound-estimation components.
//! `SolverFloat` collects the floating-point capabilities required by the
//! solver into a single alias, simplifying generic signatures: IEEE-754
//! semantics (`Float`) for the infinity sentinels used throughout the search,
//! primitive conversions for counts, and thread-safety bounds for the
//! parallel worker pool.
//!
//! Distances are floating point because the search relies on `infinity()` as
//! the "unreachable" (self-distance) and "no incumbent yet" sentinel; the
//! usual implementors are `f32` and `f64`.

use num_traits::{Float, FromPrimitive};
use std::ops::AddAssign;

/// A trait for float types that carry the degree-penalty decay constant of
/// the Lagrangian 1-tree refinement schedule.
///
/// The value is an empirically tuned part of the relaxation schedule used
/// by the bound estimator.
pub trait PenaltyDecay {
    /// The multiplicative decay applied to the penalty weight factor after
    /// each refinement round.
    const PENALTY_DECAY: Self;
}

macro_rules! impl_penalty_decay_for {
    ($t:ty) => {
        impl PenaltyDecay for $t {
            const PENALTY_DECAY: Self = 0.9;
        }
    };
}

impl_penalty_decay_for!(f32);
impl_penalty_decay_for!(f64);

/// A trait alias for numeric types that can be used as distances in the
/// solver. These are usually `f32` and `f64`.
///
/// # Note
///
/// The solver leans on IEEE-754 infinity as a sentinel (self-distances,
/// the initial incumbent, fresh priority-queue entries), so integer types
/// are intentionally not supported.
pub trait SolverFloat:
    Float
    + FromPrimitive
    + AddAssign
    + PenaltyDecay
    + std::fmt::Debug
    + std::fmt::Display
    + Send
    + Sync
{
    /// Converts a count (number of cities, a vertex degree) into the
    /// distance type. Counts too large for the target type saturate to
    /// infinity rather than failing.
    #[inline]
    fn from_count(count: usize) -> Self {
        Self::from_usize(count).unwrap_or_else(Self::infinity)
    }
}

impl<T> SolverFloat for T where
    T: Float
        + FromPrimitive
        + AddAssign
        + PenaltyDecay
        + std::fmt::Debug
        + std::fmt::Display
        + Send
        + Sync
{
}

#[cfg(test)]
mod tests {
    use super::{PenaltyDecay, SolverFloat};

    #[test]
    fn test_penalty_decay_constants() {
        assert_eq!(<f64 as PenaltyDecay>::PENALTY_DECAY, 0.9f64);
        assert_eq!(<f32 as PenaltyDecay>::PENALTY_DECAY, 0.9f32);
    }

    #[test]
    fn test_from_count_exact_for_small_values() {
        assert_eq!(<f64 as SolverFloat>::from_count(0), 0.0);
        assert_eq!(<f64 as SolverFloat>::from_count(7), 7.0);
        assert_eq!(<f32 as SolverFloat>::from_count(42), 42.0f32);
    }
}
