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

use crate::stats::SolverStatistics;
use circuit_model::num::SolverFloat;

/// The qualified answer of a solve: what was found, and how strong the
/// claim is.
#[derive(Debug, Clone, PartialEq)]
pub enum TspSolverResult<T> {
    /// No closed tour exists through every city.
    Infeasible,
    /// The shortest tour length, with optimality proven.
    Optimal(T),
    /// A tour of this length exists, but the search was cut short before
    /// proving it optimal.
    Feasible(T),
    /// The search was cut short before finding any tour or proving
    /// infeasibility.
    Unknown,
}

impl<T> std::fmt::Display for TspSolverResult<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Infeasible => write!(f, "Infeasible"),
            Self::Optimal(length) => write!(f, "Optimal(tour_length={})", length),
            Self::Feasible(length) => write!(f, "Feasible(tour_length={})", length),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search space was exhausted with an incumbent in hand.
    OptimalityProven,
    /// The search space was exhausted without ever finding a tour.
    InfeasibilityProven,
    /// The search hit a limit. The string names it.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OptimalityProven => write!(f, "Optimality Proven"),
            Self::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            Self::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Everything a solve returns: result, termination reason, and the
/// aggregated statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct TspSolverOutcome<T> {
    result: TspSolverResult<T>,
    reason: TerminationReason,
    statistics: SolverStatistics,
}

impl<T> TspSolverOutcome<T>
where
    T: SolverFloat,
{
    /// An optimal tour length with proof of optimality.
    #[inline]
    pub fn optimal(tour_length: T, statistics: SolverStatistics) -> Self {
        Self {
            result: TspSolverResult::Optimal(tour_length),
            reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    /// A tour was found but the search was cut short.
    #[inline]
    pub fn feasible(tour_length: T, reason: TerminationReason, statistics: SolverStatistics) -> Self {
        Self {
            result: TspSolverResult::Feasible(tour_length),
            reason,
            statistics,
        }
    }

    /// No tour exists.
    #[inline]
    pub fn infeasible(statistics: SolverStatistics) -> Self {
        Self {
            result: TspSolverResult::Infeasible,
            reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    /// The search was cut short before learning anything.
    #[inline]
    pub fn unknown(reason: TerminationReason, statistics: SolverStatistics) -> Self {
        Self {
            result: TspSolverResult::Unknown,
            reason,
            statistics,
        }
    }

    /// The qualified result.
    #[inline]
    pub fn result(&self) -> &TspSolverResult<T> {
        &self.result
    }

    /// Why the search stopped.
    #[inline]
    pub fn reason(&self) -> &TerminationReason {
        &self.reason
    }

    /// The aggregated search statistics.
    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    /// The best tour length found, regardless of whether it was proven
    /// optimal.
    #[inline]
    pub fn tour_length(&self) -> Option<T> {
        match self.result {
            TspSolverResult::Optimal(length) | TspSolverResult::Feasible(length) => Some(length),
            TspSolverResult::Infeasible | TspSolverResult::Unknown => None,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, TspSolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, TspSolverResult::Infeasible)
    }
}

impl<T> std::fmt::Display for TspSolverOutcome<T>
where
    T: SolverFloat,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.result, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::{TerminationReason, TspSolverOutcome};
    use crate::stats::SolverStatisticsBuilder;

    #[test]
    fn test_tour_length_is_present_for_tours_only() {
        let stats = SolverStatisticsBuilder::new().build();

        let optimal = TspSolverOutcome::optimal(14.0, stats.clone());
        assert_eq!(optimal.tour_length(), Some(14.0));
        assert!(optimal.is_optimal());

        let feasible = TspSolverOutcome::feasible(
            20.0,
            TerminationReason::Aborted("iteration cap reached".to_string()),
            stats.clone(),
        );
        assert_eq!(feasible.tour_length(), Some(20.0));
        assert!(!feasible.is_optimal());

        let infeasible = TspSolverOutcome::<f64>::infeasible(stats.clone());
        assert_eq!(infeasible.tour_length(), None);
        assert!(infeasible.is_infeasible());

        let unknown = TspSolverOutcome::<f64>::unknown(
            TerminationReason::Aborted("iteration cap reached".to_string()),
            stats,
        );
        assert_eq!(unknown.tour_length(), None);
    }

    #[test]
    fn test_display_combines_result_and_reason() {
        let stats = SolverStatisticsBuilder::new().build();
        let outcome = TspSolverOutcome::optimal(7.5, stats);
        assert_eq!(
            format!("{}", outcome),
            "Optimal(tour_length=7.5) (Optimality Proven)"
        );
    }
}
