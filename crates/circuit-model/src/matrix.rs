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

//! The immutable distance matrix consumed by the solver, and its builder.
//!
//! Distances are stored row-major in one flattened vector. The diagonal is
//! forced to `infinity()` at construction time: a city is never "reachable
//! from itself", which lets the search engine treat self-edges and
//! disconnections uniformly without branching on special cases.
//!
//! Construction is fail-fast: `from_row_major` rejects malformed input
//! (wrong length, negative or NaN entries) with a typed error, so the
//! engine can assume every matrix it sees is well-formed.

use crate::{index::CityIndex, num::SolverFloat};

/// The error type for distance matrix validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistanceMatrixError {
    /// The matrix has no cities at all.
    ZeroCities,
    /// The flattened entry vector does not contain exactly `n * n` values.
    WrongEntryCount {
        /// The expected number of entries (`n * n`).
        expected: usize,
        /// The number of entries actually provided.
        actual: usize,
    },
    /// A distance entry is negative or NaN.
    InvalidDistance {
        /// The row of the offending entry.
        from: CityIndex,
        /// The column of the offending entry.
        to: CityIndex,
    },
}

impl std::fmt::Display for DistanceMatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroCities => write!(f, "the matrix must contain at least one city"),
            Self::WrongEntryCount { expected, actual } => write!(
                f,
                "expected {} distance entries but got {}",
                expected, actual
            ),
            Self::InvalidDistance { from, to } => write!(
                f,
                "distance from city {} to city {} is negative or NaN",
                from, to
            ),
        }
    }
}

impl std::error::Error for DistanceMatrixError {}

/// An immutable square matrix of pairwise city distances.
///
/// Self-distances (the diagonal) are always `infinity()`. Off-diagonal
/// entries are finite non-negative values, or `infinity()` for city pairs
/// with no direct connection. The matrix may be asymmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix<T> {
    num_cities: usize,
    entries: Vec<T>,
}

impl<T> DistanceMatrix<T>
where
    T: SolverFloat,
{
    /// Builds a matrix from a flattened row-major entry vector.
    ///
    /// The diagonal is overwritten with `infinity()` regardless of the
    /// provided values. Returns an error if `num_cities` is zero, if the
    /// entry count does not match `num_cities * num_cities`, or if any
    /// off-diagonal entry is negative or NaN.
    pub fn from_row_major(
        num_cities: usize,
        mut entries: Vec<T>,
    ) -> Result<Self, DistanceMatrixError> {
        if num_cities == 0 {
            return Err(DistanceMatrixError::ZeroCities);
        }

        let expected = num_cities * num_cities;
        if entries.len() != expected {
            return Err(DistanceMatrixError::WrongEntryCount {
                expected,
                actual: entries.len(),
            });
        }

        for from in 0..num_cities {
            for to in 0..num_cities {
                if from == to {
                    entries[from * num_cities + to] = T::infinity();
                    continue;
                }
                let value = entries[from * num_cities + to];
                if value.is_nan() || value < T::zero() {
                    return Err(DistanceMatrixError::InvalidDistance {
                        from: CityIndex::new(from),
                        to: CityIndex::new(to),
                    });
                }
            }
        }

        Ok(Self {
            num_cities,
            entries,
        })
    }

    /// Returns the number of cities in the instance.
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.num_cities
    }

    /// Returns the distance from one city to another.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if either index is out
    /// of bounds.
    #[inline]
    pub fn distance(&self, from: CityIndex, to: CityIndex) -> T {
        debug_assert!(
            from.get() < self.num_cities,
            "called `DistanceMatrix::distance` with from index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            from.get()
        );
        debug_assert!(
            to.get() < self.num_cities,
            "called `DistanceMatrix::distance` with to index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            to.get()
        );
        self.entries[from.get() * self.num_cities + to.get()]
    }

    /// Returns the flattened row-major entries.
    ///
    /// The bound estimator copies this slice into its per-worker scratch
    /// buffer before perturbing it.
    #[inline]
    pub fn entries(&self) -> &[T] {
        &self.entries
    }
}

impl<T> std::fmt::Display for DistanceMatrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DistanceMatrix(num_cities: {})", self.num_cities)
    }
}

/// A mutable builder for [`DistanceMatrix`].
///
/// All entries start out as `infinity()` (disconnected), so only the pairs
/// that are actually connected need to be set.
#[derive(Debug, Clone)]
pub struct DistanceMatrixBuilder<T> {
    num_cities: usize,
    entries: Vec<T>,
}

impl<T> DistanceMatrixBuilder<T>
where
    T: SolverFloat,
{
    /// Creates a builder for an instance with the given number of cities.
    #[inline]
    pub fn new(num_cities: usize) -> Self {
        Self {
            num_cities,
            entries: vec![T::infinity(); num_cities * num_cities],
        }
    }

    /// Sets the distance from one city to another.
    ///
    /// Setting a self-distance has no effect on the built matrix; the
    /// diagonal stays infinite.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if either index is out
    /// of bounds.
    #[inline]
    pub fn set_distance(&mut self, from: CityIndex, to: CityIndex, distance: T) -> &mut Self {
        debug_assert!(
            from.get() < self.num_cities,
            "called `DistanceMatrixBuilder::set_distance` with from index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            from.get()
        );
        debug_assert!(
            to.get() < self.num_cities,
            "called `DistanceMatrixBuilder::set_distance` with to index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            to.get()
        );
        self.entries[from.get() * self.num_cities + to.get()] = distance;
        self
    }

    /// Sets the distance in both directions, for symmetric instances.
    #[inline]
    pub fn set_symmetric_distance(
        &mut self,
        a: CityIndex,
        b: CityIndex,
        distance: T,
    ) -> &mut Self {
        self.set_distance(a, b, distance);
        self.set_distance(b, a, distance)
    }

    /// Builds the immutable matrix.
    ///
    /// # Panics
    ///
    /// This function will panic if the builder was created with zero
    /// cities or an entry set through it is negative or NaN; the builder
    /// is expected to be fed validated data.
    pub fn build(self) -> DistanceMatrix<T> {
        match DistanceMatrix::from_row_major(self.num_cities, self.entries) {
            Ok(matrix) => matrix,
            Err(e) => panic!("called `DistanceMatrixBuilder::build` with invalid entries: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DistanceMatrix, DistanceMatrixBuilder, DistanceMatrixError};
    use crate::index::CityIndex;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    #[test]
    fn test_from_row_major_forces_infinite_diagonal() {
        let entries: Vec<f64> = vec![
            0.0, 1.0, 2.0, //
            1.0, 0.0, 3.0, //
            2.0, 3.0, 0.0,
        ];
        let matrix = DistanceMatrix::from_row_major(3, entries).expect("valid matrix");

        for i in 0..3 {
            assert!(matrix.distance(ci(i), ci(i)).is_infinite());
        }
        assert_eq!(matrix.distance(ci(0), ci(1)), 1.0);
        assert_eq!(matrix.distance(ci(2), ci(1)), 3.0);
        assert_eq!(matrix.num_cities(), 3);
    }

    #[test]
    fn test_from_row_major_rejects_zero_cities() {
        let result = DistanceMatrix::<f64>::from_row_major(0, Vec::new());
        assert_eq!(result, Err(DistanceMatrixError::ZeroCities));
    }

    #[test]
    #[should_panic(expected = "at least one city")]
    fn test_builder_rejects_zero_cities() {
        let _ = DistanceMatrixBuilder::<f64>::new(0).build();
    }

    #[test]
    fn test_from_row_major_rejects_wrong_entry_count() {
        let result = DistanceMatrix::<f64>::from_row_major(3, vec![1.0; 8]);
        assert_eq!(
            result,
            Err(DistanceMatrixError::WrongEntryCount {
                expected: 9,
                actual: 8
            })
        );
    }

    #[test]
    fn test_from_row_major_rejects_negative_entries() {
        let entries = vec![
            0.0, 1.0, //
            -2.0, 0.0,
        ];
        let result = DistanceMatrix::from_row_major(2, entries);
        assert_eq!(
            result,
            Err(DistanceMatrixError::InvalidDistance {
                from: ci(1),
                to: ci(0)
            })
        );
    }

    #[test]
    fn test_from_row_major_rejects_nan_entries() {
        let entries = vec![
            0.0, f64::NAN, //
            1.0, 0.0,
        ];
        assert!(DistanceMatrix::from_row_major(2, entries).is_err());
    }

    #[test]
    fn test_from_row_major_accepts_infinite_disconnections() {
        let entries = vec![
            0.0, f64::INFINITY, //
            1.0, 0.0,
        ];
        let matrix = DistanceMatrix::from_row_major(2, entries).expect("valid matrix");
        assert!(matrix.distance(ci(0), ci(1)).is_infinite());
        assert_eq!(matrix.distance(ci(1), ci(0)), 1.0);
    }

    #[test]
    fn test_builder_defaults_to_disconnected() {
        let matrix = DistanceMatrixBuilder::<f64>::new(3).build();
        for from in 0..3 {
            for to in 0..3 {
                assert!(matrix.distance(ci(from), ci(to)).is_infinite());
            }
        }
    }

    #[test]
    fn test_builder_symmetric_distances() {
        let mut builder = DistanceMatrixBuilder::<f64>::new(3);
        builder.set_symmetric_distance(ci(0), ci(1), 4.0);
        builder.set_distance(ci(1), ci(2), 7.0);
        let matrix = builder.build();

        assert_eq!(matrix.distance(ci(0), ci(1)), 4.0);
        assert_eq!(matrix.distance(ci(1), ci(0)), 4.0);
        assert_eq!(matrix.distance(ci(1), ci(2)), 7.0);
        assert!(matrix.distance(ci(2), ci(1)).is_infinite());
    }

    #[test]
    fn test_display_reports_size() {
        let matrix = DistanceMatrixBuilder::<f64>::new(4).build();
        assert_eq!(format!("{}", matrix), "DistanceMatrix(num_cities: 4)");
    }
}
