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

//! # Circuit Model
//!
//! **The Core Domain Model for the Circuit Travelling-Salesman Solver.**
//!
//! This crate defines the fundamental data structures used to represent a
//! **Travelling Salesman Problem (TSP)** instance. It serves as the data
//! interchange layer between the problem definition (user input) and the
//! solving engine (`circuit_bnb`).
//!
//! ## Architecture
//!
//! * **`num`**: The `SolverFloat` trait alias bundling the floating-point
//!   capabilities the solver needs, plus constant traits for tuning values.
//! * **`index`**: A strongly-typed `CityIndex` wrapper to prevent logical
//!   indexing errors.
//! * **`matrix`**: The immutable `DistanceMatrix` (optimized for solving) and
//!   `DistanceMatrixBuilder` (mutable, optimized for configuration).
//! * **`loading`**: A text-format loader turning whitespace-delimited streams
//!   into a validated `DistanceMatrix`.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: City indices are a distinct type, not bare `usize`.
//! 2.  **Memory Layout**: Distances are stored as one flattened row-major
//!     vector to maximize cache locality during the branch-and-bound search.
//! 3.  **Fail-Fast**: Constructors validate inputs eagerly so the solver
//!     never encounters a malformed matrix.

pub mod index;
pub mod loading;
pub mod matrix;
pub mod num;
