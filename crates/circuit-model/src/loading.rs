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

//! Problem instance loader for the travelling-salesman domain.
//!
//! This module turns whitespace-delimited text streams into a validated
//! `DistanceMatrix`. The expected format is:
//!
//! ```raw
//! n
//! d(0,0) d(0,1) ... d(0,n-1)
//! d(1,0) d(1,1) ... d(1,n-1)
//! ...
//! ```
//!
//! Tokens may be split across lines arbitrarily; `#` introduces a line
//! comment. Self-distances in the input are ignored (the diagonal is
//! forced to infinity), and `inf` is accepted for disconnected pairs.
//!
//! The parser accepts any `BufRead`, file path, or string slice, making it
//! convenient to integrate with benchmarks, tests, and tooling.

use crate::{
    matrix::{DistanceMatrix, DistanceMatrixError},
    num::SolverFloat,
};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

/// The error type for the matrix loading process.
#[derive(Debug)]
pub enum MatrixLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended before all expected tokens were read.
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The city count is invalid (must be > 0).
    InvalidDimensions,
    /// The parsed entries failed matrix validation.
    Matrix(DistanceMatrixError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "f64").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl std::fmt::Display for MatrixLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing instance"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidDimensions => {
                write!(f, "The city count must be a positive integer")
            }
            Self::Matrix(e) => write!(f, "Matrix validation error: {}", e),
        }
    }
}

impl std::error::Error for MatrixLoaderError {}

impl From<std::io::Error> for MatrixLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for MatrixLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<DistanceMatrixError> for MatrixLoaderError {
    fn from(e: DistanceMatrixError) -> Self {
        Self::Matrix(e)
    }
}

/// A loader for whitespace-delimited TSP distance-matrix instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixLoader;

impl MatrixLoader {
    /// Creates a new loader.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Loads a matrix from a file path.
    pub fn load_from_path<T, P>(&self, path: P) -> Result<DistanceMatrix<T>, MatrixLoaderError>
    where
        T: SolverFloat + FromStr,
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        self.load(BufReader::new(file))
    }

    /// Loads a matrix from a string slice.
    pub fn load_from_str<T>(&self, input: &str) -> Result<DistanceMatrix<T>, MatrixLoaderError>
    where
        T: SolverFloat + FromStr,
    {
        self.load(input.as_bytes())
    }

    /// Loads a matrix from any buffered reader.
    pub fn load<T, R>(&self, reader: R) -> Result<DistanceMatrix<T>, MatrixLoaderError>
    where
        T: SolverFloat + FromStr,
        R: BufRead,
    {
        let mut tokens = Tokenizer::new(reader);

        let num_cities: usize = tokens.next_parsed()?;
        if num_cities == 0 {
            return Err(MatrixLoaderError::InvalidDimensions);
        }

        let mut entries = Vec::with_capacity(num_cities * num_cities);
        for _ in 0..num_cities * num_cities {
            entries.push(tokens.next_parsed::<T>()?);
        }

        Ok(DistanceMatrix::from_row_major(num_cities, entries)?)
    }
}

/// Splits a buffered reader into whitespace-delimited tokens, skipping
/// `#` line comments.
struct Tokenizer<R> {
    reader: R,
    line: Vec<String>,
}

impl<R> Tokenizer<R>
where
    R: BufRead,
{
    fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
        }
    }

    /// Returns the next token, refilling from the reader as needed.
    fn next_token(&mut self) -> Result<String, MatrixLoaderError> {
        loop {
            if let Some(token) = self.line.pop() {
                return Ok(token);
            }

            let mut buffer = String::new();
            if self.reader.read_line(&mut buffer)? == 0 {
                return Err(MatrixLoaderError::UnexpectedEof);
            }

            let content = match buffer.split_once('#') {
                Some((before_comment, _)) => before_comment,
                None => buffer.as_str(),
            };

            // Reversed so `pop` hands tokens back in reading order.
            self.line
                .extend(content.split_whitespace().rev().map(str::to_owned));
        }
    }

    fn next_parsed<V>(&mut self) -> Result<V, MatrixLoaderError>
    where
        V: FromStr,
    {
        let token = self.next_token()?;
        token.parse::<V>().map_err(|_| {
            MatrixLoaderError::Parse(ParseTokenError {
                token,
                type_name: std::any::type_name::<V>(),
            })
        })
    }
}
