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

use circuit_bnb::bound::{BoundEstimator, LowerBoundStrategy};
use circuit_model::{
    index::CityIndex,
    matrix::{DistanceMatrix, DistanceMatrixBuilder},
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

/// Builds a random symmetric instance with edge lengths in [1, 100).
fn random_instance(num_cities: usize, seed: u64) -> DistanceMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = DistanceMatrixBuilder::<f64>::new(num_cities);
    for a in 0..num_cities {
        for b in (a + 1)..num_cities {
            builder.set_symmetric_distance(
                CityIndex::new(a),
                CityIndex::new(b),
                rng.gen_range(1.0..100.0),
            );
        }
    }
    builder.build()
}

fn bench_completion_bounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("completion_bound");

    for &num_cities in &[10usize, 20, 40] {
        let matrix = random_instance(num_cities, 0xc1c1);

        // Degree vector of a depth-1 child, the shape the search engine
        // scores most often.
        let mut degrees = vec![0u8; num_cities];
        degrees[0] = 1;
        degrees[1] = 1;

        for strategy in [LowerBoundStrategy::SpanningTree, LowerBoundStrategy::OneTree] {
            let mut estimator = BoundEstimator::new(num_cities, strategy);
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), num_cities),
                &num_cities,
                |b, _| {
                    b.iter(|| {
                        black_box(
                            estimator.completion_bound(black_box(&matrix), black_box(&degrees)),
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_completion_bounds);
criterion_main!(benches);
