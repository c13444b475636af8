//! Benchmarks for the Dark Matcher pipeline.
//!
//! All benchmarks use the 1024-bit reference prime with `n = 8`, `k = 6`.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- reconstruction
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use dark_matcher::shamir::{self, Prime};
use dark_matcher::{
    ComparisonBuilder, ComparisonFragment, FragmentMatrix, Order, OrderFragment, OrderId, Side,
};

use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const N: usize = 8;
const K: usize = 6;

// ============================================================================
// HELPER FUNCTIONS - Deterministic fragment generation
// ============================================================================

fn make_order(i: u64, side: Side) -> Order {
    Order::new(OrderId::digest(&i.to_be_bytes()), side, 1, 2, 100 + i % 7, 1000, 100)
}

/// One node's fragments of `count` orders, alternating sides
fn node_fragments(count: usize, seed: u64) -> Vec<OrderFragment> {
    let prime = Prime::reference();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count as u64)
        .map(|i| {
            let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
            make_order(i, side).split(N, K, &prime, &mut rng).unwrap().remove(0)
        })
        .collect()
}

/// All `N` comparison fragments of one buy/sell pair
fn comparison_fragments(seed: u64) -> Vec<ComparisonFragment> {
    let prime = Prime::reference();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let buys = make_order(0, Side::Buy).split(N, K, &prime, &mut rng).unwrap();
    let sells = make_order(1, Side::Sell).split(N, K, &prime, &mut rng).unwrap();
    buys.iter()
        .zip(&sells)
        .map(|(b, s)| ComparisonFragment::combine(b, s, &prime).unwrap())
        .collect()
}

// ============================================================================
// BENCHMARK: Secret Sharing
// ============================================================================

fn bench_shamir(c: &mut Criterion) {
    let mut group = c.benchmark_group("shamir");
    let prime = Prime::reference();
    let secret = BigUint::from(123_456_789u64);

    group.bench_function("split_8_of_6", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        b.iter(|| black_box(shamir::split(&prime, N, K, &secret, &mut rng).unwrap()));
    });

    group.bench_function("join_6", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let shares = shamir::split(&prime, N, K, &secret, &mut rng).unwrap();
        b.iter(|| black_box(shamir::join(&prime, &shares[..K]).unwrap()));
    });

    group.bench_function("order_split", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let order = make_order(0, Side::Buy);
        b.iter(|| black_box(order.split(N, K, &prime, &mut rng).unwrap()));
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Fragment Matrix
// ============================================================================

fn bench_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for count in [50usize, 200] {
        let fragments = node_fragments(count, 42);
        let pairs = (count / 2) * (count / 2);
        group.throughput(Throughput::Elements(pairs as u64));

        group.bench_with_input(BenchmarkId::new("insert_all", count), &fragments, |b, fragments| {
            b.iter_batched(
                || fragments.clone(),
                |fragments| {
                    let matrix = FragmentMatrix::with_capacity(Prime::reference(), fragments.len());
                    let built: usize = fragments
                        .into_iter()
                        .map(|f| matrix.insert_order_fragment(f).len())
                        .sum();
                    black_box(built)
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Reconstruction
// ============================================================================

fn bench_reconstruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruction");
    let prime = Prime::reference();
    let fragments = comparison_fragments(7);

    group.bench_function("threshold_6", |b| {
        b.iter_batched(
            || fragments[..K].to_vec(),
            |fragments| {
                let builder = ComparisonBuilder::new(K, prime.clone());
                let comparison = fragments
                    .into_iter()
                    .find_map(|f| builder.insert_comparison_fragment(f).unwrap());
                black_box(comparison)
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("decide", |b| {
        let builder = ComparisonBuilder::new(K, prime.clone());
        let comparison = fragments
            .iter()
            .find_map(|f| builder.insert_comparison_fragment(f.clone()).unwrap())
            .unwrap();
        b.iter(|| black_box(comparison.decide(&prime)));
    });

    group.finish();
}

// ============================================================================
// CRITERION ENTRY POINT
// ============================================================================

criterion_group!(benches, bench_shamir, bench_matrix, bench_reconstruction);

criterion_main!(benches);
