//! Comparison engine for Dark Matcher.
//!
//! ## Design Principles
//!
//! The engine is designed for:
//!
//! 1. **At-most-once**: a comparison is reconstructed once per comparison id
//! 2. **Earliest completion**: it is reconstructed by the insert that first
//!    reaches the threshold, whatever the delivery order
//! 3. **Idempotence**: duplicate deliveries never count toward the threshold
//! 4. **Synchronous Execution**: no async; callers on any number of threads
//!    serialize on one write lock
//!
//! ## Example
//!
//! ```
//! use dark_matcher::engine::ComparisonBuilder;
//! use dark_matcher::shamir::Prime;
//! use dark_matcher::types::{ComparisonFragment, Order, OrderId, Side};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let prime = Prime::reference();
//! let mut rng = ChaCha8Rng::seed_from_u64(5);
//! let buys = Order::new(OrderId::digest(b"buy"), Side::Buy, 1, 2, 10, 1000, 100)
//!     .split(3, 2, &prime, &mut rng)
//!     .unwrap();
//! let sells = Order::new(OrderId::digest(b"sell"), Side::Sell, 1, 2, 10, 1000, 100)
//!     .split(3, 2, &prime, &mut rng)
//!     .unwrap();
//!
//! let builder = ComparisonBuilder::new(2, prime.clone());
//! let first = ComparisonFragment::combine(&buys[0], &sells[0], &prime).unwrap();
//! let second = ComparisonFragment::combine(&buys[1], &sells[1], &prime).unwrap();
//!
//! assert!(builder.insert_comparison_fragment(first).unwrap().is_none());
//! let comparison = builder.insert_comparison_fragment(second).unwrap().unwrap();
//! assert!(comparison.is_match(&prime));
//! ```

pub mod builder;

pub use builder::{BuildOutcome, ComparisonBuilder, Rejection};
