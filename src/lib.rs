//! # Dark Matcher
//!
//! Secret-shared order matching for a dark pool.
//!
//! ## Architecture
//!
//! Orders never exist in plaintext outside their owner. Each order is split
//! into Shamir shares, one fragment per matching node. Nodes combine the
//! fragments they hold pairwise and the results are reconstructed only once
//! enough nodes agree:
//!
//! - **Shamir**: Secret sharing over a 1024-bit prime field
//! - **Types**: Orders, fragments, comparisons and their identifiers
//! - **Matrix**: Pairs buy and sell fragments into comparison fragments
//! - **Engine**: Reconstructs each comparison once its threshold is reached
//!
//! ## Data Flow
//!
//! ```text
//! OrderFragment -> FragmentMatrix -> ComparisonFragment* -> (network)
//!     -> ComparisonBuilder -> Comparison (at most one per comparison id)
//!     -> match decision
//! ```
//!
//! ## Design Principles
//!
//! 1. **Silent incompatibility**: pairs that cannot combine produce nothing,
//!    never an error, so malformed and non-matching input look the same
//! 2. **Idempotence**: duplicate deliveries are no-ops
//! 3. **One lock per component**: matrix and builder never call each other

// ============================================================================
// Module declarations
// ============================================================================

/// Configuration: threshold parameters and field modulus
pub mod config;

/// Error types
pub mod error;

/// Secret sharing over a prime field
pub mod shamir;

/// Core data types: orders, fragments, comparisons
pub mod types;

/// Fragment matrix: pairwise combination of order fragments
pub mod matrix;

/// Comparison engine: threshold reconstruction
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::MatcherConfig;
pub use engine::{BuildOutcome, ComparisonBuilder, Rejection};
pub use error::{ConfigError, MatchError, ShamirError, WireError};
pub use matrix::FragmentMatrix;
pub use shamir::{Prime, SecretShare};
pub use types::{
    Comparison, ComparisonFragment, ComparisonFragmentId, ComparisonId, MatchDecision, Order,
    OrderFragment, OrderFragmentId, OrderId, Side,
};
