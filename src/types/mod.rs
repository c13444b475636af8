//! Core data types for Dark Matcher
//!
//! ## Types
//!
//! - [`Order`] / [`OrderFragment`]: plaintext order terms and one node's share of them
//! - [`Side`]: Buy or Sell
//! - [`ComparisonFragment`]: one node's share of a buy/sell comparison
//! - [`Comparison`]: the reconstructed comparison and its [`MatchDecision`]
//! - Identifiers: 32-byte SHA-256 newtypes, see [`ids`]
//!
//! ## Fixed-Point Terms
//!
//! Prices and volumes are integers before they are shared. Decimal terms are
//! scaled by 10^8 (see [`fixed`]).

pub mod fixed;
pub mod ids;
mod order;
mod fragment;
mod comparison;
mod wire;

pub use comparison::{is_non_negative, Comparison, MatchDecision};
pub use fragment::{ComparisonFragment, Incompatibility};
pub use ids::{ComparisonFragmentId, ComparisonId, OrderFragmentId, OrderId};
pub use order::{Order, OrderFragment, Side};
pub use wire::MAX_ELEMENT_BYTES;
