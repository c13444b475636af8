//! Error types for Dark Matcher.
//!
//! Only genuine faults are errors. Incompatible fragment pairs and
//! duplicate deliveries are resolved inside the matrix and the builder and
//! never surface here.

use thiserror::Error;

/// Faults raised by the secret sharing layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShamirError {
    /// Reconstruction was attempted with no shares at all
    #[error("cannot reconstruct a secret from zero shares")]
    EmptyShares,

    /// Index 0 would reveal the secret directly
    #[error("share index 0 is reserved for the secret")]
    ZeroIndex,

    /// Two shares with the same index were supplied to a join
    #[error("duplicate share index {0}")]
    DuplicateIndex(u64),

    /// Shares with different indices cannot be combined
    #[error("share index mismatch: {left} != {right}")]
    IndexMismatch { left: u64, right: u64 },

    /// Threshold must satisfy 1 <= k <= n
    #[error("invalid threshold: k={k}, n={n}")]
    InvalidThreshold { k: usize, n: usize },

    /// A secret or share value is not a field element
    #[error("value is not reduced modulo the field prime")]
    ValueOutOfRange,

    /// The modulus cannot be used as a prime field
    #[error("invalid modulus: {0}")]
    InvalidModulus(String),
}

/// Faults surfaced by [`crate::ComparisonBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Threshold reconstruction failed (corrupted shares, wrong modulus)
    #[error("threshold reconstruction failed: {0}")]
    Reconstruction(#[from] ShamirError),
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("threshold {threshold} must be between 1 and the party count {parties}")]
    InvalidThreshold { threshold: usize, parties: usize },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error(transparent)]
    Prime(#[from] ShamirError),
}

/// Errors encoding or decoding SSZ records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("ssz encoding failed: {0}")]
    Serialize(String),

    #[error("ssz decoding failed: {0}")]
    Deserialize(String),

    /// A field element does not fit the record's byte list
    #[error("field element of {len} bytes exceeds the {max} byte limit")]
    Oversize { len: usize, max: usize },
}
