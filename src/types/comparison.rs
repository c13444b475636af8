//! Reconstructed comparisons and the match rule.
//!
//! ## Centered Representation
//!
//! Every reconstructed value is a difference computed in the prime field.
//! With `half = floor(p / 2)`, a value `v <= half` stands for the
//! non-negative integer `v`, and a value above `half` stands for the
//! negative integer `v - p`. Moving the cutoff changes which orders match.
//!
//! ## Match Rule
//!
//! A comparison is a match iff:
//! 1. both code differences are zero (same token pair),
//! 2. the price difference is non-negative (buy price >= sell price),
//! 3. both volume differences are non-negative (volume ranges overlap).

use num_bigint::BigUint;
use num_traits::Zero;

use crate::shamir::Prime;
use crate::types::ids::{ComparisonId, OrderId};

/// The match-decision values for one buy/sell order pair.
///
/// Produced at most once per [`ComparisonId`] by
/// [`crate::ComparisonBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub id: ComparisonId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,

    /// `buy.code1 - sell.code1`
    pub code_diff1: BigUint,
    /// `buy.code2 - sell.code2`
    pub code_diff2: BigUint,
    /// `buy.price - sell.price`
    pub price_diff: BigUint,
    /// `buy.max_volume - sell.min_volume`
    pub volume_diff1: BigUint,
    /// `sell.max_volume - buy.min_volume`
    pub volume_diff2: BigUint,
}

/// Outcome of the match rule, criterion by criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchDecision {
    /// Both orders reference the same token pair
    pub tokens: bool,
    /// The buyer pays at least the seller's price
    pub price: bool,
    /// The volume ranges overlap
    pub volume: bool,
}

impl MatchDecision {
    /// Whether every criterion holds
    #[inline]
    pub fn is_match(&self) -> bool {
        self.tokens && self.price && self.volume
    }
}

/// Whether `value` represents a non-negative integer in the centered
/// representation of the field.
#[inline]
pub fn is_non_negative(value: &BigUint, half: &BigUint) -> bool {
    value <= half
}

impl Comparison {
    /// Evaluate the match rule against the field the values were
    /// reconstructed in.
    pub fn decide(&self, prime: &Prime) -> MatchDecision {
        let half = prime.half();
        MatchDecision {
            tokens: self.code_diff1.is_zero() && self.code_diff2.is_zero(),
            price: is_non_negative(&self.price_diff, &half),
            volume: is_non_negative(&self.volume_diff1, &half)
                && is_non_negative(&self.volume_diff2, &half),
        }
    }

    /// Shorthand for `decide(prime).is_match()`
    pub fn is_match(&self, prime: &Prime) -> bool {
        self.decide(prime).is_match()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Field element standing for the signed integer `v`
    fn signed(prime: &Prime, v: i64) -> BigUint {
        if v >= 0 {
            BigUint::from(v as u64)
        } else {
            prime.value() - BigUint::from(v.unsigned_abs())
        }
    }

    fn comparison(prime: &Prime, diffs: [i64; 5]) -> Comparison {
        let [c1, c2, p, v1, v2] = diffs.map(|v| signed(prime, v));
        Comparison {
            id: ComparisonId::default(),
            buy_order_id: OrderId::default(),
            sell_order_id: OrderId::default(),
            code_diff1: c1,
            code_diff2: c2,
            price_diff: p,
            volume_diff1: v1,
            volume_diff2: v2,
        }
    }

    #[test]
    fn test_exact_match() {
        let prime = Prime::reference();
        assert!(comparison(&prime, [0, 0, 0, 0, 0]).is_match(&prime));
        assert!(comparison(&prime, [0, 0, 2, 900, 900]).is_match(&prime));
    }

    #[test]
    fn test_negative_price_difference() {
        let prime = Prime::reference();
        let decision = comparison(&prime, [0, 0, -2, 900, 900]).decide(&prime);
        assert!(decision.tokens);
        assert!(!decision.price);
        assert!(decision.volume);
        assert!(!decision.is_match());
    }

    #[test]
    fn test_volume_must_overlap_both_ways() {
        let prime = Prime::reference();
        assert!(!comparison(&prime, [0, 0, 0, -900, 0]).is_match(&prime));
        assert!(!comparison(&prime, [0, 0, 0, 0, -1]).is_match(&prime));
    }

    #[test]
    fn test_token_mismatch() {
        let prime = Prime::reference();
        let decision = comparison(&prime, [1, 0, 5, 5, 5]).decide(&prime);
        assert!(!decision.tokens);
        assert!(!decision.is_match());
        assert!(!comparison(&prime, [0, -1, 5, 5, 5]).is_match(&prime));
    }

    #[test]
    fn test_centered_cutoff_is_half() {
        // p = 101, half = 50: 50 is non-negative, 51 stands for -50
        let prime = Prime::new(BigUint::from(101u32)).unwrap();
        let half = prime.half();
        assert!(is_non_negative(&BigUint::from(50u32), &half));
        assert!(!is_non_negative(&BigUint::from(51u32), &half));
        assert!(is_non_negative(&BigUint::zero(), &half));
        assert!(!is_non_negative(&BigUint::from(100u32), &half));
    }
}
