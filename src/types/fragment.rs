//! Comparison fragments: shares of the match-decision values.
//!
//! ## Construction
//!
//! Given a buy fragment `B` and a sell fragment `S` with the same share
//! index, every value below is a share subtraction modulo the field prime:
//!
//! | Value          | Shares                              | Reconstructs to              |
//! |----------------|-------------------------------------|------------------------------|
//! | `code_diff1`   | `B.code1 - S.code1`                 | 0 iff same first token       |
//! | `code_diff2`   | `B.code2 - S.code2`                 | 0 iff same second token      |
//! | `price_diff`   | `B.price - S.price`                 | non-negative iff buy >= sell |
//! | `volume_diff1` | `B.max_volume - S.min_volume`       | non-negative iff overlap     |
//! | `volume_diff2` | `S.max_volume - B.min_volume`       | non-negative iff overlap     |
//!
//! Linearity of the sharing makes each result a share of the difference of
//! the plaintext terms; no node learns the terms themselves.

use num_bigint::BigUint;

use crate::error::ShamirError;
use crate::shamir::{Prime, SecretShare};
use crate::types::ids::{ComparisonFragmentId, ComparisonId, OrderFragmentId, OrderId};
use crate::types::order::{OrderFragment, Side};

/// Why two order fragments cannot be combined.
///
/// Only the public metadata of the fragments is inspected. The matrix
/// discards this classification so callers cannot tell malformed input apart
/// from a valid pair that simply does not combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incompatibility {
    /// Both arguments are the same fragment
    SameFragment,
    /// Both fragments belong to the same order
    SameOrder,
    /// The first fragment is not a buy or the second is not a sell
    SideMismatch,
    /// Share indices differ between or within the fragments
    IndexMismatch,
    /// A share value is not reduced modulo the field prime
    Malformed,
}

/// One node's share of a [`crate::types::Comparison`].
///
/// Created exactly once per (buy fragment, sell fragment) pair and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonFragment {
    /// Derived from the two order fragment ids
    pub id: ComparisonFragmentId,

    /// Derived from the two order ids
    pub comparison_id: ComparisonId,

    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buy_fragment_id: OrderFragmentId,
    pub sell_fragment_id: OrderFragmentId,

    pub code_diff1: SecretShare,
    pub code_diff2: SecretShare,
    pub price_diff: SecretShare,
    pub volume_diff1: SecretShare,
    pub volume_diff2: SecretShare,
}

impl ComparisonFragment {
    /// Combine a buy fragment with a sell fragment.
    ///
    /// # Errors
    ///
    /// An [`Incompatibility`] when the pair fails the metadata checks.
    pub fn combine(buy: &OrderFragment, sell: &OrderFragment, prime: &Prime) -> Result<Self, Incompatibility> {
        if buy.id == sell.id {
            return Err(Incompatibility::SameFragment);
        }
        if buy.order_id == sell.order_id {
            return Err(Incompatibility::SameOrder);
        }
        if buy.side != Side::Buy || sell.side != Side::Sell {
            return Err(Incompatibility::SideMismatch);
        }
        match (buy.index(), sell.index()) {
            (Some(b), Some(s)) if b == s => {}
            _ => return Err(Incompatibility::IndexMismatch),
        }

        Self::subtract(buy, sell, prime).map_err(|err| match err {
            ShamirError::IndexMismatch { .. } => Incompatibility::IndexMismatch,
            _ => Incompatibility::Malformed,
        })
    }

    fn subtract(buy: &OrderFragment, sell: &OrderFragment, prime: &Prime) -> Result<Self, ShamirError> {
        Ok(Self {
            id: ComparisonFragmentId::from_fragments(&buy.id, &sell.id),
            comparison_id: ComparisonId::from_orders(&buy.order_id, &sell.order_id),
            buy_order_id: buy.order_id,
            sell_order_id: sell.order_id,
            buy_fragment_id: buy.id,
            sell_fragment_id: sell.id,
            code_diff1: buy.code1_share.sub_modulo(&sell.code1_share, prime)?,
            code_diff2: buy.code2_share.sub_modulo(&sell.code2_share, prime)?,
            price_diff: buy.price_share.sub_modulo(&sell.price_share, prime)?,
            volume_diff1: buy.max_volume_share.sub_modulo(&sell.min_volume_share, prime)?,
            volume_diff2: sell.max_volume_share.sub_modulo(&buy.min_volume_share, prime)?,
        })
    }

    /// Share index shared by all five values
    #[inline]
    pub fn index(&self) -> u64 {
        self.code_diff1.index
    }

    /// The five shares in a fixed order
    pub fn shares(&self) -> [&SecretShare; 5] {
        [
            &self.code_diff1,
            &self.code_diff2,
            &self.price_diff,
            &self.volume_diff1,
            &self.volume_diff2,
        ]
    }

    /// Values of the five shares in a fixed order
    pub(crate) fn values(&self) -> [&BigUint; 5] {
        self.shares().map(|share| &share.value)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
