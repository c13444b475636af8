//! Orders and order fragments.
//!
//! ## Orders
//!
//! An [`Order`] holds the plaintext terms of a trade: the token pair, a
//! limit price, and an acceptable volume range. It never leaves the party
//! that created it; only its fragments are distributed.
//!
//! ## Fragments
//!
//! [`Order::split`] shares each of the five confidential terms with the same
//! `(n, k)` threshold and groups the shares by index: fragment `i` carries
//! share `i` of every term and is sent to node `i`. A fragment on its own
//! reveals nothing about the order.

use num_bigint::BigUint;
use rand::Rng;

use crate::error::ShamirError;
use crate::shamir::{self, Prime, SecretShare};
use crate::types::fixed::to_fixed;
use crate::types::ids::{digest, OrderFragmentId, OrderId};

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
///
/// Represented as u8 when hashed:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order - pays the price token for the volume token
    #[default]
    Buy,
    /// Sell order - the opposite role
    Sell,
}

impl Side {
    /// Convert to u8 for hashing and encoding
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }
}

// ============================================================================
// Order
// ============================================================================

/// Plaintext order terms.
///
/// Token codes, price and volumes are non-negative integers; decimal terms
/// go through the fixed-point encoding first (see [`Order::from_decimal`]).
/// Differences between two orders must stay below half the field modulus for
/// the match rule to classify them correctly, which any `u64` term does for
/// the reference prime.
///
/// ## Example
///
/// ```
/// use dark_matcher::shamir::Prime;
/// use dark_matcher::types::{Order, OrderId, Side};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let order = Order::new(OrderId::digest(b"order-1"), Side::Buy, 1, 2, 10, 1000, 100);
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let fragments = order.split(8, 6, &Prime::reference(), &mut rng).unwrap();
///
/// assert_eq!(fragments.len(), 8);
/// assert_eq!(fragments[3].index(), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Order identity shared by every fragment
    pub id: OrderId,

    /// Buy or Sell
    pub side: Side,

    /// First token of the traded pair
    pub code1: u64,

    /// Second token of the traded pair
    pub code2: u64,

    /// Limit price: the most a buyer pays, the least a seller accepts
    pub price: u64,

    /// Largest volume the order will trade
    pub max_volume: u64,

    /// Smallest volume the order will trade
    pub min_volume: u64,
}

impl Order {
    /// Create an order from integer terms
    pub fn new(
        id: OrderId,
        side: Side,
        code1: u64,
        code2: u64,
        price: u64,
        max_volume: u64,
        min_volume: u64,
    ) -> Self {
        Self {
            id,
            side,
            code1,
            code2,
            price,
            max_volume,
            min_volume,
        }
    }

    /// Create an order from decimal price and volume strings.
    ///
    /// Returns `None` if any term is not representable in fixed-point.
    pub fn from_decimal(
        id: OrderId,
        side: Side,
        codes: (u64, u64),
        price: &str,
        max_volume: &str,
        min_volume: &str,
    ) -> Option<Self> {
        Some(Self::new(
            id,
            side,
            codes.0,
            codes.1,
            to_fixed(price)?,
            to_fixed(max_volume)?,
            to_fixed(min_volume)?,
        ))
    }

    /// Split the order into `n` fragments, any `k` of which determine it.
    pub fn split<R: Rng + ?Sized>(
        &self,
        n: usize,
        k: usize,
        prime: &Prime,
        rng: &mut R,
    ) -> Result<Vec<OrderFragment>, ShamirError> {
        let [code1, code2, price, max_volume, min_volume] = [
            self.code1,
            self.code2,
            self.price,
            self.max_volume,
            self.min_volume,
        ]
        .map(|term| shamir::split(prime, n, k, &BigUint::from(term), &mut *rng));

        let fragments = code1?
            .into_iter()
            .zip(code2?)
            .zip(price?)
            .zip(max_volume?)
            .zip(min_volume?)
            .map(|((((code1, code2), price), max_volume), min_volume)| {
                OrderFragment::new(self.id, self.side, code1, code2, price, max_volume, min_volume)
            })
            .collect();

        Ok(fragments)
    }
}

// ============================================================================
// OrderFragment
// ============================================================================

/// One node's share of one order.
///
/// The fragment id is content addressed: it hashes the order id, the side
/// and every share, so two deliveries of the same fragment always carry the
/// same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFragment {
    /// Content-addressed fragment identity
    pub id: OrderFragmentId,

    /// Order this fragment belongs to
    pub order_id: OrderId,

    /// Side of the order
    pub side: Side,

    pub code1_share: SecretShare,
    pub code2_share: SecretShare,
    pub price_share: SecretShare,
    pub max_volume_share: SecretShare,
    pub min_volume_share: SecretShare,
}

impl OrderFragment {
    /// Assemble a fragment and derive its id
    pub fn new(
        order_id: OrderId,
        side: Side,
        code1_share: SecretShare,
        code2_share: SecretShare,
        price_share: SecretShare,
        max_volume_share: SecretShare,
        min_volume_share: SecretShare,
    ) -> Self {
        let mut fragment = Self {
            id: OrderFragmentId::default(),
            order_id,
            side,
            code1_share,
            code2_share,
            price_share,
            max_volume_share,
            min_volume_share,
        };
        fragment.id = fragment.compute_id();
        fragment
    }

    /// The five shares in a fixed order
    pub fn shares(&self) -> [&SecretShare; 5] {
        [
            &self.code1_share,
            &self.code2_share,
            &self.price_share,
            &self.max_volume_share,
            &self.min_volume_share,
        ]
    }

    /// Share index of this fragment, or `None` if its shares disagree.
    ///
    /// Two fragments can only be combined when they have the same index.
    pub fn index(&self) -> Option<u64> {
        let index = self.code1_share.index;
        self.shares()
            .iter()
            .all(|share| share.index == index)
            .then_some(index)
    }

    fn compute_id(&self) -> OrderFragmentId {
        let mut bytes = Vec::with_capacity(33 + 5 * 140);
        bytes.extend_from_slice(self.order_id.as_bytes());
        bytes.push(self.side.to_u8());
        for share in self.shares() {
            let value = share.value.to_bytes_be();
            bytes.extend_from_slice(&share.index.to_be_bytes());
            // Length prefix keeps the encoding unambiguous
            bytes.extend_from_slice(&(value.len() as u32).to_be_bytes());
            bytes.extend_from_slice(&value);
        }
        OrderFragmentId::from_bytes(digest(&[&bytes]))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_order(side: Side) -> Order {
        Order::new(OrderId::digest(b"sample"), side, 1, 2, 10, 1000, 100)
    }

    #[test]
    fn test_side_byte_in_fragment_id() {
        assert_eq!(Side::Buy.to_u8(), 0);
        assert_eq!(Side::Sell.to_u8(), 1);

        // Same shares on the other side hash to a different fragment
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let buy = sample_order(Side::Buy).split(3, 2, &Prime::reference(), &mut rng).unwrap();
        let f = buy[0].clone();
        let flipped = OrderFragment::new(
            f.order_id,
            Side::Sell,
            f.code1_share,
            f.code2_share,
            f.price_share,
            f.max_volume_share,
            f.min_volume_share,
        );
        assert_ne!(flipped.id, buy[0].id);
    }

    #[test]
    fn test_from_decimal() {
        let order = Order::from_decimal(
            OrderId::digest(b"dec"),
            Side::Sell,
            (1, 2),
            "10.5",
            "1000",
            "0.25",
        )
        .unwrap();
        assert_eq!(order.price, 1_050_000_000);
        assert_eq!(order.max_volume, 100_000_000_000);
        assert_eq!(order.min_volume, 25_000_000);

        assert!(Order::from_decimal(OrderId::default(), Side::Buy, (1, 2), "-1", "1", "1").is_none());
    }

    #[test]
    fn test_split_produces_indexed_fragments() {
        let order = sample_order(Side::Buy);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let fragments = order.split(8, 6, &Prime::reference(), &mut rng).unwrap();

        assert_eq!(fragments.len(), 8);
        for (i, fragment) in fragments.iter().enumerate() {
            assert_eq!(fragment.index(), Some(i as u64 + 1));
            assert_eq!(fragment.order_id, order.id);
            assert_eq!(fragment.side, Side::Buy);
        }
    }

    #[test]
    fn test_split_recovers_terms() {
        let prime = Prime::reference();
        let order = sample_order(Side::Sell);
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let fragments = order.split(5, 3, &prime, &mut rng).unwrap();

        let prices: Vec<SecretShare> = fragments.iter().map(|f| f.price_share.clone()).collect();
        assert_eq!(shamir::join(&prime, &prices[..3]).unwrap(), BigUint::from(10u64));

        let mins: Vec<SecretShare> = fragments.iter().map(|f| f.min_volume_share.clone()).collect();
        assert_eq!(shamir::join(&prime, &mins[2..]).unwrap(), BigUint::from(100u64));
    }

    #[test]
    fn test_split_rejects_bad_threshold() {
        let order = sample_order(Side::Buy);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        assert_eq!(
            order.split(3, 4, &Prime::reference(), &mut rng),
            Err(ShamirError::InvalidThreshold { k: 4, n: 3 })
        );
    }

    #[test]
    fn test_fragment_ids_are_content_addressed() {
        let order = sample_order(Side::Buy);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let fragments = order.split(4, 2, &Prime::reference(), &mut rng).unwrap();

        assert_ne!(fragments[0].id, fragments[1].id);
        let copy = fragments[0].clone();
        let rebuilt = OrderFragment::new(
            copy.order_id,
            copy.side,
            copy.code1_share,
            copy.code2_share,
            copy.price_share,
            copy.max_volume_share,
            copy.min_volume_share,
        );
        assert_eq!(rebuilt.id, fragments[0].id);
    }

    #[test]
    fn test_index_mismatch_within_fragment() {
        let share = |index| SecretShare::new(index, BigUint::from(1u32));
        let fragment = OrderFragment::new(
            OrderId::default(),
            Side::Buy,
            share(1),
            share(1),
            share(2),
            share(1),
            share(1),
        );
        assert_eq!(fragment.index(), None);
    }
}
