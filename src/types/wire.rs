//! SSZ records for comparison fragments and comparisons.
//!
//! ## Layout
//!
//! Identifiers are fixed 32-byte vectors. Field elements are big-endian
//! byte lists of at most [`MAX_ELEMENT_BYTES`] bytes, enough for a 2048-bit
//! modulus. Encoding the same value twice always yields identical bytes.
//!
//! The transport layer decides where these bytes go; this module only makes
//! the two value types portable.

use num_bigint::BigUint;
use ssz_rs::prelude::*;

use crate::error::WireError;
use crate::shamir::SecretShare;
use crate::types::comparison::Comparison;
use crate::types::fragment::ComparisonFragment;
use crate::types::ids::{ComparisonFragmentId, ComparisonId, OrderFragmentId, OrderId};

/// Largest encodable field element, in bytes
pub const MAX_ELEMENT_BYTES: usize = 256;

type Element = List<u8, MAX_ELEMENT_BYTES>;

fn encode_element(value: &BigUint) -> Result<Element, WireError> {
    let bytes = value.to_bytes_be();
    let len = bytes.len();
    if len > MAX_ELEMENT_BYTES {
        return Err(WireError::Oversize { len, max: MAX_ELEMENT_BYTES });
    }
    Element::try_from(bytes).map_err(|_| WireError::Oversize { len, max: MAX_ELEMENT_BYTES })
}

fn decode_element(element: &Element) -> BigUint {
    let bytes: Vec<u8> = element.iter().copied().collect();
    BigUint::from_bytes_be(&bytes)
}

#[derive(Debug, Clone, PartialEq, Default, SimpleSerialize)]
struct ShareRecord {
    index: u64,
    value: Element,
}

impl ShareRecord {
    fn encode(share: &SecretShare) -> Result<Self, WireError> {
        Ok(Self {
            index: share.index,
            value: encode_element(&share.value)?,
        })
    }

    fn decode(&self) -> SecretShare {
        SecretShare::new(self.index, decode_element(&self.value))
    }
}

#[derive(Debug, Clone, PartialEq, Default, SimpleSerialize)]
struct ComparisonFragmentRecord {
    id: [u8; 32],
    comparison_id: [u8; 32],
    buy_order_id: [u8; 32],
    sell_order_id: [u8; 32],
    buy_fragment_id: [u8; 32],
    sell_fragment_id: [u8; 32],
    code_diff1: ShareRecord,
    code_diff2: ShareRecord,
    price_diff: ShareRecord,
    volume_diff1: ShareRecord,
    volume_diff2: ShareRecord,
}

#[derive(Debug, Clone, PartialEq, Default, SimpleSerialize)]
struct ComparisonRecord {
    id: [u8; 32],
    buy_order_id: [u8; 32],
    sell_order_id: [u8; 32],
    code_diff1: Element,
    code_diff2: Element,
    price_diff: Element,
    volume_diff1: Element,
    volume_diff2: Element,
}

impl ComparisonFragment {
    /// Deterministic SSZ encoding
    pub fn to_ssz_bytes(&self) -> Result<Vec<u8>, WireError> {
        let record = ComparisonFragmentRecord {
            id: self.id.0,
            comparison_id: self.comparison_id.0,
            buy_order_id: self.buy_order_id.0,
            sell_order_id: self.sell_order_id.0,
            buy_fragment_id: self.buy_fragment_id.0,
            sell_fragment_id: self.sell_fragment_id.0,
            code_diff1: ShareRecord::encode(&self.code_diff1)?,
            code_diff2: ShareRecord::encode(&self.code_diff2)?,
            price_diff: ShareRecord::encode(&self.price_diff)?,
            volume_diff1: ShareRecord::encode(&self.volume_diff1)?,
            volume_diff2: ShareRecord::encode(&self.volume_diff2)?,
        };
        ssz_rs::serialize(&record).map_err(|e| WireError::Serialize(format!("{e:?}")))
    }

    /// Decode a record produced by [`ComparisonFragment::to_ssz_bytes`].
    ///
    /// Only the structure is checked; ids are taken as transmitted.
    pub fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let record: ComparisonFragmentRecord =
            ssz_rs::deserialize(bytes).map_err(|e| WireError::Deserialize(format!("{e:?}")))?;
        Ok(Self {
            id: ComparisonFragmentId(record.id),
            comparison_id: ComparisonId(record.comparison_id),
            buy_order_id: OrderId(record.buy_order_id),
            sell_order_id: OrderId(record.sell_order_id),
            buy_fragment_id: OrderFragmentId(record.buy_fragment_id),
            sell_fragment_id: OrderFragmentId(record.sell_fragment_id),
            code_diff1: record.code_diff1.decode(),
            code_diff2: record.code_diff2.decode(),
            price_diff: record.price_diff.decode(),
            volume_diff1: record.volume_diff1.decode(),
            volume_diff2: record.volume_diff2.decode(),
        })
    }
}

impl Comparison {
    /// Deterministic SSZ encoding
    pub fn to_ssz_bytes(&self) -> Result<Vec<u8>, WireError> {
        let record = ComparisonRecord {
            id: self.id.0,
            buy_order_id: self.buy_order_id.0,
            sell_order_id: self.sell_order_id.0,
            code_diff1: encode_element(&self.code_diff1)?,
            code_diff2: encode_element(&self.code_diff2)?,
            price_diff: encode_element(&self.price_diff)?,
            volume_diff1: encode_element(&self.volume_diff1)?,
            volume_diff2: encode_element(&self.volume_diff2)?,
        };
        ssz_rs::serialize(&record).map_err(|e| WireError::Serialize(format!("{e:?}")))
    }

    /// Decode a record produced by [`Comparison::to_ssz_bytes`]
    pub fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let record: ComparisonRecord =
            ssz_rs::deserialize(bytes).map_err(|e| WireError::Deserialize(format!("{e:?}")))?;
        Ok(Self {
            id: ComparisonId(record.id),
            buy_order_id: OrderId(record.buy_order_id),
            sell_order_id: OrderId(record.sell_order_id),
            code_diff1: decode_element(&record.code_diff1),
            code_diff2: decode_element(&record.code_diff2),
            price_diff: decode_element(&record.price_diff),
            volume_diff1: decode_element(&record.volume_diff1),
            volume_diff2: decode_element(&record.volume_diff2),
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
