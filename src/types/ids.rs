//! Fixed-size identifiers.
//!
//! Every identifier is a 32-byte SHA-256 digest wrapped in its own newtype so
//! that an order id can never be used where a comparison id is expected. The
//! raw bytes are the map key; no string conversion happens on the hot path.

use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 over the concatenation of `parts`
pub(crate) fn digest(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            /// Wrap raw identifier bytes
            #[inline]
            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Raw identifier bytes
            #[inline]
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Full lowercase hex encoding
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Short form for logs
                write!(f, "{}", hex::encode(&self.0[..8]))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

define_id!(
    /// Identity of a plaintext order, shared by all of its fragments
    OrderId
);

define_id!(
    /// Content-addressed identity of one order fragment
    OrderFragmentId
);

define_id!(
    /// Identity of the comparison between one buy order and one sell order
    ComparisonId
);

define_id!(
    /// Identity of the comparison fragment built from one buy fragment and
    /// one sell fragment
    ComparisonFragmentId
);

impl OrderId {
    /// Derive an order id from arbitrary bytes (e.g. a signed order payload)
    pub fn digest(data: &[u8]) -> Self {
        Self(digest(&[data]))
    }
}

impl ComparisonId {
    /// `SHA-256(buy || sell)`. Buy and sell are fixed roles; swapping them
    /// yields a different id.
    pub fn from_orders(buy: &OrderId, sell: &OrderId) -> Self {
        Self(digest(&[&buy.0, &sell.0]))
    }
}

impl ComparisonFragmentId {
    /// `SHA-256(buy || sell)` over the two fragment ids
    pub fn from_fragments(buy: &OrderFragmentId, sell: &OrderFragmentId) -> Self {
        Self(digest(&[&buy.0, &sell.0]))
    }
}
