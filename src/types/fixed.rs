//! Fixed-point encoding of decimal order terms.
//!
//! Secret shares are field elements, so prices and volumes are encoded as
//! non-negative integers scaled by 10^8 before an order is split. Every
//! order compared in one matrix must use the same scale, otherwise the
//! reconstructed differences are meaningless.
//!
//! ```
//! use dark_matcher::types::fixed::{to_fixed, from_fixed};
//!
//! let price = to_fixed("50000.12345678").unwrap();
//! assert_eq!(price, 5_000_012_345_678);
//! assert_eq!(from_fixed(price), "50000.12345678");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor: 10^8, eight decimal places
pub const SCALE: u64 = 100_000_000;

/// Parse a decimal string into a fixed-point value.
///
/// Returns `None` for negative values, values with more than eight decimal
/// places, values that overflow `u64`, and unparsable input.
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s.trim()).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point, rejecting precision below 10^-8
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() && !d.is_zero() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    if !scaled.fract().is_zero() {
        return None;
    }
    scaled.to_u64()
}

/// Convert a fixed-point value back to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Format a fixed-point value with eight decimal places
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}
