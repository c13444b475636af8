//! Shamir secret sharing over a prime field.
//!
//! ## Scheme
//!
//! A secret `s` is split by sampling a random polynomial of degree `k - 1`
//! with constant term `s` and evaluating it at `x = 1..=n`. Any `k` shares
//! with distinct indices recover `s` by Lagrange interpolation at zero.
//!
//! ## Linearity
//!
//! Sharing is linear: subtracting two shares with the same index yields a
//! share of the difference of the secrets. This is the only homomorphic
//! operation the matcher relies on.
//!
//! ## Example
//!
//! ```
//! use dark_matcher::shamir::{self, Prime};
//! use num_bigint::BigUint;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let prime = Prime::reference();
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let shares = shamir::split(&prime, 5, 3, &BigUint::from(42u64), &mut rng).unwrap();
//! let secret = shamir::join(&prime, &shares[1..4]).unwrap();
//! assert_eq!(secret, BigUint::from(42u64));
//! ```

use std::collections::HashSet;

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::Rng;

use crate::error::ShamirError;

/// RFC 2409 MODP group 2 prime (1024 bits), big-endian
const REFERENCE_PRIME_BYTES: [u8; 128] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xC9, 0x0F, 0xDA, 0xA2,
    0x21, 0x68, 0xC2, 0x34, 0xC4, 0xC6, 0x62, 0x8B, 0x80, 0xDC, 0x1C, 0xD1,
    0x29, 0x02, 0x4E, 0x08, 0x8A, 0x67, 0xCC, 0x74, 0x02, 0x0B, 0xBE, 0xA6,
    0x3B, 0x13, 0x9B, 0x22, 0x51, 0x4A, 0x08, 0x79, 0x8E, 0x34, 0x04, 0xDD,
    0xEF, 0x95, 0x19, 0xB3, 0xCD, 0x3A, 0x43, 0x1B, 0x30, 0x2B, 0x0A, 0x6D,
    0xF2, 0x5F, 0x14, 0x37, 0x4F, 0xE1, 0x35, 0x6D, 0x6D, 0x51, 0xC2, 0x45,
    0xE4, 0x85, 0xB5, 0x76, 0x62, 0x5E, 0x7E, 0xC6, 0xF4, 0x4C, 0x42, 0xE9,
    0xA6, 0x37, 0xED, 0x6B, 0x0B, 0xFF, 0x5C, 0xB6, 0xF4, 0x06, 0xB7, 0xED,
    0xEE, 0x38, 0x6B, 0xFB, 0x5A, 0x89, 0x9F, 0xA5, 0xAE, 0x9F, 0x24, 0x11,
    0x7C, 0x4B, 0x1F, 0xE6, 0x49, 0x28, 0x66, 0x51, 0xEC, 0xE6, 0x53, 0x81,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

// ============================================================================
// Prime
// ============================================================================

/// Modulus of the field every share lives in.
///
/// Primality is not checked; the modulus is only required to be odd and
/// greater than 2 so that `half()` splits the field into a non-negative
/// and a negative range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prime(BigUint);

impl Prime {
    /// Wrap a modulus
    pub fn new(modulus: BigUint) -> Result<Self, ShamirError> {
        if modulus <= BigUint::from(2u32) {
            return Err(ShamirError::InvalidModulus("modulus must exceed 2".into()));
        }
        if (&modulus % 2u32).is_zero() {
            return Err(ShamirError::InvalidModulus("modulus must be odd".into()));
        }
        Ok(Self(modulus))
    }

    /// Parse a big-endian hex modulus (whitespace is ignored)
    pub fn from_hex(hex: &str) -> Result<Self, ShamirError> {
        let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
        let digits = digits.trim_start_matches("0x");
        let modulus = BigUint::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| ShamirError::InvalidModulus(format!("not hex: {hex:?}")))?;
        Self::new(modulus)
    }

    /// The 1024-bit reference prime
    pub fn reference() -> Self {
        Self(BigUint::from_bytes_be(&REFERENCE_PRIME_BYTES))
    }

    /// The modulus value
    #[inline]
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Cutoff of the centered representation: `floor(p / 2)`.
    ///
    /// A field element `v` stands for a non-negative quantity iff `v <= half`.
    pub fn half(&self) -> BigUint {
        &self.0 >> 1usize
    }

    /// Size of the modulus in bits
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    /// Whether `value` is a reduced field element
    #[inline]
    pub fn contains(&self, value: &BigUint) -> bool {
        value < &self.0
    }

    /// `(a - b) mod p` for reduced operands
    fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        if a >= b {
            a - b
        } else {
            &self.0 - (b - a)
        }
    }

    /// Multiplicative inverse by Fermat's little theorem
    fn inverse(&self, a: &BigUint) -> BigUint {
        let exponent = &self.0 - 2u32;
        a.modpow(&exponent, &self.0)
    }
}

// ============================================================================
// SecretShare
// ============================================================================

/// One party's share of a secret: the point `(index, f(index))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretShare {
    /// Evaluation point (never 0)
    pub index: u64,

    /// Polynomial value at `index`, reduced modulo the prime
    pub value: BigUint,
}

impl SecretShare {
    /// Create a share
    pub fn new(index: u64, value: BigUint) -> Self {
        Self { index, value }
    }

    /// Subtract another share of the same index, producing a share of the
    /// difference of the two secrets.
    ///
    /// # Errors
    ///
    /// [`ShamirError::IndexMismatch`] if the indices differ and
    /// [`ShamirError::ValueOutOfRange`] if either value is not reduced.
    pub fn sub_modulo(&self, other: &SecretShare, prime: &Prime) -> Result<SecretShare, ShamirError> {
        if self.index != other.index {
            return Err(ShamirError::IndexMismatch {
                left: self.index,
                right: other.index,
            });
        }
        if !prime.contains(&self.value) || !prime.contains(&other.value) {
            return Err(ShamirError::ValueOutOfRange);
        }
        Ok(SecretShare::new(self.index, prime.sub(&self.value, &other.value)))
    }
}

// ============================================================================
// Split / Join
// ============================================================================

/// Split `secret` into `n` shares, any `k` of which reconstruct it.
pub fn split<R: Rng + ?Sized>(
    prime: &Prime,
    n: usize,
    k: usize,
    secret: &BigUint,
    rng: &mut R,
) -> Result<Vec<SecretShare>, ShamirError> {
    if k == 0 || k > n {
        return Err(ShamirError::InvalidThreshold { k, n });
    }
    if !prime.contains(secret) {
        return Err(ShamirError::ValueOutOfRange);
    }

    // f(x) = secret + a_1 x + ... + a_{k-1} x^{k-1}
    let mut coefficients = Vec::with_capacity(k);
    coefficients.push(secret.clone());
    for _ in 1..k {
        coefficients.push(rng.gen_biguint_below(prime.value()));
    }

    let shares = (1..=n as u64)
        .map(|index| {
            let x = BigUint::from(index);
            // Horner evaluation from the highest coefficient
            let value = coefficients
                .iter()
                .rev()
                .fold(BigUint::zero(), |acc, c| (acc * &x + c) % prime.value());
            SecretShare::new(index, value)
        })
        .collect();

    Ok(shares)
}

/// Lagrange basis coefficients at zero for the given evaluation points.
///
/// Computing these once lets several secrets shared over the same indices be
/// reconstructed with a single modular inversion.
pub fn lagrange_coefficients(prime: &Prime, indices: &[u64]) -> Result<Vec<BigUint>, ShamirError> {
    if indices.is_empty() {
        return Err(ShamirError::EmptyShares);
    }
    let mut seen = HashSet::with_capacity(indices.len());
    for &index in indices {
        if index == 0 {
            return Err(ShamirError::ZeroIndex);
        }
        if !seen.insert(index) {
            return Err(ShamirError::DuplicateIndex(index));
        }
    }

    let p = prime.value();
    let mut numerators = Vec::with_capacity(indices.len());
    let mut denominators = Vec::with_capacity(indices.len());
    for &xi in indices {
        let xi_big = BigUint::from(xi) % p;
        let mut numerator = BigUint::one();
        let mut denominator = BigUint::one();
        for &xj in indices.iter().filter(|&&xj| xj != xi) {
            let xj_big = BigUint::from(xj) % p;
            // l_i(0) = prod x_j / (x_j - x_i)
            numerator = numerator * &xj_big % p;
            denominator = denominator * prime.sub(&xj_big, &xi_big) % p;
        }
        if numerator.is_zero() || denominator.is_zero() {
            // Indices congruent to each other or to zero modulo a tiny prime
            return Err(ShamirError::DuplicateIndex(xi));
        }
        numerators.push(numerator);
        denominators.push(denominator);
    }

    // Batch inversion: one modular exponentiation for all denominators
    let mut prefixes = Vec::with_capacity(denominators.len());
    let mut product = BigUint::one();
    for denominator in &denominators {
        prefixes.push(product.clone());
        product = product * denominator % p;
    }
    let mut inverse = prime.inverse(&product);
    let mut coefficients = vec![BigUint::zero(); denominators.len()];
    for i in (0..denominators.len()).rev() {
        coefficients[i] = &numerators[i] * &inverse % p * &prefixes[i] % p;
        inverse = inverse * &denominators[i] % p;
    }

    Ok(coefficients)
}

/// Combine values with precomputed Lagrange coefficients.
pub fn interpolate<'a, I>(prime: &Prime, coefficients: &[BigUint], values: I) -> Result<BigUint, ShamirError>
where
    I: IntoIterator<Item = &'a BigUint>,
{
    let p = prime.value();
    let mut secret = BigUint::zero();
    let mut count = 0usize;
    for (coefficient, value) in coefficients.iter().zip(values) {
        if !prime.contains(value) {
            return Err(ShamirError::ValueOutOfRange);
        }
        secret = (secret + coefficient * value) % p;
        count += 1;
    }
    if count == 0 {
        return Err(ShamirError::EmptyShares);
    }
    Ok(secret)
}

/// Reconstruct a secret from shares with distinct, non-zero indices.
///
/// The caller is responsible for supplying at least `k` shares; fewer shares
/// interpolate to an unrelated field element.
pub fn join(prime: &Prime, shares: &[SecretShare]) -> Result<BigUint, ShamirError> {
    let indices: Vec<u64> = shares.iter().map(|s| s.index).collect();
    let coefficients = lagrange_coefficients(prime, &indices)?;
    interpolate(prime, &coefficients, shares.iter().map(|s| &s.value))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// RFC 2409 text form of the reference prime
    const REFERENCE_PRIME_HEX: &str = concat!(
        "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1",
        "29024E088A67CC74020BBEA63B139B22514A08798E3404DD",
        "EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245",
        "E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
        "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE65381",
        "FFFFFFFFFFFFFFFF",
    );

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_reference_prime_is_1024_bits() {
        let prime = Prime::reference();
        assert_eq!(prime.bits(), 1024);
        assert_eq!(prime, Prime::from_hex(REFERENCE_PRIME_HEX).unwrap());
        assert!(Prime::new(prime.value().clone()).is_ok());
    }

    #[test]
    fn test_prime_rejects_even_and_tiny() {
        assert!(Prime::new(BigUint::from(2u32)).is_err());
        assert!(Prime::new(BigUint::from(100u32)).is_err());
        assert!(Prime::new(BigUint::from(101u32)).is_ok());
        assert!(Prime::from_hex("not hex").is_err());
        assert_eq!(Prime::from_hex("0x65").unwrap().value(), &BigUint::from(101u32));
    }

    #[test]
    fn test_half() {
        let prime = Prime::new(BigUint::from(101u32)).unwrap();
        assert_eq!(prime.half(), BigUint::from(50u32));
    }

    #[test]
    fn test_split_and_join_any_k_subset() {
        let prime = Prime::reference();
        let secret = BigUint::from(1_000_000u64);
        let shares = split(&prime, 8, 6, &secret, &mut rng()).unwrap();
        assert_eq!(shares.len(), 8);

        assert_eq!(join(&prime, &shares[..6]).unwrap(), secret);
        assert_eq!(join(&prime, &shares[2..]).unwrap(), secret);
        assert_eq!(join(&prime, &shares).unwrap(), secret);
    }

    #[test]
    fn test_join_below_threshold_does_not_recover() {
        let prime = Prime::reference();
        let secret = BigUint::from(77u64);
        let shares = split(&prime, 8, 6, &secret, &mut rng()).unwrap();
        assert_ne!(join(&prime, &shares[..5]).unwrap(), secret);
    }

    #[test]
    fn test_split_rejects_bad_threshold() {
        let prime = Prime::reference();
        let secret = BigUint::from(1u64);
        assert_eq!(
            split(&prime, 3, 4, &secret, &mut rng()),
            Err(ShamirError::InvalidThreshold { k: 4, n: 3 })
        );
        assert_eq!(
            split(&prime, 3, 0, &secret, &mut rng()),
            Err(ShamirError::InvalidThreshold { k: 0, n: 3 })
        );
    }

    #[test]
    fn test_split_rejects_unreduced_secret() {
        let prime = Prime::new(BigUint::from(101u32)).unwrap();
        let secret = BigUint::from(101u32);
        assert_eq!(
            split(&prime, 3, 2, &secret, &mut rng()),
            Err(ShamirError::ValueOutOfRange)
        );
    }

    #[test]
    fn test_join_errors() {
        let prime = Prime::reference();
        assert_eq!(join(&prime, &[]), Err(ShamirError::EmptyShares));

        let zero = SecretShare::new(0, BigUint::from(1u32));
        assert_eq!(join(&prime, &[zero]), Err(ShamirError::ZeroIndex));

        let a = SecretShare::new(2, BigUint::from(1u32));
        let b = SecretShare::new(2, BigUint::from(5u32));
        assert_eq!(join(&prime, &[a, b]), Err(ShamirError::DuplicateIndex(2)));
    }

    #[test]
    fn test_subtraction_is_linear() {
        let prime = Prime::reference();
        let mut rng = rng();
        let a = split(&prime, 5, 3, &BigUint::from(12u64), &mut rng).unwrap();
        let b = split(&prime, 5, 3, &BigUint::from(10u64), &mut rng).unwrap();

        let diff: Vec<SecretShare> = a
            .iter()
            .zip(&b)
            .map(|(x, y)| x.sub_modulo(y, &prime).unwrap())
            .collect();
        assert_eq!(join(&prime, &diff[..3]).unwrap(), BigUint::from(2u64));

        // 10 - 12 wraps to p - 2
        let diff: Vec<SecretShare> = b
            .iter()
            .zip(&a)
            .map(|(x, y)| x.sub_modulo(y, &prime).unwrap())
            .collect();
        assert_eq!(join(&prime, &diff[1..4]).unwrap(), prime.value() - 2u32);
    }

    #[test]
    fn test_sub_modulo_index_mismatch() {
        let prime = Prime::reference();
        let a = SecretShare::new(1, BigUint::from(3u32));
        let b = SecretShare::new(2, BigUint::from(3u32));
        assert_eq!(
            a.sub_modulo(&b, &prime),
            Err(ShamirError::IndexMismatch { left: 1, right: 2 })
        );
    }

    #[test]
    fn test_small_prime_roundtrip() {
        let prime = Prime::new(BigUint::from(7919u32)).unwrap();
        let secret = BigUint::from(1234u32);
        let shares = split(&prime, 4, 2, &secret, &mut rng()).unwrap();
        assert_eq!(join(&prime, &[shares[3].clone(), shares[0].clone()]).unwrap(), secret);
    }
}
