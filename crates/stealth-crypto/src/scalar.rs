//! Scalar (mod secp256k1 order `n`) arithmetic.
//!
//! All scalar material that ever touches a share is wrapped in [`Scalar`]
//! rather than passed around as raw bytes, so mixing a share with an
//! unrelated byte string is a compile error, not a runtime bug (§9).

use elliptic_curve::bigint::U256;
use elliptic_curve::ops::Reduce;
use zeroize::Zeroize;

use crate::error::CryptoError;

/// The secp256k1 group order `n`, big-endian.
pub const ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// `n - 2`, the Fermat exponent used for modular inversion.
const ORDER_MINUS_TWO: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x3F,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar(k256::Scalar);

impl Scalar {
    /// Reduce an arbitrary 32-byte big-endian integer mod `n`.
    pub fn from_be_bytes_mod_order(bytes: &[u8; 32]) -> Self {
        let uint = U256::from_be_slice(bytes);
        Scalar(<k256::Scalar as Reduce<U256>>::reduce(uint))
    }

    /// Parse an exact 32-byte scalar, requiring it to already be in
    /// `[0, n-1]` and non-zero (the representation used for shares, §3).
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 32 {
            return Err(CryptoError::ScalarWrongLength(bytes.len()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        let candidate = Self::from_be_bytes_mod_order(&arr);
        if candidate.to_be_bytes() != arr {
            return Err(CryptoError::ScalarWrongLength(bytes.len()));
        }
        if candidate.is_zero() {
            return Err(CryptoError::ScalarIsZero);
        }
        Ok(candidate)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == k256::Scalar::from(0u64)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(self.0.to_bytes().as_slice());
        out
    }

    pub fn inner(&self) -> k256::Scalar {
        self.0
    }

    pub fn add(&self, other: &Self) -> Self {
        Scalar(self.0 + other.0)
    }

    pub fn sub(&self, other: &Self) -> Self {
        Scalar(self.0 - other.0)
    }

    pub fn mul(&self, other: &Self) -> Self {
        Scalar(self.0 * other.0)
    }

    pub fn negate(&self) -> Self {
        Scalar(-self.0)
    }

    /// `self^(n-2) mod n`, i.e. the Fermat-exponentiation modular inverse
    /// specified in §4.A. Only ever applied to public index differences
    /// during Lagrange coefficient computation, never to secret material,
    /// so square-and-multiply timing is not a concern here.
    pub fn inverse_mod_n(&self) -> Result<Self, CryptoError> {
        if self.is_zero() {
            return Err(CryptoError::ScalarIsZero);
        }
        let mut result = Scalar::from_u64(1);
        let base = *self;
        for byte in ORDER_MINUS_TWO.iter() {
            for bit in (0..8).rev() {
                result = result.mul(&result);
                if (byte >> bit) & 1 == 1 {
                    result = result.mul(&base);
                }
            }
        }
        Ok(result)
    }

    pub fn from_u64(value: u64) -> Self {
        Scalar(k256::Scalar::from(value))
    }

    #[cfg(any(test, feature = "testutil"))]
    pub fn random(rng: &mut impl rand::RngCore) -> Self {
        let mut bytes = [0u8; 32];
        loop {
            rng.fill_bytes(&mut bytes);
            let candidate = Self::from_be_bytes_mod_order(&bytes);
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }
}

impl Drop for Scalar {
    fn drop(&mut self) {
        let mut bytes = self.to_be_bytes();
        bytes.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_round_trips_through_multiplication() {
        let x = Scalar::from_u64(1234567);
        let inv = x.inverse_mod_n().unwrap();
        let product = x.mul(&inv);
        assert_eq!(product, Scalar::from_u64(1));
    }

    #[test]
    fn inverse_of_zero_fails() {
        let zero = Scalar::from_u64(0);
        assert!(zero.inverse_mod_n().is_err());
    }

    #[test]
    fn reduction_is_deterministic() {
        let bytes = [7u8; 32];
        let a = Scalar::from_be_bytes_mod_order(&bytes);
        let b = Scalar::from_be_bytes_mod_order(&bytes);
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_bytes_reject_zero() {
        let err = Scalar::from_canonical_bytes(&[0u8; 32]).unwrap_err();
        assert!(matches!(err, CryptoError::ScalarIsZero));
    }

    #[test]
    fn canonical_bytes_reject_wrong_length() {
        let err = Scalar::from_canonical_bytes(&[1u8; 31]).unwrap_err();
        assert!(matches!(err, CryptoError::ScalarWrongLength(31)));
    }
}
