//! Lagrange coefficients at `x = 0` over the secp256k1 scalar field (§4.B).

use std::collections::HashSet;

use crate::error::CryptoError;
use crate::scalar::Scalar;

/// Compute `λ_i` for each index in `indices`, in the order supplied (the
/// order shares were collected, not sorted). Paired 1:1 with the caller's
/// share values by position.
///
/// `λ_i = Π_{j≠i} ( (−j mod n) · (i − j)^{−1} mod n ) mod n`
pub fn lagrange_coefficients_at_zero(
    indices: &[u32],
    threshold: usize,
) -> Result<Vec<Scalar>, CryptoError> {
    if indices.len() < threshold {
        return Err(CryptoError::InsufficientShares {
            have: indices.len(),
            need: threshold,
        });
    }

    let mut seen = HashSet::with_capacity(indices.len());
    for &idx in indices {
        if !seen.insert(idx) {
            return Err(CryptoError::DuplicateShareIndex(idx));
        }
    }
    if indices.len() < 2 {
        return Err(CryptoError::TooFewIndices);
    }

    let scalars: Vec<Scalar> = indices
        .iter()
        .map(|&i| Scalar::from_u64(i as u64))
        .collect();

    let mut coefficients = Vec::with_capacity(indices.len());
    for (i, xi) in scalars.iter().enumerate() {
        let mut numerator = Scalar::from_u64(1);
        let mut denominator = Scalar::from_u64(1);
        for (j, xj) in scalars.iter().enumerate() {
            if i == j {
                continue;
            }
            numerator = numerator.mul(&xj.negate());
            denominator = denominator.mul(&xi.sub(xj));
        }
        let denom_inv = denominator.inverse_mod_n()?;
        coefficients.push(numerator.mul(&denom_inv));
    }
    Ok(coefficients)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_fewer_than_threshold() {
        let err = lagrange_coefficients_at_zero(&[1], 2).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::InsufficientShares { have: 1, need: 2 }
        ));
    }

    #[test]
    fn rejects_duplicate_indices() {
        let err = lagrange_coefficients_at_zero(&[1, 1, 2], 2).unwrap_err();
        assert!(matches!(err, CryptoError::DuplicateShareIndex(1)));
    }

    #[test]
    fn two_of_three_reconstructs_secret_in_scalar_domain() {
        // Degree-1 polynomial f(x) = secret + 7x, secret = 42.
        let secret = Scalar::from_u64(42);
        let slope = Scalar::from_u64(7);
        let eval = |x: u64| secret.add(&slope.mul(&Scalar::from_u64(x)));

        for subset in [[1u32, 2], [1, 3], [2, 3]] {
            let shares = [eval(subset[0] as u64), eval(subset[1] as u64)];
            let coeffs = lagrange_coefficients_at_zero(&subset, 2).unwrap();
            let reconstructed = shares[0]
                .mul(&coeffs[0])
                .add(&shares[1].mul(&coeffs[1]));
            assert_eq!(reconstructed, secret);
        }
    }

    #[test]
    fn three_of_five_reconstructs_secret() {
        let secret = Scalar::from_u64(9999);
        let a1 = Scalar::from_u64(13);
        let a2 = Scalar::from_u64(5);
        let eval = |x: u64| {
            let xs = Scalar::from_u64(x);
            secret.add(&a1.mul(&xs)).add(&a2.mul(&xs).mul(&xs))
        };

        let indices = [2u32, 4, 5];
        let shares: Vec<Scalar> = indices.iter().map(|&i| eval(i as u64)).collect();
        let coeffs = lagrange_coefficients_at_zero(&indices, 3).unwrap();
        let reconstructed = shares
            .iter()
            .zip(coeffs.iter())
            .fold(Scalar::from_u64(0), |acc, (s, c)| acc.add(&s.mul(c)));
        assert_eq!(reconstructed, secret);
    }
}
