//! secp256k1 point encoding/decoding and arithmetic.
//!
//! Compressed points are the wire format everywhere in this system (share
//! responses, ephemeral keys `R`, the aggregated shared point `S` before it
//! is hashed). Uncompressed encoding is only used internally to read off the
//! affine x-coordinate for the `x32` tag codec and for ECIES key derivation.

use elliptic_curve::sec1::ToEncodedPoint;
use k256::{AffinePoint, ProjectivePoint, PublicKey};

use crate::error::CryptoError;
use crate::scalar::Scalar;

/// A secp256k1 curve point. Thin wrapper so call sites never reach for raw
/// `k256` types directly and accidentally skip validation on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point(ProjectivePoint);

impl Point {
    pub fn generator() -> Self {
        Point(ProjectivePoint::GENERATOR)
    }

    pub fn inner(&self) -> ProjectivePoint {
        self.0
    }

    /// Decode a 33-byte SEC1 compressed point. Rejects wrong length, wrong
    /// prefix byte, and off-curve points (§4.A, §8 property 6).
    pub fn decode_compressed(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 33 {
            return Err(CryptoError::PointWrongLength(bytes.len()));
        }
        let prefix = bytes[0];
        if prefix != 0x02 && prefix != 0x03 {
            return Err(CryptoError::PointBadPrefix(prefix));
        }
        let public_key =
            PublicKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::PointOffCurve)?;
        Ok(Point(ProjectivePoint::from(*public_key.as_affine())))
    }

    /// 33-byte SEC1 compressed encoding.
    pub fn encode_compressed(&self) -> [u8; 33] {
        let encoded = self.affine().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// 65-byte SEC1 uncompressed encoding (`0x04 || X || Y`).
    pub fn encode_uncompressed(&self) -> [u8; 65] {
        let encoded = self.affine().to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// The 32-byte big-endian affine x-coordinate, as used by the `x32` tag
    /// codec and by ECIES key derivation.
    pub fn x_coordinate(&self) -> [u8; 32] {
        let uncompressed = self.encode_uncompressed();
        let mut x = [0u8; 32];
        x.copy_from_slice(&uncompressed[1..33]);
        x
    }

    pub fn mul(&self, scalar: &Scalar) -> Self {
        Point(self.0 * scalar.inner())
    }

    pub fn add(&self, other: &Self) -> Self {
        Point(self.0 + other.0)
    }

    /// Sum an arbitrary list of points by repeated addition, starting from
    /// the first element (there is no need for an explicit identity value;
    /// a one-element list is just that element, per §4.E step 4).
    pub fn combine(points: &[Point]) -> Option<Self> {
        let mut iter = points.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, p| acc.add(p)))
    }

    fn affine(&self) -> AffinePoint {
        self.0.to_affine()
    }
}
