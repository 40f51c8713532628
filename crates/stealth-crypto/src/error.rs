//! Crypto-layer error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("point must be exactly 33 bytes, got {0}")]
    PointWrongLength(usize),

    #[error("invalid hex encoding")]
    InvalidHex,

    #[error("point prefix byte 0x{0:02x} is not 0x02 or 0x03")]
    PointBadPrefix(u8),

    #[error("point is not on the secp256k1 curve")]
    PointOffCurve,

    #[error("scalar must be exactly 32 bytes, got {0}")]
    ScalarWrongLength(usize),

    #[error("tag must be exactly 32 bytes, got {0}")]
    TagWrongLength(usize),

    #[error("scalar is zero")]
    ScalarIsZero,

    #[error("need at least 2 participant indices for Lagrange interpolation")]
    TooFewIndices,

    #[error("fewer than the configured threshold of shares were supplied: have {have}, need {need}")]
    InsufficientShares { have: usize, need: usize },

    #[error("duplicate share index {0} supplied to Lagrange aggregation")]
    DuplicateShareIndex(u32),

    #[error("HKDF output length invalid: {0}")]
    Hkdf(String),

    #[error("AEAD operation failed")]
    Aead,
}
