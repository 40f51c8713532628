//! secp256k1 curve operations, Shamir Lagrange aggregation, and the
//! KDF/AEAD layer underlying threshold scan/decrypt.
//!
//! Pure math and cryptography only — no I/O, no configuration, no
//! networking. The coordinator and share-node crates build on top of this
//! one without reaching into `k256`/`tiny-keccak`/etc. directly, so a
//! secret never changes representation outside a [`scalar::Scalar`] or
//! [`share::Share`].

pub mod error;
pub mod kdf;
pub mod point;
pub mod scalar;
pub mod shamir;
pub mod share;
pub mod tag;

pub use error::CryptoError;
pub use point::Point;
pub use scalar::Scalar;
pub use share::Share;
pub use tag::{DerivedTag, Tag, TagCodec};
