//! Hashing, tag derivation, ECIES key derivation, and the AES cipher modes
//! used to decrypt announcement memos (§4.C).

use aes::{Aes128, Aes256};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key as GcmKey, Nonce as GcmNonce};
use ctr::cipher::{KeyIvInit, StreamCipher};
use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use tiny_keccak::{Hasher, Keccak};

use crate::error::CryptoError;
use crate::point::Point;
use crate::tag::{DerivedTag, Tag, TagCodec};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Keccak-256 (the on-chain linkability hash, not SHA3-256).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut out = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut out);
    out
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

fn tag_x32(shared_point: &Point) -> Tag {
    Tag(keccak256(&sha256(&shared_point.x_coordinate())))
}

fn tag_comp33(shared_point: &Point) -> Tag {
    Tag(keccak256(&sha256(&shared_point.encode_compressed())))
}

/// Derive the scan tag(s) from the aggregated shared point, per the
/// deployment's configured codec (§4.C, §4.E step 5).
pub fn derive_tag(shared_point: &Point, codec: TagCodec) -> DerivedTag {
    match codec {
        TagCodec::X32 => DerivedTag {
            primary: tag_x32(shared_point),
            alternate: None,
        },
        TagCodec::Comp33 => DerivedTag {
            primary: tag_comp33(shared_point),
            alternate: None,
        },
        TagCodec::Auto => DerivedTag {
            primary: tag_x32(shared_point),
            alternate: Some(tag_comp33(shared_point)),
        },
    }
}

/// `HKDF-SHA256(ikm = X(S), salt = empty, info = "ecies-secp256k1-key", L = 32)`.
pub fn ecies_key(x_coordinate: &[u8; 32]) -> [u8; 32] {
    let hk = Hkdf::<Sha256>::new(None, x_coordinate);
    let mut okm = [0u8; 32];
    hk.expand(b"ecies-secp256k1-key", &mut okm)
        .expect("32 bytes is a valid HKDF-SHA256 output length");
    okm
}

/// AES-128-or-256-CTR, selected by key length. No authentication tag — see
/// §4.C and §9 for why this is the default memo cipher and when to prefer
/// [`aes_gcm_encrypt`]/[`aes_gcm_decrypt`] instead.
pub fn aes_ctr_apply(key: &[u8], iv: &[u8; 16], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut buf = data.to_vec();
    match key.len() {
        16 => {
            let mut cipher = Aes128Ctr::new(key.into(), iv.into());
            cipher.apply_keystream(&mut buf);
        }
        32 => {
            let mut cipher = Aes256Ctr::new(key.into(), iv.into());
            cipher.apply_keystream(&mut buf);
        }
        other => {
            return Err(CryptoError::Hkdf(format!(
                "unsupported AES-CTR key length {other}, expected 16 or 32"
            )))
        }
    }
    Ok(buf)
}

/// Opt-in AES-256-GCM mode for deployments that want authenticated
/// decryption instead of bare AES-CTR (§9 REDESIGN FLAGS).
pub fn aes_gcm_encrypt(
    key: &[u8; 32],
    nonce: &[u8; 12],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(GcmKey::<Aes256Gcm>::from_slice(key));
    cipher
        .encrypt(GcmNonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::Aead)
}

pub fn aes_gcm_decrypt(
    key: &[u8; 32],
    nonce: &[u8; 12],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(GcmKey::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(GcmNonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Aead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::scalar::Scalar;

    #[test]
    fn tag_codecs_are_deterministic() {
        let p = Point::generator().mul(&Scalar::from_u64(12345));
        let a = derive_tag(&p, TagCodec::X32);
        let b = derive_tag(&p, TagCodec::X32);
        assert_eq!(a, b);
    }

    #[test]
    fn auto_codec_contains_both_single_codec_outputs() {
        let p = Point::generator().mul(&Scalar::from_u64(777));
        let auto = derive_tag(&p, TagCodec::Auto);
        let x32 = derive_tag(&p, TagCodec::X32);
        let comp33 = derive_tag(&p, TagCodec::Comp33);
        assert_eq!(auto.primary, x32.primary);
        assert_eq!(auto.alternate, Some(comp33.primary));
        assert_ne!(x32.primary, comp33.primary);
    }

    #[test]
    fn aes_ctr_roundtrip_128() {
        let key = [0x42u8; 16];
        let iv = [0x11u8; 16];
        let plaintext = b"1000";
        let ct = aes_ctr_apply(&key, &iv, plaintext).unwrap();
        let pt = aes_ctr_apply(&key, &iv, &ct).unwrap();
        assert_eq!(pt, plaintext);
    }

    #[test]
    fn aes_ctr_roundtrip_256() {
        let key = [0x99u8; 32];
        let iv = [0x22u8; 16];
        let plaintext = b"a longer stealth payment memo payload";
        let ct = aes_ctr_apply(&key, &iv, plaintext).unwrap();
        let pt = aes_ctr_apply(&key, &iv, &ct).unwrap();
        assert_eq!(pt, plaintext);
    }

    #[test]
    fn aes_ctr_rejects_bad_key_length() {
        let key = [0u8; 24];
        let iv = [0u8; 16];
        assert!(aes_ctr_apply(&key, &iv, b"x").is_err());
    }

    #[test]
    fn aes_gcm_roundtrip() {
        let key = [0x07u8; 32];
        let nonce = [0x09u8; 12];
        let plaintext = b"1000";
        let ct = aes_gcm_encrypt(&key, &nonce, plaintext).unwrap();
        let pt = aes_gcm_decrypt(&key, &nonce, &ct).unwrap();
        assert_eq!(pt, plaintext);
    }

    #[test]
    fn aes_gcm_tamper_detected() {
        let key = [0x07u8; 32];
        let nonce = [0x09u8; 12];
        let mut ct = aes_gcm_encrypt(&key, &nonce, b"1000").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0x01;
        assert!(aes_gcm_decrypt(&key, &nonce, &ct).is_err());
    }

    #[test]
    fn ecies_key_is_deterministic() {
        let x = [0xAAu8; 32];
        assert_eq!(ecies_key(&x), ecies_key(&x));
    }
}
