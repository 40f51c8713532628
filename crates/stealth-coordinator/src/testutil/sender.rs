//! Performs the sender's half of the protocol so integration tests can
//! build literal end-to-end fixtures without a real announcement
//! publisher (§1 Non-goals, §4.L). Not a production sender.

use rand::rngs::OsRng;
use rand::RngCore;
use stealth_crypto::{kdf, DerivedTag, Point, Scalar, TagCodec};

pub struct Announcement {
    pub r: [u8; 33],
    pub tag_primary: [u8; 32],
    pub tag_alternate: Option<[u8; 32]>,
    pub iv: [u8; 16],
    pub ciphertext: Vec<u8>,
}

/// Build one announcement for recipient public key `view_pubkey = v . G`,
/// encrypting `memo` under the same HKDF+AES-CTR construction the
/// coordinator uses to decrypt (§4.C, §4.E).
pub fn build_announcement(view_pubkey: &Point, codec: TagCodec, memo: &[u8]) -> Announcement {
    let mut rng = OsRng;
    let r_scalar = Scalar::random(&mut rng);
    let r_point = Point::generator().mul(&r_scalar);
    let shared = view_pubkey.mul(&r_scalar);

    let DerivedTag { primary, alternate } = kdf::derive_tag(&shared, codec);

    let x = shared.x_coordinate();
    let key = kdf::ecies_key(&x);
    let mut iv = [0u8; 16];
    rng.fill_bytes(&mut iv);
    let ciphertext = kdf::aes_ctr_apply(&key, &iv, memo).expect("16 or 32 byte key is always valid");

    Announcement {
        r: r_point.encode_compressed(),
        tag_primary: primary.0,
        tag_alternate: alternate.map(|t| t.0),
        iv,
        ciphertext,
    }
}

/// Shares `s_1, ..., s_n` for a degree-`(t-1)` polynomial over the
/// secp256k1 scalar field with the given secret, for building multi-node
/// test fixtures without going through the CLI dealer (§4.K).
pub fn split_secret(secret: &Scalar, threshold: usize, nodes: usize) -> Vec<(u32, Scalar)> {
    let mut rng = OsRng;
    let mut coefficients = vec![*secret];
    for _ in 1..threshold {
        coefficients.push(Scalar::random(&mut rng));
    }

    let eval = |x: u64| -> Scalar {
        let xs = Scalar::from_u64(x);
        let mut acc = Scalar::from_u64(0);
        let mut power = Scalar::from_u64(1);
        for coeff in &coefficients {
            acc = acc.add(&coeff.mul(&power));
            power = power.mul(&xs);
        }
        acc
    };

    (1..=nodes as u64).map(|i| (i as u32, eval(i))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_secret_reconstructs_via_lagrange() {
        let secret = Scalar::from_u64(424242);
        let shares = split_secret(&secret, 3, 5);
        let indices: Vec<u32> = shares.iter().take(3).map(|(i, _)| *i).collect();
        let coeffs = stealth_crypto::shamir::lagrange_coefficients_at_zero(&indices, 3).unwrap();
        let reconstructed = shares
            .iter()
            .take(3)
            .zip(coeffs.iter())
            .fold(Scalar::from_u64(0), |acc, ((_, s), c)| acc.add(&s.mul(c)));
        assert_eq!(reconstructed, secret);
    }

    #[test]
    fn build_announcement_decrypts_with_same_key() {
        let v = Scalar::from_u64(55);
        let view_pubkey = Point::generator().mul(&v);
        let ann = build_announcement(&view_pubkey, TagCodec::X32, b"1000");

        let r_point = Point::decode_compressed(&ann.r).unwrap();
        let shared = r_point.mul(&v);
        let key = kdf::ecies_key(&shared.x_coordinate());
        let plaintext = kdf::aes_ctr_apply(&key, &ann.iv, &ann.ciphertext).unwrap();
        assert_eq!(plaintext, b"1000");
    }
}
