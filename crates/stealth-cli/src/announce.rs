//! `stealth-cli announce encrypt` (§4.K, §4.L): build one literal
//! announcement from the command line, using the same construction as the
//! sender-side test harness. Not part of the scan/decrypt runtime path.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use stealth_crypto::{kdf, DerivedTag, Point, Scalar, TagCodec};

use crate::error::CliError;

#[derive(Serialize)]
pub struct EncryptedAnnouncement {
    pub r_hex: String,
    pub tag_primary_hex: String,
    pub tag_alternate_hex: Option<String>,
    pub iv_hex: String,
    pub ciphertext_hex: String,
}

/// `R = r.G`, `S = r.V`, tag derived per `codec`, memo encrypted under
/// `HKDF(X(S)) + AES-CTR` (§4.C).
pub fn encrypt(view_pubkey_hex: &str, codec: TagCodec, memo: &[u8]) -> Result<EncryptedAnnouncement, CliError> {
    let stripped = view_pubkey_hex.strip_prefix("0x").unwrap_or(view_pubkey_hex);
    let pubkey_bytes = hex::decode(stripped)?;
    let view_pubkey = Point::decode_compressed(&pubkey_bytes)?;

    let mut rng = OsRng;
    let r_scalar = Scalar::random(&mut rng);
    let r_point = Point::generator().mul(&r_scalar);
    let shared = view_pubkey.mul(&r_scalar);

    let DerivedTag { primary, alternate } = kdf::derive_tag(&shared, codec);

    let key = kdf::ecies_key(&shared.x_coordinate());
    let mut iv = [0u8; 16];
    rng.fill_bytes(&mut iv);
    let ciphertext = kdf::aes_ctr_apply(&key, &iv, memo)?;

    Ok(EncryptedAnnouncement {
        r_hex: format!("0x{}", hex::encode(r_point.encode_compressed())),
        tag_primary_hex: format!("0x{}", hex::encode(primary.0)),
        tag_alternate_hex: alternate.map(|t| format!("0x{}", hex::encode(t.0))),
        iv_hex: format!("0x{}", hex::encode(iv)),
        ciphertext_hex: format!("0x{}", hex::encode(ciphertext)),
    })
}
