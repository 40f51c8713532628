//! The share `s_i` a single node holds. Deliberately has no `Serialize`
//! impl and no `Debug` impl that prints the scalar — it is parsed once at
//! node startup from configuration and then only ever used as the right
//! operand of a point multiplication (§3, §4.D).

use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::scalar::Scalar;

#[derive(Clone, Copy)]
pub struct Share {
    index: u32,
    scalar: Scalar,
}

impl Share {
    /// Parse a share from its node index and 32-byte hex scalar
    /// (`view_sk_share_hex` in share-node configuration, §6). Requires the
    /// scalar to be in `[1, n-1]` per §3 invariant 4.
    pub fn parse(index: u32, hex_scalar: &str) -> Result<Self, CryptoError> {
        if index == 0 {
            return Err(CryptoError::DuplicateShareIndex(0));
        }
        let stripped = hex_scalar.strip_prefix("0x").unwrap_or(hex_scalar);
        let bytes = hex::decode(stripped)
            .map_err(|_| CryptoError::ScalarWrongLength(stripped.len() / 2))?;
        let scalar = Scalar::from_canonical_bytes(&bytes)?;
        Ok(Share { index, scalar })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }
}

impl Drop for Share {
    fn drop(&mut self) {
        let mut bytes = self.scalar.to_be_bytes();
        bytes.zeroize();
    }
}

impl std::fmt::Debug for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Share")
            .field("index", &self.index)
            .field("scalar", &"<redacted>")
            .finish()
    }
}
