//! The 32-byte linkability tag and its codec selector (§4.C, GLOSSARY).

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// A 32-byte linkability tag derived from the shared point `S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub [u8; 32]);

impl Tag {
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|_| CryptoError::InvalidHex)?;
        if bytes.len() != 32 {
            return Err(CryptoError::TagWrongLength(bytes.len()));
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Tag(out))
    }
}

/// Which serialization of `S` feeds the tag hash. A deployment commits to
/// one codec at dealer time; `Auto` exists only to bridge senders from an
/// earlier codec generation (§9) and should not be chosen for new
/// deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCodec {
    X32,
    Comp33,
    Auto,
}

/// The result of deriving a tag: always a primary, and an alternate only
/// when the codec is [`TagCodec::Auto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedTag {
    pub primary: Tag,
    pub alternate: Option<Tag>,
}

impl DerivedTag {
    /// Whether either codec output matches the on-chain tag (§4.G step 3).
    pub fn matches(&self, candidate: &Tag) -> bool {
        self.primary == *candidate || self.alternate == Some(*candidate)
    }
}
