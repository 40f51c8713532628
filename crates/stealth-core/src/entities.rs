//! Core entities: announcement events and inbox entries (§3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row in the `events` table, written by the (out-of-scope) watcher and
/// mutated only by the scanner (§3 invariants 1 and 5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementEvent {
    pub id: i64,
    pub block: i64,
    pub txhash: String,
    pub tag: [u8; 32],
    pub r: Vec<u8>,
    pub memo: Vec<u8>,
    pub commitment: [u8; 32],
    pub scanned: bool,
    pub matched: bool,
    pub created_at: DateTime<Utc>,
}

/// Status of an inbox entry. Transitions beyond `Unread` happen in the
/// (out-of-scope) API layer; the scanner only ever creates `Unread` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InboxStatus {
    Unread,
    Read,
    Spent,
}

impl InboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InboxStatus::Unread => "unread",
            InboxStatus::Read => "read",
            InboxStatus::Spent => "spent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unread" => Some(InboxStatus::Unread),
            "read" => Some(InboxStatus::Read),
            "spent" => Some(InboxStatus::Spent),
            _ => None,
        }
    }
}

/// A row in the `inbox` table. `event_id` is unique, giving at-most-once
/// promotion (§3 invariant 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxEntry {
    pub id: i64,
    pub user_id: String,
    pub event_id: i64,
    pub tag: [u8; 32],
    pub r: Vec<u8>,
    pub memo: Vec<u8>,
    pub commitment: [u8; 32],
    pub status: InboxStatus,
    pub detected_at: DateTime<Utc>,
}

/// Validate `R` per §3 invariant 3 and §6 wire format: exactly 33 bytes,
/// first byte `0x02` or `0x03`. Does not check on-curve membership — that
/// is `stealth_crypto::Point::decode_compressed`'s job, one layer down.
pub fn validate_r_shape(r: &[u8]) -> bool {
    r.len() == 33 && (r[0] == 0x02 || r[0] == 0x03)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_r_shape() {
        assert!(validate_r_shape(&{
            let mut v = vec![0x02u8];
            v.extend_from_slice(&[0u8; 32]);
            v
        }));
        assert!(!validate_r_shape(&[0x02u8; 32]));
        assert!(!validate_r_shape(&{
            let mut v = vec![0x04u8];
            v.extend_from_slice(&[0u8; 32]);
            v
        }));
    }

    #[test]
    fn inbox_status_roundtrips() {
        for s in [InboxStatus::Unread, InboxStatus::Read, InboxStatus::Spent] {
            assert_eq!(InboxStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(InboxStatus::parse("bogus"), None);
    }
}
