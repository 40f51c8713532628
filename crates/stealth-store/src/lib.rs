//! Durable store for announcement events and the per-user inbox (§4.F).
//!
//! Two tables, WAL mode, one unique index giving at-most-once inbox
//! promotion. The scanner loop in `stealth-coordinator` is the only
//! production caller of `mark_scanned`/`insert_inbox`; the watcher that
//! populates `events` is out of scope and represented here only by
//! `insert_event`, used by integration tests and the dealer CLI's fixture
//! tooling.

mod error;
mod schema;

pub use error::StoreError;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use stealth_core::{AnnouncementEvent, InboxEntry, InboxStatus};

pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(schema::SCHEMA_DDL)?;
        Ok(EventStore { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::SCHEMA_DDL)?;
        Ok(EventStore { conn })
    }

    /// Used by the watcher (out of scope) and by test fixtures. Not called
    /// by the scanner loop itself.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_event(
        &self,
        block: i64,
        txhash: &str,
        tag: &[u8; 32],
        r: &[u8],
        memo: &[u8],
        commitment: &[u8; 32],
    ) -> Result<i64, StoreError> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO events (block, txhash, tag, r, memo, commitment, scanned, matched, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 0, ?7)",
            params![
                block,
                txhash,
                tag.as_slice(),
                r,
                memo,
                commitment.as_slice(),
                now.to_rfc3339()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Rows with `scanned = 0`, oldest first. `limit` bounds the batch size
    /// per §4.G's "bounded batch size recommended but not required".
    pub fn fetch_unscanned(&self, limit: usize) -> Result<Vec<AnnouncementEvent>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, block, txhash, tag, r, memo, commitment, scanned, matched, created_at
             FROM events WHERE scanned = 0 ORDER BY id ASC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn mark_scanned(&self, event_id: i64, matched: bool) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE events SET scanned = 1, matched = ?1 WHERE id = ?2",
            params![matched as i64, event_id],
        )?;
        if changed == 0 {
            return Err(StoreError::EventNotFound(event_id));
        }
        Ok(())
    }

    /// Reset an event back to `scanned = 0` for a manual re-scan after an
    /// operator-diagnosed transient error (§4.E "Error" state).
    pub fn reset_scanned(&self, event_id: i64) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("UPDATE events SET scanned = 0 WHERE id = ?1", params![event_id])?;
        if changed == 0 {
            return Err(StoreError::EventNotFound(event_id));
        }
        Ok(())
    }

    /// Idempotent via the unique index on `event_id`: a second call for the
    /// same event is a silent no-op rather than an error (§8 property 3).
    #[allow(clippy::too_many_arguments)]
    pub fn insert_inbox(
        &self,
        user_id: &str,
        event_id: i64,
        tag: &[u8; 32],
        r: &[u8],
        memo: &[u8],
        commitment: &[u8; 32],
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT OR IGNORE INTO inbox (user_id, event_id, tag, r, memo, commitment, status, detected_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'unread', ?7)",
            params![
                user_id,
                event_id,
                tag.as_slice(),
                r,
                memo,
                commitment.as_slice(),
                now.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn inbox_for_user(&self, user_id: &str) -> Result<Vec<InboxEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, event_id, tag, r, memo, commitment, status, detected_at
             FROM inbox WHERE user_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id], row_to_inbox_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn last_block(&self) -> Result<Option<i64>, StoreError> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'last_block'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.and_then(|v| v.parse().ok()))
    }

    /// Enforces §3 invariant 5: the caller is responsible for only ever
    /// passing a value >= the current watermark.
    pub fn set_last_block(&self, block: i64) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO meta (key, value) VALUES ('last_block', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![block.to_string()],
        )?;
        Ok(())
    }
}

fn row_to_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<AnnouncementEvent> {
    let tag_blob: Vec<u8> = row.get(3)?;
    let commitment_blob: Vec<u8> = row.get(6)?;
    let created_at: String = row.get(9)?;
    Ok(AnnouncementEvent {
        id: row.get(0)?,
        block: row.get(1)?,
        txhash: row.get(2)?,
        tag: blob_to_array(&tag_blob),
        r: row.get(4)?,
        memo: row.get(5)?,
        commitment: blob_to_array(&commitment_blob),
        scanned: row.get::<_, i64>(7)? != 0,
        matched: row.get::<_, i64>(8)? != 0,
        created_at: parse_rfc3339(&created_at),
    })
}

fn row_to_inbox_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<InboxEntry> {
    let tag_blob: Vec<u8> = row.get(3)?;
    let commitment_blob: Vec<u8> = row.get(6)?;
    let status: String = row.get(7)?;
    let detected_at: String = row.get(8)?;
    Ok(InboxEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        event_id: row.get(2)?,
        tag: blob_to_array(&tag_blob),
        r: row.get(4)?,
        memo: row.get(5)?,
        commitment: blob_to_array(&commitment_blob),
        status: InboxStatus::parse(&status).unwrap_or(InboxStatus::Unread),
        detected_at: parse_rfc3339(&detected_at),
    })
}

fn blob_to_array(blob: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let n = blob.len().min(32);
    out[..n].copy_from_slice(&blob[..n]);
    out
}

fn parse_rfc3339(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(store: &EventStore) -> i64 {
        store
            .insert_event(1, "deadbeef", &[0xaa; 32], &[0x02; 33], b"memo", &[0xbb; 32])
            .unwrap()
    }

    #[test]
    fn fetch_unscanned_returns_new_rows() {
        let store = EventStore::open_in_memory().unwrap();
        let id = sample_event(&store);
        let rows = store.fetch_unscanned(10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert!(!rows[0].scanned);
    }

    #[test]
    fn mark_scanned_excludes_from_future_fetch() {
        let store = EventStore::open_in_memory().unwrap();
        let id = sample_event(&store);
        store.mark_scanned(id, false).unwrap();
        assert!(store.fetch_unscanned(10).unwrap().is_empty());
    }

    #[test]
    fn mark_scanned_missing_event_errors() {
        let store = EventStore::open_in_memory().unwrap();
        assert!(matches!(
            store.mark_scanned(999, true),
            Err(StoreError::EventNotFound(999))
        ));
    }

    #[test]
    fn inbox_insert_is_idempotent() {
        let store = EventStore::open_in_memory().unwrap();
        let id = sample_event(&store);
        store
            .insert_inbox("alice", id, &[0xaa; 32], &[0x02; 33], b"memo", &[0xbb; 32])
            .unwrap();
        store
            .insert_inbox("alice", id, &[0xaa; 32], &[0x02; 33], b"memo", &[0xbb; 32])
            .unwrap();
        let rows = store.inbox_for_user("alice").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn watermark_roundtrips() {
        let store = EventStore::open_in_memory().unwrap();
        assert_eq!(store.last_block().unwrap(), None);
        store.set_last_block(42).unwrap();
        assert_eq!(store.last_block().unwrap(), Some(42));
        store.set_last_block(43).unwrap();
        assert_eq!(store.last_block().unwrap(), Some(43));
    }

    #[test]
    fn reset_scanned_requeues_event() {
        let store = EventStore::open_in_memory().unwrap();
        let id = sample_event(&store);
        store.mark_scanned(id, false).unwrap();
        store.reset_scanned(id).unwrap();
        assert_eq!(store.fetch_unscanned(10).unwrap().len(), 1);
    }

    #[test]
    fn file_backed_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.sqlite3");
        let path_str = path.to_str().unwrap();

        let id = {
            let store = EventStore::open(path_str).unwrap();
            let id = sample_event(&store);
            store.set_last_block(7).unwrap();
            id
        };

        let reopened = EventStore::open(path_str).unwrap();
        assert_eq!(reopened.last_block().unwrap(), Some(7));
        let rows = reopened.fetch_unscanned(10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
    }
}
