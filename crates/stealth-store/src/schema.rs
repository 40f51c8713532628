pub const SCHEMA_DDL: &str = "
CREATE TABLE IF NOT EXISTS events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    block       INTEGER NOT NULL,
    txhash      TEXT NOT NULL,
    tag         BLOB NOT NULL,
    r           BLOB NOT NULL,
    memo        BLOB NOT NULL,
    commitment  BLOB NOT NULL,
    scanned     INTEGER NOT NULL DEFAULT 0,
    matched     INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_scanned ON events(scanned);

CREATE TABLE IF NOT EXISTS inbox (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     TEXT NOT NULL,
    event_id    INTEGER NOT NULL,
    tag         BLOB NOT NULL,
    r           BLOB NOT NULL,
    memo        BLOB NOT NULL,
    commitment  BLOB NOT NULL,
    status      TEXT NOT NULL DEFAULT 'unread',
    detected_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_inbox_event_id ON inbox(event_id);

CREATE TABLE IF NOT EXISTS meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";
