use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("event {0} not found")]
    EventNotFound(i64),

    #[error("malformed row: {0}")]
    Malformed(String),
}
