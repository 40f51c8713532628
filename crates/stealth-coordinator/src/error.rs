use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("node {node} returned an error: {message}")]
    NodeRejected { node: String, message: String },

    #[error(transparent)]
    Crypto(#[from] stealth_crypto::CryptoError),

    #[error("fewer than the threshold of valid share responses were collected (have {have}, need {need})")]
    InsufficientShares { have: usize, need: usize },

    #[error("threshold aggregation unavailable and strict_mpc is enabled")]
    ThresholdUnavailable,

    #[error("no local fallback key configured")]
    NoFallbackConfigured,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("store error: {0}")]
    Store(#[from] stealth_store::StoreError),
}
