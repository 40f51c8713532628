use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Crypto(#[from] stealth_crypto::CryptoError),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("need at least {need} share files, got {have}")]
    NotEnoughShares { have: usize, need: usize },

    #[error("threshold must be >= 2 and <= nodes")]
    BadThreshold,
}
