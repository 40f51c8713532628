//! Crate-wide error taxonomy glue (§7). Each layer keeps its own
//! `thiserror` enum; this one is for configuration, which is fatal at
//! startup and never surfaced to a caller across an HTTP boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    #[error("threshold must be >= 2, got {0}")]
    ThresholdTooSmall(u32),

    #[error("threshold ({threshold}) exceeds configured node count ({nodes})")]
    ThresholdExceedsNodes { threshold: u32, nodes: usize },

    #[error("invalid node URL {url}: {source}")]
    InvalidNodeUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
