//! Typed, validated configuration for the coordinator/scanner binary and
//! the share-node binary (§4.H, §6).
//!
//! Configuration is read exactly once, here, at process start. Nothing
//! else in the codebase reads an environment variable directly.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use stealth_crypto::TagCodec;
use url::Url;
use zeroize::Zeroize;

use crate::error::ConfigError;

const ENV_PREFIX: &str = "STEALTH_";

/// A pre-shared authentication secret. Never `Debug`-printed and never
/// logged (§4.D, §4.H).
#[derive(Clone)]
pub struct AuthSecret(Vec<u8>);

impl AuthSecret {
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        Ok(AuthSecret(hex::decode(stripped)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for AuthSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthSecret(<redacted>)")
    }
}

impl Drop for AuthSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A view-key scalar hex string, retained only long enough to be parsed
/// into a `stealth_crypto::Scalar` by the caller. Zeroized on drop.
#[derive(Clone)]
pub struct SecretHex(String);

impl SecretHex {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHex(<redacted>)")
    }
}

impl Drop for SecretHex {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawCoordinatorConfig {
    nodes: Option<Vec<String>>,
    threshold: Option<u32>,
    http_timeout_s: Option<f64>,
    auth_secret: Option<String>,
    tag_codec: Option<String>,
    strict_mpc: Option<bool>,
    loop_interval_s: Option<f64>,
    db_path: Option<String>,
    local_view_key_hex: Option<String>,
    user_id: Option<String>,
}

/// Coordinator + scanner configuration (§6 "Coordinator configuration").
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub nodes: Vec<Url>,
    pub threshold: u32,
    pub http_timeout_s: f64,
    pub auth_secret: Option<AuthSecret>,
    pub tag_codec: TagCodec,
    pub strict_mpc: bool,
    pub loop_interval_s: f64,
    pub db_path: String,
    /// Single-node/dev-mode local view key for fallback when
    /// `strict_mpc=false` and the threshold path is unavailable (§4.E).
    pub local_view_key_hex: Option<SecretHex>,
    /// The recipient this coordinator scans for. Not secret; only a
    /// partition key for the inbox table (§3).
    pub user_id: String,
}

impl CoordinatorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = load_raw::<RawCoordinatorConfig>(path)?;
        Self::from_raw_with_env(raw)
    }

    fn from_raw_with_env(mut raw: RawCoordinatorConfig) -> Result<Self, ConfigError> {
        let env = env_overrides();

        if let Some(v) = env.get("DB_PATH") {
            raw.db_path = Some(v.clone());
        }
        if let Some(v) = env.get("THRESHOLD") {
            raw.threshold = Some(v.parse().map_err(|_| ConfigError::InvalidField {
                field: "threshold",
                reason: format!("{v} is not a valid integer"),
            })?);
        }
        if let Some(v) = env.get("LOOP_INTERVAL_S") {
            raw.loop_interval_s = Some(v.parse().map_err(|_| ConfigError::InvalidField {
                field: "loop_interval_s",
                reason: format!("{v} is not a valid float"),
            })?);
        }
        if let Some(v) = env.get("HTTP_TIMEOUT_S") {
            raw.http_timeout_s = Some(v.parse().map_err(|_| ConfigError::InvalidField {
                field: "http_timeout_s",
                reason: format!("{v} is not a valid float"),
            })?);
        }
        if let Some(v) = env.get("STRICT_MPC") {
            raw.strict_mpc = Some(v == "1" || v.eq_ignore_ascii_case("true"));
        }
        if let Some(v) = env.get("AUTH_SECRET") {
            raw.auth_secret = Some(v.clone());
        }
        if let Some(v) = env.get("USER_ID") {
            raw.user_id = Some(v.clone());
        }

        let nodes_raw = raw.nodes.unwrap_or_default();
        let mut nodes = Vec::with_capacity(nodes_raw.len());
        for n in nodes_raw {
            let url = Url::parse(&n).map_err(|source| ConfigError::InvalidNodeUrl {
                url: n.clone(),
                source,
            })?;
            nodes.push(url);
        }

        let threshold = raw
            .threshold
            .ok_or(ConfigError::MissingField("threshold"))?;
        if threshold < 2 {
            return Err(ConfigError::ThresholdTooSmall(threshold));
        }
        if !nodes.is_empty() && (threshold as usize) > nodes.len() {
            return Err(ConfigError::ThresholdExceedsNodes {
                threshold,
                nodes: nodes.len(),
            });
        }

        let tag_codec = match raw.tag_codec.as_deref().unwrap_or("x32") {
            "x32" => TagCodec::X32,
            "comp33" => TagCodec::Comp33,
            "auto" => TagCodec::Auto,
            other => {
                return Err(ConfigError::InvalidField {
                    field: "tag_codec",
                    reason: format!("unknown codec {other}, expected x32, comp33, or auto"),
                })
            }
        };

        let auth_secret = raw
            .auth_secret
            .map(|s| AuthSecret::from_hex(&s))
            .transpose()
            .map_err(|_| ConfigError::InvalidField {
                field: "auth_secret",
                reason: "not valid hex".into(),
            })?;

        Ok(CoordinatorConfig {
            nodes,
            threshold,
            http_timeout_s: raw.http_timeout_s.unwrap_or(5.0),
            auth_secret,
            tag_codec,
            strict_mpc: raw.strict_mpc.unwrap_or(true),
            loop_interval_s: raw.loop_interval_s.unwrap_or(2.0),
            db_path: raw.db_path.ok_or(ConfigError::MissingField("db_path"))?,
            local_view_key_hex: raw.local_view_key_hex.map(SecretHex),
            user_id: raw.user_id.unwrap_or_else(|| "default".to_string()),
        })
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawNodeConfig {
    node_index: Option<u32>,
    view_sk_share_hex: Option<String>,
    auth_secret: Option<String>,
    listen_addr: Option<String>,
}

/// Share-node configuration (§6 "Share node configuration").
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub node_index: u32,
    pub view_sk_share_hex: SecretHex,
    pub auth_secret: Option<AuthSecret>,
    pub listen_addr: String,
}

impl NodeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = load_raw::<RawNodeConfig>(path)?;
        Self::from_raw_with_env(raw)
    }

    fn from_raw_with_env(mut raw: RawNodeConfig) -> Result<Self, ConfigError> {
        let env = env_overrides();

        if let Some(v) = env.get("NODE_INDEX") {
            raw.node_index = Some(v.parse().map_err(|_| ConfigError::InvalidField {
                field: "node_index",
                reason: format!("{v} is not a valid integer"),
            })?);
        }
        if let Some(v) = env.get("VIEW_SK_SHARE_HEX") {
            raw.view_sk_share_hex = Some(v.clone());
        }
        if let Some(v) = env.get("AUTH_SECRET") {
            raw.auth_secret = Some(v.clone());
        }
        if let Some(v) = env.get("LISTEN_ADDR") {
            raw.listen_addr = Some(v.clone());
        }

        let node_index = raw
            .node_index
            .ok_or(ConfigError::MissingField("node_index"))?;
        if node_index == 0 {
            return Err(ConfigError::InvalidField {
                field: "node_index",
                reason: "must be >= 1".into(),
            });
        }

        let view_sk_share_hex = raw
            .view_sk_share_hex
            .ok_or(ConfigError::MissingField("view_sk_share_hex"))?;
        // Validate shape now so a bad share fails fast at startup rather
        // than on the first request (§6 "Exit codes / lifecycle").
        stealth_crypto::Share::parse(node_index, &view_sk_share_hex).map_err(|e| {
            ConfigError::InvalidField {
                field: "view_sk_share_hex",
                reason: e.to_string(),
            }
        })?;

        let auth_secret = raw
            .auth_secret
            .map(|s| AuthSecret::from_hex(&s))
            .transpose()
            .map_err(|_| ConfigError::InvalidField {
                field: "auth_secret",
                reason: "not valid hex".into(),
            })?;

        Ok(NodeConfig {
            node_index,
            view_sk_share_hex: SecretHex(view_sk_share_hex),
            auth_secret,
            listen_addr: raw
                .listen_addr
                .unwrap_or_else(|| "127.0.0.1:7000".to_string()),
        })
    }
}

fn load_raw<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Snapshot of `STEALTH_*` environment variables, keys stripped of the
/// prefix. Read exactly once per `*Config::load` call.
fn env_overrides() -> HashMap<String, String> {
    env::vars()
        .filter_map(|(k, v)| k.strip_prefix(ENV_PREFIX).map(|k| (k.to_string(), v)))
        .collect()
}
