use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use stealth_crypto::{kdf, Point, Share};
use zeroize::Zeroize;

use crate::error::NodeError;

pub struct AppState {
    pub share: Share,
    pub auth_secret: Option<Vec<u8>>,
}

impl Drop for AppState {
    fn drop(&mut self) {
        if let Some(secret) = &mut self.auth_secret {
            secret.zeroize();
        }
    }
}

#[derive(Deserialize)]
pub struct ScanShareRequest {
    #[serde(rename = "R")]
    pub r: String,
    pub auth: Option<String>,
}

#[derive(Serialize)]
pub struct ScanShareResponse {
    pub i: u32,
    #[serde(rename = "Yi")]
    pub yi: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub index: u32,
}

fn parse_hex_field(value: &str) -> Result<Vec<u8>, NodeError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(stripped).map_err(|_| NodeError::BadRequest(stealth_crypto::CryptoError::InvalidHex))
}

/// `POST /scan_share` (§4.D, §6).
pub async fn scan_share(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScanShareRequest>,
) -> Result<Json<ScanShareResponse>, NodeError> {
    let r_bytes = parse_hex_field(&req.r)?;
    let r_point = Point::decode_compressed(&r_bytes)?;

    if let Some(secret) = &state.auth_secret {
        let provided = req.auth.as_deref().ok_or(NodeError::Unauthorized)?;
        let provided_bytes = parse_hex_field(provided).map_err(|_| NodeError::Unauthorized)?;
        let mut preimage = Vec::with_capacity(secret.len() + r_bytes.len());
        preimage.extend_from_slice(secret);
        preimage.extend_from_slice(&r_bytes);
        let expected = kdf::keccak256(&preimage);
        preimage.zeroize();
        if provided_bytes.len() != expected.len() || provided_bytes != expected.as_slice() {
            log::warn!("scan_share: auth mismatch for node index {}", state.share.index());
            return Err(NodeError::Unauthorized);
        }
    }

    let y_i = r_point.mul(state.share.scalar());
    let encoded = y_i.encode_compressed();
    log::debug!("scan_share: node {} served a request", state.share.index());

    Ok(Json(ScanShareResponse {
        i: state.share.index(),
        yi: format!("0x{}", hex::encode(encoded)),
    }))
}

/// `GET /health`. Never reveals the share (§6).
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        index: state.share.index(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn state_with_auth(secret: Option<&[u8]>) -> Arc<AppState> {
        Arc::new(AppState {
            share: Share::parse(1, &"11".repeat(32)).unwrap(),
            auth_secret: secret.map(|s| s.to_vec()),
        })
    }

    #[test]
    fn parse_hex_field_strips_prefix() {
        assert_eq!(parse_hex_field("0xaabb").unwrap(), vec![0xaa, 0xbb]);
        assert_eq!(parse_hex_field("aabb").unwrap(), vec![0xaa, 0xbb]);
    }

    #[test]
    fn parse_hex_field_rejects_bad_hex() {
        assert!(parse_hex_field("zz").is_err());
    }

    #[tokio::test]
    async fn scan_share_computes_y_i() {
        let state = state_with_auth(None);
        let r = Point::generator().encode_compressed();
        let req = ScanShareRequest {
            r: format!("0x{}", hex::encode(r)),
            auth: None,
        };
        let resp = scan_share(State(state), Json(req)).await.unwrap();
        assert_eq!(resp.0.i, 1);
        assert!(resp.0.yi.starts_with("0x"));
    }

    #[tokio::test]
    async fn scan_share_rejects_missing_auth_when_required() {
        let state = state_with_auth(Some(b"secret"));
        let r = Point::generator().encode_compressed();
        let req = ScanShareRequest {
            r: format!("0x{}", hex::encode(r)),
            auth: None,
        };
        let err = scan_share(State(state), Json(req)).await.unwrap_err();
        assert!(matches!(err, NodeError::Unauthorized));
    }

    #[tokio::test]
    async fn scan_share_accepts_correct_auth() {
        let secret = b"secret".to_vec();
        let state = state_with_auth(Some(&secret));
        let r = Point::generator().encode_compressed();
        let mut preimage = secret.clone();
        preimage.extend_from_slice(&r);
        let auth = kdf::keccak256(&preimage);
        let req = ScanShareRequest {
            r: format!("0x{}", hex::encode(r)),
            auth: Some(format!("0x{}", hex::encode(auth))),
        };
        assert!(scan_share(State(state), Json(req)).await.is_ok());
    }
}
