//! HTTP client for a single share node's `/scan_share` endpoint (§4.D, §6).

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use stealth_crypto::{kdf, Point};

use crate::error::CoordinatorError;

#[derive(Serialize)]
struct ScanShareRequest {
    #[serde(rename = "R")]
    r: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth: Option<String>,
}

#[derive(Deserialize)]
struct ScanShareResponse {
    i: u32,
    #[serde(rename = "Yi")]
    yi: String,
}

#[derive(Deserialize)]
struct NodeErrorBody {
    error: String,
}

pub async fn query_scan_share(
    client: &reqwest::Client,
    node: &Url,
    r_bytes: &[u8; 33],
    auth_secret: Option<&[u8]>,
    timeout: Duration,
) -> Result<(u32, Point), CoordinatorError> {
    let url = node
        .join("/scan_share")
        .map_err(|_| CoordinatorError::NodeRejected {
            node: node.to_string(),
            message: "invalid node URL".to_string(),
        })?;

    let auth = auth_secret.map(|secret| {
        let mut preimage = Vec::with_capacity(secret.len() + r_bytes.len());
        preimage.extend_from_slice(secret);
        preimage.extend_from_slice(r_bytes);
        format!("0x{}", hex::encode(kdf::keccak256(&preimage)))
    });

    let body = ScanShareRequest {
        r: format!("0x{}", hex::encode(r_bytes)),
        auth,
    };

    let response = client.post(url).json(&body).timeout(timeout).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response
            .json::<NodeErrorBody>()
            .await
            .map(|b| b.error)
            .unwrap_or_else(|_| status.to_string());
        return Err(CoordinatorError::NodeRejected {
            node: node.to_string(),
            message,
        });
    }

    let parsed: ScanShareResponse = response.json().await?;
    let yi_stripped = parsed.yi.strip_prefix("0x").unwrap_or(&parsed.yi);
    let yi_bytes = hex::decode(yi_stripped).map_err(|_| CoordinatorError::NodeRejected {
        node: node.to_string(),
        message: "Yi was not valid hex".to_string(),
    })?;
    let point = Point::decode_compressed(&yi_bytes)?;
    Ok((parsed.i, point))
}
