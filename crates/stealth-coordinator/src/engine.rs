//! The threshold scan/decrypt engine (§4.E): collect `t` distinct share
//! responses, Lagrange-aggregate on the curve, derive a tag or an ECIES
//! key, and optionally fall back to a local view key.

use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Url;
use stealth_crypto::{kdf, shamir, DerivedTag, Point, Scalar, TagCodec};
use zeroize::Zeroize;

use crate::error::CoordinatorError;
use crate::node_client::query_scan_share;

pub struct ThresholdEngine {
    pub nodes: Vec<Url>,
    pub threshold: usize,
    pub http_client: reqwest::Client,
    pub http_timeout: Duration,
    pub auth_secret: Option<Vec<u8>>,
    pub tag_codec: TagCodec,
    pub strict_mpc: bool,
    /// Single-node/dev-mode local copy of the view key, used only when
    /// `strict_mpc = false` and the threshold path is unavailable (§4.E).
    pub local_fallback_key: Option<Scalar>,
}

impl ThresholdEngine {
    /// Query all configured nodes concurrently and return as soon as
    /// `threshold` distinct indices have responded with valid points.
    /// Remaining in-flight requests are dropped (cancelled) at that point
    /// (§5 "Cancellation: outstanding requests beyond the t-th success
    /// SHOULD be cancelled").
    async fn gather_shares(&self, r_bytes: &[u8; 33]) -> Result<Vec<(u32, Point)>, CoordinatorError> {
        let mut in_flight: FuturesUnordered<_> = self
            .nodes
            .iter()
            .map(|node| {
                query_scan_share(
                    &self.http_client,
                    node,
                    r_bytes,
                    self.auth_secret.as_deref(),
                    self.http_timeout,
                )
            })
            .collect();

        let mut seen = HashSet::new();
        let mut collected = Vec::with_capacity(self.threshold);

        while let Some(result) = in_flight.next().await {
            match result {
                Ok((index, point)) => {
                    if seen.insert(index) {
                        collected.push((index, point));
                        if collected.len() >= self.threshold {
                            break;
                        }
                    }
                }
                Err(e) => {
                    log::warn!("share node request failed: {e}");
                }
            }
        }
        // Dropping `in_flight` here cancels any still-outstanding requests.

        if collected.len() < self.threshold {
            return Err(CoordinatorError::InsufficientShares {
                have: collected.len(),
                need: self.threshold,
            });
        }
        Ok(collected)
    }

    fn aggregate(&self, shares: &[(u32, Point)]) -> Result<Point, CoordinatorError> {
        let indices: Vec<u32> = shares.iter().map(|(i, _)| *i).collect();
        let coefficients = shamir::lagrange_coefficients_at_zero(&indices, self.threshold)?;
        let weighted: Vec<Point> = shares
            .iter()
            .zip(coefficients.iter())
            .map(|((_, y_i), lambda_i)| y_i.mul(lambda_i))
            .collect();
        Point::combine(&weighted).ok_or(CoordinatorError::InsufficientShares {
            have: 0,
            need: self.threshold,
        })
    }

    /// Resolve `S = v . R` via the threshold path, falling back to a local
    /// view key when permitted (§4.E fallback policy, §8 property 4).
    async fn shared_point(&self, r: &Point) -> Result<Point, CoordinatorError> {
        let r_bytes = r.encode_compressed();
        match self.gather_shares(&r_bytes).await {
            Ok(shares) => self.aggregate(&shares),
            Err(e) => {
                if self.strict_mpc {
                    log::error!("threshold aggregation failed under strict_mpc: {e}");
                    return Err(CoordinatorError::ThresholdUnavailable);
                }
                match &self.local_fallback_key {
                    Some(key) => {
                        log::warn!(
                            "falling back to local view key after threshold failure: {e}"
                        );
                        Ok(r.mul(key))
                    }
                    None => Err(CoordinatorError::NoFallbackConfigured),
                }
            }
        }
    }

    /// `derive_tag(R) -> {primary, alternate}` (§4.E).
    pub async fn derive_tag(&self, r: &Point) -> Result<DerivedTag, CoordinatorError> {
        let shared = self.shared_point(r).await?;
        let tag = kdf::derive_tag(&shared, self.tag_codec);

        let mut x = shared.x_coordinate();
        x.zeroize();
        let mut compressed = shared.encode_compressed();
        compressed.zeroize();

        Ok(tag)
    }

    /// `decrypt_ecies(R, iv, ct) -> plaintext` (§4.E).
    pub async fn decrypt_ecies(
        &self,
        r: &Point,
        iv: &[u8; 16],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CoordinatorError> {
        let shared = self.shared_point(r).await?;
        let mut x = shared.x_coordinate();
        let key = kdf::ecies_key(&x);
        x.zeroize();

        let plaintext = kdf::aes_ctr_apply(&key, iv, ciphertext)
            .map_err(|_| CoordinatorError::DecryptionFailed)?;
        Ok(plaintext)
    }
}
