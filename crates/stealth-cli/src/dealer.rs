//! `stealth-cli dealer new` / `dealer reconstruct` (§4.K).
//!
//! One-time key generation and break-glass recovery. Neither subcommand
//! is ever invoked by the coordinator or scanner at runtime; resharing
//! and rotation are explicitly out of scope (§1 Non-goals).

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use stealth_crypto::{shamir, Point, Scalar};

use crate::error::CliError;

#[derive(Serialize, Deserialize)]
struct ShareFile {
    index: u32,
    scalar_hex: String,
}

#[derive(Serialize, Deserialize)]
struct ViewPubkeyFile {
    view_pubkey_hex: String,
}

fn read_to_string(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn write_string(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Evaluate a degree-`(coefficients.len() - 1)` polynomial over `GF(n)` at
/// `x`, with `coefficients[0]` as the constant term (the secret).
fn eval_polynomial(coefficients: &[Scalar], x: u64) -> Scalar {
    let xs = Scalar::from_u64(x);
    let mut acc = Scalar::from_u64(0);
    let mut power = Scalar::from_u64(1);
    for coeff in coefficients {
        acc = acc.add(&coeff.mul(&power));
        power = power.mul(&xs);
    }
    acc
}

/// Sample a fresh view key, split it `(threshold, nodes)` over the
/// secp256k1 order, and write one share file per node plus the public
/// view key to `out_dir`.
pub fn new_dealer(threshold: u32, nodes: u32, out_dir: &Path) -> Result<(), CliError> {
    if threshold < 2 || threshold > nodes {
        return Err(CliError::BadThreshold);
    }

    fs::create_dir_all(out_dir).map_err(|source| CliError::Io {
        path: out_dir.display().to_string(),
        source,
    })?;

    let mut rng = OsRng;
    let secret = Scalar::random(&mut rng);
    let mut coefficients = vec![secret];
    for _ in 1..threshold {
        coefficients.push(Scalar::random(&mut rng));
    }

    for i in 1..=nodes {
        let share_scalar = eval_polynomial(&coefficients, i as u64);
        let file = ShareFile {
            index: i,
            scalar_hex: hex::encode(share_scalar.to_be_bytes()),
        };
        let path = out_dir.join(format!("share_{i}.json"));
        write_string(&path, &serde_json::to_string_pretty(&file).map_err(|source| CliError::Json {
            path: path.display().to_string(),
            source,
        })?)?;
    }

    let view_pubkey = Point::generator().mul(&secret);
    let pubkey_file = ViewPubkeyFile {
        view_pubkey_hex: hex::encode(view_pubkey.encode_compressed()),
    };
    let pubkey_path = out_dir.join("view_pubkey.json");
    write_string(
        &pubkey_path,
        &serde_json::to_string_pretty(&pubkey_file).map_err(|source| CliError::Json {
            path: pubkey_path.display().to_string(),
            source,
        })?,
    )?;

    Ok(())
}

/// Reconstruct the view scalar `v` from `>= threshold` share files via
/// off-curve Lagrange interpolation. Dangerous: the caller holds the full
/// secret in memory afterward. Never called by production code paths.
pub fn reconstruct(share_paths: &[PathBuf]) -> Result<Scalar, CliError> {
    if share_paths.len() < 2 {
        return Err(CliError::NotEnoughShares {
            have: share_paths.len(),
            need: 2,
        });
    }

    let mut indices = Vec::with_capacity(share_paths.len());
    let mut scalars = Vec::with_capacity(share_paths.len());
    for path in share_paths {
        let contents = read_to_string(path)?;
        let file: ShareFile = serde_json::from_str(&contents).map_err(|source| CliError::Json {
            path: path.display().to_string(),
            source,
        })?;
        let bytes = hex::decode(&file.scalar_hex)?;
        indices.push(file.index);
        scalars.push(Scalar::from_canonical_bytes(&bytes)?);
    }

    let coefficients = shamir::lagrange_coefficients_at_zero(&indices, share_paths.len())?;
    let reconstructed = scalars
        .iter()
        .zip(coefficients.iter())
        .fold(Scalar::from_u64(0), |acc, (s, c)| acc.add(&s.mul(c)));
    Ok(reconstructed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn new_dealer_writes_one_file_per_node_plus_pubkey() {
        let dir = tempdir().unwrap();
        new_dealer(2, 3, dir.path()).unwrap();
        assert!(dir.path().join("share_1.json").is_file());
        assert!(dir.path().join("share_2.json").is_file());
        assert!(dir.path().join("share_3.json").is_file());
        assert!(dir.path().join("view_pubkey.json").is_file());
    }

    #[test]
    fn new_dealer_rejects_bad_threshold() {
        let dir = tempdir().unwrap();
        assert!(matches!(new_dealer(1, 3, dir.path()), Err(CliError::BadThreshold)));
        assert!(matches!(new_dealer(5, 3, dir.path()), Err(CliError::BadThreshold)));
    }

    #[test]
    fn reconstruct_recovers_the_dealt_secret() {
        let dir = tempdir().unwrap();
        new_dealer(3, 5, dir.path()).unwrap();

        let pubkey_contents = read_to_string(&dir.path().join("view_pubkey.json")).unwrap();
        let pubkey_file: ViewPubkeyFile = serde_json::from_str(&pubkey_contents).unwrap();
        let expected_pubkey_bytes = hex::decode(&pubkey_file.view_pubkey_hex).unwrap();

        let shares: Vec<PathBuf> = (1..=3)
            .map(|i| dir.path().join(format!("share_{i}.json")))
            .collect();
        let reconstructed = reconstruct(&shares).unwrap();

        let recovered_pubkey = Point::generator().mul(&reconstructed);
        assert_eq!(recovered_pubkey.encode_compressed().to_vec(), expected_pubkey_bytes);
    }
}
