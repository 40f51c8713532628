use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use stealth_coordinator::engine::ThresholdEngine;
use stealth_coordinator::scanner::Scanner;
use stealth_core::CoordinatorConfig;
use stealth_crypto::Scalar;
use stealth_store::EventStore;

#[derive(Parser)]
#[command(name = "stealth-coordinator")]
struct Cli {
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = match CoordinatorConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let local_fallback_key = match &config.local_view_key_hex {
        Some(hex_key) => match parse_local_key(hex_key.as_str()) {
            Ok(k) => Some(k),
            Err(e) => {
                eprintln!("invalid local_view_key_hex: {e}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let store = match EventStore::open(&config.db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to open event store at {}: {e}", config.db_path);
            std::process::exit(1);
        }
    };

    let http_client = reqwest::Client::new();
    let engine = ThresholdEngine {
        nodes: config.nodes.clone(),
        threshold: config.threshold as usize,
        http_client,
        http_timeout: Duration::from_secs_f64(config.http_timeout_s),
        auth_secret: config.auth_secret.as_ref().map(|s| s.as_bytes().to_vec()),
        tag_codec: config.tag_codec,
        strict_mpc: config.strict_mpc,
        local_fallback_key,
    };

    log::info!(
        "stealth-coordinator starting: {} node(s), threshold {}, strict_mpc={}",
        config.nodes.len(),
        config.threshold,
        config.strict_mpc
    );

    let scanner = Scanner {
        store,
        engine,
        user_id: config.user_id.clone(),
        loop_interval: Duration::from_secs_f64(config.loop_interval_s),
        batch_size: 100,
    };

    if let Err(e) = scanner.run_forever().await {
        log::error!("scanner exited: {e}");
        std::process::exit(1);
    }
}

fn parse_local_key(hex_key: &str) -> Result<Scalar, stealth_crypto::CryptoError> {
    let stripped = hex_key.strip_prefix("0x").unwrap_or(hex_key);
    let bytes = hex::decode(stripped).map_err(|_| stealth_crypto::CryptoError::InvalidHex)?;
    Scalar::from_canonical_bytes(&bytes)
}
