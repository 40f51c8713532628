use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use stealth_core::NodeConfig;
use stealth_crypto::Share;
use stealth_node::app;
use stealth_node::handlers::AppState;

#[derive(Parser)]
#[command(name = "stealth-node")]
struct Cli {
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = match NodeConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let share = match Share::parse(config.node_index, config.view_sk_share_hex.as_str()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("invalid share: {e}");
            std::process::exit(1);
        }
    };

    log::info!("stealth-node starting, index={}", config.node_index);

    let state = Arc::new(AppState {
        share,
        auth_secret: config.auth_secret.as_ref().map(|s| s.as_bytes().to_vec()),
    });

    let router = app::build_router(state);

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("failed to bind {}: {e}", config.listen_addr);
            std::process::exit(1);
        }
    };

    log::info!("stealth-node listening on {}", config.listen_addr);

    if let Err(e) = axum::serve(listener, router).await {
        log::error!("server error: {e}");
        std::process::exit(1);
    }

    log::info!("stealth-node shutting down");
}
