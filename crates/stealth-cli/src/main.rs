mod announce;
mod dealer;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stealth_crypto::TagCodec;

#[derive(Parser)]
#[command(name = "stealth-cli", about = "Operator tooling for the stealth wallet backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dealer key generation and break-glass recovery (§4.K).
    Dealer {
        #[command(subcommand)]
        action: DealerAction,
    },
    /// Build a literal announcement from the command line (§4.L).
    Announce {
        #[command(subcommand)]
        action: AnnounceAction,
    },
}

#[derive(Subcommand)]
enum DealerAction {
    /// Sample a view key, split it (t, n), and write share files.
    New {
        #[arg(long)]
        threshold: u32,
        #[arg(long)]
        nodes: u32,
        #[arg(long, default_value = "./dealer-out")]
        out_dir: PathBuf,
    },
    /// Reconstruct the view scalar from >= t share files. Dangerous.
    Reconstruct {
        #[arg(long = "shares", required = true, num_args = 2..)]
        share_files: Vec<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AnnounceAction {
    /// Encrypt a memo to a view pubkey, printing the announcement fields.
    Encrypt {
        #[arg(long)]
        view_pubkey: String,
        #[arg(long, default_value = "x32")]
        codec: String,
        #[arg(long)]
        memo: String,
    },
}

fn parse_codec(s: &str) -> Result<TagCodec, String> {
    match s {
        "x32" => Ok(TagCodec::X32),
        "comp33" => Ok(TagCodec::Comp33),
        "auto" => Ok(TagCodec::Auto),
        other => Err(format!("unknown codec {other}, expected x32, comp33, or auto")),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Dealer {
            action: DealerAction::New { threshold, nodes, out_dir },
        } => dealer::new_dealer(threshold, nodes, &out_dir).map(|()| {
            println!("wrote {nodes} share file(s) and view_pubkey.json to {}", out_dir.display());
        }),
        Command::Dealer {
            action: DealerAction::Reconstruct { share_files },
        } => dealer::reconstruct(&share_files).map(|secret| {
            eprintln!("WARNING: this reconstructs the full view key in process memory.");
            println!("view_sk_hex = 0x{}", hex::encode(secret.to_be_bytes()));
        }),
        Command::Announce {
            action: AnnounceAction::Encrypt { view_pubkey, codec, memo },
        } => {
            let codec = match parse_codec(&codec) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            };
            announce::encrypt(&view_pubkey, codec, memo.as_bytes()).map(|ann| {
                println!("{}", serde_json::to_string_pretty(&ann).expect("struct is always serializable"));
            })
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
