//! Blink Shop - terminal checkout for a Solana Action (Blink) shop.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! blink-shop catalog
//!
//! # Preview the payment sheet
//! blink-shop sheet --sku hoodie --qty 2
//!
//! # Request an unsigned checkout transaction and show technical details
//! blink-shop checkout --sku coffee --account <PUBKEY> --debug
//!
//! # Show the server's actions.json rules and checkout links
//! blink-shop actions
//! ```
//!
//! # Commands
//!
//! - `catalog` - List items for sale
//! - `sheet` - Show the payment sheet without contacting the server
//! - `checkout` - Run the three-call checkout against a Blink server
//! - `actions` - Describe the server's manifest and checkout metadata
//!
//! Defaults come from `BLINK_*` environment variables (see
//! `blink_checkout_client::config`). Logs go to stderr and are filtered with
//! `RUST_LOG`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::SelectionArgs;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "warn,blink_checkout_client=info,blink_shop=info";

#[derive(Parser)]
#[command(name = "blink-shop")]
#[command(author, version, about = "Blink checkout shop front")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List items for sale
    Catalog {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Show the payment sheet
    Sheet {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Request an unsigned checkout transaction
    Checkout {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Show technical details (raw responses and request trace)
        #[arg(short, long)]
        debug: bool,
    },
    /// Describe the server's actions.json rules and checkout links
    Actions {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.json_logs);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Catalog { selection } => commands::shop::catalog(&mut out, &selection)?,
        Commands::Sheet { selection } => commands::shop::sheet(&mut out, &selection)?,
        Commands::Checkout { selection, debug } => {
            return Ok(commands::checkout::run(&mut out, &selection, debug).await?);
        }
        Commands::Actions { selection } => commands::actions::list(&mut out, &selection).await?,
    }
    Ok(ExitCode::SUCCESS)
}
