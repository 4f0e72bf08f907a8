//! # erc20-api CLI
//!
//! Entry point for the `erc20-api` binary.
//!
//! Subcommands:
//! - `erc20-api serve`: Start the HTTP API
//! - `erc20-api token`: Print token metadata and supply
//! - `erc20-api balance`: Print the balance of an address

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// REST gateway for a deployed ERC-20 contract.
#[derive(Parser)]
#[command(name = "erc20-api", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Path to a YAML config file.
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Address to bind the HTTP server (default: 0.0.0.0:$PORT or 0.0.0.0:3001).
        #[arg(long, short)]
        addr: Option<SocketAddr>,
    },

    /// Print token name, symbol, decimals and total supply as JSON.
    Token {
        /// Path to a YAML config file.
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// Print the token balance of an address as JSON.
    Balance {
        /// Holder address (0x...).
        address: String,

        /// Path to a YAML config file.
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { config, addr } => commands::serve::run(config, addr).await,
        Commands::Token { config } => commands::query::token(config).await,
        Commands::Balance { address, config } => commands::query::balance(address, config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
