// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # steem-tx
//!
//! Entry point for the `steem-tx` binary. Parses CLI arguments, initializes
//! logging, resolves the target chain, and runs one offline subcommand:
//!
//! - `encode`    print canonical operation bytes
//! - `assemble`  validate and build a transaction, print digest and id
//! - `decode`    parse a serialized transaction back to JSON
//! - `version`   print build version information

mod cli;
mod commands;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Commands, SteemTxCli};

fn main() -> Result<()> {
    let cli = SteemTxCli::parse();
    logging::init_logging(logging::DEFAULT_FILTER, cli.log_format);

    match cli.command {
        Commands::Encode(args) => {
            for line in commands::encode(&args.ops)? {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Assemble(args) => {
            let chain = cli.chain.resolve()?;
            tracing::debug!(chain_id = %chain.chain_id, token = %chain.token_symbol, "chain resolved");
            print_json(&commands::assemble(&args, &chain)?)
        }
        Commands::Decode(args) => print_json(&commands::decode(&args.hex)?),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{}", rendered);
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("steem-tx {}", env!("CARGO_PKG_VERSION"));
    println!("rustc    {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
