//! # CLI Interface
//!
//! Defines the command-line argument structure for `steem-tx` using `clap`
//! derive. Supports four subcommands: `encode`, `assemble`, `decode`, and
//! `version`. Chain settings are global flags with environment fallbacks.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use steem_protocol::config::{ChainConfig, ChainId};
use steem_protocol::types::AssetSymbol;
use steem_protocol::validation::ValidationCategory;

use crate::logging::LogFormat;

/// Offline Steem transaction tool.
///
/// Composes operations from JSON, validates them, and prints canonical
/// bytes, signing digests, and transaction ids. Never talks to a node.
#[derive(Parser, Debug)]
#[command(
    name = "steem-tx",
    about = "Offline Steem transaction encoder and assembler",
    version,
    propagate_version = true
)]
pub struct SteemTxCli {
    #[command(flatten)]
    pub chain: ChainArgs,

    /// Log output format (logs go to stderr).
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the canonical bytes of each operation as hex.
    Encode(EncodeArgs),
    /// Validate and assemble a transaction, then print its digest and id.
    Assemble(AssembleArgs),
    /// Decode a serialized transaction and print it as JSON.
    Decode(DecodeArgs),
    /// Print version information and exit.
    Version,
}

/// Target chain. A JSON config file, if given, is read first; individual
/// flags then override its fields. Without either, mainnet is used.
#[derive(Args, Debug, Default)]
pub struct ChainArgs {
    /// JSON file holding a full chain configuration.
    #[arg(long, global = true, env = "STEEM_CONFIG")]
    pub config: Option<PathBuf>,

    /// 64-character hex chain id.
    #[arg(long, global = true, env = "STEEM_CHAIN_ID")]
    pub chain_id: Option<String>,

    /// Liquid token symbol.
    #[arg(long, global = true, env = "STEEM_TOKEN_SYMBOL")]
    pub token_symbol: Option<String>,

    /// Dollar token symbol.
    #[arg(long, global = true, env = "STEEM_DOLLAR_SYMBOL")]
    pub dollar_symbol: Option<String>,

    /// Vesting share symbol.
    #[arg(long, global = true, env = "STEEM_VESTS_SYMBOL")]
    pub vests_symbol: Option<String>,
}

impl ChainArgs {
    pub fn resolve(&self) -> Result<ChainConfig> {
        let mut chain = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read chain config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse chain config {}", path.display()))?
            }
            None => ChainConfig::mainnet(),
        };

        if let Some(id) = &self.chain_id {
            chain.chain_id = ChainId::from_hex(id).context("invalid --chain-id")?;
        }
        if let Some(symbol) = &self.token_symbol {
            chain.token_symbol = AssetSymbol::new(symbol.as_str());
        }
        if let Some(symbol) = &self.dollar_symbol {
            chain.dollar_symbol = AssetSymbol::new(symbol.as_str());
        }
        if let Some(symbol) = &self.vests_symbol {
            chain.vests_symbol = AssetSymbol::new(symbol.as_str());
        }
        Ok(chain)
    }
}

/// Arguments for the `encode` subcommand.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Operation as `["name", {fields}]`. Repeatable.
    #[arg(long = "op", required = true)]
    pub ops: Vec<String>,
}

/// Arguments for the `assemble` subcommand.
#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Hex id of the reference block (at least 8 bytes).
    #[arg(long)]
    pub ref_block: String,

    /// Expiration time, RFC 3339 (`2024-01-01T00:00:00Z`).
    #[arg(long)]
    pub expiration: String,

    /// Operation as `["name", {fields}]`. Repeatable.
    #[arg(long = "op", required = true)]
    pub ops: Vec<String>,

    /// Validation category to skip (`asset`, `permlink`, `all`, ...).
    /// Repeatable.
    #[arg(long = "skip")]
    pub skip: Vec<ValidationCategory>,

    /// Reject an expiration more than an hour past the current time.
    #[arg(long)]
    pub check_expiration: bool,
}

/// Arguments for the `decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Serialized transaction as hex.
    #[arg(long)]
    pub hex: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        SteemTxCli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_ops_and_skips() {
        let cli = SteemTxCli::try_parse_from([
            "steem-tx",
            "assemble",
            "--ref-block",
            "0123456789abcdef",
            "--expiration",
            "2024-01-01T00:00:00Z",
            "--op",
            r#"["vote",{}]"#,
            "--op",
            r#"["vote",{}]"#,
            "--skip",
            "asset",
            "--skip",
            "SKIP_JSON_VALIDATION",
        ])
        .unwrap();

        match cli.command {
            Commands::Assemble(args) => {
                assert_eq!(args.ops.len(), 2);
                assert_eq!(args.skip, vec![ValidationCategory::Asset, ValidationCategory::Json]);
                assert!(!args.check_expiration);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn unknown_skip_category_is_rejected() {
        let result = SteemTxCli::try_parse_from([
            "steem-tx",
            "assemble",
            "--ref-block",
            "00",
            "--expiration",
            "2024-01-01T00:00:00Z",
            "--op",
            "[]",
            "--skip",
            "everything",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn encode_requires_an_op() {
        assert!(SteemTxCli::try_parse_from(["steem-tx", "encode"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = SteemTxCli::try_parse_from([
            "steem-tx",
            "decode",
            "--hex",
            "00",
            "--log-format",
            "json",
            "--token-symbol",
            "TESTS",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.chain.token_symbol.as_deref(), Some("TESTS"));
    }

    #[test]
    fn flags_override_mainnet() {
        let args = ChainArgs {
            chain_id: Some("11".repeat(32)),
            token_symbol: Some("TESTS".to_string()),
            ..ChainArgs::default()
        };
        let chain = args.resolve().unwrap();
        assert_eq!(chain.chain_id, ChainId::from_bytes([0x11; 32]));
        assert_eq!(chain.token_symbol.as_str(), "TESTS");
        assert_eq!(chain.dollar_symbol.as_str(), "SBD");
    }

    #[test]
    fn bad_chain_id_is_an_error() {
        let args = ChainArgs {
            chain_id: Some("xyz".to_string()),
            ..ChainArgs::default()
        };
        assert!(args.resolve().is_err());
    }
}
