//! Subcommand bodies. Each returns what `main` prints, so they can be
//! tested without capturing stdout.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use steem_protocol::config::ChainConfig;
use steem_protocol::operation::Operation;
use steem_protocol::transaction::{Transaction, TransactionBuilder, TransactionHeader};
use steem_protocol::validation::ValidationPolicy;

use crate::cli::AssembleArgs;

/// Parses each `["name", {fields}]` argument into an operation.
fn compose_all(ops: &[String]) -> Result<Vec<Operation>> {
    ops.iter()
        .enumerate()
        .map(|(i, raw)| {
            let value: Value = serde_json::from_str(raw)
                .with_context(|| format!("--op #{} is not valid JSON", i + 1))?;
            Operation::compose_json(value).with_context(|| format!("--op #{} rejected", i + 1))
        })
        .collect()
}

/// One hex line per operation.
pub fn encode(ops: &[String]) -> Result<Vec<String>> {
    let ops = compose_all(ops)?;
    Ok(ops
        .iter()
        .map(|op| hex::encode(op.to_canonical_bytes()))
        .collect())
}

pub fn assemble(args: &AssembleArgs, chain: &ChainConfig) -> Result<Value> {
    let block_id = hex::decode(&args.ref_block).context("--ref-block is not hex")?;
    let expiration = DateTime::parse_from_rfc3339(&args.expiration)
        .context("--expiration is not an RFC 3339 time")?
        .with_timezone(&Utc);
    let header = TransactionHeader::from_reference_block(&block_id, expiration)
        .context("--ref-block is too short")?;

    let policy: ValidationPolicy = args.skip.iter().copied().collect();
    let mut builder = TransactionBuilder::new(header)
        .chain(chain.clone())
        .policy(policy)
        .operations(compose_all(&args.ops)?);
    if args.check_expiration {
        builder = builder.reference_time(Utc::now());
    }
    let tx = builder.build().context("transaction rejected")?;

    let request = tx.signing_request(chain);
    tracing::info!(
        tx_id = %tx.id(),
        operations = tx.operations().len(),
        signers = request.required.len(),
        "transaction assembled"
    );

    Ok(json!({
        "transaction": tx.to_json(),
        "hex": hex::encode(tx.serialized()),
        "digest": request.digest,
        "id": tx.id(),
        "required_authorities": request.required,
    }))
}

pub fn decode(hex_tx: &str) -> Result<Value> {
    let bytes = hex::decode(hex_tx.trim()).context("--hex is not hex")?;
    let tx = Transaction::decode(&bytes).context("failed to decode transaction")?;
    Ok(json!({
        "transaction": tx.to_json(),
        "id": tx.id(),
        "required_authorities": tx.required_authorities(),
    }))
}
