//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] collects a header and operations, validates
//! every operation, and produces an immutable [`Transaction`] whose canonical
//! bytes are fixed at build time. Changing anything afterwards means going
//! back through [`Transaction::into_builder`], which rebuilds the bytes and
//! therefore every digest derived from them.
//!
//! The builder does not sign; that happens in [`super::signing`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::header::TransactionHeader;
use super::signing::{SigningDigest, SigningRequest};
use crate::authority::{resolve, RequiredAuthorities};
use crate::codec::{write_varint, Reader};
use crate::config::{ChainConfig, ChainId, TRANSACTION_ID_LENGTH};
use crate::crypto::hash::{sha256, sha256_multi};
use crate::error::ProtocolError;
use crate::operation::Operation;
use crate::types::Extensions;
use crate::validation::{validate_operation, ValidationCategory, ValidationError, ValidationPolicy};

// ---------------------------------------------------------------------------
// Serialization & digest
// ---------------------------------------------------------------------------

/// Canonical transaction bytes:
///
/// ```text
/// ref_block_num u16 | ref_block_prefix u32 | expiration u32
/// varint(op count) | op canonical bytes... | varint(0) extensions
/// ```
///
/// Fails with [`ProtocolError::UnsupportedOperation`] if any operation is
/// virtual, and with an encoding overflow if the expiration does not fit.
pub fn serialize(header: &TransactionHeader, operations: &[Operation]) -> Result<Vec<u8>, ProtocolError> {
    let mut out = Vec::with_capacity(16 + operations.len() * 64);
    header.write_to(&mut out)?;
    write_varint(&mut out, operations.len() as u64);
    for operation in operations {
        operation.write_to(&mut out)?;
    }
    Extensions.write_to(&mut out);
    Ok(out)
}

/// `SHA-256(chain_id || serialized)`: the value a signer signs.
pub fn digest(serialized: &[u8], chain_id: &ChainId) -> SigningDigest {
    SigningDigest::from_bytes(sha256_multi(&[chain_id.as_bytes(), serialized]))
}

/// Hex of the first 20 bytes of `SHA-256(serialized)`. The chain id is not
/// part of it.
pub fn transaction_id(serialized: &[u8]) -> String {
    hex::encode(&sha256(serialized)[..TRANSACTION_ID_LENGTH])
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// An assembled, validated, unsigned transaction.
///
/// Fields are private and there are no setters: the serialized bytes are
/// computed once in [`TransactionBuilder::build`] and every digest, id, and
/// signature refers to exactly those bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    header: TransactionHeader,
    operations: Vec<Operation>,
    bytes: Vec<u8>,
}

impl Transaction {
    pub fn header(&self) -> &TransactionHeader {
        &self.header
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The canonical bytes. Calling this twice returns the same buffer.
    pub fn serialized(&self) -> &[u8] {
        &self.bytes
    }

    /// The digest to sign for the chain named by `chain_id`.
    pub fn digest(&self, chain_id: &ChainId) -> SigningDigest {
        let digest = digest(&self.bytes, chain_id);
        tracing::trace!(chain_id = %chain_id, digest = %digest, "digest computed");
        digest
    }

    /// Transaction id as shown by block explorers and node APIs.
    pub fn id(&self) -> String {
        transaction_id(&self.bytes)
    }

    /// The minimal signing set for this transaction's operations.
    pub fn required_authorities(&self) -> RequiredAuthorities {
        resolve(&self.operations)
    }

    /// Everything an external signer needs: the digest and who must sign.
    pub fn signing_request(&self, chain: &ChainConfig) -> SigningRequest {
        let required = self.required_authorities();
        tracing::debug!(
            tx_id = %self.id(),
            signers = required.len(),
            "authorities resolved"
        );
        SigningRequest {
            digest: self.digest(&chain.chain_id),
            required,
        }
    }

    /// Reopens the transaction for changes.
    pub fn into_builder(self) -> TransactionBuilder {
        TransactionBuilder::new(self.header).operations(self.operations)
    }

    /// Parses canonical transaction bytes. Virtual operations are refused
    /// since no valid transaction carries one. No business rules are
    /// checked; decoded chain data is taken as the chain accepted it.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let mut reader = Reader::new(bytes);
        let header = TransactionHeader::read_from(&mut reader)?;
        let count = reader.read_length()?;
        let mut operations = Vec::with_capacity(count);
        for _ in 0..count {
            operations.push(Operation::read_from(&mut reader)?);
        }
        Extensions::read_from(&mut reader)?;
        reader.finish()?;

        let bytes = serialize(&header, &operations)?;
        Ok(Self {
            header,
            operations,
            bytes,
        })
    }

    /// The chain's JSON form of the unsigned transaction.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(TransactionJson::new(self, None))
    }
}

/// Chain JSON envelope, shared with the signed form.
#[derive(Serialize)]
pub(crate) struct TransactionJson<'a> {
    #[serde(flatten)]
    header: &'a TransactionHeader,
    operations: &'a [Operation],
    extensions: Extensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    signatures: Option<Vec<String>>,
}

impl<'a> TransactionJson<'a> {
    pub(crate) fn new(tx: &'a Transaction, signatures: Option<Vec<String>>) -> Self {
        Self {
            header: &tx.header,
            operations: &tx.operations,
            extensions: Extensions,
            signatures,
        }
    }
}

impl Serialize for Transaction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TransactionJson::new(self, None).serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Transaction`] values.
///
/// # Usage
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use steem_protocol::config::ChainConfig;
/// use steem_protocol::operation::Vote;
/// use steem_protocol::transaction::{TransactionBuilder, TransactionHeader};
///
/// let header = TransactionHeader::new(1234, 0xdead_beef, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
/// let tx = TransactionBuilder::new(header)
///     .operation(Vote::new("alice", "bob", "a-post", 10_000))
///     .build()
///     .unwrap();
///
/// let request = tx.signing_request(&ChainConfig::mainnet());
/// assert_eq!(request.required.len(), 1);
/// ```
///
/// Operations are validated against [`ChainConfig::mainnet`] with a strict
/// policy unless [`TransactionBuilder::chain`] and
/// [`TransactionBuilder::policy`] say otherwise.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    header: TransactionHeader,
    operations: Vec<Operation>,
    chain: ChainConfig,
    policy: ValidationPolicy,
    now: Option<DateTime<Utc>>,
}

impl TransactionBuilder {
    pub fn new(header: TransactionHeader) -> Self {
        Self {
            header,
            operations: Vec::new(),
            chain: ChainConfig::mainnet(),
            policy: ValidationPolicy::strict(),
            now: None,
        }
    }

    /// Replaces the header.
    pub fn header(mut self, header: TransactionHeader) -> Self {
        self.header = header;
        self
    }

    /// Appends one operation. Order is preserved on the wire.
    pub fn operation(mut self, operation: impl Into<Operation>) -> Self {
        self.operations.push(operation.into());
        self
    }

    pub fn operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    /// Chain whose symbols validation checks against.
    pub fn chain(mut self, chain: ChainConfig) -> Self {
        self.chain = chain;
        self
    }

    pub fn policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Adds one category to the skip set.
    pub fn skip(mut self, category: ValidationCategory) -> Self {
        self.policy = self.policy.skip(category);
        self
    }

    /// Enables the expiration window check against `now`.
    ///
    /// Without it the builder never looks at the clock, so the same inputs
    /// always build the same transaction.
    pub fn reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Validates and serializes.
    ///
    /// Virtual operations are always refused, even with validation skipped.
    pub fn build(self) -> Result<Transaction, ProtocolError> {
        if let Some(virtual_op) = self.operations.iter().find(|op| op.is_virtual()) {
            return Err(ProtocolError::UnsupportedOperation(format!(
                "{} is a virtual operation and cannot be broadcast",
                virtual_op.kind()
            )));
        }

        if !self.policy.skips_everything() {
            if self.operations.is_empty() {
                return Err(ValidationError::NoOperations.into());
            }
            for operation in &self.operations {
                validate_operation(operation, &self.chain, &self.policy)?;
            }
            if let Some(now) = self.now {
                self.header.check_expiration(now)?;
            }
        }

        let bytes = serialize(&self.header, &self.operations)?;
        tracing::debug!(
            operations = self.operations.len(),
            bytes = bytes.len(),
            "transaction built"
        );

        Ok(Transaction {
            header: self.header,
            operations: self.operations,
            bytes,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
