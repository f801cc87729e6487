//! Signing hand-off.
//!
//! This crate never touches key material. It hands a [`SigningRequest`]
//! (digest plus required authorities) to whoever holds the keys and takes
//! back one compact recoverable signature per authority. Signing is a
//! separate step from building because the keys may not be available at
//! construction time (hardware wallet, remote signer, offline machine).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::builder::{Transaction, TransactionJson};
use crate::authority::{AuthorityRequirement, RequiredAuthorities};
use crate::codec::{write_varint, CodecError};
use crate::config::{ChainConfig, SIGNATURE_LENGTH};
use crate::error::ProtocolError;

// ---------------------------------------------------------------------------
// SigningDigest
// ---------------------------------------------------------------------------

/// `SHA-256(chain_id || transaction)`, the 32 bytes a signer signs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SigningDigest([u8; 32]);

impl SigningDigest {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SigningDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningDigest({})", self.to_hex())
    }
}

impl fmt::Display for SigningDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for SigningDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// RecoverableSignature
// ---------------------------------------------------------------------------

/// A 65-byte compact signature: recovery byte, then `r`, then `s`. The
/// public key is recoverable from it, so transactions carry no keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature([u8; SIGNATURE_LENGTH]);

impl RecoverableSignature {
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let arr: [u8; SIGNATURE_LENGTH] = bytes.try_into().map_err(|_| {
            CodecError::malformed(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        let bytes = hex::decode(s)
            .map_err(|e| CodecError::malformed(format!("signature is not hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature({})", self.to_hex())
    }
}

impl fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RecoverableSignature {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Signer interface
// ---------------------------------------------------------------------------

/// What a signer receives: the digest and the authorities it must cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningRequest {
    pub digest: SigningDigest,
    pub required: RequiredAuthorities,
}

/// An external signer: wallet, HSM, remote service.
///
/// Implementations sign `digest` with the key of `requirement.account` at
/// `requirement.level` (or any higher level they hold).
pub trait DigestSigner {
    type Error: fmt::Display;

    fn sign_digest(
        &self,
        digest: &SigningDigest,
        requirement: &AuthorityRequirement,
    ) -> Result<RecoverableSignature, Self::Error>;
}

/// Asks `signer` for one signature per required authority and attaches
/// them.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use steem_protocol::authority::AuthorityRequirement;
/// use steem_protocol::config::ChainConfig;
/// use steem_protocol::operation::Vote;
/// use steem_protocol::transaction::{
///     sign_transaction, DigestSigner, RecoverableSignature, SigningDigest, TransactionBuilder,
///     TransactionHeader,
/// };
///
/// struct Fixed;
///
/// impl DigestSigner for Fixed {
///     type Error = String;
///
///     fn sign_digest(
///         &self,
///         _digest: &SigningDigest,
///         _requirement: &AuthorityRequirement,
///     ) -> Result<RecoverableSignature, String> {
///         Ok(RecoverableSignature::from_bytes([0x1f; 65]))
///     }
/// }
///
/// let header = TransactionHeader::new(1, 2, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
/// let tx = TransactionBuilder::new(header)
///     .operation(Vote::new("alice", "bob", "a-post", 10_000))
///     .build()
///     .unwrap();
///
/// let signed = sign_transaction(tx, &ChainConfig::mainnet(), &Fixed).unwrap();
/// assert_eq!(signed.signatures().len(), 1);
/// ```
pub fn sign_transaction<S: DigestSigner>(
    tx: Transaction,
    chain: &ChainConfig,
    signer: &S,
) -> Result<SignedTransaction, ProtocolError> {
    let request = tx.signing_request(chain);
    let mut signatures = Vec::with_capacity(request.required.len());
    for requirement in request.required.iter() {
        let signature = signer
            .sign_digest(&request.digest, &requirement)
            .map_err(|e| ProtocolError::Signer {
                account: requirement.account.clone(),
                reason: e.to_string(),
            })?;
        signatures.push((requirement, signature));
    }
    tx.attach_signatures(signatures)
}

impl Transaction {
    /// Attaches signatures, each keyed by the authority it was made with.
    ///
    /// Every required `(account, level)` must be covered by a signature for
    /// the same account at that level or higher; otherwise this fails with
    /// [`ProtocolError::MissingSignature`] for the first uncovered account.
    /// Signatures are kept in the order given, minus exact duplicates.
    pub fn attach_signatures<I>(self, signatures: I) -> Result<SignedTransaction, ProtocolError>
    where
        I: IntoIterator<Item = (AuthorityRequirement, RecoverableSignature)>,
    {
        let provided: Vec<(AuthorityRequirement, RecoverableSignature)> = signatures.into_iter().collect();

        for required in self.required_authorities().iter() {
            let covered = provided.iter().any(|(given, _)| {
                given.account == required.account && given.level.satisfies(required.level)
            });
            if !covered {
                return Err(ProtocolError::MissingSignature {
                    account: required.account,
                    level: required.level,
                });
            }
        }

        let mut ordered: Vec<RecoverableSignature> = Vec::with_capacity(provided.len());
        for (_, signature) in provided {
            if !ordered.contains(&signature) {
                ordered.push(signature);
            }
        }

        tracing::debug!(
            tx_id = %self.id(),
            signatures = ordered.len(),
            "signatures attached"
        );
        Ok(SignedTransaction {
            transaction: self,
            signatures: ordered,
        })
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A transaction ready for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: Transaction,
    signatures: Vec<RecoverableSignature>,
}

impl SignedTransaction {
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn signatures(&self) -> &[RecoverableSignature] {
        &self.signatures
    }

    /// Signatures do not change the id.
    pub fn id(&self) -> String {
        self.transaction.id()
    }

    /// `transaction bytes || varint(count) || 65-byte signatures`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let tx = self.transaction.serialized();
        let mut out = Vec::with_capacity(tx.len() + 1 + self.signatures.len() * SIGNATURE_LENGTH);
        out.extend_from_slice(tx);
        write_varint(&mut out, self.signatures.len() as u64);
        for signature in &self.signatures {
            out.extend_from_slice(signature.as_bytes());
        }
        out
    }

    /// The structured envelope for JSON transports.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

impl Serialize for SignedTransaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let signatures = self.signatures.iter().map(RecoverableSignature::to_hex).collect();
        TransactionJson::new(&self.transaction, Some(signatures)).serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::AuthorityLevel;
    use crate::operation::{ChangeRecoveryAccount, Transfer, Vote};
    use crate::transaction::{TransactionBuilder, TransactionHeader};
    use chrono::{TimeZone, Utc};

    fn header() -> TransactionHeader {
        TransactionHeader::new(7, 8, Utc.timestamp_opt(1_700_000_000, 0).unwrap())
    }

    fn two_signer_tx() -> Transaction {
        let config = ChainConfig::mainnet();
        TransactionBuilder::new(header())
            .operation(Vote::new("alice", "bob", "post", 100))
            .operation(Transfer::new("bob", "carol", config.token(1), ""))
            .build()
            .unwrap()
    }

    fn sig(byte: u8) -> RecoverableSignature {
        RecoverableSignature::from_bytes([byte; SIGNATURE_LENGTH])
    }

    /// Signs with a byte derived from the account name's length.
    struct Stub;

    impl DigestSigner for Stub {
        type Error = String;

        fn sign_digest(
            &self,
            _digest: &SigningDigest,
            requirement: &AuthorityRequirement,
        ) -> Result<RecoverableSignature, String> {
            match requirement.account.as_str() {
                "mallory" => Err("no key".to_string()),
                name => Ok(sig(name.len() as u8)),
            }
        }
    }

    #[test]
    fn signature_hex_roundtrip() {
        let s = sig(0xab);
        let parsed: RecoverableSignature = s.to_hex().parse().unwrap();
        assert_eq!(parsed, s);
        assert!(RecoverableSignature::from_hex("abcd").is_err());
        assert!(RecoverableSignature::from_slice(&[0u8; 64]).is_err());
    }

    #[test]
    fn attach_requires_every_authority() {
        let tx = two_signer_tx();
        let err = tx
            .attach_signatures(vec![(AuthorityRequirement::posting("alice"), sig(1))])
            .unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MissingSignature {
                account: "bob".into(),
                level: AuthorityLevel::Active
            }
        );
    }

    #[test]
    fn lower_level_signature_does_not_cover() {
        let tx = two_signer_tx();
        let result = tx.attach_signatures(vec![
            (AuthorityRequirement::posting("alice"), sig(1)),
            (AuthorityRequirement::posting("bob"), sig(2)),
        ]);
        assert!(matches!(result, Err(ProtocolError::MissingSignature { .. })));
    }

    #[test]
    fn higher_level_signature_covers() {
        let tx = two_signer_tx();
        let signed = tx
            .attach_signatures(vec![
                (AuthorityRequirement::owner("alice"), sig(1)),
                (AuthorityRequirement::active("bob"), sig(2)),
            ])
            .unwrap();
        assert_eq!(signed.signatures(), &[sig(1), sig(2)]);
    }

    #[test]
    fn duplicate_signatures_collapse() {
        let tx = TransactionBuilder::new(header())
            .operation(ChangeRecoveryAccount::new("alice", "bob"))
            .build()
            .unwrap();
        let signed = tx
            .attach_signatures(vec![
                (AuthorityRequirement::owner("alice"), sig(9)),
                (AuthorityRequirement::owner("alice"), sig(9)),
            ])
            .unwrap();
        assert_eq!(signed.signatures().len(), 1);
    }

    #[test]
    fn signed_bytes_append_signatures() {
        let tx = two_signer_tx();
        let unsigned = tx.serialized().to_vec();
        let signed = sign_transaction(tx, &ChainConfig::mainnet(), &Stub).unwrap();
        let bytes = signed.to_bytes();

        assert_eq!(&bytes[..unsigned.len()], unsigned.as_slice());
        assert_eq!(bytes[unsigned.len()], 2);
        assert_eq!(bytes.len(), unsigned.len() + 1 + 2 * SIGNATURE_LENGTH);
        assert_eq!(signed.id(), signed.transaction().id());
    }

    #[test]
    fn signer_failure_names_the_account() {
        let tx = TransactionBuilder::new(header())
            .operation(Vote::new("mallory", "bob", "post", 100))
            .build()
            .unwrap();
        let err = sign_transaction(tx, &ChainConfig::mainnet(), &Stub).unwrap_err();
        assert!(matches!(err, ProtocolError::Signer { ref account, .. } if account.as_str() == "mallory"));
    }

    #[test]
    fn signed_json_lists_hex_signatures() {
        let signed = sign_transaction(two_signer_tx(), &ChainConfig::mainnet(), &Stub).unwrap();
        let json = signed.to_json();
        assert_eq!(json["signatures"][0], sig(5).to_hex());
        assert_eq!(json["signatures"].as_array().unwrap().len(), 2);
        assert_eq!(json["operations"][0][0], "vote");
    }

    #[test]
    fn signing_request_serializes_digest_as_hex() {
        let tx = two_signer_tx();
        let request = tx.signing_request(&ChainConfig::mainnet());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["digest"], tx.digest(&ChainConfig::mainnet().chain_id).to_hex());
        assert_eq!(json["required"]["alice"], "posting");
        assert_eq!(json["required"]["bob"], "active");
    }
}
