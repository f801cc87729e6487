//! Crate-level error type.
//!
//! Each concern keeps its own error enum ([`CodecError`] for the wire
//! format, [`ValidationError`] for business rules). [`ProtocolError`] wraps
//! both for the entry points that can fail either way, and adds the failures
//! that only make sense at the operation and transaction level.

use thiserror::Error;

use crate::authority::AuthorityLevel;
use crate::codec::CodecError;
use crate::types::AccountName;
use crate::validation::ValidationError;

/// Everything that can go wrong while composing, assembling, decoding, or
/// signing a transaction. All variants are recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A virtual operation reached a public construction path or a
    /// transaction meant for broadcast, or an operation name is unknown.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// No signature covers a required authority.
    #[error("missing {level} signature for {account}")]
    MissingSignature {
        account: AccountName,
        level: AuthorityLevel,
    },

    /// An external signer refused or failed to sign.
    #[error("signer failed for {account}: {reason}")]
    Signer { account: AccountName, reason: String },

    /// Operation fields in JSON that do not match the operation's shape.
    #[error("invalid {kind} fields: {reason}")]
    InvalidFields { kind: String, reason: String },
}

/// Shorthand used throughout the crate.
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;
