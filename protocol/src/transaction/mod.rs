//! # Transaction Module
//!
//! Assembly, serialization, and the signing hand-off for chain
//! transactions.
//!
//! ## Architecture
//!
//! ```text
//! header.rs   TaPoS reference block and expiration
//! builder.rs  TransactionBuilder, immutable Transaction, digest and id
//! signing.rs  SigningRequest, DigestSigner, SignedTransaction
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] validates every operation under the
//!    configured [`ValidationPolicy`](crate::validation::ValidationPolicy)
//!    and serializes once.
//! 2. **Request**: [`Transaction::signing_request`] yields the digest and the
//!    minimal set of authorities.
//! 3. **Sign**: an external [`DigestSigner`] returns one recoverable
//!    signature per authority; [`sign_transaction`] collects them.
//! 4. **Broadcast**: [`SignedTransaction::to_bytes`] or
//!    [`SignedTransaction::to_json`] goes to the transport layer.

pub mod builder;
pub mod header;
pub mod signing;

pub use builder::{digest, serialize, transaction_id, Transaction, TransactionBuilder};
pub use header::TransactionHeader;
pub use signing::{
    sign_transaction, DigestSigner, RecoverableSignature, SignedTransaction, SigningDigest,
    SigningRequest,
};
