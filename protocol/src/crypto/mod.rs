//! # Cryptographic Primitives
//!
//! Hashing only. Key handling and elliptic-curve signing belong to the
//! external signer that receives the digest (see
//! [`crate::transaction::DigestSigner`]).

pub mod hash;

pub use hash::{sha256, sha256_multi};
