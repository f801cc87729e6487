//! # Hashing Utilities
//!
//! SHA-256 is the only hash the chain uses for transactions: the signing
//! digest is `SHA-256(chain_id || tx)` and the transaction id is a
//! truncated `SHA-256(tx)`. Both go through the helpers here.

use sha2::{Digest, Sha256};

/// SHA-256 of `data` as a fixed-size array.
///
/// # Example
///
/// ```
/// use steem_protocol::crypto::sha256;
///
/// let hash = sha256(b"");
/// assert_eq!(
///     hex::encode(hash),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    sha256_multi(&[data])
}

/// Hash multiple byte slices together without concatenation overhead.
///
/// `sha256_multi(&[a, b])` equals `sha256(&[a, b].concat())`. The signing
/// digest uses this to prepend the chain id without copying the
/// transaction.
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn multi_matches_concatenation() {
        let chain_id = [0u8; 32];
        let body = b"transaction bytes";
        let joined = [chain_id.as_slice(), body.as_slice()].concat();
        assert_eq!(sha256_multi(&[&chain_id, body]), sha256(&joined));
    }

    #[test]
    fn multi_with_no_parts_is_empty_hash() {
        assert_eq!(sha256_multi(&[]), sha256(b""));
    }

    #[test]
    fn different_inputs_different_hashes() {
        assert_ne!(sha256(b"alice"), sha256(b"bob"));
    }
}
