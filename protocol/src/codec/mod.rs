//! # Primitive Codec
//!
//! The byte-level building blocks of the chain's wire format. Every field of
//! every operation is written with one of these functions, so a mistake here
//! invalidates every signature downstream.
//!
//! ## Wire rules
//!
//! - Multi-byte integers are little-endian.
//! - Variable-length integers are unsigned base-128: 7 value bits per byte,
//!   least significant group first, high bit set on every byte but the last.
//! - Strings are `varint(byte_length) || utf8_bytes`.
//! - Assets are an 8-byte signed amount, one precision byte, and a 7-byte
//!   zero-padded symbol.
//!
//! Encoders are in [`primitives`]; the decoding counterparts are methods on
//! [`Reader`], which never reads past the end of its buffer and never wraps
//! an oversized varint.

pub mod primitives;
pub mod reader;

pub use primitives::{
    decode_varint, encode_asset, encode_fixed, encode_string, encode_varint, write_asset,
    write_bool, write_fixed, write_i16, write_i64, write_string, write_u16, write_u32,
    write_varint,
};
pub use reader::Reader;

use thiserror::Error;

/// Errors raised while turning values into bytes or bytes back into values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The input is truncated, carries an out-of-range varint, invalid UTF-8,
    /// or otherwise cannot be the output of a canonical encoder.
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// What exactly was wrong with the input.
        reason: String,
    },

    /// A fixed-width encode was asked to store a value that does not fit.
    #[error("value {value} does not fit in {width} byte(s)")]
    EncodingOverflow {
        /// The value that was offered.
        value: i128,
        /// The target width in bytes.
        width: usize,
    },
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }
}
