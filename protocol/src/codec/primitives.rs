//! Encoders for the fixed-width integers, varints, strings, and assets of
//! the wire format.
//!
//! Each value has two entry points: `write_*` appends to an existing buffer
//! (used when assembling operations and transactions) and `encode_*` returns
//! a fresh `Vec<u8>` (handy for tests and for callers building byte layouts
//! by hand). Both produce identical bytes.

use super::CodecError;
use crate::config::{ASSET_SYMBOL_WIDTH, MAX_VARINT_BYTES};

// ---------------------------------------------------------------------------
// Varints
// ---------------------------------------------------------------------------

/// Appends the base-128 varint encoding of `n`.
pub fn write_varint(out: &mut Vec<u8>, mut n: u64) {
    loop {
        let group = (n & 0x7f) as u8;
        n >>= 7;
        if n == 0 {
            out.push(group);
            return;
        }
        out.push(group | 0x80);
    }
}

/// Base-128 varint encoding of `n`.
///
/// ```
/// use steem_protocol::codec::encode_varint;
///
/// assert_eq!(encode_varint(0), vec![0x00]);
/// assert_eq!(encode_varint(127), vec![0x7f]);
/// assert_eq!(encode_varint(300), vec![0xac, 0x02]);
/// ```
pub fn encode_varint(n: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_BYTES);
    write_varint(&mut out, n);
    out
}

/// Decodes a varint from the front of `bytes`, returning the value and the
/// number of bytes consumed.
///
/// Rejects truncated input, encodings longer than ten bytes, values that do
/// not fit in 64 bits, and non-minimal encodings (a trailing `0x00` group),
/// since none of those can come out of [`encode_varint`].
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize), CodecError> {
    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate().take(MAX_VARINT_BYTES) {
        let group = u64::from(byte & 0x7f);
        let shift = 7 * i as u32;
        if shift == 63 && group > 1 {
            return Err(CodecError::malformed("varint overflows 64 bits"));
        }
        value |= group << shift;
        if byte & 0x80 == 0 {
            if i > 0 && byte == 0 {
                return Err(CodecError::malformed("non-canonical varint"));
            }
            return Ok((value, i + 1));
        }
    }
    if bytes.len() >= MAX_VARINT_BYTES {
        Err(CodecError::malformed("varint longer than 10 bytes"))
    } else {
        Err(CodecError::malformed("truncated varint"))
    }
}

// ---------------------------------------------------------------------------
// Fixed-width integers
// ---------------------------------------------------------------------------

/// Appends `n` as a little-endian integer of exactly `width` bytes.
///
/// Fails with [`CodecError::EncodingOverflow`] when `n` needs more than
/// `width` bytes, or when `width` is not in `1..=8`. Nothing is written on
/// failure.
pub fn write_fixed(out: &mut Vec<u8>, n: u64, width: usize) -> Result<(), CodecError> {
    let fits = match width {
        1..=7 => n >> (8 * width) == 0,
        8 => true,
        _ => false,
    };
    if !fits {
        return Err(CodecError::EncodingOverflow {
            value: i128::from(n),
            width,
        });
    }
    out.extend_from_slice(&n.to_le_bytes()[..width]);
    Ok(())
}

/// Little-endian encoding of `n` in exactly `width` bytes.
///
/// ```
/// use steem_protocol::codec::encode_fixed;
///
/// assert_eq!(encode_fixed(0x0102, 4).unwrap(), vec![0x02, 0x01, 0x00, 0x00]);
/// assert!(encode_fixed(256, 1).is_err());
/// ```
pub fn encode_fixed(n: u64, width: usize) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(width);
    write_fixed(&mut out, n, width)?;
    Ok(out)
}

/// Appends a little-endian `u16`.
pub fn write_u16(out: &mut Vec<u8>, n: u16) {
    out.extend_from_slice(&n.to_le_bytes());
}

/// Appends a little-endian `u32`.
pub fn write_u32(out: &mut Vec<u8>, n: u32) {
    out.extend_from_slice(&n.to_le_bytes());
}

/// Appends a little-endian two's complement `i16`.
pub fn write_i16(out: &mut Vec<u8>, n: i16) {
    out.extend_from_slice(&n.to_le_bytes());
}

/// Appends a little-endian two's complement `i64`.
pub fn write_i64(out: &mut Vec<u8>, n: i64) {
    out.extend_from_slice(&n.to_le_bytes());
}

/// Appends a boolean as a single `0x00` / `0x01` byte.
pub fn write_bool(out: &mut Vec<u8>, b: bool) {
    out.push(u8::from(b));
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// Appends `varint(byte_length) || utf8_bytes`.
pub fn write_string(out: &mut Vec<u8>, s: &str) {
    write_varint(out, s.len() as u64);
    out.extend_from_slice(s.as_bytes());
}

/// Length-prefixed UTF-8 encoding of `s`.
///
/// ```
/// use steem_protocol::codec::encode_string;
///
/// assert_eq!(encode_string("bob"), vec![3, b'b', b'o', b'b']);
/// assert_eq!(encode_string(""), vec![0]);
/// ```
pub fn encode_string(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() + 2);
    write_string(&mut out, s);
    out
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// Appends an asset: 8-byte LE amount, precision byte, then the symbol
/// zero-padded (or cut) to seven bytes.
pub fn write_asset(out: &mut Vec<u8>, amount: i64, symbol: &str, precision: u8) {
    write_i64(out, amount);
    out.push(precision);
    let mut field = [0u8; ASSET_SYMBOL_WIDTH];
    let bytes = symbol.as_bytes();
    let len = bytes.len().min(ASSET_SYMBOL_WIDTH);
    field[..len].copy_from_slice(&bytes[..len]);
    out.extend_from_slice(&field);
}

/// Canonical 16-byte encoding of an asset.
///
/// ```
/// use steem_protocol::codec::encode_asset;
///
/// let bytes = encode_asset(1000, "STEEM", 3);
/// assert_eq!(bytes.len(), 16);
/// assert_eq!(&bytes[..8], &1000i64.to_le_bytes());
/// assert_eq!(bytes[8], 3);
/// assert_eq!(&bytes[9..], b"STEEM\0\0");
/// ```
pub fn encode_asset(amount: i64, symbol: &str, precision: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(16);
    write_asset(&mut out, amount, symbol, precision);
    out
}
