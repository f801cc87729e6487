//! Cursor over an encoded buffer.

use super::{decode_varint, CodecError};
use crate::config::{ASSET_AMOUNT_WIDTH, ASSET_SYMBOL_WIDTH};

/// Reads wire-format values front to back out of a borrowed buffer.
///
/// Every read either returns a value and advances, or fails with
/// [`CodecError::MalformedInput`] and leaves the caller to discard the
/// reader. Length prefixes are checked against the remaining input before
/// anything is allocated, so a hostile length cannot trigger a huge
/// allocation.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails unless the whole buffer has been consumed.
    pub fn finish(&self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::malformed(format!("{} trailing byte(s)", n))),
        }
    }

    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < len {
            return Err(CodecError::malformed(format!(
                "truncated: needed {} byte(s) at offset {}, {} left",
                len,
                self.pos,
                self.remaining()
            )));
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.bytes[start..start + len])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.read_exact(N)?);
        Ok(arr)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_exact(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::malformed(format!(
                "invalid boolean byte 0x{:02x}",
                other
            ))),
        }
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, CodecError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Inverse of `write_fixed`: a little-endian unsigned integer of
    /// `width` bytes (1 to 8).
    pub fn read_fixed(&mut self, width: usize) -> Result<u64, CodecError> {
        if !(1..=8).contains(&width) {
            return Err(CodecError::malformed(format!(
                "unsupported fixed width {}",
                width
            )));
        }
        let mut buf = [0u8; 8];
        buf[..width].copy_from_slice(self.read_exact(width)?);
        Ok(u64::from_le_bytes(buf))
    }

    pub fn read_varint(&mut self) -> Result<u64, CodecError> {
        let (value, consumed) = decode_varint(&self.bytes[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    /// A varint that must fit in 32 bits (discriminants, counts).
    pub fn read_varint_u32(&mut self) -> Result<u32, CodecError> {
        let value = self.read_varint()?;
        u32::try_from(value)
            .map_err(|_| CodecError::malformed(format!("varint {} exceeds 32 bits", value)))
    }

    /// A length or element count. It must not exceed the bytes still
    /// available, since every element occupies at least one byte.
    pub fn read_length(&mut self) -> Result<usize, CodecError> {
        let len = self.read_varint_u32()? as usize;
        if len > self.remaining() {
            return Err(CodecError::malformed(format!(
                "length {} exceeds the {} byte(s) left",
                len,
                self.remaining()
            )));
        }
        Ok(len)
    }

    /// Inverse of `write_string`.
    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let len = self.read_length()?;
        let bytes = self.read_exact(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| CodecError::malformed(format!("invalid UTF-8 in string: {}", e)))
    }

    /// Inverse of `write_asset`: `(amount, precision, symbol)`.
    ///
    /// Trailing zero padding is stripped from the symbol. Padding in the
    /// middle of the field, or non-ASCII symbol bytes, are rejected.
    pub fn read_asset(&mut self) -> Result<(i64, u8, String), CodecError> {
        let amount = i64::from_le_bytes(self.read_array::<ASSET_AMOUNT_WIDTH>()?);
        let precision = self.read_u8()?;
        let field = self.read_array::<ASSET_SYMBOL_WIDTH>()?;
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        if field[end..].iter().any(|&b| b != 0) {
            return Err(CodecError::malformed("asset symbol has interior padding"));
        }
        let symbol = &field[..end];
        if !symbol.is_ascii() {
            return Err(CodecError::malformed("asset symbol is not ASCII"));
        }
        let symbol = String::from_utf8(symbol.to_vec())
            .map_err(|e| CodecError::malformed(format!("asset symbol: {}", e)))?;
        Ok((amount, precision, symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_asset, encode_fixed, encode_string, encode_varint};

    #[test]
    fn reads_primitives_in_sequence() {
        let mut buf = Vec::new();
        buf.extend(encode_varint(33));
        buf.extend(encode_string("alice"));
        buf.extend(encode_fixed(7, 4).unwrap());
        buf.extend(encode_asset(1000, "STEEM", 3));
        buf.push(1);

        let mut r = Reader::new(&buf);
        assert_eq!(r.read_varint_u32().unwrap(), 33);
        assert_eq!(r.read_string().unwrap(), "alice");
        assert_eq!(r.read_fixed(4).unwrap(), 7);
        assert_eq!(r.read_asset().unwrap(), (1000, 3, "STEEM".to_string()));
        assert!(r.read_bool().unwrap());
        assert!(r.finish().is_ok());
    }

    #[test]
    fn truncated_fixed_read_fails() {
        let mut r = Reader::new(&[0x01, 0x02]);
        assert!(matches!(
            r.read_u32(),
            Err(CodecError::MalformedInput { .. })
        ));
    }

    #[test]
    fn string_length_beyond_buffer_fails() {
        // Claims 200 bytes, carries 3.
        let mut r = Reader::new(&[0xc8, 0x01, b'a', b'b', b'c']);
        assert!(r.read_string().is_err());
    }

    #[test]
    fn invalid_utf8_fails() {
        let mut r = Reader::new(&[0x02, 0xc3, 0x28]);
        assert!(r.read_string().is_err());
    }

    #[test]
    fn discriminant_beyond_u32_fails() {
        let bytes = encode_varint(u64::from(u32::MAX) + 1);
        let mut r = Reader::new(&bytes);
        assert!(r.read_varint_u32().is_err());
    }

    #[test]
    fn invalid_bool_fails() {
        let mut r = Reader::new(&[0x02]);
        assert!(r.read_bool().is_err());
    }

    #[test]
    fn asset_with_interior_padding_fails() {
        let mut bytes = encode_asset(1, "AB", 3);
        bytes[12] = b'C'; // "AB\0C\0\0\0"
        let mut r = Reader::new(&bytes);
        assert!(r.read_asset().is_err());
    }

    #[test]
    fn finish_reports_trailing_bytes() {
        let r = Reader::new(&[0x00]);
        assert!(r.finish().is_err());
    }

    #[test]
    fn read_fixed_width_bounds() {
        let mut r = Reader::new(&[0u8; 16]);
        assert!(r.read_fixed(0).is_err());
        assert!(r.read_fixed(9).is_err());
        assert_eq!(r.read_fixed(8).unwrap(), 0);
    }
}
