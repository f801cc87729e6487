//! Transaction header: TaPoS reference and expiration.
//!
//! Every transaction names a recent block ("transactions as proof of
//! stake"): the low 16 bits of its number and four bytes of its id. A node
//! only accepts the transaction on a fork that contains that block, and
//! only until `expiration`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{write_u16, write_u32, CodecError, Reader};
use crate::config::MAX_TIME_UNTIL_EXPIRATION;
use crate::validation::ValidationError;

/// Chain JSON time format. No zone suffix; always UTC.
pub const EXPIRATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Low 16 bits of the reference block number.
    pub ref_block_num: u16,
    /// Bytes 4..8 of the reference block id, little-endian.
    pub ref_block_prefix: u32,
    /// Encoded as whole seconds since the Unix epoch.
    #[serde(with = "expiration_format")]
    pub expiration: DateTime<Utc>,
}

impl TransactionHeader {
    pub fn new(ref_block_num: u16, ref_block_prefix: u32, expiration: DateTime<Utc>) -> Self {
        Self {
            ref_block_num,
            ref_block_prefix,
            expiration,
        }
    }

    /// Derives the TaPoS fields from a block id. The first four bytes of a
    /// block id are its number, big-endian.
    pub fn from_reference_block(block_id: &[u8], expiration: DateTime<Utc>) -> Result<Self, CodecError> {
        if block_id.len() < 8 {
            return Err(CodecError::malformed(format!(
                "block id must be at least 8 bytes, got {}",
                block_id.len()
            )));
        }
        let mut number = [0u8; 4];
        number.copy_from_slice(&block_id[..4]);
        let mut prefix = [0u8; 4];
        prefix.copy_from_slice(&block_id[4..8]);
        Ok(Self::new(
            (u32::from_be_bytes(number) & 0xffff) as u16,
            u32::from_le_bytes(prefix),
            expiration,
        ))
    }

    /// Expiration as the on-wire `u32` seconds. Times before 1970 or after
    /// 2106 do not fit.
    pub fn expiration_seconds(&self) -> Result<u32, CodecError> {
        let seconds = self.expiration.timestamp();
        u32::try_from(seconds).map_err(|_| CodecError::EncodingOverflow {
            value: i128::from(seconds),
            width: 4,
        })
    }

    /// Fails when the expiration lies further past `now` than nodes accept.
    /// An expiration in the past is not checked here; the node reports it.
    pub fn check_expiration(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let seconds = (self.expiration - now).num_seconds();
        let max = MAX_TIME_UNTIL_EXPIRATION.as_secs();
        if seconds > max as i64 {
            return Err(ValidationError::ExpirationTooFar { seconds, max });
        }
        Ok(())
    }

    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let expiration = self.expiration_seconds()?;
        write_u16(out, self.ref_block_num);
        write_u32(out, self.ref_block_prefix);
        write_u32(out, expiration);
        Ok(())
    }

    pub fn read_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let ref_block_num = reader.read_u16()?;
        let ref_block_prefix = reader.read_u32()?;
        let seconds = reader.read_u32()?;
        let expiration = DateTime::<Utc>::from_timestamp(i64::from(seconds), 0)
            .ok_or_else(|| CodecError::malformed(format!("expiration {} out of range", seconds)))?;
        Ok(Self::new(ref_block_num, ref_block_prefix, expiration))
    }
}

mod expiration_format {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(EXPIRATION_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, EXPIRATION_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
