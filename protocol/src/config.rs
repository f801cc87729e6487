//! # Protocol Configuration & Constants
//!
//! Every limit the consensus rules impose on an operation lives here, next
//! to the [`ChainConfig`] value that names the chain a transaction is meant
//! for. Nothing in this crate reads configuration from global state: a
//! `ChainConfig` is built once by the caller and passed by reference into
//! validation and digest computation.
//!
//! These numbers are part of the chain's rule set, not tuning knobs. Moving
//! one of them makes this library produce transactions the chain rejects.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::CodecError;
use crate::types::{Asset, AssetSymbol};

// ---------------------------------------------------------------------------
// Chain Identifiers
// ---------------------------------------------------------------------------

/// Length of a chain identifier in bytes.
pub const CHAIN_ID_LENGTH: usize = 32;

/// The main network's chain id: 32 zero bytes.
pub const MAINNET_CHAIN_ID: [u8; CHAIN_ID_LENGTH] = [0u8; CHAIN_ID_LENGTH];

/// Liquid token symbol on the main network.
pub const MAINNET_TOKEN_SYMBOL: &str = "STEEM";

/// Dollar-pegged token symbol on the main network.
pub const MAINNET_DOLLAR_SYMBOL: &str = "SBD";

/// Vesting share symbol on the main network.
pub const MAINNET_VESTS_SYMBOL: &str = "VESTS";

// ---------------------------------------------------------------------------
// Asset Parameters
// ---------------------------------------------------------------------------

/// Decimal places of the liquid token.
pub const TOKEN_PRECISION: u8 = 3;

/// Decimal places of the dollar token.
pub const DOLLAR_PRECISION: u8 = 3;

/// Decimal places of vesting shares.
pub const VESTS_PRECISION: u8 = 6;

/// Width of the little-endian amount field of an encoded asset.
pub const ASSET_AMOUNT_WIDTH: usize = 8;

/// Width of the zero-padded symbol field of an encoded asset.
pub const ASSET_SYMBOL_WIDTH: usize = 7;

// ---------------------------------------------------------------------------
// Operation Limits
// ---------------------------------------------------------------------------

/// Maximum memo length in characters. A memo of exactly this length is valid.
pub const MAX_MEMO_LENGTH: usize = 2048;

/// Permlinks must be strictly shorter than this.
pub const MAX_PERMLINK_LENGTH: usize = 256;

/// Comment titles must be strictly shorter than this.
pub const MAX_TITLE_LENGTH: usize = 256;

/// Shortest legal account name.
pub const MIN_ACCOUNT_NAME_LENGTH: usize = 3;

/// Longest legal account name.
pub const MAX_ACCOUNT_NAME_LENGTH: usize = 16;

/// 100% expressed in basis points. Vote weights live in `-10000..=10000`.
pub const MAX_VOTE_WEIGHT: i16 = 10_000;

/// Maximum length of a `custom_json` id, in bytes.
pub const MAX_CUSTOM_ID_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Transaction Parameters
// ---------------------------------------------------------------------------

/// Compact recoverable signature length: recovery byte plus r and s.
pub const SIGNATURE_LENGTH: usize = 65;

/// Transaction ids are the first 20 bytes of the SHA-256 of the serialized
/// transaction.
pub const TRANSACTION_ID_LENGTH: usize = 20;

/// Nodes refuse transactions that expire further out than this.
pub const MAX_TIME_UNTIL_EXPIRATION: Duration = Duration::from_secs(3_600);

/// A base-128 varint never needs more than 10 bytes for a `u64`.
pub const MAX_VARINT_BYTES: usize = 10;

// ---------------------------------------------------------------------------
// ChainId
// ---------------------------------------------------------------------------

/// The 32-byte identifier prepended to every transaction before hashing.
///
/// Signing the same transaction for two chains with different ids yields
/// two unrelated digests, which is what stops a transaction from being
/// replayed across networks. Serialized as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId([u8; CHAIN_ID_LENGTH]);

impl ChainId {
    /// Wraps raw chain id bytes.
    pub const fn from_bytes(bytes: [u8; CHAIN_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw chain id bytes.
    pub fn as_bytes(&self) -> &[u8; CHAIN_ID_LENGTH] {
        &self.0
    }

    /// Returns the chain id as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a 64-character hex chain id.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        let bytes = hex::decode(s)
            .map_err(|e| CodecError::malformed(format!("chain id is not hex: {}", e)))?;
        let arr: [u8; CHAIN_ID_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
            CodecError::malformed(format!(
                "chain id must be {} bytes, got {}",
                CHAIN_ID_LENGTH,
                b.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", self.to_hex())
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ChainId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// ChainConfig
// ---------------------------------------------------------------------------

/// Immutable description of the chain a transaction targets.
///
/// Validation needs the symbol names (which two tokens count as the
/// "primary" ones, which one is vesting shares) and the digest needs the
/// chain id. Both are read from this value instead of any process-wide
/// singleton, so two threads working against two different chains never
/// interfere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Identifier mixed into every signing digest.
    pub chain_id: ChainId,
    /// Liquid token symbol (`STEEM` on mainnet).
    pub token_symbol: AssetSymbol,
    /// Dollar-pegged token symbol (`SBD` on mainnet).
    pub dollar_symbol: AssetSymbol,
    /// Vesting share symbol (`VESTS` on mainnet).
    pub vests_symbol: AssetSymbol,
}

impl ChainConfig {
    /// Builds a configuration for an arbitrary chain.
    pub fn new(
        chain_id: ChainId,
        token_symbol: impl Into<AssetSymbol>,
        dollar_symbol: impl Into<AssetSymbol>,
        vests_symbol: impl Into<AssetSymbol>,
    ) -> Self {
        Self {
            chain_id,
            token_symbol: token_symbol.into(),
            dollar_symbol: dollar_symbol.into(),
            vests_symbol: vests_symbol.into(),
        }
    }

    /// The main network.
    pub fn mainnet() -> Self {
        Self::new(
            ChainId::from_bytes(MAINNET_CHAIN_ID),
            MAINNET_TOKEN_SYMBOL,
            MAINNET_DOLLAR_SYMBOL,
            MAINNET_VESTS_SYMBOL,
        )
    }

    /// `true` when `symbol` is the liquid token or the dollar token.
    pub fn is_primary_symbol(&self, symbol: &AssetSymbol) -> bool {
        *symbol == self.token_symbol || *symbol == self.dollar_symbol
    }

    /// Liquid token amount in its smallest unit (`1000` is `1.000 STEEM`).
    pub fn token(&self, amount: i64) -> Asset {
        Asset::new(amount, TOKEN_PRECISION, self.token_symbol.clone())
    }

    /// Dollar token amount in its smallest unit.
    pub fn dollar(&self, amount: i64) -> Asset {
        Asset::new(amount, DOLLAR_PRECISION, self.dollar_symbol.clone())
    }

    /// Vesting share amount in its smallest unit (`1000000` is `1.000000 VESTS`).
    pub fn vests(&self, amount: i64) -> Asset {
        Asset::new(amount, VESTS_PRECISION, self.vests_symbol.clone())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}
