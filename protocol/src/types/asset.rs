//! Fixed-point amounts tagged with a currency symbol.
//!
//! An [`Asset`] never touches floating point: `amount` is an integer count
//! of the smallest unit and `precision` says where the decimal point goes.
//! `Asset::new(1000, 3, "STEEM")` is `1.000 STEEM`.
//!
//! The textual form (`"1.000 STEEM"`) is what the chain's JSON interfaces
//! use, so it is also the serde representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{write_asset, CodecError, Reader};
use crate::config::ASSET_SYMBOL_WIDTH;

// ---------------------------------------------------------------------------
// AssetSymbol
// ---------------------------------------------------------------------------

/// Currency code of an asset, e.g. `STEEM`, `SBD`, `VESTS`.
///
/// Construction does not check the symbol, so that chain data with odd
/// symbols can still be decoded and inspected. [`AssetSymbol::is_well_formed`]
/// is what validation consults.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetSymbol(String);

impl AssetSymbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// One to seven ASCII uppercase letters.
    pub fn is_well_formed(&self) -> bool {
        (1..=ASSET_SYMBOL_WIDTH).contains(&self.0.len())
            && self.0.bytes().all(|b| b.is_ascii_uppercase())
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetSymbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AssetSymbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// An amount in the smallest unit of `symbol`, with `precision` decimals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asset {
    /// Signed count of the smallest unit.
    pub amount: i64,
    /// Number of decimal places.
    pub precision: u8,
    /// Currency code.
    pub symbol: AssetSymbol,
}

impl Asset {
    pub fn new(amount: i64, precision: u8, symbol: impl Into<AssetSymbol>) -> Self {
        Self {
            amount,
            precision,
            symbol: symbol.into(),
        }
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// Appends the canonical 16-byte encoding.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        write_asset(out, self.amount, self.symbol.as_str(), self.precision);
    }

    pub fn read_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let (amount, precision, symbol) = reader.read_asset()?;
        Ok(Self::new(amount, precision, symbol))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let precision = self.precision as usize;
        let digits = format!(
            "{:0>width$}",
            self.amount.unsigned_abs(),
            width = precision + 1
        );
        if precision == 0 {
            return write!(f, "{}{} {}", sign, digits, self.symbol);
        }
        let (whole, fraction) = digits.split_at(digits.len() - precision);
        write!(f, "{}{}.{} {}", sign, whole, fraction, self.symbol)
    }
}

impl FromStr for Asset {
    type Err = CodecError;

    /// Parses `"1.000 STEEM"`. The number of fractional digits becomes the
    /// precision, so `"1 STEEM"` and `"1.000 STEEM"` are different assets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (number, symbol) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| CodecError::malformed(format!("asset `{}` has no symbol", s)))?;
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(CodecError::malformed(format!("asset `{}` has no symbol", s)));
        }

        let (negative, digits) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
            || (digits.contains('.') && fraction.is_empty())
        {
            return Err(CodecError::malformed(format!(
                "asset amount `{}` is not a decimal number",
                number
            )));
        }
        let precision = u8::try_from(fraction.len())
            .map_err(|_| CodecError::malformed("asset precision exceeds 255 digits"))?;

        let magnitude: i64 = format!("{}{}", whole, fraction)
            .parse()
            .map_err(|_| CodecError::malformed(format!("asset amount `{}` out of range", number)))?;
        let amount = if negative { -magnitude } else { magnitude };

        Ok(Self::new(amount, precision, symbol))
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
