//! Account names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{write_string, CodecError, Reader};
use crate::config::{MAX_ACCOUNT_NAME_LENGTH, MIN_ACCOUNT_NAME_LENGTH};

/// The name of a chain account, e.g. `alice` or `steem.dao`.
///
/// Like [`super::AssetSymbol`], construction is unchecked: decoding chain
/// data must never fail just because an old account predates a naming rule.
/// [`AccountName::is_valid`] implements the chain's rules and is applied by
/// validation unless account-name checks are skipped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountName(String);

impl AccountName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Applies the chain's naming rules:
    ///
    /// - 3 to 16 bytes in total;
    /// - dot-separated labels, each at least 3 bytes long;
    /// - each label starts with `a-z`, ends with `a-z` or `0-9`, and
    ///   contains only `a-z`, `0-9`, and `-` in between.
    pub fn is_valid(&self) -> bool {
        let name = self.0.as_bytes();
        if !(MIN_ACCOUNT_NAME_LENGTH..=MAX_ACCOUNT_NAME_LENGTH).contains(&name.len()) {
            return false;
        }
        name.split(|&b| b == b'.').all(|label| {
            let (Some(&first), Some(&last)) = (label.first(), label.last()) else {
                return false;
            };
            label.len() >= MIN_ACCOUNT_NAME_LENGTH
                && first.is_ascii_lowercase()
                && (last.is_ascii_lowercase() || last.is_ascii_digit())
                && label[1..label.len() - 1]
                    .iter()
                    .all(|&b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        })
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        write_string(out, &self.0);
    }

    pub fn read_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        reader.read_string().map(Self)
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AccountName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&AccountName> for AccountName {
    fn from(name: &AccountName) -> Self {
        name.clone()
    }
}
