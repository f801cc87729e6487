//! # Validation Engine
//!
//! Operation-level business rules, checked before anything is encoded.
//!
//! Rules are grouped into [`ValidationCategory`] values so a caller can
//! switch off one group for one call. That matters when rebuilding
//! transactions from historical chain data: blocks from before a rule
//! existed can violate it, and replaying them must still produce the exact
//! bytes the chain accepted back then. [`ValidationCategory::All`] turns
//! every check off.
//!
//! The skip set travels as a plain [`ValidationPolicy`] argument. There is
//! no global switch, so validation is a pure function of the operation, the
//! [`ChainConfig`], and the policy.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{
    ChainConfig, MAX_MEMO_LENGTH, MAX_PERMLINK_LENGTH, MAX_TITLE_LENGTH,
};
use crate::operation::Operation;
use crate::types::{AccountName, Asset, AssetSymbol};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A broken business rule. Each variant names the rule that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Wrong symbol for this operation, or an amount of the wrong sign.
    #[error("invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Memo longer than the chain allows.
    #[error("memo is {length} characters long; at most {max} are allowed")]
    MemoTooLong { length: usize, max: usize },

    /// Asset symbol that is not 1 to 7 uppercase ASCII letters.
    #[error("malformed asset symbol `{symbol}`")]
    InvalidSymbol { symbol: String },

    /// Account name that breaks the chain's naming rules.
    #[error("invalid account name `{name}`")]
    InvalidAccountName { name: String },

    #[error("permlink is {length} bytes long; it must be shorter than {max}")]
    PermlinkTooLong { length: usize, max: usize },

    #[error("title is {length} bytes long; it must be shorter than {max}")]
    TitleTooLong { length: usize, max: usize },

    /// A field that must carry JSON does not parse.
    #[error("{field} is not valid JSON: {reason}")]
    InvalidJson { field: &'static str, reason: String },

    #[error("vote weight {weight} is outside -10000..=10000")]
    InvalidWeight { weight: i16 },

    #[error("comment body must not be empty")]
    EmptyBody,

    /// An account points at itself where the chain forbids it.
    #[error("{field} cannot be the account itself ({account})")]
    SelfReference {
        field: &'static str,
        account: String,
    },

    /// `custom_json` without any signing account.
    #[error("at least one authority is required")]
    MissingAuthorities,

    #[error("custom id is {length} bytes long; at most {max} are allowed")]
    CustomIdTooLong { length: usize, max: usize },

    /// A transaction with nothing in it.
    #[error("a transaction needs at least one operation")]
    NoOperations,

    /// Expiration further out than nodes accept.
    #[error("expiration is {seconds}s away; at most {max}s is allowed")]
    ExpirationTooFar { seconds: i64, max: u64 },
}

// ---------------------------------------------------------------------------
// Categories & policy
// ---------------------------------------------------------------------------

/// Named groups of checks that can be skipped.
///
/// Rules outside every group (memo length, vote weight bounds, ...) only
/// yield to [`ValidationCategory::All`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValidationCategory {
    /// Skip validation entirely.
    #[serde(rename = "SKIP_ALL")]
    All,
    /// Symbol whitelists, amount signs, symbol well-formedness.
    #[serde(rename = "SKIP_ASSET_VALIDATION")]
    Asset,
    /// Account naming rules.
    #[serde(rename = "SKIP_ACCOUNT_NAME_VALIDATION")]
    AccountName,
    /// Permlink and title length limits.
    #[serde(rename = "SKIP_PERMLINK_VALIDATION")]
    Permlink,
    /// JSON well-formedness of metadata and `custom_json` payloads.
    #[serde(rename = "SKIP_JSON_VALIDATION")]
    Json,
}

impl ValidationCategory {
    pub const ALL: [ValidationCategory; 5] = [
        Self::All,
        Self::Asset,
        Self::AccountName,
        Self::Permlink,
        Self::Json,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::All => "SKIP_ALL",
            Self::Asset => "SKIP_ASSET_VALIDATION",
            Self::AccountName => "SKIP_ACCOUNT_NAME_VALIDATION",
            Self::Permlink => "SKIP_PERMLINK_VALIDATION",
            Self::Json => "SKIP_JSON_VALIDATION",
        }
    }
}

impl fmt::Display for ValidationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValidationCategory {
    type Err = String;

    /// Accepts the canonical names (`SKIP_ASSET_VALIDATION`) and short
    /// lowercase aliases (`asset`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(category) = Self::ALL.into_iter().find(|c| c.name() == s) {
            return Ok(category);
        }
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "asset" => Ok(Self::Asset),
            "account" | "account-name" | "account_name" => Ok(Self::AccountName),
            "permlink" => Ok(Self::Permlink),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown validation category `{}`", s)),
        }
    }
}

/// The set of categories to skip for one validation call.
///
/// The default policy skips nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationPolicy {
    skipped: BTreeSet<ValidationCategory>,
}

impl ValidationPolicy {
    /// Run every check.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Run no checks at all.
    pub fn skip_all() -> Self {
        Self::strict().skip(ValidationCategory::All)
    }

    /// Adds `category` to the skip set.
    pub fn skip(mut self, category: ValidationCategory) -> Self {
        self.skipped.insert(category);
        self
    }

    /// `true` when checks in `category` must not run.
    pub fn skips(&self, category: ValidationCategory) -> bool {
        self.skipped.contains(&ValidationCategory::All) || self.skipped.contains(&category)
    }

    pub fn skips_everything(&self) -> bool {
        self.skipped.contains(&ValidationCategory::All)
    }

    pub fn skipped(&self) -> impl Iterator<Item = ValidationCategory> + '_ {
        self.skipped.iter().copied()
    }
}

impl FromIterator<ValidationCategory> for ValidationPolicy {
    fn from_iter<I: IntoIterator<Item = ValidationCategory>>(iter: I) -> Self {
        Self {
            skipped: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Validates one operation under `policy`.
///
/// With [`ValidationCategory::All`] in the policy this returns `Ok(())`
/// without looking at the operation. Virtual operations always pass; the
/// chain produced them, so there is nothing to check.
pub fn validate_operation(
    operation: &Operation,
    config: &ChainConfig,
    policy: &ValidationPolicy,
) -> Result<(), ValidationError> {
    if policy.skips_everything() {
        return Ok(());
    }
    operation.validate_fields(&ValidationContext::new(config, policy))
}

// ---------------------------------------------------------------------------
// ValidationContext
// ---------------------------------------------------------------------------

/// The checks operations are built from, each honouring the policy.
///
/// Operations receive one of these in their `validate` method and call the
/// helpers field by field, so that every rule shared between operations
/// (account names, permlinks, symbols) is written once.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub config: &'a ChainConfig,
    pub policy: &'a ValidationPolicy,
}

impl<'a> ValidationContext<'a> {
    pub fn new(config: &'a ChainConfig, policy: &'a ValidationPolicy) -> Self {
        Self { config, policy }
    }

    fn skips(&self, category: ValidationCategory) -> bool {
        self.policy.skips(category)
    }

    pub fn account(&self, name: &AccountName) -> Result<(), ValidationError> {
        if self.skips(ValidationCategory::AccountName) || name.is_valid() {
            return Ok(());
        }
        Err(ValidationError::InvalidAccountName {
            name: name.to_string(),
        })
    }

    /// Like [`Self::account`], but an empty name is allowed.
    pub fn optional_account(&self, name: &AccountName) -> Result<(), ValidationError> {
        if name.is_empty() {
            return Ok(());
        }
        self.account(name)
    }

    pub fn permlink(&self, permlink: &str) -> Result<(), ValidationError> {
        if self.skips(ValidationCategory::Permlink) || permlink.len() < MAX_PERMLINK_LENGTH {
            return Ok(());
        }
        Err(ValidationError::PermlinkTooLong {
            length: permlink.len(),
            max: MAX_PERMLINK_LENGTH,
        })
    }

    pub fn title(&self, title: &str) -> Result<(), ValidationError> {
        if self.skips(ValidationCategory::Permlink) || title.len() < MAX_TITLE_LENGTH {
            return Ok(());
        }
        Err(ValidationError::TitleTooLong {
            length: title.len(),
            max: MAX_TITLE_LENGTH,
        })
    }

    /// Memo limit, counted in characters. Not tied to any category.
    pub fn memo(&self, memo: &str) -> Result<(), ValidationError> {
        let length = memo.chars().count();
        if length > MAX_MEMO_LENGTH {
            return Err(ValidationError::MemoTooLong {
                length,
                max: MAX_MEMO_LENGTH,
            });
        }
        Ok(())
    }

    /// `payload` must parse as JSON. Empty strings are the caller's call:
    /// check them or not before getting here.
    pub fn json(&self, field: &'static str, payload: &str) -> Result<(), ValidationError> {
        if self.skips(ValidationCategory::Json) {
            return Ok(());
        }
        serde_json::from_str::<serde_json::Value>(payload)
            .map(|_| ())
            .map_err(|e| ValidationError::InvalidJson {
                field,
                reason: e.to_string(),
            })
    }

    /// Symbol must be well formed and one of `allowed`.
    pub fn symbol_in(
        &self,
        asset: &Asset,
        allowed: &[&AssetSymbol],
        what: &str,
    ) -> Result<(), ValidationError> {
        if self.skips(ValidationCategory::Asset) {
            return Ok(());
        }
        if !asset.symbol.is_well_formed() {
            return Err(ValidationError::InvalidSymbol {
                symbol: asset.symbol.to_string(),
            });
        }
        if allowed.contains(&&asset.symbol) {
            return Ok(());
        }
        let names: Vec<&str> = allowed.iter().map(|s| s.as_str()).collect();
        Err(ValidationError::InvalidAmount {
            reason: format!("{} must be {}, got {}", what, names.join(" or "), asset.symbol),
        })
    }

    /// Symbol must be well formed and must not be any of `forbidden`.
    pub fn symbol_not(
        &self,
        asset: &Asset,
        forbidden: &AssetSymbol,
        what: &str,
    ) -> Result<(), ValidationError> {
        if self.skips(ValidationCategory::Asset) {
            return Ok(());
        }
        if !asset.symbol.is_well_formed() {
            return Err(ValidationError::InvalidSymbol {
                symbol: asset.symbol.to_string(),
            });
        }
        if asset.symbol == *forbidden {
            return Err(ValidationError::InvalidAmount {
                reason: format!("{} cannot be {}", what, forbidden),
            });
        }
        Ok(())
    }

    pub fn positive(&self, asset: &Asset, what: &str) -> Result<(), ValidationError> {
        if self.skips(ValidationCategory::Asset) || asset.is_positive() {
            return Ok(());
        }
        Err(ValidationError::InvalidAmount {
            reason: format!("{} must be greater than zero, got {}", what, asset),
        })
    }

    pub fn non_negative(&self, asset: &Asset, what: &str) -> Result<(), ValidationError> {
        if self.skips(ValidationCategory::Asset) || !asset.is_negative() {
            return Ok(());
        }
        Err(ValidationError::InvalidAmount {
            reason: format!("{} cannot be negative, got {}", what, asset),
        })
    }
}
