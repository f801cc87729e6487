//! # Authority Resolution
//!
//! Every account on the chain holds three key sets, ordered by power:
//!
//! ```text
//! posting  <  active  <  owner
//! ```
//!
//! A signature made with a higher authority also satisfies any lower one, so
//! when one transaction needs `alice` at posting level (a vote) and at active
//! level (a transfer), a single active signature covers both. [`resolve`]
//! folds the requirements of every operation into that minimal set: one
//! entry per account, holding the highest level any operation asked for.
//!
//! The fold is a commutative max-reduction, so the result does not depend on
//! operation order even though operations are always encoded in order.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operation::Operation;
use crate::types::AccountName;

// ---------------------------------------------------------------------------
// AuthorityLevel
// ---------------------------------------------------------------------------

/// Signing tier. The derived ordering is the chain's precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorityLevel {
    /// Social actions: votes, comments, reward claims.
    Posting,
    /// Fund movements and most account actions.
    Active,
    /// Key and recovery changes. Satisfies everything.
    Owner,
}

impl AuthorityLevel {
    /// `true` when a signature at `self` is enough for `required`.
    pub fn satisfies(self, required: AuthorityLevel) -> bool {
        self >= required
    }
}

impl fmt::Display for AuthorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posting => write!(f, "posting"),
            Self::Active => write!(f, "active"),
            Self::Owner => write!(f, "owner"),
        }
    }
}

// ---------------------------------------------------------------------------
// AuthorityRequirement
// ---------------------------------------------------------------------------

/// One `(account, level)` pair an operation needs a signature for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AuthorityRequirement {
    pub account: AccountName,
    pub level: AuthorityLevel,
}

impl AuthorityRequirement {
    pub fn new(account: impl Into<AccountName>, level: AuthorityLevel) -> Self {
        Self {
            account: account.into(),
            level,
        }
    }

    pub fn posting(account: impl Into<AccountName>) -> Self {
        Self::new(account, AuthorityLevel::Posting)
    }

    pub fn active(account: impl Into<AccountName>) -> Self {
        Self::new(account, AuthorityLevel::Active)
    }

    pub fn owner(account: impl Into<AccountName>) -> Self {
        Self::new(account, AuthorityLevel::Owner)
    }
}

impl fmt::Display for AuthorityRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.account, self.level)
    }
}

// ---------------------------------------------------------------------------
// RequiredAuthorities
// ---------------------------------------------------------------------------

/// The de-duplicated signing set of a transaction: each account mapped to
/// the highest level required of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredAuthorities(BTreeMap<AccountName, AuthorityLevel>);

impl RequiredAuthorities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one requirement, keeping `max(existing, new)` for the account.
    pub fn insert(&mut self, requirement: AuthorityRequirement) {
        self.0
            .entry(requirement.account)
            .and_modify(|level| *level = (*level).max(requirement.level))
            .or_insert(requirement.level);
    }

    /// The level required of `account`, if any.
    pub fn level_of(&self, account: &AccountName) -> Option<AuthorityLevel> {
        self.0.get(account).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Requirements in account order.
    pub fn iter(&self) -> impl Iterator<Item = AuthorityRequirement> + '_ {
        self.0
            .iter()
            .map(|(account, level)| AuthorityRequirement::new(account, *level))
    }

    pub fn as_map(&self) -> &BTreeMap<AccountName, AuthorityLevel> {
        &self.0
    }
}

impl Extend<AuthorityRequirement> for RequiredAuthorities {
    fn extend<I: IntoIterator<Item = AuthorityRequirement>>(&mut self, iter: I) {
        for requirement in iter {
            self.insert(requirement);
        }
    }
}

impl FromIterator<AuthorityRequirement> for RequiredAuthorities {
    fn from_iter<I: IntoIterator<Item = AuthorityRequirement>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for RequiredAuthorities {
    type Item = (AccountName, AuthorityLevel);
    type IntoIter = btree_map::IntoIter<AccountName, AuthorityLevel>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Aggregates the authority requirements of `operations`.
///
/// Operations that need no authority (every virtual operation among them)
/// contribute nothing. Never fails.
///
/// ```
/// use steem_protocol::authority::{resolve, AuthorityLevel};
/// use steem_protocol::operation::{Operation, Transfer, Vote};
/// use steem_protocol::types::Asset;
///
/// let ops: Vec<Operation> = vec![
///     Vote::new("alice", "bob", "a-post", 10_000).into(),
///     Transfer::new("alice", "bob", Asset::new(1_000, 3, "STEEM"), "").into(),
/// ];
/// let required = resolve(&ops);
/// assert_eq!(required.level_of(&"alice".into()), Some(AuthorityLevel::Active));
/// assert_eq!(required.len(), 1);
/// ```
pub fn resolve<'a, I>(operations: I) -> RequiredAuthorities
where
    I: IntoIterator<Item = &'a Operation>,
{
    operations
        .into_iter()
        .flat_map(Operation::required_authorities)
        .collect()
}
