//! Account governance: witness approval, voting proxies, account recovery,
//! and giving up governance voting altogether.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{OperationKind, UserOperation};
use crate::authority::AuthorityRequirement;
use crate::codec::{write_bool, CodecError, Reader};
use crate::types::{AccountName, Extensions};
use crate::validation::{ValidationContext, ValidationError};

// ---------------------------------------------------------------------------
// account_witness_vote (12)
// ---------------------------------------------------------------------------

/// Approves (`approve = true`) or withdraws approval of a block producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWitnessVote {
    pub account: AccountName,
    pub witness: AccountName,
    pub approve: bool,
}

impl AccountWitnessVote {
    pub fn new(account: impl Into<AccountName>, witness: impl Into<AccountName>, approve: bool) -> Self {
        Self {
            account: account.into(),
            witness: witness.into(),
            approve,
        }
    }
}

impl UserOperation for AccountWitnessVote {
    const KIND: OperationKind = OperationKind::AccountWitnessVote;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.account.write_to(out);
        self.witness.write_to(out);
        write_bool(out, self.approve);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            account: AccountName::read_from(reader)?,
            witness: AccountName::read_from(reader)?,
            approve: reader.read_bool()?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::active(&self.account)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.account)?;
        ctx.account(&self.witness)
    }
}

// ---------------------------------------------------------------------------
// account_witness_proxy (13)
// ---------------------------------------------------------------------------

/// Delegates witness voting to `proxy`. An empty proxy clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWitnessProxy {
    pub account: AccountName,
    #[serde(default)]
    pub proxy: AccountName,
}

impl AccountWitnessProxy {
    pub fn new(account: impl Into<AccountName>, proxy: impl Into<AccountName>) -> Self {
        Self {
            account: account.into(),
            proxy: proxy.into(),
        }
    }
}

impl UserOperation for AccountWitnessProxy {
    const KIND: OperationKind = OperationKind::AccountWitnessProxy;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.account.write_to(out);
        self.proxy.write_to(out);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            account: AccountName::read_from(reader)?,
            proxy: AccountName::read_from(reader)?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::active(&self.account)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.account)?;
        ctx.optional_account(&self.proxy)?;
        if self.proxy == self.account {
            return Err(ValidationError::SelfReference {
                field: "proxy",
                account: self.account.to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// change_recovery_account (26)
// ---------------------------------------------------------------------------

/// Names the account allowed to recover `account_to_recover` after a key
/// compromise. Takes effect after a delay and needs the owner key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecoveryAccount {
    pub account_to_recover: AccountName,
    pub new_recovery_account: AccountName,
    #[serde(default)]
    pub extensions: Extensions,
}

impl ChangeRecoveryAccount {
    pub fn new(
        account_to_recover: impl Into<AccountName>,
        new_recovery_account: impl Into<AccountName>,
    ) -> Self {
        Self {
            account_to_recover: account_to_recover.into(),
            new_recovery_account: new_recovery_account.into(),
            extensions: Extensions,
        }
    }
}

impl UserOperation for ChangeRecoveryAccount {
    const KIND: OperationKind = OperationKind::ChangeRecoveryAccount;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.account_to_recover.write_to(out);
        self.new_recovery_account.write_to(out);
        self.extensions.write_to(out);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            account_to_recover: AccountName::read_from(reader)?,
            new_recovery_account: AccountName::read_from(reader)?,
            extensions: Extensions::read_from(reader)?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::owner(&self.account_to_recover)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.account_to_recover)?;
        ctx.account(&self.new_recovery_account)
    }
}

// ---------------------------------------------------------------------------
// decline_voting_rights (36)
// ---------------------------------------------------------------------------

/// Permanently gives up governance voting once the chain's waiting period
/// passes. `decline = false` cancels a pending request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclineVotingRights {
    pub account: AccountName,
    #[serde(default = "default_decline")]
    pub decline: bool,
}

fn default_decline() -> bool {
    true
}

impl DeclineVotingRights {
    pub fn new(account: impl Into<AccountName>, decline: bool) -> Self {
        Self {
            account: account.into(),
            decline,
        }
    }
}

impl UserOperation for DeclineVotingRights {
    const KIND: OperationKind = OperationKind::DeclineVotingRights;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.account.write_to(out);
        write_bool(out, self.decline);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            account: AccountName::read_from(reader)?,
            decline: reader.read_bool()?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::owner(&self.account)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.account)
    }
}
