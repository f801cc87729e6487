//! The frozen discriminant table.
//!
//! Every operation is tagged on the wire with its order id. The ids below
//! come from the chain's operation list and are never reassigned; gaps are
//! operations this crate does not model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifies an operation variant without carrying its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    Vote,
    Comment,
    Transfer,
    TransferToVesting,
    WithdrawVesting,
    AccountWitnessVote,
    AccountWitnessProxy,
    DeleteComment,
    CustomJson,
    ChangeRecoveryAccount,
    TransferToSavings,
    TransferFromSavings,
    CancelTransferFromSavings,
    DeclineVotingRights,
    ClaimRewardBalance,
    DelegateVestingShares,
    // Virtual
    AuthorReward,
    CurationReward,
    Interest,
    FillTransferFromSavings,
}

impl OperationKind {
    /// Every kind, in discriminant order.
    pub const ALL: [OperationKind; 20] = [
        Self::Vote,
        Self::Comment,
        Self::Transfer,
        Self::TransferToVesting,
        Self::WithdrawVesting,
        Self::AccountWitnessVote,
        Self::AccountWitnessProxy,
        Self::DeleteComment,
        Self::CustomJson,
        Self::ChangeRecoveryAccount,
        Self::TransferToSavings,
        Self::TransferFromSavings,
        Self::CancelTransferFromSavings,
        Self::DeclineVotingRights,
        Self::ClaimRewardBalance,
        Self::DelegateVestingShares,
        Self::AuthorReward,
        Self::CurationReward,
        Self::Interest,
        Self::FillTransferFromSavings,
    ];

    /// The wire discriminant.
    pub const fn order_id(self) -> u32 {
        match self {
            Self::Vote => 0,
            Self::Comment => 1,
            Self::Transfer => 2,
            Self::TransferToVesting => 3,
            Self::WithdrawVesting => 4,
            Self::AccountWitnessVote => 12,
            Self::AccountWitnessProxy => 13,
            Self::DeleteComment => 17,
            Self::CustomJson => 18,
            Self::ChangeRecoveryAccount => 26,
            Self::TransferToSavings => 32,
            Self::TransferFromSavings => 33,
            Self::CancelTransferFromSavings => 34,
            Self::DeclineVotingRights => 36,
            Self::ClaimRewardBalance => 39,
            Self::DelegateVestingShares => 40,
            Self::AuthorReward => 43,
            Self::CurationReward => 44,
            Self::Interest => 47,
            Self::FillTransferFromSavings => 51,
        }
    }

    /// The chain's JSON name, without the `_operation` suffix.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vote => "vote",
            Self::Comment => "comment",
            Self::Transfer => "transfer",
            Self::TransferToVesting => "transfer_to_vesting",
            Self::WithdrawVesting => "withdraw_vesting",
            Self::AccountWitnessVote => "account_witness_vote",
            Self::AccountWitnessProxy => "account_witness_proxy",
            Self::DeleteComment => "delete_comment",
            Self::CustomJson => "custom_json",
            Self::ChangeRecoveryAccount => "change_recovery_account",
            Self::TransferToSavings => "transfer_to_savings",
            Self::TransferFromSavings => "transfer_from_savings",
            Self::CancelTransferFromSavings => "cancel_transfer_from_savings",
            Self::DeclineVotingRights => "decline_voting_rights",
            Self::ClaimRewardBalance => "claim_reward_balance",
            Self::DelegateVestingShares => "delegate_vesting_shares",
            Self::AuthorReward => "author_reward",
            Self::CurationReward => "curation_reward",
            Self::Interest => "interest",
            Self::FillTransferFromSavings => "fill_transfer_from_savings",
        }
    }

    /// Chain-generated: never signed, never broadcast.
    pub const fn is_virtual(self) -> bool {
        matches!(
            self,
            Self::AuthorReward
                | Self::CurationReward
                | Self::Interest
                | Self::FillTransferFromSavings
        )
    }

    pub fn from_order_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.order_id() == id)
    }

    /// Looks a kind up by name. `transfer` and `transfer_operation` both
    /// resolve to [`OperationKind::Transfer`].
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_suffix("_operation").unwrap_or(name);
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown operation `{}`", s))
    }
}

impl Serialize for OperationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for OperationKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
