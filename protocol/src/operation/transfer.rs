//! Operations that move funds: liquid transfers, savings, vesting, and
//! reward claims. All of them need at least active authority except the
//! reward claim, which only collects what the chain already credited.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{OperationKind, UserOperation};
use crate::authority::AuthorityRequirement;
use crate::codec::{write_string, write_u32, CodecError, Reader};
use crate::config::MAINNET_VESTS_SYMBOL;
use crate::types::{AccountName, Asset};
use crate::validation::{ValidationCategory, ValidationContext, ValidationError};

// ---------------------------------------------------------------------------
// transfer (2)
// ---------------------------------------------------------------------------

/// Liquid transfer between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: AccountName,
    pub to: AccountName,
    pub amount: Asset,
    #[serde(default)]
    pub memo: String,
}

impl Transfer {
    pub fn new(
        from: impl Into<AccountName>,
        to: impl Into<AccountName>,
        amount: Asset,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
            memo: memo.into(),
        }
    }
}

impl UserOperation for Transfer {
    const KIND: OperationKind = OperationKind::Transfer;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.from.write_to(out);
        self.to.write_to(out);
        self.amount.write_to(out);
        write_string(out, &self.memo);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            from: AccountName::read_from(reader)?,
            to: AccountName::read_from(reader)?,
            amount: Asset::read_from(reader)?,
            memo: reader.read_string()?,
        })
    }

    /// Moving vesting shares directly takes the owner key. Vesting share
    /// symbols are the same on every network, so no chain config is needed.
    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        let requirement = if self.amount.symbol.as_str() == MAINNET_VESTS_SYMBOL {
            AuthorityRequirement::owner(&self.from)
        } else {
            AuthorityRequirement::active(&self.from)
        };
        BTreeSet::from([requirement])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.from)?;
        ctx.account(&self.to)?;
        ctx.symbol_not(&self.amount, &ctx.config.vests_symbol, "transfer amount")?;
        ctx.positive(&self.amount, "transfer amount")?;
        ctx.memo(&self.memo)
    }
}

// ---------------------------------------------------------------------------
// transfer_to_vesting (3)
// ---------------------------------------------------------------------------

/// Converts liquid tokens into vesting shares for `to`, or for `from` itself
/// when `to` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferToVesting {
    pub from: AccountName,
    #[serde(default)]
    pub to: AccountName,
    pub amount: Asset,
}

impl TransferToVesting {
    pub fn new(from: impl Into<AccountName>, to: impl Into<AccountName>, amount: Asset) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

impl UserOperation for TransferToVesting {
    const KIND: OperationKind = OperationKind::TransferToVesting;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.from.write_to(out);
        self.to.write_to(out);
        self.amount.write_to(out);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            from: AccountName::read_from(reader)?,
            to: AccountName::read_from(reader)?,
            amount: Asset::read_from(reader)?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::active(&self.from)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.from)?;
        ctx.optional_account(&self.to)?;
        ctx.symbol_in(&self.amount, &[&ctx.config.token_symbol], "vesting amount")?;
        ctx.positive(&self.amount, "vesting amount")
    }
}

// ---------------------------------------------------------------------------
// withdraw_vesting (4)
// ---------------------------------------------------------------------------

/// Starts (or, with zero shares, stops) a vesting withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawVesting {
    pub account: AccountName,
    pub vesting_shares: Asset,
}

impl WithdrawVesting {
    pub fn new(account: impl Into<AccountName>, vesting_shares: Asset) -> Self {
        Self {
            account: account.into(),
            vesting_shares,
        }
    }
}

impl UserOperation for WithdrawVesting {
    const KIND: OperationKind = OperationKind::WithdrawVesting;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.account.write_to(out);
        self.vesting_shares.write_to(out);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            account: AccountName::read_from(reader)?,
            vesting_shares: Asset::read_from(reader)?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::active(&self.account)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.account)?;
        ctx.symbol_in(&self.vesting_shares, &[&ctx.config.vests_symbol], "vesting shares")?;
        ctx.non_negative(&self.vesting_shares, "vesting shares")
    }
}

// ---------------------------------------------------------------------------
// transfer_to_savings (32)
// ---------------------------------------------------------------------------

/// Moves liquid funds into the savings balance of `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferToSavings {
    pub from: AccountName,
    pub to: AccountName,
    pub amount: Asset,
    #[serde(default)]
    pub memo: String,
}

impl TransferToSavings {
    pub fn new(
        from: impl Into<AccountName>,
        to: impl Into<AccountName>,
        amount: Asset,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
            memo: memo.into(),
        }
    }
}

impl UserOperation for TransferToSavings {
    const KIND: OperationKind = OperationKind::TransferToSavings;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.from.write_to(out);
        self.to.write_to(out);
        self.amount.write_to(out);
        write_string(out, &self.memo);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            from: AccountName::read_from(reader)?,
            to: AccountName::read_from(reader)?,
            amount: Asset::read_from(reader)?,
            memo: reader.read_string()?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::active(&self.from)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.from)?;
        ctx.account(&self.to)?;
        validate_savings_amount(ctx, &self.amount)?;
        ctx.memo(&self.memo)
    }
}

// ---------------------------------------------------------------------------
// transfer_from_savings (33)
// ---------------------------------------------------------------------------

/// Requests a withdrawal from savings. The chain releases the funds after
/// a waiting period unless the request is cancelled.
///
/// `request_id` names the pending request so it can be cancelled later. It
/// must be unique among `from`'s open requests; the chain rejects a
/// duplicate, and nothing here can check that.
///
/// Note the wire order: `request_id` sits between `from` and `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFromSavings {
    pub from: AccountName,
    pub request_id: u32,
    pub to: AccountName,
    pub amount: Asset,
    #[serde(default)]
    pub memo: String,
}

impl TransferFromSavings {
    /// Arguments follow the wire order.
    pub fn new(
        from: impl Into<AccountName>,
        request_id: u32,
        to: impl Into<AccountName>,
        amount: Asset,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            request_id,
            to: to.into(),
            amount,
            memo: memo.into(),
        }
    }
}

impl UserOperation for TransferFromSavings {
    const KIND: OperationKind = OperationKind::TransferFromSavings;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.from.write_to(out);
        write_u32(out, self.request_id);
        self.to.write_to(out);
        self.amount.write_to(out);
        write_string(out, &self.memo);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            from: AccountName::read_from(reader)?,
            request_id: reader.read_u32()?,
            to: AccountName::read_from(reader)?,
            amount: Asset::read_from(reader)?,
            memo: reader.read_string()?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::active(&self.from)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.from)?;
        ctx.account(&self.to)?;
        validate_savings_amount(ctx, &self.amount)?;
        ctx.memo(&self.memo)
    }
}

/// Savings hold only the two primary tokens, and moving nothing is refused.
fn validate_savings_amount(ctx: &ValidationContext<'_>, amount: &Asset) -> Result<(), ValidationError> {
    ctx.symbol_in(
        amount,
        &[&ctx.config.token_symbol, &ctx.config.dollar_symbol],
        "savings amount",
    )?;
    ctx.positive(amount, "savings amount")
}

// ---------------------------------------------------------------------------
// cancel_transfer_from_savings (34)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelTransferFromSavings {
    pub from: AccountName,
    pub request_id: u32,
}

impl CancelTransferFromSavings {
    pub fn new(from: impl Into<AccountName>, request_id: u32) -> Self {
        Self {
            from: from.into(),
            request_id,
        }
    }
}

impl UserOperation for CancelTransferFromSavings {
    const KIND: OperationKind = OperationKind::CancelTransferFromSavings;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.from.write_to(out);
        write_u32(out, self.request_id);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            from: AccountName::read_from(reader)?,
            request_id: reader.read_u32()?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::active(&self.from)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.from)
    }
}

// ---------------------------------------------------------------------------
// claim_reward_balance (39)
// ---------------------------------------------------------------------------

/// Collects pending author and curation rewards into the liquid, dollar,
/// and vesting balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRewardBalance {
    pub account: AccountName,
    pub reward_steem: Asset,
    pub reward_sbd: Asset,
    pub reward_vests: Asset,
}

impl ClaimRewardBalance {
    pub fn new(
        account: impl Into<AccountName>,
        reward_steem: Asset,
        reward_sbd: Asset,
        reward_vests: Asset,
    ) -> Self {
        Self {
            account: account.into(),
            reward_steem,
            reward_sbd,
            reward_vests,
        }
    }
}

impl UserOperation for ClaimRewardBalance {
    const KIND: OperationKind = OperationKind::ClaimRewardBalance;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.account.write_to(out);
        self.reward_steem.write_to(out);
        self.reward_sbd.write_to(out);
        self.reward_vests.write_to(out);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            account: AccountName::read_from(reader)?,
            reward_steem: Asset::read_from(reader)?,
            reward_sbd: Asset::read_from(reader)?,
            reward_vests: Asset::read_from(reader)?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::posting(&self.account)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.account)?;
        let config = ctx.config;
        ctx.symbol_in(&self.reward_steem, &[&config.token_symbol], "reward_steem")?;
        ctx.symbol_in(&self.reward_sbd, &[&config.dollar_symbol], "reward_sbd")?;
        ctx.symbol_in(&self.reward_vests, &[&config.vests_symbol], "reward_vests")?;
        for (reward, what) in [
            (&self.reward_steem, "reward_steem"),
            (&self.reward_sbd, "reward_sbd"),
            (&self.reward_vests, "reward_vests"),
        ] {
            ctx.non_negative(reward, what)?;
        }
        let claims_something = self.reward_steem.is_positive()
            || self.reward_sbd.is_positive()
            || self.reward_vests.is_positive();
        if !claims_something && !ctx.policy.skips(ValidationCategory::Asset) {
            return Err(ValidationError::InvalidAmount {
                reason: "must claim something".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// delegate_vesting_shares (40)
// ---------------------------------------------------------------------------

/// Lends vesting shares to another account. Zero shares ends the delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateVestingShares {
    pub delegator: AccountName,
    pub delegatee: AccountName,
    pub vesting_shares: Asset,
}

impl DelegateVestingShares {
    pub fn new(
        delegator: impl Into<AccountName>,
        delegatee: impl Into<AccountName>,
        vesting_shares: Asset,
    ) -> Self {
        Self {
            delegator: delegator.into(),
            delegatee: delegatee.into(),
            vesting_shares,
        }
    }
}

impl UserOperation for DelegateVestingShares {
    const KIND: OperationKind = OperationKind::DelegateVestingShares;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.delegator.write_to(out);
        self.delegatee.write_to(out);
        self.vesting_shares.write_to(out);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            delegator: AccountName::read_from(reader)?,
            delegatee: AccountName::read_from(reader)?,
            vesting_shares: Asset::read_from(reader)?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::active(&self.delegator)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.delegator)?;
        ctx.account(&self.delegatee)?;
        if self.delegator == self.delegatee {
            return Err(ValidationError::SelfReference {
                field: "delegatee",
                account: self.delegator.to_string(),
            });
        }
        ctx.symbol_in(&self.vesting_shares, &[&ctx.config.vests_symbol], "delegation")?;
        ctx.non_negative(&self.vesting_shares, "delegation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::AuthorityLevel;
    use crate::config::{ChainConfig, MAX_MEMO_LENGTH};
    use crate::validation::ValidationPolicy;

    fn check<T: UserOperation>(op: &T, policy: &ValidationPolicy) -> Result<(), ValidationError> {
        let config = ChainConfig::mainnet();
        op.validate(&ValidationContext::new(&config, policy))
    }

    fn strict<T: UserOperation>(op: &T) -> Result<(), ValidationError> {
        check(op, &ValidationPolicy::strict())
    }

    fn roundtrip<T: UserOperation + PartialEq + std::fmt::Debug>(op: &T) {
        let mut body = Vec::new();
        op.write_body(&mut body);
        let mut reader = Reader::new(&body);
        assert_eq!(&T::read_body(&mut reader).unwrap(), op);
        assert!(reader.finish().is_ok());
    }

    fn steem(amount: i64) -> Asset {
        ChainConfig::mainnet().token(amount)
    }

    #[test]
    fn transfer_requires_active_or_owner_for_vests() {
        let liquid = Transfer::new("alice", "bob", steem(1), "");
        let reqs: Vec<_> = liquid.required_authorities().into_iter().collect();
        assert_eq!(reqs, vec![AuthorityRequirement::active("alice")]);

        let vests = Transfer::new("alice", "bob", ChainConfig::mainnet().vests(1), "");
        let level = vests.required_authorities().into_iter().next().unwrap().level;
        assert_eq!(level, AuthorityLevel::Owner);
    }

    #[test]
    fn transfer_rejects_vests_unless_asset_checks_skipped() {
        let op = Transfer::new("alice", "bob", ChainConfig::mainnet().vests(1), "");
        assert!(matches!(strict(&op), Err(ValidationError::InvalidAmount { .. })));
        let lax = ValidationPolicy::strict().skip(ValidationCategory::Asset);
        assert!(check(&op, &lax).is_ok());
    }

    #[test]
    fn transfer_memo_limit_holds_under_category_skips() {
        let op = Transfer::new("alice", "bob", steem(1), "x".repeat(MAX_MEMO_LENGTH + 1));
        let policy: ValidationPolicy = [
            ValidationCategory::Asset,
            ValidationCategory::AccountName,
            ValidationCategory::Permlink,
            ValidationCategory::Json,
        ]
        .into_iter()
        .collect();
        assert!(matches!(check(&op, &policy), Err(ValidationError::MemoTooLong { .. })));
    }

    #[test]
    fn savings_amount_boundaries() {
        let zero = TransferFromSavings::new("alice", 0, "bob", steem(0), "");
        assert!(matches!(strict(&zero), Err(ValidationError::InvalidAmount { .. })));

        let one = TransferFromSavings::new("alice", 0, "bob", steem(1), "");
        assert!(strict(&one).is_ok());

        let sbd = TransferToSavings::new("alice", "alice", ChainConfig::mainnet().dollar(5), "");
        assert!(strict(&sbd).is_ok());

        let vests = TransferToSavings::new("alice", "alice", ChainConfig::mainnet().vests(5), "");
        assert!(matches!(strict(&vests), Err(ValidationError::InvalidAmount { .. })));
    }

    #[test]
    fn savings_memo_boundary() {
        let at_limit = TransferFromSavings::new("alice", 1, "bob", steem(1), "m".repeat(MAX_MEMO_LENGTH));
        assert!(strict(&at_limit).is_ok());

        let over = TransferFromSavings::new("alice", 1, "bob", steem(1), "m".repeat(MAX_MEMO_LENGTH + 1));
        assert_eq!(
            strict(&over),
            Err(ValidationError::MemoTooLong {
                length: MAX_MEMO_LENGTH + 1,
                max: MAX_MEMO_LENGTH
            })
        );
    }

    #[test]
    fn vesting_operations_check_symbols() {
        assert!(strict(&TransferToVesting::new("alice", "", steem(1))).is_ok());
        assert!(strict(&TransferToVesting::new("alice", "bob", ChainConfig::mainnet().dollar(1))).is_err());

        let config = ChainConfig::mainnet();
        assert!(strict(&WithdrawVesting::new("alice", config.vests(0))).is_ok());
        assert!(strict(&WithdrawVesting::new("alice", config.vests(-1))).is_err());
        assert!(strict(&WithdrawVesting::new("alice", steem(1))).is_err());
    }

    #[test]
    fn claim_must_claim_something() {
        let config = ChainConfig::mainnet();
        let nothing = ClaimRewardBalance::new("alice", config.token(0), config.dollar(0), config.vests(0));
        assert!(matches!(strict(&nothing), Err(ValidationError::InvalidAmount { .. })));

        let some = ClaimRewardBalance::new("alice", config.token(0), config.dollar(0), config.vests(10));
        assert!(strict(&some).is_ok());

        let swapped = ClaimRewardBalance::new("alice", config.dollar(1), config.dollar(0), config.vests(0));
        assert!(strict(&swapped).is_err());
    }

    #[test]
    fn delegation_cannot_target_self() {
        let config = ChainConfig::mainnet();
        let op = DelegateVestingShares::new("alice", "alice", config.vests(1));
        assert!(matches!(strict(&op), Err(ValidationError::SelfReference { .. })));
        assert!(strict(&DelegateVestingShares::new("alice", "bob", config.vests(0))).is_ok());
    }

    #[test]
    fn cancel_savings_requires_active() {
        let op = CancelTransferFromSavings::new("alice", 7);
        assert_eq!(
            op.required_authorities().into_iter().collect::<Vec<_>>(),
            vec![AuthorityRequirement::active("alice")]
        );
    }

    #[test]
    fn bodies_decode_back() {
        let config = ChainConfig::mainnet();
        roundtrip(&Transfer::new("alice", "bob", steem(1_000), "thanks"));
        roundtrip(&TransferToVesting::new("alice", "", steem(5)));
        roundtrip(&WithdrawVesting::new("alice", config.vests(1_000_000)));
        roundtrip(&TransferToSavings::new("alice", "bob", config.dollar(2), "rainy day"));
        roundtrip(&TransferFromSavings::new("alice", u32::MAX, "bob", steem(3), ""));
        roundtrip(&CancelTransferFromSavings::new("alice", 42));
        roundtrip(&ClaimRewardBalance::new("alice", steem(1), config.dollar(2), config.vests(3)));
        roundtrip(&DelegateVestingShares::new("alice", "bob", config.vests(9)));
    }

    #[test]
    fn request_id_is_fixed_width() {
        let op = CancelTransferFromSavings::new("abc", 1);
        let mut body = Vec::new();
        op.write_body(&mut body);
        assert_eq!(body, vec![3, b'a', b'b', b'c', 1, 0, 0, 0]);
    }
}
