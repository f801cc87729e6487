//! # Operation Model
//!
//! An [`Operation`] is one action inside a transaction. The set of variants
//! is closed and each one carries a frozen discriminant (see
//! [`OperationKind`]), so dispatch is an exhaustive `match` rather than any
//! kind of runtime type inspection.
//!
//! ## Layout
//!
//! ```text
//! kind.rs           discriminant table (order ids, names, virtual flag)
//! transfer.rs       fund movements: transfers, savings, vesting, rewards
//! social.rs         votes, comments, custom_json
//! account.rs        witness voting, proxy, recovery, voting rights
//! virtual_ops.rs    chain-generated operations (decode only)
//! decode.rs         discriminant -> decoder lookup table
//! json.rs           `["name", {fields}]` form and generic composition
//! ```
//!
//! ## User vs. virtual operations
//!
//! User operations have public fields, a `new` constructor, and implement
//! [`UserOperation`]. Virtual operations are produced by the chain as side
//! effects. They live under [`Operation::Virtual`], have no public
//! constructor, and only ever come out of [`Operation::decode`] or the JSON
//! deserializer. They encode to nothing, need no signature, and always
//! validate.

pub mod account;
pub mod decode;
pub mod json;
pub mod kind;
pub mod social;
pub mod transfer;
pub mod virtual_ops;

pub use account::{
    AccountWitnessProxy, AccountWitnessVote, ChangeRecoveryAccount, DeclineVotingRights,
};
pub use kind::OperationKind;
pub use social::{Comment, CustomJson, DeleteComment, Vote};
pub use transfer::{
    CancelTransferFromSavings, ClaimRewardBalance, DelegateVestingShares, Transfer,
    TransferFromSavings, TransferToSavings, TransferToVesting, WithdrawVesting,
};
pub use virtual_ops::{
    AuthorReward, CurationReward, FillTransferFromSavings, Interest, VirtualOperation,
};

use std::collections::BTreeSet;

use crate::authority::AuthorityRequirement;
use crate::codec::{write_varint, CodecError, Reader};
use crate::config::ChainConfig;
use crate::error::ProtocolError;
use crate::validation::{ValidationContext, ValidationError, ValidationPolicy};

// ---------------------------------------------------------------------------
// UserOperation
// ---------------------------------------------------------------------------

/// Behaviour shared by every operation a user can sign.
///
/// `write_body` and `read_body` handle the fields only, in wire order. The
/// discriminant is written by [`UserOperation::to_canonical_bytes`] and read
/// by the decoder table.
pub trait UserOperation: Clone + Into<Operation> {
    /// Frozen discriminant of this variant.
    const KIND: OperationKind;

    fn write_body(&self, out: &mut Vec<u8>);

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError>;

    /// The `(account, level)` pairs that must sign this operation.
    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement>;

    /// Field checks, each honouring the context's skip policy.
    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError>;

    /// `varint(order_id) || body`.
    fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        write_varint(&mut out, u64::from(Self::KIND.order_id()));
        self.write_body(&mut out);
        out
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// Any operation this crate understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Vote(Vote),
    Comment(Comment),
    Transfer(Transfer),
    TransferToVesting(TransferToVesting),
    WithdrawVesting(WithdrawVesting),
    AccountWitnessVote(AccountWitnessVote),
    AccountWitnessProxy(AccountWitnessProxy),
    DeleteComment(DeleteComment),
    CustomJson(CustomJson),
    ChangeRecoveryAccount(ChangeRecoveryAccount),
    TransferToSavings(TransferToSavings),
    TransferFromSavings(TransferFromSavings),
    CancelTransferFromSavings(CancelTransferFromSavings),
    DeclineVotingRights(DeclineVotingRights),
    ClaimRewardBalance(ClaimRewardBalance),
    DelegateVestingShares(DelegateVestingShares),
    /// Chain-generated; see the module docs.
    Virtual(VirtualOperation),
}

/// Runs `$user` with `$op` bound to the inner user operation, or `$virt`
/// with `$v` bound to the virtual one.
macro_rules! dispatch {
    ($self:expr, $op:ident => $user:expr, $v:ident => $virt:expr) => {
        match $self {
            Operation::Vote($op) => $user,
            Operation::Comment($op) => $user,
            Operation::Transfer($op) => $user,
            Operation::TransferToVesting($op) => $user,
            Operation::WithdrawVesting($op) => $user,
            Operation::AccountWitnessVote($op) => $user,
            Operation::AccountWitnessProxy($op) => $user,
            Operation::DeleteComment($op) => $user,
            Operation::CustomJson($op) => $user,
            Operation::ChangeRecoveryAccount($op) => $user,
            Operation::TransferToSavings($op) => $user,
            Operation::TransferFromSavings($op) => $user,
            Operation::CancelTransferFromSavings($op) => $user,
            Operation::DeclineVotingRights($op) => $user,
            Operation::ClaimRewardBalance($op) => $user,
            Operation::DelegateVestingShares($op) => $user,
            Operation::Virtual($v) => $virt,
        }
    };
}

pub(crate) use dispatch;

impl Operation {
    pub fn kind(&self) -> OperationKind {
        dispatch!(self, op => kind_of(op), v => v.kind())
    }

    /// The wire discriminant.
    pub fn order_id(&self) -> u32 {
        self.kind().order_id()
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, Operation::Virtual(_))
    }

    /// Discriminant varint followed by the fields in wire order. Empty for
    /// virtual operations.
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        dispatch!(self, op => op.to_canonical_bytes(), _v => Vec::new())
    }

    /// Appends the canonical bytes for inclusion in a broadcast
    /// transaction. Virtual operations cannot be broadcast.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
        dispatch!(
            self,
            op => {
                write_varint(out, u64::from(self.order_id()));
                op.write_body(out);
                Ok(())
            },
            v => Err(ProtocolError::UnsupportedOperation(format!(
                "{} is a virtual operation and cannot be broadcast",
                v.kind()
            )))
        )
    }

    /// Empty for virtual operations.
    pub fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        dispatch!(self, op => op.required_authorities(), _v => BTreeSet::new())
    }

    /// Validates under `policy`. Same as
    /// [`crate::validation::validate_operation`].
    pub fn validate(
        &self,
        config: &ChainConfig,
        policy: &ValidationPolicy,
    ) -> Result<(), ValidationError> {
        crate::validation::validate_operation(self, config, policy)
    }

    /// The per-variant checks, without the skip-all short-circuit.
    pub(crate) fn validate_fields(
        &self,
        ctx: &ValidationContext<'_>,
    ) -> Result<(), ValidationError> {
        dispatch!(self, op => op.validate(ctx), _v => Ok(()))
    }
}

fn kind_of<T: UserOperation>(_: &T) -> OperationKind {
    T::KIND
}

macro_rules! impl_from_user_op {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Operation {
                fn from(op: $variant) -> Self {
                    Operation::$variant(op)
                }
            }
        )*
    };
}

impl_from_user_op!(
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
);

impl From<VirtualOperation> for Operation {
    fn from(op: VirtualOperation) -> Self {
        Operation::Virtual(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_asset, encode_fixed, encode_string, encode_varint};
    use crate::types::Asset;

    fn savings_withdrawal() -> Operation {
        TransferFromSavings::new("alice", 0, "bob", Asset::new(1_000, 3, "STEEM"), "").into()
    }

    #[test]
    fn canonical_bytes_start_with_discriminant() {
        let op = savings_withdrawal();
        let mut expected = encode_varint(33);
        expected.extend(encode_string("alice"));
        expected.extend(encode_fixed(0, 4).unwrap());
        expected.extend(encode_string("bob"));
        expected.extend(encode_asset(1_000, "STEEM", 3));
        expected.extend(encode_string(""));
        assert_eq!(op.to_canonical_bytes(), expected);
    }

    #[test]
    fn write_to_matches_canonical_bytes() {
        let op = savings_withdrawal();
        let mut out = Vec::new();
        op.write_to(&mut out).unwrap();
        assert_eq!(out, op.to_canonical_bytes());
    }

    #[test]
    fn kind_and_order_id_agree() {
        let op: Operation = Vote::new("alice", "bob", "post", 100).into();
        assert_eq!(op.kind(), OperationKind::Vote);
        assert_eq!(op.order_id(), 0);
        assert!(!op.is_virtual());
    }

    #[test]
    fn validate_dispatches_to_variant() {
        let op: Operation = Vote::new("alice", "bob", "post", 10_001).into();
        let config = ChainConfig::mainnet();
        assert_eq!(
            op.validate(&config, &ValidationPolicy::strict()),
            Err(ValidationError::InvalidWeight { weight: 10_001 })
        );
        assert!(op.validate(&config, &ValidationPolicy::skip_all()).is_ok());
    }
}
