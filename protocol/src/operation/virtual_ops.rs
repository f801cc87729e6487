//! Chain-generated ("virtual") operations.
//!
//! The chain emits these as side effects of processing blocks: a reward
//! payout, a matured savings withdrawal. They show up in account history and
//! block data but are never part of a signed transaction, so:
//!
//! - fields are private and there is no public constructor; the only ways
//!   to get one are [`super::Operation::decode`] over chain bytes and the
//!   JSON deserializer over chain JSON;
//! - their canonical transaction encoding is empty;
//! - they require no authority and always validate.
//!
//! Decoding reads the layout the chain uses when it packs these operations
//! into history objects.

use serde::{Deserialize, Serialize};

use super::OperationKind;
use crate::codec::{CodecError, Reader};
use crate::types::{AccountName, Asset};

/// Decode-side counterpart of [`super::UserOperation`], reachable only from
/// inside the crate.
pub(crate) trait VirtualBody: Sized + Into<VirtualOperation> {
    const KIND: OperationKind;

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError>;
}

/// Any virtual operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VirtualOperation {
    AuthorReward(AuthorReward),
    CurationReward(CurationReward),
    Interest(Interest),
    FillTransferFromSavings(FillTransferFromSavings),
}

impl VirtualOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::AuthorReward(_) => OperationKind::AuthorReward,
            Self::CurationReward(_) => OperationKind::CurationReward,
            Self::Interest(_) => OperationKind::Interest,
            Self::FillTransferFromSavings(_) => OperationKind::FillTransferFromSavings,
        }
    }
}

// ---------------------------------------------------------------------------
// author_reward (43)
// ---------------------------------------------------------------------------

/// Payout to the author of a post once its payout window closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorReward {
    author: AccountName,
    permlink: String,
    sbd_payout: Asset,
    steem_payout: Asset,
    vesting_payout: Asset,
}

impl AuthorReward {
    pub fn author(&self) -> &AccountName {
        &self.author
    }

    pub fn permlink(&self) -> &str {
        &self.permlink
    }

    pub fn sbd_payout(&self) -> &Asset {
        &self.sbd_payout
    }

    pub fn steem_payout(&self) -> &Asset {
        &self.steem_payout
    }

    pub fn vesting_payout(&self) -> &Asset {
        &self.vesting_payout
    }
}

impl VirtualBody for AuthorReward {
    const KIND: OperationKind = OperationKind::AuthorReward;

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            author: AccountName::read_from(reader)?,
            permlink: reader.read_string()?,
            sbd_payout: Asset::read_from(reader)?,
            steem_payout: Asset::read_from(reader)?,
            vesting_payout: Asset::read_from(reader)?,
        })
    }
}

// ---------------------------------------------------------------------------
// curation_reward (44)
// ---------------------------------------------------------------------------

/// Payout to a voter for curating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationReward {
    curator: AccountName,
    reward: Asset,
    comment_author: AccountName,
    comment_permlink: String,
}

impl CurationReward {
    pub fn curator(&self) -> &AccountName {
        &self.curator
    }

    pub fn reward(&self) -> &Asset {
        &self.reward
    }

    pub fn comment_author(&self) -> &AccountName {
        &self.comment_author
    }

    pub fn comment_permlink(&self) -> &str {
        &self.comment_permlink
    }
}

impl VirtualBody for CurationReward {
    const KIND: OperationKind = OperationKind::CurationReward;

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            curator: AccountName::read_from(reader)?,
            reward: Asset::read_from(reader)?,
            comment_author: AccountName::read_from(reader)?,
            comment_permlink: reader.read_string()?,
        })
    }
}

// ---------------------------------------------------------------------------
// interest (47)
// ---------------------------------------------------------------------------

/// Interest paid on a dollar-token balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    owner: AccountName,
    interest: Asset,
}

impl Interest {
    pub fn owner(&self) -> &AccountName {
        &self.owner
    }

    pub fn interest(&self) -> &Asset {
        &self.interest
    }
}

impl VirtualBody for Interest {
    const KIND: OperationKind = OperationKind::Interest;

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            owner: AccountName::read_from(reader)?,
            interest: Asset::read_from(reader)?,
        })
    }
}

// ---------------------------------------------------------------------------
// fill_transfer_from_savings (51)
// ---------------------------------------------------------------------------

/// Completion of a `transfer_from_savings` request after its waiting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillTransferFromSavings {
    from: AccountName,
    to: AccountName,
    amount: Asset,
    request_id: u32,
    memo: String,
}

impl FillTransferFromSavings {
    pub fn from(&self) -> &AccountName {
        &self.from
    }

    pub fn to(&self) -> &AccountName {
        &self.to
    }

    pub fn amount(&self) -> &Asset {
        &self.amount
    }

    pub fn request_id(&self) -> u32 {
        self.request_id
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }
}

impl VirtualBody for FillTransferFromSavings {
    const KIND: OperationKind = OperationKind::FillTransferFromSavings;

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            from: AccountName::read_from(reader)?,
            to: AccountName::read_from(reader)?,
            amount: Asset::read_from(reader)?,
            request_id: reader.read_u32()?,
            memo: reader.read_string()?,
        })
    }
}

macro_rules! impl_from_virtual_op {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for VirtualOperation {
                fn from(op: $variant) -> Self {
                    VirtualOperation::$variant(op)
                }
            }
        )*
    };
}

impl_from_virtual_op!(AuthorReward, CurationReward, Interest, FillTransferFromSavings);
