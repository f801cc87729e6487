//! The chain's JSON form of an operation, `["transfer", {..fields..}]`,
//! and composition of user operations from loose JSON.

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::*;

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(self.kind().name())?;
        dispatch!(self, op => pair.serialize_element(op)?, v => pair.serialize_element(v)?);
        pair.end()
    }
}

/// Deserialization reads chain data, so unlike [`Operation::compose`] it
/// accepts virtual operations.
impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (name, fields) = <(String, Value)>::deserialize(deserializer)?;
        let kind = OperationKind::from_name(&name)
            .ok_or_else(|| D::Error::custom(format!("unknown operation `{}`", name)))?;
        from_fields(kind, fields).map_err(D::Error::custom)
    }
}

fn user<T: UserOperation + DeserializeOwned>(fields: Value) -> serde_json::Result<Operation> {
    serde_json::from_value::<T>(fields).map(Into::into)
}

fn chain<T: DeserializeOwned + Into<VirtualOperation>>(fields: Value) -> serde_json::Result<Operation> {
    serde_json::from_value::<T>(fields).map(|op| Operation::Virtual(op.into()))
}

fn from_fields(kind: OperationKind, fields: Value) -> serde_json::Result<Operation> {
    match kind {
        OperationKind::Vote => user::<Vote>(fields),
        OperationKind::Comment => user::<Comment>(fields),
        OperationKind::Transfer => user::<Transfer>(fields),
        OperationKind::TransferToVesting => user::<TransferToVesting>(fields),
        OperationKind::WithdrawVesting => user::<WithdrawVesting>(fields),
        OperationKind::AccountWitnessVote => user::<AccountWitnessVote>(fields),
        OperationKind::AccountWitnessProxy => user::<AccountWitnessProxy>(fields),
        OperationKind::DeleteComment => user::<DeleteComment>(fields),
        OperationKind::CustomJson => user::<CustomJson>(fields),
        OperationKind::ChangeRecoveryAccount => user::<ChangeRecoveryAccount>(fields),
        OperationKind::TransferToSavings => user::<TransferToSavings>(fields),
        OperationKind::TransferFromSavings => user::<TransferFromSavings>(fields),
        OperationKind::CancelTransferFromSavings => user::<CancelTransferFromSavings>(fields),
        OperationKind::DeclineVotingRights => user::<DeclineVotingRights>(fields),
        OperationKind::ClaimRewardBalance => user::<ClaimRewardBalance>(fields),
        OperationKind::DelegateVestingShares => user::<DelegateVestingShares>(fields),
        OperationKind::AuthorReward => chain::<AuthorReward>(fields),
        OperationKind::CurationReward => chain::<CurationReward>(fields),
        OperationKind::Interest => chain::<Interest>(fields),
        OperationKind::FillTransferFromSavings => chain::<FillTransferFromSavings>(fields),
    }
}

impl Operation {
    /// Builds a user operation of `kind` from a JSON object of its fields.
    ///
    /// Virtual kinds are refused with
    /// [`ProtocolError::UnsupportedOperation`]: only the chain creates them.
    ///
    /// ```
    /// use serde_json::json;
    /// use steem_protocol::operation::{Operation, OperationKind};
    ///
    /// let op = Operation::compose(
    ///     OperationKind::Vote,
    ///     json!({ "voter": "alice", "author": "bob", "permlink": "p", "weight": 10000 }),
    /// )
    /// .unwrap();
    /// assert_eq!(op.order_id(), 0);
    ///
    /// assert!(Operation::compose(OperationKind::AuthorReward, json!({})).is_err());
    /// ```
    pub fn compose(kind: OperationKind, fields: Value) -> Result<Self, ProtocolError> {
        if kind.is_virtual() {
            return Err(ProtocolError::UnsupportedOperation(format!(
                "{} is a virtual operation and cannot be constructed",
                kind
            )));
        }
        from_fields(kind, fields).map_err(|e| ProtocolError::InvalidFields {
            kind: kind.to_string(),
            reason: e.to_string(),
        })
    }

    /// Like [`Operation::compose`], taking the `["name", {fields}]` pair.
    pub fn compose_json(value: Value) -> Result<Self, ProtocolError> {
        let (name, fields): (String, Value) =
            serde_json::from_value(value).map_err(|e| ProtocolError::InvalidFields {
                kind: "operation".to_string(),
                reason: format!("expected [\"name\", {{fields}}]: {}", e),
            })?;
        let kind = OperationKind::from_name(&name)
            .ok_or_else(|| ProtocolError::UnsupportedOperation(format!("unknown operation `{}`", name)))?;
        Self::compose(kind, fields)
    }
}
