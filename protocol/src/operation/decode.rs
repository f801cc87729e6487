//! Binary decoding of operations.
//!
//! A discriminant is looked up in a table of decoder functions built once,
//! on first use, and never modified afterwards. Any number of threads can
//! decode concurrently without locking.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::virtual_ops::VirtualBody;
use super::*;

type DecodeFn = fn(&mut Reader<'_>) -> Result<Operation, CodecError>;

static DECODERS: OnceLock<HashMap<u32, DecodeFn>> = OnceLock::new();

fn decode_user<T: UserOperation>(reader: &mut Reader<'_>) -> Result<Operation, CodecError> {
    T::read_body(reader).map(Into::into)
}

fn decode_virtual<T: VirtualBody>(reader: &mut Reader<'_>) -> Result<Operation, CodecError> {
    T::read_body(reader).map(|op| Operation::Virtual(op.into()))
}

fn register_user<T: UserOperation>(table: &mut HashMap<u32, DecodeFn>) {
    table.insert(T::KIND.order_id(), decode_user::<T>);
}

fn register_virtual<T: VirtualBody>(table: &mut HashMap<u32, DecodeFn>) {
    table.insert(T::KIND.order_id(), decode_virtual::<T>);
}

fn decoders() -> &'static HashMap<u32, DecodeFn> {
    DECODERS.get_or_init(|| {
        let mut table: HashMap<u32, DecodeFn> = HashMap::with_capacity(OperationKind::ALL.len());
        register_user::<Vote>(&mut table);
        register_user::<Comment>(&mut table);
        register_user::<Transfer>(&mut table);
        register_user::<TransferToVesting>(&mut table);
        register_user::<WithdrawVesting>(&mut table);
        register_user::<AccountWitnessVote>(&mut table);
        register_user::<AccountWitnessProxy>(&mut table);
        register_user::<DeleteComment>(&mut table);
        register_user::<CustomJson>(&mut table);
        register_user::<ChangeRecoveryAccount>(&mut table);
        register_user::<TransferToSavings>(&mut table);
        register_user::<TransferFromSavings>(&mut table);
        register_user::<CancelTransferFromSavings>(&mut table);
        register_user::<DeclineVotingRights>(&mut table);
        register_user::<ClaimRewardBalance>(&mut table);
        register_user::<DelegateVestingShares>(&mut table);
        register_virtual::<AuthorReward>(&mut table);
        register_virtual::<CurationReward>(&mut table);
        register_virtual::<Interest>(&mut table);
        register_virtual::<FillTransferFromSavings>(&mut table);
        table
    })
}

impl Operation {
    /// Reads one operation (discriminant and body) from `reader`.
    pub fn read_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let order_id = reader.read_varint_u32()?;
        let decode = decoders().get(&order_id).ok_or_else(|| {
            CodecError::malformed(format!("unknown operation discriminant {}", order_id))
        })?;
        decode(reader)
    }

    /// Decodes a buffer holding exactly one operation.
    ///
    /// This is also the only way to obtain a virtual operation from binary
    /// chain data, whose body uses the chain's packed layout.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = Reader::new(bytes);
        let operation = Self::read_from(&mut reader)?;
        reader.finish()?;
        Ok(operation)
    }
}
