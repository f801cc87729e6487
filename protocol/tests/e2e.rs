//! End-to-end tests for the client protocol library.
//!
//! These walk the path a wallet takes: compose operations, validate them,
//! assemble a transaction, compute the digest, hand it to a signer, and
//! produce the broadcast form. Each test builds its own chain config; no
//! state is shared between tests.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use steem_protocol::authority::{resolve, AuthorityLevel, AuthorityRequirement};
use steem_protocol::codec::{encode_asset, encode_fixed, encode_string, encode_varint};
use steem_protocol::config::{ChainConfig, ChainId};
use steem_protocol::operation::{
    AccountWitnessProxy, AccountWitnessVote, CancelTransferFromSavings, ChangeRecoveryAccount,
    ClaimRewardBalance, Comment, CustomJson, DeclineVotingRights, DelegateVestingShares,
    DeleteComment, Operation, OperationKind, Transfer, TransferFromSavings, TransferToSavings,
    TransferToVesting, Vote, WithdrawVesting,
};
use steem_protocol::transaction::{
    sign_transaction, DigestSigner, RecoverableSignature, SigningDigest, Transaction,
    TransactionBuilder, TransactionHeader,
};
use steem_protocol::types::AccountName;
use steem_protocol::validation::{ValidationCategory, ValidationError, ValidationPolicy};
use steem_protocol::ProtocolError;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// A test network whose liquid token is literally called `TOKEN`.
fn token_chain() -> ChainConfig {
    ChainConfig::new(ChainId::from_bytes([0x42; 32]), "TOKEN", "TBD", "VESTS")
}

fn now() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn header() -> TransactionHeader {
    TransactionHeader::new(0x1234, 0xdead_beef, now() + Duration::minutes(10))
}

fn savings_withdrawal(chain: &ChainConfig, amount: i64, memo: &str) -> TransferFromSavings {
    TransferFromSavings::new("alice", 0, "bob", chain.token(amount), memo)
}

/// Every user operation with non-trivial field values.
fn every_user_operation(chain: &ChainConfig) -> Vec<Operation> {
    vec![
        Vote::new("alice", "bob", "a-post", -2_500).into(),
        Comment::new("", "steem", "alice", "hello", "Hello", "body text", r#"{"tags":["intro"]}"#)
            .into(),
        Transfer::new("alice", "bob", chain.dollar(250), "rent").into(),
        TransferToVesting::new("alice", "bob", chain.token(1_000)).into(),
        WithdrawVesting::new("alice", chain.vests(1_000_000)).into(),
        AccountWitnessVote::new("alice", "witness-one", true).into(),
        AccountWitnessProxy::new("alice", "carol").into(),
        DeleteComment::new("alice", "hello").into(),
        CustomJson::new(
            vec![AccountName::from("alice")],
            vec![AccountName::from("bob"), AccountName::from("carol")],
            "follow",
            r#"["follow",{"follower":"bob"}]"#,
        )
        .into(),
        ChangeRecoveryAccount::new("alice", "steem").into(),
        TransferToSavings::new("alice", "alice", chain.token(5), "").into(),
        TransferFromSavings::new("alice", 7, "bob", chain.dollar(5), "out").into(),
        CancelTransferFromSavings::new("alice", 7).into(),
        DeclineVotingRights::new("alice", true).into(),
        ClaimRewardBalance::new("alice", chain.token(0), chain.dollar(1), chain.vests(10)).into(),
        DelegateVestingShares::new("alice", "bob", chain.vests(123_456)).into(),
    ]
}

/// Signs every requirement with a signature whose bytes are the account
/// name's length, so tests can tell signatures apart.
struct LengthSigner;

impl DigestSigner for LengthSigner {
    type Error = std::convert::Infallible;

    fn sign_digest(
        &self,
        _digest: &SigningDigest,
        requirement: &AuthorityRequirement,
    ) -> Result<RecoverableSignature, Self::Error> {
        Ok(RecoverableSignature::from_bytes([requirement.account.as_str().len() as u8; 65]))
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[test]
fn transfer_from_savings_exact_bytes() {
    let chain = token_chain();
    let op: Operation = savings_withdrawal(&chain, 1_000, "").into();

    let mut expected = encode_varint(u64::from(OperationKind::TransferFromSavings.order_id()));
    expected.extend(encode_string("alice"));
    expected.extend(encode_fixed(0, 4).unwrap());
    expected.extend(encode_string("bob"));
    expected.extend(encode_asset(1_000, "TOKEN", 3));
    expected.extend(encode_string(""));

    assert_eq!(op.to_canonical_bytes(), expected);
    assert!(op.validate(&chain, &ValidationPolicy::strict()).is_ok());
}

#[test]
fn every_user_operation_round_trips() {
    let chain = ChainConfig::mainnet();
    for op in every_user_operation(&chain) {
        let bytes = op.to_canonical_bytes();
        assert_eq!(Operation::decode(&bytes).unwrap(), op, "{}", op.kind());
    }
}

#[test]
fn encoding_is_deterministic() {
    let chain = ChainConfig::mainnet();
    for op in every_user_operation(&chain) {
        assert_eq!(op.to_canonical_bytes(), op.to_canonical_bytes());
    }
}

#[test]
fn every_user_operation_passes_strict_validation() {
    let chain = ChainConfig::mainnet();
    for op in every_user_operation(&chain) {
        assert!(
            op.validate(&chain, &ValidationPolicy::strict()).is_ok(),
            "{} failed validation",
            op.kind()
        );
    }
}

#[test]
fn decode_rejects_trailing_and_truncated_input() {
    let chain = token_chain();
    let mut bytes = Operation::from(savings_withdrawal(&chain, 1, "")).to_canonical_bytes();

    let truncated = &bytes[..bytes.len() - 1];
    assert!(Operation::decode(truncated).is_err());

    bytes.push(0);
    assert!(Operation::decode(&bytes).is_err());
}

// ---------------------------------------------------------------------------
// Authorities
// ---------------------------------------------------------------------------

#[test]
fn single_withdrawal_needs_alice_active() {
    let chain = token_chain();
    let ops: Vec<Operation> = vec![savings_withdrawal(&chain, 1_000, "").into()];
    let required = resolve(&ops);
    assert_eq!(
        required.as_map(),
        &BTreeMap::from([(AccountName::from("alice"), AuthorityLevel::Active)])
    );
}

#[test]
fn posting_and_active_on_one_account_resolve_to_active() {
    let chain = ChainConfig::mainnet();
    let ops: Vec<Operation> = vec![
        Vote::new("alice", "bob", "p", 100).into(),
        Transfer::new("alice", "bob", chain.token(1), "").into(),
    ];
    let required = resolve(&ops);
    assert_eq!(required.len(), 1);
    assert_eq!(required.level_of(&"alice".into()), Some(AuthorityLevel::Active));
}

#[test]
fn disjoint_accounts_get_one_entry_each() {
    let chain = ChainConfig::mainnet();
    let ops: Vec<Operation> = vec![
        Vote::new("alice", "bob", "p", 100).into(),
        Transfer::new("carol", "bob", chain.token(1), "").into(),
        ChangeRecoveryAccount::new("dave", "steem").into(),
    ];
    let required = resolve(&ops);
    assert_eq!(required.len(), 3);
    assert_eq!(required.level_of(&"alice".into()), Some(AuthorityLevel::Posting));
    assert_eq!(required.level_of(&"carol".into()), Some(AuthorityLevel::Active));
    assert_eq!(required.level_of(&"dave".into()), Some(AuthorityLevel::Owner));
    assert_eq!(required.level_of(&"bob".into()), None);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn amount_boundary() {
    let chain = token_chain();
    let strict = ValidationPolicy::strict();

    let zero: Operation = savings_withdrawal(&chain, 0, "").into();
    assert!(matches!(
        zero.validate(&chain, &strict),
        Err(ValidationError::InvalidAmount { .. })
    ));

    let one: Operation = savings_withdrawal(&chain, 1, "").into();
    assert!(one.validate(&chain, &strict).is_ok());
}

#[test]
fn memo_boundary() {
    let chain = token_chain();
    let strict = ValidationPolicy::strict();

    let at_limit: Operation = savings_withdrawal(&chain, 1, &"m".repeat(2_048)).into();
    assert!(at_limit.validate(&chain, &strict).is_ok());

    let over: Operation = savings_withdrawal(&chain, 1, &"m".repeat(2_049)).into();
    assert_eq!(
        over.validate(&chain, &strict),
        Err(ValidationError::MemoTooLong {
            length: 2_049,
            max: 2_048
        })
    );
}

#[test]
fn foreign_symbol_is_rejected() {
    let chain = token_chain();
    let op: Operation =
        TransferFromSavings::new("alice", 0, "bob", ChainConfig::mainnet().token(1), "").into();
    assert!(matches!(
        op.validate(&chain, &ValidationPolicy::strict()),
        Err(ValidationError::InvalidAmount { .. })
    ));
}

#[test]
fn skip_all_accepts_oversized_memo() {
    let chain = token_chain();
    let op: Operation = savings_withdrawal(&chain, 1, &"m".repeat(3_000)).into();

    assert!(op.validate(&chain, &ValidationPolicy::strict()).is_err());
    assert!(op.validate(&chain, &ValidationPolicy::skip_all()).is_ok());

    let tx = TransactionBuilder::new(header())
        .chain(chain)
        .skip(ValidationCategory::All)
        .operation(op)
        .build();
    assert!(tx.is_ok());
}

#[test]
fn skipping_one_category_leaves_the_others() {
    let chain = token_chain();
    let policy = ValidationPolicy::strict().skip(ValidationCategory::Asset);

    let zero: Operation = savings_withdrawal(&chain, 0, "").into();
    assert!(zero.validate(&chain, &policy).is_ok());

    let long_memo: Operation = savings_withdrawal(&chain, 0, &"m".repeat(2_049)).into();
    assert!(matches!(
        long_memo.validate(&chain, &policy),
        Err(ValidationError::MemoTooLong { .. })
    ));
}

#[test]
fn policies_do_not_leak_between_threads() {
    let chain = token_chain();
    let op: Operation = savings_withdrawal(&chain, 0, "").into();

    std::thread::scope(|s| {
        let lenient = s.spawn(|| op.validate(&chain, &ValidationPolicy::skip_all()).is_ok());
        let strict = s.spawn(|| op.validate(&chain, &ValidationPolicy::strict()).is_err());
        assert!(lenient.join().unwrap());
        assert!(strict.join().unwrap());
    });
}

// ---------------------------------------------------------------------------
// Virtual operations
// ---------------------------------------------------------------------------

fn interest_bytes() -> Vec<u8> {
    let mut bytes = encode_varint(u64::from(OperationKind::Interest.order_id()));
    bytes.extend(encode_string("alice"));
    bytes.extend(encode_asset(17, "SBD", 3));
    bytes
}

#[test]
fn virtual_operation_from_chain_data() {
    let op = Operation::decode(&interest_bytes()).unwrap();
    assert!(op.is_virtual());
    assert_eq!(op.kind(), OperationKind::Interest);
    assert!(op.to_canonical_bytes().is_empty());
    assert!(op.required_authorities().is_empty());
    assert!(op
        .validate(&ChainConfig::mainnet(), &ValidationPolicy::strict())
        .is_ok());
}

#[test]
fn virtual_operations_cannot_be_composed() {
    for kind in OperationKind::ALL.iter().filter(|k| k.is_virtual()) {
        let result = Operation::compose(*kind, json!({}));
        assert!(matches!(result, Err(ProtocolError::UnsupportedOperation(_))), "{}", kind);
    }
}

#[test]
fn virtual_operations_cannot_be_broadcast() {
    let op = Operation::decode(&interest_bytes()).unwrap();
    let result = TransactionBuilder::new(header())
        .skip(ValidationCategory::All)
        .operation(op)
        .build();
    assert!(matches!(result, Err(ProtocolError::UnsupportedOperation(_))));
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[test]
fn composed_json_matches_typed_construction() {
    let chain = ChainConfig::mainnet();
    let typed: Operation = Transfer::new("alice", "bob", chain.token(1_500), "hi").into();
    let composed = Operation::compose_json(serde_json::to_value(&typed).unwrap()).unwrap();
    assert_eq!(composed, typed);
}

#[test]
fn empty_transaction_is_rejected() {
    let result = TransactionBuilder::new(header()).build();
    assert!(matches!(
        result,
        Err(ProtocolError::Validation(ValidationError::NoOperations))
    ));
}

#[test]
fn expiration_window_checked_against_reference_time() {
    let chain = ChainConfig::mainnet();
    let far = TransactionHeader::new(1, 2, now() + Duration::hours(2));
    let result = TransactionBuilder::new(far)
        .reference_time(now())
        .operation(Vote::new("alice", "bob", "p", 1))
        .build();
    assert!(matches!(
        result,
        Err(ProtocolError::Validation(ValidationError::ExpirationTooFar { .. }))
    ));

    let near = TransactionBuilder::new(header())
        .chain(chain)
        .reference_time(now())
        .operation(Vote::new("alice", "bob", "p", 1))
        .build();
    assert!(near.is_ok());
}

#[test]
fn transaction_bytes_round_trip() {
    let chain = ChainConfig::mainnet();
    let tx = TransactionBuilder::new(header())
        .operations(every_user_operation(&chain))
        .build()
        .unwrap();
    let decoded = Transaction::decode(tx.serialized()).unwrap();
    assert_eq!(decoded, tx);
    assert_eq!(decoded.id(), tx.id());
}

#[test]
fn digest_depends_on_chain_id() {
    let tx = TransactionBuilder::new(header())
        .operation(Vote::new("alice", "bob", "p", 1))
        .build()
        .unwrap();
    let mainnet = tx.digest(&ChainConfig::mainnet().chain_id);
    let testnet = tx.digest(&token_chain().chain_id);
    assert_ne!(mainnet, testnet);
}

#[test]
fn sign_and_serialize_for_broadcast() {
    let chain = ChainConfig::mainnet();
    let tx = TransactionBuilder::new(header())
        .operation(Vote::new("alice", "bob", "p", 10_000))
        .operation(Transfer::new("carol", "bob", chain.token(1), ""))
        .build()
        .unwrap();
    let id = tx.id();
    let unsigned_len = tx.serialized().len();

    let signed = sign_transaction(tx, &chain, &LengthSigner).unwrap();
    assert_eq!(signed.id(), id);
    assert_eq!(signed.to_bytes().len(), unsigned_len + 1 + 2 * 65);

    let json = signed.to_json();
    assert_eq!(json["ref_block_num"], 0x1234);
    assert_eq!(json["operations"][1][0], "transfer");
    assert_eq!(json["extensions"], json!([]));
    assert_eq!(json["signatures"].as_array().unwrap().len(), 2);
}

#[test]
fn missing_authority_blocks_broadcast() {
    let chain = ChainConfig::mainnet();
    let tx = TransactionBuilder::new(header())
        .operation(Transfer::new("alice", "bob", chain.token(1), ""))
        .build()
        .unwrap();
    let err = tx
        .attach_signatures(vec![(
            AuthorityRequirement::posting("alice"),
            RecoverableSignature::from_bytes([1; 65]),
        )])
        .unwrap_err();
    assert_eq!(
        err,
        ProtocolError::MissingSignature {
            account: "alice".into(),
            level: AuthorityLevel::Active
        }
    );
}
