// Encoding & assembly benchmarks.
//
// Covers single-operation encode and decode, validation under strict and
// skip-all policies, and full transaction assembly at various sizes.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use steem_protocol::authority::resolve;
use steem_protocol::config::ChainConfig;
use steem_protocol::operation::{Comment, Operation, Transfer, Vote};
use steem_protocol::transaction::{TransactionBuilder, TransactionHeader};
use steem_protocol::validation::ValidationPolicy;

fn sample_transfer(chain: &ChainConfig) -> Operation {
    Transfer::new("alice", "bob", chain.token(1_000), "coffee money").into()
}

fn sample_ops(chain: &ChainConfig, n: usize) -> Vec<Operation> {
    (0..n)
        .map(|i| match i % 3 {
            0 => Vote::new("alice", "bob", format!("post-{}", i), 10_000).into(),
            1 => sample_transfer(chain),
            _ => Comment::new("bob", format!("post-{}", i), "alice", format!("re-{}", i), "", "nice", "")
                .into(),
        })
        .collect()
}

fn header() -> TransactionHeader {
    TransactionHeader::new(12_345, 0xdead_beef, Utc.timestamp_opt(1_700_000_000, 0).unwrap())
}

fn bench_encode_operation(c: &mut Criterion) {
    let op = sample_transfer(&ChainConfig::mainnet());
    c.bench_function("operation/encode_transfer", |b| {
        b.iter(|| black_box(&op).to_canonical_bytes());
    });
}

fn bench_decode_operation(c: &mut Criterion) {
    let bytes = sample_transfer(&ChainConfig::mainnet()).to_canonical_bytes();
    c.bench_function("operation/decode_transfer", |b| {
        b.iter(|| Operation::decode(black_box(&bytes)));
    });
}

fn bench_validate(c: &mut Criterion) {
    let chain = ChainConfig::mainnet();
    let op = sample_transfer(&chain);
    let strict = ValidationPolicy::strict();
    let skip_all = ValidationPolicy::skip_all();

    c.bench_function("validation/strict", |b| {
        b.iter(|| op.validate(&chain, black_box(&strict)));
    });
    c.bench_function("validation/skip_all", |b| {
        b.iter(|| op.validate(&chain, black_box(&skip_all)));
    });
}

fn bench_resolve(c: &mut Criterion) {
    let ops = sample_ops(&ChainConfig::mainnet(), 64);
    c.bench_function("authority/resolve_64", |b| {
        b.iter(|| resolve(black_box(&ops)));
    });
}

fn bench_build_transaction(c: &mut Criterion) {
    let chain = ChainConfig::mainnet();
    let mut group = c.benchmark_group("transaction/build");

    for size in [1usize, 10, 100] {
        let ops = sample_ops(&chain, size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ops, |b, ops| {
            b.iter(|| {
                let tx = TransactionBuilder::new(header())
                    .operations(ops.iter().cloned())
                    .build();
                if let Ok(tx) = tx {
                    black_box(tx.digest(&chain.chain_id));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encode_operation,
    bench_decode_operation,
    bench_validate,
    bench_resolve,
    bench_build_transaction,
);
criterion_main!(benches);
