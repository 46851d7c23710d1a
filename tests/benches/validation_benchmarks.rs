//! # Validation Benchmarks
//!
//! | Path | Measures |
//! |------|----------|
//! | stateless | publish + stateless chain for one transfer |
//! | batch | parallel stateless validation of independent transfers |
//! | block | full `process_block`: validate, observe, commit |
//! | delta_set | working-layer edits and commit with a live snapshot |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use qc_04_state_management::BaseSet;
use qc_tests::integration::fixtures::{processor, registry, Account, CURRENCY};
use qc_validation::validators::stateless::EntityValidator;
use qc_validation::{BatchValidator, ValidationConfig, ValidationPipeline, WeakEntityInfo};
use rand::Rng;
use std::time::Duration;

fn bench_stateless_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("stateless");
    let pipeline = ValidationPipeline::with_defaults(&ValidationConfig::default(), registry());
    let validator = pipeline.stateless();

    let alice = Account::new(1);
    for mosaics in [1u64, 4, 10] {
        let entries: Vec<_> = (0..mosaics).map(|id| (id, 1)).collect();
        let transaction = alice.transfer(Account::new(2).address(), &entries);

        group.bench_with_input(BenchmarkId::new("transfer", mosaics), &transaction, |b, tx| {
            b.iter(|| black_box(validator.validate(&WeakEntityInfo::from_transaction(tx))))
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.measurement_time(Duration::from_secs(10));
    let pipeline = ValidationPipeline::with_defaults(&ValidationConfig::default(), registry());
    let batch = BatchValidator::new(pipeline.stateless());

    let mut rng = rand::thread_rng();
    let signers: Vec<_> = (1..=16u8).map(Account::new).collect();
    for size in [64usize, 256, 1024] {
        let transactions: Vec<_> = (0..size)
            .map(|i| {
                let amount = rng.gen_range(1..1_000u64);
                signers[i % signers.len()].transfer([0x98u8; 25], &[(CURRENCY, amount)])
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("transfers", size), &transactions, |b, txs| {
            b.iter(|| black_box(batch.validate_transactions(txs)))
        });
    }

    group.finish();
}

fn bench_process_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("block");
    let harvester = Account::new(200);
    let senders: Vec<_> = (1..=32u8).map(Account::new).collect();
    let recipient = Account::new(100).address();

    for size in [8usize, 32, 128] {
        let block = harvester.block(
            2,
            (0..size)
                .map(|i| senders[i % senders.len()].transfer(recipient, &[(CURRENCY, 1)]))
                .collect(),
        );

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("transfers", size), &block, |b, block| {
            b.iter_batched(
                || processor(senders.iter().map(|s| s.funded(1_000)).collect()),
                |processor| black_box(processor.process_block(block)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_delta_set_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("delta_set");
    let base: BaseSet<u64, u64> = (0..100_000u64).map(|k| (k, k)).collect();

    for edits in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(edits));
        group.bench_with_input(BenchmarkId::new("commit", edits), &edits, |b, &edits| {
            b.iter_batched(
                || {
                    let base: BaseSet<u64, u64> = (0..100_000u64).map(|k| (k, k)).collect();
                    let mut delta = base.rebase();
                    for k in 0..edits {
                        match k % 3 {
                            0 => delta.insert(k, k + 1),
                            1 => {
                                delta.remove(&k);
                            }
                            _ => delta.insert(200_000 + k, k),
                        }
                    }
                    (base, delta)
                },
                |(mut base, delta)| {
                    let snapshot = base.view();
                    base.commit(delta);
                    black_box((base.len(), snapshot))
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.bench_function("rollback_1000", |b| {
        b.iter_batched(
            || {
                let mut delta = base.rebase();
                for k in 0..1_000u64 {
                    delta.insert(k, 0);
                }
                delta
            },
            |mut delta| {
                delta.rollback();
                black_box(delta.has_changes())
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_stateless_transfer,
    bench_batch,
    bench_process_block,
    bench_delta_set_commit
);
criterion_main!(benches);
