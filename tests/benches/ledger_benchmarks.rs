//! # GovChain Ledger Benchmarks
//!
//! | Area | Expectation |
//! |------|-------------|
//! | Block hash | Single SHA-256 over a short preimage |
//! | Mining | Cost grows ~16x per difficulty digit |
//! | Validation | Linear in chain length |
//! | Marker search | Linear in chain length, JSON parse per payload |

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gc_01_ledger::{IntegrityVerifier, Ledger, ProofOfWork};
use serde_json::json;
use std::time::Duration;

fn build_ledger(blocks: usize) -> Ledger {
    let mut ledger = Ledger::new(1);
    for n in 0..blocks {
        ledger
            .add_entry(json!({ "hash": format!("doc-{n}"), "department": "Health" }))
            .expect("entry is JSON");
        ledger.flush_pending().expect("difficulty 1 always mines");
    }
    ledger
}

fn bench_block_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("gc-01-hash");
    let payload = r#"[{"department":"Health","amount":100}]"#;
    let previous = "0".repeat(64);
    let pow = ProofOfWork::new(0);
    let now = Utc::now();

    group.bench_function("block_hash_check", |b| {
        b.iter(|| black_box(pow.check_nonce(1, &previous, now, payload, black_box(42))))
    });
    group.finish();
}

fn bench_mining(c: &mut Criterion) {
    let mut group = c.benchmark_group("gc-01-mining");
    group.measurement_time(Duration::from_secs(10));
    let previous = "0".repeat(64);
    let now = Utc::now();

    for difficulty in [1u32, 2, 3] {
        let pow = ProofOfWork::new(difficulty);
        group.bench_with_input(
            BenchmarkId::new("mine", difficulty),
            &difficulty,
            |b, _| {
                let mut payload_id = 0u64;
                b.iter(|| {
                    payload_id += 1;
                    let payload = format!("payload-{payload_id}");
                    black_box(pow.mine(1, &previous, now, &payload).expect("unbounded search"))
                })
            },
        );
    }
    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("gc-01-validation");

    for blocks in [10usize, 100, 500] {
        let ledger = build_ledger(blocks);
        let records = ledger.to_transferable();
        let verifier = IntegrityVerifier::new(1);

        group.throughput(Throughput::Elements(blocks as u64));
        group.bench_with_input(BenchmarkId::new("ledger", blocks), &ledger, |b, ledger| {
            b.iter(|| black_box(ledger.is_chain_valid()))
        });
        group.bench_with_input(BenchmarkId::new("records", blocks), &records, |b, records| {
            b.iter(|| black_box(verifier.verify_chain(records)))
        });
    }
    group.finish();
}

fn bench_marker_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("gc-01-marker-search");
    let ledger = build_ledger(200);

    group.bench_function("hit_last", |b| {
        b.iter(|| black_box(ledger.find_marker("doc-199")))
    });
    group.bench_function("miss", |b| {
        b.iter(|| black_box(ledger.find_marker("doesnotexist")))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_block_hash,
    bench_mining,
    bench_validation,
    bench_marker_search
);
criterion_main!(benches);
