//! Benchmark for allowlist tree construction and proving.
#![allow(missing_docs)]
#![allow(unused_crate_dependencies)]

use alloy_primitives::{Address, U256};
use claimdrop_merkle::{AllowlistEntry, AllowlistSnapshot};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Generates `count` distinct entries with sequential addresses.
fn generate_entries(count: usize) -> Vec<AllowlistEntry> {
    (0..count)
        .map(|i| {
            let mut addr = [0u8; 20];
            addr[12..].copy_from_slice(&(i as u64).to_be_bytes());
            AllowlistEntry::new(
                Address::from(addr),
                U256::from(i as u64 * 1000),
                U256::from(100u64),
            )
        })
        .collect()
}

fn bench_build(c: &mut Criterion, size: usize, entries: Vec<AllowlistEntry>) {
    c.bench_with_input(BenchmarkId::new("build", size), &entries, |b, entries| {
        b.iter(|| {
            let snap = AllowlistSnapshot::build(entries.clone()).expect("build failed");
            black_box(snap.root());
        });
    });
}

fn bench_prove_all(c: &mut Criterion, size: usize, entries: Vec<AllowlistEntry>) {
    let snap = AllowlistSnapshot::build(entries).expect("build failed");
    c.bench_with_input(BenchmarkId::new("prove_all", size), &snap, |b, snap| {
        b.iter(|| {
            for i in 0..snap.len() {
                black_box(snap.prove_inclusion(i).expect("prove failed"));
            }
        });
    });
}

fn benchmark_allowlist_tree(c: &mut Criterion) {
    for &size in &[1000, 10_000, 100_000] {
        println!("Generating {size} entries...");
        let entries = generate_entries(size);

        bench_build(c, size, entries.clone());
        bench_prove_all(c, size, entries);
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(15);
    targets = benchmark_allowlist_tree
}
criterion_main!(benches);
