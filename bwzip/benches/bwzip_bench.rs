//! End-to-end pipeline benchmarks.
//!
//! Measures compression and decompression throughput across data patterns
//! with very different BWT/MTF behavior: uniform runs, repetitive phrases,
//! text and incompressible noise.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use bwzip::{compress, decompress, CompressionLevel};
use std::hint::black_box;

type PatternGenerator = fn(usize) -> Vec<u8>;

mod test_data {
    /// Uniform data, the degenerate single-symbol rank stream.
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    /// Reproducible noise, the worst case for every stage.
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x1234_5678_9ABC_DEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Repetitive phrase, the case BWT clustering was made for.
    pub fn repetitive(size: usize) -> Vec<u8> {
        b"TOBEORNOTTOBEORTOBEORNOT"
            .iter()
            .copied()
            .cycle()
            .take(size)
            .collect()
    }

    /// Text-like data, the realistic middle ground.
    pub fn text_like(size: usize) -> Vec<u8> {
        b"The quick brown fox jumps over the lazy dog. \
          Pack my box with five dozen liquor jugs. \
          How vexingly quick daft zebras jump! "
            .iter()
            .copied()
            .cycle()
            .take(size)
            .collect()
    }
}

fn bench_compress(c: &mut Criterion) {
    let patterns: [(&str, PatternGenerator); 4] = [
        ("uniform", test_data::uniform),
        ("random", test_data::random),
        ("repetitive", test_data::repetitive),
        ("text", test_data::text_like),
    ];

    let mut group = c.benchmark_group("compress");
    for (name, generate) in patterns {
        let data = generate(64 * 1024);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| compress(black_box(data), CompressionLevel::new(1)).unwrap());
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let patterns: [(&str, PatternGenerator); 4] = [
        ("uniform", test_data::uniform),
        ("random", test_data::random),
        ("repetitive", test_data::repetitive),
        ("text", test_data::text_like),
    ];

    let mut group = c.benchmark_group("decompress");
    for (name, generate) in patterns {
        let data = generate(64 * 1024);
        let compressed = compress(&data, CompressionLevel::new(1)).unwrap();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &compressed,
            |b, compressed| {
                b.iter(|| decompress(black_box(&compressed[..])).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
