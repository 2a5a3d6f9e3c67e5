//! Throughput measurements for the Burrows-Wheeler Transform.

use bwzip::bwt::{inverse_transform, transform};

fn main() {
    // The rotation sort degrades on highly repetitive data, which is why
    // repeated cases stay small here and block sizes are capped at 900KB.
    let test_cases = vec![
        ("small_text", generate_text(1024)),
        ("medium_text", generate_text(64 * 1024)),
        ("large_text", generate_text(256 * 1024)),
        ("small_random", generate_random(1024)),
        ("medium_random", generate_random(64 * 1024)),
        ("large_random", generate_random(256 * 1024)),
        ("small_repeated", generate_repeated(1024)),
        ("medium_repeated", generate_repeated(8 * 1024)),
    ];

    println!("Burrows-Wheeler Transform Benchmarks");
    println!("=====================================\n");

    for (name, data) in &test_cases {
        println!("Test: {} ({} bytes)", name, data.len());

        let start = std::time::Instant::now();
        let (transformed, rotation_index) = transform(data);
        let forward_time = start.elapsed();
        let forward_throughput = data.len() as f64 / forward_time.as_secs_f64() / 1024.0 / 1024.0;

        let start = std::time::Instant::now();
        let reconstructed = inverse_transform(&transformed, rotation_index).unwrap();
        let inverse_time = start.elapsed();
        let inverse_throughput =
            reconstructed.len() as f64 / inverse_time.as_secs_f64() / 1024.0 / 1024.0;

        assert_eq!(reconstructed, *data, "BWT roundtrip failed for {}", name);

        println!(
            "  Forward:  {:7.2} MB/s ({:8.2} µs)",
            forward_throughput,
            forward_time.as_micros()
        );
        println!(
            "  Inverse:  {:7.2} MB/s ({:8.2} µs)",
            inverse_throughput,
            inverse_time.as_micros()
        );
        println!();
    }
}

fn generate_text(len: usize) -> Vec<u8> {
    let sample = b"the quick brown fox jumps over the lazy dog. pack my box with five dozen liquor jugs. ";
    sample.iter().copied().cycle().take(len).collect()
}

fn generate_random(len: usize) -> Vec<u8> {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

fn generate_repeated(len: usize) -> Vec<u8> {
    vec![b'a'; len]
}
