//! `bwzip info` implementation.

use crate::utils::format_size;
use bwzip::BwzDecoder;
use bwzip_core::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Print header information and block statistics for a `.bwz` file.
pub fn cmd_info(input: &Path) -> Result<()> {
    let compressed_len = std::fs::metadata(input)?.len();
    let reader = BufReader::new(File::open(input)?);
    let mut decoder = BwzDecoder::new(reader)?;

    println!("File:            {}", input.display());
    println!("Compressed size: {}", format_size(compressed_len));
    println!("Level:           {}", decoder.level());
    println!(
        "Block size:      {}",
        format_size(decoder.block_size() as u64)
    );

    // Walking the blocks also verifies every CRC.
    let mut blocks = 0u64;
    let mut original_len = 0u64;
    while let Some(block) = decoder.read_block()? {
        blocks += 1;
        original_len += block.len() as u64;
    }

    println!("Blocks:          {}", blocks);
    println!("Original size:   {}", format_size(original_len));
    if original_len > 0 {
        println!(
            "Ratio:           {:.1}%",
            compressed_len as f64 / original_len as f64 * 100.0
        );
    }
    println!("Integrity:       OK");

    Ok(())
}
