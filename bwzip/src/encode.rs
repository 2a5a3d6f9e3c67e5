//! bwzip encoder.
//!
//! Each block runs through BWT, MTF and Huffman coding and lands in a
//! self-contained, byte-aligned frame. Byte alignment costs at most seven
//! bits per block and buys frame independence: block-parallel compression
//! can concatenate frames without any bit shifting.

use crate::{
    bwt, huffman, mtf, CompressionLevel, BLOCK_MAGIC, EOS_MAGIC, FORMAT_MARKER, STREAM_MAGIC,
};
use bwzip_core::error::Result;
use bwzip_core::{BitWriter, Crc32};
use std::io::Write;

/// bwzip encoder.
pub struct BwzEncoder<W: Write> {
    writer: BitWriter<W>,
    level: CompressionLevel,
    combined_crc: u32,
}

impl<W: Write> BwzEncoder<W> {
    /// Create a new encoder and write the stream header.
    pub fn new(writer: W, level: CompressionLevel) -> Result<Self> {
        let mut bit_writer = BitWriter::new(writer);

        bit_writer.write_bits(STREAM_MAGIC[0] as u32, 8)?;
        bit_writer.write_bits(STREAM_MAGIC[1] as u32, 8)?;
        bit_writer.write_bits(FORMAT_MARKER as u32, 8)?;
        bit_writer.write_bits((b'0' + level.level()) as u32, 8)?;

        Ok(Self {
            writer: bit_writer,
            level,
            combined_crc: 0,
        })
    }

    /// Compress `data`, splitting it into block-sized frames as needed.
    /// Empty input writes nothing.
    pub fn write_block(&mut self, data: &[u8]) -> Result<()> {
        for chunk in data.chunks(self.level.block_size()) {
            let block_crc = write_block_frame(&mut self.writer, chunk)?;
            self.combined_crc = self.combined_crc.rotate_left(1) ^ block_crc;
        }
        Ok(())
    }

    /// Write the stream footer and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        for &byte in &EOS_MAGIC {
            self.writer.write_bits(byte as u32, 8)?;
        }
        self.writer.write_bits(self.combined_crc, 32)?;
        self.writer.into_inner()
    }
}

/// Encode one nonempty block into a byte-aligned frame, returning its CRC.
fn write_block_frame<W: Write>(writer: &mut BitWriter<W>, data: &[u8]) -> Result<u32> {
    debug_assert!(!data.is_empty());

    let block_crc = Crc32::compute(data);

    let (bwt_data, rotation_index) = bwt::transform(data);
    let ranks = mtf::encode(&bwt_data);

    let mut used = [false; 256];
    for &rank in &ranks {
        used[rank as usize] = true;
    }

    for &byte in &BLOCK_MAGIC {
        writer.write_bits(byte as u32, 8)?;
    }
    writer.write_bits(block_crc, 32)?;
    writer.write_bits(data.len() as u32, 32)?;
    writer.write_bits(rotation_index, 32)?;

    // Used-rank bitmap: a 16-bit map of 16-rank groups, then one 16-bit map
    // per occupied group. Keeps the Huffman alphabet down to the ranks the
    // block actually produces.
    let mut group_bits = 0u16;
    for group in 0..16 {
        if used[group * 16..(group + 1) * 16].iter().any(|&u| u) {
            group_bits |= 1 << (15 - group);
        }
    }
    writer.write_bits(group_bits as u32, 16)?;

    for group in 0..16 {
        if (group_bits >> (15 - group)) & 1 == 1 {
            let mut map = 0u16;
            for bit in 0..16 {
                if used[group * 16 + bit] {
                    map |= 1 << (15 - bit);
                }
            }
            writer.write_bits(map as u32, 16)?;
        }
    }

    // Dense alphabet over the used ranks, ascending, mirrored by the decoder.
    let alphabet: Vec<u8> = (0..256usize).filter(|&r| used[r]).map(|r| r as u8).collect();
    let mut dense_index = [0u16; 256];
    for (i, &rank) in alphabet.iter().enumerate() {
        dense_index[rank as usize] = i as u16;
    }

    let mut freqs = vec![0u32; alphabet.len()];
    for &rank in &ranks {
        freqs[dense_index[rank as usize] as usize] += 1;
    }

    let lengths = huffman::build_code_lengths(&freqs);
    write_code_lengths(writer, &lengths)?;

    let table = huffman::HuffmanTable::from_lengths(&lengths)?;
    for &rank in &ranks {
        let (code, len) = table
            .code(dense_index[rank as usize])
            .expect("every used rank has a code");
        writer.write_bits(code, len)?;
    }

    writer.align_to_byte()?;
    Ok(block_crc)
}

/// Delta-code the length table: a 5-bit starting length, then per symbol a
/// run of `1`+direction adjustments closed by a `0`.
fn write_code_lengths<W: Write>(writer: &mut BitWriter<W>, lengths: &[u8]) -> Result<()> {
    let mut current = lengths[0] as i32;
    writer.write_bits(current as u32, 5)?;

    for &len in lengths {
        let target = len as i32;
        while current != target {
            writer.write_bit(true)?;
            if target > current {
                writer.write_bit(false)?;
                current += 1;
            } else {
                writer.write_bit(true)?;
                current -= 1;
            }
        }
        writer.write_bit(false)?;
    }
    Ok(())
}

/// Compress data in one shot.
pub fn compress(data: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
    let mut encoder = BwzEncoder::new(Vec::new(), level)?;
    encoder.write_block(data)?;
    encoder.finish()
}

/// Compress data with one rayon task per block.
///
/// Per-block frequency tables make every frame independent, and frames are
/// byte-aligned, so the output is byte-identical to [`compress`].
#[cfg(feature = "parallel")]
pub fn compress_parallel(data: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
    use rayon::prelude::*;

    let frames: Vec<(Vec<u8>, u32)> = data
        .par_chunks(level.block_size())
        .map(|chunk| {
            let mut writer = BitWriter::new(Vec::new());
            let crc = write_block_frame(&mut writer, chunk)?;
            Ok((writer.into_inner()?, crc))
        })
        .collect::<Result<_>>()?;

    let mut output = vec![
        STREAM_MAGIC[0],
        STREAM_MAGIC[1],
        FORMAT_MARKER,
        b'0' + level.level(),
    ];
    let mut combined_crc = 0u32;
    for (frame, crc) in frames {
        output.extend_from_slice(&frame);
        combined_crc = combined_crc.rotate_left(1) ^ crc;
    }

    let mut writer = BitWriter::new(output);
    for &byte in &EOS_MAGIC {
        writer.write_bits(byte as u32, 8)?;
    }
    writer.write_bits(combined_crc, 32)?;
    writer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_empty_is_header_and_footer() {
        let result = compress(b"", CompressionLevel::default()).unwrap();
        // 4-byte header + 6-byte EOS + 4-byte combined CRC, nothing else.
        assert_eq!(result.len(), 14);
        assert_eq!(&result[0..2], &STREAM_MAGIC);
        assert_eq!(&result[4..10], &EOS_MAGIC);
    }

    #[test]
    fn test_stream_header_carries_level() {
        let result = compress(b"hello", CompressionLevel::new(3)).unwrap();
        assert_eq!(&result[0..2], &STREAM_MAGIC);
        assert_eq!(result[2], FORMAT_MARKER);
        assert_eq!(result[3], b'3');
    }

    #[test]
    fn test_block_frame_is_byte_aligned() {
        let result = compress(b"hello world", CompressionLevel::new(1)).unwrap();
        // The EOS marker must sit on a byte boundary right after the frame.
        let pos = result.len() - 10;
        assert_eq!(&result[pos..pos + 6], &EOS_MAGIC);
        assert_eq!(&result[4..10], &BLOCK_MAGIC);
    }

    #[test]
    fn test_repeated_input_stays_small() {
        let data = vec![b'A'; 100_000];
        let result = compress(&data, CompressionLevel::new(1)).unwrap();
        // One frame: magic + CRC + lengths + ~1 bit per symbol of payload.
        assert!(result.len() < 13_000, "got {} bytes", result.len());
    }
}
