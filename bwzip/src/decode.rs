//! bwzip decoder.

use crate::{
    bwt, huffman, mtf, CompressionLevel, BLOCK_MAGIC, EOS_MAGIC, FORMAT_MARKER, STREAM_MAGIC,
};
use bwzip_core::error::{BwzError, Result};
use bwzip_core::{BitReader, Crc32};
use std::io::Read;

/// bwzip decoder.
pub struct BwzDecoder<R: Read> {
    reader: BitReader<R>,
    level: CompressionLevel,
    combined_crc: u32,
    finished: bool,
}

impl<R: Read> BwzDecoder<R> {
    /// Create a new decoder, validating the stream header.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut header = [0u8; 4];
        reader.read_exact(&mut header)?;

        if header[0..2] != STREAM_MAGIC {
            return Err(BwzError::invalid_magic(
                STREAM_MAGIC.to_vec(),
                header[0..2].to_vec(),
            ));
        }
        if header[2] != FORMAT_MARKER {
            return Err(BwzError::invalid_header("unknown format marker"));
        }

        let level = header[3].wrapping_sub(b'0');
        if !(1..=9).contains(&level) {
            return Err(BwzError::invalid_header("invalid block size digit"));
        }

        Ok(Self {
            reader: BitReader::new(reader),
            level: CompressionLevel::new(level),
            combined_crc: 0,
            finished: false,
        })
    }

    /// Block size declared by the stream header.
    pub fn block_size(&self) -> usize {
        self.level.block_size()
    }

    /// Compression level declared by the stream header.
    pub fn level(&self) -> u8 {
        self.level.level()
    }

    /// Decode the next block, or `None` once the end-of-stream marker has
    /// been read and the combined CRC verified.
    pub fn read_block(&mut self) -> Result<Option<Vec<u8>>> {
        if self.finished {
            return Ok(None);
        }

        // Frames are byte-aligned.
        self.reader.align_to_byte();

        let mut marker = [0u8; 6];
        for byte in &mut marker {
            *byte = self.reader.read_bits(8)? as u8;
        }

        if marker == EOS_MAGIC {
            let stored = self.reader.read_bits(32)?;
            if stored != self.combined_crc {
                return Err(BwzError::crc_mismatch(stored, self.combined_crc));
            }
            self.finished = true;
            return Ok(None);
        }
        if marker != BLOCK_MAGIC {
            return Err(BwzError::invalid_magic(BLOCK_MAGIC.to_vec(), marker.to_vec()));
        }

        let block_crc = self.reader.read_bits(32)?;

        let symbol_count = self.reader.read_bits(32)? as usize;
        if symbol_count == 0 || symbol_count > self.level.block_size() {
            return Err(BwzError::corrupted(
                self.reader.bit_position(),
                "implausible block length",
            ));
        }

        let rotation_index = self.reader.read_bits(32)?;
        if rotation_index as usize >= symbol_count {
            return Err(BwzError::bad_rotation_index(rotation_index, symbol_count));
        }

        let alphabet = self.read_used_ranks()?;
        let lengths = self.read_code_lengths(alphabet.len())?;
        let table = huffman::HuffmanTable::from_lengths(&lengths)?;

        let mut ranks = Vec::with_capacity(symbol_count);
        for _ in 0..symbol_count {
            let dense = table.decode(&mut self.reader)?;
            ranks.push(alphabet[dense as usize]);
        }

        let bwt_data = mtf::decode(&ranks);
        let block = bwt::inverse_transform(&bwt_data, rotation_index)?;

        let computed = Crc32::compute(&block);
        if computed != block_crc {
            return Err(BwzError::crc_mismatch(block_crc, computed));
        }
        self.combined_crc = self.combined_crc.rotate_left(1) ^ block_crc;

        Ok(Some(block))
    }

    /// Read the used-rank bitmap and return the dense alphabet, ascending.
    fn read_used_ranks(&mut self) -> Result<Vec<u8>> {
        let group_bits = self.reader.read_bits(16)? as u16;

        let mut alphabet = Vec::new();
        for group in 0..16 {
            if (group_bits >> (15 - group)) & 1 == 1 {
                let map = self.reader.read_bits(16)? as u16;
                for bit in 0..16 {
                    if (map >> (15 - bit)) & 1 == 1 {
                        alphabet.push((group * 16 + bit) as u8);
                    }
                }
            }
        }

        if alphabet.is_empty() {
            return Err(BwzError::corrupted(
                self.reader.bit_position(),
                "no symbols in use",
            ));
        }
        Ok(alphabet)
    }

    /// Read the delta-coded code length table for `count` symbols.
    fn read_code_lengths(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut current = self.reader.read_bits(5)? as i32;
        let mut lengths = Vec::with_capacity(count);

        for _ in 0..count {
            loop {
                if !(1..=huffman::MAX_CODE_LEN as i32).contains(&current) {
                    return Err(BwzError::corrupted(
                        self.reader.bit_position(),
                        "code length out of range",
                    ));
                }
                if !self.reader.read_bit()? {
                    break;
                }
                if self.reader.read_bit()? {
                    current -= 1;
                } else {
                    current += 1;
                }
            }
            lengths.push(current as u8);
        }
        Ok(lengths)
    }
}

/// Decompress a bwzip stream in one shot.
pub fn decompress<R: Read>(reader: R) -> Result<Vec<u8>> {
    let mut decoder = BwzDecoder::new(reader)?;
    let mut output = Vec::new();

    while let Some(block) = decoder.read_block()? {
        output.extend_from_slice(&block);
    }

    Ok(output)
}
