//! Block-sorting compression for bwzip.
//!
//! bwzip compresses data one block at a time through a three-stage pipeline:
//!
//! 1. Burrows-Wheeler Transform (BWT) - reversible block sort that clusters
//!    similar contexts together
//! 2. Move-to-Front Transform (MTF) - turns that clustering into a stream of
//!    mostly small rank values
//! 3. Huffman coding - canonical prefix codes, the stage that actually
//!    shrinks the data
//!
//! Decompression runs the stages in reverse: Huffman decode, inverse MTF,
//! inverse BWT. Each block frame carries the rotation index needed to invert
//! the BWT and a CRC-32 of the original bytes, since the transforms
//! themselves cannot detect corruption.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bwt;
mod decode;
mod encode;
pub mod huffman;
pub mod mtf;

pub use decode::{BwzDecoder, decompress};
pub use encode::{BwzEncoder, compress};

#[cfg(feature = "parallel")]
pub use encode::compress_parallel;

/// Stream magic bytes ("BW").
pub const STREAM_MAGIC: [u8; 2] = [0x42, 0x57];

/// Format marker byte following the stream magic.
pub const FORMAT_MARKER: u8 = b'z';

/// Block header magic (digits of e).
pub const BLOCK_MAGIC: [u8; 6] = [0x27, 0x18, 0x28, 0x18, 0x28, 0x45];

/// End of stream magic (digits of sqrt 2).
pub const EOS_MAGIC: [u8; 6] = [0x14, 0x14, 0x21, 0x35, 0x62, 0x37];

/// Maximum block size (900k, level 9).
pub const MAX_BLOCK_SIZE: usize = 900_000;

/// Compression level (1-9, selecting a block size of level x 100k).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// Create a new compression level (clamped to 1-9).
    pub fn new(level: u8) -> Self {
        Self(level.clamp(1, 9))
    }

    /// Get the block size for this level.
    pub fn block_size(&self) -> usize {
        self.0 as usize * 100_000
    }

    /// Get the level value.
    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self(9)
    }
}
