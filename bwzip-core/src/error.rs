//! Error types for bwzip operations.

use std::io;
use thiserror::Error;

/// The main error type for bwzip operations.
#[derive(Debug, Error)]
pub enum BwzError {
    /// I/O error from the underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic number in the stream or block header.
    #[error("Invalid magic number: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Invalid header format.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Corrupted data in the compressed stream.
    #[error("Corrupted data at bit {bit_position}: {message}")]
    CorruptedData {
        /// Bit offset where corruption was detected.
        bit_position: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Invalid Huffman code encountered during decoding.
    #[error("Invalid Huffman code at bit position {bit_position}")]
    InvalidHuffmanCode {
        /// Bit position where the invalid code was found.
        bit_position: u64,
    },

    /// Rotation index out of range for the inverse Burrows-Wheeler Transform.
    #[error("Rotation index {index} out of range for block of {block_len} bytes")]
    BadRotationIndex {
        /// The out-of-range rotation index.
        index: u32,
        /// Length of the block being inverted.
        block_len: usize,
    },

    /// CRC checksum mismatch.
    #[error("CRC mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    CrcMismatch {
        /// Expected CRC value from the stream.
        expected: u32,
        /// Computed CRC value from the data.
        computed: u32,
    },

    /// Unexpected end of the compressed stream.
    #[error("Unexpected end of stream: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },
}

/// Result type alias for bwzip operations.
pub type Result<T> = std::result::Result<T, BwzError>;

impl BwzError {
    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a corrupted data error.
    pub fn corrupted(bit_position: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            bit_position,
            message: message.into(),
        }
    }

    /// Create an invalid Huffman code error.
    pub fn invalid_huffman(bit_position: u64) -> Self {
        Self::InvalidHuffmanCode { bit_position }
    }

    /// Create a bad rotation index error.
    pub fn bad_rotation_index(index: u32, block_len: usize) -> Self {
        Self::BadRotationIndex { index, block_len }
    }

    /// Create a CRC mismatch error.
    pub fn crc_mismatch(expected: u32, computed: u32) -> Self {
        Self::CrcMismatch { expected, computed }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: usize) -> Self {
        Self::UnexpectedEof { expected }
    }
}
