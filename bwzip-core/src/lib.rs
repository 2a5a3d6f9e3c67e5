//! # bwzip core
//!
//! Foundation crate for the bwzip block-sorting compressor.
//!
//! - [`bitstream`]: MSB-first bit-level I/O for variable-length codes
//! - [`crc`]: CRC-32 checksums for block integrity
//! - [`error`]: Error types shared by the codec and CLI
//!
//! The compression pipeline itself (Burrows-Wheeler Transform, Move-to-Front
//! and Huffman coding) lives in the `bwzip` crate; this crate only provides
//! the plumbing those stages share.
//!
//! ## Example
//!
//! ```rust
//! use bwzip_core::{BitReader, BitWriter, Crc32};
//! use std::io::Cursor;
//!
//! let mut out = Vec::new();
//! {
//!     let mut writer = BitWriter::new(&mut out);
//!     writer.write_bits(0b101, 3).unwrap();
//!     writer.flush().unwrap();
//! }
//! let mut reader = BitReader::new(Cursor::new(&out));
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//!
//! let crc = Crc32::compute(b"Hello, World!");
//! assert_eq!(crc, 0xEC4AC3D0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitstream;
pub mod crc;
pub mod error;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use crc::Crc32;
pub use error::{BwzError, Result};
