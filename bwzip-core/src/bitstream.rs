//! Bit-level I/O for variable-length codes.
//!
//! The bwzip block format packs Huffman codes and header fields most
//! significant bit first, so both [`BitReader`] and [`BitWriter`] are
//! MSB-first: the first bit written becomes the high bit of the first byte.
//!
//! # Example
//!
//! ```
//! use bwzip_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut output = Vec::new();
//! {
//!     let mut writer = BitWriter::new(&mut output);
//!     writer.write_bits(0b101, 3).unwrap();
//!     writer.write_bits(0b11001, 5).unwrap();
//!     writer.flush().unwrap();
//! }
//! assert_eq!(output, vec![0b1011_1001]);
//!
//! let mut reader = BitReader::new(Cursor::new(&output));
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(5).unwrap(), 0b11001);
//! ```

use crate::error::{BwzError, Result};
use std::io::{Read, Write};

/// A bit-level reader wrapping any [`Read`] implementation.
///
/// Bits are consumed MSB-first within each byte. A 64-bit accumulator keeps
/// partial bytes across calls.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    reader: R,
    /// Pending bits, right-aligned: the next bit to deliver is bit
    /// `bits_in_buffer - 1`.
    buffer: u64,
    bits_in_buffer: u8,
    total_bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_read: 0,
        }
    }

    /// Consume this `BitReader` and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Current bit position in the stream (for error reporting).
    pub fn bit_position(&self) -> u64 {
        self.total_bits_read
    }

    /// Pull whole bytes from the reader until `count` bits are buffered.
    #[inline]
    fn fill_buffer(&mut self, count: u8) -> Result<()> {
        debug_assert!(count <= 32, "cannot buffer more than 32 bits at once");

        while self.bits_in_buffer < count {
            let mut byte = [0u8; 1];
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    let missing = count - self.bits_in_buffer;
                    return Err(BwzError::unexpected_eof(missing.div_ceil(8) as usize));
                }
                Ok(_) => {
                    self.buffer = (self.buffer << 8) | byte[0] as u64;
                    self.bits_in_buffer += 8;
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Read up to 32 bits, returning them right-aligned in a `u32`.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "cannot read more than 32 bits at once");

        if count == 0 {
            return Ok(0);
        }

        self.fill_buffer(count)?;

        self.bits_in_buffer -= count;
        let result = (self.buffer >> self.bits_in_buffer) as u32 & mask32(count);
        self.buffer &= (1u64 << self.bits_in_buffer) - 1;
        self.total_bits_read += count as u64;

        Ok(result)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Discard bits up to the next byte boundary of the input stream.
    pub fn align_to_byte(&mut self) {
        let partial = self.bits_in_buffer % 8;
        if partial > 0 {
            self.bits_in_buffer -= partial;
            self.buffer &= (1u64 << self.bits_in_buffer) - 1;
            self.total_bits_read += partial as u64;
        }
    }
}

/// A bit-level writer wrapping any [`Write`] implementation.
///
/// Bits accumulate MSB-first; complete bytes are forwarded to the underlying
/// writer as they form. [`flush`](BitWriter::flush) pads the final partial
/// byte with zero bits.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    writer: W,
    /// Pending bits, right-aligned: the oldest unwritten bit is bit
    /// `bits_in_buffer - 1`.
    buffer: u64,
    bits_in_buffer: u8,
    total_bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new `BitWriter` wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_written: 0,
        }
    }

    /// Total number of bits written so far, including padding.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Flush any pending bits (zero-padded) and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        let this = std::mem::ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the writer is moved out exactly once.
        Ok(unsafe { std::ptr::read(&this.writer) })
    }

    /// Forward complete bytes from the accumulator to the writer.
    #[inline]
    fn drain_bytes(&mut self) -> Result<()> {
        while self.bits_in_buffer >= 8 {
            let byte = (self.buffer >> (self.bits_in_buffer - 8)) as u8;
            self.writer.write_all(&[byte])?;
            self.bits_in_buffer -= 8;
            self.buffer &= (1u64 << self.bits_in_buffer) - 1;
        }
        Ok(())
    }

    /// Write the low `count` bits of `value`, MSB-first.
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        debug_assert!(count <= 32, "cannot write more than 32 bits at once");

        if count == 0 {
            return Ok(());
        }

        let value = value & mask32(count);
        self.buffer = (self.buffer << count) | value as u64;
        self.bits_in_buffer += count;
        self.total_bits_written += count as u64;

        self.drain_bytes()
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(bit as u32, 1)
    }

    /// Pad with zero bits to the next byte boundary.
    pub fn align_to_byte(&mut self) -> Result<()> {
        let partial = self.bits_in_buffer % 8;
        if partial > 0 {
            self.write_bits(0, 8 - partial)?;
        }
        Ok(())
    }

    /// Pad to a byte boundary and flush everything to the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.align_to_byte()?;
        self.drain_bytes()?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        // Best-effort flush on drop
        let _ = self.flush();
    }
}

#[inline]
fn mask32(count: u8) -> u32 {
    if count >= 32 {
        u32::MAX
    } else {
        (1u32 << count) - 1
    }
}
