//! Canonical Huffman coding.
//!
//! Code lengths come from a textbook Huffman tree build over an arena of
//! node records driven by a binary heap; ties on weight break on node
//! creation order, so independent runs produce identical trees. Only the
//! length of each code survives the build: actual codes are assigned
//! canonically (ordered by length, then symbol), which is what lets the
//! decoder rebuild the table from the lengths alone.

use bwzip_core::error::{BwzError, Result};
use bwzip_core::BitReader;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::Read;

/// Maximum code length the block format allows.
pub const MAX_CODE_LEN: usize = 20;

enum Node {
    Leaf(usize),
    Internal(usize, usize),
}

/// Build Huffman code lengths from symbol frequencies.
///
/// Zero-frequency symbols get length 0 and carry no code. A single used
/// symbol gets the degenerate 1-bit code. Lengths never exceed
/// [`MAX_CODE_LEN`]; overlong trees are repaired while keeping the code set
/// prefix-free.
pub fn build_code_lengths(freqs: &[u32]) -> Vec<u8> {
    let mut lengths = vec![0u8; freqs.len()];
    let used: Vec<usize> = (0..freqs.len()).filter(|&s| freqs[s] > 0).collect();

    match used.len() {
        0 => return lengths,
        1 => {
            lengths[used[0]] = 1;
            return lengths;
        }
        _ => {}
    }

    // Arena of tree nodes; the heap orders by (weight, arena index), and
    // since leaves are pushed in symbol order and merged nodes in creation
    // order, the index doubles as a deterministic tie-break.
    let mut arena: Vec<Node> = Vec::with_capacity(used.len() * 2 - 1);
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::with_capacity(used.len());

    for &sym in &used {
        heap.push(Reverse((freqs[sym] as u64, arena.len())));
        arena.push(Node::Leaf(sym));
    }

    while heap.len() > 1 {
        let Reverse((weight_a, a)) = heap.pop().expect("heap holds at least two nodes");
        let Reverse((weight_b, b)) = heap.pop().expect("heap holds at least two nodes");
        heap.push(Reverse((weight_a + weight_b, arena.len())));
        arena.push(Node::Internal(a, b));
    }

    // Leaf depth = code length.
    let root = arena.len() - 1;
    let mut stack = vec![(root, 0u16)];
    while let Some((id, depth)) = stack.pop() {
        match arena[id] {
            Node::Leaf(sym) => lengths[sym] = depth as u8,
            Node::Internal(left, right) => {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
    }

    limit_code_lengths(&mut lengths, freqs);
    lengths
}

/// Cap code lengths at [`MAX_CODE_LEN`] while keeping the Kraft sum at one.
///
/// Skewed frequency tables can push tree depth past the format limit (a
/// Fibonacci-weighted table reaches depth 28 within a 900k block). Clamping
/// alone would make the code set ambiguous, so the per-length counts are
/// rebalanced first and lengths reassigned shortest-first to the most
/// frequent symbols.
fn limit_code_lengths(lengths: &mut [u8], freqs: &[u32]) {
    if lengths.iter().all(|&len| (len as usize) <= MAX_CODE_LEN) {
        return;
    }

    let mut count_per_len = [0u32; MAX_CODE_LEN + 1];
    for &len in lengths.iter().filter(|&&len| len > 0) {
        count_per_len[(len as usize).min(MAX_CODE_LEN)] += 1;
    }

    // Kraft sum scaled by 2^MAX_CODE_LEN. Each over-full step moves one
    // code up from max depth and splits one shallower code into two.
    let mut total: u64 = (1..=MAX_CODE_LEN)
        .map(|len| (count_per_len[len] as u64) << (MAX_CODE_LEN - len))
        .sum();
    while total > 1u64 << MAX_CODE_LEN {
        count_per_len[MAX_CODE_LEN] -= 1;
        for len in (1..MAX_CODE_LEN).rev() {
            if count_per_len[len] > 0 {
                count_per_len[len] -= 1;
                count_per_len[len + 1] += 2;
                break;
            }
        }
        total -= 1;
    }

    let mut order: Vec<usize> = (0..lengths.len()).filter(|&s| lengths[s] > 0).collect();
    order.sort_by_key(|&s| (Reverse(freqs[s]), s));

    let mut symbols = order.into_iter();
    for len in 1..=MAX_CODE_LEN {
        for _ in 0..count_per_len[len] {
            if let Some(sym) = symbols.next() {
                lengths[sym] = len as u8;
            }
        }
    }
}

/// A canonical Huffman table, usable for both encoding and decoding.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    /// Code length per symbol (0 = symbol unused).
    lengths: Vec<u8>,
    /// Canonical code per symbol (for encoding).
    codes: Vec<u32>,
    /// Shortest used code length.
    min_len: u8,
    /// Longest used code length.
    max_len: u8,
    /// Number of codes at each length.
    counts: [u32; MAX_CODE_LEN + 1],
    /// First canonical code at each length (for decoding).
    first_codes: [u32; MAX_CODE_LEN + 1],
    /// Index into `symbols` where each length's run starts.
    first_indices: [u32; MAX_CODE_LEN + 1],
    /// Symbols ordered by (length, symbol), i.e. canonical code order.
    symbols: Vec<u16>,
}

impl HuffmanTable {
    /// Build a canonical table from code lengths.
    ///
    /// Rejects empty or over-long length sets and any set whose codes would
    /// overflow their length (a non-prefix-free length multiset).
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        if lengths.is_empty() || lengths.iter().all(|&len| len == 0) {
            return Err(BwzError::corrupted(0, "empty Huffman table"));
        }

        let min_len = *lengths
            .iter()
            .filter(|&&len| len > 0)
            .min()
            .expect("at least one nonzero length");
        let max_len = *lengths.iter().max().expect("lengths are nonempty");

        if max_len as usize > MAX_CODE_LEN {
            return Err(BwzError::corrupted(0, "Huffman code too long"));
        }

        let mut counts = [0u32; MAX_CODE_LEN + 1];
        for &len in lengths.iter().filter(|&&len| len > 0) {
            counts[len as usize] += 1;
        }

        // Canonical numbering: codes at each length start where the previous
        // length's codes left off, doubled.
        let mut first_codes = [0u32; MAX_CODE_LEN + 1];
        let mut first_indices = [0u32; MAX_CODE_LEN + 1];
        let mut code = 0u32;
        let mut index = 0u32;
        for len in 1..=max_len as usize {
            first_codes[len] = code;
            first_indices[len] = index;
            if code + counts[len] > 1u32 << len {
                return Err(BwzError::corrupted(0, "invalid Huffman length set"));
            }
            code = (code + counts[len]) << 1;
            index += counts[len];
        }

        let mut codes = vec![0u32; lengths.len()];
        let mut symbols = vec![0u16; index as usize];
        let mut next_code = first_codes;
        let mut next_index = first_indices;

        for (sym, &len) in lengths.iter().enumerate() {
            if len > 0 {
                let len = len as usize;
                codes[sym] = next_code[len];
                symbols[next_index[len] as usize] = sym as u16;
                next_code[len] += 1;
                next_index[len] += 1;
            }
        }

        Ok(Self {
            lengths: lengths.to_vec(),
            codes,
            min_len,
            max_len,
            counts,
            first_codes,
            first_indices,
            symbols,
        })
    }

    /// Get the canonical code and its length for a symbol, if the symbol is
    /// part of the table.
    pub fn code(&self, symbol: u16) -> Option<(u32, u8)> {
        let sym = symbol as usize;
        if sym < self.lengths.len() && self.lengths[sym] > 0 {
            Some((self.codes[sym], self.lengths[sym]))
        } else {
            None
        }
    }

    /// Decode a single symbol, consuming bits MSB-first.
    pub fn decode<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u16> {
        let mut code = reader.read_bits(self.min_len)?;

        for len in self.min_len..=self.max_len {
            let len_idx = len as usize;
            if self.counts[len_idx] > 0 {
                let offset = code.wrapping_sub(self.first_codes[len_idx]);
                if code >= self.first_codes[len_idx] && offset < self.counts[len_idx] {
                    let index = self.first_indices[len_idx] + offset;
                    return Ok(self.symbols[index as usize]);
                }
            }
            if len < self.max_len {
                code = (code << 1) | reader.read_bits(1)?;
            }
        }

        Err(BwzError::invalid_huffman(reader.bit_position()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bwzip_core::BitWriter;
    use std::io::Cursor;

    fn is_prefix_free(table: &HuffmanTable, alphabet: usize) -> bool {
        let codes: Vec<(u32, u8)> = (0..alphabet as u16)
            .filter_map(|s| table.code(s))
            .collect();
        for (i, &(code_a, len_a)) in codes.iter().enumerate() {
            for &(code_b, len_b) in &codes[i + 1..] {
                let (short, short_len, long, long_len) = if len_a <= len_b {
                    (code_a, len_a, code_b, len_b)
                } else {
                    (code_b, len_b, code_a, len_a)
                };
                if long_len == short_len && long == short {
                    return false;
                }
                if long >> (long_len - short_len) == short {
                    return false;
                }
            }
        }
        true
    }

    fn roundtrip_symbols(freqs: &[u32], stream: &[u16]) {
        let lengths = build_code_lengths(freqs);
        let table = HuffmanTable::from_lengths(&lengths).unwrap();

        let mut out = Vec::new();
        {
            let mut writer = BitWriter::new(&mut out);
            for &sym in stream {
                let (code, len) = table.code(sym).unwrap();
                writer.write_bits(code, len).unwrap();
            }
            writer.flush().unwrap();
        }

        let mut reader = BitReader::new(Cursor::new(&out));
        for &expected in stream {
            assert_eq!(table.decode(&mut reader).unwrap(), expected);
        }
    }

    #[test]
    fn test_lengths_follow_frequency() {
        let freqs = vec![100, 50, 25, 10];
        let lengths = build_code_lengths(&freqs);
        assert_eq!(lengths.len(), 4);
        assert!(lengths[0] <= lengths[3]);
    }

    #[test]
    fn test_zero_freq_symbols_excluded() {
        let freqs = vec![5, 0, 3, 0, 2];
        let lengths = build_code_lengths(&freqs);
        assert_eq!(lengths[1], 0);
        assert_eq!(lengths[3], 0);
        assert!(lengths[0] > 0 && lengths[2] > 0 && lengths[4] > 0);
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let freqs = vec![0, 0, 42, 0];
        let lengths = build_code_lengths(&freqs);
        assert_eq!(lengths, vec![0, 0, 1, 0]);

        let table = HuffmanTable::from_lengths(&lengths).unwrap();
        assert_eq!(table.code(2), Some((0, 1)));
    }

    #[test]
    fn test_two_symbols() {
        let lengths = build_code_lengths(&[7, 3]);
        assert_eq!(lengths, vec![1, 1]);
    }

    #[test]
    fn test_deterministic_ties() {
        // All weights equal: tie-breaks alone decide the tree shape, and
        // repeated builds must agree.
        let freqs = vec![1u32; 16];
        let first = build_code_lengths(&freqs);
        let second = build_code_lengths(&freqs);
        assert_eq!(first, second);
        assert!(first.iter().all(|&len| len == 4));
    }

    #[test]
    fn test_kraft_equality_holds() {
        let freqs: Vec<u32> = (1..=40).collect();
        let lengths = build_code_lengths(&freqs);
        let kraft: u64 = lengths
            .iter()
            .filter(|&&len| len > 0)
            .map(|&len| 1u64 << (MAX_CODE_LEN - len as usize))
            .sum();
        assert_eq!(kraft, 1u64 << MAX_CODE_LEN);
    }

    #[test]
    fn test_depth_limited_fibonacci() {
        // Fibonacci weights force maximum skew; depth must still be capped.
        let mut freqs = vec![1u32, 1];
        while freqs.len() < 32 {
            let n = freqs.len();
            freqs.push(freqs[n - 1] + freqs[n - 2]);
        }
        let lengths = build_code_lengths(&freqs);
        assert!(lengths.iter().all(|&len| (len as usize) <= MAX_CODE_LEN));

        let table = HuffmanTable::from_lengths(&lengths).unwrap();
        assert!(is_prefix_free(&table, freqs.len()));
    }

    #[test]
    fn test_prefix_free_property() {
        let freqs = vec![90, 45, 13, 13, 12, 5, 2, 1, 1, 1];
        let lengths = build_code_lengths(&freqs);
        let table = HuffmanTable::from_lengths(&lengths).unwrap();
        assert!(is_prefix_free(&table, freqs.len()));
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let freqs = vec![50, 20, 10, 5, 5, 5, 3, 2];
        let stream: Vec<u16> = vec![0, 1, 0, 7, 3, 0, 2, 6, 5, 4, 0, 0, 1];
        roundtrip_symbols(&freqs, &stream);
    }

    #[test]
    fn test_degenerate_stream_roundtrip() {
        let freqs = vec![1000];
        let stream = vec![0u16; 64];
        roundtrip_symbols(&freqs, &stream);
    }

    #[test]
    fn test_from_lengths_rejects_garbage() {
        assert!(HuffmanTable::from_lengths(&[]).is_err());
        assert!(HuffmanTable::from_lengths(&[0, 0, 0]).is_err());
        assert!(HuffmanTable::from_lengths(&[25]).is_err());
        // Three 1-bit codes cannot coexist.
        assert!(HuffmanTable::from_lengths(&[1, 1, 1]).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_stream() {
        let lengths = build_code_lengths(&[10, 1, 1, 1, 1, 1, 1]);
        let table = HuffmanTable::from_lengths(&lengths).unwrap();
        let mut reader = BitReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(table.decode(&mut reader).is_err());
    }
}
