//! Move-to-Front Transform.
//!
//! Each byte is replaced by its rank in a recency list covering the full
//! 0-255 alphabet, and the byte then moves to the front of the list. After a
//! BWT, where equal bytes cluster, the rank stream is dominated by small
//! values, which is what the Huffman stage feeds on.
//!
//! Encode and decode must agree exactly on the initial list order (ascending
//! byte value) and the move semantics; any divergence corrupts the stream
//! silently, so the symmetry is pinned down by tests rather than checked at
//! run time.

/// Perform the Move-to-Front transform, mapping bytes to ranks.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut list: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut result = Vec::with_capacity(data.len());

    for &byte in data {
        let rank = list
            .iter()
            .position(|&b| b == byte)
            .expect("recency list is a permutation of all byte values");
        result.push(rank as u8);

        // Splice to the front: shift everything above the hit down one slot.
        list.copy_within(0..rank, 1);
        list[0] = byte;
    }

    result
}

/// Invert the Move-to-Front transform, mapping ranks back to bytes.
pub fn decode(ranks: &[u8]) -> Vec<u8> {
    let mut list: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut result = Vec::with_capacity(ranks.len());

    for &rank in ranks {
        let byte = list[rank as usize];
        result.push(byte);

        list.copy_within(0..rank as usize, 1);
        list[0] = byte;
    }

    result
}
