//! Burrows-Wheeler Transform.
//!
//! The forward transform sorts all cyclic rotations of a block and emits the
//! last column of the sorted rotation matrix, together with the index of the
//! row holding the original block. The transform is a bijection on blocks:
//! the inverse rebuilds the block exactly from the column and the index.

use bwzip_core::error::{BwzError, Result};
use std::cmp::Ordering;

/// Compare two rotations of `data` byte by byte, starting `skip` bytes in.
///
/// Identical rotations (possible for periodic blocks) are ordered by their
/// rotation offset so the sort is a total order and the output is
/// reproducible.
#[inline]
fn compare_rotations(data: &[u8], a: usize, b: usize, skip: usize) -> Ordering {
    let n = data.len();
    for i in skip..n {
        let byte_a = data[(a + i) % n];
        let byte_b = data[(b + i) % n];
        match byte_a.cmp(&byte_b) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.cmp(&b)
}

/// Perform the Burrows-Wheeler Transform.
///
/// Returns the last column of the sorted rotation matrix and the rotation
/// index of the original block. The empty block transforms to itself with
/// index 0.
pub fn transform(data: &[u8]) -> (Vec<u8>, u32) {
    if data.is_empty() {
        return (Vec::new(), 0);
    }

    let n = data.len();
    let mut indices: Vec<usize> = (0..n).collect();

    if n > 8 {
        // Prefix keys from the first 4 bytes of each rotation keep most
        // comparisons out of the byte-by-byte path.
        let key_len = n.min(4);
        let keys: Vec<u32> = (0..n)
            .map(|i| {
                let mut key = 0u32;
                for j in 0..key_len {
                    key = (key << 8) | data[(i + j) % n] as u32;
                }
                key
            })
            .collect();

        indices.sort_by(|&a, &b| match keys[a].cmp(&keys[b]) {
            Ordering::Equal => compare_rotations(data, a, b, key_len),
            other => other,
        });
    } else {
        indices.sort_by(|&a, &b| compare_rotations(data, a, b, 0));
    }

    let rotation_index = indices
        .iter()
        .position(|&i| i == 0)
        .expect("sorted indices are a permutation of 0..n") as u32;

    let transformed: Vec<u8> = indices.iter().map(|&i| data[(i + n - 1) % n]).collect();

    (transformed, rotation_index)
}

/// Perform the inverse Burrows-Wheeler Transform.
///
/// Rebuilds the original block from the transformed column and the rotation
/// index. Fails with [`BwzError::BadRotationIndex`] if the index does not
/// address a row of the rotation matrix.
pub fn inverse_transform(data: &[u8], rotation_index: u32) -> Result<Vec<u8>> {
    if data.is_empty() {
        if rotation_index != 0 {
            return Err(BwzError::bad_rotation_index(rotation_index, 0));
        }
        return Ok(Vec::new());
    }

    let n = data.len();
    if rotation_index as usize >= n {
        return Err(BwzError::bad_rotation_index(rotation_index, n));
    }

    // Stable key-indexed count over the column gives, for each row of the
    // sorted matrix, the position of its predecessor row.
    let mut counts = [0usize; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }

    let mut starts = [0usize; 256];
    let mut total = 0;
    for (start, &count) in starts.iter_mut().zip(counts.iter()) {
        *start = total;
        total += count;
    }

    let mut next = vec![0usize; n];
    for (i, &byte) in data.iter().enumerate() {
        next[starts[byte as usize]] = i;
        starts[byte as usize] += 1;
    }

    let mut result = Vec::with_capacity(n);
    let mut idx = next[rotation_index as usize];
    for _ in 0..n {
        result.push(data[idx]);
        idx = next[idx];
    }

    Ok(result)
}
