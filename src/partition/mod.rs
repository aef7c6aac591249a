//! Sequence partitioner
//!
//! Splits an ordered sequence into fixed-size contiguous chunks, preserving
//! order. Concatenating the chunks in order reproduces the input exactly:
//! nothing is dropped, duplicated, or reordered.

use crate::seq;
use crate::value::Value;

/// Number of chunks a sequence of `len` elements produces at `size`
/// elements per chunk: `ceil(len / size)`.
pub fn chunk_count(len: usize, size: usize) -> usize {
    len.div_ceil(size.max(1))
}

/// Split a sequence into chunks of `size` elements; the final chunk holds
/// the remainder. A `size` below 1 degenerates to 1 (the default), so every
/// chunk is then a singleton. Strings chunk into one-character strings;
/// non-sequence input produces no chunks. The input is never mutated.
pub fn chunk(seq: &Value, size: i64) -> Value {
    let size = size.max(1) as usize;
    let items = seq::elements(seq);
    let mut chunks = Vec::with_capacity(chunk_count(items.len(), size));
    for window in items.chunks(size) {
        chunks.push(Value::array(window.to_vec()));
    }
    Value::array(chunks)
}
