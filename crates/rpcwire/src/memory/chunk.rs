// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Chunk planning for remote region transfers.
//!
//! A logical read or write larger than the transport limit is split into
//! sub-requests of at most `max_chunk_elements` elements:
//!
//! ```text
//! max_chunk_elements = floor(max_transfer_bytes / element_size)
//! ```
//!
//! Chunks come out in strictly increasing position order. They never
//! overlap and their counts sum to the requested count.
//!
//! Multidimensional requests are split along the outermost axis `k` whose
//! inner block `count[0] * .. * count[k-1]` still fits in one chunk. Axes
//! inside `k` keep the caller's count, axis `k` advances by
//! `max / block` indices, and axes outside `k` advance one index at a time:
//!
//! ```text
//! count = [4, 3, 5]   max = 30   block = 4 * 3 = 12   per chunk = 2
//!
//! chunk 0: pos [p0, p1, p2 + 0]  count [4, 3, 2]
//! chunk 1: pos [p0, p1, p2 + 2]  count [4, 3, 2]
//! chunk 2: pos [p0, p1, p2 + 4]  count [4, 3, 1]
//!
//! count = [8, 2]   max = 4   block = 1   per chunk = 4
//!
//! chunk 0: pos [p0 + 0, p1 + 0]  count [4, 1]
//! chunk 1: pos [p0 + 4, p1 + 0]  count [4, 1]
//! chunk 2: pos [p0 + 0, p1 + 1]  count [4, 1]
//! chunk 3: pos [p0 + 4, p1 + 1]  count [4, 1]
//! ```
//!
//! # Usage
//!
//! ```
//! use rpcwire::memory::chunk::{max_chunk_elements, FlatChunks};
//!
//! let max = max_chunk_elements(16, 4).unwrap();
//! let counts: Vec<u64> = FlatChunks::new(0, 10, max).map(|c| c.count).collect();
//! assert_eq!(counts, vec![4, 4, 2]);
//! ```

use super::region;
use crate::error::{Error, Result};

/// Largest element count one sub-request may carry.
pub fn max_chunk_elements(max_transfer_bytes: usize, element_size: usize) -> Result<u64> {
    if element_size == 0 {
        return Err(Error::UnsupportedShape("zero-width element".into()));
    }
    match max_transfer_bytes / element_size {
        0 => Err(Error::UnsupportedShape(format!(
            "element of {} bytes exceeds transfer limit of {} bytes",
            element_size, max_transfer_bytes
        ))),
        n => Ok(n as u64),
    }
}

/// One flat sub-request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatChunk {
    /// Offset from the start of the logical request
    pub offset: u64,
    /// Position in the region
    pub pos: u64,
    pub count: u64,
}

/// Iterator over the flat sub-requests of `(pos, count)`.
#[derive(Debug, Clone)]
pub struct FlatChunks {
    pos: u64,
    count: u64,
    offset: u64,
    max: u64,
}

impl FlatChunks {
    /// `max` is clamped to at least one element.
    pub fn new(pos: u64, count: u64, max: u64) -> Self {
        Self {
            pos,
            count,
            offset: 0,
            max: max.max(1),
        }
    }
}

impl Iterator for FlatChunks {
    type Item = FlatChunk;

    fn next(&mut self) -> Option<FlatChunk> {
        let remaining = self.count - self.offset;
        if remaining == 0 {
            return None;
        }
        let chunk = FlatChunk {
            offset: self.offset,
            pos: self.pos + self.offset,
            count: remaining.min(self.max),
        };
        self.offset += chunk.count;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.count - self.offset).div_ceil(self.max) as usize;
        (n, Some(n))
    }
}

/// One multidimensional sub-request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiDimChunk {
    /// Offset from the start of the logical request, per axis
    pub offset: Vec<u64>,
    /// Position in the region, per axis
    pub pos: Vec<u64>,
    pub count: Vec<u64>,
}

/// Split a multidimensional request into blocks of at most `max` elements.
///
/// Chunks come out in increasing column-major position order. An empty
/// request has no chunks.
pub fn plan_multidim(pos: &[u64], count: &[u64], max: u64) -> Result<Vec<MultiDimChunk>> {
    if pos.len() != count.len() {
        return Err(Error::dimensions(count, pos));
    }
    let total = region::element_count(count)?;
    if total == 0 {
        return Ok(Vec::new());
    }
    // Positions are checked against the region elsewhere; only reject wraparound here.
    for (&p, &c) in pos.iter().zip(count) {
        if p.checked_add(c).is_none() {
            return Err(Error::OutOfBounds(format!("{}+{} overflows", p, c)));
        }
    }
    let max = max.max(1);
    if total <= max {
        return Ok(vec![MultiDimChunk {
            offset: vec![0; count.len()],
            pos: pos.to_vec(),
            count: count.to_vec(),
        }]);
    }

    // total > max, so the walk stops before the last axis runs out.
    let mut axis = 0;
    let mut block = 1u64;
    while axis + 1 < count.len() && block * count[axis] <= max {
        block *= count[axis];
        axis += 1;
    }
    let step = max / block;

    let mut chunks = Vec::new();
    let mut outer = vec![0u64; count.len()];
    loop {
        let mut done = 0;
        while done < count[axis] {
            let n = step.min(count[axis] - done);
            let mut offset = outer.clone();
            offset[axis] = done;
            let chunk_pos = pos.iter().zip(&offset).map(|(p, o)| p + o).collect();
            let mut chunk_count = count.to_vec();
            chunk_count[axis] = n;
            for c in &mut chunk_count[axis + 1..] {
                *c = 1;
            }
            chunks.push(MultiDimChunk {
                offset,
                pos: chunk_pos,
                count: chunk_count,
            });
            done += n;
        }

        // odometer over the axes outside the split axis
        let mut a = axis + 1;
        loop {
            if a == count.len() {
                return Ok(chunks);
            }
            outer[a] += 1;
            if outer[a] < count[a] {
                break;
            }
            outer[a] = 0;
            a += 1;
        }
    }
}
