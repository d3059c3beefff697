// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds checks and column-major region copies.
//!
//! A region of rank N with dims `d` stores element `(i0, .., iN-1)` at
//! `i0 + d0 * (i1 + d1 * (i2 + ..))`: the first axis is contiguous. A
//! sub-region copy therefore decomposes into runs of `count[0]` elements.

use crate::error::{Error, Result};
use std::ops::Range;

pub(crate) fn to_usize(value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::OutOfBounds(format!("{} exceeds usize", value)))
}

/// Checked product of the axis counts.
pub(crate) fn element_count(count: &[u64]) -> Result<u64> {
    count.iter().try_fold(1u64, |acc, &c| {
        acc.checked_mul(c)
            .ok_or_else(|| Error::OutOfBounds(format!("element count {:?} overflows", count)))
    })
}

/// `[pos, pos + count)` must lie within `[0, len)`.
pub(crate) fn check_span(what: &str, len: u64, pos: u64, count: u64) -> Result<()> {
    match pos.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::OutOfBounds(format!(
            "{} range {}+{} outside length {}",
            what, pos, count, len
        ))),
    }
}

/// Rank and per-axis bounds of a sub-region.
pub(crate) fn check_region(what: &str, dims: &[u64], pos: &[u64], count: &[u64]) -> Result<()> {
    if dims.is_empty() {
        return Err(Error::UnsupportedShape(format!("{} has rank 0", what)));
    }
    if pos.len() != dims.len() {
        return Err(Error::dimensions(dims, pos));
    }
    if count.len() != dims.len() {
        return Err(Error::dimensions(dims, count));
    }
    for (axis, ((&d, &p), &c)) in dims.iter().zip(pos).zip(count).enumerate() {
        match p.checked_add(c) {
            Some(end) if end <= d => {}
            _ => {
                return Err(Error::OutOfBounds(format!(
                    "{} axis {}: {}+{} outside {}",
                    what, axis, p, c, d
                )))
            }
        }
    }
    Ok(())
}

fn check_backing(len: usize, dims: &[u64]) -> Result<()> {
    let expected = element_count(dims)?;
    if expected != len as u64 {
        return Err(Error::LengthMismatch {
            expected,
            found: len as u64,
        });
    }
    Ok(())
}

/// Contiguous runs covering `count` at `pos`, in column-major order.
///
/// Bounds must already be checked. An empty region yields no runs.
pub(crate) fn runs(dims: &[u64], pos: &[u64], count: &[u64]) -> Result<Vec<Range<usize>>> {
    if count.iter().any(|&c| c == 0) {
        return Ok(Vec::new());
    }
    let run = to_usize(count[0])?;
    let mut strides = Vec::with_capacity(dims.len());
    let mut stride = 1u64;
    for &d in dims {
        strides.push(stride);
        stride = stride.saturating_mul(d);
    }

    let mut out = Vec::new();
    let mut offset = vec![0u64; count.len()];
    loop {
        let start: u64 = strides
            .iter()
            .zip(pos)
            .zip(&offset)
            .map(|((s, p), o)| s * (p + o))
            .sum();
        let start = to_usize(start)?;
        out.push(start..start + run);

        // odometer over the non-contiguous axes
        let mut axis = 1;
        loop {
            if axis == count.len() {
                return Ok(out);
            }
            offset[axis] += 1;
            if offset[axis] < count[axis] {
                break;
            }
            offset[axis] = 0;
            axis += 1;
        }
    }
}

/// Copy a `count`-shaped block between two column-major buffers.
pub(crate) fn copy_region<T: Clone>(
    src: &[T],
    src_dims: &[u64],
    src_pos: &[u64],
    dst: &mut [T],
    dst_dims: &[u64],
    dst_pos: &[u64],
    count: &[u64],
) -> Result<()> {
    check_backing(src.len(), src_dims)?;
    check_backing(dst.len(), dst_dims)?;
    check_region("source", src_dims, src_pos, count)?;
    check_region("destination", dst_dims, dst_pos, count)?;

    let from = runs(src_dims, src_pos, count)?;
    let to = runs(dst_dims, dst_pos, count)?;
    for (s, d) in from.into_iter().zip(to) {
        dst[d].clone_from_slice(&src[s]);
    }
    Ok(())
}

/// Gather a block into a fresh buffer laid out with dims `count`.
pub(crate) fn extract_region<T: Clone>(
    src: &[T],
    src_dims: &[u64],
    src_pos: &[u64],
    count: &[u64],
) -> Result<Vec<T>> {
    check_backing(src.len(), src_dims)?;
    check_region("source", src_dims, src_pos, count)?;
    let mut out = Vec::with_capacity(to_usize(element_count(count)?)?);
    for run in runs(src_dims, src_pos, count)? {
        out.extend_from_slice(&src[run]);
    }
    Ok(out)
}

/// Narrow region axes to the wire dims type.
pub(crate) fn dims_u32(dims: &[u64]) -> Result<Vec<u32>> {
    dims.iter()
        .map(|&d| {
            u32::try_from(d)
                .map_err(|_| Error::UnsupportedShape(format!("axis of {} elements", d)))
        })
        .collect()
}
