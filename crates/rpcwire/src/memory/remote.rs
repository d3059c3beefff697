// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Proxy regions backed by a remote transport.
//!
//! Each logical read or write is split by the chunk planner and issued as a
//! sequence of [`ChunkRequest`]s, in increasing position order. The request
//! is checked against the remote region's dimensions before the first chunk,
//! so an out-of-range call moves nothing. The first failing chunk aborts the
//! operation and its error is returned as is. Chunks already applied stay
//! applied. Nothing is retried.

use super::chunk::{self, FlatChunks, MultiDimChunk};
use super::codec::ChunkCodec;
use super::region;
use super::{ArrayMemory, MultiDimArrayMemory};
use crate::config::TransferConfig;
use crate::error::{Error, Result};
use crate::types::MultiDimArray;
use crate::wire::Element;
use std::sync::Arc;

/// Position and count of one sub-request, one entry per axis.
///
/// Flat regions use one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRequest {
    pub pos: Vec<u64>,
    pub count: Vec<u64>,
}

impl ChunkRequest {
    pub fn flat(pos: u64, count: u64) -> Self {
        Self {
            pos: vec![pos],
            count: vec![count],
        }
    }

    pub fn rank(&self) -> usize {
        self.count.len()
    }

    pub fn element_count(&self) -> Result<u64> {
        region::element_count(&self.count)
    }

    /// `(pos, count)` of a flat request.
    pub fn as_flat(&self) -> Result<(u64, u64)> {
        match (self.pos.as_slice(), self.count.as_slice()) {
            ([pos], [count]) => Ok((*pos, *count)),
            _ => Err(Error::dimensions(&[1u64], &[self.rank() as u64])),
        }
    }
}

impl From<&MultiDimChunk> for ChunkRequest {
    fn from(chunk: &MultiDimChunk) -> Self {
        Self {
            pos: chunk.pos.clone(),
            count: chunk.count.clone(),
        }
    }
}

/// Collaborator that moves encoded chunks to and from the region owner.
pub trait MemoryTransport: Send + Sync {
    /// Dimensions of the remote region; flat regions report `[length]`.
    fn dimensions(&self) -> Result<Vec<u64>>;

    fn read(&self, request: &ChunkRequest) -> Result<Element>;

    fn write(&self, request: &ChunkRequest, data: Element) -> Result<()>;
}

impl<X: MemoryTransport + ?Sized> MemoryTransport for Arc<X> {
    fn dimensions(&self) -> Result<Vec<u64>> {
        (**self).dimensions()
    }

    fn read(&self, request: &ChunkRequest) -> Result<Element> {
        (**self).read(request)
    }

    fn write(&self, request: &ChunkRequest, data: Element) -> Result<()> {
        (**self).write(request, data)
    }
}

pub(super) fn flat_length(dims: &[u64]) -> Result<u64> {
    match dims {
        [len] => Ok(*len),
        other => Err(Error::dimensions(&[1u64], &[other.len() as u64])),
    }
}

/// Store a decoded flat chunk at `buffer[start..]`.
pub(super) fn apply_flat<T>(
    buffer: &mut [T],
    start: usize,
    values: Vec<T>,
    expected: u64,
) -> Result<()> {
    if values.len() as u64 != expected {
        return Err(Error::LengthMismatch {
            expected,
            found: values.len() as u64,
        });
    }
    for (slot, value) in buffer[start..start + values.len()].iter_mut().zip(values) {
        *slot = value;
    }
    Ok(())
}

/// Store a decoded multidim chunk into the caller's buffer.
pub(super) fn apply_multidim<T: Clone>(
    buffer: &mut MultiDimArray<Vec<T>>,
    buffer_pos: &[u64],
    chunk: &MultiDimChunk,
    data: &MultiDimArray<Vec<T>>,
) -> Result<()> {
    let data_dims = data.dims_u64();
    if data_dims != chunk.count {
        return Err(Error::dimensions(&chunk.count, &data_dims));
    }
    let buffer_dims = buffer.dims_u64();
    let dst_pos: Vec<u64> = buffer_pos.iter().zip(&chunk.offset).map(|(b, o)| b + o).collect();
    region::copy_region(
        data.values(),
        &data_dims,
        &vec![0; data_dims.len()],
        buffer.values_mut(),
        &buffer_dims,
        &dst_pos,
        &chunk.count,
    )
}

/// Copy the caller's sub-block for `chunk` into a fresh chunk buffer.
pub(super) fn take_multidim<T: Clone>(
    buffer: &MultiDimArray<Vec<T>>,
    buffer_pos: &[u64],
    chunk: &MultiDimChunk,
) -> Result<MultiDimArray<Vec<T>>> {
    let src_pos: Vec<u64> = buffer_pos.iter().zip(&chunk.offset).map(|(b, o)| b + o).collect();
    let dims = buffer.dims_u64();
    let values = region::extract_region(buffer.values(), &dims, &src_pos, &chunk.count)?;
    MultiDimArray::new(region::dims_u32(&chunk.count)?, values)
}

/// Validate a flat request against both sides.
pub(super) fn check_flat(
    region_dims: &[u64],
    memory_pos: u64,
    buffer_len: usize,
    buffer_pos: usize,
    count: usize,
) -> Result<()> {
    region::check_span("buffer", buffer_len as u64, buffer_pos as u64, count as u64)?;
    let len = flat_length(region_dims)?;
    region::check_span("region", len, memory_pos, count as u64)
}

/// Validate a multidim request against the region and the caller's buffer,
/// then plan it.
pub(super) fn plan_against_buffer<T>(
    region_dims: &[u64],
    buffer: &MultiDimArray<Vec<T>>,
    memory_pos: &[u64],
    buffer_pos: &[u64],
    count: &[u64],
    max: u64,
) -> Result<Vec<MultiDimChunk>> {
    region::check_region("buffer", &buffer.dims_u64(), buffer_pos, count)?;
    region::check_region("region", region_dims, memory_pos, count)?;
    chunk::plan_multidim(memory_pos, count, max)
}

/// Flat region on the far side of a [`MemoryTransport`].
pub struct RemoteArrayMemory<X, C> {
    transport: X,
    codec: C,
    config: Arc<TransferConfig>,
}

impl<X: MemoryTransport, C> RemoteArrayMemory<X, C> {
    /// Proxy using the process-wide transfer limit.
    pub fn new(transport: X, codec: C) -> Self {
        Self {
            transport,
            codec,
            config: TransferConfig::global(),
        }
    }

    /// Bind to a private transfer configuration.
    pub fn with_config(mut self, config: Arc<TransferConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    fn max_chunk(&self) -> Result<u64>
    where
        C: ChunkCodec,
    {
        chunk::max_chunk_elements(self.config.max_transfer_bytes(), self.codec.element_size())
    }
}

impl<X: MemoryTransport, C: ChunkCodec> ArrayMemory<C::Item> for RemoteArrayMemory<X, C> {
    fn length(&self) -> Result<u64> {
        flat_length(&self.transport.dimensions()?)
    }

    fn read(
        &self,
        memory_pos: u64,
        buffer: &mut [C::Item],
        buffer_pos: usize,
        count: usize,
    ) -> Result<()> {
        let dims = self.transport.dimensions()?;
        check_flat(&dims, memory_pos, buffer.len(), buffer_pos, count)?;
        let max = self.max_chunk()?;
        for chunk in FlatChunks::new(memory_pos, count as u64, max) {
            log::trace!("[memory] read chunk pos={} count={}", chunk.pos, chunk.count);
            let element = self.transport.read(&ChunkRequest::flat(chunk.pos, chunk.count))?;
            let values = self.codec.unpack_flat(element)?;
            let start = buffer_pos + region::to_usize(chunk.offset)?;
            apply_flat(buffer, start, values, chunk.count)?;
        }
        Ok(())
    }

    fn write(
        &self,
        memory_pos: u64,
        buffer: &[C::Item],
        buffer_pos: usize,
        count: usize,
    ) -> Result<()> {
        let dims = self.transport.dimensions()?;
        check_flat(&dims, memory_pos, buffer.len(), buffer_pos, count)?;
        let max = self.max_chunk()?;
        for chunk in FlatChunks::new(memory_pos, count as u64, max) {
            log::trace!("[memory] write chunk pos={} count={}", chunk.pos, chunk.count);
            let start = buffer_pos + region::to_usize(chunk.offset)?;
            let end = start + region::to_usize(chunk.count)?;
            let element = self.codec.pack_flat(buffer[start..end].to_vec())?;
            self.transport
                .write(&ChunkRequest::flat(chunk.pos, chunk.count), element)?;
        }
        Ok(())
    }
}

/// Multidimensional region on the far side of a [`MemoryTransport`].
pub struct RemoteMultiDimArrayMemory<X, C> {
    transport: X,
    codec: C,
    config: Arc<TransferConfig>,
}

impl<X: MemoryTransport, C> RemoteMultiDimArrayMemory<X, C> {
    /// Proxy using the process-wide transfer limit.
    pub fn new(transport: X, codec: C) -> Self {
        Self {
            transport,
            codec,
            config: TransferConfig::global(),
        }
    }

    /// Attach to a remote region that must have exactly `expected` dims.
    pub fn attach(transport: X, codec: C, expected: &[u64]) -> Result<Self> {
        let dims = transport.dimensions()?;
        if dims != expected {
            return Err(Error::dimensions(expected, &dims));
        }
        Ok(Self::new(transport, codec))
    }

    /// Bind to a private transfer configuration.
    pub fn with_config(mut self, config: Arc<TransferConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    fn max_chunk(&self) -> Result<u64>
    where
        C: ChunkCodec,
    {
        chunk::max_chunk_elements(self.config.max_transfer_bytes(), self.codec.element_size())
    }
}

impl<X, C> MultiDimArrayMemory<C::Item> for RemoteMultiDimArrayMemory<X, C>
where
    X: MemoryTransport,
    C: ChunkCodec,
{
    fn dimensions(&self) -> Result<Vec<u64>> {
        self.transport.dimensions()
    }

    fn read(
        &self,
        memory_pos: &[u64],
        buffer: &mut MultiDimArray<Vec<C::Item>>,
        buffer_pos: &[u64],
        count: &[u64],
    ) -> Result<()> {
        let max = self.max_chunk()?;
        let dims = self.transport.dimensions()?;
        for chunk in plan_against_buffer(&dims, buffer, memory_pos, buffer_pos, count, max)? {
            log::trace!("[memory] read chunk pos={:?} count={:?}", chunk.pos, chunk.count);
            let element = self.transport.read(&ChunkRequest::from(&chunk))?;
            let data = self.codec.unpack_multidim(element)?;
            apply_multidim(buffer, buffer_pos, &chunk, &data)?;
        }
        Ok(())
    }

    fn write(
        &self,
        memory_pos: &[u64],
        buffer: &MultiDimArray<Vec<C::Item>>,
        buffer_pos: &[u64],
        count: &[u64],
    ) -> Result<()> {
        let max = self.max_chunk()?;
        let dims = self.transport.dimensions()?;
        for chunk in plan_against_buffer(&dims, buffer, memory_pos, buffer_pos, count, max)? {
            log::trace!("[memory] write chunk pos={:?} count={:?}", chunk.pos, chunk.count);
            let data = take_multidim(buffer, buffer_pos, &chunk)?;
            let element = self.codec.pack_multidim(data)?;
            self.transport.write(&ChunkRequest::from(&chunk), element)?;
        }
        Ok(())
    }
}
