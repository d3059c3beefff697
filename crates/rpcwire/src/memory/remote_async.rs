// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Asynchronous proxy regions.
//!
//! Same bounds checks, chunk plan and ordering as the blocking proxies. The
//! task suspends only while a chunk is in flight. A [`CancelToken`] is
//! checked before each chunk is issued: once cancelled, no further chunk goes
//! out and the call returns [`Error::Cancelled`] with the number of elements
//! already moved. Those elements are not rolled back.

use super::chunk::{self, FlatChunks};
use super::codec::ChunkCodec;
use super::region;
use super::remote::{
    apply_flat, apply_multidim, check_flat, flat_length, plan_against_buffer, take_multidim,
    ChunkRequest, MemoryTransport,
};
use crate::config::TransferConfig;
use crate::error::{Error, Result};
use crate::types::MultiDimArray;
use crate::wire::Element;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Async counterpart of [`MemoryTransport`].
#[async_trait]
pub trait AsyncMemoryTransport: Send + Sync {
    async fn dimensions(&self) -> Result<Vec<u64>>;

    async fn read(&self, request: ChunkRequest) -> Result<Element>;

    async fn write(&self, request: ChunkRequest, data: Element) -> Result<()>;
}

#[async_trait]
impl<X: AsyncMemoryTransport + ?Sized> AsyncMemoryTransport for Arc<X> {
    async fn dimensions(&self) -> Result<Vec<u64>> {
        (**self).dimensions().await
    }

    async fn read(&self, request: ChunkRequest) -> Result<Element> {
        (**self).read(request).await
    }

    async fn write(&self, request: ChunkRequest, data: Element) -> Result<()> {
        (**self).write(request, data).await
    }
}

/// Runs a blocking transport inline on the polling task.
#[derive(Debug, Clone)]
pub struct BlockingTransport<X> {
    inner: X,
}

impl<X: MemoryTransport> BlockingTransport<X> {
    pub fn new(inner: X) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &X {
        &self.inner
    }
}

#[async_trait]
impl<X: MemoryTransport> AsyncMemoryTransport for BlockingTransport<X> {
    async fn dimensions(&self) -> Result<Vec<u64>> {
        self.inner.dimensions()
    }

    async fn read(&self, request: ChunkRequest) -> Result<Element> {
        self.inner.read(&request)
    }

    async fn write(&self, request: ChunkRequest, data: Element) -> Result<()> {
        self.inner.write(&request, data)
    }
}

/// Shared cancellation flag for in-flight chunked operations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop issuing chunks on every operation holding this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn check(&self, completed: u64) -> Result<()> {
        if self.is_cancelled() {
            log::debug!("[memory] cancelled after {} elements", completed);
            return Err(Error::Cancelled { completed });
        }
        Ok(())
    }
}

/// Flat region behind an [`AsyncMemoryTransport`].
pub struct AsyncRemoteArrayMemory<X, C> {
    transport: X,
    codec: C,
    config: Arc<TransferConfig>,
}

impl<X: AsyncMemoryTransport, C: ChunkCodec> AsyncRemoteArrayMemory<X, C> {
    pub fn new(transport: X, codec: C) -> Self {
        Self {
            transport,
            codec,
            config: TransferConfig::global(),
        }
    }

    pub fn with_config(mut self, config: Arc<TransferConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    pub async fn length(&self) -> Result<u64> {
        flat_length(&self.transport.dimensions().await?)
    }

    pub async fn read(
        &self,
        memory_pos: u64,
        buffer: &mut [C::Item],
        buffer_pos: usize,
        count: usize,
        cancel: &CancelToken,
    ) -> Result<()> {
        let dims = self.transport.dimensions().await?;
        check_flat(&dims, memory_pos, buffer.len(), buffer_pos, count)?;
        let max = self.max_chunk()?;
        let mut completed = 0;
        for chunk in FlatChunks::new(memory_pos, count as u64, max) {
            cancel.check(completed)?;
            log::trace!("[memory] async read chunk pos={} count={}", chunk.pos, chunk.count);
            let request = ChunkRequest::flat(chunk.pos, chunk.count);
            let element = self.transport.read(request).await?;
            let values = self.codec.unpack_flat(element)?;
            let start = buffer_pos + region::to_usize(chunk.offset)?;
            apply_flat(buffer, start, values, chunk.count)?;
            completed += chunk.count;
        }
        Ok(())
    }

    pub async fn write(
        &self,
        memory_pos: u64,
        buffer: &[C::Item],
        buffer_pos: usize,
        count: usize,
        cancel: &CancelToken,
    ) -> Result<()> {
        let dims = self.transport.dimensions().await?;
        check_flat(&dims, memory_pos, buffer.len(), buffer_pos, count)?;
        let max = self.max_chunk()?;
        let mut completed = 0;
        for chunk in FlatChunks::new(memory_pos, count as u64, max) {
            cancel.check(completed)?;
            log::trace!("[memory] async write chunk pos={} count={}", chunk.pos, chunk.count);
            let start = buffer_pos + region::to_usize(chunk.offset)?;
            let end = start + region::to_usize(chunk.count)?;
            let element = self.codec.pack_flat(buffer[start..end].to_vec())?;
            let request = ChunkRequest::flat(chunk.pos, chunk.count);
            self.transport.write(request, element).await?;
            completed += chunk.count;
        }
        Ok(())
    }

    fn max_chunk(&self) -> Result<u64> {
        chunk::max_chunk_elements(self.config.max_transfer_bytes(), self.codec.element_size())
    }
}

/// Multidimensional region behind an [`AsyncMemoryTransport`].
pub struct AsyncRemoteMultiDimArrayMemory<X, C> {
    transport: X,
    codec: C,
    config: Arc<TransferConfig>,
}

impl<X: AsyncMemoryTransport, C: ChunkCodec> AsyncRemoteMultiDimArrayMemory<X, C> {
    pub fn new(transport: X, codec: C) -> Self {
        Self {
            transport,
            codec,
            config: TransferConfig::global(),
        }
    }

    /// Attach to a remote region that must have exactly `expected` dims.
    pub async fn attach(transport: X, codec: C, expected: &[u64]) -> Result<Self> {
        let dims = transport.dimensions().await?;
        if dims != expected {
            return Err(Error::dimensions(expected, &dims));
        }
        Ok(Self::new(transport, codec))
    }

    pub fn with_config(mut self, config: Arc<TransferConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    pub async fn dimensions(&self) -> Result<Vec<u64>> {
        self.transport.dimensions().await
    }

    pub async fn read(
        &self,
        memory_pos: &[u64],
        buffer: &mut MultiDimArray<Vec<C::Item>>,
        buffer_pos: &[u64],
        count: &[u64],
        cancel: &CancelToken,
    ) -> Result<()> {
        let max = self.max_chunk()?;
        let dims = self.transport.dimensions().await?;
        let mut completed = 0;
        for chunk in plan_against_buffer(&dims, buffer, memory_pos, buffer_pos, count, max)? {
            cancel.check(completed)?;
            log::trace!(
                "[memory] async read chunk pos={:?} count={:?}",
                chunk.pos,
                chunk.count
            );
            let element = self.transport.read(ChunkRequest::from(&chunk)).await?;
            let data = self.codec.unpack_multidim(element)?;
            apply_multidim(buffer, buffer_pos, &chunk, &data)?;
            completed += data.len() as u64;
        }
        Ok(())
    }

    pub async fn write(
        &self,
        memory_pos: &[u64],
        buffer: &MultiDimArray<Vec<C::Item>>,
        buffer_pos: &[u64],
        count: &[u64],
        cancel: &CancelToken,
    ) -> Result<()> {
        let max = self.max_chunk()?;
        let dims = self.transport.dimensions().await?;
        let mut completed = 0;
        for chunk in plan_against_buffer(&dims, buffer, memory_pos, buffer_pos, count, max)? {
            cancel.check(completed)?;
            log::trace!(
                "[memory] async write chunk pos={:?} count={:?}",
                chunk.pos,
                chunk.count
            );
            let data = take_multidim(buffer, buffer_pos, &chunk)?;
            let moved = data.len() as u64;
            let element = self.codec.pack_multidim(data)?;
            self.transport.write(ChunkRequest::from(&chunk), element).await?;
            completed += moved;
        }
        Ok(())
    }

    fn max_chunk(&self) -> Result<u64> {
        chunk::max_chunk_elements(self.config.max_transfer_bytes(), self.codec.element_size())
    }
}
