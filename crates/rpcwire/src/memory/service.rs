// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serving side of the chunk protocol.
//!
//! A service answers [`ChunkRequest`]s against a local region. Since it
//! implements [`MemoryTransport`] itself, a remote proxy can be pointed
//! straight at it for in-process loopback.

use super::codec::ChunkCodec;
use super::local::{LocalArrayMemory, LocalMultiDimArrayMemory};
use super::remote::{ChunkRequest, MemoryTransport};
use super::ArrayMemory;
use crate::error::{Error, Result};
use crate::wire::Element;
use std::sync::Arc;

/// Serves a flat local region.
pub struct ArrayMemoryService<C: ChunkCodec> {
    memory: Arc<LocalArrayMemory<C::Item>>,
    codec: C,
}

impl<C: ChunkCodec> ArrayMemoryService<C> {
    pub fn new(memory: Arc<LocalArrayMemory<C::Item>>, codec: C) -> Self {
        Self { memory, codec }
    }

    pub fn memory(&self) -> &Arc<LocalArrayMemory<C::Item>> {
        &self.memory
    }
}

impl<C: ChunkCodec> MemoryTransport for ArrayMemoryService<C> {
    fn dimensions(&self) -> Result<Vec<u64>> {
        Ok(vec![self.memory.length()?])
    }

    fn read(&self, request: &ChunkRequest) -> Result<Element> {
        let (pos, count) = request.as_flat()?;
        log::trace!("[memory] serve read pos={} count={}", pos, count);
        self.codec.pack_flat(self.memory.read_vec(pos, count)?)
    }

    fn write(&self, request: &ChunkRequest, data: Element) -> Result<()> {
        let (pos, count) = request.as_flat()?;
        log::trace!("[memory] serve write pos={} count={}", pos, count);
        let values = self.codec.unpack_flat(data)?;
        if values.len() as u64 != count {
            return Err(Error::LengthMismatch {
                expected: count,
                found: values.len() as u64,
            });
        }
        self.memory.write_slice(pos, &values)
    }
}

/// Serves a multidimensional local region.
pub struct MultiDimArrayMemoryService<C: ChunkCodec> {
    memory: Arc<LocalMultiDimArrayMemory<C::Item>>,
    codec: C,
}

impl<C: ChunkCodec> MultiDimArrayMemoryService<C> {
    pub fn new(memory: Arc<LocalMultiDimArrayMemory<C::Item>>, codec: C) -> Self {
        Self { memory, codec }
    }

    pub fn memory(&self) -> &Arc<LocalMultiDimArrayMemory<C::Item>> {
        &self.memory
    }
}

impl<C: ChunkCodec> MemoryTransport for MultiDimArrayMemoryService<C> {
    fn dimensions(&self) -> Result<Vec<u64>> {
        Ok(self.memory.dims().to_vec())
    }

    fn read(&self, request: &ChunkRequest) -> Result<Element> {
        log::trace!(
            "[memory] serve read pos={:?} count={:?}",
            request.pos,
            request.count
        );
        let block = self.memory.read_region(&request.pos, &request.count)?;
        self.codec.pack_multidim(block)
    }

    fn write(&self, request: &ChunkRequest, data: Element) -> Result<()> {
        log::trace!(
            "[memory] serve write pos={:?} count={:?}",
            request.pos,
            request.count
        );
        let block = self.codec.unpack_multidim(data)?;
        let dims = block.dims_u64();
        if dims != request.count {
            return Err(Error::dimensions(&request.count, &dims));
        }
        self.memory.write_region(&request.pos, &block)
    }
}
