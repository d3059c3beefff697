// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Random-access memory regions.
//!
//! A region holds elements of one fixed type: numeric scalars, pod records or
//! named-array records. It is either flat ([`ArrayMemory`]) or
//! multidimensional ([`MultiDimArrayMemory`], column-major, first axis
//! contiguous).
//!
//! ```text
//!  caller                      proxy                         owner
//!  ------                      -----                         -----
//!  read(pos, buf, count) --> RemoteArrayMemory             ArrayMemoryService
//!                              | plan chunks                  |
//!                              | ChunkRequest(pos, n) ------> | read_vec
//!                              | <------------ Element ------ | pack_flat
//!                              | unpack_flat, copy into buf   |
//!                              | ... next chunk ...           |
//! ```
//!
//! Local regions copy straight out of their backing store. Remote proxies
//! split every call into chunks no larger than the transport limit (see
//! [`chunk`]) and encode each chunk through the
//! [`Marshaller`](crate::marshal::Marshaller).
//!
//! Bounds violations are errors, never clamped.

pub mod chunk;
mod codec;
mod local;
mod region;
mod remote;
mod remote_async;
mod service;


pub use codec::{
    ChunkCodec, NamedArrayChunkCodec, NumericChunkCodec, PodChunkCodec, CHUNK_ELEMENT,
};
pub use local::{LocalArrayMemory, LocalMultiDimArrayMemory};
pub use remote::{ChunkRequest, MemoryTransport, RemoteArrayMemory, RemoteMultiDimArrayMemory};
pub use remote_async::{
    AsyncMemoryTransport, AsyncRemoteArrayMemory, AsyncRemoteMultiDimArrayMemory,
    BlockingTransport, CancelToken,
};
pub use service::{ArrayMemoryService, MultiDimArrayMemoryService};

use crate::error::Result;
use crate::types::MultiDimArray;

/// Flat region of `T`.
pub trait ArrayMemory<T>: Send + Sync {
    fn length(&self) -> Result<u64>;

    /// Copy `count` elements at `memory_pos` into `buffer[buffer_pos..]`.
    fn read(&self, memory_pos: u64, buffer: &mut [T], buffer_pos: usize, count: usize)
        -> Result<()>;

    /// Copy `buffer[buffer_pos..buffer_pos + count]` to `memory_pos`.
    fn write(&self, memory_pos: u64, buffer: &[T], buffer_pos: usize, count: usize) -> Result<()>;
}

/// Multidimensional region of `T`.
///
/// Positions and counts carry one entry per axis; their rank must equal the
/// region's.
pub trait MultiDimArrayMemory<T>: Send + Sync {
    fn dimensions(&self) -> Result<Vec<u64>>;

    /// Copy the block `count` at `memory_pos` into `buffer` at `buffer_pos`.
    fn read(
        &self,
        memory_pos: &[u64],
        buffer: &mut MultiDimArray<Vec<T>>,
        buffer_pos: &[u64],
        count: &[u64],
    ) -> Result<()>;

    /// Copy the block `count` at `buffer_pos` of `buffer` to `memory_pos`.
    fn write(
        &self,
        memory_pos: &[u64],
        buffer: &MultiDimArray<Vec<T>>,
        buffer_pos: &[u64],
        count: &[u64],
    ) -> Result<()>;
}
