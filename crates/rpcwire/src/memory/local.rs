// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process regions over an owned backing store.

use super::region;
use super::{ArrayMemory, MultiDimArrayMemory};
use crate::error::Result;
use crate::types::MultiDimArray;
use parking_lot::RwLock;

/// Flat region owning its elements.
#[derive(Debug, Default)]
pub struct LocalArrayMemory<T> {
    data: RwLock<Vec<T>>,
}

impl<T: Clone> LocalArrayMemory<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Vec<T> {
        self.data.read().clone()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.data.into_inner()
    }

    /// Read `count` elements at `pos` into a new buffer.
    pub fn read_vec(&self, pos: u64, count: u64) -> Result<Vec<T>> {
        let data = self.data.read();
        region::check_span("region", data.len() as u64, pos, count)?;
        let start = region::to_usize(pos)?;
        let end = start + region::to_usize(count)?;
        Ok(data[start..end].to_vec())
    }

    /// Overwrite `values.len()` elements starting at `pos`.
    pub fn write_slice(&self, pos: u64, values: &[T]) -> Result<()> {
        let mut data = self.data.write();
        region::check_span("region", data.len() as u64, pos, values.len() as u64)?;
        let start = region::to_usize(pos)?;
        data[start..start + values.len()].clone_from_slice(values);
        Ok(())
    }
}

impl<T: Clone + Send + Sync> ArrayMemory<T> for LocalArrayMemory<T> {
    fn length(&self) -> Result<u64> {
        Ok(self.data.read().len() as u64)
    }

    fn read(
        &self,
        memory_pos: u64,
        buffer: &mut [T],
        buffer_pos: usize,
        count: usize,
    ) -> Result<()> {
        region::check_span("buffer", buffer.len() as u64, buffer_pos as u64, count as u64)?;
        let data = self.data.read();
        region::check_span("region", data.len() as u64, memory_pos, count as u64)?;
        let start = region::to_usize(memory_pos)?;
        buffer[buffer_pos..buffer_pos + count].clone_from_slice(&data[start..start + count]);
        Ok(())
    }

    fn write(
        &self,
        memory_pos: u64,
        buffer: &[T],
        buffer_pos: usize,
        count: usize,
    ) -> Result<()> {
        region::check_span("buffer", buffer.len() as u64, buffer_pos as u64, count as u64)?;
        self.write_slice(memory_pos, &buffer[buffer_pos..buffer_pos + count])
    }
}

/// Multidimensional region owning its elements in column-major order.
#[derive(Debug)]
pub struct LocalMultiDimArrayMemory<T> {
    dims: Vec<u64>,
    data: RwLock<Vec<T>>,
}

impl<T: Clone> LocalMultiDimArrayMemory<T> {
    pub fn new(array: MultiDimArray<Vec<T>>) -> Self {
        let dims = array.dims_u64();
        let (_, data) = array.into_parts();
        Self {
            dims,
            data: RwLock::new(data),
        }
    }

    pub fn dims(&self) -> &[u64] {
        &self.dims
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Result<MultiDimArray<Vec<T>>> {
        MultiDimArray::new(region::dims_u32(&self.dims)?, self.data.read().clone())
    }

    /// Read the block `count` at `pos` into a new array shaped `count`.
    pub fn read_region(&self, pos: &[u64], count: &[u64]) -> Result<MultiDimArray<Vec<T>>> {
        let data = self.data.read();
        let values = region::extract_region(data.as_slice(), &self.dims, pos, count)?;
        MultiDimArray::new(region::dims_u32(count)?, values)
    }

    /// Overwrite the block at `pos` with the whole of `values`.
    pub fn write_region(&self, pos: &[u64], values: &MultiDimArray<Vec<T>>) -> Result<()> {
        let count = values.dims_u64();
        let origin = vec![0; count.len()];
        let mut data = self.data.write();
        region::copy_region(
            values.values(),
            &count,
            &origin,
            data.as_mut_slice(),
            &self.dims,
            pos,
            &count,
        )
    }
}

impl<T: Clone + Send + Sync> MultiDimArrayMemory<T> for LocalMultiDimArrayMemory<T> {
    fn dimensions(&self) -> Result<Vec<u64>> {
        Ok(self.dims.clone())
    }

    fn read(
        &self,
        memory_pos: &[u64],
        buffer: &mut MultiDimArray<Vec<T>>,
        buffer_pos: &[u64],
        count: &[u64],
    ) -> Result<()> {
        let buffer_dims = buffer.dims_u64();
        let data = self.data.read();
        region::copy_region(
            data.as_slice(),
            &self.dims,
            memory_pos,
            buffer.values_mut(),
            &buffer_dims,
            buffer_pos,
            count,
        )
    }

    fn write(
        &self,
        memory_pos: &[u64],
        buffer: &MultiDimArray<Vec<T>>,
        buffer_pos: &[u64],
        count: &[u64],
    ) -> Result<()> {
        let buffer_dims = buffer.dims_u64();
        let mut data = self.data.write();
        region::copy_region(
            buffer.values(),
            &buffer_dims,
            buffer_pos,
            data.as_mut_slice(),
            &self.dims,
            memory_pos,
            count,
        )
    }
}
