// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Chunk encoders: one region chunk <-> one wire element.
//!
//! Every codec goes through the [`Marshaller`], so chunks on the wire look
//! exactly like any other numeric, pod or named-array value.

use crate::error::{Error, Result};
use crate::marshal::Marshaller;
use crate::types::{
    ArrayLength, MultiDimArray, NamedArrayArray, NamedArrayValue, PodArray, PodValue, Shape,
    TypeDescriptor, Value,
};
use crate::wire::{Element, WireScalar};
use std::marker::PhantomData;

/// Identity of the element carrying a chunk.
pub const CHUNK_ELEMENT: &str = "value";

/// Encodes region chunks of one element type.
pub trait ChunkCodec: Send + Sync {
    type Item: Clone + Send + Sync;

    /// Byte width of one element, used to size chunks.
    fn element_size(&self) -> usize;

    fn pack_flat(&self, values: Vec<Self::Item>) -> Result<Element>;

    fn unpack_flat(&self, element: Element) -> Result<Vec<Self::Item>>;

    fn pack_multidim(&self, values: MultiDimArray<Vec<Self::Item>>) -> Result<Element>;

    fn unpack_multidim(&self, element: Element) -> Result<MultiDimArray<Vec<Self::Item>>>;
}

fn variable() -> Shape {
    Shape::Array(ArrayLength::Variable)
}

/// Numeric elements.
pub struct NumericChunkCodec<T> {
    marshaller: Marshaller,
    _element: PhantomData<fn() -> T>,
}

impl<T: WireScalar> NumericChunkCodec<T> {
    pub fn new(marshaller: Marshaller) -> Self {
        Self {
            marshaller,
            _element: PhantomData,
        }
    }
}

impl<T: WireScalar> Default for NumericChunkCodec<T> {
    fn default() -> Self {
        Self::new(Marshaller::new())
    }
}

impl<T: WireScalar> ChunkCodec for NumericChunkCodec<T> {
    type Item = T;

    fn element_size(&self) -> usize {
        T::KIND.size()
    }

    fn pack_flat(&self, values: Vec<T>) -> Result<Element> {
        let descriptor = TypeDescriptor::array(T::KIND);
        self.marshaller
            .pack(CHUNK_ELEMENT, &Value::Array(T::wrap_array(values)), &descriptor)
    }

    fn unpack_flat(&self, element: Element) -> Result<Vec<T>> {
        match self.marshaller.unpack(element, &TypeDescriptor::array(T::KIND))? {
            Value::Array(array) => T::unwrap_array(array),
            other => Err(Error::mismatch(T::KIND.name(), other.describe())),
        }
    }

    fn pack_multidim(&self, values: MultiDimArray<Vec<T>>) -> Result<Element> {
        let (dims, values) = values.into_parts();
        let value = Value::MultiDimArray(MultiDimArray::new(dims, T::wrap_array(values))?);
        let descriptor = TypeDescriptor::MultiDimArray(T::KIND, None);
        self.marshaller.pack(CHUNK_ELEMENT, &value, &descriptor)
    }

    fn unpack_multidim(&self, element: Element) -> Result<MultiDimArray<Vec<T>>> {
        let descriptor = TypeDescriptor::MultiDimArray(T::KIND, None);
        match self.marshaller.unpack(element, &descriptor)? {
            Value::MultiDimArray(m) => {
                let (dims, array) = m.into_parts();
                MultiDimArray::new(dims, T::unwrap_array(array)?)
            }
            other => Err(Error::mismatch(descriptor.to_string(), other.describe())),
        }
    }
}

/// Pod records of one registered type.
pub struct PodChunkCodec {
    marshaller: Marshaller,
    type_name: String,
    element_size: usize,
}

impl PodChunkCodec {
    /// Fails when no stub serves `type_name`.
    pub fn new(marshaller: Marshaller, type_name: impl Into<String>) -> Result<Self> {
        let type_name = type_name.into();
        let element_size = marshaller.pod_stub(&type_name)?.element_size();
        Ok(Self {
            marshaller,
            type_name,
            element_size,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl ChunkCodec for PodChunkCodec {
    type Item = PodValue;

    fn element_size(&self) -> usize {
        self.element_size
    }

    fn pack_flat(&self, values: Vec<PodValue>) -> Result<Element> {
        let value = Value::PodArray(PodArray::new(&self.type_name, values));
        let descriptor = TypeDescriptor::Pod(self.type_name.clone(), variable());
        self.marshaller.pack(CHUNK_ELEMENT, &value, &descriptor)
    }

    fn unpack_flat(&self, element: Element) -> Result<Vec<PodValue>> {
        let descriptor = TypeDescriptor::Pod(self.type_name.clone(), variable());
        match self.marshaller.unpack(element, &descriptor)? {
            Value::PodArray(array) => Ok(array.elements),
            other => Err(Error::mismatch(descriptor.to_string(), other.describe())),
        }
    }

    fn pack_multidim(&self, values: MultiDimArray<Vec<PodValue>>) -> Result<Element> {
        let (dims, values) = values.into_parts();
        let array = PodArray::new(&self.type_name, values);
        let value = Value::PodMultiDimArray(MultiDimArray::new(dims, array)?);
        let descriptor = TypeDescriptor::Pod(self.type_name.clone(), Shape::MultiDim(None));
        self.marshaller.pack(CHUNK_ELEMENT, &value, &descriptor)
    }

    fn unpack_multidim(&self, element: Element) -> Result<MultiDimArray<Vec<PodValue>>> {
        let descriptor = TypeDescriptor::Pod(self.type_name.clone(), Shape::MultiDim(None));
        match self.marshaller.unpack(element, &descriptor)? {
            Value::PodMultiDimArray(m) => {
                let (dims, array) = m.into_parts();
                MultiDimArray::new(dims, array.elements)
            }
            other => Err(Error::mismatch(descriptor.to_string(), other.describe())),
        }
    }
}

/// Named-array records of one registered type.
pub struct NamedArrayChunkCodec {
    marshaller: Marshaller,
    type_name: String,
    element_size: usize,
}

impl NamedArrayChunkCodec {
    /// Fails when no stub serves `type_name`.
    pub fn new(marshaller: Marshaller, type_name: impl Into<String>) -> Result<Self> {
        let type_name = type_name.into();
        let element_size = marshaller.named_array_stub(&type_name)?.element_size();
        Ok(Self {
            marshaller,
            type_name,
            element_size,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl ChunkCodec for NamedArrayChunkCodec {
    type Item = NamedArrayValue;

    fn element_size(&self) -> usize {
        self.element_size
    }

    fn pack_flat(&self, values: Vec<NamedArrayValue>) -> Result<Element> {
        let value = Value::NamedArrayArray(NamedArrayArray::new(&self.type_name, values));
        let descriptor = TypeDescriptor::NamedArray(self.type_name.clone(), variable());
        self.marshaller.pack(CHUNK_ELEMENT, &value, &descriptor)
    }

    fn unpack_flat(&self, element: Element) -> Result<Vec<NamedArrayValue>> {
        let descriptor = TypeDescriptor::NamedArray(self.type_name.clone(), variable());
        match self.marshaller.unpack(element, &descriptor)? {
            Value::NamedArrayArray(array) => Ok(array.elements),
            other => Err(Error::mismatch(descriptor.to_string(), other.describe())),
        }
    }

    fn pack_multidim(&self, values: MultiDimArray<Vec<NamedArrayValue>>) -> Result<Element> {
        let (dims, values) = values.into_parts();
        let array = NamedArrayArray::new(&self.type_name, values);
        let value = Value::NamedArrayMultiDimArray(MultiDimArray::new(dims, array)?);
        let descriptor = TypeDescriptor::NamedArray(self.type_name.clone(), Shape::MultiDim(None));
        self.marshaller.pack(CHUNK_ELEMENT, &value, &descriptor)
    }

    fn unpack_multidim(&self, element: Element) -> Result<MultiDimArray<Vec<NamedArrayValue>>> {
        let descriptor = TypeDescriptor::NamedArray(self.type_name.clone(), Shape::MultiDim(None));
        match self.marshaller.unpack(element, &descriptor)? {
            Value::NamedArrayMultiDimArray(m) => {
                let (dims, array) = m.into_parts();
                MultiDimArray::new(dims, array.elements)
            }
            other => Err(Error::mismatch(descriptor.to_string(), other.describe())),
        }
    }
}
