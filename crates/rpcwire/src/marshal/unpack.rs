// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode direction.
//!
//! Every entry point takes the element by value; whatever happens, the tree is
//! dropped before returning.

use super::Marshaller;
use crate::error::{Error, Result};
use crate::types::{
    EnumValue, FromValue, MapKey, MultiDimArray, NamedArrayArray, PodArray, Shape,
    TypeDescriptor, Value,
};
use crate::wire::shape;
use crate::wire::{ContainerKind, Element, Identity, ScalarKind, ScalarValue, WireScalar};
use std::collections::BTreeMap;

impl Marshaller {
    /// Decode `element` as described by `descriptor`.
    pub fn unpack(&self, element: Element, descriptor: &TypeDescriptor) -> Result<Value> {
        if element.is_void() {
            return if descriptor.is_nullable() {
                Ok(Value::Null)
            } else {
                Err(Error::NullNotAllowed(descriptor.to_string()))
            };
        }

        match descriptor {
            TypeDescriptor::Any => self.unpack_var(element),
            TypeDescriptor::Scalar(kind) => {
                let array = element.into_numeric_of(*kind)?;
                Ok(Value::Scalar(ScalarValue::from_array(&array)?))
            }
            TypeDescriptor::Array(kind, len) => {
                let array = element.into_numeric_of(*kind)?;
                len.check(array.len())?;
                Ok(Value::Array(array))
            }
            TypeDescriptor::MultiDimArray(kind, expected) => {
                let list = element.into_nested(ContainerKind::MultiDimArray)?;
                let (dims, array) = shape::split_multidim(list)?;
                shape::check_fixed_dims(expected.as_deref(), &dims)?;
                let array = array.into_numeric_of(*kind)?;
                Ok(Value::MultiDimArray(MultiDimArray::new(dims, array)?))
            }
            TypeDescriptor::String => Ok(Value::String(element.into_string()?)),
            TypeDescriptor::Enum(name) => {
                let array = element.into_numeric_of(ScalarKind::Int32)?;
                match ScalarValue::from_array(&array)? {
                    ScalarValue::Int32(v) => Ok(Value::Enum(EnumValue::new(name, v))),
                    other => Err(Error::mismatch("int32", other.kind().name())),
                }
            }
            TypeDescriptor::Map { key, value } => self.unpack_map(element, key, value),
            TypeDescriptor::List(item) => {
                let elements = element.into_nested(ContainerKind::List)?.into_elements();
                shape::check_positions(&elements)?;
                let items = elements
                    .into_iter()
                    .map(|e| self.unpack(e, item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(items))
            }
            TypeDescriptor::Structure(name) => {
                let list = element.into_nested(ContainerKind::Structure)?;
                list.expect_type_name(name)?;
                let stub = self.structure_stub(name)?;
                Ok(Value::Structure(stub.unpack_structure(list, self)?))
            }
            TypeDescriptor::Pod(name, shape) => self.unpack_pod(element, name, shape),
            TypeDescriptor::NamedArray(name, shape) => {
                self.unpack_named_array(element, name, shape)
            }
        }
    }

    /// Decode into any Rust type convertible from [`Value`].
    pub fn unpack_value<T: FromValue>(
        &self,
        element: Element,
        descriptor: &TypeDescriptor,
    ) -> Result<T> {
        T::from_value(&self.unpack(element, descriptor)?)
    }

    /// Decode a single numeric value.
    pub fn unpack_scalar<T: WireScalar>(&self, element: Element) -> Result<T> {
        if element.is_void() {
            return Err(Error::NullNotAllowed(T::KIND.name().to_string()));
        }
        let array = element.into_numeric_of(T::KIND)?;
        T::unwrap_scalar(ScalarValue::from_array(&array)?)
    }

    /// Decode a numeric array.
    pub fn unpack_array<T: WireScalar>(&self, element: Element) -> Result<Vec<T>> {
        T::unwrap_array(element.into_numeric_of(T::KIND)?)
    }

    pub fn unpack_string(&self, element: Element) -> Result<String> {
        element.into_string()
    }

    fn unpack_map(
        &self,
        element: Element,
        key: &TypeDescriptor,
        value: &TypeDescriptor,
    ) -> Result<Value> {
        match TypeDescriptor::map_key(key)? {
            MapKey::Int32 => {
                let list = element.into_nested(ContainerKind::Vector)?;
                let mut map = BTreeMap::new();
                for child in list.into_elements() {
                    let k = match child.identity() {
                        Identity::Index(index) => *index,
                        Identity::Name(name) => name
                            .parse::<i32>()
                            .map_err(|_| Error::mismatch("int32 key", name.as_str()))?,
                    };
                    if map.contains_key(&k) {
                        return Err(Error::DuplicateKey(k.to_string()));
                    }
                    map.insert(k, self.unpack(child, value)?);
                }
                Ok(Value::Vector(map))
            }
            MapKey::String => {
                let list = element.into_nested(ContainerKind::Dictionary)?;
                let mut map = BTreeMap::new();
                for child in list.into_elements() {
                    let k = match child.identity() {
                        Identity::Name(name) => name.clone(),
                        other => return Err(Error::mismatch("string key", other.to_string())),
                    };
                    if map.contains_key(&k) {
                        return Err(Error::DuplicateKey(k));
                    }
                    let v = self.unpack(child, value)?;
                    map.insert(k, v);
                }
                Ok(Value::Dictionary(map))
            }
        }
    }

    fn unpack_pod(&self, element: Element, name: &str, shape: &Shape) -> Result<Value> {
        let stub = self.pod_stub(name)?;
        match shape {
            Shape::Scalar => {
                let list = element.into_nested(ContainerKind::PodArray)?;
                Ok(Value::Pod(stub.unpack_pod_scalar(list, self)?))
            }
            Shape::Array(len) => {
                let list = element.into_nested(ContainerKind::PodArray)?;
                let elements = stub.unpack_pod_array(list, self)?;
                len.check(elements.len())?;
                Ok(Value::PodArray(PodArray::new(name, elements)))
            }
            Shape::MultiDim(dims) => {
                let list = element.into_nested(ContainerKind::PodMultiDimArray)?;
                let m = stub.unpack_pod_multidim(list, self)?;
                shape::check_fixed_dims(dims.as_deref(), m.dims())?;
                Ok(Value::PodMultiDimArray(m))
            }
        }
    }

    fn unpack_named_array(&self, element: Element, name: &str, shape: &Shape) -> Result<Value> {
        let stub = self.named_array_stub(name)?;
        match shape {
            Shape::Scalar => {
                let list = element.into_nested(ContainerKind::NamedArrayArray)?;
                Ok(Value::NamedArray(stub.unpack_named_array_scalar(list)?))
            }
            Shape::Array(len) => {
                let list = element.into_nested(ContainerKind::NamedArrayArray)?;
                let elements = stub.unpack_named_array(list)?;
                len.check(elements.len())?;
                Ok(Value::NamedArrayArray(NamedArrayArray::new(name, elements)))
            }
            Shape::MultiDim(dims) => {
                let list = element.into_nested(ContainerKind::NamedArrayMultiDimArray)?;
                let m = stub.unpack_named_array_multidim(list)?;
                shape::check_fixed_dims(dims.as_deref(), m.dims())?;
                Ok(Value::NamedArrayMultiDimArray(m))
            }
        }
    }
}
