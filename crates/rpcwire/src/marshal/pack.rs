// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode direction.

use super::{check_type_name, Marshaller};
use crate::error::{Error, Result};
use crate::types::{IntoValue, MapKey, Shape, TypeDescriptor, Value};
use crate::wire::shape::{self, ARRAY};
use crate::wire::{
    ContainerKind, Element, Identity, NestedList, NumericArray, ScalarKind, WireScalar,
};

impl Marshaller {
    /// Encode `value` as described by `descriptor`.
    pub fn pack(
        &self,
        identity: impl Into<Identity>,
        value: &Value,
        descriptor: &TypeDescriptor,
    ) -> Result<Element> {
        self.pack_element(identity.into(), value, descriptor)
    }

    /// Encode any Rust value convertible into [`Value`].
    pub fn pack_value<T: IntoValue>(
        &self,
        identity: impl Into<Identity>,
        value: T,
        descriptor: &TypeDescriptor,
    ) -> Result<Element> {
        self.pack(identity, &value.into_value(), descriptor)
    }

    /// Encode a single numeric value.
    pub fn pack_scalar<T: WireScalar>(&self, identity: impl Into<Identity>, value: T) -> Element {
        Element::numeric(identity, &T::wrap_array(vec![value]))
    }

    /// Encode a numeric slice.
    pub fn pack_array<T: WireScalar>(
        &self,
        identity: impl Into<Identity>,
        values: &[T],
    ) -> Element {
        Element::numeric(identity, &T::wrap_array(values.to_vec()))
    }

    pub fn pack_string(&self, identity: impl Into<Identity>, value: &str) -> Element {
        Element::string(identity, value)
    }

    pub(super) fn pack_element(
        &self,
        identity: Identity,
        value: &Value,
        descriptor: &TypeDescriptor,
    ) -> Result<Element> {
        if value.is_null() {
            return if descriptor.is_nullable() {
                Ok(Element::void(identity))
            } else {
                Err(Error::NullNotAllowed(descriptor.to_string()))
            };
        }

        match (descriptor, value) {
            (TypeDescriptor::Any, value) => self.pack_var(identity, value),
            (TypeDescriptor::Scalar(kind), Value::Scalar(v)) => {
                check_kind(*kind, v.kind())?;
                Ok(Element::numeric(identity, &v.to_array()))
            }
            (TypeDescriptor::Array(kind, len), Value::Array(array)) => {
                check_kind(*kind, array.kind())?;
                len.check(array.len())?;
                Ok(Element::numeric(identity, array))
            }
            (TypeDescriptor::MultiDimArray(kind, dims), Value::MultiDimArray(m)) => {
                check_kind(*kind, m.array().kind())?;
                shape::check_fixed_dims(dims.as_deref(), m.dims())?;
                let list = shape::multidim_list(
                    ContainerKind::MultiDimArray,
                    None,
                    m.dims(),
                    Element::numeric(ARRAY, m.array()),
                )?;
                Ok(Element::nested(identity, list))
            }
            (TypeDescriptor::String, Value::String(s)) => Ok(Element::string(identity, s)),
            (TypeDescriptor::Enum(name), Value::Enum(e)) => {
                check_type_name(name, &e.type_name)?;
                Ok(Element::numeric(identity, &NumericArray::Int32(vec![e.value])))
            }
            (TypeDescriptor::Map { key, value: element }, value) => {
                self.pack_map(identity, key, element, value)
            }
            (TypeDescriptor::List(element), Value::List(items)) => {
                let elements = shape::indexed(items, |index, item| {
                    self.pack_element(Identity::Index(index), item, element)
                })?;
                let list = NestedList::untyped(ContainerKind::List, elements)?;
                Ok(Element::nested(identity, list))
            }
            (TypeDescriptor::Structure(name), Value::Structure(s)) => {
                check_type_name(name, s.type_name())?;
                let stub = self.structure_stub(name)?;
                Ok(Element::nested(identity, stub.pack_structure(s, self)?))
            }
            (TypeDescriptor::Pod(name, shape), value) => {
                self.pack_pod(identity, name, shape, value)
            }
            (TypeDescriptor::NamedArray(name, shape), value) => {
                self.pack_named_array(identity, name, shape, value)
            }
            (descriptor, value) => Err(Error::mismatch(descriptor.to_string(), value.describe())),
        }
    }

    fn pack_map(
        &self,
        identity: Identity,
        key: &TypeDescriptor,
        element: &TypeDescriptor,
        value: &Value,
    ) -> Result<Element> {
        let list = match (TypeDescriptor::map_key(key)?, value) {
            (MapKey::Int32, Value::Vector(map)) => {
                let elements = map
                    .iter()
                    .map(|(k, v)| self.pack_element(Identity::Index(*k), v, element))
                    .collect::<Result<Vec<_>>>()?;
                NestedList::untyped(ContainerKind::Vector, elements)?
            }
            (MapKey::String, Value::Dictionary(map)) => {
                let elements = map
                    .iter()
                    .map(|(k, v)| self.pack_element(Identity::Name(k.clone()), v, element))
                    .collect::<Result<Vec<_>>>()?;
                NestedList::untyped(ContainerKind::Dictionary, elements)?
            }
            (_, other) => {
                let expected = TypeDescriptor::map(key.clone(), element.clone());
                return Err(Error::mismatch(expected.to_string(), other.describe()));
            }
        };
        Ok(Element::nested(identity, list))
    }

    fn pack_pod(
        &self,
        identity: Identity,
        name: &str,
        shape: &Shape,
        value: &Value,
    ) -> Result<Element> {
        let list = match (shape, value) {
            (Shape::Scalar, Value::Pod(pod)) => self.pod_stub(name)?.pack_pod_scalar(pod, self)?,
            (Shape::Array(len), Value::PodArray(array)) => {
                check_type_name(name, &array.type_name)?;
                len.check(array.elements.len())?;
                self.pod_stub(name)?.pack_pod_array(&array.elements, self)?
            }
            (Shape::MultiDim(dims), Value::PodMultiDimArray(m)) => {
                check_type_name(name, &m.array().type_name)?;
                shape::check_fixed_dims(dims.as_deref(), m.dims())?;
                self.pod_stub(name)?.pack_pod_multidim(m, self)?
            }
            (shape, other) => {
                let expected = TypeDescriptor::Pod(name.to_string(), shape.clone());
                return Err(Error::mismatch(expected.to_string(), other.describe()));
            }
        };
        Ok(Element::nested(identity, list))
    }

    fn pack_named_array(
        &self,
        identity: Identity,
        name: &str,
        shape: &Shape,
        value: &Value,
    ) -> Result<Element> {
        let list = match (shape, value) {
            (Shape::Scalar, Value::NamedArray(record)) => {
                self.named_array_stub(name)?.pack_named_array_scalar(record)?
            }
            (Shape::Array(len), Value::NamedArrayArray(array)) => {
                check_type_name(name, &array.type_name)?;
                len.check(array.elements.len())?;
                self.named_array_stub(name)?.pack_named_array(&array.elements)?
            }
            (Shape::MultiDim(dims), Value::NamedArrayMultiDimArray(m)) => {
                check_type_name(name, &m.array().type_name)?;
                shape::check_fixed_dims(dims.as_deref(), m.dims())?;
                self.named_array_stub(name)?.pack_named_array_multidim(m)?
            }
            (shape, other) => {
                let expected = TypeDescriptor::NamedArray(name.to_string(), shape.clone());
                return Err(Error::mismatch(expected.to_string(), other.describe()));
            }
        };
        Ok(Element::nested(identity, list))
    }
}

fn check_kind(expected: ScalarKind, found: ScalarKind) -> Result<()> {
    if expected != found {
        return Err(Error::mismatch(expected.name(), found.name()));
    }
    Ok(())
}
