// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Variant ("any") path: the runtime shape picks the encoding.

use super::Marshaller;
use crate::error::{Error, Result};
use crate::types::{ArrayLength, Shape, TypeDescriptor, Value};
use crate::wire::shape::ARRAY;
use crate::wire::{ContainerKind, Element, Identity, Payload, ScalarKind, TypeTag};

/// Descriptor matching a value's runtime shape.
///
/// Container elements are described as [`TypeDescriptor::Any`], so nested
/// values go through the variant path too. `Null` maps to `Any`.
pub fn descriptor_of(value: &Value) -> TypeDescriptor {
    let any = TypeDescriptor::Any;
    match value {
        Value::Null => any,
        Value::Scalar(v) => TypeDescriptor::Scalar(v.kind()),
        Value::Array(a) => TypeDescriptor::Array(a.kind(), ArrayLength::Variable),
        Value::MultiDimArray(m) => TypeDescriptor::MultiDimArray(m.array().kind(), None),
        Value::String(_) => TypeDescriptor::String,
        Value::Enum(e) => TypeDescriptor::Enum(e.type_name.clone()),
        Value::Vector(_) => TypeDescriptor::vector(any),
        Value::Dictionary(_) => TypeDescriptor::dictionary(any),
        Value::List(_) => TypeDescriptor::list(any),
        Value::Structure(s) => TypeDescriptor::Structure(s.type_name().to_string()),
        Value::Pod(p) => TypeDescriptor::Pod(p.type_name().to_string(), Shape::Scalar),
        Value::PodArray(a) => {
            TypeDescriptor::Pod(a.type_name.clone(), Shape::Array(ArrayLength::Variable))
        }
        Value::PodMultiDimArray(m) => {
            TypeDescriptor::Pod(m.array().type_name.clone(), Shape::MultiDim(None))
        }
        Value::NamedArray(n) => {
            TypeDescriptor::NamedArray(n.type_name().to_string(), Shape::Scalar)
        }
        Value::NamedArrayArray(a) => {
            TypeDescriptor::NamedArray(a.type_name.clone(), Shape::Array(ArrayLength::Variable))
        }
        Value::NamedArrayMultiDimArray(m) => {
            TypeDescriptor::NamedArray(m.array().type_name.clone(), Shape::MultiDim(None))
        }
    }
}

impl Marshaller {
    /// Encode a value whose type is only known at runtime.
    pub fn pack_var(&self, identity: impl Into<Identity>, value: &Value) -> Result<Element> {
        let identity = identity.into();
        match value {
            Value::Null => Ok(Element::void(identity)),
            value => self.pack_element(identity, value, &descriptor_of(value)),
        }
    }

    /// Decode an element using only its wire tag.
    ///
    /// Numeric tags always decode to [`Value::Array`]: a scalar and a
    /// one-element array share the same wire form. Pods and named arrays
    /// decode to their array or multidim variants for the same reason.
    pub fn unpack_var(&self, element: Element) -> Result<Value> {
        let descriptor = self.descriptor_of_element(&element)?;
        match descriptor {
            TypeDescriptor::Any => Ok(Value::Null),
            descriptor => self.unpack(element, &descriptor),
        }
    }

    fn descriptor_of_element(&self, element: &Element) -> Result<TypeDescriptor> {
        let tag = element.tag();
        if let Some(kind) = ScalarKind::from_tag(tag) {
            return Ok(TypeDescriptor::Array(kind, ArrayLength::Variable));
        }
        let list = match element.payload() {
            Payload::None => return Ok(TypeDescriptor::Any),
            Payload::Flat(_) if tag == TypeTag::String => return Ok(TypeDescriptor::String),
            Payload::Flat(_) => return Err(Error::payload(tag, "unexpected flat payload")),
            Payload::Nested(list) => list,
        };
        let type_name = || {
            list.type_name()
                .map(str::to_string)
                .ok_or_else(|| Error::payload(tag, "missing type name"))
        };
        let variable = Shape::Array(ArrayLength::Variable);
        Ok(match list.kind() {
            ContainerKind::Structure => TypeDescriptor::Structure(type_name()?),
            ContainerKind::MultiDimArray => {
                let kind = list
                    .elements()
                    .iter()
                    .find(|e| e.identity().name() == Some(ARRAY))
                    .ok_or_else(|| Error::MissingElement(ARRAY.to_string()))
                    .and_then(|e| {
                        ScalarKind::from_tag(e.tag()).ok_or_else(|| {
                            Error::mismatch("numeric array", format!("{:?}", e.tag()))
                        })
                    })?;
                TypeDescriptor::MultiDimArray(kind, None)
            }
            ContainerKind::Vector => TypeDescriptor::vector(TypeDescriptor::Any),
            ContainerKind::Dictionary => TypeDescriptor::dictionary(TypeDescriptor::Any),
            ContainerKind::List => TypeDescriptor::list(TypeDescriptor::Any),
            ContainerKind::PodArray => TypeDescriptor::Pod(type_name()?, variable),
            ContainerKind::PodMultiDimArray => {
                TypeDescriptor::Pod(type_name()?, Shape::MultiDim(None))
            }
            ContainerKind::NamedArrayArray => TypeDescriptor::NamedArray(type_name()?, variable),
            ContainerKind::NamedArrayMultiDimArray => {
                TypeDescriptor::NamedArray(type_name()?, Shape::MultiDim(None))
            }
        })
    }
}
