// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-driven pod codec.

use super::structure::{check_unique, pack_fields, unpack_fields, FieldDef};
use super::{split_qualified, NamedArrayDef, NamedArrayStub, PodStub};
use crate::error::{Error, Result};
use crate::marshal::Marshaller;
use crate::types::{ArrayLength, PodValue, Shape, TypeDescriptor};
use crate::wire::{ContainerKind, NestedList, ScalarKind};

/// Pod type described at runtime.
///
/// Every field has a fixed size, so a record has a fixed byte layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PodDef {
    type_name: String,
    fields: Vec<FieldDef>,
    element_size: usize,
}

impl PodDef {
    pub fn builder(type_name: impl Into<String>) -> PodDefBuilder {
        PodDefBuilder {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

impl PodStub for PodDef {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn element_size(&self) -> usize {
        self.element_size
    }

    fn pack_pod(&self, value: &PodValue, marshaller: &Marshaller) -> Result<NestedList> {
        if value.type_name() != self.type_name {
            return Err(Error::mismatch(&self.type_name, value.type_name()));
        }
        let elements = pack_fields(&self.fields, value.fields(), marshaller)?;
        NestedList::typed(
            ContainerKind::Structure,
            &self.type_name,
            elements,
        )
    }

    fn unpack_pod(&self, list: NestedList, marshaller: &Marshaller) -> Result<PodValue> {
        if list.kind() != ContainerKind::Structure {
            return Err(Error::mismatch("pod record", format!("{:?}", list.kind())));
        }
        list.expect_type_name(&self.type_name)?;
        let fields = unpack_fields(&self.fields, list.into_elements(), marshaller)?;
        Ok(PodValue::from_fields(&self.type_name, fields))
    }
}

#[derive(Debug, Clone)]
struct PodField {
    def: FieldDef,
    unit_size: usize,
    shape: Shape,
}

/// Fluent builder for [`PodDef`].
#[derive(Debug, Clone)]
pub struct PodDefBuilder {
    type_name: String,
    fields: Vec<PodField>,
}

impl PodDefBuilder {
    fn push(
        mut self,
        name: impl Into<String>,
        descriptor: TypeDescriptor,
        unit_size: usize,
        shape: Shape,
    ) -> Self {
        self.fields.push(PodField {
            def: FieldDef {
                name: name.into(),
                descriptor,
            },
            unit_size,
            shape,
        });
        self
    }

    pub fn scalar(self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.push(name, TypeDescriptor::Scalar(kind), kind.size(), Shape::Scalar)
    }

    /// Numeric array field; the length must be fixed or bounded.
    pub fn array(self, name: impl Into<String>, kind: ScalarKind, len: ArrayLength) -> Self {
        self.push(
            name,
            TypeDescriptor::Array(kind, len),
            kind.size(),
            Shape::Array(len),
        )
    }

    pub fn multidim(self, name: impl Into<String>, kind: ScalarKind, dims: Vec<u32>) -> Self {
        self.push(
            name,
            TypeDescriptor::MultiDimArray(kind, Some(dims.clone())),
            kind.size(),
            Shape::MultiDim(Some(dims)),
        )
    }

    /// Nested pod field.
    pub fn pod(self, name: impl Into<String>, def: &PodDef, shape: Shape) -> Self {
        self.push(
            name,
            TypeDescriptor::Pod(def.type_name.clone(), shape.clone()),
            def.element_size,
            shape,
        )
    }

    /// Nested named-array field.
    pub fn named_array(self, name: impl Into<String>, def: &NamedArrayDef, shape: Shape) -> Self {
        self.push(
            name,
            TypeDescriptor::NamedArray(def.type_name().to_string(), shape.clone()),
            def.element_size(),
            shape,
        )
    }

    pub fn build(self) -> Result<PodDef> {
        split_qualified(&self.type_name)?;
        let mut element_size = 0usize;
        for field in &self.fields {
            let count = field.shape.fixed_count().ok_or_else(|| {
                Error::UnsupportedShape(format!(
                    "pod field '{}' of {} has no fixed size",
                    field.def.name, self.type_name
                ))
            })?;
            let bytes = usize::try_from(count)
                .ok()
                .and_then(|count| count.checked_mul(field.unit_size))
                .and_then(|bytes| bytes.checked_add(element_size))
                .ok_or_else(|| {
                    Error::UnsupportedShape(format!("pod {} layout overflows", self.type_name))
                })?;
            element_size = bytes;
        }
        let fields: Vec<FieldDef> = self.fields.into_iter().map(|f| f.def).collect();
        check_unique(&fields)?;
        Ok(PodDef {
            type_name: self.type_name,
            fields,
            element_size,
        })
    }
}
