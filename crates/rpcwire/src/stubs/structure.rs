// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-driven structure codec.

use super::{split_qualified, StructureStub};
use crate::error::{Error, Result};
use crate::marshal::Marshaller;
use crate::types::{StructValue, TypeDescriptor, Value};
use crate::wire::shape::NamedElements;
use crate::wire::{ContainerKind, Element, NestedList};
use std::collections::HashMap;

/// One named member of a structure or pod.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub descriptor: TypeDescriptor,
}

/// Structure type described at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    type_name: String,
    fields: Vec<FieldDef>,
}

impl StructDef {
    pub fn builder(type_name: impl Into<String>) -> StructDefBuilder {
        StructDefBuilder {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

impl StructureStub for StructDef {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn pack_structure(&self, value: &StructValue, marshaller: &Marshaller) -> Result<NestedList> {
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

    fn unpack_structure(&self, list: NestedList, marshaller: &Marshaller) -> Result<StructValue> {
        if list.kind() != ContainerKind::Structure {
            return Err(Error::mismatch("structure", format!("{:?}", list.kind())));
        }
        list.expect_type_name(&self.type_name)?;
        let fields = unpack_fields(&self.fields, list.into_elements(), marshaller)?;
        Ok(StructValue::from_fields(&self.type_name, fields))
    }
}

/// Fluent builder for [`StructDef`].
#[derive(Debug, Clone)]
pub struct StructDefBuilder {
    type_name: String,
    fields: Vec<FieldDef>,
}

impl StructDefBuilder {
    /// Add a field of any type.
    pub fn field(mut self, name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            descriptor,
        });
        self
    }

    pub fn build(self) -> Result<StructDef> {
        split_qualified(&self.type_name)?;
        check_unique(&self.fields)?;
        Ok(StructDef {
            type_name: self.type_name,
            fields: self.fields,
        })
    }
}

pub(super) fn check_unique(fields: &[FieldDef]) -> Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|f| f.name == field.name) {
            return Err(Error::DuplicateKey(field.name.clone()));
        }
    }
    Ok(())
}

/// Encode record fields in declaration order.
pub(super) fn pack_fields(
    fields: &[FieldDef],
    values: &HashMap<String, Value>,
    marshaller: &Marshaller,
) -> Result<Vec<Element>> {
    if let Some(extra) = values
        .keys()
        .filter(|name| !fields.iter().any(|f| &f.name == *name))
        .min()
    {
        return Err(Error::UnexpectedElement(extra.clone()));
    }
    fields
        .iter()
        .map(|field| {
            let value = values
                .get(&field.name)
                .ok_or_else(|| Error::MissingElement(field.name.clone()))?;
            marshaller.pack(field.name.as_str(), value, &field.descriptor)
        })
        .collect()
}

/// Decode record fields; every declared field must be present exactly once.
pub(super) fn unpack_fields(
    fields: &[FieldDef],
    elements: Vec<Element>,
    marshaller: &Marshaller,
) -> Result<HashMap<String, Value>> {
    let mut named = NamedElements::new(elements)?;
    let mut values = HashMap::with_capacity(fields.len());
    for field in fields {
        let element = named.take(&field.name)?;
        values.insert(
            field.name.clone(),
            marshaller.unpack(element, &field.descriptor)?,
        );
    }
    named.finish()?;
    Ok(values)
}
