// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-driven named-array codec.

use super::{split_qualified, NamedArrayStub};
use crate::error::{Error, Result};
use crate::types::NamedArrayValue;
use crate::wire::{NumericArray, ScalarKind};

/// A named range of the backing array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedField {
    pub name: String,
    pub offset: usize,
    pub len: usize,
}

/// Named-array type described at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArrayDef {
    type_name: String,
    kind: ScalarKind,
    fields: Vec<NamedField>,
    element_count: usize,
}

impl NamedArrayDef {
    pub fn builder(type_name: impl Into<String>, kind: ScalarKind) -> NamedArrayDefBuilder {
        NamedArrayDefBuilder {
            type_name: type_name.into(),
            kind,
            fields: Vec::new(),
        }
    }

    pub fn fields(&self) -> &[NamedField] {
        &self.fields
    }

    /// Wrap a backing array after checking its kind and length.
    pub fn value(&self, array: NumericArray) -> Result<NamedArrayValue> {
        let value = NamedArrayValue::new(&self.type_name, array);
        self.check_record(&value)?;
        Ok(value)
    }

    /// Elements of field `name`.
    pub fn get(&self, value: &NamedArrayValue, name: &str) -> Result<NumericArray> {
        self.check_record(value)?;
        let field = self
            .fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::MissingElement(name.to_string()))?;
        value.array().slice(field.offset, field.len)
    }
}

impl NamedArrayStub for NamedArrayDef {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn element_kind(&self) -> ScalarKind {
        self.kind
    }

    fn element_count(&self) -> usize {
        self.element_count
    }
}

/// Fluent builder for [`NamedArrayDef`].
#[derive(Debug, Clone)]
pub struct NamedArrayDefBuilder {
    type_name: String,
    kind: ScalarKind,
    fields: Vec<(String, usize)>,
}

impl NamedArrayDefBuilder {
    /// Field of `len` elements (1 for a scalar member).
    pub fn field(mut self, name: impl Into<String>, len: usize) -> Self {
        self.fields.push((name.into(), len));
        self
    }

    /// Field holding another named array of the same element kind.
    pub fn nested(self, name: impl Into<String>, def: &NamedArrayDef) -> Result<Self> {
        if def.kind != self.kind {
            return Err(Error::mismatch(self.kind.name(), def.kind.name()));
        }
        Ok(self.field(name, def.element_count))
    }

    pub fn build(self) -> Result<NamedArrayDef> {
        split_qualified(&self.type_name)?;
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut offset = 0usize;
        for (name, len) in self.fields {
            if fields.iter().any(|f: &NamedField| f.name == name) {
                return Err(Error::DuplicateKey(name));
            }
            if len == 0 {
                return Err(Error::UnsupportedShape(format!(
                    "named-array field '{}' is empty",
                    name
                )));
            }
            fields.push(NamedField { name, offset, len });
            offset += len;
        }
        if offset == 0 {
            return Err(Error::UnsupportedShape(format!(
                "named array {} has no fields",
                self.type_name
            )));
        }
        Ok(NamedArrayDef {
            type_name: self.type_name,
            kind: self.kind,
            fields,
            element_count: offset,
        })
    }
}
