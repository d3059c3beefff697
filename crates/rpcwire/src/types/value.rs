// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Application-side values.

use crate::error::{Error, Result};
use crate::types::convert::FromValue;
use crate::wire::shape;
use crate::wire::{NumericArray, ScalarValue};
use std::collections::{BTreeMap, HashMap};

/// A value of any marshallable shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,

    // Numeric
    Scalar(ScalarValue),
    Array(NumericArray),
    MultiDimArray(MultiDimArray<NumericArray>),

    String(String),
    Enum(EnumValue),

    // Generic containers
    Vector(BTreeMap<i32, Value>),
    Dictionary(BTreeMap<String, Value>),
    List(Vec<Value>),

    // User-defined
    Structure(StructValue),
    Pod(PodValue),
    PodArray(PodArray),
    PodMultiDimArray(MultiDimArray<PodArray>),
    NamedArray(NamedArrayValue),
    NamedArrayArray(NamedArrayArray),
    NamedArrayMultiDimArray(MultiDimArray<NamedArrayArray>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short description of the runtime shape, for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Scalar(v) => v.kind().name().to_string(),
            Self::Array(a) => format!("{}[{}]", a.kind(), a.len()),
            Self::MultiDimArray(m) => format!("{}{:?}", m.array().kind(), m.dims()),
            Self::String(_) => "string".to_string(),
            Self::Enum(e) => format!("enum {}", e.type_name),
            Self::Vector(_) => "vector".to_string(),
            Self::Dictionary(_) => "dictionary".to_string(),
            Self::List(_) => "list".to_string(),
            Self::Structure(s) => s.type_name().to_string(),
            Self::Pod(p) => p.type_name().to_string(),
            Self::PodArray(a) => format!("{}[{}]", a.type_name, a.elements.len()),
            Self::PodMultiDimArray(m) => format!("{}{:?}", m.array().type_name, m.dims()),
            Self::NamedArray(n) => n.type_name().to_string(),
            Self::NamedArrayArray(a) => format!("{}[{}]", a.type_name, a.elements.len()),
            Self::NamedArrayMultiDimArray(m) => {
                format!("{}{:?}", m.array().type_name, m.dims())
            }
        }
    }

    pub fn as_scalar(&self) -> Option<ScalarValue> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&NumericArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Containers with a flat element count.
pub trait FlatArray {
    fn flat_len(&self) -> usize;
}

impl FlatArray for NumericArray {
    fn flat_len(&self) -> usize {
        self.len()
    }
}

impl FlatArray for PodArray {
    fn flat_len(&self) -> usize {
        self.elements.len()
    }
}

impl FlatArray for NamedArrayArray {
    fn flat_len(&self) -> usize {
        self.elements.len()
    }
}

impl<T> FlatArray for Vec<T> {
    fn flat_len(&self) -> usize {
        self.len()
    }
}

/// Multidimensional array: `dims` plus a flat column-major array.
///
/// `product(dims) == array.len()` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiDimArray<A> {
    dims: Vec<u32>,
    array: A,
}

impl<A: FlatArray> MultiDimArray<A> {
    pub fn new(dims: Vec<u32>, array: A) -> Result<Self> {
        shape::check_dims(&dims, array.flat_len())?;
        Ok(Self { dims, array })
    }

    pub fn dims(&self) -> &[u32] {
        &self.dims
    }

    /// Dims widened to the region coordinate type.
    pub fn dims_u64(&self) -> Vec<u64> {
        self.dims.iter().map(|&d| u64::from(d)).collect()
    }

    pub fn array(&self) -> &A {
        &self.array
    }

    pub fn len(&self) -> usize {
        self.array.flat_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_parts(self) -> (Vec<u32>, A) {
        (self.dims, self.array)
    }
}

impl<T> MultiDimArray<Vec<T>> {
    pub fn values(&self) -> &[T] {
        &self.array
    }

    /// Mutable view of the elements; the length cannot change.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.array
    }
}

/// Enum value carried as its int32 discriminant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub type_name: String,
    pub value: i32,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, value: i32) -> Self {
        Self {
            type_name: type_name.into(),
            value,
        }
    }
}

macro_rules! record_value {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            type_name: String,
            fields: HashMap<String, Value>,
        }

        impl $name {
            /// Empty record of the qualified type `type_name`.
            pub fn new(type_name: impl Into<String>) -> Self {
                Self {
                    type_name: type_name.into(),
                    fields: HashMap::new(),
                }
            }

            /// Record built from already-collected fields.
            pub fn from_fields(
                type_name: impl Into<String>,
                fields: HashMap<String, Value>,
            ) -> Self {
                Self {
                    type_name: type_name.into(),
                    fields,
                }
            }

            /// Builder-style field setter.
            pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
                self.set(name, value);
                self
            }

            pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
                self.fields.insert(name.into(), value.into());
            }

            pub fn type_name(&self) -> &str {
                &self.type_name
            }

            pub fn field(&self, name: &str) -> Option<&Value> {
                self.fields.get(name)
            }

            /// Typed field getter.
            pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
                let value = self
                    .fields
                    .get(name)
                    .ok_or_else(|| Error::MissingElement(name.to_string()))?;
                T::from_value(value)
            }

            pub fn fields(&self) -> &HashMap<String, Value> {
                &self.fields
            }

            pub fn len(&self) -> usize {
                self.fields.len()
            }

            pub fn is_empty(&self) -> bool {
                self.fields.is_empty()
            }
        }
    };
}

record_value!(
    /// Structure value: named fields of arbitrary types.
    StructValue
);

record_value!(
    /// Pod record: named fields of fixed layout.
    PodValue
);

/// Array of pod records of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct PodArray {
    pub type_name: String,
    pub elements: Vec<PodValue>,
}

impl PodArray {
    pub fn new(type_name: impl Into<String>, elements: Vec<PodValue>) -> Self {
        Self {
            type_name: type_name.into(),
            elements,
        }
    }
}

/// Named-array record backed by a homogeneous numeric array.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArrayValue {
    type_name: String,
    array: NumericArray,
}

impl NamedArrayValue {
    pub fn new(type_name: impl Into<String>, array: NumericArray) -> Self {
        Self {
            type_name: type_name.into(),
            array,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Backing array.
    pub fn array(&self) -> &NumericArray {
        &self.array
    }

    pub fn into_array(self) -> NumericArray {
        self.array
    }
}

/// Array of named-array records of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArrayArray {
    pub type_name: String,
    pub elements: Vec<NamedArrayValue>,
}

impl NamedArrayArray {
    pub fn new(type_name: impl Into<String>, elements: Vec<NamedArrayValue>) -> Self {
        Self {
            type_name: type_name.into(),
            elements,
        }
    }
}
