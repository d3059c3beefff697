// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptors driving the dispatcher.

use crate::error::{Error, Result};
use crate::wire::ScalarKind;
use std::fmt;

/// Length constraint of a one-dimensional array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArrayLength {
    /// Any length.
    #[default]
    Variable,
    /// Exactly `n` elements.
    Fixed(usize),
    /// At most `n` elements.
    Bounded(usize),
}

impl ArrayLength {
    /// Check an actual length against the constraint.
    pub fn check(self, len: usize) -> Result<()> {
        match self {
            Self::Fixed(n) if len != n => Err(Error::LengthMismatch {
                expected: n as u64,
                found: len as u64,
            }),
            Self::Bounded(n) if len > n => Err(Error::LengthMismatch {
                expected: n as u64,
                found: len as u64,
            }),
            _ => Ok(()),
        }
    }

    /// Largest length permitted, if bounded.
    pub fn capacity(self) -> Option<usize> {
        match self {
            Self::Variable => None,
            Self::Fixed(n) | Self::Bounded(n) => Some(n),
        }
    }
}

/// Shape of a pod or named-array value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A single record (promoted to a 1-element array on the wire).
    Scalar,
    Array(ArrayLength),
    /// Multidimensional array, optionally with fixed dims.
    MultiDim(Option<Vec<u32>>),
}

impl Shape {
    /// Records implied by the shape, when it is fixed.
    pub fn fixed_count(&self) -> Option<u64> {
        match self {
            Self::Scalar => Some(1),
            Self::Array(len) => len.capacity().map(|n| n as u64),
            Self::MultiDim(Some(dims)) => dims
                .iter()
                .try_fold(1u64, |acc, &d| acc.checked_mul(u64::from(d))),
            Self::MultiDim(None) => None,
        }
    }
}

/// Runtime description of a value's type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Dynamic type; the value's runtime shape decides the encoding.
    Any,
    Scalar(ScalarKind),
    Array(ScalarKind, ArrayLength),
    MultiDimArray(ScalarKind, Option<Vec<u32>>),
    String,
    /// Enum carried as int32.
    Enum(String),
    /// Map; the key must be `Scalar(Int32)` or `String`.
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    List(Box<TypeDescriptor>),
    Structure(String),
    Pod(String, Shape),
    NamedArray(String, Shape),
}

/// Key family of a map descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKey {
    /// Int32 keys, encoded as a `vector`
    Int32,
    /// String keys, encoded as a `dictionary`
    String,
}

impl TypeDescriptor {
    /// Map descriptor.
    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Int32-keyed map.
    pub fn vector(value: TypeDescriptor) -> Self {
        Self::map(Self::Scalar(ScalarKind::Int32), value)
    }

    /// String-keyed map.
    pub fn dictionary(value: TypeDescriptor) -> Self {
        Self::map(Self::String, value)
    }

    pub fn list(element: TypeDescriptor) -> Self {
        Self::List(Box::new(element))
    }

    /// Variable-length numeric array.
    pub fn array(kind: ScalarKind) -> Self {
        Self::Array(kind, ArrayLength::Variable)
    }

    /// Whether null (a `void` element) is an acceptable value.
    pub fn is_nullable(&self) -> bool {
        !matches!(
            self,
            Self::Scalar(_)
                | Self::Enum(_)
                | Self::Pod(_, Shape::Scalar)
                | Self::NamedArray(_, Shape::Scalar)
        )
    }

    /// Classify a map key descriptor.
    pub fn map_key(key: &TypeDescriptor) -> Result<MapKey> {
        match key {
            Self::Scalar(ScalarKind::Int32) => Ok(MapKey::Int32),
            Self::String => Ok(MapKey::String),
            other => Err(Error::UnsupportedKeyType(other.to_string())),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("varvalue"),
            Self::Scalar(kind) => write!(f, "{}", kind),
            Self::Array(kind, ArrayLength::Variable) => write!(f, "{}[]", kind),
            Self::Array(kind, ArrayLength::Fixed(n)) => write!(f, "{}[{}]", kind, n),
            Self::Array(kind, ArrayLength::Bounded(n)) => write!(f, "{}[{}-]", kind, n),
            Self::MultiDimArray(kind, Some(dims)) => write!(f, "{}{:?}", kind, dims),
            Self::MultiDimArray(kind, None) => write!(f, "{}[*]", kind),
            Self::String => f.write_str("string"),
            Self::Enum(name) => write!(f, "enum {}", name),
            Self::Map { key, value } => write!(f, "{}{{{}}}", value, key),
            Self::List(element) => write!(f, "{}{{list}}", element),
            Self::Structure(name) => f.write_str(name),
            Self::Pod(name, shape) | Self::NamedArray(name, shape) => match shape {
                Shape::Scalar => f.write_str(name),
                Shape::Array(ArrayLength::Variable) => write!(f, "{}[]", name),
                Shape::Array(ArrayLength::Fixed(n)) => write!(f, "{}[{}]", name, n),
                Shape::Array(ArrayLength::Bounded(n)) => write!(f, "{}[{}-]", name, n),
                Shape::MultiDim(Some(dims)) => write!(f, "{}{:?}", name, dims),
                Shape::MultiDim(None) => write!(f, "{}[*]", name),
            },
        }
    }
}
