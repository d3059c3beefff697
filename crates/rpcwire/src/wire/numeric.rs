// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed numeric storage for flat wire payloads.

use crate::error::{Error, Result};
use crate::wire::scalar::{decode_slice, encode_slice, with_scalar_type, WireScalar};
use crate::wire::{Complex32, Complex64, ScalarKind, TypeTag};

/// Homogeneous numeric array, one variant per [`ScalarKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    Double(Vec<f64>),
    Single(Vec<f32>),
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Bool(Vec<bool>),
    ComplexDouble(Vec<Complex64>),
    ComplexSingle(Vec<Complex32>),
}

/// Evaluate `$body` with `$v` bound to the inner vector, whatever the variant.
macro_rules! each_array {
    ($array:expr, $v:ident => $body:expr) => {
        match $array {
            NumericArray::Double($v) => $body,
            NumericArray::Single($v) => $body,
            NumericArray::Int8($v) => $body,
            NumericArray::UInt8($v) => $body,
            NumericArray::Int16($v) => $body,
            NumericArray::UInt16($v) => $body,
            NumericArray::Int32($v) => $body,
            NumericArray::UInt32($v) => $body,
            NumericArray::Int64($v) => $body,
            NumericArray::UInt64($v) => $body,
            NumericArray::Bool($v) => $body,
            NumericArray::ComplexDouble($v) => $body,
            NumericArray::ComplexSingle($v) => $body,
        }
    };
}

/// Like `each_array!` but rewraps the result in the same variant.
macro_rules! map_array {
    ($array:expr, $v:ident => $body:expr) => {
        match $array {
            NumericArray::Double($v) => NumericArray::Double($body),
            NumericArray::Single($v) => NumericArray::Single($body),
            NumericArray::Int8($v) => NumericArray::Int8($body),
            NumericArray::UInt8($v) => NumericArray::UInt8($body),
            NumericArray::Int16($v) => NumericArray::Int16($body),
            NumericArray::UInt16($v) => NumericArray::UInt16($body),
            NumericArray::Int32($v) => NumericArray::Int32($body),
            NumericArray::UInt32($v) => NumericArray::UInt32($body),
            NumericArray::Int64($v) => NumericArray::Int64($body),
            NumericArray::UInt64($v) => NumericArray::UInt64($body),
            NumericArray::Bool($v) => NumericArray::Bool($body),
            NumericArray::ComplexDouble($v) => NumericArray::ComplexDouble($body),
            NumericArray::ComplexSingle($v) => NumericArray::ComplexSingle($body),
        }
    };
}

impl NumericArray {
    /// Empty array of the given kind.
    pub fn empty(kind: ScalarKind) -> Self {
        with_scalar_type!(kind, T => T::wrap_array(Vec::new()))
    }

    /// Element kind.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Double(_) => ScalarKind::Double,
            Self::Single(_) => ScalarKind::Single,
            Self::Int8(_) => ScalarKind::Int8,
            Self::UInt8(_) => ScalarKind::UInt8,
            Self::Int16(_) => ScalarKind::Int16,
            Self::UInt16(_) => ScalarKind::UInt16,
            Self::Int32(_) => ScalarKind::Int32,
            Self::UInt32(_) => ScalarKind::UInt32,
            Self::Int64(_) => ScalarKind::Int64,
            Self::UInt64(_) => ScalarKind::UInt64,
            Self::Bool(_) => ScalarKind::Bool,
            Self::ComplexDouble(_) => ScalarKind::ComplexDouble,
            Self::ComplexSingle(_) => ScalarKind::ComplexSingle,
        }
    }

    /// Wire tag of the elements.
    pub fn tag(&self) -> TypeTag {
        self.kind().tag()
    }

    pub fn len(&self) -> usize {
        each_array!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode a flat little-endian payload.
    pub fn from_bytes(kind: ScalarKind, bytes: &[u8]) -> Result<Self> {
        with_scalar_type!(kind, T => Ok(T::wrap_array(decode_slice::<T>(bytes)?)))
    }

    /// Encode as a flat little-endian payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        each_array!(self, v => encode_slice(v))
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<ScalarValue> {
        each_array!(self, v => v.get(index).map(|x| x.wrap_scalar()))
    }

    /// Copy of `len` elements starting at `start`.
    pub fn slice(&self, start: usize, len: usize) -> Result<Self> {
        let total = self.len();
        let end = start.checked_add(len).filter(|&end| end <= total).ok_or_else(|| {
            Error::OutOfBounds(format!(
                "slice {}..{} of {}-element array",
                start,
                start.saturating_add(len),
                total
            ))
        })?;
        Ok(map_array!(self, v => v[start..end].to_vec()))
    }

    /// Concatenate arrays that all have `kind`.
    pub fn concat<I>(kind: ScalarKind, parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = NumericArray>,
    {
        with_scalar_type!(kind, T => {
            let mut out: Vec<T> = Vec::new();
            for part in parts {
                out.extend(T::unwrap_array(part)?);
            }
            Ok(T::wrap_array(out))
        })
    }

    /// Split into consecutive pieces of `width` elements.
    ///
    /// The length must be a multiple of `width`.
    pub fn split(self, width: usize) -> Result<Vec<Self>> {
        let len = self.len();
        if width == 0 || len % width != 0 {
            return Err(Error::LengthMismatch {
                expected: width as u64,
                found: len as u64,
            });
        }
        Ok(each_array!(self, v => v
            .chunks(width)
            .map(|piece| piece.to_vec().into())
            .collect()))
    }
}

impl<T: WireScalar> From<Vec<T>> for NumericArray {
    fn from(values: Vec<T>) -> Self {
        T::wrap_array(values)
    }
}

/// Single numeric value, one variant per [`ScalarKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Double(f64),
    Single(f32),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Bool(bool),
    ComplexDouble(Complex64),
    ComplexSingle(Complex32),
}

impl ScalarValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Double(_) => ScalarKind::Double,
            Self::Single(_) => ScalarKind::Single,
            Self::Int8(_) => ScalarKind::Int8,
            Self::UInt8(_) => ScalarKind::UInt8,
            Self::Int16(_) => ScalarKind::Int16,
            Self::UInt16(_) => ScalarKind::UInt16,
            Self::Int32(_) => ScalarKind::Int32,
            Self::UInt32(_) => ScalarKind::UInt32,
            Self::Int64(_) => ScalarKind::Int64,
            Self::UInt64(_) => ScalarKind::UInt64,
            Self::Bool(_) => ScalarKind::Bool,
            Self::ComplexDouble(_) => ScalarKind::ComplexDouble,
            Self::ComplexSingle(_) => ScalarKind::ComplexSingle,
        }
    }

    /// One-element array holding this value.
    pub fn to_array(self) -> NumericArray {
        match self {
            Self::Double(v) => NumericArray::Double(vec![v]),
            Self::Single(v) => NumericArray::Single(vec![v]),
            Self::Int8(v) => NumericArray::Int8(vec![v]),
            Self::UInt8(v) => NumericArray::UInt8(vec![v]),
            Self::Int16(v) => NumericArray::Int16(vec![v]),
            Self::UInt16(v) => NumericArray::UInt16(vec![v]),
            Self::Int32(v) => NumericArray::Int32(vec![v]),
            Self::UInt32(v) => NumericArray::UInt32(vec![v]),
            Self::Int64(v) => NumericArray::Int64(vec![v]),
            Self::UInt64(v) => NumericArray::UInt64(vec![v]),
            Self::Bool(v) => NumericArray::Bool(vec![v]),
            Self::ComplexDouble(v) => NumericArray::ComplexDouble(vec![v]),
            Self::ComplexSingle(v) => NumericArray::ComplexSingle(vec![v]),
        }
    }

    /// The single element of `array`; any other length is an error.
    pub fn from_array(array: &NumericArray) -> Result<Self> {
        if array.len() != 1 {
            return Err(Error::LengthMismatch {
                expected: 1,
                found: array.len() as u64,
            });
        }
        array.get(0).ok_or(Error::LengthMismatch {
            expected: 1,
            found: 0,
        })
    }
}

impl<T: WireScalar> From<T> for ScalarValue {
    fn from(value: T) -> Self {
        value.wrap_scalar()
    }
}
