// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Numeric scalar kinds and their little-endian wire representation.

use crate::error::{Error, Result};
use crate::wire::numeric::{NumericArray, ScalarValue};
use crate::wire::TypeTag;
use std::fmt;

/// Numeric element kinds (including bool and complex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Double,
    Single,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Bool,
    ComplexDouble,
    ComplexSingle,
}

impl ScalarKind {
    /// Wire tag for elements of this kind.
    pub const fn tag(self) -> TypeTag {
        match self {
            Self::Double => TypeTag::Double,
            Self::Single => TypeTag::Single,
            Self::Int8 => TypeTag::Int8,
            Self::UInt8 => TypeTag::UInt8,
            Self::Int16 => TypeTag::Int16,
            Self::UInt16 => TypeTag::UInt16,
            Self::Int32 => TypeTag::Int32,
            Self::UInt32 => TypeTag::UInt32,
            Self::Int64 => TypeTag::Int64,
            Self::UInt64 => TypeTag::UInt64,
            Self::Bool => TypeTag::Bool,
            Self::ComplexDouble => TypeTag::ComplexDouble,
            Self::ComplexSingle => TypeTag::ComplexSingle,
        }
    }

    /// Scalar kind for a numeric tag.
    pub const fn from_tag(tag: TypeTag) -> Option<Self> {
        match tag {
            TypeTag::Double => Some(Self::Double),
            TypeTag::Single => Some(Self::Single),
            TypeTag::Int8 => Some(Self::Int8),
            TypeTag::UInt8 => Some(Self::UInt8),
            TypeTag::Int16 => Some(Self::Int16),
            TypeTag::UInt16 => Some(Self::UInt16),
            TypeTag::Int32 => Some(Self::Int32),
            TypeTag::UInt32 => Some(Self::UInt32),
            TypeTag::Int64 => Some(Self::Int64),
            TypeTag::UInt64 => Some(Self::UInt64),
            TypeTag::Bool => Some(Self::Bool),
            TypeTag::ComplexDouble => Some(Self::ComplexDouble),
            TypeTag::ComplexSingle => Some(Self::ComplexSingle),
            _ => None,
        }
    }

    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 | Self::Bool => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Single | Self::Int32 | Self::UInt32 => 4,
            Self::Double | Self::Int64 | Self::UInt64 | Self::ComplexSingle => 8,
            Self::ComplexDouble => 16,
        }
    }

    /// Interface-definition name of the kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Single => "single",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Bool => "bool",
            Self::ComplexDouble => "cdouble",
            Self::ComplexSingle => "csingle",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complex number stored as a `{real, imag}` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex<T> {
    pub real: T,
    pub imag: T,
}

impl<T> Complex<T> {
    pub const fn new(real: T, imag: T) -> Self {
        Self { real, imag }
    }
}

/// Complex double (16 bytes on the wire).
pub type Complex64 = Complex<f64>;
/// Complex single (8 bytes on the wire).
pub type Complex32 = Complex<f32>;

/// Rust types that map one-to-one onto a numeric wire kind.
pub trait WireScalar: Copy + PartialEq + fmt::Debug + Default + Send + Sync + 'static {
    /// Wire kind of this type.
    const KIND: ScalarKind;

    /// Append the little-endian encoding.
    fn put_le(self, out: &mut Vec<u8>);

    /// Decode exactly `KIND.size()` bytes.
    fn get_le(bytes: &[u8]) -> Result<Self>;

    /// Wrap a vector into the matching [`NumericArray`] variant.
    fn wrap_array(values: Vec<Self>) -> NumericArray;

    /// Take the vector out of a [`NumericArray`] of the matching kind.
    fn unwrap_array(array: NumericArray) -> Result<Vec<Self>>;

    /// Wrap into the matching [`ScalarValue`] variant.
    fn wrap_scalar(self) -> ScalarValue;

    /// Take the value out of a [`ScalarValue`] of the matching kind.
    fn unwrap_scalar(value: ScalarValue) -> Result<Self>;
}

fn truncated(kind: ScalarKind) -> Error {
    Error::payload(kind.tag(), format!("element is not {} bytes", kind.size()))
}

macro_rules! impl_wire_scalar {
    ($ty:ty, $kind:ident) => {
        impl WireScalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn put_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn get_le(bytes: &[u8]) -> Result<Self> {
                let raw: [u8; std::mem::size_of::<$ty>()] = bytes
                    .try_into()
                    .map_err(|_| truncated(ScalarKind::$kind))?;
                Ok(<$ty>::from_le_bytes(raw))
            }

            fn wrap_array(values: Vec<Self>) -> NumericArray {
                NumericArray::$kind(values)
            }

            fn unwrap_array(array: NumericArray) -> Result<Vec<Self>> {
                match array {
                    NumericArray::$kind(values) => Ok(values),
                    other => Err(Error::mismatch(
                        ScalarKind::$kind.name(),
                        other.kind().name(),
                    )),
                }
            }

            fn wrap_scalar(self) -> ScalarValue {
                ScalarValue::$kind(self)
            }

            fn unwrap_scalar(value: ScalarValue) -> Result<Self> {
                match value {
                    ScalarValue::$kind(v) => Ok(v),
                    other => Err(Error::mismatch(
                        ScalarKind::$kind.name(),
                        other.kind().name(),
                    )),
                }
            }
        }
    };
}

impl_wire_scalar!(f64, Double);
impl_wire_scalar!(f32, Single);
impl_wire_scalar!(i8, Int8);
impl_wire_scalar!(u8, UInt8);
impl_wire_scalar!(i16, Int16);
impl_wire_scalar!(u16, UInt16);
impl_wire_scalar!(i32, Int32);
impl_wire_scalar!(u32, UInt32);
impl_wire_scalar!(i64, Int64);
impl_wire_scalar!(u64, UInt64);

impl WireScalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn put_le(self, out: &mut Vec<u8>) {
        out.push(u8::from(self));
    }

    // Only 0 and 1 are valid; anything else is a protocol error.
    fn get_le(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [0] => Ok(false),
            [1] => Ok(true),
            [other] => Err(Error::InvalidBool(*other)),
            _ => Err(truncated(ScalarKind::Bool)),
        }
    }

    fn wrap_array(values: Vec<Self>) -> NumericArray {
        NumericArray::Bool(values)
    }

    fn unwrap_array(array: NumericArray) -> Result<Vec<Self>> {
        match array {
            NumericArray::Bool(values) => Ok(values),
            other => Err(Error::mismatch("bool", other.kind().name())),
        }
    }

    fn wrap_scalar(self) -> ScalarValue {
        ScalarValue::Bool(self)
    }

    fn unwrap_scalar(value: ScalarValue) -> Result<Self> {
        match value {
            ScalarValue::Bool(v) => Ok(v),
            other => Err(Error::mismatch("bool", other.kind().name())),
        }
    }
}

macro_rules! impl_wire_complex {
    ($part:ty, $kind:ident) => {
        impl WireScalar for Complex<$part> {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn put_le(self, out: &mut Vec<u8>) {
                self.real.put_le(out);
                self.imag.put_le(out);
            }

            fn get_le(bytes: &[u8]) -> Result<Self> {
                let half = std::mem::size_of::<$part>();
                if bytes.len() != 2 * half {
                    return Err(truncated(ScalarKind::$kind));
                }
                Ok(Complex::new(
                    <$part>::get_le(&bytes[..half])?,
                    <$part>::get_le(&bytes[half..])?,
                ))
            }

            fn wrap_array(values: Vec<Self>) -> NumericArray {
                NumericArray::$kind(values)
            }

            fn unwrap_array(array: NumericArray) -> Result<Vec<Self>> {
                match array {
                    NumericArray::$kind(values) => Ok(values),
                    other => Err(Error::mismatch(
                        ScalarKind::$kind.name(),
                        other.kind().name(),
                    )),
                }
            }

            fn wrap_scalar(self) -> ScalarValue {
                ScalarValue::$kind(self)
            }

            fn unwrap_scalar(value: ScalarValue) -> Result<Self> {
                match value {
                    ScalarValue::$kind(v) => Ok(v),
                    other => Err(Error::mismatch(
                        ScalarKind::$kind.name(),
                        other.kind().name(),
                    )),
                }
            }
        }
    };
}

impl_wire_complex!(f64, ComplexDouble);
impl_wire_complex!(f32, ComplexSingle);

/// Encode a slice as a flat little-endian buffer.
pub fn encode_slice<T: WireScalar>(values: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * T::KIND.size());
    for value in values {
        value.put_le(&mut out);
    }
    out
}

/// Decode a flat little-endian buffer.
///
/// The buffer length must be a multiple of the element width.
pub fn decode_slice<T: WireScalar>(bytes: &[u8]) -> Result<Vec<T>> {
    let width = T::KIND.size();
    if bytes.len() % width != 0 {
        return Err(Error::payload(
            T::KIND.tag(),
            format!(
                "{} bytes is not a multiple of element width {}",
                bytes.len(),
                width
            ),
        ));
    }
    bytes.chunks_exact(width).map(T::get_le).collect()
}

/// Run `$body` with `$T` aliased to the Rust type of a runtime [`ScalarKind`].
macro_rules! with_scalar_type {
    ($kind:expr, $T:ident => $body:expr) => {
        match $kind {
            $crate::wire::ScalarKind::Double => {
                type $T = f64;
                $body
            }
            $crate::wire::ScalarKind::Single => {
                type $T = f32;
                $body
            }
            $crate::wire::ScalarKind::Int8 => {
                type $T = i8;
                $body
            }
            $crate::wire::ScalarKind::UInt8 => {
                type $T = u8;
                $body
            }
            $crate::wire::ScalarKind::Int16 => {
                type $T = i16;
                $body
            }
            $crate::wire::ScalarKind::UInt16 => {
                type $T = u16;
                $body
            }
            $crate::wire::ScalarKind::Int32 => {
                type $T = i32;
                $body
            }
            $crate::wire::ScalarKind::UInt32 => {
                type $T = u32;
                $body
            }
            $crate::wire::ScalarKind::Int64 => {
                type $T = i64;
                $body
            }
            $crate::wire::ScalarKind::UInt64 => {
                type $T = u64;
                $body
            }
            $crate::wire::ScalarKind::Bool => {
                type $T = bool;
                $body
            }
            $crate::wire::ScalarKind::ComplexDouble => {
                type $T = $crate::wire::Complex64;
                $body
            }
            $crate::wire::ScalarKind::ComplexSingle => {
                type $T = $crate::wire::Complex32;
                $body
            }
        }
    };
}

pub(crate) use with_scalar_type;
