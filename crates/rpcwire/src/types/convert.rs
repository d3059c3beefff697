// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversions between Rust types and [`Value`].

use crate::error::{Error, Result};
use crate::types::value::{
    EnumValue, MultiDimArray, NamedArrayArray, NamedArrayValue, PodArray, PodValue, StructValue,
    Value,
};
use crate::wire::{Complex32, Complex64, NumericArray, ScalarValue, WireScalar};
use std::collections::BTreeMap;

/// Trait for converting from [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

/// Trait for converting into [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl<T: Into<Value>> IntoValue for T {
    fn into_value(self) -> Value {
        self.into()
    }
}

// Scalars and their arrays
macro_rules! impl_numeric_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(v.wrap_scalar())
                }
            }

            impl From<Vec<$ty>> for Value {
                fn from(v: Vec<$ty>) -> Self {
                    Value::Array(<$ty>::wrap_array(v))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self> {
                    match value {
                        Value::Scalar(v) => <$ty>::unwrap_scalar(*v),
                        other => Err(Error::mismatch(
                            <$ty as WireScalar>::KIND.name(),
                            other.describe(),
                        )),
                    }
                }
            }

            impl FromValue for Vec<$ty> {
                fn from_value(value: &Value) -> Result<Self> {
                    match value {
                        Value::Array(a) => <$ty>::unwrap_array(a.clone()),
                        other => Err(Error::mismatch(
                            format!("{}[]", <$ty as WireScalar>::KIND),
                            other.describe(),
                        )),
                    }
                }
            }
        )*
    };
}

impl_numeric_value!(f64, f32, i8, u8, i16, u16, i32, u32, i64, u64, bool, Complex64, Complex32);

// Wrappers that map onto a single variant
macro_rules! impl_variant_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v.clone()),
                    other => Err(Error::mismatch($name, other.describe())),
                }
            }
        }
    };
}

impl_variant_value!(ScalarValue, Scalar, "scalar");
impl_variant_value!(NumericArray, Array, "numeric array");
impl_variant_value!(MultiDimArray<NumericArray>, MultiDimArray, "multidim array");
impl_variant_value!(String, String, "string");
impl_variant_value!(EnumValue, Enum, "enum");
impl_variant_value!(BTreeMap<i32, Value>, Vector, "vector");
impl_variant_value!(BTreeMap<String, Value>, Dictionary, "dictionary");
impl_variant_value!(Vec<Value>, List, "list");
impl_variant_value!(StructValue, Structure, "structure");
impl_variant_value!(PodValue, Pod, "pod");
impl_variant_value!(PodArray, PodArray, "pod array");
impl_variant_value!(MultiDimArray<PodArray>, PodMultiDimArray, "pod multidim array");
impl_variant_value!(NamedArrayValue, NamedArray, "namedarray");
impl_variant_value!(NamedArrayArray, NamedArrayArray, "namedarray array");
impl_variant_value!(
    MultiDimArray<NamedArrayArray>,
    NamedArrayMultiDimArray,
    "namedarray multidim array"
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Value::from(3.5f64), Value::Scalar(ScalarValue::Double(3.5)));
        assert_eq!(f64::from_value(&Value::from(3.5f64)).unwrap(), 3.5);
        assert!(f32::from_value(&Value::from(3.5f64)).is_err());
        assert!(i32::from_value(&Value::from("x")).is_err());
    }

    #[test]
    fn test_array_conversions() {
        let value = Value::from(vec![1u16, 2, 3]);
        assert_eq!(Vec::<u16>::from_value(&value).unwrap(), vec![1, 2, 3]);
        assert!(Vec::<i16>::from_value(&value).is_err());
    }

    #[test]
    fn test_option_maps_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Option::<i32>::from_value(&Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::from_value(&Value::from(4i32)).unwrap(), Some(4));
    }

    #[test]
    fn test_record_getters() {
        let s = StructValue::new("demo.Point")
            .with("x", 1.0f64)
            .with("label", "origin");
        assert_eq!(s.get::<f64>("x").unwrap(), 1.0);
        assert_eq!(s.get::<String>("label").unwrap(), "origin");
        assert_eq!(s.get::<f64>("y"), Err(Error::MissingElement("y".into())));
    }
}
