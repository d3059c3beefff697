// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value model and runtime type descriptors.
//!
//! # Example
//!
//! ```rust
//! use rpcwire::types::{PodValue, TypeDescriptor, Value};
//! use rpcwire::wire::ScalarKind;
//!
//! let reading = PodValue::new("sensors.Reading")
//!     .with("id", 7u32)
//!     .with("celsius", 21.5f64);
//! assert_eq!(reading.get::<u32>("id").unwrap(), 7);
//!
//! let table = TypeDescriptor::dictionary(TypeDescriptor::array(ScalarKind::Double));
//! assert!(table.is_nullable());
//! assert!(Value::Null.is_null());
//! ```

mod convert;
mod descriptor;
mod value;

pub use convert::{FromValue, IntoValue};
pub use descriptor::{ArrayLength, MapKey, Shape, TypeDescriptor};
pub use value::{
    EnumValue, FlatArray, MultiDimArray, NamedArrayArray, NamedArrayValue, PodArray, PodValue,
    StructValue, Value,
};
