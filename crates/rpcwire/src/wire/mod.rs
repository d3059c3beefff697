// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire value tree.
//!
//! The canonical, self-describing representation exchanged with peers:
//!
//! ```text
//! Element { identity: Name | Index, tag: TypeTag, payload }
//!   payload = None                 (void)
//!           | Flat(little-endian)  (numeric, bool, complex, string)
//!           | Nested(NestedList { kind, type_name?, [Element] })
//! ```

mod element;
mod numeric;
pub(crate) mod scalar;
pub mod shape;
mod tag;

pub use element::{Element, Identity, NestedList, Payload};
pub use numeric::{NumericArray, ScalarValue};
pub use scalar::{decode_slice, encode_slice, Complex, Complex32, Complex64, ScalarKind, WireScalar};
pub use tag::{ContainerKind, TypeTag};
