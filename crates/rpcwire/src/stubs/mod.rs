// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-namespace codecs for user-defined types.
//!
//! A service namespace supplies a [`ServiceStubs`] codec set. For each local
//! type name it hands out one of three capability objects:
//!
//! - [`StructureStub`]: structure <-> `structure` nested list
//! - [`PodStub`]: pod record(s) <-> `pod_array` / `pod_multidimarray`
//! - [`NamedArrayStub`]: named-array record(s) <-> `namedarray_array` /
//!   `namedarray_multidimarray`
//!
//! Pod and named-array stubs only implement the per-record codec; scalar
//! promotion, positional array checks and the multidim wrapper come from the
//! default methods.

mod named_array;
mod pod;
mod registry;
mod service;
mod structure;

#[cfg(test)]
mod tests;

pub use named_array::{NamedArrayDef, NamedArrayDefBuilder, NamedField};
pub use pod::{PodDef, PodDefBuilder};
pub use registry::{split_qualified, StubRegistry};
pub use service::{ServiceDef, ServiceDefBuilder};
pub use structure::{FieldDef, StructDef, StructDefBuilder};

use crate::error::{Error, Result};
use crate::marshal::Marshaller;
use crate::types::{
    MultiDimArray, NamedArrayArray, NamedArrayValue, PodArray, PodValue, StructValue,
};
use crate::wire::shape::{self, NamedElements, ARRAY};
use crate::wire::{ContainerKind, Element, NestedList, NumericArray, ScalarKind};
use std::sync::Arc;

/// Codec for one structure type.
pub trait StructureStub: Send + Sync {
    /// Qualified type name (`namespace.Type`).
    fn type_name(&self) -> &str;

    fn pack_structure(&self, value: &StructValue, marshaller: &Marshaller) -> Result<NestedList>;

    fn unpack_structure(&self, list: NestedList, marshaller: &Marshaller) -> Result<StructValue>;
}

/// Codec for one pod type.
pub trait PodStub: Send + Sync {
    /// Qualified type name (`namespace.Type`).
    fn type_name(&self) -> &str;

    /// Fixed byte layout of one record.
    fn element_size(&self) -> usize;

    /// Encode one record as a `structure`-kind list named after the pod type.
    fn pack_pod(&self, value: &PodValue, marshaller: &Marshaller) -> Result<NestedList>;

    fn unpack_pod(&self, list: NestedList, marshaller: &Marshaller) -> Result<PodValue>;

    /// Encode records as a positional `pod_array` list.
    fn pack_pod_array(&self, values: &[PodValue], marshaller: &Marshaller) -> Result<NestedList> {
        let elements = shape::indexed(values, |index, value| {
            if value.type_name() != self.type_name() {
                return Err(Error::mismatch(self.type_name(), value.type_name()));
            }
            Ok(Element::nested(index, self.pack_pod(value, marshaller)?))
        })?;
        NestedList::typed(
            ContainerKind::PodArray,
            self.type_name(),
            elements,
        )
    }

    fn unpack_pod_array(&self, list: NestedList, marshaller: &Marshaller) -> Result<Vec<PodValue>> {
        if list.kind() != ContainerKind::PodArray {
            return Err(Error::mismatch("pod_array", format!("{:?}", list.kind())));
        }
        list.expect_type_name(self.type_name())?;
        let elements = list.into_elements();
        shape::check_positions(&elements)?;
        elements
            .into_iter()
            .map(|element| {
                let record = element.into_nested(ContainerKind::Structure)?;
                self.unpack_pod(record, marshaller)
            })
            .collect()
    }

    /// Encode a single record as a 1-element array.
    fn pack_pod_scalar(&self, value: &PodValue, marshaller: &Marshaller) -> Result<NestedList> {
        self.pack_pod_array(std::slice::from_ref(value), marshaller)
    }

    /// Decode a 1-element array back to a single record.
    fn unpack_pod_scalar(&self, list: NestedList, marshaller: &Marshaller) -> Result<PodValue> {
        let values = self.unpack_pod_array(list, marshaller)?;
        single(values)
    }

    fn pack_pod_multidim(
        &self,
        value: &MultiDimArray<PodArray>,
        marshaller: &Marshaller,
    ) -> Result<NestedList> {
        let array = self.pack_pod_array(&value.array().elements, marshaller)?;
        shape::multidim_list(
            ContainerKind::PodMultiDimArray,
            Some(self.type_name().to_string()),
            value.dims(),
            Element::nested(ARRAY, array),
        )
    }

    fn unpack_pod_multidim(
        &self,
        list: NestedList,
        marshaller: &Marshaller,
    ) -> Result<MultiDimArray<PodArray>> {
        if list.kind() != ContainerKind::PodMultiDimArray {
            return Err(Error::mismatch(
                "pod_multidimarray",
                format!("{:?}", list.kind()),
            ));
        }
        list.expect_type_name(self.type_name())?;
        let (dims, array) = shape::split_multidim(list)?;
        let array = array.into_nested(ContainerKind::PodArray)?;
        let elements = self.unpack_pod_array(array, marshaller)?;
        MultiDimArray::new(dims, PodArray::new(self.type_name(), elements))
    }
}

/// Codec for one named-array type.
pub trait NamedArrayStub: Send + Sync {
    /// Qualified type name (`namespace.Type`).
    fn type_name(&self) -> &str;

    /// Kind of the backing numeric array.
    fn element_kind(&self) -> ScalarKind;

    /// Numeric elements per record.
    fn element_count(&self) -> usize;

    /// Fixed byte layout of one record.
    fn element_size(&self) -> usize {
        self.element_kind().size() * self.element_count()
    }

    /// Check one record's type and backing array.
    fn check_record(&self, value: &NamedArrayValue) -> Result<()> {
        if value.type_name() != self.type_name() {
            return Err(Error::mismatch(self.type_name(), value.type_name()));
        }
        if value.array().kind() != self.element_kind() {
            return Err(Error::mismatch(
                self.element_kind().name(),
                value.array().kind().name(),
            ));
        }
        if value.array().len() != self.element_count() {
            return Err(Error::LengthMismatch {
                expected: self.element_count() as u64,
                found: value.array().len() as u64,
            });
        }
        Ok(())
    }

    /// Encode records as one concatenated `array` child.
    fn pack_named_array(&self, values: &[NamedArrayValue]) -> Result<NestedList> {
        for value in values {
            self.check_record(value)?;
        }
        let flat = NumericArray::concat(
            self.element_kind(),
            values.iter().map(|value| value.array().clone()),
        )?;
        NestedList::typed(
            ContainerKind::NamedArrayArray,
            self.type_name(),
            vec![Element::numeric(ARRAY, &flat)],
        )
    }

    fn unpack_named_array(&self, list: NestedList) -> Result<Vec<NamedArrayValue>> {
        if list.kind() != ContainerKind::NamedArrayArray {
            return Err(Error::mismatch(
                "namedarray_array",
                format!("{:?}", list.kind()),
            ));
        }
        list.expect_type_name(self.type_name())?;
        let mut named = NamedElements::new(list.into_elements())?;
        let flat = named.take(ARRAY)?.into_numeric_of(self.element_kind())?;
        named.finish()?;
        Ok(flat
            .split(self.element_count())?
            .into_iter()
            .map(|array| NamedArrayValue::new(self.type_name(), array))
            .collect())
    }

    fn pack_named_array_scalar(&self, value: &NamedArrayValue) -> Result<NestedList> {
        self.pack_named_array(std::slice::from_ref(value))
    }

    fn unpack_named_array_scalar(&self, list: NestedList) -> Result<NamedArrayValue> {
        single(self.unpack_named_array(list)?)
    }

    fn pack_named_array_multidim(
        &self,
        value: &MultiDimArray<NamedArrayArray>,
    ) -> Result<NestedList> {
        let array = self.pack_named_array(&value.array().elements)?;
        shape::multidim_list(
            ContainerKind::NamedArrayMultiDimArray,
            Some(self.type_name().to_string()),
            value.dims(),
            Element::nested(ARRAY, array),
        )
    }

    fn unpack_named_array_multidim(
        &self,
        list: NestedList,
    ) -> Result<MultiDimArray<NamedArrayArray>> {
        if list.kind() != ContainerKind::NamedArrayMultiDimArray {
            return Err(Error::mismatch(
                "namedarray_multidimarray",
                format!("{:?}", list.kind()),
            ));
        }
        list.expect_type_name(self.type_name())?;
        let (dims, array) = shape::split_multidim(list)?;
        let array = array.into_nested(ContainerKind::NamedArrayArray)?;
        let elements = self.unpack_named_array(array)?;
        MultiDimArray::new(dims, NamedArrayArray::new(self.type_name(), elements))
    }
}

/// Codec set of one service namespace.
pub trait ServiceStubs: Send + Sync {
    fn namespace(&self) -> &str;

    fn find_structure_stub(&self, local_name: &str) -> Option<Arc<dyn StructureStub>>;

    fn find_pod_stub(&self, local_name: &str) -> Option<Arc<dyn PodStub>>;

    fn find_named_array_stub(&self, local_name: &str) -> Option<Arc<dyn NamedArrayStub>>;
}

/// The only element of a scalar-promoted array.
fn single<T>(mut values: Vec<T>) -> Result<T> {
    match values.len() {
        1 => values.pop().ok_or(Error::LengthMismatch {
            expected: 1,
            found: 0,
        }),
        n => Err(Error::LengthMismatch {
            expected: 1,
            found: n as u64,
        }),
    }
}
