// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural rules shared by every container encoding.
//!
//! - positional lists: children indexed 0..N-1, dense and increasing
//! - named lists: unique names, each required name present exactly once
//! - multidim wrapper: a `dims` uint32 child plus an `array` child

use crate::error::{Error, Result};
use crate::wire::{ContainerKind, Element, Identity, NestedList, NumericArray, ScalarKind};
use std::collections::HashMap;

/// Name of the dimensions child of a multidim list.
pub const DIMS: &str = "dims";
/// Name of the flat data child of multidim and named-array lists.
pub const ARRAY: &str = "array";

/// Convert a position to a wire index.
pub fn position_index(position: usize) -> Result<i32> {
    i32::try_from(position)
        .map_err(|_| Error::UnsupportedShape(format!("position {} exceeds int32", position)))
}

/// Encode `items` as positionally indexed children.
pub fn indexed<I, F>(items: I, mut pack: F) -> Result<Vec<Element>>
where
    I: IntoIterator,
    F: FnMut(i32, I::Item) -> Result<Element>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| pack(position_index(position)?, item))
        .collect()
}

/// Verify children are indexed 0..N-1 in order.
pub fn check_positions(elements: &[Element]) -> Result<()> {
    for (position, element) in elements.iter().enumerate() {
        let expected = position_index(position)?;
        if element.identity().index() != Some(expected) {
            return Err(Error::PositionMismatch {
                expected,
                found: element.identity().to_string(),
            });
        }
    }
    Ok(())
}

/// Children of a named list, taken out one by one.
#[derive(Debug)]
pub struct NamedElements {
    elements: HashMap<String, Element>,
}

impl NamedElements {
    /// Index children by name; duplicate or positional identities are rejected.
    pub fn new(elements: Vec<Element>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(elements.len());
        for element in elements {
            let name = match element.identity() {
                Identity::Name(name) => name.clone(),
                other => return Err(Error::UnexpectedElement(other.to_string())),
            };
            if by_name.contains_key(&name) {
                return Err(Error::DuplicateKey(name));
            }
            by_name.insert(name, element);
        }
        Ok(Self { elements: by_name })
    }

    /// Remove a required child.
    pub fn take(&mut self, name: &str) -> Result<Element> {
        self.elements
            .remove(name)
            .ok_or_else(|| Error::MissingElement(name.to_string()))
    }

    /// Fail if children remain that nobody asked for.
    pub fn finish(self) -> Result<()> {
        match self.elements.into_keys().min() {
            Some(name) => Err(Error::UnexpectedElement(name)),
            None => Ok(()),
        }
    }
}

/// Element count implied by `dims`.
pub fn dims_product(dims: &[u32]) -> Result<u64> {
    dims.iter().try_fold(1u64, |acc, &d| {
        acc.checked_mul(u64::from(d))
            .ok_or_else(|| Error::UnsupportedShape(format!("dimensions {:?} overflow", dims)))
    })
}

/// Check `dims` describes exactly `len` elements.
pub fn check_dims(dims: &[u32], len: usize) -> Result<()> {
    let expected = dims_product(dims)?;
    if expected != len as u64 {
        return Err(Error::LengthMismatch {
            expected,
            found: len as u64,
        });
    }
    Ok(())
}

/// Check decoded dims against a fixed target shape, axis by axis.
pub fn check_fixed_dims(expected: Option<&[u32]>, found: &[u32]) -> Result<()> {
    match expected {
        Some(expected) if expected != found => Err(Error::dimensions(expected, found)),
        _ => Ok(()),
    }
}

/// Wrap `dims` and an `array` child into a multidim list.
pub fn multidim_list(
    kind: ContainerKind,
    type_name: Option<String>,
    dims: &[u32],
    array: Element,
) -> Result<NestedList> {
    let dims = Element::numeric(DIMS, &NumericArray::UInt32(dims.to_vec()));
    NestedList::new(kind, type_name, vec![dims, array.renamed(ARRAY)])
}

/// Split a multidim list into its dims and `array` child.
pub fn split_multidim(list: NestedList) -> Result<(Vec<u32>, Element)> {
    let mut named = NamedElements::new(list.into_elements())?;
    let dims = match named.take(DIMS)?.into_numeric_of(ScalarKind::UInt32)? {
        NumericArray::UInt32(dims) => dims,
        other => return Err(Error::mismatch("uint32", other.kind().name())),
    };
    let array = named.take(ARRAY)?;
    named.finish()?;
    Ok((dims, array))
}
