// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire tree nodes.
//!
//! [`Element`] and [`NestedList`] are validated when built and never mutated
//! afterwards. Decoding consumes them by value, so the tree is released on
//! every exit path, including errors.

use crate::error::{Error, Result};
use crate::wire::{ContainerKind, NumericArray, ScalarKind, TypeTag};
use std::fmt;

/// Name or position of an element inside its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Name(String),
    Index(i32),
}

impl Identity {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Index(_) => None,
        }
    }

    pub fn index(&self) -> Option<i32> {
        match self {
            Self::Name(_) => None,
            Self::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "'{}'", name),
            Self::Index(index) => write!(f, "#{}", index),
        }
    }
}

impl From<&str> for Identity {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Identity {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i32> for Identity {
    fn from(index: i32) -> Self {
        Self::Index(index)
    }
}

/// Element payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Only for `void`
    None,
    /// Little-endian element buffer or UTF-8 bytes
    Flat(Vec<u8>),
    Nested(NestedList),
}

/// One named-or-indexed node of the wire tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    identity: Identity,
    tag: TypeTag,
    payload: Payload,
}

impl Element {
    /// Build an element, rejecting any tag/payload disagreement.
    pub fn new(identity: impl Into<Identity>, tag: TypeTag, payload: Payload) -> Result<Self> {
        match (&payload, tag) {
            (Payload::None, TypeTag::Void) => {}
            (Payload::None, _) => {
                return Err(Error::payload(tag, "missing payload"));
            }
            (_, TypeTag::Void) => {
                return Err(Error::payload(tag, "void element carries a payload"));
            }
            (Payload::Flat(bytes), _) => match tag.element_size() {
                Some(width) if bytes.len() % width == 0 => {}
                Some(width) => {
                    return Err(Error::payload(
                        tag,
                        format!(
                            "{} bytes is not a multiple of element width {}",
                            bytes.len(),
                            width
                        ),
                    ));
                }
                None => return Err(Error::payload(tag, "container tag with flat payload")),
            },
            (Payload::Nested(list), _) => {
                if list.kind().tag() != tag {
                    return Err(Error::mismatch(
                        format!("{:?}", tag),
                        format!("{:?} list", list.kind()),
                    ));
                }
            }
        }
        Ok(Self {
            identity: identity.into(),
            tag,
            payload,
        })
    }

    /// Null element.
    pub fn void(identity: impl Into<Identity>) -> Self {
        Self {
            identity: identity.into(),
            tag: TypeTag::Void,
            payload: Payload::None,
        }
    }

    /// Flat numeric element.
    pub fn numeric(identity: impl Into<Identity>, array: &NumericArray) -> Self {
        Self {
            identity: identity.into(),
            tag: array.tag(),
            payload: Payload::Flat(array.to_bytes()),
        }
    }

    /// UTF-8 string element.
    pub fn string(identity: impl Into<Identity>, value: &str) -> Self {
        Self {
            identity: identity.into(),
            tag: TypeTag::String,
            payload: Payload::Flat(value.as_bytes().to_vec()),
        }
    }

    /// Container element; the tag follows the list kind.
    pub fn nested(identity: impl Into<Identity>, list: NestedList) -> Self {
        Self {
            identity: identity.into(),
            tag: list.kind().tag(),
            payload: Payload::Nested(list),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_void(&self) -> bool {
        self.tag == TypeTag::Void
    }

    pub fn into_parts(self) -> (Identity, TypeTag, Payload) {
        (self.identity, self.tag, self.payload)
    }

    /// Same node under another identity.
    pub fn renamed(self, identity: impl Into<Identity>) -> Self {
        Self {
            identity: identity.into(),
            ..self
        }
    }

    /// Decode a numeric payload of any kind.
    pub fn into_numeric(self) -> Result<NumericArray> {
        let kind = ScalarKind::from_tag(self.tag)
            .ok_or_else(|| Error::mismatch("numeric array", format!("{:?}", self.tag)))?;
        self.into_numeric_of(kind)
    }

    /// Decode a numeric payload that must have `kind`.
    pub fn into_numeric_of(self, kind: ScalarKind) -> Result<NumericArray> {
        if self.tag != kind.tag() {
            return Err(Error::mismatch(kind.name(), format!("{:?}", self.tag)));
        }
        match self.payload {
            Payload::Flat(bytes) => NumericArray::from_bytes(kind, &bytes),
            _ => Err(Error::payload(self.tag, "expected flat payload")),
        }
    }

    /// Decode a string payload.
    pub fn into_string(self) -> Result<String> {
        match (self.tag, self.payload) {
            (TypeTag::String, Payload::Flat(bytes)) => {
                String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
            }
            (tag, _) => Err(Error::mismatch("string", format!("{:?}", tag))),
        }
    }

    /// Take the nested list, which must be of `kind`.
    pub fn into_nested(self, kind: ContainerKind) -> Result<NestedList> {
        match self.payload {
            Payload::Nested(list) if list.kind() == kind => Ok(list),
            _ => Err(Error::mismatch(
                format!("{:?}", kind.tag()),
                format!("{:?}", self.tag),
            )),
        }
    }

    /// Take the nested list of whatever kind.
    pub fn into_any_nested(self) -> Result<NestedList> {
        match self.payload {
            Payload::Nested(list) => Ok(list),
            _ => Err(Error::mismatch("container", format!("{:?}", self.tag))),
        }
    }
}

/// Ordered child elements of a container.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedList {
    kind: ContainerKind,
    type_name: Option<String>,
    elements: Vec<Element>,
}

impl NestedList {
    /// Build a list. Structure, pod and named-array kinds need a type name.
    pub fn new(
        kind: ContainerKind,
        type_name: Option<String>,
        elements: Vec<Element>,
    ) -> Result<Self> {
        if kind.requires_type_name() && type_name.as_deref().map_or(true, str::is_empty) {
            return Err(Error::payload(kind.tag(), "missing type name"));
        }
        Ok(Self {
            kind,
            type_name,
            elements,
        })
    }

    /// List naming the user type it encodes. The name must not be empty
    /// for structure, pod and named-array kinds.
    pub fn typed(
        kind: ContainerKind,
        type_name: impl Into<String>,
        elements: Vec<Element>,
    ) -> Result<Self> {
        Self::new(kind, Some(type_name.into()), elements)
    }

    /// Generic container without a type name.
    pub fn untyped(kind: ContainerKind, elements: Vec<Element>) -> Result<Self> {
        Self::new(kind, None, elements)
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Fail unless the list names `expected`.
    pub fn expect_type_name(&self, expected: &str) -> Result<()> {
        match self.type_name() {
            Some(name) if name == expected => Ok(()),
            other => Err(Error::mismatch(expected, other.unwrap_or("<unnamed>"))),
        }
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    pub fn into_parts(self) -> (ContainerKind, Option<String>, Vec<Element>) {
        (self.kind, self.type_name, self.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_requires_no_payload() {
        assert!(Element::new("x", TypeTag::Void, Payload::None).is_ok());
        assert!(Element::new("x", TypeTag::Void, Payload::Flat(vec![])).is_err());
        assert!(Element::new("x", TypeTag::Int32, Payload::None).is_err());
    }

    #[test]
    fn test_flat_width_checked() {
        assert!(Element::new("x", TypeTag::Int32, Payload::Flat(vec![0; 8])).is_ok());
        assert!(Element::new("x", TypeTag::Int32, Payload::Flat(vec![0; 6])).is_err());
        assert!(Element::new("x", TypeTag::Int32, Payload::Flat(vec![])).is_ok());
        assert!(Element::new("x", TypeTag::List, Payload::Flat(vec![])).is_err());
    }

    #[test]
    fn test_nested_kind_must_match_tag() {
        let list = NestedList::untyped(ContainerKind::List, vec![]).unwrap();
        assert!(Element::new(0, TypeTag::List, Payload::Nested(list.clone())).is_ok());
        assert!(Element::new(0, TypeTag::Vector, Payload::Nested(list)).is_err());
    }

    #[test]
    fn test_typed_kinds_need_a_name() {
        assert!(NestedList::untyped(ContainerKind::Structure, vec![]).is_err());
        assert!(NestedList::new(ContainerKind::PodArray, Some(String::new()), vec![]).is_err());
        assert!(NestedList::typed(ContainerKind::Structure, "", vec![]).is_err());
        assert!(NestedList::typed(ContainerKind::NamedArrayArray, "", vec![]).is_err());
        // generic containers may still carry a name
        assert!(NestedList::typed(ContainerKind::List, "", vec![]).is_ok());
        let list = NestedList::typed(ContainerKind::Structure, "demo.Point", vec![]).unwrap();
        assert!(list.expect_type_name("demo.Point").is_ok());
        assert!(list.expect_type_name("demo.Other").is_err());
    }

    #[test]
    fn test_string_payload_must_be_utf8() {
        let bad = Element::new("s", TypeTag::String, Payload::Flat(vec![0xff, 0xfe])).unwrap();
        assert_eq!(bad.into_string(), Err(Error::InvalidUtf8));
        assert_eq!(Element::string("s", "héllo").into_string().unwrap(), "héllo");
    }

    #[test]
    fn test_numeric_kind_checked() {
        let element = Element::numeric("n", &NumericArray::from(vec![1i16, 2]));
        assert_eq!(element.tag(), TypeTag::Int16);
        assert!(element.clone().into_numeric_of(ScalarKind::UInt16).is_err());
        assert_eq!(
            element.into_numeric().unwrap(),
            NumericArray::from(vec![1i16, 2])
        );
    }
}
