// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire type tags and container kinds.
//!
//! The numeric codes are the interoperable taxonomy shared with every peer
//! implementation and must not change.

/// TypeTag identifies the shape of an [`Element`](super::Element) payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TypeTag {
    /// No value (null)
    Void = 0,
    /// 64-bit IEEE float
    Double = 1,
    /// 32-bit IEEE float
    Single = 2,
    Int8 = 3,
    UInt8 = 4,
    Int16 = 5,
    UInt16 = 6,
    Int32 = 7,
    UInt32 = 8,
    Int64 = 9,
    UInt64 = 10,
    /// UTF-8 byte buffer
    String = 11,
    /// Pair of 64-bit floats
    ComplexDouble = 12,
    /// Pair of 32-bit floats
    ComplexSingle = 13,
    /// One byte per element, 0 or 1
    Bool = 14,

    // --- Containers ---
    Structure = 101,
    /// Int32-keyed map
    Vector = 102,
    /// String-keyed map
    Dictionary = 103,
    List = 108,
    PodArray = 110,
    PodMultiDimArray = 111,
    NamedArrayArray = 115,
    NamedArrayMultiDimArray = 116,
    MultiDimArray = 117,
}

impl TypeTag {
    /// Convert a raw code to a tag.
    pub const fn from_u16(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Void),
            1 => Some(Self::Double),
            2 => Some(Self::Single),
            3 => Some(Self::Int8),
            4 => Some(Self::UInt8),
            5 => Some(Self::Int16),
            6 => Some(Self::UInt16),
            7 => Some(Self::Int32),
            8 => Some(Self::UInt32),
            9 => Some(Self::Int64),
            10 => Some(Self::UInt64),
            11 => Some(Self::String),
            12 => Some(Self::ComplexDouble),
            13 => Some(Self::ComplexSingle),
            14 => Some(Self::Bool),
            101 => Some(Self::Structure),
            102 => Some(Self::Vector),
            103 => Some(Self::Dictionary),
            108 => Some(Self::List),
            110 => Some(Self::PodArray),
            111 => Some(Self::PodMultiDimArray),
            115 => Some(Self::NamedArrayArray),
            116 => Some(Self::NamedArrayMultiDimArray),
            117 => Some(Self::MultiDimArray),
            _ => None,
        }
    }

    /// Raw wire code.
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Byte width of one element for flat tags, `None` for void and containers.
    pub const fn element_size(self) -> Option<usize> {
        match self {
            Self::Int8 | Self::UInt8 | Self::Bool | Self::String => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Single | Self::Int32 | Self::UInt32 => Some(4),
            Self::Double | Self::Int64 | Self::UInt64 | Self::ComplexSingle => Some(8),
            Self::ComplexDouble => Some(16),
            _ => None,
        }
    }

    /// True for numeric, bool and complex tags.
    pub const fn is_numeric(self) -> bool {
        self.element_size().is_some() && !matches!(self, Self::String)
    }

    /// True when the payload is a flat byte buffer.
    pub const fn is_flat(self) -> bool {
        self.element_size().is_some()
    }

    /// Container kind carried by this tag, if any.
    pub const fn container_kind(self) -> Option<ContainerKind> {
        match self {
            Self::Structure => Some(ContainerKind::Structure),
            Self::Vector => Some(ContainerKind::Vector),
            Self::Dictionary => Some(ContainerKind::Dictionary),
            Self::List => Some(ContainerKind::List),
            Self::PodArray => Some(ContainerKind::PodArray),
            Self::PodMultiDimArray => Some(ContainerKind::PodMultiDimArray),
            Self::NamedArrayArray => Some(ContainerKind::NamedArrayArray),
            Self::NamedArrayMultiDimArray => Some(ContainerKind::NamedArrayMultiDimArray),
            Self::MultiDimArray => Some(ContainerKind::MultiDimArray),
            _ => None,
        }
    }
}

/// Kind of a [`NestedList`](super::NestedList).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Structure,
    MultiDimArray,
    PodArray,
    PodMultiDimArray,
    NamedArrayArray,
    NamedArrayMultiDimArray,
    Vector,
    Dictionary,
    List,
}

impl ContainerKind {
    /// Tag of an element carrying a list of this kind.
    pub const fn tag(self) -> TypeTag {
        match self {
            Self::Structure => TypeTag::Structure,
            Self::MultiDimArray => TypeTag::MultiDimArray,
            Self::PodArray => TypeTag::PodArray,
            Self::PodMultiDimArray => TypeTag::PodMultiDimArray,
            Self::NamedArrayArray => TypeTag::NamedArrayArray,
            Self::NamedArrayMultiDimArray => TypeTag::NamedArrayMultiDimArray,
            Self::Vector => TypeTag::Vector,
            Self::Dictionary => TypeTag::Dictionary,
            Self::List => TypeTag::List,
        }
    }

    /// Lists of these kinds must name the user type they encode.
    pub const fn requires_type_name(self) -> bool {
        matches!(
            self,
            Self::Structure
                | Self::PodArray
                | Self::PodMultiDimArray
                | Self::NamedArrayArray
                | Self::NamedArrayMultiDimArray
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for code in 0..=200u16 {
            if let Some(tag) = TypeTag::from_u16(code) {
                assert_eq!(tag.code(), code);
            }
        }
        assert_eq!(TypeTag::from_u16(104), None);
        assert_eq!(TypeTag::from_u16(15), None);
    }

    #[test]
    fn test_element_widths() {
        assert_eq!(TypeTag::Double.element_size(), Some(8));
        assert_eq!(TypeTag::Single.element_size(), Some(4));
        assert_eq!(TypeTag::UInt16.element_size(), Some(2));
        assert_eq!(TypeTag::ComplexDouble.element_size(), Some(16));
        assert_eq!(TypeTag::ComplexSingle.element_size(), Some(8));
        assert_eq!(TypeTag::Bool.element_size(), Some(1));
        assert_eq!(TypeTag::String.element_size(), Some(1));
        assert_eq!(TypeTag::Void.element_size(), None);
        assert_eq!(TypeTag::List.element_size(), None);
        assert!(!TypeTag::String.is_numeric());
        assert!(TypeTag::Bool.is_numeric());
    }

    #[test]
    fn test_container_kinds_match_tags() {
        let kinds = [
            ContainerKind::Structure,
            ContainerKind::MultiDimArray,
            ContainerKind::PodArray,
            ContainerKind::PodMultiDimArray,
            ContainerKind::NamedArrayArray,
            ContainerKind::NamedArrayMultiDimArray,
            ContainerKind::Vector,
            ContainerKind::Dictionary,
            ContainerKind::List,
        ];
        for kind in kinds {
            assert_eq!(kind.tag().container_kind(), Some(kind));
        }
        assert!(ContainerKind::PodArray.requires_type_name());
        assert!(!ContainerKind::List.requires_type_name());
    }
}
