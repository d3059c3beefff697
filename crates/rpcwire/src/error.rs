// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for marshaling and memory operations.
//!
//! Every data-type failure (tag/payload mismatch, null for a non-nullable type,
//! bad shape, dimension or position violations, unknown namespaces, region
//! bounds) is a variant of [`Error`] for which [`Error::is_data_type`] returns
//! `true`. Collaborator failures and cancellation are kept apart so callers
//! can tell a protocol violation from a broken link.

use crate::wire::TypeTag;
use thiserror::Error;

/// Result type for rpcwire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the wire tree, dispatcher, stub registry and memory regions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Value, descriptor or wire tag disagree
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Null supplied for a scalar (non-nullable) type
    #[error("Null value not allowed for {0}")]
    NullNotAllowed(String),

    /// Value or descriptor shape the dispatcher cannot encode
    #[error("Unsupported shape: {0}")]
    UnsupportedShape(String),

    /// Map key type other than int32 or string
    #[error("Unsupported map key type: {0}")]
    UnsupportedKeyType(String),

    /// Flat payload does not fit its tag
    #[error("Invalid payload for {tag:?}: {reason}")]
    InvalidPayload { tag: TypeTag, reason: String },

    /// Boolean byte outside {0, 1}
    #[error("Invalid boolean byte: {0:#04x}")]
    InvalidBool(u8),

    /// Payload bytes of a string element are not UTF-8
    #[error("Invalid UTF-8 in string payload")]
    InvalidUtf8,

    /// Rank or per-axis size disagreement
    #[error("Dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch { expected: Vec<u64>, found: Vec<u64> },

    /// Element count disagreement
    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: u64, found: u64 },

    /// List or array element out of positional order
    #[error("Position mismatch: expected index {expected}, found {found}")]
    PositionMismatch { expected: i32, found: String },

    /// Same key or element name appears twice
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Required element absent from a nested list
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// Element present that the target type does not declare
    #[error("Unexpected element: {0}")]
    UnexpectedElement(String),

    /// Qualified type name does not resolve to a registered namespace or type
    #[error("Service type not found: {0}")]
    ServiceTypeNotFound(String),

    /// Namespace registered twice
    #[error("Namespace already registered: {0}")]
    DuplicateNamespace(String),

    /// Region access outside its bounds
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// Failure reported by the transport collaborator
    #[error("Transport error: {0}")]
    Transport(String),

    /// Chunked operation stopped by its cancel token
    #[error("Operation cancelled after {completed} elements")]
    Cancelled { completed: u64 },
}

impl Error {
    /// Build a type mismatch error
    pub fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Build an invalid payload error
    pub fn payload(tag: TypeTag, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            tag,
            reason: reason.into(),
        }
    }

    /// Build a dimension mismatch error from any unsigned axis slices
    pub fn dimensions<A, B>(expected: &[A], found: &[B]) -> Self
    where
        A: Copy + Into<u64>,
        B: Copy + Into<u64>,
    {
        Self::DimensionMismatch {
            expected: expected.iter().map(|&d| d.into()).collect(),
            found: found.iter().map(|&d| d.into()).collect(),
        }
    }

    /// True for every condition of the single data-type error kind.
    pub fn is_data_type(&self) -> bool {
        !matches!(self, Self::Transport(_) | Self::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_classification() {
        assert!(Error::InvalidBool(2).is_data_type());
        assert!(Error::ServiceTypeNotFound("a.B".into()).is_data_type());
        assert!(Error::OutOfBounds("pos".into()).is_data_type());
        assert!(!Error::Transport("link down".into()).is_data_type());
        assert!(!Error::Cancelled { completed: 4 }.is_data_type());
    }

    #[test]
    fn test_display_carries_reason() {
        let err = Error::dimensions(&[2u32, 3], &[3u32, 2]);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected [2, 3], found [3, 2]"
        );
        assert_eq!(
            Error::InvalidBool(7).to_string(),
            "Invalid boolean byte: 0x07"
        );
    }
}
