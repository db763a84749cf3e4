// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by property proxies.

use thiserror::Error;

/// Errors produced when constructing or accessing a [`PropertyProxy`](crate::PropertyProxy).
///
/// The variants fall into two groups:
///
/// - invalid arguments ([`OwnerMismatch`](Self::OwnerMismatch),
///   [`ValueType`](Self::ValueType)), raised when a caller pairs a descriptor
///   with the wrong object or hands a setter the wrong value type;
/// - access errors ([`NotReadable`](Self::NotReadable),
///   [`NotWritable`](Self::NotWritable), [`TargetBorrowed`](Self::TargetBorrowed)),
///   raised when the property or its target cannot be read or written.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReflectError {
    /// The descriptor does not belong to the target object's type.
    #[error("property `{property}` is declared on `{owner}`, not on the target's type")]
    OwnerMismatch {
        /// Name of the property.
        property: &'static str,
        /// Type name of the descriptor's owner.
        owner: &'static str,
    },

    /// A value of the wrong type was passed to or requested from a property.
    #[error("property `{property}` holds `{expected}`, got `{found}`")]
    ValueType {
        /// Name of the property.
        property: &'static str,
        /// The declared value type.
        expected: &'static str,
        /// The type that was supplied or requested.
        found: &'static str,
    },

    /// The property has no getter.
    #[error("property `{property}` is not readable")]
    NotReadable {
        /// Name of the property.
        property: &'static str,
    },

    /// The property has no setter.
    #[error("property `{property}` is not writable")]
    NotWritable {
        /// Name of the property.
        property: &'static str,
    },

    /// The target object is borrowed in a way that conflicts with the access.
    #[error("target of property `{property}` is already borrowed")]
    TargetBorrowed {
        /// Name of the property.
        property: &'static str,
    },
}

impl ReflectError {
    /// Returns `true` for errors caused by a malformed argument.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::OwnerMismatch { .. } | Self::ValueType { .. })
    }

    /// Returns `true` for errors caused by a missing accessor or a busy target.
    #[must_use]
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            Self::NotReadable { .. } | Self::NotWritable { .. } | Self::TargetBorrowed { .. }
        )
    }

    /// Returns the name of the property the error refers to.
    #[must_use]
    pub fn property(&self) -> &'static str {
        match self {
            Self::OwnerMismatch { property, .. }
            | Self::ValueType { property, .. }
            | Self::NotReadable { property }
            | Self::NotWritable { property }
            | Self::TargetBorrowed { property } => property,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn classification() {
        let mismatch = ReflectError::OwnerMismatch {
            property: "Name",
            owner: "Student",
        };
        assert!(mismatch.is_invalid_argument());
        assert!(!mismatch.is_access_error());

        let unreadable = ReflectError::NotReadable { property: "Name" };
        assert!(unreadable.is_access_error());
        assert_eq!(unreadable.property(), "Name");
    }

    #[test]
    fn display() {
        let err = ReflectError::ValueType {
            property: "Age",
            expected: "u32",
            found: "alloc::string::String",
        };
        assert_eq!(
            err.to_string(),
            "property `Age` holds `u32`, got `alloc::string::String`"
        );
    }
}
