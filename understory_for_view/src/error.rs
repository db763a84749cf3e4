// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution errors.

use alloc::string::String;
use thiserror::Error;
use understory_reflect::ReflectError;

/// Result type for condition and resolution operations.
pub type ForViewResult<T> = Result<T, ForViewError>;

/// Errors raised while resolving an artifact.
///
/// "No condition applied" is not an error: [`ForViewBuilder::resolve`](crate::ForViewBuilder::resolve)
/// reports it as `Ok(None)`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ForViewError {
    /// A malformed build context or registry call.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Reading or writing the underlying property failed.
    #[error(transparent)]
    Reflect(#[from] ReflectError),

    /// A condition could not be instantiated or its factory failed.
    #[error("failed to construct {what}: {message}")]
    Construction {
        /// What was being constructed.
        what: String,
        /// Why it failed.
        message: String,
    },

    /// An annotated condition does not build the requested artifact for the
    /// requested context.
    #[error("condition `{tag}` builds `{found}`, expected `{expected}`")]
    TypeMismatch {
        /// The tag named by the annotation.
        tag: &'static str,
        /// The artifact/context pair the caller resolves.
        expected: String,
        /// The artifact/context pair the registered factory produces.
        found: String,
    },
}

impl ForViewError {
    /// Creates a [`ForViewError::Construction`].
    pub fn construction(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for [`ForViewError::InvalidArgument`] and for invalid
    /// arguments reported by the property layer.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Self::InvalidArgument(_) => true,
            Self::Reflect(err) => err.is_invalid_argument(),
            _ => false,
        }
    }

    /// Returns `true` for property access failures.
    #[must_use]
    pub fn is_access_error(&self) -> bool {
        matches!(self, Self::Reflect(err) if err.is_access_error())
    }

    /// Returns `true` for [`ForViewError::Construction`].
    #[must_use]
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction { .. })
    }

    /// Returns `true` for [`ForViewError::TypeMismatch`].
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn reflect_errors_keep_their_class() {
        let err: ForViewError = ReflectError::NotReadable { property: "Name" }.into();
        assert!(err.is_access_error());
        assert!(!err.is_invalid_argument());
        assert_eq!(err.to_string(), "property `Name` is not readable");
    }

    #[test]
    fn construction_display() {
        let err = ForViewError::construction("condition `slider`", "range is empty");
        assert!(err.is_construction());
        assert_eq!(
            err.to_string(),
            "failed to construct condition `slider`: range is empty"
        );
    }
}
