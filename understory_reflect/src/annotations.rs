// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed annotations attached to property descriptors.

use smallvec::SmallVec;

use crate::value::ErasedValue;

/// A small, ordered bag of typed annotation values.
///
/// Annotations play the role of declarative metadata on a property: any
/// `'static + Clone` value can be attached, and consumers query by type.
/// Insertion order is preserved, so "the first annotation of type `A`" is
/// well defined.
///
/// # Example
///
/// ```rust
/// use understory_reflect::Annotations;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Category(&'static str);
///
/// let annotations = Annotations::new()
///     .with(Category("Layout"))
///     .with(Category("Appearance"))
///     .with(3_u8);
///
/// assert_eq!(annotations.first::<Category>(), Some(&Category("Layout")));
/// assert_eq!(annotations.iter::<Category>().count(), 2);
/// assert!(annotations.has::<u8>());
/// assert!(!annotations.has::<u16>());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Annotations {
    entries: SmallVec<[ErasedValue; 2]>,
}

impl Annotations {
    /// Creates an empty annotation bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an annotation.
    pub fn push<A: Clone + 'static>(&mut self, annotation: A) {
        self.entries.push(ErasedValue::new(annotation));
    }

    /// Appends an annotation, builder style.
    #[must_use]
    pub fn with<A: Clone + 'static>(mut self, annotation: A) -> Self {
        self.push(annotation);
        self
    }

    /// Returns the first annotation of type `A`, if any.
    #[must_use]
    pub fn first<A: 'static>(&self) -> Option<&A> {
        self.iter::<A>().next()
    }

    /// Iterates over all annotations of type `A` in insertion order.
    pub fn iter<A: 'static>(&self) -> impl Iterator<Item = &A> {
        self.entries.iter().filter_map(ErasedValue::downcast_ref::<A>)
    }

    /// Returns `true` if at least one annotation of type `A` is present.
    #[must_use]
    pub fn has<A: 'static>(&self) -> bool {
        self.entries.iter().any(ErasedValue::is::<A>)
    }

    /// Returns the total number of annotations.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no annotations.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
