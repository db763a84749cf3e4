// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute-driven condition selection.
//!
//! A property can name a specific condition through a [`ForViewCondition`]
//! annotation. The tag is looked up in a [`ConditionFactories`] table that the
//! host fills at startup, and [`AttributeSelector`] instantiates the condition
//! when the ordered scan finds no match.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::{Any, type_name};
use core::fmt;

use hashbrown::HashMap;
use tracing::debug;
use understory_reflect::PropertyProxy;

use crate::condition::Condition;
use crate::error::{ForViewError, ForViewResult};

/// Annotation naming the condition to use for a property.
///
/// Attach it with
/// [`PropertyDescriptorBuilder::annotate`](understory_reflect::PropertyDescriptorBuilder::annotate).
/// Only the first `ForViewCondition` on a property is consulted.
///
/// # Example
///
/// ```rust
/// use understory_for_view::ForViewCondition;
/// use understory_reflect::PropertyDescriptor;
///
/// struct Settings {
///     accent: u32,
/// }
///
/// let accent = PropertyDescriptor::builder::<Settings, u32>("Accent")
///     .getter(|s| s.accent)
///     .annotate(ForViewCondition::new("color-picker"))
///     .build();
///
/// assert_eq!(
///     accent.annotations().first::<ForViewCondition>().map(|a| a.tag()),
///     Some("color-picker")
/// );
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ForViewCondition {
    tag: &'static str,
}

impl ForViewCondition {
    /// Creates an annotation naming the condition registered under `tag`.
    #[must_use]
    pub const fn new(tag: &'static str) -> Self {
        Self { tag }
    }

    /// Returns the condition tag.
    #[must_use]
    #[inline]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }
}

/// A heap-allocated condition, as produced by condition factories.
pub type BoxedCondition<A, C> = Box<dyn Condition<A, C>>;

struct TypedFactory<A, C> {
    make: Box<dyn Fn() -> ForViewResult<BoxedCondition<A, C>>>,
}

struct FactoryEntry {
    signature: &'static str,
    factory: Box<dyn Any>,
}

fn signature<A, C>() -> &'static str {
    type_name::<fn(&C) -> A>()
}

/// Tag → condition factory table.
///
/// Each tag is registered for one artifact type `A` and one context type
/// `C`. Instantiating a tag for a different pair is a
/// [`ForViewError::TypeMismatch`].
///
/// # Example
///
/// ```rust
/// use understory_for_view::{BuildContext, ConditionFactories, FnCondition};
///
/// let mut factories = ConditionFactories::new();
/// factories.register("never", || {
///     FnCondition::new(|_: &BuildContext| false, |_| Ok(123_i32))
/// });
///
/// assert!(factories.contains("never"));
/// assert!(factories.instantiate::<i32, BuildContext>("never").is_ok());
/// assert!(
///     factories
///         .instantiate::<u8, BuildContext>("never")
///         .is_err_and(|err| err.is_type_mismatch())
/// );
/// assert!(
///     factories
///         .instantiate::<i32, BuildContext>("other")
///         .is_err_and(|err| err.is_construction())
/// );
/// ```
#[derive(Default)]
pub struct ConditionFactories {
    entries: HashMap<&'static str, FactoryEntry>,
}

impl ConditionFactories {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an infallible factory under `tag`.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is already registered.
    pub fn register<A, C, K, F>(&mut self, tag: &'static str, factory: F) -> &mut Self
    where
        A: 'static,
        C: 'static,
        K: Condition<A, C> + 'static,
        F: Fn() -> K + 'static,
    {
        self.register_fallible::<A, C, _>(tag, move || {
            Ok(Box::new(factory()) as BoxedCondition<A, C>)
        })
    }

    /// Registers a factory that may fail, e.g. because it needs resources the
    /// host does not provide.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is already registered.
    pub fn register_fallible<A, C, F>(&mut self, tag: &'static str, factory: F) -> &mut Self
    where
        A: 'static,
        C: 'static,
        F: Fn() -> ForViewResult<BoxedCondition<A, C>> + 'static,
    {
        assert!(
            !self.entries.contains_key(tag),
            "Condition '{tag}' is already registered"
        );
        self.entries.insert(
            tag,
            FactoryEntry {
                signature: signature::<A, C>(),
                factory: Box::new(TypedFactory::<A, C> {
                    make: Box::new(factory),
                }),
            },
        );
        self
    }

    /// Returns `true` if `tag` is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Returns the number of registered tags.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no tags are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the registered tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Creates a fresh condition for `tag`.
    ///
    /// Fails with [`ForViewError::Construction`] if the tag is unknown or the
    /// factory fails, and with [`ForViewError::TypeMismatch`] if the tag was
    /// registered for a different artifact or context type.
    pub fn instantiate<A: 'static, C: 'static>(
        &self,
        tag: &'static str,
    ) -> ForViewResult<BoxedCondition<A, C>> {
        let entry = self.entries.get(tag).ok_or_else(|| {
            ForViewError::construction(
                format!("condition `{tag}`"),
                "no factory is registered for this tag",
            )
        })?;
        let factory = entry
            .factory
            .downcast_ref::<TypedFactory<A, C>>()
            .ok_or_else(|| ForViewError::TypeMismatch {
                tag,
                expected: signature::<A, C>().into(),
                found: entry.signature.into(),
            })?;
        (factory.make)()
    }
}

impl fmt::Debug for ConditionFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.entries.keys().collect();
        tags.sort_unstable();
        f.debug_struct("ConditionFactories")
            .field("tags", &tags)
            .finish()
    }
}

/// Picks the condition named by a property's [`ForViewCondition`] annotation.
///
/// Cloning is cheap; clones share the factory table.
#[derive(Clone, Debug, Default)]
pub struct AttributeSelector {
    factories: Rc<ConditionFactories>,
}

impl AttributeSelector {
    /// Creates a selector over `factories`.
    #[must_use]
    pub fn new(factories: Rc<ConditionFactories>) -> Self {
        Self { factories }
    }

    /// Returns the factory table.
    #[must_use]
    pub fn factories(&self) -> &Rc<ConditionFactories> {
        &self.factories
    }

    /// Returns the tag of the first [`ForViewCondition`] on the property.
    #[must_use]
    pub fn tag_for(proxy: &PropertyProxy) -> Option<&'static str> {
        proxy
            .annotations()
            .first::<ForViewCondition>()
            .map(ForViewCondition::tag)
    }

    /// Instantiates the condition named by the property's annotation.
    ///
    /// Returns `Ok(None)` if the property carries no [`ForViewCondition`].
    pub fn select<A: 'static, C: 'static>(
        &self,
        proxy: &PropertyProxy,
    ) -> ForViewResult<Option<BoxedCondition<A, C>>> {
        let Some(tag) = Self::tag_for(proxy) else {
            return Ok(None);
        };
        debug!(property = proxy.name(), tag, "selecting condition from annotation");
        self.factories.instantiate(tag).map(Some)
    }
}
