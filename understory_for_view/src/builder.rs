// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The condition registry and resolution algorithm.
//!
//! [`ForViewBuilder`] keeps conditions in registration order and resolves a
//! context in two tiers:
//!
//! 1. Conditions are probed by ascending [`order`](Condition::order), ties
//!    broken by registration order. The first whose
//!    [`can_build`](Condition::can_build) accepts has its
//!    [`create`](Condition::create) called, and its result is returned. Nothing
//!    after it is consulted.
//! 2. If none accepts and attribute fallback is allowed, the property's
//!    [`ForViewCondition`](crate::ForViewCondition) annotation (if any) names a
//!    condition that is instantiated and whose `create` is called without
//!    asking `can_build`.
//!
//! Otherwise the result is `Ok(None)`: no match, which is not an error.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::attribute::{AttributeSelector, BoxedCondition, ConditionFactories};
use crate::condition::Condition;
use crate::context::ForViewContext;
use crate::error::{ForViewError, ForViewResult};

/// Handle to a condition registered in a [`ForViewBuilder`].
///
/// Ids increase with registration and are never reused by the same builder.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConditionId(u32);

impl ConditionId {
    /// Returns the registration index of this id.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

struct Entry<A, C> {
    id: ConditionId,
    condition: BoxedCondition<A, C>,
}

/// An ordered, mutable set of conditions producing artifacts of type `A` from
/// contexts of type `C`.
///
/// Mutation requires `&mut self` and resolution takes `&self`, so the set
/// cannot change while a resolution is in progress. Conditions may resolve
/// nested properties against the same builder from inside `can_build` or
/// `create`.
///
/// # Example
///
/// ```rust
/// use understory_for_view::{BuildContext, FnCondition, ForViewBuilder};
/// use understory_reflect::{ObjectType, PropertyDescriptor, object_ref};
///
/// #[derive(Default)]
/// struct Student {
///     name: String,
///     age: u32,
///     address: String,
/// }
///
/// let student_type = ObjectType::new::<Student>()
///     .with(PropertyDescriptor::builder::<Student, String>("Name").getter(|s| s.name.clone()).build())
///     .with(PropertyDescriptor::builder::<Student, u32>("Age").getter(|s| s.age).build())
///     .with(PropertyDescriptor::builder::<Student, String>("Address").getter(|s| s.address.clone()).build());
///
/// let mut builder = ForViewBuilder::<i32, BuildContext>::new();
/// builder.add(
///     FnCondition::new(|ctx: &BuildContext| ctx.proxy().name() == "Age", |_| Ok(2)).with_order(1),
/// );
/// builder.add(
///     FnCondition::new(|ctx: &BuildContext| ctx.proxy().name() == "Name", |_| Ok(1)).with_order(2),
/// );
///
/// let student = object_ref(Student::default());
/// let resolve = |name: &str| {
///     let proxy = student_type.proxy(&student, name).unwrap().unwrap();
///     builder.resolve(&BuildContext::new(proxy), false).unwrap()
/// };
///
/// assert_eq!(resolve("Name"), Some(1));
/// assert_eq!(resolve("Age"), Some(2));
/// assert_eq!(resolve("Address"), None);
/// ```
pub struct ForViewBuilder<A, C> {
    entries: Vec<Entry<A, C>>,
    next_id: u32,
    attributes: AttributeSelector,
}

impl<A, C> ForViewBuilder<A, C> {
    /// The attribute-fallback setting used by [`resolve_default`](Self::resolve_default).
    pub const DEFAULT_ATTRIBUTE_FALLBACK: bool = true;

    /// Creates an empty builder with an empty factory table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_attributes(AttributeSelector::default())
    }

    /// Creates an empty builder that resolves annotations against `factories`.
    #[must_use]
    pub fn with_factories(factories: Rc<ConditionFactories>) -> Self {
        Self::with_attributes(AttributeSelector::new(factories))
    }

    /// Creates an empty builder that uses `attributes` for the fallback tier.
    #[must_use]
    pub fn with_attributes(attributes: AttributeSelector) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            attributes,
        }
    }

    /// Returns the attribute selector used for the fallback tier.
    #[must_use]
    pub fn attributes(&self) -> &AttributeSelector {
        &self.attributes
    }

    /// Registers a condition.
    pub fn add(&mut self, condition: impl Condition<A, C> + 'static) -> ConditionId {
        self.add_boxed(Box::new(condition))
    }

    /// Registers an already boxed condition.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` conditions are registered over the
    /// builder's lifetime.
    pub fn add_boxed(&mut self, condition: BoxedCondition<A, C>) -> ConditionId {
        assert!(self.next_id < u32::MAX, "too many conditions registered");
        let id = ConditionId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, condition });
        id
    }

    /// Registers several conditions, in iteration order.
    pub fn add_range<I>(&mut self, conditions: I) -> Vec<ConditionId>
    where
        I: IntoIterator<Item = BoxedCondition<A, C>>,
    {
        conditions
            .into_iter()
            .map(|condition| self.add_boxed(condition))
            .collect()
    }

    /// Unregisters a condition and returns it.
    pub fn remove(&mut self, id: ConditionId) -> Option<BoxedCondition<A, C>> {
        let index = self.position(id)?;
        Some(self.entries.remove(index).condition)
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: ConditionId) -> bool {
        self.position(id).is_some()
    }

    /// Returns the condition registered as `id`.
    #[must_use]
    pub fn get(&self, id: ConditionId) -> Option<&dyn Condition<A, C>> {
        self.position(id)
            .map(|index| &*self.entries[index].condition)
    }

    /// Removes every condition.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of registered conditions.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no conditions are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the conditions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ConditionId, &dyn Condition<A, C>)> {
        self.entries
            .iter()
            .map(|entry| (entry.id, &*entry.condition))
    }

    /// Returns the ids in resolution order: ascending `order`, then
    /// registration order.
    #[must_use]
    pub fn resolution_order(&self) -> Vec<ConditionId> {
        self.sorted()
            .into_iter()
            .map(|(_, index)| self.entries[index].id)
            .collect()
    }

    fn position(&self, id: ConditionId) -> Option<usize> {
        // Entries are kept in id order.
        self.entries.binary_search_by_key(&id, |entry| entry.id).ok()
    }

    fn sorted(&self) -> SmallVec<[(i32, usize); 16]> {
        let mut sorted: SmallVec<[(i32, usize); 16]> = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.condition.order(), index))
            .collect();
        sorted.sort_unstable();
        sorted
    }
}

impl<A: 'static, C: ForViewContext + 'static> ForViewBuilder<A, C> {
    /// Resolves `context` to an artifact.
    ///
    /// Returns `Ok(None)` when no registered condition accepts the context and
    /// either `allow_attribute_fallback` is `false` or the property carries no
    /// [`ForViewCondition`](crate::ForViewCondition).
    ///
    /// # Errors
    ///
    /// - [`ForViewError::InvalidArgument`] if the context has no property proxy.
    /// - Whatever the selected condition's `create` returns.
    /// - [`ForViewError::Construction`] or [`ForViewError::TypeMismatch`] if
    ///   the annotated condition cannot be instantiated.
    pub fn resolve(&self, context: &C, allow_attribute_fallback: bool) -> ForViewResult<Option<A>> {
        let Some(proxy) = context.property_proxy() else {
            return Err(ForViewError::InvalidArgument(
                "build context has no property proxy",
            ));
        };

        for (order, index) in self.sorted() {
            let entry = &self.entries[index];
            if entry.condition.can_build(context) {
                debug!(
                    property = proxy.name(),
                    condition = entry.id.index(),
                    order,
                    "condition matched"
                );
                return entry.condition.create(context).map(Some);
            }
            trace!(
                property = proxy.name(),
                condition = entry.id.index(),
                "condition declined"
            );
        }

        if !allow_attribute_fallback {
            debug!(property = proxy.name(), "no condition matched");
            return Ok(None);
        }

        match self.attributes.select::<A, C>(proxy)? {
            Some(condition) => condition.create(context).map(Some),
            None => {
                debug!(property = proxy.name(), "no condition or annotation matched");
                Ok(None)
            }
        }
    }

    /// Resolves with [`DEFAULT_ATTRIBUTE_FALLBACK`](Self::DEFAULT_ATTRIBUTE_FALLBACK),
    /// i.e. with attribute fallback enabled.
    pub fn resolve_default(&self, context: &C) -> ForViewResult<Option<A>> {
        self.resolve(context, Self::DEFAULT_ATTRIBUTE_FALLBACK)
    }
}

impl<A, C> Default for ForViewBuilder<A, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, C> Extend<BoxedCondition<A, C>> for ForViewBuilder<A, C> {
    fn extend<I: IntoIterator<Item = BoxedCondition<A, C>>>(&mut self, iter: I) {
        for condition in iter {
            self.add_boxed(condition);
        }
    }
}

impl<A, C> fmt::Debug for ForViewBuilder<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForViewBuilder")
            .field(
                "conditions",
                &self
                    .entries
                    .iter()
                    .map(|entry| (entry.id, entry.condition.order()))
                    .collect::<Vec<_>>(),
            )
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::ForViewCondition;
    use crate::condition::FnCondition;
    use crate::context::BuildContext;
    use alloc::vec;
    use core::cell::Cell;
    use understory_reflect::{PropertyDescriptor, PropertyProxy, object_ref};

    struct Student {
        name: u8,
    }

    fn ctx(name: &'static str) -> BuildContext {
        let descriptor = PropertyDescriptor::builder::<Student, u8>(name)
            .getter(|s| s.name)
            .build();
        BuildContext::new(PropertyProxy::new(object_ref(Student { name: 0 }), descriptor).unwrap())
    }

    fn named(name: &'static str, artifact: i32) -> FnCondition<i32, BuildContext> {
        FnCondition::new(move |c: &BuildContext| c.proxy().name() == name, move |_| Ok(artifact))
    }

    fn always(artifact: i32) -> FnCondition<i32, BuildContext> {
        FnCondition::new(|_: &BuildContext| true, move |_| Ok(artifact))
    }

    #[test]
    fn empty_builder_has_no_match() {
        let builder = ForViewBuilder::<i32, BuildContext>::new();
        assert!(builder.is_empty());
        assert_eq!(builder.resolve(&ctx("Name"), false), Ok(None));
        assert_eq!(builder.resolve_default(&ctx("Name")), Ok(None));
    }

    #[test]
    fn lowest_order_wins() {
        let mut builder = ForViewBuilder::new();
        builder.add(always(30).with_order(3));
        builder.add(always(10).with_order(1));
        builder.add(always(20).with_order(2));

        assert_eq!(builder.resolve(&ctx("Name"), false), Ok(Some(10)));
    }

    #[test]
    fn equal_order_keeps_registration_order() {
        let mut builder = ForViewBuilder::new();
        let first = builder.add(always(1));
        let second = builder.add(always(2));
        builder.add(always(0).with_order(5));

        for _ in 0..3 {
            assert_eq!(builder.resolve(&ctx("Name"), false), Ok(Some(1)));
        }
        assert_eq!(&builder.resolution_order()[..2], &[first, second]);

        builder.remove(first);
        assert_eq!(builder.resolve(&ctx("Name"), false), Ok(Some(2)));
    }

    #[test]
    fn negative_orders_run_first() {
        let mut builder = ForViewBuilder::new();
        builder.add(always(1));
        builder.add(always(2).with_order(-1));
        assert_eq!(builder.resolve(&ctx("Name"), false), Ok(Some(2)));
    }

    #[test]
    fn short_circuits_after_match() {
        let probes = Rc::new(Cell::new(0_u32));
        let creates = Rc::new(Cell::new(0_u32));

        let counted = |order: i32, accept: bool, artifact: i32| {
            let probes = probes.clone();
            let creates = creates.clone();
            FnCondition::new(
                move |_: &BuildContext| {
                    probes.set(probes.get() + 1);
                    accept
                },
                move |_| {
                    creates.set(creates.get() + 1);
                    Ok(artifact)
                },
            )
            .with_order(order)
        };

        let mut builder = ForViewBuilder::new();
        builder.add(counted(1, false, 1));
        builder.add(counted(2, true, 2));
        builder.add(counted(3, true, 3));
        builder.add(counted(4, true, 4));

        assert_eq!(builder.resolve(&ctx("Name"), true), Ok(Some(2)));
        assert_eq!(probes.get(), 2);
        assert_eq!(creates.get(), 1);
    }

    #[test]
    fn create_error_propagates_without_fallthrough() {
        let mut builder = ForViewBuilder::new();
        builder.add(FnCondition::new(
            |_: &BuildContext| true,
            |_| Err(ForViewError::construction("slider", "no range")),
        ));
        builder.add(always(2).with_order(1));

        assert_eq!(
            builder.resolve(&ctx("Name"), true),
            Err(ForViewError::construction("slider", "no range"))
        );
    }

    #[test]
    fn missing_proxy_is_invalid_argument() {
        struct Detached;
        impl ForViewContext for Detached {
            fn property_proxy(&self) -> Option<&PropertyProxy> {
                None
            }
        }

        let mut builder = ForViewBuilder::<i32, Detached>::new();
        builder.add(FnCondition::new(|_: &Detached| true, |_| Ok(1)));

        for allow in [false, true] {
            let err = builder.resolve(&Detached, allow).unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn attribute_fallback_only_without_match_and_when_allowed() {
        let mut factories = ConditionFactories::new();
        factories.register("never", || {
            FnCondition::new(|_: &BuildContext| false, |_| Ok(123))
        });
        let mut builder = ForViewBuilder::with_factories(Rc::new(factories));

        let descriptor = PropertyDescriptor::builder::<Student, u8>("X")
            .getter(|s| s.name)
            .annotate(ForViewCondition::new("never"))
            .build();
        let tagged =
            BuildContext::new(PropertyProxy::new(object_ref(Student { name: 0 }), descriptor).unwrap());

        assert_eq!(builder.resolve(&tagged, false), Ok(None));
        assert_eq!(builder.resolve(&tagged, true), Ok(Some(123)));
        assert_eq!(builder.resolve_default(&tagged), Ok(Some(123)));

        builder.add(named("X", 7));
        assert_eq!(builder.resolve(&tagged, true), Ok(Some(7)));
    }

    #[test]
    fn unknown_annotation_tag_is_construction_error() {
        let builder = ForViewBuilder::<i32, BuildContext>::new();
        let descriptor = PropertyDescriptor::builder::<Student, u8>("X")
            .annotate(ForViewCondition::new("missing"))
            .build();
        let tagged =
            BuildContext::new(PropertyProxy::new(object_ref(Student { name: 0 }), descriptor).unwrap());

        assert!(builder.resolve(&tagged, true).unwrap_err().is_construction());
        assert_eq!(builder.resolve(&tagged, false), Ok(None));
    }

    #[test]
    fn registry_mutation() {
        let mut builder = ForViewBuilder::new();
        let ids = builder.add_range(vec![
            Box::new(named("Name", 1)) as BoxedCondition<i32, BuildContext>,
            Box::new(named("Age", 2)),
        ]);
        assert_eq!(builder.len(), 2);
        assert!(builder.contains(ids[0]));
        assert_eq!(builder.get(ids[1]).map(|c| c.order()), Some(0));

        let removed = builder.remove(ids[0]).unwrap();
        assert!(removed.can_build(&ctx("Name")));
        assert!(!builder.contains(ids[0]));
        assert!(builder.remove(ids[0]).is_none());

        let again = builder.add(named("Name", 1));
        assert!(again > ids[1]);
        assert_eq!(
            builder.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            [ids[1], again]
        );

        builder.clear();
        assert!(builder.is_empty());
    }

    #[test]
    fn extend_appends() {
        let mut builder = ForViewBuilder::<i32, BuildContext>::new();
        builder.extend([Box::new(always(4)) as BoxedCondition<i32, BuildContext>]);
        assert_eq!(builder.resolve(&ctx("Name"), false), Ok(Some(4)));
    }

    #[test]
    fn nested_resolution_from_create() {
        let builder = Rc::new(core::cell::RefCell::new(ForViewBuilder::<i32, BuildContext>::new()));
        let inner = Rc::downgrade(&builder);
        builder.borrow_mut().add(named("Age", 40));
        builder.borrow_mut().add(FnCondition::new(
            |c: &BuildContext| c.proxy().name() == "Name",
            move |_| {
                let builder = inner.upgrade().expect("builder alive");
                let nested = builder.borrow().resolve(&ctx("Age"), false)?;
                Ok(nested.unwrap_or_default() + 1)
            },
        ));

        let result = builder.borrow().resolve(&ctx("Name"), false);
        assert_eq!(result, Ok(Some(41)));
    }
}
