// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conditions: prioritized predicate + factory pairs.

use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use understory_reflect::{TypeDescriptor, TypeKind};

use crate::context::ForViewContext;
use crate::error::ForViewResult;

/// A rule that may produce an artifact of type `A` for a context `C`.
///
/// The registry calls [`can_build`](Self::can_build) on conditions in
/// priority order and [`create`](Self::create) on the first one that accepts.
///
/// Implementations must keep `can_build` free of side effects and idempotent:
/// the registry may probe many conditions for one context. `create` is only
/// called after `can_build` returned `true` for the same context, except when
/// the condition was selected by an attribute override, which calls `create`
/// directly.
pub trait Condition<A, C> {
    /// Resolution priority. Lower runs first; ties keep registration order.
    fn order(&self) -> i32 {
        0
    }

    /// Returns `true` if this condition builds an artifact for `context`.
    fn can_build(&self, context: &C) -> bool;

    /// Builds the artifact.
    ///
    /// Errors are returned to the caller of `resolve` unchanged; the registry
    /// does not fall through to the next condition.
    fn create(&self, context: &C) -> ForViewResult<A>;
}

impl<A, C, T: Condition<A, C> + ?Sized> Condition<A, C> for Box<T> {
    fn order(&self) -> i32 {
        (**self).order()
    }

    fn can_build(&self, context: &C) -> bool {
        (**self).can_build(context)
    }

    fn create(&self, context: &C) -> ForViewResult<A> {
        (**self).create(context)
    }
}

type Predicate<C> = Box<dyn Fn(&C) -> bool>;
type Factory<A, C> = Box<dyn Fn(&C) -> ForViewResult<A>>;

/// A condition made from two closures.
///
/// # Example
///
/// ```rust
/// use understory_for_view::{BuildContext, Condition, FnCondition};
/// use understory_reflect::{PropertyDescriptor, PropertyProxy, object_ref};
///
/// let by_name = FnCondition::new(
///     |ctx: &BuildContext| ctx.proxy().name() == "Name",
///     |_| Ok("text-box"),
/// )
/// .with_order(10);
///
/// let proxy = PropertyProxy::new(
///     object_ref(0_u8),
///     PropertyDescriptor::builder::<u8, u8>("Name").build(),
/// )
/// .unwrap();
/// let ctx = BuildContext::new(proxy);
///
/// assert_eq!(by_name.order(), 10);
/// assert!(by_name.can_build(&ctx));
/// assert_eq!(by_name.create(&ctx), Ok("text-box"));
/// ```
pub struct FnCondition<A, C> {
    order: i32,
    can_build: Predicate<C>,
    create: Factory<A, C>,
}

impl<A, C> FnCondition<A, C> {
    /// Creates a condition with order `0`.
    pub fn new<P, F>(can_build: P, create: F) -> Self
    where
        P: Fn(&C) -> bool + 'static,
        F: Fn(&C) -> ForViewResult<A> + 'static,
    {
        Self {
            order: 0,
            can_build: Box::new(can_build),
            create: Box::new(create),
        }
    }

    /// Sets the resolution order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl<A, C> Condition<A, C> for FnCondition<A, C> {
    fn order(&self) -> i32 {
        self.order
    }

    fn can_build(&self, context: &C) -> bool {
        (self.can_build)(context)
    }

    fn create(&self, context: &C) -> ForViewResult<A> {
        (self.create)(context)
    }
}

impl<A, C> fmt::Debug for FnCondition<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCondition")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Which declared property types a [`TypeCondition`] accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeMatch {
    /// Exactly this type.
    Exact(TypeId),
    /// Any type of this kind. Enum kinds match any enum regardless of variants.
    Kind(TypeKind),
    /// Any integer or floating point type.
    Numeric,
}

impl TypeMatch {
    /// Matches exactly `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Exact(TypeId::of::<T>())
    }

    /// Matches any enum.
    #[must_use]
    pub const fn any_enum() -> Self {
        Self::Kind(TypeKind::Enum(&[]))
    }

    /// Returns `true` if `declared` is accepted.
    #[must_use]
    pub fn matches(&self, declared: &TypeDescriptor) -> bool {
        match *self {
            Self::Exact(id) => declared.id() == id,
            Self::Kind(TypeKind::Enum(_)) => declared.is_enum(),
            Self::Kind(kind) => declared.kind() == kind,
            Self::Numeric => declared.is_numeric(),
        }
    }
}

/// A condition that matches on the property's declared type.
///
/// # Example
///
/// ```rust
/// use understory_for_view::{BuildContext, Condition, TypeCondition, TypeMatch};
/// use understory_reflect::{PropertyDescriptor, PropertyProxy, object_ref};
///
/// struct Item {
///     flag: bool,
/// }
///
/// let check_box = TypeCondition::of::<bool>(|_: &BuildContext| Ok("check-box"));
/// let number = TypeCondition::new(TypeMatch::Numeric, |_: &BuildContext| Ok("spinner"));
///
/// let proxy = PropertyProxy::new(
///     object_ref(Item { flag: true }),
///     PropertyDescriptor::builder::<Item, bool>("Flag").getter(|i| i.flag).build(),
/// )
/// .unwrap();
/// let ctx = BuildContext::new(proxy);
///
/// assert!(check_box.can_build(&ctx));
/// assert!(!number.can_build(&ctx));
/// ```
pub struct TypeCondition<A, C> {
    order: i32,
    matcher: TypeMatch,
    create: Factory<A, C>,
}

impl<A, C> TypeCondition<A, C> {
    /// Creates a condition for declared types accepted by `matcher`.
    pub fn new<F>(matcher: TypeMatch, create: F) -> Self
    where
        F: Fn(&C) -> ForViewResult<A> + 'static,
    {
        Self {
            order: 0,
            matcher,
            create: Box::new(create),
        }
    }

    /// Creates a condition for properties declared as exactly `T`.
    pub fn of<T: ?Sized + 'static>(create: impl Fn(&C) -> ForViewResult<A> + 'static) -> Self {
        Self::new(TypeMatch::of::<T>(), create)
    }

    /// Sets the resolution order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Returns the type matcher.
    #[must_use]
    pub fn matcher(&self) -> TypeMatch {
        self.matcher
    }
}

impl<A, C: ForViewContext> Condition<A, C> for TypeCondition<A, C> {
    fn order(&self) -> i32 {
        self.order
    }

    fn can_build(&self, context: &C) -> bool {
        context
            .property_proxy()
            .is_some_and(|proxy| self.matcher.matches(&proxy.value_type()))
    }

    fn create(&self, context: &C) -> ForViewResult<A> {
        (self.create)(context)
    }
}

impl<A, C> fmt::Debug for TypeCondition<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCondition")
            .field("order", &self.order)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}
