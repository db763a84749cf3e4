// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host-facing selector.
//!
//! [`ForViewSelector`] wraps a shared [`ForViewBuilder`] and turns property
//! proxies into artifacts. It owns the binding options that every context it
//! creates carries, and an optional filter that skips properties which need
//! no artifact at all.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, trace};
use understory_reflect::PropertyProxy;

use crate::builder::ForViewBuilder;
use crate::context::ForViewContext;
use crate::error::ForViewResult;

/// Direction of the binding a generated view should establish.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BindingMode {
    /// Source and view update each other.
    #[default]
    TwoWay,
    /// The view follows the source.
    OneWay,
    /// The view reads the source once.
    OneTime,
    /// The source follows the view.
    OneWayToSource,
    /// Whatever the view's own default is.
    Default,
}

/// When a view writes back to its source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum UpdateSourceTrigger {
    /// Whatever the view's own default is.
    #[default]
    Default,
    /// On every change.
    PropertyChanged,
    /// When the view loses focus.
    LostFocus,
    /// Only when the host asks.
    Explicit,
}

/// Options applied to every context a [`ForViewSelector`] creates.
///
/// # Example
///
/// ```rust
/// use understory_for_view::{BindingMode, SelectorOptions, UpdateSourceTrigger};
///
/// let options = SelectorOptions::default()
///     .binding_mode(BindingMode::OneWay)
///     .update_trigger(UpdateSourceTrigger::LostFocus)
///     .force_attribute_fallback(true);
///
/// assert_eq!(options.get_binding_mode(), BindingMode::OneWay);
/// assert!(!options.get_notify_visitor());
/// assert!(options.get_force_attribute_fallback());
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorOptions {
    binding_mode: BindingMode,
    update_trigger: UpdateSourceTrigger,
    notify_visitor: bool,
    force_attribute_fallback: bool,
}

impl SelectorOptions {
    /// Sets the binding mode. Defaults to [`BindingMode::TwoWay`].
    #[must_use]
    pub const fn binding_mode(mut self, mode: BindingMode) -> Self {
        self.binding_mode = mode;
        self
    }

    /// Sets the update trigger. Defaults to [`UpdateSourceTrigger::Default`].
    #[must_use]
    pub const fn update_trigger(mut self, trigger: UpdateSourceTrigger) -> Self {
        self.update_trigger = trigger;
        self
    }

    /// Sets whether generated views notify a visitor. Defaults to `false`.
    #[must_use]
    pub const fn notify_visitor(mut self, notify: bool) -> Self {
        self.notify_visitor = notify;
        self
    }

    /// Sets whether resolution may fall back to annotations. Defaults to
    /// `false`.
    #[must_use]
    pub const fn force_attribute_fallback(mut self, force: bool) -> Self {
        self.force_attribute_fallback = force;
        self
    }

    /// Returns the binding mode.
    #[must_use]
    #[inline]
    pub const fn get_binding_mode(&self) -> BindingMode {
        self.binding_mode
    }

    /// Returns the update trigger.
    #[must_use]
    #[inline]
    pub const fn get_update_trigger(&self) -> UpdateSourceTrigger {
        self.update_trigger
    }

    /// Returns whether generated views notify a visitor.
    #[must_use]
    #[inline]
    pub const fn get_notify_visitor(&self) -> bool {
        self.notify_visitor
    }

    /// Returns whether resolution may fall back to annotations.
    #[must_use]
    #[inline]
    pub const fn get_force_attribute_fallback(&self) -> bool {
        self.force_attribute_fallback
    }
}

/// Build context created by [`ForViewSelector`].
#[derive(Clone, Debug)]
pub struct BindingBuildContext {
    proxy: PropertyProxy,
    binding_mode: BindingMode,
    update_trigger: UpdateSourceTrigger,
    notify_visitor: bool,
}

impl BindingBuildContext {
    /// Creates a context for `proxy` with the binding fields taken from
    /// `options`.
    #[must_use]
    pub fn new(proxy: PropertyProxy, options: &SelectorOptions) -> Self {
        Self {
            proxy,
            binding_mode: options.binding_mode,
            update_trigger: options.update_trigger,
            notify_visitor: options.notify_visitor,
        }
    }

    /// Returns the property proxy.
    #[must_use]
    #[inline]
    pub fn proxy(&self) -> &PropertyProxy {
        &self.proxy
    }

    /// Returns the binding mode.
    #[must_use]
    #[inline]
    pub fn binding_mode(&self) -> BindingMode {
        self.binding_mode
    }

    /// Returns the update trigger.
    #[must_use]
    #[inline]
    pub fn update_trigger(&self) -> UpdateSourceTrigger {
        self.update_trigger
    }

    /// Returns whether the generated view notifies a visitor.
    #[must_use]
    #[inline]
    pub fn notify_visitor(&self) -> bool {
        self.notify_visitor
    }
}

impl ForViewContext for BindingBuildContext {
    fn property_proxy(&self) -> Option<&PropertyProxy> {
        Some(&self.proxy)
    }
}

/// An artifact produced by [`ForViewSelector::generate`], with the property it
/// was built for.
#[derive(Clone, Debug)]
pub struct Generated<A> {
    /// The property.
    pub proxy: PropertyProxy,
    /// The artifact built for it.
    pub artifact: A,
}

type Filter = Box<dyn Fn(&PropertyProxy) -> bool>;

/// Resolves property proxies against a shared condition set.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
///
/// use understory_for_view::{
///     BindingBuildContext, BindingMode, FnCondition, ForViewBuilder, ForViewSelector,
///     SelectorOptions,
/// };
/// use understory_reflect::{ObjectType, PropertyDescriptor, object_ref};
///
/// struct Login {
///     user: String,
///     token: String,
/// }
///
/// let login_type = ObjectType::new::<Login>()
///     .with(PropertyDescriptor::builder::<Login, String>("User").getter(|l| l.user.clone()).build())
///     .with(PropertyDescriptor::builder::<Login, String>("Token").getter(|l| l.token.clone()).build());
///
/// let mut builder = ForViewBuilder::<&str, BindingBuildContext>::new();
/// builder.add(FnCondition::new(
///     |ctx: &BindingBuildContext| ctx.binding_mode() == BindingMode::OneWay,
///     |_| Ok("label"),
/// ));
///
/// let selector = ForViewSelector::new(Rc::new(builder))
///     .with_options(SelectorOptions::default().binding_mode(BindingMode::OneWay))
///     .with_filter(|proxy| proxy.name() != "Token");
///
/// let login = object_ref(Login { user: "ada".into(), token: "secret".into() });
/// let generated = selector.generate(login_type.proxies(&login).unwrap()).unwrap();
///
/// assert_eq!(generated.len(), 1);
/// assert_eq!(generated[0].proxy.name(), "User");
/// assert_eq!(generated[0].artifact, "label");
/// ```
pub struct ForViewSelector<A> {
    builder: Rc<ForViewBuilder<A, BindingBuildContext>>,
    options: SelectorOptions,
    needs_build: Option<Filter>,
}

impl<A: 'static> ForViewSelector<A> {
    /// Creates a selector with default options and no filter.
    #[must_use]
    pub fn new(builder: Rc<ForViewBuilder<A, BindingBuildContext>>) -> Self {
        Self {
            builder,
            options: SelectorOptions::default(),
            needs_build: None,
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: SelectorOptions) -> Self {
        self.options = options;
        self
    }

    /// Installs a filter; properties it rejects are skipped.
    #[must_use]
    pub fn with_filter(mut self, needs_build: impl Fn(&PropertyProxy) -> bool + 'static) -> Self {
        self.needs_build = Some(Box::new(needs_build));
        self
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    /// Returns the shared condition set.
    #[must_use]
    pub fn builder(&self) -> &Rc<ForViewBuilder<A, BindingBuildContext>> {
        &self.builder
    }

    /// Returns `true` if `proxy` should be resolved at all.
    #[must_use]
    pub fn needs_build(&self, proxy: &PropertyProxy) -> bool {
        self.needs_build.as_ref().is_none_or(|filter| filter(proxy))
    }

    /// Creates the context the selector resolves `proxy` with.
    #[must_use]
    pub fn create_context(&self, proxy: PropertyProxy) -> BindingBuildContext {
        BindingBuildContext::new(proxy, &self.options)
    }

    /// Resolves one property.
    ///
    /// Returns `Ok(None)` if the filter rejects the property or nothing
    /// matches.
    pub fn select(&self, proxy: PropertyProxy) -> ForViewResult<Option<A>> {
        if !self.needs_build(&proxy) {
            trace!(property = proxy.name(), "filtered out");
            return Ok(None);
        }
        let context = self.create_context(proxy);
        self.builder
            .resolve(&context, self.options.force_attribute_fallback)
    }

    /// Resolves every property in `proxies`, keeping those that produced an
    /// artifact.
    ///
    /// Stops at the first error.
    pub fn generate<I>(&self, proxies: I) -> ForViewResult<Vec<Generated<A>>>
    where
        I: IntoIterator<Item = PropertyProxy>,
    {
        let mut generated = Vec::new();
        for proxy in proxies {
            if let Some(artifact) = self.select(proxy.clone())? {
                generated.push(Generated { proxy, artifact });
            }
        }
        debug!(count = generated.len(), "generated artifacts");
        Ok(generated)
    }
}

impl<A> fmt::Debug for ForViewSelector<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForViewSelector")
            .field("builder", &self.builder)
            .field("options", &self.options)
            .field("filtered", &self.needs_build.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{ConditionFactories, ForViewCondition};
    use crate::condition::FnCondition;
    use understory_reflect::{PropertyDescriptor, object_ref};

    struct Profile {
        bio: u8,
    }

    fn proxy(name: &'static str, tag: Option<&'static str>) -> PropertyProxy {
        let mut descriptor =
            PropertyDescriptor::builder::<Profile, u8>(name).getter(|p| p.bio);
        if let Some(tag) = tag {
            descriptor = descriptor.annotate(ForViewCondition::new(tag));
        }
        PropertyProxy::new(object_ref(Profile { bio: 0 }), descriptor.build()).unwrap()
    }

    #[test]
    fn default_options() {
        let options = SelectorOptions::default();
        assert_eq!(options.get_binding_mode(), BindingMode::TwoWay);
        assert_eq!(options.get_update_trigger(), UpdateSourceTrigger::Default);
        assert!(!options.get_notify_visitor());
        assert!(!options.get_force_attribute_fallback());
    }

    #[test]
    fn context_carries_options() {
        let selector = ForViewSelector::<u8>::new(Rc::default()).with_options(
            SelectorOptions::default()
                .update_trigger(UpdateSourceTrigger::Explicit)
                .notify_visitor(true),
        );
        let context = selector.create_context(proxy("Bio", None));
        assert_eq!(context.binding_mode(), BindingMode::TwoWay);
        assert_eq!(context.update_trigger(), UpdateSourceTrigger::Explicit);
        assert!(context.notify_visitor());
        assert_eq!(context.proxy().name(), "Bio");
    }

    #[test]
    fn fallback_follows_options() {
        let mut factories = ConditionFactories::new();
        factories.register("rich-text", || {
            FnCondition::new(|_: &BindingBuildContext| false, |_| Ok(9_u8))
        });
        let builder = Rc::new(ForViewBuilder::with_factories(Rc::new(factories)));

        let plain = ForViewSelector::<u8>::new(builder.clone());
        assert_eq!(plain.select(proxy("Bio", Some("rich-text"))), Ok(None));

        let forced = ForViewSelector::new(builder)
            .with_options(SelectorOptions::default().force_attribute_fallback(true));
        assert_eq!(forced.select(proxy("Bio", Some("rich-text"))), Ok(Some(9)));
        assert_eq!(forced.select(proxy("Bio", None)), Ok(None));
    }

    #[test]
    fn filter_skips_resolution() {
        let mut builder = ForViewBuilder::new();
        builder.add(FnCondition::new(|_: &BindingBuildContext| true, |_| Ok(1_u8)));
        let selector =
            ForViewSelector::new(Rc::new(builder)).with_filter(|proxy| proxy.name() == "Bio");

        assert!(selector.needs_build(&proxy("Bio", None)));
        assert_eq!(selector.select(proxy("Bio", None)), Ok(Some(1)));
        assert_eq!(selector.select(proxy("Avatar", None)), Ok(None));
    }

    #[test]
    fn generate_skips_no_match_and_stops_on_error() {
        let mut builder = ForViewBuilder::new();
        builder.add(FnCondition::new(
            |ctx: &BindingBuildContext| ctx.proxy().name() == "Bio",
            |_| Ok(1_u8),
        ));
        builder.add(FnCondition::new(
            |ctx: &BindingBuildContext| ctx.proxy().name() == "Broken",
            |_| Err(crate::ForViewError::construction("editor", "unavailable")),
        ));
        let selector = ForViewSelector::new(Rc::new(builder));

        let generated = selector
            .generate([proxy("Bio", None), proxy("Avatar", None)])
            .unwrap();
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].artifact, 1);

        let err = selector
            .generate([proxy("Bio", None), proxy("Broken", None)])
            .unwrap_err();
        assert!(err.is_construction());
    }
}
