// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build contexts.
//!
//! A build context carries the [`PropertyProxy`] being dispatched plus any
//! state the host wants conditions to see. It is created for one resolution
//! and discarded afterwards.

use understory_reflect::PropertyProxy;

use crate::error::ForViewError;

/// Access to the property proxy of a build context.
///
/// Host-defined contexts implement this to be usable with
/// [`ForViewBuilder`](crate::ForViewBuilder). Returning `None` makes
/// resolution fail with [`ForViewError::InvalidArgument`].
pub trait ForViewContext {
    /// Returns the property being dispatched.
    fn property_proxy(&self) -> Option<&PropertyProxy>;
}

/// The plain build context: a property proxy and nothing else.
///
/// # Example
///
/// ```rust
/// use understory_for_view::{BuildContext, ForViewContext};
/// use understory_reflect::{PropertyDescriptor, PropertyProxy, object_ref};
///
/// let proxy = PropertyProxy::new(
///     object_ref(0_u8),
///     PropertyDescriptor::builder::<u8, u8>("Value").getter(|v| *v).build(),
/// )
/// .unwrap();
///
/// let ctx = BuildContext::new(proxy);
/// assert_eq!(ctx.proxy().name(), "Value");
/// assert!(ctx.property_proxy().is_some());
///
/// assert!(BuildContext::try_from(None::<PropertyProxy>).unwrap_err().is_invalid_argument());
/// ```
#[derive(Clone, Debug)]
pub struct BuildContext {
    proxy: PropertyProxy,
}

impl BuildContext {
    /// Creates a context for `proxy`.
    #[must_use]
    pub fn new(proxy: PropertyProxy) -> Self {
        Self { proxy }
    }

    /// Returns the property proxy.
    #[must_use]
    #[inline]
    pub fn proxy(&self) -> &PropertyProxy {
        &self.proxy
    }

    /// Consumes the context and returns its proxy.
    #[must_use]
    pub fn into_proxy(self) -> PropertyProxy {
        self.proxy
    }
}

impl TryFrom<Option<PropertyProxy>> for BuildContext {
    type Error = ForViewError;

    fn try_from(proxy: Option<PropertyProxy>) -> Result<Self, Self::Error> {
        proxy
            .map(Self::new)
            .ok_or(ForViewError::InvalidArgument("build context requires a property proxy"))
    }
}

impl From<PropertyProxy> for BuildContext {
    fn from(proxy: PropertyProxy) -> Self {
        Self::new(proxy)
    }
}

impl ForViewContext for BuildContext {
    fn property_proxy(&self) -> Option<&PropertyProxy> {
        Some(&self.proxy)
    }
}
