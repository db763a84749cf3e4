// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory For View: pick a view artifact for a reflected property.
//!
//! Given a [`PropertyProxy`](understory_reflect::PropertyProxy), this crate
//! chooses what to build for it (an editor widget, a template id, a column
//! descriptor, anything) from a prioritized set of [`Condition`]s.
//!
//! ## Core Concepts
//!
//! - [`Condition`] - an `order`, a `can_build` predicate and a `create` factory
//! - [`ForViewBuilder`] - the registry; [`resolve`](ForViewBuilder::resolve)
//!   probes conditions by ascending order, ties in registration order, and
//!   returns the first accepting condition's artifact
//! - [`ForViewCondition`] - an annotation that names a condition for one
//!   property, used when nothing in the registry matches
//! - [`ForViewSelector`] - the host-facing wrapper carrying binding options
//!
//! "Nothing matched" is `Ok(None)`; errors are reserved for malformed
//! contexts, failing factories and property access failures.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use understory_for_view::{
//!     BuildContext, ConditionFactories, FnCondition, ForViewBuilder, ForViewCondition,
//!     TypeCondition,
//! };
//! use understory_reflect::{ObjectType, PropertyDescriptor, object_ref};
//!
//! #[derive(Debug, PartialEq)]
//! enum Editor {
//!     Text,
//!     Spinner,
//!     Color,
//! }
//!
//! struct Pet {
//!     name: String,
//!     age: u32,
//!     fur: u32,
//! }
//!
//! let mut factories = ConditionFactories::new();
//! factories.register("color", || {
//!     FnCondition::new(|_: &BuildContext| false, |_| Ok(Editor::Color))
//! });
//!
//! let mut builder = ForViewBuilder::<Editor, BuildContext>::with_factories(Rc::new(factories));
//! builder.add(TypeCondition::of::<String>(|_| Ok(Editor::Text)));
//! builder.add(
//!     FnCondition::new(|ctx: &BuildContext| ctx.proxy().name() == "Age", |_| Ok(Editor::Spinner))
//!         .with_order(-1),
//! );
//!
//! let pet_type = ObjectType::new::<Pet>()
//!     .with(PropertyDescriptor::builder::<Pet, String>("Name").getter(|p| p.name.clone()).build())
//!     .with(PropertyDescriptor::builder::<Pet, u32>("Age").getter(|p| p.age).build())
//!     .with(
//!         PropertyDescriptor::builder::<Pet, u32>("Fur")
//!             .getter(|p| p.fur)
//!             .annotate(ForViewCondition::new("color"))
//!             .build(),
//!     );
//!
//! let pet = object_ref(Pet { name: "Rex".into(), age: 3, fur: 0xFF88_6644 });
//! let context = |name: &str| BuildContext::new(pet_type.proxy(&pet, name).unwrap().unwrap());
//!
//! assert_eq!(builder.resolve_default(&context("Name")).unwrap(), Some(Editor::Text));
//! assert_eq!(builder.resolve_default(&context("Age")).unwrap(), Some(Editor::Spinner));
//! assert_eq!(builder.resolve(&context("Fur"), false).unwrap(), None);
//! assert_eq!(builder.resolve(&context("Fur"), true).unwrap(), Some(Editor::Color));
//! ```
//!
//! Conditions may resolve nested properties against the same builder from
//! inside `create`; the registry is only borrowed shared during resolution.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod attribute;
mod builder;
mod condition;
mod context;
pub mod designer;
mod error;
mod selector;

pub use attribute::{AttributeSelector, BoxedCondition, ConditionFactories, ForViewCondition};
pub use builder::{ConditionId, ForViewBuilder};
pub use condition::{Condition, FnCondition, TypeCondition, TypeMatch};
pub use context::{BuildContext, ForViewContext};
pub use error::{ForViewError, ForViewResult};
pub use selector::{
    BindingBuildContext, BindingMode, ForViewSelector, Generated, SelectorOptions,
    UpdateSourceTrigger,
};
