// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Reflect: property descriptors and proxies.
//!
//! This crate describes the properties of host objects at runtime so that
//! inspectors, property grids and view builders can work with a property
//! without knowing the concrete owner type.
//!
//! ## Core Concepts
//!
//! - [`TypeDescriptor`] - the declared type of a property, with a coarse
//!   [`TypeKind`] (bool, number, text, enum, ...)
//! - [`PropertyDescriptor`] - one property of an owner type: name, declared
//!   type, typed getter/setter and [`Annotations`]
//! - [`ObjectType`] - the registered properties of one owner type
//! - [`PropertyProxy`] - a (target object, descriptor) pair with
//!   `get_value`/`set_value`
//!
//! There is no runtime reflection: descriptors are registered explicitly,
//! usually next to the type they describe.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_reflect::{ObjectType, PropertyDescriptor, object_ref};
//!
//! #[derive(Default)]
//! struct Student {
//!     name: String,
//!     age: u32,
//! }
//!
//! let student_type = ObjectType::new::<Student>()
//!     .with(
//!         PropertyDescriptor::builder::<Student, String>("Name")
//!             .getter(|s| s.name.clone())
//!             .setter(|s, v| s.name = v)
//!             .build(),
//!     )
//!     .with(
//!         PropertyDescriptor::builder::<Student, u32>("Age")
//!             .getter(|s| s.age)
//!             .setter(|s, v| s.age = v)
//!             .build(),
//!     );
//!
//! let student = object_ref(Student::default());
//! let age = student_type.proxy(&student, "Age").unwrap().unwrap();
//!
//! age.set(21_u32).unwrap();
//! assert_eq!(age.get::<u32>().unwrap(), 21);
//! assert!(age.value_type().is_numeric());
//! ```
//!
//! ## Dynamic variables
//!
//! [`VarTable`] is a keyed table of tagged [`VarValue`]s with an optional
//! accepted-key filter and key-level change subscriptions through
//! [`ChangeNotifier`].
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod annotations;
mod descriptor;
mod error;
mod notify;
mod object_type;
mod proxy;
mod value;
mod var_table;

pub use annotations::Annotations;
pub use descriptor::{
    Describe, PropertyDescriptor, PropertyDescriptorBuilder, TypeDescriptor, TypeKind,
};
pub use error::ReflectError;
pub use notify::{ChangeNotifier, SubscriptionId};
pub use object_type::ObjectType;
pub use proxy::{ObjectRef, PropertyProxy, object_ref};
pub use value::ErasedValue;
pub use var_table::{VarTable, VarValue};
