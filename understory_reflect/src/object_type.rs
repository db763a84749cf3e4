// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-type property tables.
//!
//! This module provides [`ObjectType`], the set of reflected properties of one
//! owner type, with lookup by name and proxy enumeration.

use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use hashbrown::HashMap;

use crate::descriptor::{PropertyDescriptor, TypeDescriptor, TypeKind};
use crate::error::ReflectError;
use crate::proxy::{ObjectRef, PropertyProxy};

/// The reflected properties of one owner type.
///
/// Properties are registered once, usually next to the type definition, and
/// keep their registration order.
///
/// # Example
///
/// ```rust
/// use understory_reflect::{ObjectType, PropertyDescriptor, object_ref};
///
/// #[derive(Default)]
/// struct Student {
///     name: String,
///     age: u32,
/// }
///
/// let mut student_type = ObjectType::new::<Student>();
/// student_type.register(
///     PropertyDescriptor::builder::<Student, String>("Name")
///         .getter(|s| s.name.clone())
///         .setter(|s, v| s.name = v)
///         .build(),
/// );
/// student_type.register(
///     PropertyDescriptor::builder::<Student, u32>("Age")
///         .getter(|s| s.age)
///         .build(),
/// );
///
/// assert_eq!(student_type.len(), 2);
/// assert!(student_type.get("Age").is_some());
///
/// let student = object_ref(Student::default());
/// let proxies = student_type.proxies(&student).unwrap();
/// let names: Vec<_> = proxies.iter().map(|p| p.name()).collect();
/// assert_eq!(names, ["Name", "Age"]);
/// ```
#[derive(Clone)]
pub struct ObjectType {
    owner: TypeDescriptor,
    properties: Vec<PropertyDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl ObjectType {
    /// Creates an empty property table for `O`.
    #[must_use]
    pub fn new<O: Any>() -> Self {
        Self {
            owner: TypeDescriptor::of::<O>().with_kind(TypeKind::Composite),
            properties: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Returns the owner type.
    #[must_use]
    #[inline]
    pub fn owner(&self) -> TypeDescriptor {
        self.owner
    }

    /// Registers a property.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor belongs to a different owner type, or if a
    /// property with the same name is already registered.
    pub fn register(&mut self, descriptor: PropertyDescriptor) -> &mut Self {
        assert!(
            descriptor.owner().id() == self.owner.id(),
            "Property '{}' is declared on `{}`, not `{}`",
            descriptor.name(),
            descriptor.owner().name(),
            self.owner.name()
        );
        assert!(
            !self.by_name.contains_key(descriptor.name()),
            "Property '{}' is already registered",
            descriptor.name()
        );
        self.by_name.insert(descriptor.name(), self.properties.len());
        self.properties.push(descriptor);
        self
    }

    /// Registers a property, builder style.
    #[must_use]
    pub fn with(mut self, descriptor: PropertyDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Returns the number of registered properties.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if no properties are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.by_name.get(name).map(|&index| &self.properties[index])
    }

    /// Iterates over the properties in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter()
    }

    /// Creates a proxy for the named property of `target`.
    ///
    /// Returns `Ok(None)` if no property has that name.
    pub fn proxy(
        &self,
        target: &ObjectRef,
        name: &str,
    ) -> Result<Option<PropertyProxy>, ReflectError> {
        self.get(name)
            .map(|descriptor| PropertyProxy::new(target.clone(), descriptor.clone()))
            .transpose()
    }

    /// Creates proxies for every property of `target`, in registration order.
    pub fn proxies(&self, target: &ObjectRef) -> Result<Vec<PropertyProxy>, ReflectError> {
        self.properties
            .iter()
            .map(|descriptor| PropertyProxy::new(target.clone(), descriptor.clone()))
            .collect()
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("owner", &self.owner.name())
            .field(
                "properties",
                &self.properties.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
