// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property proxies.
//!
//! A [`PropertyProxy`] pairs a shared target object with one of its
//! [`PropertyDescriptor`]s, so callers can read, write and inspect the
//! property without knowing the concrete owner type.

use alloc::rc::Rc;
use core::any::{Any, TypeId, type_name};
use core::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use core::fmt;

use tracing::trace;

use crate::annotations::Annotations;
use crate::descriptor::{PropertyDescriptor, TypeDescriptor};
use crate::error::ReflectError;
use crate::value::ErasedValue;

/// A shared, dynamically typed object handle.
///
/// The concrete type is recorded when the handle is made, so it can be
/// inspected while the object is borrowed. Clones share the object.
///
/// Build one with [`object_ref`], or from an existing `Rc<RefCell<T>>` to keep
/// a typed handle to the same object.
#[derive(Clone)]
pub struct ObjectRef {
    type_id: TypeId,
    type_name: &'static str,
    cell: Rc<RefCell<dyn Any>>,
}

impl ObjectRef {
    /// Returns the [`TypeId`] of the object's concrete type.
    #[must_use]
    #[inline]
    pub fn concrete_type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the name of the object's concrete type.
    #[must_use]
    #[inline]
    pub fn concrete_type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the shared cell holding the object.
    #[must_use]
    #[inline]
    pub fn cell(&self) -> &RefCell<dyn Any> {
        &self.cell
    }

    /// Immutably borrows the object, failing if it is mutably borrowed.
    pub fn try_borrow(&self) -> Result<Ref<'_, dyn Any>, BorrowError> {
        self.cell.try_borrow()
    }

    /// Mutably borrows the object, failing if it is borrowed.
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, dyn Any>, BorrowMutError> {
        self.cell.try_borrow_mut()
    }

    /// Returns `true` if both handles point at the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Any> From<Rc<RefCell<T>>> for ObjectRef {
    fn from(cell: Rc<RefCell<T>>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            cell,
        }
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Wraps `value` into an [`ObjectRef`].
#[must_use]
pub fn object_ref<T: Any>(value: T) -> ObjectRef {
    ObjectRef::from(Rc::new(RefCell::new(value)))
}

/// An indirection over one property of one object instance.
///
/// The target is shared with the caller, not owned. The (target, property)
/// pair is fixed at construction.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use understory_reflect::{ObjectRef, PropertyDescriptor, PropertyProxy};
///
/// #[derive(Default)]
/// struct Student {
///     name: String,
/// }
///
/// let student = Rc::new(RefCell::new(Student::default()));
/// let name = PropertyDescriptor::builder::<Student, String>("Name")
///     .getter(|s| s.name.clone())
///     .setter(|s, v| s.name = v)
///     .build();
///
/// let proxy = PropertyProxy::new(ObjectRef::from(student.clone()), name).unwrap();
/// proxy.set(String::from("Ada")).unwrap();
///
/// assert_eq!(student.borrow().name, "Ada");
/// assert_eq!(proxy.get::<String>().unwrap(), "Ada");
/// assert!(proxy.value_type().is::<String>());
/// ```
#[derive(Clone)]
pub struct PropertyProxy {
    target: ObjectRef,
    descriptor: PropertyDescriptor,
}

impl PropertyProxy {
    /// Creates a proxy for `descriptor` on `target`.
    ///
    /// Fails with [`ReflectError::OwnerMismatch`] if the descriptor belongs to a
    /// different type than the target's concrete type. The target is not
    /// borrowed, so this succeeds while the target is in use.
    pub fn new(target: ObjectRef, descriptor: PropertyDescriptor) -> Result<Self, ReflectError> {
        if target.concrete_type_id() != descriptor.owner().id() {
            return Err(ReflectError::OwnerMismatch {
                property: descriptor.name(),
                owner: descriptor.owner().name(),
            });
        }
        Ok(Self { target, descriptor })
    }

    /// Returns the property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.descriptor.name()
    }

    /// Returns the statically declared type of the property.
    ///
    /// This is the declared type, not the runtime type of the current value.
    #[must_use]
    #[inline]
    pub fn value_type(&self) -> TypeDescriptor {
        self.descriptor.value_type()
    }

    /// Returns the property's descriptor.
    #[must_use]
    #[inline]
    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    /// Returns the property's annotations.
    #[must_use]
    #[inline]
    pub fn annotations(&self) -> &Annotations {
        self.descriptor.annotations()
    }

    /// Returns the shared target object.
    #[must_use]
    #[inline]
    pub fn target(&self) -> &ObjectRef {
        &self.target
    }

    /// Reads the current value.
    pub fn get_value(&self) -> Result<ErasedValue, ReflectError> {
        let guard = self
            .target
            .try_borrow()
            .map_err(|_| ReflectError::TargetBorrowed {
                property: self.name(),
            })?;
        self.descriptor.read(&*guard)
    }

    /// Reads the current value as `T`.
    ///
    /// Fails with [`ReflectError::ValueType`] if `T` is not the declared type.
    pub fn get<T: 'static>(&self) -> Result<T, ReflectError> {
        let value = self.get_value()?;
        let declared = value.type_name();
        value.into_inner::<T>().ok_or(ReflectError::ValueType {
            property: self.name(),
            expected: declared,
            found: type_name::<T>(),
        })
    }

    /// Writes a new value.
    pub fn set_value(&self, value: ErasedValue) -> Result<(), ReflectError> {
        let mut guard = self
            .target
            .try_borrow_mut()
            .map_err(|_| ReflectError::TargetBorrowed {
                property: self.name(),
            })?;
        trace!(property = self.name(), value_type = value.type_name(), "set property");
        self.descriptor.write(&mut *guard, value)
    }

    /// Writes a new value of type `T`.
    pub fn set<T: Clone + 'static>(&self, value: T) -> Result<(), ReflectError> {
        self.set_value(ErasedValue::new(value))
    }

    /// Returns `true` if both proxies point at the same property of the same object.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.target.ptr_eq(&other.target) && self.descriptor.ptr_eq(&other.descriptor)
    }
}

impl fmt::Debug for PropertyProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyProxy")
            .field("owner", &self.descriptor.owner().name())
            .field("name", &self.descriptor.name())
            .field("value_type", &self.descriptor.value_type().name())
            .finish_non_exhaustive()
    }
}
