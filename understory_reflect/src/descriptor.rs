// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type and property descriptors.
//!
//! This module provides [`TypeDescriptor`] for the declared type of a property,
//! [`PropertyDescriptor`] for one reflected property of an owner type, and
//! [`PropertyDescriptorBuilder`] for constructing descriptors with typed
//! accessors.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::marker::PhantomData;

use crate::annotations::Annotations;
use crate::error::ReflectError;
use crate::value::ErasedValue;

/// The broad shape of a declared type.
///
/// Conditions use this to dispatch on "any enum" or "any number" without
/// listing every concrete type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `bool`.
    Bool,
    /// Signed or unsigned integers.
    Integer,
    /// Floating point numbers.
    Float,
    /// Strings and characters.
    Text,
    /// A fieldless enum, with its variant names in declaration order.
    Enum(&'static [&'static str]),
    /// A struct-like value with its own properties.
    Composite,
    /// Anything else.
    Other,
}

/// The statically declared type of a property.
///
/// # Example
///
/// ```rust
/// use understory_reflect::{Describe, TypeDescriptor, TypeKind};
///
/// #[derive(Clone, Copy)]
/// enum Align { Start, End }
///
/// impl Describe for Align {
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::of::<Self>().with_kind(TypeKind::Enum(&["Start", "End"]))
///     }
/// }
///
/// let align = Align::describe();
/// assert!(align.is_enum());
/// assert_eq!(align.enum_variants(), Some(&["Start", "End"][..]));
/// assert!(u32::describe().is_numeric());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
}

impl TypeDescriptor {
    /// Describes `T` with [`TypeKind::Other`].
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind: TypeKind::Other,
        }
    }

    /// Replaces the kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the [`TypeId`] of the described type.
    #[must_use]
    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the type name, for diagnostics.
    #[must_use]
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the kind of the described type.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns `true` if this describes `T`.
    #[must_use]
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Returns `true` for [`TypeKind::Enum`].
    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum(_))
    }

    /// Returns `true` for [`TypeKind::Integer`] and [`TypeKind::Float`].
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.kind, TypeKind::Integer | TypeKind::Float)
    }

    /// Returns the variant names of an enum type.
    #[must_use]
    pub const fn enum_variants(&self) -> Option<&'static [&'static str]> {
        match self.kind {
            TypeKind::Enum(variants) => Some(variants),
            _ => None,
        }
    }
}

/// Types that can describe themselves as a [`TypeDescriptor`].
///
/// The default implementation reports [`TypeKind::Other`]; override it to
/// expose a more specific kind.
pub trait Describe: 'static {
    /// Returns the descriptor of `Self`.
    #[must_use]
    fn describe() -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }
}

macro_rules! describe_as {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::of::<Self>().with_kind($kind)
                }
            }
        )+
    };
}

describe_as!(TypeKind::Bool => bool);
describe_as!(TypeKind::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
describe_as!(TypeKind::Float => f32, f64);
describe_as!(TypeKind::Text => char, String, &'static str);

type Getter = dyn Fn(&dyn Any) -> Option<ErasedValue>;
type Setter = dyn Fn(&mut dyn Any, ErasedValue) -> Result<(), ReflectError>;

struct DescriptorInner {
    name: &'static str,
    owner: TypeDescriptor,
    value_type: TypeDescriptor,
    getter: Option<Box<Getter>>,
    setter: Option<Box<Setter>>,
    annotations: Annotations,
}

/// One reflected property of an owner type.
///
/// A descriptor is cheap to clone; clones share the same accessors and
/// annotations. Descriptors are built with [`PropertyDescriptorBuilder`].
#[derive(Clone)]
pub struct PropertyDescriptor {
    inner: Rc<DescriptorInner>,
}

impl PropertyDescriptor {
    /// Starts building a descriptor for property `name` of type `T` on `O`.
    #[must_use]
    pub fn builder<O: Any, T: Describe + Clone>(
        name: &'static str,
    ) -> PropertyDescriptorBuilder<O, T> {
        PropertyDescriptorBuilder::new(name)
    }

    /// Returns the property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Returns the descriptor of the owning type.
    #[must_use]
    #[inline]
    pub fn owner(&self) -> TypeDescriptor {
        self.inner.owner
    }

    /// Returns the declared value type.
    #[must_use]
    #[inline]
    pub fn value_type(&self) -> TypeDescriptor {
        self.inner.value_type
    }

    /// Returns the annotations attached to this property.
    #[must_use]
    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.inner.annotations
    }

    /// Returns `true` if the property has a getter.
    #[must_use]
    #[inline]
    pub fn is_readable(&self) -> bool {
        self.inner.getter.is_some()
    }

    /// Returns `true` if the property has a setter.
    #[must_use]
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.inner.setter.is_some()
    }

    /// Returns `true` if both handles refer to the same descriptor.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn read(&self, target: &dyn Any) -> Result<ErasedValue, ReflectError> {
        let getter = self.inner.getter.as_ref().ok_or(ReflectError::NotReadable {
            property: self.name(),
        })?;
        getter(target).ok_or(ReflectError::OwnerMismatch {
            property: self.name(),
            owner: self.inner.owner.name(),
        })
    }

    pub(crate) fn write(&self, target: &mut dyn Any, value: ErasedValue) -> Result<(), ReflectError> {
        let setter = self.inner.setter.as_ref().ok_or(ReflectError::NotWritable {
            property: self.name(),
        })?;
        setter(target, value)
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.inner.name)
            .field("owner", &self.inner.owner.name())
            .field("value_type", &self.inner.value_type.name())
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .field("annotations", &self.inner.annotations.len())
            .finish()
    }
}

/// Builder for [`PropertyDescriptor`].
///
/// # Example
///
/// ```rust
/// use understory_reflect::{ErasedValue, PropertyDescriptor};
///
/// #[derive(Default)]
/// struct Student {
///     age: u32,
/// }
///
/// let age = PropertyDescriptor::builder::<Student, u32>("Age")
///     .getter(|s| s.age)
///     .setter(|s, v| s.age = v)
///     .build();
///
/// assert_eq!(age.name(), "Age");
/// assert!(age.value_type().is::<u32>());
/// assert!(age.owner().is::<Student>());
/// assert!(age.is_readable() && age.is_writable());
/// ```
pub struct PropertyDescriptorBuilder<O, T> {
    name: &'static str,
    value_type: TypeDescriptor,
    getter: Option<Box<Getter>>,
    setter: Option<Box<Setter>>,
    annotations: Annotations,
    _marker: PhantomData<fn(&O) -> T>,
}

impl<O: Any, T: Clone + 'static> PropertyDescriptorBuilder<O, T> {
    /// Creates a builder whose declared type is `T::describe()`.
    #[must_use]
    pub fn new(name: &'static str) -> Self
    where
        T: Describe,
    {
        Self {
            name,
            value_type: T::describe(),
            getter: None,
            setter: None,
            annotations: Annotations::new(),
            _marker: PhantomData,
        }
    }

    /// Overrides the declared type.
    ///
    /// The descriptor's [`TypeId`] must still be that of `T`; only the name and
    /// kind should differ.
    #[must_use]
    pub fn value_type(mut self, value_type: TypeDescriptor) -> Self {
        debug_assert!(
            value_type.is::<T>(),
            "declared type of `{}` must describe `{}`",
            self.name,
            type_name::<T>()
        );
        self.value_type = value_type;
        self
    }

    /// Sets the getter.
    #[must_use]
    pub fn getter<F>(mut self, get: F) -> Self
    where
        F: Fn(&O) -> T + 'static,
    {
        self.getter = Some(Box::new(move |target: &dyn Any| {
            target.downcast_ref::<O>().map(|owner| ErasedValue::new(get(owner)))
        }));
        self
    }

    /// Sets the setter.
    #[must_use]
    pub fn setter<F>(mut self, set: F) -> Self
    where
        F: Fn(&mut O, T) + 'static,
    {
        let name = self.name;
        self.setter = Some(Box::new(
            move |target: &mut dyn Any, value: ErasedValue| {
                let found = value.type_name();
                let value = value.into_inner::<T>().ok_or(ReflectError::ValueType {
                    property: name,
                    expected: type_name::<T>(),
                    found,
                })?;
                let owner = target
                    .downcast_mut::<O>()
                    .ok_or(ReflectError::OwnerMismatch {
                        property: name,
                        owner: type_name::<O>(),
                    })?;
                set(owner, value);
                Ok(())
            },
        ));
        self
    }

    /// Attaches an annotation.
    #[must_use]
    pub fn annotate<A: Clone + 'static>(mut self, annotation: A) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Builds the [`PropertyDescriptor`].
    #[must_use]
    pub fn build(self) -> PropertyDescriptor {
        PropertyDescriptor {
            inner: Rc::new(DescriptorInner {
                name: self.name,
                owner: TypeDescriptor::of::<O>().with_kind(TypeKind::Composite),
                value_type: self.value_type,
                getter: self.getter,
                setter: self.setter,
                annotations: self.annotations,
            }),
        }
    }
}

impl<O, T> fmt::Debug for PropertyDescriptorBuilder<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptorBuilder")
            .field("name", &self.name)
            .field("value_type", &self.value_type.name())
            .field("has_getter", &self.getter.is_some())
            .field("has_setter", &self.setter.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[derive(Default)]
    struct Widget {
        width: f64,
    }

    fn width() -> PropertyDescriptor {
        PropertyDescriptor::builder::<Widget, f64>("Width")
            .getter(|w| w.width)
            .setter(|w, v| w.width = v)
            .build()
    }

    #[test]
    fn primitive_kinds() {
        assert_eq!(bool::describe().kind(), TypeKind::Bool);
        assert_eq!(i64::describe().kind(), TypeKind::Integer);
        assert_eq!(f32::describe().kind(), TypeKind::Float);
        assert_eq!(String::describe().kind(), TypeKind::Text);
        assert!(!String::describe().is_enum());
    }

    #[test]
    fn default_describe_is_other() {
        struct Opaque;
        impl Describe for Opaque {}
        assert_eq!(Opaque::describe().kind(), TypeKind::Other);
        assert!(Opaque::describe().is::<Opaque>());
    }

    #[test]
    fn read_and_write() {
        let desc = width();
        let mut widget = Widget::default();

        desc.write(&mut widget, ErasedValue::new(12.5_f64)).unwrap();
        let value = desc.read(&widget).unwrap();
        assert_eq!(value.downcast_ref::<f64>(), Some(&12.5));
    }

    #[test]
    fn write_wrong_value_type() {
        let desc = width();
        let mut widget = Widget::default();

        let err = desc.write(&mut widget, ErasedValue::new(1_u8)).unwrap_err();
        assert!(matches!(err, ReflectError::ValueType { property: "Width", .. }));
        assert_eq!(widget.width, 0.0);
    }

    #[test]
    fn read_wrong_owner() {
        let desc = width();
        let err = desc.read(&5_u32).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn missing_accessors() {
        let desc = PropertyDescriptor::builder::<Widget, f64>("Width").build();
        let mut widget = Widget::default();
        assert_eq!(
            desc.read(&widget).unwrap_err(),
            ReflectError::NotReadable { property: "Width" }
        );
        assert_eq!(
            desc.write(&mut widget, ErasedValue::new(1.0_f64)).unwrap_err(),
            ReflectError::NotWritable { property: "Width" }
        );
    }

    #[test]
    fn clones_share_identity() {
        let desc = width();
        let other = desc.clone();
        assert!(desc.ptr_eq(&other));
        assert!(!desc.ptr_eq(&width()));
    }

    #[test]
    fn debug_lists_accessors() {
        let debug = format!("{:?}", width());
        assert!(debug.contains("Width"));
        assert!(debug.contains("readable: true"));
    }
}
