// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A keyed table of dynamically typed variables.
//!
//! [`VarTable`] maps keys to tagged [`VarValue`]s, optionally restricted to a
//! fixed set of accepted keys, and reports key-level changes through a
//! [`ChangeNotifier`].

use alloc::string::String;
use core::fmt;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use tracing::trace;

use crate::notify::{ChangeNotifier, SubscriptionId};
use crate::value::ErasedValue;

/// A tagged variable value.
#[derive(Clone, Debug, Default)]
pub enum VarValue {
    /// No value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Text(String),
    /// Any other value.
    Erased(ErasedValue),
}

impl VarValue {
    /// Returns `true` for [`VarValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the number as `f64`, widening integers.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns the string, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Downcasts an [`VarValue::Erased`] value.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Self::Erased(v) => v.downcast_ref(),
            _ => None,
        }
    }
}

impl From<bool> for VarValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for VarValue {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<i64> for VarValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for VarValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for VarValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for VarValue {
    fn from(v: &str) -> Self {
        Self::Text(v.into())
    }
}

impl From<ErasedValue> for VarValue {
    fn from(v: ErasedValue) -> Self {
        Self::Erased(v)
    }
}

/// A keyed variable table with change notification.
///
/// When constructed with [`VarTable::with_accepted_keys`], only those keys
/// can be read or written; other keys behave as if they do not exist.
/// Accepted keys without a stored value, or holding [`VarValue::Null`], read
/// as the table's none value ([`VarValue::Null`] unless changed with
/// [`VarTable::set_none_value`]).
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use understory_reflect::{VarTable, VarValue};
///
/// let mut table = VarTable::with_accepted_keys(["title", "count"]);
///
/// let changed = Rc::new(RefCell::new(Vec::new()));
/// let sink = changed.clone();
/// table.subscribe(move |key| sink.borrow_mut().push(*key));
///
/// assert!(table.try_set("title", "Report"));
/// assert!(!table.try_set("other", 1));
///
/// assert_eq!(table.get(&"title").and_then(VarValue::as_text), Some("Report"));
/// assert!(table.get(&"count").is_some_and(VarValue::is_null));
/// assert!(table.get(&"other").is_none());
/// assert_eq!(*changed.borrow(), ["title"]);
/// ```
pub struct VarTable<K> {
    values: HashMap<K, VarValue>,
    accepted: Option<HashSet<K>>,
    none_value: VarValue,
    notifier: ChangeNotifier<K>,
}

impl<K: Clone + Eq + Hash> VarTable<K> {
    /// Creates a table that accepts every key.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            accepted: None,
            none_value: VarValue::Null,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Creates a table that accepts only `keys`.
    #[must_use]
    pub fn with_accepted_keys<I: IntoIterator<Item = K>>(keys: I) -> Self {
        Self {
            accepted: Some(keys.into_iter().collect()),
            ..Self::new()
        }
    }

    /// Returns `true` if every key is accepted.
    #[must_use]
    pub fn accepts_all(&self) -> bool {
        self.accepted.is_none()
    }

    /// Returns `true` if `key` may be read and written.
    #[must_use]
    pub fn is_accepted(&self, key: &K) -> bool {
        self.accepted.as_ref().is_none_or(|keys| keys.contains(key))
    }

    /// Sets the value returned for accepted keys that hold nothing.
    pub fn set_none_value(&mut self, value: impl Into<VarValue>) {
        self.none_value = value.into();
    }

    /// Returns the value for `key`, or `None` if the key is not accepted.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&VarValue> {
        if !self.is_accepted(key) {
            return None;
        }
        match self.values.get(key) {
            Some(value) if !value.is_null() => Some(value),
            _ => Some(&self.none_value),
        }
    }

    /// Stores a value and notifies listeners.
    ///
    /// Returns `false`, leaving the table unchanged, if the key is not accepted.
    pub fn try_set(&mut self, key: K, value: impl Into<VarValue>) -> bool {
        if !self.is_accepted(&key) {
            trace!("rejected write to unaccepted key");
            return false;
        }
        self.values.insert(key.clone(), value.into());
        self.notifier.notify(&key);
        true
    }

    /// Removes a stored value and notifies listeners if one was present.
    pub fn remove(&mut self, key: &K) -> Option<VarValue> {
        let removed = self.values.remove(key)?;
        self.notifier.notify(key);
        Some(removed)
    }

    /// Iterates over the visible keys.
    ///
    /// For a restricted table these are the accepted keys, whether or not
    /// they hold a value; otherwise they are the stored keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        let accepted = self.accepted.iter().flat_map(HashSet::iter);
        let stored = self
            .accepted
            .is_none()
            .then(|| self.values.keys())
            .into_iter()
            .flatten();
        accepted.chain(stored)
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Subscribes to key-level changes.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&K) + 'static,
    {
        self.notifier.subscribe(listener)
    }

    /// Removes a change listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

impl<K: Clone + Eq + Hash> Default for VarTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for VarTable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VarTable")
            .field("values", &self.values)
            .field("accepted", &self.accepted)
            .field("none_value", &self.none_value)
            .field("listeners", &self.notifier.len())
            .finish()
    }
}
