// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key-level change notification.

use alloc::boxed::Box;
use core::fmt;
use smallvec::SmallVec;

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Listener<K> = Box<dyn FnMut(&K)>;

/// A list of listeners called with the key whose value changed.
///
/// Listeners are called in subscription order.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use understory_reflect::ChangeNotifier;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let mut notifier = ChangeNotifier::<&'static str>::new();
///
/// let sink = seen.clone();
/// let id = notifier.subscribe(move |key| sink.borrow_mut().push(*key));
///
/// notifier.notify(&"Width");
/// assert!(notifier.unsubscribe(id));
/// notifier.notify(&"Height");
///
/// assert_eq!(*seen.borrow(), ["Width"]);
/// ```
pub struct ChangeNotifier<K> {
    next_id: u32,
    listeners: SmallVec<[(SubscriptionId, Listener<K>); 2]>,
}

impl<K> ChangeNotifier<K> {
    /// Creates a notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: SmallVec::new(),
        }
    }

    /// Adds a listener.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&K) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Calls every listener with `key`.
    pub fn notify(&mut self, key: &K) {
        for (_, listener) in &mut self.listeners {
            listener(key);
        }
    }

    /// Returns the number of listeners.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if there are no listeners.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<K> Default for ChangeNotifier<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for ChangeNotifier<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
