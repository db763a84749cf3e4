// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editable composite values.
//!
//! A designer exposes the parts of a composite property as separate editable
//! channels and reports changes by channel name, so generated views for the
//! parts and for the whole stay in sync.

use core::fmt;

use understory_reflect::{ChangeNotifier, SubscriptionId};

/// Name raised when any part of the color changes.
pub const COLOR: &str = "Color";
/// Name raised when the alpha channel changes.
pub const A: &str = "A";
/// Name raised when the red channel changes.
pub const R: &str = "R";
/// Name raised when the green channel changes.
pub const G: &str = "G";
/// Name raised when the blue channel changes.
pub const B: &str = "B";

/// An 8-bit-per-channel color with alpha.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Argb {
    /// Alpha.
    pub a: u8,
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Argb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Unpacks `0xAARRGGBB`.
    #[must_use]
    pub const fn from_u32(packed: u32) -> Self {
        let [a, r, g, b] = packed.to_be_bytes();
        Self { a, r, g, b }
    }

    /// Packs into `0xAARRGGBB`.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }
}

/// Per-channel editor for an [`Argb`] value.
///
/// Channel setters raise the channel's name and then [`COLOR`]. [`update`]
/// replaces all four channels and raises [`COLOR`] once. Writes that do not
/// change the value raise nothing.
///
/// [`update`]: Self::update
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use understory_for_view::designer::{Argb, ColorDesigner};
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let mut designer = ColorDesigner::new(Argb::from_u32(0xFF00_0000));
/// let log = seen.clone();
/// designer.subscribe(move |name| log.borrow_mut().push(*name));
///
/// designer.set_r(0x80);
/// designer.update(Argb::new(0xFF, 0x10, 0x20, 0x30));
/// designer.update(Argb::new(0xFF, 0x10, 0x20, 0x30));
///
/// assert_eq!(*seen.borrow(), ["R", "Color", "Color"]);
/// assert_eq!(designer.color().to_u32(), 0xFF10_2030);
/// ```
pub struct ColorDesigner {
    color: Argb,
    notifier: ChangeNotifier<&'static str>,
}

impl ColorDesigner {
    /// Creates a designer holding `color`.
    #[must_use]
    pub fn new(color: Argb) -> Self {
        Self {
            color,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Returns the current color.
    #[must_use]
    #[inline]
    pub fn color(&self) -> Argb {
        self.color
    }

    /// Listens for change names.
    pub fn subscribe(&mut self, listener: impl FnMut(&&'static str) + 'static) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    /// Stops listening.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Sets the alpha channel.
    pub fn set_a(&mut self, value: u8) {
        self.set_channel(A, value, |c| &mut c.a);
    }

    /// Sets the red channel.
    pub fn set_r(&mut self, value: u8) {
        self.set_channel(R, value, |c| &mut c.r);
    }

    /// Sets the green channel.
    pub fn set_g(&mut self, value: u8) {
        self.set_channel(G, value, |c| &mut c.g);
    }

    /// Sets the blue channel.
    pub fn set_b(&mut self, value: u8) {
        self.set_channel(B, value, |c| &mut c.b);
    }

    /// Replaces the whole color, raising a single [`COLOR`] change.
    pub fn update(&mut self, color: Argb) {
        if self.color == color {
            return;
        }
        self.color = color;
        self.notifier.notify(&COLOR);
    }

    fn set_channel(&mut self, name: &'static str, value: u8, channel: fn(&mut Argb) -> &mut u8) {
        let slot = channel(&mut self.color);
        if *slot == value {
            return;
        }
        *slot = value;
        self.notifier.notify(&name);
        self.notifier.notify(&COLOR);
    }
}

impl Default for ColorDesigner {
    fn default() -> Self {
        Self::new(Argb::default())
    }
}

impl fmt::Debug for ColorDesigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorDesigner")
            .field("color", &self.color)
            .field("listeners", &self.notifier.len())
            .finish()
    }
}
