// SPDX-License-Identifier: MPL-2.0
//! Toasts relocated into a slot and stacked by a single consumer.
//!
//! Any component holding a [`ToastProvider`] can raise a toast; the
//! [`ToastLayer`] near the root of the view renders every toast of its
//! slot with [`ToastStack`].
//!
//! # Usage
//!
//! ```ignore
//! use relocation::toast::{Message, Toast, ToastLayer, ToastProvider, ToastStack};
//! use relocation::Registry;
//!
//! let registry: Registry<Toast<String>> = Registry::new();
//! let provider = ToastProvider::new(&registry);
//! let mut layer = ToastLayer::new(&registry);
//!
//! // Producer side: keep the handle for as long as the toast should show.
//! let saved = provider.add_toast("Silence created".to_string());
//!
//! // Consumer side, in subscription():
//! let ticks = layer.subscription();
//! // ...in update(), for every toast message:
//! layer.handle_message(&Message::SlotChanged);
//! // ...and in view(), which always reads the slot as it is now:
//! let overlay = layer.view(|child| ToastStack::text_toast(child, layer.layout().width));
//! ```

mod layer;
mod stack;
mod tokens;

pub use layer::ToastLayer;
pub use stack::{ToastLayout, ToastStack};

use crate::domain::relocation::{ChildId, SlotKey};
use crate::relocation::{ChildHandle, Registry};

/// Payload registered for each toast: whatever the caller will render.
///
/// Nothing marks the child as a toast beyond this wrapper; the slot it
/// lands in decides how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast<R> {
    render: R,
}

impl<R> Toast<R> {
    /// Wraps the value the consumer will render.
    pub fn new(render: R) -> Self {
        Self { render }
    }

    /// Returns the value to render.
    #[must_use]
    pub fn render(&self) -> &R {
        &self.render
    }

    /// Unwraps the value to render.
    pub fn into_render(self) -> R {
        self.render
    }
}

/// Messages handled by the toast layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Remove a toast by id (the dismiss button).
    Dismiss(ChildId),
    /// The slot changed; emitted by [`ToastLayer::subscription`].
    SlotChanged,
}

/// Producer-side entry point for raising toasts.
pub struct ToastProvider<R> {
    registry: Registry<Toast<R>>,
    slot: SlotKey,
}

impl<R> Clone for ToastProvider<R> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            slot: self.slot.clone(),
        }
    }
}

impl<R> ToastProvider<R> {
    /// Creates a provider targeting the registry's default slot.
    #[must_use]
    pub fn new(registry: &Registry<Toast<R>>) -> Self {
        Self::in_slot(registry, registry.default_slot())
    }

    /// Creates a provider targeting `slot`.
    #[must_use]
    pub fn in_slot(registry: &Registry<Toast<R>>, slot: impl Into<SlotKey>) -> Self {
        Self {
            registry: registry.clone(),
            slot: slot.into(),
        }
    }

    /// Returns the slot new toasts are registered in.
    #[must_use]
    pub fn slot(&self) -> &SlotKey {
        &self.slot
    }

    /// Registers a toast. It stays visible until the handle is removed or
    /// dropped, or the consumer dismisses it.
    pub fn add_toast(&self, render: R) -> ChildHandle<Toast<R>> {
        self.registry.create_child(&self.slot, Toast::new(render))
    }
}
