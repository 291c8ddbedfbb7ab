// SPDX-License-Identifier: MPL-2.0
//! The consumer that owns the toast slot.

use std::time::Duration;

use super::{Message, Toast, ToastLayout, ToastStack};
use crate::config::Config;
use crate::domain::relocation::SlotKey;
use crate::relocation::{Child, Outlet, Registry};
use iced::{time, Element, Subscription};

/// How often a stale layer asks the application to handle [`Message::SlotChanged`].
const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Consumer state for one toast slot.
///
/// Drawing always reads the registry as it is now, so a toast removed by its
/// producer disappears from the next frame even if no message was handled in
/// between. The [`Outlet`] only tracks whether the slot changed since the
/// application last handled a message, which drives [`ToastLayer::subscription`].
pub struct ToastLayer<R: Clone + 'static> {
    outlet: Outlet<Toast<R>>,
    layout: ToastLayout,
}

impl<R: Clone + 'static> ToastLayer<R> {
    /// Creates a layer on the registry's default slot.
    #[must_use]
    pub fn new(registry: &Registry<Toast<R>>) -> Self {
        Self::in_slot(registry, registry.default_slot())
    }

    /// Creates a layer on `slot`.
    #[must_use]
    pub fn in_slot(registry: &Registry<Toast<R>>, slot: impl Into<SlotKey>) -> Self {
        Self {
            outlet: registry.outlet(slot),
            layout: ToastLayout::default(),
        }
    }

    /// Creates a layer on the configured default slot with the configured layout.
    #[must_use]
    pub fn from_config(registry: &Registry<Toast<R>>, config: &Config) -> Self {
        Self {
            outlet: registry.outlet(config.default_slot_key()),
            layout: ToastLayout::from_config(config),
        }
    }

    /// Returns the stack placement used by [`ToastLayer::view`].
    #[must_use]
    pub fn layout(&self) -> &ToastLayout {
        &self.layout
    }

    /// Replaces the stack placement, e.g. after the settings changed.
    pub fn set_layout(&mut self, layout: ToastLayout) {
        self.layout = layout;
    }

    /// Returns the slot this layer renders.
    #[must_use]
    pub fn slot(&self) -> &SlotKey {
        self.outlet.slot()
    }

    /// Handles a toast message.
    ///
    /// Returns `true` if the slot changed since the previous message.
    pub fn handle_message(&mut self, message: &Message) -> bool {
        if let Message::Dismiss(id) = message {
            // A dismissed toast may belong to a live handle; the handle
            // then becomes inert.
            self.outlet.registry().remove(*id);
        }
        self.outlet.refresh()
    }

    /// Returns true if the slot changed since the last message was handled.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.outlet.is_stale()
    }

    /// Emits [`Message::SlotChanged`] while the slot has unhandled changes.
    ///
    /// Producers that run outside the application's `update` (a task
    /// callback, a dropped handle) still get their toasts on screen.
    pub fn subscription(&self) -> Subscription<Message> {
        if self.is_stale() {
            time::every(REFRESH_INTERVAL).map(|_| Message::SlotChanged)
        } else {
            Subscription::none()
        }
    }

    /// Returns the toasts that will be drawn, oldest first.
    #[must_use]
    pub fn toasts(&self) -> Vec<Child<Toast<R>>> {
        self.outlet.registry().children(self.slot())
    }

    /// Returns the number of toasts that will be drawn.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.outlet.registry().len(self.slot())
    }

    /// Renders the toast overlay from the current contents of the slot.
    pub fn view<'a, M: 'a>(
        &self,
        render: impl Fn(&Child<Toast<R>>) -> Element<'a, M>,
    ) -> Element<'a, M> {
        self.outlet.registry().with_slot(self.slot(), |children| {
            ToastStack::view(children, &self.layout, render)
        })
    }
}
