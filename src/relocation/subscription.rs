// SPDX-License-Identifier: MPL-2.0
//! Listener registrations.

use std::fmt;

/// Keeps a slot listener registered.
///
/// Dropping the subscription unregisters the listener.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unregisters the listener. Calling it again has no effect.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Returns true until [`Subscription::unsubscribe`] is called.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relocation::{Registry, SlotChange};
    use crate::SlotKey;

    #[test]
    fn unsubscribe_is_idempotent() {
        let registry: Registry<u8> = Registry::new();
        let mut subscription = registry.subscribe(SlotKey::TOASTS, |_: &SlotChange| {});
        assert!(subscription.is_active());

        subscription.unsubscribe();
        subscription.unsubscribe();
        assert!(!subscription.is_active());
        assert_eq!(registry.listener_count(), 0);
    }

    #[test]
    fn subscription_outliving_registry_is_harmless() {
        let registry: Registry<u8> = Registry::new();
        let subscription = registry.subscribe_all(|_: &SlotChange| {});
        drop(registry);
        drop(subscription);
    }
}
