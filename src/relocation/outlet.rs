// SPDX-License-Identifier: MPL-2.0
//! Consumer-side view of one slot.

use std::cell::Cell;
use std::rc::Rc;

use super::child::{Child, SlotChange};
use super::registry::Registry;
use super::subscription::Subscription;
use crate::domain::relocation::{ChildId, SlotKey};

/// Renders one slot: caches its children and knows when they changed.
///
/// The outlet's listener only bumps a revision counter, so producers never
/// pay for the consumer's rendering. The consumer checks
/// [`Outlet::is_stale`] (or just calls [`Outlet::refresh`]) before drawing.
///
/// # Example
///
/// ```
/// use relocation::{Registry, SlotKey};
///
/// let registry = Registry::new();
/// let mut outlet = registry.outlet(SlotKey::TOASTS);
///
/// let _toast = registry.create_default_child("saved");
/// assert!(outlet.is_stale());
///
/// outlet.refresh();
/// assert_eq!(outlet.contents().collect::<Vec<_>>(), vec![&"saved"]);
/// ```
pub struct Outlet<T> {
    registry: Registry<T>,
    slot: SlotKey,
    revision: Rc<Cell<u64>>,
    seen: u64,
    snapshot: Vec<Child<T>>,
    _subscription: Subscription,
}

impl<T: Clone + 'static> Outlet<T> {
    pub(crate) fn new(registry: Registry<T>, slot: SlotKey) -> Self {
        let revision = Rc::new(Cell::new(0));
        let counter = Rc::clone(&revision);
        let subscription = registry.subscribe(&slot, move |_: &SlotChange| {
            counter.set(counter.get() + 1);
        });
        let snapshot = registry.children(&slot);

        Self {
            registry,
            slot,
            revision,
            seen: 0,
            snapshot,
            _subscription: subscription,
        }
    }

    /// Returns the slot this outlet renders.
    #[must_use]
    pub fn slot(&self) -> &SlotKey {
        &self.slot
    }

    /// Returns the number of changes observed since the outlet was created.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Returns true if the slot changed since the last refresh.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.seen != self.revision.get()
    }

    /// Re-reads the slot if it changed. Returns true if the snapshot was replaced.
    pub fn refresh(&mut self) -> bool {
        if !self.is_stale() {
            return false;
        }
        self.seen = self.revision.get();
        self.snapshot = self.registry.children(&self.slot);
        true
    }

    /// Returns the children as of the last refresh, in registration order.
    #[must_use]
    pub fn children(&self) -> &[Child<T>] {
        &self.snapshot
    }

    /// Returns the contents as of the last refresh, in registration order.
    pub fn contents(&self) -> impl Iterator<Item = &T> {
        self.snapshot.iter().map(Child::content)
    }

    /// Returns the ids as of the last refresh.
    #[must_use]
    pub fn child_ids(&self) -> Vec<ChildId> {
        self.snapshot.iter().map(Child::id).collect()
    }

    /// Returns the number of children as of the last refresh.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Returns true if the last snapshot was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Returns the registry this outlet reads from.
    #[must_use]
    pub fn registry(&self) -> &Registry<T> {
        &self.registry
    }
}
