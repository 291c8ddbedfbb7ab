// SPDX-License-Identifier: MPL-2.0
//! Producer-side handle over one registration.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Weak;

use super::registry::{Inner, Registry};
use crate::diagnostics::HandleOperation;
use crate::domain::relocation::{ChildId, SlotKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleState {
    Registered,
    Removed,
    Detached,
}

/// Grants `update` and `remove` rights over one child registration.
///
/// Dropping the handle removes the registration, so a producer's teardown
/// releases its slot entry without any extra bookkeeping. Use
/// [`ChildHandle::detach`] to hand ownership of the entry to the registry
/// (it then lives until removed by id).
///
/// Every operation is a silent no-op once the registration is gone, whether
/// it was removed through this handle, by id, or because the registry itself
/// was dropped.
#[must_use = "dropping a ChildHandle removes its registration"]
pub struct ChildHandle<T> {
    id: ChildId,
    slot: SlotKey,
    registry: Weak<RefCell<Inner<T>>>,
    state: Cell<HandleState>,
}

impl<T> ChildHandle<T> {
    pub(crate) fn new(id: ChildId, slot: SlotKey, registry: Weak<RefCell<Inner<T>>>) -> Self {
        Self {
            id,
            slot,
            registry,
            state: Cell::new(HandleState::Registered),
        }
    }

    /// Returns the registration id.
    #[must_use]
    pub fn id(&self) -> ChildId {
        self.id
    }

    /// Returns the slot the child was registered in.
    #[must_use]
    pub fn slot(&self) -> &SlotKey {
        &self.slot
    }

    /// Returns true while the child is still present in its slot.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.state.get() == HandleState::Registered
            && self.registry().is_some_and(|registry| registry.contains(self.id))
    }

    /// Replaces the child's content in place.
    ///
    /// Returns `false` and leaves the slot untouched if the child was
    /// already removed.
    pub fn update(&self, content: T) -> bool {
        let Some(registry) = self.registry() else {
            self.state.set(HandleState::Removed);
            return false;
        };

        if self.state.get() == HandleState::Registered && registry.update(self.id, content) {
            return true;
        }
        self.state.set(HandleState::Removed);
        registry.log_stale_handle(&self.slot, self.id, HandleOperation::Update);
        false
    }

    /// Removes the child from its slot.
    ///
    /// Idempotent: returns `true` only for the call that actually removed
    /// the child.
    pub fn remove(&self) -> bool {
        let registry = self.registry();
        match self.state.replace(HandleState::Removed) {
            HandleState::Registered => registry.is_some_and(|registry| registry.remove(self.id)),
            HandleState::Removed | HandleState::Detached => {
                if let Some(registry) = registry {
                    registry.log_stale_handle(&self.slot, self.id, HandleOperation::Remove);
                }
                false
            }
        }
    }

    /// Releases the handle without removing the child, returning its id.
    ///
    /// The child stays registered until [`Registry::remove`] is called
    /// with the returned id.
    pub fn detach(self) -> ChildId {
        if self.state.get() == HandleState::Registered {
            self.state.set(HandleState::Detached);
        }
        self.id
    }

    fn registry(&self) -> Option<Registry<T>> {
        self.registry.upgrade().map(Registry::from_inner)
    }
}

impl<T> Drop for ChildHandle<T> {
    fn drop(&mut self) {
        if self.state.get() == HandleState::Registered {
            self.state.set(HandleState::Removed);
            if let Some(registry) = self.registry() {
                registry.remove(self.id);
            }
        }
    }
}

impl<T> fmt::Debug for ChildHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildHandle")
            .field("id", &self.id)
            .field("slot", &self.slot)
            .field("state", &self.state.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticEventKind, DiagnosticsCollector};

    #[test]
    fn dropping_handle_removes_child() {
        let registry = Registry::new();
        {
            let _handle = registry.create_child(SlotKey::TOASTS, "scoped");
            assert_eq!(registry.len(&SlotKey::TOASTS), 1);
        }
        assert!(registry.is_empty(&SlotKey::TOASTS));
    }

    #[test]
    fn remove_is_idempotent() {
        let registry = Registry::new();
        let handle = registry.create_child(SlotKey::TOASTS, "x");

        assert!(handle.remove());
        assert!(!handle.remove());
        assert!(!handle.is_registered());
        assert!(registry.is_empty(&SlotKey::TOASTS));
    }

    #[test]
    fn update_after_remove_does_not_resurrect() {
        let registry = Registry::new();
        let handle = registry.create_child(SlotKey::TOASTS, "x");
        let _other = registry.create_child(SlotKey::TOASTS, "y");

        handle.remove();
        assert!(!handle.update("ghost"));
        assert_eq!(registry.render_slot(&SlotKey::TOASTS), vec!["y"]);
    }

    #[test]
    fn handle_notices_removal_by_id() {
        let registry = Registry::new();
        let handle = registry.create_child(SlotKey::TOASTS, "x");

        assert!(registry.remove(handle.id()));
        assert!(!handle.is_registered());
        assert!(!handle.update("ghost"));
        assert!(!handle.remove());
    }

    #[test]
    fn detached_child_outlives_handle() {
        let registry = Registry::new();
        let id = registry.create_child(SlotKey::TOASTS, "kept").detach();

        assert!(registry.contains(id));
        assert_eq!(registry.render_slot(&SlotKey::TOASTS), vec!["kept"]);
    }

    #[test]
    fn handle_outliving_registry_is_inert() {
        let registry = Registry::new();
        let handle = registry.create_child(SlotKey::TOASTS, "x");
        drop(registry);

        assert!(!handle.is_registered());
        assert!(!handle.update("y"));
        assert!(!handle.remove());
    }

    #[test]
    fn stale_update_is_logged_as_warning() {
        let mut collector = DiagnosticsCollector::default();
        let registry = Registry::new();
        registry.set_diagnostics(collector.handle());

        let handle = registry.create_child(SlotKey::TOASTS, "x");
        handle.remove();
        handle.update("late");
        drop(handle);
        collector.process_pending();

        let last = collector.iter().last().expect("events should be recorded");
        assert!(matches!(
            last.kind,
            DiagnosticEventKind::StaleHandle {
                operation: HandleOperation::Update,
                ..
            }
        ));
        assert_eq!(collector.iter().filter(|e| e.kind.is_warning()).count(), 1);
    }

    #[test]
    fn debug_shows_state() {
        let registry = Registry::new();
        let handle = registry.create_child(SlotKey::TOASTS, 1);
        assert!(format!("{handle:?}").contains("Registered"));
    }
}
