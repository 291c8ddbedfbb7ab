// SPDX-License-Identifier: MPL-2.0
//! The slot registry shared by producers and consumers.
//!
//! A [`Registry`] is a cheap, cloneable handle to one shared registry state.
//! Producers call [`Registry::create_child`] and keep the returned
//! [`ChildHandle`]; consumers read a slot with [`Registry::render_slot`] or
//! [`Registry::with_slot`] and learn about changes through
//! [`Registry::subscribe`] or an [`Outlet`].

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};

use super::child::{ChangeKind, Child, SlotChange};
use super::handle::ChildHandle;
use super::outlet::Outlet;
use super::subscription::Subscription;
use crate::config::Config;
use crate::diagnostics::{DiagnosticEventKind, DiagnosticsHandle, HandleOperation};
use crate::domain::relocation::{ChildId, SlotKey};

type Listener = Rc<RefCell<dyn FnMut(&SlotChange)>>;

struct ListenerEntry {
    id: u64,
    /// `None` watches every slot.
    slot: Option<SlotKey>,
    callback: Listener,
}

pub(crate) struct Inner<T> {
    next_child: u64,
    next_listener: u64,
    default_slot: SlotKey,
    /// Only non-empty slots are kept.
    slots: BTreeMap<SlotKey, Vec<Child<T>>>,
    locations: HashMap<ChildId, SlotKey>,
    listeners: Vec<ListenerEntry>,
    pending: VecDeque<SlotChange>,
    dispatching: bool,
    diagnostics: Option<DiagnosticsHandle>,
}

impl<T> Inner<T> {
    fn log(&self, kind: DiagnosticEventKind) {
        if let Some(handle) = &self.diagnostics {
            handle.log(kind);
        }
    }

    fn listeners_for(&self, slot: &SlotKey) -> Vec<(u64, Listener)> {
        self.listeners
            .iter()
            .filter(|entry| entry.slot.as_ref().is_none_or(|watched| watched == slot))
            .map(|entry| (entry.id, Rc::clone(&entry.callback)))
            .collect()
    }

    fn has_listener(&self, id: u64) -> bool {
        self.listeners.iter().any(|entry| entry.id == id)
    }
}

/// Ends a notification round, including one cut short by a panicking
/// listener. Changes still queued by an aborted round are discarded.
struct DispatchGuard<'a, T> {
    inner: &'a RefCell<Inner<T>>,
}

impl<T> Drop for DispatchGuard<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.inner.try_borrow_mut() {
            state.dispatching = false;
            state.pending.clear();
        }
    }
}

/// Shared registry of relocated children, grouped by slot.
///
/// Children of a slot are kept in registration order. Every insert, update
/// and removal notifies the listeners of that slot synchronously, after the
/// mutation has been applied.
///
/// The registry is single-threaded: clones share state through `Rc` and
/// the type is neither `Send` nor `Sync`.
///
/// # Example
///
/// ```
/// use relocation::{Registry, SlotKey};
///
/// let registry: Registry<&str> = Registry::new();
/// let toasts = SlotKey::from("toasts");
///
/// let first = registry.create_child(&toasts, "X");
/// let second = registry.create_child(&toasts, "Y");
/// assert_eq!(registry.render_slot(&toasts), vec!["X", "Y"]);
///
/// first.update("X2");
/// assert_eq!(registry.render_slot(&toasts), vec!["X2", "Y"]);
///
/// first.remove();
/// drop(second);
/// assert!(registry.render_slot(&toasts).is_empty());
/// ```
pub struct Registry<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        let slots: BTreeMap<&str, usize> = state
            .slots
            .iter()
            .map(|(slot, children)| (slot.as_str(), children.len()))
            .collect();
        f.debug_struct("Registry")
            .field("default_slot", &state.default_slot)
            .field("slots", &slots)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl<T> Registry<T> {
    /// Creates an empty registry whose default slot is [`SlotKey::TOASTS`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_slot(SlotKey::TOASTS)
    }

    /// Creates an empty registry with a custom default slot.
    #[must_use]
    pub fn with_default_slot(slot: impl Into<SlotKey>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                next_child: 0,
                next_listener: 0,
                default_slot: slot.into(),
                slots: BTreeMap::new(),
                locations: HashMap::new(),
                listeners: Vec::new(),
                pending: VecDeque::new(),
                dispatching: false,
                diagnostics: None,
            })),
        }
    }

    /// Creates an empty registry using the configured default slot.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_default_slot(config.default_slot_key())
    }

    pub(crate) fn from_inner(inner: Rc<RefCell<Inner<T>>>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<Inner<T>>> {
        Rc::downgrade(&self.inner)
    }

    /// Sets the diagnostics handle used to record registry activity.
    pub fn set_diagnostics(&self, handle: DiagnosticsHandle) {
        self.inner.borrow_mut().diagnostics = Some(handle);
    }

    /// Returns the slot used by [`Registry::create_default_child`].
    #[must_use]
    pub fn default_slot(&self) -> SlotKey {
        self.inner.borrow().default_slot.clone()
    }

    /// Registers `content` at the end of `slot` and notifies its listeners.
    ///
    /// Always succeeds. The returned handle removes the registration when
    /// dropped, unless it is [detached](ChildHandle::detach) first.
    pub fn create_child(&self, slot: impl Into<SlotKey>, content: T) -> ChildHandle<T> {
        let slot = slot.into();
        let id = {
            let mut guard = self.inner.borrow_mut();
            let state = &mut *guard;
            state.next_child += 1;
            let id = ChildId::new(state.next_child);
            state
                .slots
                .entry(slot.clone())
                .or_default()
                .push(Child { id, content });
            state.locations.insert(id, slot.clone());
            state.log(DiagnosticEventKind::child_created(&slot, id));
            id
        };

        self.notify(SlotChange::new(slot.clone(), id, ChangeKind::Created));
        ChildHandle::new(id, slot, self.downgrade())
    }

    /// Registers `content` in the default slot.
    pub fn create_default_child(&self, content: T) -> ChildHandle<T> {
        let slot = self.default_slot();
        self.create_child(slot, content)
    }

    /// Replaces the content of a registered child, keeping its position.
    ///
    /// Returns `false`, without notifying anyone, if `id` is not registered.
    pub fn update(&self, id: ChildId, content: T) -> bool {
        let (slot, previous) = {
            let mut guard = self.inner.borrow_mut();
            let state = &mut *guard;
            let Some(slot) = state.locations.get(&id).cloned() else {
                return false;
            };
            let Some(child) = state
                .slots
                .get_mut(&slot)
                .and_then(|children| children.iter_mut().find(|child| child.id == id))
            else {
                return false;
            };
            let previous = std::mem::replace(&mut child.content, content);
            state.log(DiagnosticEventKind::child_updated(&slot, id));
            (slot, previous)
        };
        // Old content may own handles into this registry.
        drop(previous);

        self.notify(SlotChange::new(slot, id, ChangeKind::Updated));
        true
    }

    /// Removes a registered child. The order of the remaining children is kept.
    ///
    /// Returns `false` if `id` is not registered.
    pub fn remove(&self, id: ChildId) -> bool {
        let (slot, removed) = {
            let mut guard = self.inner.borrow_mut();
            let state = &mut *guard;
            let Some(slot) = state.locations.remove(&id) else {
                return false;
            };
            let mut removed = None;
            if let Some(children) = state.slots.get_mut(&slot) {
                if let Some(pos) = children.iter().position(|child| child.id == id) {
                    removed = Some(children.remove(pos));
                }
                if children.is_empty() {
                    state.slots.remove(&slot);
                }
            }
            state.log(DiagnosticEventKind::child_removed(&slot, id));
            (slot, removed)
        };
        drop(removed);

        self.notify(SlotChange::new(slot, id, ChangeKind::Removed));
        true
    }

    /// Returns true if `id` is currently registered.
    #[must_use]
    pub fn contains(&self, id: ChildId) -> bool {
        self.inner.borrow().locations.contains_key(&id)
    }

    /// Returns the slot holding `id`, if it is registered.
    #[must_use]
    pub fn slot_of(&self, id: ChildId) -> Option<SlotKey> {
        self.inner.borrow().locations.get(&id).cloned()
    }

    /// Runs `f` over the children of `slot`, in registration order.
    ///
    /// # Panics
    ///
    /// Panics if `f` mutates this registry.
    pub fn with_slot<R>(&self, slot: &SlotKey, f: impl FnOnce(&[Child<T>]) -> R) -> R {
        let state = self.inner.borrow();
        f(state.slots.get(slot).map(Vec::as_slice).unwrap_or_default())
    }

    /// Returns the contents of `slot`, in registration order.
    #[must_use]
    pub fn render_slot(&self, slot: &SlotKey) -> Vec<T>
    where
        T: Clone,
    {
        self.with_slot(slot, |children| {
            children.iter().map(|child| child.content.clone()).collect()
        })
    }

    /// Returns a snapshot of the children of `slot`, in registration order.
    #[must_use]
    pub fn children(&self, slot: &SlotKey) -> Vec<Child<T>>
    where
        T: Clone,
    {
        self.with_slot(slot, <[Child<T>]>::to_vec)
    }

    /// Returns the ids registered in `slot`, in registration order.
    #[must_use]
    pub fn child_ids(&self, slot: &SlotKey) -> Vec<ChildId> {
        self.with_slot(slot, |children| children.iter().map(Child::id).collect())
    }

    /// Returns the number of children in `slot`.
    #[must_use]
    pub fn len(&self, slot: &SlotKey) -> usize {
        self.with_slot(slot, <[Child<T>]>::len)
    }

    /// Returns true if `slot` has no children.
    #[must_use]
    pub fn is_empty(&self, slot: &SlotKey) -> bool {
        self.len(slot) == 0
    }

    /// Returns the slots that currently hold at least one child, sorted by key.
    #[must_use]
    pub fn slots(&self) -> Vec<SlotKey> {
        self.inner.borrow().slots.keys().cloned().collect()
    }

    /// Returns the number of active listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub(crate) fn log_stale_handle(&self, slot: &SlotKey, id: ChildId, operation: HandleOperation) {
        self.inner
            .borrow()
            .log(DiagnosticEventKind::stale_handle(slot, id, operation));
    }

    /// Delivers `change` to the listeners of its slot.
    ///
    /// Changes raised while listeners run are queued and delivered once the
    /// current round finishes, so a listener is never re-entered and every
    /// listener sees changes in the order they were applied.
    fn notify(&self, change: SlotChange) {
        {
            let mut state = self.inner.borrow_mut();
            state.pending.push_back(change);
            if state.dispatching {
                return;
            }
            state.dispatching = true;
        }
        let _dispatch = DispatchGuard { inner: &*self.inner };

        loop {
            let next = {
                let mut state = self.inner.borrow_mut();
                state.pending.pop_front().map(|change| {
                    let listeners = state.listeners_for(&change.slot);
                    (change, listeners)
                })
            };
            let Some((change, listeners)) = next else {
                break;
            };

            for (id, callback) in listeners {
                // Skip listeners unsubscribed earlier in this round.
                if !self.inner.borrow().has_listener(id) {
                    continue;
                }
                let mut callback = callback.borrow_mut();
                (&mut *callback)(&change);
            }
        }
    }

    fn remove_listener(&self, id: u64) {
        let removed = {
            let mut state = self.inner.borrow_mut();
            let Some(pos) = state.listeners.iter().position(|entry| entry.id == id) else {
                return;
            };
            let entry = state.listeners.remove(pos);
            state.log(DiagnosticEventKind::ListenerRemoved {
                slot: entry.slot.as_ref().map(ToString::to_string),
            });
            entry
        };
        drop(removed);
    }
}

impl<T: 'static> Registry<T> {
    /// Calls `listener` after every change to `slot`.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or [unsubscribed](Subscription::unsubscribe). It may read and
    /// mutate the registry; changes it makes are delivered after it returns.
    pub fn subscribe(
        &self,
        slot: impl Into<SlotKey>,
        listener: impl FnMut(&SlotChange) + 'static,
    ) -> Subscription {
        self.add_listener(Some(slot.into()), listener)
    }

    /// Calls `listener` after every change to any slot.
    pub fn subscribe_all(&self, listener: impl FnMut(&SlotChange) + 'static) -> Subscription {
        self.add_listener(None, listener)
    }

    /// Creates a consumer for `slot` that caches its children between changes.
    pub fn outlet(&self, slot: impl Into<SlotKey>) -> Outlet<T>
    where
        T: Clone,
    {
        Outlet::new(self.clone(), slot.into())
    }

    fn add_listener(
        &self,
        slot: Option<SlotKey>,
        listener: impl FnMut(&SlotChange) + 'static,
    ) -> Subscription {
        let id = {
            let mut state = self.inner.borrow_mut();
            state.next_listener += 1;
            let id = state.next_listener;
            state.log(DiagnosticEventKind::ListenerAdded {
                slot: slot.as_ref().map(ToString::to_string),
            });
            let callback: Listener = Rc::new(RefCell::new(listener));
            state.listeners.push(ListenerEntry { id, slot, callback });
            id
        };

        let registry = self.downgrade();
        Subscription::new(move || {
            if let Some(inner) = registry.upgrade() {
                Registry::from_inner(inner).remove_listener(id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticsCollector;
    use std::cell::Cell;

    fn toasts() -> SlotKey {
        SlotKey::from("toasts")
    }

    fn modals() -> SlotKey {
        SlotKey::from("modals")
    }

    #[test]
    fn new_registry_is_empty() {
        let registry: Registry<&str> = Registry::new();
        assert!(registry.is_empty(&toasts()));
        assert!(registry.slots().is_empty());
        assert_eq!(registry.default_slot(), SlotKey::TOASTS);
    }

    #[test]
    fn create_update_remove_scenario() {
        let registry = Registry::new();
        let slot = toasts();

        let c1 = registry.create_child(&slot, "X");
        assert_eq!(registry.render_slot(&slot), vec!["X"]);

        let c2 = registry.create_child(&slot, "Y");
        assert_eq!(registry.render_slot(&slot), vec!["X", "Y"]);

        assert!(c1.update("X2"));
        assert_eq!(registry.render_slot(&slot), vec!["X2", "Y"]);

        assert!(c1.remove());
        assert_eq!(registry.render_slot(&slot), vec!["Y"]);

        assert!(c2.remove());
        assert!(registry.render_slot(&slot).is_empty());
    }

    #[test]
    fn ids_are_unique_and_never_reused() {
        let registry = Registry::new();
        let first = registry.create_child(toasts(), 1);
        let first_id = first.id();
        first.remove();

        let second = registry.create_child(toasts(), 2);
        assert_ne!(second.id(), first_id);
        assert!(second.id() > first_id);
    }

    #[test]
    fn default_child_goes_to_default_slot() {
        let registry = Registry::with_default_slot("layer");
        let handle = registry.create_default_child("hello");

        assert_eq!(handle.slot(), &SlotKey::from("layer"));
        assert_eq!(registry.render_slot(&SlotKey::from("layer")), vec!["hello"]);
    }

    #[test]
    fn from_config_uses_configured_slot() {
        let config = Config {
            default_slot: Some("notifications".to_string()),
            ..Config::default()
        };
        let registry: Registry<u8> = Registry::from_config(&config);
        assert_eq!(registry.default_slot(), SlotKey::from("notifications"));
    }

    #[test]
    fn removing_middle_child_keeps_order() {
        let registry = Registry::new();
        let a = registry.create_child(toasts(), "a");
        let b = registry.create_child(toasts(), "b");
        let c = registry.create_child(toasts(), "c");

        b.remove();
        assert_eq!(registry.render_slot(&toasts()), vec!["a", "c"]);
        assert_eq!(registry.child_ids(&toasts()), vec![a.id(), c.id()]);
    }

    #[test]
    fn remove_by_id_is_idempotent() {
        let registry = Registry::new();
        let handle = registry.create_child(toasts(), "x").detach();

        assert!(registry.remove(handle));
        assert!(!registry.remove(handle));
        assert!(!registry.contains(handle));
    }

    #[test]
    fn update_unknown_id_is_ignored() {
        let registry = Registry::new();
        let id = registry.create_child(toasts(), "x").detach();
        registry.remove(id);

        assert!(!registry.update(id, "resurrected"));
        assert!(registry.render_slot(&toasts()).is_empty());
    }

    #[test]
    fn slots_do_not_interfere() {
        let registry = Registry::new();
        let toast = registry.create_child(toasts(), "toast");
        let modal = registry.create_child(modals(), "modal");

        toast.remove();
        assert_eq!(registry.render_slot(&modals()), vec!["modal"]);
        assert_eq!(registry.slots(), vec![modals()]);
        assert_eq!(registry.slot_of(modal.id()), Some(modals()));
    }

    #[test]
    fn listeners_only_see_their_slot() {
        let registry = Registry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = registry.subscribe(toasts(), move |change: &SlotChange| {
            sink.borrow_mut().push(change.kind);
        });

        let toast = registry.create_child(toasts(), "t");
        let _modal = registry.create_child(modals(), "m");
        toast.update("t2");
        toast.remove();

        assert_eq!(
            *seen.borrow(),
            vec![ChangeKind::Created, ChangeKind::Updated, ChangeKind::Removed]
        );
    }

    #[test]
    fn listener_observes_applied_state() {
        let registry = Registry::new();
        let reader = registry.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = registry.subscribe(toasts(), move |change: &SlotChange| {
            sink.borrow_mut().push(reader.render_slot(&change.slot));
        });

        let handle = registry.create_child(toasts(), "x");
        handle.update("y");
        handle.remove();

        assert_eq!(*seen.borrow(), vec![vec!["x"], vec!["y"], vec![]]);
    }

    #[test]
    fn subscribe_all_sees_every_slot() {
        let registry = Registry::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let _subscription = registry.subscribe_all(move |_: &SlotChange| {
            counter.set(counter.get() + 1);
        });

        let _a = registry.create_child(toasts(), 1);
        let _b = registry.create_child(modals(), 2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn dropping_subscription_stops_notifications() {
        let registry = Registry::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let subscription = registry.subscribe(toasts(), move |_: &SlotChange| {
            counter.set(counter.get() + 1);
        });
        assert_eq!(registry.listener_count(), 1);

        let _a = registry.create_child(toasts(), 1);
        drop(subscription);
        let _b = registry.create_child(toasts(), 2);

        assert_eq!(count.get(), 1);
        assert_eq!(registry.listener_count(), 0);
    }

    #[test]
    fn mutations_from_listeners_are_delivered_in_order() {
        let registry: Registry<&'static str> = Registry::new();
        let producer = registry.clone();
        let spawned = Rc::new(RefCell::new(Vec::new()));
        let keep = Rc::clone(&spawned);
        let _echo = registry.subscribe(toasts(), move |change: &SlotChange| {
            if change.kind == ChangeKind::Created && producer.len(&change.slot) == 1 {
                keep.borrow_mut().push(producer.create_child(modals(), "echo"));
            }
        });

        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _all = registry.subscribe_all(move |change: &SlotChange| {
            sink.borrow_mut().push((change.slot.to_string(), change.kind));
        });

        let _first = registry.create_child(toasts(), "first");

        assert_eq!(
            *log.borrow(),
            vec![
                ("toasts".to_string(), ChangeKind::Created),
                ("modals".to_string(), ChangeKind::Created),
            ]
        );
        assert_eq!(registry.render_slot(&modals()), vec!["echo"]);
    }

    #[test]
    fn listener_may_unsubscribe_another_mid_round() {
        let registry: Registry<u8> = Registry::new();
        let victim_calls = Rc::new(Cell::new(0));
        let victim_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let slot = Rc::clone(&victim_slot);
        let _killer = registry.subscribe(toasts(), move |_: &SlotChange| {
            slot.borrow_mut().take();
        });

        let calls = Rc::clone(&victim_calls);
        *victim_slot.borrow_mut() = Some(registry.subscribe(toasts(), move |_: &SlotChange| {
            calls.set(calls.get() + 1);
        }));

        let _child = registry.create_child(toasts(), 1);
        assert_eq!(victim_calls.get(), 0);
        assert_eq!(registry.listener_count(), 1);
    }

    #[test]
    fn with_slot_borrows_children_in_order() {
        let registry = Registry::new();
        let _a = registry.create_child(toasts(), String::from("a"));
        let _b = registry.create_child(toasts(), String::from("b"));

        let joined = registry.with_slot(&toasts(), |children| {
            children
                .iter()
                .map(|child| child.content().as_str())
                .collect::<Vec<_>>()
                .join(",")
        });
        assert_eq!(joined, "a,b");
    }

    #[test]
    fn diagnostics_record_lifecycle() {
        let mut collector = DiagnosticsCollector::default();
        let registry = Registry::new();
        registry.set_diagnostics(collector.handle());

        let handle = registry.create_child(toasts(), "x");
        handle.update("y");
        handle.remove();
        collector.process_pending();

        let kinds: Vec<_> = collector.iter().map(|e| e.kind.type_name()).collect();
        assert_eq!(kinds, vec!["child_created", "child_updated", "child_removed"]);
    }


    #[test]
    fn panicking_listener_does_not_stall_later_rounds() {
        let registry: Registry<u8> = Registry::new();
        let armed = Rc::new(Cell::new(true));
        let trigger = Rc::clone(&armed);
        let _faulty = registry.subscribe(toasts(), move |_: &SlotChange| {
            if trigger.replace(false) {
                panic!("listener failure");
            }
        });

        let producer = registry.clone();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            producer.create_child(toasts(), 1).detach()
        }));
        assert!(outcome.is_err());

        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let _healthy = registry.subscribe(toasts(), move |_: &SlotChange| {
            counter.set(counter.get() + 1);
        });

        let _second = registry.create_child(toasts(), 2);
        assert_eq!(calls.get(), 1);
        assert_eq!(registry.len(&toasts()), 2);
    }
    #[test]
    fn debug_lists_slot_sizes() {
        let registry = Registry::new();
        let _a = registry.create_child(toasts(), 1);
        let output = format!("{registry:?}");
        assert!(output.contains("toasts"));
    }
}
