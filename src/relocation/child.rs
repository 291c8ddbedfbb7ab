// SPDX-License-Identifier: MPL-2.0
//! Registered children and change notifications.

use crate::domain::relocation::{ChildId, SlotKey};

/// One registration inside a slot: its id and the producer's content.
#[derive(Debug, Clone, PartialEq)]
pub struct Child<T> {
    pub(crate) id: ChildId,
    pub(crate) content: T,
}

impl<T> Child<T> {
    /// Returns the registration id.
    #[must_use]
    pub fn id(&self) -> ChildId {
        self.id
    }

    /// Returns the current content.
    #[must_use]
    pub fn content(&self) -> &T {
        &self.content
    }

    /// Consumes the child, returning its content.
    pub fn into_content(self) -> T {
        self.content
    }
}

/// What happened to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Appended to the end of its slot.
    Created,
    /// Content replaced in place.
    Updated,
    /// Removed from its slot.
    Removed,
}

/// Notification delivered to slot listeners after a mutation was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotChange {
    /// Slot whose sequence changed.
    pub slot: SlotKey,
    /// Child that changed.
    pub child: ChildId,
    /// Kind of change.
    pub kind: ChangeKind,
}

impl SlotChange {
    pub(crate) fn new(slot: SlotKey, child: ChildId, kind: ChangeKind) -> Self {
        Self { slot, child, kind }
    }
}
