// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for registry activity.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::domain::relocation::{ChildId, SlotKey};

/// Handle operation attempted on a registration that no longer exists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HandleOperation {
    /// Content replacement.
    Update,
    /// Removal.
    Remove,
}

/// A diagnostic event with its timestamp.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// When the event occurred (monotonic clock for duration calculations)
    pub timestamp: Instant,
    /// The type and data of the event
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with the current timestamp.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }

    /// Creates a new diagnostic event with a specific timestamp.
    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: Instant) -> Self {
        Self { timestamp, kind }
    }
}

/// The type and associated data for a diagnostic event.
///
/// Slot keys and child ids are stored as plain values so events stay
/// serializable without the registry's types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    /// A child was appended to a slot.
    ChildCreated {
        /// Slot the child was registered in.
        slot: String,
        /// Raw child id.
        child: u64,
    },

    /// A child's content was replaced in place.
    ChildUpdated {
        /// Slot holding the child.
        slot: String,
        /// Raw child id.
        child: u64,
    },

    /// A child was removed from its slot.
    ChildRemoved {
        /// Slot the child was removed from.
        slot: String,
        /// Raw child id.
        child: u64,
    },

    /// A change listener was registered.
    ListenerAdded {
        /// Watched slot, `None` when watching every slot.
        #[serde(skip_serializing_if = "Option::is_none")]
        slot: Option<String>,
    },

    /// A change listener was dropped or unsubscribed.
    ListenerRemoved {
        /// Watched slot, `None` when watching every slot.
        #[serde(skip_serializing_if = "Option::is_none")]
        slot: Option<String>,
    },

    /// A handle was used after its registration was removed.
    ///
    /// The operation was ignored; this usually points at teardown ordering
    /// in the producer.
    StaleHandle {
        /// Slot the child used to live in.
        slot: String,
        /// Raw child id.
        child: u64,
        /// What the producer tried to do.
        operation: HandleOperation,
    },
}

impl DiagnosticEventKind {
    pub(crate) fn child_created(slot: &SlotKey, child: ChildId) -> Self {
        Self::ChildCreated {
            slot: slot.to_string(),
            child: child.value(),
        }
    }

    pub(crate) fn child_updated(slot: &SlotKey, child: ChildId) -> Self {
        Self::ChildUpdated {
            slot: slot.to_string(),
            child: child.value(),
        }
    }

    pub(crate) fn child_removed(slot: &SlotKey, child: ChildId) -> Self {
        Self::ChildRemoved {
            slot: slot.to_string(),
            child: child.value(),
        }
    }

    pub(crate) fn stale_handle(slot: &SlotKey, child: ChildId, operation: HandleOperation) -> Self {
        Self::StaleHandle {
            slot: slot.to_string(),
            child: child.value(),
            operation,
        }
    }

    /// Returns the serialized type tag of this event.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ChildCreated { .. } => "child_created",
            Self::ChildUpdated { .. } => "child_updated",
            Self::ChildRemoved { .. } => "child_removed",
            Self::ListenerAdded { .. } => "listener_added",
            Self::ListenerRemoved { .. } => "listener_removed",
            Self::StaleHandle { .. } => "stale_handle",
        }
    }

    /// Returns true for events that indicate producer misuse.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::StaleHandle { .. })
    }
}
