// SPDX-License-Identifier: MPL-2.0
//! Relocation newtypes.

use std::borrow::Cow;
use std::fmt;

// =============================================================================
// SlotKey
// =============================================================================

/// Name of a slot: the region where relocated children are rendered.
///
/// Keys compare by their string value, so `SlotKey::from("toasts")` and
/// [`SlotKey::TOASTS`] address the same slot.
///
/// # Example
///
/// ```
/// use relocation::domain::relocation::SlotKey;
///
/// let modals = SlotKey::from("modals");
/// assert_eq!(modals.as_str(), "modals");
/// assert_eq!(SlotKey::default(), SlotKey::TOASTS);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey(Cow<'static, str>);

impl SlotKey {
    /// The well-known toast layer slot.
    pub const TOASTS: SlotKey = SlotKey(Cow::Borrowed("toasts"));

    /// Creates a slot key from any string.
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SlotKey {
    fn default() -> Self {
        Self::TOASTS
    }
}

impl From<&'static str> for SlotKey {
    fn from(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }
}

impl From<String> for SlotKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

impl From<&SlotKey> for SlotKey {
    fn from(key: &SlotKey) -> Self {
        key.clone()
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// ChildId
// =============================================================================

/// Identifier of a child registration.
///
/// Ids come from a per-registry monotonic counter and are never reused
/// while that registry is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChildId(u64);

impl ChildId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "child#{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
