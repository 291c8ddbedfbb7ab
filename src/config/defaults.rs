// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for configuration constants.
//!
//! # Categories
//!
//! - **Slots**: Default slot used when a producer omits one
//! - **Toast Layout**: Spacing and sizing of the toast stack
//! - **Diagnostics**: Event buffer capacity

// ==========================================================================
// Slot Defaults
// ==========================================================================

/// Slot used when a producer does not name one.
pub const DEFAULT_SLOT: &str = "toasts";

// ==========================================================================
// Toast Layout Defaults
// ==========================================================================

/// Vertical gap between stacked toasts (in logical pixels).
pub const DEFAULT_TOAST_SPACING: f32 = 8.0;

/// Padding between the toast stack and the window edges.
pub const DEFAULT_TOAST_PADDING: f32 = 16.0;

/// Fixed width of a single toast.
pub const DEFAULT_TOAST_WIDTH: f32 = 320.0;

/// Smallest accepted toast width.
pub const MIN_TOAST_WIDTH: f32 = 120.0;

/// Largest accepted toast width.
pub const MAX_TOAST_WIDTH: f32 = 960.0;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of diagnostic events kept in memory.
pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 256;

/// Largest accepted diagnostics history.
pub const MAX_DIAGNOSTICS_CAPACITY: usize = 4096;
