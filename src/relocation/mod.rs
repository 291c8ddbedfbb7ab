// SPDX-License-Identifier: MPL-2.0
//! Relocation: render content somewhere other than where it is declared.
//!
//! Producers deep in a view tree register children into a named slot;
//! a single consumer near the root renders that slot. Typical use is a
//! toast stack fed by any number of components.
//!
//! # Components
//!
//! - [`Registry`] - Shared slot state, change notification
//! - [`ChildHandle`] - Producer's update/remove rights, removes on drop
//! - [`Subscription`] - Keeps a change listener alive
//! - [`Outlet`] - Consumer-side cached view of one slot
//!
//! # Lifecycle
//!
//! Each registration moves `registered -> (updated)* -> removed`, and
//! `removed` is terminal: updates and removals through a stale handle are
//! ignored (and reported to diagnostics when a handle is set).

mod child;
mod handle;
mod outlet;
mod registry;
mod subscription;

pub use child::{ChangeKind, Child, SlotChange};
pub use handle::ChildHandle;
pub use outlet::Outlet;
pub use registry::Registry;
pub use subscription::Subscription;
