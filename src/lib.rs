// SPDX-License-Identifier: MPL-2.0
//! `relocation` renders content away from where it is declared.
//!
//! Components register children into named slots of a shared [`Registry`];
//! one consumer per slot renders them in registration order and is told
//! whenever the slot changes. The [`toast`] module builds a toast stack for
//! Iced applications on top of it.

#![doc(html_root_url = "https://docs.rs/relocation/0.1.0")]

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod relocation;
pub mod toast;

pub use domain::relocation::{ChildId, SlotKey};
pub use relocation::{ChangeKind, Child, ChildHandle, Outlet, Registry, SlotChange, Subscription};
