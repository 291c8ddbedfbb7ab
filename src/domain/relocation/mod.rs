// SPDX-License-Identifier: MPL-2.0
//! Relocation domain types.
//!
//! - [`SlotKey`]: Name of a target region where relocated content renders
//! - [`ChildId`]: Identifier of one registration inside a registry

mod newtypes;

pub use newtypes::{ChildId, SlotKey};
