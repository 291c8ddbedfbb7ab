// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core value types with ZERO external dependencies.
//!
//! This module contains pure domain types and value objects.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`relocation`]: Relocation identifiers ([`SlotKey`](relocation::SlotKey),
//!   [`ChildId`](relocation::ChildId))

pub mod relocation;
