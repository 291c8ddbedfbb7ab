// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for recording registry activity.
//!
//! Registry mutations and handle misuse are captured as structured events.
//! The collector keeps the most recent ones, counts what it had to drop,
//! and exports everything as a JSON report for analysis.
//!
//! # Architecture
//!
//! - [`DiagnosticEvent`]: A timestamped [`DiagnosticEventKind`]
//! - [`DiagnosticsCollector`]: Drains the handles' channel into a bounded history
//! - [`DiagnosticsHandle`]: Cheap, cloneable, non-blocking event sender

mod collector;
mod events;
mod report;

pub use collector::{DiagnosticsCollector, DiagnosticsHandle, CHANNEL_CAPACITY};
pub use events::{DiagnosticEvent, DiagnosticEventKind, HandleOperation};
pub use report::{DiagnosticReport, ReportMetadata, ReportSummary, SerializableEvent};
