// SPDX-License-Identifier: MPL-2.0
//! Diagnostic report generation and JSON export.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DiagnosticEventKind;

// =============================================================================
// Report Metadata
// =============================================================================

/// Metadata about a diagnostic report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    /// When the report was generated (ISO 8601)
    pub generated_at: String,
    /// Version of the crate that generated the report
    pub crate_version: String,
    /// When diagnostic collection started (ISO 8601)
    pub collection_started_at: String,
    /// Duration of collection in milliseconds
    pub collection_duration_ms: u64,
    /// Total number of events in the report
    pub event_count: usize,
    /// Events lost because the handles' channel was full
    #[serde(default)]
    pub dropped_events: u64,
    /// Events pushed out of the history by newer ones
    #[serde(default)]
    pub evicted_events: u64,
}

impl ReportMetadata {
    /// Creates new report metadata.
    #[must_use]
    pub fn new(
        collection_started_at: DateTime<Utc>,
        collection_duration_ms: u64,
        event_count: usize,
    ) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            collection_started_at: collection_started_at.to_rfc3339(),
            collection_duration_ms,
            event_count,
            dropped_events: 0,
            evicted_events: 0,
        }
    }

    /// Records how many events never made it into the report.
    #[must_use]
    pub fn with_losses(mut self, dropped_events: u64, evicted_events: u64) -> Self {
        self.dropped_events = dropped_events;
        self.evicted_events = evicted_events;
        self
    }
}

// =============================================================================
// Serializable Event
// =============================================================================

/// An event with its timestamp expressed relative to collection start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializableEvent {
    /// Milliseconds since collection started
    pub timestamp_ms: u64,
    /// The event data
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl SerializableEvent {
    /// Creates a serializable event from a diagnostic event.
    ///
    /// Events stamped before `collection_start` saturate to zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    pub fn new(
        event_timestamp: Instant,
        collection_start: Instant,
        kind: DiagnosticEventKind,
    ) -> Self {
        let timestamp_ms = event_timestamp
            .saturating_duration_since(collection_start)
            .as_millis() as u64;

        Self { timestamp_ms, kind }
    }
}

// =============================================================================
// Report Summary
// =============================================================================

/// Aggregate counts over the events of a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReportSummary {
    /// Count of events by type (e.g., `"child_created": 15`)
    pub event_counts: HashMap<String, usize>,
    /// Number of events flagged as producer misuse
    pub warning_count: usize,
}

impl ReportSummary {
    /// Builds a summary from a list of serializable events.
    #[must_use]
    pub fn from_events(events: &[SerializableEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            *summary
                .event_counts
                .entry(event.kind.type_name().to_string())
                .or_insert(0) += 1;
            if event.kind.is_warning() {
                summary.warning_count += 1;
            }
        }
        summary
    }
}

// =============================================================================
// Diagnostic Report
// =============================================================================

/// Complete diagnostic report ready for export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Collected events (oldest first)
    pub events: Vec<SerializableEvent>,
    /// Aggregate statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ReportSummary>,
}

impl DiagnosticReport {
    /// Creates a report and computes its summary.
    #[must_use]
    pub fn new(metadata: ReportMetadata, events: Vec<SerializableEvent>) -> Self {
        let summary = Some(ReportSummary::from_events(&events));
        Self {
            metadata,
            events,
            summary,
        }
    }

    /// Serializes the report to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn created(child: u64) -> DiagnosticEventKind {
        DiagnosticEventKind::ChildCreated {
            slot: "toasts".to_string(),
            child,
        }
    }

    #[test]
    fn serializable_event_uses_relative_timestamp() {
        let start = Instant::now();
        let later = start + Duration::from_millis(250);

        let event = SerializableEvent::new(later, start, created(1));
        assert_eq!(event.timestamp_ms, 250);
    }

    #[test]
    fn serializable_event_saturates_before_start() {
        let start = Instant::now() + Duration::from_secs(1);
        let event = SerializableEvent::new(Instant::now(), start, created(1));
        assert_eq!(event.timestamp_ms, 0);
    }

    #[test]
    fn serializable_event_flattens_kind() {
        let event = SerializableEvent {
            timestamp_ms: 12,
            kind: created(4),
        };
        let value = serde_json::to_value(&event).expect("serialization should succeed");

        assert_eq!(value["timestamp_ms"], 12);
        assert_eq!(value["type"], "child_created");
        assert_eq!(value["child"], 4);
    }

    #[test]
    fn summary_counts_by_type_and_warnings() {
        let events = vec![
            SerializableEvent {
                timestamp_ms: 0,
                kind: created(1),
            },
            SerializableEvent {
                timestamp_ms: 1,
                kind: created(2),
            },
            SerializableEvent {
                timestamp_ms: 2,
                kind: DiagnosticEventKind::StaleHandle {
                    slot: "toasts".to_string(),
                    child: 1,
                    operation: super::super::HandleOperation::Update,
                },
            },
        ];

        let summary = ReportSummary::from_events(&events);
        assert_eq!(summary.event_counts.get("child_created"), Some(&2));
        assert_eq!(summary.event_counts.get("stale_handle"), Some(&1));
        assert_eq!(summary.warning_count, 1);
    }

    #[test]
    fn report_json_contains_metadata() {
        let metadata = ReportMetadata::new(Utc::now(), 10, 0);
        let report = DiagnosticReport::new(metadata, Vec::new());
        let json = report.to_json().expect("serialization should succeed");

        assert!(json.contains("crate_version"));
        assert!(json.contains("event_counts"));
    }
}
