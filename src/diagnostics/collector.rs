// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! The collector receives events from registries through
//! [`DiagnosticsHandle`]s and keeps the most recent ones in memory.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use super::{DiagnosticEvent, DiagnosticEventKind, DiagnosticReport, ReportMetadata, SerializableEvent};
use crate::config::{Config, DEFAULT_DIAGNOSTICS_CAPACITY};
use crate::error::Result;

/// Number of events a handle can queue before the collector drains them.
pub const CHANNEL_CAPACITY: usize = 100;

/// Handle for sending diagnostic events to the collector.
///
/// Cheap to clone. Sends never block: when the channel is full the event
/// is dropped and counted.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
    dropped: Arc<AtomicU64>,
}

impl DiagnosticsHandle {
    /// Logs an event, dropping it if the channel is full.
    pub fn log(&self, kind: DiagnosticEventKind) {
        if let Err(TrySendError::Full(_)) = self.event_tx.try_send(DiagnosticEvent::new(kind)) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Central collector for diagnostic events.
pub struct DiagnosticsCollector {
    /// Most recent events, oldest first.
    history: VecDeque<DiagnosticEvent>,
    /// Maximum length of `history`.
    capacity: usize,
    /// Events pushed out of `history` by newer ones.
    evicted: u64,
    /// Events handles could not send because the channel was full.
    dropped: Arc<AtomicU64>,
    /// Receiver for incoming events.
    event_rx: Receiver<DiagnosticEvent>,
    /// Sender stored to create handles.
    event_tx: Sender<DiagnosticEvent>,
    /// When collection started (monotonic clock for duration calculations).
    collection_started_at: Instant,
    /// When collection started (wall clock for report metadata).
    collection_started_at_utc: DateTime<Utc>,
}

impl DiagnosticsCollector {
    /// Creates a collector keeping the last `capacity` events.
    ///
    /// Capacities below [`CHANNEL_CAPACITY`] are raised to it, so draining a
    /// full channel never evicts events from the same drain.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(CHANNEL_CAPACITY);
        let (event_tx, event_rx) = bounded(CHANNEL_CAPACITY);

        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
            dropped: Arc::new(AtomicU64::new(0)),
            event_rx,
            event_tx,
            collection_started_at: Instant::now(),
            collection_started_at_utc: Utc::now(),
        }
    }

    /// Creates a collector sized by [`Config::diagnostics_capacity`].
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.diagnostics_capacity())
    }

    /// Creates a handle for sending events to this collector.
    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// Processes all pending events from the channel.
    ///
    /// Call this periodically (e.g., on each UI tick) to drain the
    /// event channel.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.push(event);
        }
    }

    /// Logs an event directly to the history (bypassing the channel).
    pub fn log(&mut self, kind: DiagnosticEventKind) {
        self.push(DiagnosticEvent::new(kind));
    }

    fn push(&mut self, event: DiagnosticEvent) {
        if self.history.len() >= self.capacity {
            self.history.pop_front();
            self.evicted += 1;
        }
        self.history.push_back(event);
    }

    /// Returns the number of events currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns true if no events are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Returns an iterator over all stored events (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.history.iter()
    }

    /// Clears all stored events. Loss counters are kept.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Returns how many events are kept at most.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns how many events were lost because the channel was full.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Returns how many stored events were pushed out by newer ones.
    #[must_use]
    pub fn evicted_events(&self) -> u64 {
        self.evicted
    }

    /// Returns how long the collector has been running.
    #[must_use]
    pub fn collection_duration(&self) -> Duration {
        self.collection_started_at.elapsed()
    }

    /// Builds a report from the stored events.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    pub fn build_report(&self) -> DiagnosticReport {
        let collection_duration_ms = self.collection_started_at.elapsed().as_millis() as u64;
        let events: Vec<SerializableEvent> = self
            .history
            .iter()
            .map(|event| {
                SerializableEvent::new(
                    event.timestamp,
                    self.collection_started_at,
                    event.kind.clone(),
                )
            })
            .collect();
        let metadata = ReportMetadata::new(
            self.collection_started_at_utc,
            collection_duration_ms,
            events.len(),
        )
        .with_losses(self.dropped_events(), self.evicted);

        DiagnosticReport::new(metadata, events)
    }

    /// Exports all collected events as a JSON diagnostic report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        self.build_report().to_json()
    }

    /// Writes the JSON report to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = self.export_json()?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(DEFAULT_DIAGNOSTICS_CAPACITY)
    }
}
