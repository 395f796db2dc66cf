//! Audit events and sinks
//!
//! The analyzer reports its progress as [`AnalysisEvent`]s to an injected
//! [`AuditSink`]. Sinks are fire-and-forget: the pipeline never reads back
//! from them and never depends on their presence or ordering. The default
//! [`NoopSink`] discards everything.

use crate::levels::PatternLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Analysis lifecycle events
///
/// Serialized with an internal `type` tag so downstream provenance loggers
/// can filter on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalysisEvent {
    /// `analyze` accepted its input
    AnalysisStarted {
        subject_id: String,
        /// "signal", "spectrum" or "depth"
        input_kind: String,
        timestamp: DateTime<Utc>,
    },

    /// Theoretical series matched against the spectrum
    HarmonicsMatched {
        subject_id: String,
        candidates: usize,
        matched: usize,
        timestamp: DateTime<Utc>,
    },

    /// A numeric degeneracy was resolved to a neutral value
    DegenerateInput {
        subject_id: String,
        detail: String,
        timestamp: DateTime<Utc>,
    },

    /// Classification finished
    AnalysisCompleted {
        subject_id: String,
        level: PatternLevel,
        composite_score: f64,
        complexity_index: f64,
        failed_checks: usize,
        timestamp: DateTime<Utc>,
    },

    /// Input was rejected
    AnalysisFailed {
        subject_id: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl AnalysisEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            AnalysisEvent::AnalysisStarted { .. } => "AnalysisStarted",
            AnalysisEvent::HarmonicsMatched { .. } => "HarmonicsMatched",
            AnalysisEvent::DegenerateInput { .. } => "DegenerateInput",
            AnalysisEvent::AnalysisCompleted { .. } => "AnalysisCompleted",
            AnalysisEvent::AnalysisFailed { .. } => "AnalysisFailed",
        }
    }

    /// Subject the event belongs to
    pub fn subject_id(&self) -> &str {
        match self {
            AnalysisEvent::AnalysisStarted { subject_id, .. }
            | AnalysisEvent::HarmonicsMatched { subject_id, .. }
            | AnalysisEvent::DegenerateInput { subject_id, .. }
            | AnalysisEvent::AnalysisCompleted { subject_id, .. }
            | AnalysisEvent::AnalysisFailed { subject_id, .. } => subject_id,
        }
    }
}

/// Destination for audit events
///
/// Implementations must be append-only and safe to share across threads;
/// a single sink may receive events from concurrent analyses.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AnalysisEvent);
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl AuditSink for NoopSink {
    fn record(&self, _event: &AnalysisEvent) {}
}

/// Sink that keeps events in memory, in arrival order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<AnalysisEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<AnalysisEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        match self.events.lock() {
            Ok(events) => events.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemorySink {
    fn record(&self, event: &AnalysisEvent) {
        // A poisoned lock only means another recorder panicked mid-push;
        // appending is still sound.
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event.clone());
    }
}

/// Sink that forwards events to `tracing` as JSON at INFO level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, event: &AnalysisEvent) {
        match serde_json::to_string(event) {
            Ok(json) => tracing::info!(
                target: "harmonia::audit",
                event_type = event.event_type(),
                "{}",
                json
            ),
            Err(e) => tracing::warn!(
                target: "harmonia::audit",
                "Failed to serialize {} event: {}",
                event.event_type(),
                e
            ),
        }
    }
}
