// crates/prop-harness/src/audit.rs
// ============================================================================
// Module: Run Events
// Description: Structured events emitted while a test runs.
// Purpose: Record run progress as JSON lines without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The executor reports run start, precondition skips, the first failure and
//! the final summary as [`RunEvent`] values. A [`RunSink`] decides where they
//! go; the default sink drops them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::executor::PropertyFailure;
use crate::executor::RunSummary;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Run event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Test name.
    pub test: String,
    /// Samples scheduled for the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<usize>,
    /// Zero-based sample index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_index: Option<usize>,
    /// Property description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// Rendered counter-example of a failed property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
    /// Failure explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Final counters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
}

impl RunEvent {
    /// Creates an event with a consistent timestamp.
    fn new(event: &'static str, test: &str) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            test: test.to_string(),
            samples: None,
            sample_index: None,
            property: None,
            sample: None,
            detail: None,
            summary: None,
        }
    }

    /// A run is starting.
    #[must_use]
    pub fn run_started(test: &str, samples: usize) -> Self {
        Self {
            samples: Some(samples),
            ..Self::new("run_started", test)
        }
    }

    /// A property was skipped because a precondition rejected the sample.
    #[must_use]
    pub fn property_skipped(test: &str, property: &str, sample_index: usize) -> Self {
        Self {
            sample_index: Some(sample_index),
            property: Some(property.to_string()),
            ..Self::new("property_skipped", test)
        }
    }

    /// A property failed; the run stops.
    #[must_use]
    pub fn property_failed(failure: &PropertyFailure) -> Self {
        Self {
            sample_index: Some(failure.sample_index),
            property: Some(failure.property.clone()),
            sample: Some(failure.sample.clone()),
            detail: Some(failure.diagnostic.to_string()),
            ..Self::new("property_failed", &failure.test)
        }
    }

    /// Every property held for every sample.
    #[must_use]
    pub fn run_finished(summary: &RunSummary) -> Self {
        Self {
            samples: Some(summary.samples),
            summary: Some(summary.clone()),
            ..Self::new("run_finished", &summary.test)
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for run events.
pub trait RunSink: Send + Sync {
    /// Record a run event.
    fn record(&self, event: &RunEvent);
}

/// Sink that logs JSON lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrRunSink;

impl RunSink for StderrRunSink {
    fn record(&self, event: &RunEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
#[derive(Debug)]
pub struct FileRunSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileRunSink {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl RunSink for FileRunSink {
    fn record(&self, event: &RunEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRunSink;

impl RunSink for NoopRunSink {
    fn record(&self, _event: &RunEvent) {}
}
